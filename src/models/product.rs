use crate::errors::{AppError, Result};
use crate::utils::validation::Validator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The catalog's single persisted entity. Field names follow the wire
/// contract (camelCase), timestamps are UTC.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    /// Relative path under /uploads, or null when the product has no image.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields of a create/update submission, exactly as they arrived in the
/// multipart form. Validation happens in the service so that a file saved
/// before a failing field can still be cleaned up.
#[derive(Debug, Default, Clone)]
pub struct ProductForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    /// Public path of a file already written to the uploads directory.
    pub image: Option<String>,
}

/// Combined listing constraints. Omitted members impose no restriction;
/// supplied members are ANDed together.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Pagination window requested by the caller. `page` and `limit` are both
/// at least 1; there is no upper clamp on `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageWindow {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// ceil(total / limit)
    pub fn pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// Raw query-string parameters of the listing endpoint. Everything arrives
/// as text and is validated by `parse_listing_params`, so malformed numeric
/// input yields a validation error instead of a NaN bound.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Free-text search over product name and description
    pub search: Option<String>,
    /// Comma-separated category list; a product must match at least one
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// Page number, starting at 1
    pub page: Option<String>,
    /// Records per page
    pub limit: Option<String>,
}

pub fn parse_listing_params(query: &ListProductsQuery) -> Result<(ProductFilter, PageWindow)> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let categories = match &query.category {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };

    let min_price = match &query.min_price {
        Some(raw) => Some(Validator::parse_price_bound("minPrice", raw)?),
        None => None,
    };
    let max_price = match &query.max_price {
        Some(raw) => Some(Validator::parse_price_bound("maxPrice", raw)?),
        None => None,
    };

    if let (Some(min), Some(max)) = (min_price, max_price) {
        if min > max {
            return Err(AppError::ValidationError(
                "minPrice must not exceed maxPrice".to_string(),
            ));
        }
    }

    let page = match &query.page {
        Some(raw) => Validator::parse_positive_int("page", raw)?,
        None => 1,
    };
    let limit = match &query.limit {
        Some(raw) => Validator::parse_positive_int("limit", raw)?,
        None => 10,
    };

    Ok((
        ProductFilter {
            search,
            categories,
            min_price,
            max_price,
        },
        PageWindow { page, limit },
    ))
}
