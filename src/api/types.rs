use crate::models::product::Product;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pagination envelope accompanying every list response. `total` counts the
/// records matching the filter before the page window is applied.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<Product>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailResponse {
    pub success: bool,
    pub data: Product,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductMutationResponse {
    pub success: bool,
    pub message: String,
    pub data: Product,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Multipart form for product creation. Documented here for the OpenAPI
/// schema; the handler reads the fields from the multipart stream.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductForm {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    /// Optional image file (image/*, max 5 MiB)
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
}

/// Multipart form for product updates; any subset of fields may be sent.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    /// Replacement image file (image/*, max 5 MiB)
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
}
