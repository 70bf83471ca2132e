use crate::api::types::{
    ErrorResponse, MessageResponse, ProductDetailResponse, ProductListResponse,
    ProductMutationResponse,
};
use crate::errors::{AppError, Result};
use crate::models::product::Product;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use uuid::Uuid;

/// Categories the browsing UI offers in its filter and form dropdowns. The
/// server does not enforce this list.
pub const RECOMMENDED_CATEGORIES: [&str; 8] = [
    "Electronics",
    "Clothing",
    "Home & Garden",
    "Sports",
    "Books",
    "Beauty",
    "Automotive",
    "Food & Beverages",
];

/// Listing constraints as the client sends them. Everything is optional;
/// categories are joined comma-separated on the wire.
#[derive(Debug, Default, Clone)]
pub struct ListParams {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if !self.categories.is_empty() {
            query.push(("category", self.categories.join(",")));
        }
        if let Some(min) = self.min_price {
            query.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            query.push(("maxPrice", max.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// Text fields of a create or update submission. For creation the server
/// requires all four; updates may send any subset.
#[derive(Debug, Default, Clone)]
pub struct ProductFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

/// An image file to attach to a create/update submission.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Typed consumer of the catalog HTTP contract. The base URL is injected at
/// construction so deployments are not coupled to a hardcoded host.
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub async fn list_products(&self, params: &ListParams) -> Result<ProductListResponse> {
        let response = self
            .client
            .get(format!("{}/api/products", self.base_url))
            .query(&params.to_query())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<ProductListResponse>().await?)
    }

    pub async fn get_product(&self, id: &Uuid) -> Result<Product> {
        let response = self
            .client
            .get(format!("{}/api/products/{}", self.base_url, id))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<ProductDetailResponse>().await?.data)
    }

    pub async fn create_product(
        &self,
        fields: &ProductFields,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        let form = build_form(fields, image)?;
        let response = self
            .client
            .post(format!("{}/api/products", self.base_url))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<ProductMutationResponse>().await?.data)
    }

    pub async fn update_product(
        &self,
        id: &Uuid,
        fields: &ProductFields,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        let form = build_form(fields, image)?;
        let response = self
            .client
            .put(format!("{}/api/products/{}", self.base_url, id))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<ProductMutationResponse>().await?.data)
    }

    pub async fn delete_product(&self, id: &Uuid) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/api/products/{}", self.base_url, id))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response.json::<MessageResponse>().await?;
        Ok(())
    }

    /// Absolute URL of a product's image, if it has one.
    pub fn image_url(&self, product: &Product) -> Option<String> {
        product
            .image
            .as_ref()
            .map(|path| format!("{}{}", self.base_url, path))
    }
}

fn build_form(fields: &ProductFields, image: Option<ImageUpload>) -> Result<Form> {
    let mut form = Form::new();
    if let Some(name) = &fields.name {
        form = form.text("name", name.clone());
    }
    if let Some(category) = &fields.category {
        form = form.text("category", category.clone());
    }
    if let Some(price) = fields.price {
        form = form.text("price", price.to_string());
    }
    if let Some(description) = &fields.description {
        form = form.text("description", description.clone());
    }
    if let Some(image) = image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        form = form.part("image", part);
    }
    Ok(form)
}

async fn error_from_response(response: reqwest::Response) -> AppError {
    let status = response.status();
    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| format!("HTTP {}", status));
    match status.as_u16() {
        404 => AppError::NotFound(message),
        400 => AppError::ValidationError(message),
        _ => AppError::NetworkError(message),
    }
}
