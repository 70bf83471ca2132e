use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};

use crate::api::types::*;
use crate::api::AppState;
use crate::errors::AppError;
use crate::models::product::{parse_listing_params, ListProductsQuery, ProductForm};
use crate::services::upload::{UploadStorage, MAX_IMAGE_BYTES};
use tracing::error;
use uuid::Uuid;

/// Request bodies may exceed the image cap by the text fields and multipart
/// framing; the precise 5 MiB check happens against the file bytes.
const MULTIPART_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 256 * 1024;

/// Product API endpoints
pub fn product_router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ListProductsQuery),
    responses(
        (status = 200, body = ProductListResponse),
        (status = 400, body = ErrorResponse, description = "Invalid filter or paging parameter"),
        (status = 500, body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Response {
    let (filter, window) = match parse_listing_params(&query) {
        Ok(parsed) => parsed,
        Err(e) => return error_response(e, "Error fetching products"),
    };

    match state.service.list(&filter, &window).await {
        Ok((products, total)) => (
            StatusCode::OK,
            Json(ProductListResponse {
                success: true,
                data: products,
                pagination: Pagination {
                    total,
                    page: window.page,
                    limit: window.limit,
                    pages: window.pages(total),
                },
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error fetching products"),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, body = ProductDetailResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Response {
    // A malformed id cannot reference any record; same outcome as unknown.
    let Ok(id) = Uuid::parse_str(&id) else {
        return not_found_response();
    };

    match state.service.get(&id).await {
        Ok(product) => (
            StatusCode::OK,
            Json(ProductDetailResponse {
                success: true,
                data: product,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error fetching product"),
    }
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = CreateProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, body = ProductMutationResponse),
        (status = 400, body = ErrorResponse, description = "Missing field or rejected upload")
    ),
    tag = "Products"
)]
pub async fn create_product(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Response {
    let form = match read_product_form(state.service.storage(), multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(e, "Error creating product"),
    };

    match state.service.create(form).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(ProductMutationResponse {
                success: true,
                message: "Product created successfully".to_string(),
                data: product,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error creating product"),
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body(content = UpdateProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ProductMutationResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    // The form is read first: an uploaded file must be cleaned up even when
    // the id turns out not to reference anything.
    let form = match read_product_form(state.service.storage(), multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(e, "Error updating product"),
    };

    let Ok(id) = Uuid::parse_str(&id) else {
        if let Some(path) = &form.image {
            state.service.storage().discard(path).await;
        }
        return not_found_response();
    };

    match state.service.update(&id, form).await {
        Ok(product) => (
            StatusCode::OK,
            Json(ProductMutationResponse {
                success: true,
                message: "Product updated successfully".to_string(),
                data: product,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error updating product"),
    }
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return not_found_response();
    };

    match state.service.delete(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                success: true,
                message: "Product deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e, "Error deleting product"),
    }
}

/// Reads the multipart stream into a `ProductForm`, writing an `image` file
/// field to the uploads directory as it is encountered. If anything fails
/// after that file was written, it is discarded before the error surfaces.
async fn read_product_form(
    storage: &UploadStorage,
    multipart: Multipart,
) -> crate::errors::Result<ProductForm> {
    let mut form = ProductForm::default();
    match fill_product_form(storage, &mut form, multipart).await {
        Ok(()) => Ok(form),
        Err(e) => {
            if let Some(path) = &form.image {
                storage.discard(path).await;
            }
            Err(e)
        }
    }
}

async fn fill_product_form(
    storage: &UploadStorage,
    form: &mut ProductForm,
    mut multipart: Multipart,
) -> crate::errors::Result<()> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(()),
            Err(e) => {
                return Err(AppError::ValidationError(format!(
                    "Malformed multipart request: {}",
                    e
                )))
            }
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                if form.image.is_some() {
                    return Err(AppError::UploadError(
                        "Only a single image file is allowed".to_string(),
                    ));
                }
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    AppError::UploadError(format!("Failed to read image upload: {}", e))
                })?;
                let path = storage
                    .store(file_name.as_deref(), content_type.as_deref(), &data)
                    .await?;
                form.image = Some(path);
            }
            "name" | "category" | "price" | "description" => {
                let value = field.text().await.map_err(|e| {
                    AppError::ValidationError(format!("Malformed field '{}': {}", name, e))
                })?;
                match name.as_str() {
                    "name" => form.name = Some(value),
                    "category" => form.category = Some(value),
                    "price" => form.price = Some(value),
                    _ => form.description = Some(value),
                }
            }
            // Unknown form fields are ignored.
            _ => {}
        }
    }
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            message: "Product not found".to_string(),
            error: None,
        }),
    )
        .into_response()
}

fn error_response(err: AppError, context: &str) -> Response {
    match err {
        AppError::NotFound(message) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                success: false,
                message,
                error: None,
            }),
        )
            .into_response(),
        AppError::ValidationError(message) | AppError::UploadError(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                success: false,
                message,
                error: None,
            }),
        )
            .into_response(),
        other => {
            error!(action = "request_failed", context = %context, error = %other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    success: false,
                    message: context.to_string(),
                    error: Some(other.to_string()),
                }),
            )
                .into_response()
        }
    }
}
