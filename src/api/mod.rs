use axum::{response::IntoResponse, Extension, Json, Router};
use hyper::Method;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::Instrument;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::config::Config;
use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::services::product_service::ProductService;
use crate::services::upload::UploadStorage;
use crate::utils::middleware::rate_limit_middleware;
use axum::http::StatusCode;
use axum::routing::{get, options};
use serde_json::Value;

pub mod docs;
mod routes;
pub mod types;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::list_products,
        routes::get_product,
        routes::create_product,
        routes::update_product,
        routes::delete_product,
    ),
    components(
        schemas(
            crate::models::product::Product,
            types::Pagination,
            types::ProductListResponse,
            types::ProductDetailResponse,
            types::ProductMutationResponse,
            types::MessageResponse,
            types::ErrorResponse,
            types::CreateProductForm,
            types::UpdateProductForm,
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints: filtered/paginated listing, lookup, and CRUD with image upload")
    )
)]
pub struct ApiDoc;

/// Everything a handler needs, resolved once at startup and injected
/// explicitly — there is no global database or configuration.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProductService>,
    pub uploads_dir: PathBuf,
    pub public_base_url: String,
    pub rate_limit_per_sec: u64,
}

pub async fn request_id_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(request_id.clone());
    let span = tracing::info_span!("request", request_id = %request_id, method = %req.method(), uri = %req.uri());
    async move { next.run(req).await }.instrument(span).await
}

/// Assembles the full application router for the given state. Split out of
/// `serve` so tests can drive the same router directly.
pub fn build_router(state: AppState) -> Router {
    let openapi = ApiDoc::openapi();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/*path", options(|| async { StatusCode::NO_CONTENT }))
        .nest("/api/products", routes::product_router())
        // Uploaded images are served back as static content
        .nest_service("/uploads", ServeDir::new(state.uploads_dir.clone()))
        .route("/health", get(health_check))
        // OpenAPI Documentation Routes
        .route("/docs/openapi.json", get(openapi_json))
        .route("/docs/markdown", get(api_markdown))
        .route("/docs", get(api_documentation))
        // Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi.clone()))
        // Redoc UI
        .merge(Redoc::with_url("/api/redoc", openapi))
        .layer(axum::middleware::from_fn_with_state(
            state.rate_limit_per_sec,
            rate_limit_middleware,
        ))
        .layer(Extension(state))
        .layer(cors)
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// Main entry point for the catalog API server.
pub async fn serve(config: Config) -> Result<()> {
    let db = Arc::new(SqliteDatabase::new(&config.database_path).await?);
    let storage = UploadStorage::new(config.uploads_dir.clone())?;
    let service = Arc::new(ProductService::new(db, storage));

    let state = AppState {
        service,
        uploads_dir: config.uploads_dir.clone(),
        public_base_url: config.public_base_url.clone(),
        rate_limit_per_sec: config.rate_limit_per_sec,
    };
    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .map_err(|e| AppError::ConfigError(format!("Invalid listen address: {}", e)))?;

    println!("🚀 HTTP API running at http://{}/health", addr);
    println!("📚 API Documentation available at: http://{}/api/docs", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::IoError(format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::IoError(format!("Server error: {}", e)))?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Export OpenAPI specification as JSON
async fn openapi_json() -> Json<Value> {
    let openapi = ApiDoc::openapi();
    Json(serde_json::to_value(openapi).unwrap_or_default())
}

/// Serves the API documentation as downloadable Markdown.
async fn api_markdown(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let markdown = docs::generate_markdown_docs(&state.public_base_url);
    axum::response::Response::builder()
        .header("Content-Type", "text/markdown")
        .header(
            "Content-Disposition",
            "attachment; filename=\"API_DOCUMENTATION.md\"",
        )
        .body(axum::body::Body::from(markdown))
        .unwrap_or_else(|_| axum::response::Response::new(axum::body::Body::empty()))
}

/// Serves the main API documentation HTML page.
async fn api_documentation() -> impl IntoResponse {
    let html = docs::generate_documentation_html();
    axum::response::Html(html)
}
