use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use catalog_backend::api::{build_router, AppState};
use catalog_backend::database::sqlite::SqliteDatabase;
use catalog_backend::services::product_service::ProductService;
use catalog_backend::services::upload::UploadStorage;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "----catalog-test-boundary";

struct TestApp {
    app: Router,
    uploads_dir: PathBuf,
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let uploads_dir = dir.path().join("uploads");

    let db = Arc::new(
        SqliteDatabase::new(db_path.to_str().unwrap())
            .await
            .unwrap(),
    );
    let storage = UploadStorage::new(&uploads_dir).unwrap();
    let service = Arc::new(ProductService::new(db, storage));

    let state = AppState {
        service,
        uploads_dir: uploads_dir.clone(),
        public_base_url: "http://localhost:8080".to_string(),
        rate_limit_per_sec: 1_000_000,
    };

    TestApp {
        app: build_router(state),
        uploads_dir,
        _dir: dir,
    }
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn create_product(
    app: &Router,
    name: &str,
    category: &str,
    price: &str,
    file: Option<(&str, &str, &[u8])>,
) -> Value {
    let fields = [
        ("name", name),
        ("category", category),
        ("price", price),
        ("description", "test product"),
    ];
    let (status, body) = send(
        app,
        multipart_request("POST", "/api/products", multipart_body(&fields, file)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}

fn uploads_count(dir: &PathBuf) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let test = spawn_app().await;

    let fields = [
        ("name", "Widget"),
        ("category", "Electronics"),
        ("price", "19.99"),
        ("description", "A widget"),
    ];
    let (status, body) = send(
        &test.app,
        multipart_request("POST", "/api/products", multipart_body(&fields, None)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product created successfully");
    assert!(body["data"]["image"].is_null());

    let id = body["data"]["id"].as_str().unwrap();
    let (status, body) = send(&test.app, get_request(&format!("/api/products/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["category"], "Electronics");
    assert_eq!(body["data"]["price"].as_f64().unwrap(), 19.99);
    assert_eq!(body["data"]["description"], "A widget");
    assert!(body["data"]["createdAt"].is_string());
}

#[tokio::test]
async fn uploaded_image_is_stored_and_served() {
    let test = spawn_app().await;
    let image_bytes = b"fake png bytes";

    let data = create_product(
        &test.app,
        "Camera",
        "Electronics",
        "249.00",
        Some(("camera.png", "image/png", image_bytes)),
    )
    .await;

    let image_path = data["image"].as_str().unwrap();
    assert!(image_path.starts_with("/uploads/image-"));
    assert!(image_path.ends_with(".png"));
    assert_eq!(uploads_count(&test.uploads_dir), 1);

    let (status, served) = send_raw(&test.app, get_request(image_path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, image_bytes);
}

#[tokio::test]
async fn missing_required_field_discards_uploaded_file() {
    let test = spawn_app().await;

    // price is missing, but a file rides along
    let fields = [
        ("name", "Widget"),
        ("category", "Electronics"),
        ("description", "A widget"),
    ];
    let body = multipart_body(&fields, Some(("w.png", "image/png", b"png data")));
    let (status, response) = send(
        &test.app,
        multipart_request("POST", "/api/products", body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "Field 'price' is required");
    assert_eq!(uploads_count(&test.uploads_dir), 0);
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let test = spawn_app().await;

    let fields = [
        ("name", "Widget"),
        ("category", "Electronics"),
        ("price", "19.99"),
        ("description", "A widget"),
    ];
    let body = multipart_body(&fields, Some(("notes.txt", "text/plain", b"not an image")));
    let (status, response) = send(
        &test.app,
        multipart_request("POST", "/api/products", body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Only image files are allowed");
    assert_eq!(uploads_count(&test.uploads_dir), 0);
}

#[tokio::test]
async fn invalid_price_field_is_rejected() {
    let test = spawn_app().await;

    let fields = [
        ("name", "Widget"),
        ("category", "Electronics"),
        ("price", "cheap"),
        ("description", "A widget"),
    ];
    let (status, response) = send(
        &test.app,
        multipart_request("POST", "/api/products", multipart_body(&fields, None)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert!(response["message"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn update_replaces_previous_image_file() {
    let test = spawn_app().await;

    let data = create_product(
        &test.app,
        "Camera",
        "Electronics",
        "249.00",
        Some(("a.png", "image/png", b"file A")),
    )
    .await;
    let id = data["id"].as_str().unwrap().to_string();
    let old_image = data["image"].as_str().unwrap().to_string();
    assert_eq!(uploads_count(&test.uploads_dir), 1);

    let body = multipart_body(&[], Some(("b.jpg", "image/jpeg", b"file B")));
    let (status, response) = send(
        &test.app,
        multipart_request("PUT", &format!("/api/products/{}", id), body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let new_image = response["data"]["image"].as_str().unwrap();
    assert_ne!(new_image, old_image);
    assert!(new_image.ends_with(".jpg"));
    // other fields untouched by a file-only update
    assert_eq!(response["data"]["name"], "Camera");
    assert_eq!(response["data"]["price"].as_f64().unwrap(), 249.00);

    // exactly one file remains and the old one is gone
    assert_eq!(uploads_count(&test.uploads_dir), 1);
    let (status, _) = send_raw(&test.app, get_request(&old_image)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_without_file_keeps_existing_image() {
    let test = spawn_app().await;

    let data = create_product(
        &test.app,
        "Camera",
        "Electronics",
        "249.00",
        Some(("a.png", "image/png", b"file A")),
    )
    .await;
    let id = data["id"].as_str().unwrap().to_string();
    let image = data["image"].as_str().unwrap().to_string();

    let body = multipart_body(&[("price", "199.00")], None);
    let (status, response) = send(
        &test.app,
        multipart_request("PUT", &format!("/api/products/{}", id), body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["price"].as_f64().unwrap(), 199.00);
    assert_eq!(response["data"]["image"], image.as_str());
    assert_eq!(uploads_count(&test.uploads_dir), 1);
}

#[tokio::test]
async fn update_of_unknown_product_discards_uploaded_file() {
    let test = spawn_app().await;

    let body = multipart_body(
        &[("name", "Ghost")],
        Some(("g.png", "image/png", b"file G")),
    );
    let uri = format!("/api/products/{}", uuid::Uuid::new_v4());
    let (status, response) = send(&test.app, multipart_request("PUT", &uri, body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["success"], false);
    assert_eq!(uploads_count(&test.uploads_dir), 0);

    // a malformed id behaves the same as an unknown one
    let body = multipart_body(&[], Some(("g.png", "image/png", b"file G")));
    let (status, _) = send(
        &test.app,
        multipart_request("PUT", "/api/products/not-a-uuid", body),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(uploads_count(&test.uploads_dir), 0);
}

#[tokio::test]
async fn delete_removes_record_and_image_file() {
    let test = spawn_app().await;

    let data = create_product(
        &test.app,
        "Camera",
        "Electronics",
        "249.00",
        Some(("a.png", "image/png", b"file A")),
    )
    .await;
    let id = data["id"].as_str().unwrap().to_string();
    assert_eq!(uploads_count(&test.uploads_dir), 1);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/products/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, response) = send(&test.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Product deleted successfully");
    assert_eq!(uploads_count(&test.uploads_dir), 0);

    let (status, _) = send(&test.app, get_request(&format!("/api/products/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_absent_product_reports_not_found() {
    let test = spawn_app().await;

    for uri in [
        format!("/api/products/{}", uuid::Uuid::new_v4()),
        "/api/products/not-a-uuid".to_string(),
    ] {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, response) = send(&test.app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response["success"], false);
        assert_eq!(response["message"], "Product not found");
    }
}

#[tokio::test]
async fn listing_paginates_with_envelope() {
    let test = spawn_app().await;
    for name in ["One", "Two", "Three"] {
        create_product(&test.app, name, "Books", "10.00", None).await;
    }

    let (status, body) = send(&test.app, get_request("/api/products?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["pages"], 2);

    let (_, body) = send(&test.app, get_request("/api/products?limit=2&page=2")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["page"], 2);
}

#[tokio::test]
async fn listing_combines_category_and_price_filters() {
    let test = spawn_app().await;
    create_product(&test.app, "Laptop Stand", "Electronics", "30.00", None).await;
    create_product(&test.app, "Novel", "Books", "40.00", None).await;
    create_product(&test.app, "Chair", "Home & Garden", "45.00", None).await;
    create_product(&test.app, "Phone", "Electronics", "99.00", None).await;

    let (status, body) = send(
        &test.app,
        get_request("/api/products?minPrice=25&maxPrice=50&category=Electronics,Books"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    for product in data {
        let category = product["category"].as_str().unwrap();
        assert!(category == "Electronics" || category == "Books");
        let price = product["price"].as_f64().unwrap();
        assert!((25.0..=50.0).contains(&price));
    }
    assert_eq!(body["pagination"]["total"], 2);
}

#[tokio::test]
async fn listing_searches_name_and_description() {
    let test = spawn_app().await;
    create_product(&test.app, "Desk Lamp", "Home & Garden", "35.00", None).await;
    create_product(&test.app, "Novel", "Books", "12.00", None).await;

    let (_, body) = send(&test.app, get_request("/api/products?search=lamp")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Desk Lamp");

    // every seeded product has "test product" in its description
    let (_, body) = send(&test.app, get_request("/api/products?search=test")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn listing_sorts_newest_first() {
    let test = spawn_app().await;
    create_product(&test.app, "Older", "Books", "10.00", None).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    create_product(&test.app, "Newer", "Books", "10.00", None).await;

    let (_, body) = send(&test.app, get_request("/api/products")).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["name"], "Newer");
    assert_eq!(data[1]["name"], "Older");
}

#[tokio::test]
async fn malformed_filter_input_is_rejected() {
    let test = spawn_app().await;

    let (status, body) = send(&test.app, get_request("/api/products?minPrice=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&test.app, get_request("/api/products?page=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&test.app, get_request("/api/products?limit=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_catalog_lists_cleanly() {
    let test = spawn_app().await;

    let (status, body) = send(&test.app, get_request("/api/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["pages"], 0);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let test = spawn_app().await;
    let (status, body) = send_raw(&test.app, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
