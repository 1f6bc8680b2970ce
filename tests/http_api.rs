use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use catalog_db::MemoryStore;
use catalog_kernel::settings::Settings;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const UNKNOWN_ID: &str = "0190f5c2-8d1e-7c3a-9b7e-2f4a6c8e0a1b";

fn app() -> Router {
    let registry = catalog_app::build_registry(Arc::new(MemoryStore::new()));
    catalog_http::build_router(&registry, &Settings::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn catalog_scenario() {
    let app = app();

    let (status, publisher) =
        send_json(&app, Method::POST, "/v1/publishers", Some(json!({ "name": "Penguin" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(publisher["id"].is_string());
    assert!(publisher.get("_id").is_none());
    assert!(publisher.get("__v").is_none());
    assert_eq!(publisher["createdAt"], publisher["updatedAt"]);

    let (status, author) = send_json(
        &app,
        Method::POST,
        "/v1/authors",
        Some(json!({ "name": "George Orwell" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for name in ["Nineteen Eighty-Four", "Animal Farm"] {
        let (status, book) = send_json(
            &app,
            Method::POST,
            "/v1/books",
            Some(json!({
                "name": name,
                "publisher": publisher["id"],
                "author": author["id"],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(book["publisher"], publisher["id"]);
    }

    let (status, page) =
        send_json(&app, Method::GET, "/v1/books?sortBy=name:asc&limit=10&page=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalResults"], 2);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(page["limit"], 10);
    assert_eq!(page["page"], 1);
    assert_eq!(page["results"][0]["name"], "Animal Farm");
    assert_eq!(page["results"][1]["name"], "Nineteen Eighty-Four");

    let book_id = page["results"][0]["id"].as_str().unwrap().to_string();
    let (status, renamed) = send_json(
        &app,
        Method::PATCH,
        &format!("/v1/books/{book_id}"),
        Some(json!({ "name": "Animal Farm: A Fairy Story" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Animal Farm: A Fairy Story");
    assert_eq!(renamed["author"], author["id"]);

    let (status, body) = send(&app, Method::DELETE, &format!("/v1/books/{book_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (status, error) = send_json(&app, Method::GET, &format!("/v1/books/{book_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["code"], "not_found");
}

#[tokio::test]
async fn patch_unknown_publisher_is_not_found() {
    let app = app();
    let (status, error) = send_json(
        &app,
        Method::PATCH,
        &format!("/v1/publishers/{UNKNOWN_ID}"),
        Some(json!({ "name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["message"], "publisher not found");
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let app = app();
    let (status, error) = send_json(&app, Method::GET, "/v1/authors/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "bad_request");
}

#[tokio::test]
async fn incomplete_book_is_rejected() {
    let app = app();
    let (status, error) =
        send_json(&app, Method::POST, "/v1/books", Some(json!({ "name": "Orphan" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "validation_error");

    let (status, _) = send_json(&app, Method::GET, "/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let app = app();
    let (status, error) = send_json(&app, Method::GET, "/v1/publishers?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["details"][0]["field"], "limit");
}

#[tokio::test]
async fn names_are_trimmed() {
    let app = app();
    let (status, author) = send_json(
        &app,
        Method::POST,
        "/v1/authors",
        Some(json!({ "name": "  Ursula K. Le Guin \n" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(author["name"], "Ursula K. Le Guin");

    let (status, _) =
        send_json(&app, Method::POST, "/v1/authors", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_listing_has_no_pages() {
    let app = app();
    let (status, page) = send_json(&app, Method::GET, "/v1/authors?page=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["results"], json!([]));
    assert_eq!(page["totalResults"], 0);
    assert_eq!(page["totalPages"], 0);
    assert_eq!(page["page"], 3);
}

#[tokio::test]
async fn openapi_document_lists_collections() {
    let app = app();
    let (status, document) = send_json(&app, Method::GET, "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(document["paths"]["/v1/books"]["post"].is_object());
    assert!(document["paths"]["/v1/publishers/{id}"]["delete"].is_object());
    assert!(document["components"]["schemas"]["AuthorPage"].is_object());
}

#[test]
fn openapi_document_loads_into_swagger_model() {
    let registry = catalog_app::build_registry(Arc::new(MemoryStore::new()));
    let document = catalog_http::router::openapi_document(&registry);

    let parsed = serde_json::from_value::<utoipa::openapi::OpenApi>(document);
    assert!(parsed.is_ok(), "{:?}", parsed.err());
    let paths = parsed.unwrap().paths.paths;
    for path in ["/v1/books", "/v1/books/{id}", "/v1/authors", "/v1/publishers/{id}"] {
        assert!(paths.contains_key(path), "{path}");
    }
}
