// Integration tests for `ApiClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use venntry_api::{
    ApiClient, Error, ImageFile, InventoryRequest, LoginRequest, ProductRequest, RegisterRequest,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base);
    (server, client)
}

fn token(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

// ── Credential handling ─────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_attached_when_credential_set() {
    let (server, client) = setup().await;
    let inv = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/inventories/{inv}/products")))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.set_credential(Some(token("tok-1")));
    let products = client.list_products(&inv).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_no_authorization_header_without_credential() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/inventories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.list_inventories().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_check_token_uses_explicit_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/check-token"))
        .and(header("authorization", "Bearer candidate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "expired": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_credential(Some(token("installed")));
    let status = client.check_token(&token("candidate")).await.unwrap();
    assert!(status.expired);
}

// ── Happy paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_decodes_response() {
    let (server, client) = setup().await;
    let user_id = Uuid::new_v4();
    let inv_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": user_id,
            "userName": "ada",
            "email": "ada@example.com",
            "avatar": null,
            "token": "jwt",
            "inventories": [{ "id": inv_id, "name": "Main", "userId": user_id }]
        })))
        .mount(&server)
        .await;

    let resp = client
        .login(&LoginRequest {
            email: "ada@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();

    assert_eq!(resp.user_id, user_id);
    assert_eq!(resp.user_name, "ada");
    assert_eq!(resp.token.expose_secret(), "jwt");
    assert_eq!(resp.inventories.len(), 1);
    assert_eq!(resp.inventories[0].id, inv_id);
    // Login never installs the token by itself.
    assert!(!client.has_credential());
}

#[tokio::test]
async fn test_create_product_posts_camel_case_body() {
    let (server, client) = setup().await;
    let inv = Uuid::new_v4();
    let product_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(format!("/api/inventories/{inv}/products")))
        .and(body_string_contains("\"restockLevel\":2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": product_id,
            "name": "Widget",
            "sku": "W-1",
            "quantity": 5,
            "restockLevel": 2,
            "optimalLevel": 0,
            "cost": 1.0,
            "price": 2.5,
            "images": [],
            "categories": [],
            "warehouses": []
        })))
        .mount(&server)
        .await;

    let req = ProductRequest {
        name: "Widget".into(),
        sku: "W-1".into(),
        quantity: 5,
        restock_level: 2,
        cost: 1.0,
        price: 2.5,
        ..ProductRequest::default()
    };
    let product = client.create_product(&inv, &req).await.unwrap();
    assert_eq!(product.id, product_id);
    assert!((product.price - 2.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_delete_with_empty_body_is_null() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/api/warehouses/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client.delete_warehouse(&id).await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn test_raw_request_passes_body_through() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("PUT"))
        .and(path(format!("/api/inventories/{id}")))
        .and(body_json(json!({ "name": "Renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let body = serde_json::to_value(InventoryRequest {
        name: "Renamed".into(),
    })
    .unwrap();
    let raw = client
        .request(Method::PUT, &format!("/inventories/{id}"), Some(&body))
        .await
        .unwrap();
    assert_eq!(raw.status.as_u16(), 200);
    assert_eq!(raw.json::<serde_json::Value>().unwrap(), json!({ "ok": true }));
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_structured_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "type": "CONFLICT",
            "message": "Email already registered",
            "code": 409
        })))
        .mount(&server)
        .await;

    let err = client
        .register(&RegisterRequest {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap_err();

    match err {
        Error::Http {
            status,
            kind,
            message,
            ..
        } => {
            assert_eq!(status, 409);
            assert_eq!(kind.as_deref(), Some("CONFLICT"));
            assert_eq!(message, "Email already registered");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_error_is_classified() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/inventories"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "VALIDATION_ERROR",
            "message": "name is required",
            "code": 400
        })))
        .mount(&server)
        .await;

    let err = client
        .create_inventory(&InventoryRequest::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.api_error_kind(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_unstructured_error_uses_status_message() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/products/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client.get_product(&id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "HTTP 404: Request failed with status 404 Not Found"
    );
}

#[tokio::test]
async fn test_network_error_has_no_status() {
    // Port 9 (discard) is not listening in the test environment.
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9/api").unwrap(),
    );
    let err = client.list_inventories().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_malformed_success_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/inventories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_inventories().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { ref body, .. } if body == "not json"));
}

// ── Uploads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_image_sends_file_field() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"file\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://cdn.example.com/abc.png",
            "fileKey": "abc.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let upload_url = Url::parse(&format!("{}/upload", server.uri())).unwrap();
    let file = ImageFile::new("abc.png", "image/png", vec![1, 2, 3, 4]);
    let uploaded = client.upload_image(&upload_url, file).await.unwrap();

    assert_eq!(uploaded.file_key, "abc.png");
    assert_eq!(uploaded.url, "https://cdn.example.com/abc.png");
}

#[tokio::test]
async fn test_upload_rejection_surfaces_error_field() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Upload failed" })),
        )
        .mount(&server)
        .await;

    let upload_url = Url::parse(&format!("{}/upload", server.uri())).unwrap();
    let file = ImageFile::new("abc.gif", "image/gif", vec![1]);
    let err = client.upload_image(&upload_url, file).await.unwrap_err();
    assert!(err.to_string().contains("Upload failed"));
}

#[tokio::test]
async fn test_invalid_upload_makes_no_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let upload_url = Url::parse(&format!("{}/upload", server.uri())).unwrap();
    let file = ImageFile::new("notes.txt", "text/plain", vec![1]);
    let err = client.upload_image(&upload_url, file).await.unwrap_err();
    assert!(matches!(err, Error::InvalidUpload { .. }));
}
