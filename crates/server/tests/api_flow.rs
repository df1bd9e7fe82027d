use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use models::Role;
use server::routes::{build_cors, build_router};
use server::state::{Backends, ServerSettings, ServerState};
use service::identity::domain::NewAccount;
use service::identity::repository::mock::MockAccountRepository;
use service::identity::{IdentityProvider, TokenConfig, TokenIdentityProvider};
use service::repo::memory::MemoryStore;
use service::storage::ObjectBlobStore;

const BOUNDARY: &str = "bikeshop-test-boundary";

struct TestApp {
    router: Router,
    admin: String,
    worker: String,
}

async fn account(identity: &dyn IdentityProvider, email: &str, role: Role) -> String {
    identity
        .create_account(NewAccount { email: email.into(), password: "correct-horse".into(), display_name: email.into(), role: Some(role) })
        .await
        .unwrap();
    identity.sign_in(email, "correct-horse").await.unwrap().token
}

async fn spawn_app(settings: ServerSettings) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let identity: Arc<dyn IdentityProvider> = Arc::new(TokenIdentityProvider::new(
        Arc::new(MockAccountRepository::default()),
        TokenConfig {
            jwt_secret: "integration-secret-0123456789".into(),
            token_ttl: chrono::Duration::hours(1),
            hash_params: argon2::Params::new(1024, 1, 1, None).unwrap(),
        },
    ));
    let admin = account(identity.as_ref(), "owner@shop.test", Role::Admin).await;
    let worker = account(identity.as_ref(), "mechanic@shop.test", Role::Worker).await;

    let backends = Backends {
        bikes: store.clone(),
        sales: store.clone(),
        profiles: store,
        identity,
        blobs: Arc::new(ObjectBlobStore::in_memory("bikeshop-test", "https://cdn.shop.test")),
    };
    let router = build_router(ServerState::new(backends, settings), build_cors(&[]));
    TestApp { router, admin, worker }
}

impl TestApp {
    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, body)
    }

    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    async fn create_bike(&self, name: &str, purchase_price: f64) -> String {
        let (status, body) = self.call(Method::POST, "/api/bikes", Some(&self.worker), Some(bike_body(name, purchase_price))).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn sell(&self, bike_id: &str, sale_price: f64) -> (StatusCode, Value) {
        let uri = format!("/api/sales/bike/{bike_id}/sold");
        self.call(Method::POST, &uri, Some(&self.worker), Some(sale_body(sale_price))).await
    }
}

fn bike_body(name: &str, purchase_price: f64) -> Value {
    json!({
        "bikeName": name,
        "year": 2022,
        "registrationNumber": "KA05MN4321",
        "ownerPhone": "9876543210",
        "ownerAadhar": "123456789012",
        "ownerAddress": "7 Brigade Road, Bengaluru",
        "purchasePrice": purchase_price,
        "sellingPrice": purchase_price + 20000.0
    })
}

fn sale_body(sale_price: f64) -> Value {
    json!({
        "salePrice": sale_price,
        "customerName": "Anita Rao",
        "customerEmail": "anita@example.com",
        "customerPhone": "9123456780",
        "customerAadhar": "210987654321",
        "customerAddress": "22 Church Street, Bengaluru"
    })
}

fn multipart(category: &str, file_name: &str, mime: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 512);
    body.extend_from_slice(format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{category}\r\n").as_bytes());
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_root_and_unknown_routes() {
    let app = spawn_app(ServerSettings::default()).await;

    let resp = app.router.clone().oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(resp.headers()[header::X_FRAME_OPTIONS], "DENY");
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["status"], "OK");

    let (status, body) = app.call(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["bikes"], "/api/bikes");

    let (status, body) = app.call(Method::GET, "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Route not found"}));
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = spawn_app(ServerSettings::default()).await;

    let (status, body) = app.call(Method::GET, "/api/bikes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized: No token provided");

    let (status, body) = app.call(Method::GET, "/api/bikes", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized: Invalid token");

    let (status, _) = app.call(Method::GET, "/api/bikes", Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_reject_workers() {
    let app = spawn_app(ServerSettings::default()).await;

    for uri in ["/api/analytics/kpi", "/api/analytics/monthly-sales", "/api/users"] {
        let (status, body) = app.call(Method::GET, uri, Some(&app.worker), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "Forbidden: Insufficient permissions");
    }
    let (status, _) = app.call(Method::DELETE, "/api/sales/clear-all", Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.call(Method::GET, "/api/analytics/kpi", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn selling_a_bike_records_profit_once() {
    let app = spawn_app(ServerSettings::default()).await;
    let bike_id = app.create_bike("Royal Enfield Classic 350", 100_000.0).await;

    let (status, body) = app.sell(&bike_id, 125_000.0).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["profit"], 25_000.0);
    assert_eq!(body["data"]["bikeName"], "Royal Enfield Classic 350");

    let (status, body) = app.sell(&bike_id, 130_000.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Bike is already sold");

    let (_, body) = app.call(Method::GET, &format!("/api/bikes/{bike_id}"), Some(&app.worker), None).await;
    assert_eq!(body["data"]["status"], "sold");

    let (status, body) = app.call(Method::GET, &format!("/api/sales/bike/{bike_id}"), Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["salePrice"], 125_000.0);

    let (_, body) = app.call(Method::GET, "/api/bikes?status=available", Some(&app.worker), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn analytics_reflect_sales() {
    let app = spawn_app(ServerSettings::default()).await;
    let sold = app.create_bike("Honda Shine", 100_000.0).await;
    app.create_bike("Bajaj Pulsar", 80_000.0).await;
    app.sell(&sold, 125_000.0).await;

    let (status, body) = app.call(Method::GET, "/api/analytics/kpi", Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["totalProfit"], 25_000.0);
    assert_eq!(body["data"]["totalRevenue"], 125_000.0);
    assert_eq!(body["data"]["totalBikesSold"], 1);
    assert_eq!(body["data"]["totalBikesAvailable"], 1);

    let (status, body) = app.call(Method::GET, "/api/analytics/monthly-sales", Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let months = body["data"].as_array().unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0]["month"], "Jan");

    let (status, body) = app.call(Method::GET, "/api/analytics/kpi?month=12", Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "month must be an integer between 0 and 11");
}

#[tokio::test]
async fn deleting_a_bike_removes_its_sale() {
    let app = spawn_app(ServerSettings::default()).await;
    let bike_id = app.create_bike("TVS Apache", 90_000.0).await;
    app.sell(&bike_id, 95_000.0).await;

    let (status, body) = app.call(Method::DELETE, &format!("/api/bikes/{bike_id}"), Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bike and associated sales data deleted successfully");

    let (status, _) = app.call(Method::GET, &format!("/api/sales/bike/{bike_id}"), Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.call(Method::GET, "/api/sales", Some(&app.worker), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, body) = app.call(Method::GET, "/api/bikes/not-a-uuid", Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Bike not found");
}

#[tokio::test]
async fn clear_all_resets_sold_bikes() {
    let app = spawn_app(ServerSettings::default()).await;
    let first = app.create_bike("Yamaha FZ", 70_000.0).await;
    let second = app.create_bike("Hero Splendor", 50_000.0).await;
    app.sell(&first, 75_000.0).await;
    app.sell(&second, 52_000.0).await;

    let (status, body) = app.call(Method::DELETE, "/api/sales/clear-all", Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"salesDeleted": 2, "bikesReset": 2}));
    assert_eq!(body["message"], "Successfully cleared 2 sales records and reset 2 bikes to available status");

    let (_, body) = app.call(Method::GET, "/api/bikes?status=available", Some(&app.worker), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn bad_bodies_are_rejected() {
    let app = spawn_app(ServerSettings::default()).await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/bikes")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.worker))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"bikeName\": "))
        .unwrap();
    let (status, body) = app.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");

    let mut with_extra = bike_body("Suzuki Access", 60_000.0);
    with_extra["status"] = json!("sold");
    let (status, _) = app.call(Method::POST, "/api/bikes", Some(&app.worker), Some(with_extra)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut invalid = bike_body("Suzuki Access", 60_000.0);
    invalid["ownerAadhar"] = json!("1234");
    let (status, body) = app.call(Method::POST, "/api/bikes", Some(&app.worker), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["data"].as_array().unwrap().iter().any(|v| v["field"] == "ownerAadhar"));
}

#[tokio::test]
async fn uploads_enforce_size_and_store_images() {
    let app = spawn_app(ServerSettings::default()).await;

    let oversized = vec![7u8; 6 * 1024 * 1024];
    let (status, body) = app.send(upload_request(&app.worker, multipart("bike", "big.png", "image/png", &oversized))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File too large. Maximum size is 5MB");

    let (status, body) = app.send(upload_request(&app.worker, multipart("bike", "notes.txt", "text/plain", b"hello"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only image files are allowed");

    let (status, body) = app.send(upload_request(&app.worker, multipart("aadhar", "front side.png", "image/png", &[0x89, b'P', b'N', b'G']))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let key = body["data"]["fileName"].as_str().unwrap();
    assert!(key.starts_with("aadhars/"), "{key}");
    assert!(key.ends_with("_front_side.png"), "{key}");
    assert_eq!(body["data"]["downloadURL"], format!("https://cdn.shop.test/bikeshop-test/{key}"));
    assert_eq!(body["data"]["fileSize"], 4);
}

#[tokio::test]
async fn user_admin_lifecycle() {
    let app = spawn_app(ServerSettings::default()).await;
    let new_user = json!({"email": "helper@shop.test", "password": "s3cret-pass", "role": "worker", "displayName": "Helper"});

    let (status, body) = app.call(Method::POST, "/api/users", Some(&app.admin), Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["role"], "worker");

    let (status, _) = app.call(Method::POST, "/api/users", Some(&app.admin), Some(new_user)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/api/users/{id}");
    let (status, body) = app.call(Method::PUT, &uri, Some(&app.admin), Some(json!({"displayName": "Senior Helper", "role": "admin"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["displayName"], "Senior Helper");
    assert_eq!(body["data"]["role"], "admin");

    let (status, _) = app.call(Method::DELETE, &uri, Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.call(Method::GET, &uri, Some(&app.admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn login_sets_cookie_usable_as_credential() {
    let app = spawn_app(ServerSettings::default()).await;

    let (status, body) = app
        .call(Method::POST, "/api/auth/login", None, Some(json!({"email": "mechanic@shop.test", "password": "wrong-password"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"email": "Mechanic@Shop.test", "password": "correct-horse"}).to_string()))
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("auth_token="), "{cookie}");
    assert!(cookie.contains("HttpOnly"));

    let pair = cookie.split(';').next().unwrap().to_string();
    let req = Request::get("/api/bikes").header(header::COOKIE, pair).body(Body::empty()).unwrap();
    let (status, _) = app.send(req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn debug_routes_are_opt_in() {
    let app = spawn_app(ServerSettings::default()).await;
    let (status, _) = app.call(Method::GET, "/api/debug/user-role", Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let app = spawn_app(ServerSettings { enable_debug_routes: true, ..ServerSettings::default() }).await;
    let (status, body) = app.call(Method::GET, "/api/debug/user-role", Some(&app.worker), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tokenClaims"]["role"], "worker");
    assert_eq!(body["data"]["customClaims"]["role"], "worker");

    let (status, _) = app
        .call(Method::POST, "/api/debug/set-role", Some(&app.worker), Some(json!({"email": "mechanic@shop.test", "role": "admin"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
