mod common;

use axum::body::to_bytes;
use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use homly_backend::model::user::Role;

use common::{json_request, order_body, order_line, send, Harness, PASSWORD};

#[tokio::test]
async fn test_operational_routes() {
    let h = Harness::new();
    let router = h.router();

    let response = router.clone().oneshot(json_request("GET", "/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");

    let response = router.oneshot(json_request("GET", "/", None, None)).await.unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"API is running...");
}

#[tokio::test]
async fn test_register_sets_cookie_and_returns_profile() {
    let h = Harness::new();
    let body = json!({ "name": "Asha", "email": "asha@example.com", "password": PASSWORD });

    let response = h
        .router()
        .oneshot(json_request("POST", "/api/users/register", None, Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "asha@example.com");
    assert_eq!(body["data"]["role"], "customer");
    assert_eq!(body["data"]["_id"].as_str().unwrap().len(), 24);
    assert!(body["data"].get("passwordHash").is_none());
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_validates_input() {
    let h = Harness::new();
    let body = json!({ "name": "Asha", "email": "not-an-email", "password": "123" });
    let (status, _) = send(&h.router(), json_request("POST", "/api/users/register", None, Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failure_message() {
    let h = Harness::new();
    h.seed_user("Asha", "asha@example.com", Role::Customer, 0);
    let body = json!({ "email": "asha@example.com", "password": "nope-nope" });

    let (status, body) = send(&h.router(), json_request("POST", "/api/users/login", None, Some(body))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_auth_failures() {
    let h = Harness::new();
    let router = h.router();

    let (status, body) = send(&router, json_request("GET", "/api/users/profile", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, no token");

    let (status, body) = send(&router, json_request("GET", "/api/users/profile", Some("garbage"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, token failed");

    let ghost = h.seed_user("Ghost", "ghost@example.com", Role::Customer, 0);
    let token = h.token(&ghost);
    h.users.table.remove(&ghost.id.unwrap()).unwrap();
    let (status, body) = send(&router, json_request("GET", "/api/users/profile", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, user not found");
}

#[tokio::test]
async fn test_cookie_token_is_accepted() {
    let h = Harness::new();
    let user = h.seed_user("Asha", "asha@example.com", Role::Customer, 4);
    let mut request = json_request("GET", "/api/users/profile", None, None);
    request
        .headers_mut()
        .insert(header::COOKIE, format!("jwt={}", h.token(&user)).parse().unwrap());

    let (status, body) = send(&h.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["coins"], 4);
}

#[tokio::test]
async fn test_admin_routes_reject_customers() {
    let h = Harness::new();
    let customer = h.seed_user("Asha", "asha@example.com", Role::Customer, 0);
    let admin = h.seed_user("Admin", "admin@example.com", Role::Admin, 0);
    let router = h.router();

    let (status, body) = send(&router, json_request("GET", "/api/users", Some(&h.token(&customer)), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized as admin");

    let (status, body) = send(&router, json_request("GET", "/api/users", Some(&h.token(&admin)), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_product_visibility_and_paging() {
    let h = Harness::new();
    let admin = h.seed_user("Admin", "admin@example.com", Role::Admin, 0);
    h.seed_product("Rice", 60.0, false, None);
    let mut hidden = h.seed_product("Old Stock", 10.0, false, None);
    hidden.is_available = false;
    h.products.table.replace(&hidden.id.unwrap(), hidden.clone()).unwrap();
    let router = h.router();

    let (status, body) = send(&router, json_request("GET", "/api/products?limit=1", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["pages"], 1);
    assert_eq!(body["data"][0]["title"], "Rice");

    let uri = format!("/api/products/{}", hidden.id.unwrap().to_hex());
    let (status, body) = send(&router, json_request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, _) = send(&router, json_request("GET", &uri, Some(&h.token(&admin)), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, json_request("GET", "/api/products/123", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_product_image_responder() {
    let h = Harness::new();
    let mut inline = h.seed_product("Inline", 1.0, false, None);
    inline.image = "data:image/png;base64,aGVsbG8=".to_string();
    h.products.table.replace(&inline.id.unwrap(), inline.clone()).unwrap();
    let mut remote = h.seed_product("Remote", 1.0, false, None);
    remote.images = vec!["https://cdn.example.com/a.jpg".to_string()];
    h.products.table.replace(&remote.id.unwrap(), remote.clone()).unwrap();
    let bare = h.seed_product("Bare", 1.0, false, None);
    let router = h.router();

    let uri = format!("/api/products/{}/image", inline.id.unwrap().to_hex());
    let response = router.clone().oneshot(json_request("GET", &uri, None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"hello");

    let uri = format!("/api/products/{}/image", remote.id.unwrap().to_hex());
    let response = router.clone().oneshot(json_request("GET", &uri, None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "https://cdn.example.com/a.jpg");

    let uri = format!("/api/products/{}/image", bare.id.unwrap().to_hex());
    let (status, body) = send(&router, json_request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Image not found");
}

#[tokio::test]
async fn test_guest_checkout_and_customer_orders() {
    let h = Harness::new();
    let buyer = h.seed_user("Asha", "asha@example.com", Role::Customer, 1);
    let rice = h.seed_product("Rice", 60.0, false, None);
    let router = h.router();

    let (status, body) = send(
        &router,
        json_request("POST", "/api/orders", None, Some(order_body(vec![order_line(&rice, 1)], 60.0))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["shipping"], 20.0);
    assert!(body["data"]["user"].is_null());

    let token = h.token(&buyer);
    let (status, body) = send(
        &router,
        json_request("POST", "/api/orders", Some(&token), Some(order_body(vec![order_line(&rice, 2)], 120.0))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["shipping"], 0.0);
    assert_eq!(body["data"]["total"], 120.0);
    let order_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = send(&router, json_request("GET", "/api/orders", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["_id"], order_id.as_str());
    assert_eq!(body["data"][0]["customer"]["email"], "asha@example.com");

    let (status, _) = send(&router, json_request("GET", "/api/orders", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let uri = format!("/api/orders/{}", order_id);
    let (status, body) = send(&router, json_request("PUT", &uri, Some(&token), Some(json!({ "status": "Shipped" })))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only cancel your own orders");

    let (status, body) =
        send(&router, json_request("PUT", &uri, Some(&token), Some(json!({ "status": "Cancelled" })))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Cancelled");
    assert_eq!(h.user(&buyer.id.unwrap()).coins, 1);
}

#[tokio::test]
async fn test_empty_order_is_bad_request() {
    let h = Harness::new();
    let (status, body) = send(&h.router(), json_request("POST", "/api/orders", None, Some(json!({ "items": [] })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No order items");
}

#[tokio::test]
async fn test_settings_defaults_and_upsert() {
    let h = Harness::new();
    let admin = h.seed_user("Admin", "admin@example.com", Role::Admin, 0);
    let router = h.router();

    let (status, body) = send(&router, json_request("GET", "/api/settings/delivery_times", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], json!([]));

    let (status, body) = send(&router, json_request("GET", "/api/settings/unknown", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Setting not found");

    let token = h.token(&admin);
    let (status, body) =
        send(&router, json_request("PUT", "/api/settings/delivery_times", Some(&token), Some(json!({})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Value is required");

    let slots = json!({ "value": ["09:00", "09:30"] });
    let (status, _) = send(&router, json_request("PUT", "/api/settings/delivery_times", Some(&token), Some(slots))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, json_request("GET", "/api/settings/delivery_times", None, None)).await;
    assert_eq!(body["data"]["value"], json!(["09:00", "09:30"]));
}

#[tokio::test]
async fn test_maintenance_mode_blocks_checkout() {
    let h = Harness::new();
    h.set_setting("maintenance_mode", bson::Bson::Boolean(true));
    let rice = h.seed_product("Rice", 60.0, false, None);

    let (status, body) = send(
        &h.router(),
        json_request("POST", "/api/orders", None, Some(order_body(vec![order_line(&rice, 1)], 60.0))),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Store is under maintenance");
}

#[tokio::test]
async fn test_cart_validation_drops_unknown_products() {
    let h = Harness::new();
    let rice = h.seed_product("Rice", 60.0, false, None);
    let missing = bson::oid::ObjectId::new().to_hex();
    let rice_id = rice.id.unwrap().to_hex();
    let body = json!({ "items": [
        { "id": rice_id, "quantity": 2 },
        { "id": missing, "quantity": 1 },
        { "id": rice_id, "quantity": 1 }
    ] });

    let (status, body) = send(&h.router(), json_request("POST", "/api/cart/validate", None, Some(body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 3);
    assert_eq!(body["data"]["total"], 180.0);
    assert_eq!(body["data"]["items"][0]["title"], "Rice");
    assert_eq!(body["data"]["removed"][0]["id"], missing.as_str());
    assert_eq!(body["data"]["removed"][0]["reason"], "product_missing");
}

#[tokio::test]
async fn test_cart_validation_rejects_oversized_quantity() {
    let h = Harness::new();
    let rice = h.seed_product("Rice", 60.0, false, None);
    let body = json!({ "items": [{ "id": rice.id.unwrap().to_hex(), "quantity": 4294967295u32 }] });

    let (status, body) = send(&h.router(), json_request("POST", "/api/cart/validate", None, Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error");
}

#[tokio::test]
async fn test_service_request_flow() {
    let h = Harness::new();
    let customer = h.seed_user("Asha", "asha@example.com", Role::Customer, 0);
    let admin = h.seed_user("Admin", "admin@example.com", Role::Admin, 0);
    let router = h.router();
    let admin_token = h.token(&admin);
    let token = h.token(&customer);

    let (status, body) = send(
        &router,
        json_request("POST", "/api/services", Some(&admin_token), Some(json!({ "name": "Plumber" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let service_id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) =
        send(&router, json_request("POST", "/api/serviceRequests", Some(&token), Some(json!({})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Service ID is required");

    let unknown = json!({ "serviceId": bson::oid::ObjectId::new().to_hex() });
    let (status, body) = send(&router, json_request("POST", "/api/serviceRequests", Some(&token), Some(unknown))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Service not found");

    let (status, body) = send(
        &router,
        json_request("POST", "/api/serviceRequests", Some(&token), Some(json!({ "serviceId": service_id }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(body["data"]["user"]["email"], "asha@example.com");
    assert_eq!(body["data"]["service"]["name"], "Plumber");
    assert_eq!(h.notifier.service_requests.lock().unwrap().len(), 1);
    let request_id = body["data"]["_id"].as_str().unwrap().to_string();

    let uri = format!("/api/serviceRequests/{}", request_id);
    let (status, body) =
        send(&router, json_request("PUT", &uri, Some(&admin_token), Some(json!({ "status": "In Progress" })))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "In Progress");

    let (status, body) = send(&router, json_request("DELETE", &uri, Some(&admin_token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Service Request removed");
}

#[tokio::test]
async fn test_writes_publish_change_events() {
    let h = Harness::new();
    let mut events = h.feed.subscribe();
    let body = json!({ "name": "Asha", "email": "asha@example.com", "password": PASSWORD });

    let (status, _) = send(&h.router(), json_request("POST", "/api/users/register", None, Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);

    let event = events.try_recv().unwrap();
    assert_eq!(event.resource, "users");
    assert_eq!(event.method, "POST");

    let login = json!({ "email": "asha@example.com", "password": PASSWORD });
    let (status, _) = send(&h.router(), json_request("POST", "/api/users/login", None, Some(login))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        send(&h.router(), json_request("POST", "/api/cart/validate", None, Some(json!({ "items": [] })))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(events.try_recv().is_err());

    let (status, _) = send(&h.router(), json_request("POST", "/api/orders", None, Some(json!({ "items": [] })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_upload_signature_requires_login() {
    let h = Harness::new();
    let user = h.seed_user("Asha", "asha@example.com", Role::Customer, 0);
    let router = h.router();

    let (status, _) = send(&router, json_request("GET", "/api/upload/signature", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&router, json_request("GET", "/api/upload/signature", Some(&h.token(&user)), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signatureAlgorithm"], "sha256");
    assert_eq!(body["folder"], "homly_products");
    assert_eq!(body["signature"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_category_duplicates_rejected() {
    let h = Harness::new();
    let admin = h.seed_user("Admin", "admin@example.com", Role::Admin, 0);
    let router = h.router();
    let token = h.token(&admin);

    let (status, _) =
        send(&router, json_request("POST", "/api/categories", Some(&token), Some(json!({ "name": "Grocery" })))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) =
        send(&router, json_request("POST", "/api/categories", Some(&token), Some(json!({ "name": "Grocery" })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category already exists");

    let (status, body) = send(&router, json_request("GET", "/api/categories", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_news_views_increment() {
    let h = Harness::new();
    let admin = h.seed_user("Admin", "admin@example.com", Role::Admin, 0);
    let router = h.router();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/news",
            Some(&h.token(&admin)),
            Some(json!({ "title": "Mango season", "content": "Fresh arrivals", "category": "Market" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/news/{}", body["data"]["_id"].as_str().unwrap());

    send(&router, json_request("GET", &uri, None, None)).await;
    let (status, body) = send(&router, json_request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["views"], 2);
    assert_eq!(body["data"]["author"], "Admin");
}
