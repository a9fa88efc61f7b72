//! HTTP API tests.
//!
//! Drives the full router in-process. Most scenarios run on the
//! document backend for speed; anything touching backend-specific
//! surface (readiness, activity routes) pins the backend explicitly.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use plaza_integration_tests::TestApp;

#[tokio::test]
async fn test_health_endpoints() {
    for app in TestApp::both().await {
        let (status, _) = app.get("/health", None).await;
        assert_eq!(status, StatusCode::OK, "backend {}", app.name);
        let (status, _) = app.get("/health/ready", None).await;
        assert_eq!(status, StatusCode::OK, "backend {}", app.name);
    }
}

#[tokio::test]
async fn test_signup_validates_and_rejects_duplicates() {
    let app = TestApp::document();

    let (status, body) = app
        .post(
            "/signup",
            None,
            json!({"username": "alice", "email": "alice@plaza.test", "password": "long enough password"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "consumer");
    assert!(body.get("password_hash").is_none());

    // Missing fields.
    let (status, body) = app
        .post("/signup", None, json!({"username": "bob"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing required fields.");

    // Duplicate username and email get field-specific messages.
    let (status, body) = app
        .post(
            "/signup",
            None,
            json!({"username": "alice", "email": "new@plaza.test", "password": "long enough password"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Username already taken.");

    let (status, body) = app
        .post(
            "/signup",
            None,
            json!({"username": "alice2", "email": "alice@plaza.test", "password": "long enough password"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered.");

    // Short password and unknown role.
    let (status, _) = app
        .post(
            "/signup",
            None,
            json!({"username": "carol", "email": "carol@plaza.test", "password": "short"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/signup",
            None,
            json!({"username": "mallory", "email": "m@plaza.test", "password": "long enough password", "role": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_and_refresh_flow() {
    let app = TestApp::document();
    app.signup_and_login("alice", "consumer").await;

    // Wrong password is a 401 that does not say which part was wrong.
    let (status, body) = app
        .post(
            "/token",
            None,
            json!({"username": "alice", "password": "wrong password entirely"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid credentials.");

    let (status, body) = app
        .post(
            "/token",
            None,
            json!({"username": "alice", "password": "a sufficiently long password"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().unwrap().to_owned();
    let refresh = body["refresh"].as_str().unwrap().to_owned();

    // The refresh token mints a new access token but cannot be used as
    // one directly.
    let (status, body) = app
        .post("/token/refresh", None, json!({"refresh": refresh}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].as_str().is_some());

    let (status, _) = app.get("/me", Some(&refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/me", Some(&access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, _) = app.get("/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

async fn seeded_catalog(app: &TestApp) -> (String, i64, i64) {
    let producer = app.signup_and_login("marta", "producer").await;

    let admin = app.admin_token("root").await;
    let (status, category) = app
        .post("/categories", Some(&admin), json!({"name": "Jewelry"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();

    let (status, product) = app
        .post(
            "/products",
            Some(&producer),
            json!({
                "name": "Silver Ring",
                "price": "55.00",
                "category_id": category_id,
                "stock_quantity": 10,
                "tags": ["silver", "ring"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    (producer, category_id, product["id"].as_i64().unwrap())
}

#[tokio::test]
async fn test_product_crud_authorization() {
    let app = TestApp::document();
    let (producer, category_id, product_id) = seeded_catalog(&app).await;

    // Consumers cannot create products.
    let consumer = app.signup_and_login("alice", "consumer").await;
    let (status, _) = app
        .post(
            "/products",
            Some(&consumer),
            json!({"name": "X", "price": "1.00", "category_id": category_id}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Another producer cannot touch someone else's product.
    let rival = app.signup_and_login("finn", "producer").await;
    let (status, _) = app
        .put(
            &format!("/products/{product_id}"),
            Some(&rival),
            json!({"price": "1.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .delete(&format!("/products/{product_id}"), Some(&rival))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner can update; reads are public.
    let (status, body) = app
        .put(
            &format!("/products/{product_id}"),
            Some(&producer),
            json!({"price": "60.00", "stock_quantity": 8}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "60.00");

    let (status, body) = app.get(&format!("/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Silver Ring");

    // Unknown category on create is a 404.
    let (status, body) = app
        .post(
            "/products",
            Some(&producer),
            json!({"name": "Lost", "price": "5.00", "category_id": 9999}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Category not found.");

    // Non-positive price is rejected up front.
    let (status, _) = app
        .post(
            "/products",
            Some(&producer),
            json!({"name": "Free", "price": "0", "category_id": category_id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_filter_endpoints() {
    let app = TestApp::document();
    let (_, _, _) = seeded_catalog(&app).await;

    let (status, body) = app.get("/products/search?q=ring", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app.get("/products/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Please provide a search query.");

    let (status, body) = app
        .get("/products/filter_by_category?category=jewel", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .get("/products/filter_by_category?category=garden", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Category not found.");

    let (status, body) = app.get("/products/filter_by_category", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Please provide a category name.");

    let (status, body) = app
        .get("/products/filter_by_price?min_price=50&max_price=60", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .get("/products/filter_by_price?min_price=abc", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid price range.");

    // An inverted range is not rejected; it just matches no products.
    let (status, body) = app
        .get("/products/filter_by_price?min_price=60&max_price=50", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = app
        .get("/products/filter_by_availability?available=TRUE", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app.get("/products/filter_by_availability", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Provide 'available' as true or false.");

    let (status, _) = app
        .get("/products/filter_by_availability?available=maybe", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_admin_crud_and_cascade() {
    let app = TestApp::document();
    let (_, category_id, product_id) = seeded_catalog(&app).await;
    let admin = app.admin_token("root2").await;

    // Writes are admin-only.
    let consumer = app.signup_and_login("alice", "consumer").await;
    let (status, _) = app
        .post("/categories", Some(&consumer), json!({"name": "Nope"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/categories/filter_by_name?name=jew", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app.get("/categories/filter_by_name", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Please provide a category name to filter.");

    // Cascade delete reports and removes the category's products.
    let (status, body) = app
        .delete(&format!("/categories/{category_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products_deleted"], 1);

    let (status, _) = app.get(&format!("/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_and_checkout_flow() {
    for app in TestApp::both().await {
        let (_, _, product_id) = seeded_catalog(&app).await;
        let alice = app.signup_and_login("alice", "consumer").await;

        // Checkout with an empty cart is a 400.
        let (status, body) = app.post("/orders/checkout", Some(&alice), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "backend {}", app.name);
        assert_eq!(body["detail"], "cart is empty");

        // Adding the same product twice merges the line.
        let (status, _) = app
            .post(
                "/cart/items",
                Some(&alice),
                json!({"product_id": product_id, "quantity": 2}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, item) = app
            .post("/cart/items", Some(&alice), json!({"product_id": product_id}))
            .await;
        assert_eq!(item["quantity"], 3, "backend {}", app.name);

        let (status, body) = app.get("/cart", Some(&alice)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, order) = app
            .post(
                "/orders/checkout",
                Some(&alice),
                json!({"address": "12 Plaza Way"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "backend {}", app.name);
        assert_eq!(order["status"], "pending");
        assert_eq!(order["total_price"], "165.00"); // 3 x 55.00
        let order_id = order["id"].as_i64().unwrap();

        // Cart consumed; order visible to its owner only.
        let (_, body) = app.get("/cart", Some(&alice)).await;
        assert!(body.as_array().unwrap().is_empty());

        let bob = app.signup_and_login("bob", "consumer").await;
        let (status, _) = app.get(&format!("/orders/{order_id}"), Some(&bob)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "backend {}", app.name);
        let (status, _) = app.get(&format!("/orders/{order_id}"), Some(&alice)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_cart_line_updates_and_clear() {
    let app = TestApp::document();
    let (_, _, product_id) = seeded_catalog(&app).await;
    let alice = app.signup_and_login("alice", "consumer").await;

    let (_, item) = app
        .post("/cart/items", Some(&alice), json!({"product_id": product_id}))
        .await;
    let line_id = item["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/cart/items/{line_id}"),
            Some(&alice),
            json!({"quantity": 4}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put(
            &format!("/cart/items/{line_id}"),
            Some(&alice),
            json!({"quantity": -1}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Quantity zero removes the line.
    let (status, _) = app
        .put(
            &format!("/cart/items/{line_id}"),
            Some(&alice),
            json!({"quantity": 0}),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app.get("/cart", Some(&alice)).await;
    assert!(body.as_array().unwrap().is_empty());

    // DELETE /cart empties whatever is left.
    app.post("/cart/items", Some(&alice), json!({"product_id": product_id}))
        .await;
    let (status, _) = app.delete("/cart", Some(&alice)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app.get("/cart", Some(&alice)).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_order_status_endpoints() {
    let app = TestApp::document();
    let (_, _, product_id) = seeded_catalog(&app).await;
    let alice = app.signup_and_login("alice", "consumer").await;
    let admin = app.admin_token("root3").await;

    app.post(
        "/cart/items",
        Some(&alice),
        json!({"product_id": product_id, "quantity": 1}),
    )
    .await;
    let (_, order) = app.post("/orders/checkout", Some(&alice), json!({})).await;
    let order_id = order["id"].as_i64().unwrap();

    // Only admins may drive the status.
    let (status, _) = app
        .post(
            &format!("/orders/{order_id}/status"),
            Some(&alice),
            json!({"status": "paid"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Skipping a step is a 409; an unknown value a 400.
    let (status, _) = app
        .post(
            &format!("/orders/{order_id}/status"),
            Some(&admin),
            json!({"status": "shipped"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app
        .post(
            &format!("/orders/{order_id}/status"),
            Some(&admin),
            json!({"status": "teleported"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            &format!("/orders/{order_id}/status"),
            Some(&admin),
            json!({"status": "paid"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paid");

    let (status, body) = app
        .post(
            &format!("/orders/{order_id}/payment_status"),
            Some(&admin),
            json!({"status": "paid"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_status"], "paid");

    // Owner cancellation works from paid, then is final.
    let (status, body) = app
        .post(&format!("/orders/{order_id}/cancel"), Some(&alice), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    let (status, _) = app
        .post(&format!("/orders/{order_id}/cancel"), Some(&alice), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_activity_routes_document_backend() {
    let app = TestApp::document();
    let (_, _, product_id) = seeded_catalog(&app).await;
    let alice = app.signup_and_login("alice", "consumer").await;

    // An authenticated product view lands in the browsing history.
    app.get(&format!("/products/{product_id}"), Some(&alice)).await;
    let (status, body) = app.get("/account/history", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Wishlist round trip; a second add does not duplicate.
    let (status, _) = app
        .post("/account/wishlist", Some(&alice), json!({"product_id": product_id}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app.post("/account/wishlist", Some(&alice), json!({"product_id": product_id}))
        .await;
    let (_, body) = app.get("/account/wishlist", Some(&alice)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (status, _) = app
        .delete(&format!("/account/wishlist/{product_id}"), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Checkout leaves a notification.
    app.post(
        "/cart/items",
        Some(&alice),
        json!({"product_id": product_id, "quantity": 1}),
    )
    .await;
    app.post("/orders/checkout", Some(&alice), json!({})).await;
    let (_, body) = app.get("/account/notifications", Some(&alice)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Category administration was audited; the log is admin-only.
    let admin = app.admin_token("root4").await;
    let (status, _) = app.get("/admin/logs", Some(&alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.get("/admin/logs", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());

    // Error log: admin-only read of recorded server errors.
    app.activity()
        .unwrap()
        .log_error("/products/1", "500 Internal Server Error")
        .await
        .unwrap();
    let (status, _) = app.get("/admin/errors", Some(&alice)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.get("/admin/errors", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["path"], "/products/1");
}

#[tokio::test]
async fn test_activity_routes_missing_on_relational() {
    let app = TestApp::relational().await;
    let alice = app.signup_and_login("alice", "consumer").await;

    for path in [
        "/account/history",
        "/account/wishlist",
        "/account/notifications",
    ] {
        let (status, _) = app.get(path, Some(&alice)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }
}
