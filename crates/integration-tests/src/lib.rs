//! Integration test harness for Plaza.
//!
//! Spins up the full application router in-process, against either
//! storage backend, and drives it with `tower::ServiceExt::oneshot`.
//! No running server or external database is needed: the relational
//! backend uses an in-memory `SQLite` pool and the document backend is
//! in-process by construction.
//!
//! The store contract tests run the same scenarios against both
//! backends via [`TestApp::relational`] and [`TestApp::document`].

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use plaza_api::config::{ApiConfig, StoreBackend};
use plaza_api::db;
use plaza_api::docstore::DocumentStore;
use plaza_api::routes;
use plaza_api::state::{AppState, Stores};
use plaza_api::store::{ActivityStore, CartStore, CatalogStore, IdentityStore, OrderStore};

/// Test configuration; never loaded from the environment.
#[must_use]
pub fn test_config(backend: StoreBackend) -> ApiConfig {
    ApiConfig {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        backend,
        token_secret: SecretString::from("kJ8mQ2xR5tW9zA3cF6hN1pV4yB7eD0gS"),
        access_ttl: Duration::from_secs(900),
        refresh_ttl: Duration::from_secs(86_400),
        sentry_dsn: None,
        sentry_environment: "test".to_owned(),
    }
}

/// Store trait handles plus the app router over them.
pub struct TestApp {
    pub name: &'static str,
    pub stores: Stores,
    router: Router,
}

impl TestApp {
    /// An app over a fresh in-memory relational backend.
    pub async fn relational() -> Self {
        let pool = db::create_in_memory_pool()
            .await
            .expect("in-memory pool should initialize");
        let stores = Stores::relational(pool.clone());
        let state = AppState::new(
            test_config(StoreBackend::Relational),
            stores.clone(),
            Some(pool),
        );
        Self {
            name: "relational",
            stores,
            router: routes::app(state),
        }
    }

    /// An app over a fresh document backend.
    #[must_use]
    pub fn document() -> Self {
        let stores = Stores::document(Arc::new(DocumentStore::new()));
        let state = AppState::new(test_config(StoreBackend::Document), stores.clone(), None);
        Self {
            name: "document",
            stores,
            router: routes::app(state),
        }
    }

    /// Both backends, for contract tests.
    pub async fn both() -> Vec<Self> {
        vec![Self::relational().await, Self::document()]
    }

    /// Send a request; returns status and the parsed JSON body (null
    /// for empty bodies).
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should not fail");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", path, token, None).await
    }

    /// Sign up a user and return their access token.
    pub async fn signup_and_login(&self, username: &str, role: &str) -> String {
        let (status, _) = self
            .post(
                "/signup",
                None,
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@plaza.test"),
                    "password": "a sufficiently long password",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup for {username} failed");

        self.login(username).await
    }

    /// Log an existing user in and return their access token.
    pub async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/token",
                None,
                serde_json::json!({
                    "username": username,
                    "password": "a sufficiently long password",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login for {username} failed");
        body["access"].as_str().unwrap().to_owned()
    }

    /// An admin access token. Admin accounts cannot self-register, so
    /// this promotes a fresh user through the identity store.
    pub async fn admin_token(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/signup",
                None,
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@plaza.test"),
                    "password": "a sufficiently long password",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let id = plaza_core::UserId::new(body["id"].as_i64().unwrap());
        self.identity()
            .set_role(id, plaza_core::UserRole::Admin)
            .await
            .unwrap();

        self.login(username).await
    }

    #[must_use]
    pub fn identity(&self) -> &Arc<dyn IdentityStore> {
        &self.stores.identity
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogStore> {
        &self.stores.catalog
    }

    #[must_use]
    pub fn carts(&self) -> &Arc<dyn CartStore> {
        &self.stores.carts
    }

    #[must_use]
    pub fn orders(&self) -> &Arc<dyn OrderStore> {
        &self.stores.orders
    }

    #[must_use]
    pub fn activity(&self) -> Option<&Arc<dyn ActivityStore>> {
        self.stores.activity.as_ref()
    }
}
