//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ApiConfig;
use crate::db::RelationalStore;
use crate::docstore::DocumentStore;
use crate::services::auth::{AuthService, TokenIssuer};
use crate::store::{ActivityStore, CartStore, CatalogStore, IdentityStore, OrderStore};

/// Trait-object handles to the active storage backend.
///
/// Built once at startup from whichever backend configuration selects;
/// handlers never see the concrete store type. `activity` is `None` on
/// the relational backend, which has no activity collections.
#[derive(Clone)]
pub struct Stores {
    pub identity: Arc<dyn IdentityStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub carts: Arc<dyn CartStore>,
    pub orders: Arc<dyn OrderStore>,
    pub activity: Option<Arc<dyn ActivityStore>>,
}

impl Stores {
    /// Wire every store handle to the relational backend.
    #[must_use]
    pub fn relational(pool: SqlitePool) -> Self {
        let store = Arc::new(RelationalStore::new(pool));
        Self {
            identity: store.clone(),
            catalog: store.clone(),
            carts: store.clone(),
            orders: store,
            activity: None,
        }
    }

    /// Wire every store handle to the document backend.
    #[must_use]
    pub fn document(store: Arc<DocumentStore>) -> Self {
        Self {
            identity: store.clone(),
            catalog: store.clone(),
            carts: store.clone(),
            orders: store.clone(),
            activity: Some(store),
        }
    }
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    stores: Stores,
    tokens: Arc<TokenIssuer>,
    auth: AuthService,
    pool: Option<SqlitePool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `pool` is the relational pool when that backend is active, for
    /// readiness checks; `None` for the document backend.
    #[must_use]
    pub fn new(config: ApiConfig, stores: Stores, pool: Option<SqlitePool>) -> Self {
        let tokens = Arc::new(TokenIssuer::new(
            &config.token_secret,
            config.access_ttl,
            config.refresh_ttl,
        ));
        let auth = AuthService::new(stores.identity.clone(), tokens.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                tokens,
                auth,
                pool,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the active store handles.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get the token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Get the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get the relational pool, if that backend is active.
    #[must_use]
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.inner.pool.as_ref()
    }
}
