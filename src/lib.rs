pub mod api;
pub mod auth;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{create_router, AppState};
use crate::auth::TokenKeys;
use crate::config::{AppConfig, StorageBackend};
use crate::store::{MemoryStore, PostgresStore, Store};

// Export API types
pub use api::{handlers, routes};

// Export all model types
pub use model::*;


/// Assemble the router over `store`, ready to be served
pub fn build_app<S: Store + 'static>(store: Arc<S>, tokens: Arc<TokenKeys>) -> Router {
    create_router().with_state(AppState::new(store, tokens))
}

fn cors_layer(config: &AppConfig) -> anyhow::Result<Option<CorsLayer>> {
    let Some(origin) = config.cors.allowed_origin.as_deref() else {
        return Ok(None);
    };

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let layer = if origin == "*" {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origin.parse::<HeaderValue>()?)
    };
    Ok(Some(layer))
}

/// Load configuration, open the configured store and serve until shutdown
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{} storage={:?}",
        config.server.host,
        config.server.port,
        config.storage.backend
    );

    let tokens = Arc::new(TokenKeys::new(
        &config.jwt_secret()?,
        config.auth.token_ttl_secs,
    )?);
    let load_seed = std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true";

    let mut app = match config.storage.backend {
        StorageBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store =
                PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            let store = Arc::new(postgres_store);
            if load_seed {
                seed::load_seed_data(&*store).await?;
            }
            build_app(store, tokens)
        }
        StorageBackend::Memory => {
            log::warn!("Using the in-memory store, data is lost on shutdown");
            let store = Arc::new(MemoryStore::new());
            if load_seed {
                seed::load_seed_data(&*store).await?;
            }
            build_app(store, tokens)
        }
    };

    if let Some(cors) = cors_layer(&config)? {
        app = app.layer(cors);
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Bandstand server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_disabled_without_origin() {
        let config = AppConfig::default();
        assert!(cors_layer(&config).unwrap().is_none());
    }

    #[test]
    fn test_cors_rejects_invalid_origin() {
        let mut config = AppConfig::default();
        config.cors.allowed_origin = Some("http://bad\norigin".to_string());
        assert!(cors_layer(&config).is_err());

        config.cors.allowed_origin = Some("http://localhost:5173".to_string());
        assert!(cors_layer(&config).unwrap().is_some());
    }
}
