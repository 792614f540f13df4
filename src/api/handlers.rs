use axum::{extract::FromRef, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::TokenKeys;

/// Shared handler state: the store plus the token keys used by the bearer guard
pub struct AppState<S> {
    pub store: Arc<S>,
    pub tokens: Arc<TokenKeys>,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, tokens: Arc<TokenKeys>) -> Self {
        Self { store, tokens }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<S> FromRef<AppState<S>> for Arc<TokenKeys> {
    fn from_ref(state: &AppState<S>) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
