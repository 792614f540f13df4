use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::auth::TokenKeys;
use crate::model::AuthUser;

/// Bearer-token guard.
///
/// Handlers that take an `AuthUser` only run for requests carrying a valid
/// `Authorization: Bearer <token>` header; everything else is a 401.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or_else(ApiError::unauthorized)?;
        let keys = Arc::<TokenKeys>::from_ref(state);

        keys.verify(token).map_err(|e| {
            log::debug!("Rejected bearer token: {}", e);
            ApiError::unauthorized()
        })
    }
}

/// Token part of an `Authorization: Bearer ...` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
