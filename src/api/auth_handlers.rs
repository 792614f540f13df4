use axum::{extract::State, http::StatusCode, response::Json};

use crate::api::error::ApiResult;
use crate::api::handlers::AppState;
use crate::api::validation::ValidatedJson;
use crate::logic::AuthService;
use crate::model::{AccessToken, AuthUser, NewUser, SignIn, UserProfile};
use crate::store::traits::Store;

/// POST /auth/login
pub async fn login<S: Store>(
    State(state): State<AppState<S>>,
    ValidatedJson(credentials): ValidatedJson<SignIn>,
) -> ApiResult<Json<AccessToken>> {
    let token = AuthService::sign_in(&*state.store, &state.tokens, credentials).await?;
    Ok(Json(token))
}

/// POST /auth/signUp
pub async fn sign_up<S: Store>(
    State(state): State<AppState<S>>,
    ValidatedJson(new): ValidatedJson<NewUser>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = AuthService::sign_up(&*state.store, new).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /auth/profile
pub async fn profile<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(AuthService::profile(&*state.store, &auth).await?))
}
