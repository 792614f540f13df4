use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::api::error::ApiResult;
use crate::api::handlers::AppState;
use crate::api::validation::ValidatedJson;
use crate::logic::UserService;
use crate::model::{
    AuthUser, Instrument, InstrumentUpdate, NewInstrument, NewUser, UserProfile, UserSearch,
    UserUpdate,
};
use crate::store::traits::Store;

/// POST /users
pub async fn create_user<S: Store>(
    State(state): State<AppState<S>>,
    ValidatedJson(new): ValidatedJson<NewUser>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile = UserService::create_user(&*state.store, new).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /users
pub async fn list_users<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(UserService::list_users(&*state.store).await?))
}

/// GET /users/search?username=&instrument=
pub async fn search_users<S: Store>(
    State(state): State<AppState<S>>,
    Query(search): Query<UserSearch>,
) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(UserService::search_users(&*state.store, &search).await?))
}

/// GET /users/:username
pub async fn get_user<S: Store>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(UserService::get_profile(&*state.store, &username).await?))
}

/// PATCH /users
pub async fn update_user<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    ValidatedJson(update): ValidatedJson<UserUpdate>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(UserService::update_user(&*state.store, &auth, update).await?))
}

/// DELETE /users
pub async fn delete_user<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> ApiResult<StatusCode> {
    UserService::remove_user(&*state.store, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/:username/instruments
pub async fn list_instruments<S: Store>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<Instrument>>> {
    Ok(Json(UserService::list_instruments(&*state.store, &username).await?))
}

/// PATCH /users/instruments
pub async fn add_instrument<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    ValidatedJson(new): ValidatedJson<NewInstrument>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(UserService::add_instrument(&*state.store, &auth, new).await?))
}

/// PATCH /users/instruments/:instrument_id
pub async fn update_instrument<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(instrument_id): Path<String>,
    ValidatedJson(update): ValidatedJson<InstrumentUpdate>,
) -> ApiResult<Json<UserProfile>> {
    let profile =
        UserService::update_instrument(&*state.store, &auth, &instrument_id, update).await?;
    Ok(Json(profile))
}

/// DELETE /users/instruments/:instrument_id
pub async fn remove_instrument<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(instrument_id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::remove_instrument(&*state.store, &auth, &instrument_id).await?;
    Ok(Json(profile))
}
