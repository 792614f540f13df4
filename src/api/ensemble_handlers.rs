use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::api::error::ApiResult;
use crate::api::handlers::AppState;
use crate::api::validation::ValidatedJson;
use crate::logic::EnsembleService;
use crate::model::{
    AuthUser, EnsembleSearch, EnsembleUpdate, EnsembleView, MessageResponse, NewEnsemble,
};
use crate::store::traits::Store;

/// POST /ensembles
pub async fn create_ensemble<S: Store>(
    State(state): State<AppState<S>>,
    _auth: AuthUser,
    ValidatedJson(new): ValidatedJson<NewEnsemble>,
) -> ApiResult<(StatusCode, Json<EnsembleView>)> {
    let ensemble = EnsembleService::create(&*state.store, new).await?;
    Ok((StatusCode::CREATED, Json(ensemble)))
}

/// GET /ensembles
pub async fn list_ensembles<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<Vec<EnsembleView>>> {
    Ok(Json(EnsembleService::list(&*state.store).await?))
}

/// GET /ensembles/search?name=&genre=
pub async fn search_ensembles<S: Store>(
    State(state): State<AppState<S>>,
    Query(search): Query<EnsembleSearch>,
) -> ApiResult<Json<Vec<EnsembleView>>> {
    Ok(Json(EnsembleService::search(&*state.store, &search).await?))
}

/// GET /ensembles/myEnsembles
pub async fn my_ensembles<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<EnsembleView>>> {
    Ok(Json(EnsembleService::find_by_user(&*state.store, &auth).await?))
}

/// GET /ensembles/:id
pub async fn get_ensemble<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EnsembleView>> {
    Ok(Json(EnsembleService::find_one(&*state.store, &id).await?))
}

/// PATCH /ensembles/:id
pub async fn update_ensemble<S: Store>(
    State(state): State<AppState<S>>,
    _auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<EnsembleUpdate>,
) -> ApiResult<Json<EnsembleView>> {
    Ok(Json(EnsembleService::update(&*state.store, &id, update).await?))
}

/// DELETE /ensembles/:id
pub async fn delete_ensemble<S: Store>(
    State(state): State<AppState<S>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(EnsembleService::remove(&*state.store, &id).await?))
}

/// POST /ensembles/:id/users
pub async fn join_ensemble<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<EnsembleView>> {
    Ok(Json(EnsembleService::link_user(&*state.store, &id, &auth).await?))
}

/// DELETE /ensembles/:id/users
pub async fn leave_ensemble<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<EnsembleView>> {
    Ok(Json(EnsembleService::leave(&*state.store, &id, &auth).await?))
}
