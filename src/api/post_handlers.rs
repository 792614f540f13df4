use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::api::error::ApiResult;
use crate::api::handlers::AppState;
use crate::api::validation::ValidatedJson;
use crate::logic::PostService;
use crate::model::{AuthUser, MessageResponse, NewPost, PostSearch, PostUpdate, PostView};
use crate::store::traits::Store;

/// POST /posts
pub async fn create_post<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
    ValidatedJson(new): ValidatedJson<NewPost>,
) -> ApiResult<(StatusCode, Json<PostView>)> {
    let post = PostService::create(&*state.store, new, &auth).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts
pub async fn list_posts<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(PostService::list(&*state.store).await?))
}

/// GET /posts/search?title=&genre=
pub async fn search_posts<S: Store>(
    State(state): State<AppState<S>>,
    Query(search): Query<PostSearch>,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(PostService::search(&*state.store, &search).await?))
}

/// GET /posts/myPosts
pub async fn my_posts<S: Store>(
    State(state): State<AppState<S>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(PostService::find_by_user(&*state.store, &auth).await?))
}

/// GET /posts/user/:username
pub async fn posts_by_username<S: Store>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(PostService::find_by_username(&*state.store, &username).await?))
}

/// GET /posts/:id
pub async fn get_post<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostView>> {
    Ok(Json(PostService::find_one(&*state.store, &id).await?))
}

/// PATCH /posts/:id
pub async fn update_post<S: Store>(
    State(state): State<AppState<S>>,
    _auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(update): ValidatedJson<PostUpdate>,
) -> ApiResult<Json<PostView>> {
    Ok(Json(PostService::update(&*state.store, &id, update).await?))
}

/// DELETE /posts/:id
pub async fn delete_post<S: Store>(
    State(state): State<AppState<S>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(PostService::remove(&*state.store, &id).await?))
}
