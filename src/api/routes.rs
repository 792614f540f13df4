use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::api::{auth_handlers, ensemble_handlers, post_handlers, user_handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/auth/login", post(auth_handlers::login::<S>))
        .route("/auth/signUp", post(auth_handlers::sign_up::<S>))
        .route("/auth/profile", get(auth_handlers::profile::<S>))
        // Users
        .route(
            "/users",
            get(user_handlers::list_users::<S>)
                .post(user_handlers::create_user::<S>)
                .patch(user_handlers::update_user::<S>)
                .delete(user_handlers::delete_user::<S>),
        )
        .route("/users/search", get(user_handlers::search_users::<S>))
        .route(
            "/users/instruments",
            patch(user_handlers::add_instrument::<S>),
        )
        .route(
            "/users/instruments/:instrument_id",
            patch(user_handlers::update_instrument::<S>)
                .delete(user_handlers::remove_instrument::<S>),
        )
        .route("/users/:username", get(user_handlers::get_user::<S>))
        .route(
            "/users/:username/instruments",
            get(user_handlers::list_instruments::<S>),
        )
        // Ensembles
        .route(
            "/ensembles",
            get(ensemble_handlers::list_ensembles::<S>)
                .post(ensemble_handlers::create_ensemble::<S>),
        )
        .route(
            "/ensembles/search",
            get(ensemble_handlers::search_ensembles::<S>),
        )
        .route(
            "/ensembles/myEnsembles",
            get(ensemble_handlers::my_ensembles::<S>),
        )
        .route(
            "/ensembles/:id",
            get(ensemble_handlers::get_ensemble::<S>)
                .patch(ensemble_handlers::update_ensemble::<S>)
                .delete(ensemble_handlers::delete_ensemble::<S>),
        )
        .route(
            "/ensembles/:id/users",
            post(ensemble_handlers::join_ensemble::<S>)
                .delete(ensemble_handlers::leave_ensemble::<S>),
        )
        // Posts
        .route(
            "/posts",
            get(post_handlers::list_posts::<S>).post(post_handlers::create_post::<S>),
        )
        .route("/posts/search", get(post_handlers::search_posts::<S>))
        .route("/posts/myPosts", get(post_handlers::my_posts::<S>))
        .route(
            "/posts/user/:username",
            get(post_handlers::posts_by_username::<S>),
        )
        .route(
            "/posts/:id",
            get(post_handlers::get_post::<S>)
                .patch(post_handlers::update_post::<S>)
                .delete(post_handlers::delete_post::<S>),
        )
}

