pub mod auth_extractor;
pub mod auth_handlers;
pub mod ensemble_handlers;
pub mod error;
pub mod handlers;
pub mod post_handlers;
pub mod routes;
pub mod user_handlers;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use handlers::AppState;
pub use routes::create_router;
pub use validation::ValidatedJson;
