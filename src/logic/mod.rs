pub mod auth;
pub mod ensembles;
pub mod error;
pub mod posts;
pub mod users;

pub use auth::AuthService;
pub use ensembles::EnsembleService;
pub use error::{ServiceError, ServiceResult};
pub use posts::PostService;
pub use users::UserService;
