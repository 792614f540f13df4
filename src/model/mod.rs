pub mod common;
pub mod ensemble;
pub mod instrument;
pub mod post;
pub mod user;
pub mod user_context;
pub mod validation;

pub use common::*;
pub use ensemble::*;
pub use instrument::*;
pub use post::*;
pub use user::*;
pub use user_context::*;
pub use validation::*;
