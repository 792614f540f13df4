pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys, DEFAULT_TOKEN_TTL_SECS};
