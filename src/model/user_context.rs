use crate::model::{FieldOrder, Id};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identity of the caller, taken from a verified bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Id,
    pub username: String,
}

impl AuthUser {
    pub fn new(user_id: Id, username: String) -> Self {
        Self { user_id, username }
    }
}

/// Login request body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignIn {
    #[validate(
        required(message = "Field Required"),
        length(min = 1, message = "Field Required")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Field Required"),
        length(min = 1, message = "Field Required")
    )]
    pub password: Option<String>,
}

impl FieldOrder for SignIn {
    const FIELDS: &'static [(&'static str, &'static str)] =
        &[("username", "username"), ("password", "password")];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// Body of the delete endpoints that answer with a confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
