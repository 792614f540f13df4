use crate::model::{generate_id, now, FieldOrder, Id, Instrument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered musician as persisted by the store
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Id,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub instruments: Vec<Instrument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(new: NewUser, password_hash: String) -> Self {
        let timestamp = now();
        Self {
            id: generate_id(),
            full_name: new.full_name,
            description: new.description,
            username: new.username.unwrap_or_default(),
            email: new.email.unwrap_or_default(),
            password_hash,
            instruments: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }

    pub fn find_instrument_mut(&mut self, instrument_id: &str) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.id == instrument_id)
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub username: String,
    pub email: String,
    #[serde(rename = "instrument")]
    pub instruments: Vec<Instrument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            description: user.description.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            instruments: user.instruments.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            description: user.description,
            username: user.username,
            email: user.email,
            instruments: user.instruments,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration request body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(
        required(message = "Field Required"),
        length(min = 3, message = "Username must be at least 3 characters long"),
        custom(function = "crate::model::validate_username_shape")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "Field Required"),
        email(message = "Please provide a valid email address")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Field Required"),
        length(min = 6, message = "Password must be at least 6 characters long")
    )]
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
}

impl FieldOrder for NewUser {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("username", "username"),
        ("email", "email"),
        ("password", "password"),
        ("full_name", "fullName"),
        ("description", "description"),
    ];
}

/// Partial profile update; absent fields are left untouched.
///
/// A password change needs `oldPassword` plus either `newPassword` or `password`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[validate(
        length(min = 3, message = "Username must be at least 3 characters long"),
        custom(function = "crate::model::validate_username_shape")
    )]
    pub username: Option<String>,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: Option<String>,
    pub old_password: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
}

impl FieldOrder for UserUpdate {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("username", "username"),
        ("email", "email"),
        ("password", "password"),
        ("new_password", "newPassword"),
        ("old_password", "oldPassword"),
        ("full_name", "fullName"),
        ("description", "description"),
    ];
}

impl UserUpdate {
    /// The requested replacement password, if any
    pub fn requested_password(&self) -> Option<&str> {
        self.new_password.as_deref().or(self.password.as_deref())
    }

    pub fn touches_password(&self) -> bool {
        self.requested_password().is_some() || self.old_password.is_some()
    }
}

/// Query string of `GET /users/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearch {
    pub username: Option<String>,
    pub instrument: Option<String>,
}

impl UserSearch {
    pub fn matches(&self, user: &User) -> bool {
        let username_ok = self
            .username
            .as_deref()
            .map_or(true, |needle| crate::model::contains_ignore_case(&user.username, needle));
        let instrument_ok = self
            .instrument
            .as_deref()
            .map_or(true, |needle| user.instruments.iter().any(|i| i.matches(needle)));
        username_ok && instrument_ok
    }
}
