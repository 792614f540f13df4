use serde::Serialize;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Usernames that collide with static `/users/...` routes
pub const RESERVED_USERNAMES: &[&str] = &["search", "instruments"];

/// Declared order and wire names of a request type's validated fields.
///
/// `validator` reports errors keyed by Rust field name in a hash map; this
/// table restores the order fields are declared in and maps each one to
/// the JSON spelling clients send.
pub trait FieldOrder {
    /// `(rust_field, json_field)` pairs in declaration order
    const FIELDS: &'static [(&'static str, &'static str)];
}

/// One entry of a 400 response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten `validator` output into field/message pairs.
///
/// Messages for the same field are joined with ", ". Fields listed in
/// `T::FIELDS` come first in that order; anything else follows sorted by name.
pub fn collect_field_errors<T: FieldOrder>(errors: &ValidationErrors) -> Vec<FieldError> {
    let field_errors = errors.field_errors();

    let mut entries: Vec<(usize, String, FieldError)> = field_errors
        .iter()
        .map(|(field, errs)| {
            let rust_name = field.to_string();
            let position = T::FIELDS.iter().position(|(name, _)| *name == rust_name);
            let wire_name = position
                .map(|i| T::FIELDS[i].1.to_string())
                .unwrap_or_else(|| rust_name.clone());
            let message = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>()
                .join(", ");

            (
                position.unwrap_or(usize::MAX),
                rust_name,
                FieldError {
                    field: wire_name,
                    message,
                },
            )
        })
        .collect();

    entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    entries.into_iter().map(|(_, _, error)| error).collect()
}

/// Username rules `length` can't express: blank and route-reserved names.
pub fn validate_username_shape(username: &str) -> Result<(), ValidationError> {
    let (code, message) = if username.is_empty() {
        ("required", "Field Required")
    } else if RESERVED_USERNAMES.contains(&username) {
        ("reserved", "This username is reserved")
    } else {
        return Ok(());
    };

    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    Err(error)
}
