use crate::model::{generate_id, FieldOrder, Id};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An instrument embedded in a user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

impl Instrument {
    pub fn new(name: String, genre: Vec<String>) -> Self {
        Self {
            id: generate_id(),
            name,
            genre,
        }
    }

    /// Apply a partial update; absent fields keep their current value
    pub fn apply(&mut self, update: InstrumentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
    }

    pub fn matches(&self, needle: &str) -> bool {
        crate::model::contains_ignore_case(&self.name, needle)
            || self
                .genre
                .iter()
                .any(|g| crate::model::contains_ignore_case(g, needle))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewInstrument {
    #[validate(
        required(message = "Field Required"),
        length(min = 1, message = "Field Required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Field Required"),
        length(min = 1, message = "Field Required")
    )]
    pub genre: Option<Vec<String>>,
}

impl FieldOrder for NewInstrument {
    const FIELDS: &'static [(&'static str, &'static str)] = &[("name", "name"), ("genre", "genre")];
}

impl From<NewInstrument> for Instrument {
    fn from(new: NewInstrument) -> Self {
        Instrument::new(new.name.unwrap_or_default(), new.genre.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InstrumentUpdate {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: Option<String>,
    pub genre: Option<Vec<String>>,
}

impl FieldOrder for InstrumentUpdate {
    const FIELDS: &'static [(&'static str, &'static str)] = &[("name", "name"), ("genre", "genre")];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_keeps_genre() {
        let mut violin = Instrument::new("Violin".to_string(), vec!["Classical".to_string()]);
        violin.apply(InstrumentUpdate {
            name: Some("Viola".to_string()),
            genre: None,
        });
        assert_eq!(violin.name, "Viola");
        assert_eq!(violin.genre, vec!["Classical".to_string()]);
    }

    #[test]
    fn test_new_instrument_requires_fields() {
        let missing = NewInstrument::default();
        let errors = missing.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("genre"));
    }

    #[test]
    fn test_new_instrument_rejects_empty_values() {
        let empty = NewInstrument {
            name: Some(String::new()),
            genre: Some(Vec::new()),
        };
        let errors = empty.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("genre"));
    }

    #[test]
    fn test_matches_name_or_genre() {
        let cello = Instrument::new("Cello".to_string(), vec!["Baroque".to_string()]);
        assert!(cello.matches("cel"));
        assert!(cello.matches("baroque"));
        assert!(!cello.matches("jazz"));
    }

    #[test]
    fn test_serializes_id_as_document_id() {
        let drums = Instrument::new("Drums".to_string(), vec![]);
        let json = serde_json::to_value(&drums).unwrap();
        assert_eq!(json["_id"], serde_json::Value::String(drums.id.clone()));
        assert_eq!(json["name"], "Drums");
    }
}
