use crate::model::{contains_ignore_case, generate_id, now, FieldOrder, Id, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A named group of musicians
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub genre: Vec<String>,
    /// Member user ids, each at most once
    pub users: Vec<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ensemble {
    pub fn new(new: NewEnsemble) -> Self {
        let timestamp = now();
        Self {
            id: generate_id(),
            name: new.name.unwrap_or_default(),
            description: new.description,
            genre: new.genre.unwrap_or_default(),
            users: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.users.iter().any(|id| id == user_id)
    }

    pub fn apply(&mut self, update: EnsembleUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
        self.updated_at = now();
    }
}

/// Ensemble with its member ids resolved to profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleView {
    #[serde(rename = "_id")]
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub users: Vec<UserProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnsembleView {
    pub fn new(ensemble: Ensemble, users: Vec<UserProfile>) -> Self {
        Self {
            id: ensemble.id,
            name: ensemble.name,
            description: ensemble.description,
            genre: ensemble.genre,
            users,
            created_at: ensemble.created_at,
            updated_at: ensemble.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewEnsemble {
    #[validate(
        required(message = "name should not be empty"),
        length(min = 1, message = "name should not be empty")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
}

impl FieldOrder for NewEnsemble {
    const FIELDS: &'static [(&'static str, &'static str)] =
        &[("name", "name"), ("description", "description"), ("genre", "genre")];
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EnsembleUpdate {
    #[validate(length(min = 1, message = "name should not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
}

impl FieldOrder for EnsembleUpdate {
    const FIELDS: &'static [(&'static str, &'static str)] =
        &[("name", "name"), ("description", "description"), ("genre", "genre")];
}

/// Query string of `GET /ensembles/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnsembleSearch {
    pub name: Option<String>,
    pub genre: Option<String>,
}

impl EnsembleSearch {
    pub fn matches(&self, ensemble: &Ensemble) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |needle| contains_ignore_case(&ensemble.name, needle));
        let genre_ok = self.genre.as_deref().map_or(true, |needle| {
            ensemble.genre.iter().any(|g| contains_ignore_case(g, needle))
        });
        name_ok && genre_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quartet() -> Ensemble {
        Ensemble::new(NewEnsemble {
            name: Some("Aurora String Quartet".to_string()),
            description: Some("Chamber music".to_string()),
            genre: Some(vec!["Classical".to_string(), "Contemporary".to_string()]),
        })
    }

    #[test]
    fn test_new_ensemble_has_no_members() {
        let ensemble = quartet();
        assert!(ensemble.users.is_empty());
        assert!(!ensemble.has_member("anyone"));
    }

    #[test]
    fn test_apply_only_changes_given_fields() {
        let mut ensemble = quartet();
        ensemble.apply(EnsembleUpdate {
            description: Some("Updated".to_string()),
            ..Default::default()
        });
        assert_eq!(ensemble.name, "Aurora String Quartet");
        assert_eq!(ensemble.description.as_deref(), Some("Updated"));
        assert_eq!(ensemble.genre.len(), 2);
    }

    #[test]
    fn test_search_combines_name_and_genre() {
        let ensemble = quartet();
        let search = EnsembleSearch {
            name: Some("aurora".to_string()),
            genre: Some("classic".to_string()),
        };
        assert!(search.matches(&ensemble));

        let wrong_genre = EnsembleSearch {
            name: Some("aurora".to_string()),
            genre: Some("metal".to_string()),
        };
        assert!(!wrong_genre.matches(&ensemble));
    }

    #[test]
    fn test_missing_name_fails_validation() {
        let new = NewEnsemble {
            description: Some("Missing name field".to_string()),
            ..Default::default()
        };
        let errors = new.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
