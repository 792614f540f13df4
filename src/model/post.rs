use crate::model::{contains_ignore_case, generate_id, now, FieldOrder, Id, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user-authored item, optionally tied to ensembles
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub instrument: Option<String>,
    pub ensemble: Vec<Id>,
    /// Authoring user id
    pub user: Id,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(new: NewPost, author_id: Id) -> Self {
        let timestamp = now();
        Self {
            id: generate_id(),
            title: new.title.unwrap_or_default(),
            description: new.description.unwrap_or_default(),
            genre: new.genre.unwrap_or_default(),
            instrument: new.instrument,
            ensemble: new.ensemble.unwrap_or_default(),
            user: author_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn apply(&mut self, update: PostUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
        if let Some(instrument) = update.instrument {
            self.instrument = Some(instrument);
        }
        if let Some(ensemble) = update.ensemble {
            self.ensemble = ensemble;
        }
        self.updated_at = now();
    }
}

/// Post with the author resolved to a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: Id,
    pub title: String,
    pub description: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    pub ensemble: Vec<Id>,
    pub user: Option<UserProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, author: Option<UserProfile>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.description,
            genre: post.genre,
            instrument: post.instrument,
            ensemble: post.ensemble,
            user: author,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewPost {
    #[validate(
        required(message = "Field Required"),
        length(min = 3, message = "Title must be at least 3 characters long")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Field Required"),
        length(min = 3, message = "Description must be at least 3 characters long")
    )]
    pub description: Option<String>,
    #[validate(
        required(message = "Field Required"),
        length(min = 1, message = "Field Required")
    )]
    pub genre: Option<String>,
    pub instrument: Option<String>,
    pub ensemble: Option<Vec<Id>>,
}

impl FieldOrder for NewPost {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("title", "title"),
        ("description", "description"),
        ("genre", "genre"),
        ("instrument", "instrument"),
        ("ensemble", "ensemble"),
    ];
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostUpdate {
    #[validate(length(min = 3, message = "Title must be at least 3 characters long"))]
    pub title: Option<String>,
    #[validate(length(min = 3, message = "Description must be at least 3 characters long"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Field Required"))]
    pub genre: Option<String>,
    pub instrument: Option<String>,
    pub ensemble: Option<Vec<Id>>,
}

impl FieldOrder for PostUpdate {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("title", "title"),
        ("description", "description"),
        ("genre", "genre"),
        ("instrument", "instrument"),
        ("ensemble", "ensemble"),
    ];
}

/// Query string of `GET /posts/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostSearch {
    pub title: Option<String>,
    pub genre: Option<String>,
}

impl PostSearch {
    pub fn matches(&self, post: &Post) -> bool {
        let title_ok = self
            .title
            .as_deref()
            .map_or(true, |needle| contains_ignore_case(&post.title, needle));
        let genre_ok = self
            .genre
            .as_deref()
            .map_or(true, |needle| contains_ignore_case(&post.genre, needle));
        title_ok && genre_ok
    }
}
