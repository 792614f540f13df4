use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    PgPool, Row,
};

use crate::model::{Ensemble, EnsembleSearch, Id, Instrument, Post, PostSearch, User, UserSearch};
use crate::store::traits::{EnsembleStore, PostStore, UserStore};

const USER_COLUMNS: &str =
    "id, full_name, description, username, email, password_hash, instruments, created_at, updated_at";
const ENSEMBLE_COLUMNS: &str = "id, name, description, genre, users, created_at, updated_at";
const POST_COLUMNS: &str =
    "id, title, description, genre, instrument, ensemble, user_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Turn a search term into an ILIKE pattern matching it anywhere
fn like_pattern(term: Option<&str>) -> Option<String> {
    term.map(|t| {
        let escaped = t
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    })
}

fn user_from_row(row: &PgRow) -> Result<User> {
    let instruments: Json<Vec<Instrument>> = row.try_get("instruments")?;
    Ok(User {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        description: row.try_get("description")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        instruments: instruments.0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn ensemble_from_row(row: &PgRow) -> Result<Ensemble> {
    Ok(Ensemble {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        genre: row.try_get("genre")?,
        users: row.try_get("users")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn post_from_row(row: &PgRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        genre: row.try_get("genre")?,
        instrument: row.try_get("instrument")?,
        ensemble: row.try_get("ensemble")?,
        user: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    async fn get_user(&self, id: &Id) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by username")?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")?;

        rows.iter().map(user_from_row).collect()
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE ($1::text IS NULL OR username ILIKE $1)
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM jsonb_array_elements(instruments) AS i
                    WHERE i->>'name' ILIKE $2
                       OR EXISTS (
                            SELECT 1 FROM jsonb_array_elements_text(COALESCE(i->'genre', '[]'::jsonb)) AS g
                            WHERE g ILIKE $2
                       )
                  ))
            ORDER BY created_at
            "#
        ))
        .bind(like_pattern(search.username.as_deref()))
        .bind(like_pattern(search.instrument.as_deref()))
        .fetch_all(&self.pool)
        .await
        .context("Failed to search users")?;

        rows.iter().map(user_from_row).collect()
    }

    async fn get_users(&self, ids: &[Id]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch users")?;

        let mut found: Vec<User> = rows.iter().map(user_from_row).collect::<Result<_>>()?;
        found.sort_by_key(|u| ids.iter().position(|id| id == &u.id));
        Ok(found)
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, description, username, email, password_hash, instruments, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.description)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Json(&user.instruments))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                full_name = $2,
                description = $3,
                username = $4,
                email = $5,
                password_hash = $6,
                instruments = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.description)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Json(&user.instruments))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to update user")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl EnsembleStore for PostgresStore {
    async fn get_ensemble(&self, id: &Id) -> Result<Option<Ensemble>> {
        let row = sqlx::query(&format!("SELECT {ENSEMBLE_COLUMNS} FROM ensembles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch ensemble")?;

        row.as_ref().map(ensemble_from_row).transpose()
    }

    async fn find_ensemble_by_name(&self, name: &str) -> Result<Option<Ensemble>> {
        let row = sqlx::query(&format!(
            "SELECT {ENSEMBLE_COLUMNS} FROM ensembles WHERE name = $1 LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch ensemble by name")?;

        row.as_ref().map(ensemble_from_row).transpose()
    }

    async fn list_ensembles(&self) -> Result<Vec<Ensemble>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENSEMBLE_COLUMNS} FROM ensembles ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list ensembles")?;

        rows.iter().map(ensemble_from_row).collect()
    }

    async fn search_ensembles(&self, search: &EnsembleSearch) -> Result<Vec<Ensemble>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ENSEMBLE_COLUMNS} FROM ensembles
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR EXISTS (SELECT 1 FROM unnest(genre) AS g WHERE g ILIKE $2))
            ORDER BY created_at
            "#
        ))
        .bind(like_pattern(search.name.as_deref()))
        .bind(like_pattern(search.genre.as_deref()))
        .fetch_all(&self.pool)
        .await
        .context("Failed to search ensembles")?;

        rows.iter().map(ensemble_from_row).collect()
    }

    async fn list_ensembles_for_user(&self, user_id: &Id) -> Result<Vec<Ensemble>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENSEMBLE_COLUMNS} FROM ensembles WHERE $1 = ANY(users) ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list ensembles for user")?;

        rows.iter().map(ensemble_from_row).collect()
    }

    async fn insert_ensemble(&self, ensemble: Ensemble) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ensembles (id, name, description, genre, users, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&ensemble.id)
        .bind(&ensemble.name)
        .bind(&ensemble.description)
        .bind(&ensemble.genre)
        .bind(&ensemble.users)
        .bind(ensemble.created_at)
        .bind(ensemble.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert ensemble")?;

        Ok(())
    }

    async fn update_ensemble(&self, ensemble: Ensemble) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE ensembles SET
                name = $2,
                description = $3,
                genre = $4,
                users = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(&ensemble.id)
        .bind(&ensemble.name)
        .bind(&ensemble.description)
        .bind(&ensemble.genre)
        .bind(&ensemble.users)
        .bind(ensemble.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to update ensemble")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_ensemble(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ensembles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete ensemble")?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_user_from_ensembles(&self, user_id: &Id) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE ensembles SET users = array_remove(users, $1), updated_at = NOW() WHERE $1 = ANY(users)",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("Failed to remove user from ensembles")?;

        Ok(result.rows_affected())
    }
}

#[async_trait::async_trait]
impl PostStore for PostgresStore {
    async fn get_post(&self, id: &Id) -> Result<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch post")?;

        row.as_ref().map(post_from_row).transpose()
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list posts")?;

        rows.iter().map(post_from_row).collect()
    }

    async fn search_posts(&self, search: &PostSearch) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE ($1::text IS NULL OR title ILIKE $1)
              AND ($2::text IS NULL OR genre ILIKE $2)
            ORDER BY created_at
            "#
        ))
        .bind(like_pattern(search.title.as_deref()))
        .bind(like_pattern(search.genre.as_deref()))
        .fetch_all(&self.pool)
        .await
        .context("Failed to search posts")?;

        rows.iter().map(post_from_row).collect()
    }

    async fn list_posts_by_user(&self, user_id: &Id) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts for user")?;

        rows.iter().map(post_from_row).collect()
    }

    async fn insert_post(&self, post: Post) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, description, genre, instrument, ensemble, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.genre)
        .bind(&post.instrument)
        .bind(&post.ensemble)
        .bind(&post.user)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert post")?;

        Ok(())
    }

    async fn update_post(&self, post: Post) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET
                title = $2,
                description = $3,
                genre = $4,
                instrument = $5,
                ensemble = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.genre)
        .bind(&post.instrument)
        .bind(&post.ensemble)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_post(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_posts_by_user(&self, user_id: &Id) -> Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete posts for user")?;

        Ok(result.rows_affected())
    }

    async fn remove_ensemble_from_posts(&self, ensemble_id: &Id) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE posts SET ensemble = array_remove(ensemble, $1), updated_at = NOW() WHERE $1 = ANY(ensemble)",
        )
        .bind(ensemble_id)
        .execute(&self.pool)
        .await
        .context("Failed to remove ensemble from posts")?;

        Ok(result.rows_affected())
    }
}
