use crate::model::{Ensemble, EnsembleSearch, Id, Post, PostSearch, User, UserSearch};
use anyhow::Result;

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: &Id) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>>;
    /// Fetch several users at once; unknown ids are skipped, input order is kept
    async fn get_users(&self, ids: &[Id]) -> Result<Vec<User>>;
    async fn insert_user(&self, user: User) -> Result<()>;
    /// Replace the stored user with the same id; `false` if it no longer exists
    async fn update_user(&self, user: User) -> Result<bool>;
    async fn delete_user(&self, id: &Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait EnsembleStore: Send + Sync {
    async fn get_ensemble(&self, id: &Id) -> Result<Option<Ensemble>>;
    async fn find_ensemble_by_name(&self, name: &str) -> Result<Option<Ensemble>>;
    async fn list_ensembles(&self) -> Result<Vec<Ensemble>>;
    async fn search_ensembles(&self, search: &EnsembleSearch) -> Result<Vec<Ensemble>>;
    /// Ensembles whose member list contains `user_id`
    async fn list_ensembles_for_user(&self, user_id: &Id) -> Result<Vec<Ensemble>>;
    async fn insert_ensemble(&self, ensemble: Ensemble) -> Result<()>;
    async fn update_ensemble(&self, ensemble: Ensemble) -> Result<bool>;
    async fn delete_ensemble(&self, id: &Id) -> Result<bool>;
    /// Drop `user_id` from every member list; returns the number of ensembles touched
    async fn remove_user_from_ensembles(&self, user_id: &Id) -> Result<u64>;
}

#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    async fn get_post(&self, id: &Id) -> Result<Option<Post>>;
    async fn list_posts(&self) -> Result<Vec<Post>>;
    async fn search_posts(&self, search: &PostSearch) -> Result<Vec<Post>>;
    async fn list_posts_by_user(&self, user_id: &Id) -> Result<Vec<Post>>;
    async fn insert_post(&self, post: Post) -> Result<()>;
    async fn update_post(&self, post: Post) -> Result<bool>;
    async fn delete_post(&self, id: &Id) -> Result<bool>;
    async fn delete_posts_by_user(&self, user_id: &Id) -> Result<u64>;
    /// Drop `ensemble_id` from every post referencing it; returns the posts touched
    async fn remove_ensemble_from_posts(&self, ensemble_id: &Id) -> Result<u64>;
}

pub trait Store: UserStore + EnsembleStore + PostStore + Send + Sync {}

impl<T: UserStore + EnsembleStore + PostStore + Send + Sync> Store for T {}
