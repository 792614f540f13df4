use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::{now, Ensemble, EnsembleSearch, Id, Post, PostSearch, User, UserSearch};
use crate::store::traits::{EnsembleStore, PostStore, UserStore};

/// In-process store backed by hash maps.
///
/// Used by the test suite and by `storage.backend = "memory"`. Listings are
/// returned in insertion order (`created_at`) to match the Postgres store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Id, User>>,
    ensembles: RwLock<HashMap<Id, Ensemble>>,
    posts: RwLock<HashMap<Id, Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_creation<T: Clone, K: Ord>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: &Id) -> Result<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read();
        Ok(sorted_by_creation(users.values().cloned(), |u| u.created_at))
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>> {
        let users = self.users.read();
        Ok(sorted_by_creation(
            users.values().filter(|u| search.matches(u)).cloned(),
            |u| u.created_at,
        ))
    }

    async fn get_users(&self, ids: &[Id]) -> Result<Vec<User>> {
        let users = self.users.read();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        self.users.write().insert(user.id.clone(), user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<bool> {
        let mut users = self.users.write();
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: &Id) -> Result<bool> {
        Ok(self.users.write().remove(id).is_some())
    }
}

#[async_trait::async_trait]
impl EnsembleStore for MemoryStore {
    async fn get_ensemble(&self, id: &Id) -> Result<Option<Ensemble>> {
        Ok(self.ensembles.read().get(id).cloned())
    }

    async fn find_ensemble_by_name(&self, name: &str) -> Result<Option<Ensemble>> {
        Ok(self
            .ensembles
            .read()
            .values()
            .find(|e| e.name == name)
            .cloned())
    }

    async fn list_ensembles(&self) -> Result<Vec<Ensemble>> {
        let ensembles = self.ensembles.read();
        Ok(sorted_by_creation(ensembles.values().cloned(), |e| e.created_at))
    }

    async fn search_ensembles(&self, search: &EnsembleSearch) -> Result<Vec<Ensemble>> {
        let ensembles = self.ensembles.read();
        Ok(sorted_by_creation(
            ensembles.values().filter(|e| search.matches(e)).cloned(),
            |e| e.created_at,
        ))
    }

    async fn list_ensembles_for_user(&self, user_id: &Id) -> Result<Vec<Ensemble>> {
        let ensembles = self.ensembles.read();
        Ok(sorted_by_creation(
            ensembles.values().filter(|e| e.has_member(user_id)).cloned(),
            |e| e.created_at,
        ))
    }

    async fn insert_ensemble(&self, ensemble: Ensemble) -> Result<()> {
        self.ensembles.write().insert(ensemble.id.clone(), ensemble);
        Ok(())
    }

    async fn update_ensemble(&self, ensemble: Ensemble) -> Result<bool> {
        let mut ensembles = self.ensembles.write();
        match ensembles.get_mut(&ensemble.id) {
            Some(existing) => {
                *existing = ensemble;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_ensemble(&self, id: &Id) -> Result<bool> {
        Ok(self.ensembles.write().remove(id).is_some())
    }

    async fn remove_user_from_ensembles(&self, user_id: &Id) -> Result<u64> {
        let mut touched = 0;
        for ensemble in self.ensembles.write().values_mut() {
            if ensemble.has_member(user_id) {
                ensemble.users.retain(|id| id != user_id);
                ensemble.updated_at = now();
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn get_post(&self, id: &Id) -> Result<Option<Post>> {
        Ok(self.posts.read().get(id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = self.posts.read();
        Ok(sorted_by_creation(posts.values().cloned(), |p| p.created_at))
    }

    async fn search_posts(&self, search: &PostSearch) -> Result<Vec<Post>> {
        let posts = self.posts.read();
        Ok(sorted_by_creation(
            posts.values().filter(|p| search.matches(p)).cloned(),
            |p| p.created_at,
        ))
    }

    async fn list_posts_by_user(&self, user_id: &Id) -> Result<Vec<Post>> {
        let posts = self.posts.read();
        Ok(sorted_by_creation(
            posts.values().filter(|p| &p.user == user_id).cloned(),
            |p| p.created_at,
        ))
    }

    async fn insert_post(&self, post: Post) -> Result<()> {
        self.posts.write().insert(post.id.clone(), post);
        Ok(())
    }

    async fn update_post(&self, post: Post) -> Result<bool> {
        let mut posts = self.posts.write();
        match posts.get_mut(&post.id) {
            Some(existing) => {
                *existing = post;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_post(&self, id: &Id) -> Result<bool> {
        Ok(self.posts.write().remove(id).is_some())
    }

    async fn delete_posts_by_user(&self, user_id: &Id) -> Result<u64> {
        let mut posts = self.posts.write();
        let before = posts.len();
        posts.retain(|_, p| &p.user != user_id);
        Ok((before - posts.len()) as u64)
    }

    async fn remove_ensemble_from_posts(&self, ensemble_id: &Id) -> Result<u64> {
        let mut touched = 0;
        for post in self.posts.write().values_mut() {
            if post.ensemble.contains(ensemble_id) {
                post.ensemble.retain(|id| id != ensemble_id);
                post.updated_at = now();
                touched += 1;
            }
        }
        Ok(touched)
    }
}
