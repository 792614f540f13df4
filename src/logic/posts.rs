use crate::logic::error::{ServiceError, ServiceResult};
use crate::logic::users::UserService;
use crate::model::{
    AuthUser, Id, MessageResponse, NewPost, Post, PostSearch, PostUpdate, PostView, UserProfile,
};
use crate::store::traits::Store;

pub struct PostService;

impl PostService {
    /// Publish a post authored by the caller
    pub async fn create<S: Store>(
        store: &S,
        new: NewPost,
        auth: &AuthUser,
    ) -> ServiceResult<PostView> {
        let author = UserService::current_user(store, auth).await?;
        if let Some(ensembles) = new.ensemble.as_deref() {
            Self::check_ensembles(store, ensembles).await?;
        }

        let post = Post::new(new, author.id.clone());
        store.insert_post(post.clone()).await?;
        log::info!("User '{}' created post {}", author.username, post.id);

        Ok(PostView::new(post, Some(author.profile())))
    }

    pub async fn list<S: Store>(store: &S) -> ServiceResult<Vec<PostView>> {
        let posts = store.list_posts().await?;
        Self::populate_all(store, posts).await
    }

    pub async fn find_one<S: Store>(store: &S, id: &str) -> ServiceResult<PostView> {
        let post = Self::get(store, id).await?;
        Self::populate(store, post).await
    }

    /// Posts written by `username`
    pub async fn find_by_username<S: Store>(
        store: &S,
        username: &str,
    ) -> ServiceResult<Vec<PostView>> {
        let author = UserService::find_by_username(store, username).await?;
        Self::by_author(store, author.profile()).await
    }

    /// Posts written by the caller
    pub async fn find_by_user<S: Store>(
        store: &S,
        auth: &AuthUser,
    ) -> ServiceResult<Vec<PostView>> {
        let author = UserService::current_user(store, auth).await?;
        Self::by_author(store, author.profile()).await
    }

    pub async fn update<S: Store>(
        store: &S,
        id: &str,
        update: PostUpdate,
    ) -> ServiceResult<PostView> {
        let mut post = Self::get(store, id).await?;
        if let Some(ensembles) = update.ensemble.as_deref() {
            Self::check_ensembles(store, ensembles).await?;
        }

        post.apply(update);
        if !store.update_post(post.clone()).await? {
            return Err(Self::missing(id));
        }
        Self::populate(store, post).await
    }

    pub async fn remove<S: Store>(store: &S, id: &str) -> ServiceResult<MessageResponse> {
        if !store.delete_post(&id.to_string()).await? {
            return Err(Self::missing(id));
        }
        log::info!("Deleted post {}", id);
        Ok(MessageResponse::new("Post has been successfully deleted"))
    }

    pub async fn search<S: Store>(store: &S, search: &PostSearch) -> ServiceResult<Vec<PostView>> {
        let posts = store.search_posts(search).await?;
        Self::populate_all(store, posts).await
    }

    async fn by_author<S: Store>(store: &S, author: UserProfile) -> ServiceResult<Vec<PostView>> {
        let posts = store.list_posts_by_user(&author.id).await?;
        Ok(posts
            .into_iter()
            .map(|post| PostView::new(post, Some(author.clone())))
            .collect())
    }

    async fn get<S: Store>(store: &S, id: &str) -> ServiceResult<Post> {
        store
            .get_post(&id.to_string())
            .await?
            .ok_or_else(|| Self::missing(id))
    }

    fn missing(id: &str) -> ServiceError {
        ServiceError::not_found(format!("Post with ID {} not found", id))
    }

    async fn check_ensembles<S: Store>(store: &S, ids: &[Id]) -> ServiceResult<()> {
        for id in ids {
            if store.get_ensemble(id).await?.is_none() {
                return Err(ServiceError::not_found(format!(
                    "Ensemble with ID {} not found",
                    id
                )));
            }
        }
        Ok(())
    }

    async fn populate<S: Store>(store: &S, post: Post) -> ServiceResult<PostView> {
        let author = store.get_user(&post.user).await?.map(UserProfile::from);
        Ok(PostView::new(post, author))
    }

    /// Resolve each post's author, fetching every distinct author once
    async fn populate_all<S: Store>(store: &S, posts: Vec<Post>) -> ServiceResult<Vec<PostView>> {
        let mut author_ids: Vec<Id> = posts.iter().map(|p| p.user.clone()).collect();
        author_ids.sort();
        author_ids.dedup();

        let authors: Vec<UserProfile> = store
            .get_users(&author_ids)
            .await?
            .into_iter()
            .map(UserProfile::from)
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.iter().find(|a| a.id == post.user).cloned();
                PostView::new(post, author)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ensembles::EnsembleService;
    use crate::model::{NewEnsemble, NewUser};
    use crate::store::MemoryStore;

    async fn author(store: &MemoryStore, username: &str) -> AuthUser {
        let profile = UserService::create_user(
            store,
            NewUser {
                username: Some(username.to_string()),
                email: Some(format!("{username}@daos.com")),
                password: Some("password".to_string()),
                full_name: Some("full Name".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
        AuthUser::new(profile.id, profile.username)
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: Some(title.to_string()),
            description: Some("This is a test post".to_string()),
            genre: Some("Classical".to_string()),
            instrument: Some("Violin".to_string()),
            ensemble: None,
        }
    }

    #[tokio::test]
    async fn test_my_posts_carry_author_profile() {
        let store = MemoryStore::new();
        let me = author(&store, "mypostuser").await;
        PostService::create(&store, new_post("New post"), &me)
            .await
            .unwrap();

        let mine = PostService::find_by_user(&store, &me).await.unwrap();
        assert_eq!(mine.len(), 1);
        let user = mine[0].user.as_ref().unwrap();
        assert_eq!(user.full_name.as_deref(), Some("full Name"));

        let by_name = PostService::find_by_username(&store, "mypostuser")
            .await
            .unwrap();
        assert_eq!(by_name[0].title, "New post");
    }

    #[tokio::test]
    async fn test_unknown_ensemble_reference_is_rejected() {
        let store = MemoryStore::new();
        let me = author(&store, "poster").await;
        let post = NewPost {
            ensemble: Some(vec!["missing".to_string()]),
            ..new_post("Gig tonight")
        };
        let err = PostService::create(&store, post, &me).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let ensemble = EnsembleService::create(
            &store,
            NewEnsemble {
                name: Some("House Band".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let post = NewPost {
            ensemble: Some(vec![ensemble.id.clone()]),
            ..new_post("Gig tonight")
        };
        let view = PostService::create(&store, post, &me).await.unwrap();
        assert_eq!(view.ensemble, vec![ensemble.id]);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let store = MemoryStore::new();
        let me = author(&store, "patchusername").await;
        let created = PostService::create(&store, new_post("New post"), &me)
            .await
            .unwrap();

        let updated = PostService::update(
            &store,
            &created.id,
            PostUpdate {
                description: Some("This is updated post description".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "New post");
        assert_eq!(updated.description, "This is updated post description");

        let message = PostService::remove(&store, &created.id).await.unwrap();
        assert_eq!(message.message, "Post has been successfully deleted");

        let err = PostService::find_one(&store, &created.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
