use crate::logic::error::{ServiceError, ServiceResult};
use crate::logic::users::UserService;
use crate::model::{
    AuthUser, Ensemble, EnsembleSearch, EnsembleUpdate, EnsembleView, MessageResponse, NewEnsemble,
    UserProfile,
};
use crate::store::traits::Store;

pub const NAME_TAKEN: &str = "Group name already taken";

pub struct EnsembleService;

impl EnsembleService {
    pub async fn create<S: Store>(store: &S, new: NewEnsemble) -> ServiceResult<EnsembleView> {
        let name = new.name.clone().unwrap_or_default();
        if store.find_ensemble_by_name(&name).await?.is_some() {
            log::debug!("Rejected ensemble: name '{}' taken", name);
            return Err(ServiceError::conflict(NAME_TAKEN));
        }

        let ensemble = Ensemble::new(new);
        store.insert_ensemble(ensemble.clone()).await?;
        log::info!("Created ensemble '{}' ({})", ensemble.name, ensemble.id);

        Ok(EnsembleView::new(ensemble, Vec::new()))
    }

    pub async fn list<S: Store>(store: &S) -> ServiceResult<Vec<EnsembleView>> {
        let ensembles = store.list_ensembles().await?;
        Self::populate_all(store, ensembles).await
    }

    pub async fn find_one<S: Store>(store: &S, id: &str) -> ServiceResult<EnsembleView> {
        let ensemble = Self::get(store, id).await?;
        Self::populate(store, ensemble).await
    }

    /// Merge `update` into the ensemble, keeping names unique
    pub async fn update<S: Store>(
        store: &S,
        id: &str,
        update: EnsembleUpdate,
    ) -> ServiceResult<EnsembleView> {
        let mut ensemble = Self::get(store, id).await?;

        if let Some(name) = update.name.as_deref() {
            if let Some(other) = store.find_ensemble_by_name(name).await? {
                if other.id != ensemble.id {
                    return Err(ServiceError::conflict(NAME_TAKEN));
                }
            }
        }

        ensemble.apply(update);
        if !store.update_ensemble(ensemble.clone()).await? {
            return Err(Self::missing(id));
        }
        Self::populate(store, ensemble).await
    }

    pub async fn remove<S: Store>(store: &S, id: &str) -> ServiceResult<MessageResponse> {
        if !store.delete_ensemble(&id.to_string()).await? {
            return Err(ServiceError::not_found(format!(
                "Ensemble with id {} not found",
                id
            )));
        }
        let posts = store.remove_ensemble_from_posts(&id.to_string()).await?;
        log::info!("Deleted ensemble {} (unlinked from {} posts)", id, posts);
        Ok(MessageResponse::new(format!(
            "Ensemble with id {} has been successfully deleted",
            id
        )))
    }

    /// Add the caller to the ensemble's members
    pub async fn link_user<S: Store>(
        store: &S,
        id: &str,
        auth: &AuthUser,
    ) -> ServiceResult<EnsembleView> {
        let mut ensemble = Self::get(store, id).await?;
        let user = UserService::current_user(store, auth).await?;

        if ensemble.has_member(&user.id) {
            return Err(ServiceError::bad_request(
                "User already exists in the ensemble.",
            ));
        }

        ensemble.users.push(user.id.clone());
        ensemble.updated_at = crate::model::now();
        if !store.update_ensemble(ensemble.clone()).await? {
            return Err(Self::missing(id));
        }
        log::info!("User '{}' joined ensemble '{}'", user.username, ensemble.name);

        Self::populate(store, ensemble).await
    }

    /// Remove the caller from the ensemble's members
    pub async fn leave<S: Store>(
        store: &S,
        id: &str,
        auth: &AuthUser,
    ) -> ServiceResult<EnsembleView> {
        let mut ensemble = Self::get(store, id).await?;
        let user = UserService::current_user(store, auth).await?;

        if !ensemble.has_member(&user.id) {
            return Err(ServiceError::bad_request(
                "User is not a member of the ensemble.",
            ));
        }

        ensemble.users.retain(|member| member != &user.id);
        ensemble.updated_at = crate::model::now();
        if !store.update_ensemble(ensemble.clone()).await? {
            return Err(Self::missing(id));
        }

        Self::populate(store, ensemble).await
    }

    /// Ensembles the caller belongs to
    pub async fn find_by_user<S: Store>(
        store: &S,
        auth: &AuthUser,
    ) -> ServiceResult<Vec<EnsembleView>> {
        let user = UserService::current_user(store, auth).await?;
        let ensembles = store.list_ensembles_for_user(&user.id).await?;
        Self::populate_all(store, ensembles).await
    }

    pub async fn search<S: Store>(
        store: &S,
        search: &EnsembleSearch,
    ) -> ServiceResult<Vec<EnsembleView>> {
        let ensembles = store.search_ensembles(search).await?;
        Self::populate_all(store, ensembles).await
    }

    async fn get<S: Store>(store: &S, id: &str) -> ServiceResult<Ensemble> {
        store
            .get_ensemble(&id.to_string())
            .await?
            .ok_or_else(|| Self::missing(id))
    }

    fn missing(id: &str) -> ServiceError {
        ServiceError::not_found(format!("Ensemble with ID {} not found", id))
    }

    async fn populate<S: Store>(store: &S, ensemble: Ensemble) -> ServiceResult<EnsembleView> {
        let members = store.get_users(&ensemble.users).await?;
        let profiles = members.into_iter().map(UserProfile::from).collect();
        Ok(EnsembleView::new(ensemble, profiles))
    }

    async fn populate_all<S: Store>(
        store: &S,
        ensembles: Vec<Ensemble>,
    ) -> ServiceResult<Vec<EnsembleView>> {
        let mut views = Vec::with_capacity(ensembles.len());
        for ensemble in ensembles {
            views.push(Self::populate(store, ensemble).await?);
        }
        Ok(views)
    }
}
