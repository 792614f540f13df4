use crate::auth::{hash_password, verify_password};
use crate::logic::error::{ServiceError, ServiceResult};
use crate::model::{
    now, AuthUser, Instrument, InstrumentUpdate, NewInstrument, NewUser, User, UserProfile,
    UserSearch, UserUpdate,
};
use crate::store::traits::Store;

pub const USERNAME_TAKEN: &str = "Username already taken";
pub const EMAIL_TAKEN: &str = "Email already taken";
pub const USERNAME_IN_USE: &str = "The provided username is already in use";
pub const EMAIL_IN_USE: &str = "The provided email is already in use";
pub const USER_NOT_FOUND: &str = "Could not find the user with the provided username";

pub struct UserService;

impl UserService {
    /// Register a new user after checking username and email are free
    pub async fn create_user<S: Store>(store: &S, new: NewUser) -> ServiceResult<UserProfile> {
        let username = new.username.clone().unwrap_or_default();
        let email = new.email.clone().unwrap_or_default();

        if store.find_user_by_username(&username).await?.is_some() {
            log::debug!("Rejected signup: username '{}' taken", username);
            return Err(ServiceError::conflict(USERNAME_TAKEN));
        }
        if store.find_user_by_email(&email).await?.is_some() {
            log::debug!("Rejected signup: email '{}' taken", email);
            return Err(ServiceError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(new.password.as_deref().unwrap_or_default())?;
        let user = User::new(new, password_hash);
        let profile = user.profile();
        store.insert_user(user).await?;

        log::info!("Created user '{}' ({})", profile.username, profile.id);
        Ok(profile)
    }

    pub async fn find_by_username<S: Store>(store: &S, username: &str) -> ServiceResult<User> {
        store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    /// The user behind a verified token
    pub async fn current_user<S: Store>(store: &S, auth: &AuthUser) -> ServiceResult<User> {
        store
            .get_user(&auth.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    pub async fn get_profile<S: Store>(store: &S, username: &str) -> ServiceResult<UserProfile> {
        Ok(Self::find_by_username(store, username).await?.profile())
    }

    /// Merge `update` into the caller's profile.
    ///
    /// Username and email stay unique across users. Changing the password
    /// requires the current one.
    pub async fn update_user<S: Store>(
        store: &S,
        auth: &AuthUser,
        update: UserUpdate,
    ) -> ServiceResult<UserProfile> {
        let mut user = Self::current_user(store, auth).await?;

        if let Some(username) = update.username.as_deref() {
            if let Some(other) = store.find_user_by_username(username).await? {
                if other.id != user.id {
                    return Err(ServiceError::conflict(USERNAME_IN_USE));
                }
            }
        }
        if let Some(email) = update.email.as_deref() {
            if let Some(other) = store.find_user_by_email(email).await? {
                if other.id != user.id {
                    return Err(ServiceError::conflict(EMAIL_IN_USE));
                }
            }
        }

        if update.touches_password() {
            let (Some(old_password), Some(new_password)) =
                (update.old_password.as_deref(), update.requested_password())
            else {
                return Err(ServiceError::bad_request("Invalid password data"));
            };

            if !verify_password(old_password, &user.password_hash)? {
                return Err(ServiceError::Forbidden(
                    "Your current Password is not correct".to_string(),
                ));
            }
            user.password_hash = hash_password(new_password)?;
        }

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(full_name) = update.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(description) = update.description {
            user.description = Some(description);
        }
        user.updated_at = now();

        let profile = user.profile();
        if !store.update_user(user).await? {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        Ok(profile)
    }

    /// Delete the caller together with their posts and ensemble memberships
    pub async fn remove_user<S: Store>(store: &S, auth: &AuthUser) -> ServiceResult<()> {
        let user = Self::current_user(store, auth).await?;

        let memberships = store.remove_user_from_ensembles(&user.id).await?;
        let posts = store.delete_posts_by_user(&user.id).await?;
        store.delete_user(&user.id).await?;

        log::info!(
            "Deleted user '{}' ({} memberships, {} posts)",
            user.username,
            memberships,
            posts
        );
        Ok(())
    }

    pub async fn list_users<S: Store>(store: &S) -> ServiceResult<Vec<UserProfile>> {
        let users = store.list_users().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn search_users<S: Store>(
        store: &S,
        search: &UserSearch,
    ) -> ServiceResult<Vec<UserProfile>> {
        let users = store.search_users(search).await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn list_instruments<S: Store>(
        store: &S,
        username: &str,
    ) -> ServiceResult<Vec<Instrument>> {
        let user = store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("No user found"))?;
        Ok(user.instruments)
    }

    pub async fn add_instrument<S: Store>(
        store: &S,
        auth: &AuthUser,
        new: NewInstrument,
    ) -> ServiceResult<UserProfile> {
        let mut user = Self::current_user(store, auth).await?;
        user.instruments.push(Instrument::from(new));
        Self::save(store, user).await
    }

    pub async fn remove_instrument<S: Store>(
        store: &S,
        auth: &AuthUser,
        instrument_id: &str,
    ) -> ServiceResult<UserProfile> {
        let mut user = Self::current_user(store, auth).await?;
        let before = user.instruments.len();
        user.instruments.retain(|i| i.id != instrument_id);
        if user.instruments.len() == before {
            return Err(ServiceError::not_found("Instrument not found"));
        }
        Self::save(store, user).await
    }

    pub async fn update_instrument<S: Store>(
        store: &S,
        auth: &AuthUser,
        instrument_id: &str,
        update: InstrumentUpdate,
    ) -> ServiceResult<UserProfile> {
        let mut user = Self::current_user(store, auth).await?;
        user.find_instrument_mut(instrument_id)
            .ok_or_else(|| ServiceError::not_found("Instrument not found"))?
            .apply(update);
        Self::save(store, user).await
    }

    async fn save<S: Store>(store: &S, mut user: User) -> ServiceResult<UserProfile> {
        user.updated_at = now();
        let profile = user.profile();
        if !store.update_user(user).await? {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        Ok(profile)
    }
}
