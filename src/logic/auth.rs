use crate::auth::{verify_password, TokenKeys};
use crate::logic::error::{ServiceError, ServiceResult};
use crate::logic::users::UserService;
use crate::model::{AccessToken, AuthUser, NewUser, SignIn, UserProfile};
use crate::store::traits::Store;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService;

impl AuthService {
    /// Exchange username and password for a bearer token
    pub async fn sign_in<S: Store>(
        store: &S,
        keys: &TokenKeys,
        credentials: SignIn,
    ) -> ServiceResult<AccessToken> {
        let username = credentials.username.unwrap_or_default();
        let password = credentials.password.unwrap_or_default();

        let Some(user) = store.find_user_by_username(&username).await? else {
            log::debug!("Login failed: unknown user '{}'", username);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&password, &user.password_hash)? {
            log::debug!("Login failed: wrong password for '{}'", username);
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let access_token = keys.issue(&user)?;
        log::info!("User '{}' signed in", user.username);
        Ok(AccessToken { access_token })
    }

    pub async fn sign_up<S: Store>(store: &S, new: NewUser) -> ServiceResult<UserProfile> {
        UserService::create_user(store, new).await
    }

    pub async fn profile<S: Store>(store: &S, auth: &AuthUser) -> ServiceResult<UserProfile> {
        Ok(UserService::current_user(store, auth).await?.profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DEFAULT_TOKEN_TTL_SECS;
    use crate::store::MemoryStore;

    async fn setup() -> (MemoryStore, TokenKeys) {
        let store = MemoryStore::new();
        AuthService::sign_up(
            &store,
            NewUser {
                username: Some("newuser".to_string()),
                email: Some("newuser@daos.com".to_string()),
                password: Some("password".to_string()),
                full_name: Some("full name".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
        let keys = TokenKeys::new("test-secret", DEFAULT_TOKEN_TTL_SECS).unwrap();
        (store, keys)
    }

    fn credentials(username: &str, password: &str) -> SignIn {
        SignIn {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_valid_login_returns_verifiable_token() {
        let (store, keys) = setup().await;
        let token = AuthService::sign_in(&store, &keys, credentials("newuser", "password"))
            .await
            .unwrap();

        let identity = keys.verify(&token.access_token).unwrap();
        assert_eq!(identity.username, "newuser");

        let profile = AuthService::profile(&store, &identity).await.unwrap();
        assert_eq!(profile.email, "newuser@daos.com");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let (store, keys) = setup().await;

        let err = AuthService::sign_in(&store, &keys, credentials("newuser", "wrong-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let err = AuthService::sign_in(&store, &keys, credentials("nobody", "password"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
