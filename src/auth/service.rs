// Authentication service - business logic layer

use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{
    error::AuthError,
    models::Account,
    password::PasswordService,
    repository::CredentialStore,
    token::TokenService,
};

/// Authentication service coordinating registration and login
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    password_service: PasswordService,
    token_service: Arc<TokenService>,
    // Verified against when the account is absent so both login failures cost the same
    dummy_hash: String,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        store: Arc<dyn CredentialStore>,
        password_service: PasswordService,
        token_service: Arc<TokenService>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = password_service.hash_password("token-gate-unused-password")?;
        Ok(Self {
            store,
            password_service,
            token_service,
            dummy_hash,
        })
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    /// Register a new account
    ///
    /// Registration does not log the user in; no token is returned.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.store.find(username).await?.is_some() {
            warn!("Registration rejected, username taken: {}", username);
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hash_password(password).await?;

        // The store re-checks atomically; a concurrent registration may have won
        self.store
            .insert(Account::new(username, password_hash))
            .await
            .inspect_err(|e| {
                if matches!(e, AuthError::AlreadyExists) {
                    warn!("Registration lost race for username: {}", username);
                }
            })?;

        info!("Registered user: {}", username);
        Ok(())
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let account = self.store.find(username).await?;

        let (hash, exists) = match &account {
            Some(account) => (account.password_hash.clone(), true),
            None => (self.dummy_hash.clone(), false),
        };

        let password_matches = self.verify_password(password, hash).await?;
        if !exists || !password_matches {
            warn!("Failed login attempt for username: {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.issue(username)?;
        info!("User logged in: {}", username);
        Ok(token)
    }

    // Argon2 is CPU-bound; keep it off the async workers
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let service = self.password_service.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || service.hash_password(&password))
            .await
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, AuthError> {
        let service = self.password_service.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || service.verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::InMemoryCredentialStore;

    fn test_service() -> (AuthService, Arc<InMemoryCredentialStore>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let tokens = Arc::new(TokenService::new("service-test-secret", 3600).unwrap());
        let passwords = PasswordService::with_params(8, 1, 1).unwrap();
        let service = AuthService::new(store.clone(), passwords, tokens).unwrap();
        (service, store)
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let (service, store) = test_service();
        service.register("alice", "pw123").await.unwrap();

        let account = store.find("alice").await.unwrap().unwrap();
        assert_ne!(account.password_hash, "pw123");
        assert!(account.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_twice_fails_and_keeps_one_account() {
        let (service, store) = test_service();
        service.register("alice", "pw123").await.unwrap();

        let result = service.register("alice", "other").await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));
        assert_eq!(store.len().await, 1);

        // Original password still works
        assert!(service.login("alice", "pw123").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let (service, _) = test_service();
        service.register("alice", "pw123").await.unwrap();

        let token = service.login("alice", "pw123").await.unwrap();
        assert!(!token.is_empty());

        let claims = service.token_service().decode(&token).unwrap();
        assert_eq!(claims.username, "alice");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = test_service();
        service.register("alice", "pw123").await.unwrap();

        let unknown_user = service.login("nobody", "pw123").await.unwrap_err();
        let wrong_password = service.login("alice", "wrong").await.unwrap_err();

        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
        assert_eq!(unknown_user.status_code(), wrong_password.status_code());
    }

    #[tokio::test]
    async fn test_unknown_user_with_dummy_password_is_rejected() {
        let (service, _) = test_service();
        let result = service.login("ghost", "token-gate-unused-password").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_single_winner() {
        let (service, store) = test_service();
        let service = Arc::new(service);

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.register("bob", "pw-one").await })
        };
        let second = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.register("bob", "pw-two").await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(AuthError::AlreadyExists)))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(store.len().await, 1);
    }
}
