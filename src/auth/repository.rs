// Credential storage for registered accounts

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::auth::{error::AuthError, models::Account};

/// Storage contract for accounts
///
/// Implementations must make `insert` an atomic check-then-add: of two
/// concurrent inserts with the same username exactly one succeeds and the
/// other observes `AuthError::AlreadyExists`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an account by its exact username
    async fn find(&self, username: &str) -> Result<Option<Account>, AuthError>;

    /// Insert a new account, failing if the username is taken
    async fn insert(&self, account: Account) -> Result<(), AuthError>;
}

/// Process-memory credential store
///
/// Usernames are compared case-sensitively.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether no account has been registered yet
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find(&self, username: &str) -> Result<Option<Account>, AuthError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).cloned())
    }

    async fn insert(&self, account: Account) -> Result<(), AuthError> {
        // Check and insert under one write guard
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Err(AuthError::AlreadyExists);
        }
        accounts.insert(account.username.clone(), account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = InMemoryCredentialStore::new();
        store.insert(Account::new("alice", "hash-a")).await.unwrap();

        let found = store.find("alice").await.unwrap();
        assert_eq!(found, Some(Account::new("alice", "hash-a")));
        assert_eq!(store.find("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected_and_keeps_original() {
        let store = InMemoryCredentialStore::new();
        store.insert(Account::new("alice", "first")).await.unwrap();

        let result = store.insert(Account::new("alice", "second")).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));

        assert_eq!(store.len().await, 1);
        let found = store.find("alice").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "first");
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let store = InMemoryCredentialStore::new();
        store.insert(Account::new("alice", "h1")).await.unwrap();
        store.insert(Account::new("Alice", "h2")).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert_eq!(store.find("ALICE").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_of_same_username() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert(Account::new("racer", format!("hash-{}", i)))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(AuthError::AlreadyExists) => conflicts += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.len().await, 1);
    }
}
