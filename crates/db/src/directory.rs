//! Account and user directories.
//!
//! The chart of accounts and the user registry live outside this engine. The
//! store only needs to check that referenced ids exist and to enrich read
//! results with codes and names.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{AccountId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Account summary used for enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account ID.
    pub id: AccountId,
    /// Chart of accounts code.
    pub code: i32,
    /// Display name.
    pub name: String,
}

/// User summary used for enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: Option<String>,
}

/// Lookup into the chart of accounts.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Finds an account by id.
    async fn find_account(&self, id: AccountId) -> Option<AccountInfo>;
}

/// Lookup into the user registry.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by id.
    async fn find_user(&self, id: UserId) -> Option<UserInfo>;
}

/// Both directories, shared by the repositories.
#[derive(Clone)]
pub struct Directories {
    /// Accounts.
    pub accounts: Arc<dyn AccountDirectory>,
    /// Users.
    pub users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for Directories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directories").finish_non_exhaustive()
    }
}

impl Directories {
    /// Uses one in-memory directory for both lookups.
    #[must_use]
    pub fn in_memory(directory: Arc<InMemoryDirectory>) -> Self {
        Self {
            accounts: directory.clone(),
            users: directory,
        }
    }

    /// Fails with `AccountNotFound` for an unknown account.
    pub async fn require_account(&self, id: AccountId) -> LedgerResult<AccountInfo> {
        self.accounts
            .find_account(id)
            .await
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Fails with `UserNotFound` for an unknown user.
    pub async fn require_user(&self, id: UserId) -> LedgerResult<UserInfo> {
        self.users
            .find_user(id)
            .await
            .ok_or(LedgerError::UserNotFound(id))
    }

    /// Resolves a set of accounts, skipping unknown ids.
    pub async fn accounts_by_id<I>(&self, ids: I) -> HashMap<AccountId, AccountInfo>
    where
        I: IntoIterator<Item = AccountId>,
    {
        let mut out = HashMap::new();
        for id in ids {
            if out.contains_key(&id) {
                continue;
            }
            if let Some(info) = self.accounts.find_account(id).await {
                out.insert(id, info);
            }
        }
        out
    }
}

/// Directory backed by in-memory maps.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: RwLock<HashMap<AccountId, AccountInfo>>,
    users: RwLock<HashMap<UserId, UserInfo>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces an account.
    pub async fn add_account(&self, id: AccountId, code: i32, name: impl Into<String>) {
        self.accounts.write().await.insert(
            id,
            AccountInfo {
                id,
                code,
                name: name.into(),
            },
        );
    }

    /// Registers or replaces a user.
    pub async fn add_user(&self, id: UserId, full_name: impl Into<String>, email: Option<String>) {
        self.users.write().await.insert(
            id,
            UserInfo {
                id,
                full_name: full_name.into(),
                email,
            },
        );
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn find_account(&self, id: AccountId) -> Option<AccountInfo> {
        self.accounts.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_user(&self, id: UserId) -> Option<UserInfo> {
        self.users.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_require_lookups() {
        let dir = Arc::new(InMemoryDirectory::new());
        dir.add_account(AccountId(1), 110, "Kas").await;
        dir.add_user(UserId(9), "Admin", None).await;
        let dirs = Directories::in_memory(dir);

        assert_eq!(dirs.require_account(AccountId(1)).await.unwrap().code, 110);
        assert_eq!(
            dirs.require_account(AccountId(2)).await.unwrap_err(),
            LedgerError::AccountNotFound(AccountId(2))
        );
        assert_eq!(
            dirs.require_user(UserId(3)).await.unwrap_err(),
            LedgerError::UserNotFound(UserId(3))
        );

        let found = dirs.accounts_by_id([AccountId(1), AccountId(2), AccountId(1)]).await;
        assert_eq!(found.len(), 1);
    }
}
