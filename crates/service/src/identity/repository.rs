use async_trait::async_trait;

use models::Role;

use super::domain::Account;
use super::errors::IdentityError;

/// Account plus its password hash; never leaves the identity module.
#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub account: Account,
    pub password_hash: String,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<StoredAccount>, IdentityError>;
    /// Emails are stored lower-cased; callers pass them normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, IdentityError>;
    async fn insert(&self, email: &str, display_name: &str, password_hash: String, role: Option<Role>) -> Result<Account, IdentityError>;
    async fn delete(&self, uid: &str) -> Result<bool, IdentityError>;
    async fn set_role(&self, uid: &str, role: Role) -> Result<bool, IdentityError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    #[derive(Default)]
    pub struct MockAccountRepository {
        accounts: Mutex<HashMap<String, StoredAccount>>, // key: uid
    }

    impl MockAccountRepository {
        fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredAccount>>, IdentityError> {
            self.accounts.lock().map_err(|e| IdentityError::Repository(e.to_string()))
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn find_by_uid(&self, uid: &str) -> Result<Option<StoredAccount>, IdentityError> {
            Ok(self.lock()?.get(uid).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, IdentityError> {
            Ok(self.lock()?.values().find(|a| a.account.email == email).cloned())
        }

        async fn insert(&self, email: &str, display_name: &str, password_hash: String, role: Option<Role>) -> Result<Account, IdentityError> {
            let mut accounts = self.lock()?;
            if accounts.values().any(|a| a.account.email == email) {
                return Err(IdentityError::Conflict);
            }
            let account = Account {
                uid: uuid::Uuid::new_v4().simple().to_string(),
                email: email.to_string(),
                display_name: display_name.to_string(),
                role,
                created_at: Utc::now().into(),
            };
            accounts.insert(account.uid.clone(), StoredAccount { account: account.clone(), password_hash });
            Ok(account)
        }

        async fn delete(&self, uid: &str) -> Result<bool, IdentityError> {
            Ok(self.lock()?.remove(uid).is_some())
        }

        async fn set_role(&self, uid: &str, role: Role) -> Result<bool, IdentityError> {
            match self.lock()?.get_mut(uid) {
                Some(stored) => {
                    stored.account.role = Some(role);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}
