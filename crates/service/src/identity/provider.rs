use async_trait::async_trait;

use models::Role;

use super::domain::{Account, IssuedToken, NewAccount, VerifiedIdentity};
use super::errors::IdentityError;

/// The identity operations the rest of the system relies on.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check signature and expiry; does not look the account up.
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
    /// Role claim of an existing account. `NotFound` if the account is gone.
    async fn role_of(&self, uid: &str) -> Result<Option<Role>, IdentityError>;
    async fn find_by_uid(&self, uid: &str) -> Result<Option<Account>, IdentityError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError>;
    async fn create_account(&self, input: NewAccount) -> Result<Account, IdentityError>;
    async fn delete_account(&self, uid: &str) -> Result<(), IdentityError>;
    async fn set_role(&self, uid: &str, role: Role) -> Result<(), IdentityError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<IssuedToken, IdentityError>;
}
