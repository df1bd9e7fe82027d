use std::sync::Arc;

use tracing::{info, instrument, warn};

use models::{user_profile, Role};

use super::domain::{CreateUserInput, NewProfile, UpdateUserInput};
use crate::errors::ServiceError;
use crate::identity::domain::NewAccount;
use crate::identity::IdentityProvider;
use crate::repo::ProfileRepository;

pub struct UserService {
    profiles: Arc<dyn ProfileRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl UserService {
    pub fn new(profiles: Arc<dyn ProfileRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { profiles, identity }
    }

    pub async fn list(&self) -> Result<Vec<user_profile::Model>, ServiceError> {
        self.profiles.list().await
    }

    pub async fn get(&self, id: &str) -> Result<user_profile::Model, ServiceError> {
        self.profiles.get(id).await?.ok_or_else(|| ServiceError::not_found("User"))
    }

    /// Create the identity account with its role claim, then the profile.
    /// A failed profile write rolls the account back.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUserInput) -> Result<user_profile::Model, ServiceError> {
        let user = input.validate()?;
        let account = self
            .identity
            .create_account(NewAccount {
                email: user.email.clone(),
                password: user.password,
                display_name: user.display_name.clone(),
                role: Some(user.role),
            })
            .await?;

        let profile = NewProfile { id: account.uid.clone(), email: account.email, role: user.role, display_name: user.display_name };
        match self.profiles.insert(profile).await {
            Ok(created) => {
                info!(uid = %created.id, role = %created.role, "user_created");
                Ok(created)
            }
            Err(e) => {
                if let Err(undo) = self.identity.delete_account(&account.uid).await {
                    warn!(uid = %account.uid, error = %undo, "orphaned_identity_account");
                }
                Err(e)
            }
        }
    }

    /// Patch the profile; a role change is mirrored onto the identity claim.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: UpdateUserInput) -> Result<user_profile::Model, ServiceError> {
        let patch = input.validate()?;
        let before = self.get(id).await?;
        let role_change = patch.role.filter(|r| *r != before.role);

        let updated = self.profiles.update(id, patch).await?.ok_or_else(|| ServiceError::not_found("User"))?;
        if let Some(role) = role_change {
            if let Err(e) = self.identity.set_role(id, role).await {
                warn!(uid = %id, role = %role, error = %e, "role_claim_sync_failed");
            }
        }
        info!(uid = %updated.id, "user_updated");
        Ok(updated)
    }

    /// Remove the profile. Identity deletion is best effort.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.get(id).await?;
        if let Err(e) = self.identity.delete_account(id).await {
            warn!(uid = %id, error = %e, "identity_delete_failed");
        }
        self.profiles.delete(id).await?;
        info!(uid = %id, "user_deleted");
        Ok(())
    }

    /// Ensure an admin account and profile exist for `admin`. Safe to call on every start.
    #[instrument(skip(self, admin), fields(email = %admin.email))]
    pub async fn ensure_admin(&self, admin: &configs::BootstrapAdmin) -> Result<user_profile::Model, ServiceError> {
        let account = match self.identity.find_by_email(&admin.email).await? {
            Some(existing) => existing,
            None => {
                self.identity
                    .create_account(NewAccount {
                        email: admin.email.clone(),
                        password: admin.password.clone(),
                        display_name: admin.display_name.clone(),
                        role: Some(Role::Admin),
                    })
                    .await?
            }
        };
        if account.role != Some(Role::Admin) {
            self.identity.set_role(&account.uid, Role::Admin).await?;
        }

        if let Some(profile) = self.profiles.get(&account.uid).await? {
            if profile.role == Role::Admin {
                return Ok(profile);
            }
            let patch = super::domain::ProfilePatch { role: Some(Role::Admin), ..Default::default() };
            return self.profiles.update(&account.uid, patch).await?.ok_or_else(|| ServiceError::not_found("User"));
        }
        let created = self
            .profiles
            .insert(NewProfile { id: account.uid, email: account.email, role: Role::Admin, display_name: account.display_name })
            .await?;
        info!(uid = %created.id, "bootstrap_admin_created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::repository::mock::MockAccountRepository;
    use crate::identity::TokenIdentityProvider;
    use crate::repo::memory::MemoryStore;
    use crate::identity::errors::IdentityError;
    use crate::test_support::token_config;

    fn service() -> (UserService, Arc<dyn IdentityProvider>) {
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(TokenIdentityProvider::new(Arc::new(MockAccountRepository::default()), token_config()));
        (UserService::new(Arc::new(MemoryStore::default()), identity.clone()), identity)
    }

    fn create(email: &str, role: &str) -> CreateUserInput {
        CreateUserInput { email: email.into(), password: "Passw0rd!".into(), role: role.into(), display_name: "Staff".into() }
    }

    #[tokio::test]
    async fn create_sets_claim_and_profile() {
        let (users, identity) = service();
        let profile = users.create(create("a@example.com", "admin")).await.unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(identity.role_of(&profile.id).await.unwrap(), Some(Role::Admin));
        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (users, _) = service();
        users.create(create("a@example.com", "worker")).await.unwrap();
        let err = users.create(create("a@example.com", "worker")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Identity(IdentityError::Conflict)));
    }

    #[tokio::test]
    async fn role_change_syncs_claim() {
        let (users, identity) = service();
        let profile = users.create(create("w@example.com", "worker")).await.unwrap();
        let patch: UpdateUserInput = serde_json::from_value(serde_json::json!({ "role": "admin", "id": profile.id })).unwrap();
        let updated = users.update(&profile.id, patch).await.unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(identity.role_of(&profile.id).await.unwrap(), Some(Role::Admin));
        assert!(updated.updated_at >= profile.updated_at);
    }

    #[tokio::test]
    async fn delete_removes_both_sides() {
        let (users, identity) = service();
        let profile = users.create(create("w@example.com", "worker")).await.unwrap();
        users.delete(&profile.id).await.unwrap();
        assert!(matches!(users.get(&profile.id).await, Err(ServiceError::NotFound(_))));
        assert!(identity.find_by_uid(&profile.id).await.unwrap().is_none());
        assert!(matches!(users.delete(&profile.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_tolerates_missing_identity_account() {
        let (users, identity) = service();
        let profile = users.create(create("w@example.com", "worker")).await.unwrap();
        identity.delete_account(&profile.id).await.unwrap();
        users.delete(&profile.id).await.unwrap();
        assert!(users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bootstrap_admin_is_idempotent() {
        let (users, identity) = service();
        let admin = configs::BootstrapAdmin {
            email: "owner@example.com".into(),
            password: "Passw0rd!".into(),
            display_name: "Owner".into(),
        };
        let first = users.ensure_admin(&admin).await.unwrap();
        let second = users.ensure_admin(&admin).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(users.list().await.unwrap().len(), 1);
        assert_eq!(identity.role_of(&first.id).await.unwrap(), Some(Role::Admin));
    }
}
