use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, Params, PasswordHash};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use models::validate::{is_email, is_present};
use models::Role;

use super::domain::{Account, Claims, IssuedToken, NewAccount, VerifiedIdentity};
use super::errors::IdentityError;
use super::provider::IdentityProvider;
use super::repository::AccountRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Token provider configuration
#[derive(Clone)]
pub struct TokenConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Argon2 cost for new hashes. Verification reads the cost from the stored hash.
    pub hash_params: Params,
}

impl TokenConfig {
    pub fn from_identity(cfg: &configs::IdentityConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            token_ttl: Duration::hours(cfg.token_ttl_hours),
            hash_params: Params::default(),
        }
    }
}

/// HS256 bearer tokens over a password account store.
pub struct TokenIdentityProvider<R: AccountRepository> {
    repo: Arc<R>,
    cfg: TokenConfig,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<R: AccountRepository> TokenIdentityProvider<R> {
    pub fn new(repo: Arc<R>, cfg: TokenConfig) -> Self { Self { repo, cfg } }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, self.cfg.hash_params.clone())
    }

    fn hash_password(&self, password: &str) -> Result<String, IdentityError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::HashError(e.to_string()))?
            .to_string())
    }

    /// Sign a token for `account`.
    ///
    /// # Examples
    /// ```
    /// use service::identity::{TokenIdentityProvider, TokenConfig, IdentityProvider};
    /// use service::identity::domain::NewAccount;
    /// use service::identity::repository::mock::MockAccountRepository;
    /// use std::sync::Arc;
    /// let cfg = TokenConfig {
    ///     jwt_secret: "doc-test-secret-0123456789".into(),
    ///     token_ttl: chrono::Duration::hours(1),
    ///     hash_params: argon2::Params::new(1024, 1, 1, None).unwrap(),
    /// };
    /// let idp = TokenIdentityProvider::new(Arc::new(MockAccountRepository::default()), cfg);
    /// let account = tokio_test::block_on(idp.create_account(NewAccount {
    ///     email: "asha@example.com".into(), password: "Passw0rd!".into(),
    ///     display_name: "Asha".into(), role: None,
    /// })).unwrap();
    /// let issued = idp.issue_token(&account).unwrap();
    /// let who = tokio_test::block_on(idp.verify_token(&issued.token)).unwrap();
    /// assert_eq!(who.uid, account.uid);
    /// ```
    pub fn issue_token(&self, account: &Account) -> Result<IssuedToken, IdentityError> {
        let now = Utc::now();
        let expires_at = now + self.cfg.token_ttl;
        let claims = Claims { sub: account.uid.clone(), email: account.email.clone(), iat: now.timestamp(), exp: expires_at.timestamp() };
        let token = encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| IdentityError::TokenError(e.to_string()))?;
        Ok(IssuedToken {
            token,
            uid: account.uid.clone(),
            email: account.email.clone(),
            role: account.role.unwrap_or(Role::Worker),
            expires_at,
        })
    }
}

#[async_trait]
impl<R: AccountRepository + 'static> IdentityProvider for TokenIdentityProvider<R> {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let data = decode::<Claims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &Validation::new(Algorithm::HS256))
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        Ok(VerifiedIdentity { uid: data.claims.sub, email: data.claims.email })
    }

    async fn role_of(&self, uid: &str) -> Result<Option<Role>, IdentityError> {
        let stored = self.repo.find_by_uid(uid).await?.ok_or(IdentityError::NotFound)?;
        Ok(stored.account.role)
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<Account>, IdentityError> {
        Ok(self.repo.find_by_uid(uid).await?.map(|s| s.account))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
        Ok(self.repo.find_by_email(&normalize_email(email)).await?.map(|s| s.account))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn create_account(&self, input: NewAccount) -> Result<Account, IdentityError> {
        let email = normalize_email(&input.email);
        if !is_email(&email) {
            return Err(IdentityError::Validation("invalid email".into()));
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(IdentityError::Validation(format!("password too short (>={})", MIN_PASSWORD_LEN)));
        }
        if !is_present(&input.display_name) {
            return Err(IdentityError::Validation("display name required".into()));
        }
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!("account exists: {}", existing.account.uid);
            return Err(IdentityError::Conflict);
        }

        let hash = self.hash_password(&input.password)?;
        let account = self.repo.insert(&email, input.display_name.trim(), hash, input.role).await?;
        info!(uid = %account.uid, email = %account.email, "account_created");
        Ok(account)
    }

    async fn delete_account(&self, uid: &str) -> Result<(), IdentityError> {
        if self.repo.delete(uid).await? { Ok(()) } else { Err(IdentityError::NotFound) }
    }

    async fn set_role(&self, uid: &str, role: Role) -> Result<(), IdentityError> {
        if self.repo.set_role(uid, role).await? {
            info!(uid = %uid, role = %role, "role_claim_set");
            Ok(())
        } else {
            Err(IdentityError::NotFound)
        }
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<IssuedToken, IdentityError> {
        let stored = self
            .repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&stored.password_hash).map_err(|e| IdentityError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
            return Err(IdentityError::InvalidCredentials);
        }
        self.issue_token(&stored.account)
    }
}
