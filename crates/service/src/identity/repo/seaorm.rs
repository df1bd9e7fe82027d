use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr};

use models::{identity_account, Role};

use crate::identity::domain::Account;
use crate::identity::errors::IdentityError;
use crate::identity::repository::{AccountRepository, StoredAccount};
use crate::repo::seaorm::store_unreachable;

pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

fn to_stored(m: identity_account::Model) -> StoredAccount {
    StoredAccount {
        account: Account { uid: m.uid, email: m.email, display_name: m.display_name, role: m.role_claim, created_at: m.created_at },
        password_hash: m.password_hash,
    }
}

fn repo_err(e: DbErr) -> IdentityError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return IdentityError::Conflict;
    }
    if store_unreachable(&e) {
        IdentityError::Unavailable(e.to_string())
    } else {
        IdentityError::Repository(e.to_string())
    }
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<StoredAccount>, IdentityError> {
        let found = identity_account::Entity::find_by_id(uid.to_string()).one(&self.db).await.map_err(repo_err)?;
        Ok(found.map(to_stored))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, IdentityError> {
        let found = identity_account::Entity::find()
            .filter(identity_account::Column::Email.eq(email.to_string()))
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(found.map(to_stored))
    }

    async fn insert(&self, email: &str, display_name: &str, password_hash: String, role: Option<Role>) -> Result<Account, IdentityError> {
        let am = identity_account::ActiveModel {
            uid: Set(uuid::Uuid::new_v4().simple().to_string()),
            email: Set(email.to_string()),
            display_name: Set(display_name.to_string()),
            password_hash: Set(password_hash),
            role_claim: Set(role),
            created_at: Set(Utc::now().into()),
        };
        let created = am.insert(&self.db).await.map_err(repo_err)?;
        Ok(to_stored(created).account)
    }

    async fn delete(&self, uid: &str) -> Result<bool, IdentityError> {
        let res = identity_account::Entity::delete_by_id(uid.to_string()).exec(&self.db).await.map_err(repo_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn set_role(&self, uid: &str, role: Role) -> Result<bool, IdentityError> {
        let Some(found) = identity_account::Entity::find_by_id(uid.to_string()).one(&self.db).await.map_err(repo_err)? else {
            return Ok(false);
        };
        let mut am: identity_account::ActiveModel = found.into();
        am.role_claim = Set(Some(role));
        am.update(&self.db).await.map_err(repo_err)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn unmigrated_schema_is_unavailable() {
        let missing = DbErr::Query(RuntimeErr::Internal("relation \"identity_account\" does not exist".into()));
        assert!(matches!(repo_err(missing), IdentityError::Unavailable(_)));
        let refused = DbErr::Conn(RuntimeErr::Internal("connection refused".into()));
        assert!(matches!(repo_err(refused), IdentityError::Unavailable(_)));
        assert!(matches!(repo_err(DbErr::Custom("bad row".into())), IdentityError::Repository(_)));
    }
}
