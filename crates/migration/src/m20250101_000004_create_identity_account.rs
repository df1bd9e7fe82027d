//! Create `identity_account` table backing the bundled token identity provider.
//!
//! `role_claim` is the custom claim consulted on every authenticated request.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdentityAccount::Table)
                    .if_not_exists()
                    .col(string_len(IdentityAccount::Uid, 128).primary_key())
                    .col(string_len(IdentityAccount::Email, 255).unique_key().not_null())
                    .col(string_len(IdentityAccount::DisplayName, 128).not_null())
                    .col(string_len(IdentityAccount::PasswordHash, 255).not_null())
                    .col(ColumnDef::new(IdentityAccount::RoleClaim).string_len(16).null())
                    .col(timestamp_with_time_zone(IdentityAccount::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(IdentityAccount::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum IdentityAccount { Table, Uid, Email, DisplayName, PasswordHash, RoleClaim, CreatedAt }
