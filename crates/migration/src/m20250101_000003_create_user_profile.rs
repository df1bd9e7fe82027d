//! Create `user_profile` table.
//!
//! Mirrors identity-provider accounts; the primary key is the provider uid.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(string_len(UserProfile::Id, 128).primary_key())
                    .col(string_len(UserProfile::Email, 255).unique_key().not_null())
                    .col(string_len(UserProfile::Role, 16).not_null())
                    .col(string_len(UserProfile::DisplayName, 128).not_null())
                    .col(timestamp_with_time_zone(UserProfile::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(UserProfile::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserProfile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserProfile { Table, Id, Email, Role, DisplayName, CreatedAt, UpdatedAt }
