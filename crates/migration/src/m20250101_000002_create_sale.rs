//! Create `sale` table.
//!
//! Snapshot of the bike at sale time plus customer details. `bike_id` is not a
//! foreign key: bike deletion removes dependent sales explicitly.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sale::Table)
                    .if_not_exists()
                    .col(uuid(Sale::Id).primary_key())
                    .col(uuid(Sale::BikeId).not_null())
                    .col(string_len(Sale::BikeName, 255).not_null())
                    .col(integer(Sale::BikeYear).not_null())
                    .col(double(Sale::PurchasePrice).not_null())
                    .col(double(Sale::SalePrice).not_null())
                    .col(double(Sale::Profit).not_null())
                    .col(string_len(Sale::CustomerName, 255).not_null())
                    .col(string_len(Sale::CustomerEmail, 255).not_null())
                    .col(string_len(Sale::CustomerPhone, 32).not_null())
                    .col(string_len(Sale::CustomerAadhar, 12).not_null())
                    .col(text(Sale::CustomerAddress).not_null())
                    .col(string_len(Sale::SoldBy, 128).not_null())
                    .col(timestamp_with_time_zone(Sale::SaleDate).not_null())
                    .col(timestamp_with_time_zone(Sale::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Sale::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Sale {
    Table,
    Id,
    BikeId,
    BikeName,
    BikeYear,
    PurchasePrice,
    SalePrice,
    Profit,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    CustomerAadhar,
    CustomerAddress,
    SoldBy,
    SaleDate,
    CreatedAt,
}
