//! Create `bike` table.
//!
//! One row per motorcycle in stock; `status` is `available` until sold.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bike::Table)
                    .if_not_exists()
                    .col(uuid(Bike::Id).primary_key())
                    .col(string_len(Bike::BikeName, 255).not_null())
                    .col(integer(Bike::Year).not_null())
                    .col(string_len(Bike::RegistrationNumber, 64).not_null())
                    .col(string_len(Bike::OwnerPhone, 32).not_null())
                    .col(string_len(Bike::OwnerAadhar, 12).not_null())
                    .col(text(Bike::OwnerAddress).not_null())
                    .col(double(Bike::PurchasePrice).not_null())
                    .col(double(Bike::SellingPrice).not_null())
                    .col(ColumnDef::new(Bike::BikeImageUrl).text().null())
                    .col(ColumnDef::new(Bike::AadharImageUrl).text().null())
                    .col(string_len(Bike::Status, 16).not_null())
                    .col(string_len(Bike::AddedBy, 128).not_null())
                    .col(timestamp_with_time_zone(Bike::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Bike::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Bike::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Bike {
    Table,
    Id,
    BikeName,
    Year,
    RegistrationNumber,
    OwnerPhone,
    OwnerAadhar,
    OwnerAddress,
    PurchasePrice,
    SellingPrice,
    BikeImageUrl,
    AadharImageUrl,
    Status,
    AddedBy,
    CreatedAt,
    UpdatedAt,
}
