use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Bike: list ordering and status filter
        manager
            .create_index(
                Index::create()
                    .name("idx_bike_created_at")
                    .table(Bike::Table)
                    .col(Bike::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_bike_status")
                    .table(Bike::Table)
                    .col(Bike::Status)
                    .to_owned(),
            )
            .await?;

        // Sale: at most one sale per bike
        manager
            .create_index(
                Index::create()
                    .name("uniq_sale_bike")
                    .table(Sale::Table)
                    .col(Sale::BikeId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_sale_date")
                    .table(Sale::Table)
                    .col(Sale::SaleDate)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sale_date").table(Sale::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_sale_bike").table(Sale::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bike_status").table(Bike::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bike_created_at").table(Bike::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Bike { Table, CreatedAt, Status }

#[derive(DeriveIden)]
enum Sale { Table, BikeId, SaleDate }
