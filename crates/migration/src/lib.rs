//! Migrator registering table migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_bike;
mod m20250101_000002_create_sale;
mod m20250101_000003_create_user_profile;
mod m20250101_000004_create_identity_account;
mod m20250101_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_bike::Migration),
            Box::new(m20250101_000002_create_sale::Migration),
            Box::new(m20250101_000003_create_user_profile::Migration),
            Box::new(m20250101_000004_create_identity_account::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000005_add_indexes::Migration),
        ]
    }
}
