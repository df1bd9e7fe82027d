//! Repository traits over the document collections, plus the SeaORM and
//! in-memory implementations.
//!
//! Multi-document transitions (sale recording, cascade delete, bulk reset) are
//! single repository calls so each implementation can make them atomic.

use async_trait::async_trait;
use uuid::Uuid;

use models::{bike, sale, user_profile, BikeStatus};

use crate::errors::ServiceError;
use crate::inventory::domain::{BikePatch, NewBike};
use crate::sales::domain::{NewSale, ResetSummary, SaleOutcome};
use crate::users::domain::{NewProfile, ProfilePatch};

pub mod memory;
pub mod seaorm;

#[async_trait]
pub trait BikeRepository: Send + Sync {
    /// Insert as `available`, stamping creation/update time.
    async fn create(&self, added_by: &str, bike: NewBike) -> Result<bike::Model, ServiceError>;
    /// Newest first, optionally restricted to one status.
    async fn list(&self, status: Option<BikeStatus>) -> Result<Vec<bike::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<bike::Model>, ServiceError>;
    /// Apply present fields; `None` when the bike does not exist. Rejects with
    /// `Conflict` when the patch would move a sold bike's purchase price, checked
    /// in the same unit of work as the write.
    async fn update(&self, id: Uuid, patch: BikePatch) -> Result<Option<bike::Model>, ServiceError>;
    /// Delete the bike and every sale referencing it. `None` when the bike does not exist,
    /// otherwise the number of sales removed.
    async fn delete_cascade(&self, id: Uuid) -> Result<Option<u64>, ServiceError>;
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Flip the bike to `sold` and store the sale snapshot, only if the bike is still available.
    async fn record_sale(&self, bike_id: Uuid, sold_by: &str, sale: NewSale) -> Result<SaleOutcome, ServiceError>;
    /// Newest sale first.
    async fn list(&self) -> Result<Vec<sale::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<sale::Model>, ServiceError>;
    async fn find_by_bike(&self, bike_id: Uuid) -> Result<Option<sale::Model>, ServiceError>;
    /// Delete every sale and revert every sold bike to available.
    async fn reset_all(&self) -> Result<ResetSummary, ServiceError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn insert(&self, profile: NewProfile) -> Result<user_profile::Model, ServiceError>;
    async fn list(&self) -> Result<Vec<user_profile::Model>, ServiceError>;
    async fn get(&self, id: &str) -> Result<Option<user_profile::Model>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<user_profile::Model>, ServiceError>;
    async fn update(&self, id: &str, patch: ProfilePatch) -> Result<Option<user_profile::Model>, ServiceError>;
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}
