use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{info, instrument};

use models::{bike, BikeStatus};

use super::domain::{CreateBikeInput, UpdateBikeInput};
use crate::errors::{parse_id, ServiceError};
use crate::repo::BikeRepository;

pub struct InventoryService {
    bikes: Arc<dyn BikeRepository>,
}

impl InventoryService {
    pub fn new(bikes: Arc<dyn BikeRepository>) -> Self { Self { bikes } }

    /// All bikes, newest first. `status` accepts `available` or `sold`.
    pub async fn list(&self, status: Option<&str>) -> Result<Vec<bike::Model>, ServiceError> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => Some(
                BikeStatus::parse(raw)
                    .ok_or_else(|| ServiceError::Validation("status must be either available or sold".into()))?,
            ),
        };
        self.bikes.list(status).await
    }

    pub async fn get(&self, id: &str) -> Result<bike::Model, ServiceError> {
        let id = parse_id(id, "Bike")?;
        self.bikes.get(id).await?.ok_or_else(|| ServiceError::not_found("Bike"))
    }

    #[instrument(skip(self, input), fields(added_by = %added_by))]
    pub async fn create(&self, added_by: &str, input: CreateBikeInput) -> Result<bike::Model, ServiceError> {
        let new_bike = input.validate(Utc::now().year())?;
        let created = self.bikes.create(added_by, new_bike).await?;
        info!(bike_id = %created.id, bike_name = %created.bike_name, "bike_created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: UpdateBikeInput) -> Result<bike::Model, ServiceError> {
        let id = parse_id(id, "Bike")?;
        let patch = input.validate(Utc::now().year())?;
        let updated = self.bikes.update(id, patch).await?.ok_or_else(|| ServiceError::not_found("Bike"))?;
        info!(bike_id = %updated.id, "bike_updated");
        Ok(updated)
    }

    /// Remove a bike together with any sale that references it. Returns the number of sales removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<u64, ServiceError> {
        let id = parse_id(id, "Bike")?;
        let removed = self.bikes.delete_cascade(id).await?.ok_or_else(|| ServiceError::not_found("Bike"))?;
        info!(bike_id = %id, sales_removed = removed, "bike_deleted");
        Ok(removed)
    }
}
