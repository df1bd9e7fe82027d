//! Process-local store backing all three repositories.
//!
//! One lock guards every collection, so multi-document transitions are atomic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::{bike, sale, user_profile, BikeStatus};

use super::{BikeRepository, ProfileRepository, SaleRepository};
use crate::errors::ServiceError;
use crate::inventory::domain::{BikePatch, NewBike, SOLD_PRICE_FROZEN};
use crate::sales::domain::{build_sale, NewSale, ResetSummary, SaleOutcome};
use crate::users::domain::{NewProfile, ProfilePatch};

#[derive(Default)]
struct Collections {
    bikes: HashMap<Uuid, bike::Model>,
    sales: HashMap<Uuid, sale::Model>,
    profiles: HashMap<String, user_profile::Model>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

#[async_trait]
impl BikeRepository for MemoryStore {
    async fn create(&self, added_by: &str, bike: NewBike) -> Result<bike::Model, ServiceError> {
        let model = bike.into_model(added_by, Utc::now());
        self.inner.write().await.bikes.insert(model.id, model.clone());
        Ok(model)
    }

    async fn list(&self, status: Option<BikeStatus>) -> Result<Vec<bike::Model>, ServiceError> {
        let guard = self.inner.read().await;
        let mut out: Vec<_> = guard.bikes.values().filter(|b| status.map_or(true, |s| b.status == s)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> Result<Option<bike::Model>, ServiceError> {
        Ok(self.inner.read().await.bikes.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, patch: BikePatch) -> Result<Option<bike::Model>, ServiceError> {
        let mut guard = self.inner.write().await;
        let Some(bike) = guard.bikes.get_mut(&id) else { return Ok(None) };
        if patch.moves_sold_price(bike) {
            return Err(ServiceError::Conflict(SOLD_PRICE_FROZEN.into()));
        }
        patch.apply(bike, Utc::now());
        Ok(Some(bike.clone()))
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<Option<u64>, ServiceError> {
        let mut guard = self.inner.write().await;
        if guard.bikes.remove(&id).is_none() {
            return Ok(None);
        }
        let before = guard.sales.len();
        guard.sales.retain(|_, s| s.bike_id != id);
        Ok(Some((before - guard.sales.len()) as u64))
    }
}

#[async_trait]
impl SaleRepository for MemoryStore {
    async fn record_sale(&self, bike_id: Uuid, sold_by: &str, input: NewSale) -> Result<SaleOutcome, ServiceError> {
        let mut guard = self.inner.write().await;
        let now = Utc::now();
        let sale = {
            let Some(bike) = guard.bikes.get_mut(&bike_id) else { return Ok(SaleOutcome::BikeNotFound) };
            if bike.is_sold() {
                return Ok(SaleOutcome::AlreadySold);
            }
            bike.status = BikeStatus::Sold;
            bike.updated_at = now.into();
            build_sale(bike, &input, sold_by, now.into())
        };
        guard.sales.insert(sale.id, sale.clone());
        Ok(SaleOutcome::Recorded(sale))
    }

    async fn list(&self) -> Result<Vec<sale::Model>, ServiceError> {
        let guard = self.inner.read().await;
        let mut out: Vec<_> = guard.sales.values().cloned().collect();
        out.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> Result<Option<sale::Model>, ServiceError> {
        Ok(self.inner.read().await.sales.get(&id).cloned())
    }

    async fn find_by_bike(&self, bike_id: Uuid) -> Result<Option<sale::Model>, ServiceError> {
        Ok(self.inner.read().await.sales.values().find(|s| s.bike_id == bike_id).cloned())
    }

    async fn reset_all(&self) -> Result<ResetSummary, ServiceError> {
        let mut guard = self.inner.write().await;
        let sales_deleted = guard.sales.len() as u64;
        guard.sales.clear();
        let now = Utc::now();
        let mut bikes_reset = 0;
        for bike in guard.bikes.values_mut().filter(|b| b.is_sold()) {
            bike.status = BikeStatus::Available;
            bike.updated_at = now.into();
            bikes_reset += 1;
        }
        Ok(ResetSummary { sales_deleted, bikes_reset })
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn insert(&self, profile: NewProfile) -> Result<user_profile::Model, ServiceError> {
        let mut guard = self.inner.write().await;
        if guard.profiles.contains_key(&profile.id) || guard.profiles.values().any(|p| p.email == profile.email) {
            return Err(ServiceError::Conflict("User already exists".into()));
        }
        let now = Utc::now().into();
        let model = user_profile::Model {
            id: profile.id,
            email: profile.email,
            role: profile.role,
            display_name: profile.display_name,
            created_at: now,
            updated_at: now,
        };
        guard.profiles.insert(model.id.clone(), model.clone());
        Ok(model)
    }

    async fn list(&self) -> Result<Vec<user_profile::Model>, ServiceError> {
        let guard = self.inner.read().await;
        let mut out: Vec<_> = guard.profiles.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<user_profile::Model>, ServiceError> {
        Ok(self.inner.read().await.profiles.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user_profile::Model>, ServiceError> {
        Ok(self.inner.read().await.profiles.values().find(|p| p.email == email).cloned())
    }

    async fn update(&self, id: &str, patch: ProfilePatch) -> Result<Option<user_profile::Model>, ServiceError> {
        let mut guard = self.inner.write().await;
        let Some(profile) = guard.profiles.get_mut(id) else { return Ok(None) };
        if let Some(v) = patch.email { profile.email = v; }
        if let Some(v) = patch.role { profile.role = v; }
        if let Some(v) = patch.display_name { profile.display_name = v; }
        profile.updated_at = Utc::now().into();
        Ok(Some(profile.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.inner.write().await.profiles.remove(id).is_some())
    }
}
