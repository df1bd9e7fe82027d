use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, SqlErr, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use models::{bike, sale, user_profile, BikeStatus};

use super::{BikeRepository, ProfileRepository, SaleRepository};
use crate::errors::ServiceError;
use crate::inventory::domain::{BikePatch, NewBike, SOLD_PRICE_FROZEN};
use crate::sales::domain::{build_sale, NewSale, ResetSummary, SaleOutcome};
use crate::users::domain::{NewProfile, ProfilePatch};

/// Postgres-backed store for bikes, sales and profiles.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// Lost connections and missing tables mean the store is not usable yet.
pub(crate) fn store_unreachable(e: &DbErr) -> bool {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => true,
        other => {
            let missing = other.to_string().contains("does not exist");
            if missing {
                warn!(error = %other, "schema_missing");
            }
            missing
        }
    }
}

/// Map driver errors onto service errors: unique violations are conflicts.
pub(crate) fn db_err(e: DbErr) -> ServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        return ServiceError::Conflict(format!("duplicate record: {}", detail));
    }
    if store_unreachable(&e) {
        ServiceError::Unavailable(e.to_string())
    } else {
        ServiceError::Db(e.to_string())
    }
}

fn bike_row(m: bike::Model) -> bike::ActiveModel {
    bike::ActiveModel {
        id: Set(m.id),
        bike_name: Set(m.bike_name),
        year: Set(m.year),
        registration_number: Set(m.registration_number),
        owner_phone: Set(m.owner_phone),
        owner_aadhar: Set(m.owner_aadhar),
        owner_address: Set(m.owner_address),
        purchase_price: Set(m.purchase_price),
        selling_price: Set(m.selling_price),
        bike_image_url: Set(m.bike_image_url),
        aadhar_image_url: Set(m.aadhar_image_url),
        status: Set(m.status),
        added_by: Set(m.added_by),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}

fn sale_row(m: sale::Model) -> sale::ActiveModel {
    sale::ActiveModel {
        id: Set(m.id),
        bike_id: Set(m.bike_id),
        bike_name: Set(m.bike_name),
        bike_year: Set(m.bike_year),
        purchase_price: Set(m.purchase_price),
        sale_price: Set(m.sale_price),
        profit: Set(m.profit),
        customer_name: Set(m.customer_name),
        customer_email: Set(m.customer_email),
        customer_phone: Set(m.customer_phone),
        customer_aadhar: Set(m.customer_aadhar),
        customer_address: Set(m.customer_address),
        sold_by: Set(m.sold_by),
        sale_date: Set(m.sale_date),
        created_at: Set(m.created_at),
    }
}

#[async_trait]
impl BikeRepository for SeaOrmStore {
    async fn create(&self, added_by: &str, bike: NewBike) -> Result<bike::Model, ServiceError> {
        bike_row(bike.into_model(added_by, Utc::now())).insert(&self.db).await.map_err(db_err)
    }

    async fn list(&self, status: Option<BikeStatus>) -> Result<Vec<bike::Model>, ServiceError> {
        let mut query = bike::Entity::find().order_by_desc(bike::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(bike::Column::Status.eq(status));
        }
        query.all(&self.db).await.map_err(db_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<bike::Model>, ServiceError> {
        bike::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn update(&self, id: Uuid, patch: BikePatch) -> Result<Option<bike::Model>, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        // Row lock: a sale recorded concurrently waits for this commit, or this waits for it.
        let Some(mut current) = bike::Entity::find_by_id(id).lock_exclusive().one(&txn).await.map_err(db_err)? else {
            return Ok(None);
        };
        if patch.moves_sold_price(&current) {
            return Err(ServiceError::Conflict(SOLD_PRICE_FROZEN.into()));
        }
        let original = current.clone();
        patch.apply(&mut current, Utc::now());

        let mut am: bike::ActiveModel = original.into();
        am.bike_name = Set(current.bike_name);
        am.year = Set(current.year);
        am.registration_number = Set(current.registration_number);
        am.owner_phone = Set(current.owner_phone);
        am.owner_aadhar = Set(current.owner_aadhar);
        am.owner_address = Set(current.owner_address);
        am.purchase_price = Set(current.purchase_price);
        am.selling_price = Set(current.selling_price);
        am.bike_image_url = Set(current.bike_image_url);
        am.aadhar_image_url = Set(current.aadhar_image_url);
        am.updated_at = Set(current.updated_at);
        let updated = am.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(Some(updated))
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<Option<u64>, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let removed = bike::Entity::delete_by_id(id).exec(&txn).await.map_err(db_err)?;
        if removed.rows_affected == 0 {
            return Ok(None);
        }
        let sales = sale::Entity::delete_many()
            .filter(sale::Column::BikeId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(Some(sales.rows_affected))
    }
}

#[async_trait]
impl SaleRepository for SeaOrmStore {
    async fn record_sale(&self, bike_id: Uuid, sold_by: &str, input: NewSale) -> Result<SaleOutcome, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let Some(bike) = bike::Entity::find_by_id(bike_id).lock_exclusive().one(&txn).await.map_err(db_err)? else {
            return Ok(SaleOutcome::BikeNotFound);
        };
        if bike.is_sold() {
            return Ok(SaleOutcome::AlreadySold);
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        // Conditional flip: a concurrent sale that committed first leaves zero rows to update.
        let flipped = bike::Entity::update_many()
            .col_expr(bike::Column::Status, Expr::value(BikeStatus::Sold.to_value()))
            .col_expr(bike::Column::UpdatedAt, Expr::value(now))
            .filter(bike::Column::Id.eq(bike_id))
            .filter(bike::Column::Status.eq(BikeStatus::Available))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if flipped.rows_affected == 0 {
            return Ok(SaleOutcome::AlreadySold);
        }

        let recorded = sale_row(build_sale(&bike, &input, sold_by, now)).insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(SaleOutcome::Recorded(recorded))
    }

    async fn list(&self) -> Result<Vec<sale::Model>, ServiceError> {
        sale::Entity::find().order_by_desc(sale::Column::SaleDate).all(&self.db).await.map_err(db_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<sale::Model>, ServiceError> {
        sale::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn find_by_bike(&self, bike_id: Uuid) -> Result<Option<sale::Model>, ServiceError> {
        sale::Entity::find().filter(sale::Column::BikeId.eq(bike_id)).one(&self.db).await.map_err(db_err)
    }

    async fn reset_all(&self) -> Result<ResetSummary, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let sales = sale::Entity::delete_many().exec(&txn).await.map_err(db_err)?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        let bikes = bike::Entity::update_many()
            .col_expr(bike::Column::Status, Expr::value(BikeStatus::Available.to_value()))
            .col_expr(bike::Column::UpdatedAt, Expr::value(now))
            .filter(bike::Column::Status.eq(BikeStatus::Sold))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(ResetSummary { sales_deleted: sales.rows_affected, bikes_reset: bikes.rows_affected })
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmStore {
    async fn insert(&self, profile: NewProfile) -> Result<user_profile::Model, ServiceError> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        user_profile::ActiveModel {
            id: Set(profile.id),
            email: Set(profile.email),
            role: Set(profile.role),
            display_name: Set(profile.display_name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    async fn list(&self) -> Result<Vec<user_profile::Model>, ServiceError> {
        user_profile::Entity::find().order_by_asc(user_profile::Column::CreatedAt).all(&self.db).await.map_err(db_err)
    }

    async fn get(&self, id: &str) -> Result<Option<user_profile::Model>, ServiceError> {
        user_profile::Entity::find_by_id(id.to_string()).one(&self.db).await.map_err(db_err)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user_profile::Model>, ServiceError> {
        user_profile::Entity::find()
            .filter(user_profile::Column::Email.eq(email.to_string()))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn update(&self, id: &str, patch: ProfilePatch) -> Result<Option<user_profile::Model>, ServiceError> {
        let Some(found) = user_profile::Entity::find_by_id(id.to_string()).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        let mut am: user_profile::ActiveModel = found.into();
        if let Some(v) = patch.email { am.email = Set(v); }
        if let Some(v) = patch.role { am.role = Set(v); }
        if let Some(v) = patch.display_name { am.display_name = Set(v); }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map(Some).map_err(db_err)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let res = user_profile::Entity::delete_by_id(id.to_string()).exec(&self.db).await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn driver_errors_are_classified() {
        let missing = DbErr::Query(RuntimeErr::Internal("relation \"bike\" does not exist".into()));
        assert!(matches!(db_err(missing), ServiceError::Unavailable(_)));
        let acquire = DbErr::ConnectionAcquire(sea_orm::ConnAcquireErr::Timeout);
        assert!(matches!(db_err(acquire), ServiceError::Unavailable(_)));
        assert!(matches!(db_err(DbErr::Custom("bad row".into())), ServiceError::Db(_)));
    }
}
