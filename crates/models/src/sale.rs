use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Completed sale. The bike fields are a snapshot taken when the sale was
/// recorded and never follow later edits to the bike.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bike_id: Uuid,
    pub bike_name: String,
    pub bike_year: i32,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub profit: f64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_aadhar: String,
    pub customer_address: String,
    pub sold_by: String,
    pub sale_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn compute_profit(sale_price: f64, purchase_price: f64) -> f64 {
    sale_price - purchase_price
}
