use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::errors::ModelError;
use models::sale::{self, compute_profit};
use models::validate::{is_aadhar, is_amount, is_email, is_present, Violations};
use models::bike;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkSoldInput {
    pub sale_price: Option<f64>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_aadhar: String,
    pub customer_address: String,
}

/// Validated buyer details and agreed price.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub sale_price: f64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_aadhar: String,
    pub customer_address: String,
}

impl MarkSoldInput {
    pub fn validate(self) -> Result<NewSale, ModelError> {
        let mut v = Violations::new();
        v.check(self.sale_price.is_some_and(is_amount), "salePrice", "Sale price must be a positive number")
            .check(is_present(&self.customer_name), "customerName", "Customer name is required")
            .check(is_email(&self.customer_email), "customerEmail", "Valid email is required")
            .check(is_present(&self.customer_phone), "customerPhone", "Phone number is required")
            .check(is_aadhar(self.customer_aadhar.trim()), "customerAadhar", "Aadhar number must be exactly 12 digits")
            .check(is_present(&self.customer_address), "customerAddress", "Address is required");
        v.finish()?;

        Ok(NewSale {
            sale_price: self.sale_price.unwrap_or_default(),
            customer_name: self.customer_name.trim().to_string(),
            customer_email: self.customer_email.trim().to_string(),
            customer_phone: self.customer_phone.trim().to_string(),
            customer_aadhar: self.customer_aadhar.trim().to_string(),
            customer_address: self.customer_address.trim().to_string(),
        })
    }
}

/// Result of an attempted sale transition.
#[derive(Debug, Clone)]
pub enum SaleOutcome {
    Recorded(sale::Model),
    BikeNotFound,
    AlreadySold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub sales_deleted: u64,
    pub bikes_reset: u64,
}

/// Snapshot the bike's name, year and purchase price into a sale so later
/// edits to the bike never rewrite history.
pub fn build_sale(bike: &bike::Model, input: &NewSale, sold_by: &str, at: DateTimeWithTimeZone) -> sale::Model {
    sale::Model {
        id: Uuid::new_v4(),
        bike_id: bike.id,
        bike_name: bike.bike_name.clone(),
        bike_year: bike.year,
        purchase_price: bike.purchase_price,
        sale_price: input.sale_price,
        profit: compute_profit(input.sale_price, bike.purchase_price),
        customer_name: input.customer_name.clone(),
        customer_email: input.customer_email.clone(),
        customer_phone: input.customer_phone.clone(),
        customer_aadhar: input.customer_aadhar.clone(),
        customer_address: input.customer_address.clone(),
        sold_by: sold_by.to_string(),
        sale_date: at,
        created_at: at,
    }
}
