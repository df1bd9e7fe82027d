use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;

use models::bike;
use models::errors::ModelError;
use models::validate::{is_aadhar, is_amount, is_present, is_valid_year, Violations};
use models::BikeStatus;

/// Intake payload as posted by the front office.
///
/// Every field defaults so missing values surface as field violations rather
/// than a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBikeInput {
    pub bike_name: String,
    pub year: Option<i32>,
    pub registration_number: String,
    pub owner_phone: String,
    pub owner_aadhar: String,
    pub owner_address: String,
    pub purchase_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub bike_image_url: Option<String>,
    pub aadhar_image_url: Option<String>,
}

/// Validated intake, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBike {
    pub bike_name: String,
    pub year: i32,
    pub registration_number: String,
    pub owner_phone: String,
    pub owner_aadhar: String,
    pub owner_address: String,
    pub purchase_price: f64,
    pub selling_price: f64,
    pub bike_image_url: Option<String>,
    pub aadhar_image_url: Option<String>,
}

impl CreateBikeInput {
    pub fn validate(self, current_year: i32) -> Result<NewBike, ModelError> {
        let mut v = Violations::new();
        v.check(is_present(&self.bike_name), "bikeName", "Bike name is required")
            .check(self.year.is_some_and(|y| is_valid_year(y, current_year)), "year", "Year must be valid")
            .check(is_present(&self.registration_number), "registrationNumber", "Registration number is required")
            .check(is_present(&self.owner_phone), "ownerPhone", "Owner phone is required")
            .check(is_aadhar(self.owner_aadhar.trim()), "ownerAadhar", "Owner Aadhar number must be exactly 12 digits")
            .check(is_present(&self.owner_address), "ownerAddress", "Owner address is required")
            .check(self.purchase_price.is_some_and(is_amount), "purchasePrice", "Purchase price must be a positive number")
            .check(self.selling_price.is_some_and(is_amount), "sellingPrice", "Selling price must be a positive number");
        v.finish()?;

        Ok(NewBike {
            bike_name: self.bike_name.trim().to_string(),
            year: self.year.unwrap_or_default(),
            registration_number: self.registration_number.trim().to_string(),
            owner_phone: self.owner_phone.trim().to_string(),
            owner_aadhar: self.owner_aadhar.trim().to_string(),
            owner_address: self.owner_address.trim().to_string(),
            purchase_price: self.purchase_price.unwrap_or_default(),
            selling_price: self.selling_price.unwrap_or_default(),
            bike_image_url: non_blank(self.bike_image_url),
            aadhar_image_url: non_blank(self.aadhar_image_url),
        })
    }
}

impl NewBike {
    pub fn into_model(self, added_by: &str, now: DateTime<Utc>) -> bike::Model {
        let at: DateTimeWithTimeZone = now.into();
        bike::Model {
            id: Uuid::new_v4(),
            bike_name: self.bike_name,
            year: self.year,
            registration_number: self.registration_number,
            owner_phone: self.owner_phone,
            owner_aadhar: self.owner_aadhar,
            owner_address: self.owner_address,
            purchase_price: self.purchase_price,
            selling_price: self.selling_price,
            bike_image_url: self.bike_image_url,
            aadhar_image_url: self.aadhar_image_url,
            status: BikeStatus::Available,
            added_by: added_by.to_string(),
            created_at: at,
            updated_at: at,
        }
    }
}

/// Partial edit. Status is deliberately absent: it only moves through sale
/// recording and the bulk reset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBikeInput {
    pub bike_name: Option<String>,
    pub year: Option<i32>,
    pub registration_number: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_aadhar: Option<String>,
    pub owner_address: Option<String>,
    pub purchase_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub bike_image_url: Option<String>,
    pub aadhar_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikePatch {
    pub bike_name: Option<String>,
    pub year: Option<i32>,
    pub registration_number: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_aadhar: Option<String>,
    pub owner_address: Option<String>,
    pub purchase_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub bike_image_url: Option<String>,
    pub aadhar_image_url: Option<String>,
}

impl UpdateBikeInput {
    /// Present fields obey the same rules as intake.
    pub fn validate(self, current_year: i32) -> Result<BikePatch, ModelError> {
        let mut v = Violations::new();
        v.check(self.bike_name.as_deref().map_or(true, is_present), "bikeName", "Bike name is required")
            .check(self.year.map_or(true, |y| is_valid_year(y, current_year)), "year", "Year must be valid")
            .check(
                self.registration_number.as_deref().map_or(true, is_present),
                "registrationNumber",
                "Registration number is required",
            )
            .check(self.owner_phone.as_deref().map_or(true, is_present), "ownerPhone", "Owner phone is required")
            .check(
                self.owner_aadhar.as_deref().map_or(true, |a| is_aadhar(a.trim())),
                "ownerAadhar",
                "Owner Aadhar number must be exactly 12 digits",
            )
            .check(self.owner_address.as_deref().map_or(true, is_present), "ownerAddress", "Owner address is required")
            .check(self.purchase_price.map_or(true, is_amount), "purchasePrice", "Purchase price must be a positive number")
            .check(self.selling_price.map_or(true, is_amount), "sellingPrice", "Selling price must be a positive number");
        v.finish()?;

        let trim = |s: Option<String>| s.map(|s| s.trim().to_string());
        Ok(BikePatch {
            bike_name: trim(self.bike_name),
            year: self.year,
            registration_number: trim(self.registration_number),
            owner_phone: trim(self.owner_phone),
            owner_aadhar: trim(self.owner_aadhar),
            owner_address: trim(self.owner_address),
            purchase_price: self.purchase_price,
            selling_price: self.selling_price,
            bike_image_url: non_blank(self.bike_image_url),
            aadhar_image_url: non_blank(self.aadhar_image_url),
        })
    }
}

pub const SOLD_PRICE_FROZEN: &str = "Purchase price of a sold bike cannot be changed";

impl BikePatch {
    /// A sold bike's purchase price is frozen into its sale snapshot.
    pub fn moves_sold_price(&self, bike: &bike::Model) -> bool {
        bike.is_sold() && self.purchase_price.is_some_and(|p| p != bike.purchase_price)
    }

    /// Write present fields onto `bike` and bump `updated_at`.
    pub fn apply(self, bike: &mut bike::Model, now: DateTime<Utc>) {
        if let Some(v) = self.bike_name { bike.bike_name = v; }
        if let Some(v) = self.year { bike.year = v; }
        if let Some(v) = self.registration_number { bike.registration_number = v; }
        if let Some(v) = self.owner_phone { bike.owner_phone = v; }
        if let Some(v) = self.owner_aadhar { bike.owner_aadhar = v; }
        if let Some(v) = self.owner_address { bike.owner_address = v; }
        if let Some(v) = self.purchase_price { bike.purchase_price = v; }
        if let Some(v) = self.selling_price { bike.selling_price = v; }
        if let Some(v) = self.bike_image_url { bike.bike_image_url = Some(v); }
        if let Some(v) = self.aadhar_image_url { bike.aadhar_image_url = Some(v); }
        bike.updated_at = now.into();
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bike_input;

    fn fields(err: ModelError) -> Vec<String> {
        match err {
            ModelError::Fields(list) => list.into_iter().map(|v| v.field).collect(),
            other => panic!("expected field violations, got {other:?}"),
        }
    }

    #[test]
    fn valid_intake_is_trimmed() {
        let mut input = bike_input("  Pulsar 150 ", 150000.0);
        input.owner_aadhar = " 123456789012 ".into();
        let bike = input.validate(2026).unwrap();
        assert_eq!(bike.bike_name, "Pulsar 150");
        assert_eq!(bike.owner_aadhar, "123456789012");
    }

    #[test]
    fn empty_intake_reports_every_field() {
        let err = CreateBikeInput::default().validate(2026).unwrap_err();
        let got = fields(err);
        for f in ["bikeName", "year", "registrationNumber", "ownerPhone", "ownerAadhar", "ownerAddress", "purchasePrice", "sellingPrice"] {
            assert!(got.iter().any(|g| g == f), "missing violation for {f}");
        }
    }

    #[test]
    fn year_and_prices_are_bounded() {
        let mut input = bike_input("Splendor", 40000.0);
        input.year = Some(2028);
        input.selling_price = Some(-1.0);
        assert_eq!(fields(input.validate(2026).unwrap_err()), vec!["year", "sellingPrice"]);

        let mut next_year = bike_input("Splendor", 40000.0);
        next_year.year = Some(2027);
        assert!(next_year.validate(2026).is_ok());
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = UpdateBikeInput { selling_price: Some(99000.0), ..Default::default() }.validate(2026).unwrap();
        assert_eq!(patch.selling_price, Some(99000.0));
        assert!(patch.bike_name.is_none());

        let bad = UpdateBikeInput { owner_aadhar: Some("1234".into()), ..Default::default() };
        assert_eq!(fields(bad.validate(2026).unwrap_err()), vec!["ownerAadhar"]);
    }

    #[test]
    fn status_is_not_an_editable_field() {
        let parsed: Result<UpdateBikeInput, _> = serde_json::from_str(r#"{"status":"available"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn apply_overwrites_present_fields_only() {
        let now = Utc::now();
        let mut bike = bike_input("Activa", 50000.0).validate(2026).unwrap().into_model("uid-1", now);
        let patch = BikePatch { selling_price: Some(61000.0), ..Default::default() };
        patch.apply(&mut bike, now);
        assert_eq!(bike.selling_price, 61000.0);
        assert_eq!(bike.bike_name, "Activa");
        assert_eq!(bike.status, BikeStatus::Available);
    }
}
