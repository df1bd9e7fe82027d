//! Fixtures shared by unit tests across the service modules.

use chrono::Duration;

use crate::identity::TokenConfig;
use crate::inventory::domain::CreateBikeInput;
use crate::sales::domain::MarkSoldInput;

pub fn bike_input(name: &str, purchase_price: f64) -> CreateBikeInput {
    CreateBikeInput {
        bike_name: name.into(),
        year: Some(2023),
        registration_number: "KA01AB1234".into(),
        owner_phone: "9876543210".into(),
        owner_aadhar: "123456789012".into(),
        owner_address: "12 MG Road, Bengaluru".into(),
        purchase_price: Some(purchase_price),
        selling_price: Some(purchase_price * 1.2),
        bike_image_url: None,
        aadhar_image_url: None,
    }
}

pub fn sale_input(sale_price: f64) -> MarkSoldInput {
    MarkSoldInput {
        sale_price: Some(sale_price),
        customer_name: "Ravi Kumar".into(),
        customer_email: "ravi@example.com".into(),
        customer_phone: "9123456780".into(),
        customer_aadhar: "210987654321".into(),
        customer_address: "4 Residency Road, Bengaluru".into(),
    }
}

/// Cheap argon2 cost so hashing does not dominate test time.
pub fn token_config() -> TokenConfig {
    TokenConfig {
        jwt_secret: "unit-test-secret-0123456789".into(),
        token_ttl: Duration::hours(12),
        hash_params: argon2::Params::new(1024, 1, 1, None).expect("argon2 params"),
    }
}
