//! Shared helpers for the PostgreSQL integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`; each
//! suite pulls this module in with `mod support;`.

#![allow(dead_code, reason = "not every suite uses every helper")]

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{TestDatabase, provision_database};

use serde_json::{Value, json};

/// A complete, valid user document.
pub fn user_document(username: &str) -> Value {
    let address = json!({
        "address": "221B Baker Street",
        "city": "London",
        "state": "Greater London",
        "postalCode": "NW1 6XE",
        "coordinates": { "lat": 51.52, "lng": -0.16 }
    });
    json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "maidenName": "Murray",
        "age": 85,
        "gender": "female",
        "email": format!("{username}@example.com"),
        "phone": "+1 555 0100",
        "username": username,
        "password": "cobol-rules",
        "birthDate": "1906-12-09",
        "bloodGroup": "A+",
        "height": 160,
        "weight": 55.5,
        "eyeColor": "Blue",
        "hair": { "color": "Grey", "type": "Straight" },
        "domain": "example.com",
        "ip": "192.0.2.10",
        "macAddress": "00:00:5E:00:53:AF",
        "university": "Yale University",
        "address": address.clone(),
        "bank": {
            "cardExpire": "12/30",
            "cardNumber": "5555555555554444",
            "cardType": "Mastercard",
            "currency": "USD",
            "iban": "DE89370400440532013000"
        },
        "company": {
            "department": "Research",
            "name": "Eckert-Mauchly",
            "title": "Mathematician",
            "address": address
        },
        "ein": "98-7654321",
        "ssn": "987-65-4321",
        "userAgent": "Mozilla/5.0",
        "crypto": { "coin": "Ethereum", "wallet": "0xdef", "network": "Ethereum (ERC20)" },
        "role": "moderator"
    })
}
