// Session domain model
use serde::{Deserialize, Serialize};

/// Brands offered by the login brand selector
pub const KNOWN_BRANDS: &[&str] = &[
    "kia", "bmw", "audi", "ford", "chevrolet", "toyota", "honda", "hyundai", "mercedes", "nissan",
];

pub fn is_known_brand(brand: &str) -> bool {
    KNOWN_BRANDS.iter().any(|b| b.eq_ignore_ascii_case(brand.trim()))
}

/// Stored credentials; either field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            brand: Some(brand.into()),
        }
    }

    /// Returns the active session only when both fields are present and non-blank
    pub fn activate(&self) -> Option<ActiveSession> {
        let token = present(&self.token)?;
        let brand = present(&self.brand)?;
        Some(ActiveSession {
            token: token.to_string(),
            brand: brand.to_string(),
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

/// A session that passed the guard. Protected views can only be built from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub token: String,
    pub brand: String,
}

/// Login form fields; absent fields read as blank and fail `is_complete`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub brand: String,
}

impl LoginRequest {
    pub fn is_complete(&self) -> bool {
        [&self.email, &self.password, &self.brand]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub brand: String,
}
