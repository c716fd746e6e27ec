//! Patient favorites

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewFavorite {
    #[serde(rename = "providerId", alias = "provider_id")]
    #[validate(range(min = 1))]
    pub provider_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Favorite {
    pub favorite_id: i32,
    pub patient_id: i32,
    pub provider_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A favorite joined with a short summary of the provider.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FavoriteWithProvider {
    pub favorite_id: i32,
    pub provider_id: i32,
    pub created_at: DateTime<Utc>,
    pub provider_name: String,
    pub provider_type: String,
    pub email: String,
    pub bio: Option<String>,
    pub contact_information: Option<String>,
}
