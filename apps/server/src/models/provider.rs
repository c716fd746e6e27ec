//! Healthcare provider payloads and views

use super::contact_info::{Address, AddressPatch, NewAddress, NewPhone, Phone, PhonePatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProviderSignup {
    #[validate(length(min = 1, max = 100))]
    pub provider_type: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 72))]
    pub password: String,
    #[validate(length(max = 5000))]
    pub bio: Option<String>,
    #[validate(length(max = 1000))]
    pub contact_information: Option<String>,
    #[validate(nested)]
    pub address: NewAddress,
    #[validate(nested)]
    pub phone: NewPhone,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub supported_health_issues: Vec<String>,
}

/// Partial update of a provider profile.
///
/// `bio` and `contact_information` accept `null` to clear the column.
/// `supported_health_issues`, when present and non-empty, replaces the whole
/// association set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProviderProfilePatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub provider_type: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    #[validate(length(max = 5000))]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    #[validate(length(max = 1000))]
    pub contact_information: Option<Option<String>>,
    #[validate(nested)]
    pub address: Option<AddressPatch>,
    #[validate(nested)]
    pub phone: Option<PhonePatch>,
    #[validate(length(max = 50))]
    pub supported_health_issues: Option<Vec<String>>,
}

/// Denormalized provider profile: identity, role, address, phone and the
/// names of the supported medical issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderProfile {
    pub provider_id: i32,
    pub name: String,
    pub email: String,
    pub provider_type: String,
    pub bio: Option<String>,
    pub contact_information: Option<String>,
    pub address: Option<Address>,
    pub phone: Option<Phone>,
    pub supported_health_issues: Vec<String>,
}

/// Directory and search listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProviderSummary {
    pub provider_id: i32,
    pub name: String,
    pub email: String,
    pub provider_type: String,
    pub bio: Option<String>,
    pub contact_information: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub supported_health_issues: Vec<String>,
}
