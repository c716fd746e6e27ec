//! Provider contact requests

use crate::db::sql::FieldSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    #[default]
    Normal,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Pending,
    Read,
    Responded,
    Closed,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Read => "read",
            Self::Responded => "responded",
            Self::Closed => "closed",
        }
    }
}

/// A patient's request to be contacted by a provider.
///
/// Sender name and email default to the patient's account details.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewContact {
    #[serde(alias = "providerId")]
    pub provider_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    #[validate(length(min = 1, max = 100))]
    pub patient_name: Option<String>,
    #[validate(email)]
    pub patient_email: Option<String>,
    #[validate(length(max = 30))]
    pub patient_phone: Option<String>,
    #[serde(default)]
    pub preferred_contact_method: ContactMethod,
    #[serde(default, alias = "urgency")]
    pub urgency_level: Urgency,
}

/// Provider-side update of a contact request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactPatch {
    pub status: Option<ContactStatus>,
    #[serde(alias = "providerResponse")]
    #[validate(length(max = 5000))]
    pub provider_response: Option<String>,
}

impl ContactPatch {
    pub fn field_set(&self) -> FieldSet {
        let mut fields = FieldSet::new();
        fields
            .set_opt("status", self.status.map(|s| s.as_str()))
            .set_opt("provider_response", self.provider_response.clone());
        fields
    }

    /// Whether this update counts as the provider answering the request.
    pub fn is_response(&self) -> bool {
        self.provider_response.is_some() || self.status == Some(ContactStatus::Responded)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Contact {
    pub contact_id: i32,
    pub patient_id: i32,
    pub provider_id: i32,
    pub provider_name: String,
    pub subject: String,
    pub message: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: Option<String>,
    pub preferred_contact_method: String,
    pub urgency_level: String,
    pub status: String,
    pub provider_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ContactStats {
    pub total_contacts: i64,
    pub pending_contacts: i64,
    pub read_contacts: i64,
    pub responded_contacts: i64,
    pub urgent_contacts: i64,
}
