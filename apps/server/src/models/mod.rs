//! Request and response types

pub mod account;
pub mod contact;
pub mod contact_info;
pub mod emergency_resource;
pub mod favorite;
pub mod medical_issue;
pub mod patient;
pub mod provider;
pub mod search;

pub use account::{AuthResponse, AuthUser, LoginRequest, Role};
pub use contact::{Contact, ContactMethod, ContactPatch, ContactStats, ContactStatus, NewContact, Urgency};
pub use contact_info::{Address, AddressPatch, NewAddress, NewPhone, Phone, PhonePatch};
pub use emergency_resource::EmergencyResource;
pub use favorite::{Favorite, FavoriteWithProvider, NewFavorite};
pub use medical_issue::MedicalIssue;
pub use patient::{PatientProfile, PatientProfilePatch, PatientSignup};
pub use provider::{ProviderProfile, ProviderProfilePatch, ProviderSignup, ProviderSummary};
pub use search::{AdvancedSearchRequest, SearchRequest, SearchResponse};

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field from an explicit `null`.
///
/// Used with `#[serde(default)]` on `Option<Option<T>>`: a missing key stays
/// `None`, `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
