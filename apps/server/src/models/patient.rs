//! Patient (civilian) payloads and profile view

use super::contact_info::{Address, AddressPatch, NewAddress, NewPhone, Phone, PhonePatch};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PatientSignup {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 72))]
    pub password: String,
    #[validate(nested)]
    pub address: NewAddress,
    #[validate(nested)]
    pub phone: NewPhone,
}

/// Partial update of a patient profile.
///
/// Patients have no role-specific columns; every field lands on the identity
/// record or one of the owned sub-records.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatientProfilePatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(nested)]
    pub address: Option<AddressPatch>,
    #[validate(nested)]
    pub phone: Option<PhonePatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientProfile {
    pub patient_id: i32,
    pub name: String,
    pub email: String,
    pub address: Option<Address>,
    pub phone: Option<Phone>,
}
