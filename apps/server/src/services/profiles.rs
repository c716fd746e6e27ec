//! Profile reads, updates and deletion for both roles

use crate::{
    db::{profiles::ProfileKind, ProfileRepository},
    models::{PatientProfile, PatientProfilePatch, ProviderProfile, ProviderProfilePatch},
    services::{AccountService, ProfileUpdateService},
    Result,
};
use std::sync::Arc;

pub struct ProfileService {
    profiles: ProfileRepository,
    updates: ProfileUpdateService,
    accounts: Arc<AccountService>,
}

impl ProfileService {
    pub fn new(
        profiles: ProfileRepository,
        updates: ProfileUpdateService,
        accounts: Arc<AccountService>,
    ) -> Self {
        Self {
            profiles,
            updates,
            accounts,
        }
    }

    pub async fn patient(&self, patient_id: i32) -> Result<PatientProfile> {
        self.profiles.get_patient(patient_id).await
    }

    pub async fn provider(&self, provider_id: i32) -> Result<ProviderProfile> {
        self.profiles.get_provider(provider_id).await
    }

    pub async fn update_patient(
        &self,
        patient_id: i32,
        patch: &PatientProfilePatch,
    ) -> Result<PatientProfile> {
        self.updates.update_patient(patient_id, patch).await
    }

    pub async fn update_provider(
        &self,
        provider_id: i32,
        patch: &ProviderProfilePatch,
    ) -> Result<ProviderProfile> {
        self.updates.update_provider(provider_id, patch).await
    }

    pub async fn delete_patient(&self, patient_id: i32) -> Result<()> {
        self.accounts.delete(ProfileKind::Patient, patient_id).await
    }

    pub async fn delete_provider(&self, provider_id: i32) -> Result<()> {
        self.accounts.delete(ProfileKind::Provider, provider_id).await
    }
}
