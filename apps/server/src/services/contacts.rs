//! Patient to provider contact requests

use crate::{
    db::{contacts::ContactDraft, profiles::ProfileKind, ContactRepository, ProfileRepository},
    models::{Contact, ContactPatch, ContactStats, NewContact},
    Error, Result,
};
use serde::Serialize;

/// A provider's inbox with summary counts.
#[derive(Debug, Clone, Serialize)]
pub struct Inbox {
    pub contacts: Vec<Contact>,
    pub stats: ContactStats,
}

pub struct ContactService {
    contacts: ContactRepository,
    profiles: ProfileRepository,
}

impl ContactService {
    pub fn new(contacts: ContactRepository, profiles: ProfileRepository) -> Self {
        Self { contacts, profiles }
    }

    /// Sends a contact request. Sender name and email fall back to the
    /// patient's account; the phone falls back to the number on file.
    pub async fn send(&self, patient_id: i32, request: NewContact) -> Result<Contact> {
        if self
            .profiles
            .user_id_for(ProfileKind::Provider, request.provider_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(format!(
                "No provider found with id: {}",
                request.provider_id
            )));
        }

        let patient = self.profiles.get_patient(patient_id).await?;
        let phone_on_file = patient.phone.as_ref().map(|p| {
            format!("+{} ({}) {}", p.country_code, p.area_code, p.phone_number)
        });

        let contact = self
            .contacts
            .create(ContactDraft {
                patient_id,
                provider_id: request.provider_id,
                subject: request.subject,
                message: request.message,
                patient_name: request.patient_name.unwrap_or(patient.name),
                patient_email: request.patient_email.unwrap_or(patient.email),
                patient_phone: request.patient_phone.or(phone_on_file),
                preferred_contact_method: request.preferred_contact_method,
                urgency_level: request.urgency_level,
            })
            .await?;

        tracing::info!(
            contact_id = contact.contact_id,
            patient_id,
            provider_id = contact.provider_id,
            urgency = %contact.urgency_level,
            "Contact request sent"
        );
        Ok(contact)
    }

    pub async fn sent_by(&self, patient_id: i32) -> Result<Vec<Contact>> {
        self.contacts.list_for_patient(patient_id).await
    }

    pub async fn get_for_patient(&self, patient_id: i32, contact_id: i32) -> Result<Contact> {
        let contact = self.find(contact_id).await?;
        if contact.patient_id != patient_id {
            return Err(Error::Forbidden(
                "Contact requests are visible to their sender only".to_string(),
            ));
        }
        Ok(contact)
    }

    pub async fn inbox(&self, provider_id: i32) -> Result<Inbox> {
        let contacts = self.contacts.list_for_provider(provider_id).await?;
        let stats = self.contacts.stats_for_provider(provider_id).await?;
        Ok(Inbox { contacts, stats })
    }

    pub async fn stats(&self, provider_id: i32) -> Result<ContactStats> {
        self.contacts.stats_for_provider(provider_id).await
    }

    pub async fn get_for_provider(&self, provider_id: i32, contact_id: i32) -> Result<Contact> {
        let contact = self.find(contact_id).await?;
        ensure_recipient(&contact, provider_id)?;
        Ok(contact)
    }

    pub async fn respond(
        &self,
        provider_id: i32,
        contact_id: i32,
        patch: &ContactPatch,
    ) -> Result<Contact> {
        let contact = self.find(contact_id).await?;
        ensure_recipient(&contact, provider_id)?;

        let updated = self
            .contacts
            .update(contact_id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No contact found with id: {contact_id}")))?;

        tracing::info!(contact_id, provider_id, status = %updated.status, "Contact request updated");
        Ok(updated)
    }

    pub async fn delete(&self, provider_id: i32, contact_id: i32) -> Result<()> {
        let contact = self.find(contact_id).await?;
        ensure_recipient(&contact, provider_id)?;

        if !self.contacts.delete(contact_id).await? {
            return Err(Error::NotFound(format!("No contact found with id: {contact_id}")));
        }
        Ok(())
    }

    async fn find(&self, contact_id: i32) -> Result<Contact> {
        self.contacts
            .get(contact_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No contact found with id: {contact_id}")))
    }
}

fn ensure_recipient(contact: &Contact, provider_id: i32) -> Result<()> {
    if contact.provider_id != provider_id {
        return Err(Error::Forbidden(
            "Only the receiving provider may manage this contact request".to_string(),
        ));
    }
    Ok(())
}
