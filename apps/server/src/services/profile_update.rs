//! Multi-table profile updates
//!
//! A profile spans the identity record (`users`), the role record
//! (`patients` / `providers`), the owned address and phone rows and, for
//! providers, the supported medical issue associations. An update is split
//! into one field set per table and applied in a fixed order inside a single
//! transaction:
//!
//! 1. identity
//! 2. role
//! 3. address
//! 4. phone
//! 5. associations
//!
//! Any failure rolls the whole update back. The denormalized profile is read
//! back after commit.

use crate::{
    db::{
        accounts::email_taken,
        medical_issues::replace_provider_issues,
        profiles::{
            apply_update, fetch_patient, fetch_provider, lock_owned_records, ProfileKind,
            ADDRESS_COLUMNS, IDENTITY_COLUMNS, PHONE_COLUMNS, PROVIDER_COLUMNS,
        },
        sql::FieldSet,
        with_transaction,
    },
    metrics::record_profile_update,
    models::{PatientProfile, PatientProfilePatch, ProviderProfile, ProviderProfilePatch},
    Error, Result,
};
use sqlx::{PgConnection, PgPool};

/// A typed profile patch split by destination table.
#[derive(Debug, Clone, Default)]
pub struct PartitionedUpdate {
    pub identity: FieldSet,
    pub role: FieldSet,
    pub address: FieldSet,
    pub phone: FieldSet,
    /// Replacement set of medical issue names. Only ever `Some` when the
    /// caller sent a non-empty list.
    pub associations: Option<Vec<String>>,
    /// New email, kept aside for the duplicate check.
    pub email: Option<String>,
}

fn trimmed_email(email: Option<&str>) -> Option<String> {
    email.map(|e| e.trim().to_string())
}

impl PartitionedUpdate {
    pub fn is_empty(&self) -> bool {
        self.identity.is_empty()
            && self.role.is_empty()
            && self.address.is_empty()
            && self.phone.is_empty()
            && self.associations.is_none()
    }

    /// Patients have no role-specific columns.
    pub fn from_patient(patch: &PatientProfilePatch) -> Self {
        let email = trimmed_email(patch.email.as_deref());
        let mut identity = FieldSet::new();
        identity
            .set_opt("name", patch.name.clone())
            .set_opt("email", email.clone());

        Self {
            identity,
            role: FieldSet::new(),
            address: patch
                .address
                .as_ref()
                .map(|a| a.field_set())
                .unwrap_or_default(),
            phone: patch.phone.as_ref().map(|p| p.field_set()).unwrap_or_default(),
            associations: None,
            email,
        }
    }

    pub fn from_provider(patch: &ProviderProfilePatch) -> Self {
        let email = trimmed_email(patch.email.as_deref());
        let mut identity = FieldSet::new();
        identity
            .set_opt("name", patch.name.clone())
            .set_opt("email", email.clone());

        let mut role = FieldSet::new();
        role.set_opt("provider_type", patch.provider_type.clone())
            .set_opt("bio", patch.bio.clone())
            .set_opt("contact_information", patch.contact_information.clone());

        Self {
            identity,
            role,
            address: patch
                .address
                .as_ref()
                .map(|a| a.field_set())
                .unwrap_or_default(),
            phone: patch.phone.as_ref().map(|p| p.field_set()).unwrap_or_default(),
            associations: patch
                .supported_health_issues
                .clone()
                .filter(|names| !names.is_empty()),
            email,
        }
    }
}

/// Applies partial profile updates for both roles.
#[derive(Clone)]
pub struct ProfileUpdateService {
    pool: PgPool,
}

impl ProfileUpdateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn update_patient(
        &self,
        patient_id: i32,
        patch: &PatientProfilePatch,
    ) -> Result<PatientProfile> {
        let update = PartitionedUpdate::from_patient(patch);
        self.apply(ProfileKind::Patient, patient_id, update).await?;

        fetch_patient(&self.pool, patient_id).await?.ok_or_else(|| {
            Error::Internal(format!("Patient {patient_id} missing after committed update"))
        })
    }

    pub async fn update_provider(
        &self,
        provider_id: i32,
        patch: &ProviderProfilePatch,
    ) -> Result<ProviderProfile> {
        let update = PartitionedUpdate::from_provider(patch);
        self.apply(ProfileKind::Provider, provider_id, update).await?;

        fetch_provider(&self.pool, provider_id).await?.ok_or_else(|| {
            Error::Internal(format!("Provider {provider_id} missing after committed update"))
        })
    }

    async fn apply(&self, kind: ProfileKind, role_id: i32, update: PartitionedUpdate) -> Result<()> {
        if update.is_empty() {
            return Err(Error::InvalidInput("No data".to_string()));
        }

        let touched: Vec<&'static str> = update
            .identity
            .fields()
            .chain(update.role.fields())
            .chain(update.address.fields())
            .chain(update.phone.fields())
            .collect();
        let replaces_issues = update.associations.is_some();

        let result = with_transaction(&self.pool, move |conn| {
            Box::pin(async move { write_profile(conn, kind, role_id, update).await })
        })
        .await;

        match &result {
            Ok(()) => {
                record_profile_update(&kind.to_string(), "committed");
                tracing::info!(
                    kind = %kind,
                    role_id,
                    fields = ?touched,
                    replaces_issues,
                    "Profile updated"
                );
            }
            Err(e) => {
                record_profile_update(&kind.to_string(), "rolled_back");
                tracing::debug!(kind = %kind, role_id, error = %e, "Profile update rolled back");
            }
        }

        result
    }
}

/// The unit of work of one profile update. Runs on the transaction's
/// connection; every error aborts the transaction.
async fn write_profile(
    conn: &mut PgConnection,
    kind: ProfileKind,
    role_id: i32,
    update: PartitionedUpdate,
) -> Result<()> {
    let PartitionedUpdate {
        identity,
        role,
        address,
        phone,
        associations,
        email,
    } = update;

    let owned = lock_owned_records(&mut *conn, kind, role_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No {kind} found with id: {role_id}")))?;

    let address_id = match (address.is_empty(), owned.address_id) {
        (true, _) => None,
        (false, Some(id)) => Some(id),
        (false, None) => {
            return Err(Error::NotFound(format!(
                "No address on file for {kind} {role_id}"
            )))
        }
    };
    let phone_id = match (phone.is_empty(), owned.phone_id) {
        (true, _) => None,
        (false, Some(id)) => Some(id),
        (false, None) => {
            return Err(Error::NotFound(format!(
                "No phone number on file for {kind} {role_id}"
            )))
        }
    };

    if let Some(email) = &email {
        if email_taken(&mut *conn, email, Some(owned.user_id)).await? {
            return Err(Error::Conflict(format!("Duplicate email: {email}")));
        }
    }

    if !identity.is_empty() {
        let rows = apply_update(
            &mut *conn,
            "users",
            "user_id",
            owned.user_id,
            identity,
            IDENTITY_COLUMNS,
        )
        .await?;
        ensure_touched(rows, "user", owned.user_id)?;
    }

    if !role.is_empty() {
        let columns = match kind {
            ProfileKind::Provider => PROVIDER_COLUMNS,
            ProfileKind::Patient => {
                return Err(Error::Internal(
                    "Patient profiles have no role-specific fields".to_string(),
                ))
            }
        };
        let rows = apply_update(
            &mut *conn,
            kind.role_table(),
            kind.key_column(),
            role_id,
            role,
            columns,
        )
        .await?;
        ensure_touched(rows, "profile", role_id)?;
    }

    if let Some(address_id) = address_id {
        let rows = apply_update(
            &mut *conn,
            "addresses",
            "address_id",
            address_id,
            address,
            ADDRESS_COLUMNS,
        )
        .await?;
        ensure_touched(rows, "address", address_id)?;
    }

    if let Some(phone_id) = phone_id {
        let rows = apply_update(
            &mut *conn,
            "phone_numbers",
            "phone_id",
            phone_id,
            phone,
            PHONE_COLUMNS,
        )
        .await?;
        ensure_touched(rows, "phone number", phone_id)?;
    }

    if let Some(names) = associations {
        if kind == ProfileKind::Provider {
            replace_provider_issues(&mut *conn, role_id, &names).await?;
        }
    }

    sqlx::query("UPDATE users SET updated_at = NOW() WHERE user_id = $1")
        .bind(owned.user_id)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;

    Ok(())
}

fn ensure_touched(rows: u64, what: &str, id: i32) -> Result<()> {
    if rows == 0 {
        return Err(Error::NotFound(format!("No {what} found with id: {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressPatch, PhonePatch};
    use serde_json::json;

    #[test]
    fn provider_patch_is_split_by_table() {
        let patch: ProviderProfilePatch = serde_json::from_value(json!({
            "name": "Dr. Rivera",
            "bio": "Family medicine",
            "address": { "city": "Tucson" },
            "phone": { "phone_type": "mobile" },
            "supported_health_issues": ["Diabetes"],
            "password": "ignored"
        }))
        .unwrap();

        let update = PartitionedUpdate::from_provider(&patch);
        assert_eq!(update.identity.fields().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(update.role.fields().collect::<Vec<_>>(), vec!["bio"]);
        assert_eq!(update.address.fields().collect::<Vec<_>>(), vec!["city"]);
        assert_eq!(update.phone.fields().collect::<Vec<_>>(), vec!["phone_type"]);
        assert_eq!(update.associations, Some(vec!["Diabetes".to_string()]));
        assert!(!update.is_empty());
    }

    #[test]
    fn empty_issue_list_is_not_a_replacement() {
        let patch = ProviderProfilePatch {
            supported_health_issues: Some(vec![]),
            ..Default::default()
        };
        let update = PartitionedUpdate::from_provider(&patch);
        assert!(update.associations.is_none());
        assert!(update.is_empty());
    }

    #[test]
    fn patient_patch_has_no_role_fields() {
        let patch = PatientProfilePatch {
            email: Some("new@example.com".to_string()),
            address: Some(AddressPatch::default()),
            phone: Some(PhonePatch {
                area_code: Some("303".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let update = PartitionedUpdate::from_patient(&patch);
        assert!(update.role.is_empty());
        assert!(update.address.is_empty());
        assert_eq!(update.identity.fields().collect::<Vec<_>>(), vec!["email"]);
        assert_eq!(update.phone.fields().collect::<Vec<_>>(), vec!["area_code"]);
        assert_eq!(update.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn patch_email_is_trimmed_like_signup() {
        let patch = ProviderProfilePatch {
            email: Some("  kim@example.com ".to_string()),
            ..Default::default()
        };

        let update = PartitionedUpdate::from_provider(&patch);
        assert_eq!(update.email.as_deref(), Some("kim@example.com"));
        let clause = crate::db::sql::sql_for_partial_update(update.identity, &[]).unwrap();
        assert_eq!(
            clause.values,
            vec![crate::db::sql::SqlValue::Text("kim@example.com".to_string())]
        );
    }

    #[test]
    fn nothing_to_write_is_empty() {
        let update = PartitionedUpdate::from_patient(&PatientProfilePatch::default());
        assert!(update.is_empty());
    }
}
