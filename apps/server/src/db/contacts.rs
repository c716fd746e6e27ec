//! Provider contact requests

use crate::{
    db::sql::{sql_for_partial_update, ColumnMap},
    models::{Contact, ContactMethod, ContactPatch, ContactStats, Urgency},
    Error, Result,
};
use sqlx::PgPool;

pub const CONTACT_COLUMNS: ColumnMap = &[];

const CONTACT_SELECT: &str = r#"
    SELECT pc.contact_id, pc.patient_id, pc.provider_id, u.name AS provider_name,
           pc.subject, pc.message, pc.patient_name, pc.patient_email, pc.patient_phone,
           pc.preferred_contact_method, pc.urgency_level, pc.status, pc.provider_response,
           pc.created_at, pc.updated_at, pc.responded_at
    FROM provider_contacts pc
    JOIN providers pr ON pr.provider_id = pc.provider_id
    JOIN users u ON u.user_id = pr.user_id
"#;

/// A contact request ready to insert. Sender details are already resolved.
#[derive(Debug, Clone)]
pub struct ContactDraft {
    pub patient_id: i32,
    pub provider_id: i32,
    pub subject: String,
    pub message: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: Option<String>,
    pub preferred_contact_method: ContactMethod,
    pub urgency_level: Urgency,
}

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: ContactDraft) -> Result<Contact> {
        let contact_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO provider_contacts
                (patient_id, provider_id, subject, message, patient_name, patient_email,
                 patient_phone, preferred_contact_method, urgency_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING contact_id
            "#,
        )
        .bind(draft.patient_id)
        .bind(draft.provider_id)
        .bind(&draft.subject)
        .bind(&draft.message)
        .bind(&draft.patient_name)
        .bind(&draft.patient_email)
        .bind(&draft.patient_phone)
        .bind(draft.preferred_contact_method.as_str())
        .bind(draft.urgency_level.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        self.get(contact_id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Contact {contact_id} vanished after insert")))
    }

    pub async fn get(&self, contact_id: i32) -> Result<Option<Contact>> {
        sqlx::query_as::<_, Contact>(&format!("{CONTACT_SELECT} WHERE pc.contact_id = $1"))
            .bind(contact_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    /// Inbox order: urgent first, then normal, then low; newest first within
    /// each urgency.
    pub async fn list_for_provider(&self, provider_id: i32) -> Result<Vec<Contact>> {
        sqlx::query_as::<_, Contact>(&format!(
            r#"{CONTACT_SELECT}
            WHERE pc.provider_id = $1
            ORDER BY
                CASE pc.urgency_level
                    WHEN 'urgent' THEN 1
                    WHEN 'normal' THEN 2
                    WHEN 'low' THEN 3
                END,
                pc.created_at DESC,
                pc.contact_id DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    pub async fn list_for_patient(&self, patient_id: i32) -> Result<Vec<Contact>> {
        sqlx::query_as::<_, Contact>(&format!(
            "{CONTACT_SELECT} WHERE pc.patient_id = $1 ORDER BY pc.created_at DESC, pc.contact_id DESC"
        ))
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    pub async fn stats_for_provider(&self, provider_id: i32) -> Result<ContactStats> {
        sqlx::query_as::<_, ContactStats>(
            r#"
            SELECT
                COUNT(*) AS total_contacts,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_contacts,
                COUNT(*) FILTER (WHERE status = 'read') AS read_contacts,
                COUNT(*) FILTER (WHERE status = 'responded') AS responded_contacts,
                COUNT(*) FILTER (WHERE urgency_level = 'urgent') AS urgent_contacts
            FROM provider_contacts
            WHERE provider_id = $1
            "#,
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    /// Applies a provider's status/response update. Stamps `responded_at`
    /// the first time the update carries a response.
    pub async fn update(&self, contact_id: i32, patch: &ContactPatch) -> Result<Option<Contact>> {
        let clause = sql_for_partial_update(patch.field_set(), CONTACT_COLUMNS)?;

        let mut sql = format!("UPDATE provider_contacts SET {}, updated_at = NOW()", clause.fragment);
        if patch.is_response() {
            sql.push_str(", responded_at = COALESCE(responded_at, NOW())");
        }
        sql.push_str(&format!(" WHERE contact_id = ${}", clause.next_placeholder()));

        let result = clause
            .bind(sqlx::query(&sql))
            .bind(contact_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(contact_id).await
    }

    pub async fn delete(&self, contact_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM provider_contacts WHERE contact_id = $1")
            .bind(contact_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
