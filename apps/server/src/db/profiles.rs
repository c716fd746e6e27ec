//! Profile reads and the per-table writes of a profile update

use crate::{
    db::sql::{sql_for_partial_update, ColumnMap, FieldSet},
    models::{Address, PatientProfile, Phone, ProviderProfile},
    Error, Result,
};
use sqlx::{postgres::PgRow, PgConnection, PgExecutor, PgPool, Row};
use std::fmt;

pub const IDENTITY_COLUMNS: ColumnMap = &[];
pub const PROVIDER_COLUMNS: ColumnMap = &[];
pub const ADDRESS_COLUMNS: ColumnMap = &[];
pub const PHONE_COLUMNS: ColumnMap = &[];

/// Which role table a profile lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Patient,
    Provider,
}

impl ProfileKind {
    pub fn role_table(&self) -> &'static str {
        match self {
            Self::Patient => "patients",
            Self::Provider => "providers",
        }
    }

    pub fn key_column(&self) -> &'static str {
        match self {
            Self::Patient => "patient_id",
            Self::Provider => "provider_id",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patient => f.write_str("patient"),
            Self::Provider => f.write_str("provider"),
        }
    }
}

/// Ids of the records a role record owns, resolved before any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedRecords {
    pub user_id: i32,
    pub address_id: Option<i32>,
    pub phone_id: Option<i32>,
}

/// Resolves and row-locks the identity record behind `role_id`.
///
/// Returns `None` when the role id does not exist.
pub async fn lock_owned_records(
    conn: &mut PgConnection,
    kind: ProfileKind,
    role_id: i32,
) -> Result<Option<OwnedRecords>> {
    let sql = format!(
        r#"
        SELECT u.user_id, u.address_id, u.phone_id
        FROM {table} r
        JOIN users u ON u.user_id = r.user_id
        WHERE r.{key} = $1
        FOR UPDATE OF u
        "#,
        table = kind.role_table(),
        key = kind.key_column(),
    );

    let row = sqlx::query(&sql)
        .bind(role_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(Error::Database)?;

    row.map(|row| -> Result<OwnedRecords> {
        Ok(OwnedRecords {
            user_id: row.try_get("user_id")?,
            address_id: row.try_get("address_id")?,
            phone_id: row.try_get("phone_id")?,
        })
    })
    .transpose()
}

/// Runs `UPDATE <table> SET ... WHERE <key_column> = <key>` for a non-empty
/// field set and returns the number of rows touched.
pub async fn apply_update(
    conn: &mut PgConnection,
    table: &str,
    key_column: &str,
    key: i32,
    fields: FieldSet,
    columns: ColumnMap,
) -> Result<u64> {
    let clause = sql_for_partial_update(fields, columns)?;
    let sql = clause.update_statement(table, key_column);

    let result = clause
        .bind(sqlx::query(&sql))
        .bind(key)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;

    Ok(result.rows_affected())
}

const PROFILE_CONTACT_COLUMNS: &str = r#"
    a.address_id, a.street_address, a.apartment_number, a.city, a.state, a.postal_code,
    ph.phone_id, ph.country_code, ph.area_code, ph.phone_number, ph.phone_type
"#;

/// Reads the denormalized patient profile.
pub async fn fetch_patient<'e, E>(executor: E, patient_id: i32) -> Result<Option<PatientProfile>>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        SELECT pa.patient_id, u.name, u.email, {PROFILE_CONTACT_COLUMNS}
        FROM patients pa
        JOIN users u ON u.user_id = pa.user_id
        LEFT JOIN addresses a ON a.address_id = u.address_id
        LEFT JOIN phone_numbers ph ON ph.phone_id = u.phone_id
        WHERE pa.patient_id = $1
        "#
    );

    let row = sqlx::query(&sql)
        .bind(patient_id)
        .fetch_optional(executor)
        .await
        .map_err(Error::Database)?;

    row.map(|row| -> Result<PatientProfile> {
        Ok(PatientProfile {
            patient_id: row.try_get("patient_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            address: address_from_row(&row)?,
            phone: phone_from_row(&row)?,
        })
    })
    .transpose()
}

/// Reads the denormalized provider profile, including supported issue names
/// in alphabetical order.
pub async fn fetch_provider<'e, E>(
    executor: E,
    provider_id: i32,
) -> Result<Option<ProviderProfile>>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        SELECT pr.provider_id, u.name, u.email, pr.provider_type, pr.bio, pr.contact_information,
               {PROFILE_CONTACT_COLUMNS},
               ARRAY(
                   SELECT mi.issue_name
                   FROM provider_supported_issues psi
                   JOIN medical_issues mi ON mi.issue_id = psi.issue_id
                   WHERE psi.provider_id = pr.provider_id
                   ORDER BY mi.issue_name
               ) AS supported_health_issues
        FROM providers pr
        JOIN users u ON u.user_id = pr.user_id
        LEFT JOIN addresses a ON a.address_id = u.address_id
        LEFT JOIN phone_numbers ph ON ph.phone_id = u.phone_id
        WHERE pr.provider_id = $1
        "#
    );

    let row = sqlx::query(&sql)
        .bind(provider_id)
        .fetch_optional(executor)
        .await
        .map_err(Error::Database)?;

    row.map(|row| -> Result<ProviderProfile> {
        Ok(ProviderProfile {
            provider_id: row.try_get("provider_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            provider_type: row.try_get("provider_type")?,
            bio: row.try_get("bio")?,
            contact_information: row.try_get("contact_information")?,
            address: address_from_row(&row)?,
            phone: phone_from_row(&row)?,
            supported_health_issues: row.try_get("supported_health_issues")?,
        })
    })
    .transpose()
}

fn address_from_row(row: &PgRow) -> Result<Option<Address>> {
    let Some(address_id) = row.try_get::<Option<i32>, _>("address_id")? else {
        return Ok(None);
    };

    Ok(Some(Address {
        address_id,
        street_address: row.try_get("street_address")?,
        apartment_number: row.try_get("apartment_number")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        postal_code: row.try_get("postal_code")?,
    }))
}

fn phone_from_row(row: &PgRow) -> Result<Option<Phone>> {
    let Some(phone_id) = row.try_get::<Option<i32>, _>("phone_id")? else {
        return Ok(None);
    };

    Ok(Some(Phone {
        phone_id,
        country_code: row.try_get("country_code")?,
        area_code: row.try_get("area_code")?,
        phone_number: row.try_get("phone_number")?,
        phone_type: row.try_get("phone_type")?,
    }))
}

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_patient(&self, patient_id: i32) -> Result<PatientProfile> {
        fetch_patient(&self.pool, patient_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No patient found with id: {patient_id}")))
    }

    pub async fn get_provider(&self, provider_id: i32) -> Result<ProviderProfile> {
        fetch_provider(&self.pool, provider_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No provider found with id: {provider_id}")))
    }

    /// Identity record behind a role id, if any.
    pub async fn user_id_for(&self, kind: ProfileKind, role_id: i32) -> Result<Option<i32>> {
        let sql = format!(
            "SELECT user_id FROM {} WHERE {} = $1",
            kind.role_table(),
            kind.key_column()
        );
        sqlx::query_scalar(&sql)
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
