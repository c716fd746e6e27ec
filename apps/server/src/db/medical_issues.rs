//! Medical issue catalogue and provider associations

use crate::{
    db::sql::{sql_for_partial_update, ColumnMap, FieldSet},
    models::MedicalIssue,
    Error, Result,
};
use sqlx::{PgConnection, PgPool};

/// Logical admin field names to `medical_issues` columns.
pub const ISSUE_COLUMNS: ColumnMap = &[("name", "issue_name")];

#[derive(Clone)]
pub struct MedicalIssueRepository {
    pool: PgPool,
}

impl MedicalIssueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<MedicalIssue>> {
        sqlx::query_as::<_, MedicalIssue>(
            "SELECT issue_id, issue_name, description FROM medical_issues ORDER BY issue_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    pub async fn get(&self, issue_id: i32) -> Result<MedicalIssue> {
        sqlx::query_as::<_, MedicalIssue>(
            "SELECT issue_id, issue_name, description FROM medical_issues WHERE issue_id = $1",
        )
        .bind(issue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("No medical issue with id: {issue_id}")))
    }

    pub async fn create(&self, issue_name: &str, description: Option<&str>) -> Result<MedicalIssue> {
        let name = issue_name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Issue name must not be empty".to_string()));
        }

        sqlx::query_as::<_, MedicalIssue>(
            r#"
            INSERT INTO medical_issues (issue_name, description)
            VALUES ($1, $2)
            RETURNING issue_id, issue_name, description
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if crate::error::is_unique_violation(&e) {
                Error::Conflict(format!("Medical issue already exists: {name}"))
            } else {
                Error::Database(e)
            }
        })
    }

    /// Partial update. Accepts the logical fields `name` and `description`.
    pub async fn update(&self, issue_id: i32, fields: FieldSet) -> Result<MedicalIssue> {
        let clause = sql_for_partial_update(fields, ISSUE_COLUMNS)?;
        let sql = format!(
            "{} RETURNING issue_id, issue_name, description",
            clause.update_statement("medical_issues", "issue_id")
        );

        clause
            .bind_as(sqlx::query_as::<_, MedicalIssue>(&sql))
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("No medical issue with id: {issue_id}")))
    }

    pub async fn delete(&self, issue_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM medical_issues WHERE issue_id = $1")
            .bind(issue_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("No medical issue with id: {issue_id}")));
        }
        Ok(())
    }
}

/// Resolves issue names to ids by trimmed, case-insensitive exact match.
///
/// Fails with [`Error::UnknownMedicalIssue`] on the first name that does not
/// resolve. Duplicate names collapse; first-seen order is kept.
pub async fn resolve_issue_ids(conn: &mut PgConnection, names: &[String]) -> Result<Vec<i32>> {
    let mut ids = Vec::with_capacity(names.len());

    for raw in names {
        let name = raw.trim();
        let issue_id: Option<i32> = sqlx::query_scalar(
            "SELECT issue_id FROM medical_issues WHERE LOWER(issue_name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(Error::Database)?;

        match issue_id {
            Some(id) if !ids.contains(&id) => ids.push(id),
            Some(_) => {}
            None => return Err(Error::UnknownMedicalIssue(name.to_string())),
        }
    }

    Ok(ids)
}

/// Replaces the full set of medical issues a provider supports.
///
/// All names are resolved before anything is deleted, so an unknown name
/// leaves the existing associations untouched. Must run inside the caller's
/// transaction. Returns the number of associations written.
pub async fn replace_provider_issues(
    conn: &mut PgConnection,
    provider_id: i32,
    names: &[String],
) -> Result<usize> {
    let issue_ids = resolve_issue_ids(&mut *conn, names).await?;

    sqlx::query("DELETE FROM provider_supported_issues WHERE provider_id = $1")
        .bind(provider_id)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;

    if !issue_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO provider_supported_issues (provider_id, issue_id)
            SELECT $1, UNNEST($2::int[])
            "#,
        )
        .bind(provider_id)
        .bind(&issue_ids)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;
    }

    tracing::debug!(
        provider_id,
        issue_count = issue_ids.len(),
        "Replaced provider medical issues"
    );

    Ok(issue_ids.len())
}
