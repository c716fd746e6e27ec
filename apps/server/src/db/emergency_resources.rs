use crate::{
    db::sql::{sql_for_partial_update, ColumnMap, FieldSet},
    models::EmergencyResource,
    Error, Result,
};
use sqlx::PgPool;

/// Logical admin field names to `emergency_resources` columns.
pub const RESOURCE_COLUMNS: ColumnMap = &[("name", "resource_name"), ("phone", "phone_number")];

const RESOURCE_SELECT: &str =
    "SELECT resource_id, resource_name, phone_number, description, issue_id FROM emergency_resources";

#[derive(Clone)]
pub struct EmergencyResourceRepository {
    pool: PgPool,
}

impl EmergencyResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<EmergencyResource>> {
        sqlx::query_as::<_, EmergencyResource>(&format!("{RESOURCE_SELECT} ORDER BY resource_id"))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    pub async fn get(&self, resource_id: i32) -> Result<EmergencyResource> {
        sqlx::query_as::<_, EmergencyResource>(&format!("{RESOURCE_SELECT} WHERE resource_id = $1"))
            .bind(resource_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("No emergency resource with id: {resource_id}")))
    }

    /// Resources linked to any of the given issues.
    pub async fn for_issues(&self, issue_ids: &[i32]) -> Result<Vec<EmergencyResource>> {
        if issue_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, EmergencyResource>(&format!(
            "{RESOURCE_SELECT} WHERE issue_id = ANY($1) ORDER BY resource_id"
        ))
        .bind(issue_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    /// Resources whose issue name contains `issue` (case-insensitive).
    pub async fn for_issue_name(&self, issue: &str) -> Result<Vec<EmergencyResource>> {
        sqlx::query_as::<_, EmergencyResource>(
            r#"
            SELECT er.resource_id, er.resource_name, er.phone_number, er.description, er.issue_id
            FROM emergency_resources er
            JOIN medical_issues mi ON mi.issue_id = er.issue_id
            WHERE mi.issue_name ILIKE $1
            ORDER BY er.resource_id
            "#,
        )
        .bind(super::search::contains_pattern(issue))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    pub async fn create(
        &self,
        resource_name: &str,
        phone_number: &str,
        description: Option<&str>,
        issue_id: Option<i32>,
    ) -> Result<EmergencyResource> {
        sqlx::query_as::<_, EmergencyResource>(
            r#"
            INSERT INTO emergency_resources (resource_name, phone_number, description, issue_id)
            VALUES ($1, $2, $3, $4)
            RETURNING resource_id, resource_name, phone_number, description, issue_id
            "#,
        )
        .bind(resource_name)
        .bind(phone_number)
        .bind(description)
        .bind(issue_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    /// Partial update. Accepts the logical fields `name`, `phone`,
    /// `description` and `issue_id`.
    pub async fn update(&self, resource_id: i32, fields: FieldSet) -> Result<EmergencyResource> {
        let clause = sql_for_partial_update(fields, RESOURCE_COLUMNS)?;
        let sql = format!(
            "{} RETURNING resource_id, resource_name, phone_number, description, issue_id",
            clause.update_statement("emergency_resources", "resource_id")
        );

        clause
            .bind_as(sqlx::query_as::<_, EmergencyResource>(&sql))
            .bind(resource_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::NotFound(format!("No emergency resource with id: {resource_id}")))
    }

    pub async fn delete(&self, resource_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM emergency_resources WHERE resource_id = $1")
            .bind(resource_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("No emergency resource with id: {resource_id}")));
        }
        Ok(())
    }
}
