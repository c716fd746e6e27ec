//! Provider directory and search queries

use crate::{
    models::{AdvancedSearchRequest, ProviderSummary},
    Error, Result,
};
use sqlx::PgPool;

const SUMMARY_SELECT: &str = r#"
    SELECT pr.provider_id, u.name, u.email, pr.provider_type, pr.bio, pr.contact_information,
           a.city, a.state, a.postal_code,
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
"#;

const ISSUE_FILTER: &str = r#"
    EXISTS (
        SELECT 1
        FROM provider_supported_issues psi
        JOIN medical_issues mi ON mi.issue_id = psi.issue_id
        WHERE psi.provider_id = pr.provider_id AND mi.issue_name ILIKE ${}
    )
"#;

/// `%term%` with LIKE wildcards in `term` escaped.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[derive(Clone)]
pub struct SearchRepository {
    pool: PgPool,
}

impl SearchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_providers(&self, limit: i64) -> Result<Vec<ProviderSummary>> {
        sqlx::query_as::<_, ProviderSummary>(&format!(
            "{SUMMARY_SELECT} ORDER BY u.name, pr.provider_id LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    /// Ids of medical issues whose name contains `issue`.
    pub async fn matching_issue_ids(&self, issue: &str) -> Result<Vec<i32>> {
        sqlx::query_scalar("SELECT issue_id FROM medical_issues WHERE issue_name ILIKE $1")
            .bind(contains_pattern(issue))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    /// Providers supporting at least one issue whose name contains `issue`.
    pub async fn providers_by_issue(&self, issue: &str, limit: i64) -> Result<Vec<ProviderSummary>> {
        let sql = format!(
            "{SUMMARY_SELECT} WHERE {} ORDER BY u.name, pr.provider_id LIMIT $2",
            ISSUE_FILTER.replace("${}", "$1")
        );

        sqlx::query_as::<_, ProviderSummary>(&sql)
            .bind(contains_pattern(issue))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    pub async fn advanced(
        &self,
        filters: &AdvancedSearchRequest,
        limit: i64,
    ) -> Result<Vec<ProviderSummary>> {
        // Build dynamic query based on filters
        let mut where_clauses = vec![];
        let mut bind_count = 0;

        if filters.issue_name.is_some() {
            bind_count += 1;
            where_clauses.push(ISSUE_FILTER.replace("${}", &format!("${bind_count}")));
        }
        if filters.city.is_some() {
            bind_count += 1;
            where_clauses.push(format!("LOWER(a.city) = LOWER(${bind_count})"));
        }
        if filters.state.is_some() {
            bind_count += 1;
            where_clauses.push(format!("LOWER(a.state) = LOWER(${bind_count})"));
        }
        if filters.postal_code.is_some() {
            bind_count += 1;
            where_clauses.push(format!("a.postal_code = ${bind_count}"));
        }
        if filters.provider_type.is_some() {
            bind_count += 1;
            where_clauses.push(format!("pr.provider_type ILIKE ${bind_count}"));
        }

        let mut sql = String::from(SUMMARY_SELECT);
        if !where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clauses.join(" AND "));
        }
        bind_count += 1;
        sql.push_str(&format!(" ORDER BY u.name, pr.provider_id LIMIT ${bind_count}"));

        let mut query = sqlx::query_as::<_, ProviderSummary>(&sql);
        if let Some(issue) = &filters.issue_name {
            query = query.bind(contains_pattern(issue));
        }
        if let Some(city) = &filters.city {
            query = query.bind(city.trim().to_string());
        }
        if let Some(state) = &filters.state {
            query = query.bind(state.trim().to_string());
        }
        if let Some(postal_code) = &filters.postal_code {
            query = query.bind(postal_code.trim().to_string());
        }
        if let Some(provider_type) = &filters.provider_type {
            query = query.bind(contains_pattern(provider_type));
        }

        query
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(" anxiety "), "%anxiety%");
        assert_eq!(contains_pattern("100%_sure"), "%100\\%\\_sure%");
    }
}
