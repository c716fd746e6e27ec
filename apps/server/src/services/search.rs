//! Provider search and directory listing

use crate::{
    db::{EmergencyResourceRepository, SearchRepository},
    models::{AdvancedSearchRequest, ProviderSummary, SearchResponse},
    Error, Result,
};

pub struct SearchService {
    search: SearchRepository,
    resources: EmergencyResourceRepository,
    max_results: i64,
}

impl SearchService {
    pub fn new(
        search: SearchRepository,
        resources: EmergencyResourceRepository,
        max_results: i64,
    ) -> Self {
        Self {
            search,
            resources,
            max_results,
        }
    }

    pub async fn directory(&self) -> Result<Vec<ProviderSummary>> {
        self.search.list_providers(self.max_results).await
    }

    /// Providers treating any issue whose name contains `issue_name`, plus
    /// the emergency resources linked to those issues.
    pub async fn by_issue(&self, issue_name: &str) -> Result<SearchResponse> {
        let issue_name = issue_name.trim();
        if issue_name.is_empty() {
            return Err(Error::BadRequest("issue_name must not be empty".to_string()));
        }

        let issue_ids = self.search.matching_issue_ids(issue_name).await?;
        if issue_ids.is_empty() {
            return Err(Error::NotFound(format!(
                "No medical issue matches '{issue_name}'"
            )));
        }

        let providers = self
            .search
            .providers_by_issue(issue_name, self.max_results)
            .await?;
        let emergency_resources = self.resources.for_issues(&issue_ids).await?;

        tracing::debug!(
            issue = issue_name,
            providers = providers.len(),
            resources = emergency_resources.len(),
            "Search by issue"
        );

        Ok(SearchResponse {
            providers,
            emergency_resources,
        })
    }

    pub async fn advanced(&self, filters: &AdvancedSearchRequest) -> Result<SearchResponse> {
        let providers = self.search.advanced(filters, self.max_results).await?;
        let emergency_resources = match filters.issue_name.as_deref().map(str::trim) {
            Some(issue) if !issue.is_empty() => self.resources.for_issue_name(issue).await?,
            _ => Vec::new(),
        };

        Ok(SearchResponse {
            providers,
            emergency_resources,
        })
    }
}
