//! Provider search payloads

use super::{EmergencyResource, ProviderSummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchRequest {
    #[serde(alias = "issueName")]
    #[validate(length(min = 1, max = 100))]
    pub issue_name: String,
}

/// Filters for `/search/advanced`. All filters are optional and combine
/// with AND; text filters match case-insensitively.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AdvancedSearchRequest {
    #[serde(alias = "issueName")]
    #[validate(length(min = 1, max = 100))]
    pub issue_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub state: Option<String>,
    #[serde(alias = "postalCode")]
    #[validate(length(min = 1, max = 20))]
    pub postal_code: Option<String>,
    #[serde(alias = "providerType")]
    #[validate(length(min = 1, max = 100))]
    pub provider_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub providers: Vec<ProviderSummary>,
    #[serde(rename = "emergencyResources")]
    pub emergency_resources: Vec<EmergencyResource>,
}
