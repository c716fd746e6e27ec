use serde::{Deserialize, Serialize};

/// Hotline or service shown alongside search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmergencyResource {
    pub resource_id: i32,
    pub resource_name: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub issue_id: Option<i32>,
}
