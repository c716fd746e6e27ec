use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MedicalIssue {
    pub issue_id: i32,
    pub issue_name: String,
    pub description: Option<String>,
}
