//! Medical issue catalogue and emergency resources

use crate::{
    db::{EmergencyResourceRepository, MedicalIssueRepository},
    models::{EmergencyResource, MedicalIssue},
    Result,
};

pub struct CatalogService {
    issues: MedicalIssueRepository,
    resources: EmergencyResourceRepository,
}

impl CatalogService {
    pub fn new(issues: MedicalIssueRepository, resources: EmergencyResourceRepository) -> Self {
        Self { issues, resources }
    }

    pub async fn medical_issues(&self) -> Result<Vec<MedicalIssue>> {
        self.issues.list().await
    }

    /// All resources, or only those for issues whose name contains `issue`.
    pub async fn emergency_resources(&self, issue: Option<&str>) -> Result<Vec<EmergencyResource>> {
        match issue.map(str::trim) {
            Some(issue) if !issue.is_empty() => self.resources.for_issue_name(issue).await,
            _ => self.resources.list().await,
        }
    }

    pub async fn emergency_resource(&self, resource_id: i32) -> Result<EmergencyResource> {
        self.resources.get(resource_id).await
    }
}
