//! Project record persistence.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryProjectStore;
pub use sqlite::SqliteProjectStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Project, ProjectUpdate, ReportStatus};

/// Equality filters for listing projects. Unset fields mean no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub owner_id: Option<String>,
    pub status: Option<String>,
    pub report_status: Option<ReportStatus>,
}

impl ProjectFilter {
    /// Whether a record satisfies every set filter.
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(owner_id) = &self.owner_id {
            if &project.owner_id != owner_id {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &project.status != status {
                return false;
            }
        }
        if let Some(report_status) = self.report_status {
            if project.report_status != report_status {
                return false;
            }
        }
        true
    }
}

/// Keyed store of project records.
///
/// `get_all` returns records ordered by (`created_at`, `id`) so paginated
/// listings are deterministic across implementations. `update` merges the
/// set fields of the payload into the stored record, bumps `updated_at`,
/// and returns the merged record; `update` and `delete` fail with
/// `Error::NotFound` for unknown ids. `create` persists the record as
/// given: defaulting and creation timestamps belong to the service layer.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>>;

    async fn get_all(&self, filter: &ProjectFilter) -> Result<Vec<Project>>;

    async fn create(&self, project: Project) -> Result<Project>;

    async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectTemplate;

    #[test]
    fn test_filter_matches_set_fields_only() {
        let mut project = ProjectTemplate::standard().blank_project();
        project.owner_id = "alex".to_string();
        project.status = "Active".to_string();

        assert!(ProjectFilter::default().matches(&project));

        let filter = ProjectFilter {
            owner_id: Some("alex".to_string()),
            ..ProjectFilter::default()
        };
        assert!(filter.matches(&project));

        let filter = ProjectFilter {
            owner_id: Some("sam".to_string()),
            ..ProjectFilter::default()
        };
        assert!(!filter.matches(&project));

        let filter = ProjectFilter {
            owner_id: Some("alex".to_string()),
            status: Some("Closed".to_string()),
            ..ProjectFilter::default()
        };
        assert!(!filter.matches(&project));

        let filter = ProjectFilter {
            report_status: Some(ReportStatus::Current),
            ..ProjectFilter::default()
        };
        assert!(!filter.matches(&project));
    }
}
