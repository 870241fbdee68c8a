//! Project CRUD and paginated listing over a record store.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{ProjectFilter, ProjectStore};
use crate::types::{Project, ProjectTemplate, ProjectUpdate, ReportStatus};

/// Default page size for listings.
const DEFAULT_PAGE_LIMIT: usize = 10;

/// Listing options: page selection plus optional equality filters.
///
/// Zero `page`/`limit` values are clamped to 1 rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: usize,
    /// Records per page.
    pub limit: usize,
    pub owner_id: Option<String>,
    pub status: Option<String>,
    pub report_status: Option<ReportStatus>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            owner_id: None,
            status: None,
            report_status: None,
        }
    }
}

impl ListOptions {
    fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            owner_id: self.owner_id.clone(),
            status: self.status.clone(),
            report_status: self.report_status,
        }
    }
}

/// Page description returned alongside listed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of project records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    pub records: Vec<Project>,
    pub pagination: Pagination,
}

/// CRUD orchestration over a project store.
///
/// Creation merges the injected [`ProjectTemplate`] with the supplied
/// fields, supplied fields taking precedence.
#[derive(Debug, Clone)]
pub struct ProjectService<S> {
    store: S,
    template: ProjectTemplate,
}

impl<S: ProjectStore> ProjectService<S> {
    /// Service with the stock creation template.
    pub fn new(store: S) -> Self {
        Self::with_template(store, ProjectTemplate::standard())
    }

    /// Service with an injected creation template.
    pub fn with_template(store: S, template: ProjectTemplate) -> Self {
        Self { store, template }
    }

    /// List one page of projects matching the filters.
    ///
    /// Out-of-range pages return an empty slice, never an error.
    pub async fn list(&self, options: ListOptions) -> Result<ProjectPage> {
        let page = options.page.max(1);
        let limit = options.limit.max(1);

        let matching = self.store.get_all(&options.filter()).await?;
        let total = matching.len();
        let total_pages = total.div_ceil(limit);

        // Saturate so absurd page numbers skip everything instead of
        // overflowing the offset.
        let records: Vec<Project> = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        Ok(ProjectPage {
            records,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages,
                has_next: page < total_pages,
                has_prev: page > 1,
            },
        })
    }

    /// Fetch a single project; absence is `Ok(None)`, not an error.
    pub async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        self.store.get_by_id(id).await
    }

    /// Create a project from the template plus the supplied fields.
    pub async fn create(&self, data: ProjectUpdate) -> Result<Project> {
        require_field(&data.name, "name")?;
        require_field(&data.description, "description")?;
        require_finite(&data)?;

        let mut project = self.template.blank_project();
        project.id = Uuid::new_v4();
        data.apply(&mut project);

        log::debug!("Creating project '{}' ({})", project.name, project.id);
        self.store.create(project).await
    }

    /// Merge the set fields into an existing project.
    ///
    /// Resolution comes first: an unknown id is `NotFound` even when the
    /// payload would also fail validation.
    pub async fn update(&self, id: Uuid, updates: ProjectUpdate) -> Result<Project> {
        if self.store.get_by_id(id).await?.is_none() {
            return Err(Error::NotFound(id));
        }
        require_finite(&updates)?;

        log::debug!("Updating project {}", id);
        self.store.update(id, updates).await
    }

    /// Delete an existing project.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        if self.store.get_by_id(id).await?.is_none() {
            return Err(Error::NotFound(id));
        }

        log::debug!("Deleting project {}", id);
        self.store.delete(id).await
    }
}

/// Creation requires the field present and non-blank.
fn require_field(value: &Option<String>, field: &str) -> Result<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(Error::validation(format!("{field} is required"))),
    }
}

/// Financial figures must stay finite on every write path.
fn require_finite(data: &ProjectUpdate) -> Result<()> {
    let bad = data.non_finite_fields();
    if bad.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "non-finite value for {}",
            bad.join(", ")
        )))
    }
}
