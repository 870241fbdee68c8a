//! One-shot workbook ingestion: extract figures, merge, always clean up.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingest::cells::extract_figures;
use crate::ingest::excel::ExcelWorkbookReader;
use crate::ingest::workbook::{Sheet, Workbook, WorkbookReader};
use crate::store::ProjectStore;
use crate::types::{ExtractedData, Project, ProjectUpdate, ReportStatus};

/// Sheet the financial figures live on. Workbooks without it fall back to
/// their first sheet.
pub const FINANCIAL_SHEET: &str = "SP Fields";

/// Result of one ingestion: the merged record plus what was read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub project: Project,
    pub extracted_data: ExtractedData,
}

/// Uploaded workbook file, removed from disk when the value is dropped.
///
/// Removal failure is logged as a warning and never escalated.
#[derive(Debug)]
pub struct UploadedFile {
    path: PathBuf,
}

impl UploadedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!(
                "Failed to remove uploaded file {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Extracts financial figures from uploaded workbooks into project records.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline<S, R = ExcelWorkbookReader> {
    store: S,
    reader: R,
}

impl<S: ProjectStore> ExtractionPipeline<S> {
    /// Pipeline reading real Excel workbooks.
    pub fn new(store: S) -> Self {
        Self {
            store,
            reader: ExcelWorkbookReader,
        }
    }
}

impl<S: ProjectStore, R: WorkbookReader> ExtractionPipeline<S, R> {
    /// Pipeline with a custom workbook reader.
    pub fn with_reader(store: S, reader: R) -> Self {
        Self { store, reader }
    }

    /// Ingest the uploaded workbook at `file_path` into the given project.
    ///
    /// The file is removed from disk on every exit path, success or
    /// failure; removal failure is only warned about. On success the
    /// record's financial and provenance fields are overwritten and its
    /// report status becomes "Current".
    pub async fn ingest(
        &self,
        project_id: Uuid,
        file_path: impl Into<PathBuf>,
        file_name: &str,
    ) -> Result<IngestOutcome> {
        // The guard owns file removal from here on.
        let upload = UploadedFile::new(file_path);

        // 1. Resolve the project before touching the workbook.
        self.store
            .get_by_id(project_id)
            .await?
            .ok_or(Error::NotFound(project_id))?;

        // 2. Parse the uploaded file.
        let workbook = self.reader.parse(upload.path())?;

        // 3. Prefer the reporting sheet, fall back to the first one.
        let sheet = select_sheet(&workbook)?;

        // 4. + 5. Fixed-cell extraction with both defaulting layers.
        let figures = extract_figures(sheet);

        // 6. + 7. Derive variances and merge everything into the record.
        let now = Utc::now();
        let extracted_data = ExtractedData::from_figures(figures, file_name, now);
        let updates = ProjectUpdate {
            taf: Some(figures.taf),
            eac: Some(figures.eac),
            current_year_cashflow: Some(figures.current_year_cashflow),
            target_cashflow: Some(figures.current_year_target),
            taf_eac_variance: Some(extracted_data.taf_eac_variance),
            cashflow_variance: Some(extracted_data.cashflow_variance),
            report_status: Some(ReportStatus::Current),
            last_pfmt_update: Some(now),
            pfmt_file_name: Some(file_name.to_string()),
            pfmt_extracted_at: Some(now),
            ..ProjectUpdate::default()
        };
        let project = self.store.update(project_id, updates).await?;

        log::info!(
            "Ingested '{}' into project {}: taf={} eac={}",
            file_name,
            project_id,
            figures.taf,
            figures.eac
        );

        Ok(IngestOutcome {
            project,
            extracted_data,
        })
    }
}

/// Pick the sheet the figures are read from.
fn select_sheet(workbook: &Workbook) -> Result<&Sheet> {
    if let Some(sheet) = workbook.sheet(FINANCIAL_SHEET) {
        return Ok(sheet);
    }
    workbook
        .first_sheet()
        .ok_or_else(|| Error::parse("No worksheets found"))
}
