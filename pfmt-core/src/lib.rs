//! Project Financial Management Tool core.
//!
//! This crate manages capital-project records and keeps their financial
//! figures current from uploaded PFMT Excel workbooks. It has two halves:
//! a CRUD service over a pluggable project store (in-memory or SQLite),
//! and an extraction pipeline that reads fixed worksheet cells, derives
//! variances, merges the result into a record, and always removes the
//! uploaded file afterwards.

pub mod error;
pub mod ingest;
pub mod services;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use ingest::{ExtractionPipeline, IngestOutcome};
pub use services::{ListOptions, ProjectPage, ProjectService};
pub use store::{MemoryProjectStore, ProjectFilter, ProjectStore, SqliteProjectStore};
pub use types::{ExtractedData, Project, ProjectTemplate, ProjectUpdate, ReportStatus};
