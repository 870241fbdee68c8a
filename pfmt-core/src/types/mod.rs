//! Domain types for project records and extraction results.

pub mod extracted;
pub mod project;

pub use extracted::{ExtractedData, Figures, Variances};
pub use project::{Project, ProjectTemplate, ProjectUpdate, ReportStatus};
