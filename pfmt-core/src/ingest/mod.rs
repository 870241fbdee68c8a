//! Workbook ingestion: reading uploaded Excel files and pulling their
//! financial figures into project records.

pub mod cells;
pub mod excel;
pub mod pipeline;
pub mod workbook;

pub use cells::{FINANCIAL_CELLS, FinancialField, extract_figures};
pub use excel::{ExcelWorkbookReader, read_workbook};
pub use pipeline::{ExtractionPipeline, FINANCIAL_SHEET, IngestOutcome, UploadedFile};
pub use workbook::{CellValue, Sheet, Workbook, WorkbookReader, parse_address};
