//! Excel-backed workbook reader built on calamine.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{Error, Result};
use crate::ingest::workbook::{CellValue, Sheet, Workbook, WorkbookReader};

/// Reads .xlsx/.xls/.xlsb/.ods workbooks from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelWorkbookReader;

impl WorkbookReader for ExcelWorkbookReader {
    fn parse(&self, path: &Path) -> Result<Workbook> {
        read_workbook(path)
    }
}

/// Parse the workbook at `path`, materializing every sheet.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut source = open_workbook_auto(path)
        .map_err(|e| Error::parse(format!("failed to open workbook {}: {e}", path.display())))?;

    let sheet_names: Vec<String> = source.sheet_names().to_vec();
    let mut workbook = Workbook::new();

    for sheet_name in sheet_names {
        let sheet = convert_sheet(&sheet_name, path, source.worksheet_range(&sheet_name));
        workbook.push_sheet(sheet_name, sheet);
    }

    Ok(workbook)
}

/// Convert one sheet's range lookup into a sheet.
///
/// A range that cannot be read keeps the sheet name with no cells and
/// warns, so the other sheets stay readable.
fn convert_sheet(
    sheet_name: &str,
    path: &Path,
    range: std::result::Result<Range<Data>, calamine::Error>,
) -> Sheet {
    match range {
        Ok(range) => convert_range(&range),
        Err(e) => {
            log::warn!(
                "Skipping unreadable sheet '{}' in {}: {}",
                sheet_name,
                path.display(),
                e
            );
            Sheet::new()
        }
    }
}

/// Copy the used cells of a calamine range into a sheet.
///
/// Calamine ranges start at the first used cell, so positions are shifted
/// back to absolute sheet coordinates.
fn convert_range(range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new();
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    for (r, row) in range.rows().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if let Some(value) = convert_cell(cell) {
                sheet.insert(start_row + r as u32, start_col + c as u32, value);
            }
        }
    }

    sheet
}

/// Map a calamine cell to a typed value; empty and error cells are absent.
fn convert_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => dt.as_datetime().map(CellValue::Date),
        Data::DateTimeIso(s) => Some(CellValue::Text(s.clone())),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;
    use std::path::PathBuf;

    fn write_fixture(dir: &tempfile::TempDir) -> Result<PathBuf> {
        let path = dir.path().join("fixture.xlsx");
        let mut workbook = XlsxWorkbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name("SP Fields")?;
        sheet.write_number(4, 2, 1500.0)?; // C5
        sheet.write_string(5, 2, "2500.5")?; // C6
        sheet.write_string(6, 2, "not a number")?; // C7
        sheet.write_boolean(7, 2, true)?; // C8
        sheet.write_string(0, 0, "Title")?; // A1

        let second = workbook.add_worksheet();
        second.set_name("Notes")?;
        second.write_string(0, 0, "left intentionally blank")?;

        workbook.save(&path)?;
        Ok(path)
    }

    #[test]
    fn test_read_workbook_cells() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_fixture(&dir)?;

        let workbook = read_workbook(&path)?;
        assert_eq!(workbook.sheet_names(), ["SP Fields", "Notes"]);

        let sheet = workbook.sheet("SP Fields").unwrap();
        assert_eq!(sheet.cell("C5"), Some(&CellValue::Number(1500.0)));
        assert_eq!(
            sheet.cell("C6"),
            Some(&CellValue::Text("2500.5".to_string()))
        );
        assert_eq!(
            sheet.cell("C7"),
            Some(&CellValue::Text("not a number".to_string()))
        );
        assert_eq!(sheet.cell("C8"), Some(&CellValue::Bool(true)));
        assert_eq!(sheet.cell("A1"), Some(&CellValue::Text("Title".to_string())));
        assert_eq!(sheet.cell("D9"), None);
        Ok(())
    }

    #[test]
    fn test_read_workbook_offsets_sparse_sheets() -> Result<()> {
        // Nothing above or left of C5, so the used range does not start
        // at A1 and positions must be shifted back.
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sparse.xlsx");
        let mut workbook = XlsxWorkbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_number(4, 2, 111.0)?; // C5
        sheet.write_number(7, 2, 444.0)?; // C8
        workbook.save(&path)?;

        let parsed = read_workbook(&path)?;
        let sheet = parsed.first_sheet().unwrap();
        assert_eq!(sheet.cell("C5"), Some(&CellValue::Number(111.0)));
        assert_eq!(sheet.cell("C8"), Some(&CellValue::Number(444.0)));
        assert_eq!(sheet.cell("A1"), None);
        Ok(())
    }

    #[test]
    fn test_convert_sheet_keeps_absolute_positions() {
        let mut range = Range::new((4, 2), (7, 2));
        range.set_value((4, 2), Data::Float(1500.0));
        range.set_value((7, 2), Data::String("2500.5".to_string()));

        let sheet = convert_sheet("SP Fields", Path::new("report.xlsx"), Ok(range));
        assert_eq!(sheet.cell("C5"), Some(&CellValue::Number(1500.0)));
        assert_eq!(
            sheet.cell("C8"),
            Some(&CellValue::Text("2500.5".to_string()))
        );
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_convert_sheet_unreadable_range_is_empty() {
        let sheet = convert_sheet(
            "Corrupt",
            Path::new("report.xlsx"),
            Err(calamine::Error::Msg("worksheet range is unreadable")),
        );
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_read_workbook_rejects_non_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-workbook.xlsx");
        std::fs::write(&path, b"plain text pretending to be a workbook").unwrap();

        let err = read_workbook(&path).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_read_workbook_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.xlsx");

        let err = read_workbook(&path).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
