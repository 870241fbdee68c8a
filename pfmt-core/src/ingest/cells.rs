//! Fixed financial-cell schema and the extraction/coercion passes.

use crate::ingest::workbook::{CellValue, Sheet};
use crate::types::Figures;

/// Project financial field fed by one workbook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialField {
    Taf,
    Eac,
    CurrentYearCashflow,
    CurrentYearTarget,
}

/// Cell schema of the reporting sheet. Extending the extraction means
/// adding a pair here, not touching the extraction loop.
pub const FINANCIAL_CELLS: &[(&str, FinancialField)] = &[
    ("C5", FinancialField::Taf),
    ("C6", FinancialField::Eac),
    ("C7", FinancialField::CurrentYearCashflow),
    ("C8", FinancialField::CurrentYearTarget),
];

/// Read the financial figures from a sheet.
///
/// Defaulting happens twice: a missing cell reads as the number 0, and any
/// non-numeric value that fails float parsing also becomes 0. The second
/// layer is what turns text-formatted numbers into figures.
pub fn extract_figures(sheet: &Sheet) -> Figures {
    let mut figures = Figures::default();

    for (address, field) in FINANCIAL_CELLS {
        let raw = raw_cell(sheet, address);
        let value = coerce_numeric(&raw);
        log::debug!("Cell {} -> {:?} = {}", address, field, value);

        match field {
            FinancialField::Taf => figures.taf = value,
            FinancialField::Eac => figures.eac = value,
            FinancialField::CurrentYearCashflow => figures.current_year_cashflow = value,
            FinancialField::CurrentYearTarget => figures.current_year_target = value,
        }
    }

    figures
}

/// Extraction pass: a cell with no value reads as the number 0.
fn raw_cell(sheet: &Sheet, address: &str) -> CellValue {
    sheet
        .cell(address)
        .cloned()
        .unwrap_or(CellValue::Number(0.0))
}

/// Coercion pass: keep numbers, parse numeric text, zero everything else.
/// Non-finite results also collapse to 0 so records never hold NaN.
fn coerce_numeric(value: &CellValue) -> f64 {
    let number = match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        CellValue::Bool(_) | CellValue::Date(_) => None,
    };

    number.filter(|n| n.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_sheet(cells: &[(&str, CellValue)]) -> Sheet {
        let mut sheet = Sheet::new();
        for (address, value) in cells {
            let (row, col) = crate::ingest::workbook::parse_address(address).unwrap();
            sheet.insert(row, col, value.clone());
        }
        sheet
    }

    #[test]
    fn test_extract_numeric_cells() {
        let sheet = make_sheet(&[
            ("C5", CellValue::Number(1000.0)),
            ("C6", CellValue::Number(1250.5)),
            ("C7", CellValue::Number(300.0)),
            ("C8", CellValue::Number(450.0)),
        ]);

        let figures = extract_figures(&sheet);
        assert_eq!(figures.taf, 1000.0);
        assert_eq!(figures.eac, 1250.5);
        assert_eq!(figures.current_year_cashflow, 300.0);
        assert_eq!(figures.current_year_target, 450.0);
    }

    #[test]
    fn test_missing_cells_default_to_zero() {
        let figures = extract_figures(&Sheet::new());
        assert_eq!(figures, Figures::default());

        let sheet = make_sheet(&[("C5", CellValue::Number(77.0))]);
        let figures = extract_figures(&sheet);
        assert_eq!(figures.taf, 77.0);
        assert_eq!(figures.eac, 0.0);
        assert_eq!(figures.current_year_target, 0.0);
    }

    #[test]
    fn test_text_numbers_are_parsed() {
        let sheet = make_sheet(&[
            ("C5", CellValue::Text("1234.5".to_string())),
            ("C6", CellValue::Text("  42 ".to_string())),
            ("C7", CellValue::Text("-17.25".to_string())),
        ]);

        let figures = extract_figures(&sheet);
        assert_eq!(figures.taf, 1234.5);
        assert_eq!(figures.eac, 42.0);
        assert_eq!(figures.current_year_cashflow, -17.25);
    }

    #[test]
    fn test_unparsable_cells_become_zero() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let sheet = make_sheet(&[
            ("C5", CellValue::Text("approximately 5".to_string())),
            ("C6", CellValue::Bool(true)),
            ("C7", CellValue::Date(date)),
            ("C8", CellValue::Text(String::new())),
        ]);

        let figures = extract_figures(&sheet);
        assert_eq!(figures, Figures::default());
    }

    #[test]
    fn test_non_finite_text_becomes_zero() {
        let sheet = make_sheet(&[
            ("C5", CellValue::Text("NaN".to_string())),
            ("C6", CellValue::Text("inf".to_string())),
        ]);

        let figures = extract_figures(&sheet);
        assert_eq!(figures.taf, 0.0);
        assert_eq!(figures.eac, 0.0);
    }

    #[test]
    fn test_schema_covers_the_fixed_block() {
        let addresses: Vec<&str> = FINANCIAL_CELLS.iter().map(|(a, _)| *a).collect();
        assert_eq!(addresses, vec!["C5", "C6", "C7", "C8"]);
    }
}
