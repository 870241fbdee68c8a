//! Workbook model shared by the extraction pipeline and its readers.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::Result;

/// Typed value of a single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDateTime),
}

/// Sparse grid of typed cells, addressable by A1-style coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    cells: HashMap<(u32, u32), CellValue>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value at a 0-based (row, column) position.
    pub fn insert(&mut self, row: u32, col: u32, value: CellValue) {
        self.cells.insert((row, col), value);
    }

    /// Look up a cell by A1-style address ("C5").
    ///
    /// Absent cells and malformed addresses both yield `None`.
    pub fn cell(&self, address: &str) -> Option<&CellValue> {
        let (row, col) = parse_address(address)?;
        self.cell_at(row, col)
    }

    /// Look up a cell by 0-based (row, column) position.
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Parsed workbook: named sheets in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheet_names: Vec<String>,
    sheets: HashMap<String, Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet; an existing sheet of the same name is replaced
    /// without changing its position.
    pub fn push_sheet(&mut self, name: impl Into<String>, sheet: Sheet) {
        let name = name.into();
        if !self.sheets.contains_key(&name) {
            self.sheet_names.push(name.clone());
        }
        self.sheets.insert(name, sheet);
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// First sheet in workbook order, if any.
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheet_names
            .first()
            .and_then(|name| self.sheets.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.sheet_names.is_empty()
    }
}

/// Source of parsed workbooks.
///
/// Implementations fail with `Error::Parse` when the file cannot be read
/// as a workbook.
pub trait WorkbookReader {
    fn parse(&self, path: &Path) -> Result<Workbook>;
}

/// Parse an A1-style cell address into a 0-based (row, column) pair.
///
/// Letters are case-insensitive and rows are 1-based, so "C5" is (4, 2).
pub fn parse_address(address: &str) -> Option<(u32, u32)> {
    let re = Regex::new(r"^([A-Za-z]+)([1-9][0-9]*)$").ok()?;
    let caps = re.captures(address.trim())?;

    let mut col: u32 = 0;
    for c in caps[1].chars() {
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        col = col.checked_mul(26)?.checked_add(digit)?;
    }

    let row: u32 = caps[2].parse().ok()?;
    Some((row - 1, col - 1))
}
