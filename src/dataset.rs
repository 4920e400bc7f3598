//! Loading and cleaning of the customer visit table.
//!
//! The loader reads a delimited text file with a header row into a
//! column-major [`DataTable`] of typed cells. Cleaning is limited to what
//! the pipeline defines: forward-filling missing values in row order and
//! dropping the identifier column. Both must run before the encoder
//! registry is built.
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::PipelineError;

/// One parsed cell of the raw table.
///
/// A cell that parses as a float is `Number`; anything else non-empty is
/// `Text`. Empty or whitespace-only fields are `Missing`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// Column-major in-memory table of one loaded dataset.
#[derive(Debug, Clone)]
pub struct DataTable {
    names: Vec<String>,
    columns: Vec<Vec<Cell>>,
}

impl DataTable {
    /// Read a CSV file into a table. Fails with `DataUnavailable` when the
    /// path cannot be opened or a row cannot be parsed.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<DataTable, PipelineError> {
        let file = File::open(&path).map_err(|e| PipelineError::DataUnavailable {
            path: path.as_ref().to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_csv_reader(file).map_err(|err| match err {
            PipelineError::DataUnavailable { detail, .. } => PipelineError::DataUnavailable {
                path: path.as_ref().to_path_buf(),
                detail,
            },
            other => other,
        })
    }

    /// Read CSV bytes from any reader. Used by tests to build tables from
    /// in-memory fixtures.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<DataTable, PipelineError> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| unavailable(format!("failed to read header row: {}", e)))?
            .clone();
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

        let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
        for (row_idx, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| unavailable(format!("failed to read row {}: {}", row_idx + 1, e)))?;
            for (col, raw) in record.iter().enumerate() {
                columns[col].push(Cell::parse(raw));
            }
        }

        Ok(DataTable { names, columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.column_index(name).map(|idx| self.columns[idx].as_slice())
    }

    pub(crate) fn column_by_index(&self, idx: usize) -> &[Cell] {
        &self.columns[idx]
    }

    pub(crate) fn column_mut_by_index(&mut self, idx: usize) -> &mut [Cell] {
        &mut self.columns[idx]
    }

    /// Remove a column. Returns whether the column was present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                self.names.remove(idx);
                self.columns.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Replace each missing cell with the nearest preceding non-missing
    /// value in its column. Leading missing cells stay missing until the
    /// first valid occurrence; the fill is order-dependent, not statistical.
    pub fn forward_fill(&mut self) {
        for column in &mut self.columns {
            let mut last_valid: Option<Cell> = None;
            for cell in column.iter_mut() {
                if cell.is_missing() {
                    if let Some(fill) = &last_valid {
                        *cell = fill.clone();
                    }
                } else {
                    last_valid = Some(cell.clone());
                }
            }
        }
    }
}

fn unavailable(detail: String) -> PipelineError {
    PipelineError::DataUnavailable {
        path: PathBuf::new(),
        detail,
    }
}
