//! # leaveplan-ingest
//!
//! Reads a vacation roster from a tabular file into the typed domain model.
//!
//! Two input formats are supported, detected from the file extension:
//! - CSV (the default)
//! - XLSX workbooks (first sheet only)
//!
//! Both share the same header contract: the header row must contain the
//! columns `Empleado`, `Fecha_Inicio`, `Fecha_Fin` and `Dias_Totales`.
//! Extra columns are ignored. There is no partial-success mode: the first
//! invalid cell aborts the whole load.
//!
//! ## Example
//!
//! ```rust
//! use leaveplan_ingest::read_csv;
//!
//! let input = "\
//! Empleado,Fecha_Inicio,Fecha_Fin,Dias_Totales
//! Ana,2024-07-01,2024-07-05,22
//! ";
//!
//! let roster = read_csv(input.as_bytes(), "vacations").unwrap();
//! assert_eq!(roster.records.len(), 1);
//! ```

mod csv_reader;
mod xlsx_reader;

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use leaveplan_core::Roster;

pub use csv_reader::read_csv;
pub use xlsx_reader::read_xlsx;

/// The four columns every input file must carry
pub const REQUIRED_COLUMNS: [&str; 4] = ["Empleado", "Fecha_Inicio", "Fecha_Fin", "Dias_Totales"];

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("workbook contains no sheets")]
    EmptyWorkbook,

    #[error(
        "missing required column(s): {}; the header row must contain {}",
        .missing.join(", "),
        REQUIRED_COLUMNS.join(", ")
    )]
    MissingColumns { missing: Vec<String> },

    #[error("row {row}: empty value in column {column}")]
    MissingValue { row: usize, column: &'static str },

    #[error("row {row}: cannot parse {column} value {value:?} as a calendar date")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: cannot parse {column} value {value:?} as a whole number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values (default)
    Csv,
    /// Excel workbook
    Xlsx,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm") => {
            FileFormat::Xlsx
        }
        _ => FileFormat::Csv,
    }
}

/// Read a roster file from a path (auto-detects format).
///
/// The roster title is taken from the file stem.
pub fn read_file(path: &Path) -> Result<Roster, IngestError> {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("vacations")
        .to_string();

    let format = detect_format(path);
    debug!(?format, path = %path.display(), "loading roster");

    match format {
        FileFormat::Xlsx => read_xlsx(path, &title),
        FileFormat::Csv => {
            let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
                path: path.display().to_string(),
                source,
            })?;
            read_csv(file, &title)
        }
    }
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderMap {
    pub employee: usize,
    pub start: usize,
    pub end: usize,
    pub allotted: usize,
}

impl HeaderMap {
    /// Locate the required columns, case-sensitively. Collects every
    /// missing name so the error lists them all at once.
    pub(crate) fn locate<S: AsRef<str>>(headers: &[S]) -> Result<Self, IngestError> {
        let find = |name: &str| headers.iter().position(|h| h.as_ref() == name);

        let mut missing = Vec::new();
        for name in REQUIRED_COLUMNS {
            if find(name).is_none() {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns { missing });
        }

        Ok(Self {
            employee: find("Empleado").unwrap_or(0),
            start: find("Fecha_Inicio").unwrap_or(0),
            end: find("Fecha_Fin").unwrap_or(0),
            allotted: find("Dias_Totales").unwrap_or(0),
        })
    }
}

/// Parse a date cell. ISO first, then the day-first form common in
/// exported sheets.
pub(crate) fn parse_date(
    value: &str,
    row: usize,
    column: &'static str,
) -> Result<NaiveDate, IngestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IngestError::MissingValue { row, column });
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| IngestError::InvalidDate {
            row,
            column,
            value: trimmed.to_string(),
        })
}

/// Parse the allotted-days cell as a whole number
pub(crate) fn parse_allotted(
    value: &str,
    row: usize,
    column: &'static str,
) -> Result<i64, IngestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IngestError::MissingValue { row, column });
    }

    trimmed
        .parse::<i64>()
        .map_err(|_| IngestError::InvalidNumber {
            row,
            column,
            value: trimmed.to_string(),
        })
}
