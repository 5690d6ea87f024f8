//! XLSX roster reader.
//!
//! Reads the first worksheet of an Excel workbook. Date cells may be native
//! Excel dates (serial numbers) or text in one of the accepted formats;
//! the allotted-days column accepts numeric or text cells.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use tracing::debug;

use leaveplan_core::{LeaveRecord, Roster};

use crate::{parse_allotted, parse_date, HeaderMap, IngestError};

/// Read a roster from an XLSX workbook at `path`.
pub fn read_xlsx(path: &Path, title: &str) -> Result<Roster, IngestError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let Some(sheet_name) = sheet_names.first() else {
        return Err(IngestError::EmptyWorkbook);
    };

    let range = workbook.worksheet_range(sheet_name)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    let map = HeaderMap::locate(&headers)?;

    let mut roster = Roster::new(title);

    for (idx, data_row) in rows.enumerate() {
        let row = idx + 2; // 1-based, after the header

        // Trailing formatting artifacts show up as all-empty rows
        if data_row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let empty = Data::Empty;
        let cell = |col: usize| data_row.get(col).unwrap_or(&empty);

        let employee = match cell(map.employee) {
            Data::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => {
                return Err(IngestError::MissingValue {
                    row,
                    column: "Empleado",
                })
            }
        };
        let start = date_cell(cell(map.start), row, "Fecha_Inicio")?;
        let end = date_cell(cell(map.end), row, "Fecha_Fin")?;
        let allotted = allotted_cell(cell(map.allotted), row)?;

        roster.add(LeaveRecord::new(employee, start, end, allotted));
    }

    debug!(records = roster.len(), sheet = %sheet_name, "XLSX roster loaded");
    Ok(roster)
}

/// Text view of a header cell
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Interpret a date cell: native Excel dates first, then text
fn date_cell(cell: &Data, row: usize, column: &'static str) -> Result<NaiveDate, IngestError> {
    match cell {
        Data::DateTime(dt) => {
            serial_to_date(dt.as_f64()).ok_or_else(|| IngestError::InvalidDate {
                row,
                column,
                value: dt.as_f64().to_string(),
            })
        }
        Data::DateTimeIso(s) | Data::String(s) => parse_date(s, row, column),
        Data::Empty => Err(IngestError::MissingValue { row, column }),
        other => Err(IngestError::InvalidDate {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

/// Interpret the allotted-days cell: numeric cells must be whole numbers
fn allotted_cell(cell: &Data, row: usize) -> Result<i64, IngestError> {
    const COLUMN: &str = "Dias_Totales";
    match cell {
        Data::Int(i) => Ok(*i),
        Data::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        Data::Float(f) => Err(IngestError::InvalidNumber {
            row,
            column: COLUMN,
            value: f.to_string(),
        }),
        Data::String(s) => parse_allotted(s, row, COLUMN),
        Data::Empty => Err(IngestError::MissingValue { row, column: COLUMN }),
        other => Err(IngestError::InvalidNumber {
            row,
            column: COLUMN,
            value: other.to_string(),
        }),
    }
}

/// Convert an Excel date serial to a calendar date.
///
/// Excel day 0 is 1899-12-30 (the offset absorbs the fictitious
/// 1900-02-29); fractional parts carry the time of day and are dropped.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Write a minimal workbook with the given rows of text/number cells
    fn workbook_fixture(headers: &[&str], rows: &[Vec<Data>]) -> tempfile::NamedTempFile {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Data::String(s) => {
                        sheet.write_string((r + 1) as u32, c as u16, s).unwrap();
                    }
                    Data::Float(f) => {
                        sheet.write_number((r + 1) as u32, c as u16, *f).unwrap();
                    }
                    _ => {}
                }
            }
        }

        let file = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        workbook.save(file.path()).unwrap();
        file
    }

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn reads_workbook_with_text_dates_and_numeric_allotment() {
        let file = workbook_fixture(
            &["Empleado", "Fecha_Inicio", "Fecha_Fin", "Dias_Totales"],
            &[
                vec![s("Ana"), s("2024-07-01"), s("2024-07-05"), Data::Float(22.0)],
                vec![s("Bruno"), s("12/08/2024"), s("16/08/2024"), Data::Float(20.0)],
            ],
        );

        let roster = read_xlsx(file.path(), "plan").unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.records[0].employee, "Ana");
        assert_eq!(roster.records[0].allotted_days, 22);
        assert_eq!(roster.records[1].start, date(2024, 8, 12));
    }

    #[test]
    fn missing_column_in_workbook() {
        let file = workbook_fixture(
            &["Empleado", "Fecha_Inicio", "Fecha_Fin"],
            &[vec![s("Ana"), s("2024-07-01"), s("2024-07-05")]],
        );

        let err = read_xlsx(file.path(), "plan").unwrap_err();
        match err {
            IngestError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Dias_Totales"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn fractional_allotment_is_rejected() {
        let file = workbook_fixture(
            &["Empleado", "Fecha_Inicio", "Fecha_Fin", "Dias_Totales"],
            &[vec![s("Ana"), s("2024-07-01"), s("2024-07-05"), Data::Float(22.5)]],
        );

        let err = read_xlsx(file.path(), "plan").unwrap_err();
        assert!(matches!(err, IngestError::InvalidNumber { row: 2, .. }));
    }

    #[test]
    fn serial_conversion_matches_excel_epoch() {
        // 45292 is Excel's serial for 2024-01-01
        assert_eq!(serial_to_date(45292.0), Some(date(2024, 1, 1)));
        // Fractional part (time of day) is dropped
        assert_eq!(serial_to_date(45292.75), Some(date(2024, 1, 1)));
    }

    #[test]
    fn unreadable_workbook_is_an_xlsx_error() {
        let mut file = tempfile::NamedTempFile::with_suffix(".xlsx").unwrap();
        use std::io::Write;
        writeln!(file, "this is not a zip archive").unwrap();

        assert!(read_xlsx(file.path(), "plan").is_err());
    }
}
