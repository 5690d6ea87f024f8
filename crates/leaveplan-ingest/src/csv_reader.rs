//! CSV roster reader.
//!
//! Header handling and cell parsing follow the shared contract in the crate
//! root; this module only deals with the `csv` crate mechanics.

use std::io::Read;

use tracing::debug;

use leaveplan_core::{LeaveRecord, Roster};

use crate::{parse_allotted, parse_date, HeaderMap, IngestError};

/// Read a roster from CSV data.
///
/// The first row is the header and must satisfy the column contract. Rows
/// are numbered from 1 (the header) in error messages, matching what a user
/// sees in a spreadsheet editor.
pub fn read_csv<R: Read>(reader: R, title: &str) -> Result<Roster, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let map = HeaderMap::locate(&headers)?;

    let mut roster = Roster::new(title);

    for (idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row = idx + 2; // 1-based, after the header

        let employee = field(&record, map.employee, row, "Empleado")?.to_string();
        let start = parse_date(
            field(&record, map.start, row, "Fecha_Inicio")?,
            row,
            "Fecha_Inicio",
        )?;
        let end = parse_date(
            field(&record, map.end, row, "Fecha_Fin")?,
            row,
            "Fecha_Fin",
        )?;
        let allotted = parse_allotted(
            field(&record, map.allotted, row, "Dias_Totales")?,
            row,
            "Dias_Totales",
        )?;

        roster.add(LeaveRecord::new(employee, start, end, allotted));
    }

    debug!(records = roster.len(), "CSV roster loaded");
    Ok(roster)
}

/// Non-empty cell at `col`, or a `MissingValue` error naming the column
fn field<'r>(
    record: &'r csv::StringRecord,
    col: usize,
    row: usize,
    column: &'static str,
) -> Result<&'r str, IngestError> {
    match record.get(col) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim()),
        _ => Err(IngestError::MissingValue { row, column }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_well_formed_roster() {
        let input = "\
Empleado,Fecha_Inicio,Fecha_Fin,Dias_Totales
Ana,2024-07-01,2024-07-05,22
Bruno,2024-08-12,2024-08-16,20
Ana,2024-12-23,2024-12-27,22
";
        let roster = read_csv(input.as_bytes(), "summer").unwrap();

        assert_eq!(roster.title, "summer");
        assert_eq!(roster.len(), 3);
        assert_eq!(
            roster.records[0],
            LeaveRecord::new("Ana", date(2024, 7, 1), date(2024, 7, 5), 22)
        );
        assert_eq!(roster.employees(), vec!["Ana", "Bruno"]);
    }

    #[test]
    fn accepts_extra_columns_and_any_order() {
        let input = "\
Departamento,Dias_Totales,Empleado,Fecha_Fin,Fecha_Inicio
Ventas,20,Bruno,16/08/2024,12/08/2024
";
        let roster = read_csv(input.as_bytes(), "t").unwrap();
        assert_eq!(roster.records[0].employee, "Bruno");
        assert_eq!(roster.records[0].start, date(2024, 8, 12));
        assert_eq!(roster.records[0].allotted_days, 20);
    }

    #[test]
    fn header_only_file_is_an_empty_roster() {
        let input = "Empleado,Fecha_Inicio,Fecha_Fin,Dias_Totales\n";
        let roster = read_csv(input.as_bytes(), "t").unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn missing_column_aborts_before_any_row() {
        let input = "\
Empleado,Fecha_Inicio,Fecha_Fin
Ana,2024-07-01,2024-07-05
";
        let err = read_csv(input.as_bytes(), "t").unwrap_err();
        match err {
            IngestError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Dias_Totales"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_reports_spreadsheet_row_number() {
        let input = "\
Empleado,Fecha_Inicio,Fecha_Fin,Dias_Totales
Ana,2024-07-01,2024-07-05,22
Bruno,not-a-date,2024-08-16,20
";
        let err = read_csv(input.as_bytes(), "t").unwrap_err();
        match err {
            IngestError::InvalidDate { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Fecha_Inicio");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn blank_employee_cell_is_rejected() {
        let input = "\
Empleado,Fecha_Inicio,Fecha_Fin,Dias_Totales
,2024-07-01,2024-07-05,22
";
        let err = read_csv(input.as_bytes(), "t").unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingValue {
                row: 2,
                column: "Empleado"
            }
        ));
    }

    #[test]
    fn no_partial_success_on_late_failure() {
        // Row 2 is fine, row 3 broken: the whole load fails.
        let input = "\
Empleado,Fecha_Inicio,Fecha_Fin,Dias_Totales
Ana,2024-07-01,2024-07-05,22
Bruno,2024-08-12,2024-08-16,veinte
";
        assert!(read_csv(input.as_bytes(), "t").is_err());
    }
}
