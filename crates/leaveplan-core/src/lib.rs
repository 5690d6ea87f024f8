//! # leaveplan-core
//!
//! Core domain model and traits for the leaveplan vacation toolkit.
//!
//! This crate provides:
//! - Domain types: `LeaveRecord`, `Roster`
//! - Aggregation results: `BalanceSheet`, `BalanceEntry`, `EmployeeSummary`
//! - The `Renderer` trait shared by all output backends
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use leaveplan_core::{LeaveRecord, Roster};
//!
//! let mut roster = Roster::new("Team vacations");
//! roster.add(LeaveRecord::new(
//!     "Ana",
//!     NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
//!     22,
//! ));
//! assert_eq!(roster.records[0].days_taken(), 5);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Identifier for an employee (the name cell of the input file)
pub type EmployeeId = String;

// ============================================================================
// LeaveRecord
// ============================================================================

/// A single leave period, one row of the input file.
///
/// An employee may appear in any number of records. `allotted_days` is the
/// yearly entitlement as written on that row; the aggregator uses the first
/// occurrence per employee and flags rows that disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Employee name
    pub employee: EmployeeId,
    /// First day of the leave period
    pub start: NaiveDate,
    /// Last day of the leave period (inclusive)
    pub end: NaiveDate,
    /// Total vacation days the employee is entitled to
    pub allotted_days: i64,
}

impl LeaveRecord {
    /// Create a new leave record
    pub fn new(
        employee: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        allotted_days: i64,
    ) -> Self {
        Self {
            employee: employee.into(),
            start,
            end,
            allotted_days,
        }
    }

    /// Inclusive day count of this period: `(end - start) + 1`.
    ///
    /// A reversed interval (`end < start`) yields a negative count. The
    /// value is passed through unchanged; callers that care receive a
    /// warning from the aggregator instead of a corrected number.
    pub fn days_taken(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True when the period runs backwards (`end < start`)
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Earliest calendar day touched by this record, reversed or not
    pub fn first_day(&self) -> NaiveDate {
        self.start.min(self.end)
    }

    /// Latest calendar day touched by this record, reversed or not
    pub fn last_day(&self) -> NaiveDate {
        self.start.max(self.end)
    }
}

// ============================================================================
// Roster
// ============================================================================

/// The full set of leave records loaded from one input file.
///
/// Row order is preserved from the file; nothing is grouped or sorted here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Display title, usually derived from the input filename
    pub title: String,
    /// All leave records, in file order
    pub records: Vec<LeaveRecord>,
}

impl Roster {
    /// Create an empty roster with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            records: Vec::new(),
        }
    }

    /// Append a record
    pub fn add(&mut self, record: LeaveRecord) {
        self.records.push(record);
    }

    /// Builder-style variant of [`add`](Self::add)
    pub fn with_record(mut self, record: LeaveRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct employee names in first-appearance order
    pub fn employees(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.employee.as_str()) {
                seen.push(record.employee.as_str());
            }
        }
        seen
    }

    /// All records belonging to one employee, in file order
    pub fn records_for(&self, employee: &str) -> Vec<&LeaveRecord> {
        self.records
            .iter()
            .filter(|r| r.employee == employee)
            .collect()
    }

    /// Calendar span covered by the roster: earliest first day to latest
    /// last day across all records. `None` for an empty roster.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(LeaveRecord::first_day).min()?;
        let last = self.records.iter().map(LeaveRecord::last_day).max()?;
        Some((first, last))
    }
}

// ============================================================================
// BalanceSheet (Result)
// ============================================================================

/// One input record annotated with its derived day counts.
///
/// The per-employee total and remaining balance are broadcast onto every
/// entry so row-level views (tooltips, bar labels) need no further lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// The original record
    pub record: LeaveRecord,
    /// Inclusive day count of this period
    pub days_taken: i64,
    /// Sum of day counts across all the employee's periods
    pub total_days_taken: i64,
    /// Allotted days minus the employee's total
    pub days_remaining: i64,
}

/// Aggregated balance for one employee, one row of the summary table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Employee name
    pub employee: EmployeeId,
    /// Entitlement, taken from the employee's first record
    pub allotted_days: i64,
    /// Number of leave periods
    pub periods: usize,
    /// Sum of inclusive day counts across all periods
    pub days_taken: i64,
    /// `allotted_days - days_taken`
    pub days_remaining: i64,
}

/// The result of tallying a roster: annotated entries, the per-employee
/// summary table, and any non-fatal data warnings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// One entry per input record, in file order
    pub entries: Vec<BalanceEntry>,
    /// One row per employee, sorted alphabetically
    pub employees: Vec<EmployeeSummary>,
    /// Flagged data conditions; never alter the computed numbers
    pub warnings: Vec<TallyWarning>,
}

impl BalanceSheet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summary row for one employee, if present
    pub fn summary_for(&self, employee: &str) -> Option<&EmployeeSummary> {
        self.employees.iter().find(|s| s.employee == employee)
    }

    /// Employee names in reverse-alphabetical order, the vertical axis
    /// order of the timeline chart (cosmetic, matches the on-screen view)
    pub fn chart_rows(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.employees.iter().map(|s| s.employee.as_str()).collect();
        names.sort_unstable_by(|a, b| b.cmp(a));
        names
    }

    /// Calendar span covered by the entries, `None` when empty
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.entries.iter().map(|e| e.record.first_day()).min()?;
        let last = self.entries.iter().map(|e| e.record.last_day()).max()?;
        Some((first, last))
    }
}

/// Non-fatal condition noticed while tallying.
///
/// Warnings surface data the computation passes through unchanged: a
/// reversed interval still contributes its negative day count, and a
/// divergent entitlement still resolves to the first value seen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TallyWarning {
    /// A record whose end date precedes its start date
    ReversedInterval {
        employee: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// An employee whose rows disagree on the allotted-days column
    DivergentAllotment {
        employee: EmployeeId,
        /// Value from the first record, used for the computation
        used: i64,
        /// First conflicting value encountered
        conflicting: i64,
    },
}

impl std::fmt::Display for TallyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyWarning::ReversedInterval {
                employee,
                start,
                end,
            } => write!(
                f,
                "{employee}: period {start} .. {end} runs backwards; its day count is negative"
            ),
            TallyWarning::DivergentAllotment {
                employee,
                used,
                conflicting,
            } => write!(
                f,
                "{employee}: allotted days differ across rows ({used} vs {conflicting}); using {used}"
            ),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering.
///
/// Every backend consumes the same pair: the roster (for the title and raw
/// periods) and the tallied balance sheet.
pub trait Renderer {
    type Output;

    /// Render the roster and its balance sheet to the output format
    fn render(&self, roster: &Roster, sheet: &BalanceSheet) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_taken_is_inclusive() {
        let record = LeaveRecord::new("Ana", date(2024, 1, 1), date(2024, 1, 5), 20);
        assert_eq!(record.days_taken(), 5);
    }

    #[test]
    fn days_taken_single_day() {
        let record = LeaveRecord::new("Ana", date(2024, 3, 4), date(2024, 3, 4), 20);
        assert_eq!(record.days_taken(), 1);
    }

    #[test]
    fn days_taken_reversed_is_negative() {
        let record = LeaveRecord::new("Ana", date(2024, 1, 5), date(2024, 1, 1), 20);
        assert_eq!(record.days_taken(), -3);
        assert!(record.is_reversed());
    }

    #[test]
    fn record_day_bounds_handle_reversal() {
        let record = LeaveRecord::new("Ana", date(2024, 1, 5), date(2024, 1, 1), 20);
        assert_eq!(record.first_day(), date(2024, 1, 1));
        assert_eq!(record.last_day(), date(2024, 1, 5));
    }

    #[test]
    fn roster_employees_first_appearance_order() {
        let roster = Roster::new("Test")
            .with_record(LeaveRecord::new("Carla", date(2024, 1, 1), date(2024, 1, 2), 20))
            .with_record(LeaveRecord::new("Ana", date(2024, 2, 1), date(2024, 2, 3), 22))
            .with_record(LeaveRecord::new("Carla", date(2024, 3, 1), date(2024, 3, 5), 20));

        assert_eq!(roster.employees(), vec!["Carla", "Ana"]);
    }

    #[test]
    fn roster_records_for_preserves_file_order() {
        let roster = Roster::new("Test")
            .with_record(LeaveRecord::new("Carla", date(2024, 3, 1), date(2024, 3, 5), 20))
            .with_record(LeaveRecord::new("Ana", date(2024, 2, 1), date(2024, 2, 3), 22))
            .with_record(LeaveRecord::new("Carla", date(2024, 1, 1), date(2024, 1, 2), 20));

        let carla = roster.records_for("Carla");
        assert_eq!(carla.len(), 2);
        assert_eq!(carla[0].start, date(2024, 3, 1));
        assert_eq!(carla[1].start, date(2024, 1, 1));
    }

    #[test]
    fn roster_span_covers_all_records() {
        let roster = Roster::new("Test")
            .with_record(LeaveRecord::new("Ana", date(2024, 2, 10), date(2024, 2, 14), 22))
            .with_record(LeaveRecord::new("Bea", date(2024, 1, 2), date(2024, 1, 8), 20))
            .with_record(LeaveRecord::new("Ana", date(2024, 8, 1), date(2024, 8, 15), 22));

        assert_eq!(roster.span(), Some((date(2024, 1, 2), date(2024, 8, 15))));
    }

    #[test]
    fn roster_span_empty_is_none() {
        let roster = Roster::new("Empty");
        assert_eq!(roster.span(), None);
        assert!(roster.is_empty());
    }

    #[test]
    fn chart_rows_reverse_alphabetical() {
        let sheet = BalanceSheet {
            entries: Vec::new(),
            employees: vec![
                EmployeeSummary {
                    employee: "Ana".into(),
                    allotted_days: 20,
                    periods: 1,
                    days_taken: 5,
                    days_remaining: 15,
                },
                EmployeeSummary {
                    employee: "Carla".into(),
                    allotted_days: 20,
                    periods: 1,
                    days_taken: 3,
                    days_remaining: 17,
                },
                EmployeeSummary {
                    employee: "Bea".into(),
                    allotted_days: 20,
                    periods: 1,
                    days_taken: 2,
                    days_remaining: 18,
                },
            ],
            warnings: Vec::new(),
        };

        assert_eq!(sheet.chart_rows(), vec!["Carla", "Bea", "Ana"]);
    }

    #[test]
    fn summary_lookup() {
        let sheet = BalanceSheet {
            entries: Vec::new(),
            employees: vec![EmployeeSummary {
                employee: "Ana".into(),
                allotted_days: 20,
                periods: 2,
                days_taken: 8,
                days_remaining: 12,
            }],
            warnings: Vec::new(),
        };

        assert_eq!(sheet.summary_for("Ana").unwrap().days_remaining, 12);
        assert!(sheet.summary_for("Nadie").is_none());
    }

    #[test]
    fn warning_display_mentions_employee() {
        let w = TallyWarning::ReversedInterval {
            employee: "Ana".into(),
            start: date(2024, 1, 5),
            end: date(2024, 1, 1),
        };
        assert!(format!("{w}").contains("Ana"));
        assert!(format!("{w}").contains("backwards"));

        let w = TallyWarning::DivergentAllotment {
            employee: "Bea".into(),
            used: 20,
            conflicting: 25,
        };
        assert!(format!("{w}").contains("20 vs 25"));
    }
}
