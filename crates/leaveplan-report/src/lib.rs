//! # leaveplan-report
//!
//! Turns a [`Roster`] into a [`BalanceSheet`]: per-record day counts,
//! per-employee totals and remaining balances, and a summary table.
//!
//! The computation is a pure function of its input. Running it twice on the
//! same roster produces identical output, and nothing in here touches the
//! filesystem or mutates the roster.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use leaveplan_core::{LeaveRecord, Roster};
//! use leaveplan_report::tally;
//!
//! let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//! let roster = Roster::new("Team")
//!     .with_record(LeaveRecord::new("Ana", date(2024, 7, 1), date(2024, 7, 5), 20))
//!     .with_record(LeaveRecord::new("Ana", date(2024, 9, 2), date(2024, 9, 4), 20));
//!
//! let sheet = tally(&roster);
//! let ana = sheet.summary_for("Ana").unwrap();
//! assert_eq!(ana.days_taken, 8);
//! assert_eq!(ana.days_remaining, 12);
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use leaveplan_core::{BalanceEntry, BalanceSheet, EmployeeSummary, Roster, TallyWarning};

/// Per-employee accumulator, keyed by first appearance
struct Tally {
    allotted: i64,
    periods: usize,
    days_taken: i64,
    divergence_flagged: bool,
}

/// Compute the balance sheet for a roster.
///
/// Records are grouped by employee name (exact match). The entitlement is
/// taken from each employee's first record; later rows that disagree are
/// flagged but do not change the arithmetic. Reversed intervals contribute
/// their negative day count unchanged and are flagged as well.
pub fn tally(roster: &Roster) -> BalanceSheet {
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    let mut warnings = Vec::new();

    // First pass: group and sum
    for record in &roster.records {
        let employee = record.employee.as_str();
        let days = record.days_taken();

        if record.is_reversed() {
            warnings.push(TallyWarning::ReversedInterval {
                employee: record.employee.clone(),
                start: record.start,
                end: record.end,
            });
        }

        match tallies.entry(employee) {
            Entry::Occupied(mut occupied) => {
                let tally = occupied.get_mut();
                tally.periods += 1;
                tally.days_taken += days;
                if record.allotted_days != tally.allotted && !tally.divergence_flagged {
                    tally.divergence_flagged = true;
                    warnings.push(TallyWarning::DivergentAllotment {
                        employee: record.employee.clone(),
                        used: tally.allotted,
                        conflicting: record.allotted_days,
                    });
                }
            }
            Entry::Vacant(vacant) => {
                order.push(employee);
                vacant.insert(Tally {
                    allotted: record.allotted_days,
                    periods: 1,
                    days_taken: days,
                    divergence_flagged: false,
                });
            }
        }
    }

    // Second pass: broadcast totals onto every entry
    let entries = roster
        .records
        .iter()
        .map(|record| {
            let tally = &tallies[record.employee.as_str()];
            BalanceEntry {
                record: record.clone(),
                days_taken: record.days_taken(),
                total_days_taken: tally.days_taken,
                days_remaining: tally.allotted - tally.days_taken,
            }
        })
        .collect();

    // Summary table, alphabetical for display
    let mut employees: Vec<EmployeeSummary> = order
        .iter()
        .map(|&employee| {
            let tally = &tallies[employee];
            EmployeeSummary {
                employee: employee.to_string(),
                allotted_days: tally.allotted,
                periods: tally.periods,
                days_taken: tally.days_taken,
                days_remaining: tally.allotted - tally.days_taken,
            }
        })
        .collect();
    employees.sort_unstable_by(|a, b| a.employee.cmp(&b.employee));

    debug!(
        records = roster.len(),
        employees = employees.len(),
        warnings = warnings.len(),
        "roster tallied"
    );

    BalanceSheet {
        entries,
        employees,
        warnings,
    }
}
