//! XLSX summary report renderer (the downloadable document).
//!
//! Generates a single workbook with two sheets:
//! - Summary: the per-employee balance table
//! - Timeline: the chart as a day-grid, one column per calendar day and one
//!   row per employee, period cells filled with the employee's color
//!
//! The workbook is produced entirely in memory (`save_to_buffer`) so callers
//! can stream it as a download; [`REPORT_FILENAME`] is the fixed default
//! name. A serialization failure surfaces as `RenderError::Format` and
//! leaves nothing half-written.

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use leaveplan_core::{BalanceSheet, RenderError, Renderer, Roster};

use crate::palette_rgb;

/// Fixed download name for the report
pub const REPORT_FILENAME: &str = "vacation_report.xlsx";

/// Widest roster span the day-grid can reasonably hold
const MAX_TIMELINE_DAYS: i64 = 450;

/// XLSX report renderer
#[derive(Clone, Debug)]
pub struct ExcelReportRenderer {
    /// Include the day-grid Timeline sheet
    pub include_timeline: bool,
    /// Highlight negative remaining balances
    pub highlight_negative: bool,
}

impl Default for ExcelReportRenderer {
    fn default() -> Self {
        Self {
            include_timeline: true,
            highlight_negative: true,
        }
    }
}

impl ExcelReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary sheet only
    pub fn no_timeline(mut self) -> Self {
        self.include_timeline = false;
        self
    }

    /// Keep negative balances unstyled
    pub fn plain_negatives(mut self) -> Self {
        self.highlight_negative = false;
        self
    }

    /// Generate workbook bytes
    pub fn render_to_bytes(
        &self,
        roster: &Roster,
        sheet: &BalanceSheet,
    ) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        self.add_summary_sheet(&mut workbook, roster, sheet, &formats)
            .map_err(xe)?;

        if self.include_timeline && !sheet.is_empty() {
            self.add_timeline_sheet(&mut workbook, sheet, &formats)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel report: {e}")))
    }

    /// Create reusable formats
    fn create_formats(&self) -> ExcelFormats {
        let title = Format::new().set_bold().set_font_size(14);

        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);

        let integer = Format::new()
            .set_num_format("#,##0")
            .set_border(FormatBorder::Thin);

        let text_band = Format::new()
            .set_background_color(0xDDEBF7)
            .set_border(FormatBorder::Thin);

        let integer_band = Format::new()
            .set_num_format("#,##0")
            .set_background_color(0xDDEBF7)
            .set_border(FormatBorder::Thin);

        let negative = Format::new()
            .set_bold()
            .set_num_format("#,##0")
            .set_font_color(0xC00000)
            .set_border(FormatBorder::Thin);

        let day_header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_rotation(90)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        ExcelFormats {
            title,
            header,
            text,
            integer,
            text_band,
            integer_band,
            negative,
            day_header,
        }
    }

    /// Sheet 1: the per-employee balance table
    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        roster: &Roster,
        sheet: &BalanceSheet,
        formats: &ExcelFormats,
    ) -> Result<(), XlsxError> {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Summary")?;

        worksheet.set_column_width(0, 24.0)?;
        for col in 1..=4u16 {
            worksheet.set_column_width(col, 11.0)?;
        }

        worksheet.write_with_format(0, 0, roster.title.as_str(), &formats.title)?;

        let headers = ["Employee", "Allotted", "Periods", "Taken", "Remaining"];
        for (col, label) in headers.iter().enumerate() {
            worksheet.write_with_format(2, col as u16, *label, &formats.header)?;
        }

        for (i, summary) in sheet.employees.iter().enumerate() {
            let row = 3 + i as u32;
            let (text_fmt, int_fmt) = if i % 2 == 1 {
                (&formats.text_band, &formats.integer_band)
            } else {
                (&formats.text, &formats.integer)
            };

            worksheet.write_with_format(row, 0, summary.employee.as_str(), text_fmt)?;
            worksheet.write_with_format(row, 1, summary.allotted_days as f64, int_fmt)?;
            worksheet.write_with_format(row, 2, summary.periods as f64, int_fmt)?;
            worksheet.write_with_format(row, 3, summary.days_taken as f64, int_fmt)?;

            let remaining_fmt = if self.highlight_negative && summary.days_remaining < 0 {
                &formats.negative
            } else {
                int_fmt
            };
            worksheet.write_with_format(
                row,
                4,
                summary.days_remaining as f64,
                remaining_fmt,
            )?;
        }

        Ok(())
    }

    /// Sheet 2: the timeline as a colored day-grid
    fn add_timeline_sheet(
        &self,
        workbook: &mut Workbook,
        sheet: &BalanceSheet,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let (span_start, span_end) = sheet
            .span()
            .ok_or_else(|| RenderError::InvalidData("no leave records to render".into()))?;

        let total_days = (span_end - span_start).num_days() + 1;
        if total_days > MAX_TIMELINE_DAYS {
            return Err(RenderError::InvalidData(format!(
                "roster spans {total_days} days, too wide for the day-grid timeline"
            )));
        }

        let rows = sheet.chart_rows();
        let row_index = |employee: &str| rows.iter().position(|e| *e == employee);

        let worksheet = workbook.add_worksheet();
        write_timeline_header(worksheet, span_start, total_days, formats).map_err(xe)?;

        for (i, employee) in rows.iter().enumerate() {
            let row = 1 + i as u32;
            let text_fmt = if i % 2 == 1 {
                &formats.text_band
            } else {
                &formats.text
            };
            worksheet
                .write_with_format(row, 0, *employee, text_fmt)
                .map_err(xe)?;
        }

        // One filled cell per leave day, count on the first cell of each period
        for entry in &sheet.entries {
            let Some(i) = row_index(&entry.record.employee) else {
                continue;
            };
            let row = 1 + i as u32;

            let fill = Format::new()
                .set_background_color(palette_rgb(i))
                .set_border(FormatBorder::Thin);
            let fill_count = Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(palette_rgb(i))
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin);

            let first = entry.record.first_day();
            let last = entry.record.last_day();
            let mut day = first;
            while day <= last {
                let col = 1 + (day - span_start).num_days() as u16;
                if day == first {
                    worksheet
                        .write_with_format(row, col, entry.days_taken as f64, &fill_count)
                        .map_err(xe)?;
                } else {
                    worksheet.write_blank(row, col, &fill).map_err(xe)?;
                }
                day += chrono::Duration::days(1);
            }
        }

        worksheet.set_freeze_panes(1, 1).map_err(xe)?;
        Ok(())
    }
}

/// Header row of the Timeline sheet: employee column plus one rotated
/// date label per calendar day
fn write_timeline_header(
    worksheet: &mut Worksheet,
    span_start: NaiveDate,
    total_days: i64,
    formats: &ExcelFormats,
) -> Result<(), XlsxError> {
    worksheet.set_name("Timeline")?;
    worksheet.set_column_width(0, 24.0)?;
    worksheet.write_with_format(0, 0, "Employee", &formats.header)?;

    for offset in 0..total_days {
        let day = span_start + chrono::Duration::days(offset);
        let col = 1 + offset as u16;
        worksheet.set_column_width(col, 3.5)?;
        worksheet.write_with_format(
            0,
            col,
            day.format("%d %b").to_string().as_str(),
            &formats.day_header,
        )?;
    }

    Ok(())
}

/// Reusable format bundle
struct ExcelFormats {
    title: Format,
    header: Format,
    text: Format,
    integer: Format,
    text_band: Format,
    integer_band: Format,
    negative: Format,
    day_header: Format,
}

impl Renderer for ExcelReportRenderer {
    type Output = Vec<u8>;

    fn render(&self, roster: &Roster, sheet: &BalanceSheet) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(roster, sheet)
    }
}

fn xe(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}
