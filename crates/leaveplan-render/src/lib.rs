//! # leaveplan-render
//!
//! Rendering backends for leaveplan balance sheets.
//!
//! This crate provides:
//! - Console summary table rendering
//! - SVG timeline (Gantt) rendering
//! - Standalone HTML dashboard rendering
//! - MermaidJS timeline rendering (for Markdown/docs)
//! - XLSX summary report (the downloadable document)
//!
//! ## Example
//!
//! ```rust,ignore
//! use leaveplan_core::Renderer;
//! use leaveplan_render::{SvgTimelineRenderer, TextRenderer, ExcelReportRenderer};
//!
//! // Console table
//! let table = TextRenderer::new().render(&roster, &sheet)?;
//!
//! // SVG timeline
//! let svg = SvgTimelineRenderer::new().render(&roster, &sheet)?;
//!
//! // Downloadable XLSX report
//! let bytes = ExcelReportRenderer::new().render(&roster, &sheet)?;
//! std::fs::write(leaveplan_render::REPORT_FILENAME, bytes)?;
//! ```

pub mod excel;
pub mod html;
pub mod mermaid;

pub use excel::{ExcelReportRenderer, REPORT_FILENAME};
pub use html::{DashboardTheme, HtmlDashboardRenderer};
pub use mermaid::MermaidRenderer;

use chrono::NaiveDate;
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

use leaveplan_core::{BalanceSheet, RenderError, Renderer, Roster};

// ============================================================================
// Employee palette
// ============================================================================

/// Fixed per-employee bar colors, assigned by chart row and cycled
pub(crate) const PALETTE: [u32; 8] = [
    0x3498DB, 0xE74C3C, 0x2ECC71, 0x9B59B6, 0xF39C12, 0x1ABC9C, 0xE67E22, 0x34495E,
];

pub(crate) fn palette_rgb(index: usize) -> u32 {
    PALETTE[index % PALETTE.len()]
}

pub(crate) fn palette_hex(index: usize) -> String {
    format!("#{:06x}", palette_rgb(index))
}

// ============================================================================
// SVG timeline renderer
// ============================================================================

/// SVG timeline renderer configuration.
///
/// One row per employee (reverse-alphabetical, matching the on-screen
/// dashboard), one bar per leave period, bars colored by employee and
/// labeled with the period's day count.
#[derive(Clone, Debug)]
pub struct SvgTimelineRenderer {
    /// Width of the chart area (excluding labels) in pixels
    pub chart_width: u32,
    /// Height per employee row in pixels
    pub row_height: u32,
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Label each bar with its day count
    pub show_counts: bool,
}

impl Default for SvgTimelineRenderer {
    fn default() -> Self {
        Self {
            chart_width: 800,
            row_height: 32,
            label_width: 160,
            header_height: 50,
            padding: 20,
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
            show_counts: true,
        }
    }
}

impl SvgTimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure chart width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Configure row height
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Drop the day-count labels on the bars
    pub fn no_counts(mut self) -> Self {
        self.show_counts = false;
        self
    }

    /// Calculate the total width of the SVG
    fn total_width(&self) -> u32 {
        self.padding * 2 + self.label_width + self.chart_width
    }

    /// Calculate the total height based on number of employee rows
    fn total_height(&self, row_count: usize) -> u32 {
        self.padding * 2 + self.header_height + (row_count as u32 * self.row_height)
    }

    /// Pixels per calendar day over the inclusive roster span
    fn pixels_per_day(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = ((end - start).num_days() + 1).max(1) as f64;
        self.chart_width as f64 / days
    }

    /// Convert a date to x position
    fn date_to_x(&self, date: NaiveDate, span_start: NaiveDate, px_per_day: f64) -> f64 {
        let days = (date - span_start).num_days() as f64;
        self.padding as f64 + self.label_width as f64 + (days * px_per_day)
    }

    /// Create the header with date labels
    fn render_header(&self, span_start: NaiveDate, span_end: NaiveDate, px_per_day: f64) -> Group {
        let mut group = Group::new().set("class", "header");

        let header_bg = Rectangle::new()
            .set("x", self.padding)
            .set("y", self.padding)
            .set("width", self.label_width + self.chart_width)
            .set("height", self.header_height)
            .set("fill", "#f8f9fa");
        group = group.add(header_bg);

        // Calculate appropriate date interval
        let total_days = (span_end - span_start).num_days();
        let interval_days = if total_days <= 14 {
            1
        } else if total_days <= 60 {
            7
        } else if total_days <= 180 {
            14
        } else {
            30
        };

        // Draw date labels
        let mut current = span_start;
        while current <= span_end {
            let x = self.date_to_x(current, span_start, px_per_day);

            let line = Line::new()
                .set("x1", x)
                .set("y1", self.padding + self.header_height - 10)
                .set("x2", x)
                .set("y2", self.padding + self.header_height)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);

            let label = if interval_days == 1 {
                current.format("%d").to_string()
            } else {
                current.format("%b %d").to_string()
            };

            let text = Text::new(label)
                .set("x", x)
                .set("y", self.padding + self.header_height - 15)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle");
            group = group.add(text);

            current += chrono::Duration::days(interval_days);
        }

        // Month/Year label at the top
        let month_label = span_start.format("%B %Y").to_string();
        let month_text = Text::new(month_label)
            .set("x", self.padding + self.label_width + self.chart_width / 2)
            .set("y", self.padding + 18)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 2)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str())
            .set("text-anchor", "middle");
        group = group.add(month_text);

        group
    }

    /// Render grid lines
    fn render_grid(
        &self,
        row_count: usize,
        span_start: NaiveDate,
        span_end: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "grid");

        let chart_top = self.padding + self.header_height;
        let chart_bottom = chart_top + (row_count as u32 * self.row_height);

        // Horizontal lines for each employee row
        for i in 0..=row_count {
            let y = chart_top + (i as u32 * self.row_height);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", self.padding + self.label_width + self.chart_width)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        // Vertical lines for days/weeks
        let total_days = (span_end - span_start).num_days();
        let interval = if total_days <= 30 { 1 } else { 7 };

        let mut current = span_start;
        while current <= span_end {
            let x = self.date_to_x(current, span_start, px_per_day);
            let line = Line::new()
                .set("x1", x)
                .set("y1", chart_top)
                .set("x2", x)
                .set("y2", chart_bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
            current += chrono::Duration::days(interval);
        }

        group
    }

    /// Render one employee row: label plus a bar per leave period
    fn render_employee_row(
        &self,
        sheet: &BalanceSheet,
        employee: &str,
        row: usize,
        span_start: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "employee");

        let y = self.padding + self.header_height + (row as u32 * self.row_height);
        let bar_height = (self.row_height as f64 * 0.6) as u32;
        let bar_y = y + (self.row_height - bar_height) / 2;
        let color = palette_hex(row);

        // Row label
        let label = Text::new(truncate(employee, 18))
            .set("x", self.padding + 8)
            .set("y", y + self.row_height / 2 + 4)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str());
        group = group.add(label);

        for entry in sheet.entries.iter().filter(|e| e.record.employee == employee) {
            let x_start = self.date_to_x(entry.record.first_day(), span_start, px_per_day);
            let x_end = self.date_to_x(entry.record.last_day(), span_start, px_per_day) + px_per_day;
            let bar_width = (x_end - x_start).max(4.0); // Minimum width for visibility

            let bar = Rectangle::new()
                .set("x", x_start)
                .set("y", bar_y)
                .set("width", bar_width)
                .set("height", bar_height)
                .set("rx", 3)
                .set("ry", 3)
                .set("fill", color.as_str());
            group = group.add(bar);

            if self.show_counts {
                let count = Text::new(entry.days_taken.to_string())
                    .set("x", x_start + bar_width / 2.0)
                    .set("y", bar_y + bar_height / 2 + self.font_size / 3)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size - 1)
                    .set("fill", "#ffffff")
                    .set("text-anchor", "middle");
                group = group.add(count);
            }
        }

        group
    }

    /// Render the color legend, one chip per employee
    fn render_legend(&self, rows: &[&str], y_offset: u32) -> Group {
        let mut group = Group::new().set("class", "legend");
        let y = y_offset as f64 + 15.0;
        let box_size = 12.0;
        let spacing = 130.0;

        for (i, employee) in rows.iter().enumerate() {
            let x = self.padding as f64 + spacing * i as f64;

            let chip = Rectangle::new()
                .set("x", x)
                .set("y", y - box_size + 2.0)
                .set("width", box_size)
                .set("height", box_size)
                .set("rx", 2)
                .set("fill", palette_hex(i));
            group = group.add(chip);

            let label = Text::new(truncate(employee, 14))
                .set("x", x + box_size + 5.0)
                .set("y", y)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.text_color.as_str());
            group = group.add(label);
        }

        group
    }
}

impl Renderer for SvgTimelineRenderer {
    type Output = String;

    fn render(&self, roster: &Roster, sheet: &BalanceSheet) -> Result<String, RenderError> {
        let rows = sheet.chart_rows();
        if rows.is_empty() {
            return Err(RenderError::InvalidData("no leave records to render".into()));
        }

        let (span_start, span_end) = sheet
            .span()
            .ok_or_else(|| RenderError::InvalidData("no leave records to render".into()))?;
        let px_per_day = self.pixels_per_day(span_start, span_end);

        let width = self.total_width();
        let height = self.total_height(rows.len()) + 30; // Extra space for legend

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        // Background
        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        // Title
        let title = Text::new(roster.title.as_str())
            .set("x", self.padding)
            .set("y", self.padding + 15)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 4)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str());
        document = document.add(title);

        // Grid
        document = document.add(self.render_grid(rows.len(), span_start, span_end, px_per_day));

        // Header
        document = document.add(self.render_header(span_start, span_end, px_per_day));

        // Employee rows
        for (row, employee) in rows.iter().enumerate() {
            document =
                document.add(self.render_employee_row(sheet, employee, row, span_start, px_per_day));
        }

        // Legend
        let legend_y =
            self.padding + self.header_height + (rows.len() as u32 * self.row_height) + 10;
        document = document.add(self.render_legend(&rows, legend_y));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Truncate a string to a maximum length with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// Console table renderer
// ============================================================================

/// Plain text renderer: the summary table as a box-drawn console table
#[derive(Clone, Debug, Default)]
pub struct TextRenderer {
    /// Also list each employee's individual periods below the table
    pub show_periods: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the per-period listing
    pub fn with_periods(mut self) -> Self {
        self.show_periods = true;
        self
    }
}

const TABLE_HEADERS: [&str; 5] = ["Employee", "Allotted", "Periods", "Taken", "Remaining"];

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, roster: &Roster, sheet: &BalanceSheet) -> Result<String, RenderError> {
        let mut cells: Vec<[String; 5]> = Vec::with_capacity(sheet.employees.len());
        for summary in &sheet.employees {
            cells.push([
                summary.employee.clone(),
                summary.allotted_days.to_string(),
                summary.periods.to_string(),
                summary.days_taken.to_string(),
                summary.days_remaining.to_string(),
            ]);
        }

        // Column widths fit the widest cell, header included
        let mut widths: [usize; 5] = TABLE_HEADERS.map(str::len);
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let rule = |left: &str, mid: &str, right: &str| -> String {
            let mut line = String::from(left);
            for (i, w) in widths.iter().enumerate() {
                if i > 0 {
                    line.push_str(mid);
                }
                line.push_str(&"─".repeat(w + 2));
            }
            line.push_str(right);
            line.push('\n');
            line
        };

        let format_row = |row: &[String; 5]| -> String {
            let mut line = String::from("│");
            for (i, (cell, w)) in row.iter().zip(widths.iter()).enumerate() {
                if i == 0 {
                    // Names left-aligned, numbers right-aligned
                    line.push_str(&format!(" {:<width$} │", cell, width = *w));
                } else {
                    line.push_str(&format!(" {:>width$} │", cell, width = *w));
                }
            }
            line.push('\n');
            line
        };

        let mut out = String::new();
        out.push_str(&roster.title);
        out.push('\n');
        out.push_str(&rule("┌", "┬", "┐"));
        out.push_str(&format_row(&TABLE_HEADERS.map(String::from)));
        out.push_str(&rule("├", "┼", "┤"));
        for row in &cells {
            out.push_str(&format_row(row));
        }
        out.push_str(&rule("└", "┴", "┘"));

        if self.show_periods {
            for summary in &sheet.employees {
                out.push_str(&format!("{}:\n", summary.employee));
                for entry in sheet
                    .entries
                    .iter()
                    .filter(|e| e.record.employee == summary.employee)
                {
                    out.push_str(&format!(
                        "  {} .. {}  ({} days)\n",
                        entry.record.start, entry.record.end, entry.days_taken
                    ));
                }
            }
        }

        Ok(out)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use leaveplan_core::{BalanceEntry, EmployeeSummary, LeaveRecord};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_sheet() -> (Roster, BalanceSheet) {
        let roster = Roster::new("Team vacations")
            .with_record(LeaveRecord::new("Ana", date(2024, 7, 1), date(2024, 7, 5), 20))
            .with_record(LeaveRecord::new("Bruno", date(2024, 7, 8), date(2024, 7, 10), 25));

        let entries = roster
            .records
            .iter()
            .map(|r| BalanceEntry {
                record: r.clone(),
                days_taken: r.days_taken(),
                total_days_taken: r.days_taken(),
                days_remaining: r.allotted_days - r.days_taken(),
            })
            .collect();

        let employees = vec![
            EmployeeSummary {
                employee: "Ana".into(),
                allotted_days: 20,
                periods: 1,
                days_taken: 5,
                days_remaining: 15,
            },
            EmployeeSummary {
                employee: "Bruno".into(),
                allotted_days: 25,
                periods: 1,
                days_taken: 3,
                days_remaining: 22,
            },
        ];

        let sheet = BalanceSheet {
            entries,
            employees,
            warnings: Vec::new(),
        };
        (roster, sheet)
    }

    #[test]
    fn svg_renderer_defaults() {
        let renderer = SvgTimelineRenderer::new();
        assert_eq!(renderer.chart_width, 800);
        assert_eq!(renderer.row_height, 32);
    }

    #[test]
    fn svg_renderer_with_config() {
        let renderer = SvgTimelineRenderer::new().chart_width(1000).row_height(40);
        assert_eq!(renderer.chart_width, 1000);
        assert_eq!(renderer.row_height, 40);
    }

    #[test]
    fn svg_render_produces_valid_svg() {
        let (roster, sheet) = test_sheet();
        let svg = SvgTimelineRenderer::new().render(&roster, &sheet).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("Team vacations"));
        assert!(svg.contains("Ana"));
        assert!(svg.contains("Bruno"));
    }

    #[test]
    fn svg_render_labels_bars_with_day_counts() {
        let (roster, sheet) = test_sheet();
        let svg = SvgTimelineRenderer::new().render(&roster, &sheet).unwrap();
        // White fill: the background rect plus one count label per bar
        assert_eq!(svg.matches(r##"fill="#ffffff""##).count(), 3);
    }

    #[test]
    fn svg_render_counts_can_be_disabled() {
        let (roster, sheet) = test_sheet();
        let svg = SvgTimelineRenderer::new()
            .no_counts()
            .render(&roster, &sheet)
            .unwrap();
        // Only the background rect is white without the count labels
        assert_eq!(svg.matches(r##"fill="#ffffff""##).count(), 1);
    }

    #[test]
    fn svg_render_empty_sheet_fails() {
        let roster = Roster::new("Empty");
        let sheet = BalanceSheet::default();
        let result = SvgTimelineRenderer::new().render(&roster, &sheet);
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn svg_render_is_deterministic() {
        let (roster, sheet) = test_sheet();
        let renderer = SvgTimelineRenderer::new();
        let first = renderer.render(&roster, &sheet).unwrap();
        let second = renderer.render(&roster, &sheet).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn text_render_contains_summary_rows() {
        let (roster, sheet) = test_sheet();
        let text = TextRenderer::new().render(&roster, &sheet).unwrap();

        assert!(text.contains("Team vacations"));
        assert!(text.contains("Employee"));
        assert!(text.contains("Ana"));
        assert!(text.contains("15"));
        assert!(text.contains("22"));
        assert!(text.contains("┌"));
    }

    #[test]
    fn text_render_periods_listing() {
        let (roster, sheet) = test_sheet();
        let text = TextRenderer::new()
            .with_periods()
            .render(&roster, &sheet)
            .unwrap();
        assert!(text.contains("2024-07-01 .. 2024-07-05  (5 days)"));
    }

    #[test]
    fn text_render_empty_sheet_is_just_the_frame() {
        let roster = Roster::new("Empty");
        let text = TextRenderer::new()
            .render(&roster, &BalanceSheet::default())
            .unwrap();
        assert!(text.contains("Employee"));
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("Short", 20), "Short");
        assert_eq!(truncate("A very long employee name", 15), "A very long ...");
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_rgb(0), palette_rgb(PALETTE.len()));
        assert_eq!(palette_hex(0), "#3498db");
    }
}
