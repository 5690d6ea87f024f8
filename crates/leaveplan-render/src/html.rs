//! Standalone HTML dashboard renderer.
//!
//! Generates a single self-contained HTML page with:
//! - The per-employee summary table (allotted / taken / remaining)
//! - An embedded SVG timeline, one row per employee
//! - Hover tooltips showing the period's day count and the employee's
//!   running balance
//!
//! The page needs no server and no external assets; it is the interactive
//! counterpart of the SVG output.

use chrono::NaiveDate;

use leaveplan_core::{BalanceEntry, BalanceSheet, RenderError, Renderer, Roster};

use crate::{palette_hex, truncate};

/// Color theme for the dashboard page
#[derive(Clone, Debug)]
pub struct DashboardTheme {
    pub background_color: String,
    pub panel_color: String,
    pub grid_color: String,
    pub text_color: String,
    pub header_bg: String,
    pub negative_color: String,
}

impl Default for DashboardTheme {
    fn default() -> Self {
        Self::light()
    }
}

impl DashboardTheme {
    pub fn light() -> Self {
        Self {
            background_color: "#f4f6f8".into(),
            panel_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            header_bg: "#f8f9fa".into(),
            negative_color: "#e74c3c".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background_color: "#1a1a2e".into(),
            panel_color: "#16213e".into(),
            grid_color: "#2d2d44".into(),
            text_color: "#eaeaea".into(),
            header_bg: "#16213e".into(),
            negative_color: "#e74c3c".into(),
        }
    }
}

/// HTML dashboard renderer configuration
#[derive(Clone, Debug)]
pub struct HtmlDashboardRenderer {
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
    /// Theme (light or dark)
    pub theme: DashboardTheme,
    /// Enable hover tooltips
    pub interactive: bool,
}

impl Default for HtmlDashboardRenderer {
    fn default() -> Self {
        Self {
            chart_width: 900,
            row_height: 36,
            label_width: 180,
            header_height: 60,
            padding: 20,
            theme: DashboardTheme::default(),
            interactive: true,
        }
    }
}

impl HtmlDashboardRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure chart width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Use the dark theme
    pub fn dark(mut self) -> Self {
        self.theme = DashboardTheme::dark();
        self
    }

    /// Disable tooltips (static page)
    pub fn static_page(mut self) -> Self {
        self.interactive = false;
        self
    }

    fn pixels_per_day(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = ((end - start).num_days() + 1).max(1) as f64;
        self.chart_width as f64 / days
    }

    fn date_to_x(&self, date: NaiveDate, span_start: NaiveDate, px_per_day: f64) -> f64 {
        let days = (date - span_start).num_days() as f64;
        self.padding as f64 + self.label_width as f64 + (days * px_per_day)
    }

    /// Generate the complete HTML document
    fn generate_html(&self, roster: &Roster, sheet: &BalanceSheet) -> String {
        let rows = sheet.chart_rows();
        let (span_start, span_end) = sheet.span().unwrap_or_else(|| {
            let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            (today, today)
        });
        let px_per_day = self.pixels_per_day(span_start, span_end);

        let total_width = self.padding * 2 + self.label_width + self.chart_width;
        let total_height =
            self.padding * 2 + self.header_height + (rows.len() as u32 * self.row_height);

        let table = self.generate_table(sheet);
        let svg_content = self.generate_svg(sheet, &rows, span_start, span_end, px_per_day);
        let legend = self.generate_legend(&rows);
        let css = self.generate_css();
        let js = if self.interactive {
            self.generate_js()
        } else {
            String::new()
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Vacation Dashboard</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="dashboard">
        <div class="dashboard-header">
            <h1>{title}</h1>
        </div>
        <div class="panel">
            <h2>Balances</h2>
{table}
        </div>
        <div class="panel">
            <h2>Timeline</h2>
            <div class="timeline-wrapper">
                <svg id="timeline-svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
{svg_content}
                </svg>
            </div>
            <div class="timeline-legend">
{legend}
            </div>
        </div>
        <div id="tooltip" class="tooltip"></div>
    </div>
    <script>
{js}
    </script>
</body>
</html>"#,
            title = html_escape(&roster.title),
            css = css,
            table = table,
            width = total_width,
            height = total_height,
            svg_content = svg_content,
            legend = legend,
            js = js,
        )
    }

    /// Generate the summary table section
    fn generate_table(&self, sheet: &BalanceSheet) -> String {
        let mut html = String::new();
        html.push_str("            <table class=\"summary\">\n");
        html.push_str("                <thead><tr><th>Employee</th><th>Allotted</th><th>Periods</th><th>Taken</th><th>Remaining</th></tr></thead>\n");
        html.push_str("                <tbody>\n");

        for summary in &sheet.employees {
            let remaining_class = if summary.days_remaining < 0 {
                " class=\"negative\""
            } else {
                ""
            };
            html.push_str(&format!(
                "                    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td{}>{}</td></tr>\n",
                html_escape(&summary.employee),
                summary.allotted_days,
                summary.periods,
                summary.days_taken,
                remaining_class,
                summary.days_remaining,
            ));
        }

        html.push_str("                </tbody>\n");
        html.push_str("            </table>");
        html
    }

    /// Generate the SVG content (without the outer <svg> tag)
    fn generate_svg(
        &self,
        sheet: &BalanceSheet,
        rows: &[&str],
        span_start: NaiveDate,
        span_end: NaiveDate,
        px_per_day: f64,
    ) -> String {
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"                <rect width="100%" height="100%" fill="{}"/>"#,
            self.theme.panel_color
        ));
        svg.push('\n');

        svg.push_str(&self.render_grid(rows.len(), span_start, span_end, px_per_day));
        svg.push_str(&self.render_header(span_start, span_end, px_per_day));

        for (row, employee) in rows.iter().enumerate() {
            svg.push_str(&self.render_employee_row(sheet, employee, row, span_start, px_per_day));
        }

        svg
    }

    /// Render the timeline header
    fn render_header(
        &self,
        span_start: NaiveDate,
        span_end: NaiveDate,
        px_per_day: f64,
    ) -> String {
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"                <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            self.padding,
            self.padding,
            self.label_width + self.chart_width,
            self.header_height,
            self.theme.header_bg
        ));
        svg.push('\n');

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

        let mut current = span_start;
        while current <= span_end {
            let x = self.date_to_x(current, span_start, px_per_day);

            svg.push_str(&format!(
                r#"                <line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="{color}" stroke-width="1"/>"#,
                x = x,
                y1 = self.padding + self.header_height - 10,
                y2 = self.padding + self.header_height,
                color = self.theme.text_color
            ));
            svg.push('\n');

            let label = if interval_days == 1 {
                current.format("%d").to_string()
            } else {
                current.format("%b %d").to_string()
            };

            svg.push_str(&format!(
                r#"                <text x="{x}" y="{y}" font-size="11" fill="{color}" text-anchor="middle">{label}</text>"#,
                x = x,
                y = self.padding + self.header_height - 15,
                color = self.theme.text_color,
                label = label
            ));
            svg.push('\n');

            current += chrono::Duration::days(interval_days);
        }

        // Month/year label
        let month_label = span_start.format("%B %Y").to_string();
        svg.push_str(&format!(
            r#"                <text x="{x}" y="{y}" font-size="14" font-weight="bold" fill="{color}" text-anchor="middle">{label}</text>"#,
            x = self.padding + self.label_width + self.chart_width / 2,
            y = self.padding + 22,
            color = self.theme.text_color,
            label = month_label
        ));
        svg.push('\n');

        svg
    }

    /// Render grid lines
    fn render_grid(
        &self,
        row_count: usize,
        span_start: NaiveDate,
        span_end: NaiveDate,
        px_per_day: f64,
    ) -> String {
        let mut svg = String::new();
        let chart_top = self.padding + self.header_height;
        let chart_bottom = chart_top + (row_count as u32 * self.row_height);

        for i in 0..=row_count {
            let y = chart_top + (i as u32 * self.row_height);
            svg.push_str(&format!(
                r#"                <line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="{color}" stroke-width="1"/>"#,
                x1 = self.padding,
                y = y,
                x2 = self.padding + self.label_width + self.chart_width,
                color = self.theme.grid_color
            ));
            svg.push('\n');
        }

        let total_days = (span_end - span_start).num_days();
        let interval = if total_days <= 30 { 1 } else { 7 };

        let mut current = span_start;
        while current <= span_end {
            let x = self.date_to_x(current, span_start, px_per_day);
            svg.push_str(&format!(
                r#"                <line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="{color}" stroke-width="1"/>"#,
                x = x,
                y1 = chart_top,
                y2 = chart_bottom,
                color = self.theme.grid_color
            ));
            svg.push('\n');
            current += chrono::Duration::days(interval);
        }

        svg
    }

    /// Render one employee row: label plus one bar per period.
    ///
    /// Bars carry their balance numbers as data attributes; the tooltip
    /// script reads them back on hover.
    fn render_employee_row(
        &self,
        sheet: &BalanceSheet,
        employee: &str,
        row: usize,
        span_start: NaiveDate,
        px_per_day: f64,
    ) -> String {
        let mut svg = String::new();

        let y = self.padding + self.header_height + (row as u32 * self.row_height);
        let bar_height = (self.row_height as f64 * 0.6) as u32;
        let bar_y = y + (self.row_height - bar_height) / 2;
        let color = palette_hex(row);

        svg.push_str(&format!(
            r#"                <text x="{x}" y="{y}" font-size="12" fill="{color}">{label}</text>"#,
            x = self.padding + 8,
            y = y + self.row_height / 2 + 4,
            color = self.theme.text_color,
            label = html_escape(&truncate(employee, 20))
        ));
        svg.push('\n');

        let entries: Vec<&BalanceEntry> = sheet
            .entries
            .iter()
            .filter(|e| e.record.employee == employee)
            .collect();

        for entry in entries {
            let x_start = self.date_to_x(entry.record.first_day(), span_start, px_per_day);
            let x_end =
                self.date_to_x(entry.record.last_day(), span_start, px_per_day) + px_per_day;
            let bar_width = (x_end - x_start).max(4.0);

            svg.push_str(&format!(
                r#"                <rect class="bar" x="{x}" y="{y}" width="{w}" height="{h}" rx="3" ry="3" fill="{color}" data-employee="{employee}" data-start="{start}" data-end="{end}" data-days="{days}" data-total="{total}" data-remaining="{remaining}"/>"#,
                x = x_start,
                y = bar_y,
                w = bar_width,
                h = bar_height,
                color = color,
                employee = html_escape(employee),
                start = entry.record.start,
                end = entry.record.end,
                days = entry.days_taken,
                total = entry.total_days_taken,
                remaining = entry.days_remaining,
            ));
            svg.push('\n');

            svg.push_str(&format!(
                r#"                <text x="{x}" y="{y}" font-size="11" fill="#ffffff" text-anchor="middle" pointer-events="none">{days}</text>"#,
                x = x_start + bar_width / 2.0,
                y = bar_y + bar_height / 2 + 4,
                days = entry.days_taken,
            ));
            svg.push('\n');
        }

        svg
    }

    /// Generate the legend entries
    fn generate_legend(&self, rows: &[&str]) -> String {
        let mut html = String::new();
        for (i, employee) in rows.iter().enumerate() {
            html.push_str(&format!(
                "                <span class=\"legend-item\"><span class=\"legend-box\" style=\"background:{}\"></span>{}</span>\n",
                palette_hex(i),
                html_escape(employee)
            ));
        }
        html
    }

    /// Generate the embedded stylesheet
    fn generate_css(&self) -> String {
        format!(
            r#"        body {{
            margin: 0;
            font-family: system-ui, -apple-system, sans-serif;
            background: {background};
            color: {text};
        }}
        .dashboard {{
            max-width: 1280px;
            margin: 0 auto;
            padding: 16px;
        }}
        .dashboard-header h1 {{
            font-size: 22px;
            margin: 8px 0 16px 0;
        }}
        .panel {{
            background: {panel};
            border-radius: 8px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.12);
            padding: 16px;
            margin-bottom: 16px;
        }}
        .panel h2 {{
            font-size: 16px;
            margin: 0 0 12px 0;
        }}
        table.summary {{
            border-collapse: collapse;
            width: 100%;
        }}
        table.summary th, table.summary td {{
            border-bottom: 1px solid {grid};
            padding: 6px 12px;
            text-align: right;
        }}
        table.summary th:first-child, table.summary td:first-child {{
            text-align: left;
        }}
        table.summary td.negative {{
            color: {negative};
            font-weight: bold;
        }}
        .timeline-wrapper {{
            overflow-x: auto;
        }}
        .bar {{
            cursor: pointer;
        }}
        .bar:hover {{
            opacity: 0.85;
        }}
        .timeline-legend {{
            margin-top: 8px;
            font-size: 12px;
        }}
        .legend-item {{
            margin-right: 16px;
        }}
        .legend-box {{
            display: inline-block;
            width: 12px;
            height: 12px;
            border-radius: 2px;
            margin-right: 4px;
            vertical-align: middle;
        }}
        .tooltip {{
            position: fixed;
            display: none;
            background: {text};
            color: {panel};
            border-radius: 4px;
            padding: 8px 10px;
            font-size: 12px;
            pointer-events: none;
            z-index: 10;
        }}
        .tooltip.visible {{
            display: block;
        }}
        .tooltip .employee {{
            font-weight: bold;
        }}"#,
            background = self.theme.background_color,
            panel = self.theme.panel_color,
            grid = self.theme.grid_color,
            text = self.theme.text_color,
            negative = self.theme.negative_color,
        )
    }

    /// Generate the tooltip script
    fn generate_js(&self) -> String {
        r#"        const tooltip = document.getElementById('tooltip');
        document.querySelectorAll('.bar').forEach(bar => {
            bar.addEventListener('mousemove', e => {
                const d = bar.dataset;
                tooltip.innerHTML = `
                    <div class="employee">${d.employee}</div>
                    <div>${d.start} &rarr; ${d.end}</div>
                    <div>Days this period: ${d.days}</div>
                    <div>Total taken: ${d.total}</div>
                    <div>Remaining: ${d.remaining}</div>`;
                tooltip.classList.add('visible');
                tooltip.style.left = (e.clientX + 15) + 'px';
                tooltip.style.top = (e.clientY + 15) + 'px';
            });
            bar.addEventListener('mouseleave', () => {
                tooltip.classList.remove('visible');
            });
        });"#
            .to_string()
    }
}

impl Renderer for HtmlDashboardRenderer {
    type Output = String;

    fn render(&self, roster: &Roster, sheet: &BalanceSheet) -> Result<String, RenderError> {
        if sheet.is_empty() {
            return Err(RenderError::InvalidData("no leave records to render".into()));
        }
        Ok(self.generate_html(roster, sheet))
    }
}

/// Escape text for embedding in HTML
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
