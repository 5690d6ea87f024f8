//! MermaidJS timeline renderer.
//!
//! Generates a text Gantt block suitable for embedding in Markdown
//! documentation, GitHub, and wikis.
//!
//! ## Example Output
//!
//! ```text
//! gantt
//!     title Team vacations
//!     dateFormat YYYY-MM-DD
//!     axisFormat %d %b
//!
//!     section Bruno
//!     3d :b0, 2024-07-08, 3d
//!
//!     section Ana
//!     5d :a0, 2024-07-01, 5d
//! ```

use leaveplan_core::{BalanceSheet, RenderError, Renderer, Roster};

/// MermaidJS timeline renderer
#[derive(Clone, Debug)]
pub struct MermaidRenderer {
    /// Group periods into one section per employee
    pub show_sections: bool,
    /// Date format (MermaidJS format string)
    pub date_format: String,
    /// Axis tick format
    pub axis_format: String,
}

impl Default for MermaidRenderer {
    fn default() -> Self {
        Self {
            show_sections: true,
            date_format: "YYYY-MM-DD".into(),
            axis_format: "%d %b".into(),
        }
    }
}

impl MermaidRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable per-employee sections
    pub fn no_sections(mut self) -> Self {
        self.show_sections = false;
        self
    }

    /// Set custom date format
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }
}

impl Renderer for MermaidRenderer {
    type Output = String;

    fn render(&self, roster: &Roster, sheet: &BalanceSheet) -> Result<String, RenderError> {
        if sheet.is_empty() {
            return Err(RenderError::InvalidData("no leave records to render".into()));
        }

        let mut out = String::new();
        out.push_str("gantt\n");
        out.push_str(&format!("    title {}\n", roster.title));
        out.push_str(&format!("    dateFormat {}\n", self.date_format));
        out.push_str(&format!("    axisFormat {}\n", self.axis_format));

        // Same vertical order as the chart: reverse alphabetical
        for (row, employee) in sheet.chart_rows().iter().enumerate() {
            out.push('\n');
            if self.show_sections {
                out.push_str(&format!("    section {}\n", employee));
            }

            for (i, entry) in sheet
                .entries
                .iter()
                .filter(|e| e.record.employee == *employee)
                .enumerate()
            {
                // Mermaid needs a forward interval; the label still shows
                // the (possibly negative) tallied count
                let length = (entry.record.last_day() - entry.record.first_day()).num_days() + 1;
                out.push_str(&format!(
                    "    {days}d :e{row}p{i}, {start}, {length}d\n",
                    days = entry.days_taken,
                    row = row,
                    i = i,
                    start = entry.record.first_day(),
                    length = length,
                ));
            }
        }

        Ok(out)
    }
}
