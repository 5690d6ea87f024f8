//! Integration tests for the rendering backends, driven through the real
//! aggregation pipeline.

use chrono::NaiveDate;
use leaveplan_core::{LeaveRecord, Renderer, Roster};
use pretty_assertions::assert_eq;
use leaveplan_render::{
    ExcelReportRenderer, HtmlDashboardRenderer, MermaidRenderer, SvgTimelineRenderer, TextRenderer,
};
use leaveplan_report::tally;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn team_roster() -> Roster {
    Roster::new("Summer plan")
        .with_record(LeaveRecord::new("Ana", date(2024, 7, 1), date(2024, 7, 5), 22))
        .with_record(LeaveRecord::new("Bruno", date(2024, 7, 8), date(2024, 7, 19), 20))
        .with_record(LeaveRecord::new("Carla", date(2024, 8, 5), date(2024, 8, 9), 25))
        .with_record(LeaveRecord::new("Ana", date(2024, 8, 19), date(2024, 8, 21), 22))
}

#[test]
fn render_complete_dashboard() {
    let roster = team_roster();
    let sheet = tally(&roster);

    let html = HtmlDashboardRenderer::new()
        .chart_width(1200)
        .render(&roster, &sheet)
        .unwrap();

    // Page skeleton
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Summer plan"));
    assert!(html.contains("<svg"));
    assert!(html.contains("</svg>"));
    assert!(html.contains("tooltip"));

    // Summary table carries the computed balances: Ana 22 - (5 + 3) = 14
    assert!(html.contains("<td>Ana</td>"));
    assert!(html.contains("<td>14</td>"));

    // Bars expose per-period data for the tooltip
    assert!(html.contains(r#"data-employee="Bruno""#));
    assert!(html.contains(r#"data-days="12""#));
}

#[test]
fn svg_timeline_rows_are_reverse_alphabetical() {
    let roster = team_roster();
    let sheet = tally(&roster);

    let svg = SvgTimelineRenderer::new().render(&roster, &sheet).unwrap();

    // Row labels render before the legend, so first occurrence is the row
    let carla = svg.find("Carla").expect("Carla label");
    let bruno = svg.find("Bruno").expect("Bruno label");
    let ana = svg.find("Ana").expect("Ana label");
    assert!(carla < bruno && bruno < ana);
}

#[test]
fn text_summary_matches_hand_computed_balances() {
    let roster = team_roster();
    let sheet = tally(&roster);

    let text = TextRenderer::new().render(&roster, &sheet).unwrap();

    // Ana: two periods, 8 days taken, 14 remaining
    let ana_line = text.lines().find(|l| l.contains("Ana")).unwrap();
    assert!(ana_line.contains("22"));
    assert!(ana_line.contains("8"));
    assert!(ana_line.contains("14"));
}

#[test]
fn mermaid_output_lists_every_period() {
    let roster = team_roster();
    let sheet = tally(&roster);

    let text = MermaidRenderer::new().render(&roster, &sheet).unwrap();

    assert!(text.starts_with("gantt"));
    // Four records, four task lines
    assert_eq!(text.matches(", 2024-").count(), 4);
}

#[test]
fn excel_report_builds_from_pipeline_output() {
    let roster = team_roster();
    let sheet = tally(&roster);

    let bytes = ExcelReportRenderer::new().render(&roster, &sheet).unwrap();
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn rendering_twice_is_byte_identical() {
    let roster = team_roster();
    let sheet = tally(&roster);

    let svg = SvgTimelineRenderer::new();
    assert_eq!(
        svg.render(&roster, &sheet).unwrap(),
        svg.render(&roster, &sheet).unwrap()
    );

    let html = HtmlDashboardRenderer::new();
    assert_eq!(
        html.render(&roster, &sheet).unwrap(),
        html.render(&roster, &sheet).unwrap()
    );

    let mermaid = MermaidRenderer::new();
    assert_eq!(
        mermaid.render(&roster, &sheet).unwrap(),
        mermaid.render(&roster, &sheet).unwrap()
    );
}

#[test]
fn reversed_interval_flows_through_to_the_chart_label() {
    let roster = Roster::new("Backwards")
        .with_record(LeaveRecord::new("Ana", date(2024, 3, 5), date(2024, 3, 1), 20));
    let sheet = tally(&roster);

    assert_eq!(sheet.warnings.len(), 1);

    let svg = SvgTimelineRenderer::new().render(&roster, &sheet).unwrap();
    assert!(svg.contains("-3\n</text>"));
}
