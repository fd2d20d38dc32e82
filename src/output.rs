use crate::error::Result;
use crate::model::{ChartSpec, ReportModel, Section, TableSpec};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

pub fn write_table_csv(path: &Path, table: &TableSpec) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.header)?;
    for r in &table.rows {
        wtr.write_record(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown rendering of a whole report. The console preview and the
/// exported document are both this text.
pub fn render_markdown(model: &ReportModel) -> String {
    let mut out = String::new();
    for (i, section) in model.sections.iter().enumerate() {
        let heading = if i == 0 { "#" } else { "##" };
        render_section(&mut out, heading, section);
    }
    out
}

fn render_section(out: &mut String, heading: &str, section: &Section) {
    let _ = writeln!(out, "{} {}\n", heading, section.title);
    if !section.explanation_text.is_empty() {
        let _ = writeln!(out, "{}\n", section.explanation_text);
    }
    render_table(out, &section.table);
    for t in &section.extra_tables {
        render_table(out, t);
    }
    for note in &section.notes {
        let _ = writeln!(out, "{}", note);
    }
    if !section.notes.is_empty() {
        out.push('\n');
    }
    if let Some(chart) = &section.chart {
        render_chart(out, chart);
    }
}

fn render_table(out: &mut String, table: &TableSpec) {
    if let Some(caption) = &table.caption {
        let _ = writeln!(out, "### {}\n", caption);
    }
    if table.rows.is_empty() {
        out.push_str("(no rows)\n\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(table.header.iter().cloned());
    for r in &table.rows {
        builder.push_record(r.iter().cloned());
    }
    let mut t = builder.build();
    t.with(Style::markdown());
    let _ = writeln!(out, "{}\n", t);
}

fn render_chart(out: &mut String, chart: &ChartSpec) {
    let title = chart.title.replace('\n', " / ");
    let _ = writeln!(out, "**Chart ({:?}): {}**\n", chart.kind, title);
    let mut t = TableSpec::new([chart.x_label.as_str(), chart.y_label.as_str()]);
    for p in &chart.series {
        t.push_row([p.label.clone(), p.label_text.clone()]);
    }
    render_table(out, &t);
    if let Some((lo, hi)) = chart.x_range {
        let _ = writeln!(out, "Axis window: {:.0} to {:.0}\n", lo, hi);
    }
    if let Some(note) = &chart.annotation {
        let _ = writeln!(out, "```\n{}\n```\n", note);
    }
}
