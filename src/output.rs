use crate::report::{AggregatedReport, ReportWindow};
use colored::Colorize;
use serde::Serialize;

const COLUMN_GAP: &str = "  ";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// One decimal, with ties rounded away from zero (quarter hours: 0.25 -> 0.3).
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}", (hours * 10.0).round() / 10.0)
}

fn table_rows(report: &AggregatedReport) -> Vec<[String; 3]> {
    report
        .projects()
        .iter()
        .map(|p| {
            [
                p.project.clone(),
                format_hours(p.hours),
                format!("{}%", report.percentage_of_total(p.hours)),
            ]
        })
        .collect()
}

fn layout(rows: &[[String; 3]], aligns: [Align; 3]) -> Vec<String> {
    let widths: Vec<usize> = (0..3)
        .map(|i| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(widths.iter().zip(aligns))
                .map(|(cell, (width, align))| match align {
                    Align::Left => format!("{:<width$}", cell, width = *width),
                    Align::Right => format!("{:>width$}", cell, width = *width),
                })
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
                .trim_end()
                .to_string()
        })
        .collect()
}

pub fn header_line(window: &ReportWindow) -> String {
    format!(
        "Toggl Stats This Week ({} - {})",
        window.end.format("%m/%d"),
        window.start.format("%m/%d")
    )
}

pub fn footer_line(report: &AggregatedReport) -> String {
    format!("TOTAL {} hrs", format_hours(report.total_hours()))
}

/// Renders the weekly summary block. `styled` only adds terminal colors; the
/// plain characters are identical either way.
pub fn render_table(report: &AggregatedReport, window: &ReportWindow, styled: bool) -> String {
    let header = header_line(window);
    let footer = footer_line(report);
    let body = layout(
        &table_rows(report),
        [Align::Left, Align::Right, Align::Right],
    );

    let rule_width = body
        .first()
        .map(|line| line.chars().count())
        .unwrap_or_else(|| header.chars().count());
    let separator = "=".repeat(rule_width);

    let mut lines = Vec::with_capacity(body.len() + 6);
    lines.push(String::new());
    lines.push(paint(header, styled, |s| s.yellow().bold().to_string()));
    lines.push(separator.clone());
    lines.extend(
        body.into_iter()
            .map(|row| paint(row, styled, |s| s.cyan().bold().to_string())),
    );
    lines.push(separator);
    lines.push(paint(footer, styled, |s| s.green().bold().to_string()));
    lines.push(String::new());

    lines.join("\n")
}

fn paint(text: String, styled: bool, style: impl Fn(&str) -> String) -> String {
    if styled {
        style(&text)
    } else {
        text
    }
}

#[derive(Debug, Serialize)]
struct JsonProject<'a> {
    project: &'a str,
    hours: f64,
    percentage: i64,
}

#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    start: String,
    end: String,
    projects: Vec<JsonProject<'a>>,
    total_hours: f64,
}

pub fn render_json(
    report: &AggregatedReport,
    window: &ReportWindow,
) -> serde_json::Result<String> {
    let summary = JsonSummary {
        start: window.start.format("%Y-%m-%d").to_string(),
        end: window.end.format("%Y-%m-%d").to_string(),
        projects: report
            .projects()
            .iter()
            .map(|p| JsonProject {
                project: &p.project,
                hours: p.hours,
                percentage: report.percentage_of_total(p.hours),
            })
            .collect(),
        total_hours: report.total_hours(),
    };

    serde_json::to_string_pretty(&summary)
}

pub fn render(
    report: &AggregatedReport,
    window: &ReportWindow,
    format: &OutputFormat,
    styled: bool,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Human => Ok(render_table(report, window, styled)),
        OutputFormat::Json => render_json(report, window),
    }
}
