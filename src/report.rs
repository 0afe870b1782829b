use chrono::{Datelike, Duration, NaiveDate};
use tracing::trace;

use crate::models::ReportRecord;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// What to do when two records produce the same project key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Later record replaces the earlier value.
    #[default]
    Overwrite,
    /// Hours of all matching records are summed.
    Merge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectHours {
    pub project: String,
    pub hours: f64,
}

/// Per-project hours in first-seen order, plus the total over every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedReport {
    projects: Vec<ProjectHours>,
    total_hours: f64,
}

impl AggregatedReport {
    pub fn projects(&self) -> &[ProjectHours] {
        &self.projects
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Rounded share of the total, or 0 when nothing was logged.
    pub fn percentage_of_total(&self, hours: f64) -> i64 {
        if self.total_hours > 0.0 {
            (hours / self.total_hours * 100.0).round() as i64
        } else {
            0
        }
    }

    fn insert(&mut self, project: String, hours: f64, policy: DuplicatePolicy) {
        match self.projects.iter_mut().find(|p| p.project == project) {
            Some(existing) => match policy {
                DuplicatePolicy::Overwrite => existing.hours = hours,
                DuplicatePolicy::Merge => existing.hours += hours,
            },
            None => self.projects.push(ProjectHours { project, hours }),
        }
    }
}

pub fn aggregate(records: &[ReportRecord], policy: DuplicatePolicy) -> AggregatedReport {
    let mut report = AggregatedReport::default();

    for record in records {
        let hours = record.week_seconds() as f64 / SECONDS_PER_HOUR;
        let project = record.project_key();
        trace!(%project, hours, "record");

        report.insert(project, hours, policy);
        report.total_hours += hours;
    }

    report
}

/// Sunday of the current week through today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    pub fn current_week(today: NaiveDate) -> Self {
        let since_sunday = today.weekday().num_days_from_sunday();
        ReportWindow {
            start: today - Duration::days(since_sunday.into()),
            end: today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordTitle;

    fn hours_for(report: &AggregatedReport, project: &str) -> Option<f64> {
        report
            .projects()
            .iter()
            .find(|p| p.project == project)
            .map(|p| p.hours)
    }

    fn record(client: &str, project: &str, seconds: u64) -> ReportRecord {
        let mut totals = vec![None; 7];
        totals.push(Some(seconds));
        ReportRecord {
            title: RecordTitle {
                client: client.to_string(),
                project: project.to_string(),
            },
            totals,
        }
    }

    #[test]
    fn aggregates_distinct_projects() {
        let records = vec![record("A", "X", 3600), record("B", "Y", 7200)];
        let report = aggregate(&records, DuplicatePolicy::Overwrite);

        assert_eq!(report.projects().len(), 2);
        assert_eq!(hours_for(&report, "A - X"), Some(1.0));
        assert_eq!(hours_for(&report, "B - Y"), Some(2.0));
        assert_eq!(report.total_hours(), 3.0);
    }

    #[test]
    fn total_is_sum_of_record_hours_in_order() {
        let records = vec![
            record("A", "X", 1234),
            record("B", "Y", 5678),
            record("C", "Z", 91011),
        ];
        let report = aggregate(&records, DuplicatePolicy::Overwrite);

        let expected = 1234.0 / 3600.0 + 5678.0 / 3600.0 + 91011.0 / 3600.0;
        assert_eq!(report.total_hours(), expected);
    }

    #[test]
    fn overwrite_keeps_later_value_and_first_position() {
        let records = vec![
            record("A", "X", 3600),
            record("B", "Y", 1800),
            record("A", "X", 7200),
        ];
        let report = aggregate(&records, DuplicatePolicy::Overwrite);

        assert_eq!(report.projects().len(), 2);
        assert_eq!(report.projects()[0].project, "A - X");
        assert_eq!(hours_for(&report, "A - X"), Some(2.0));
        assert_eq!(report.total_hours(), 3.5);
    }

    #[test]
    fn merge_sums_duplicates() {
        let records = vec![record("A", "X", 3600), record("A", "X", 7200)];
        let report = aggregate(&records, DuplicatePolicy::Merge);

        assert_eq!(report.projects().len(), 1);
        assert_eq!(hours_for(&report, "A - X"), Some(3.0));
        assert_eq!(report.total_hours(), 3.0);
    }

    #[test]
    fn empty_input_gives_empty_report() {
        let report = aggregate(&[], DuplicatePolicy::Overwrite);
        assert!(report.is_empty());
        assert_eq!(report.total_hours(), 0.0);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let records = vec![record("A", "X", 3600), record("B", "Y", 7200)];
        let report = aggregate(&records, DuplicatePolicy::Overwrite);

        assert_eq!(report.percentage_of_total(1.0), 33);
        assert_eq!(report.percentage_of_total(2.0), 67);
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        let report = aggregate(&[record("A", "X", 0)], DuplicatePolicy::Overwrite);
        assert_eq!(report.percentage_of_total(0.0), 0);
    }

    #[test]
    fn window_starts_on_most_recent_sunday() {
        let thursday = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let window = ReportWindow::current_week(thursday);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
        assert_eq!(window.end, thursday);
    }

    #[test]
    fn window_on_sunday_is_a_single_day() {
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 11).unwrap();
        let window = ReportWindow::current_week(sunday);
        assert_eq!(window.start, sunday);
        assert_eq!(window.end, sunday);
    }
}
