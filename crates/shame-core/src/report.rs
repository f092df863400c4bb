//! Productivity report aggregation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::level::ShameLevel;
use crate::score::HistoryEntry;
use crate::task::{Task, TaskStatus};

/// Reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// One grouped procrastination sink in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcrastinationEntry {
    pub activity: String,
    pub total_minutes: u32,
    pub occurrences: u32,
}

/// Aggregated productivity report over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityReport {
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub average_score: f64,
    pub worst_score: u8,
    pub best_score: u8,
    pub tasks_completed: usize,
    pub tasks_overdue: usize,
    pub minutes_productive: u32,
    pub minutes_wasted: u32,
    /// Wasted activities grouped by title, worst first, at most ten.
    pub top_procrastination: Vec<ProcrastinationEntry>,
    /// Scores bucketed by the shame level they map to, keyed by level value.
    pub level_distribution: BTreeMap<u8, u32>,
}

/// Build a report from today's activities, the task list, and the score
/// history for the period.
pub fn generate_report(
    activities: &[Activity],
    tasks: &[Task],
    scores: &[HistoryEntry],
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> ProductivityReport {
    let mut minutes_productive = 0u32;
    let mut minutes_wasted = 0u32;
    let mut groups: BTreeMap<&str, ProcrastinationEntry> = BTreeMap::new();

    for activity in activities {
        if activity.category.is_wasted() {
            minutes_wasted += activity.duration_minutes;
            let entry = groups
                .entry(activity.title.as_str())
                .or_insert_with(|| ProcrastinationEntry {
                    activity: activity.title.clone(),
                    total_minutes: 0,
                    occurrences: 0,
                });
            entry.total_minutes += activity.duration_minutes;
            entry.occurrences += 1;
        } else {
            minutes_productive += activity.duration_minutes;
        }
    }

    let mut top_procrastination: Vec<ProcrastinationEntry> = groups.into_values().collect();
    top_procrastination.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
    top_procrastination.truncate(10);

    let values: Vec<u8> = scores.iter().map(|e| e.score).collect();
    let average_score = if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&s| s as f64).sum::<f64>() / values.len() as f64
    };

    let mut level_distribution = BTreeMap::new();
    for &score in &values {
        *level_distribution
            .entry(ShameLevel::from_score(score).as_u8())
            .or_insert(0u32) += 1;
    }

    ProductivityReport {
        period,
        generated_at: now,
        average_score,
        worst_score: values.iter().copied().max().unwrap_or(0),
        best_score: values.iter().copied().min().unwrap_or(0),
        tasks_completed: tasks.iter().filter(|t| t.status == TaskStatus::Done).count(),
        tasks_overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
        minutes_productive,
        minutes_wasted,
        top_procrastination,
        level_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivitySource;
    use crate::category::ActivityCategory;
    use crate::task::{TaskPriority, TaskSource};
    use chrono::Duration;

    fn activity(title: &str, minutes: u32, category: ActivityCategory, now: DateTime<Utc>) -> Activity {
        Activity {
            id: format!("{title}-{minutes}"),
            timestamp: now,
            duration_minutes: minutes,
            source: ActivitySource::Browser,
            category,
            title: title.into(),
            url: None,
            app_name: None,
            evidence: None,
        }
    }

    fn entry(score: u8, now: DateTime<Utc>) -> HistoryEntry {
        HistoryEntry { score, at: now }
    }

    #[test]
    fn test_groups_wasted_activities_by_title() {
        let now = Utc::now();
        let activities = vec![
            activity("YouTube", 30, ActivityCategory::BlatantProcrastination, now),
            activity("YouTube", 20, ActivityCategory::BlatantProcrastination, now),
            activity("Twitter", 10, ActivityCategory::Questionable, now),
            activity("rust-lang.org", 40, ActivityCategory::Productive, now),
        ];
        let report = generate_report(&activities, &[], &[], ReportPeriod::Daily, now);
        assert_eq!(report.minutes_wasted, 60);
        assert_eq!(report.minutes_productive, 40);
        assert_eq!(report.top_procrastination.len(), 2);
        assert_eq!(report.top_procrastination[0].activity, "YouTube");
        assert_eq!(report.top_procrastination[0].total_minutes, 50);
        assert_eq!(report.top_procrastination[0].occurrences, 2);
    }

    #[test]
    fn test_score_aggregates() {
        let now = Utc::now();
        let scores = vec![entry(20, now), entry(80, now), entry(50, now)];
        let report = generate_report(&[], &[], &scores, ReportPeriod::Daily, now);
        assert_eq!(report.average_score, 50.0);
        assert_eq!(report.worst_score, 80);
        assert_eq!(report.best_score, 20);
        assert_eq!(report.level_distribution.get(&1), Some(&1));
        assert_eq!(report.level_distribution.get(&3), Some(&1));
        assert_eq!(report.level_distribution.get(&4), Some(&1));
    }

    #[test]
    fn test_empty_inputs() {
        let now = Utc::now();
        let report = generate_report(&[], &[], &[], ReportPeriod::Weekly, now);
        assert_eq!(report.average_score, 0.0);
        assert_eq!(report.worst_score, 0);
        assert!(report.top_procrastination.is_empty());
        assert!(report.level_distribution.is_empty());
    }

    #[test]
    fn test_task_counts_use_derived_overdue() {
        let now = Utc::now();
        let done = Task {
            id: "d".into(),
            title: "done".into(),
            source: TaskSource::Manual,
            priority: TaskPriority::Medium,
            status: TaskStatus::Done,
            due_at: None,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        };
        let mut stale = done.clone();
        stale.id = "s".into();
        stale.status = TaskStatus::Todo;
        stale.due_at = Some(now - Duration::hours(1));
        let report = generate_report(&[], &[done, stale], &[], ReportPeriod::Daily, now);
        assert_eq!(report.tasks_completed, 1);
        assert_eq!(report.tasks_overdue, 1);
    }
}
