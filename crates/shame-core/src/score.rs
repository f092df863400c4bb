//! Procrastination score calculation.
//!
//! The score is a weighted sum of six independent factors, each normalized to
//! 0-100, rounded and clamped to 0-100. The engine keeps a bounded rolling
//! history for trend detection and a calendar-day streak counter for the
//! streak penalty. All time-dependent behavior takes an explicit `now` so
//! tests can time-travel deterministically.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::category::ActivityCategory;
use crate::error::ValidationError;
use crate::format::format_duration;
use crate::level::ShameLevel;
use crate::task::Task;

/// Maximum retained history entries; oldest are trimmed first.
const HISTORY_CAP: usize = 1000;

/// Streak penalty per consecutive procrastination day.
const STREAK_POINTS_PER_DAY: f64 = 15.0;

/// A day counts toward the streak when it ends at or above this score.
const STREAK_SCORE_FLOOR: u8 = 50;

/// Weights for the six score factors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub time_wasted: f64,
    pub deadline_proximity: f64,
    pub task_completion: f64,
    pub priority_severity: f64,
    pub streak: f64,
    pub context_switch: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            time_wasted: 0.35,
            deadline_proximity: 0.25,
            task_completion: 0.15,
            priority_severity: 0.10,
            streak: 0.10,
            context_switch: 0.05,
        }
    }
}

impl ScoreWeights {
    /// Validate that weights are non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let parts = [
            ("time_wasted", self.time_wasted),
            ("deadline_proximity", self.deadline_proximity),
            ("task_completion", self.task_completion),
            ("priority_severity", self.priority_severity),
            ("streak", self.streak),
            ("context_switch", self.context_switch),
        ];
        for (name, w) in parts {
            if !(0.0..=1.0).contains(&w) {
                return Err(ValidationError::InvalidValue {
                    field: name.to_string(),
                    message: format!("must be in [0.0, 1.0], got {w}"),
                });
            }
        }
        let sum: f64 = parts.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ValidationError::WeightSum { sum });
        }
        Ok(())
    }
}

/// Per-factor breakdown, each value in 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time_wasted_ratio: f64,
    pub deadline_proximity: f64,
    pub task_completion_ratio: f64,
    pub priority_severity: f64,
    pub streak_penalty: f64,
    pub context_switch_penalty: f64,
}

/// Trend direction relative to recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

/// An immutable score snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    /// Overall score 0-100; higher means more procrastination.
    pub score: u8,
    pub level: ShameLevel,
    pub breakdown: ScoreBreakdown,
    pub trend: Trend,
    pub calculated_at: DateTime<Utc>,
    /// Human-readable summary for display surfaces.
    pub summary: String,
}

/// A single retained history point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub score: u8,
    pub at: DateTime<Utc>,
}

/// The score calculator.
///
/// Owns the rolling score history and the day-streak state. One instance per
/// session; the host passes it to each calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEngine {
    weights: ScoreWeights,
    history: VecDeque<HistoryEntry>,
    /// Consecutive calendar days that ended at score >= 50.
    streak_days: u32,
    /// Last calendar day the streak check fired; at most once per day.
    last_day_checked: Option<NaiveDate>,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreEngine {
    pub fn new() -> Self {
        Self::with_weights(ScoreWeights::default())
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self {
            weights,
            history: VecDeque::new(),
            streak_days: 0,
            last_day_checked: None,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    /// Calculate the procrastination score from today's activities, the full
    /// task list, and the context-switch count for the current window.
    ///
    /// Side effects: appends the snapshot's score to history (trimming past
    /// the cap) and advances the day-streak state at most once per calendar
    /// day.
    pub fn calculate(
        &mut self,
        activities: &[Activity],
        tasks: &[Task],
        context_switches: u32,
        now: DateTime<Utc>,
    ) -> ScoreSnapshot {
        let breakdown = ScoreBreakdown {
            time_wasted_ratio: time_wasted_ratio(activities),
            deadline_proximity: deadline_proximity(tasks, now),
            task_completion_ratio: task_completion_ratio(tasks, now),
            priority_severity: priority_severity(tasks, activities, now),
            streak_penalty: (self.streak_days as f64 * STREAK_POINTS_PER_DAY).clamp(0.0, 100.0),
            context_switch_penalty: context_switch_penalty(context_switches),
        };

        let raw = breakdown.time_wasted_ratio * self.weights.time_wasted
            + breakdown.deadline_proximity * self.weights.deadline_proximity
            + breakdown.task_completion_ratio * self.weights.task_completion
            + breakdown.priority_severity * self.weights.priority_severity
            + breakdown.streak_penalty * self.weights.streak
            + breakdown.context_switch_penalty * self.weights.context_switch;

        let score = raw.round().clamp(0.0, 100.0) as u8;
        let level = ShameLevel::from_score(score);
        let trend = self.trend_for(score);

        self.push_history(score, now);
        self.update_streak(score, now);

        let summary = self.summarize(score, activities, tasks, now);

        ScoreSnapshot {
            score,
            level,
            breakdown,
            trend,
            calculated_at: now,
            summary,
        }
    }

    /// Reset for the "admit defeat" action: zero the streak and append a
    /// synthetic zero-score history entry.
    ///
    /// The synthetic entry is indistinguishable from an organic score of zero;
    /// trend averaging dilutes it but nothing tags it. Known limitation.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.streak_days = 0;
        self.push_history(0, now);
    }

    /// Trend relative to the mean of the last five recorded scores, computed
    /// before the new score is appended. Fewer than three entries: stable.
    fn trend_for(&self, score: u8) -> Trend {
        if self.history.len() < 3 {
            return Trend::Stable;
        }
        let recent: Vec<f64> = self
            .history
            .iter()
            .rev()
            .take(5)
            .map(|e| e.score as f64)
            .collect();
        let avg = recent.iter().sum::<f64>() / recent.len() as f64;
        let score = score as f64;
        if score < avg - 5.0 {
            Trend::Improving
        } else if score > avg + 5.0 {
            Trend::Worsening
        } else {
            Trend::Stable
        }
    }

    fn push_history(&mut self, score: u8, now: DateTime<Utc>) {
        self.history.push_back(HistoryEntry { score, at: now });
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
    }

    /// Day-boundary streak check; fires at most once per calendar day no
    /// matter how often the calculator runs.
    fn update_streak(&mut self, score: u8, now: DateTime<Utc>) {
        let today = now.date_naive();
        if self.last_day_checked != Some(today) {
            self.last_day_checked = Some(today);
            if score >= STREAK_SCORE_FLOOR {
                self.streak_days += 1;
            } else {
                self.streak_days = 0;
            }
        }
    }

    fn summarize(
        &self,
        score: u8,
        activities: &[Activity],
        tasks: &[Task],
        now: DateTime<Utc>,
    ) -> String {
        let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
        let mut wasted: Vec<&Activity> = activities
            .iter()
            .filter(|a| a.category == ActivityCategory::BlatantProcrastination)
            .collect();
        let wasted_minutes: u32 = wasted.iter().map(|a| a.duration_minutes).sum();

        let mut parts = vec![format!("Procrastination Score: {score}/100")];
        if wasted_minutes > 0 {
            parts.push(format!("Time wasted: {}", format_duration(wasted_minutes)));
        }
        if overdue > 0 {
            parts.push(format!("Overdue tasks: {overdue}"));
        }
        if self.streak_days > 1 {
            parts.push(format!(
                "Procrastination streak: {} days",
                self.streak_days
            ));
        }
        if !wasted.is_empty() {
            wasted.sort_by(|a, b| b.duration_minutes.cmp(&a.duration_minutes));
            let top: Vec<&str> = wasted.iter().take(3).map(|a| a.title.as_str()).collect();
            parts.push(format!("Top distractions: {}", top.join(", ")));
        }
        parts.join(" | ")
    }
}

/// Duration-weighted fraction of today's minutes that were wasted, where each
/// category contributes its waste weight. No activity data: neutral 50.
fn time_wasted_ratio(activities: &[Activity]) -> f64 {
    if activities.is_empty() {
        return 50.0;
    }
    let mut wasted = 0.0;
    let mut total = 0.0;
    for activity in activities {
        let minutes = activity.duration_minutes as f64;
        wasted += minutes * activity.category.waste_weight();
        total += minutes;
    }
    if total == 0.0 {
        return 50.0;
    }
    (wasted / total * 100.0).clamp(0.0, 100.0)
}

/// Hours-until-due mapped to a pressure tier.
fn pressure_tier(hours_until_due: f64) -> f64 {
    if hours_until_due < 0.0 {
        100.0
    } else if hours_until_due < 1.0 {
        95.0
    } else if hours_until_due < 4.0 {
        80.0
    } else if hours_until_due < 24.0 {
        60.0
    } else if hours_until_due < 72.0 {
        40.0
    } else if hours_until_due < 168.0 {
        20.0
    } else {
        5.0
    }
}

/// Worst-case deadline pressure across pending dated tasks. The maximum
/// dominates; deadlines are not averaged. No pending dated tasks: 0.
fn deadline_proximity(tasks: &[Task], now: DateTime<Utc>) -> f64 {
    tasks
        .iter()
        .filter(|t| !t.is_done())
        .filter_map(|t| {
            let due = t.due_at?;
            let hours = (due - now).num_seconds() as f64 / 3600.0;
            Some(pressure_tier(hours) * t.priority.deadline_multiplier())
        })
        .fold(0.0, f64::max)
        .clamp(0.0, 100.0)
}

/// Percentage of all tasks currently overdue (due-date derivation included).
fn task_completion_ratio(tasks: &[Task], now: DateTime<Utc>) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
    (overdue as f64 / tasks.len() as f64 * 100.0).clamp(0.0, 100.0)
}

/// Penalty for procrastinating while critical or high priority tasks are
/// open. Scales with the count of incomplete critical tasks.
fn priority_severity(tasks: &[Task], activities: &[Activity], _now: DateTime<Utc>) -> f64 {
    let has_blocking_pending = tasks
        .iter()
        .any(|t| t.priority.is_blocking() && !t.is_done());
    if !has_blocking_pending {
        return 0.0;
    }

    let wasted_count = activities.iter().filter(|a| a.category.is_wasted()).count();
    let wasted_ratio = if activities.is_empty() {
        0.0
    } else {
        wasted_count as f64 / activities.len() as f64
    };

    let critical_count = tasks
        .iter()
        .filter(|t| t.priority == crate::task::TaskPriority::Critical && !t.is_done())
        .count();

    (wasted_ratio * 100.0 * (1.0 + critical_count as f64 * 0.3)).clamp(0.0, 100.0)
}

/// Step function over the switch count for the current window.
fn context_switch_penalty(switches: u32) -> f64 {
    match switches {
        0..=5 => 0.0,
        6..=10 => 20.0,
        11..=20 => 50.0,
        21..=30 => 75.0,
        _ => 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivitySource;
    use crate::task::{TaskPriority, TaskSource, TaskStatus};
    use chrono::Duration;
    use proptest::prelude::*;

    fn activity(minutes: u32, category: ActivityCategory, now: DateTime<Utc>) -> Activity {
        Activity {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now,
            duration_minutes: minutes,
            source: ActivitySource::Manual,
            category,
            title: "activity".into(),
            url: None,
            app_name: None,
            evidence: None,
        }
    }

    fn task(
        priority: TaskPriority,
        status: TaskStatus,
        due_offset_minutes: Option<i64>,
        now: DateTime<Utc>,
    ) -> Task {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: "task".into(),
            source: TaskSource::Manual,
            priority,
            status,
            due_at: due_offset_minutes.map(|m| now + Duration::minutes(m)),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_scenario_pure_procrastination() {
        // Two hours of blatant procrastination, no tasks: only the time-wasted
        // factor contributes. 100 * 0.35 = 35, level 2.
        let now = Utc::now();
        let mut engine = ScoreEngine::new();
        let activities = vec![activity(120, ActivityCategory::BlatantProcrastination, now)];
        let snapshot = engine.calculate(&activities, &[], 0, now);
        assert_eq!(snapshot.breakdown.time_wasted_ratio, 100.0);
        assert_eq!(snapshot.breakdown.deadline_proximity, 0.0);
        assert_eq!(snapshot.breakdown.task_completion_ratio, 0.0);
        assert_eq!(snapshot.breakdown.priority_severity, 0.0);
        assert_eq!(snapshot.score, 35);
        assert_eq!(snapshot.level, ShameLevel::PassiveAggressive);
    }

    #[test]
    fn test_scenario_critical_task_overdue() {
        // One critical task 30 minutes overdue, no activities.
        // deadline = 100*1.5 clamped to 100; completion = 100; time wasted
        // defaults to 50. round(17.5 + 25 + 15) = 58, level 3.
        let now = Utc::now();
        let mut engine = ScoreEngine::new();
        let tasks = vec![task(TaskPriority::Critical, TaskStatus::Todo, Some(-30), now)];
        let snapshot = engine.calculate(&[], &tasks, 0, now);
        assert_eq!(snapshot.breakdown.deadline_proximity, 100.0);
        assert_eq!(snapshot.breakdown.task_completion_ratio, 100.0);
        assert_eq!(snapshot.breakdown.time_wasted_ratio, 50.0);
        assert_eq!(snapshot.score, 58);
        assert_eq!(snapshot.level, ShameLevel::DirectCallout);
    }

    #[test]
    fn test_scenario_reset_then_neutral_baseline() {
        let now = Utc::now();
        let mut engine = ScoreEngine::new();
        engine.reset(now);
        assert_eq!(engine.history().last().unwrap().score, 0);
        let snapshot = engine.calculate(&[], &[], 0, now);
        assert_eq!(snapshot.score, 18); // round(50 * 0.35)
        assert_eq!(snapshot.level, ShameLevel::GentleNudge);
    }

    #[test]
    fn test_empty_inputs_are_neutral_not_zero() {
        let now = Utc::now();
        let mut engine = ScoreEngine::new();
        let snapshot = engine.calculate(&[], &[], 0, now);
        // No data is not rewarded: time wasted defaults to 50.
        assert_eq!(snapshot.breakdown.time_wasted_ratio, 50.0);
        assert_eq!(snapshot.score, 18);
    }

    #[test]
    fn test_deadline_takes_worst_case_not_average() {
        let now = Utc::now();
        let tasks = vec![
            task(TaskPriority::Low, TaskStatus::Todo, Some(10 * 24 * 60), now), // 5 * 0.7
            task(TaskPriority::Medium, TaskStatus::Todo, Some(-60), now),       // 100
        ];
        assert_eq!(deadline_proximity(&tasks, now), 100.0);
    }

    #[test]
    fn test_deadline_priority_multiplier() {
        let now = Utc::now();
        // <24h tier is 60; high priority multiplies by 1.3.
        let tasks = vec![task(TaskPriority::High, TaskStatus::Todo, Some(10 * 60), now)];
        assert_eq!(deadline_proximity(&tasks, now), 78.0);
        // Low priority discounts: 60 * 0.7 = 42.
        let tasks = vec![task(TaskPriority::Low, TaskStatus::Todo, Some(10 * 60), now)];
        assert_eq!(deadline_proximity(&tasks, now), 42.0);
    }

    #[test]
    fn test_done_tasks_carry_no_deadline_pressure() {
        let now = Utc::now();
        let tasks = vec![task(TaskPriority::Critical, TaskStatus::Done, Some(-60), now)];
        assert_eq!(deadline_proximity(&tasks, now), 0.0);
    }

    #[test]
    fn test_priority_severity_scales_with_critical_count() {
        let now = Utc::now();
        let activities = vec![
            activity(30, ActivityCategory::BlatantProcrastination, now),
            activity(30, ActivityCategory::Productive, now),
        ];
        let one_critical = vec![task(TaskPriority::Critical, TaskStatus::Todo, None, now)];
        let two_critical = vec![
            task(TaskPriority::Critical, TaskStatus::Todo, None, now),
            task(TaskPriority::Critical, TaskStatus::Todo, None, now),
        ];
        // wasted ratio 0.5: 50 * 1.3 = 65 vs 50 * 1.6 = 80.
        assert_eq!(priority_severity(&one_critical, &activities, now), 65.0);
        assert_eq!(priority_severity(&two_critical, &activities, now), 80.0);
    }

    #[test]
    fn test_context_switch_steps() {
        assert_eq!(context_switch_penalty(5), 0.0);
        assert_eq!(context_switch_penalty(6), 20.0);
        assert_eq!(context_switch_penalty(10), 20.0);
        assert_eq!(context_switch_penalty(20), 50.0);
        assert_eq!(context_switch_penalty(30), 75.0);
        assert_eq!(context_switch_penalty(31), 100.0);
    }

    #[test]
    fn test_trend_requires_history() {
        let now = Utc::now();
        let mut engine = ScoreEngine::new();
        let activities = vec![activity(60, ActivityCategory::BlatantProcrastination, now)];
        // First two calculations: stable by definition.
        assert_eq!(engine.calculate(&activities, &[], 0, now).trend, Trend::Stable);
        assert_eq!(engine.calculate(&activities, &[], 0, now).trend, Trend::Stable);
        // Third run against an average of 35s: a clean day reads improving.
        let _ = engine.calculate(&activities, &[], 0, now);
        let clean = vec![activity(60, ActivityCategory::Productive, now)];
        assert_eq!(engine.calculate(&clean, &[], 0, now).trend, Trend::Improving);
    }

    #[test]
    fn test_trend_worsening() {
        let now = Utc::now();
        let mut engine = ScoreEngine::new();
        let clean = vec![activity(60, ActivityCategory::Productive, now)];
        for _ in 0..3 {
            engine.calculate(&clean, &[], 0, now);
        }
        let dirty = vec![activity(60, ActivityCategory::BlatantProcrastination, now)];
        assert_eq!(engine.calculate(&dirty, &[], 0, now).trend, Trend::Worsening);
    }

    #[test]
    fn test_streak_fires_once_per_day() {
        let day1 = Utc::now();
        let mut engine = ScoreEngine::new();
        let dirty = vec![activity(120, ActivityCategory::BlatantProcrastination, day1)];
        let critical = vec![task(TaskPriority::Critical, TaskStatus::Todo, Some(-30), day1)];
        // Bad score, first check of the day: streak becomes 1.
        engine.calculate(&dirty, &critical, 40, day1);
        assert_eq!(engine.streak_days(), 1);
        // Repeated calculations the same day do not advance the streak.
        engine.calculate(&dirty, &critical, 40, day1);
        assert_eq!(engine.streak_days(), 1);
        // Next day advances it again.
        let day2 = day1 + Duration::days(1);
        engine.calculate(&dirty, &critical, 40, day2);
        assert_eq!(engine.streak_days(), 2);
    }

    #[test]
    fn test_streak_resets_on_good_day() {
        let day1 = Utc::now();
        let mut engine = ScoreEngine::new();
        let dirty = vec![activity(120, ActivityCategory::BlatantProcrastination, day1)];
        let critical = vec![task(TaskPriority::Critical, TaskStatus::Todo, Some(-30), day1)];
        engine.calculate(&dirty, &critical, 40, day1);
        assert_eq!(engine.streak_days(), 1);
        let day2 = day1 + Duration::days(1);
        let clean = vec![activity(60, ActivityCategory::Productive, day2)];
        engine.calculate(&clean, &[], 0, day2);
        assert_eq!(engine.streak_days(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let now = Utc::now();
        let mut engine = ScoreEngine::new();
        for i in 0..(HISTORY_CAP + 50) {
            engine.calculate(&[], &[], 0, now + Duration::seconds(i as i64));
        }
        assert_eq!(engine.history().count(), HISTORY_CAP);
    }

    #[test]
    fn test_weights_validation() {
        assert!(ScoreWeights::default().validate().is_ok());
        let mut bad = ScoreWeights::default();
        bad.time_wasted = 0.5;
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::WeightSum { .. })
        ));
        let mut out_of_range = ScoreWeights::default();
        out_of_range.streak = -0.1;
        assert!(out_of_range.validate().is_err());
    }

    proptest! {
        /// The score is always in 0..=100 and the level always matches the
        /// mapper exactly, whatever the inputs.
        #[test]
        fn score_is_bounded_and_level_consistent(
            minutes in proptest::collection::vec(0u32..600, 0..8),
            switches in 0u32..200,
        ) {
            let now = Utc::now();
            let mut engine = ScoreEngine::new();
            let activities: Vec<Activity> = minutes
                .iter()
                .enumerate()
                .map(|(i, &m)| {
                    let category = match i % 4 {
                        0 => ActivityCategory::Productive,
                        1 => ActivityCategory::ProductiveAdjacent,
                        2 => ActivityCategory::Questionable,
                        _ => ActivityCategory::BlatantProcrastination,
                    };
                    activity(m, category, now)
                })
                .collect();
            let snapshot = engine.calculate(&activities, &[], switches, now);
            prop_assert!(snapshot.score <= 100);
            prop_assert_eq!(snapshot.level, ShameLevel::from_score(snapshot.score));
            let b = snapshot.breakdown;
            for factor in [
                b.time_wasted_ratio,
                b.deadline_proximity,
                b.task_completion_ratio,
                b.priority_severity,
                b.streak_penalty,
                b.context_switch_penalty,
            ] {
                prop_assert!((0.0..=100.0).contains(&factor));
            }
        }
    }
}
