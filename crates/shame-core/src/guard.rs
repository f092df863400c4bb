//! The disable guard.
//!
//! Turning the engine off is itself an observable act. Every attempt is
//! logged before it is judged, rapid retries are flagged as abuse, and
//! during work hours critical open tasks block the switch entirely. An
//! override flag exists for the user who genuinely needs out.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Offset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Attempts within this trailing window count toward abuse detection.
const ABUSE_WINDOW_MINUTES: i64 = 60;
/// This many attempts in the window is abuse.
const ABUSE_ATTEMPT_FLOOR: usize = 3;
/// Attempts within this window feed the auto-re-enable check.
const REENABLE_WINDOW_MINUTES: i64 = 30;
/// This many attempts in the re-enable window during work hours advises
/// turning the engine back on.
const REENABLE_ATTEMPT_FLOOR: usize = 2;

/// Weekly work schedule evaluated in a fixed UTC offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSchedule {
    /// First work hour, inclusive (local).
    pub start_hour: u32,
    /// Last work hour, exclusive (local).
    pub end_hour: u32,
    /// Work days, ISO weekday numbers (1 = Monday .. 7 = Sunday).
    pub work_days: Vec<u8>,
    /// Local offset from UTC in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for WorkSchedule {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            work_days: vec![1, 2, 3, 4, 5],
            utc_offset_minutes: 0,
        }
    }
}

impl WorkSchedule {
    /// Whether `now` falls inside the schedule. An invalid UTC offset is
    /// treated as UTC rather than failing the check.
    pub fn is_work_hours(&self, now: DateTime<Utc>) -> bool {
        let offset =
            FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        let local = now.with_timezone(&offset);
        let day = iso_weekday(local.weekday());
        self.work_days.contains(&day)
            && local.hour() >= self.start_hour
            && local.hour() < self.end_hour
    }
}

fn iso_weekday(day: Weekday) -> u8 {
    day.number_from_monday() as u8
}

/// One logged disable attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableAttempt {
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Guard status, computed fresh on every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardState {
    pub is_work_hours: bool,
    pub can_disable: bool,
    /// Attempts in the trailing hour.
    pub recent_attempts: usize,
    pub last_attempt_at: Option<DateTime<Utc>>,
    /// Titles of critical tasks that must be completed first.
    pub required_tasks: Vec<String>,
    pub manager_approval_required: bool,
    pub suspicious_activity: bool,
}

/// Verdict on a disable attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableVerdict {
    pub allowed: bool,
    pub message: String,
}

/// Advisory from the periodic auto-re-enable check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReEnableAdvice {
    pub should_re_enable: bool,
    pub reason: String,
}

/// Tracks disable attempts and rules on them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisableGuard {
    attempts: Vec<DisableAttempt>,
    /// Override that always permits disabling.
    pub override_enabled: bool,
}

impl DisableGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> &[DisableAttempt] {
        &self.attempts
    }

    fn recent_attempts(&self, window_minutes: i64, now: DateTime<Utc>) -> usize {
        self.attempts
            .iter()
            .filter(|a| now - a.at < Duration::minutes(window_minutes))
            .count()
    }

    /// Critical open tasks that gate disabling: priority critical or high,
    /// neither done nor abandoned.
    fn blocking_tasks<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks
            .iter()
            .filter(|t| t.priority.is_blocking() && t.is_incomplete())
            .collect()
    }

    /// Compute the current guard state without recording anything.
    pub fn state(&self, schedule: &WorkSchedule, tasks: &[Task], now: DateTime<Utc>) -> GuardState {
        let work_hours = schedule.is_work_hours(now);
        let blocking = self.blocking_tasks(tasks);
        let recent = self.recent_attempts(ABUSE_WINDOW_MINUTES, now);

        GuardState {
            is_work_hours: work_hours,
            can_disable: self.override_enabled || !work_hours || blocking.is_empty(),
            recent_attempts: recent,
            last_attempt_at: self.attempts.last().map(|a| a.at),
            required_tasks: blocking.iter().map(|t| t.title.clone()).collect(),
            manager_approval_required: work_hours && !blocking.is_empty(),
            suspicious_activity: recent >= ABUSE_ATTEMPT_FLOOR,
        }
    }

    /// Attempt to disable the engine. The attempt is logged first, so even a
    /// denied attempt counts toward the abuse window.
    pub fn attempt_disable(
        &mut self,
        schedule: &WorkSchedule,
        tasks: &[Task],
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> DisableVerdict {
        self.attempts.push(DisableAttempt { at: now, reason });

        let state = self.state(schedule, tasks, now);

        if state.suspicious_activity {
            return DisableVerdict {
                allowed: false,
                message: format!(
                    "🚨 SUSPICIOUS ACTIVITY DETECTED: {} disable attempts in the last hour! \
                     This has been logged to the shame dashboard. Nice try.",
                    state.recent_attempts
                ),
            };
        }

        if !state.can_disable {
            let task_list: String = state
                .required_tasks
                .iter()
                .take(3)
                .map(|t| format!("  • {t}"))
                .collect::<Vec<_>>()
                .join("\n");

            let message = if state.manager_approval_required {
                format!(
                    "❌ Cannot disable during work hours with critical tasks pending.\n\n\
                     Required tasks to complete first:\n{task_list}\n\n\
                     Or get manager approval. (Ha! Good luck explaining that one.)"
                )
            } else {
                format!(
                    "❌ Nice try! You can't disable shame during work hours.\n\n\
                     Complete these tasks first:\n{task_list}\n\n\
                     The Shame Engine watches. The Shame Engine knows. 👁️"
                )
            };
            return DisableVerdict {
                allowed: false,
                message,
            };
        }

        DisableVerdict {
            allowed: true,
            message: "✅ Engine paused. But remember: the shame never truly stops. It waits. 😈"
                .to_string(),
        }
    }

    /// Shame text for the attempt history; empty with no attempts.
    pub fn attempt_shame(&self) -> String {
        let total = self.attempts.len();
        if total == 0 {
            return String::new();
        }
        let plural = if total > 1 { "s" } else { "" };
        let messages = [
            format!("You've tried to disable the Shame Engine {total} time{plural}. That's not productive either."),
            format!("Disable attempt #{total} logged. Your desperation is being tracked. 📊"),
            "Every disable attempt adds +5 to your procrastination score. Just saying.".to_string(),
            "The Shame Engine doesn't turn off. The Shame Engine just gets stronger. 💪".to_string(),
            format!("{total} disable attempts. Imagine if you spent that energy on actual work."),
            format!("I've seen {total} disable attempts. Want to know what I haven't seen? Completed tasks."),
        ];
        messages[(total - 1).min(messages.len() - 1)].clone()
    }

    /// Periodic check: repeated disable attempts during work hours advise
    /// turning the engine back on.
    pub fn check_auto_re_enable(
        &self,
        schedule: &WorkSchedule,
        now: DateTime<Utc>,
    ) -> ReEnableAdvice {
        if !schedule.is_work_hours(now) {
            return ReEnableAdvice {
                should_re_enable: false,
                reason: "Outside work hours".to_string(),
            };
        }

        let recent = self.recent_attempts(REENABLE_WINDOW_MINUTES, now);
        if recent >= REENABLE_ATTEMPT_FLOOR {
            return ReEnableAdvice {
                should_re_enable: true,
                reason: format!(
                    "Suspicious: {recent} disable attempts in last 30 minutes during work hours"
                ),
            };
        }

        ReEnableAdvice {
            should_re_enable: false,
            reason: "No suspicious activity".to_string(),
        }
    }
}
