//! Observed user activity.
//!
//! Activities are append-only: an input producer or a manual log call creates
//! one, the classifier assigns its category at insert time, and it is never
//! mutated afterwards. The log is deduplicated by id so producers can replay
//! overlapping fetches safely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{classify, ActivityCategory};

/// Where an activity observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Browser,
    Git,
    Editor,
    App,
    TimeTracker,
    Manual,
}

/// A single recorded activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Duration in minutes; zero-length observations are valid.
    pub duration_minutes: u32,
    pub source: ActivitySource,
    /// Assigned at classification time, immutable thereafter.
    pub category: ActivityCategory,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    /// Raw producer data kept as evidence.
    #[serde(default)]
    pub evidence: Option<serde_json::Value>,
}

/// Append-only in-memory activity log, deduplicated by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityLog {
    entries: Vec<Activity>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a manually logged activity. The classifier input is the URL if
    /// present, else the app name, else the title.
    pub fn log(
        &mut self,
        title: impl Into<String>,
        duration_minutes: u32,
        url: Option<String>,
        app_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Activity {
        let title = title.into();
        let classifier_input = url
            .as_deref()
            .or(app_name.as_deref())
            .unwrap_or(title.as_str());
        let activity = Activity {
            id: format!("manual-{}", Uuid::new_v4()),
            timestamp: now,
            duration_minutes,
            source: ActivitySource::Manual,
            category: classify(classifier_input),
            title,
            url,
            app_name,
            evidence: None,
        };
        self.entries.push(activity.clone());
        activity
    }

    /// Store activities from an external producer, skipping ids already seen.
    /// Returns how many were actually appended.
    pub fn store(&mut self, activities: Vec<Activity>) -> usize {
        let mut appended = 0;
        for activity in activities {
            if !self.entries.iter().any(|a| a.id == activity.id) {
                self.entries.push(activity);
                appended += 1;
            }
        }
        appended
    }

    /// All recorded activities, oldest first.
    pub fn all(&self) -> &[Activity] {
        &self.entries
    }

    /// Activities recorded on the current (UTC) calendar day.
    pub fn today(&self, now: DateTime<Utc>) -> Vec<Activity> {
        let today = now.date_naive();
        self.entries
            .iter()
            .filter(|a| a.timestamp.date_naive() == today)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Window length for context-switch counting.
const SWITCH_WINDOW_MINUTES: i64 = 60;

/// Counts switches of the active context (app or URL) within a rolling
/// one-hour window. The counter resets when the window expires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchTracker {
    count: u32,
    window_started: Option<DateTime<Utc>>,
    last_context: Option<String>,
}

impl SwitchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn roll_window(&mut self, now: DateTime<Utc>) {
        match self.window_started {
            Some(started) if (now - started).num_minutes() < SWITCH_WINDOW_MINUTES => {}
            _ => {
                self.count = 0;
                self.window_started = Some(now);
            }
        }
    }

    /// Observe the current context. A change from the previous context within
    /// the window counts as one switch.
    pub fn observe(&mut self, context: &str, now: DateTime<Utc>) {
        self.roll_window(now);
        if let Some(last) = &self.last_context {
            if last != context {
                self.count += 1;
            }
        }
        self.last_context = Some(context.to_string());
    }

    /// Switch count for the current window.
    pub fn count(&mut self, now: DateTime<Utc>) -> u32 {
        self.roll_window(now);
        self.count
    }
}
