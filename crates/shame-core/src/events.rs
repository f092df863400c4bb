use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::ShameLevel;
use crate::score::Trend;

/// Every observable state change in the engine produces an Event.
/// Dashboards poll for events; delivery surfaces subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ScoreCalculated {
        score: u8,
        level: ShameLevel,
        trend: Trend,
        at: DateTime<Utc>,
    },
    ShameDelivered {
        level: ShameLevel,
        channel: String,
        at: DateTime<Utc>,
    },
    /// Delivery failed; countdown state was left untouched for retry.
    DeliveryFailed {
        channel: String,
        reason: String,
        at: DateTime<Utc>,
    },
    WarningIssued {
        warning_number: u32,
        at: DateTime<Utc>,
    },
    CountdownStarted {
        minutes: i64,
        at: DateTime<Utc>,
    },
    CountdownCancelled {
        at: DateTime<Utc>,
    },
    NuclearFired {
        score: u8,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    DisableAttempted {
        allowed: bool,
        recent_attempts: usize,
        at: DateTime<Utc>,
    },
    EngineReset {
        at: DateTime<Utc>,
    },
}
