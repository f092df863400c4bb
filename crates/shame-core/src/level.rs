//! Shame escalation levels and the consequences attached to them.
//!
//! The level is a pure function of the score: bands are contiguous,
//! non-overlapping, and exhaustive over 0..=100.

use serde::{Deserialize, Serialize};

/// Ordinal escalation stage derived from score bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShameLevel {
    GentleNudge,
    PassiveAggressive,
    DirectCallout,
    AggressiveShame,
    NuclearOption,
}

/// Externally visible consequence for a shame level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationAction {
    /// Silent dashboard update only.
    DashboardUpdate,
    /// Local desktop notification.
    DesktopNotification,
    /// Post to the configured public channel.
    PublicPost,
    /// The irreversible external notification.
    NuclearNotification,
}

/// Urgency tag attached to a shame message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
    Nuclear,
}

impl ShameLevel {
    /// Map a 0-100 score to its shame level.
    ///
    /// Bands are closed on the low end: <=20 -> 1, <=40 -> 2, <=60 -> 3,
    /// <=80 -> 4, else 5.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => ShameLevel::GentleNudge,
            21..=40 => ShameLevel::PassiveAggressive,
            41..=60 => ShameLevel::DirectCallout,
            61..=80 => ShameLevel::AggressiveShame,
            _ => ShameLevel::NuclearOption,
        }
    }

    /// Numeric level value (1-5).
    pub fn as_u8(self) -> u8 {
        match self {
            ShameLevel::GentleNudge => 1,
            ShameLevel::PassiveAggressive => 2,
            ShameLevel::DirectCallout => 3,
            ShameLevel::AggressiveShame => 4,
            ShameLevel::NuclearOption => 5,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ShameLevel::GentleNudge => "Gentle Nudge",
            ShameLevel::PassiveAggressive => "Passive Aggressive",
            ShameLevel::DirectCallout => "Direct Call-Out",
            ShameLevel::AggressiveShame => "Aggressive Shame",
            ShameLevel::NuclearOption => "NUCLEAR OPTION",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ShameLevel::GentleNudge => "\u{1F60A}",
            ShameLevel::PassiveAggressive => "\u{1F644}",
            ShameLevel::DirectCallout => "\u{1F624}",
            ShameLevel::AggressiveShame => "\u{1F525}",
            ShameLevel::NuclearOption => "\u{2622}\u{FE0F}",
        }
    }

    /// The downstream consequence for this level.
    pub fn action(self) -> EscalationAction {
        match self {
            ShameLevel::GentleNudge => EscalationAction::DashboardUpdate,
            ShameLevel::PassiveAggressive => EscalationAction::DesktopNotification,
            ShameLevel::DirectCallout => EscalationAction::PublicPost,
            ShameLevel::AggressiveShame => EscalationAction::PublicPost,
            ShameLevel::NuclearOption => EscalationAction::NuclearNotification,
        }
    }

    /// The urgency tag for this level.
    pub fn urgency(self) -> Urgency {
        match self {
            ShameLevel::GentleNudge => Urgency::Low,
            ShameLevel::PassiveAggressive => Urgency::Medium,
            ShameLevel::DirectCallout => Urgency::High,
            ShameLevel::AggressiveShame => Urgency::Critical,
            ShameLevel::NuclearOption => Urgency::Nuclear,
        }
    }
}
