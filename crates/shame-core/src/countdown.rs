//! The nuclear countdown state machine.
//!
//! When the score crosses the send threshold a countdown starts; if it runs
//! out the caller is told to fire the nuclear notification. Dropping back
//! below the warning threshold cancels the countdown automatically, and a
//! post-send cooldown suppresses everything. The machine never performs
//! delivery itself: it only decides, and the caller acknowledges a successful
//! send afterwards. A send that fails leaves the countdown armed so the next
//! evaluation retries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Thresholds and timing for the nuclear escalation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationPolicy {
    pub enabled: bool,
    /// Score at which warnings begin.
    pub warning_threshold: u8,
    /// Score at which the countdown arms.
    pub send_threshold: u8,
    /// Countdown length before the notification fires.
    pub countdown_minutes: i64,
    /// Suppression window after a successful send.
    pub cooldown_minutes: i64,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            warning_threshold: 85,
            send_threshold: 95,
            countdown_minutes: 5,
            cooldown_minutes: 60,
        }
    }
}

/// What the caller should do after an evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDecision {
    pub should_warn: bool,
    pub should_send: bool,
    /// Whole minutes left on an active countdown, rounded up.
    pub minutes_remaining: i64,
}

impl TriggerDecision {
    fn none() -> Self {
        Self {
            should_warn: false,
            should_send: false,
            minutes_remaining: 0,
        }
    }
}

/// Countdown status for display surfaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountdownStatus {
    pub is_active: bool,
    pub minutes_remaining: i64,
    pub warnings_sent: u32,
}

/// Escalating warning texts; the ladder tops out at the final warning.
const WARNING_LADDER: &[&str] = &[
    "⚠️ WARNING {n}: Your procrastination score is approaching nuclear territory...",
    "⚠️ WARNING {n}: I have your mom's email loaded. Don't test me.",
    "⚠️ WARNING {n}: The nuclear notification is being drafted. You still have time.",
    "⚠️ FINAL WARNING: The nuclear notification is ARMED. Get to work or she'll know EVERYTHING.",
];

/// Nuclear countdown state. One per session; all transitions take an explicit
/// `now`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NuclearCountdown {
    warnings_sent: u32,
    last_warning_at: Option<DateTime<Utc>>,
    last_sent_at: Option<DateTime<Utc>>,
    countdown_started_at: Option<DateTime<Utc>>,
}

impl NuclearCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings_sent(&self) -> u32 {
        self.warnings_sent
    }

    pub fn is_active(&self) -> bool {
        self.countdown_started_at.is_some()
    }

    /// Evaluate the score against the policy and advance the machine.
    ///
    /// Decision order: disabled, then cooldown, then an active countdown
    /// (expiry, auto-cancel, or remaining time), then the send threshold
    /// (arms the countdown), then the warning band.
    pub fn evaluate(
        &mut self,
        policy: &EscalationPolicy,
        score: u8,
        now: DateTime<Utc>,
    ) -> TriggerDecision {
        if !policy.enabled {
            return TriggerDecision::none();
        }

        if let Some(sent) = self.last_sent_at {
            if (now - sent).num_minutes() < policy.cooldown_minutes {
                return TriggerDecision::none();
            }
        }

        if let Some(started) = self.countdown_started_at {
            let elapsed_secs = (now - started).num_seconds();
            let remaining_secs = policy.countdown_minutes * 60 - elapsed_secs;

            if remaining_secs <= 0 {
                return TriggerDecision {
                    should_warn: false,
                    should_send: true,
                    minutes_remaining: 0,
                };
            }

            // The user started working; stand down.
            if score < policy.warning_threshold {
                self.countdown_started_at = None;
                return TriggerDecision::none();
            }

            return TriggerDecision {
                should_warn: false,
                should_send: false,
                minutes_remaining: (remaining_secs + 59) / 60,
            };
        }

        if score >= policy.send_threshold {
            self.countdown_started_at = Some(now);
            return TriggerDecision {
                should_warn: true,
                should_send: false,
                minutes_remaining: policy.countdown_minutes,
            };
        }

        if score >= policy.warning_threshold {
            return TriggerDecision {
                should_warn: true,
                should_send: false,
                minutes_remaining: 0,
            };
        }

        TriggerDecision::none()
    }

    /// Record a warning and return its text. The counter is cumulative for
    /// the session; cancellation does not reset it.
    pub fn record_warning(&mut self, now: DateTime<Utc>) -> String {
        self.warnings_sent += 1;
        self.last_warning_at = Some(now);
        let index = (self.warnings_sent as usize - 1).min(WARNING_LADDER.len() - 1);
        WARNING_LADDER[index].replace("{n}", &self.warnings_sent.to_string())
    }

    /// Acknowledge a successful nuclear send: clears the countdown and starts
    /// the cooldown. Callers must not invoke this when delivery failed.
    pub fn acknowledge_sent(&mut self, now: DateTime<Utc>) {
        self.last_sent_at = Some(now);
        self.countdown_started_at = None;
    }

    /// Manual cancellation, always allowed.
    pub fn cancel(&mut self) -> String {
        self.countdown_started_at = None;
        "🎉 Nuclear countdown CANCELLED! Good choice. Now keep working.".to_string()
    }

    pub fn status(&self, policy: &EscalationPolicy, now: DateTime<Utc>) -> CountdownStatus {
        match self.countdown_started_at {
            Some(started) => {
                let remaining_secs =
                    (policy.countdown_minutes * 60 - (now - started).num_seconds()).max(0);
                CountdownStatus {
                    is_active: true,
                    minutes_remaining: (remaining_secs + 59) / 60,
                    warnings_sent: self.warnings_sent,
                }
            }
            None => CountdownStatus {
                is_active: false,
                minutes_remaining: 0,
                warnings_sent: self.warnings_sent,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn policy() -> EscalationPolicy {
        EscalationPolicy::default()
    }

    #[test]
    fn test_below_warning_is_silent() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        let d = machine.evaluate(&policy(), 84, now);
        assert!(!d.should_warn);
        assert!(!d.should_send);
        assert!(!machine.is_active());
    }

    #[test]
    fn test_warning_band_warns_without_arming() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        let d = machine.evaluate(&policy(), 90, now);
        assert!(d.should_warn);
        assert!(!d.should_send);
        assert!(!machine.is_active());
    }

    #[test]
    fn test_send_threshold_arms_countdown() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        let d = machine.evaluate(&policy(), 96, now);
        assert!(d.should_warn);
        assert!(!d.should_send);
        assert_eq!(d.minutes_remaining, 5);
        assert!(machine.is_active());
    }

    #[test]
    fn test_countdown_expiry_requests_send() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.evaluate(&policy(), 96, now);
        let later = now + Duration::minutes(5);
        let d = machine.evaluate(&policy(), 96, later);
        assert!(d.should_send);
        assert_eq!(d.minutes_remaining, 0);
    }

    #[test]
    fn test_countdown_reports_ceiling_of_remaining() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.evaluate(&policy(), 96, now);
        // 90 seconds in, 3.5 minutes remain, reported as 4.
        let d = machine.evaluate(&policy(), 96, now + Duration::seconds(90));
        assert!(!d.should_send);
        assert_eq!(d.minutes_remaining, 4);
    }

    #[test]
    fn test_score_drop_cancels_countdown() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.evaluate(&policy(), 96, now);
        let d = machine.evaluate(&policy(), 60, now + Duration::minutes(1));
        assert!(!d.should_warn);
        assert!(!d.should_send);
        assert!(!machine.is_active());
    }

    #[test]
    fn test_score_in_warning_band_keeps_countdown_running() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.evaluate(&policy(), 96, now);
        // 86 is below send but above warning; the countdown holds.
        let d = machine.evaluate(&policy(), 86, now + Duration::minutes(1));
        assert!(machine.is_active());
        assert_eq!(d.minutes_remaining, 4);
    }

    #[test]
    fn test_cooldown_suppresses_everything() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.evaluate(&policy(), 96, now);
        machine.acknowledge_sent(now + Duration::minutes(5));
        // Even a maximal score stays silent inside the cooldown.
        let d = machine.evaluate(&policy(), 100, now + Duration::minutes(30));
        assert!(!d.should_warn);
        assert!(!d.should_send);
        // After the cooldown the machine arms again.
        let d = machine.evaluate(&policy(), 100, now + Duration::minutes(70));
        assert!(d.should_warn);
        assert!(machine.is_active());
    }

    #[test]
    fn test_failed_send_leaves_state_armed() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.evaluate(&policy(), 96, now);
        let expired = now + Duration::minutes(6);
        assert!(machine.evaluate(&policy(), 96, expired).should_send);
        // Delivery failed, no acknowledgement: the next tick asks again.
        assert!(machine.evaluate(&policy(), 96, expired + Duration::minutes(1)).should_send);
    }

    #[test]
    fn test_manual_cancel_is_unconditional() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.evaluate(&policy(), 100, now);
        assert!(machine.is_active());
        machine.cancel();
        assert!(!machine.is_active());
    }

    #[test]
    fn test_warning_ladder_escalates_and_caps() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        assert!(machine.record_warning(now).contains("WARNING 1"));
        assert!(machine.record_warning(now).contains("WARNING 2"));
        machine.record_warning(now);
        assert!(machine.record_warning(now).contains("FINAL WARNING"));
        // Past the end of the ladder it stays on the final warning.
        assert!(machine.record_warning(now).contains("FINAL WARNING"));
        assert_eq!(machine.warnings_sent(), 5);
    }

    #[test]
    fn test_cancel_preserves_warning_count() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        machine.record_warning(now);
        machine.record_warning(now);
        machine.cancel();
        assert_eq!(machine.warnings_sent(), 2);
    }

    #[test]
    fn test_disabled_policy_is_inert() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        let mut p = policy();
        p.enabled = false;
        let d = machine.evaluate(&p, 100, now);
        assert!(!d.should_warn);
        assert!(!d.should_send);
        assert!(!machine.is_active());
    }

    #[test]
    fn test_status_mirrors_state() {
        let now = Utc::now();
        let mut machine = NuclearCountdown::new();
        let s = machine.status(&policy(), now);
        assert!(!s.is_active);
        machine.evaluate(&policy(), 96, now);
        let s = machine.status(&policy(), now + Duration::seconds(30));
        assert!(s.is_active);
        assert_eq!(s.minutes_remaining, 5);
    }
}
