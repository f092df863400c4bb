//! The session facade.
//!
//! [`ShameEngine`] owns all per-session state: the activity log, the task
//! store, the score calculator, the nuclear countdown, and the disable guard.
//! Every state change appends an [`Event`] so dashboards can replay what
//! happened. Evaluation is pure decision-making; delivery happens in a
//! separate step so a failed post never corrupts countdown state.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::activity::{Activity, ActivityLog, SwitchTracker};
use crate::config::EngineConfig;
use crate::countdown::{CountdownStatus, NuclearCountdown, TriggerDecision};
use crate::delivery::Notifier;
use crate::error::DeliveryError;
use crate::events::Event;
use crate::guard::{DisableGuard, DisableVerdict, GuardState, ReEnableAdvice};
use crate::level::EscalationAction;
use crate::message::{self, ShameMessage};
use crate::report::{generate_report, ProductivityReport, ReportPeriod};
use crate::score::{ScoreEngine, ScoreSnapshot};
use crate::task::{Task, TaskPriority, TaskStore};

/// The result of one evaluation tick.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub snapshot: ScoreSnapshot,
    pub message: ShameMessage,
    pub decision: TriggerDecision,
    /// Warning text when the tick crossed a warning threshold.
    pub warning: Option<String>,
}

/// One engine instance per monitored session.
pub struct ShameEngine {
    config: EngineConfig,
    activities: ActivityLog,
    tasks: TaskStore,
    switches: SwitchTracker,
    score: ScoreEngine,
    countdown: NuclearCountdown,
    guard: DisableGuard,
    events: Vec<Event>,
}

impl ShameEngine {
    pub fn new(config: EngineConfig) -> Self {
        let score = ScoreEngine::with_weights(config.weights);
        Self {
            config,
            activities: ActivityLog::new(),
            tasks: TaskStore::new(),
            switches: SwitchTracker::new(),
            score,
            countdown: NuclearCountdown::new(),
            guard: DisableGuard::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain accumulated events, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ----- input side -----

    /// Record a manually logged activity and feed the switch tracker.
    pub fn log_activity(
        &mut self,
        title: impl Into<String>,
        duration_minutes: u32,
        url: Option<String>,
        app_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Activity {
        let activity = self
            .activities
            .log(title, duration_minutes, url, app_name, now);
        let context = activity
            .url
            .clone()
            .or_else(|| activity.app_name.clone())
            .unwrap_or_else(|| activity.title.clone());
        self.switches.observe(&context, now);
        activity
    }

    /// Store producer-fetched activities; returns how many were new.
    pub fn store_activities(&mut self, activities: Vec<Activity>) -> usize {
        self.activities.store(activities)
    }

    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        priority: TaskPriority,
        due_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Task {
        self.tasks.add(title, priority, due_at, now)
    }

    pub fn upsert_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks.upsert(tasks);
    }

    /// Complete a task, returning a positive message for it.
    pub fn complete_task<R: Rng>(
        &mut self,
        rng: &mut R,
        id: &str,
        now: DateTime<Utc>,
    ) -> Option<ShameMessage> {
        let task = self.tasks.complete(id, now)?;
        self.events.push(Event::TaskCompleted {
            task_id: task.id.clone(),
            title: task.title.clone(),
            at: now,
        });
        Some(message::generate_positive_message(
            rng,
            Some(&task.title),
            now,
        ))
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.all()
    }

    pub fn activities(&self) -> &[Activity] {
        self.activities.all()
    }

    // ----- evaluation -----

    /// Run one evaluation tick: refresh overdue statuses, compute the score,
    /// advance the countdown machine, and render the matching message.
    pub fn evaluate<R: Rng>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Evaluation {
        self.tasks.refresh_overdue(now);

        let today = self.activities.today(now);
        let tasks = self.tasks.all();
        let switches = self.switches.count(now);

        let snapshot = self.score.calculate(&today, &tasks, switches, now);
        self.events.push(Event::ScoreCalculated {
            score: snapshot.score,
            level: snapshot.level,
            trend: snapshot.trend,
            at: now,
        });

        // The countdown only runs when the nuclear notification has a
        // configured channel and recipient; an empty threat stays silent.
        let (decision, warning) = if self.config.delivery.nuclear_configured() {
            let was_active = self.countdown.is_active();
            let decision = self
                .countdown
                .evaluate(&self.config.escalation, snapshot.score, now);
            if !was_active && self.countdown.is_active() {
                self.events.push(Event::CountdownStarted {
                    minutes: self.config.escalation.countdown_minutes,
                    at: now,
                });
            }

            let warning = if decision.should_warn {
                let text = self.countdown.record_warning(now);
                self.events.push(Event::WarningIssued {
                    warning_number: self.countdown.warnings_sent(),
                    at: now,
                });
                Some(text)
            } else {
                None
            };
            (decision, warning)
        } else {
            (TriggerDecision::default(), None)
        };

        let message = message::generate_shame_message(
            rng,
            snapshot.score,
            snapshot.level,
            &tasks,
            &today,
            switches,
            now,
        );

        Evaluation {
            snapshot,
            message,
            decision,
            warning,
        }
    }

    /// Deliver the consequences of an evaluation through a notifier.
    ///
    /// A pending nuclear send is only acknowledged after the notifier reports
    /// success; on failure the countdown stays armed and the error is
    /// returned. Public-post levels post the shame embed. Lower levels are
    /// local-only and deliver nothing. An unconfigured notifier makes the
    /// whole call a no-op; a pending send is stood down rather than left
    /// erroring on every tick.
    pub fn escalate(
        &mut self,
        notifier: &dyn Notifier,
        evaluation: &Evaluation,
        now: DateTime<Utc>,
    ) -> Result<(), DeliveryError> {
        if !notifier.is_configured() {
            if evaluation.decision.should_send {
                self.countdown.cancel();
                self.events.push(Event::CountdownCancelled { at: now });
            }
            return Ok(());
        }

        if evaluation.decision.should_send {
            let report = self.report(ReportPeriod::Daily, now);
            let result =
                notifier.post_nuclear(&evaluation.snapshot, &report, &self.config.user.name);
            return match result {
                Ok(()) => {
                    self.countdown.acknowledge_sent(now);
                    self.events.push(Event::NuclearFired {
                        score: evaluation.snapshot.score,
                        at: now,
                    });
                    Ok(())
                }
                Err(e) => {
                    self.events.push(Event::DeliveryFailed {
                        channel: notifier.channel().to_string(),
                        reason: e.to_string(),
                        at: now,
                    });
                    Err(e)
                }
            };
        }

        match evaluation.message.action {
            EscalationAction::PublicPost => {
                let result = notifier.post_shame(
                    &evaluation.message,
                    &evaluation.snapshot,
                    &self.config.user.name,
                );
                match result {
                    Ok(()) => {
                        self.events.push(Event::ShameDelivered {
                            level: evaluation.message.level,
                            channel: notifier.channel().to_string(),
                            at: now,
                        });
                        Ok(())
                    }
                    Err(e) => {
                        self.events.push(Event::DeliveryFailed {
                            channel: notifier.channel().to_string(),
                            reason: e.to_string(),
                            at: now,
                        });
                        Err(e)
                    }
                }
            }
            _ => Ok(()),
        }
    }

    /// Manually cancel an armed countdown.
    pub fn cancel_countdown(&mut self, now: DateTime<Utc>) -> String {
        let text = self.countdown.cancel();
        self.events.push(Event::CountdownCancelled { at: now });
        text
    }

    pub fn countdown_status(&self, now: DateTime<Utc>) -> CountdownStatus {
        self.countdown.status(&self.config.escalation, now)
    }

    /// Reset all shaming state, leaving a zero-score mark in history.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.score.reset(now);
        self.countdown.cancel();
        self.events.push(Event::EngineReset { at: now });
    }

    // ----- disable guard -----

    pub fn guard_state(&self, now: DateTime<Utc>) -> GuardState {
        self.guard
            .state(&self.config.schedule, &self.tasks.all(), now)
    }

    pub fn attempt_disable(&mut self, reason: Option<String>, now: DateTime<Utc>) -> DisableVerdict {
        let tasks = self.tasks.all();
        let verdict = self
            .guard
            .attempt_disable(&self.config.schedule, &tasks, reason, now);
        let state = self.guard.state(&self.config.schedule, &tasks, now);
        self.events.push(Event::DisableAttempted {
            allowed: verdict.allowed,
            recent_attempts: state.recent_attempts,
            at: now,
        });
        verdict
    }

    pub fn check_auto_re_enable(&self, now: DateTime<Utc>) -> ReEnableAdvice {
        self.guard.check_auto_re_enable(&self.config.schedule, now)
    }

    // ----- reporting -----

    pub fn report(&self, period: ReportPeriod, now: DateTime<Utc>) -> ProductivityReport {
        let today = self.activities.today(now);
        let scores: Vec<_> = self.score.history().copied().collect();
        generate_report(&today, &self.tasks.all(), &scores, period, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::ShameLevel;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn engine() -> ShameEngine {
        ShameEngine::new(EngineConfig::default())
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_evaluate_emits_score_event() {
        let now = Utc::now();
        let mut engine = engine();
        let mut r = rng();
        let eval = engine.evaluate(&mut r, now);
        assert_eq!(eval.snapshot.score, 18);
        assert_eq!(eval.message.level, ShameLevel::GentleNudge);
        assert!(matches!(
            engine.events().last(),
            Some(Event::ScoreCalculated { score: 18, .. })
        ));
    }

    #[test]
    fn test_logged_activity_feeds_score() {
        let now = Utc::now();
        let mut engine = engine();
        let mut r = rng();
        engine.log_activity(
            "YouTube",
            120,
            Some("https://youtube.com/feed".into()),
            None,
            now,
        );
        let eval = engine.evaluate(&mut r, now);
        assert_eq!(eval.snapshot.score, 35);
        assert_eq!(eval.message.level, ShameLevel::PassiveAggressive);
    }

    #[test]
    fn test_complete_task_emits_event_and_positive_message() {
        let now = Utc::now();
        let mut engine = engine();
        let mut r = rng();
        let task = engine.add_task("write tests", TaskPriority::Medium, None, now);
        let msg = engine.complete_task(&mut r, &task.id, now).unwrap();
        assert!(msg.message.contains("(write tests)"));
        assert!(matches!(
            engine.events().last(),
            Some(Event::TaskCompleted { .. })
        ));
        assert!(engine.complete_task(&mut r, "missing", now).is_none());
    }

    #[test]
    fn test_reset_appends_zero_history_entry() {
        let now = Utc::now();
        let mut engine = engine();
        engine.reset(now);
        let report = engine.report(ReportPeriod::Daily, now);
        assert_eq!(report.best_score, 0);
        assert!(matches!(
            engine.events().last(),
            Some(Event::EngineReset { .. })
        ));
    }

    #[test]
    fn test_drain_events_empties_log() {
        let now = Utc::now();
        let mut engine = engine();
        engine.reset(now);
        assert_eq!(engine.drain_events().len(), 1);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_cancel_countdown_records_event() {
        let now = Utc::now();
        let mut engine = engine();
        let text = engine.cancel_countdown(now);
        assert!(text.contains("CANCELLED"));
        assert!(matches!(
            engine.events().last(),
            Some(Event::CountdownCancelled { .. })
        ));
    }

    #[test]
    fn test_disable_attempt_is_logged_as_event() {
        // Saturday, outside default work hours.
        let now = chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 6, 14, 11, 0, 0).unwrap();
        let mut engine = engine();
        let verdict = engine.attempt_disable(Some("break".into()), now);
        assert!(verdict.allowed);
        assert!(matches!(
            engine.events().last(),
            Some(Event::DisableAttempted { allowed: true, .. })
        ));
    }

    #[test]
    fn test_switch_tracker_integration() {
        let now = Utc::now();
        let mut engine = engine();
        let mut r = rng();
        for i in 0..12i64 {
            engine.log_activity(format!("ctx-{i}"), 0, None, None, now + Duration::seconds(i));
        }
        // 11 switches lands in the 50-point penalty band.
        let eval = engine.evaluate(&mut r, now + Duration::seconds(20));
        assert_eq!(eval.snapshot.breakdown.context_switch_penalty, 50.0);
    }
}
