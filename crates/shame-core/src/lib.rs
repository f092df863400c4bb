//! # Shame Engine Core Library
//!
//! This library provides the core business logic for the Procrastination
//! Shame Engine. It implements a CLI-first philosophy where all operations
//! are available via a standalone CLI binary, with any dashboard being a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Score Engine**: A weighted six-factor calculator over observed
//!   activity, tracked tasks, and context switches
//! - **Countdown**: A wall-clock state machine for the nuclear escalation
//!   path; the caller invokes `evaluate()` with an explicit `now`
//! - **Disable Guard**: Attempt logging and abuse detection around turning
//!   the engine off
//! - **Delivery**: Webhook-based outbound posting of shame and reports
//!
//! ## Key Components
//!
//! - [`ShameEngine`]: Session facade over all subsystems
//! - [`ScoreEngine`]: Score calculation, history, and streak state
//! - [`NuclearCountdown`]: Escalation state machine
//! - [`EngineConfig`]: TOML configuration management
//! - [`Notifier`]: Trait for outbound delivery channels

pub mod activity;
pub mod category;
pub mod config;
pub mod countdown;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod events;
pub mod format;
pub mod guard;
pub mod level;
pub mod message;
pub mod report;
pub mod score;
pub mod task;

pub use activity::{Activity, ActivityLog, ActivitySource, SwitchTracker};
pub use category::{classify, ActivityCategory};
pub use config::{DeliveryConfig, EngineConfig, UserConfig};
pub use countdown::{CountdownStatus, EscalationPolicy, NuclearCountdown, TriggerDecision};
pub use delivery::{Notifier, WebhookNotifier};
pub use engine::{Evaluation, ShameEngine};
pub use error::{ConfigError, CoreError, DeliveryError, ValidationError};
pub use events::Event;
pub use guard::{DisableGuard, DisableVerdict, GuardState, WorkSchedule};
pub use level::{EscalationAction, ShameLevel, Urgency};
pub use message::{
    generate_creative_excuse, generate_positive_message, generate_redemption_arc,
    generate_shame_message, generate_streak_message, ShameMessage,
};
pub use report::{generate_report, ProductivityReport, ReportPeriod};
pub use score::{ScoreBreakdown, ScoreEngine, ScoreSnapshot, ScoreWeights, Trend};
pub use task::{Task, TaskPriority, TaskSource, TaskStatus, TaskStore};
