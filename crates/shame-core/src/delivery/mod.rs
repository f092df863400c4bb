//! Outbound delivery of shame.
//!
//! A [`Notifier`] posts rendered messages to an external channel. Delivery is
//! strictly fire-and-report: implementations never mutate engine state, so a
//! failed post can be retried on the next tick without losing anything.

mod webhook;

pub use webhook::WebhookNotifier;

use crate::error::DeliveryError;
use crate::message::ShameMessage;
use crate::report::ProductivityReport;
use crate::score::ScoreSnapshot;

/// An outbound channel for shame content.
pub trait Notifier {
    /// Stable channel identifier, e.g. `"webhook"`.
    fn channel(&self) -> &str;

    /// Whether the channel has an endpoint to deliver to.
    fn is_configured(&self) -> bool;

    /// Post a shame message with its score context.
    fn post_shame(
        &self,
        message: &ShameMessage,
        snapshot: &ScoreSnapshot,
        user_name: &str,
    ) -> Result<(), DeliveryError>;

    /// Post an aggregated productivity report.
    fn post_report(
        &self,
        report: &ProductivityReport,
        user_name: &str,
    ) -> Result<(), DeliveryError>;

    /// Fire the nuclear notification with full statistics attached.
    fn post_nuclear(
        &self,
        snapshot: &ScoreSnapshot,
        report: &ProductivityReport,
        user_name: &str,
    ) -> Result<(), DeliveryError>;
}

/// ASCII progress bar used in posted embeds.
pub(crate) fn progress_bar(value: u32, max: u32, length: usize) -> String {
    let filled = ((value as f64 / max as f64) * length as f64).round() as usize;
    let filled = filled.min(length);
    format!("{}{}", "█".repeat(filled), "░".repeat(length - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0, 100, 10), "░░░░░░░░░░");
        assert_eq!(progress_bar(100, 100, 10), "██████████");
        assert_eq!(progress_bar(50, 100, 10), "█████░░░░░");
        // Values above max saturate instead of overflowing the bar.
        assert_eq!(progress_bar(150, 100, 10), "██████████");
    }
}
