//! Webhook delivery -- post shame embeds to a Discord-compatible webhook.

use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::config::DeliveryConfig;
use crate::delivery::{progress_bar, Notifier};
use crate::error::DeliveryError;
use crate::format::format_duration;
use crate::level::ShameLevel;
use crate::message::ShameMessage;
use crate::report::ProductivityReport;
use crate::score::{ScoreSnapshot, Trend};

const CHANNEL: &str = "webhook";

/// Embed accent color per level.
fn level_color(level: ShameLevel) -> u32 {
    match level {
        ShameLevel::GentleNudge => 0x22c5_5e,
        ShameLevel::PassiveAggressive => 0xf59e_0b,
        ShameLevel::DirectCallout => 0xf973_16,
        ShameLevel::AggressiveShame => 0xef44_44,
        ShameLevel::NuclearOption => 0x7c3a_ed,
    }
}

fn score_color(score: f64) -> u32 {
    if score <= 20.0 {
        0x22c5_5e
    } else if score <= 40.0 {
        0x84cc_16
    } else if score <= 60.0 {
        0xf59e_0b
    } else if score <= 80.0 {
        0xef44_44
    } else {
        0x7c3a_ed
    }
}

fn trend_text(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => "📉 Improving",
        Trend::Worsening => "📈 Worsening",
        Trend::Stable => "➡️ Stable",
    }
}

/// Posts embeds to a configured webhook URL. An absent URL makes every post a
/// [`DeliveryError::NotConfigured`]; a malformed one a
/// [`DeliveryError::InvalidEndpoint`].
pub struct WebhookNotifier {
    webhook_url: Option<String>,
    nuclear_contact: Option<String>,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            nuclear_contact: None,
            client: Client::new(),
        }
    }

    /// Build from the delivery section of the engine config.
    pub fn from_config(delivery: &DeliveryConfig) -> Self {
        Self {
            webhook_url: delivery.webhook_url.clone(),
            nuclear_contact: delivery.nuclear_contact.clone(),
            client: Client::new(),
        }
    }

    fn url(&self) -> Result<&str, DeliveryError> {
        let raw = self
            .webhook_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| DeliveryError::NotConfigured {
                channel: CHANNEL.to_string(),
            })?;
        Url::parse(raw).map_err(|e| DeliveryError::InvalidEndpoint {
            channel: CHANNEL.to_string(),
            message: e.to_string(),
        })?;
        Ok(raw)
    }

    fn post_payload(&self, payload: &Value) -> Result<(), DeliveryError> {
        let url = self.url()?;
        let handle = tokio::runtime::Handle::current();
        let resp = handle
            .block_on(self.client.post(url).json(payload).send())
            .map_err(|e| DeliveryError::Transport {
                channel: CHANNEL.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = handle.block_on(resp.text()).unwrap_or_default();
            Err(DeliveryError::Rejected {
                channel: CHANNEL.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl Notifier for WebhookNotifier {
    fn channel(&self) -> &str {
        CHANNEL
    }

    fn is_configured(&self) -> bool {
        self.url().is_ok()
    }

    fn post_shame(
        &self,
        message: &ShameMessage,
        snapshot: &ScoreSnapshot,
        user_name: &str,
    ) -> Result<(), DeliveryError> {
        let mut fields = vec![
            json!({
                "name": "📊 Procrastination Score",
                "value": format!(
                    "**{}/100** {}",
                    snapshot.score,
                    progress_bar(snapshot.score as u32, 100, 15)
                ),
                "inline": true,
            }),
            json!({
                "name": "📈 Trend",
                "value": trend_text(snapshot.trend),
                "inline": true,
            }),
            json!({
                "name": "🔥 Shame Level",
                "value": message.level.name(),
                "inline": true,
            }),
        ];

        // The breakdown is only aired from level 3 upward.
        if message.level >= ShameLevel::DirectCallout {
            fields.push(json!({
                "name": "⏰ Time Wasted Ratio",
                "value": format!("{}%", snapshot.breakdown.time_wasted_ratio.round()),
                "inline": true,
            }));
            fields.push(json!({
                "name": "⚠️ Deadline Pressure",
                "value": format!("{}%", snapshot.breakdown.deadline_proximity.round()),
                "inline": true,
            }));
            fields.push(json!({
                "name": "📋 Task Completion",
                "value": format!("{}%", (100.0 - snapshot.breakdown.task_completion_ratio).round()),
                "inline": true,
            }));
        }

        let payload = json!({
            "username": "Shame Engine 🔔",
            "embeds": [{
                "title": format!("{} {} — {}", message.emoji, message.level.name(), user_name),
                "description": message.message,
                "color": level_color(message.level),
                "fields": fields,
                "footer": { "text": "Shame Engine — Your productivity, publicly judged." },
                "timestamp": message.generated_at.to_rfc3339(),
            }],
        });
        self.post_payload(&payload)
    }

    fn post_report(
        &self,
        report: &ProductivityReport,
        user_name: &str,
    ) -> Result<(), DeliveryError> {
        let top: String = report
            .top_procrastination
            .iter()
            .take(5)
            .enumerate()
            .map(|(i, e)| {
                format!(
                    "{}. **{}** — {} ({}x)",
                    i + 1,
                    e.activity,
                    format_duration(e.total_minutes),
                    e.occurrences
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let top = if top.is_empty() {
            "None (suspicious...)".to_string()
        } else {
            top
        };

        let payload = json!({
            "username": "Shame Engine 📋",
            "embeds": [{
                "title": format!("📋 Daily Procrastination Report — {user_name}"),
                "description": format!("Here's how {user_name} \"worked\" today:"),
                "color": score_color(report.average_score),
                "fields": [
                    { "name": "📊 Average Score", "value": format!("**{}/100**", report.average_score.round()), "inline": true },
                    { "name": "🏆 Best Score", "value": format!("{}/100", report.best_score), "inline": true },
                    { "name": "💀 Worst Score", "value": format!("{}/100", report.worst_score), "inline": true },
                    { "name": "✅ Tasks Completed", "value": report.tasks_completed.to_string(), "inline": true },
                    { "name": "⏰ Tasks Overdue", "value": report.tasks_overdue.to_string(), "inline": true },
                    { "name": "⏱️ Productive Time", "value": format_duration(report.minutes_productive), "inline": true },
                    { "name": "🗑️ Wasted Time", "value": format_duration(report.minutes_wasted), "inline": true },
                    { "name": "🏆 Top Procrastination Activities", "value": top, "inline": false },
                ],
                "footer": { "text": "Shame Engine — Tomorrow will be different. (It won't.)" },
                "timestamp": report.generated_at.to_rfc3339(),
            }],
        });
        self.post_payload(&payload)
    }

    fn post_nuclear(
        &self,
        snapshot: &ScoreSnapshot,
        report: &ProductivityReport,
        user_name: &str,
    ) -> Result<(), DeliveryError> {
        let top: String = report
            .top_procrastination
            .iter()
            .take(5)
            .map(|e| {
                format!(
                    "• **{}** — {} ({} times)",
                    e.activity,
                    format_duration(e.total_minutes),
                    e.occurrences
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut fields = vec![
            json!({ "name": "📊 Procrastination Score", "value": format!("**{}/100**", snapshot.score), "inline": true }),
            json!({ "name": "✅ Tasks Completed Today", "value": report.tasks_completed.to_string(), "inline": true }),
            json!({ "name": "⏰ Tasks Overdue", "value": report.tasks_overdue.to_string(), "inline": true }),
            json!({ "name": "⏱️ Time Productive", "value": format_duration(report.minutes_productive), "inline": true }),
            json!({ "name": "🗑️ Time Wasted", "value": format_duration(report.minutes_wasted), "inline": true }),
        ];
        if !top.is_empty() {
            fields.push(json!({
                "name": format!("🎯 What {user_name} Was Doing Instead of Working"),
                "value": top,
                "inline": false,
            }));
        }
        if let Some(contact) = self.nuclear_contact.as_deref().filter(|c| !c.is_empty()) {
            fields.push(json!({
                "name": "📬 A Copy Goes To",
                "value": contact,
                "inline": true,
            }));
        }

        let payload = json!({
            "username": "Shame Engine ☢️",
            "embeds": [{
                "title": format!("🚨 Urgent: {user_name}'s Productivity Report"),
                "description": format!(
                    "We regret to inform you that {user_name}'s procrastination has reached **critical levels**."
                ),
                "color": level_color(ShameLevel::NuclearOption),
                "fields": fields,
                "footer": {
                    "text": format!(
                        "Sent because {user_name}'s score stayed critical. They set this up willingly."
                    )
                },
                "timestamp": snapshot.calculated_at.to_rfc3339(),
            }],
        });
        self.post_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_notifier_reports_not_configured() {
        let notifier = WebhookNotifier::new(None);
        assert!(!notifier.is_configured());
        assert!(matches!(
            notifier.url(),
            Err(DeliveryError::NotConfigured { .. })
        ));
        // Empty string is treated the same as absent.
        let notifier = WebhookNotifier::new(Some(String::new()));
        assert!(!notifier.is_configured());
    }

    #[test]
    fn test_configured_notifier() {
        let notifier = WebhookNotifier::new(Some("https://example.com/hook".into()));
        assert!(notifier.is_configured());
        assert_eq!(notifier.channel(), "webhook");
    }

    #[test]
    fn test_malformed_endpoint_is_invalid() {
        let notifier = WebhookNotifier::new(Some("not a url".into()));
        assert!(matches!(
            notifier.url(),
            Err(DeliveryError::InvalidEndpoint { .. })
        ));
        assert!(!notifier.is_configured());
    }

    #[test]
    fn test_from_config_copies_endpoints() {
        let delivery = DeliveryConfig {
            webhook_url: Some("https://example.com/hook".into()),
            nuclear_contact: Some("mom@example.com".into()),
        };
        let notifier = WebhookNotifier::from_config(&delivery);
        assert!(notifier.is_configured());
        assert_eq!(notifier.nuclear_contact.as_deref(), Some("mom@example.com"));
    }

    #[test]
    fn test_level_colors_distinct() {
        let colors = [
            level_color(ShameLevel::GentleNudge),
            level_color(ShameLevel::PassiveAggressive),
            level_color(ShameLevel::DirectCallout),
            level_color(ShameLevel::AggressiveShame),
            level_color(ShameLevel::NuclearOption),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_score_color_bands() {
        assert_eq!(score_color(10.0), 0x22c5_5e);
        assert_eq!(score_color(35.0), 0x84cc_16);
        assert_eq!(score_color(55.0), 0xf59e_0b);
        assert_eq!(score_color(75.0), 0xef44_44);
        assert_eq!(score_color(95.0), 0x7c3a_ed);
    }
}
