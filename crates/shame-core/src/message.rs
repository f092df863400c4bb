//! Shame message generation.
//!
//! Each escalation level owns a pool of templates; one is drawn at random and
//! its placeholders are filled from live activity and task context. Every
//! placeholder has a fallback so a template never renders with a hole in it.
//!
//! Randomness is injected so callers (and tests) control the source.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::format::{format_duration, format_wasted_time};
use crate::level::{EscalationAction, ShameLevel, Urgency};
use crate::task::Task;

const GENTLE_NUDGE: &[&str] = &[
    "Hey, just a friendly reminder about that deadline... 😊",
    "You've got this! Maybe time to focus?",
    "Psst... your task list is feeling a little lonely.",
    "Just a gentle tap on the shoulder - how's that task going?",
    "Remember that thing you said you'd do? Still waiting... no pressure though!",
    "Your future self would really appreciate some productivity right about now.",
    "Not to interrupt, but... you DID have plans to be productive, right?",
    "Quick check-in! How's the work going? (Please say it's going well.)",
];

const PASSIVE_AGGRESSIVE: &[&str] = &[
    "Interesting choice spending {time} on {activity} instead of the {task}...",
    "I'm sure that {activity} session was very educational. 🙄",
    "Oh, you're still on {activity}? I thought that was just a 'quick break.'",
    "No judgement, but {activity} doesn't seem to be on your task list. Just saying.",
    "Your task was due {due}. But sure, {activity} looks important too.",
    "I notice you've been 'researching' on {activity} for {time}. Must be a deep topic.",
    "Cool, cool, cool. Just casually watching your deadline approach while you're on {activity}.",
    "That's a bold strategy, Cotton. Let's see if {activity} instead of working pays off.",
];

const DIRECT_CALLOUT: &[&str] = &[
    "You're literally scrolling {activity} while your deadline is in {due}.",
    "At this rate, you'll finish that task sometime next quarter.",
    "Let me get this straight: {task} is due in {due}, and you're on {activity}? Really?",
    "I've been watching you procrastinate for {time}. It's... impressive, actually.",
    "Your task list is crying. I can hear it from here.",
    "BREAKING NEWS: Local developer discovers {activity} while deadline burns.",
    "Plot twist: the work isn't going to do itself. I checked.",
    "You've context-switched {switches} times in the last hour. That's not multitasking, that's panic.",
];

const AGGRESSIVE_SHAME: &[&str] = &[
    "STOP. Just stop. Close {activity}. Do the thing. NOW.",
    "Your future self is screaming. LISTEN TO THEM.",
    "You have {tasks} overdue tasks and you're on {activity}. What is wrong with you?!",
    "I'm not angry, I'm disappointed. Actually no, I'm angry too. GET TO WORK.",
    "The deadline was {due}. THE DEADLINE. WAS. {due}.",
    "Every second you spend on {activity} is a second your career dies a little.",
    "Your procrastination score is {score}. That's not a high score you want.",
    "If procrastination was an Olympic sport, you'd have the gold. But it's NOT. WORK.",
];

const NUCLEAR_OPTION: &[&str] = &[
    "☢️ NUCLEAR OPTION ACTIVATED. Preparing mom email in 5 minutes unless you START WORKING.",
    "☢️ I'm posting your procrastination stats to team chat. You have 60 seconds.",
    "☢️ DEFCON 1. Score: {score}/100. Mom email: ARMED. Public shame: IMMINENT.",
    "☢️ This is your FINAL warning. {task} is due in {due}. Mom gets an email in 5 min.",
    "☢️ I have composed a detailed email to your mother about your {time} on {activity}. Send in 5 min.",
    "☢️ YOUR PROCRASTINATION SCORE HIT {score}. The shame protocols have been activated.",
    "☢️ SHAME LEVEL: MAXIMUM. All channels will be notified. Your legacy of laziness ends NOW.",
    "☢️ I have screenshots. I have timestamps. I have your mom's email. Choose wisely.",
];

const POSITIVE: &[&str] = &[
    "🎉 Incredible! You completed a task! The legends were true - you CAN actually work!",
    "⭐ Look at you being all productive! Who IS this person?!",
    "🏆 Task done! Your procrastination score just dropped. Keep it up!",
    "🔥 Focus streak activated! You're on fire (the good kind)!",
    "💪 Another task crushed. Your future self just sent a thank you card.",
    "🌟 Wait, is that... PRODUCTIVITY?! I thought I'd never see the day!",
    "🎯 Direct hit on that task! Your score is actually going DOWN for once!",
    "🦸 The hero we didn't think we had. Task completed. Respect.",
    "✅ Task complete! See? That wasn't so hard. (Don't let it go to your head.)",
    "🎊 REDEMPTION ARC! From procrastinator to producer. Beautiful.",
];

const STREAK: &[&str] = &[
    "🔥 {minutes} minutes of focus! Don't you dare touch that phone.",
    "⚡ {minutes} minute focus streak! This is the longest I've seen you work!",
    "💎 {minutes} minutes! You're in the zone. I'll keep quiet... for now.",
    "🏄 Riding the productivity wave! {minutes} minutes and counting!",
    "🎵 {minutes} minutes of pure flow. *chef's kiss*",
];

const EXCUSES: &[&str] = &[
    "I was doing competitive research on how competitors procrastinate.",
    "The YouTube algorithm was showing me content that could be tangentially related to work.",
    "I was testing my ability to context-switch rapidly. It's a skill!",
    "Reddit's r/programming was practically a standup meeting.",
    "I was letting my subconscious solve the problem while I browsed Twitter.",
    "I was waiting for the code to compile. (There is no code to compile.)",
    "I was in a deep-work preparation phase. Very deep. Like, Mariana Trench deep.",
    "I was stress-testing my ability to work under extreme deadline pressure.",
    "The memes were too good. You can't blame me for algorithmic excellence.",
    "I was building mental models. On Reddit. About cats.",
    "My rubber duck told me to take a break. I don't question the duck.",
    "I was practicing mindful avoidance - it's a legitimate technique I just invented.",
];

fn templates_for(level: ShameLevel) -> &'static [&'static str] {
    match level {
        ShameLevel::GentleNudge => GENTLE_NUDGE,
        ShameLevel::PassiveAggressive => PASSIVE_AGGRESSIVE,
        ShameLevel::DirectCallout => DIRECT_CALLOUT,
        ShameLevel::AggressiveShame => AGGRESSIVE_SHAME,
        ShameLevel::NuclearOption => NUCLEAR_OPTION,
    }
}

fn choose<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

/// A fully rendered message ready for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShameMessage {
    pub level: ShameLevel,
    pub message: String,
    pub emoji: String,
    pub action: EscalationAction,
    pub urgency: Urgency,
    pub generated_at: DateTime<Utc>,
}

/// Generate a shame message for the given score and context.
pub fn generate_shame_message<R: Rng>(
    rng: &mut R,
    score: u8,
    level: ShameLevel,
    tasks: &[Task],
    activities: &[Activity],
    context_switches: u32,
    now: DateTime<Utc>,
) -> ShameMessage {
    let template = choose(rng, templates_for(level));
    let message = fill_template(template, score, tasks, activities, context_switches, now);
    ShameMessage {
        level,
        message,
        emoji: level.emoji().to_string(),
        action: level.action(),
        urgency: level.urgency(),
        generated_at: now,
    }
}

/// Positive reinforcement for a completed task. Always rendered at the lowest
/// level so it never triggers an escalation path.
pub fn generate_positive_message<R: Rng>(
    rng: &mut R,
    context: Option<&str>,
    now: DateTime<Utc>,
) -> ShameMessage {
    let base = choose(rng, POSITIVE);
    let message = match context {
        Some(ctx) => format!("{base} ({ctx})"),
        None => base.to_string(),
    };
    ShameMessage {
        level: ShameLevel::GentleNudge,
        message,
        emoji: "🎉".to_string(),
        action: EscalationAction::DashboardUpdate,
        urgency: Urgency::Low,
        generated_at: now,
    }
}

/// Celebrate an unbroken focus stretch.
pub fn generate_streak_message<R: Rng>(rng: &mut R, minutes: u32, now: DateTime<Utc>) -> ShameMessage {
    let message = choose(rng, STREAK).replace("{minutes}", &minutes.to_string());
    ShameMessage {
        level: ShameLevel::GentleNudge,
        message,
        emoji: "🔥".to_string(),
        action: EscalationAction::DashboardUpdate,
        urgency: Urgency::Low,
        generated_at: now,
    }
}

/// Narrative for a score that dropped since the previous reading.
pub fn generate_redemption_arc(previous_score: u8, current_score: u8, tasks_completed: usize) -> String {
    let drop = previous_score.saturating_sub(current_score);
    if drop >= 50 {
        format!(
            "🦸 EPIC REDEMPTION ARC: Score dropped {drop} points! From {previous_score} to {current_score}! {tasks_completed} tasks crushed! The comeback of the century!"
        )
    } else if drop >= 30 {
        format!(
            "⭐ REDEMPTION ARC: Score dropped {drop} points! Going from {previous_score} to {current_score}. {tasks_completed} tasks done. The prodigal worker returns!"
        )
    } else if drop >= 15 {
        format!(
            "📈 Mini redemption: Score improved by {drop} points. {tasks_completed} tasks completed. Baby steps, but we'll take it."
        )
    } else {
        format!("🌱 Small improvement detected. Score: {current_score}. Keep going, don't stop now!")
    }
}

/// A creative excuse, for humor surfaces only.
pub fn generate_creative_excuse<R: Rng>(rng: &mut R) -> String {
    choose(rng, EXCUSES).to_string()
}

/// Substitute every placeholder in a template from live context. Missing data
/// falls back to generic text so no placeholder survives rendering.
fn fill_template(
    template: &str,
    score: u8,
    tasks: &[Task],
    activities: &[Activity],
    context_switches: u32,
    now: DateTime<Utc>,
) -> String {
    let mut wasted: Vec<&Activity> = activities
        .iter()
        .filter(|a| a.category.is_wasted())
        .collect();
    wasted.sort_by(|a, b| b.duration_minutes.cmp(&a.duration_minutes));
    let top_waste = wasted.first().map(|a| a.title.as_str());
    let total_wasted: u32 = wasted.iter().map(|a| a.duration_minutes).sum();

    let mut overdue: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.is_done() && matches!(t.due_at, Some(due) if due < now))
        .collect();
    overdue.sort_by_key(|t| t.due_at);
    let urgent_task = overdue
        .first()
        .copied()
        .or_else(|| tasks.iter().find(|t| !t.is_done()));

    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.is_done() && matches!(t.due_at, Some(due) if due > now))
        .collect();
    upcoming.sort_by_key(|t| t.due_at);

    let due_text = due_text(upcoming.first().copied(), overdue.first().copied(), now);

    let pending = tasks.iter().filter(|t| !t.is_done()).count();
    let task_count = if overdue.is_empty() { pending } else { overdue.len() };

    template
        .replace("{activity}", top_waste.unwrap_or("the internet"))
        .replace(
            "{time}",
            &format_wasted_time(if total_wasted == 0 { 30 } else { total_wasted }),
        )
        .replace(
            "{task}",
            urgent_task.map(|t| t.title.as_str()).unwrap_or("your work"),
        )
        .replace("{due}", &due_text)
        .replace("{tasks}", &task_count.to_string())
        .replace("{score}", &score.to_string())
        .replace("{switches}", &context_switches.to_string())
        .replace("{duration}", &format_duration(total_wasted))
}

/// Relative due text: the nearest upcoming deadline wins, then the most
/// overdue one, then a generic "soon".
fn due_text(upcoming: Option<&Task>, overdue: Option<&Task>, now: DateTime<Utc>) -> String {
    if let Some(due) = upcoming.and_then(|t| t.due_at) {
        let hours = (due - now).num_seconds() as f64 / 3600.0;
        if hours < 1.0 {
            return format!("{} minutes", (hours * 60.0).round() as i64);
        } else if hours < 24.0 {
            return format!("{} hours", hours.round() as i64);
        }
        return format!("{} days", (hours / 24.0).round() as i64);
    }
    if let Some(due) = overdue.and_then(|t| t.due_at) {
        let hours_ago = (now - due).num_seconds() as f64 / 3600.0;
        return format!("{} hours AGO", hours_ago.round() as i64);
    }
    "soon".to_string()
}
