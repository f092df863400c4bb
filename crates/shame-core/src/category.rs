//! Activity categorization.
//!
//! Maps a free-text activity descriptor (title, URL, or application name) to
//! one of four productivity categories using ordered rule groups. The first
//! matching group wins, so order encodes precedence: blatant procrastination
//! is checked before productive patterns, which means "youtube.com/watch?v=rust"
//! still counts as procrastination.

use serde::{Deserialize, Serialize};

/// Productivity category assigned to an activity at classification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Productive,
    ProductiveAdjacent,
    Questionable,
    BlatantProcrastination,
}

/// Well-known productive domains and services.
const PRODUCTIVE_PATTERNS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "stackoverflow.com",
    "docs.google.com",
    "notion.so",
    "linear.app",
    "jira",
    "confluence",
    "figma.com",
    "vercel.com",
    "netlify.com",
    "aws.amazon.com",
    "console.cloud.google",
    "portal.azure.com",
    "localhost",
    "127.0.0.1",
    "slack.com",
    "teams.microsoft.com",
];

/// Productive desktop applications.
const PRODUCTIVE_APPS: &[&str] = &[
    "vscode",
    "vs code",
    "visual studio",
    "intellij",
    "webstorm",
    "pycharm",
    "terminal",
    "iterm",
    "warp",
    "kitty",
    "sublime text",
    "vim",
    "neovim",
    "docker",
    "postman",
    "insomnia",
    "xcode",
    "android studio",
];

/// Could be productive, probably not.
const QUESTIONABLE_PATTERNS: &[&str] = &[
    "reddit.com",
    "twitter.com",
    "x.com",
    "news.ycombinator.com",
    "medium.com",
    "dev.to",
    "hashnode",
    "quora.com",
    "linkedin.com",
    "discord.com",
    "producthunt.com",
];

/// Learning and reference material.
const PRODUCTIVE_ADJACENT_PATTERNS: &[&str] = &[
    "udemy.com",
    "coursera.org",
    "pluralsight.com",
    "egghead.io",
    "frontendmasters.com",
    "freecodecamp.org",
    "mdn",
    "developer.mozilla",
    "w3schools.com",
    "arxiv.org",
    "wikipedia.org",
    "docs.",
    "documentation",
    "tutorial",
    "learn",
];

/// Blatant procrastination sites.
const PROCRASTINATION_PATTERNS: &[&str] = &[
    "youtube.com",
    "netflix.com",
    "twitch.tv",
    "tiktok.com",
    "instagram.com",
    "facebook.com",
    "ebay.com",
    "etsy.com",
    "pinterest.com",
    "9gag.com",
    "buzzfeed.com",
    "imgur.com",
    "tumblr.com",
    "spotify.com",
    "steam",
    "gaming",
    "miniclip",
    "coolmath",
    "wordle",
];

/// Blatant procrastination desktop applications.
const PROCRASTINATION_APPS: &[&str] = &[
    "spotify",
    "netflix",
    "youtube",
    "epic games",
    "minecraft",
    "photobooth",
];

fn matches_any(input: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| input.contains(p))
}

/// Categorize a URL, title, or application name.
///
/// Total and deterministic for any input, including the empty string. Rule
/// groups are evaluated in precedence order; unknown activity defaults to
/// [`ActivityCategory::Questionable`] -- absence of evidence is treated as
/// mildly suspect, not neutral.
pub fn classify(input: &str) -> ActivityCategory {
    let input = input.to_lowercase();

    // amazon.com is shopping unless it is the AWS console.
    let amazon_shopping = input.contains("amazon.com") && !input.contains("aws");

    if amazon_shopping
        || matches_any(&input, PROCRASTINATION_PATTERNS)
        || matches_any(&input, PROCRASTINATION_APPS)
    {
        return ActivityCategory::BlatantProcrastination;
    }

    if matches_any(&input, PRODUCTIVE_PATTERNS) || matches_any(&input, PRODUCTIVE_APPS) {
        return ActivityCategory::Productive;
    }

    if matches_any(&input, PRODUCTIVE_ADJACENT_PATTERNS) {
        return ActivityCategory::ProductiveAdjacent;
    }

    if matches_any(&input, QUESTIONABLE_PATTERNS) {
        return ActivityCategory::Questionable;
    }

    ActivityCategory::Questionable
}

impl ActivityCategory {
    /// Fraction of this category's duration that counts as wasted time
    /// (0.0 = fully productive, 1.0 = pure procrastination).
    pub fn waste_weight(self) -> f64 {
        match self {
            ActivityCategory::Productive => 0.0,
            ActivityCategory::ProductiveAdjacent => 0.2,
            ActivityCategory::Questionable => 0.6,
            ActivityCategory::BlatantProcrastination => 1.0,
        }
    }

    /// Categories that count toward "wasted" activity tallies.
    pub fn is_wasted(self) -> bool {
        matches!(
            self,
            ActivityCategory::Questionable | ActivityCategory::BlatantProcrastination
        )
    }

    /// Human-readable category name.
    pub fn name(self) -> &'static str {
        match self {
            ActivityCategory::Productive => "Productive",
            ActivityCategory::ProductiveAdjacent => "Productive Adjacent",
            ActivityCategory::Questionable => "Questionable",
            ActivityCategory::BlatantProcrastination => "Blatant Procrastination",
        }
    }

    /// Snarky one-line description for display surfaces.
    pub fn label(self) -> &'static str {
        match self {
            ActivityCategory::Productive => "Actually working (suspicious)",
            ActivityCategory::ProductiveAdjacent => "\"Research\" (sure, buddy)",
            ActivityCategory::Questionable => "Hmm, debatable...",
            ActivityCategory::BlatantProcrastination => "Caught red-handed!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_procrastination_wins_over_productive() {
        // Both youtube.com and github.com substrings present; procrastination
        // rules are checked first.
        assert_eq!(
            classify("https://youtube.com/watch?v=github.com-tutorial"),
            ActivityCategory::BlatantProcrastination
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("YouTube.COM"), ActivityCategory::BlatantProcrastination);
        assert_eq!(classify("GitHub.Com/rust-lang"), ActivityCategory::Productive);
    }

    #[test]
    fn test_productive_apps() {
        assert_eq!(classify("VSCode"), ActivityCategory::Productive);
        assert_eq!(classify("iTerm"), ActivityCategory::Productive);
    }

    #[test]
    fn test_productive_adjacent() {
        assert_eq!(classify("arxiv.org/abs/1234"), ActivityCategory::ProductiveAdjacent);
        assert_eq!(classify("rust tutorial"), ActivityCategory::ProductiveAdjacent);
    }

    #[test]
    fn test_questionable() {
        assert_eq!(classify("reddit.com/r/rust"), ActivityCategory::Questionable);
        assert_eq!(classify("news.ycombinator.com"), ActivityCategory::Questionable);
    }

    #[test]
    fn test_unknown_defaults_to_questionable() {
        assert_eq!(classify(""), ActivityCategory::Questionable);
        assert_eq!(classify("some-unheard-of-app"), ActivityCategory::Questionable);
    }

    #[test]
    fn test_amazon_aws_exception() {
        assert_eq!(
            classify("aws.amazon.com/console"),
            ActivityCategory::Productive
        );
        assert_eq!(
            classify("amazon.com/gp/cart"),
            ActivityCategory::BlatantProcrastination
        );
    }

    #[test]
    fn test_waste_weights() {
        assert_eq!(ActivityCategory::Productive.waste_weight(), 0.0);
        assert_eq!(ActivityCategory::ProductiveAdjacent.waste_weight(), 0.2);
        assert_eq!(ActivityCategory::Questionable.waste_weight(), 0.6);
        assert_eq!(ActivityCategory::BlatantProcrastination.waste_weight(), 1.0);
    }

    proptest! {
        /// classify is total and idempotent: same input, same category, for
        /// arbitrary strings including adversarial mixed-case input.
        #[test]
        fn classify_is_total_and_deterministic(input in ".*") {
            let first = classify(&input);
            let second = classify(&input);
            prop_assert_eq!(first, second);
        }
    }
}
