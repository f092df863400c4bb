//! Duration formatting helpers shared by summaries and messages.

/// Format minutes as a plain human-readable duration.
pub fn format_duration(minutes: u32) -> String {
    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 60 {
        let s = if minutes == 1 { "" } else { "s" };
        return format!("{minutes} minute{s}");
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        let s = if hours == 1 { "" } else { "s" };
        format!("{hours} hour{s}")
    } else {
        format!("{hours}h {mins}m")
    }
}

/// Format wasted minutes with editorial weight attached.
pub fn format_wasted_time(minutes: u32) -> String {
    if minutes < 5 {
        "a few minutes".to_string()
    } else if minutes < 30 {
        format!("{minutes} precious minutes")
    } else if minutes < 60 {
        "nearly an hour of your life".to_string()
    } else if minutes < 120 {
        format!("over an hour ({minutes} minutes!)")
    } else {
        format!("{}+ hours of your ONE life on this earth", minutes / 60)
    }
}
