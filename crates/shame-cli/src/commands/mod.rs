pub mod activity;
pub mod config;
pub mod guard;
pub mod message;
pub mod score;

use shame_core::{Activity, Task};

/// Read a JSON fixture file containing an array of activities.
pub fn load_activities(path: &str) -> Result<Vec<Activity>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a JSON fixture file containing an array of tasks.
pub fn load_tasks(path: &str) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
