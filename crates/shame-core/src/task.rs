//! Tracked tasks and the in-memory task store.
//!
//! Tasks arrive from external producers or manual calls. A task's due
//! timestamp is authoritative for overdue derivation: `is_overdue` reports
//! true for a not-done task whose due date has passed even if the stored
//! status has not been refreshed yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Task priority, ordinal: 0 = critical .. 3 = low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Multiplier applied to deadline pressure for this priority.
    pub fn deadline_multiplier(self) -> f64 {
        match self {
            TaskPriority::Critical => 1.5,
            TaskPriority::High => 1.3,
            TaskPriority::Medium => 1.0,
            TaskPriority::Low => 0.7,
        }
    }

    /// Critical and high priority tasks gate the disable guard.
    pub fn is_blocking(self) -> bool {
        matches!(self, TaskPriority::Critical | TaskPriority::High)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Overdue,
    Abandoned,
}

/// Where a task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    Todoist,
    Notion,
    Linear,
    Jira,
    Manual,
}

/// A tracked task from any source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub source: TaskSource,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Not done and not abandoned.
    pub fn is_incomplete(&self) -> bool {
        !matches!(self.status, TaskStatus::Done | TaskStatus::Abandoned)
    }

    /// Overdue by stored status, or by a due date that has already passed
    /// for a not-done task.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.status == TaskStatus::Overdue {
            return true;
        }
        if self.is_done() {
            return false;
        }
        matches!(self.due_at, Some(due) if due < now)
    }
}

/// In-memory task store aggregated from all sources, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: HashMap<String, Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a manually tracked task.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        priority: TaskPriority,
        due_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Task {
        let task = Task {
            id: format!("manual-{}", Uuid::new_v4()),
            title: title.into(),
            source: TaskSource::Manual,
            priority,
            status: TaskStatus::Todo,
            due_at,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        };
        self.tasks.insert(task.id.clone(), task.clone());
        task
    }

    /// Mark a task done. Returns the updated task, or `None` for an unknown id.
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Option<Task> {
        let task = self.tasks.get_mut(id)?;
        task.status = TaskStatus::Done;
        task.updated_at = now;
        Some(task.clone())
    }

    /// Merge tasks fetched from an external producer, replacing same-id entries.
    pub fn upsert(&mut self, tasks: Vec<Task>) {
        for task in tasks {
            self.tasks.insert(task.id.clone(), task);
        }
    }

    /// Rewrite stored statuses to `Overdue` where the due date has passed.
    /// Derivation via [`Task::is_overdue`] does not require this; it keeps the
    /// stored view consistent for display.
    pub fn refresh_overdue(&mut self, now: DateTime<Utc>) {
        for task in self.tasks.values_mut() {
            if task.is_incomplete() && task.status != TaskStatus::Overdue {
                if let Some(due) = task.due_at {
                    if due < now {
                        task.status = TaskStatus::Overdue;
                        task.updated_at = now;
                    }
                }
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn all(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
