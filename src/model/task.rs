use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = u64;

/// Placeholder user id recorded on tasks created through the add-task form
pub const PLACEHOLDER_ASSIGNEE_ID: u64 = 999;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    /// The label shown in the UI and used on the wire
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    /// Accepts the display label or a CLI-friendly spelling (`todo`, `in-progress`, `done`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "to do" | "todo" | "to-do" => Ok(TaskStatus::ToDo),
            "in progress" | "in-progress" | "inprogress" | "active" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!(
                "unknown status '{}' (expected: todo, in-progress, done)",
                s
            )),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight, higher is more urgent
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!(
                "unknown priority '{}' (expected: low, medium, high)",
                s
            )),
        }
    }
}

/// The user a task is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub author: String,
    pub content: String,
    pub created_at: NaiveDate,
}

/// A task inside a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: NaiveDate,
    /// Display initial of the assignee
    pub assignee: String,
    #[serde(rename = "assigneeData")]
    pub assignee_data: Assignee,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Set when the task most recently entered `Done`, cleared when it leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDate>,
}

impl Task {
    /// Create a `To Do` task with no tags, comments, or completion date
    pub fn new(id: TaskId, title: String, due_date: NaiveDate, assignee: Assignee) -> Self {
        Task {
            id,
            title,
            description: String::new(),
            status: TaskStatus::ToDo,
            priority: Priority::default(),
            due_date,
            assignee: assignee_initial(&assignee.username),
            assignee_data: assignee,
            tags: Vec::new(),
            comments: Vec::new(),
            completed_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// First character of the trimmed name, uppercased; `"U"` when blank
pub fn assignee_initial(name: &str) -> String {
    match name.trim().chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => "U".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: TaskStatus = serde_json::from_str("\"To Do\"").unwrap();
        assert_eq!(parsed, TaskStatus::ToDo);
    }

    #[test]
    fn test_status_from_str_accepts_cli_spellings() {
        assert_eq!("todo".parse::<TaskStatus>(), Ok(TaskStatus::ToDo));
        assert_eq!("In Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("DONE".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_priority_rank_orders_high_first() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_assignee_initial() {
        assert_eq!(assignee_initial("bob"), "B");
        assert_eq!(assignee_initial("  alice"), "A");
        assert_eq!(assignee_initial(""), "U");
        assert_eq!(assignee_initial("   "), "U");
        assert_eq!(assignee_initial("élodie"), "É");
    }

    #[test]
    fn test_task_deserializes_without_optional_fields() {
        let json = r#"{
            "id": 7,
            "title": "API documentation",
            "status": "In Progress",
            "due_date": "2024-09-30",
            "assignee": "C",
            "assigneeData": { "id": 3, "username": "Charlie" }
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(task.comments.is_empty());
        assert_eq!(task.completed_at, None);
    }
}
