use serde::{Deserialize, Serialize};

use super::session::Category;
use super::task::Priority;

/// Configuration from tracker.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity used until someone logs in
    #[serde(default = "default_user")]
    pub default_user: String,
    #[serde(default)]
    pub default_category: Category,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            default_user: default_user(),
            default_category: Category::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Refuse to remove the Owner entry or add a second Owner
    #[serde(default)]
    pub protect_owner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default)]
    pub default_priority: Priority,
    /// Size of the "recent tasks" list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for TasksConfig {
    fn default() -> Self {
        TasksConfig {
            default_priority: Priority::Medium,
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_user() -> String {
    "Alice".to_string()
}

fn default_recent_limit() -> usize {
    3
}
