use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

pub type ProjectId = u64;

/// Role of a user within a project's membership list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Member,
    Manager,
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Owner => "Owner",
            Role::Member => "Member",
            Role::Manager => "Manager",
            Role::Viewer => "Viewer",
        };
        f.write_str(s)
    }
}

/// A membership entry on a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

impl Member {
    pub fn new(id: u64, username: impl Into<String>, role: Role) -> Self {
        Member {
            id,
            username: username.into(),
            role,
        }
    }
}

/// A project with its members and the tasks it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub color: String,
    /// Username of the owning user
    pub owner: String,
    #[serde(default)]
    pub users: Vec<Member>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn is_owned_by(&self, user: &str) -> bool {
        self.owner == user
    }

    /// Whether `user` appears in the membership list (any role)
    pub fn has_member(&self, user: &str) -> bool {
        self.users.iter().any(|m| m.username == user)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_done()).count()
    }
}
