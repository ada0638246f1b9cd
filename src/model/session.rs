use std::fmt;

use serde::{Deserialize, Serialize};

use super::project::ProjectId;

/// View scope applied to the project collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    #[default]
    All,
    Owned,
    Shared,
}

impl Category {
    /// Parse a category name. Unrecognized values fall back to `All`.
    pub fn parse(s: &str) -> Category {
        match s.trim().to_ascii_lowercase().as_str() {
            "owned" => Category::Owned,
            "shared" => Category::Shared,
            _ => Category::All,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::parse(&s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::All => "All",
            Category::Owned => "Owned",
            Category::Shared => "Shared",
        };
        f.write_str(s)
    }
}

/// Per-session state: who is looking, and at what
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub current_user: String,
    pub authenticated: bool,
    pub category: Category,
    /// Must name a live project or be `None`
    pub selected_project: Option<ProjectId>,
}

impl Session {
    pub fn new(current_user: impl Into<String>) -> Self {
        Session {
            current_user: current_user.into(),
            ..Default::default()
        }
    }
}
