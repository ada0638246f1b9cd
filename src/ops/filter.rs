use std::cmp::Ordering;

use crate::model::project::Project;
use crate::model::session::Category;
use crate::model::task::{Task, TaskStatus};

// ---------------------------------------------------------------------------
// Project visibility
// ---------------------------------------------------------------------------

/// Whether `user` sees `project` under `category`
pub fn is_visible(project: &Project, user: &str, category: Category) -> bool {
    match category {
        Category::Owned => project.is_owned_by(user),
        Category::Shared => !project.is_owned_by(user) && project.has_member(user),
        Category::All => project.is_owned_by(user) || project.has_member(user),
    }
}

/// The projects `user` sees under `category`, in store order.
///
/// `All` means every project the user owns or is a member of, not every
/// project in the store.
pub fn filter_projects<'a>(projects: &'a [Project], user: &str, category: Category) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| is_visible(p, user, category))
        .collect()
}

/// Every project the user can see
pub fn user_projects<'a>(projects: &'a [Project], user: &str) -> Vec<&'a Project> {
    filter_projects(projects, user, Category::All)
}

/// Newest `created_at` first; ties keep their original order
pub fn sort_projects_by_recency<'a>(projects: &[&'a Project]) -> Vec<&'a Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

// ---------------------------------------------------------------------------
// Task views
// ---------------------------------------------------------------------------

/// Flatten the tasks of `projects` in project order
pub fn all_tasks<'a>(projects: &[&'a Project]) -> Vec<&'a Task> {
    projects.iter().flat_map(|p| p.tasks.iter()).collect()
}

/// The first `limit` tasks across `projects`
pub fn recent_tasks<'a>(projects: &[&'a Project], limit: usize) -> Vec<&'a Task> {
    let mut tasks = all_tasks(projects);
    tasks.truncate(limit);
    tasks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    Title,
    /// High before Medium before Low
    Priority,
    /// Earliest due date first
    #[default]
    DueDate,
    /// By status label
    Status,
}

impl std::str::FromStr for TaskSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(TaskSort::Title),
            "priority" => Ok(TaskSort::Priority),
            "due" | "due-date" => Ok(TaskSort::DueDate),
            "status" => Ok(TaskSort::Status),
            _ => Err(format!(
                "unknown sort '{}' (expected: title, priority, due, status)",
                s
            )),
        }
    }
}

/// Task list filter: optional status, optional title substring, sort key
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
    pub sort: TaskSort,
}

impl TaskQuery {
    fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                task.title.to_lowercase().contains(&term.to_lowercase())
            }
            _ => true,
        }
    }
}

fn compare_tasks(a: &Task, b: &Task, sort: TaskSort) -> Ordering {
    match sort {
        TaskSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        TaskSort::Priority => b.priority.rank().cmp(&a.priority.rank()),
        TaskSort::DueDate => a.due_date.cmp(&b.due_date),
        TaskSort::Status => a.status.label().cmp(b.status.label()),
    }
}

/// Apply `query` to `tasks`. The sort is stable.
pub fn filter_tasks<'a>(tasks: &[&'a Task], query: &TaskQuery) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.iter().copied().filter(|t| query.matches(t)).collect();
    out.sort_by(|a, b| compare_tasks(a, b, query.sort));
    out
}
