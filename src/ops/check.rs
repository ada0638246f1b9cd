use std::collections::HashMap;

use serde::Serialize;

use crate::model::project::{Project, Role};
use crate::model::session::Session;
use crate::model::task::TaskStatus;
use crate::store::Store;

/// Structured result from `tt check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A broken invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckError {
    /// Two or more projects share an id
    DuplicateProjectId { project_id: u64, count: usize },
    /// Two or more tasks share an id, possibly across projects
    DuplicateTaskId { task_id: u64, project_ids: Vec<u64> },
    /// `owner` does not appear in `users`
    OwnerNotMember { project_id: u64, owner: String },
    /// `owner` appears in `users` but not as Owner
    OwnerWrongRole { project_id: u64, owner: String, role: Role },
    /// More than one `users` entry has role Owner
    MultipleOwners { project_id: u64, usernames: Vec<String> },
    /// The session points at a project that is not in the store
    DanglingSelection { project_id: u64 },
    /// Done task with no completion date
    MissingCompletedAt { project_id: u64, task_id: u64 },
    /// Completion date on a task that is not done
    UnexpectedCompletedAt { project_id: u64, task_id: u64 },
}

/// Something odd but harmless
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckWarning {
    EmptyProject { project_id: u64 },
    BlankAssignee { project_id: u64, task_id: u64 },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a store (and optionally the session pointing into it).
///
/// Read-only. Checks performed:
/// 1. Project ids and task ids are unique across the store
/// 2. Each `owner` is in `users` with role Owner, and is the only Owner
/// 3. `completed_at` is set exactly on Done tasks
/// 4. The session selection names a live project
pub fn check_store(store: &Store, session: Option<&Session>) -> CheckResult {
    let mut result = CheckResult::default();

    check_duplicate_ids(store.projects(), &mut result);
    for project in store.projects() {
        check_project(project, &mut result);
    }

    if let Some(selected) = session.and_then(|s| s.selected_project) {
        if !store.contains_project(selected) {
            result.errors.push(CheckError::DanglingSelection {
                project_id: selected,
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_duplicate_ids(projects: &[Project], result: &mut CheckResult) {
    let mut project_counts: HashMap<u64, usize> = HashMap::new();
    let mut task_homes: HashMap<u64, Vec<u64>> = HashMap::new();
    for project in projects {
        *project_counts.entry(project.id).or_default() += 1;
        for task in &project.tasks {
            task_homes.entry(task.id).or_default().push(project.id);
        }
    }

    let mut dup_projects: Vec<_> = project_counts.into_iter().filter(|(_, n)| *n > 1).collect();
    dup_projects.sort_unstable();
    for (project_id, count) in dup_projects {
        result
            .errors
            .push(CheckError::DuplicateProjectId { project_id, count });
    }

    let mut dup_tasks: Vec<_> = task_homes.into_iter().filter(|(_, p)| p.len() > 1).collect();
    dup_tasks.sort_unstable();
    for (task_id, project_ids) in dup_tasks {
        result
            .errors
            .push(CheckError::DuplicateTaskId { task_id, project_ids });
    }
}

fn check_project(project: &Project, result: &mut CheckResult) {
    let project_id = project.id;

    match project.users.iter().find(|m| m.username == project.owner) {
        None => result.errors.push(CheckError::OwnerNotMember {
            project_id,
            owner: project.owner.clone(),
        }),
        Some(m) if m.role != Role::Owner => result.errors.push(CheckError::OwnerWrongRole {
            project_id,
            owner: project.owner.clone(),
            role: m.role,
        }),
        Some(_) => {}
    }

    let owners: Vec<String> = project
        .users
        .iter()
        .filter(|m| m.role == Role::Owner)
        .map(|m| m.username.clone())
        .collect();
    if owners.len() > 1 {
        result.errors.push(CheckError::MultipleOwners {
            project_id,
            usernames: owners,
        });
    }

    if project.tasks.is_empty() {
        result
            .warnings
            .push(CheckWarning::EmptyProject { project_id });
    }

    for task in &project.tasks {
        let task_id = task.id;
        match (task.status, task.completed_at) {
            (TaskStatus::Done, None) => result
                .errors
                .push(CheckError::MissingCompletedAt { project_id, task_id }),
            (TaskStatus::ToDo | TaskStatus::InProgress, Some(_)) => result
                .errors
                .push(CheckError::UnexpectedCompletedAt { project_id, task_id }),
            _ => {}
        }
        if task.assignee.trim().is_empty() {
            result
                .warnings
                .push(CheckWarning::BlankAssignee { project_id, task_id });
        }
    }
}
