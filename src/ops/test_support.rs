//! Fixtures shared by the ops unit tests.

use chrono::NaiveDate;

use crate::model::project::{Member, Project, Role};
use crate::model::task::{Assignee, Task, TaskStatus};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn task_with_status(id: u64, status: TaskStatus) -> Task {
    let mut t = Task::new(
        id,
        format!("Task {}", id),
        day(2024, 9, 1),
        Assignee {
            id: 1,
            username: "Alice".into(),
        },
    );
    t.status = status;
    if status == TaskStatus::Done {
        t.completed_at = Some(day(2024, 8, 1));
    }
    t
}

/// A project owned by `owner` with one task per status; task ids are `id * 100 + index`
pub fn project_with_statuses(id: u64, owner: &str, statuses: &[TaskStatus]) -> Project {
    Project {
        id,
        name: format!("Project {}", id),
        description: String::new(),
        due_date: None,
        created_at: day(2024, 1, 1),
        color: String::new(),
        owner: owner.to_string(),
        users: vec![Member::new(id * 1000, owner, Role::Owner)],
        tasks: statuses
            .iter()
            .enumerate()
            .map(|(i, s)| task_with_status(id * 100 + i as u64, *s))
            .collect(),
    }
}

/// Add `username` to the project's users with the given role
pub fn with_member(mut project: Project, username: &str, role: Role) -> Project {
    let id = project.id * 1000 + project.users.len() as u64;
    project.users.push(Member::new(id, username, role));
    project
}
