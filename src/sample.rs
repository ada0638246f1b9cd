//! Built-in demo workspace: three projects shared between Alice, Bob and Charlie.

use chrono::NaiveDate;

use crate::model::project::{Member, Project, Role};
use crate::model::task::{Assignee, Comment, Priority, Tag, Task, TaskStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn user(id: u64, username: &str) -> Assignee {
    Assignee {
        id,
        username: username.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: u64,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: Priority,
    due: NaiveDate,
    assignee: Assignee,
    tag: (u64, &str),
) -> Task {
    let mut t = Task::new(id, title.to_string(), due, assignee);
    t.description = description.to_string();
    t.status = status;
    t.priority = priority;
    t.tags.push(Tag {
        id: tag.0,
        name: tag.1.to_string(),
    });
    // Seed data predates completion stamps; use the due date.
    if status == TaskStatus::Done {
        t.completed_at = Some(due);
    }
    t
}

/// The demo projects used when no snapshot file is supplied
pub fn sample_projects() -> Vec<Project> {
    let alice = || user(1, "Alice");
    let bob = || user(2, "Bob");
    let charlie = || user(3, "Charlie");

    let mut landing = task(
        1,
        "Design new landing page",
        "Create a modern design for homepage",
        TaskStatus::ToDo,
        Priority::High,
        date(2024, 10, 1),
        bob(),
        (1, "Design"),
    );
    landing.comments.push(Comment {
        id: 1,
        author: "Alice".into(),
        content: "Make sure to align with branding guidelines".into(),
        created_at: date(2024, 7, 14),
    });

    let mut setup = task(
        4,
        "Setup development environment",
        "Configure React Native project",
        TaskStatus::Done,
        Priority::High,
        date(2024, 7, 1),
        charlie(),
        (4, "Setup"),
    );
    setup.comments.push(Comment {
        id: 2,
        author: "Alice".into(),
        content: "Great job on the setup!".into(),
        created_at: date(2024, 6, 15),
    });
    setup.comments.push(Comment {
        id: 3,
        author: "Charlie".into(),
        content: "Thanks Alice!".into(),
        created_at: date(2024, 6, 16),
    });

    vec![
        Project {
            id: 1,
            name: "Website Redesign".into(),
            description: "Revamp the company website".into(),
            due_date: Some(date(2024, 12, 15)),
            created_at: date(2024, 7, 14),
            color: "#4caf50".into(),
            owner: "Alice".into(),
            users: vec![
                Member::new(1, "Alice", Role::Owner),
                Member::new(2, "Bob", Role::Member),
            ],
            tasks: vec![
                landing,
                task(
                    2,
                    "Write SEO content",
                    "Optimize text for search engines",
                    TaskStatus::InProgress,
                    Priority::Medium,
                    date(2024, 9, 15),
                    alice(),
                    (2, "Content"),
                ),
                task(
                    3,
                    "Test mobile responsiveness",
                    "Ensure website works on all devices",
                    TaskStatus::Done,
                    Priority::High,
                    date(2024, 8, 30),
                    bob(),
                    (3, "Testing"),
                ),
            ],
        },
        Project {
            id: 2,
            name: "Mobile App Development".into(),
            description: "Build iOS and Android apps".into(),
            due_date: Some(date(2024, 11, 30)),
            created_at: date(2024, 6, 1),
            color: "#2196f3".into(),
            owner: "Charlie".into(),
            users: vec![
                Member::new(3, "Charlie", Role::Owner),
                Member::new(1, "Alice", Role::Member),
            ],
            tasks: vec![
                setup,
                task(
                    5,
                    "Design app wireframes",
                    "Create UI/UX mockups",
                    TaskStatus::ToDo,
                    Priority::Medium,
                    date(2024, 9, 1),
                    alice(),
                    (1, "Design"),
                ),
            ],
        },
        Project {
            id: 3,
            name: "Backend API Refactor".into(),
            description: "Modernize backend architecture".into(),
            due_date: Some(date(2024, 10, 15)),
            created_at: date(2024, 8, 1),
            color: "#ff9800".into(),
            owner: "Bob".into(),
            users: vec![
                Member::new(2, "Bob", Role::Owner),
                Member::new(3, "Charlie", Role::Member),
            ],
            tasks: vec![
                task(
                    6,
                    "Database migration",
                    "Move to PostgreSQL",
                    TaskStatus::Done,
                    Priority::High,
                    date(2024, 8, 15),
                    bob(),
                    (5, "Database"),
                ),
                task(
                    7,
                    "API documentation",
                    "Update all endpoint docs",
                    TaskStatus::InProgress,
                    Priority::Low,
                    date(2024, 9, 30),
                    charlie(),
                    (6, "Documentation"),
                ),
            ],
        },
    ]
}
