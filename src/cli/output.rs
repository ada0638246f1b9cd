use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use crate::ops::progress::{
    ProgressColor, ProgressStatus, calculate_project_progress, get_progress_color,
    get_progress_status,
};
use crate::ops::stats::{DashboardSummary, ProjectOverview};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectSummaryJson<'a> {
    pub id: u64,
    pub name: &'a str,
    pub owner: &'a str,
    pub progress: u8,
    pub status: &'static str,
    pub color: ProgressColor,
    pub tasks: usize,
}

#[derive(Serialize)]
pub struct ProjectDetailJson<'a> {
    pub project: &'a Project,
    pub status: &'static str,
    pub color: ProgressColor,
    pub overview: ProjectOverview,
}

#[derive(Serialize)]
pub struct TaskWithProjectJson<'a> {
    pub project_id: u64,
    #[serde(flatten)]
    pub task: &'a Task,
}

#[derive(Serialize)]
pub struct StatsJson<'a> {
    pub user: &'a str,
    pub category: String,
    #[serde(flatten)]
    pub summary: &'a DashboardSummary,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn project_summary_json(project: &Project) -> ProjectSummaryJson<'_> {
    let progress = calculate_project_progress(Some(project));
    ProjectSummaryJson {
        id: project.id,
        name: &project.name,
        owner: &project.owner,
        progress,
        status: get_progress_status(progress).label(),
        color: get_progress_color(progress),
        tasks: project.tasks.len(),
    }
}

pub fn project_detail_json(project: &Project, overview: ProjectOverview) -> ProjectDetailJson<'_> {
    ProjectDetailJson {
        project,
        status: get_progress_status(overview.progress).label(),
        color: get_progress_color(overview.progress),
        overview,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Pad `s` with spaces to `width` terminal columns
pub fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Widest project name, for column alignment
pub fn name_width(projects: &[&Project]) -> usize {
    projects
        .iter()
        .map(|p| UnicodeWidthStr::width(p.name.as_str()))
        .max()
        .unwrap_or(0)
}

fn status_char(status: TaskStatus) -> char {
    match status {
        TaskStatus::ToDo => ' ',
        TaskStatus::InProgress => '>',
        TaskStatus::Done => 'x',
    }
}

fn progress_label(progress: u8) -> String {
    let status: ProgressStatus = get_progress_status(progress);
    format!("{}% {} [{}]", progress, status, get_progress_color(progress))
}

/// One project per line: id, name, progress, status band, owner
pub fn format_project_line(project: &Project, width: usize) -> String {
    let progress = calculate_project_progress(Some(project));
    format!(
        "#{:<4} {}  {:>3}%  {} [{}]  owner {}",
        project.id,
        pad(&project.name, width),
        progress,
        get_progress_status(progress),
        get_progress_color(progress),
        project.owner
    )
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    format!(
        "[{}] {} {} ({}, due {}, {})",
        status_char(task.status),
        task.id,
        task.title,
        task.priority,
        task.due_date,
        task.assignee
    )
}

/// Format detailed project view
pub fn format_project_detail(project: &Project, overview: &ProjectOverview) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("{} (#{})", project.name, project.id));
    if !project.description.is_empty() {
        lines.push(project.description.clone());
    }
    let due = project
        .due_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!(
        "owner: {}  created: {}  due: {}",
        project.owner, project.created_at, due
    ));
    lines.push(format!(
        "members: {}",
        project
            .users
            .iter()
            .map(|m| format!("{} ({})", m.username, m.role))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.push(format!("progress: {}", progress_label(overview.progress)));
    lines.push(format!(
        "tasks: {} total, {} done, {} in progress, {} to do",
        overview.tasks.total, overview.tasks.completed, overview.tasks.in_progress, overview.tasks.to_do
    ));
    lines.push(format!(
        "priority: {} high, {} medium, {} low",
        overview.priorities.high, overview.priorities.medium, overview.priorities.low
    ));
    lines.push(format!("overdue: {}", overview.overdue));
    lines.push(format!(
        "completed this week: {}",
        overview
            .completion_history
            .iter()
            .map(|d| format!("{}:{}", d.date.format("%m-%d"), d.completed))
            .collect::<Vec<_>>()
            .join(" ")
    ));

    if !project.tasks.is_empty() {
        lines.push(String::new());
        for task in &project.tasks {
            lines.push(format_task_line(task));
        }
    }
    lines
}

/// Format the dashboard summary
pub fn format_stats(user: &str, category: &str, summary: &DashboardSummary) -> Vec<String> {
    vec![
        format!("{} projects for {}", category, user),
        format!("  projects: {}", summary.active_projects),
        format!(
            "  tasks:    {} ({} done, {} in progress, {} to do)",
            summary.total_tasks,
            summary.tasks.completed,
            summary.tasks.in_progress,
            summary.tasks.to_do
        ),
        format!("  average:  {}", progress_label(summary.average_progress)),
    ]
}
