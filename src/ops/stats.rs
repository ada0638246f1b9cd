use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::project::Project;
use crate::model::task::{Priority, Task, TaskStatus};
use crate::ops::progress::{calculate_average_progress, calculate_project_progress};

/// Task counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub to_do: usize,
}

impl TaskStats {
    fn add(&mut self, task: &Task) {
        self.total += 1;
        match task.status {
            TaskStatus::Done => self.completed += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::ToDo => self.to_do += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityStats {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Completions recorded on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub completed: usize,
}

/// Everything the project overview screen shows about one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOverview {
    pub tasks: TaskStats,
    pub progress: u8,
    pub priorities: PriorityStats,
    /// Not done and due before today
    pub overdue: usize,
    /// The seven days ending today, oldest first
    pub completion_history: Vec<DayCount>,
}

/// Aggregate numbers for the visible projects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub active_projects: usize,
    pub total_tasks: usize,
    pub average_progress: u8,
    pub tasks: TaskStats,
}

pub fn project_task_stats(project: Option<&Project>) -> TaskStats {
    let mut stats = TaskStats::default();
    if let Some(project) = project {
        for task in &project.tasks {
            stats.add(task);
        }
    }
    stats
}

pub fn priority_stats(tasks: &[Task]) -> PriorityStats {
    let mut stats = PriorityStats::default();
    for task in tasks {
        match task.priority {
            Priority::High => stats.high += 1,
            Priority::Medium => stats.medium += 1,
            Priority::Low => stats.low += 1,
        }
    }
    stats
}

pub fn overdue_count(tasks: &[Task], today: NaiveDate) -> usize {
    tasks
        .iter()
        .filter(|t| !t.is_done() && t.due_date < today)
        .count()
}

/// Done tasks per day over the week ending `today`
pub fn completion_history(tasks: &[Task], today: NaiveDate) -> Vec<DayCount> {
    (0..7u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DayCount {
            date,
            completed: tasks
                .iter()
                .filter(|t| t.is_done() && t.completed_at == Some(date))
                .count(),
        })
        .collect()
}

pub fn project_overview(project: &Project, today: NaiveDate) -> ProjectOverview {
    ProjectOverview {
        tasks: project_task_stats(Some(project)),
        progress: calculate_project_progress(Some(project)),
        priorities: priority_stats(&project.tasks),
        overdue: overdue_count(&project.tasks, today),
        completion_history: completion_history(&project.tasks, today),
    }
}

pub fn dashboard_summary(projects: &[&Project]) -> DashboardSummary {
    let mut tasks = TaskStats::default();
    for task in projects.iter().flat_map(|p| p.tasks.iter()) {
        tasks.add(task);
    }
    DashboardSummary {
        active_projects: projects.len(),
        total_tasks: tasks.total,
        average_progress: calculate_average_progress(projects.iter().copied()),
        tasks,
    }
}
