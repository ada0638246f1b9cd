use std::fmt;

use serde::Serialize;

use crate::model::project::Project;

/// Colour band for a progress percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressColor {
    SuccessStrong,
    SuccessLight,
    Warning,
    WarningStrong,
    Danger,
}

impl ProgressColor {
    pub fn token(self) -> &'static str {
        match self {
            ProgressColor::SuccessStrong => "success-strong",
            ProgressColor::SuccessLight => "success-light",
            ProgressColor::Warning => "warning",
            ProgressColor::WarningStrong => "warning-strong",
            ProgressColor::Danger => "danger",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ProgressColor::SuccessStrong => "#4caf50",
            ProgressColor::SuccessLight => "#8bc34a",
            ProgressColor::Warning => "#ff9800",
            ProgressColor::WarningStrong => "#ff5722",
            ProgressColor::Danger => "#f44336",
        }
    }
}

impl fmt::Display for ProgressColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Human label for a progress percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressStatus {
    Completed,
    NearCompletion,
    OnTrack,
    InProgress,
    GettingStarted,
    JustStarted,
}

impl ProgressStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProgressStatus::Completed => "Completed",
            ProgressStatus::NearCompletion => "Near Completion",
            ProgressStatus::OnTrack => "On Track",
            ProgressStatus::InProgress => "In Progress",
            ProgressStatus::GettingStarted => "Getting Started",
            ProgressStatus::JustStarted => "Just Started",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// `round(numerator / denominator)` with halves rounding up. `denominator` must be non-zero.
fn round_half_up(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Percentage of the project's tasks that are done, 0 for no project or no tasks
pub fn calculate_project_progress(project: Option<&Project>) -> u8 {
    let Some(project) = project else {
        return 0;
    };
    let total = project.tasks.len() as u64;
    if total == 0 {
        return 0;
    }
    let done = project.done_count() as u64;
    // done <= total, so the result is at most 100
    round_half_up(100 * done, total) as u8
}

/// Mean progress across `projects`, rounded; 0 for an empty list
pub fn calculate_average_progress<'a, I>(projects: I) -> u8
where
    I: IntoIterator<Item = &'a Project>,
{
    let (sum, count) = projects
        .into_iter()
        .map(|p| u64::from(calculate_project_progress(Some(p))))
        .fold((0u64, 0u64), |(s, n), p| (s + p, n + 1));
    if count == 0 {
        return 0;
    }
    round_half_up(sum, count) as u8
}

pub fn get_progress_color(progress: u8) -> ProgressColor {
    match progress {
        80.. => ProgressColor::SuccessStrong,
        60.. => ProgressColor::SuccessLight,
        40.. => ProgressColor::Warning,
        20.. => ProgressColor::WarningStrong,
        _ => ProgressColor::Danger,
    }
}

pub fn get_progress_status(progress: u8) -> ProgressStatus {
    // 100 must be matched before the 80+ band
    match progress {
        100 => ProgressStatus::Completed,
        80.. => ProgressStatus::NearCompletion,
        60.. => ProgressStatus::OnTrack,
        40.. => ProgressStatus::InProgress,
        20.. => ProgressStatus::GettingStarted,
        _ => ProgressStatus::JustStarted,
    }
}

/// Stable sort by computed progress
pub fn sort_projects_by_progress<'a>(projects: &[&'a Project], order: SortOrder) -> Vec<&'a Project> {
    let mut keyed: Vec<(u8, &Project)> = projects
        .iter()
        .map(|p| (calculate_project_progress(Some(p)), *p))
        .collect();
    match order {
        SortOrder::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortOrder::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Projects whose progress lies in `min..=max`, order preserved
pub fn filter_projects_by_progress<'a>(projects: &[&'a Project], min: u8, max: u8) -> Vec<&'a Project> {
    projects
        .iter()
        .copied()
        .filter(|p| {
            let progress = calculate_project_progress(Some(p));
            progress >= min && progress <= max
        })
        .collect()
}
