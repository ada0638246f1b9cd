use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::snapshot_io;
use crate::model::project::Project;
use crate::model::session::Category;
use crate::model::task::TaskStatus;
use crate::ops::check::{self, CheckError, CheckWarning};
use crate::ops::filter::{self, TaskQuery, TaskSort};
use crate::ops::progress::{self, SortOrder};
use crate::ops::stats;
use crate::sample::sample_projects;
use crate::tracker::Tracker;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let mut tracker = load_tracker(&cli)?;

    match cli.command {
        Commands::Projects(args) => cmd_projects(&mut tracker, args, json),
        Commands::Show(args) => cmd_show(&tracker, args, json),
        Commands::Tasks(args) => cmd_tasks(&mut tracker, args, json),
        Commands::Stats(args) => cmd_stats(&mut tracker, args, json),
        Commands::Recent(args) => cmd_recent(&tracker, args, json),
        Commands::Check => cmd_check(&tracker, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_tracker(cli: &Cli) -> Result<Tracker, Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    if cli.config.is_some() && !config_path.exists() {
        return Err(format!("config file not found: {}", config_path.display()).into());
    }
    let config = config_io::read_config(&config_path)?;

    let projects = match &cli.data {
        Some(path) => snapshot_io::read_snapshot(Path::new(path))?,
        None => sample_projects(),
    };
    debug!(projects = projects.len(), config = %config_path.display(), "loaded workspace");

    let mut tracker = Tracker::new(config, projects);
    if let Some(user) = &cli.user {
        tracker.set_user(user.as_str());
    }
    Ok(tracker)
}

fn apply_category(tracker: &mut Tracker, category: Option<&str>) {
    if let Some(c) = category {
        tracker.set_category(Category::parse(c));
    }
}

/// A project the current user may see. Others report as not found.
fn visible_project(tracker: &Tracker, id: u64) -> Result<&Project, String> {
    tracker
        .store()
        .project(id)
        .filter(|p| filter::is_visible(p, tracker.current_user(), Category::All))
        .ok_or_else(|| format!("project not found: {}", id))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_projects(
    tracker: &mut Tracker,
    args: ProjectsArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.min > args.max {
        return Err(format!("--min ({}) is greater than --max ({})", args.min, args.max).into());
    }
    apply_category(tracker, args.category.as_deref());

    let visible = tracker.filtered_projects();
    let visible = match args.sort.as_deref() {
        None => visible,
        Some("progress") => progress::sort_projects_by_progress(&visible, SortOrder::Desc),
        Some("progress-asc") => progress::sort_projects_by_progress(&visible, SortOrder::Asc),
        Some("recent") => filter::sort_projects_by_recency(&visible),
        Some(other) => {
            return Err(format!(
                "unknown sort '{}' (expected progress, progress-asc, recent)",
                other
            )
            .into());
        }
    };
    let shown = progress::filter_projects_by_progress(&visible, args.min, args.max);

    if json {
        let out: Vec<ProjectSummaryJson> = shown.iter().map(|p| project_summary_json(p)).collect();
        return print_json(&out);
    }

    if shown.is_empty() {
        println!("no projects");
        return Ok(());
    }
    let width = name_width(&shown);
    for project in &shown {
        println!("{}", format_project_line(project, width));
    }
    Ok(())
}

fn cmd_show(tracker: &Tracker, args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project = visible_project(tracker, args.id)?;
    let overview = stats::project_overview(project, Local::now().date_naive());

    if json {
        return print_json(&project_detail_json(project, overview));
    }
    for line in format_project_detail(project, &overview) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_tasks(tracker: &mut Tracker, args: TasksArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    apply_category(tracker, args.category.as_deref());

    let status = args
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;
    let sort: TaskSort = args.sort.parse()?;
    let query = TaskQuery {
        status,
        search: args.search,
        sort,
    };

    let projects: Vec<&Project> = match args.project {
        Some(id) => vec![visible_project(tracker, id)?],
        None => tracker.filtered_projects(),
    };
    let tasks = filter::filter_tasks(&filter::all_tasks(&projects), &query);

    if json {
        let out: Vec<TaskWithProjectJson> = tasks
            .iter()
            .filter_map(|t| {
                projects
                    .iter()
                    .find(|p| p.tasks.iter().any(|x| std::ptr::eq(x, *t)))
                    .map(|p| TaskWithProjectJson {
                        project_id: p.id,
                        task: t,
                    })
            })
            .collect();
        return print_json(&out);
    }

    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for task in tasks {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

fn cmd_stats(tracker: &mut Tracker, args: StatsArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    apply_category(tracker, args.category.as_deref());
    let user = tracker.current_user().to_string();
    let category = tracker.category().to_string();
    let summary = tracker.dashboard();

    if json {
        return print_json(&StatsJson {
            user: &user,
            category,
            summary,
        });
    }
    for line in format_stats(&user, &category, summary) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_recent(tracker: &Tracker, args: RecentArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = match args.limit {
        Some(limit) => filter::recent_tasks(&tracker.filtered_projects(), limit),
        None => tracker.recent_tasks(),
    };

    if json {
        return print_json(&tasks);
    }
    if tasks.is_empty() {
        println!("no recent tasks");
        return Ok(());
    }
    for task in tasks {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

fn cmd_check(tracker: &Tracker, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let result = check::check_store(tracker.store(), Some(tracker.session()));

    if json {
        print_json(&result)?;
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                println!("  {}", describe_error(err));
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                println!("  {}", describe_warning(warn));
            }
        }
        if result.valid {
            println!("✓ projects are valid");
        }
    }

    if result.valid {
        Ok(())
    } else {
        Err(format!("{} invariant violation(s) found", result.errors.len()).into())
    }
}

fn describe_error(err: &CheckError) -> String {
    match err {
        CheckError::DuplicateProjectId { project_id, count } => {
            format!("project id {} is used {} times", project_id, count)
        }
        CheckError::DuplicateTaskId {
            task_id,
            project_ids,
        } => {
            let ids: Vec<String> = project_ids.iter().map(|id| format!("#{}", id)).collect();
            format!("task id {} is duplicated in projects {}", task_id, ids.join(", "))
        }
        CheckError::OwnerNotMember { project_id, owner } => {
            format!("[#{}] owner {} is not a member", project_id, owner)
        }
        CheckError::OwnerWrongRole {
            project_id,
            owner,
            role,
        } => format!("[#{}] owner {} has role {}", project_id, owner, role),
        CheckError::MultipleOwners {
            project_id,
            usernames,
        } => format!("[#{}] multiple owners: {}", project_id, usernames.join(", ")),
        CheckError::DanglingSelection { project_id } => {
            format!("selected project #{} does not exist", project_id)
        }
        CheckError::MissingCompletedAt {
            project_id,
            task_id,
        } => format!("[#{}] task {} is done but has no completion date", project_id, task_id),
        CheckError::UnexpectedCompletedAt {
            project_id,
            task_id,
        } => format!("[#{}] task {} has a completion date but is not done", project_id, task_id),
    }
}

fn describe_warning(warn: &CheckWarning) -> String {
    match warn {
        CheckWarning::EmptyProject { project_id } => format!("[#{}] project has no tasks", project_id),
        CheckWarning::BlankAssignee {
            project_id,
            task_id,
        } => format!("[#{}] task {} has no assignee", project_id, task_id),
    }
}
