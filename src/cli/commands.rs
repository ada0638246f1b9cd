use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tt", about = concat!("tasktrack v", env!("CARGO_PKG_VERSION"), " - projects, tasks and progress"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Load projects from a JSON snapshot instead of the built-in sample
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// Path to tracker.toml (default: ./tracker.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// View as this user instead of the configured default
    #[arg(short, long, global = true)]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List visible projects with their progress
    Projects(ProjectsArgs),
    /// Show one project's details and statistics
    Show(ShowArgs),
    /// List tasks of the visible projects
    Tasks(TasksArgs),
    /// Show dashboard statistics
    Stats(StatsArgs),
    /// Show the most recent tasks
    Recent(RecentArgs),
    /// Validate project invariants
    Check,
}

#[derive(Args)]
pub struct ProjectsArgs {
    /// Category: all, owned, shared (default from config)
    #[arg(long)]
    pub category: Option<String>,
    /// Sort: progress (high first), progress-asc, recent
    #[arg(long)]
    pub sort: Option<String>,
    /// Minimum progress (inclusive)
    #[arg(long, default_value = "0")]
    pub min: u8,
    /// Maximum progress (inclusive)
    #[arg(long, default_value = "100")]
    pub max: u8,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project ID to show
    pub id: u64,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Only tasks of this project
    #[arg(long)]
    pub project: Option<u64>,
    /// Filter by status (todo, in-progress, done)
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive title search
    #[arg(long)]
    pub search: Option<String>,
    /// Sort: title, priority, due, status
    #[arg(long, default_value = "due")]
    pub sort: String,
    /// Category: all, owned, shared (default from config)
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Category: all, owned, shared (default from config)
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct RecentArgs {
    /// Maximum number of tasks to show (default from config)
    #[arg(long)]
    pub limit: Option<usize>,
}
