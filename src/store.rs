use chrono::Utc;

use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskId};
use crate::ops::OpError;

/// In-memory collection of projects, each embedding its tasks.
///
/// `version` increases on every successful mutation so derived views can
/// tell when they are stale.
#[derive(Debug, Clone, Default)]
pub struct Store {
    projects: Vec<Project>,
    version: u64,
    last_id: u64,
}

impl Store {
    pub fn new(projects: Vec<Project>) -> Self {
        let last_id = projects.iter().map(max_id_in_project).max().unwrap_or(0);
        Store {
            projects,
            version: 0,
            last_id,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn contains_project(&self, id: ProjectId) -> bool {
        self.project(id).is_some()
    }

    /// Find a task by id in any project, along with the project that owns it
    pub fn find_task(&self, task_id: TaskId) -> Option<(&Project, &Task)> {
        self.projects
            .iter()
            .find_map(|p| p.task(task_id).map(|t| (p, t)))
    }

    /// Find the project owning `task_id`, mutable
    pub fn owning_project_mut(&mut self, task_id: TaskId) -> Option<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.tasks.iter().any(|t| t.id == task_id))
    }

    pub(crate) fn push_project(&mut self, project: Project) {
        self.reserve_id(max_id_in_project(&project));
        self.projects.push(project);
    }

    /// Replace the project with the same id. Returns false if none matched.
    pub(crate) fn replace_project(&mut self, project: Project) -> bool {
        let floor = max_id_in_project(&project);
        match self.project_mut(project.id) {
            Some(slot) => {
                *slot = project;
                self.reserve_id(floor);
                true
            }
            None => false,
        }
    }

    /// Record an id that entered the store from outside `next_id`, so it is
    /// never minted again.
    pub(crate) fn reserve_id(&mut self, id: u64) {
        self.last_id = self.last_id.max(id);
    }

    /// Record that the store changed
    pub fn mark_changed(&mut self) {
        self.version += 1;
    }

    /// Mint a fresh id from the current time in milliseconds.
    ///
    /// Ids are strictly increasing within a store, so two ids minted in the
    /// same millisecond (or against a clock that went backwards) still differ.
    /// Fails once `u64::MAX` has been handed out or reserved.
    pub fn next_id(&mut self) -> Result<u64, OpError> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let floor = self.last_id.checked_add(1).ok_or(OpError::IdsExhausted)?;
        let id = now.max(floor);
        self.last_id = id;
        Ok(id)
    }
}

/// Largest id carried by a task, its comments and its tags
pub(crate) fn max_id_in_task(task: &Task) -> u64 {
    std::iter::once(task.id)
        .chain(task.comments.iter().map(|c| c.id))
        .chain(task.tags.iter().map(|tag| tag.id))
        .max()
        .unwrap_or(0)
}

fn max_id_in_project(project: &Project) -> u64 {
    let members = project.users.iter().map(|m| m.id);
    let tasks = project.tasks.iter().map(max_id_in_task);
    std::iter::once(project.id)
        .chain(members)
        .chain(tasks)
        .max()
        .unwrap_or(0)
}
