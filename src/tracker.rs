use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::auth::{IdentityProvider, validate_credentials};
use crate::model::config::TrackerConfig;
use crate::model::project::{Member, Project, ProjectId};
use crate::model::session::{Category, Session};
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::ops::filter;
use crate::ops::progress::calculate_project_progress;
use crate::ops::project_ops::{self, NewProject};
use crate::ops::stats::{self, DashboardSummary};
use crate::ops::task_ops::{self, NewTask, TaskUpdate};
use crate::ops::{OpError, OwnerPolicy};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewKey {
    version: u64,
    category: Category,
}

/// Owns the store and the session, and routes every mutation through the
/// ops layer with the current user, selection and date filled in.
#[derive(Debug)]
pub struct Tracker {
    store: Store,
    session: Session,
    config: TrackerConfig,
    dashboard_cache: Option<(ViewKey, String, DashboardSummary)>,
}

impl Tracker {
    pub fn new(config: TrackerConfig, projects: Vec<Project>) -> Self {
        let mut session = Session::new(config.session.default_user.clone());
        session.category = config.session.default_category;
        Tracker {
            store: Store::new(projects),
            session,
            config,
            dashboard_cache: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn owner_policy(&self) -> OwnerPolicy {
        OwnerPolicy::from_config(self.config.projects.protect_owner)
    }

    fn log_rejection<T>(op: &str, result: Result<T, OpError>) -> Result<T, OpError> {
        if let Err(e) = &result {
            warn!(op, error = %e, "mutation rejected");
        }
        result
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// Validate the form, ask the provider, and record the identity on success.
    /// Returns false on any failure; the reason is logged, never retried.
    pub fn login(&mut self, idp: &dyn IdentityProvider, email: &str, password: &str) -> bool {
        let result = validate_credentials(email, password).and_then(|()| idp.login(email, password));
        self.finish_auth("login", result)
    }

    pub fn create_account(&mut self, idp: &dyn IdentityProvider, email: &str, password: &str) -> bool {
        let result =
            validate_credentials(email, password).and_then(|()| idp.create_account(email, password));
        self.finish_auth("create_account", result)
    }

    fn finish_auth(&mut self, op: &str, result: Result<String, crate::auth::AuthError>) -> bool {
        match result {
            Ok(user) => {
                info!(op, user = %user, "authenticated");
                self.session.current_user = user;
                self.session.authenticated = true;
                true
            }
            Err(e) => {
                warn!(op, error = %e, "authentication failed");
                false
            }
        }
    }

    pub fn logout(&mut self) {
        info!(user = %self.session.current_user, "logged out");
        self.session.authenticated = false;
        self.session.selected_project = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated
    }

    pub fn current_user(&self) -> &str {
        &self.session.current_user
    }

    /// Switch identity without going through the provider
    pub fn set_user(&mut self, user: impl Into<String>) {
        self.session.current_user = user.into();
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn category(&self) -> Category {
        self.session.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.session.category = category;
    }

    /// Select a project. Unknown ids leave the selection unchanged.
    pub fn select_project(&mut self, id: ProjectId) -> Result<(), OpError> {
        if !self.store.contains_project(id) {
            return Self::log_rejection("select_project", Err(OpError::ProjectNotFound(id)));
        }
        self.session.selected_project = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.session.selected_project = None;
    }

    pub fn selected_project_id(&self) -> Option<ProjectId> {
        self.session.selected_project
    }

    /// The live selected project, looked up fresh from the store
    pub fn selected_project(&self) -> Option<&Project> {
        self.session
            .selected_project
            .and_then(|id| self.store.project(id))
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add_project(&mut self, data: NewProject) -> Result<ProjectId, OpError> {
        let owner = self.session.current_user.clone();
        let result = project_ops::add_project(&mut self.store, &owner, data, Self::today());
        Self::log_rejection("add_project", result)
    }

    pub fn add_task(&mut self, data: NewTask) -> Result<TaskId, OpError> {
        let result = task_ops::add_task(
            &mut self.store,
            self.session.selected_project,
            data,
            Self::today(),
            self.config.tasks.default_priority,
        );
        Self::log_rejection("add_task", result)
    }

    pub fn change_task_status(&mut self, task_id: TaskId, status: TaskStatus) -> Result<(), OpError> {
        let result = task_ops::change_task_status(
            &mut self.store,
            self.session.selected_project,
            task_id,
            status,
            Self::today(),
        );
        Self::log_rejection("change_task_status", result)
    }

    pub fn update_task(&mut self, update: TaskUpdate) -> Result<(), OpError> {
        let result = task_ops::update_task(&mut self.store, update, Self::today());
        Self::log_rejection("update_task", result)
    }

    pub fn update_project(&mut self, project: Project) -> Result<(), OpError> {
        let result = project_ops::update_project(&mut self.store, project);
        Self::log_rejection("update_project", result)
    }

    pub fn add_partner_to_project(&mut self, project_id: ProjectId, partner: Member) -> Result<(), OpError> {
        let policy = self.owner_policy();
        let result = project_ops::add_partner_to_project(&mut self.store, project_id, partner, policy);
        Self::log_rejection("add_partner_to_project", result)
    }

    pub fn remove_partner_from_project(&mut self, project_id: ProjectId, member_id: u64) -> Result<(), OpError> {
        let policy = self.owner_policy();
        let result =
            project_ops::remove_partner_from_project(&mut self.store, project_id, member_id, policy);
        Self::log_rejection("remove_partner_from_project", result)
    }

    pub fn add_comment(&mut self, task_id: TaskId, content: &str) -> Result<u64, OpError> {
        let author = self.session.current_user.clone();
        let result = task_ops::add_comment(&mut self.store, task_id, &author, content, Self::today());
        Self::log_rejection("add_comment", result)
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    /// Projects visible under the current category, recomputed on every call
    pub fn filtered_projects(&self) -> Vec<&Project> {
        filter::filter_projects(
            self.store.projects(),
            &self.session.current_user,
            self.session.category,
        )
    }

    pub fn user_projects(&self) -> Vec<&Project> {
        filter::user_projects(self.store.projects(), &self.session.current_user)
    }

    /// Tasks of the filtered projects
    pub fn all_tasks(&self) -> Vec<&Task> {
        filter::all_tasks(&self.filtered_projects())
    }

    pub fn recent_tasks(&self) -> Vec<&Task> {
        filter::recent_tasks(&self.filtered_projects(), self.config.tasks.recent_limit)
    }

    pub fn project_progress(&self, id: ProjectId) -> u8 {
        calculate_project_progress(self.store.project(id))
    }

    /// Dashboard numbers for the filtered projects.
    ///
    /// Cached until the store version, category, or user changes.
    pub fn dashboard(&mut self) -> &DashboardSummary {
        let key = ViewKey {
            version: self.store.version(),
            category: self.session.category,
        };
        match self.dashboard_cache.take() {
            Some((k, user, summary)) if k == key && user == self.session.current_user => {
                &self.dashboard_cache.insert((k, user, summary)).2
            }
            _ => {
                let summary = stats::dashboard_summary(&self.filtered_projects());
                let user = self.session.current_user.clone();
                &self.dashboard_cache.insert((key, user, summary)).2
            }
        }
    }
}
