pub mod check;
pub mod filter;
pub mod progress;
pub mod project_ops;
pub mod stats;
pub mod task_ops;

#[cfg(test)]
pub(crate) mod test_support;

use crate::model::project::ProjectId;
use crate::model::task::TaskId;

/// Why a mutation left the store untouched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpError {
    #[error("project name is required")]
    BlankName,
    #[error("task title is required")]
    BlankTitle,
    #[error("comment text is required")]
    BlankComment,
    #[error("no project selected")]
    NoProjectSelected,
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("member not found: {0}")]
    MemberNotFound(u64),
    #[error("project owner is protected: {0}")]
    OwnerProtected(String),
    #[error("no fresh ids left")]
    IdsExhausted,
}

/// Whether the Owner entry of a project may be removed or duplicated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerPolicy {
    /// Allow any membership change, including dropping the Owner
    #[default]
    Permissive,
    /// Refuse to remove the Owner or add a second one
    Protect,
}

impl OwnerPolicy {
    pub fn from_config(protect_owner: bool) -> Self {
        if protect_owner {
            OwnerPolicy::Protect
        } else {
            OwnerPolicy::Permissive
        }
    }
}
