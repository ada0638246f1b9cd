use chrono::NaiveDate;
use tracing::debug;

use crate::model::project::ProjectId;
use crate::model::task::{
    Assignee, Comment, PLACEHOLDER_ASSIGNEE_ID, Priority, Tag, Task, TaskId, TaskStatus,
    assignee_initial,
};
use crate::ops::OpError;
use crate::store::Store;

/// Input for a new task, as collected by the add-task form
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    /// `None` uses the configured default
    pub priority: Option<Priority>,
    /// Free-text assignee name; may be blank
    pub assignee: String,
}

/// Partial update for an existing task. `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<Assignee>,
    pub tags: Option<Vec<Tag>>,
    pub comments: Option<Vec<Comment>>,
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Direct status set with `completed_at` bookkeeping.
///
/// Entering `Done` stamps `today`; leaving it clears the stamp. Returns false
/// when the task already had `new_status`.
pub fn set_status(task: &mut Task, new_status: TaskStatus, today: NaiveDate) -> bool {
    if task.status == new_status {
        return false;
    }
    task.status = new_status;
    task.completed_at = if new_status == TaskStatus::Done {
        Some(today)
    } else {
        None
    };
    true
}

/// Change the status of a task in the selected project.
///
/// Only the selected project is searched; a task living in another project
/// reports `TaskNotFound`.
pub fn change_task_status(
    store: &mut Store,
    selected: Option<ProjectId>,
    task_id: TaskId,
    new_status: TaskStatus,
    today: NaiveDate,
) -> Result<(), OpError> {
    let project_id = selected.ok_or(OpError::NoProjectSelected)?;
    let project = store
        .project_mut(project_id)
        .ok_or(OpError::ProjectNotFound(project_id))?;
    let task = project
        .task_mut(task_id)
        .ok_or(OpError::TaskNotFound(task_id))?;

    if set_status(task, new_status, today) {
        debug!(project_id, task_id, status = %new_status, "task status changed");
        store.mark_changed();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

/// Append a new `To Do` task to the selected project. Returns the new id.
pub fn add_task(
    store: &mut Store,
    selected: Option<ProjectId>,
    data: NewTask,
    today: NaiveDate,
    default_priority: Priority,
) -> Result<TaskId, OpError> {
    if data.title.trim().is_empty() {
        return Err(OpError::BlankTitle);
    }
    let project_id = selected.ok_or(OpError::NoProjectSelected)?;
    if !store.contains_project(project_id) {
        return Err(OpError::ProjectNotFound(project_id));
    }

    let id = store.next_id()?;
    let username = match data.assignee.trim() {
        "" => "Unassigned".to_string(),
        name => name.to_string(),
    };
    let mut task = Task::new(
        id,
        data.title,
        today,
        Assignee {
            id: PLACEHOLDER_ASSIGNEE_ID,
            username,
        },
    );
    task.assignee = assignee_initial(&data.assignee);
    task.description = data.description;
    task.priority = data.priority.unwrap_or(default_priority);

    if let Some(project) = store.project_mut(project_id) {
        project.tasks.push(task);
    }
    store.mark_changed();
    debug!(project_id, task_id = id, "task added");
    Ok(id)
}

/// Merge `update` into the task with the same id, wherever it lives.
pub fn update_task(store: &mut Store, update: TaskUpdate, today: NaiveDate) -> Result<(), OpError> {
    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(OpError::BlankTitle);
        }
    }
    let task_id = update.id;
    let incoming_ids = update
        .tags
        .iter()
        .flatten()
        .map(|t| t.id)
        .chain(update.comments.iter().flatten().map(|c| c.id))
        .max();
    let project = store
        .owning_project_mut(task_id)
        .ok_or(OpError::TaskNotFound(task_id))?;
    let project_id = project.id;
    let task = project
        .task_mut(task_id)
        .ok_or(OpError::TaskNotFound(task_id))?;

    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(description) = update.description {
        task.description = description;
    }
    if let Some(status) = update.status {
        set_status(task, status, today);
    }
    if let Some(priority) = update.priority {
        task.priority = priority;
    }
    if let Some(due_date) = update.due_date {
        task.due_date = due_date;
    }
    if let Some(assignee) = update.assignee {
        task.assignee = assignee_initial(&assignee.username);
        task.assignee_data = assignee;
    }
    if let Some(tags) = update.tags {
        task.tags = tags;
    }
    if let Some(comments) = update.comments {
        task.comments = comments;
    }

    if let Some(id) = incoming_ids {
        store.reserve_id(id);
    }
    store.mark_changed();
    debug!(project_id, task_id, "task updated");
    Ok(())
}

/// Append a comment to a task in any project. Returns the comment id.
pub fn add_comment(
    store: &mut Store,
    task_id: TaskId,
    author: &str,
    content: &str,
    today: NaiveDate,
) -> Result<u64, OpError> {
    if content.trim().is_empty() {
        return Err(OpError::BlankComment);
    }
    if store.find_task(task_id).is_none() {
        return Err(OpError::TaskNotFound(task_id));
    }
    let id = store.next_id()?;
    let task = store
        .owning_project_mut(task_id)
        .and_then(|p| p.task_mut(task_id))
        .ok_or(OpError::TaskNotFound(task_id))?;
    task.comments.push(Comment {
        id,
        author: author.to_string(),
        content: content.trim().to_string(),
        created_at: today,
    });
    store.mark_changed();
    debug!(task_id, comment_id = id, "comment added");
    Ok(id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::day;
    use crate::sample::sample_projects;

    fn sample_store() -> Store {
        Store::new(sample_projects())
    }

    fn task_count(store: &Store) -> usize {
        store.projects().iter().map(|p| p.tasks.len()).sum()
    }

    fn new_task(title: &str, assignee: &str) -> NewTask {
        NewTask {
            title: title.into(),
            assignee: assignee.into(),
            ..Default::default()
        }
    }

    // --- Status transitions ---

    #[test]
    fn test_set_status_done_stamps_and_clears() {
        let mut store = sample_store();
        let today = day(2024, 9, 20);
        change_task_status(&mut store, Some(1), 1, TaskStatus::Done, today).unwrap();
        let (_, task) = store.find_task(1).unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.completed_at, Some(today));

        change_task_status(&mut store, Some(1), 1, TaskStatus::ToDo, today).unwrap();
        let (_, task) = store.find_task(1).unwrap();
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_set_status_any_to_any() {
        let mut store = sample_store();
        let today = day(2024, 9, 20);
        for status in [
            TaskStatus::InProgress,
            TaskStatus::ToDo,
            TaskStatus::Done,
            TaskStatus::InProgress,
        ] {
            change_task_status(&mut store, Some(1), 2, status, today).unwrap();
            let (_, task) = store.find_task(2).unwrap();
            assert_eq!(task.status, status);
            assert_eq!(task.completed_at.is_some(), status == TaskStatus::Done);
        }
    }

    #[test]
    fn test_set_status_same_state_keeps_stamp() {
        let mut store = sample_store();
        let version = store.version();
        // Task 3 is already done, stamped with its due date
        change_task_status(&mut store, Some(1), 3, TaskStatus::Done, day(2030, 1, 1)).unwrap();
        let (_, task) = store.find_task(3).unwrap();
        assert_eq!(task.completed_at, Some(day(2024, 8, 30)));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_change_status_only_searches_selected_project() {
        let mut store = sample_store();
        // Task 6 lives in project 3
        let err = change_task_status(&mut store, Some(1), 6, TaskStatus::ToDo, day(2024, 9, 20));
        assert_eq!(err, Err(OpError::TaskNotFound(6)));
        let (_, task) = store.find_task(6).unwrap();
        assert_eq!(task.status, TaskStatus::Done);

        let err = change_task_status(&mut store, None, 6, TaskStatus::ToDo, day(2024, 9, 20));
        assert_eq!(err, Err(OpError::NoProjectSelected));
    }

    // --- Add task ---

    #[test]
    fn test_add_task_defaults() {
        let mut store = sample_store();
        let today = day(2024, 9, 20);
        let id = add_task(&mut store, Some(2), new_task("Ship beta", "dana"), today, Priority::Medium)
            .unwrap();
        let (project, task) = store.find_task(id).unwrap();
        assert_eq!(project.id, 2);
        assert_eq!(project.tasks.last().map(|t| t.id), Some(id));
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.due_date, today);
        assert_eq!(task.assignee, "D");
        assert_eq!(task.assignee_data.id, PLACEHOLDER_ASSIGNEE_ID);
        assert_eq!(task.assignee_data.username, "dana");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(task.comments.is_empty());
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_add_task_blank_assignee() {
        let mut store = sample_store();
        let mut data = new_task("Ship beta", "  ");
        data.priority = Some(Priority::High);
        let id = add_task(&mut store, Some(2), data, day(2024, 9, 20), Priority::Low).unwrap();
        let (_, task) = store.find_task(id).unwrap();
        assert_eq!(task.assignee, "U");
        assert_eq!(task.assignee_data.username, "Unassigned");
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn test_add_task_noop_without_selection_or_title() {
        let mut store = sample_store();
        let before = task_count(&store);
        let version = store.version();

        let err = add_task(&mut store, None, new_task("Real title", "bob"), day(2024, 9, 20), Priority::Medium);
        assert_eq!(err, Err(OpError::NoProjectSelected));

        let err = add_task(&mut store, Some(1), new_task("   ", "bob"), day(2024, 9, 20), Priority::Medium);
        assert_eq!(err, Err(OpError::BlankTitle));

        let err = add_task(&mut store, Some(99), new_task("Title", "bob"), day(2024, 9, 20), Priority::Medium);
        assert_eq!(err, Err(OpError::ProjectNotFound(99)));

        assert_eq!(task_count(&store), before);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_add_task_ids_are_unique() {
        let mut store = sample_store();
        let a = add_task(&mut store, Some(1), new_task("A", ""), day(2024, 9, 20), Priority::Medium).unwrap();
        let b = add_task(&mut store, Some(1), new_task("B", ""), day(2024, 9, 20), Priority::Medium).unwrap();
        assert_ne!(a, b);
        assert!(store.find_task(a).is_some());
        assert!(store.find_task(b).is_some());
    }

    // --- Update task ---

    #[test]
    fn test_update_task_merges_fields() {
        let mut store = sample_store();
        update_task(
            &mut store,
            TaskUpdate {
                id: 7,
                title: Some("API reference".into()),
                priority: Some(Priority::High),
                ..Default::default()
            },
            day(2024, 9, 20),
        )
        .unwrap();
        let (project, task) = store.find_task(7).unwrap();
        assert_eq!(project.id, 3);
        assert_eq!(task.title, "API reference");
        assert_eq!(task.priority, Priority::High);
        // Untouched fields survive
        assert_eq!(task.description, "Update all endpoint docs");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_update_task_into_done_stamps_today() {
        let mut store = sample_store();
        let today = day(2024, 9, 20);
        update_task(
            &mut store,
            TaskUpdate {
                id: 5,
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
            today,
        )
        .unwrap();
        let (_, task) = store.find_task(5).unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.completed_at, Some(today));
    }

    #[test]
    fn test_update_task_reserves_incoming_ids() {
        let mut store = sample_store();
        let far = store.next_id().unwrap() + 1_000;
        update_task(
            &mut store,
            TaskUpdate {
                id: 2,
                tags: Some(vec![Tag {
                    id: far,
                    name: "SEO".into(),
                }]),
                ..Default::default()
            },
            day(2024, 9, 20),
        )
        .unwrap();
        let id = add_task(&mut store, Some(1), new_task("Next", ""), day(2024, 9, 20), Priority::Medium).unwrap();
        assert!(id > far);
    }

    #[test]
    fn test_add_task_when_ids_run_out() {
        let mut projects = sample_projects();
        projects[2].id = u64::MAX;
        let mut store = Store::new(projects);
        let version = store.version();
        assert_eq!(
            add_task(&mut store, Some(1), new_task("Late", ""), day(2024, 9, 20), Priority::Medium),
            Err(OpError::IdsExhausted)
        );
        assert_eq!(store.project(1).unwrap().tasks.len(), 3);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_update_task_searches_all_projects() {
        let mut store = sample_store();
        // No selection involved: task 4 lives in project 2
        update_task(
            &mut store,
            TaskUpdate {
                id: 4,
                status: Some(TaskStatus::InProgress),
                assignee: Some(Assignee {
                    id: 1,
                    username: "alice".into(),
                }),
                ..Default::default()
            },
            day(2024, 9, 20),
        )
        .unwrap();
        let (_, task) = store.find_task(4).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.assignee, "A");
    }

    #[test]
    fn test_update_task_unknown_id() {
        let mut store = sample_store();
        let version = store.version();
        let err = update_task(
            &mut store,
            TaskUpdate {
                id: 404,
                title: Some("x".into()),
                ..Default::default()
            },
            day(2024, 9, 20),
        );
        assert_eq!(err, Err(OpError::TaskNotFound(404)));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_update_task_rejects_blank_title() {
        let mut store = sample_store();
        let err = update_task(
            &mut store,
            TaskUpdate {
                id: 1,
                title: Some(" ".into()),
                ..Default::default()
            },
            day(2024, 9, 20),
        );
        assert_eq!(err, Err(OpError::BlankTitle));
        assert_eq!(store.find_task(1).unwrap().1.title, "Design new landing page");
    }

    // --- Comments ---

    #[test]
    fn test_add_comment() {
        let mut store = sample_store();
        let id = add_comment(&mut store, 5, "Charlie", "  Looks good  ", day(2024, 9, 20)).unwrap();
        let (_, task) = store.find_task(5).unwrap();
        let comment = task.comments.last().unwrap();
        assert_eq!(comment.id, id);
        assert_eq!(comment.author, "Charlie");
        assert_eq!(comment.content, "Looks good");
        assert_eq!(comment.created_at, day(2024, 9, 20));
    }

    #[test]
    fn test_add_comment_rejects_blank_and_unknown() {
        let mut store = sample_store();
        assert_eq!(
            add_comment(&mut store, 5, "Charlie", "   ", day(2024, 9, 20)),
            Err(OpError::BlankComment)
        );
        assert_eq!(
            add_comment(&mut store, 500, "Charlie", "hi", day(2024, 9, 20)),
            Err(OpError::TaskNotFound(500))
        );
    }
}
