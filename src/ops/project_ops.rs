use chrono::NaiveDate;
use tracing::debug;

use crate::model::project::{Member, Project, ProjectId, Role};
use crate::model::task::Task;
use crate::ops::{OpError, OwnerPolicy};
use crate::store::{Store, max_id_in_task};

/// Input for a new project, as collected by the add-project form
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub color: String,
    /// Emails of the people to add as `Member`s
    pub team_members: Vec<String>,
    /// Tasks to start with, usually empty
    pub tasks: Vec<Task>,
}

/// Create a project owned by `owner` and append it to the store.
///
/// The owner is entered first in `users` with role `Owner`; each non-blank
/// team-member email follows as a `Member`. Returns the new project id.
pub fn add_project(
    store: &mut Store,
    owner: &str,
    data: NewProject,
    today: NaiveDate,
) -> Result<ProjectId, OpError> {
    if data.name.trim().is_empty() {
        return Err(OpError::BlankName);
    }

    // Ids already carried by the starting tasks must not be minted again
    for task in &data.tasks {
        store.reserve_id(max_id_in_task(task));
    }
    let id = store.next_id()?;
    let mut users = vec![Member::new(store.next_id()?, owner, Role::Owner)];
    for email in data.team_members.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        users.push(Member::new(store.next_id()?, email, Role::Member));
    }

    let project = Project {
        id,
        name: data.name,
        description: data.description,
        due_date: data.due_date,
        created_at: today,
        color: data.color,
        owner: owner.to_string(),
        users,
        tasks: data.tasks,
    };
    store.push_project(project);
    store.mark_changed();
    debug!(project_id = id, owner, "project added");
    Ok(id)
}

/// Replace the project with the same id wholesale
pub fn update_project(store: &mut Store, project: Project) -> Result<(), OpError> {
    let id = project.id;
    if !store.replace_project(project) {
        return Err(OpError::ProjectNotFound(id));
    }
    store.mark_changed();
    debug!(project_id = id, "project updated");
    Ok(())
}

/// Append `partner` to the project's membership list
pub fn add_partner_to_project(
    store: &mut Store,
    project_id: ProjectId,
    partner: Member,
    policy: OwnerPolicy,
) -> Result<(), OpError> {
    let project = store
        .project_mut(project_id)
        .ok_or(OpError::ProjectNotFound(project_id))?;
    if policy == OwnerPolicy::Protect && partner.role == Role::Owner {
        return Err(OpError::OwnerProtected(project.owner.clone()));
    }
    let member_id = partner.id;
    project.users.push(partner);
    store.reserve_id(member_id);
    store.mark_changed();
    debug!(project_id, member_id, "partner added");
    Ok(())
}

/// Remove the membership entry with id `member_id`.
///
/// Under `OwnerPolicy::Permissive` the Owner entry can be removed too, which
/// leaves the project without an Owner in `users`.
pub fn remove_partner_from_project(
    store: &mut Store,
    project_id: ProjectId,
    member_id: u64,
    policy: OwnerPolicy,
) -> Result<(), OpError> {
    let project = store
        .project_mut(project_id)
        .ok_or(OpError::ProjectNotFound(project_id))?;
    let idx = project
        .users
        .iter()
        .position(|m| m.id == member_id)
        .ok_or(OpError::MemberNotFound(member_id))?;
    if policy == OwnerPolicy::Protect && project.users[idx].role == Role::Owner {
        return Err(OpError::OwnerProtected(project.users[idx].username.clone()));
    }
    project.users.remove(idx);
    store.mark_changed();
    debug!(project_id, member_id, "partner removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ops::test_support::day;
    use crate::sample::sample_projects;

    fn sample_store() -> Store {
        Store::new(sample_projects())
    }

    #[test]
    fn test_add_project_owner_and_members() {
        let mut store = Store::default();
        let id = add_project(
            &mut store,
            "Alice",
            NewProject {
                name: "X".into(),
                team_members: vec!["bob@example.com".into()],
                ..Default::default()
            },
            day(2024, 9, 20),
        )
        .unwrap();

        let project = store.project(id).unwrap();
        assert_eq!(project.owner, "Alice");
        assert_eq!(project.created_at, day(2024, 9, 20));
        let entries: Vec<(&str, Role)> = project
            .users
            .iter()
            .map(|m| (m.username.as_str(), m.role))
            .collect();
        assert_eq!(
            entries,
            vec![("Alice", Role::Owner), ("bob@example.com", Role::Member)]
        );
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn test_add_project_ids_are_fresh() {
        let mut store = sample_store();
        let id = add_project(
            &mut store,
            "Alice",
            NewProject {
                name: "Launch".into(),
                team_members: vec!["a@x.io".into(), " ".into(), "b@x.io".into()],
                ..Default::default()
            },
            day(2024, 9, 20),
        )
        .unwrap();
        let project = store.project(id).unwrap();
        assert_eq!(project.users.len(), 3);
        let mut ids: Vec<u64> = project.users.iter().map(|m| m.id).collect();
        ids.push(id);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(store.projects().iter().filter(|p| p.id == id).count() == 1);
    }

    #[test]
    fn test_add_project_blank_name() {
        let mut store = sample_store();
        let err = add_project(
            &mut store,
            "Alice",
            NewProject {
                name: "  ".into(),
                ..Default::default()
            },
            day(2024, 9, 20),
        );
        assert_eq!(err, Err(OpError::BlankName));
        assert_eq!(store.projects().len(), 3);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_update_project_replaces_wholesale() {
        let mut store = sample_store();
        let mut edited = store.project(2).unwrap().clone();
        edited.name = "Mobile App v2".into();
        edited.tasks.clear();
        update_project(&mut store, edited.clone()).unwrap();
        assert_eq!(store.project(2), Some(&edited));

        edited.id = 404;
        assert_eq!(
            update_project(&mut store, edited),
            Err(OpError::ProjectNotFound(404))
        );
    }

    #[test]
    fn test_partner_ids_are_not_reissued() {
        let mut store = sample_store();
        let far = store.next_id().unwrap() + 10;
        add_partner_to_project(
            &mut store,
            3,
            Member::new(far, "Dana", Role::Viewer),
            OwnerPolicy::Permissive,
        )
        .unwrap();

        let id = add_project(
            &mut store,
            "Dana",
            NewProject {
                name: "Side".into(),
                team_members: vec!["erin@example.com".into()],
                ..Default::default()
            },
            day(2024, 9, 20),
        )
        .unwrap();
        let project = store.project(id).unwrap();
        assert!(id > far);
        assert!(project.users.iter().all(|m| m.id > far));
    }

    #[test]
    fn test_add_project_starting_tasks_keep_ids_unique() {
        let mut store = Store::default();
        let far = store.next_id().unwrap() + 1;
        let mut task = sample_projects().remove(0).tasks.remove(0);
        task.id = far;
        let id = add_project(
            &mut store,
            "Alice",
            NewProject {
                name: "Imported".into(),
                tasks: vec![task],
                ..Default::default()
            },
            day(2024, 9, 20),
        )
        .unwrap();
        let project = store.project(id).unwrap();
        assert_ne!(id, far);
        assert!(project.users.iter().all(|m| m.id != far));
    }

    #[test]
    fn test_add_project_when_ids_run_out() {
        let mut projects = sample_projects();
        projects[0].users[0].id = u64::MAX;
        let mut store = Store::new(projects);
        assert_eq!(
            add_project(
                &mut store,
                "Alice",
                NewProject {
                    name: "X".into(),
                    ..Default::default()
                },
                day(2024, 9, 20),
            ),
            Err(OpError::IdsExhausted)
        );
        assert_eq!(store.projects().len(), 3);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_add_and_remove_partner() {
        let mut store = sample_store();
        add_partner_to_project(
            &mut store,
            3,
            Member::new(50, "Dana", Role::Viewer),
            OwnerPolicy::Permissive,
        )
        .unwrap();
        assert!(store.project(3).unwrap().has_member("Dana"));

        remove_partner_from_project(&mut store, 3, 50, OwnerPolicy::Permissive).unwrap();
        assert!(!store.project(3).unwrap().has_member("Dana"));

        assert_eq!(
            remove_partner_from_project(&mut store, 3, 50, OwnerPolicy::Permissive),
            Err(OpError::MemberNotFound(50))
        );
        assert_eq!(
            add_partner_to_project(
                &mut store,
                9,
                Member::new(51, "Eve", Role::Member),
                OwnerPolicy::Permissive
            ),
            Err(OpError::ProjectNotFound(9))
        );
    }

    #[test]
    fn test_remove_owner_allowed_when_permissive() {
        let mut store = sample_store();
        // Bob (member id 2) owns project 3
        remove_partner_from_project(&mut store, 3, 2, OwnerPolicy::Permissive).unwrap();
        let project = store.project(3).unwrap();
        assert_eq!(project.owner, "Bob");
        assert!(!project.users.iter().any(|m| m.role == Role::Owner));
    }

    #[test]
    fn test_owner_protected_policy() {
        let mut store = sample_store();
        assert_eq!(
            remove_partner_from_project(&mut store, 3, 2, OwnerPolicy::Protect),
            Err(OpError::OwnerProtected("Bob".into()))
        );
        assert_eq!(
            add_partner_to_project(
                &mut store,
                3,
                Member::new(60, "Mallory", Role::Owner),
                OwnerPolicy::Protect
            ),
            Err(OpError::OwnerProtected("Bob".into()))
        );
        // Non-owner changes still go through
        remove_partner_from_project(&mut store, 3, 3, OwnerPolicy::Protect).unwrap();
        assert!(!store.project(3).unwrap().has_member("Charlie"));
    }
}
