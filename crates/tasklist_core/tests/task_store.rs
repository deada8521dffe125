use tasklist_core::{
    MemoryTaskRepository, NewTask, RecordingNotifier, Severity, StoreError, Task,
    TaskFilter, TaskStats, TaskStore, TaskUpdate, TaskValidationError,
};

type Store = TaskStore<MemoryTaskRepository, RecordingNotifier>;

fn empty_store() -> Store {
    TaskStore::open(MemoryTaskRepository::new(), RecordingNotifier::new()).unwrap()
}

fn last_message(store: &Store) -> (Severity, String) {
    let last = store.notifier().last().unwrap();
    (last.severity, last.message.clone())
}

fn titles(store: &Store) -> Vec<String> {
    store.tasks().iter().map(|task| task.title.clone()).collect()
}

#[test]
fn add_prepends_trimmed_task_and_persists() {
    let mut store = empty_store();

    let id = store.add(&NewTask::new("  Buy milk  ")).unwrap();

    assert_eq!(store.tasks().len(), 1);
    let task = &store.tasks()[0];
    assert_eq!(task.id, id);
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
    assert_eq!(task.created_at, task.updated_at);
    assert_eq!(
        store.stats(),
        TaskStats {
            total: 1,
            active: 1,
            completed: 0
        }
    );
    assert_eq!(
        last_message(&store),
        (Severity::Success, "Task added successfully".to_string())
    );
    assert_eq!(store.repository().stored_tasks().unwrap(), store.tasks());
    assert!(!store.is_loading());
}

#[test]
fn newest_task_comes_first() {
    let mut store = empty_store();
    store.add(&NewTask::new("first")).unwrap();
    store.add(&NewTask::new("second")).unwrap();

    assert_eq!(titles(&store), vec!["second", "first"]);
}

#[test]
fn add_with_blank_title_is_rejected_without_mutation() {
    let mut store = empty_store();

    let err = store.add(&NewTask::new("   ")).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert!(store.tasks().is_empty());
    assert_eq!(store.repository().save_count(), 0);
    assert_eq!(
        last_message(&store),
        (Severity::Error, "Task title cannot be empty".to_string())
    );
}

#[test]
fn add_with_oversized_description_is_rejected() {
    let mut store = empty_store();

    let data = NewTask::new("ok").with_description("x".repeat(1001));
    let err = store.add(&data).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::DescriptionTooLong { len: 1001 })
    ));
    assert!(store.tasks().is_empty());
}

#[test]
fn add_reverts_when_save_fails() {
    let mut store = empty_store();
    store.add(&NewTask::new("kept")).unwrap();
    store.repository_mut().fail_next_saves(1);

    let err = store.add(&NewTask::new("lost")).unwrap_err();

    assert!(matches!(err, StoreError::Persistence(_)));
    assert_eq!(titles(&store), vec!["kept"]);
    assert_eq!(
        last_message(&store),
        (Severity::Error, "Failed to add task".to_string())
    );
    assert!(!store.is_loading());
}

#[test]
fn toggle_flips_completion_without_success_notification() {
    let mut store = empty_store();
    let id = store.add(&NewTask::new("Buy milk")).unwrap();
    let notifications_before = store.notifier().notifications().len();

    assert_eq!(store.toggle(id).unwrap(), Some(true));

    let task = store.get(id).unwrap();
    assert!(task.completed);
    assert!(task.updated_at >= task.created_at);
    store.set_filter(TaskFilter::Active);
    assert!(store.visible_tasks().is_empty());
    assert_eq!(store.notifier().notifications().len(), notifications_before);

    assert_eq!(store.toggle(id).unwrap(), Some(false));
    assert_eq!(store.visible_tasks().len(), 1);
}

#[test]
fn toggle_unknown_id_is_noop() {
    let mut store = empty_store();
    store.add(&NewTask::new("a")).unwrap();
    let saves = store.repository().save_count();

    assert_eq!(store.toggle(uuid::Uuid::new_v4()).unwrap(), None);
    assert_eq!(store.repository().save_count(), saves);
}

#[test]
fn toggle_reverts_when_save_fails() {
    let mut store = empty_store();
    let id = store.add(&NewTask::new("a")).unwrap();
    let before = store.get(id).unwrap().clone();
    store.repository_mut().fail_next_saves(1);

    assert!(store.toggle(id).is_err());
    assert_eq!(store.get(id), Some(&before));
    assert_eq!(
        last_message(&store),
        (Severity::Error, "Failed to update task".to_string())
    );
}

#[test]
fn edit_overlays_fields_and_preserves_the_rest() {
    let mut store = empty_store();
    let id = store
        .add(&NewTask::new("draft").with_description("notes"))
        .unwrap();
    let original = store.get(id).unwrap().clone();

    assert!(store
        .edit(id, &TaskUpdate::default().title("  final  "))
        .unwrap());

    let edited = store.get(id).unwrap();
    assert_eq!(edited.title, "final");
    assert_eq!(edited.description.as_deref(), Some("notes"));
    assert_eq!(edited.created_at, original.created_at);
    assert!(edited.updated_at >= original.updated_at);
    assert_eq!(
        last_message(&store),
        (Severity::Success, "Task updated successfully".to_string())
    );
}

#[test]
fn edit_with_blank_title_is_rejected() {
    let mut store = empty_store();
    let id = store.add(&NewTask::new("keep me")).unwrap();

    let err = store
        .edit(id, &TaskUpdate::default().title(" "))
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert_eq!(store.get(id).unwrap().title, "keep me");
}

#[test]
fn edit_unknown_id_reports_success_without_writing() {
    let mut store = empty_store();
    store.add(&NewTask::new("present")).unwrap();
    let saves = store.repository().save_count();
    let before = store.tasks().to_vec();

    let changed = store
        .edit(uuid::Uuid::new_v4(), &TaskUpdate::default().title("x"))
        .unwrap();

    assert!(!changed);
    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(store.repository().save_count(), saves);
    assert_eq!(
        last_message(&store),
        (Severity::Success, "Task updated successfully".to_string())
    );
    assert!(!store.is_loading());
}

#[test]
fn edit_reverts_when_save_fails() {
    let mut store = empty_store();
    let id = store.add(&NewTask::new("before")).unwrap();
    store.repository_mut().fail_next_saves(1);

    assert!(store
        .edit(id, &TaskUpdate::default().title("after"))
        .is_err());
    assert_eq!(store.get(id).unwrap().title, "before");
}

#[test]
fn remove_then_undo_restores_task_at_front() {
    let mut store = empty_store();
    let id = store
        .add(&NewTask::new("removed").with_description("details"))
        .unwrap();
    store.add(&NewTask::new("newer")).unwrap();
    let original = store.get(id).unwrap().clone();

    let removed = store.remove(id).unwrap().unwrap();
    assert_eq!(removed, original);
    assert_eq!(titles(&store), vec!["newer"]);

    let action = store.notifier().last_action().unwrap().clone();
    assert_eq!(action.label, "Undo");
    assert_eq!(store.notifier().last().unwrap().message, "Task deleted");

    assert!(store.trigger(&action).unwrap());
    assert_eq!(titles(&store), vec!["removed", "newer"]);
    assert_eq!(store.tasks()[0], original);
    assert_eq!(
        last_message(&store),
        (Severity::Success, "Task restored".to_string())
    );
    assert!(store.last_deleted().is_none());
}

#[test]
fn remove_unknown_id_is_silent() {
    let mut store = empty_store();
    assert_eq!(store.remove(uuid::Uuid::new_v4()).unwrap(), None);
    assert!(store.notifier().notifications().is_empty());
}

#[test]
fn newer_deletion_supersedes_older_undo() {
    let mut store = empty_store();
    let first = store.add(&NewTask::new("first")).unwrap();
    let second = store.add(&NewTask::new("second")).unwrap();

    store.remove(first).unwrap();
    let stale = store.notifier().last_action().unwrap().clone();
    store.remove(second).unwrap();

    assert!(!store.trigger(&stale).unwrap());
    assert!(store.tasks().is_empty());
    assert_eq!(
        last_message(&store),
        (Severity::Info, "Nothing to restore".to_string())
    );

    let fresh = store.notifier().last_action().unwrap().clone();
    assert!(store.trigger(&fresh).unwrap());
    assert_eq!(store.tasks()[0].id, second);
}

#[test]
fn undo_is_single_use() {
    let mut store = empty_store();
    let id = store.add(&NewTask::new("once")).unwrap();
    store.remove(id).unwrap();
    let action = store.notifier().last_action().unwrap().clone();

    assert!(store.trigger(&action).unwrap());
    assert!(!store.trigger(&action).unwrap());
    assert_eq!(store.tasks().len(), 1);
}

#[test]
fn remove_reverts_to_original_position_when_save_fails() {
    let mut store = empty_store();
    store.add(&NewTask::new("c")).unwrap();
    let middle = store.add(&NewTask::new("b")).unwrap();
    store.add(&NewTask::new("a")).unwrap();
    store.repository_mut().fail_next_saves(1);

    assert!(store.remove(middle).is_err());
    assert_eq!(titles(&store), vec!["a", "b", "c"]);
    assert!(store.last_deleted().is_none());
}

#[test]
fn failed_restore_keeps_undo_available() {
    let mut store = empty_store();
    let id = store.add(&NewTask::new("retry")).unwrap();
    store.remove(id).unwrap();
    let action = store.notifier().last_action().unwrap().clone();

    store.repository_mut().fail_next_saves(1);
    assert!(store.trigger(&action).is_err());
    assert!(store.tasks().is_empty());

    assert!(store.trigger(&action).unwrap());
    assert_eq!(store.tasks()[0].id, id);
}

#[test]
fn clear_completed_removes_only_completed_tasks() {
    let mut store = empty_store();
    let a = store.add(&NewTask::new("a")).unwrap();
    store.add(&NewTask::new("b")).unwrap();
    let c = store.add(&NewTask::new("c")).unwrap();
    store.toggle(a).unwrap();
    store.toggle(c).unwrap();

    assert_eq!(store.clear_completed().unwrap(), 2);

    assert_eq!(titles(&store), vec!["b"]);
    let (severity, message) = last_message(&store);
    assert_eq!(severity, Severity::Success);
    assert!(message.contains('2'), "unexpected message: {message}");
    assert!(!store.has_completed());
}

#[test]
fn clear_completed_with_nothing_completed_is_info_only() {
    let mut store = empty_store();
    store.add(&NewTask::new("active")).unwrap();
    let saves = store.repository().save_count();

    assert_eq!(store.clear_completed().unwrap(), 0);

    assert_eq!(store.repository().save_count(), saves);
    assert_eq!(
        last_message(&store),
        (Severity::Info, "No completed tasks to clear".to_string())
    );
}

#[test]
fn clear_completed_reverts_when_save_fails() {
    let mut store = empty_store();
    for title in ["d", "c", "b", "a"] {
        let id = store.add(&NewTask::new(title)).unwrap();
        if title == "b" || title == "d" {
            store.toggle(id).unwrap();
        }
    }
    let before: Vec<Task> = store.tasks().to_vec();
    store.repository_mut().fail_next_saves(1);

    assert!(store.clear_completed().is_err());
    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(
        last_message(&store),
        (Severity::Error, "Failed to clear completed tasks".to_string())
    );
}

#[test]
fn filter_defaults_to_all_and_drives_visible_view() {
    let mut store = empty_store();
    let done = store.add(&NewTask::new("done")).unwrap();
    store.add(&NewTask::new("open")).unwrap();
    store.toggle(done).unwrap();

    assert_eq!(store.filter(), TaskFilter::All);
    assert_eq!(store.visible_tasks().len(), 2);

    store.set_filter(TaskFilter::Completed);
    let visible = store.visible_tasks();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, done);
    assert_eq!(store.stats().completion_percent(), 50);
}

#[test]
fn open_loads_existing_collection() {
    let seeded = vec![
        Task::new(&NewTask::new("second")),
        Task::new(&NewTask::new("first")),
    ];
    let repo = MemoryTaskRepository::with_tasks(&seeded).unwrap();

    let store = TaskStore::open(repo, RecordingNotifier::new()).unwrap();

    assert_eq!(store.tasks(), seeded.as_slice());
}

#[test]
fn open_fails_on_unreadable_storage() {
    let mut repo = MemoryTaskRepository::new();
    repo.fail_loads(true);

    let result = TaskStore::open(repo, RecordingNotifier::new());
    assert!(matches!(result, Err(StoreError::Persistence(_))));
}
