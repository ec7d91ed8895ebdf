use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use pretty_assertions::assert_eq;
use taskkeep::auth::CredentialStore;
use taskkeep::error::TaskError;
use taskkeep::models::{Category, FieldUpdate, Priority, SortKey, Status, Task};
use taskkeep::storage::{Collection, Document, JsonFileStorage, MemoryStorage, Storage};
use taskkeep::store::{sort_tasks, TaskStore};
use tempfile::tempdir;

#[test]
fn test_list_empty_for_unknown_user() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    assert!(store.list_ongoing(7).is_empty());
    assert!(store.list_completed(7).is_empty());
}

#[test]
fn test_add_sets_defaults() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);

    let task = store.add(1, "T1", "D1", Priority::High, Category::Work).unwrap();

    let tasks = store.list_ongoing(1);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0], task);
    assert_eq!(tasks[0].task_id, 1);
    assert_eq!(tasks[0].name, "T1");
    assert_eq!(tasks[0].status, Status::InProgress);
    assert_eq!(tasks[0].priority, Some(Priority::High));
    assert_eq!(tasks[0].category, Some(Category::Work));
    assert_eq!(tasks[0].due_date, tasks[0].created_at + Duration::days(1));
}

#[test]
fn test_add_rejects_empty_text() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);

    assert!(matches!(store.add(1, "", "D", Priority::Low, Category::Other), Err(TaskError::InvalidInput(_))));
    assert!(matches!(store.add(1, "N", "   ", Priority::Low, Category::Other), Err(TaskError::InvalidInput(_))));
    assert!(store.list_ongoing(1).is_empty());
}

#[test]
fn test_add_failed_write_is_not_committed() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    storage.fail_saves(Collection::Ongoing);

    let err = store.add(1, "T1", "D1", Priority::Low, Category::Work).unwrap_err();
    assert!(matches!(err, TaskError::Persistence(_)));
    assert!(store.list_ongoing(1).is_empty());
}

#[test]
fn test_tasks_are_keyed_by_userid() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(3, "mine", "d", Priority::Low, Category::Work).unwrap();
    store.add(4, "theirs", "d", Priority::Low, Category::Work).unwrap();

    let doc = storage.load(Collection::Ongoing);
    assert!(doc.contains_key("3"));
    assert!(doc.contains_key("4"));
    assert_eq!(store.list_ongoing(3).len(), 1);
    assert_eq!(store.list_ongoing(3)[0].name, "mine");
    assert_eq!(store.list_ongoing(4)[0].task_id, 1);
}

#[test]
fn test_update_single_field() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    let original = store.add(1, "T1", "D1", Priority::Low, Category::Work).unwrap();

    let updated = store.update(1, 1, FieldUpdate::Status(Status::OnHold)).unwrap();
    assert_eq!(updated.status, Status::OnHold);
    assert_eq!(updated.task_id, 1);
    assert_eq!(updated.name, original.name);
    assert_eq!(updated.priority, original.priority);

    store.update(1, 1, FieldUpdate::Name("Renamed".into())).unwrap();
    store.update(1, 1, FieldUpdate::Priority(Priority::Urgent)).unwrap();
    store.update(1, 1, FieldUpdate::Category(Category::Health)).unwrap();
    store.update(1, 1, FieldUpdate::Description("New".into())).unwrap();

    let task = &store.list_ongoing(1)[0];
    assert_eq!(task.name, "Renamed");
    assert_eq!(task.description, "New");
    assert_eq!(task.priority, Some(Priority::Urgent));
    assert_eq!(task.category, Some(Category::Health));
    assert_eq!(task.status, Status::OnHold);
    assert_eq!(task.created_at, original.created_at);
}

#[test]
fn test_update_missing_task_leaves_collection_unchanged() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "T1", "D1", Priority::Low, Category::Work).unwrap();
    let before = store.list_ongoing(1);

    let err = store.update(1, 9, FieldUpdate::Name("x".into())).unwrap_err();
    assert!(matches!(err, TaskError::TaskNotFound(9)));
    assert_eq!(store.list_ongoing(1), before);
}

#[test]
fn test_update_rejects_empty_name() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "T1", "D1", Priority::Low, Category::Work).unwrap();

    let err = store.update(1, 1, FieldUpdate::Name(" ".into())).unwrap_err();
    assert!(matches!(err, TaskError::InvalidInput(_)));
    assert_eq!(store.list_ongoing(1)[0].name, "T1");
}

#[test]
fn test_delete_moves_task_to_completed() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "T1", "D1", Priority::High, Category::Study).unwrap();

    let done = store.delete(1, 1).unwrap();
    assert_eq!(done.completed_id, 1);
    assert_eq!(done.status, Status::Completed);

    assert!(store.list_ongoing(1).is_empty());
    let completed = store.list_completed(1);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].name, "T1");
    assert_eq!(completed[0].description, "D1");
    assert_eq!(completed[0].priority, Some(Priority::High));
    assert_eq!(completed[0].category, Some(Category::Study));
    assert_eq!(completed[0].status, Status::Completed);
}

#[test]
fn test_delete_missing_task() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "T1", "D1", Priority::High, Category::Study).unwrap();

    assert!(matches!(store.delete(1, 2), Err(TaskError::TaskNotFound(2))));
    assert_eq!(store.list_ongoing(1).len(), 1);
    assert!(store.list_completed(1).is_empty());
}

#[test]
fn test_completed_ids_increase() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "A", "a", Priority::Low, Category::Work).unwrap();
    store.add(1, "B", "b", Priority::Low, Category::Work).unwrap();

    assert_eq!(store.delete(1, 1).unwrap().completed_id, 1);
    assert_eq!(store.delete(1, 1).unwrap().completed_id, 2);
    let names: Vec<_> = store.list_completed(1).into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_delete_rolls_back_completed_when_ongoing_write_fails() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "T1", "D1", Priority::Low, Category::Work).unwrap();
    storage.fail_saves(Collection::Ongoing);

    let err = store.delete(1, 1).unwrap_err();
    assert!(matches!(err, TaskError::Persistence(_)));
    assert_eq!(store.list_ongoing(1).len(), 1);
    assert!(store.list_completed(1).is_empty());
}

#[test]
fn test_delete_fails_cleanly_when_completed_write_fails() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "T1", "D1", Priority::Low, Category::Work).unwrap();
    storage.fail_saves(Collection::Completed);

    assert!(matches!(store.delete(1, 1), Err(TaskError::Persistence(_))));
    assert_eq!(store.list_ongoing(1).len(), 1);
}

#[test]
fn test_alice_scenario_renumbers_after_delete() {
    let dir = tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path());
    let creds = CredentialStore::with_cost(&storage, 4);
    let store = TaskStore::new(&storage);

    let alice = creds.register("alice", "pw123").unwrap();
    store.add(alice.userid, "first", "1", Priority::Low, Category::Work).unwrap();
    store.add(alice.userid, "second", "2", Priority::High, Category::Personal).unwrap();
    store.delete(alice.userid, 1).unwrap();

    let remaining = store.list_ongoing(alice.userid);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "second");
    // Ids stay dense: the surviving task is renumbered to 1.
    assert_eq!(remaining[0].task_id, 1);

    // The next add continues from the dense count.
    let third = store.add(alice.userid, "third", "3", Priority::Low, Category::Work).unwrap();
    assert_eq!(third.task_id, 2);
}

#[test]
fn test_state_survives_reopening_files() {
    let dir = tempdir().unwrap();
    {
        let storage = JsonFileStorage::new(dir.path());
        let store = TaskStore::new(&storage);
        store.add(1, "persisted", "d", Priority::Medium, Category::Shopping).unwrap();
    }
    let storage = JsonFileStorage::new(dir.path());
    let store = TaskStore::new(&storage);
    let tasks = store.list_ongoing(1);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "persisted");

    let raw = std::fs::read_to_string(dir.path().join("ongoing.json")).unwrap();
    assert!(raw.contains("\"status\": \"In Progress\""));
}

fn stored_task(id: u32, name: &str, status: &str) -> Value {
    json!({
        "task_id": id,
        "name": name,
        "description": "legacy",
        "priority": "Low",
        "category": "Work",
        "status": status,
        "created_at": "2025-03-01 09:00:00",
        "due_date": "2025-03-02 09:00:00"
    })
}

fn seed(storage: &MemoryStorage, collection: Collection, userid: u32, entries: Vec<Value>) {
    let mut doc = Document::new();
    doc.insert(userid.to_string(), Value::Array(entries));
    storage.save(collection, &doc).unwrap();
}

fn stored_array(storage: &MemoryStorage, collection: Collection, userid: u32) -> Vec<Value> {
    match storage.load(collection).get(&userid.to_string()) {
        Some(Value::Array(items)) => items.clone(),
        other => panic!("expected an array, got {:?}", other),
    }
}

#[test]
fn test_unreadable_records_survive_writes() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    seed(
        &storage,
        Collection::Ongoing,
        1,
        vec![stored_task(1, "keep1", "In Progress"), stored_task(2, "keep2", "On Hold"), stored_task(3, "foreign", "En Progreso")],
    );

    let names: Vec<_> = store.list_ongoing(1).into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["keep1", "keep2"]);

    let added = store.add(1, "new", "d", Priority::Low, Category::Work).unwrap();
    assert_eq!(added.task_id, 3);
    store.update(1, 1, FieldUpdate::Name("kept".into())).unwrap();
    store.delete(1, 2).unwrap();

    let names: Vec<_> = store.list_ongoing(1).into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["kept", "new"]);
    let raw = stored_array(&storage, Collection::Ongoing, 1);
    assert_eq!(raw.len(), 3);
    assert!(raw.contains(&stored_task(3, "foreign", "En Progreso")));
}

#[test]
fn test_gapped_ids_are_renumbered_on_load() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    seed(
        &storage,
        Collection::Ongoing,
        1,
        vec![stored_task(1, "a", "In Progress"), stored_task(3, "b", "In Progress")],
    );

    assert_eq!(ids(&store.list_ongoing(1)), vec![1, 2]);
    assert_eq!(store.find(1, 2).unwrap().name, "b");

    let added = store.add(1, "c", "d", Priority::Low, Category::Work).unwrap();
    assert_eq!(added.task_id, 3);
    assert_eq!(ids(&store.list_ongoing(1)), vec![1, 2, 3]);
    let stored: Vec<_> = stored_array(&storage, Collection::Ongoing, 1)
        .iter()
        .map(|v| v["task_id"].as_u64().unwrap())
        .collect();
    assert_eq!(stored, vec![1, 2, 3]);
}

#[test]
fn test_completed_id_follows_highest_existing() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    let mut legacy = stored_task(0, "old", "Completed");
    let entry = legacy.as_object_mut().unwrap();
    entry.remove("task_id");
    entry.insert("completed_id".into(), json!(4));
    entry.insert("completed_at".into(), json!("2025-03-02 10:00:00"));
    seed(&storage, Collection::Completed, 1, vec![legacy]);

    store.add(1, "T1", "D1", Priority::Low, Category::Work).unwrap();
    assert_eq!(store.delete(1, 1).unwrap().completed_id, 5);
    assert_eq!(store.list_completed(1).len(), 2);
}

#[test]
fn test_legacy_fields_stay_absent_in_completed_records() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    let mut legacy = stored_task(1, "legacy", "In Progress");
    let entry = legacy.as_object_mut().unwrap();
    entry.remove("priority");
    entry.remove("category");
    seed(&storage, Collection::Ongoing, 1, vec![legacy]);

    let done = store.delete(1, 1).unwrap();
    assert_eq!(done.priority, None);
    let raw = stored_array(&storage, Collection::Completed, 1);
    assert!(raw[0].get("priority").is_none());
    assert!(raw[0].get("category").is_none());
}

fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap().and_hms_opt(9, 0, 0).unwrap()
}

fn task(id: u32, priority: Option<Priority>, category: Option<Category>, status: Status, day: u32) -> Task {
    Task {
        task_id: id,
        name: format!("t{}", id),
        description: String::new(),
        priority,
        category,
        status,
        created_at: at(day),
        due_date: at(day) + Duration::days(1),
    }
}

fn ids(tasks: &[Task]) -> Vec<u32> {
    tasks.iter().map(|t| t.task_id).collect()
}

#[test]
fn test_sort_orders() {
    let tasks = vec![
        task(1, Some(Priority::Low), Some(Category::Work), Status::OnHold, 3),
        task(2, Some(Priority::Urgent), Some(Category::Health), Status::InProgress, 1),
        task(3, None, None, Status::AlmostDone, 2),
        task(4, Some(Priority::Urgent), Some(Category::Other), Status::Completed, 5),
        task(5, Some(Priority::Medium), Some(Category::Personal), Status::InProgress, 4),
    ];

    let mut by_priority = tasks.clone();
    sort_tasks(&mut by_priority, SortKey::Priority);
    // Ties keep insertion order; missing priority sorts after Low.
    assert_eq!(ids(&by_priority), vec![2, 4, 5, 1, 3]);

    let mut by_due = tasks.clone();
    sort_tasks(&mut by_due, SortKey::DueDate);
    assert_eq!(ids(&by_due), vec![2, 3, 1, 5, 4]);

    let mut by_category = tasks.clone();
    sort_tasks(&mut by_category, SortKey::Category);
    assert_eq!(ids(&by_category), vec![2, 4, 5, 1, 3]);

    let mut by_status = tasks.clone();
    sort_tasks(&mut by_status, SortKey::Status);
    // "Almost Done" < "Completed" < "In Progress" < "On Hold"
    assert_eq!(ids(&by_status), vec![3, 4, 2, 5, 1]);

    let mut by_created = tasks;
    sort_tasks(&mut by_created, SortKey::CreatedAt);
    assert_eq!(ids(&by_created), vec![2, 3, 1, 5, 4]);
}
