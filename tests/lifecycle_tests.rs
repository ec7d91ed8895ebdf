use taskkeep::error::TaskError;
use taskkeep::lifecycle::{
    build_update, parse_category, parse_edit_field, parse_priority, parse_sort_key, parse_status, EditField, Session,
};
use taskkeep::models::{Category, FieldUpdate, Priority, SortKey, Status, User};
use taskkeep::storage::MemoryStorage;
use taskkeep::store::TaskStore;

fn user(userid: u32) -> User {
    User { username: format!("user{}", userid), userid, password_hash: String::new() }
}

#[test]
fn test_menu_indices_follow_menu_order() {
    assert_eq!(parse_priority("1").unwrap(), Priority::Low);
    assert_eq!(parse_priority(" 4 ").unwrap(), Priority::Urgent);
    assert_eq!(parse_category("3").unwrap(), Category::Shopping);
    assert_eq!(parse_category("6").unwrap(), Category::Other);
    assert_eq!(parse_status("2").unwrap(), Status::OnHold);
    assert_eq!(parse_sort_key("5").unwrap(), SortKey::CreatedAt);
    assert_eq!(parse_edit_field("3").unwrap(), EditField::Status);
}

#[test]
fn test_out_of_range_or_non_numeric_is_invalid_input() {
    for raw in ["0", "5", "-1", "abc", ""] {
        assert!(matches!(parse_priority(raw), Err(TaskError::InvalidInput(_))), "{raw}");
    }
    assert!(matches!(parse_category("7"), Err(TaskError::InvalidInput(_))));
    assert!(matches!(parse_sort_key("6"), Err(TaskError::InvalidInput(_))));
}

#[test]
fn test_build_update_variants() {
    assert_eq!(build_update(EditField::Name, " New ").unwrap(), FieldUpdate::Name("New".into()));
    assert_eq!(build_update(EditField::Description, "desc").unwrap(), FieldUpdate::Description("desc".into()));
    assert_eq!(build_update(EditField::Status, "3").unwrap(), FieldUpdate::Status(Status::AlmostDone));
    assert_eq!(build_update(EditField::Priority, "2").unwrap(), FieldUpdate::Priority(Priority::Medium));
    assert_eq!(build_update(EditField::Category, "5").unwrap(), FieldUpdate::Category(Category::Study));
}

#[test]
fn test_build_update_rejects_bad_values() {
    assert!(matches!(build_update(EditField::Name, "  "), Err(TaskError::InvalidInput(_))));
    assert!(matches!(build_update(EditField::Status, "High"), Err(TaskError::InvalidInput(_))));
    assert!(matches!(build_update(EditField::Category, "9"), Err(TaskError::InvalidInput(_))));
}

#[test]
fn test_invalid_edit_does_not_mutate() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    let session = Session::new(user(1), &store);
    session.add("T1", "D1", Priority::Low, Category::Work).unwrap();
    let before = session.tasks();

    let result = build_update(EditField::Priority, "9").and_then(|u| session.edit(1, u));
    assert!(result.is_err());
    assert_eq!(session.tasks(), before);
}

#[test]
fn test_session_is_scoped_to_its_user() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    let alice = Session::new(user(1), &store);
    let bob = Session::new(user(2), &store);

    alice.add("Report", "write it", Priority::Medium, Category::Work).unwrap();
    alice.add("Milk", "buy", Priority::Urgent, Category::Shopping).unwrap();
    bob.add("Run", "5k", Priority::Low, Category::Health).unwrap();

    let sorted = alice.view(SortKey::Priority);
    assert_eq!(sorted.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["Milk", "Report"]);
    assert_eq!(bob.tasks().len(), 1);

    alice.complete(2).unwrap();
    assert_eq!(alice.completed().len(), 1);
    assert!(bob.completed().is_empty());
    assert!(matches!(bob.edit(2, FieldUpdate::Name("x".into())), Err(TaskError::TaskNotFound(2))));
}

#[test]
fn test_sort_key_cycles() {
    let mut key = SortKey::Priority;
    for _ in 0..SortKey::ALL.len() {
        key = key.next();
    }
    assert_eq!(key, SortKey::Priority);
    assert_eq!(SortKey::CreatedAt.next(), SortKey::Priority);
}
