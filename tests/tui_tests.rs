use taskkeep::i18n::Language;
use taskkeep::lifecycle::{EditField, Session};
use taskkeep::models::{Category, Priority, SortKey, Status, User};
use taskkeep::storage::MemoryStorage;
use taskkeep::store::TaskStore;
use taskkeep::tui::app::{App, InputMode, ViewMode};

fn user() -> User {
    User { username: "alice".into(), userid: 1, password_hash: String::new() }
}

fn type_and_enter<S: taskkeep::storage::Storage>(app: &mut App<'_, S>, text: &str) {
    app.input_buffer = text.to_string();
    app.handle_input();
}

#[test]
fn test_add_wizard_creates_task() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    let mut app = App::new(Session::new(user(), &store), Language::En);
    assert!(app.tasks.is_empty());
    assert_eq!(app.state.selected(), None);

    app.start_add();
    assert_eq!(app.input_mode, InputMode::Adding);
    type_and_enter(&mut app, "Write report");
    type_and_enter(&mut app, "quarterly numbers");
    type_and_enter(&mut app, "9"); // rejected, stays on priority step
    assert_eq!(app.add_state.step, 2);
    assert!(app.status_line.as_deref().unwrap_or_default().contains("between 1 and 4"));
    type_and_enter(&mut app, "4");
    type_and_enter(&mut app, "1");

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.tasks[0].priority, Some(Priority::Urgent));
    assert_eq!(app.tasks[0].category, Some(Category::Work));
    assert_eq!(app.state.selected(), Some(0));
    assert_eq!(app.status_line.as_deref(), Some("Task 1 added."));
}

#[test]
fn test_edit_and_complete_selected() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "A", "a", Priority::Low, Category::Work).unwrap();
    store.add(1, "B", "b", Priority::Urgent, Category::Work).unwrap();
    let mut app = App::new(Session::new(user(), &store), Language::En);

    // Sorted by priority: B first.
    assert_eq!(app.tasks[0].name, "B");
    app.start_edit(EditField::Name);
    assert_eq!(app.input_buffer, "B");
    type_and_enter(&mut app, "B2");
    assert_eq!(store.find(1, 2).unwrap().name, "B2");

    app.start_edit(EditField::Status);
    type_and_enter(&mut app, "3");
    assert_eq!(store.find(1, 2).unwrap().status, Status::AlmostDone);

    app.next();
    assert_eq!(app.selected_task().unwrap().name, "A");
    app.complete_selected();
    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.completed.len(), 1);
    assert_eq!(app.completed[0].name, "A");
    // Remaining task was renumbered.
    assert_eq!(app.tasks[0].task_id, 1);
}

#[test]
fn test_navigation_sort_and_views() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "A", "a", Priority::Low, Category::Work).unwrap();
    store.add(1, "B", "b", Priority::High, Category::Health).unwrap();
    let mut app = App::new(Session::new(user(), &store), Language::En);

    app.previous();
    assert_eq!(app.state.selected(), Some(1));
    app.next();
    assert_eq!(app.state.selected(), Some(0));

    app.cycle_sort();
    assert_eq!(app.sort_key, SortKey::DueDate);
    assert_eq!(app.tasks[0].name, "A");

    app.toggle_view();
    assert_eq!(app.view_mode, ViewMode::Completed);
    assert_eq!(app.state.selected(), None);
    assert!(app.selected_task().is_none());
    app.start_add();
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_cancel_leaves_task_untouched() {
    let storage = MemoryStorage::new();
    let store = TaskStore::new(&storage);
    store.add(1, "A", "a", Priority::Low, Category::Work).unwrap();
    let mut app = App::new(Session::new(user(), &store), Language::En);

    app.start_edit(EditField::Description);
    app.input_buffer.push_str(" more");
    app.cancel_input();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(store.find(1, 1).unwrap().description, "a");
}
