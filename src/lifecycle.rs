//! Add/edit/delete/view orchestration on top of [`TaskStore`].
//!
//! Interactive callers select enum values by 1-based menu index. Everything
//! in here validates those selections before the store is touched, so a bad
//! selection fails with `InvalidInput` and never mutates state.

use crate::error::{Result, TaskError};
use crate::models::{Category, CompletedTask, FieldUpdate, Priority, SortKey, Status, Task, User};
use crate::storage::Storage;
use crate::store::{sort_tasks, TaskStore};

/// Which task attribute an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Description,
    Status,
    Priority,
    Category,
}

impl EditField {
    pub const ALL: [EditField; 5] = [
        EditField::Name,
        EditField::Description,
        EditField::Status,
        EditField::Priority,
        EditField::Category,
    ];

    /// Whether the value is picked from a numbered list rather than typed.
    pub fn is_choice(self) -> bool {
        matches!(self, EditField::Status | EditField::Priority | EditField::Category)
    }
}

/// Parses a 1-based menu selection into one of `options`.
pub fn pick<T: Copy>(options: &[T], raw: &str) -> Result<T> {
    let idx: usize = raw
        .trim()
        .parse()
        .map_err(|_| TaskError::InvalidInput(format!("'{}' is not a number", raw.trim())))?;
    if idx == 0 || idx > options.len() {
        return Err(TaskError::InvalidInput(format!(
            "choice must be between 1 and {}",
            options.len()
        )));
    }
    Ok(options[idx - 1])
}

pub fn parse_priority(raw: &str) -> Result<Priority> {
    pick(&Priority::ALL, raw)
}

pub fn parse_category(raw: &str) -> Result<Category> {
    pick(&Category::ALL, raw)
}

pub fn parse_status(raw: &str) -> Result<Status> {
    pick(&Status::ALL, raw)
}

pub fn parse_sort_key(raw: &str) -> Result<SortKey> {
    pick(&SortKey::ALL, raw)
}

pub fn parse_edit_field(raw: &str) -> Result<EditField> {
    pick(&EditField::ALL, raw)
}

/// Turns a field selection plus raw user value into a typed update.
///
/// Text fields take the value as typed; enum fields expect a menu index.
pub fn build_update(field: EditField, raw: &str) -> Result<FieldUpdate> {
    let update = match field {
        EditField::Name => FieldUpdate::Name(require_text(raw, "name")?),
        EditField::Description => FieldUpdate::Description(require_text(raw, "description")?),
        EditField::Status => FieldUpdate::Status(parse_status(raw)?),
        EditField::Priority => FieldUpdate::Priority(parse_priority(raw)?),
        EditField::Category => FieldUpdate::Category(parse_category(raw)?),
    };
    Ok(update)
}

fn require_text(raw: &str, field: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TaskError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(value.to_string())
}

/// An authenticated user bound to the task store.
pub struct Session<'a, S> {
    user: User,
    store: &'a TaskStore<S>,
}

impl<'a, S: Storage> Session<'a, S> {
    pub fn new(user: User, store: &'a TaskStore<S>) -> Session<'a, S> {
        Session { user, store }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn add(&self, name: &str, description: &str, priority: Priority, category: Category) -> Result<Task> {
        self.store.add(self.user.userid, name, description, priority, category)
    }

    /// Ongoing tasks ordered by `key`.
    pub fn view(&self, key: SortKey) -> Vec<Task> {
        let mut tasks = self.store.list_ongoing(self.user.userid);
        sort_tasks(&mut tasks, key);
        tasks
    }

    /// Ongoing tasks in stored (id) order.
    pub fn tasks(&self) -> Vec<Task> {
        self.store.list_ongoing(self.user.userid)
    }

    pub fn edit(&self, task_id: u32, update: FieldUpdate) -> Result<Task> {
        self.store.update(self.user.userid, task_id, update)
    }

    /// Moves a task to the completed collection.
    pub fn complete(&self, task_id: u32) -> Result<CompletedTask> {
        self.store.delete(self.user.userid, task_id)
    }

    pub fn completed(&self) -> Vec<CompletedTask> {
        self.store.list_completed(self.user.userid)
    }
}
