use chrono::{Duration, Local, NaiveDateTime, Timelike};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StorageError, TaskError};
use crate::models::{Category, CompletedTask, FieldUpdate, Priority, SortKey, Status, Task};
use crate::storage::{Collection, Document, Storage};

/// Owns every user's ongoing and completed task collections.
///
/// Tasks are keyed by the stringified userid. Ongoing task ids are kept
/// dense: they are renumbered `1..N` in stored order whenever a list is
/// loaded, so a delete or a gap left by older versions never produces a
/// duplicate id.
pub struct TaskStore<S> {
    storage: S,
}

impl<S: Storage> TaskStore<S> {
    pub fn new(storage: S) -> TaskStore<S> {
        TaskStore { storage }
    }

    /// Ongoing tasks of `userid` in stored order. Empty if there are none.
    pub fn list_ongoing(&self, userid: u32) -> Vec<Task> {
        let doc = self.storage.load(Collection::Ongoing);
        read_ongoing(&doc, userid).records
    }

    pub fn list_completed(&self, userid: u32) -> Vec<CompletedTask> {
        let doc = self.storage.load(Collection::Completed);
        Entries::read(&doc, userid).records
    }

    pub fn find(&self, userid: u32, task_id: u32) -> Option<Task> {
        self.list_ongoing(userid).into_iter().find(|t| t.task_id == task_id)
    }

    /// Appends a new task. Due one day after creation, status `InProgress`.
    pub fn add(
        &self,
        userid: u32,
        name: &str,
        description: &str,
        priority: Priority,
        category: Category,
    ) -> Result<Task> {
        let name = non_empty(name, "name")?;
        let description = non_empty(description, "description")?;

        let mut doc = self.storage.load(Collection::Ongoing);
        let mut tasks = read_ongoing(&doc, userid);
        let created_at = now();
        let task = Task {
            task_id: tasks.records.len() as u32 + 1,
            name,
            description,
            priority: Some(priority),
            category: Some(category),
            status: Status::InProgress,
            created_at,
            due_date: created_at + Duration::days(1),
        };
        tasks.records.push(task.clone());
        tasks.write(&mut doc, userid)?;
        self.storage.save(Collection::Ongoing, &doc)?;

        tracing::info!(userid, task_id = task.task_id, "task added");
        Ok(task)
    }

    /// Applies one field update to task `task_id`; the id never changes.
    pub fn update(&self, userid: u32, task_id: u32, update: FieldUpdate) -> Result<Task> {
        let update = match update {
            FieldUpdate::Name(n) => FieldUpdate::Name(non_empty(&n, "name")?),
            FieldUpdate::Description(d) => FieldUpdate::Description(non_empty(&d, "description")?),
            other => other,
        };

        let mut doc = self.storage.load(Collection::Ongoing);
        let mut tasks = read_ongoing(&doc, userid);
        let task = tasks
            .records
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or(TaskError::TaskNotFound(task_id))?;
        update.apply(task);
        let updated = task.clone();

        tasks.write(&mut doc, userid)?;
        self.storage.save(Collection::Ongoing, &doc)?;

        tracing::info!(userid, task_id, "task updated");
        Ok(updated)
    }

    /// Moves task `task_id` into the completed collection.
    ///
    /// The completed collection is written first. If the ongoing write then
    /// fails, the completed collection is restored and the error returned.
    pub fn delete(&self, userid: u32, task_id: u32) -> Result<CompletedTask> {
        let mut ongoing_doc = self.storage.load(Collection::Ongoing);
        let mut tasks = read_ongoing(&ongoing_doc, userid);
        let pos = tasks
            .records
            .iter()
            .position(|t| t.task_id == task_id)
            .ok_or(TaskError::TaskNotFound(task_id))?;
        let removed = tasks.records.remove(pos);
        renumber(&mut tasks.records);

        let completed_before = self.storage.load(Collection::Completed);
        let mut completed_doc = completed_before.clone();
        let mut completed: Entries<CompletedTask> = Entries::read(&completed_doc, userid);
        let record = CompletedTask::from_task(&removed, next_completed_id(&completed), now());
        completed.records.push(record.clone());

        completed.write(&mut completed_doc, userid)?;
        tasks.write(&mut ongoing_doc, userid)?;

        self.storage.save(Collection::Completed, &completed_doc)?;
        if let Err(e) = self.storage.save(Collection::Ongoing, &ongoing_doc) {
            if let Err(rollback) = self.storage.save(Collection::Completed, &completed_before) {
                tracing::warn!(userid, task_id, error = %rollback, "completed collection rollback failed");
            }
            return Err(e.into());
        }

        tracing::info!(userid, task_id, completed_id = record.completed_id, "task completed");
        Ok(record)
    }
}

/// Sorts for display only; stable, so ties keep insertion order.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    match key {
        SortKey::Priority => tasks.sort_by_key(|t| t.priority.map_or(u8::MAX, Priority::rank)),
        SortKey::DueDate => tasks.sort_by_key(|t| t.due_date),
        SortKey::Category => tasks.sort_by(|a, b| {
            let a = a.category.map(Category::as_str);
            let b = b.category.map(Category::as_str);
            match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        }),
        SortKey::Status => tasks.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
        SortKey::CreatedAt => tasks.sort_by_key(|t| t.created_at),
    }
}

/// Current local time truncated to the persisted precision.
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn non_empty(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TaskError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(value.to_string())
}

/// One user's stored array: the records that parse, and the raw values
/// that don't. Unreadable values are written back untouched, after the
/// records.
struct Entries<T> {
    records: Vec<T>,
    unreadable: Vec<Value>,
}

impl<T: DeserializeOwned> Entries<T> {
    fn read(doc: &Document, userid: u32) -> Entries<T> {
        let mut entries = Entries { records: Vec::new(), unreadable: Vec::new() };
        match doc.get(&userid.to_string()) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for item in items {
                    match serde_json::from_value(item.clone()) {
                        Ok(record) => entries.records.push(record),
                        Err(e) => {
                            tracing::warn!(userid, error = %e, "unreadable task record kept as is");
                            entries.unreadable.push(item.clone());
                        }
                    }
                }
            }
            Some(other) => {
                tracing::warn!(userid, "task list is not an array, kept as is");
                entries.unreadable.push(other.clone());
            }
        }
        entries
    }
}

impl<T: Serialize> Entries<T> {
    fn write(&self, doc: &mut Document, userid: u32) -> Result<()> {
        let mut items = Vec::with_capacity(self.records.len() + self.unreadable.len());
        for record in &self.records {
            let value = serde_json::to_value(record).map_err(|source| StorageError::EncodeEntries {
                key: userid.to_string(),
                source,
            })?;
            items.push(value);
        }
        items.extend(self.unreadable.iter().cloned());
        doc.insert(userid.to_string(), Value::Array(items));
        Ok(())
    }
}

fn read_ongoing(doc: &Document, userid: u32) -> Entries<Task> {
    let mut entries = Entries::read(doc, userid);
    if renumber(&mut entries.records) {
        tracing::debug!(userid, "ongoing ids were not dense, renumbered");
    }
    entries
}

/// Assigns ids `1..N` in order; returns whether any id changed.
fn renumber(tasks: &mut [Task]) -> bool {
    let mut changed = false;
    for (i, t) in tasks.iter_mut().enumerate() {
        let id = i as u32 + 1;
        changed |= t.task_id != id;
        t.task_id = id;
    }
    changed
}

/// One past the highest completed id, unreadable records included.
fn next_completed_id(completed: &Entries<CompletedTask>) -> u32 {
    let raw_ids = completed
        .unreadable
        .iter()
        .filter_map(|v| v.get("completed_id").and_then(Value::as_u64))
        .filter_map(|id| u32::try_from(id).ok());
    completed
        .records
        .iter()
        .map(|c| c.completed_id)
        .chain(raw_ids)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}
