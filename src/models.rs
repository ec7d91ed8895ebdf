use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// On-disk timestamp layout shared by every task record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A registered account as returned by the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub userid: u32,
    pub password_hash: String,
}

/// The value stored under a username in `users.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub userid: u32,
    /// Bcrypt hash, never the plaintext.
    pub password: String,
}

impl User {
    pub fn from_record(username: &str, record: UserRecord) -> User {
        User {
            username: username.to_string(),
            userid: record.userid,
            password_hash: record.password,
        }
    }

    /// Key under which this user's tasks are stored.
    pub fn storage_key(&self) -> String {
        self.userid.to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Menu order used when selecting by 1-based index.
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    /// Sort rank; lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Study,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
        Category::Study,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Study => "Study",
            Category::Other => "Other",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Almost Done")]
    AlmostDone,
    Completed,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::InProgress, Status::OnHold, Status::AlmostDone, Status::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::InProgress => "In Progress",
            Status::OnHold => "On Hold",
            Status::AlmostDone => "Almost Done",
            Status::Completed => "Completed",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a single ongoing task owned by one user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Position-based identifier, dense `1..N` within the owning user.
    pub task_id: u32,
    pub name: String,
    pub description: String,
    /// Absent only on records written by older versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub status: Status,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub due_date: NaiveDateTime,
}

/// A task that has been moved out of the ongoing collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletedTask {
    pub completed_id: u32,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub status: Status,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub due_date: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub completed_at: NaiveDateTime,
}

impl CompletedTask {
    /// Builds the completed record for `task`; status is always `Completed`.
    pub fn from_task(task: &Task, completed_id: u32, completed_at: NaiveDateTime) -> CompletedTask {
        CompletedTask {
            completed_id,
            name: task.name.clone(),
            description: task.description.clone(),
            priority: task.priority,
            category: task.category,
            status: Status::Completed,
            created_at: task.created_at,
            due_date: task.due_date,
            completed_at,
        }
    }
}

/// A single-field mutation applied by an edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Description(String),
    Status(Status),
    Priority(Priority),
    Category(Category),
}

impl FieldUpdate {
    pub fn apply(self, task: &mut Task) {
        match self {
            FieldUpdate::Name(name) => task.name = name,
            FieldUpdate::Description(description) => task.description = description,
            FieldUpdate::Status(status) => task.status = status,
            FieldUpdate::Priority(priority) => task.priority = Some(priority),
            FieldUpdate::Category(category) => task.category = Some(category),
        }
    }
}

/// Display orderings offered by the view action. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    DueDate,
    Category,
    Status,
    CreatedAt,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Priority,
        SortKey::DueDate,
        SortKey::Category,
        SortKey::Status,
        SortKey::CreatedAt,
    ];

    /// The next key in menu order, wrapping around.
    pub fn next(self) -> SortKey {
        let idx = SortKey::ALL.iter().position(|k| *k == self).unwrap_or(0);
        SortKey::ALL[(idx + 1) % SortKey::ALL.len()]
    }
}

/// Serde adapter for the `YYYY-MM-DD HH:MM:SS` timestamps.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
