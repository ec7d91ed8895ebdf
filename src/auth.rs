use std::collections::{BTreeMap, BTreeSet};

use bcrypt::{hash, verify, DEFAULT_COST};
use serde_json::{json, Value};

use crate::error::{Result, TaskError};
use crate::models::{User, UserRecord};
use crate::storage::{Collection, Storage};

/// Owns the user collection. Passwords are only ever stored as bcrypt hashes.
pub struct CredentialStore<S> {
    storage: S,
    cost: u32,
}

impl<S: Storage> CredentialStore<S> {
    pub fn new(storage: S) -> CredentialStore<S> {
        CredentialStore::with_cost(storage, DEFAULT_COST)
    }

    /// Uses a non-default bcrypt cost; tests use the minimum to stay fast.
    pub fn with_cost(storage: S, cost: u32) -> CredentialStore<S> {
        CredentialStore { storage, cost }
    }

    /// Creates a new account and persists it.
    ///
    /// The userid is the smallest positive integer not already taken.
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        require_non_empty(username, "username")?;
        require_non_empty(password, "password")?;

        let mut doc = self.storage.load(Collection::Users);
        if doc.contains_key(username) {
            return Err(TaskError::DuplicateUser(username.to_string()));
        }

        // Malformed records still own their userid, and with it their tasks.
        let taken: BTreeSet<u64> = doc
            .values()
            .filter_map(|value| value.get("userid").and_then(Value::as_u64))
            .collect();
        let mut userid: u32 = 1;
        while taken.contains(&u64::from(userid)) {
            userid += 1;
        }

        let record = UserRecord { userid, password: hash(password, self.cost)? };
        doc.insert(
            username.to_string(),
            json!({ "userid": record.userid, "password": record.password }),
        );
        self.storage.save(Collection::Users, &doc)?;

        tracing::info!(username, userid, "user registered");
        Ok(User::from_record(username, record))
    }

    /// Checks `password` against the stored hash for `username`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        require_non_empty(username, "username")?;
        require_non_empty(password, "password")?;

        let user = self
            .find_user(username)
            .ok_or_else(|| TaskError::UserNotFound(username.to_string()))?;

        match verify(password, &user.password_hash) {
            Ok(true) => {
                tracing::info!(username, userid = user.userid, "user authenticated");
                Ok(user)
            }
            Ok(false) => {
                tracing::info!(username, "password rejected");
                Err(TaskError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "stored hash could not be verified");
                Err(TaskError::InvalidCredentials)
            }
        }
    }

    pub fn find_user(&self, username: &str) -> Option<User> {
        self.list_users().remove(username)
    }

    /// Snapshot of every readable user record, keyed by username.
    pub fn list_users(&self) -> BTreeMap<String, User> {
        self.storage
            .load(Collection::Users)
            .into_iter()
            .filter_map(|(name, value)| parse_record(&name, value).map(|r| (name.clone(), User::from_record(&name, r))))
            .collect()
    }
}

fn parse_record(username: &str, value: Value) -> Option<UserRecord> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(username, error = %e, "skipping malformed user record");
            None
        }
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TaskError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(())
}
