//! services/api/src/adapters/users.rs
//!
//! Flat-file implementation of the `UserStore` port. Users live in a single
//! `users.json` array. All read-modify-write cycles are serialized behind an
//! async mutex, and overwrites go through a temp-file rename so a crash can
//! never leave a half-written store.

use std::path::{Path, PathBuf};

use admission_core::domain::{Role, User};
use admission_core::ports::{PortError, PortResult, UserStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::password;

/// Credentials the store synthesizes when it bootstraps an empty system.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A `UserStore` backed by a JSON file.
#[derive(Debug)]
pub struct JsonUserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonUserStore {
    /// Opens the store, creating it with a default Admin account when the
    /// backing file does not exist yet.
    ///
    /// Existing files get missing optional fields back-filled with defaults,
    /// and the fix is persisted. A file that exists but cannot be parsed is
    /// a fatal condition (`PortError::Corrupt`) — never silently replaced.
    pub async fn open(path: impl Into<PathBuf>) -> PortResult<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };

        let _guard = store.lock.lock().await;
        if tokio::fs::try_exists(&store.path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
        {
            store.backfill_missing_fields().await?;
        } else {
            store.bootstrap_default_admin().await?;
        }
        drop(_guard);

        Ok(store)
    }

    async fn bootstrap_default_admin(&self) -> PortResult<()> {
        let hashed = password::hash(DEFAULT_ADMIN_PASSWORD)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let admin = UserRecord {
            name: "Administrator".to_string(),
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            email: "admin@bfgi.com".to_string(),
            mobile: "9999999999".to_string(),
            password: hashed,
            role: Role::Admin.as_str().to_string(),
        };
        write_records(&self.path, &[admin]).await
    }

    /// Patches records that predate optional fields, persisting the fix once.
    async fn backfill_missing_fields(&self) -> PortResult<()> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| PortError::Corrupt(format!("{}: {e}", self.path.display())))?;
        let mut entries: Vec<Value> = serde_json::from_slice(&raw)
            .map_err(|e| PortError::Corrupt(format!("{}: {e}", self.path.display())))?;

        let mut updated = false;
        for entry in entries.iter_mut() {
            let Some(obj) = entry.as_object_mut() else {
                return Err(PortError::Corrupt(format!(
                    "{}: user entry is not an object",
                    self.path.display()
                )));
            };
            for (field, default) in [
                ("name", "User"),
                ("email", "Not Set"),
                ("mobile", "Not Set"),
                ("role", Role::Student.as_str()),
            ] {
                if !obj.contains_key(field) {
                    obj.insert(field.to_string(), Value::String(default.to_string()));
                    updated = true;
                }
            }
        }

        // Parse now so a structurally broken file fails startup here.
        let records: Vec<UserRecord> = serde_json::from_value(Value::Array(entries.clone()))
            .map_err(|e| PortError::Corrupt(format!("{}: {e}", self.path.display())))?;

        if updated {
            write_records(&self.path, &records).await?;
        }
        Ok(())
    }

    async fn read_records(&self) -> PortResult<Vec<UserRecord>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| PortError::Corrupt(format!("{}: {e}", self.path.display())))?;
        serde_json::from_slice(&raw)
            .map_err(|e| PortError::Corrupt(format!("{}: {e}", self.path.display())))
    }
}

//=========================================================================================
// "Impure" File Record Struct
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct UserRecord {
    name: String,
    username: String,
    email: String,
    mobile: String,
    /// The salted hash; the field keeps its historical file name.
    password: String,
    role: String,
}

impl UserRecord {
    fn to_domain(&self) -> User {
        User {
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            password_hash: self.password.clone(),
            // Unknown role strings demote to Student rather than aborting.
            role: Role::parse(&self.role).unwrap_or(Role::Student),
        }
    }

    fn from_domain(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            password: user.password_hash.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// Atomic overwrite: write a sibling temp file, then rename over the target.
async fn write_records(path: &Path, records: &[UserRecord]) -> PortResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
    }
    let body = serde_json::to_vec_pretty(records).map_err(|e| PortError::Unexpected(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for JsonUserStore {
    async fn list(&self) -> PortResult<Vec<User>> {
        let _guard = self.lock.lock().await;
        let records = self.read_records().await?;
        Ok(records.iter().map(UserRecord::to_domain).collect())
    }

    async fn find_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let _guard = self.lock.lock().await;
        let records = self.read_records().await?;
        Ok(records
            .iter()
            .find(|r| r.username == username)
            .map(UserRecord::to_domain))
    }

    async fn insert(&self, user: User) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        if records.iter().any(|r| r.username == user.username) {
            return Err(PortError::Duplicate(user.username));
        }
        records.push(UserRecord::from_domain(&user));
        write_records(&self.path, &records).await
    }

    async fn remove(&self, username: &str) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        records.retain(|r| r.username != username);
        write_records(&self.path, &records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("users.json")
    }

    fn student(username: &str) -> User {
        User {
            name: "Some Student".to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            mobile: "1234567890".to_string(),
            password_hash: "$argon2$fake".to_string(),
            role: Role::Student,
        }
    }

    #[tokio::test]
    async fn bootstrap_creates_exactly_one_admin_with_the_default_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonUserStore::open(store_path(&dir)).await.unwrap();

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, DEFAULT_ADMIN_USERNAME);
        assert_eq!(users[0].role, Role::Admin);
        assert!(password::verify(DEFAULT_ADMIN_PASSWORD, &users[0].password_hash));
    }

    #[tokio::test]
    async fn duplicate_insert_fails_and_leaves_the_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonUserStore::open(store_path(&dir)).await.unwrap();
        store.insert(student("bob")).await.unwrap();

        let before = tokio::fs::read(store_path(&dir)).await.unwrap();
        let err = store.insert(student("bob")).await.unwrap_err();
        assert!(matches!(err, PortError::Duplicate(ref u) if u == "bob"));

        let after = tokio::fs::read(store_path(&dir)).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn remove_deletes_exactly_one_record_and_missing_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonUserStore::open(store_path(&dir)).await.unwrap();
        store.insert(student("bob")).await.unwrap();
        store.insert(student("carol")).await.unwrap();

        store.remove("bob").await.unwrap();
        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.username != "bob"));
        assert!(users.iter().any(|u| u.username == "carol"));

        // Removing a username that was never registered still succeeds.
        store.remove("ghost").await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_optional_fields_are_backfilled_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        std::fs::write(
            &path,
            r#"[{"username": "old-timer", "password": "$argon2$fake"}]"#,
        )
        .unwrap();

        let store = JsonUserStore::open(&path).await.unwrap();
        let users = store.list().await.unwrap();
        assert_eq!(users[0].name, "User");
        assert_eq!(users[0].email, "Not Set");
        assert_eq!(users[0].mobile, "Not Set");
        assert_eq!(users[0].role, Role::Student);

        // The fix was written back to disk, not just patched in memory.
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("Not Set"));
    }

    #[tokio::test]
    async fn corrupt_store_is_a_fatal_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_path(&dir);
        std::fs::write(&path, "this is not json").unwrap();

        let err = JsonUserStore::open(&path).await.unwrap_err();
        assert!(matches!(err, PortError::Corrupt(_)));
    }
}
