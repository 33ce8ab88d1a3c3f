//! services/api/src/adapters/admissions.rs
//!
//! Flat-file implementation of the `AdmissionStore` port. Applications are an
//! append-only JSON array: records get a server-assigned timestamp and are
//! never mutated or deleted. The mutex + temp-file rename keeps concurrent
//! applies from dropping each other's records.

use std::path::{Path, PathBuf};

use admission_core::domain::Application;
use admission_core::ports::{AdmissionStore, PortError, PortResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

/// An `AdmissionStore` backed by a JSON file.
pub struct JsonAdmissionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonAdmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Missing file means no applications yet; a present-but-unreadable file
    /// is surfaced, not replaced.
    async fn read_records(&self) -> PortResult<Vec<ApplicationRecord>> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => serde_json::from_slice(&raw)
                .map_err(|e| PortError::Corrupt(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(PortError::Corrupt(format!("{}: {e}", self.path.display()))),
        }
    }
}

//=========================================================================================
// "Impure" File Record Struct
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct ApplicationRecord {
    name: String,
    email: String,
    mobile: String,
    course: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
    /// Server-assigned submission timestamp.
    time: DateTime<Utc>,
}

impl ApplicationRecord {
    fn to_domain(&self) -> Application {
        Application {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            course: self.course.clone(),
            extra: self.extra.clone(),
            submitted_at: Some(self.time),
        }
    }

    fn from_domain(application: &Application, time: DateTime<Utc>) -> Self {
        Self {
            name: application.name.clone(),
            email: application.email.clone(),
            mobile: application.mobile.clone(),
            course: application.course.clone(),
            extra: application.extra.clone(),
            time,
        }
    }
}

async fn write_records(path: &Path, records: &[ApplicationRecord]) -> PortResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
    }
    let body =
        serde_json::to_vec_pretty(records).map_err(|e| PortError::Unexpected(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `AdmissionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AdmissionStore for JsonAdmissionStore {
    async fn append(&self, application: Application) -> PortResult<Application> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        let stamped = ApplicationRecord::from_domain(&application, Utc::now());
        let stored = stamped.to_domain();
        records.push(stamped);
        write_records(&self.path, &records).await?;
        Ok(stored)
    }

    async fn list(&self) -> PortResult<Vec<Application>> {
        let _guard = self.lock.lock().await;
        let records = self.read_records().await?;
        Ok(records.iter().map(ApplicationRecord::to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(name: &str, course: &str) -> Application {
        Application {
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            mobile: "123".to_string(),
            course: course.to_string(),
            extra: Map::new(),
            submitted_at: None,
        }
    }

    #[tokio::test]
    async fn append_assigns_a_server_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonAdmissionStore::new(dir.path().join("admissions.json"));

        let before = Utc::now();
        let stored = store.append(application("A", "BCA")).await.unwrap();
        let after = Utc::now();

        let stamp = stored.submitted_at.unwrap();
        assert!(stamp >= before && stamp <= after);
    }

    #[tokio::test]
    async fn sequential_applies_accumulate_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonAdmissionStore::new(dir.path().join("admissions.json"));

        store.append(application("A", "BCA")).await.unwrap();
        store.append(application("B", "MCA")).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "A");
        assert_eq!(all[0].course, "BCA");
        assert_eq!(all[1].name, "B");
    }

    #[tokio::test]
    async fn free_form_fields_survive_the_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonAdmissionStore::new(dir.path().join("admissions.json"));

        let mut app = application("A", "BCA");
        app.extra
            .insert("hostel".to_string(), Value::Bool(true));
        store.append(app).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all[0].extra.get("hostel"), Some(&Value::Bool(true)));
    }
}
