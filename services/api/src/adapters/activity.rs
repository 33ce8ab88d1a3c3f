//! services/api/src/adapters/activity.rs
//!
//! Newline-delimited JSON activity log. One `{time, event, data}` record per
//! line, append-only.

use std::path::PathBuf;

use admission_core::ports::{ActivityLog, PortError, PortResult};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// An `ActivityLog` backed by an append-only file.
pub struct FileActivityLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ActivityLog for FileActivityLog {
    async fn record(&self, event: &str, data: Value) -> PortResult<()> {
        let record = json!({
            "time": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });
        let mut line =
            serde_json::to_vec(&record).map_err(|e| PortError::Unexpected(e.to_string()))?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        file.write_all(&line)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_accumulate_one_json_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileActivityLog::new(dir.path().join("activity.log"));

        log.record("login", json!("admin")).await.unwrap();
        log.record("apply", json!({"name": "A"})).await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("activity.log")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "login");
        assert_eq!(first["data"], "admin");
        assert!(first["time"].is_string());
    }
}
