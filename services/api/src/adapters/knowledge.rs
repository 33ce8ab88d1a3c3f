//! services/api/src/adapters/knowledge.rs
//!
//! File-backed implementation of the `KnowledgeStore` port: a single text
//! blob describing the college. A default template is written on first use;
//! after that the application only ever reads it (edits happen out of band).

use std::path::PathBuf;

use admission_core::ports::{KnowledgeStore, PortError, PortResult};
use async_trait::async_trait;
use tokio::sync::Mutex;

const DEFAULT_COLLEGE_INFO: &str = "\
Baba Farid Group of Institutions (BFGI)

Courses:
- BCA
- MCA
- B.Tech
- MBA
- BBA
- B.Com

Fees:
BCA: 45000
MCA: 60000
B.Tech: 80000
MBA: 70000

Location:
Bathinda, Punjab

Contact:
info@bfgi.com
";

/// A `KnowledgeStore` backed by a plain text file.
pub struct FileKnowledgeStore {
    path: PathBuf,
    // Serializes the one-time bootstrap write; reads race freely after that.
    bootstrap: Mutex<()>,
}

impl FileKnowledgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bootstrap: Mutex::new(()),
        }
    }
}

#[async_trait]
impl KnowledgeStore for FileKnowledgeStore {
    async fn load(&self) -> PortResult<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let _guard = self.bootstrap.lock().await;
                // Another request may have bootstrapped while we waited.
                if let Ok(text) = tokio::fs::read_to_string(&self.path).await {
                    return Ok(text);
                }
                if let Some(parent) = self.path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| PortError::Unexpected(e.to_string()))?;
                }
                tokio::fs::write(&self.path, DEFAULT_COLLEGE_INFO)
                    .await
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                Ok(DEFAULT_COLLEGE_INFO.to_string())
            }
            Err(e) => Err(PortError::Corrupt(format!("{}: {e}", self.path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_load_writes_the_default_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("college_info.txt");
        let store = FileKnowledgeStore::new(&path);

        let text = store.load().await.unwrap();
        assert!(text.contains("Baba Farid Group of Institutions"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn existing_content_is_returned_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("college_info.txt");
        std::fs::write(&path, "Custom prospectus").unwrap();

        let store = FileKnowledgeStore::new(&path);
        assert_eq!(store.load().await.unwrap(), "Custom prospectus");
    }
}
