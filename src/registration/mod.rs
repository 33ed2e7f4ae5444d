use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

use crate::{
    tool::ToolBehavior,
    value::{ToolDesc, ToolDescBuilder},
};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("failed to access registration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("registration file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One prospective student's registration of interest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub name: String,
    pub email: String,
    pub interest: String,
}

/// Append-only registration log persisted as a JSON array. Saves do a
/// read-modify-write of the whole file under a lock so concurrent saves
/// through clones of the same store cannot drop records.
#[derive(Clone, Debug)]
pub struct RegistrationStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl RegistrationStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads all records. A missing file reads as empty; a file that
    /// exists but cannot be parsed is an error.
    pub async fn list(&self) -> Result<Vec<RegistrationRecord>, RegistrationError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| RegistrationError::Corrupt {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(RegistrationError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub async fn save(&self, record: RegistrationRecord) -> Result<(), RegistrationError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.list().await?;
        records.push(record);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| RegistrationError::Io {
                    path: self.path.clone(),
                    source,
                })?;
        }
        let bytes = serde_json::to_vec_pretty(&records).map_err(|source| {
            RegistrationError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| RegistrationError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// The agent-facing registration tool. All three fields are required by
/// the parameter schema, so by the time `run` sees the arguments they are
/// known to be strings.
#[derive(Clone, Debug)]
pub struct RegistrationTool {
    store: RegistrationStore,
}

impl RegistrationTool {
    pub fn new(store: RegistrationStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolBehavior for RegistrationTool {
    fn desc(&self) -> ToolDesc {
        ToolDescBuilder::new("save_registration")
            .description(
                "Save a prospective student's registration of interest. Only call \
                 this once you have collected their full name, email address, and \
                 program of interest.",
            )
            .parameters(json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The student's full name"
                    },
                    "email": {
                        "type": "string",
                        "description": "The student's email address"
                    },
                    "interest": {
                        "type": "string",
                        "description": "The program or field the student is interested in"
                    }
                },
                "required": ["name", "email", "interest"]
            }))
            .build()
    }

    async fn run(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        let record: RegistrationRecord = serde_json::from_value(args)?;
        match self.store.save(record).await {
            Ok(()) => Ok(json!({
                "status": "ok",
                "message": "Registration saved successfully!"
            })),
            Err(e) => Ok(json!({
                "status": "error",
                "message": format!("Error saving registration: {e}")
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> RegistrationRecord {
        RegistrationRecord {
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            interest: "Data Science".to_owned(),
        }
    }

    #[tokio::test]
    async fn saves_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistrationStore::new(dir.path().join("registrations.json"));

        store.save(record("Alice")).await.unwrap();
        store.save(record("Bob")).await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Alice");
        assert_eq!(records[1].name, "Bob");
    }

    #[tokio::test]
    async fn missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistrationStore::new(dir.path().join("registrations.json"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registrations.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = RegistrationStore::new(&path);
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, RegistrationError::Corrupt { .. }));
        // and a save against the corrupt file must not clobber it
        assert!(store.save(record("Carol")).await.is_err());
    }

    #[tokio::test]
    async fn concurrent_saves_keep_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistrationStore::new(dir.path().join("registrations.json"));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.save(record(&format!("Student{i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn tool_reports_success_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistrationStore::new(dir.path().join("registrations.json"));
        let tool = RegistrationTool::new(store.clone());

        let result = tool
            .run(json!({
                "name": "Dana",
                "email": "dana@example.com",
                "interest": "Fintech"
            }))
            .await
            .unwrap();
        assert_eq!(result["status"], "ok");
        assert_eq!(result["message"], "Registration saved successfully!");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
