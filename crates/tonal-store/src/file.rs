//! JSON-document variable store persisted on disk.
//!
//! # Design
//! - The whole store lives in one JSON document, re-read on every call so
//!   external edits are observed.
//! - Mutations are serialised by an async mutex and written to a uniquely
//!   named sibling file that is renamed into place; a crash never leaves a
//!   half-written document, and concurrent processes never share a staging
//!   file.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::model::{Variable, VariableCollection, VariableType, VariableValue};
use crate::state::StoreState;
use crate::store::VariableStore;

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    collections: Vec<VariableCollection>,
    #[serde(default)]
    variables: Vec<Variable>,
}

/// Variable store backed by a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store rooted at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the last successful write, if the document exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be read or decoded.
    pub async fn updated_at(&self) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self.read_document().await?.map(|document| document.updated_at))
    }

    async fn read_document(&self) -> StoreResult<Option<StoreDocument>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    operation: "store.read",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                operation: "store.decode",
                path: self.path.clone(),
                source,
            })
    }

    async fn load(&self) -> StoreResult<StoreState> {
        Ok(self
            .read_document()
            .await?
            .map(|document| StoreState {
                collections: document.collections,
                variables: document.variables,
            })
            .unwrap_or_default())
    }

    async fn save(&self, state: StoreState) -> StoreResult<()> {
        let document = StoreDocument {
            version: DOCUMENT_VERSION,
            updated_at: Utc::now(),
            collections: state.collections,
            variables: state.variables,
        };
        let payload =
            serde_json::to_vec_pretty(&document).map_err(|source| StoreError::Serialization {
                operation: "store.encode",
                path: self.path.clone(),
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    operation: "store.create_dir",
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let temp = self.temp_path();
        fs::write(&temp, payload)
            .await
            .map_err(|source| StoreError::Io {
                operation: "store.write",
                path: temp.clone(),
                source,
            })?;
        if let Err(source) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StoreError::Io {
                operation: "store.rename",
                path: self.path.clone(),
                source,
            });
        }
        debug!(path = %self.path.display(), "variable store document written");
        Ok(())
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut StoreState) -> StoreResult<T> + Send,
    ) -> StoreResult<T>
    where
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut state = self.load().await?;
        let output = apply(&mut state)?;
        self.save(state).await?;
        Ok(output)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        PathBuf::from(name)
    }
}

#[async_trait]
impl VariableStore for FileStore {
    async fn collections(&self) -> StoreResult<Vec<VariableCollection>> {
        Ok(self.load().await?.collections)
    }

    async fn variables(&self, collection_id: Uuid) -> StoreResult<Vec<Variable>> {
        self.load().await?.variables_in(collection_id)
    }

    async fn create_variable(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
    ) -> StoreResult<Variable> {
        self.mutate(|state| state.create_variable(collection_id, name, kind))
            .await
    }

    async fn create_variable_with_value(
        &self,
        collection_id: Uuid,
        name: &str,
        kind: VariableType,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<Variable> {
        self.mutate(move |state| {
            state.create_variable_with_value(collection_id, name, kind, mode_id, value)
        })
        .await
    }

    async fn set_value(
        &self,
        variable_id: Uuid,
        mode_id: Uuid,
        value: VariableValue,
    ) -> StoreResult<()> {
        self.mutate(move |state| state.set_value(variable_id, mode_id, value))
            .await
    }

    async fn create_collection(&self, name: &str) -> StoreResult<VariableCollection> {
        self.mutate(|state| state.create_collection(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonal_core::Color;

    #[tokio::test]
    async fn missing_document_reads_as_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("variables.json"));
        assert!(store.collections().await?.is_empty());
        assert!(store.updated_at().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn writes_survive_reopening() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("variables.json");
        let store = FileStore::new(&path);
        let collection = store.create_collection("Colors").await?;
        let variable = store
            .create_variable(collection.id, "brand/500", VariableType::Color)
            .await?;
        store
            .set_value(
                variable.id,
                collection.modes[0].id,
                Color::new(0x63, 0x66, 0xF1).into(),
            )
            .await?;

        let reopened = FileStore::new(&path);
        let variables = reopened.variables(collection.id).await?;
        assert_eq!(variables.len(), 1);
        assert_eq!(
            variables[0]
                .value_in(collection.modes[0].id)
                .and_then(VariableValue::as_color)
                .map(Color::to_hex)
                .as_deref(),
            Some("6366F1")
        );
        assert!(reopened.updated_at().await?.is_some());
        Ok(())
    }

    #[test]
    fn staging_files_are_unique_siblings() {
        let store = FileStore::new("/data/variables.json");
        let first = store.temp_path();
        let second = store.temp_path();
        assert_ne!(first, second);
        assert_eq!(first.parent(), store.path().parent());
        assert!(
            first
                .to_string_lossy()
                .starts_with("/data/variables.json.")
        );
    }

    #[tokio::test]
    async fn concurrent_stores_leave_no_staging_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("variables.json");
        let collection = FileStore::new(&path).create_collection("Colors").await?;
        let mode = collection.modes[0].id;

        // Separate handles share no lock, like two processes on one document.
        let writers = ["base/white", "base/black", "brand/500", "gray/500"].map(|name| {
            let path = path.clone();
            tokio::spawn(async move {
                FileStore::new(path)
                    .create_variable_with_value(
                        collection.id,
                        name,
                        VariableType::Color,
                        mode,
                        Color::WHITE.into(),
                    )
                    .await
            })
        });
        for writer in writers {
            writer.await??;
        }

        let mut entries = fs::read_dir(dir.path()).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["variables.json"]);
        let variables = FileStore::new(&path).variables(collection.id).await?;
        assert!(!variables.is_empty());
        assert!(
            variables
                .iter()
                .all(|variable| variable.value_in(mode).is_some())
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_with_value_is_one_document_write() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("variables.json"));
        let collection = store.create_collection("Colors").await?;
        let mode = collection.modes[0].id;
        let before = fs::read(store.path()).await?;

        let err = store
            .create_variable_with_value(
                collection.id,
                "space/4",
                VariableType::Float,
                mode,
                Color::BLACK.into(),
            )
            .await
            .expect_err("type mismatch");
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
        assert_eq!(fs::read(store.path()).await?, before);

        store
            .create_variable_with_value(
                collection.id,
                "base/black",
                VariableType::Color,
                mode,
                Color::BLACK.into(),
            )
            .await?;
        let variables = FileStore::new(store.path()).variables(collection.id).await?;
        assert_eq!(
            variables[0].value_in(mode).and_then(VariableValue::as_color),
            Some(Color::BLACK)
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_mutation_leaves_document_untouched() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("variables.json"));
        let collection = store.create_collection("Colors").await?;
        let before = fs::read(store.path()).await?;

        let err = store
            .create_variable(Uuid::new_v4(), "brand/500", VariableType::Color)
            .await
            .expect_err("unknown collection");
        assert!(matches!(err, StoreError::UnknownCollection { .. }));
        assert_eq!(fs::read(store.path()).await?, before);
        assert_eq!(store.collections().await?, vec![collection]);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("variables.json");
        fs::write(&path, b"{not json").await?;
        let err = FileStore::new(&path)
            .collections()
            .await
            .expect_err("corrupt document");
        assert!(matches!(err, StoreError::Serialization { .. }));
        Ok(())
    }
}
