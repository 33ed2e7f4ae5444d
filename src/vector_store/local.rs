use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    value::{Embedding, Metadata},
    vector_store::{VectorStoreAddInput, VectorStoreBehavior, VectorStoreRetrieveResult},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access index file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("index file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredVector {
    id: String,
    embedding: Vec<f32>,
    document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

/// A flat vector index held in memory and persisted as a single JSON file.
/// Retrieval is an exhaustive scan, which is fine at the corpus sizes a
/// single school's documents produce.
#[derive(Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    vectors: Vec<StoredVector>,
}

impl LocalStore {
    /// Loads the index at `path`, or starts empty when the file does not
    /// exist yet. A file that exists but cannot be parsed is an error, not
    /// an empty index.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let vectors = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Self {
            path: Some(path),
            vectors,
        })
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    async fn persist(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&self.vectors)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    fn insert(&mut self, input: VectorStoreAddInput) -> String {
        let id = Uuid::new_v4().to_string();
        self.vectors.push(StoredVector {
            id: id.clone(),
            embedding: input.embedding.into(),
            document: input.document,
            metadata: input.metadata,
        });
        id
    }
}

#[async_trait]
impl VectorStoreBehavior for LocalStore {
    async fn add_vector(&mut self, input: VectorStoreAddInput) -> anyhow::Result<String> {
        let id = self.insert(input);
        self.persist().await?;
        Ok(id)
    }

    async fn add_vectors(
        &mut self,
        inputs: Vec<VectorStoreAddInput>,
    ) -> anyhow::Result<Vec<String>> {
        let ids = inputs.into_iter().map(|i| self.insert(i)).collect();
        self.persist().await?;
        Ok(ids)
    }

    async fn retrieve(
        &self,
        query_embedding: Embedding,
        top_k: usize,
    ) -> anyhow::Result<Vec<VectorStoreRetrieveResult>> {
        let mut results = Vec::with_capacity(self.vectors.len());
        for v in &self.vectors {
            anyhow::ensure!(
                v.embedding.len() == query_embedding.len(),
                "index entry {} has dimension {} but the query has {}; \
                 the index was likely built with a different embedding model",
                v.id,
                v.embedding.len(),
                query_embedding.len()
            );
            let embedding = Embedding::from(v.embedding.clone());
            results.push(VectorStoreRetrieveResult {
                id: v.id.clone(),
                document: v.document.clone(),
                metadata: v.metadata.clone(),
                distance: query_embedding.cosine_distance(&embedding),
            });
        }
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(top_k);
        Ok(results)
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.vectors.len())
    }

    async fn clear(&mut self) -> anyhow::Result<()> {
        self.vectors.clear();
        self.persist().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(embedding: Vec<f32>, document: &str) -> VectorStoreAddInput {
        VectorStoreAddInput {
            embedding: embedding.into(),
            document: document.to_owned(),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn retrieve_orders_by_distance() {
        let mut store = LocalStore::in_memory();
        store
            .add_vectors(vec![
                input(vec![1.0, 0.0], "east"),
                input(vec![0.0, 1.0], "north"),
                input(vec![0.7, 0.7], "northeast"),
            ])
            .await
            .unwrap();

        let results = store.retrieve(vec![1.0, 0.0].into(), 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document, "east");
        assert_eq!(results[1].document, "northeast");
        assert!(results[0].distance <= results[1].distance);
    }

    #[tokio::test]
    async fn mismatched_query_dimension_is_an_error() {
        let mut store = LocalStore::in_memory();
        store
            .add_vector(input(vec![1.0, 0.0, 0.0], "three dimensional"))
            .await
            .unwrap();

        let err = store
            .retrieve(vec![1.0, 0.0].into(), 1)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("dimension"));
    }

    #[tokio::test]
    async fn retrieve_caps_at_store_size() {
        let mut store = LocalStore::in_memory();
        store.add_vector(input(vec![1.0], "only")).await.unwrap();
        let results = store.retrieve(vec![1.0].into(), 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut store = LocalStore::open(&path).await.unwrap();
        store
            .add_vector(input(vec![0.1, 0.2], "a chunk"))
            .await
            .unwrap();
        drop(store);

        let reopened = LocalStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        let results = reopened.retrieve(vec![0.1, 0.2].into(), 1).await.unwrap();
        assert_eq!(results[0].document, "a chunk");
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("none.json")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();
        let err = LocalStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn clear_empties_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut store = LocalStore::open(&path).await.unwrap();
        store.add_vector(input(vec![1.0], "x")).await.unwrap();
        store.clear().await.unwrap();

        let reopened = LocalStore::open(&path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 0);
    }
}
