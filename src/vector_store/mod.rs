pub(crate) mod local;

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use futures::lock::Mutex;

pub use local::{LocalStore, StoreError};

use crate::value::{Embedding, Metadata};

#[derive(Debug)]
pub struct VectorStoreAddInput {
    pub embedding: Embedding,
    pub document: String,
    pub metadata: Option<Metadata>,
}

#[derive(Clone, Debug)]
pub struct VectorStoreRetrieveResult {
    pub id: String,
    pub document: String,
    pub metadata: Option<Metadata>,
    pub distance: f32,
}

#[async_trait]
pub trait VectorStoreBehavior {
    async fn add_vector(&mut self, input: VectorStoreAddInput) -> anyhow::Result<String>;
    async fn add_vectors(&mut self, inputs: Vec<VectorStoreAddInput>)
    -> anyhow::Result<Vec<String>>;
    /// Top-k nearest entries by ascending cosine distance. Fails when a
    /// stored entry's dimension differs from the query's.
    async fn retrieve(
        &self,
        query_embedding: Embedding,
        top_k: usize,
    ) -> anyhow::Result<Vec<VectorStoreRetrieveResult>>;
    async fn count(&self) -> anyhow::Result<usize>;
    async fn clear(&mut self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
enum VectorStoreInner {
    Local(Arc<Mutex<LocalStore>>),
}

/// A vector index, dispatching over the supported backends.
#[derive(Debug, Clone)]
pub struct VectorStore {
    inner: VectorStoreInner,
}

impl VectorStore {
    /// Opens (or creates) a local store persisted as a JSON file at `path`.
    pub async fn open_local(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = LocalStore::open(path).await?;
        Ok(Self {
            inner: VectorStoreInner::Local(Arc::new(Mutex::new(store))),
        })
    }

    /// An unpersisted local store. Contents are lost on drop.
    pub fn new_local_in_memory() -> Self {
        Self {
            inner: VectorStoreInner::Local(Arc::new(Mutex::new(LocalStore::in_memory()))),
        }
    }

    pub async fn add_vector(&mut self, input: VectorStoreAddInput) -> anyhow::Result<String> {
        match &self.inner {
            VectorStoreInner::Local(inner) => inner.lock().await.add_vector(input).await,
        }
    }

    pub async fn add_vectors(
        &mut self,
        inputs: Vec<VectorStoreAddInput>,
    ) -> anyhow::Result<Vec<String>> {
        match &self.inner {
            VectorStoreInner::Local(inner) => inner.lock().await.add_vectors(inputs).await,
        }
    }

    pub async fn retrieve(
        &self,
        query_embedding: Embedding,
        top_k: usize,
    ) -> anyhow::Result<Vec<VectorStoreRetrieveResult>> {
        match &self.inner {
            VectorStoreInner::Local(inner) => {
                inner.lock().await.retrieve(query_embedding, top_k).await
            }
        }
    }

    pub async fn count(&self) -> anyhow::Result<usize> {
        match &self.inner {
            VectorStoreInner::Local(inner) => inner.lock().await.count().await,
        }
    }

    pub async fn clear(&mut self) -> anyhow::Result<()> {
        match &self.inner {
            VectorStoreInner::Local(inner) => inner.lock().await.clear().await,
        }
    }
}
