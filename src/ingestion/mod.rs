mod pdf;
mod splitter;

use std::path::Path;

use anyhow::Context as _;
use serde_json::json;

pub use pdf::{PageText, extract_pages};
pub use splitter::{Chunk, TextSplitter};

use crate::{
    model::{EmbeddingModel, EmbeddingModelInference as _},
    value::Metadata,
    vector_store::{VectorStore, VectorStoreAddInput},
};

/// What one ingested file contributed to the index.
#[derive(Clone, Debug)]
pub struct IngestReport {
    pub file: String,
    pub pages: usize,
    pub chunks: usize,
}

/// Turns PDF files into indexed chunks: extract page text, split it into
/// overlapping windows, embed each window, and add the vectors to the
/// store. Re-ingesting a file appends a second copy of its chunks.
#[derive(Debug)]
pub struct Ingestor {
    embedding_model: EmbeddingModel,
    store: VectorStore,
    splitter: TextSplitter,
}

impl Ingestor {
    pub fn new(embedding_model: EmbeddingModel, store: VectorStore) -> Self {
        Self {
            embedding_model,
            store,
            splitter: TextSplitter::default(),
        }
    }

    pub fn with_splitter(mut self, splitter: TextSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub async fn ingest_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<IngestReport> {
        let path = path.as_ref();
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let pages = extract_pages(path)?;
        self.ingest_pages(&file, &pages).await
    }

    /// Indexes already-extracted pages under `file` as their source label.
    pub async fn ingest_pages(
        &mut self,
        file: &str,
        pages: &[PageText],
    ) -> anyhow::Result<IngestReport> {
        let mut inputs = Vec::new();
        for page in pages {
            for chunk in self.splitter.split(&page.text) {
                if chunk.text.trim().is_empty() {
                    continue;
                }
                let embedding = self
                    .embedding_model
                    .infer(chunk.text.clone())
                    .await
                    .with_context(|| {
                        format!("failed to embed a chunk of {file} page {}", page.page_number)
                    })?;
                inputs.push(VectorStoreAddInput {
                    embedding,
                    document: chunk.text,
                    metadata: Some(chunk_metadata(file, page.page_number, chunk.start_index)),
                });
            }
        }

        let chunks = inputs.len();
        self.store.add_vectors(inputs).await?;
        log::info!("indexed {chunks} chunks from {file} ({} pages)", pages.len());
        Ok(IngestReport {
            file: file.to_owned(),
            pages: pages.len(),
            chunks,
        })
    }

    /// Ingests every `.pdf` file directly under `dir`.
    pub async fn ingest_dir(&mut self, dir: impl AsRef<Path>) -> anyhow::Result<Vec<IngestReport>> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("failed to read directory {}", dir.display()))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut reports = Vec::new();
        for path in paths {
            reports.push(self.ingest_file(&path).await?);
        }
        Ok(reports)
    }
}

fn chunk_metadata(file: &str, page_number: u32, start_index: usize) -> Metadata {
    let value = json!({
        "source": file,
        "page": page_number,
        "start_index": start_index,
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}
