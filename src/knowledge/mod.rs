use async_trait::async_trait;
use serde_json::json;

use crate::{
    constants::{NO_RESULTS_SENTINEL, RETRIEVE_TOP_K},
    model::{EmbeddingModel, EmbeddingModelInference as _},
    tool::ToolBehavior,
    value::{Document, ToolDesc, ToolDescBuilder},
    vector_store::VectorStore,
};

/// Retrieval parameters.
#[derive(Clone, Debug)]
pub struct KnowledgeConfig {
    pub top_k: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            top_k: RETRIEVE_TOP_K,
        }
    }
}

#[async_trait]
pub trait KnowledgeBehavior {
    /// Returns up to `config.top_k` documents relevant to `query`, most
    /// relevant first.
    async fn retrieve(
        &self,
        query: &str,
        config: &KnowledgeConfig,
    ) -> anyhow::Result<Vec<Document>>;
}

/// Knowledge backed by an embedding model and a vector index.
#[derive(Clone, Debug)]
pub struct VectorStoreKnowledge {
    embedding_model: EmbeddingModel,
    store: VectorStore,
}

impl VectorStoreKnowledge {
    pub fn new(embedding_model: EmbeddingModel, store: VectorStore) -> Self {
        Self {
            embedding_model,
            store,
        }
    }
}

#[async_trait]
impl KnowledgeBehavior for VectorStoreKnowledge {
    async fn retrieve(
        &self,
        query: &str,
        config: &KnowledgeConfig,
    ) -> anyhow::Result<Vec<Document>> {
        anyhow::ensure!(!query.trim().is_empty(), "query must not be empty");
        let embedding = self.embedding_model.infer(query.to_owned()).await?;
        let results = self.store.retrieve(embedding, config.top_k).await?;
        Ok(results
            .into_iter()
            .map(|r| {
                let doc = Document::new(r.id, r.document);
                match r.metadata {
                    Some(metadata) => doc.with_metadata(metadata),
                    None => doc,
                }
            })
            .collect())
    }
}

/// The agent-facing retrieval tool. Results are joined into a single
/// passage block; an empty index or a query with no matches yields a
/// `no_results` status carrying a fixed sentinel message, and retrieval
/// failures are reported as an `error` status instead of propagating.
#[derive(Clone, Debug)]
pub struct KnowledgeTool {
    knowledge: VectorStoreKnowledge,
    config: KnowledgeConfig,
}

impl KnowledgeTool {
    pub fn new(knowledge: VectorStoreKnowledge, config: KnowledgeConfig) -> Self {
        Self { knowledge, config }
    }
}

#[async_trait]
impl ToolBehavior for KnowledgeTool {
    fn desc(&self) -> ToolDesc {
        ToolDescBuilder::new("retrieve_school_info")
            .description(
                "Search the school's documents for information relevant to the query. \
                 Use this for any question about programs, admissions, tuition, campus \
                 life, or other school specifics.",
            )
            .parameters(json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }))
            .build()
    }

    async fn run(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        let query = args
            .get("query")
            .and_then(|q| q.as_str())
            .unwrap_or_default();
        match self.knowledge.retrieve(query, &self.config).await {
            Ok(docs) if docs.is_empty() => Ok(json!({
                "status": "no_results",
                "message": NO_RESULTS_SENTINEL
            })),
            Ok(docs) => Ok(json!({
                "status": "ok",
                "content": docs
                    .iter()
                    .map(|d| d.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })),
            Err(e) => Ok(json!({
                "status": "error",
                "message": format!("Error retrieving information: {e:#}")
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        model::CustomEmbeddingModel,
        value::Embedding,
        vector_store::VectorStoreAddInput,
    };

    fn keyword_embedder() -> EmbeddingModel {
        // Maps text onto a 2d space by keyword so tests stay deterministic.
        EmbeddingModel::new_custom(CustomEmbeddingModel::new(Arc::new(|text: String| {
            Box::pin(async move {
                let v = if text.contains("tuition") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                };
                Ok(Embedding::from(v))
            })
        })))
    }

    async fn seeded_store() -> VectorStore {
        let mut store = VectorStore::new_local_in_memory();
        store
            .add_vectors(vec![
                VectorStoreAddInput {
                    embedding: vec![1.0, 0.0].into(),
                    document: "Tuition is 9500 euros per year.".into(),
                    metadata: None,
                },
                VectorStoreAddInput {
                    embedding: vec![0.9, 0.1].into(),
                    document: "Scholarships can cover part of tuition.".into(),
                    metadata: None,
                },
                VectorStoreAddInput {
                    embedding: vec![0.0, 1.0].into(),
                    document: "The campus has a student lounge.".into(),
                    metadata: None,
                },
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn retrieve_returns_closest_first() {
        let knowledge = VectorStoreKnowledge::new(keyword_embedder(), seeded_store().await);
        let config = KnowledgeConfig { top_k: 2 };
        let docs = knowledge
            .retrieve("how much is tuition", &config)
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "Tuition is 9500 euros per year.");
        assert_eq!(docs[1].text, "Scholarships can cover part of tuition.");
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let knowledge = VectorStoreKnowledge::new(keyword_embedder(), seeded_store().await);
        let result = knowledge.retrieve("  ", &KnowledgeConfig::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn tool_joins_passages_with_blank_lines() {
        let knowledge = VectorStoreKnowledge::new(keyword_embedder(), seeded_store().await);
        let tool = KnowledgeTool::new(knowledge, KnowledgeConfig { top_k: 2 });
        let result = tool.run(json!({ "query": "tuition" })).await.unwrap();
        assert_eq!(result["status"], "ok");
        let content = result["content"].as_str().unwrap();
        assert!(content.contains("\n\n"));
        assert!(content.starts_with("Tuition is 9500"));
    }

    #[tokio::test]
    async fn empty_index_reports_no_results() {
        let knowledge =
            VectorStoreKnowledge::new(keyword_embedder(), VectorStore::new_local_in_memory());
        let tool = KnowledgeTool::new(knowledge, KnowledgeConfig::default());
        let result = tool.run(json!({ "query": "anything" })).await.unwrap();
        assert_eq!(result["status"], "no_results");
        assert_eq!(result["message"], NO_RESULTS_SENTINEL);
    }

    #[tokio::test]
    async fn stale_index_dimension_reports_error() {
        // Index built with a wider embedding model than the one in use.
        let mut store = VectorStore::new_local_in_memory();
        store
            .add_vector(VectorStoreAddInput {
                embedding: vec![1.0, 0.0, 0.0].into(),
                document: "Indexed with another model.".into(),
                metadata: None,
            })
            .await
            .unwrap();

        let knowledge = VectorStoreKnowledge::new(keyword_embedder(), store);
        let tool = KnowledgeTool::new(knowledge, KnowledgeConfig::default());
        let result = tool.run(json!({ "query": "tuition" })).await.unwrap();
        assert_eq!(result["status"], "error");
        assert!(
            result["message"]
                .as_str()
                .unwrap()
                .starts_with("Error retrieving information")
        );
    }

    #[tokio::test]
    async fn missing_query_reports_error() {
        let knowledge = VectorStoreKnowledge::new(keyword_embedder(), seeded_store().await);
        let tool = KnowledgeTool::new(knowledge, KnowledgeConfig::default());
        let result = tool.run(json!({})).await.unwrap();
        assert_eq!(result["status"], "error");
    }

    #[tokio::test]
    async fn retrieval_is_deterministic() {
        let knowledge = VectorStoreKnowledge::new(keyword_embedder(), seeded_store().await);
        let config = KnowledgeConfig::default();
        let first = knowledge.retrieve("tuition fees", &config).await.unwrap();
        let second = knowledge.retrieve("tuition fees", &config).await.unwrap();
        assert_eq!(first, second);
    }
}
