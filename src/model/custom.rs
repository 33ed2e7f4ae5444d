use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    model::{EmbeddingModelInference, InferenceConfig, LangModelInference},
    utils::BoxFuture,
    value::{Embedding, Message, MessageOutput, ToolDesc},
};

pub type LangModelFunc = dyn Fn(Vec<Message>, Vec<ToolDesc>, InferenceConfig) -> BoxFuture<'static, anyhow::Result<MessageOutput>>
    + Send
    + Sync;

/// A language model backed by a user-provided closure. Used to inject
/// scripted responses in tests.
#[derive(Clone)]
pub struct CustomLangModel {
    f: Arc<LangModelFunc>,
}

impl Debug for CustomLangModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomLangModel")
            .field("f", &"function")
            .finish()
    }
}

impl CustomLangModel {
    pub fn new(f: Arc<LangModelFunc>) -> Self {
        Self { f }
    }
}

#[async_trait]
impl LangModelInference for CustomLangModel {
    async fn infer(
        &self,
        msgs: Vec<Message>,
        tools: Vec<ToolDesc>,
        config: InferenceConfig,
    ) -> anyhow::Result<MessageOutput> {
        (self.f)(msgs, tools, config).await
    }
}

pub type EmbeddingFunc =
    dyn Fn(String) -> BoxFuture<'static, anyhow::Result<Embedding>> + Send + Sync;

/// An embedding model backed by a user-provided closure.
#[derive(Clone)]
pub struct CustomEmbeddingModel {
    f: Arc<EmbeddingFunc>,
}

impl Debug for CustomEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomEmbeddingModel")
            .field("f", &"function")
            .finish()
    }
}

impl CustomEmbeddingModel {
    pub fn new(f: Arc<EmbeddingFunc>) -> Self {
        Self { f }
    }
}

#[async_trait]
impl EmbeddingModelInference for CustomEmbeddingModel {
    async fn infer(&self, text: String) -> anyhow::Result<Embedding> {
        (self.f)(text).await
    }
}
