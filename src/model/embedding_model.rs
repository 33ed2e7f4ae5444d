use async_trait::async_trait;

use crate::{
    model::{
        APIModel, APIProvider,
        api::{self, gemini},
        custom::CustomEmbeddingModel,
    },
    value::Embedding,
};

#[async_trait]
pub trait EmbeddingModelInference {
    async fn infer(&self, text: String) -> anyhow::Result<Embedding>;
}

#[derive(Clone, Debug)]
enum EmbeddingModelInner {
    Api(APIEmbeddingModel),
    Custom(CustomEmbeddingModel),
}

/// An embedding model client, dispatching over the supported backends.
#[derive(Clone, Debug)]
pub struct EmbeddingModel {
    inner: EmbeddingModelInner,
}

impl EmbeddingModel {
    pub fn new_gemini(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            inner: EmbeddingModelInner::Api(APIEmbeddingModel::new(APIModel::new(
                APIProvider::Google,
                model,
                api_key,
            ))),
        }
    }

    pub fn new_custom(model: CustomEmbeddingModel) -> Self {
        Self {
            inner: EmbeddingModelInner::Custom(model),
        }
    }
}

#[async_trait]
impl EmbeddingModelInference for EmbeddingModel {
    async fn infer(&self, text: String) -> anyhow::Result<Embedding> {
        match &self.inner {
            EmbeddingModelInner::Api(model) => model.infer(text).await,
            EmbeddingModelInner::Custom(model) => model.infer(text).await,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct APIEmbeddingModel {
    api: APIModel,
    client: reqwest::Client,
}

impl APIEmbeddingModel {
    pub(crate) fn new(api: APIModel) -> Self {
        Self {
            api,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmbeddingModelInference for APIEmbeddingModel {
    async fn infer(&self, text: String) -> anyhow::Result<Embedding> {
        anyhow::ensure!(!text.trim().is_empty(), "cannot embed empty text");
        let req = match self.api.provider {
            APIProvider::Google => gemini::embed_request(&self.client, &self.api, &text),
        };
        let body = api::execute(req).await?;
        match self.api.provider {
            APIProvider::Google => gemini::parse_embed_response(&body),
        }
    }
}
