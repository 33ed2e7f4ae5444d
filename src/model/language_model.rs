use async_trait::async_trait;

use crate::{
    model::{
        APIModel, APIProvider,
        api::{self, gemini},
        custom::CustomLangModel,
    },
    value::{Message, MessageOutput, ToolDesc},
};

/// Per-call inference parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InferenceConfig {
    pub system_message: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl InferenceConfig {
    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
pub trait LangModelInference {
    /// Runs one model call over the full message history with the declared
    /// tools bound. The result is either a plain assistant message or one
    /// carrying tool-call requests.
    async fn infer(
        &self,
        msgs: Vec<Message>,
        tools: Vec<ToolDesc>,
        config: InferenceConfig,
    ) -> anyhow::Result<MessageOutput>;
}

#[derive(Clone, Debug)]
enum LangModelInner {
    Api(APILangModel),
    Custom(CustomLangModel),
}

/// A language model client, dispatching over the supported backends.
#[derive(Clone, Debug)]
pub struct LangModel {
    inner: LangModelInner,
}

impl LangModel {
    pub fn new_gemini(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            inner: LangModelInner::Api(APILangModel::new(APIModel::new(
                APIProvider::Google,
                model,
                api_key,
            ))),
        }
    }

    pub fn new_custom(model: CustomLangModel) -> Self {
        Self {
            inner: LangModelInner::Custom(model),
        }
    }
}

#[async_trait]
impl LangModelInference for LangModel {
    async fn infer(
        &self,
        msgs: Vec<Message>,
        tools: Vec<ToolDesc>,
        config: InferenceConfig,
    ) -> anyhow::Result<MessageOutput> {
        match &self.inner {
            LangModelInner::Api(model) => model.infer(msgs, tools, config).await,
            LangModelInner::Custom(model) => model.infer(msgs, tools, config).await,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct APILangModel {
    api: APIModel,
    client: reqwest::Client,
}

impl APILangModel {
    pub(crate) fn new(api: APIModel) -> Self {
        Self {
            api,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LangModelInference for APILangModel {
    async fn infer(
        &self,
        msgs: Vec<Message>,
        tools: Vec<ToolDesc>,
        config: InferenceConfig,
    ) -> anyhow::Result<MessageOutput> {
        let req = match self.api.provider {
            APIProvider::Google => {
                gemini::generate_request(&self.client, &self.api, &msgs, &tools, &config)
            }
        };
        let body = api::execute(req).await?;
        match self.api.provider {
            APIProvider::Google => gemini::parse_generate_response(&body),
        }
    }
}
