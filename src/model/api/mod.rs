pub(crate) mod gemini;

use reqwest::StatusCode;
use strum::{Display, EnumString};

use crate::constants::{API_BACKOFF_BASE, API_MAX_ATTEMPTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
pub enum APIProvider {
    Google,
}

impl APIProvider {
    pub fn default_url(&self) -> &'static str {
        match self {
            APIProvider::Google => "https://generativelanguage.googleapis.com/v1beta/models",
        }
    }
}

/// A hosted model endpoint: provider, model name, credentials.
#[derive(Clone)]
pub struct APIModel {
    pub provider: APIProvider,
    pub model: String,
    pub(crate) api_key: String,
}

impl APIModel {
    pub fn new(
        provider: APIProvider,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.provider.default_url()
    }
}

impl std::fmt::Debug for APIModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("APIModel")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish()
    }
}

/// Sends a request, retrying with exponential backoff on transient failures
/// (connect errors, timeouts, 429 and 5xx responses). Non-transient errors
/// return immediately.
pub(crate) async fn send_with_retry(
    req: reqwest::RequestBuilder,
) -> anyhow::Result<reqwest::Response> {
    let mut delay = API_BACKOFF_BASE;
    let mut last_err: Option<anyhow::Error> = None;
    for attempt in 0..API_MAX_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
        let attempt_req = match req.try_clone() {
            Some(r) => r,
            None => anyhow::bail!("request is not retryable (streaming body)"),
        };
        match attempt_req.send().await {
            Ok(resp)
                if resp.status().is_server_error()
                    || resp.status() == StatusCode::TOO_MANY_REQUESTS =>
            {
                log::warn!(
                    "attempt {}/{}: server returned {}",
                    attempt + 1,
                    API_MAX_ATTEMPTS,
                    resp.status()
                );
                last_err = Some(anyhow::anyhow!("server returned {}", resp.status()));
            }
            Ok(resp) => return Ok(resp),
            Err(e) if e.is_timeout() || e.is_connect() => {
                log::warn!("attempt {}/{}: {}", attempt + 1, API_MAX_ATTEMPTS, e);
                last_err = Some(e.into());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("request failed")))
}

/// Sends with retry and decodes the JSON body, surfacing non-2xx responses
/// as errors carrying the response text.
pub(crate) async fn execute(req: reqwest::RequestBuilder) -> anyhow::Result<serde_json::Value> {
    let resp = send_with_retry(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("request failed: {} - {}", status, text);
    }
    Ok(resp.json().await?)
}
