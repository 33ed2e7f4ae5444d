//! Request/response mapping for the Gemini `generateContent` and
//! `embedContent` endpoints.

use anyhow::Context as _;
use serde_json::json;

use crate::{
    constants::API_TIMEOUT,
    model::{APIModel, InferenceConfig},
    value::{Embedding, FinishReason, Message, MessageOutput, Part, Role, ToolCall, ToolDesc},
};

pub(crate) fn generate_request(
    client: &reqwest::Client,
    api: &APIModel,
    msgs: &[Message],
    tools: &[ToolDesc],
    config: &InferenceConfig,
) -> reqwest::RequestBuilder {
    let mut body = json!({ "contents": marshal_contents(msgs) });

    let system_text = system_instruction(msgs, config);
    if !system_text.is_empty() {
        body["systemInstruction"] = json!({ "parts": [{ "text": system_text }] });
    }

    if !tools.is_empty() {
        body["tools"] = json!([{
            "functionDeclarations": tools.iter().map(marshal_tool).collect::<Vec<_>>()
        }]);
    }

    let mut generation = serde_json::Map::new();
    if let Some(temperature) = config.temperature {
        generation.insert("temperature".into(), json!(temperature));
    }
    if let Some(top_p) = config.top_p {
        generation.insert("topP".into(), json!(top_p));
    }
    if let Some(max_tokens) = config.max_tokens {
        generation.insert("maxOutputTokens".into(), json!(max_tokens));
    }
    if !generation.is_empty() {
        body["generationConfig"] = serde_json::Value::Object(generation);
    }

    let url = format!("{}/{}:generateContent", api.endpoint(), api.model);
    client
        .post(url)
        .timeout(API_TIMEOUT)
        .header("x-goog-api-key", api.api_key.clone())
        .json(&body)
}

pub(crate) fn embed_request(
    client: &reqwest::Client,
    api: &APIModel,
    text: &str,
) -> reqwest::RequestBuilder {
    let url = format!("{}/{}:embedContent", api.endpoint(), api.model);
    client
        .post(url)
        .timeout(API_TIMEOUT)
        .header("x-goog-api-key", api.api_key.clone())
        .json(&json!({ "content": { "parts": [{ "text": text }] } }))
}

fn system_instruction(msgs: &[Message], config: &InferenceConfig) -> String {
    let mut texts: Vec<String> = Vec::new();
    if let Some(system_message) = &config.system_message {
        texts.push(system_message.clone());
    }
    texts.extend(
        msgs.iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.text()),
    );
    texts.join("\n\n")
}

fn marshal_tool(tool: &ToolDesc) -> serde_json::Value {
    let mut decl = json!({ "name": tool.name });
    if let Some(description) = &tool.description {
        decl["description"] = json!(description);
    }
    if !tool.parameters.is_null() {
        decl["parameters"] = tool.parameters.clone();
    }
    decl
}

pub(crate) fn marshal_contents(msgs: &[Message]) -> Vec<serde_json::Value> {
    msgs.iter()
        .filter(|m| m.role != Role::System)
        // The API rejects turns with an empty parts array, so assistant
        // messages carrying neither text nor tool calls are dropped from
        // the history.
        .filter(|m| {
            m.role != Role::Assistant || m.has_tool_calls() || !text_parts(m).is_empty()
        })
        .map(|m| match m.role {
            Role::User => json!({ "role": "user", "parts": text_parts(m) }),
            Role::Assistant => {
                let mut parts = text_parts(m);
                for call in &m.tool_calls {
                    parts.push(json!({
                        "functionCall": { "name": call.name, "args": call.arguments }
                    }));
                }
                json!({ "role": "model", "parts": parts })
            }
            Role::Tool => {
                // Gemini requires the response payload to be an object.
                let value = m
                    .contents
                    .iter()
                    .find_map(|p| p.as_value().cloned())
                    .unwrap_or_else(|| json!(m.text()));
                let response = match value {
                    serde_json::Value::Object(map) => serde_json::Value::Object(map),
                    other => json!({ "result": other }),
                };
                json!({
                    "role": "user",
                    "parts": [{
                        "functionResponse": {
                            "name": m.tool_name.clone().unwrap_or_default(),
                            "response": response
                        }
                    }]
                })
            }
            Role::System => unreachable!(),
        })
        .collect()
}

fn text_parts(msg: &Message) -> Vec<serde_json::Value> {
    msg.contents
        .iter()
        .filter_map(|p| p.as_text())
        .map(|text| json!({ "text": text }))
        .collect()
}

pub(crate) fn parse_generate_response(v: &serde_json::Value) -> anyhow::Result<MessageOutput> {
    let candidate = v
        .pointer("/candidates/0")
        .context("no candidates in response")?;

    let mut message = Message::new(Role::Assistant);
    if let Some(parts) = candidate.pointer("/content/parts").and_then(|p| p.as_array()) {
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                message.contents.push(Part::text(text));
            } else if let Some(fc) = part.get("functionCall") {
                let name = fc
                    .get("name")
                    .and_then(|n| n.as_str())
                    .context("functionCall without a name")?;
                let args = fc.get("args").cloned().unwrap_or_else(|| json!({}));
                message.tool_calls.push(ToolCall::new(name, args));
            }
        }
    }

    let reason = candidate.pointer("/finishReason").and_then(|r| r.as_str());
    let finish_reason = if message.has_tool_calls() {
        FinishReason::ToolCalls
    } else {
        match reason {
            Some("STOP") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some(other) => FinishReason::Refusal(other.to_owned()),
        }
    };

    Ok(MessageOutput {
        message,
        finish_reason,
    })
}

pub(crate) fn parse_embed_response(v: &serde_json::Value) -> anyhow::Result<Embedding> {
    let values = v
        .pointer("/embedding/values")
        .and_then(|e| e.as_array())
        .context("no embedding values in response")?;
    let vector = values
        .iter()
        .map(|x| x.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<_>>>()
        .context("non-numeric embedding value")?;
    Ok(Embedding::from(vector))
}
