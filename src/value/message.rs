use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// The speaker of a [`Message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One typed unit of message content.
///
/// Serialized in the OpenAI-style "array-of-parts" shape, e.g.
/// `{ "type": "text", "text": "..." }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    Value { value: serde_json::Value },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn value(value: serde_json::Value) -> Self {
        Part::Value { value }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Part::Text { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Part::Value { value } => Some(value),
            _ => None,
        }
    }
}

/// A model-issued request to invoke a named tool with structured arguments.
///
/// Providers that do not assign call ids (Gemini) get one synthesized
/// client-side, so tool results can always be linked back to their request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: format!("call_{}", Uuid::new_v4()),
            name: name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// One turn in a conversation. Ordering is significant and append-only
/// within a thread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<Part>,

    /// Pending tool-call requests. Only meaningful on assistant messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,

    /// Links a tool-result message back to the request it answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Name of the tool that produced a tool-result message. Some wire
    /// formats (Gemini `functionResponse`) address results by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Message {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            contents: Vec::new(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System).with_contents([Part::text(text)])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User).with_contents([Part::text(text)])
    }

    pub fn tool_result(
        id: impl Into<String>,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            role: Role::Tool,
            contents: vec![Part::value(value)],
            tool_calls: Vec::new(),
            tool_call_id: Some(id.into()),
            tool_name: Some(name.into()),
        }
    }

    pub fn with_contents(mut self, contents: impl IntoIterator<Item = Part>) -> Self {
        self.contents = contents.into_iter().collect();
        self
    }

    pub fn with_tool_calls(mut self, tool_calls: impl IntoIterator<Item = ToolCall>) -> Self {
        self.tool_calls = tool_calls.into_iter().collect();
        self
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.contents
            .iter()
            .filter_map(|p| p.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    Refusal(String),
}

/// One complete message produced by a model call or a tool execution.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageOutput {
    pub message: Message,
    pub finish_reason: FinishReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_only_text_parts() {
        let msg = Message::new(Role::Assistant).with_contents([
            Part::text("Hello"),
            Part::value(serde_json::json!({"k": 1})),
            Part::text(", world"),
        ]);
        assert_eq!(msg.text(), "Hello, world");
    }

    #[test]
    fn tool_result_links_back_to_request() {
        let call = ToolCall::new("save_registration", serde_json::json!({"name": "A"}));
        let result = Message::tool_result(&call.id, &call.name, serde_json::json!({"status": "ok"}));
        assert_eq!(result.role, Role::Tool);
        assert_eq!(result.tool_call_id.as_deref(), Some(call.id.as_str()));
        assert_eq!(result.tool_name.as_deref(), Some("save_registration"));
    }

    #[test]
    fn tool_call_ids_are_unique() {
        let a = ToolCall::new("t", serde_json::Value::Null);
        let b = ToolCall::new("t", serde_json::Value::Null);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("call_"));
    }

    #[test]
    fn message_serde_roundtrip() {
        let msg = Message::new(Role::Assistant)
            .with_contents([Part::text("checking")])
            .with_tool_calls([ToolCall::new(
                "retrieve_school_info",
                serde_json::json!({"query": "tuition"}),
            )]);
        let serialized = serde_json::to_string(&msg).unwrap();
        let recovered: Message = serde_json::from_str(&serialized).unwrap();
        assert_eq!(msg, recovered);
    }
}
