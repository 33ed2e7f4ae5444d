use std::fmt;

use serde::{Deserialize, Serialize};

/// Describes a tool that the language model can invoke.
///
/// `parameters` holds the JSON Schema of the expected arguments, following
/// the same conventions used by the OpenAI/Anthropic/Gemini APIs. Arguments
/// are validated against it before the tool runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDesc {
    /// The unique name of the tool.
    pub name: String,

    /// A natural-language description of what the tool does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema of the expected parameters. Typically an object schema
    /// such as `{ "type": "object", "properties": ... }`.
    pub parameters: serde_json::Value,
}

impl fmt::Display for ToolDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "ToolDesc {}", s)
    }
}

/// A builder for constructing [`ToolDesc`] objects.
///
/// If no `parameters` are provided, the schema defaults to `null`, meaning
/// any arguments are accepted.
#[derive(Clone, Debug)]
pub struct ToolDescBuilder {
    name: String,
    description: Option<String>,
    parameters: Option<serde_json::Value>,
}

impl ToolDescBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn parameters(mut self, params: serde_json::Value) -> Self {
        self.parameters = Some(params);
        self
    }

    pub fn build(self) -> ToolDesc {
        ToolDesc {
            name: self.name,
            description: self.description,
            parameters: self.parameters.unwrap_or(serde_json::Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_tool_description_serde() {
        let desc = ToolDescBuilder::new("save_registration")
            .description("Saves a user's registration details.")
            .parameters(serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "email": {"type": "string"},
                    "interest": {"type": "string"}
                },
                "required": ["name", "email", "interest"]
            }))
            .build();

        let serialized = serde_json::to_string(&desc).unwrap();
        let recovered: ToolDesc = serde_json::from_str(&serialized).unwrap();
        assert_eq!(desc, recovered);
    }

    #[test]
    fn parameters_default_to_null() {
        let desc = ToolDescBuilder::new("noop").build();
        assert!(desc.parameters.is_null());
        assert!(desc.description.is_none());
    }
}
