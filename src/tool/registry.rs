use indexmap::IndexMap;
use serde_json::json;

use crate::{
    tool::{Tool, ToolBehavior as _},
    value::ToolDesc,
};

/// The set of tools bound to an agent, keyed by name in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool. A second tool with an already-taken name is
    /// skipped with a warning rather than replacing the first.
    pub fn register(&mut self, tool: Tool) {
        let name = tool.desc().name;
        if self.tools.contains_key(&name) {
            log::warn!("tool '{name}' is already registered, skipping");
            return;
        }
        self.tools.insert(name, tool);
    }

    pub fn descriptions(&self) -> Vec<ToolDesc> {
        self.tools.values().map(|t| t.desc()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Runs the named tool against `args`. Failures never propagate: an
    /// unknown name, arguments that violate the tool's parameter schema,
    /// and tool errors all come back as an error-status value so the model
    /// can recover in conversation.
    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> serde_json::Value {
        let Some(tool) = self.tools.get(name) else {
            return json!({
                "status": "error",
                "message": format!("unknown tool '{name}'")
            });
        };

        if let Err(message) = validate_args(&tool.desc(), &args) {
            return json!({ "status": "error", "message": message });
        }

        match tool.run(args).await {
            Ok(value) => value,
            Err(e) => json!({
                "status": "error",
                "message": format!("tool '{name}' failed: {e:#}")
            }),
        }
    }
}

fn validate_args(desc: &ToolDesc, args: &serde_json::Value) -> Result<(), String> {
    if desc.parameters.is_null() {
        return Ok(());
    }
    let validator = jsonschema::validator_for(&desc.parameters)
        .map_err(|e| format!("invalid parameter schema for '{}': {e}", desc.name))?;
    validator
        .validate(args)
        .map_err(|e| format!("invalid arguments for '{}': {e}", desc.name))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        tool::FunctionTool,
        value::ToolDescBuilder,
    };

    fn echo_tool(name: &str) -> Tool {
        let desc = ToolDescBuilder::new(name)
            .description("echoes its arguments")
            .parameters(json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            }))
            .build();
        Tool::new_function(FunctionTool::new(
            desc,
            Arc::new(|args| {
                Box::pin(async move { Ok(json!({ "status": "ok", "echo": args["text"] })) })
            }),
        ))
    }

    #[tokio::test]
    async fn dispatch_runs_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo"));

        let result = registry.dispatch("echo", json!({ "text": "hi" })).await;
        assert_eq!(result["status"], "ok");
        assert_eq!(result["echo"], "hi");
    }

    #[tokio::test]
    async fn unknown_tool_returns_error_value() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch("nope", json!({})).await;
        assert_eq!(result["status"], "error");
        assert!(result["message"].as_str().unwrap().contains("unknown tool"));
    }

    #[tokio::test]
    async fn schema_violation_returns_error_value() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo"));

        let result = registry.dispatch("echo", json!({ "text": 7 })).await;
        assert_eq!(result["status"], "error");
        assert!(result["message"].as_str().unwrap().contains("invalid arguments"));
    }

    #[tokio::test]
    async fn failing_tool_returns_error_value() {
        let desc = ToolDescBuilder::new("boom").build();
        let tool = Tool::new_function(FunctionTool::new(
            desc,
            Arc::new(|_| Box::pin(async { anyhow::bail!("it broke") })),
        ));
        let mut registry = ToolRegistry::new();
        registry.register(tool);

        let result = registry.dispatch("boom", json!({})).await;
        assert_eq!(result["status"], "error");
        assert!(result["message"].as_str().unwrap().contains("it broke"));
    }

    #[test]
    fn duplicate_registration_keeps_first() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo"));
        registry.register(echo_tool("echo"));
        assert_eq!(registry.descriptions().len(), 1);
    }

    #[test]
    fn descriptions_preserve_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("b"));
        registry.register(echo_tool("a"));
        let names: Vec<_> = registry.descriptions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
