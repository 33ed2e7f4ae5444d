mod function;
mod registry;

use async_trait::async_trait;

pub use function::{FunctionTool, ToolFunc};
pub use registry::ToolRegistry;

use crate::{knowledge::KnowledgeTool, registration::RegistrationTool, value::ToolDesc};

#[async_trait]
pub trait ToolBehavior {
    fn desc(&self) -> ToolDesc;
    /// Runs the tool with already-validated arguments. The returned value is
    /// fed back to the model as the tool-call result.
    async fn run(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value>;
}

#[derive(Clone, Debug)]
enum ToolInner {
    Function(FunctionTool),
    Knowledge(KnowledgeTool),
    Registration(RegistrationTool),
}

/// A tool callable by the agent, dispatching over the supported kinds.
#[derive(Clone, Debug)]
pub struct Tool {
    inner: ToolInner,
}

impl Tool {
    pub fn new_function(tool: FunctionTool) -> Self {
        Self {
            inner: ToolInner::Function(tool),
        }
    }

    pub fn new_knowledge(tool: KnowledgeTool) -> Self {
        Self {
            inner: ToolInner::Knowledge(tool),
        }
    }

    pub fn new_registration(tool: RegistrationTool) -> Self {
        Self {
            inner: ToolInner::Registration(tool),
        }
    }
}

#[async_trait]
impl ToolBehavior for Tool {
    fn desc(&self) -> ToolDesc {
        match &self.inner {
            ToolInner::Function(t) => t.desc(),
            ToolInner::Knowledge(t) => t.desc(),
            ToolInner::Registration(t) => t.desc(),
        }
    }

    async fn run(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        match &self.inner {
            ToolInner::Function(t) => t.run(args).await,
            ToolInner::Knowledge(t) => t.run(args).await,
            ToolInner::Registration(t) => t.run(args).await,
        }
    }
}
