use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{tool::ToolBehavior, utils::BoxFuture, value::ToolDesc};

pub type ToolFunc = dyn Fn(serde_json::Value) -> BoxFuture<'static, anyhow::Result<serde_json::Value>>
    + Send
    + Sync;

/// A tool backed by a plain closure.
#[derive(Clone)]
pub struct FunctionTool {
    desc: ToolDesc,
    f: Arc<ToolFunc>,
}

impl Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("desc", &self.desc)
            .field("f", &"function")
            .finish()
    }
}

impl FunctionTool {
    pub fn new(desc: ToolDesc, f: Arc<ToolFunc>) -> Self {
        Self { desc, f }
    }
}

#[async_trait]
impl ToolBehavior for FunctionTool {
    fn desc(&self) -> ToolDesc {
        self.desc.clone()
    }

    async fn run(&self, args: serde_json::Value) -> anyhow::Result<serde_json::Value> {
        (self.f)(args).await
    }
}
