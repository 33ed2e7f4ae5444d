mod memory;

use async_stream::try_stream;

pub use memory::SessionMemory;

use crate::{
    constants::{MAX_TOOL_ROUNDS, SYSTEM_PROMPT},
    model::{InferenceConfig, LangModel, LangModelInference as _},
    tool::{Tool, ToolRegistry},
    utils::BoxStream,
    value::{FinishReason, Message, MessageOutput, Role},
};

/// A conversation agent: a language model bound to a set of tools and a
/// session memory. Each call to [`Agent::run`] appends the user's message
/// to the thread, then alternates model calls and tool executions until
/// the model answers without requesting a tool.
#[derive(Debug)]
pub struct Agent {
    lang_model: LangModel,
    tools: ToolRegistry,
    memory: SessionMemory,
    config: InferenceConfig,
}

impl Agent {
    pub fn new(lang_model: LangModel) -> Self {
        Self {
            lang_model,
            tools: ToolRegistry::new(),
            memory: SessionMemory::new(),
            config: InferenceConfig::default()
                .with_system_message(SYSTEM_PROMPT)
                .with_temperature(0.0),
        }
    }

    pub fn with_config(mut self, config: InferenceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.register(tool);
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    /// Runs one user turn on `thread_id`, yielding every message the turn
    /// produces (assistant messages, including intermediate tool-calling
    /// ones, and tool results) in order. The turn ends when the model
    /// replies without tool calls; a model that keeps requesting tools past
    /// the round cap aborts the turn with an error.
    pub fn run<'a>(
        &'a mut self,
        thread_id: &'a str,
        text: impl Into<String> + 'a,
    ) -> BoxStream<'a, anyhow::Result<MessageOutput>> {
        let text = text.into();
        Box::pin(try_stream! {
            self.memory.append(thread_id, Message::user(text));

            for round in 0.. {
                if round >= MAX_TOOL_ROUNDS {
                    Err(anyhow::anyhow!(
                        "model requested tools for {MAX_TOOL_ROUNDS} consecutive rounds, aborting turn"
                    ))?;
                }

                let history = self.memory.history(thread_id);
                let output = self
                    .lang_model
                    .infer(history, self.tools.descriptions(), self.config.clone())
                    .await?;
                self.memory.append(thread_id, output.message.clone());
                let tool_calls = output.message.tool_calls.clone();
                let done = !output.message.has_tool_calls();
                yield output;

                if done {
                    break;
                }

                for call in tool_calls {
                    log::debug!("dispatching tool '{}' for thread {thread_id}", call.name);
                    let value = self.tools.dispatch(&call.name, call.arguments).await;
                    let result = Message::tool_result(&call.id, &call.name, value);
                    self.memory.append(thread_id, result.clone());
                    yield MessageOutput {
                        message: result,
                        finish_reason: FinishReason::Stop,
                    };
                }
            }
        })
    }

    /// Convenience wrapper over [`Agent::run`] that drains the stream and
    /// returns the final assistant text.
    pub async fn send(&mut self, thread_id: &str, text: impl Into<String>) -> anyhow::Result<String> {
        use futures::StreamExt as _;

        let mut last_text = String::new();
        let mut stream = self.run(thread_id, text.into());
        while let Some(output) = stream.next().await {
            let output = output?;
            if output.message.role == Role::Assistant && !output.message.has_tool_calls() {
                last_text = output.message.text();
            }
        }
        Ok(last_text)
    }
}
