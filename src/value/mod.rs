pub(crate) mod document;
pub(crate) mod embedding;
pub(crate) mod message;
pub(crate) mod tool_desc;

pub use document::{Document, Metadata};
pub use embedding::Embedding;
pub use message::{FinishReason, Message, MessageOutput, Part, Role, ToolCall};
pub use tool_desc::{ToolDesc, ToolDescBuilder};
