use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::value::Message;

/// Per-thread conversation history, held in memory for the lifetime of the
/// process. Threads are created on first use.
#[derive(Clone, Debug, Default)]
pub struct SessionMemory {
    threads: Arc<Mutex<HashMap<String, Vec<Message>>>>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a thread's history, oldest first. An unknown thread id
    /// reads as empty.
    pub fn history(&self, thread_id: &str) -> Vec<Message> {
        self.threads
            .lock()
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn append(&self, thread_id: &str, message: Message) {
        self.threads
            .lock()
            .entry(thread_id.to_owned())
            .or_default()
            .push(message);
    }

    pub fn clear(&self, thread_id: &str) {
        self.threads.lock().remove(thread_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Role;

    #[test]
    fn unknown_thread_is_empty() {
        let memory = SessionMemory::new();
        assert!(memory.history("none").is_empty());
    }

    #[test]
    fn append_preserves_order_per_thread() {
        let memory = SessionMemory::new();
        memory.append("a", Message::user("first"));
        memory.append("b", Message::user("other thread"));
        memory.append("a", Message::new(Role::Assistant));

        let history = memory.history("a");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text(), "first");
        assert_eq!(memory.history("b").len(), 1);
    }

    #[test]
    fn clear_forgets_one_thread_only() {
        let memory = SessionMemory::new();
        memory.append("a", Message::user("x"));
        memory.append("b", Message::user("y"));
        memory.clear("a");
        assert!(memory.history("a").is_empty());
        assert_eq!(memory.history("b").len(), 1);
    }
}
