//! Per-session conversation history
//!
//! Plain keyed message lists with a truncation policy. One lock guards the
//! process-wide session map; entries are cloned out so callers never hold
//! the lock across classification or provider calls.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Display label used in formatted transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// In-memory store of per-session conversation histories
#[derive(Debug)]
pub struct SessionStore {
    max_messages: usize,
    histories: Mutex<HashMap<String, Vec<Message>>>,
}

impl SessionStore {
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages: max_messages.max(1),
            histories: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Message>>> {
        self.histories.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a message to the session's history
    pub fn append(&self, session_id: &str, message: Message) {
        let mut histories = self.lock();
        histories.entry(session_id.to_string()).or_default().push(message);
    }

    /// Clone of the session's history (empty if unknown session)
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.lock().get(session_id).cloned().unwrap_or_default()
    }

    /// Number of stored messages for the session
    pub fn len(&self, session_id: &str) -> usize {
        self.lock().get(session_id).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, session_id: &str) -> bool {
        self.len(session_id) == 0
    }

    /// Drop the session's history entirely
    pub fn clear(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    /// Keep only the most recent `max_messages` entries
    pub fn prune(&self, session_id: &str) {
        let mut histories = self.lock();
        if let Some(messages) = histories.get_mut(session_id) {
            if messages.len() > self.max_messages {
                let excess = messages.len() - self.max_messages;
                messages.drain(..excess);
            }
        }
    }

    /// Render the most recent `limit` turns as a prompt-ready transcript
    pub fn format_history(&self, session_id: &str, limit: usize) -> String {
        let messages = self.history(session_id);
        if messages.is_empty() {
            return "No previous conversation.".to_string();
        }
        let skip = messages.len().saturating_sub(limit);
        messages
            .iter()
            .skip(skip)
            .map(|m| format!("{}: {}", m.role.label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_append_and_history() {
        let store = SessionStore::new(20);
        store.append("s1", Message::user("Hi"));
        store.append("s1", Message::assistant("Hello! Where are you headed?"));
        let history = store.history("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].content, "Hello! Where are you headed?");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(20);
        store.append("a", Message::user("one"));
        store.append("b", Message::user("two"));
        assert_eq!(store.len("a"), 1);
        assert_eq!(store.len("b"), 1);
        assert!(store.history("c").is_empty());
    }

    #[test]
    fn test_clear() {
        let store = SessionStore::new(20);
        store.append("s1", Message::user("Hi"));
        store.clear("s1");
        assert!(store.is_empty("s1"));
    }

    #[test]
    fn test_prune_keeps_newest() {
        let store = SessionStore::new(3);
        for i in 0..5 {
            store.append("s1", Message::user(format!("m{i}")));
        }
        store.prune("s1");
        let history = store.history("s1");
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "m2");
        assert_eq!(history[2].content, "m4");
    }

    #[test]
    fn test_format_history_empty() {
        let store = SessionStore::new(20);
        assert_eq!(store.format_history("nope", 10), "No previous conversation.");
    }

    #[test]
    fn test_format_history_labels_and_limit() {
        let store = SessionStore::new(20);
        store.append("s1", Message::user("What about Rome?"));
        store.append("s1", Message::assistant("Rome is lovely in autumn."));
        store.append("s1", Message::user("And Tokyo?"));
        let formatted = store.format_history("s1", 2);
        assert_eq!(formatted, "Assistant: Rome is lovely in autumn.\nUser: And Tokyo?");
    }

    #[test]
    fn test_max_messages_floor() {
        // Zero would make every prune erase the session
        let store = SessionStore::new(0);
        store.append("s1", Message::user("kept"));
        store.prune("s1");
        assert_eq!(store.len("s1"), 1);
    }
}
