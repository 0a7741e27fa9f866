//! Chat history kept for display.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who wrote a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }

    /// Visual marker shown before the label.
    pub fn marker(&self) -> &'static str {
        match self {
            Role::User => "🧑",
            Role::Assistant => "🤖",
        }
    }
}

/// One line of the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatEntry {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatEntry {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }

    /// Markdown line, e.g. `**🧑 You:** hello`.
    pub fn to_markdown(&self) -> String {
        format!(
            "**{} {}:** {}",
            self.role.marker(),
            self.role.label(),
            self.text
        )
    }
}

/// A rendered entry for clients that draw their own markup.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedEntry {
    pub role: Role,
    pub label: &'static str,
    pub marker: &'static str,
    pub text: String,
    /// The same entry as a markdown line.
    pub markdown: String,
    pub at: DateTime<Utc>,
}

impl From<&ChatEntry> for RenderedEntry {
    fn from(entry: &ChatEntry) -> Self {
        Self {
            role: entry.role,
            label: entry.role.label(),
            marker: entry.role.marker(),
            text: entry.text.clone(),
            markdown: entry.to_markdown(),
            at: entry.at,
        }
    }
}

/// Append-only question/answer history.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    entries: Vec<ChatEntry>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answered question: the question first, then the answer.
    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.entries.push(ChatEntry::new(Role::User, question));
        self.entries.push(ChatEntry::new(Role::Assistant, answer));
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Structured entries in insertion order.
    pub fn render(&self) -> Vec<RenderedEntry> {
        self.entries.iter().map(RenderedEntry::from).collect()
    }
}
