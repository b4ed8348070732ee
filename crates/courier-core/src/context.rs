//! Bounded conversation context.
//!
//! `ContextWindow` owns the two length policies around a user's history:
//! how much is sent upstream (`max_turns`, newest kept) and how much is
//! stored at all (`history_cap`, oldest evicted). Pure transformation,
//! no IO -- the turn engine hands it records and gets message lists back.

use courier_types::llm::Message;
use courier_types::user::{HistoryEntry, MessageRole, UserRecord};

/// Length-based trimming policy for prompts and stored history.
#[derive(Debug, Clone, Copy)]
pub struct ContextWindow {
    /// Maximum messages in an upstream prompt, counting the new turn.
    max_turns: usize,
    /// Maximum stored history entries per user.
    history_cap: usize,
}

impl ContextWindow {
    /// Both bounds are clamped to at least one entry: the newest turn is
    /// always kept.
    pub fn new(max_turns: usize, history_cap: usize) -> Self {
        Self {
            max_turns: max_turns.max(1),
            history_cap: history_cap.max(1),
        }
    }

    /// Assemble the upstream prompt: the newest history entries plus the
    /// new user turn, oldest first, at most `max_turns` messages total.
    ///
    /// Does not mutate the record -- the new turn is only appended to
    /// history once the completion succeeds.
    pub fn build_prompt(&self, history: &[HistoryEntry], new_text: &str) -> Vec<Message> {
        let keep = self.max_turns - 1;
        let start = history.len().saturating_sub(keep);
        let mut prompt: Vec<Message> = history[start..]
            .iter()
            .map(|entry| Message {
                role: entry.role,
                content: entry.content.clone(),
            })
            .collect();
        prompt.push(Message::user(new_text));
        prompt
    }

    /// Append one turn to the record's history, evicting oldest entries
    /// beyond the cap.
    pub fn append(&self, record: &mut UserRecord, role: MessageRole, content: impl Into<String>) {
        record.history.push(HistoryEntry::new(role, content));
        if record.history.len() > self.history_cap {
            let excess = record.history.len() - self.history_cap;
            record.history.drain(..excess);
        }
    }
}
