//! Conversation Tracking
//!
//! Render-spanning dedup state for the orchestrator. The message stream is
//! replay-prone: the same message object is observed across many renders, so
//! every tool call and client action is tracked by a stable derived key and
//! handled at most once per conversation lifetime.
//!
//! The tracker also watches the message-list length across observations. A
//! large drop means the hosting conversation was replaced wholesale and all
//! orchestration state must be discarded; small drops (display trimming,
//! in-conversation edits) must not discard anything.

use std::collections::HashSet;

/// Message-count drop beyond which the list is treated as a new conversation.
/// A best-effort heuristic: the transport supplies no conversation id.
const RESET_DROP_THRESHOLD: usize = 5;

/// Dedup sets plus reset detection, owned exclusively by the orchestrator.
#[derive(Debug, Default)]
pub struct ConversationTracker {
    /// Tool-call dedup keys already classified
    processed: HashSet<String>,
    /// Client-action keys already executed (dedup key + action type)
    executed_actions: HashSet<String>,
    /// Message-list length at the previous observation
    last_message_count: usize,
}

impl ConversationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current message-list length.
    ///
    /// Returns `true` when the drop relative to the previous observation
    /// exceeds the reset threshold; the dedup sets are cleared before
    /// returning. The caller is responsible for clearing the confirmation
    /// registry alongside.
    pub fn observe_message_count(&mut self, count: usize) -> bool {
        let previous = self.last_message_count;
        self.last_message_count = count;
        if previous > count && previous - count > RESET_DROP_THRESHOLD {
            tracing::debug!(previous, count, "message list replaced; clearing dedup state");
            self.clear();
            true
        } else {
            false
        }
    }

    /// Whether a tool call has already been classified.
    pub fn is_processed(&self, key: &str) -> bool {
        self.processed.contains(key)
    }

    /// Mark a tool call classified. Idempotent.
    pub fn mark_processed(&mut self, key: impl Into<String>) {
        self.processed.insert(key.into());
    }

    /// Whether a client action has already been executed.
    pub fn is_action_executed(&self, action_key: &str) -> bool {
        self.executed_actions.contains(action_key)
    }

    /// Mark a client action executed. Idempotent.
    pub fn mark_action_executed(&mut self, action_key: impl Into<String>) {
        self.executed_actions.insert(action_key.into());
    }

    /// Drop both dedup sets wholesale. The observed message count is kept so
    /// the next observation compares against the fresh list.
    pub fn clear(&mut self) {
        self.processed.clear();
        self.executed_actions.clear();
    }
}
