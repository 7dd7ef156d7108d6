//! Chat Stream Models
//!
//! Data structures for the assistant conversation stream: ordered messages,
//! the tool calls attached to assistant messages, and the transport
//! connection status. Messages are treated as immutable, append-only records;
//! the same message object may be observed many times as the stream re-renders.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Authored by the human user
    User,
    /// Authored by the conversational agent
    Assistant,
}

/// Execution state of a tool call as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallState {
    /// Still executing upstream; no result yet
    Pending,
    /// Finished successfully; `result` carries the serialized payload
    Success,
    /// Finished with an error
    Error,
}

/// Transport connection status for the conversation stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Idle; the last exchange completed
    Ready,
    /// A user message has been submitted, response not yet started
    Submitted,
    /// The agent response is streaming in
    Streaming,
    /// The stream ended in a terminal error
    Error,
}

/// A single tool invocation attached to an assistant message.
///
/// Immutable once it carries a result. Identified within its owning message
/// by [`ToolCall::dedup_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the invoked capability (e.g., "viewCase", "updateCaseStatus")
    pub tool_name: String,
    /// Serialized arguments the capability was invoked with
    pub arguments: String,
    /// Execution state reported by the transport
    pub state: ToolCallState,
    /// Serialized result payload, present once the capability has finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ToolCall {
    /// Create a tool call that is still executing upstream.
    pub fn pending(tool_name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: arguments.into(),
            state: ToolCallState::Pending,
            result: None,
        }
    }

    /// Create a finished tool call carrying a serialized result payload.
    pub fn finished(
        tool_name: impl Into<String>,
        arguments: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: arguments.into(),
            state: ToolCallState::Success,
            result: Some(result.into()),
        }
    }

    /// Whether the transport has delivered a result for this call yet.
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// Deterministic identity of this call within its owning message.
    ///
    /// Derived from the tool name and the call's position in the message's
    /// tool-call array, so the same call observed across repeated renders of
    /// the same message always maps to the same key.
    pub fn dedup_key(&self, index: usize) -> String {
        format!("{}:{}", self.tool_name, index)
    }
}

/// A message in the ordered conversation stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier
    pub id: String,
    /// Message author
    pub role: MessageRole,
    /// Rendered text content
    pub content: String,
    /// Tool calls attached to this message (assistant messages only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant message with no tool calls.
    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Attach a tool call, preserving array order.
    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    /// Whether this message was authored by the agent.
    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}
