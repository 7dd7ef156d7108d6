//! CaseDesk Core
//!
//! Foundational data model, envelope parsing, and capability traits for the
//! CaseDesk Assistant workspace. This crate has zero dependencies on
//! application-level code.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `chat` - Conversation stream model (`ChatMessage`, `ToolCall`, `ConnectionStatus`)
//! - `outcome` - Tool-result envelopes and discrimination (`ToolOutcome`)
//! - `capabilities` - Host capability traits (`Navigator`, `MutationRunner`, ...)
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/async-trait/thiserror** - keeps build times minimal
//! 2. **Trait-based seams** - every outward effect is a host-supplied trait object
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod capabilities;
pub mod chat;
pub mod error;
pub mod outcome;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Conversation Stream Model ──────────────────────────────────────────
pub use chat::{ChatMessage, ConnectionStatus, MessageRole, ToolCall, ToolCallState};

// ── Tool Outcome Envelopes ─────────────────────────────────────────────
pub use outcome::{
    parse_tool_outcome, ClientActionCall, ClientActionEnvelope, PermissionRequest, ToolOutcome,
};

// ── Host Capabilities ──────────────────────────────────────────────────
pub use capabilities::{MessageSink, MutationRunner, Navigator, ResultStore, ScrollSurface};
