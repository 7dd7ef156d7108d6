//! Orchestrator Module
//!
//! The engine's core: watches the conversation stream, classifies the tool
//! results attached to the latest assistant message exactly once each, and
//! routes them to immediate client-action execution or to the confirmation
//! registry. Also detects conversation resets and relays approval/denial
//! outcomes back into the stream.

pub mod service;
pub mod tracking;

pub use service::{ChatOrchestrator, ChatOrchestratorBuilder, ObservationReport};
pub use tracking::ConversationTracker;
