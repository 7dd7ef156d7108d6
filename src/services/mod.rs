//! Services
//!
//! Business logic services for the assistant engine.

pub mod actions;
pub mod confirmations;
pub mod orchestrator;
