//! Host Capability Traits
//!
//! The engine performs no I/O of its own. Every outward effect goes through
//! one of these traits, supplied by the host as `Arc<dyn Trait>`: route
//! changes, window/element scrolling, the named mutating operations behind
//! confirmations, optional persistence of executed outcomes, and posting
//! synthetic status messages back into the conversation stream.
//!
//! Implementations must not panic; failures are reported as `CoreResult`
//! errors and converted into data values by the engine.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;

/// Client-side routing capability.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Perform a client-side route change to `path`.
    async fn push(&self, path: &str) -> CoreResult<()>;

    /// Soft-reload the current route's server data without a full navigation.
    async fn refresh(&self) -> CoreResult<()>;
}

/// Scrolling capability over the host's document surface.
#[async_trait]
pub trait ScrollSurface: Send + Sync {
    /// Scroll the window to its origin.
    async fn scroll_to_top(&self, smooth: bool) -> CoreResult<()>;

    /// Scroll the window to the document end.
    async fn scroll_to_bottom(&self, smooth: bool) -> CoreResult<()>;

    /// Scroll to the element carrying the scroll-target marker attribute for
    /// `target`. Returns `Ok(false)` when no such element exists.
    async fn scroll_to_marker(&self, target: &str, smooth: bool) -> CoreResult<bool>;

    /// Scroll to the element whose id is `target`. Returns `Ok(false)` when
    /// no such element exists.
    async fn scroll_to_element_id(&self, target: &str, smooth: bool) -> CoreResult<bool>;
}

/// Invokes a named mutating operation on the case domain.
///
/// The engine treats operations as opaque: it passes the stored name and
/// arguments through and reports the returned JSON verbatim.
#[async_trait]
pub trait MutationRunner: Send + Sync {
    async fn invoke(&self, tool_name: &str, arguments: &Value) -> CoreResult<Value>;
}

/// Optional persistence of executed confirmation outcomes, so a page reload
/// does not lose the record of what already ran. Persistence failures are
/// logged by the engine and never mask execution success.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn persist(
        &self,
        confirmation_key: &str,
        tool_name: &str,
        result: &Value,
    ) -> CoreResult<()>;
}

/// Posts a short synthetic status message into the same conversation stream,
/// keeping the agent's context in sync with real-world effects.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_text(&self, text: &str) -> CoreResult<()>;
}
