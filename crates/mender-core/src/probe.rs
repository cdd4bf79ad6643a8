//! Boundary to the live page.
//!
//! The resolver only needs three primitives from a page: a bounded wait for a
//! selector, a visibility check on a returned element, and an existence-only
//! query. Element handles belong to the implementation; the resolver holds
//! them just long enough to hand them back to its caller.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single probe
///
/// Misses (timeout, not found, a selector the engine rejects) are expected
/// selector drift and move the resolver on to the next candidate. Anything
/// else means the page itself is unusable and aborts the resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Timed out after {timeout_ms}ms waiting for '{selector}'")]
    Timeout { selector: String, timeout_ms: u64 },

    #[error("No element matches '{selector}'")]
    NotFound { selector: String },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Page disconnected: {0}")]
    Disconnected(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ProbeError {
    /// True for failures caused by the selector rather than the page
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            ProbeError::Timeout { .. } | ProbeError::NotFound { .. } | ProbeError::InvalidSelector { .. }
        )
    }
}

pub trait Probe {
    type Element;

    /// Wait up to `timeout` for `selector` to match an element
    fn locate(&mut self, selector: &str, timeout: Duration) -> Result<Self::Element, ProbeError>;

    fn is_visible(&mut self, element: &Self::Element) -> Result<bool, ProbeError>;

    /// Existence check without waiting
    fn query(&mut self, selector: &str) -> Result<Option<Self::Element>, ProbeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_failures_are_misses() {
        let timeout = ProbeError::Timeout {
            selector: "input".to_string(),
            timeout_ms: 2000,
        };
        let not_found = ProbeError::NotFound {
            selector: "input".to_string(),
        };
        let invalid = ProbeError::InvalidSelector {
            selector: "input[".to_string(),
            reason: "unterminated attribute".to_string(),
        };

        assert!(timeout.is_miss());
        assert!(not_found.is_miss());
        assert!(invalid.is_miss());
    }

    #[test]
    fn test_adapter_failures_are_not_misses() {
        assert!(!ProbeError::Disconnected("socket closed".to_string()).is_miss());
        assert!(!ProbeError::Protocol("bad frame".to_string()).is_miss());
    }

    #[test]
    fn test_timeout_message_names_selector() {
        let err = ProbeError::Timeout {
            selector: "input#user".to_string(),
            timeout_ms: 2000,
        };
        assert_eq!(err.to_string(), "Timed out after 2000ms waiting for 'input#user'");
    }
}
