// ── Core error types ──
//
// User-facing errors from tunly-core. Malformed links are NOT errors here:
// the codec signals them with `None`. Engine and store implementations
// report failures through the `Engine` / `Store` variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("No profile selected")]
    NoProfileSelected,

    #[error("Operation '{operation}' is not valid while {state}")]
    InvalidState { operation: String, state: String },

    #[error("Another {operation} is already in progress")]
    OperationInProgress { operation: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Profile not found: {identifier}")]
    ProfileNotFound { identifier: String },

    #[error("Subscription not found: {identifier}")]
    SubscriptionNotFound { identifier: String },

    #[error("Invalid proxy link: {reason}")]
    InvalidLink { reason: String },

    // ── External collaborators ───────────────────────────────────────
    #[error("Engine error: {message}")]
    Engine { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    pub(crate) fn busy(operation: &str) -> Self {
        Self::OperationInProgress {
            operation: operation.into(),
        }
    }
}
