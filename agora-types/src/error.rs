use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the agora workspace.
///
/// This wraps capability mismatches, argument validation errors, exchange-side
/// rejections, transport failures and malformed payloads. Transport failures are
/// never retried inside a connector; they surface unchanged to the caller.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgoraError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "stream/spot").
        capability: String,
    },

    /// Issues with the returned or expected data (missing fields, bad decimals, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument. Raised before any network call.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The exchange answered but rejected the request with a business error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message, including the exchange error code when known.
        msg: String,
    },

    /// Network, HTTP status, authentication or rate-limit failure.
    #[error("{connector} transport failure: {msg}")]
    Transport {
        /// Connector name whose transport failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "order 5c35c02703aa673ceec2a168".
        what: String,
    },

    /// Only part of a paginated result was fetched.
    ///
    /// Reported as a warning inside reports, never returned as a hard failure.
    #[error("truncated result for {what}: fetched {fetched_pages} of {total_pages} pages")]
    Truncated {
        /// What was truncated, e.g. "fills BTC-USDT".
        what: String,
        /// Number of pages actually fetched.
        fetched_pages: u32,
        /// Number of pages the upstream reported.
        total_pages: u32,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl AgoraError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Transport` error with the connector name and message.
    pub fn transport(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Returns true for network/HTTP/auth/rate-limit failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// Capability absence, benign not-found conditions and truncation notices
    /// are not actionable.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(
            self,
            Self::Unsupported { .. } | Self::NotFound { .. } | Self::Truncated { .. }
        )
    }
}

impl From<rust_decimal::Error> for AgoraError {
    fn from(e: rust_decimal::Error) -> Self {
        Self::Data(e.to_string())
    }
}
