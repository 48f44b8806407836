// ── Core error types ──
//
// Import-level errors. Consumers never see HTTP status codes or JSON
// parse failures directly: the `From<nbimport_api::Error>` impl translates
// transport-layer errors into import-appropriate variants.

use std::fmt;

use thiserror::Error;

/// Which half of an input row a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Device,
    Interface,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => f.write_str("device"),
            Self::Interface => f.write_str("interface"),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Record errors ────────────────────────────────────────────────
    /// Schema or derivation failure for a single device or interface.
    #[error("Invalid {kind} '{identifier}': {message}")]
    Validation {
        kind: RecordKind,
        identifier: String,
        message: String,
    },

    /// NetBox refused a create or update for a device or its interfaces.
    #[error("Failed to import {kind} '{identifier}': {message}")]
    Import {
        kind: RecordKind,
        identifier: String,
        message: String,
    },

    /// The input row lacks structure every record needs.
    #[error("Malformed input record: {message}")]
    MalformedInput { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(
        kind: RecordKind,
        identifier: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self::Validation {
            kind,
            identifier: identifier.into(),
            message: message.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nbimport_api::Error> for CoreError {
    fn from(err: nbimport_api::Error) -> Self {
        match err {
            nbimport_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            nbimport_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_builder() {
                    CoreError::Internal(format!("could not build request: {e}"))
                } else if e.is_connect() || e.is_request() || e.is_body() || e.is_decode() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            nbimport_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nbimport_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            nbimport_api::Error::Netbox { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            e @ nbimport_api::Error::AmbiguousLookup { .. } => CoreError::Api {
                message: e.to_string(),
                status: None,
            },
            e @ (nbimport_api::Error::SecretNotFound { .. }
            | nbimport_api::Error::SecretKeyMissing { .. }) => CoreError::Config {
                message: e.to_string(),
            },
            nbimport_api::Error::Vault { status, message } => CoreError::Api {
                message: format!("Vault: {message}"),
                status: Some(status),
            },
            nbimport_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            nbimport_api::Error::Serialization(e) => {
                CoreError::Internal(format!("Serialization error: {e}"))
            }
        }
    }
}
