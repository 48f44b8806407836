use thiserror::Error;

/// Top-level error type for the `nbimport-api` crate.
///
/// Covers every failure mode of both HTTP surfaces: authentication,
/// transport, NetBox API rejections, Vault lookups, and body decoding.
/// `nbimport-core` maps these into import-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token rejected (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── NetBox API ──────────────────────────────────────────────────
    /// Non-success response from NetBox, with the server's detail text.
    #[error("NetBox API error (HTTP {status}): {message}")]
    Netbox { status: u16, message: String },

    /// A lookup that must match at most one object matched several.
    #[error("Lookup for {query} matched {count} objects, expected at most one")]
    AmbiguousLookup { query: String, count: u64 },

    // ── Vault ───────────────────────────────────────────────────────
    /// Secret path does not exist (HTTP 404).
    #[error("Vault secret not found at '{path}'")]
    SecretNotFound { path: String },

    /// Vault answered but the secret lacks an expected key.
    #[error("Vault secret at '{path}' has no key '{key}'")]
    SecretKeyMissing { path: String, key: String },

    /// Any other non-success response from Vault.
    #[error("Vault error (HTTP {status}): {message}")]
    Vault { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
