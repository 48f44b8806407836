//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text. Only setup failures land here: per-record failures
//! are reported in the run summary and never change the exit code.

use miette::Diagnostic;
use thiserror::Error;

use nbimport_config::ConfigError;
use nbimport_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(nbimport::connection_failed),
        help(
            "Check that Vault and NetBox are running and reachable.\n\
             Reason: {reason}\n\
             For self-signed NetBox certificates try: nbimport --no-tls-verify"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(nbimport::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(nbimport::auth_failed),
        help(
            "Check the Vault token (VAULT_TOKEN, keyring entry 'nbimport' / '{profile}/vault-token',\n\
             or vault_token in the config file) and the NetBox API token stored in Vault."
        )
    )]
    AuthFailed { message: String, profile: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Cannot read CSV file {path}")]
    #[diagnostic(
        code(nbimport::input),
        help("Pass the file with --csv-file (-c). Reason: {reason}")
    )]
    Input { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(nbimport::config),
        help("Check the configuration file and NBIMPORT_* environment variables.")
    )]
    Config(#[from] ConfigError),

    #[error("Invalid setup: {message}")]
    #[diagnostic(code(nbimport::setup))]
    Setup { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(nbimport::api_error))]
    Api { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(nbimport::internal))]
    Internal { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(nbimport::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(nbimport::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Config(_) | Self::Setup { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile to authentication failures.
    pub fn with_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.to_owned(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Config { message } => CliError::Setup { message },

            CoreError::Api { message, status: _ } => CliError::Api { message },

            e @ (CoreError::Validation { .. }
            | CoreError::Import { .. }
            | CoreError::MalformedInput { .. }) => CliError::Api {
                message: e.to_string(),
            },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

impl From<nbimport_api::Error> for CliError {
    fn from(err: nbimport_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
