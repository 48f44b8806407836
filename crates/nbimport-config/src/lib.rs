//! Configuration for the `nbimport` CLI.
//!
//! TOML profiles layered over built-in defaults and `NBIMPORT_*`
//! environment variables, Vault token resolution (env + keyring +
//! plaintext), and translation of a Vault secret into
//! `nbimport_core::NetboxConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use nbimport_api::{NetboxSecret, TlsMode, TransportConfig};
use nbimport_core::{NetboxConfig, TlsVerification, UpdatePolicy};

/// Token used against a local development Vault when nothing else is set.
pub const DEVELOPMENT_VAULT_TOKEN: &str = "developer_token";

const KEYRING_SERVICE: &str = "nbimport";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Settings every profile starts from.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named overrides, e.g. one per NetBox environment.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_vault_url")]
    pub vault_url: String,

    #[serde(default = "default_vault_mount")]
    pub vault_mount: String,

    /// Secret holding the NetBox URL and API token.
    #[serde(default = "default_secret_path")]
    pub secret_path: String,

    #[serde(default = "default_url_key")]
    pub url_key: String,

    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Vault token (plaintext; prefer `VAULT_TOKEN` or the keyring).
    pub vault_token: Option<String>,

    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Path to a custom CA certificate for NetBox.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Update devices that already exist.
    #[serde(default = "default_true")]
    pub update: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            vault_url: default_vault_url(),
            vault_mount: default_vault_mount(),
            secret_path: default_secret_path(),
            url_key: default_url_key(),
            token_key: default_token_key(),
            vault_token: None,
            tls_verify: true,
            ca_cert: None,
            timeout: default_timeout(),
            update: true,
        }
    }
}

fn default_vault_url() -> String {
    "http://vault-dev".into()
}
fn default_vault_mount() -> String {
    "secret".into()
}
fn default_secret_path() -> String {
    "infra/netbox".into()
}
fn default_url_key() -> String {
    "netbox_url".into()
}
fn default_token_key() -> String {
    "api_token".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

/// A named profile. Unset fields fall back to `[defaults]`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    pub vault_url: Option<String>,
    pub vault_mount: Option<String>,
    pub secret_path: Option<String>,
    pub url_key: Option<String>,
    pub token_key: Option<String>,
    pub vault_token: Option<String>,
    pub tls_verify: Option<bool>,
    pub ca_cert: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub update: Option<bool>,
}

// ── Resolved settings ───────────────────────────────────────────────

/// Effective settings for one run, after profile overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Profile name, used for keyring lookups.
    pub profile: String,
    pub vault_url: Url,
    pub vault_mount: String,
    pub secret_path: String,
    pub url_key: String,
    pub token_key: String,
    pub vault_token: Option<String>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub update_policy: UpdatePolicy,
}

impl Settings {
    /// Resolve `profile` (or the configured default) against `config`.
    pub fn resolve(config: &Config, profile: Option<&str>) -> Result<Self, ConfigError> {
        let name = profile
            .or(config.default_profile.as_deref())
            .unwrap_or("default");
        let overrides = match config.profiles.get(name) {
            Some(p) => p.clone(),
            // Only an explicitly requested profile has to exist.
            None if profile.is_some() => {
                return Err(ConfigError::UnknownProfile {
                    profile: name.into(),
                });
            }
            None => Profile::default(),
        };
        let d = &config.defaults;

        let vault_url_raw = overrides.vault_url.unwrap_or_else(|| d.vault_url.clone());
        let vault_url = parse_url("vault_url", &vault_url_raw)?;

        let tls_verify = overrides.tls_verify.unwrap_or(d.tls_verify);
        let ca_cert = overrides.ca_cert.or_else(|| d.ca_cert.clone());
        let tls = match (tls_verify, ca_cert) {
            (false, _) => TlsVerification::DangerAcceptInvalid,
            (true, Some(path)) => TlsVerification::CustomCa(path),
            (true, None) => TlsVerification::SystemDefaults,
        };

        let update = overrides.update.unwrap_or(d.update);

        Ok(Self {
            profile: name.to_owned(),
            vault_url,
            vault_mount: overrides.vault_mount.unwrap_or_else(|| d.vault_mount.clone()),
            secret_path: overrides.secret_path.unwrap_or_else(|| d.secret_path.clone()),
            url_key: overrides.url_key.unwrap_or_else(|| d.url_key.clone()),
            token_key: overrides.token_key.unwrap_or_else(|| d.token_key.clone()),
            vault_token: overrides.vault_token.or_else(|| d.vault_token.clone()),
            tls,
            timeout: Duration::from_secs(overrides.timeout.unwrap_or(d.timeout)),
            update_policy: UpdatePolicy::from_no_update(!update),
        })
    }

    /// HTTP transport for the Vault client. Shares TLS and timeout
    /// settings with the NetBox connection.
    pub fn vault_transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }

    /// Turn the NetBox secret read from Vault into a connection config.
    pub fn netbox_config(&self, secret: NetboxSecret) -> Result<NetboxConfig, ConfigError> {
        let url = parse_url(&self.url_key, &secret.url)?;
        let mut config = NetboxConfig::new(url, secret.token);
        config.tls = self.tls.clone();
        config.timeout = self.timeout;
        Ok(config)
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "netops", "nbimport").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nbimport");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `NBIMPORT_*` variables
/// (`NBIMPORT_DEFAULTS__VAULT_URL`, `NBIMPORT_DEFAULT_PROFILE`, ...).
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NBIMPORT_").split("__"))
}

/// Load the full config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full config from `path` + environment. A missing file is not
/// an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading configuration");
    Ok(figment(path).extract()?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Where the Vault token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keyring,
    Config,
    DevelopmentDefault,
}

/// Resolve the Vault token: `VAULT_TOKEN`, then the system keyring
/// (`nbimport` / `{profile}/vault-token`), then plaintext config, then the
/// development default.
pub fn resolve_vault_token(settings: &Settings) -> (SecretString, TokenSource) {
    resolve_vault_token_with(settings, std::env::var("VAULT_TOKEN").ok(), keyring_token)
}

fn keyring_token(profile: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile}/vault-token"))
        .ok()
        .and_then(|entry| entry.get_password().ok())
}

fn resolve_vault_token_with(
    settings: &Settings,
    env: Option<String>,
    keyring: impl FnOnce(&str) -> Option<String>,
) -> (SecretString, TokenSource) {
    // 1. Environment
    if let Some(token) = env.filter(|t| !t.is_empty()) {
        return (SecretString::from(token), TokenSource::Environment);
    }

    // 2. System keyring
    if let Some(token) = keyring(&settings.profile) {
        return (SecretString::from(token), TokenSource::Keyring);
    }

    // 3. Plaintext in config
    if let Some(ref token) = settings.vault_token {
        return (SecretString::from(token.clone()), TokenSource::Config);
    }

    (
        SecretString::from(DEVELOPMENT_VAULT_TOKEN.to_owned()),
        TokenSource::DevelopmentDefault,
    )
}
