// ── Runtime connection configuration ──
//
// These types describe *how* to reach NetBox and what to do with devices
// that already exist. They carry credential data but never touch disk:
// the CLI resolves the Vault secret and hands a `NetboxConfig` in.

use std::time::Duration;

use nbimport_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (`--no-tls-verify`).
    DangerAcceptInvalid,
}

/// What to do with a device NetBox already knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Patch the existing device and its interfaces.
    #[default]
    UpdateExisting,
    /// Leave it alone and report the record as skipped.
    SkipExisting,
}

impl UpdatePolicy {
    pub fn from_no_update(no_update: bool) -> Self {
        if no_update {
            Self::SkipExisting
        } else {
            Self::UpdateExisting
        }
    }
}

/// Configuration for talking to a single NetBox instance.
#[derive(Debug, Clone)]
pub struct NetboxConfig {
    /// NetBox URL, with or without the trailing `/api`.
    pub url: Url,
    /// API token.
    pub token: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl NetboxConfig {
    pub fn new(url: Url, token: SecretString) -> Self {
        Self {
            url,
            token,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build a [`TransportConfig`] for the api crate.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn no_update_flag_maps_to_skip() {
        assert_eq!(UpdatePolicy::from_no_update(true), UpdatePolicy::SkipExisting);
        assert_eq!(UpdatePolicy::from_no_update(false), UpdatePolicy::UpdateExisting);
    }

    #[test]
    fn transport_carries_tls_and_timeout() {
        let mut config = NetboxConfig::new(
            Url::parse("https://netbox.example.com").unwrap(),
            SecretString::from("t".to_owned()),
        );
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }
}
