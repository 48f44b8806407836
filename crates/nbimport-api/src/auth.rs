use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Which token header a client injects on every request.
///
/// Marker enum (no data) -- the token itself is passed separately as a
/// [`SecretString`] so secret material never lives in this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// NetBox API token: `Authorization: Token <token>`.
    NetboxToken,
    /// Vault token: `X-Vault-Token: <token>`.
    VaultToken,
}

impl AuthScheme {
    /// The header carrying the credential.
    pub fn header_name(&self) -> HeaderName {
        match self {
            Self::NetboxToken => AUTHORIZATION,
            Self::VaultToken => HeaderName::from_static("x-vault-token"),
        }
    }

    /// Build the default header map for a client using this scheme.
    ///
    /// The header value is marked sensitive so it never shows up in
    /// `Debug` output or request logs.
    pub fn headers(&self, token: &SecretString) -> Result<HeaderMap, Error> {
        let raw = match self {
            Self::NetboxToken => format!("Token {}", token.expose_secret()),
            Self::VaultToken => token.expose_secret().to_owned(),
        };

        let mut value = HeaderValue::from_str(&raw).map_err(|e| Error::Authentication {
            message: format!("invalid token header value: {e}"),
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(self.header_name(), value);
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn netbox_token_uses_authorization_header() {
        let token = SecretString::from("abc123".to_owned());
        let headers = AuthScheme::NetboxToken.headers(&token).unwrap();
        let value = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value.to_str().unwrap(), "Token abc123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn vault_token_is_sent_raw() {
        let token = SecretString::from("s.devtoken".to_owned());
        let headers = AuthScheme::VaultToken.headers(&token).unwrap();
        assert_eq!(headers.get("x-vault-token").unwrap(), "s.devtoken");
    }

    #[test]
    fn rejects_header_breaking_tokens() {
        let token = SecretString::from("bad\ntoken".to_owned());
        let result = AuthScheme::VaultToken.headers(&token);
        assert!(matches!(result, Err(Error::Authentication { .. })));
    }
}
