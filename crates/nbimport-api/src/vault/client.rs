// Vault KV v2 HTTP client
//
// Wraps `reqwest::Client` with the `X-Vault-Token` header, mount-aware URL
// construction, and the KV v2 `{ data: { data: {...}, metadata } }`
// envelope.

use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::AuthScheme;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Vault error bodies: `{"errors": ["permission denied"]}`.
#[derive(serde::Deserialize)]
struct VaultErrors {
    #[serde(default)]
    errors: Vec<String>,
}

/// NetBox connection details extracted from a Vault secret.
#[derive(Debug, Clone)]
pub struct NetboxSecret {
    pub url: String,
    pub token: SecretString,
}

impl NetboxSecret {
    /// Pull the NetBox URL and API token out of a KV v2 read response.
    ///
    /// Both keys live under `data.data` in the response body.
    pub fn from_response(
        path: &str,
        response: &Value,
        url_key: &str,
        token_key: &str,
    ) -> Result<Self, Error> {
        let lookup = |key: &str| -> Result<String, Error> {
            response
                .pointer(&format!("/data/data/{key}"))
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| Error::SecretKeyMissing {
                    path: path.to_owned(),
                    key: key.to_owned(),
                })
        };

        Ok(Self {
            url: lookup(url_key)?,
            token: SecretString::from(lookup(token_key)?),
        })
    }
}

/// Raw HTTP client for a Vault KV v2 secrets engine.
pub struct VaultClient {
    http: reqwest::Client,
    base_url: Url,
    mount: String,
}

impl VaultClient {
    /// Create a Vault client authenticated with a token.
    ///
    /// `base_url` is the Vault root (e.g. `https://vault.example.com:8200`);
    /// `mount` is the KV v2 engine mount point (usually `secret`).
    pub fn new(
        base_url: &str,
        token: &SecretString,
        mount: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = AuthScheme::VaultToken.headers(token)?;
        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            mount: mount.into(),
        })
    }

    /// Create a Vault client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        mount: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            mount: mount.into(),
        })
    }

    /// Build `{base}/v1/{mount}/data/{path}`.
    fn secret_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mount = self.mount.trim_matches('/');
        let path = path.trim_matches('/');
        Ok(Url::parse(&format!("{base}/v1/{mount}/data/{path}"))?)
    }

    /// Read the latest version of a KV v2 secret.
    ///
    /// Returns the full response body; the secret's key/value pairs live
    /// under `data.data`.
    pub async fn read_secret(&self, path: &str) -> Result<Value, Error> {
        let url = self.secret_url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            });
        }

        let message = serde_json::from_str::<VaultErrors>(&body)
            .ok()
            .filter(|e| !e.errors.is_empty())
            .map_or_else(|| status.to_string(), |e| e.errors.join("; "));

        Err(match status {
            reqwest::StatusCode::NOT_FOUND => Error::SecretNotFound {
                path: path.to_owned(),
            },
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Error::Authentication { message }
            }
            _ => Error::Vault {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Read a secret and extract NetBox connection details from it.
    pub async fn netbox_secret(
        &self,
        path: &str,
        url_key: &str,
        token_key: &str,
    ) -> Result<NetboxSecret, Error> {
        let response = self.read_secret(path).await?;
        NetboxSecret::from_response(path, &response, url_key, token_key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    #[test]
    fn secret_url_joins_mount_and_path() {
        let client =
            VaultClient::with_client(reqwest::Client::new(), "http://vault:8200/", "secret/")
                .unwrap();
        let url = client.secret_url("/infra/netbox").unwrap();
        assert_eq!(url.as_str(), "http://vault:8200/v1/secret/data/infra/netbox");
    }

    #[test]
    fn netbox_secret_reads_nested_keys() {
        let body = json!({
            "data": {
                "data": { "netbox_url": "https://netbox", "api_token": "t0k3n" },
                "metadata": { "version": 3 }
            }
        });
        let secret =
            NetboxSecret::from_response("infra/netbox", &body, "netbox_url", "api_token").unwrap();
        assert_eq!(secret.url, "https://netbox");
        assert_eq!(secret.token.expose_secret(), "t0k3n");
    }

    #[test]
    fn netbox_secret_reports_missing_key() {
        let body = json!({ "data": { "data": { "netbox_url": "https://netbox" } } });
        let result = NetboxSecret::from_response("infra/netbox", &body, "netbox_url", "api_token");
        match result {
            Err(Error::SecretKeyMissing { key, .. }) => assert_eq!(key, "api_token"),
            other => panic!("expected SecretKeyMissing, got: {other:?}"),
        }
    }
}
