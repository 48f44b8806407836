// Hand-crafted async HTTP client for the NetBox REST API.
//
// Base path: /api/
// Auth: `Authorization: Token <token>`

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::types::{DetailResponse, ObjectRef, Page, StatusResponse};
use crate::auth::AuthScheme;
use crate::error::Error;
use crate::transport::TransportConfig;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the NetBox REST API.
///
/// Every instance owns its own `reqwest::Client` (and therefore its own
/// connection pool); callers that need isolated sessions simply build one
/// client each.
pub struct NetboxClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NetboxClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a NetBox URL, API token, and transport config.
    ///
    /// Injects `Authorization: Token …` as a default header on every request.
    pub fn from_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = AuthScheme::NetboxToken.headers(token)?;
        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends in `/api/`.
    ///
    /// Accepts both `https://netbox.example.com` and
    /// `https://netbox.example.com/api`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"dcim/devices/"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn patch_no_response<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<DetailResponse>(&raw) {
            Ok(err) => err.detail,
            Err(_) if raw.is_empty() => status.to_string(),
            Err(_) => raw,
        };

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Error::Authentication { message };
        }

        Error::Netbox {
            status: status.as_u16(),
            message,
        }
    }

    /// Collapse a filtered list into at most one object id.
    fn single_id(query: String, page: Page<ObjectRef>) -> Result<Option<u64>, Error> {
        match page.results.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only.id)),
            _ => Err(Error::AmbiguousLookup {
                query,
                count: page.count,
            }),
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Status ───────────────────────────────────────────────────────

    /// `GET /api/status/` -- cheap authenticated probe.
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        self.get("status/").await
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// Look up a device by exact name, returning its id if it exists.
    pub async fn find_device_id(&self, name: &str) -> Result<Option<u64>, Error> {
        let page: Page<ObjectRef> = self
            .get_with_params("dcim/devices/", &[("name", name), ("brief", "1")])
            .await?;
        Self::single_id(format!("device name={name}"), page)
    }

    /// `POST /api/dcim/devices/` -- returns the new device id.
    pub async fn create_device(&self, payload: &Value) -> Result<u64, Error> {
        let created: ObjectRef = self.post("dcim/devices/", payload).await?;
        Ok(created.id)
    }

    /// Bulk `PATCH /api/dcim/devices/`. Every payload must carry an `id`.
    pub async fn update_devices(&self, payloads: &[Value]) -> Result<(), Error> {
        self.patch_no_response("dcim/devices/", payloads).await
    }

    // ── Interfaces ───────────────────────────────────────────────────

    /// Look up an interface by device name and interface name.
    pub async fn find_interface_id(
        &self,
        device_name: &str,
        interface_name: &str,
    ) -> Result<Option<u64>, Error> {
        let page: Page<ObjectRef> = self
            .get_with_params(
                "dcim/interfaces/",
                &[
                    ("device", device_name),
                    ("name", interface_name),
                    ("brief", "1"),
                ],
            )
            .await?;
        Self::single_id(
            format!("interface {device_name}/{interface_name}"),
            page,
        )
    }

    /// Bulk `PATCH /api/dcim/interfaces/`. Every payload must carry an `id`.
    pub async fn update_interfaces(&self, payloads: &[Value]) -> Result<(), Error> {
        self.patch_no_response("dcim/interfaces/", payloads).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_api_suffix() {
        let url = NetboxClient::normalize_base_url("https://netbox.example.com").unwrap();
        assert_eq!(url.as_str(), "https://netbox.example.com/api/");
    }

    #[test]
    fn base_url_keeps_existing_api_suffix() {
        let url = NetboxClient::normalize_base_url("https://netbox.example.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://netbox.example.com/api/");
    }

    #[test]
    fn base_url_keeps_subpath() {
        let url = NetboxClient::normalize_base_url("https://example.com/netbox").unwrap();
        assert_eq!(url.as_str(), "https://example.com/netbox/api/");
    }

    #[test]
    fn single_id_rejects_multiple_matches() {
        let page = Page {
            count: 2,
            next: None,
            results: vec![ObjectRef { id: 1 }, ObjectRef { id: 2 }],
        };
        let result = NetboxClient::single_id("device name=ap1".into(), page);
        assert!(matches!(result, Err(Error::AmbiguousLookup { count: 2, .. })));
    }
}
