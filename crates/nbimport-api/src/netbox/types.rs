// Response shapes for the NetBox REST API.
//
// Only the fields the importer reads are modelled; everything else in the
// (large) NetBox object bodies is ignored by serde.

use serde::Deserialize;

/// Paginated list envelope: `{ count, next, previous, results: [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Minimal object reference -- NetBox returns `id` on every object body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ObjectRef {
    pub id: u64,
}

/// `GET /api/status/` response (subset).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "netbox-version", default)]
    pub netbox_version: Option<String>,
}

/// Error bodies come in two shapes: `{"detail": "..."}` for request-level
/// failures, or a field → messages map (or a list of them for bulk calls).
#[derive(Debug, Deserialize)]
pub(crate) struct DetailResponse {
    pub detail: String,
}
