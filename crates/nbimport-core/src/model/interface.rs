// ── Interface records ──
//
// Composition instead of a schema hierarchy: every interface carries the
// base fields, radios add a flattened `RadioSettings` block.

use serde::Serialize;

use super::mac::MacAddress;

/// Interface-level custom fields for radios.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceCustomFields {
    /// Channel number as a wireless controller expects it configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wlc_rf_channel: Option<String>,
}

/// Radio-only fields derived from band, channel number and width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadioSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rf_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<i64>,
    /// Always null: NetBox recomputes the center frequency from
    /// `rf_channel`, and rejects a stale frequency on channel changes.
    pub rf_channel_frequency: Option<f64>,
    pub rf_channel_width: u32,
    pub rf_channel: String,
    pub custom_fields: InterfaceCustomFields,
}

/// A validated interface belonging to one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub mac_address: MacAddress,
    pub enabled: bool,
    #[serde(flatten)]
    pub radio: Option<RadioSettings>,
}
