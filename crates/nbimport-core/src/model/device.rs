// ── Device records ──

use serde::Serialize;
use strum::{Display, EnumString, VariantNames};

use super::interface::InterfaceRecord;

/// NetBox device status. Parsed case-insensitively, always sent lowercase.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceStatus {
    #[default]
    Active,
    Decommissioning,
    Failed,
    Inventory,
    Offline,
    Planned,
    Staged,
}

/// Device-level custom fields: wireless controller associations, each the
/// NetBox id of the controller device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceCustomFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wlc_primary_association: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wlc_secondary_association: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wlc_tertiary_association: Option<u64>,
}

/// A validated device, ready for reconciliation.
///
/// Owns its interfaces. `id` stays `None` until NetBox has either been
/// found to know the device or has just created it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub serial: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    pub device_role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    pub device_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: DeviceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub custom_fields: DeviceCustomFields,
    #[serde(skip)]
    pub interfaces: Vec<InterfaceRecord>,
}
