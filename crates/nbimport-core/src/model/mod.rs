// ── Import domain model ──
//
// Typed device and interface records. Raw CSV rows arrive as ordered
// string maps; the validator turns them into these records, and the
// reconciler serializes them into NetBox payloads.

pub mod device;
pub mod interface;
pub mod mac;

use indexmap::IndexMap;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::{DeviceCustomFields, DeviceRecord, DeviceStatus};
pub use interface::{InterfaceCustomFields, InterfaceRecord, RadioSettings};
pub use mac::{InvalidMacAddress, MacAddress};

/// One flat input row (or one slice of it): column name → raw string value.
///
/// Insertion order follows the CSV header order.
pub type RawFields = IndexMap<String, String>;

/// Custom field values gathered before validation. Resolved lookups are
/// numbers; everything else stays a string.
pub type CustomFieldValues = IndexMap<String, serde_json::Value>;
