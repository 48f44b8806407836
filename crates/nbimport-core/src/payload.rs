// ── NetBox payloads ──
//
// NetBox accepts `{"site": {"slug": "hq"}}` in place of a numeric foreign
// key, sparing a lookup per related object. Every field outside a small
// key-field allowlist is wrapped that way.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::CoreError;

/// Device fields sent as-is.
pub const DEVICE_KEY_FIELDS: &[&str] = &[
    "id",
    "name",
    "serial",
    "asset_tag",
    "status",
    "custom_fields",
];

/// Interface fields sent as-is, radio settings included.
pub const INTERFACE_KEY_FIELDS: &[&str] = &[
    "id",
    "name",
    "mac_address",
    "enabled",
    "rf_role",
    "tx_power",
    "rf_channel",
    "custom_fields",
    "rf_channel_frequency",
    "rf_channel_width",
];

/// Wrap every non-key field of a JSON object as `{"slug": value}`.
///
/// Non-object values are returned unchanged.
pub fn slugify(value: Value, key_fields: &[&str]) -> Value {
    let fields = match value {
        Value::Object(fields) => fields,
        other => return other,
    };

    let wrapped: Map<String, Value> = fields
        .into_iter()
        .map(|(field, value)| {
            if key_fields.contains(&field.as_str()) {
                (field, value)
            } else {
                (field, json!({ "slug": value }))
            }
        })
        .collect();
    Value::Object(wrapped)
}

/// Serialize a record and slugify it.
pub fn to_payload<T: Serialize>(record: &T, key_fields: &[&str]) -> Result<Value, CoreError> {
    let value = serde_json::to_value(record)
        .map_err(|e| CoreError::Internal(format!("failed to encode payload: {e}")))?;
    Ok(slugify(value, key_fields))
}
