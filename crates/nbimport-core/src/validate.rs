// ── Record validation ──
//
// Two phases per record. Phase one derives fields (MAC alias, channel
// transcoding) into the raw map; phase two checks required fields and
// types and builds the typed record. The first violation wins and is
// reported against the device or interface name.

use std::str::FromStr;

use serde_json::Value;
use strum::VariantNames;
use thiserror::Error;

use crate::error::{CoreError, RecordKind};
use crate::model::{
    CustomFieldValues, DeviceCustomFields, DeviceRecord, DeviceStatus, InterfaceCustomFields,
    InterfaceRecord, MacAddress, RadioSettings, RawFields,
};
use crate::wireless::{Band, ChannelSpec};

/// A single field-level violation.
#[derive(Debug, Error)]
enum FieldError {
    #[error("field '{0}' is required")]
    Missing(&'static str),

    #[error("field '{0}' must not be empty")]
    Empty(&'static str),

    #[error("field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Interface schemas ───────────────────────────────────────────────

/// Field set an interface is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceSchema {
    /// Name, MAC address and enabled flag.
    Base,
    /// Base fields plus band, channel and radio settings.
    Radio,
}

/// Ordered interface-name substring → schema map with an optional fallback.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    entries: Vec<(String, InterfaceSchema)>,
    default: Option<InterfaceSchema>,
}

impl SchemaMap {
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, InterfaceSchema)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(k, s)| (k.into(), s)).collect(),
            default: None,
        }
    }

    pub fn with_default(mut self, schema: InterfaceSchema) -> Self {
        self.default = Some(schema);
        self
    }

    /// First entry whose key occurs in `interface_name`, else the default.
    pub fn select(&self, interface_name: &str) -> Option<InterfaceSchema> {
        self.entries
            .iter()
            .find(|(key, _)| interface_name.contains(key.as_str()))
            .map(|(_, schema)| *schema)
            .or(self.default)
    }
}

// ── Entry points ────────────────────────────────────────────────────

/// Validate the device part of a row.
pub fn validate_device(
    fields: &RawFields,
    custom: &CustomFieldValues,
) -> Result<DeviceRecord, CoreError> {
    let identifier = fields.get("name").map_or("<unnamed>", String::as_str);
    build_device(fields, custom).map_err(|e| CoreError::validation(RecordKind::Device, identifier, e))
}

/// Validates interfaces against the schema their name selects.
#[derive(Debug, Clone)]
pub struct Validator {
    schemas: SchemaMap,
}

impl Validator {
    pub fn new(schemas: SchemaMap) -> Self {
        Self { schemas }
    }

    /// Validate one interface part of a row.
    pub fn interface(
        &self,
        fields: &RawFields,
        custom: &CustomFieldValues,
    ) -> Result<InterfaceRecord, CoreError> {
        let identifier = fields.get("name").map_or("<unnamed>", String::as_str);
        let Some(schema) = self.schemas.select(identifier) else {
            return Err(CoreError::validation(
                RecordKind::Interface,
                identifier,
                "no schema matches this interface and no default schema is configured",
            ));
        };

        let mut fields = fields.clone();
        let mut custom = custom.clone();
        derive_interface_fields(&mut fields, &mut custom, schema)
            .and_then(|()| build_interface(&fields, &custom, schema))
            .map_err(|e| CoreError::validation(RecordKind::Interface, identifier, e))
    }
}

// ── Phase one: derivation ───────────────────────────────────────────

fn derive_interface_fields(
    fields: &mut RawFields,
    custom: &mut CustomFieldValues,
    schema: InterfaceSchema,
) -> Result<(), FieldError> {
    if let Some(mac) = fields.get("mac").filter(|m| !m.is_empty()).cloned() {
        fields.insert("mac_address".to_owned(), mac);
    }

    if schema == InterfaceSchema::Radio {
        let band = parse_required::<Band>(fields, "band")?;
        let channel_number = parse_required::<u32>(fields, "channel_number")?;
        let width = parse_optional::<u32>(fields, "channel_width")?;

        let spec = ChannelSpec {
            band,
            channel_number,
            width,
        };
        let out = spec.transcode().map_err(|e| FieldError::Invalid {
            field: "channel_number",
            reason: e.to_string(),
        })?;

        fields.insert("rf_channel".to_owned(), out.rf_channel);
        fields.insert("rf_channel_width".to_owned(), out.width.to_string());
        custom.insert(
            "wlc_rf_channel".to_owned(),
            Value::String(out.controller_channel.to_string()),
        );
    }

    Ok(())
}

// ── Phase two: schema checks ────────────────────────────────────────

fn build_device(fields: &RawFields, custom: &CustomFieldValues) -> Result<DeviceRecord, FieldError> {
    let status = match optional(fields, "status") {
        None => DeviceStatus::default(),
        Some(raw) => raw.parse().map_err(|_| FieldError::Invalid {
            field: "status",
            reason: format!(
                "device status '{raw}' is not one of {}",
                DeviceStatus::VARIANTS.join(", ")
            ),
        })?,
    };

    Ok(DeviceRecord {
        id: parse_optional(fields, "id")?,
        name: non_empty(fields, "name")?.to_owned(),
        serial: required(fields, "serial")?.to_owned(),
        asset_tag: optional(fields, "asset_tag").map(str::to_owned),
        device_role: non_empty(fields, "device_role")?.to_owned(),
        manufacturer: optional(fields, "manufacturer").map(str::to_owned),
        device_type: non_empty(fields, "device_type")?.to_owned(),
        region: optional(fields, "region").map(str::to_owned),
        site: non_empty(fields, "site")?.to_owned(),
        location: optional(fields, "location").map(str::to_owned),
        status,
        platform: optional(fields, "platform").map(str::to_owned),
        custom_fields: DeviceCustomFields {
            wlc_primary_association: custom_id(custom, "wlc_primary_association")?,
            wlc_secondary_association: custom_id(custom, "wlc_secondary_association")?,
            wlc_tertiary_association: custom_id(custom, "wlc_tertiary_association")?,
        },
        interfaces: Vec::new(),
    })
}

fn build_interface(
    fields: &RawFields,
    custom: &CustomFieldValues,
    schema: InterfaceSchema,
) -> Result<InterfaceRecord, FieldError> {
    let name = non_empty(fields, "name")?.to_owned();
    let mac_address = MacAddress::parse(required(fields, "mac_address")?).map_err(|e| {
        FieldError::Invalid {
            field: "mac_address",
            reason: e.to_string(),
        }
    })?;
    let enabled = match optional(fields, "enabled") {
        None => true,
        Some(raw) => parse_bool(raw).ok_or_else(|| FieldError::Invalid {
            field: "enabled",
            reason: format!("'{raw}' is not a boolean"),
        })?,
    };

    let radio = match schema {
        InterfaceSchema::Base => None,
        InterfaceSchema::Radio => Some(RadioSettings {
            rf_role: optional(fields, "rf_role").map(str::to_owned),
            tx_power: parse_optional(fields, "tx_power")?,
            rf_channel_frequency: None,
            rf_channel_width: parse_required(fields, "rf_channel_width")?,
            rf_channel: non_empty(fields, "rf_channel")?.to_owned(),
            custom_fields: InterfaceCustomFields {
                wlc_rf_channel: custom_string(custom, "wlc_rf_channel"),
            },
        }),
    };

    Ok(InterfaceRecord {
        id: parse_optional(fields, "id")?,
        name,
        mac_address,
        enabled,
        radio,
    })
}

// ── Field helpers ───────────────────────────────────────────────────

/// Present column, possibly empty.
fn required<'a>(fields: &'a RawFields, field: &'static str) -> Result<&'a str, FieldError> {
    fields
        .get(field)
        .map(String::as_str)
        .ok_or(FieldError::Missing(field))
}

fn non_empty<'a>(fields: &'a RawFields, field: &'static str) -> Result<&'a str, FieldError> {
    let value = required(fields, field)?.trim();
    if value.is_empty() {
        return Err(FieldError::Empty(field));
    }
    Ok(value)
}

/// Empty CSV cells count as absent.
fn optional<'a>(fields: &'a RawFields, field: &'static str) -> Option<&'a str> {
    fields
        .get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_optional<T>(fields: &RawFields, field: &'static str) -> Result<Option<T>, FieldError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(fields, field)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| FieldError::Invalid {
                field,
                reason: format!("'{raw}': {e}"),
            })
        })
        .transpose()
}

fn parse_required<T>(fields: &RawFields, field: &'static str) -> Result<T, FieldError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_optional(fields, field)?.ok_or(FieldError::Missing(field))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Custom field holding a NetBox object id. Unresolved names fail here.
fn custom_id(custom: &CustomFieldValues, field: &'static str) -> Result<Option<u64>, FieldError> {
    let invalid = |value: &Value| FieldError::Invalid {
        field,
        reason: format!("expected a device id, got {value}"),
    };

    match custom.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value {
            Value::Number(n) => n.as_u64().map(Some).ok_or_else(|| invalid(value)),
            Value::String(s) => s.trim().parse().map(Some).map_err(|_| invalid(value)),
            _ => Err(invalid(value)),
        },
    }
}

fn custom_string(custom: &CustomFieldValues, field: &str) -> Option<String> {
    match custom.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn validator() -> Validator {
        Validator::new(SchemaMap::new([
            ("wired", InterfaceSchema::Base),
            ("radio", InterfaceSchema::Radio),
        ]))
    }

    fn device_fields() -> RawFields {
        fields(&[
            ("name", "ap1"),
            ("serial", "FGL2231A0BC"),
            ("device_role", "access-point"),
            ("device_type", "c9120axi-b"),
            ("site", "hq"),
            ("status", "Planned"),
            ("asset_tag", ""),
            ("comments", "ignored"),
        ])
    }

    // ── Devices ─────────────────────────────────────────────────────

    #[test]
    fn device_happy_path() {
        let custom: CustomFieldValues =
            [("wlc_primary_association".to_owned(), json!(7))].into_iter().collect();
        let device = validate_device(&device_fields(), &custom).unwrap();

        assert_eq!(device.name, "ap1");
        assert_eq!(device.status, DeviceStatus::Planned);
        assert_eq!(device.asset_tag, None);
        assert_eq!(device.custom_fields.wlc_primary_association, Some(7));
        assert_eq!(device.custom_fields.wlc_secondary_association, None);
    }

    #[test]
    fn device_status_defaults_to_active() {
        let mut row = device_fields();
        row.shift_remove("status");
        let device = validate_device(&row, &CustomFieldValues::new()).unwrap();
        assert_eq!(device.status, DeviceStatus::Active);
    }

    #[test]
    fn device_rejects_unknown_status() {
        let mut row = device_fields();
        row.insert("status".into(), "retired".into());
        let err = validate_device(&row, &CustomFieldValues::new()).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation {
                kind: RecordKind::Device,
                ref identifier,
                ..
            } if identifier == "ap1"
        ));
        assert!(err.to_string().contains("retired"));
    }

    #[test]
    fn device_requires_site() {
        let mut row = device_fields();
        row.shift_remove("site");
        let err = validate_device(&row, &CustomFieldValues::new()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid device 'ap1': field 'site' is required");
    }

    #[test]
    fn device_rejects_empty_name() {
        let mut row = device_fields();
        row.insert("name".into(), String::new());
        let err = validate_device(&row, &CustomFieldValues::new()).unwrap_err();
        assert!(err.to_string().contains("field 'name' must not be empty"));
    }

    #[test]
    fn unresolved_controller_fails_integer_coercion() {
        let custom: CustomFieldValues =
            [("wlc_secondary_association".to_owned(), json!("wlc-99"))].into_iter().collect();
        let err = validate_device(&device_fields(), &custom).unwrap_err();
        assert!(err.to_string().contains("wlc_secondary_association"));
    }

    // ── Interfaces ──────────────────────────────────────────────────

    #[test]
    fn wired_interface_uses_mac_alias() {
        let row = fields(&[("name", "wired"), ("mac", "AA-BB-CC-DD-EE-FF"), ("enabled", "no")]);
        let iface = validator().interface(&row, &CustomFieldValues::new()).unwrap();

        assert_eq!(iface.mac_address.as_str(), "aa:bb:cc:dd:ee:ff");
        assert!(!iface.enabled);
        assert!(iface.radio.is_none());
    }

    #[test]
    fn radio_interface_derives_channel_fields() {
        let row = fields(&[
            ("name", "radio1"),
            ("mac_address", "00:11:22:33:44:66"),
            ("band", "5"),
            ("channel_number", "36"),
            ("channel_width", "40"),
            ("tx_power", "14"),
            ("rf_role", "ap"),
        ]);
        let iface = validator().interface(&row, &CustomFieldValues::new()).unwrap();
        let radio = iface.radio.unwrap();

        assert!(iface.enabled);
        assert_eq!(radio.rf_channel, "5g-38-5190.0-40");
        assert_eq!(radio.rf_channel_width, 40);
        assert_eq!(radio.rf_channel_frequency, None);
        assert_eq!(radio.tx_power, Some(14));
        assert_eq!(radio.custom_fields.wlc_rf_channel.as_deref(), Some("36"));
    }

    #[test]
    fn derived_controller_channel_overrides_input() {
        let row = fields(&[
            ("name", "radio0"),
            ("mac_address", "00:11:22:33:44:55"),
            ("band", "2.4"),
            ("channel_number", "11"),
        ]);
        let custom: CustomFieldValues =
            [("wlc_rf_channel".to_owned(), json!("1"))].into_iter().collect();
        let radio = validator().interface(&row, &custom).unwrap().radio.unwrap();

        assert_eq!(radio.rf_channel, "2.4g-11-2462.0-22");
        assert_eq!(radio.custom_fields.wlc_rf_channel.as_deref(), Some("11"));
    }

    #[test]
    fn invalid_channel_is_an_interface_validation_error() {
        let row = fields(&[
            ("name", "radio1"),
            ("mac_address", "00:11:22:33:44:66"),
            ("band", "5"),
            ("channel_number", "45"),
        ]);
        let err = validator().interface(&row, &CustomFieldValues::new()).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation {
                kind: RecordKind::Interface,
                ref identifier,
                ..
            } if identifier == "radio1"
        ));
    }

    #[test]
    fn radio_without_band_is_rejected() {
        let row = fields(&[("name", "radio0"), ("mac_address", "00:11:22:33:44:55")]);
        let err = validator().interface(&row, &CustomFieldValues::new()).unwrap_err();
        assert!(err.to_string().contains("field 'band' is required"));
    }

    #[test]
    fn bad_mac_is_rejected() {
        let row = fields(&[("name", "wired"), ("mac_address", "00:11:22:33:44")]);
        let err = validator().interface(&row, &CustomFieldValues::new()).unwrap_err();
        assert!(err.to_string().contains("MAC address not valid"));
    }

    #[test]
    fn unmatched_interface_without_default_has_no_schema() {
        let row = fields(&[("name", "mgmt0"), ("mac_address", "00:11:22:33:44:55")]);
        let err = validator().interface(&row, &CustomFieldValues::new()).unwrap_err();
        assert!(err.to_string().contains("no schema"));
    }

    #[test]
    fn default_schema_catches_unmatched_names() {
        let validator = Validator::new(
            SchemaMap::new([("radio", InterfaceSchema::Radio)]).with_default(InterfaceSchema::Base),
        );
        let row = fields(&[("name", "mgmt0"), ("mac_address", "00:11:22:33:44:55")]);
        assert!(validator.interface(&row, &CustomFieldValues::new()).is_ok());
    }

    #[test]
    fn schema_map_prefers_first_match() {
        let map = SchemaMap::new([
            ("radio", InterfaceSchema::Radio),
            ("wired", InterfaceSchema::Base),
        ]);
        assert_eq!(map.select("wired-radio"), Some(InterfaceSchema::Radio));
        assert_eq!(map.select("wired"), Some(InterfaceSchema::Base));
        assert_eq!(map.select("mgmt"), None);
    }

    #[test]
    fn bool_spellings() {
        for raw in ["true", "T", "yes", "Y", "on", "1"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["false", "F", "no", "N", "off", "0"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }
}
