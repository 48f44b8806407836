// ── Import profiles ──
//
// Everything that varies by device kind: which columns belong to
// interfaces, which custom fields need resolving, which schema each
// interface gets, and which payload fields skip slug wrapping.

use regex::Regex;
use strum::Display;

use crate::enrich::{CustomFieldMap, FieldResolver};
use crate::partition::INTERFACE_COLUMN;
use crate::payload::{DEVICE_KEY_FIELDS, INTERFACE_KEY_FIELDS};
use crate::validate::{InterfaceSchema, SchemaMap, Validator};

/// Kinds of device the importer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceKind {
    AccessPoint,
}

/// Per-kind import configuration.
#[derive(Debug, Clone)]
pub struct ImportProfile {
    pub kind: DeviceKind,
    pub interface_pattern: Regex,
    pub device_custom_fields: CustomFieldMap,
    pub interface_custom_fields: CustomFieldMap,
    pub validator: Validator,
    pub device_key_fields: &'static [&'static str],
    pub interface_key_fields: &'static [&'static str],
}

impl ImportProfile {
    pub fn for_kind(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::AccessPoint => Self::access_point(),
        }
    }

    /// Wireless access point: one wired uplink plus numbered radios.
    pub fn access_point() -> Self {
        Self {
            kind: DeviceKind::AccessPoint,
            interface_pattern: INTERFACE_COLUMN.clone(),
            device_custom_fields: vec![
                ("wlc_primary_association", Some(FieldResolver::DeviceId)),
                ("wlc_secondary_association", Some(FieldResolver::DeviceId)),
                ("wlc_tertiary_association", Some(FieldResolver::DeviceId)),
            ],
            // Overwritten from the channel during validation.
            interface_custom_fields: vec![("wlc_rf_channel", None)],
            validator: Validator::new(SchemaMap::new([
                ("wired", InterfaceSchema::Base),
                ("radio", InterfaceSchema::Radio),
            ])),
            device_key_fields: DEVICE_KEY_FIELDS,
            interface_key_fields: INTERFACE_KEY_FIELDS,
        }
    }
}
