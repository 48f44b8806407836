// ── Custom field enrichment ──
//
// Some custom fields reference other NetBox objects by name (a wireless
// controller called `wlc-01`) while NetBox wants their id. Enrichment
// moves those columns out of the raw record and resolves them before
// validation runs.

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::inventory::Inventory;
use crate::model::{CustomFieldValues, RawFields};

/// How to turn a raw custom field value into what NetBox expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldResolver {
    /// Treat the value as a device name and replace it with the device id.
    DeviceId,
}

/// Custom field name → resolver. `None` copies the raw value unchanged.
pub type CustomFieldMap = Vec<(&'static str, Option<FieldResolver>)>;

/// Move every mapped, non-empty field out of `fields` into the returned
/// custom field values, resolving it on the way.
///
/// A value its resolver cannot find passes through as the original string.
pub async fn enrich<I: Inventory>(
    inventory: &I,
    fields: &mut RawFields,
    map: &CustomFieldMap,
) -> Result<CustomFieldValues, CoreError> {
    let mut custom = CustomFieldValues::new();

    for (field, resolver) in map {
        let Some(raw) = fields.get(*field).filter(|v| !v.is_empty()).cloned() else {
            continue;
        };
        fields.shift_remove(*field);

        let value = match resolver {
            None => Value::String(raw),
            Some(FieldResolver::DeviceId) => match inventory.lookup_device(&raw).await? {
                Some(id) => Value::from(id),
                None => {
                    debug!(field, value = %raw, "no device found, keeping raw value");
                    Value::String(raw)
                }
            },
        };
        custom.insert((*field).to_owned(), value);
    }

    Ok(custom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inventory::mock::{Call, MockInventory};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn device_map() -> CustomFieldMap {
        vec![
            ("wlc_primary_association", Some(FieldResolver::DeviceId)),
            ("wlc_secondary_association", Some(FieldResolver::DeviceId)),
            ("wlc_tertiary_association", Some(FieldResolver::DeviceId)),
        ]
    }

    fn fields(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[tokio::test]
    async fn resolves_controller_names_to_ids() {
        let inventory = MockInventory::new().with_device("wlc-01", 7, &[]);
        let mut row = fields(&[
            ("name", "ap1"),
            ("wlc_primary_association", "wlc-01"),
            ("wlc_secondary_association", "wlc-99"),
            ("wlc_tertiary_association", ""),
        ]);

        let custom = enrich(&inventory, &mut row, &device_map()).await.unwrap();

        assert_eq!(
            serde_json::to_value(&custom).unwrap(),
            json!({ "wlc_primary_association": 7, "wlc_secondary_association": "wlc-99" })
        );
        // Resolved columns leave the record; empty ones stay untouched.
        assert_eq!(
            row,
            fields(&[("name", "ap1"), ("wlc_tertiary_association", "")])
        );
        assert_eq!(
            inventory.calls(),
            vec![
                Call::LookupDevice("wlc-01".into()),
                Call::LookupDevice("wlc-99".into()),
            ]
        );
    }

    #[tokio::test]
    async fn unresolved_fields_copy_through_without_lookups() {
        let inventory = MockInventory::new();
        let mut row = fields(&[("name", "radio0"), ("wlc_rf_channel", "36")]);
        let map: CustomFieldMap = vec![("wlc_rf_channel", None)];

        let custom = enrich(&inventory, &mut row, &map).await.unwrap();

        assert_eq!(custom["wlc_rf_channel"], json!("36"));
        assert!(inventory.calls().is_empty());
    }

    #[tokio::test]
    async fn lookup_failures_propagate() {
        let inventory = MockInventory::new().unauthorized();
        let mut row = fields(&[("wlc_primary_association", "wlc-01")]);

        let result = enrich(&inventory, &mut row, &device_map()).await;
        assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));
    }
}
