// ── Field partitioning ──
//
// Splits one flat CSV row into device columns and per-interface columns.
// Interface columns are named `<prefix>_<attribute>`, e.g. `radio0_tx_power`.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::model::RawFields;

/// Interface columns for access points: `wired_*` and `radio<N>_*`.
pub static INTERFACE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(wired|radio\d+)_(.*)$").expect("valid interface column regex"));

/// A row split into its device part and its interface parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioned {
    pub device: RawFields,
    /// Keyed by interface prefix, in first-seen column order. Every entry
    /// carries at least a `name` field equal to its key.
    pub interfaces: IndexMap<String, RawFields>,
}

/// Partition `row` using `pattern`, whose first capture group is the
/// interface name and second the attribute name.
///
/// Interface columns are always removed from the device part, even when
/// empty, and an interface whose columns are all empty still appears with
/// just its name.
pub fn partition(pattern: &Regex, row: &RawFields) -> Partitioned {
    let mut device = row.clone();
    let mut interfaces: IndexMap<String, RawFields> = IndexMap::new();

    for (column, value) in row {
        let Some(caps) = pattern.captures(column) else {
            continue;
        };
        let (Some(prefix), Some(attribute)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        let fields = interfaces
            .entry(prefix.as_str().to_owned())
            .or_insert_with(|| RawFields::from([("name".to_owned(), prefix.as_str().to_owned())]));
        if !value.is_empty() {
            fields.insert(attribute.as_str().to_owned(), value.clone());
        }
        device.shift_remove(column);
    }

    Partitioned { device, interfaces }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn splits_device_and_interface_columns() {
        let input = row(&[
            ("wired_enabled", "true"),
            ("radio0_tx_power", "10"),
            ("name", "ap1"),
        ]);
        let out = partition(&INTERFACE_COLUMN, &input);

        assert_eq!(out.device, row(&[("name", "ap1")]));
        assert_eq!(out.interfaces.len(), 2);
        assert_eq!(
            out.interfaces["wired"],
            row(&[("name", "wired"), ("enabled", "true")])
        );
        assert_eq!(
            out.interfaces["radio0"],
            row(&[("name", "radio0"), ("tx_power", "10")])
        );
        assert!(out.device.keys().all(|k| !INTERFACE_COLUMN.is_match(k)));
    }

    #[test]
    fn empty_interface_columns_leave_a_placeholder() {
        let input = row(&[
            ("name", "ap1"),
            ("radio1_band", ""),
            ("radio1_channel_number", ""),
        ]);
        let out = partition(&INTERFACE_COLUMN, &input);

        assert_eq!(out.device, row(&[("name", "ap1")]));
        assert_eq!(out.interfaces["radio1"], row(&[("name", "radio1")]));
    }

    #[test]
    fn unrelated_prefixes_stay_on_the_device() {
        let input = row(&[
            ("name", "ap1"),
            ("wireless_mode", "x"),
            ("radio_band", "5"),
            ("asset_tag", "A-1"),
        ]);
        let out = partition(&INTERFACE_COLUMN, &input);

        assert_eq!(out.device, input);
        assert!(out.interfaces.is_empty());
    }

    #[test]
    fn interface_order_follows_columns() {
        let input = row(&[
            ("radio1_band", "5"),
            ("wired_mac", "00:11:22:33:44:55"),
            ("radio0_band", "2.4"),
            ("radio1_channel_number", "36"),
        ]);
        let out = partition(&INTERFACE_COLUMN, &input);

        let names: Vec<&str> = out.interfaces.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["radio1", "wired", "radio0"]);
        assert_eq!(out.interfaces["radio1"].len(), 3);
    }
}
