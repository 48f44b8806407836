// ── MAC addresses ──

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Rejected MAC address input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("MAC address not valid: {0}")]
pub struct InvalidMacAddress(pub String);

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(String);

impl MacAddress {
    /// Parse any common notation: colon or dash separated octets,
    /// Cisco dotted groups (`aabb.ccdd.eeff`), or 12 bare hex digits.
    pub fn parse(raw: &str) -> Result<Self, InvalidMacAddress> {
        let trimmed = raw.trim();
        let invalid = || InvalidMacAddress(raw.to_owned());

        let (groups, width): (Vec<&str>, usize) = if trimmed.contains([':', '-']) {
            (trimmed.split([':', '-']).collect(), 2)
        } else if trimmed.contains('.') {
            (trimmed.split('.').collect(), 4)
        } else {
            (vec![trimmed], 12)
        };

        if groups.len() * width != 12 || groups.iter().any(|g| g.len() != width) {
            return Err(invalid());
        }

        let hex: String = groups.concat();
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let hex = hex.to_ascii_lowercase();
        let octets: Vec<&str> = (0..6).filter_map(|i| hex.get(i * 2..i * 2 + 2)).collect();
        Ok(Self(octets.join(":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = InvalidMacAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_normalization() {
        let mac = MacAddress::parse("AA-BB-CC-DD-EE-FF").unwrap();
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_accepts_cisco_dotted() {
        let mac: MacAddress = "0011.22aa.BBcc".parse().unwrap();
        assert_eq!(mac.to_string(), "00:11:22:aa:bb:cc");
    }

    #[test]
    fn mac_accepts_bare_hex() {
        let mac = MacAddress::parse("001122AABBCC").unwrap();
        assert_eq!(mac.as_str(), "00:11:22:aa:bb:cc");
    }

    #[test]
    fn mac_rejects_garbage() {
        for raw in [
            "",
            "not-a-mac",
            "00:11:22:33:44",
            "00:11:22:33:44:55:66",
            "00:11:22:33:44:gg",
            "0:11:22:33:44:55",
            "0011.2233.445",
        ] {
            assert!(MacAddress::parse(raw).is_err(), "accepted {raw:?}");
        }
    }
}
