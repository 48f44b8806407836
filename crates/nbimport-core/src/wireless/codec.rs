// Channel codec: band/channel/width → NetBox and controller representations.
//
// Order matters: width first, then the primary channel, then the encoded
// `rf_channel` string and the controller channel, both of which are keyed
// by the primary.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::tables::{
    self, ALLOWED_CHANNELS_5GHZ, ALLOWED_CHANNELS_24GHZ, CHANNEL_WIDTH_24GHZ,
    CHANNEL_WIDTHS_5GHZ, DEFAULT_CHANNEL_WIDTH_5GHZ,
};

/// Why a band/channel/width combination could not be transcoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("unknown band '{0}', expected 2.4 or 5")]
    UnknownBand(String),

    #[error("{band}GHz channel number must be in {allowed:?}, got {channel}")]
    ChannelNotAllowed {
        band: Band,
        channel: u32,
        allowed: Vec<u32>,
    },

    #[error("channel width must be in {allowed:?}, got {width}")]
    WidthNotAllowed { width: u32, allowed: &'static [u32] },

    #[error("channel {channel} cannot be bonded to a {width}MHz channel")]
    NotBondable { channel: u32, width: u32 },

    #[error("no center frequency known for channel {channel}")]
    UnknownFrequency { channel: u32 },
}

// ── Band ────────────────────────────────────────────────────────────

/// Wireless frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    TwoGhz,
    FiveGhz,
}

impl Band {
    /// The short form used in input files and the `rf_channel` prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoGhz => "2.4",
            Self::FiveGhz => "5",
        }
    }

    fn allowed_channels(self) -> &'static std::collections::BTreeSet<u32> {
        match self {
            Self::TwoGhz => &ALLOWED_CHANNELS_24GHZ,
            Self::FiveGhz => &ALLOWED_CHANNELS_5GHZ,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.trim_end_matches("ghz").trim_end() {
            "2.4" => Ok(Self::TwoGhz),
            "5" => Ok(Self::FiveGhz),
            _ => Err(ChannelError::UnknownBand(s.to_owned())),
        }
    }
}

// ── Operations ──────────────────────────────────────────────────────

/// Effective channel width. 2.4 GHz is always 22 MHz; 5 GHz validates the
/// request and falls back to 20 MHz.
pub fn resolve_width(band: Band, requested: Option<u32>) -> Result<u32, ChannelError> {
    match band {
        Band::TwoGhz => Ok(CHANNEL_WIDTH_24GHZ),
        Band::FiveGhz => match requested {
            None => Ok(DEFAULT_CHANNEL_WIDTH_5GHZ),
            Some(width) if CHANNEL_WIDTHS_5GHZ.contains(&width) => Ok(width),
            Some(width) => Err(ChannelError::WidthNotAllowed {
                width,
                allowed: CHANNEL_WIDTHS_5GHZ,
            }),
        },
    }
}

/// The primary channel NetBox stores for `channel` bonded to `width`.
///
/// Must run after [`resolve_width`]. Unbonded widths map a channel to
/// itself.
pub fn resolve_primary(band: Band, channel: u32, width: u32) -> Result<u32, ChannelError> {
    let allowed = band.allowed_channels();
    if !allowed.contains(&channel) {
        return Err(ChannelError::ChannelNotAllowed {
            band,
            channel,
            allowed: allowed.iter().copied().collect(),
        });
    }

    let Some(groups) = tables::bonding_groups(width) else {
        return Ok(channel);
    };

    groups
        .iter()
        .find(|(members, _)| members.contains(&channel))
        .map(|(_, primary)| *primary)
        .ok_or(ChannelError::NotBondable { channel, width })
}

/// NetBox `rf_channel` value, e.g. `5g-38-5190.0-40`.
pub fn encode(band: Band, primary: u32, width: u32) -> Result<String, ChannelError> {
    let frequency = tables::center_frequency(primary)
        .ok_or(ChannelError::UnknownFrequency { channel: primary })?;
    Ok(format!("{band}g-{primary}-{frequency:.1}-{width}"))
}

/// Channel number a wireless controller expects configured.
pub fn controller_channel(band: Band, primary: u32, channel: u32) -> u32 {
    match band {
        Band::TwoGhz => channel,
        Band::FiveGhz => tables::controller_translation(primary).unwrap_or(primary),
    }
}

// ── ChannelSpec ─────────────────────────────────────────────────────

/// Radio channel request as read from an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    pub band: Band,
    pub channel_number: u32,
    pub width: Option<u32>,
}

/// Every value derived from a [`ChannelSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcoded {
    pub width: u32,
    pub netbox_channel: u32,
    pub rf_channel: String,
    pub controller_channel: u32,
}

impl ChannelSpec {
    /// Run all four codec steps in dependency order.
    pub fn transcode(&self) -> Result<Transcoded, ChannelError> {
        let width = resolve_width(self.band, self.width)?;
        let netbox_channel = resolve_primary(self.band, self.channel_number, width)?;
        let rf_channel = encode(self.band, netbox_channel, width)?;
        let controller_channel = controller_channel(self.band, netbox_channel, self.channel_number);
        Ok(Transcoded {
            width,
            netbox_channel,
            rf_channel,
            controller_channel,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn band_parsing() {
        assert_eq!("2.4".parse::<Band>().unwrap(), Band::TwoGhz);
        assert_eq!("5".parse::<Band>().unwrap(), Band::FiveGhz);
        assert_eq!("5GHz".parse::<Band>().unwrap(), Band::FiveGhz);
        assert_eq!(" 2.4 ghz".parse::<Band>().unwrap(), Band::TwoGhz);
        assert!(matches!("6".parse::<Band>(), Err(ChannelError::UnknownBand(_))));
    }

    #[test]
    fn bonded_5ghz_round_trip() {
        let spec = ChannelSpec {
            band: Band::FiveGhz,
            channel_number: 36,
            width: Some(40),
        };
        assert_eq!(
            spec.transcode().unwrap(),
            Transcoded {
                width: 40,
                netbox_channel: 38,
                rf_channel: "5g-38-5190.0-40".into(),
                controller_channel: 36,
            }
        );
    }

    #[test]
    fn fixed_width_on_24ghz() {
        let spec = ChannelSpec {
            band: Band::TwoGhz,
            channel_number: 6,
            width: None,
        };
        let out = spec.transcode().unwrap();
        assert_eq!(out.width, 22);
        assert_eq!(out.rf_channel, "2.4g-6-2437.0-22");
        assert_eq!(out.controller_channel, 6);
    }

    #[test]
    fn requested_width_ignored_on_24ghz() {
        assert_eq!(resolve_width(Band::TwoGhz, Some(40)).unwrap(), 22);
    }

    #[test]
    fn default_5ghz_width_is_20() {
        assert_eq!(resolve_width(Band::FiveGhz, None).unwrap(), 20);
        let out = ChannelSpec {
            band: Band::FiveGhz,
            channel_number: 157,
            width: None,
        }
        .transcode()
        .unwrap();
        assert_eq!(out.rf_channel, "5g-157-5785.0-20");
        assert_eq!(out.controller_channel, 157);
    }

    #[test]
    fn invalid_width_rejected() {
        assert!(matches!(
            resolve_width(Band::FiveGhz, Some(60)),
            Err(ChannelError::WidthNotAllowed { width: 60, .. })
        ));
    }

    #[test]
    fn invalid_channels_rejected() {
        assert!(matches!(
            resolve_primary(Band::FiveGhz, 45, 20),
            Err(ChannelError::ChannelNotAllowed { channel: 45, .. })
        ));
        assert!(matches!(
            resolve_primary(Band::FiveGhz, 44, 20),
            Err(ChannelError::ChannelNotAllowed { channel: 44, .. })
        ));
        assert!(matches!(
            resolve_primary(Band::TwoGhz, 3, 22),
            Err(ChannelError::ChannelNotAllowed { channel: 3, .. })
        ));
    }

    #[test]
    fn unbondable_channel_rejected() {
        // 132 only bonds up to 80 MHz.
        assert!(matches!(
            resolve_primary(Band::FiveGhz, 132, 160),
            Err(ChannelError::NotBondable {
                channel: 132,
                width: 160
            })
        ));
        // 165 has no 40 MHz partner.
        assert!(resolve_primary(Band::FiveGhz, 165, 40).is_err());
    }

    #[test]
    fn upper_unii3_channel_encodes() {
        let out = ChannelSpec {
            band: Band::FiveGhz,
            channel_number: 163,
            width: None,
        }
        .transcode()
        .unwrap();
        assert_eq!(out.netbox_channel, 163);
        assert_eq!(out.rf_channel, "5g-163-5815.0-20");
        assert_eq!(out.controller_channel, 163);
    }

    #[test]
    fn channel_without_frequency_rejected() {
        assert_eq!(
            encode(Band::FiveGhz, 167, 20),
            Err(ChannelError::UnknownFrequency { channel: 167 })
        );
    }

    #[test]
    fn every_bonded_member_round_trips() {
        for width in [40, 80, 160] {
            for (members, primary) in tables::bonding_groups(width).unwrap() {
                for channel in members
                    .iter()
                    .copied()
                    .filter(|c| ALLOWED_CHANNELS_5GHZ.contains(c))
                {
                    let out = ChannelSpec {
                        band: Band::FiveGhz,
                        channel_number: channel,
                        width: Some(width),
                    }
                    .transcode()
                    .unwrap();

                    assert_eq!(out.netbox_channel, *primary, "{channel}@{width}");
                    let freq = tables::center_frequency(*primary).unwrap();
                    assert_eq!(out.rf_channel, format!("5g-{primary}-{freq:.1}-{width}"));
                    let expected =
                        tables::controller_translation(*primary).unwrap_or(*primary);
                    assert_eq!(out.controller_channel, expected);
                }
            }
        }
    }

    #[test]
    fn controller_table_matches_first_sub_channel() {
        for (primary, wlc) in tables::CONTROLLER_CHANNELS {
            assert_eq!(controller_channel(Band::FiveGhz, *primary, 0), *wlc);
        }
        // Unbonded primaries map to themselves.
        assert_eq!(controller_channel(Band::FiveGhz, 36, 36), 36);
    }
}
