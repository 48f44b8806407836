// Static channel reference data for 2.4 and 5 GHz.
//
// Never mutated. Allowed-channel sets are derived once from the valid and
// denied lists on first use.

use std::collections::BTreeSet;
use std::sync::LazyLock;

// ── 2.4 GHz ─────────────────────────────────────────────────────────

pub const VALID_CHANNELS_24GHZ: &[u32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

/// Overlapping channels; only 1, 6 and 11 survive.
pub const DENIED_CHANNELS_24GHZ: &[u32] = &[2, 3, 4, 5, 7, 8, 9, 10, 12, 13];

pub const CHANNEL_WIDTH_24GHZ: u32 = 22;

// ── 5 GHz ───────────────────────────────────────────────────────────

pub const CHANNELS_5GHZ_20MHZ: &[u32] = &[
    36, 38, 40, 42, 44, 46, 48, 50, 52, 54, 56, 58, 60, 62, 64, 100, 102, 104, 106, 108, 110, 112,
    114, 116, 118, 120, 122, 124, 126, 128, 132, 134, 136, 138, 140, 142, 151, 153, 155, 157, 159,
    161, 163, 165,
];

pub const CHANNELS_5GHZ_40MHZ: &[u32] = &[38, 46, 54, 62, 102, 110, 118, 126, 134, 142, 151, 159];

pub const CHANNELS_5GHZ_80MHZ: &[u32] = &[42, 58, 106, 122, 138, 155];

pub const CHANNELS_5GHZ_160MHZ: &[u32] = &[50, 114];

/// Channels withdrawn by regulation.
pub const DENIED_CHANNELS_5GHZ: &[u32] = &[44, 167, 169, 171, 173, 175, 177];

pub const CHANNEL_WIDTHS_5GHZ: &[u32] = &[20, 40, 80, 160];

pub const DEFAULT_CHANNEL_WIDTH_5GHZ: u32 = 20;

// ── Bonding ─────────────────────────────────────────────────────────

/// Member channels of a bonded group and the group's primary channel.
pub type BondingGroup = (&'static [u32], u32);

pub const BONDING_40MHZ: &[BondingGroup] = &[
    (&[36, 38, 40], 38),
    (&[44, 46, 48], 46),
    (&[52, 54, 56], 54),
    (&[60, 62, 64], 62),
    (&[100, 102, 104], 102),
    (&[108, 110, 112], 110),
    (&[116, 118, 120], 118),
    (&[124, 126, 128], 126),
    (&[132, 134, 136], 134),
    (&[140, 142, 144], 142),
    (&[149, 151, 153], 151),
    (&[157, 159, 161], 159),
];

pub const BONDING_80MHZ: &[BondingGroup] = &[
    (&[36, 38, 40, 42, 44, 46, 48], 42),
    (&[52, 54, 56, 58, 60, 62, 64], 58),
    (&[100, 102, 104, 106, 108, 110, 112], 106),
    (&[116, 118, 120, 122, 124, 126, 128], 122),
    (&[132, 134, 136, 138, 140, 142, 144], 138),
    (&[149, 151, 153, 155, 157, 159, 161], 155),
];

pub const BONDING_160MHZ: &[BondingGroup] = &[
    (
        &[36, 38, 40, 42, 44, 46, 48, 50, 52, 54, 56, 58, 60, 62, 64],
        50,
    ),
    (
        &[
            100, 102, 104, 106, 108, 110, 112, 114, 116, 118, 120, 122, 124, 126, 128,
        ],
        114,
    ),
];

/// Bonding groups for a width, or `None` when the width does not bond.
pub fn bonding_groups(width: u32) -> Option<&'static [BondingGroup]> {
    match width {
        40 => Some(BONDING_40MHZ),
        80 => Some(BONDING_80MHZ),
        160 => Some(BONDING_160MHZ),
        _ => None,
    }
}

// ── Controller translation ──────────────────────────────────────────

/// NetBox primary channel → first 20 MHz sub-channel, which is what a
/// wireless controller expects to be configured for bonded widths.
pub const CONTROLLER_CHANNELS: &[(u32, u32)] = &[
    (38, 36),
    (42, 36),
    (46, 44),
    (50, 36),
    (54, 52),
    (58, 52),
    (62, 60),
    (102, 100),
    (106, 100),
    (110, 108),
    (114, 100),
    (118, 116),
    (122, 116),
    (126, 124),
    (134, 132),
    (138, 132),
    (142, 140),
    (151, 149),
    (155, 149),
    (159, 157),
];

// ── Center frequencies (MHz) ────────────────────────────────────────

pub const CENTER_FREQUENCIES: &[(u32, f64)] = &[
    (1, 2412.0),
    (2, 2417.0),
    (3, 2422.0),
    (4, 2427.0),
    (5, 2432.0),
    (6, 2437.0),
    (7, 2442.0),
    (8, 2447.0),
    (9, 2452.0),
    (10, 2457.0),
    (11, 2462.0),
    (12, 2467.0),
    (13, 2472.0),
    (36, 5180.0),
    (38, 5190.0),
    (40, 5200.0),
    (42, 5210.0),
    (44, 5220.0),
    (46, 5230.0),
    (48, 5240.0),
    (50, 5250.0),
    (52, 5260.0),
    (54, 5270.0),
    (56, 5280.0),
    (58, 5290.0),
    (60, 5300.0),
    (62, 5310.0),
    (64, 5320.0),
    (100, 5500.0),
    (102, 5510.0),
    (104, 5520.0),
    (106, 5530.0),
    (108, 5540.0),
    (110, 5550.0),
    (112, 5560.0),
    (114, 5570.0),
    (116, 5580.0),
    (118, 5590.0),
    (120, 5600.0),
    (122, 5610.0),
    (124, 5620.0),
    (126, 5630.0),
    (128, 5640.0),
    (132, 5660.0),
    (134, 5670.0),
    (136, 5680.0),
    (138, 5690.0),
    (140, 5700.0),
    (142, 5710.0),
    (144, 5720.0),
    (149, 5745.0),
    (151, 5755.0),
    (153, 5765.0),
    (155, 5775.0),
    (157, 5785.0),
    (159, 5795.0),
    (161, 5805.0),
    (163, 5815.0),
    (165, 5825.0),
];

pub fn center_frequency(channel: u32) -> Option<f64> {
    CENTER_FREQUENCIES
        .iter()
        .find(|(c, _)| *c == channel)
        .map(|(_, freq)| *freq)
}

pub fn controller_translation(primary: u32) -> Option<u32> {
    CONTROLLER_CHANNELS
        .iter()
        .find(|(p, _)| *p == primary)
        .map(|(_, wlc)| *wlc)
}

// ── Derived sets ────────────────────────────────────────────────────

fn subtract(valid: impl IntoIterator<Item = u32>, denied: &[u32]) -> BTreeSet<u32> {
    valid.into_iter().filter(|c| !denied.contains(c)).collect()
}

pub static ALLOWED_CHANNELS_24GHZ: LazyLock<BTreeSet<u32>> = LazyLock::new(|| {
    subtract(
        VALID_CHANNELS_24GHZ.iter().copied(),
        DENIED_CHANNELS_24GHZ,
    )
});

pub static ALLOWED_CHANNELS_5GHZ: LazyLock<BTreeSet<u32>> = LazyLock::new(|| {
    let valid = CHANNELS_5GHZ_20MHZ
        .iter()
        .chain(CHANNELS_5GHZ_40MHZ)
        .chain(CHANNELS_5GHZ_80MHZ)
        .chain(CHANNELS_5GHZ_160MHZ)
        .copied();
    subtract(valid, DENIED_CHANNELS_5GHZ)
});
