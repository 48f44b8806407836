// ── Wireless channel transcoding ──
//
// Pure functions and immutable reference tables that turn a loosely
// specified (band, channel, width) triple into the NetBox `rf_channel`
// string and the channel number a wireless controller expects.

pub mod codec;
pub mod tables;

pub use codec::{Band, ChannelError, ChannelSpec, Transcoded};
