//! Import pipeline between `nbimport-api` and the `nbimport` CLI.
//!
//! Each input row flows through the same stages, one tokio task per row:
//!
//! - **[`partition`]** splits a flat row into device fields and one field
//!   map per interface, keyed by column prefix (`wired_`, `radio0_`, ...).
//!
//! - **[`enrich`]** pulls custom fields out of a record and resolves the ones
//!   that refer to other NetBox objects (controller names become device ids).
//!
//! - **[`validate`]** derives radio settings through the [`wireless`] channel
//!   codec and checks every record against its schema, producing typed
//!   [`DeviceRecord`] and [`InterfaceRecord`] values.
//!
//! - **[`reconcile`]** creates, updates or skips the device in NetBox, then
//!   pushes all of its interfaces in one batch.
//!
//! - **[`Orchestrator`]** spawns the workers, funnels their log entries
//!   through a single consumer, and joins them all before reporting a
//!   [`RunSummary`].
//!
//! Remote access goes through the [`Inventory`] trait so the pipeline runs
//! the same against NetBox and in-memory doubles.

pub mod config;
pub mod enrich;
pub mod error;
pub mod inventory;
pub mod model;
pub mod orchestrator;
pub mod partition;
pub mod payload;
pub mod pipeline;
pub mod profile;
pub mod reconcile;
pub mod validate;
pub mod wireless;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{NetboxConfig, TlsVerification, UpdatePolicy};
pub use error::{CoreError, RecordKind};
pub use inventory::{Connector, Inventory, NetboxConnector};
pub use model::{DeviceRecord, DeviceStatus, InterfaceRecord, MacAddress, RawFields};
pub use orchestrator::{
    EntryStatus, FailedRecord, InputRow, LogEntry, Orchestrator, RunSummary, trace_entry,
};
pub use pipeline::import_record;
pub use profile::{DeviceKind, ImportProfile};
pub use reconcile::{FailureCause, ReconcileOutcome};
pub use wireless::{Band, ChannelSpec, Transcoded};
