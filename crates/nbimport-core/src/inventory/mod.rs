// ── Remote inventory seam ──
//
// The reconciler only needs four remote operations plus a connectivity
// probe. `Inventory` abstracts them so the pipeline can run against NetBox
// or an in-memory double, and `Connector` hands every worker its own
// session.

mod netbox;

#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;

use serde_json::Value;

use crate::error::CoreError;

pub use netbox::NetboxConnector;

/// Remote inventory operations consumed by the import pipeline.
pub trait Inventory: Send + Sync {
    /// Cheap authenticated request proving the inventory is reachable.
    fn check(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Id of the device called `name`, if any.
    fn lookup_device(&self, name: &str)
    -> impl Future<Output = Result<Option<u64>, CoreError>> + Send;

    /// Id of interface `interface` on device `device`, if any.
    fn lookup_interface(
        &self,
        device: &str,
        interface: &str,
    ) -> impl Future<Output = Result<Option<u64>, CoreError>> + Send;

    /// Create a device and return its new id.
    fn create_device(&self, payload: &Value)
    -> impl Future<Output = Result<u64, CoreError>> + Send;

    /// Apply a batch of device updates in one call.
    fn update_devices(&self, payloads: &[Value])
    -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Apply a batch of interface updates in one call.
    fn update_interfaces(
        &self,
        payloads: &[Value],
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Opens independent inventory sessions.
pub trait Connector: Send + Sync + 'static {
    type Session: Inventory + 'static;

    /// Open a new session. Sessions are never shared between workers.
    fn connect(&self) -> Result<Self::Session, CoreError>;
}
