// NetBox REST API client modules
//
// Hand-written client for the small slice of the `dcim` endpoints the
// importer needs: device/interface lookups, device creation, and bulk
// PATCH updates.

pub mod client;
pub mod types;

pub use client::NetboxClient;
