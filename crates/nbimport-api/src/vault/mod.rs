// HashiCorp Vault client modules
//
// Read-only access to KV version 2 secrets. The importer only ever reads a
// single secret at startup to obtain NetBox connection details.

pub mod client;

pub use client::{NetboxSecret, VaultClient};
