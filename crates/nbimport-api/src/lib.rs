// nbimport-api: Async Rust clients for the NetBox REST API and Vault KV secrets

pub mod auth;
pub mod error;
pub mod netbox;
pub mod transport;
pub mod vault;

pub use auth::AuthScheme;
pub use error::Error;
pub use netbox::NetboxClient;
pub use transport::{TlsMode, TransportConfig};
pub use vault::{NetboxSecret, VaultClient};
