// NetBox-backed inventory.

use serde_json::Value;
use tracing::debug;

use nbimport_api::NetboxClient;

use super::{Connector, Inventory};
use crate::config::NetboxConfig;
use crate::error::CoreError;

impl Inventory for NetboxClient {
    async fn check(&self) -> Result<(), CoreError> {
        let status = self.status().await?;
        debug!(
            version = status.netbox_version.as_deref().unwrap_or("unknown"),
            "NetBox reachable"
        );
        Ok(())
    }

    async fn lookup_device(&self, name: &str) -> Result<Option<u64>, CoreError> {
        Ok(self.find_device_id(name).await?)
    }

    async fn lookup_interface(
        &self,
        device: &str,
        interface: &str,
    ) -> Result<Option<u64>, CoreError> {
        Ok(self.find_interface_id(device, interface).await?)
    }

    async fn create_device(&self, payload: &Value) -> Result<u64, CoreError> {
        Ok(NetboxClient::create_device(self, payload).await?)
    }

    async fn update_devices(&self, payloads: &[Value]) -> Result<(), CoreError> {
        Ok(NetboxClient::update_devices(self, payloads).await?)
    }

    async fn update_interfaces(&self, payloads: &[Value]) -> Result<(), CoreError> {
        Ok(NetboxClient::update_interfaces(self, payloads).await?)
    }
}

/// Builds a fresh [`NetboxClient`] (and connection pool) per session.
#[derive(Debug, Clone)]
pub struct NetboxConnector {
    config: NetboxConfig,
}

impl NetboxConnector {
    pub fn new(config: NetboxConfig) -> Self {
        Self { config }
    }
}

impl Connector for NetboxConnector {
    type Session = NetboxClient;

    fn connect(&self) -> Result<NetboxClient, CoreError> {
        let transport = self.config.transport();
        Ok(NetboxClient::from_token(
            self.config.url.as_str(),
            &self.config.token,
            &transport,
        )?)
    }
}
