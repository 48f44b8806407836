// In-memory inventory for pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{Connector, Inventory};
use crate::error::CoreError;

/// One remote call, as observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Check,
    LookupDevice(String),
    LookupInterface(String, String),
    CreateDevice(Value),
    UpdateDevices(Vec<Value>),
    UpdateInterfaces(Vec<Value>),
}

#[derive(Debug, Default)]
struct State {
    devices: HashMap<String, u64>,
    interfaces: HashMap<(String, String), u64>,
    /// Interfaces provisioned on every created device.
    template: Vec<String>,
    next_id: u64,
    calls: Vec<Call>,
    reject_create: Option<String>,
    reject_interface_update: Option<String>,
    unauthorized: bool,
}

/// Shared-state mock. Clones observe the same inventory.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockInventory {
    state: Arc<Mutex<State>>,
}

#[allow(clippy::unwrap_used)]
impl MockInventory {
    pub(crate) fn new() -> Self {
        let inventory = Self::default();
        inventory.state.lock().unwrap().next_id = 100;
        inventory
    }

    pub(crate) fn with_template(self, names: &[&str]) -> Self {
        self.state.lock().unwrap().template = names.iter().map(|n| (*n).to_owned()).collect();
        self
    }

    pub(crate) fn with_device(self, name: &str, id: u64, interfaces: &[(&str, u64)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.devices.insert(name.to_owned(), id);
            for (iface, iface_id) in interfaces {
                state
                    .interfaces
                    .insert((name.to_owned(), (*iface).to_owned()), *iface_id);
            }
        }
        self
    }

    pub(crate) fn rejecting_create(self, message: &str) -> Self {
        self.state.lock().unwrap().reject_create = Some(message.to_owned());
        self
    }

    pub(crate) fn rejecting_interface_update(self, message: &str) -> Self {
        self.state.lock().unwrap().reject_interface_update = Some(message.to_owned());
        self
    }

    pub(crate) fn unauthorized(self) -> Self {
        self.state.lock().unwrap().unauthorized = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change remote state.
    pub(crate) fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::CreateDevice(_) | Call::UpdateDevices(_) | Call::UpdateInterfaces(_)
                )
            })
            .collect()
    }

    fn record(&self, call: Call) -> Result<(), CoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.unauthorized {
            return Err(CoreError::AuthenticationFailed {
                message: "Invalid token".into(),
            });
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
impl Inventory for MockInventory {
    async fn check(&self) -> Result<(), CoreError> {
        self.record(Call::Check)
    }

    async fn lookup_device(&self, name: &str) -> Result<Option<u64>, CoreError> {
        self.record(Call::LookupDevice(name.to_owned()))?;
        Ok(self.state.lock().unwrap().devices.get(name).copied())
    }

    async fn lookup_interface(
        &self,
        device: &str,
        interface: &str,
    ) -> Result<Option<u64>, CoreError> {
        self.record(Call::LookupInterface(device.to_owned(), interface.to_owned()))?;
        let key = (device.to_owned(), interface.to_owned());
        Ok(self.state.lock().unwrap().interfaces.get(&key).copied())
    }

    async fn create_device(&self, payload: &Value) -> Result<u64, CoreError> {
        self.record(Call::CreateDevice(payload.clone()))?;
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.reject_create.clone() {
            return Err(CoreError::Api {
                message,
                status: Some(400),
            });
        }

        let name = payload["name"].as_str().unwrap_or_default().to_owned();
        state.next_id += 1;
        let id = state.next_id;
        state.devices.insert(name.clone(), id);
        for iface in state.template.clone() {
            state.next_id += 1;
            let iface_id = state.next_id;
            state.interfaces.insert((name.clone(), iface), iface_id);
        }
        Ok(id)
    }

    async fn update_devices(&self, payloads: &[Value]) -> Result<(), CoreError> {
        self.record(Call::UpdateDevices(payloads.to_vec()))
    }

    async fn update_interfaces(&self, payloads: &[Value]) -> Result<(), CoreError> {
        self.record(Call::UpdateInterfaces(payloads.to_vec()))?;
        match self.state.lock().unwrap().reject_interface_update.clone() {
            Some(message) => Err(CoreError::Api {
                message,
                status: Some(400),
            }),
            None => Ok(()),
        }
    }
}

/// Hands out clones of one mock, so tests can inspect every worker's calls.
#[derive(Debug, Clone)]
pub(crate) struct MockConnector {
    pub(crate) inventory: MockInventory,
}

impl Connector for MockConnector {
    type Session = MockInventory;

    fn connect(&self) -> Result<MockInventory, CoreError> {
        Ok(self.inventory.clone())
    }
}
