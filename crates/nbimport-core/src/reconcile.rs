// ── Reconciliation ──
//
// Decides create / update / skip for one validated device and then pushes
// its interfaces. NetBox provisions interfaces from the device type
// template when a device is created, so interfaces are only ever looked
// up and patched, never created. Interface lookups are keyed by device
// name and therefore only run once the device exists remotely.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::config::UpdatePolicy;
use crate::error::{CoreError, RecordKind};
use crate::inventory::Inventory;
use crate::model::DeviceRecord;
use crate::payload::to_payload;

// ── Outcomes ────────────────────────────────────────────────────────

/// Broad reason behind a failed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// Input failed validation or was malformed; nothing was sent.
    Invalid,
    /// NetBox answered and refused the request.
    Rejected,
    /// NetBox could not be reached.
    Transport,
    /// NetBox refused the credentials.
    Authentication,
    /// A bug or an unexpected response; never a network problem.
    Internal,
}

impl From<&CoreError> for FailureCause {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Validation { .. } | CoreError::MalformedInput { .. } => Self::Invalid,
            CoreError::Import { .. } | CoreError::Api { .. } => Self::Rejected,
            CoreError::ConnectionFailed { .. } | CoreError::Timeout => Self::Transport,
            CoreError::AuthenticationFailed { .. } => Self::Authentication,
            CoreError::Config { .. } | CoreError::Internal(_) => Self::Internal,
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Invalid => "invalid input",
            Self::Rejected => "rejected by NetBox",
            Self::Transport => "transport error",
            Self::Authentication => "authentication error",
            Self::Internal => "internal error",
        };
        f.write_str(s)
    }
}

/// Terminal result of importing one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The device did not exist and was created.
    Created { id: u64, interfaces: Vec<String> },
    /// The device existed and was updated.
    Updated { id: u64, interfaces: Vec<String> },
    /// The device existed and updates are disabled.
    Skipped,
    /// `stage` tells a device failure from "device fine, interfaces not".
    Failed {
        stage: RecordKind,
        cause: FailureCause,
        detail: String,
    },
}

impl ReconcileOutcome {
    pub(crate) fn failed(stage: RecordKind, err: &CoreError, detail: String) -> Self {
        Self::Failed {
            stage,
            cause: FailureCause::from(err),
            detail,
        }
    }
}

// ── Reconciler ──────────────────────────────────────────────────────

/// Reconciles devices against one inventory session.
pub struct Reconciler<'a, I> {
    inventory: &'a I,
    policy: UpdatePolicy,
    device_key_fields: &'a [&'a str],
    interface_key_fields: &'a [&'a str],
}

impl<'a, I: Inventory> Reconciler<'a, I> {
    pub fn new(
        inventory: &'a I,
        policy: UpdatePolicy,
        device_key_fields: &'a [&'a str],
        interface_key_fields: &'a [&'a str],
    ) -> Self {
        Self {
            inventory,
            policy,
            device_key_fields,
            interface_key_fields,
        }
    }

    /// Bring NetBox in line with `device` and its interfaces.
    pub async fn reconcile(&self, mut device: DeviceRecord) -> ReconcileOutcome {
        let name = device.name.clone();
        let device_failed = |err: &CoreError| {
            ReconcileOutcome::failed(
                RecordKind::Device,
                err,
                format!("Device '{name}' was not imported: {err}"),
            )
        };

        let existing = match self.inventory.lookup_device(&name).await {
            Ok(existing) => existing,
            Err(err) => return device_failed(&err),
        };

        let created = match existing {
            Some(_) if self.policy == UpdatePolicy::SkipExisting => {
                return ReconcileOutcome::Skipped;
            }
            Some(id) => {
                device.id = Some(id);
                if let Err(err) = self.update_device(&device).await {
                    return device_failed(&err);
                }
                false
            }
            None => {
                // A caller-supplied id would turn the create into a write
                // against some other object.
                device.id = None;
                match self.create_device(&device).await {
                    Ok(id) => {
                        device.id = Some(id);
                        true
                    }
                    Err(err) => return device_failed(&err),
                }
            }
        };

        let Some(id) = device.id else {
            let err = CoreError::Internal("device id missing after import".into());
            return device_failed(&err);
        };

        if let Err(err) = self.push_interfaces(&mut device).await {
            return ReconcileOutcome::failed(
                RecordKind::Interface,
                &err,
                format!(
                    "Device '{name}' was imported successfully but interfaces were not \
                     configured. Details: {err}"
                ),
            );
        }

        let interfaces = device.interfaces.iter().map(|i| i.name.clone()).collect();
        if created {
            ReconcileOutcome::Created { id, interfaces }
        } else {
            ReconcileOutcome::Updated { id, interfaces }
        }
    }

    async fn create_device(&self, device: &DeviceRecord) -> Result<u64, CoreError> {
        let payload = to_payload(device, self.device_key_fields)?;
        debug!(device = %device.name, "creating device");
        self.inventory.create_device(&payload).await
    }

    async fn update_device(&self, device: &DeviceRecord) -> Result<(), CoreError> {
        let payload = to_payload(device, self.device_key_fields)?;
        debug!(device = %device.name, id = ?device.id, "updating device");
        self.inventory.update_devices(&[payload]).await
    }

    /// Resolve every interface id, then patch them all in one call.
    async fn push_interfaces(&self, device: &mut DeviceRecord) -> Result<(), CoreError> {
        if device.interfaces.is_empty() {
            return Ok(());
        }

        for interface in &mut device.interfaces {
            let id = self
                .inventory
                .lookup_interface(&device.name, &interface.name)
                .await?
                .ok_or_else(|| CoreError::Import {
                    kind: RecordKind::Interface,
                    identifier: interface.name.clone(),
                    message: format!("interface not found on device '{}'", device.name),
                })?;
            interface.id = Some(id);
        }

        let payloads = device
            .interfaces
            .iter()
            .map(|i| to_payload(i, self.interface_key_fields))
            .collect::<Result<Vec<Value>, _>>()?;
        debug!(device = %device.name, count = payloads.len(), "updating interfaces");
        self.inventory.update_interfaces(&payloads).await
    }
}
