// ── Per-record pipeline ──
//
// partition → enrich → validate → reconcile for one input row. Every
// failure is folded into the returned outcome so a worker always has
// exactly one result to report.

use crate::config::UpdatePolicy;
use crate::enrich::enrich;
use crate::error::{CoreError, RecordKind};
use crate::inventory::Inventory;
use crate::model::RawFields;
use crate::partition::{Partitioned, partition};
use crate::profile::ImportProfile;
use crate::reconcile::{ReconcileOutcome, Reconciler};
use crate::validate::validate_device;

/// Import one row against `inventory`.
pub async fn import_record<I: Inventory>(
    inventory: &I,
    profile: &ImportProfile,
    policy: UpdatePolicy,
    row: &RawFields,
) -> ReconcileOutcome {
    let Partitioned {
        device: mut device_fields,
        interfaces,
    } = partition(&profile.interface_pattern, row);

    let name = device_fields.get("name").cloned().unwrap_or_default();
    let failed = |stage: RecordKind, err: &CoreError| {
        ReconcileOutcome::failed(stage, err, format!("Device '{name}': {err}"))
    };

    let device_custom =
        match enrich(inventory, &mut device_fields, &profile.device_custom_fields).await {
            Ok(custom) => custom,
            Err(err) => return failed(RecordKind::Device, &err),
        };
    let mut device = match validate_device(&device_fields, &device_custom) {
        Ok(device) => device,
        Err(err) => return failed(RecordKind::Device, &err),
    };

    for (_, mut fields) in interfaces {
        let custom =
            match enrich(inventory, &mut fields, &profile.interface_custom_fields).await {
                Ok(custom) => custom,
                Err(err) => return failed(RecordKind::Interface, &err),
            };
        match profile.validator.interface(&fields, &custom) {
            Ok(interface) => device.interfaces.push(interface),
            Err(err) => return failed(RecordKind::Interface, &err),
        }
    }

    Reconciler::new(
        inventory,
        policy,
        profile.device_key_fields,
        profile.interface_key_fields,
    )
    .reconcile(device)
    .await
}
