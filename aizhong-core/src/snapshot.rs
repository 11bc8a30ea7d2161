//! Merges the two provider fetches into one published [`Snapshot`].
//!
//! Balance records come first and decide which sub-accounts exist; water
//! interruption notices are then attached to every known sub-account, since
//! the portal does not say which one a notice belongs to.

use tracing::{debug, warn};

use crate::api::{BindingRecord, RawInterruptionNotice};
use crate::models::{mask_account_name, InterruptionNotice, Snapshot, SubAccountRecord};

/// Build the per-sub-account snapshot for one refresh cycle.
///
/// Records without a consumption entry are skipped, so an account with no
/// bindings yields an empty snapshot and any notices are dropped with it.
/// Identical inputs always produce an identical snapshot.
pub fn build_snapshot(
    bindings: Vec<BindingRecord>,
    notices: Vec<RawInterruptionNotice>,
) -> Snapshot {
    let mut snapshot = Snapshot::new();

    apply_balances(&mut snapshot, bindings);
    broadcast_water_notices(&mut snapshot, notices);

    debug!(sub_accounts = snapshot.len(), "Snapshot assembled");
    snapshot
}

fn apply_balances(snapshot: &mut Snapshot, bindings: Vec<BindingRecord>) {
    for binding in bindings {
        if binding.cons_list.is_empty() {
            continue;
        }
        let Some(label) = binding.account_label() else {
            warn!("Skipping binding record whose first consumption entry has no account name");
            continue;
        };

        let key = mask_account_name(label);
        let record = snapshot.entry(key).or_insert_with(SubAccountRecord::default);
        if binding.is_water() {
            record.water_balance = binding.prepay_balance;
        } else if binding.is_gas() {
            record.gas_balance = binding.prepay_balance;
        }
    }
}

fn broadcast_water_notices(snapshot: &mut Snapshot, notices: Vec<RawInterruptionNotice>) {
    let water: Vec<InterruptionNotice> = notices
        .into_iter()
        .filter(RawInterruptionNotice::is_water)
        .map(InterruptionNotice::from)
        .collect();

    if water.is_empty() {
        return;
    }

    debug!(count = water.len(), "Attaching water interruption notices");
    for record in snapshot.values_mut() {
        record.interruption_notices.extend(water.iter().cloned());
    }
}
