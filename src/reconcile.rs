// src/reconcile.rs

//! Set-based membership reconciliation.
//!
//! Merges the live membership set of a target group with the manual override
//! table for that group kind. Overrides always win: users whose override
//! names the target group are forced in, users whose override names any
//! other group are forced out. Exclusion runs after inclusion so a row can
//! never be un-excluded.
//!
//! Group assignment within a kind is mutually exclusive: the exclusion phase
//! covers every override row that names a different group, so an override
//! for one portal removes the user from all other portals.

use std::collections::HashSet;

use tracing::info;

use crate::error::{Error, Result};
use crate::overrides::{GroupValue, OverrideTable};

/// Which way [`apply_entries`] moves entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetAction {
    Add,
    Remove,
}

/// Add or remove a batch of uaids, logging the affected netids first.
///
/// Removal of an absent uaid and addition of an already-present uaid are
/// both no-ops. Returns a new set; the input is untouched.
pub fn apply_entries(
    working: &HashSet<String>,
    entries: &[(&str, &str)],
    action: SetAction,
) -> HashSet<String> {
    let netids: Vec<&str> = entries.iter().map(|(netid, _)| *netid).collect();
    let mut result = working.clone();

    match action {
        SetAction::Add => {
            info!("Adding : {netids:?}");
            result.extend(entries.iter().map(|(_, uaid)| uaid.to_string()));
        }
        SetAction::Remove => {
            info!("Removing : {netids:?}");
            for (_, uaid) in entries {
                result.remove(*uaid);
            }
        }
    }

    result
}

/// Compute the corrected membership set for `target`.
///
/// `live` is the directory-reported set of uaids in the target group. Pure
/// function of its inputs; fails with `InvalidArgument` when the target
/// value's kind does not match the table's kind.
pub fn reconcile(
    live: &HashSet<String>,
    target: &GroupValue,
    table: &OverrideTable,
) -> Result<HashSet<String>> {
    if target.kind() != table.kind() {
        return Err(Error::InvalidArgument(format!(
            "{} target given for {} table",
            target.kind(),
            table.kind()
        )));
    }

    let forced_in: Vec<(&str, &str)> = table
        .records()
        .iter()
        .filter(|r| r.group == *target)
        .map(|r| (r.netid.as_str(), r.uaid.as_str()))
        .collect();

    let forced_out: Vec<(&str, &str)> = table
        .records()
        .iter()
        .filter(|r| r.group != *target)
        .map(|r| (r.netid.as_str(), r.uaid.as_str()))
        .collect();

    let mut working = live.clone();
    if !forced_in.is_empty() {
        working = apply_entries(&working, &forced_in, SetAction::Add);
    }
    if !forced_out.is_empty() {
        working = apply_entries(&working, &forced_out, SetAction::Remove);
    }

    Ok(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::{GroupKind, OverrideAction, OverrideTable};
    use tempfile::tempdir;

    fn uaids(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn portal(name: &str) -> GroupValue {
        GroupValue::Portal(name.to_string())
    }

    fn table_with(dir: &tempfile::TempDir, rows: &[(&str, &str, &str)]) -> OverrideTable {
        let mut table =
            OverrideTable::empty(dir.path().join("portal_manual.csv"), GroupKind::Portal);
        for (netid, uaid, group) in rows {
            table
                .upsert(netid, uaid, OverrideAction::Set(portal(group)))
                .unwrap();
        }
        table
    }

    #[test]
    fn test_override_forces_membership_in() {
        let dir = tempdir().unwrap();
        let table = table_with(&dir, &[("u1", "U1", "engineering")]);

        let result = reconcile(&uaids(&[]), &portal("engineering"), &table).unwrap();
        assert_eq!(result, uaids(&["U1"]));
    }

    #[test]
    fn test_override_forces_membership_out() {
        let dir = tempdir().unwrap();
        let table = table_with(&dir, &[("u2", "U2", "marketing")]);

        let result = reconcile(&uaids(&["U2"]), &portal("engineering"), &table).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_live_members_without_overrides_pass_through() {
        let dir = tempdir().unwrap();
        let table = table_with(&dir, &[("u1", "U1", "engineering")]);

        let result =
            reconcile(&uaids(&["U5", "U6"]), &portal("engineering"), &table).unwrap();
        assert_eq!(result, uaids(&["U1", "U5", "U6"]));
    }

    #[test]
    fn test_exclusion_covers_unrelated_groups() {
        // an override for a different portal forces the user out of
        // every portal other than the one named
        let dir = tempdir().unwrap();
        let table = table_with(&dir, &[("u3", "U3", "humanities")]);

        let result = reconcile(&uaids(&["U3", "U4"]), &portal("sciences"), &table).unwrap();
        assert_eq!(result, uaids(&["U4"]));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let dir = tempdir().unwrap();
        let table = table_with(
            &dir,
            &[("u1", "U1", "engineering"), ("u2", "U2", "marketing")],
        );

        let live = uaids(&["U2", "U7"]);
        let once = reconcile(&live, &portal("engineering"), &table).unwrap();
        let twice = reconcile(&once, &portal("engineering"), &table).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, uaids(&["U1", "U7"]));
    }

    #[test]
    fn test_reconcile_does_not_mutate_input() {
        let dir = tempdir().unwrap();
        let table = table_with(&dir, &[("u2", "U2", "marketing")]);

        let live = uaids(&["U2"]);
        reconcile(&live, &portal("engineering"), &table).unwrap();
        assert_eq!(live, uaids(&["U2"]));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let table = table_with(&dir, &[]);

        let result = reconcile(&uaids(&[]), &GroupValue::Quota(1024), &table);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_quota_reconciliation() {
        let dir = tempdir().unwrap();
        let mut table =
            OverrideTable::empty(dir.path().join("quota_manual.csv"), GroupKind::Quota);
        table
            .upsert("u1", "U1", OverrideAction::Set(GroupValue::Quota(2048)))
            .unwrap();
        table
            .upsert("u2", "U2", OverrideAction::Set(GroupValue::Quota(4096)))
            .unwrap();

        let result =
            reconcile(&uaids(&["U2", "U9"]), &GroupValue::Quota(2048), &table).unwrap();
        assert_eq!(result, uaids(&["U1", "U9"]));
    }
}
