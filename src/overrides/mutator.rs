// src/overrides/mutator.rs

//! Mutations against an override table.
//!
//! Every mutation is logged, applied in memory, then flushed to the backing
//! file in full; there is no staged state between calls. A single writer
//! process is assumed.

use tracing::info;

use super::{GroupKind, GroupValue, OverrideRecord, OverrideTable};
use crate::error::{Error, Result};

/// Raw column value meaning "clear any override for this user".
const CLEAR_SENTINEL: &str = "root";

/// What to do with a user's override entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideAction {
    /// Force the user into `group` (insert or overwrite)
    Set(GroupValue),
    /// Drop the user's override; directory-derived state applies again
    Clear,
}

impl OverrideAction {
    /// Interpret a raw group value from user input, mapping the `root`
    /// sentinel to [`OverrideAction::Clear`].
    pub fn parse(kind: GroupKind, raw: &str) -> Result<Self> {
        if raw == CLEAR_SENTINEL {
            return Ok(OverrideAction::Clear);
        }
        Ok(OverrideAction::Set(GroupValue::parse(kind, raw)?))
    }
}

impl OverrideTable {
    /// Apply an add/update/remove for `netid`, then rewrite the file.
    ///
    /// Clearing a netid with no record is a no-op (nothing is created and
    /// nothing is written).
    pub fn upsert(&mut self, netid: &str, uaid: &str, action: OverrideAction) -> Result<()> {
        match (self.position(netid), action) {
            (None, OverrideAction::Set(group)) => {
                self.check_kind(&group)?;
                info!("Adding entry for {netid}");
                self.records_mut().push(OverrideRecord {
                    netid: netid.to_string(),
                    uaid: uaid.to_string(),
                    group,
                });
            }
            (Some(idx), OverrideAction::Set(group)) => {
                self.check_kind(&group)?;
                info!("Updating entry for {netid}");
                self.records_mut()[idx] = OverrideRecord {
                    netid: netid.to_string(),
                    uaid: uaid.to_string(),
                    group,
                };
            }
            (Some(idx), OverrideAction::Clear) => {
                info!("Removing entry for {netid}");
                self.records_mut().remove(idx);
            }
            (None, OverrideAction::Clear) => return Ok(()),
        }

        info!("Updating {} csv", self.kind());
        self.save()
    }

    fn check_kind(&self, group: &GroupValue) -> Result<()> {
        if group.kind() != self.kind() {
            return Err(Error::InvalidArgument(format!(
                "{} value given for {} table",
                group.kind(),
                self.kind()
            )));
        }
        Ok(())
    }
}
