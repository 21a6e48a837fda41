// src/overrides/mod.rs

//! Manual override tables.
//!
//! Administrators record exceptions to the automated portal/quota assignment
//! in two CSV files, one per group kind. Each file carries a commented
//! header that is preserved verbatim across load/save cycles, a named column
//! row, and one typed row per user. Overrides take unconditional precedence
//! over directory-derived membership (see [`crate::reconcile`]).

mod mutator;
mod table;

pub use mutator::OverrideAction;
pub use table::{OverrideRecord, OverrideTable};

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Which schema variant an override table uses.
///
/// The `group` column is a portal name (string) for `Portal` tables and a
/// byte quantity (integer) for `Quota` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Portal,
    Quota,
}

impl FromStr for GroupKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "portal" => Ok(GroupKind::Portal),
            "quota" => Ok(GroupKind::Quota),
            other => Err(Error::InvalidArgument(format!(
                "Incorrect [group_type] input: {other}"
            ))),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Portal => write!(f, "portal"),
            GroupKind::Quota => write!(f, "quota"),
        }
    }
}

/// A typed `group` column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValue {
    /// Portal name, e.g. `"dataportal"`
    Portal(String),
    /// Quota in bytes, e.g. `536870912000`
    Quota(u64),
}

impl GroupValue {
    /// The table kind this value belongs to.
    pub fn kind(&self) -> GroupKind {
        match self {
            GroupValue::Portal(_) => GroupKind::Portal,
            GroupValue::Quota(_) => GroupKind::Quota,
        }
    }

    /// Coerce a raw column string to the declared kind.
    pub fn parse(kind: GroupKind, raw: &str) -> Result<Self, Error> {
        match kind {
            GroupKind::Portal => Ok(GroupValue::Portal(raw.to_string())),
            GroupKind::Quota => raw
                .parse::<u64>()
                .map(GroupValue::Quota)
                .map_err(|_| Error::Schema(format!("Quota value is not an integer: {raw}"))),
        }
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Portal(name) => write!(f, "{name}"),
            GroupValue::Quota(bytes) => write!(f, "{bytes}"),
        }
    }
}
