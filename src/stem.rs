// src/stem.rs

//! Grouper stem naming convention.
//!
//! Groups live under a single institutional stem, with one sub-stem per
//! group kind (e.g. `arizona.edu:dept:LBRY:figshare:portal`). The mapping
//! from kind keyword to stem path is a pure function of the configured base.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::overrides::GroupKind;

/// Which sub-tree of the figshare stem a query targets.
///
/// `All` corresponds to the empty keyword and addresses the stem root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemScope {
    Portal,
    Quota,
    All,
}

impl From<GroupKind> for StemScope {
    fn from(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Portal => StemScope::Portal,
            GroupKind::Quota => StemScope::Quota,
        }
    }
}

impl FromStr for StemScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "portal" => Ok(StemScope::Portal),
            "quota" => Ok(StemScope::Quota),
            "" => Ok(StemScope::All),
            other => Err(Error::InvalidArgument(format!(
                "Incorrect [group_type] input: {other}"
            ))),
        }
    }
}

impl fmt::Display for StemScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StemScope::Portal => write!(f, "portal"),
            StemScope::Quota => write!(f, "quota"),
            StemScope::All => Ok(()),
        }
    }
}

/// Build the canonical stem path for a scope under `base`.
///
/// `All` returns the base itself; the kind scopes append one path element.
pub fn figshare_stem(base: &str, scope: StemScope) -> String {
    match scope {
        StemScope::All => base.to_string(),
        kind => format!("{base}:{kind}"),
    }
}
