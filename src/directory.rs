// src/directory.rs

//! Directory lookups and the figshare membership parser.
//!
//! The directory service itself is an external collaborator reached over a
//! blocking search call; [`DirectoryService`] is the seam. The parser reads
//! a user's multi-valued `ismemberof` attribute and extracts which portal
//! and quota group the directory currently asserts for them.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::stem::{figshare_stem, StemScope};

/// Attribute listing every group a directory account is linked to.
const MEMBERSHIP_ATTRIBUTE: &str = "ismemberof";

/// Grouper bookkeeping groups carry this marker and are never a user's
/// assigned portal or quota group.
const ADMIN_MARKER: &str = "grouper";

/// One entry returned by a directory search.
#[derive(Debug, Clone, Default)]
pub struct DirectoryEntry {
    attributes: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(attributes: HashMap<String, Vec<String>>) -> Self {
        DirectoryEntry { attributes }
    }

    /// All values of a multi-valued attribute; `None` if absent.
    pub fn values(&self, attribute: &str) -> Option<&[String]> {
        self.attributes.get(attribute).map(|v| v.as_slice())
    }
}

/// Blocking search interface against an LDAP-like directory.
pub trait DirectoryService {
    /// Run a search with an attribute projection, returning matched entries.
    fn search(&self, filter: &str, attributes: &[&str]) -> Result<Vec<DirectoryEntry>>;
}

/// In-memory directory keyed by uid.
///
/// Backs tests and the CLI's offline mode; the filter is matched against
/// the `(uid=...)` form the membership parser issues.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, DirectoryEntry>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        StaticDirectory::default()
    }

    /// Register a user with the given `ismemberof` values.
    pub fn with_membership(mut self, uid: &str, membership: &[&str]) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(
            MEMBERSHIP_ATTRIBUTE.to_string(),
            membership.iter().map(|s| s.to_string()).collect(),
        );
        self.entries.insert(uid.to_string(), DirectoryEntry::new(attributes));
        self
    }

    /// Register a user with no membership attribute at all.
    pub fn with_empty_user(mut self, uid: &str) -> Self {
        self.entries.insert(uid.to_string(), DirectoryEntry::default());
        self
    }
}

impl DirectoryService for StaticDirectory {
    fn search(&self, filter: &str, _attributes: &[&str]) -> Result<Vec<DirectoryEntry>> {
        let uid = filter
            .strip_prefix("(uid=")
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| Error::Directory(format!("Unsupported filter: {filter}")))?;

        Ok(self.entries.get(uid).cloned().into_iter().collect())
    }
}

/// The portal and quota group the directory currently asserts for a user.
///
/// Empty fields mean "no assignment", which is normal for new or
/// unprovisioned users. Derived on every lookup, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FigshareMembership {
    pub portal: String,
    pub quota: String,
}

/// Query the directory for `uid` and extract their current portal and
/// quota group names.
///
/// Fails with `MultipleGroups` when the directory asserts more than one
/// group of the same kind, which indicates upstream data corruption.
pub fn extract_current_groups(
    uid: &str,
    directory: &dyn DirectoryService,
    stem_base: &str,
) -> Result<FigshareMembership> {
    let filter = format!("(uid={uid})");
    let entries = directory.search(&filter, &[MEMBERSHIP_ATTRIBUTE])?;

    let membership = entries
        .first()
        .and_then(|entry| entry.values(MEMBERSHIP_ATTRIBUTE))
        .unwrap_or(&[]);

    if membership.is_empty() {
        warn!("No {MEMBERSHIP_ATTRIBUTE} attributes");
        return Ok(FigshareMembership::default());
    }

    let portal = match_stem(membership, &figshare_stem(stem_base, StemScope::Portal))?;
    if !portal.is_empty() {
        info!("Current portal is : {portal}");
    }

    let quota = match_stem(membership, &figshare_stem(stem_base, StemScope::Quota))?;
    if !quota.is_empty() {
        info!("Current quota is : {quota} bytes");
    }

    Ok(FigshareMembership { portal, quota })
}

/// Find the single membership value under `stem`, stripped to the bare
/// group name.
///
/// Only values of the `<...>{stem}:<name>` form count as an assignment;
/// admin-marked bookkeeping values and the stem group itself (nothing after
/// the separator) are skipped. The bare name is whatever follows the stem
/// separator, regardless of any directory value framing before the stem.
fn match_stem(membership: &[String], stem: &str) -> Result<String> {
    let prefix = format!("{stem}:");
    let matches: Vec<&str> = membership
        .iter()
        .filter(|value| !value.contains(ADMIN_MARKER))
        .filter_map(|value| value.split_once(&prefix).map(|(_, name)| name))
        .filter(|name| !name.is_empty())
        .collect();

    match matches.as_slice() {
        [] => {
            info!("No Grouper group found for {stem}");
            Ok(String::new())
        }
        [single] => Ok(single.to_string()),
        _ => Err(Error::MultipleGroups(format!(
            "user holds {} groups under {stem}",
            matches.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEM_BASE: &str = "arizona.edu:dept:LBRY:figshare";

    #[test]
    fn test_single_match_strips_stem_prefix() {
        let directory = StaticDirectory::new().with_membership(
            "alice",
            &[
                "arizona.edu:dept:LBRY:figshare:portal:acme",
                "arizona.edu:dept:LBRY:figshare:quota:536870912000",
                "arizona.edu:dept:LBRY:figshare:grouper-internal",
            ],
        );

        let membership = extract_current_groups("alice", &directory, STEM_BASE).unwrap();
        assert_eq!(membership.portal, "acme");
        assert_eq!(membership.quota, "536870912000");
    }

    #[test]
    fn test_framed_value_still_strips_to_bare_name() {
        let directory = StaticDirectory::new().with_membership(
            "alice",
            &[
                "cn=grouper-portal-internal",
                "cn=arizona.edu:dept:LBRY:figshare:portal:acme",
            ],
        );

        let membership = extract_current_groups("alice", &directory, STEM_BASE).unwrap();
        assert_eq!(membership.portal, "acme");
    }

    #[test]
    fn test_admin_marked_values_are_ignored() {
        let directory = StaticDirectory::new().with_membership(
            "alice",
            &[
                "cn=grouper-portal-internal",
                "arizona.edu:dept:LBRY:figshare:portal:acme",
            ],
        );

        let membership = extract_current_groups("alice", &directory, STEM_BASE).unwrap();
        assert_eq!(membership.portal, "acme");
        assert_eq!(membership.quota, "");
    }

    #[test]
    fn test_absent_attribute_yields_empty_membership() {
        let directory = StaticDirectory::new().with_empty_user("newhire");

        let membership = extract_current_groups("newhire", &directory, STEM_BASE).unwrap();
        assert_eq!(membership, FigshareMembership::default());
    }

    #[test]
    fn test_unknown_user_yields_empty_membership() {
        let directory = StaticDirectory::new();

        let membership = extract_current_groups("ghost", &directory, STEM_BASE).unwrap();
        assert_eq!(membership, FigshareMembership::default());
    }

    #[test]
    fn test_no_stem_match_yields_empty_field() {
        let directory = StaticDirectory::new()
            .with_membership("alice", &["arizona.edu:dept:LBRY:figshare:portal:acme"]);

        let membership = extract_current_groups("alice", &directory, STEM_BASE).unwrap();
        assert_eq!(membership.portal, "acme");
        assert_eq!(membership.quota, "");
    }

    #[test]
    fn test_stem_group_itself_does_not_consume_the_match() {
        // the portal stem group (no name after the separator) can appear in
        // ismemberof alongside the actual assignment
        let directory = StaticDirectory::new().with_membership(
            "alice",
            &[
                "arizona.edu:dept:LBRY:figshare:portal",
                "arizona.edu:dept:LBRY:figshare:portal:",
                "arizona.edu:dept:LBRY:figshare:portal:acme",
            ],
        );

        let membership = extract_current_groups("alice", &directory, STEM_BASE).unwrap();
        assert_eq!(membership.portal, "acme");
    }

    #[test]
    fn test_stem_group_alone_is_no_assignment() {
        let directory = StaticDirectory::new()
            .with_membership("alice", &["arizona.edu:dept:LBRY:figshare:portal"]);

        let membership = extract_current_groups("alice", &directory, STEM_BASE).unwrap();
        assert_eq!(membership.portal, "");
    }

    #[test]
    fn test_multiple_matches_fail() {
        let directory = StaticDirectory::new().with_membership(
            "alice",
            &[
                "arizona.edu:dept:LBRY:figshare:portal:acme",
                "arizona.edu:dept:LBRY:figshare:portal:globex",
            ],
        );

        let result = extract_current_groups("alice", &directory, STEM_BASE);
        assert!(matches!(result, Err(Error::MultipleGroups(_))));
    }
}
