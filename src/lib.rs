// src/lib.rs

//! figsync — figshare group-membership reconciliation
//!
//! Reconciles per-user "portal" and "quota" group membership between an
//! LDAP-like directory and the Grouper group-management service, honoring
//! administrator-curated override tables that take unconditional precedence
//! over the automated assignment.
//!
//! # Architecture
//!
//! - Override tables: commented CSV files, one per group kind, loaded into
//!   typed in-memory tables and rewritten in full after every mutation
//! - Reconciliation: pure two-phase set merge (force-in, then force-out)
//!   of a live membership set against the override table
//! - Directory: blocking search behind the [`directory::DirectoryService`]
//!   seam; the membership parser extracts the current portal/quota
//!   assignment from the multi-valued `ismemberof` attribute
//! - Grouper: blocking HTTPS client used only to answer "does this group
//!   exist under the stem"

pub mod config;
pub mod directory;
mod error;
pub mod grouper;
pub mod overrides;
pub mod reconcile;
pub mod stem;

pub use config::{Config, FigshareConfig, GrouperConfig};
pub use directory::{
    extract_current_groups, DirectoryEntry, DirectoryService, FigshareMembership,
    StaticDirectory,
};
pub use error::{Error, Result};
pub use grouper::{GrouperClient, GrouperGroup};
pub use overrides::{GroupKind, GroupValue, OverrideAction, OverrideRecord, OverrideTable};
pub use reconcile::{apply_entries, reconcile, SetAction};
pub use stem::{figshare_stem, StemScope};
