// src/overrides/table.rs

//! Load/save for manual override CSV files.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{GroupKind, GroupValue};
use crate::error::{Error, Result};

/// One manual override: a user forced into (or out of) a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRecord {
    /// User NetID, unique within a table
    pub netid: String,
    /// Directory identifier matched against live membership sets
    pub uaid: String,
    /// Forced group assignment, typed per table kind
    pub group: GroupValue,
}

/// In-memory image of one override CSV file.
///
/// The commented header is kept as raw lines (newlines included) so a
/// load/save cycle reproduces it byte-for-byte. Records keep file order;
/// at most one record exists per netid.
#[derive(Debug, Clone)]
pub struct OverrideTable {
    kind: GroupKind,
    path: PathBuf,
    header: Vec<String>,
    records: Vec<OverrideRecord>,
}

impl OverrideTable {
    /// Create an empty table backed by `path`.
    pub fn empty(path: impl Into<PathBuf>, kind: GroupKind) -> Self {
        OverrideTable {
            kind,
            path: path.into(),
            header: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Load an override file.
    ///
    /// Returns `Error::NotFound` if the file does not exist; callers that
    /// treat a missing file as an empty table should use [`load_or_empty`].
    ///
    /// [`load_or_empty`]: OverrideTable::load_or_empty
    pub fn load(path: impl AsRef<Path>, kind: GroupKind) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::NotFound(path.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;

        let mut table = OverrideTable::empty(path, kind);
        let mut seen_columns = false;
        let mut seen_netids: HashSet<String> = HashSet::new();

        // split_inclusive keeps line terminators, so header lines
        // round-trip exactly as written
        for raw in content.split_inclusive('\n') {
            if raw.starts_with('#') {
                table.header.push(raw.to_string());
                continue;
            }

            let line = raw.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }

            if !seen_columns {
                let expected = format!("netid,uaid,{kind}");
                if line != expected {
                    return Err(Error::Schema(format!(
                        "{}: expected columns [{expected}], found [{line}]",
                        path.display()
                    )));
                }
                seen_columns = true;
                continue;
            }

            let record = parse_row(kind, line)
                .map_err(|reason| Error::Schema(format!("{}: {reason}", path.display())))?;
            if !seen_netids.insert(record.netid.clone()) {
                return Err(Error::Schema(format!(
                    "{}: duplicate netid [{}]",
                    path.display(),
                    record.netid
                )));
            }
            table.records.push(record);
        }

        Ok(table)
    }

    /// Load an override file, treating a missing file as an empty table.
    ///
    /// The missing-file case is normal at first run and is logged, not fatal.
    pub fn load_or_empty(path: impl AsRef<Path>, kind: GroupKind) -> Result<Self> {
        let path = path.as_ref();
        match OverrideTable::load(path, kind) {
            Ok(table) => Ok(table),
            Err(Error::NotFound(_)) => {
                info!("File not found! : {}", path.display());
                Ok(OverrideTable::empty(path, kind))
            }
            Err(e) => Err(e),
        }
    }

    /// Rewrite the backing file in full: header, column row, then records.
    pub fn save(&self) -> Result<()> {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
        }
        out.push_str(&format!("netid,uaid,{}\n", self.kind));
        for record in &self.records {
            out.push_str(&format!(
                "{},{},{}\n",
                record.netid, record.uaid, record.group
            ));
        }

        info!("Overwriting : {}", self.path.display());
        fs::write(&self.path, out)?;
        Ok(())
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw commented header lines, as read from disk.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[OverrideRecord] {
        &self.records
    }

    /// Look up the override for a netid, if one exists.
    pub fn get(&self, netid: &str) -> Option<&OverrideRecord> {
        self.records.iter().find(|r| r.netid == netid)
    }

    pub(super) fn position(&self, netid: &str) -> Option<usize> {
        self.records.iter().position(|r| r.netid == netid)
    }

    pub(super) fn records_mut(&mut self) -> &mut Vec<OverrideRecord> {
        &mut self.records
    }
}

fn parse_row(kind: GroupKind, line: &str) -> std::result::Result<OverrideRecord, String> {
    let mut fields = line.split(',');
    let (netid, uaid, group) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(netid), Some(uaid), Some(group), None) => (netid, uaid, group),
        _ => return Err(format!("expected 3 columns in row [{line}]")),
    };

    let group = GroupValue::parse(kind, group).map_err(|e| match e {
        Error::Schema(reason) => reason,
        other => other.to_string(),
    })?;
    Ok(OverrideRecord {
        netid: netid.to_string(),
        uaid: uaid.to_string(),
        group,
    })
}
