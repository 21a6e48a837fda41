// src/config.rs

//! Crate configuration loaded from a TOML file.
//!
//! # Example figsync.toml
//!
//! ```toml
//! [figshare]
//! stem = "arizona.edu:dept:LBRY:figshare"
//! portal_file = "config/portal_manual.csv"
//! quota_file = "config/quota_manual.csv"
//!
//! [grouper]
//! host = "grouper.example.edu"
//! base_path = "grouper-ws/servicesRest/json/v2_2_001/groups"
//! user = "figsync"
//! password = "..."
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/figsync.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub figshare: FigshareConfig,
    pub grouper: GrouperConfig,
}

/// Stem base and override file locations
#[derive(Debug, Clone, Deserialize)]
pub struct FigshareConfig {
    /// Institutional stem under which portal/quota groups live
    pub stem: String,
    /// Manual portal override CSV
    pub portal_file: PathBuf,
    /// Manual quota override CSV
    pub quota_file: PathBuf,
}

/// Grouper web-service endpoint and credentials
#[derive(Debug, Clone, Deserialize)]
pub struct GrouperConfig {
    pub host: String,
    pub base_path: String,
    pub user: String,
    pub password: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Config::parse_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}
