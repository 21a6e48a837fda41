// src/main.rs

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use figsync::{
    extract_current_groups, reconcile, Config, GroupKind, GroupValue, GrouperClient,
    OverrideAction, OverrideTable, StaticDirectory, StemScope,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "figsync")]
#[command(author, version, about = "Figshare group-membership override reconciliation", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = figsync::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a user's current portal/quota assignment from a membership dump
    Current {
        /// User NetID
        netid: String,
        /// File of raw ismemberof values, one per line
        #[arg(short, long)]
        membership_file: PathBuf,
    },
    /// Set or clear a manual override ("root" clears)
    Override {
        /// User NetID
        netid: String,
        /// Directory uaid for the user
        uaid: String,
        /// Group kind: portal or quota
        #[arg(short, long)]
        kind: String,
        /// Portal name, quota in bytes, or "root"
        value: String,
    },
    /// Reconcile a live membership set against the override table
    Reconcile {
        /// Target group: portal name or quota in bytes
        group: String,
        /// Group kind: portal or quota
        #[arg(short, long)]
        kind: String,
        /// File of live member uaids, one per line
        #[arg(short, long)]
        live_file: PathBuf,
    },
    /// List groups under the figshare stem via Grouper
    Groups {
        /// Group kind: portal, quota, or omit for all
        #[arg(short, long, default_value = "")]
        kind: String,
    },
    /// Check whether a group exists under the stem for a kind
    Exists {
        /// Bare group name
        group: String,
        /// Group kind: portal or quota
        #[arg(short, long)]
        kind: String,
    },
}

/// Read non-empty lines from a file.
fn read_lines(path: &PathBuf) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn load_table(config: &Config, kind: GroupKind) -> Result<OverrideTable> {
    let path = match kind {
        GroupKind::Portal => &config.figshare.portal_file,
        GroupKind::Quota => &config.figshare.quota_file,
    };
    Ok(OverrideTable::load_or_empty(path, kind)?)
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Current {
            netid,
            membership_file,
        } => {
            let values = read_lines(&membership_file)?;
            let refs: Vec<&str> = values.iter().map(String::as_str).collect();
            let directory = StaticDirectory::new().with_membership(&netid, &refs);

            let membership = extract_current_groups(&netid, &directory, &config.figshare.stem)?;
            println!("portal: {}", membership.portal);
            println!("quota:  {}", membership.quota);
            Ok(())
        }
        Commands::Override {
            netid,
            uaid,
            kind,
            value,
        } => {
            let kind: GroupKind = kind.parse()?;
            let action = OverrideAction::parse(kind, &value)?;

            let mut table = load_table(&config, kind)?;
            table.upsert(&netid, &uaid, action)?;
            println!("Override applied for {netid} in {}", table.path().display());
            Ok(())
        }
        Commands::Reconcile {
            group,
            kind,
            live_file,
        } => {
            let kind: GroupKind = kind.parse()?;
            let target = GroupValue::parse(kind, &group)?;
            let live: HashSet<String> = read_lines(&live_file)?.into_iter().collect();

            let table = load_table(&config, kind)?;
            let corrected = reconcile(&live, &target, &table)?;

            info!("Reconciled {} -> {} members", live.len(), corrected.len());
            let mut members: Vec<&String> = corrected.iter().collect();
            members.sort();
            for uaid in members {
                println!("{uaid}");
            }
            Ok(())
        }
        Commands::Groups { kind } => {
            let scope: StemScope = kind.parse()?;
            let client = GrouperClient::new(&config.grouper, &config.figshare.stem)?;

            for group in client.find_groups(scope)? {
                println!("{}\t{}", group.display_extension, group.name);
            }
            Ok(())
        }
        Commands::Exists { group, kind } => {
            let kind: GroupKind = kind.parse()?;
            let client = GrouperClient::new(&config.grouper, &config.figshare.stem)?;

            let exists = client.group_exists(&group, kind)?;
            println!("{exists}");
            Ok(())
        }
    }
}
