//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Subcommand};

use crate::handlers::Shortcut;

/// Route command arguments.
#[derive(Debug, Args)]
pub struct RouteCommand {
    /// Path to resolve (e.g. "/dashboard/users")
    pub path: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Route table commands.
#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// List every selectable entry with its route
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Verify that every entry round-trips through the route tables
    Check,
}

/// Replay command arguments.
#[derive(Debug, Args)]
pub struct ReplayCommand {
    /// Steps to replay, in order
    ///
    /// A step is a path ("/profile"), "back", "forward", "home",
    /// "menu:<id>", "submenu:<parent>/<id>", "crumb:<path>" or "sign-out".
    #[arg(required = true, value_name = "STEP")]
    pub steps: Vec<ReplayStep>,

    /// Start from this path
    #[arg(short, long, default_value = "/home")]
    pub start: String,

    /// Record analytics to local storage
    #[arg(long)]
    pub record: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// One user action in a replayed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    /// Navigate directly to a path.
    Navigate(String),
    /// A keyboard shortcut.
    Shortcut(Shortcut),
    /// A top-level menu click.
    Menu(String),
    /// A submenu click: parent group and entry.
    Submenu(String, String),
    /// A breadcrumb click.
    Breadcrumb(String),
    /// Sign out.
    SignOut,
}

impl FromStr for ReplayStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('/') {
            return Ok(Self::Navigate(s.to_string()));
        }
        if s == "sign-out" {
            return Ok(Self::SignOut);
        }
        if let Some(id) = s.strip_prefix("menu:") {
            return Ok(Self::Menu(id.to_string()));
        }
        if let Some(rest) = s.strip_prefix("submenu:") {
            let (parent, sub) = rest
                .split_once('/')
                .ok_or_else(|| format!("expected submenu:<parent>/<id>, got {s}"))?;
            return Ok(Self::Submenu(parent.to_string(), sub.to_string()));
        }
        if let Some(path) = s.strip_prefix("crumb:") {
            return Ok(Self::Breadcrumb(path.to_string()));
        }
        s.parse::<Shortcut>()
            .map(Self::Shortcut)
            .map_err(|_| format!("unrecognized step: {s}"))
    }
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate(path) => f.write_str(path),
            Self::Shortcut(shortcut) => f.write_str(shortcut.action()),
            Self::Menu(id) => write!(f, "menu:{id}"),
            Self::Submenu(parent, sub) => write!(f, "submenu:{parent}/{sub}"),
            Self::Breadcrumb(path) => write!(f, "crumb:{path}"),
            Self::SignOut => f.write_str("sign-out"),
        }
    }
}

/// Stored analytics commands.
#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// Show aggregate statistics
    Stats {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Export analytics as JSON
    Export {
        /// Write to this file, or a timestamped file inside this directory
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Delete all recorded events
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
