//! Command-line interface for pqs-nav.
//!
//! This module provides the CLI structure for the `pqsnav` binary, which
//! resolves routes, replays navigation sessions and inspects stored analytics.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnalyticsCommand, ConfigCommand, ReplayCommand, ReplayStep, RouteCommand, RoutesCommand,
};

/// pqsnav - Inspect and replay PQS navigation
///
/// Resolves routes to sidebar state, replays click sequences through a
/// navigation session, and reports on locally recorded navigation analytics.
#[derive(Debug, Parser)]
#[command(name = "pqsnav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the navigation state and breadcrumbs for a path
    Route(RouteCommand),

    /// Inspect the route tables
    #[command(subcommand)]
    Routes(RoutesCommand),

    /// Replay a sequence of navigation steps
    Replay(ReplayCommand),

    /// Inspect recorded navigation analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
