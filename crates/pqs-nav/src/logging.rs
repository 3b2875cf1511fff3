//! Log output for the `pqsnav` binary.
//!
//! The library only emits `tracing` events. Hosts embedding the crate install
//! their own subscriber; [`init_logging`] is what the CLI uses.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets the CLI filters on: the library and the binary.
const LOG_TARGETS: &[&str] = &["pqs_nav", "pqsnav"];

/// How much the CLI prints, picked from `-q` and `-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above: session start and storage opened.
    #[default]
    Normal,
    /// Adds history moves and breadcrumb changes.
    Verbose,
    /// Adds replay latch and sidebar state changes.
    Trace,
}

impl Verbosity {
    /// `-q` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Maximum level let through for the crate's targets.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Filter directives for `verbosity`, unless `rust_log` supplies its own.
///
/// A blank `rust_log` counts as unset.
#[must_use]
pub fn filter_directives(verbosity: Verbosity, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => directives.to_string(),
        None => {
            let level = verbosity.level();
            LOG_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

/// Install a stderr subscriber for the CLI. `RUST_LOG` overrides `verbosity`.
///
/// Returns `false` when a subscriber was already installed.
///
/// ```no_run
/// use pqs_nav::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(verbosity, rust_log.as_deref());
    // An unparsable RUST_LOG falls back to the flag-derived filter.
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbosity, None)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= Verbosity::Verbose)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .is_ok()
}
