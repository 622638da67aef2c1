//! cli
//!
//! Command-line interface layer for partnerlink.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Resolve configuration and delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers build the session stack
//! ([`commands::Services`]) and call into [`crate::auth`] and [`crate::api`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "PARTNERLINK_LOG";

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let loaded = Config::load().context("Failed to load config")?;
    for warning in &loaded.warnings {
        output::warn(&warning.message, verbosity);
    }
    let mut config = loaded.config;
    if let Some(ref url) = cli.api_url {
        config = config
            .with_api_base_url(url)
            .context("Invalid --api-url")?;
    }

    let ctx = commands::Context {
        config,
        verbosity,
        interactive: cli.interactive(),
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the global subscriber. Logs go to stderr.
///
/// `--debug` forces `debug`; otherwise `PARTNERLINK_LOG` is used, falling back
/// to `warn`.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("partnerlink=debug")
    } else {
        std::env::var(LOG_ENV)
            .ok()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded; ignore that.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
