//! # Billing Console
//!
//! The `billing` command-line console for staff: sign in, issue invoices,
//! record payments, correct KYC details, and (for admins) manage staff and
//! read revenue analytics.
//!
//! ## Module Organization
//! ```text
//! billing_console/
//! ├── lib.rs          ◄─── You are here (logging, run, error notification)
//! ├── cli.rs          ◄─── clap definitions, amount parsing
//! ├── context.rs      ◄─── Console: config + session store + client
//! ├── render.rs       ◄─── comfy-table output
//! └── commands/       ◄─── one function per subcommand
//! ```
//!
//! ## Failure Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  command ──► Ok  ──► output on stdout, exit 0                           │
//! │     │                                                                   │
//! │     └──────► Err ──► "error: <notification>" on stderr, exit 1          │
//! │                       ApiError  ──► user_message()                      │
//! │                       otherwise ──► error chain                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Nothing is retried; the operator corrects the input and runs the command
//! again.

pub mod cli;
pub mod commands;
pub mod context;
pub mod render;

use std::process::ExitCode;

use billing_api::ApiError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Filter used with `--verbose` when `RUST_LOG` is unset.
pub const VERBOSE_FILTER: &str = "info,billing=debug,reqwest=warn";

/// Parses arguments, runs the command and reports failure as a single
/// notification line.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", notification(&err));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so tables on stdout
/// stay clean.
///
/// ## Log Levels
/// - Default: warnings only
/// - `--verbose`: [`VERBOSE_FILTER`]
/// - `RUST_LOG` overrides both
fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The one line shown when a command fails.
pub fn notification(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api.user_message(),
        None => format!("{err:#}"),
    }
}
