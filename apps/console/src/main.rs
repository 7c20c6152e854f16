//! # Billing Console Entry Point
//!
//! The setup lives in `lib.rs` so the commands can be tested without a
//! process boundary.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    billing_console::run().await
}
