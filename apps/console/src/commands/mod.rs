//! # Console Commands
//!
//! One function per subcommand. Each opens the console state it needs,
//! makes its request(s) and prints the outcome.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (dispatch)
//! ├── auth.rs       ◄─── login, logout, whoami
//! ├── settings.rs   ◄─── config
//! ├── invoices.rs   ◄─── invoices, show, history, create, quote, kyc, pdf, delete
//! ├── payments.rs   ◄─── pay, payments
//! ├── employees.rs  ◄─── employees, add-employee, remove-employee
//! └── analytics.rs  ◄─── analytics
//! ```
//!
//! Success messages match the notifications staff already know, e.g.
//! "Payment added successfully".

pub mod analytics;
pub mod auth;
pub mod employees;
pub mod invoices;
pub mod payments;
pub mod settings;

use anyhow::Result;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::context::Console;

/// Runs the parsed command.
pub async fn dispatch(cli: Cli) -> Result<()> {
    debug!(command = ?cli.command, "Dispatching");

    let Cli { config, command, .. } = cli;
    let open = || Console::open(config.clone());
    let signed_in = || -> Result<Console> { open()?.signed_in() };

    match command {
        Command::Login { email, password } => auth::login(open()?, &email, password).await,
        Command::Logout => auth::logout(&open()?),
        Command::Whoami => auth::whoami(open()?).await,
        Command::Config { save } => settings::show(&open()?, save),

        Command::Invoices { mine, search } => {
            invoices::list(signed_in()?, mine, search.as_deref()).await
        }
        Command::Show { id } => invoices::show(signed_in()?, &id).await,
        Command::History { id } => invoices::history(signed_in()?, &id).await,
        Command::Create { file } => invoices::create(signed_in()?, &file).await,
        // Offline: no config or session needed.
        Command::Quote { file } => invoices::quote(&file),
        Command::Kyc { id, phone, pan } => {
            invoices::kyc(signed_in()?, &id, phone.as_deref(), pan.as_deref()).await
        }
        Command::Pdf { id, out } => invoices::pdf(signed_in()?, &id, out).await,
        Command::Delete { id, yes } => invoices::delete(signed_in()?, &id, yes).await,

        Command::Pay {
            id,
            amount,
            mode,
            cheque_number,
            bank_name,
        } => payments::pay(signed_in()?, &id, amount, mode, cheque_number, bank_name).await,
        Command::Payments { invoice } => payments::list(signed_in()?, invoice.as_deref()).await,
        Command::Analytics => analytics::show(signed_in()?).await,

        Command::Employees { search } => employees::list(signed_in()?, search.as_deref()).await,
        Command::AddEmployee {
            name,
            email,
            password,
        } => employees::add(signed_in()?, &name, &email, password).await,
        Command::RemoveEmployee { id } => employees::remove(signed_in()?, &id).await,
    }
}
