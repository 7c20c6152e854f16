//! # Command Line
//!
//! Argument definitions for the `billing` binary.
//!
//! ```text
//! billing login --email meera@example.com
//! billing invoices --search asha
//! billing pay 65f1c2 --amount 1,00,000 --mode cheque --cheque-number 123456 --bank-name SBI
//! billing kyc 65f1c2 --pan ABCDE1234F
//! billing quote --file draft.toml
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use billing_core::{Money, PaymentMode};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "billing", version, about = "Invoicing and billing console for real-estate sales")]
pub struct Cli {
    /// Config file (defaults to <config dir>/billing/console.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in and check the session with the backend
    Whoami,
    /// Show the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },

    /// List invoices (all for admins, own for staff)
    Invoices {
        /// Only invoices issued by me
        #[arg(long)]
        mine: bool,
        /// Filter by id, customer, company, executive or phone
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show one invoice with its totals
    Show { id: String },
    /// Show earlier versions of an invoice
    History { id: String },
    /// Create an invoice from a TOML draft
    Create {
        #[arg(long, short, value_name = "DRAFT")]
        file: PathBuf,
    },
    /// Preview the totals of a TOML draft without sending it
    Quote {
        #[arg(long, short, value_name = "DRAFT")]
        file: PathBuf,
    },
    /// Record a payment against an invoice
    Pay {
        id: String,
        /// Rupees, e.g. 150000 or 1,50,000.50
        #[arg(long, value_parser = parse_amount)]
        amount: Money,
        /// Bank Transfer, Cheque, UPI, Cash, Demand Draft or Others
        #[arg(long)]
        mode: PaymentMode,
        #[arg(long)]
        cheque_number: Option<String>,
        #[arg(long)]
        bank_name: Option<String>,
    },
    /// Correct the customer's phone and/or PAN
    Kyc {
        id: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        pan: Option<String>,
    },
    /// Download the invoice PDF
    Pdf {
        id: String,
        /// Defaults to invoice-<id>.pdf
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Delete an invoice (admin)
    Delete {
        id: String,
        /// Required; deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// List payments (admin), or the latest payment on one invoice
    Payments {
        #[arg(long)]
        invoice: Option<String>,
    },
    /// Revenue overview and the last 30 days of collections (admin)
    Analytics,

    /// List staff accounts (admin)
    Employees {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Create a staff account (admin)
    AddEmployee {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a staff account (admin)
    RemoveEmployee { id: String },
}

/// Parses a rupee amount, accepting `₹` and Indian digit grouping.
///
/// At most two decimal places: a payment is compared against the balance
/// as entered, so nothing is rounded here.
pub fn parse_amount(input: &str) -> Result<Money> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        bail!("amount is empty");
    }

    let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        bail!("'{input}' is not an amount");
    }
    if fraction.len() > 2 {
        bail!("'{input}' has more than two decimal places");
    }

    let rupees: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .with_context(|| format!("'{input}' is not an amount"))?
    };
    let paise: i64 = format!("{fraction:0<2}")
        .parse()
        .with_context(|| format!("'{input}' is not an amount"))?;

    rupees
        .checked_mul(100)
        .and_then(|p| p.checked_add(paise))
        .map(Money::from_paise)
        .with_context(|| format!("'{input}' is too large"))
}

/// Reads a password from stdin when it was not given on the command line.
pub fn password_or_stdin(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
