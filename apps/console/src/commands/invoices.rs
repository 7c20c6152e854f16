//! # Invoice Commands
//!
//! Drafts are TOML files in the invoice form's shape:
//!
//! ```toml
//! company = "Sora Realtor"
//! gstPercent = 18
//! advance = 500000
//!
//! [customer]
//! name = "Asha Kulkarni"
//! phone = "9876543210"
//! address = "Baner, Pune"
//! PAN = "ABCDE1234F"
//!
//! [[items]]
//! description = "Flat 402"
//! projectName = "Sora Heights"
//! hashingCode = "9954"
//! rate = 4500
//! areaSqFt = 1000
//!
//! [charges]
//! parking = 100000
//!
//! [payment]
//! mode = "Cheque"
//! chequeNumber = "123456"
//! bankName = "SBI"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use billing_core::search::filter_invoices;
use billing_core::{InvoiceDraft, Money};
use tracing::debug;

use crate::context::Console;
use crate::render;

/// Stored totals may differ from a recomputation by rounding up to this much.
const TOTALS_TOLERANCE: Money = Money::from_rupees(1);

pub fn load_draft(path: &Path) -> Result<InvoiceDraft> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read draft {}", path.display()))?;
    let draft: InvoiceDraft = toml::from_str(&contents)
        .with_context(|| format!("{} is not a valid invoice draft", path.display()))?;
    debug!(path = %path.display(), items = draft.items.len(), "Draft loaded");
    Ok(draft)
}

/// Totals preview for a draft, followed by the first problem that would stop
/// it being created.
pub fn quote_text(draft: &InvoiceDraft) -> String {
    let mut draft = draft.clone();
    draft.normalize();

    let totals = draft.totals();
    let remaining = draft.remaining_amount();
    let mut out = format!("{}\n", draft.company);
    out.push_str(&render::items_table(&draft.items).to_string());
    out.push('\n');
    out.push_str(&render::totals_table(&totals, draft.advance, remaining).to_string());
    out.push('\n');

    match draft.validate() {
        Ok(()) => out.push_str("Draft is ready to create"),
        Err(err) => out.push_str(&format!("Not ready: {err}")),
    }
    out
}

pub fn quote(file: &Path) -> Result<()> {
    let draft = load_draft(file)?;
    println!("{}", quote_text(&draft));
    Ok(())
}

pub async fn list(console: Console, mine: bool, search: Option<&str>) -> Result<()> {
    let invoices = if mine {
        console.client.my_invoices().await?
    } else {
        console.client.visible_invoices().await?
    };

    let shown = filter_invoices(&invoices, search.unwrap_or_default());
    if shown.is_empty() {
        println!("No invoices found");
        return Ok(());
    }

    let outstanding: Money = shown
        .iter()
        .map(|invoice| invoice.remaining_amount.floor_zero())
        .sum();
    println!("{}", render::invoice_list(&shown));
    println!("{} invoice(s), {} outstanding", shown.len(), outstanding);
    Ok(())
}

pub async fn show(console: Console, id: &str) -> Result<()> {
    let invoice = console.client.find_invoice(id).await?;
    let mismatches = invoice.totals_mismatches(TOTALS_TOLERANCE);
    println!("{}", render::invoice_detail(&invoice, &mismatches));

    if let Some(payment) = console.client.latest_payment(&invoice.id).await? {
        println!(
            "\nLast payment: {} by {} on {}",
            payment.amount,
            render::describe_instrument(
                payment.payment_mode,
                payment.cheque_number.as_deref(),
                payment.bank_name.as_deref(),
            ),
            render::format_date(payment.created_at)
        );
    }
    Ok(())
}

pub async fn history(console: Console, id: &str) -> Result<()> {
    let versions = console.client.invoice_history(id).await?;
    if versions.is_empty() {
        println!("No history for invoice {id}");
    } else {
        println!("{}", render::history_table(&versions));
    }
    Ok(())
}

pub async fn create(console: Console, file: &Path) -> Result<()> {
    let draft = load_draft(file)?;
    let invoice = console.client.create_invoice(draft).await?;

    println!("Invoice created successfully");
    println!("Invoice:   {}", invoice.id);
    println!("Total:     {}", invoice.total_amount);
    println!("Remaining: {}", invoice.remaining_amount);
    Ok(())
}

pub async fn kyc(console: Console, id: &str, phone: Option<&str>, pan: Option<&str>) -> Result<()> {
    let invoice = console.client.find_invoice(id).await?;
    let outcome = console.client.update_kyc(&invoice, phone, pan).await?;

    if outcome.changed_anything() {
        println!("KYC updated successfully");
    } else {
        println!("Nothing to update: phone and PAN already match");
    }
    Ok(())
}

pub fn default_pdf_path(id: &str) -> PathBuf {
    let safe: String = id
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    PathBuf::from(format!("invoice-{safe}.pdf"))
}

pub async fn pdf(console: Console, id: &str, out: Option<PathBuf>) -> Result<()> {
    let bytes = console.client.invoice_pdf(id).await?;
    let path = out.unwrap_or_else(|| default_pdf_path(id));

    std::fs::write(&path, &bytes).with_context(|| format!("cannot write {}", path.display()))?;
    println!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

pub async fn delete(console: Console, id: &str, yes: bool) -> Result<()> {
    if !yes {
        bail!("Deleting invoice {id} cannot be undone; pass --yes to confirm");
    }
    console.client.delete_invoice(id).await?;
    println!("Invoice deleted successfully");
    Ok(())
}
