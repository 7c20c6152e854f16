//! # Payment Commands

use anyhow::Result;
use billing_core::{Money, PaymentInstrument, PaymentMode};

use crate::context::Console;
use crate::render;

pub async fn pay(
    console: Console,
    id: &str,
    amount: Money,
    mode: PaymentMode,
    cheque_number: Option<String>,
    bank_name: Option<String>,
) -> Result<()> {
    let invoice = console.client.find_invoice(id).await?;
    let instrument = PaymentInstrument::new(mode, cheque_number, bank_name);
    let updated = console.client.record_payment(&invoice, amount, instrument).await?;

    println!("Payment added successfully");
    if updated.is_settled() {
        println!("Invoice {} is fully paid", updated.id);
    } else {
        println!("Remaining: {}", updated.remaining_amount);
    }
    Ok(())
}

/// Every payment for admins, or the latest one on a single invoice.
pub async fn list(console: Console, invoice: Option<&str>) -> Result<()> {
    if let Some(invoice_id) = invoice {
        match console.client.latest_payment(invoice_id).await? {
            Some(payment) => println!("{}", render::payments_table(&[payment])),
            None => println!("No payments recorded for invoice {invoice_id}"),
        }
        return Ok(());
    }

    let payments = console.client.list_payments().await?;
    if payments.is_empty() {
        println!("No payments recorded");
        return Ok(());
    }

    println!("{}", render::payments_table(&payments));
    println!(
        "{} payment(s), {} collected",
        payments.len(),
        render::payments_total(&payments)
    );
    Ok(())
}
