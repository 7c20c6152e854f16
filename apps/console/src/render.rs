//! # Rendering
//!
//! Turns invoices, payments, staff and analytics into `comfy-table` tables.
//! Nothing here talks to the network.

use billing_core::totals::{TotalsMismatch, SUB_PAISE_PER_PAISA};
use billing_core::{
    peak_revenue, AnalyticsSnapshot, DailyRevenue, Invoice, InvoiceTotals, LineItem, Money,
    Payment, PaymentInstrument, User,
};
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Width of the bars in the revenue chart.
pub const BAR_WIDTH: usize = 30;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

fn amount(value: Money) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn remaining(value: Money) -> Cell {
    if value.is_positive() {
        amount(value).fg(Color::Red)
    } else {
        Cell::new("Settled").fg(Color::Green)
    }
}

pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y").to_string()
}

/// Mode plus cheque details when present, e.g. `Cheque 123456 (SBI)`.
pub fn describe_instrument(
    mode: impl std::fmt::Display,
    cheque_number: Option<&str>,
    bank_name: Option<&str>,
) -> String {
    match (cheque_number, bank_name) {
        (Some(number), Some(bank)) => format!("{mode} {number} ({bank})"),
        (Some(number), None) => format!("{mode} {number}"),
        _ => mode.to_string(),
    }
}

fn instrument(payment: &PaymentInstrument) -> String {
    describe_instrument(
        payment.mode,
        payment.cheque_number.as_deref(),
        payment.bank_name.as_deref(),
    )
}

// =============================================================================
// Invoices
// =============================================================================

pub fn invoice_list(invoices: &[&Invoice]) -> Table {
    let mut table = new_table(&[
        "Invoice", "Date", "Company", "Customer", "Total", "Paid", "Remaining", "Executive",
    ]);
    for invoice in invoices {
        table.add_row(vec![
            Cell::new(&invoice.id),
            Cell::new(format_date(invoice.created_at)),
            Cell::new(&invoice.company.name),
            Cell::new(&invoice.customer.name),
            amount(invoice.total_amount),
            amount(invoice.amount_paid()),
            remaining(invoice.remaining_amount),
            Cell::new(&invoice.executive_name),
        ]);
    }
    table
}

pub fn items_table(items: &[LineItem]) -> Table {
    let mut table = new_table(&["#", "Description", "Project", "HSN", "Rate", "Area (sq ft)", "Amount"]);
    for (index, item) in items.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&item.description),
            Cell::new(&item.project_name),
            Cell::new(&item.hsn_code),
            amount(item.rate),
            Cell::new(item.area_sq_ft).set_alignment(CellAlignment::Right),
            amount(item.line_total()),
        ]);
    }
    table
}

/// Totals block shared by `show` and `quote`.
pub fn totals_table(totals: &InvoiceTotals, advance: Money, remaining_amount: Money) -> Table {
    let mut table = new_table(&["", "Amount"]);
    table
        .add_row(vec![Cell::new("Items total"), amount(totals.items_total)])
        .add_row(vec![Cell::new("Charges"), amount(totals.extra_charges)])
        .add_row(vec![Cell::new("Sub-total"), amount(totals.sub_total)])
        .add_row(vec![
            Cell::new(format!("GST @ {}", totals.gst_rate)),
            amount(totals.gst_amount),
        ])
        .add_row(vec![
            Cell::new("Total").add_attribute(Attribute::Bold),
            amount(totals.total_amount).add_attribute(Attribute::Bold),
        ])
        .add_row(vec![Cell::new("Paid"), amount(advance)])
        .add_row(vec![Cell::new("Remaining"), remaining(remaining_amount)]);
    table
}

/// Full invoice view: parties, line items, totals and any disagreement
/// between the stored totals and a local recomputation.
pub fn invoice_detail(invoice: &Invoice, mismatches: &[TotalsMismatch]) -> String {
    let customer = &invoice.customer;
    let mut out = format!(
        "Invoice {}  ({})\n{}\n\nCustomer: {}\nPhone:    {}\nAddress:  {}\nPAN:      {}\n",
        invoice.id,
        format_date(invoice.created_at),
        invoice.company.name,
        customer.name,
        customer.phone,
        customer.address,
        customer.pan,
    );
    if let Some(gstin) = &customer.gstin {
        out.push_str(&format!("GSTIN:    {gstin}\n"));
    }
    if !invoice.executive_name.is_empty() {
        out.push_str(&format!("Issued by {}\n", invoice.executive_name));
    }
    out.push_str(&format!("Payment:  {}\n\n", instrument(&invoice.payment)));

    out.push_str(&items_table(&invoice.items).to_string());
    out.push('\n');

    let totals = InvoiceTotals {
        items_total: invoice.items_total,
        extra_charges: invoice.charges.total(),
        sub_total: invoice.sub_total,
        exact_sub_total: invoice.sub_total.paise() as i128 * SUB_PAISE_PER_PAISA,
        gst_rate: invoice.gst.percentage,
        gst_amount: invoice.gst.amount,
        total_amount: invoice.total_amount,
    };
    out.push_str(&totals_table(&totals, invoice.amount_paid(), invoice.remaining_amount).to_string());

    for mismatch in mismatches {
        out.push_str(&format!(
            "\nwarning: {} is {} but the line items give {}",
            mismatch.field, mismatch.recorded, mismatch.computed
        ));
    }
    out
}

/// One row per stored version of an invoice.
pub fn history_table(versions: &[Invoice]) -> Table {
    let mut table = new_table(&["Version", "Date", "Phone", "PAN", "Total", "Remaining"]);
    for (index, version) in versions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(format_date(version.created_at)),
            Cell::new(&version.customer.phone),
            Cell::new(&version.customer.pan),
            amount(version.total_amount),
            remaining(version.remaining_amount),
        ]);
    }
    table
}

// =============================================================================
// Payments
// =============================================================================

pub fn payments_table(payments: &[Payment]) -> Table {
    let mut table = new_table(&["Payment", "Invoice", "Customer", "Amount", "Mode", "Date"]);
    for payment in payments {
        table.add_row(vec![
            Cell::new(&payment.id),
            Cell::new(&payment.invoice_id),
            Cell::new(&payment.customer_name),
            amount(payment.amount),
            Cell::new(describe_instrument(
                payment.payment_mode,
                payment.cheque_number.as_deref(),
                payment.bank_name.as_deref(),
            )),
            Cell::new(format_date(payment.created_at)),
        ]);
    }
    table
}

/// Sum of the listed payments.
pub fn payments_total(payments: &[Payment]) -> Money {
    payments.iter().map(|p| p.amount).sum()
}

// =============================================================================
// Staff
// =============================================================================

pub fn employees_table(users: &[&User]) -> Table {
    let mut table = new_table(&["Id", "Name", "Email", "Role"]);
    for user in users {
        table.add_row(vec![
            Cell::new(&user.id),
            Cell::new(user.display_name()),
            Cell::new(&user.email),
            Cell::new(user.role),
        ]);
    }
    table
}

// =============================================================================
// Analytics
// =============================================================================

pub fn analytics_table(snapshot: &AnalyticsSnapshot) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    table
        .add_row(vec![
            Cell::new("Invoices"),
            Cell::new(snapshot.total_invoices).set_alignment(CellAlignment::Right),
        ])
        .add_row(vec![Cell::new("Billed"), amount(snapshot.total_billed())])
        .add_row(vec![Cell::new("Collected"), amount(snapshot.total_paid).fg(Color::Green)])
        .add_row(vec![Cell::new("Outstanding"), amount(snapshot.total_due).fg(Color::Red)]);
    table
}

/// A bar scaled against the series peak. Non-zero amounts always get at
/// least one block.
pub fn revenue_bar(value: Money, peak: Money, width: usize) -> String {
    if !value.is_positive() || !peak.is_positive() {
        return String::new();
    }
    let scaled = (value.paise() as f64 / peak.paise() as f64 * width as f64).round() as usize;
    "█".repeat(scaled.clamp(1, width))
}

pub fn revenue_table(series: &[DailyRevenue]) -> Table {
    let peak = peak_revenue(series);
    let mut table = new_table(&["Day", "Collected", ""]);
    for day in series {
        table.add_row(vec![
            Cell::new(day.label()),
            amount(day.price),
            Cell::new(revenue_bar(day.price, peak, BAR_WIDTH)).fg(Color::Cyan),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::{
        Charges, CompanyProfile, Customer, GstDetails, GstRate, PaymentMode, Role,
    };
    use chrono::TimeZone;

    // Keeps rows on one line whatever the terminal width.
    fn wide(mut table: Table) -> String {
        table.set_width(400);
        table.to_string()
    }

    fn invoice(id: &str, remaining: i64) -> Invoice {
        let items = vec![LineItem {
            description: "Flat 402".to_string(),
            project_name: "Sora Heights".to_string(),
            hsn_code: "9954".to_string(),
            rate: Money::from_rupees(4_500),
            area_sq_ft: 1_000.0,
        }];
        let charges = Charges {
            parking: Money::from_rupees(1_00_000),
            amenities: Money::from_rupees(50_000),
            other_charges: Money::zero(),
        };
        Invoice {
            id: id.to_string(),
            company: CompanyProfile {
                name: "Sora Realtor".to_string(),
                ..Default::default()
            },
            customer: Customer {
                name: "Asha Kulkarni".to_string(),
                phone: "9876543210".to_string(),
                address: "Baner, Pune".to_string(),
                pan: "ABCDE1234F".to_string(),
                gstin: Some("27ABCDE1234F1Z5".to_string()),
            },
            items,
            charges,
            gst: GstDetails {
                percentage: GstRate::from_bps(1800),
                amount: Money::from_rupees(8_37_000),
            },
            payment: PaymentInstrument::cheque("123456", "SBI"),
            items_total: Money::from_rupees(45_00_000),
            sub_total: Money::from_rupees(46_50_000),
            total_amount: Money::from_rupees(54_87_000),
            advance: Money::from_rupees(5_00_000),
            remaining_amount: Money::from_rupees(remaining),
            created_at: Utc.with_ymd_and_hms(2024, 12, 14, 10, 23, 0).unwrap(),
            executive_name: "Ravi".to_string(),
        }
    }

    #[test]
    fn test_revenue_bar() {
        let peak = Money::from_rupees(1_000);
        assert_eq!(revenue_bar(peak, peak, 10), "█".repeat(10));
        assert_eq!(revenue_bar(Money::from_rupees(500), peak, 10), "█".repeat(5));
        assert_eq!(revenue_bar(Money::from_rupees(1), peak, 10), "█");
        assert_eq!(revenue_bar(Money::zero(), peak, 10), "");
        assert_eq!(revenue_bar(Money::from_rupees(5), Money::zero(), 10), "");
    }

    #[test]
    fn test_describe_instrument() {
        assert_eq!(
            describe_instrument(PaymentMode::Cheque, Some("123456"), Some("SBI")),
            "Cheque 123456 (SBI)"
        );
        assert_eq!(describe_instrument(PaymentMode::Upi, None, None), "UPI");
    }

    #[test]
    fn test_invoice_list_marks_settled() {
        let open = invoice("inv-open", 49_87_000);
        let paid = invoice("inv-paid", 0);
        let rendered = wide(invoice_list(&[&open, &paid]));

        assert!(rendered.contains("inv-open"));
        assert!(rendered.contains("₹49,87,000.00"));
        assert!(rendered.contains("Settled"));
        assert!(rendered.contains("14 Dec 2024"));
    }

    #[test]
    fn test_invoice_detail_includes_totals_and_warnings() {
        let invoice = invoice("inv-1", 49_87_000);
        let rendered = invoice_detail(&invoice, &[]);
        assert!(rendered.contains("GSTIN:    27ABCDE1234F1Z5"));
        assert!(rendered.contains("Cheque 123456 (SBI)"));
        assert!(rendered.contains("GST @ 18%"));
        assert!(rendered.contains("₹54,87,000.00"));
        assert!(!rendered.contains("warning"));

        let mismatch = TotalsMismatch {
            field: "totalAmount",
            recorded: Money::from_rupees(54_87_000),
            computed: Money::from_rupees(54_86_000),
        };
        let rendered = invoice_detail(&invoice, &[mismatch]);
        assert!(rendered.contains("warning: totalAmount is ₹54,87,000.00"));
    }

    #[test]
    fn test_employees_and_analytics() {
        let user = User {
            id: "u-1".to_string(),
            email: "ravi@example.com".to_string(),
            role: Role::User,
            name: None,
        };
        let rendered = wide(employees_table(&[&user]));
        assert!(rendered.contains("ravi@example.com"));
        assert!(rendered.contains("user"));

        let snapshot = AnalyticsSnapshot {
            total_invoices: 3,
            total_paid: Money::from_rupees(6_00_000),
            total_due: Money::from_rupees(48_87_000),
        };
        let rendered = wide(analytics_table(&snapshot));
        assert!(rendered.contains("₹54,87,000.00"));
    }
}
