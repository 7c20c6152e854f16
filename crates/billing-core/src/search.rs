//! # Search
//!
//! Local filtering for the invoice and employee lists.
//!
//! Text fields match case-insensitively; the phone number is matched as a
//! plain substring. An empty or whitespace-only query matches everything.

use crate::types::{Invoice, User};

/// Returns true when the invoice matches a free-text query.
///
/// Fields searched: invoice id, customer name, company name, issuing
/// executive, customer phone. The phone is compared as entered
/// (case-sensitive substring); the other fields ignore case.
pub fn invoice_matches(invoice: &Invoice, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    [
        invoice.id.as_str(),
        invoice.customer.name.as_str(),
        invoice.company.name.as_str(),
        invoice.executive_name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
        || invoice.customer.phone.contains(query)
}

/// Filters a list of invoices, keeping their order.
pub fn filter_invoices<'a>(invoices: &'a [Invoice], query: &str) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|invoice| invoice_matches(invoice, query))
        .collect()
}

/// Returns true when the employee's display name contains the query.
pub fn employee_matches(user: &User, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || user.display_name().to_lowercase().contains(&query.to_lowercase())
}

/// Filters a list of employees, keeping their order.
pub fn filter_employees<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    users.iter().filter(|user| employee_matches(user, query)).collect()
}
