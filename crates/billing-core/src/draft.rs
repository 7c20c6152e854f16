//! # Invoice Draft
//!
//! The invoice being composed, before it is sent to the backend.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   InvoiceDraft::default()        Unique Realcon, one blank item,        │
//! │          │                       18% GST, Bank Transfer                 │
//! │          ▼                                                              │
//! │   edit (add_item / remove_item / fields)                                │
//! │          │                                                              │
//! │          ├──► totals() / remaining_amount()     live preview            │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   into_payload()  ── normalize ── validate ── CreateInvoicePayload      │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   reset()                        back to the default state              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A draft deserializes from the same field names the backend uses, so the
//! console can read one straight from a TOML file.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::totals::InvoiceTotals;
use crate::types::{
    Charges, Company, CreateInvoicePayload, Customer, GstDetails, GstRate, LineItem,
    PaymentInstrument,
};
use crate::validation::{
    normalize_tax_id, validate_advance, validate_charges, validate_customer, validate_gst_rate,
    validate_instrument, validate_items,
};

/// Form state for a new invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDraft {
    pub company: Company,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub charges: Charges,
    #[serde(rename = "gstPercent")]
    pub gst_rate: GstRate,
    /// Amount received when the invoice is issued.
    pub advance: Money,
    pub payment: PaymentInstrument,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        InvoiceDraft {
            company: Company::default(),
            customer: Customer::default(),
            items: vec![LineItem::default()],
            charges: Charges::default(),
            gst_rate: GstRate::default(),
            advance: Money::zero(),
            payment: PaymentInstrument::default(),
        }
    }
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line item.
    pub fn add_item(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Removes the item at `index`, returning it. Out-of-range indexes are ignored.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Live totals for the current form state.
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(&self.items, &self.charges, self.gst_rate)
    }

    /// Balance left after the advance, rounded up to the rupee.
    pub fn remaining_amount(&self) -> Money {
        self.totals().remaining_after(self.advance)
    }

    /// Clears the form back to its starting state.
    pub fn reset(&mut self) {
        *self = InvoiceDraft::default();
    }

    /// Trims text fields and canonicalizes PAN and GSTIN.
    pub fn normalize(&mut self) {
        let customer = &mut self.customer;
        customer.name = customer.name.trim().to_string();
        customer.phone = customer.phone.trim().to_string();
        customer.address = customer.address.trim().to_string();
        customer.pan = normalize_tax_id(&customer.pan);
        customer.gstin = customer
            .gstin
            .as_deref()
            .map(normalize_tax_id)
            .filter(|g| !g.is_empty());

        for item in &mut self.items {
            item.description = item.description.trim().to_string();
            item.project_name = item.project_name.trim().to_string();
            item.hsn_code = item.hsn_code.trim().to_string();
        }

        let payment = std::mem::take(&mut self.payment);
        self.payment = PaymentInstrument::new(payment.mode, payment.cheque_number, payment.bank_name);
    }

    /// Runs every form check in the order the form presents them and
    /// returns the first failure.
    ///
    /// Order: customer, items, charges, GST, payment details, advance.
    pub fn validate(&self) -> CoreResult<()> {
        validate_customer(&self.customer)?;
        validate_items(&self.items)?;
        validate_charges(&self.charges)?;
        validate_gst_rate(self.gst_rate)?;
        validate_instrument(&self.payment)?;
        validate_advance(self.advance, self.totals().total_amount)?;
        Ok(())
    }

    /// Normalizes and validates the draft, then builds the creation request
    /// with its computed totals.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    /// use billing_core::types::{Customer, LineItem};
    /// use billing_core::InvoiceDraft;
    ///
    /// let mut draft = InvoiceDraft::default();
    /// draft.customer = Customer {
    ///     name: "Asha Kulkarni".into(),
    ///     phone: "9876543210".into(),
    ///     address: "Baner, Pune".into(),
    ///     pan: "abcde1234f".into(),
    ///     gstin: None,
    /// };
    /// draft.items[0] = LineItem {
    ///     description: "Flat 402".into(),
    ///     project_name: "Sora Heights".into(),
    ///     hsn_code: "9954".into(),
    ///     rate: Money::from_rupees(4_500),
    ///     area_sq_ft: 1_000.0,
    /// };
    ///
    /// let payload = draft.into_payload().unwrap();
    /// assert_eq!(payload.customer.pan, "ABCDE1234F");
    /// assert_eq!(payload.total_amount, Money::from_rupees(53_10_000));
    /// ```
    pub fn into_payload(mut self) -> CoreResult<CreateInvoicePayload> {
        self.normalize();
        self.validate()?;

        let totals = self.totals();
        let remaining_amount = totals.remaining_after(self.advance);

        Ok(CreateInvoicePayload {
            company: self.company,
            customer: self.customer,
            items: self.items,
            charges: self.charges,
            gst: GstDetails {
                percentage: self.gst_rate,
                amount: totals.gst_amount,
            },
            payment: self.payment,
            items_total: totals.items_total,
            sub_total: totals.sub_total,
            total_amount: totals.total_amount,
            advance: self.advance,
            remaining_amount,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
