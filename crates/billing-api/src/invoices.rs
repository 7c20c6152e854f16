//! # Invoice Endpoints
//!
//! Creating invoices, listing them, recording payments, KYC corrections,
//! PDFs and deletion.
//!
//! ## Role Visibility
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   operation            user             admin                           │
//! │   ─────────────────    ──────────────   ──────────────                  │
//! │   create               ✔                ✔                               │
//! │   list                 own invoices     every invoice                   │
//! │   history / pdf        ✔                ✔                               │
//! │   record payment       ✔                ✔                               │
//! │   KYC correction       ✔                ✔                               │
//! │   delete               ✘ (Forbidden)    ✔                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::validation::{normalize_tax_id, validate_kyc_update, validate_payment};
use billing_core::{CoreError, Invoice, InvoiceDraft, Money, PaymentInstrument, PaymentRequest};
use reqwest::Method;
use tracing::{debug, info};

use crate::client::BillingClient;
use crate::error::{ApiError, ApiResult};
use crate::responses::{
    Acknowledgement, CreateInvoiceRequest, InvoiceListResponse, InvoiceResponse, PanUpdate,
    PhoneUpdate,
};

/// Which KYC fields were actually sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KycOutcome {
    pub phone_updated: bool,
    pub pan_updated: bool,
}

impl KycOutcome {
    pub fn changed_anything(&self) -> bool {
        self.phone_updated || self.pan_updated
    }
}

impl BillingClient {
    /// Validates the draft locally, then creates the invoice.
    pub async fn create_invoice(&self, draft: InvoiceDraft) -> ApiResult<Invoice> {
        self.current_session()?;
        let payload = draft.into_payload()?;

        debug!(
            company = %payload.company,
            items = payload.items.len(),
            total = %payload.total_amount,
            "Creating invoice"
        );

        let request = self
            .authed(Method::POST, &["invoices", "create"])?
            .json(&CreateInvoiceRequest { data: &payload });
        let response: InvoiceResponse = self.send_json(request).await?;

        info!(invoice_id = %response.invoice.id, message = %response.message, "Invoice created");
        Ok(response.invoice)
    }

    /// Every invoice (admin only).
    pub async fn list_invoices(&self) -> ApiResult<Vec<Invoice>> {
        self.require_admin("view all invoices")?;
        let request = self.authed(Method::GET, &["invoices"])?;
        let response: InvoiceListResponse = self.send_json(request).await?;
        Ok(response.invoices)
    }

    /// Invoices issued by the signed-in staff member.
    pub async fn my_invoices(&self) -> ApiResult<Vec<Invoice>> {
        let request = self.authed(Method::GET, &["invoices", "user"])?;
        let response: InvoiceListResponse = self.send_json(request).await?;
        Ok(response.invoices)
    }

    /// Every invoice for admins, own invoices otherwise.
    pub async fn visible_invoices(&self) -> ApiResult<Vec<Invoice>> {
        if self.current_session()?.is_admin() {
            self.list_invoices().await
        } else {
            self.my_invoices().await
        }
    }

    /// Looks an invoice up by id among the invoices this session can see.
    pub async fn find_invoice(&self, id: &str) -> ApiResult<Invoice> {
        let id = id.trim();
        self.visible_invoices()
            .await?
            .into_iter()
            .find(|invoice| invoice.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Invoice {id} not found")))
    }

    /// Earlier versions of an invoice, oldest first as the backend orders them.
    pub async fn invoice_history(&self, id: &str) -> ApiResult<Vec<Invoice>> {
        let request = self.authed(Method::GET, &["invoices", "history", id.trim()])?;
        let response: InvoiceListResponse = self.send_json(request).await?;
        Ok(response.invoices)
    }

    /// Records a payment after running the Payment Validator against the
    /// invoice's remaining balance. Returns the updated invoice.
    pub async fn record_payment(
        &self,
        invoice: &Invoice,
        amount: Money,
        instrument: PaymentInstrument,
    ) -> ApiResult<Invoice> {
        self.current_session()?;

        if invoice.is_settled() {
            return Err(CoreError::AlreadySettled {
                invoice_id: invoice.id.clone(),
            }
            .into());
        }
        validate_payment(amount, invoice.remaining_amount, &instrument)?;

        let body = PaymentRequest::new(amount, invoice.customer.name.clone(), instrument);
        let request = self
            .authed(Method::PUT, &["invoices", "update", &invoice.id])?
            .json(&body);
        let response: InvoiceResponse = self.send_json(request).await?;

        info!(
            invoice_id = %invoice.id,
            amount = %amount,
            mode = %body.payment_mode,
            remaining = %response.invoice.remaining_amount,
            "Payment recorded"
        );
        Ok(response.invoice)
    }

    /// Corrects the customer's phone and/or PAN, sending only fields that
    /// differ from what the invoice already has.
    pub async fn update_kyc(
        &self,
        invoice: &Invoice,
        phone: Option<&str>,
        pan: Option<&str>,
    ) -> ApiResult<KycOutcome> {
        self.current_session()?;

        let phone = phone.map(str::trim);
        let pan = pan.map(normalize_tax_id);
        validate_kyc_update(phone, pan.as_deref())?;

        let mut outcome = KycOutcome::default();

        if let Some(phone) = phone.filter(|p| *p != invoice.customer.phone) {
            let request = self
                .authed(Method::PUT, &["invoices", "update-phone", &invoice.id])?
                .json(&PhoneUpdate { phone });
            self.send(request).await?;
            outcome.phone_updated = true;
        }

        if let Some(pan) = pan.as_deref().filter(|p| *p != invoice.customer.pan) {
            let request = self
                .authed(Method::PUT, &["invoices", "update-pan", &invoice.id])?
                .json(&PanUpdate { pan });
            self.send(request).await?;
            outcome.pan_updated = true;
        }

        if outcome.changed_anything() {
            info!(invoice_id = %invoice.id, ?outcome, "KYC updated");
        } else {
            debug!(invoice_id = %invoice.id, "KYC unchanged, nothing sent");
        }
        Ok(outcome)
    }

    /// The rendered invoice document.
    pub async fn invoice_pdf(&self, id: &str) -> ApiResult<Vec<u8>> {
        let request = self.authed(Method::GET, &["invoices", "pdf", id.trim()])?;
        let bytes = self.send_bytes(request).await?;
        debug!(invoice_id = %id, size = bytes.len(), "PDF downloaded");
        Ok(bytes)
    }

    /// Deletes an invoice (admin only).
    pub async fn delete_invoice(&self, id: &str) -> ApiResult<Acknowledgement> {
        self.require_admin("delete invoices")?;
        let request = self.authed(Method::DELETE, &["invoices", id.trim()])?;
        let ack = self.send_ack(request, "Delete failed").await?;

        info!(invoice_id = %id, "Invoice deleted");
        Ok(ack)
    }
}
