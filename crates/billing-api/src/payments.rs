//! Payment ledger endpoints.

use billing_core::Payment;
use reqwest::Method;

use crate::client::BillingClient;
use crate::error::{ApiError, ApiResult};
use crate::responses::{LatestPaymentResponse, PaymentsResponse};

impl BillingClient {
    /// Every recorded payment (admin only).
    pub async fn list_payments(&self) -> ApiResult<Vec<Payment>> {
        self.require_admin("view payments")?;
        let request = self.authed(Method::GET, &["payments"])?;
        let response: PaymentsResponse = self.send_json(request).await?;
        Ok(response.payments)
    }

    /// The most recent payment on an invoice, if any.
    pub async fn latest_payment(&self, invoice_id: &str) -> ApiResult<Option<Payment>> {
        let request = self.authed(Method::GET, &["payments", invoice_id.trim()])?;
        match self.send_json::<LatestPaymentResponse>(request).await {
            Ok(response) => Ok(response.data),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
