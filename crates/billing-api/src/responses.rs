//! Response envelopes and request bodies as the backend sends and expects them.

use billing_core::{AnalyticsSnapshot, CreateInvoicePayload, DailyRevenue, Invoice, Payment, Role, User};
use serde::{Deserialize, Serialize};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteUserRequest<'a> {
    pub email: &'a str,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateInvoiceRequest<'a> {
    pub data: &'a CreateInvoicePayload,
}

#[derive(Debug, Serialize)]
pub(crate) struct PhoneUpdate<'a> {
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PanUpdate<'a> {
    #[serde(rename = "PAN")]
    pub pan: &'a str,
}

// =============================================================================
// Responses
// =============================================================================

/// Body of a failed request; the backend puts a readable reason in `message`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateResponse {
    #[serde(default)]
    pub success: bool,
}

/// `{success?, message?}`, returned by most mutating endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Acknowledgement {
    /// The backend reports some refusals with HTTP 200 and `success: false`.
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceResponse {
    #[serde(default)]
    pub message: String,
    pub invoice: Invoice,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceListResponse {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentsResponse {
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatestPaymentResponse {
    #[serde(default)]
    pub data: Option<Payment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyticsResponse {
    pub analytics: AnalyticsSnapshot,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    pub analytics: SummaryBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryBody {
    #[serde(rename = "last30DaysPayments", default)]
    pub last_30_days_payments: Vec<DailyRevenue>,
}
