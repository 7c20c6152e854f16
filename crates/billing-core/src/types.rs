//! # Domain Types
//!
//! Core domain types shared by the console and the REST client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │    Payment      │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  company        │   │  invoice_id     │   │  email          │       │
//! │  │  customer       │   │  amount         │   │  role           │       │
//! │  │  items[]        │   │  mode           │   │  name           │       │
//! │  │  charges, gst   │   │  cheque/bank    │   └─────────────────┘       │
//! │  │  totals         │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    GstRate      │   │  PaymentMode    │   │    Company      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Bank Transfer  │   │  Airde Real Est.│       │
//! │  │  1800 = 18%     │   │  Cheque, UPI .. │   │  Unique Realcon │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Field names follow the backend's JSON (`camelCase`, `_id`, `PAN`,
//! `GSTIN`, `hashingCode` for the HSN code). Rust names describe the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// GST Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 1800 bps = 18% (the standard rate for
/// under-construction property), 1250 bps = 12.5%.
///
/// On the wire the rate is the plain percentage number (`18`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GstRate(u32);

/// The rate a fresh invoice form starts with.
pub const DEFAULT_GST_BPS: u32 = 1800;

impl GstRate {
    /// Creates a GST rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        GstRate(bps)
    }

    /// Creates a GST rate from a percentage. Negative or non-finite input maps to zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return GstRate(0);
        }
        GstRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero GST.
    #[inline]
    pub const fn zero() -> Self {
        GstRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate(DEFAULT_GST_BPS)
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

impl Serialize for GstRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u32(self.0 / 100)
        } else {
            serializer.serialize_f64(self.percentage())
        }
    }
}

/// Rates above 100% still parse so the form can report them; negative rates
/// have no basis-point form and are refused here.
impl<'de> Deserialize<'de> for GstRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        if !pct.is_finite() || pct < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "GST percentage must be between 0 and 100, got {pct}"
            )));
        }
        Ok(GstRate::from_percentage(pct))
    }
}

// =============================================================================
// Company
// =============================================================================

/// The group company an invoice is issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "Airde Real Estate")]
    AirdeRealEstate,
    #[serde(rename = "Airde Developers")]
    AirdeDevelopers,
    #[serde(rename = "Sora Realtor")]
    SoraRealtor,
    #[default]
    #[serde(rename = "Unique Realcon")]
    UniqueRealcon,
}

impl Company {
    pub const ALL: [Company; 4] = [
        Company::AirdeRealEstate,
        Company::AirdeDevelopers,
        Company::SoraRealtor,
        Company::UniqueRealcon,
    ];

    /// The registered name, as printed on the invoice.
    pub fn name(&self) -> &'static str {
        match self {
            Company::AirdeRealEstate => "Airde Real Estate",
            Company::AirdeDevelopers => "Airde Developers",
            Company::SoraRealtor => "Sora Realtor",
            Company::UniqueRealcon => "Unique Realcon",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Company {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        Company::ALL
            .into_iter()
            .find(|c| {
                let name: String = c.name().chars().filter(|c| c.is_alphanumeric()).collect();
                name.to_lowercase() == wanted
            })
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "company".to_string(),
                allowed: Company::ALL.iter().map(|c| c.name().to_string()).collect(),
            })
    }
}

/// Issuing company details as the backend returns them on a stored invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

// =============================================================================
// Customer
// =============================================================================

/// Maps an absent or blank string to `None`.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// The buyer named on an invoice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    /// 10-digit mobile number.
    pub phone: String,
    pub address: String,
    /// Permanent Account Number.
    #[serde(rename = "PAN")]
    pub pan: String,
    #[serde(
        rename = "GSTIN",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub gstin: Option<String>,
}

// =============================================================================
// Line Items & Charges
// =============================================================================

/// One unit or plot on an invoice, billed by area.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub project_name: String,
    /// HSN classification code.
    #[serde(rename = "hashingCode")]
    pub hsn_code: String,
    /// Rate per square foot.
    pub rate: Money,
    pub area_sq_ft: f64,
}

impl LineItem {
    /// rate × area, rounded to the paisa.
    pub fn line_total(&self) -> Money {
        self.rate.multiply_area(self.area_sq_ft)
    }

    /// Returns true when every field the form requires has been filled in.
    pub fn is_complete(&self) -> bool {
        !self.description.trim().is_empty()
            && !self.project_name.trim().is_empty()
            && !self.hsn_code.trim().is_empty()
            && self.rate.is_positive()
            && self.area_sq_ft > 0.0
    }
}

/// Flat charges added on top of the itemised total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charges {
    #[serde(default)]
    pub parking: Money,
    #[serde(default)]
    pub amenities: Money,
    #[serde(default)]
    pub other_charges: Money,
}

impl Charges {
    /// parking + amenities + other charges.
    pub fn total(&self) -> Money {
        self.parking + self.amenities + self.other_charges
    }
}

/// GST as recorded on an invoice: the rate and the amount it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GstDetails {
    pub percentage: GstRate,
    pub amount: Money,
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMode {
    #[default]
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Cheque")]
    Cheque,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "Demand Draft")]
    DemandDraft,
    #[serde(rename = "Others")]
    Others,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 6] = [
        PaymentMode::BankTransfer,
        PaymentMode::Cheque,
        PaymentMode::Upi,
        PaymentMode::Cash,
        PaymentMode::DemandDraft,
        PaymentMode::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::BankTransfer => "Bank Transfer",
            PaymentMode::Cheque => "Cheque",
            PaymentMode::Upi => "UPI",
            PaymentMode::Cash => "Cash",
            PaymentMode::DemandDraft => "Demand Draft",
            PaymentMode::Others => "Others",
        }
    }

    /// Cheque payments carry a cheque number and bank name.
    #[inline]
    pub fn requires_cheque_details(&self) -> bool {
        matches!(self, PaymentMode::Cheque)
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "banktransfer" | "bank" | "neft" | "rtgs" | "imps" => Ok(PaymentMode::BankTransfer),
            "cheque" | "check" => Ok(PaymentMode::Cheque),
            "upi" => Ok(PaymentMode::Upi),
            "cash" => Ok(PaymentMode::Cash),
            "demanddraft" | "dd" => Ok(PaymentMode::DemandDraft),
            "others" | "other" => Ok(PaymentMode::Others),
            _ => Err(ValidationError::NotAllowed {
                field: "payment mode".to_string(),
                allowed: PaymentMode::ALL.iter().map(|m| m.label().to_string()).collect(),
            }),
        }
    }
}

/// A payment mode together with its mode-specific fields.
///
/// Only cheque payments keep `cheque_number` and `bank_name`; for every other
/// mode they are dropped so the backend never sees stale cheque details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
    pub mode: PaymentMode,
    #[serde(default)]
    pub cheque_number: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
}

impl PaymentInstrument {
    /// Builds an instrument, discarding cheque fields for non-cheque modes.
    pub fn new(mode: PaymentMode, cheque_number: Option<String>, bank_name: Option<String>) -> Self {
        if mode.requires_cheque_details() {
            PaymentInstrument {
                mode,
                cheque_number: cheque_number.map(|c| c.trim().to_string()),
                bank_name: bank_name.map(|b| b.trim().to_string()),
            }
        } else {
            PaymentInstrument::plain(mode)
        }
    }

    /// An instrument with no mode-specific fields.
    pub fn plain(mode: PaymentMode) -> Self {
        PaymentInstrument {
            mode,
            cheque_number: None,
            bank_name: None,
        }
    }

    pub fn cheque(cheque_number: impl Into<String>, bank_name: impl Into<String>) -> Self {
        PaymentInstrument::new(
            PaymentMode::Cheque,
            Some(cheque_number.into()),
            Some(bank_name.into()),
        )
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A stored invoice as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: CompanyProfile,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub charges: Charges,
    pub gst: GstDetails,
    pub payment: PaymentInstrument,
    pub items_total: Money,
    pub sub_total: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub advance: Money,
    pub remaining_amount: Money,
    pub created_at: DateTime<Utc>,
    /// Staff member who issued the invoice.
    #[serde(default)]
    pub executive_name: String,
}

impl Invoice {
    /// Amount received so far (total minus what is still outstanding).
    pub fn amount_paid(&self) -> Money {
        (self.total_amount - self.remaining_amount).floor_zero()
    }

    /// Returns true once nothing remains to be collected.
    pub fn is_settled(&self) -> bool {
        !self.remaining_amount.is_positive()
    }
}

/// Body of an invoice-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub company: Company,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub charges: Charges,
    pub gst: GstDetails,
    pub payment: PaymentInstrument,
    pub items_total: Money,
    pub sub_total: Money,
    pub total_amount: Money,
    pub advance: Money,
    pub remaining_amount: Money,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment recorded against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: String,
    pub invoice_id: String,
    pub amount: Money,
    #[serde(default)]
    pub customer_name: String,
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub cheque_number: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of a record-payment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Money,
    pub customer_name: String,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheque_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: Money, customer_name: impl Into<String>, instrument: PaymentInstrument) -> Self {
        let instrument = PaymentInstrument::new(
            instrument.mode,
            instrument.cheque_number,
            instrument.bank_name,
        );
        PaymentRequest {
            amount,
            customer_name: customer_name.into(),
            payment_mode: instrument.mode,
            cheque_number: instrument.cheque_number,
            bank_name: instrument.bank_name,
        }
    }
}

// =============================================================================
// Users
// =============================================================================

/// Staff role. Admins see every invoice, payments, analytics and staff
/// management; users see the invoices they issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Name for display, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

// =============================================================================
// Analytics
// =============================================================================

/// Headline revenue figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_invoices: u64,
    pub total_paid: Money,
    pub total_due: Money,
}

impl AnalyticsSnapshot {
    /// Everything invoiced: collected plus outstanding.
    pub fn total_billed(&self) -> Money {
        self.total_paid + self.total_due
    }
}

/// Payments collected on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub price: Money,
    pub day: String,
    pub month: String,
}

impl DailyRevenue {
    /// Chart label, e.g. "14 Dec".
    pub fn label(&self) -> String {
        format!("{} {}", self.day, self.month)
    }
}

/// Largest single-day amount, or zero for an empty series.
pub fn peak_revenue(series: &[DailyRevenue]) -> Money {
    series
        .iter()
        .map(|d| d.price)
        .max()
        .unwrap_or_default()
        .floor_zero()
}

// =============================================================================
// Unit Tests
// =============================================================================
