//! # billing-core: Pure Invoice Logic for the Billing Console
//!
//! Everything the console decides on its own, before or after talking to the
//! backend: invoice totals, GST, the remaining balance, form and payment
//! validation, and local search. No I/O happens here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Billing Console Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/console (`billing` CLI)                 │   │
//! │  │    login ─► invoices ─► create / pay / kyc ─► pdf / analytics   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               billing-api (REST client, session, config)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billing-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  money  │ │ totals  │ │  draft  │ │validation│ │ search │  │   │
//! │  │   │  Money  │ │ GST     │ │ Invoice │ │  form &  │ │ filter │  │   │
//! │  │   │  ₹ fmt  │ │ balance │ │  Draft  │ │ payment  │ │        │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire and domain types (Invoice, Payment, User, ...)
//! - [`money`] - Money in paise, Indian-grouped rupee formatting
//! - [`totals`] - Items total, sub-total, GST, grand total, remaining balance
//! - [`draft`] - The invoice being composed before submission
//! - [`validation`] - Form, KYC and payment rules
//! - [`search`] - Case-insensitive list filtering
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use billing_core::money::Money;
//! use billing_core::types::GstRate;
//!
//! let sub_total = Money::from_rupees(46_50_000);
//! let gst = sub_total.calculate_gst(GstRate::default());
//!
//! assert_eq!(gst, Money::from_rupees(8_37_000));
//! assert_eq!((sub_total + gst).to_string(), "₹54,87,000.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod search;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::InvoiceDraft;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use totals::InvoiceTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Digits in an Indian mobile number.
pub const PHONE_DIGITS: usize = 10;

/// Characters in a PAN (e.g. `ABCDE1234F`).
pub const PAN_LENGTH: usize = 10;

/// Upper bound on GSTIN length; the field itself is optional.
pub const GSTIN_MAX_LENGTH: usize = 15;

/// Digits on an Indian cheque leaf.
pub const CHEQUE_NUMBER_DIGITS: usize = 6;

/// Highest GST percentage the invoice form accepts.
pub const MAX_GST_PERCENT: u32 = 100;
