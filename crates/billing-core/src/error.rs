//! # Error Types
//!
//! Domain-specific error types for billing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billing-core errors (this file)                                       │
//! │  ├── CoreError        - Payment and invoice rule violations            │
//! │  └── ValidationError  - Form field failures                            │
//! │                                                                         │
//! │  billing-api errors (separate crate)                                   │
//! │  └── ApiError         - Network, auth and backend failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → console notification   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every message is fit to show the operator as-is
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Payment amount is zero or negative.
    #[error("Payment amount must be greater than zero")]
    NonPositivePayment,

    /// Payment would collect more than the invoice still owes.
    ///
    /// ## User Workflow
    /// ```text
    /// Record Payment (₹60,000)
    ///      │
    ///      ▼
    /// Check remaining: ₹50,000
    ///      │
    ///      ▼
    /// PaymentExceedsRemaining { amount: ₹60,000, remaining: ₹50,000 }
    ///      │
    ///      ▼
    /// Console shows: "Payment of ₹60,000.00 exceeds the remaining balance of ₹50,000.00"
    /// ```
    #[error("Payment of {amount} exceeds the remaining balance of {remaining}")]
    PaymentExceedsRemaining { amount: Money, remaining: Money },

    /// Advance recorded at creation exceeds the invoice total.
    #[error("Advance amount cannot exceed total amount ({total})")]
    AdvanceExceedsTotal { advance: Money, total: Money },

    /// The invoice has nothing left to collect.
    #[error("Invoice {invoice_id} is already fully paid")]
    AlreadySettled { invoice_id: String },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field must have an exact length.
    #[error("{field} must be exactly {len} {unit}")]
    ExactLength {
        field: String,
        len: usize,
        unit: String,
    },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// An invoice needs at least one line item.
    #[error("Please add at least one invoice item")]
    NoItems,

    /// A line item is missing a field (1-based position).
    #[error("Invoice item {position} is incomplete")]
    IncompleteItem { position: usize },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn exact_digits(field: &str, len: usize) -> Self {
        ValidationError::ExactLength {
            field: field.to_string(),
            len,
            unit: "digits".to_string(),
        }
    }

    pub(crate) fn exact_chars(field: &str, len: usize) -> Self {
        ValidationError::ExactLength {
            field: field.to_string(),
            len,
            unit: "characters".to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
