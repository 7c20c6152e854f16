//! # Validation Module
//!
//! Form, KYC and payment rules for the billing console.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console input (clap, TOML draft)                             │
//! │  ├── Type parsing (amounts, payment modes, companies)                  │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Invoice form checks (customer, items, charges, GST, advance)      │
//! │  ├── KYC corrections (phone, PAN)                                      │
//! │  └── Payment Validator (amount vs remaining, cheque details)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── Authoritative totals and persistence                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check returns the first failure it finds, with a message fit to
//! show the operator unchanged.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Charges, Customer, GstRate, LineItem, PaymentInstrument};
use crate::{CHEQUE_NUMBER_DIGITS, GSTIN_MAX_LENGTH, MAX_GST_PERCENT, PAN_LENGTH, PHONE_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Payment Validator
// =============================================================================

/// Checks a proposed payment against what the invoice still owes.
///
/// ## Rules
/// - Amount must be strictly positive
/// - Amount must not exceed the remaining balance
/// - Cheque payments need a 6-digit cheque number and a bank name
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  billing pay <invoice> --amount 25000 --mode cheque ...                 │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_payment(amount, remaining, instrument) ← THIS FUNCTION        │
/// │       │                                                                 │
/// │       ├── amount <= 0?          → "Payment amount must be greater..."   │
/// │       ├── amount > remaining?   → "Payment of ₹.. exceeds the ..."      │
/// │       ├── cheque, not 6 digits? → "Cheque number must be exactly 6..."  │
/// │       ├── cheque, no bank?      → "Bank name is required"               │
/// │       │                                                                 │
/// │       └── OK → PUT /invoices/update/{id}                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ```rust
/// use billing_core::money::Money;
/// use billing_core::types::{PaymentInstrument, PaymentMode};
/// use billing_core::validation::validate_payment;
///
/// let remaining = Money::from_rupees(701);
/// let cash = PaymentInstrument::plain(PaymentMode::Cash);
///
/// assert!(validate_payment(Money::from_rupees(701), remaining, &cash).is_ok());
/// assert!(validate_payment(Money::from_rupees(702), remaining, &cash).is_err());
/// assert!(validate_payment(Money::zero(), remaining, &cash).is_err());
/// ```
pub fn validate_payment(
    amount: Money,
    remaining: Money,
    instrument: &PaymentInstrument,
) -> CoreResult<()> {
    if !amount.is_positive() {
        return Err(CoreError::NonPositivePayment);
    }

    if amount > remaining {
        return Err(CoreError::PaymentExceedsRemaining { amount, remaining });
    }

    validate_instrument(instrument)?;

    Ok(())
}

/// Applies the mode-specific rules of a payment instrument.
pub fn validate_instrument(instrument: &PaymentInstrument) -> ValidationResult<()> {
    if instrument.mode.requires_cheque_details() {
        validate_cheque(
            instrument.cheque_number.as_deref(),
            instrument.bank_name.as_deref(),
        )?;
    }
    Ok(())
}

/// Validates cheque details.
///
/// ## Rules
/// - Cheque number is exactly 6 ASCII digits
/// - Bank name is non-empty after trimming
pub fn validate_cheque(cheque_number: Option<&str>, bank_name: Option<&str>) -> ValidationResult<()> {
    let number = cheque_number.map(str::trim).unwrap_or_default();
    if !is_digits(number, CHEQUE_NUMBER_DIGITS) {
        return Err(ValidationError::exact_digits("Cheque number", CHEQUE_NUMBER_DIGITS));
    }

    if bank_name.map(str::trim).unwrap_or_default().is_empty() {
        return Err(ValidationError::required("Bank name"));
    }

    Ok(())
}

// =============================================================================
// Customer & KYC
// =============================================================================

/// Uppercases a tax identifier and drops everything but letters and digits.
///
/// ```rust
/// use billing_core::validation::normalize_tax_id;
///
/// assert_eq!(normalize_tax_id(" abcde-1234 f "), "ABCDE1234F");
/// ```
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Validates a 10-digit mobile number.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::required("Phone number"));
    }
    if !is_digits(phone, PHONE_DIGITS) {
        return Err(ValidationError::exact_digits("Phone number", PHONE_DIGITS));
    }
    Ok(())
}

/// Validates a PAN: exactly 10 uppercase letters or digits.
pub fn validate_pan(pan: &str) -> ValidationResult<()> {
    let pan = pan.trim();
    if pan.is_empty() {
        return Err(ValidationError::required("PAN"));
    }
    if pan.chars().count() != PAN_LENGTH {
        return Err(ValidationError::exact_chars("PAN", PAN_LENGTH));
    }
    if !is_upper_alphanumeric(pan) {
        return Err(ValidationError::InvalidFormat {
            field: "PAN".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }
    Ok(())
}

/// Validates an optional GSTIN. Blank means "not registered" and passes.
pub fn validate_gstin(gstin: Option<&str>) -> ValidationResult<()> {
    let Some(gstin) = gstin.map(str::trim).filter(|g| !g.is_empty()) else {
        return Ok(());
    };

    if gstin.chars().count() > GSTIN_MAX_LENGTH {
        return Err(ValidationError::TooLong {
            field: "GSTIN".to_string(),
            max: GSTIN_MAX_LENGTH,
        });
    }
    if !is_upper_alphanumeric(gstin) {
        return Err(ValidationError::InvalidFormat {
            field: "GSTIN".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }
    Ok(())
}

/// Validates the customer block of the invoice form.
///
/// Mandatory fields are checked first, in form order, before any format check.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    for (field, value) in [
        ("Customer name", &customer.name),
        ("Phone number", &customer.phone),
        ("Address", &customer.address),
        ("PAN", &customer.pan),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::required(field));
        }
    }

    validate_phone(&customer.phone)?;
    validate_pan(&customer.pan)?;
    validate_gstin(customer.gstin.as_deref())?;

    Ok(())
}

/// Validates a KYC correction. At least one of phone or PAN must be given.
pub fn validate_kyc_update(phone: Option<&str>, pan: Option<&str>) -> ValidationResult<()> {
    if phone.is_none() && pan.is_none() {
        return Err(ValidationError::required("Phone number or PAN"));
    }
    if let Some(phone) = phone {
        validate_phone(phone)?;
    }
    if let Some(pan) = pan {
        validate_pan(pan)?;
    }
    Ok(())
}

// =============================================================================
// Items, Charges, GST, Advance
// =============================================================================

/// At least one item, and every item complete.
///
/// ```rust
/// use billing_core::types::LineItem;
/// use billing_core::validation::validate_items;
///
/// let blank = LineItem::default();
/// let err = validate_items(&[blank]).unwrap_err();
/// assert_eq!(err.to_string(), "Invoice item 1 is incomplete");
/// ```
pub fn validate_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::NoItems);
    }

    match items.iter().position(|item| !item.is_complete()) {
        Some(index) => Err(ValidationError::IncompleteItem { position: index + 1 }),
        None => Ok(()),
    }
}

/// Flat charges may be zero but never negative.
pub fn validate_charges(charges: &Charges) -> ValidationResult<()> {
    for (field, value) in [
        ("Parking", charges.parking),
        ("Amenities", charges.amenities),
        ("Other charges", charges.other_charges),
    ] {
        if value.is_negative() {
            return Err(ValidationError::Negative {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

/// GST between 0% and 100%.
pub fn validate_gst_rate(rate: GstRate) -> ValidationResult<()> {
    if rate.bps() > MAX_GST_PERCENT * 100 {
        return Err(ValidationError::OutOfRange {
            field: "GST percentage".to_string(),
            min: 0,
            max: MAX_GST_PERCENT as i64,
        });
    }
    Ok(())
}

/// The advance is non-negative and no larger than the invoice total.
pub fn validate_advance(advance: Money, total: Money) -> CoreResult<()> {
    if advance.is_negative() {
        return Err(ValidationError::Negative {
            field: "Advance".to_string(),
        }
        .into());
    }
    if advance > total {
        return Err(CoreError::AdvanceExceedsTotal { advance, total });
    }
    Ok(())
}

// =============================================================================
// Employees
// =============================================================================

/// A new staff account needs a name, an email and a password.
pub fn validate_new_employee(name: &str, email: &str, password: &str) -> ValidationResult<()> {
    for (field, value) in [("Name", name.trim()), ("Email", email.trim()), ("Password", password)] {
        if value.is_empty() {
            return Err(ValidationError::required(field));
        }
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_upper_alphanumeric(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMode;

    fn customer() -> Customer {
        Customer {
            name: "Asha Kulkarni".to_string(),
            phone: "9876543210".to_string(),
            address: "Baner, Pune".to_string(),
            pan: "ABCDE1234F".to_string(),
            gstin: None,
        }
    }

    fn complete_item() -> LineItem {
        LineItem {
            description: "Flat 402".to_string(),
            project_name: "Sora Heights".to_string(),
            hsn_code: "9954".to_string(),
            rate: Money::from_rupees(4_500),
            area_sq_ft: 1_000.0,
        }
    }

    #[test]
    fn test_validate_payment_amount_bounds() {
        let remaining = Money::from_rupees(701);
        let upi = PaymentInstrument::plain(PaymentMode::Upi);

        assert_eq!(
            validate_payment(Money::zero(), remaining, &upi),
            Err(CoreError::NonPositivePayment)
        );
        assert_eq!(
            validate_payment(Money::from_rupees(-5), remaining, &upi),
            Err(CoreError::NonPositivePayment)
        );
        assert!(matches!(
            validate_payment(Money::from_paise(70101), remaining, &upi),
            Err(CoreError::PaymentExceedsRemaining { .. })
        ));
        assert!(validate_payment(Money::from_paise(1), remaining, &upi).is_ok());
        assert!(validate_payment(remaining, remaining, &upi).is_ok());
    }

    #[test]
    fn test_validate_payment_on_settled_invoice() {
        let cash = PaymentInstrument::plain(PaymentMode::Cash);
        assert!(validate_payment(Money::from_rupees(1), Money::zero(), &cash).is_err());
    }

    #[test]
    fn test_validate_payment_cheque_rules() {
        let remaining = Money::from_rupees(10_000);
        let amount = Money::from_rupees(5_000);

        let ok = PaymentInstrument::cheque("123456", "State Bank of India");
        assert!(validate_payment(amount, remaining, &ok).is_ok());

        for bad_number in ["12345", "1234567", "12a456", "", "１２３４５６"] {
            let instrument = PaymentInstrument::cheque(bad_number, "SBI");
            let err = validate_payment(amount, remaining, &instrument).unwrap_err();
            assert_eq!(err.to_string(), "Cheque number must be exactly 6 digits", "{bad_number:?}");
        }

        let no_bank = PaymentInstrument::cheque("123456", "   ");
        let err = validate_payment(amount, remaining, &no_bank).unwrap_err();
        assert_eq!(err.to_string(), "Bank name is required");

        let missing = PaymentInstrument::new(PaymentMode::Cheque, None, None);
        assert!(validate_instrument(&missing).is_err());
    }

    #[test]
    fn test_non_cheque_modes_ignore_cheque_fields() {
        let instrument = PaymentInstrument {
            mode: PaymentMode::BankTransfer,
            cheque_number: Some("bad".to_string()),
            bank_name: None,
        };
        assert!(validate_instrument(&instrument).is_ok());
    }

    #[test]
    fn test_validate_customer() {
        assert!(validate_customer(&customer()).is_ok());

        let mut c = customer();
        c.address = "  ".to_string();
        assert_eq!(validate_customer(&c), Err(ValidationError::required("Address")));

        let mut c = customer();
        c.phone = "98765".to_string();
        assert_eq!(
            validate_customer(&c).unwrap_err().to_string(),
            "Phone number must be exactly 10 digits"
        );

        let mut c = customer();
        c.pan = "abcde1234f".to_string();
        assert!(matches!(
            validate_customer(&c),
            Err(ValidationError::InvalidFormat { .. })
        ));

        let mut c = customer();
        c.pan = "ABCDE1234".to_string();
        assert_eq!(
            validate_customer(&c).unwrap_err().to_string(),
            "PAN must be exactly 10 characters"
        );
    }

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin(None).is_ok());
        assert!(validate_gstin(Some("")).is_ok());
        assert!(validate_gstin(Some("27ABCDE1234F1Z5")).is_ok());
        assert!(validate_gstin(Some("27ABCDE1234F1Z55")).is_err());
        assert!(validate_gstin(Some("27abcde1234f1z5")).is_err());
    }

    #[test]
    fn test_normalize_tax_id_then_validate() {
        let pan = normalize_tax_id("abcde 1234 f");
        assert_eq!(pan, "ABCDE1234F");
        assert!(validate_pan(&pan).is_ok());
    }

    #[test]
    fn test_validate_kyc_update() {
        assert!(validate_kyc_update(None, None).is_err());
        assert!(validate_kyc_update(Some("9876543210"), None).is_ok());
        assert!(validate_kyc_update(None, Some("ABCDE1234F")).is_ok());
        assert!(validate_kyc_update(Some("98765432101"), Some("ABCDE1234F")).is_err());
    }

    #[test]
    fn test_validate_items() {
        assert_eq!(validate_items(&[]), Err(ValidationError::NoItems));
        assert!(validate_items(&[complete_item()]).is_ok());

        let mut zero_area = complete_item();
        zero_area.area_sq_ft = 0.0;
        assert_eq!(
            validate_items(&[complete_item(), zero_area]),
            Err(ValidationError::IncompleteItem { position: 2 })
        );

        let mut no_hsn = complete_item();
        no_hsn.hsn_code = " ".to_string();
        assert_eq!(
            validate_items(&[no_hsn]),
            Err(ValidationError::IncompleteItem { position: 1 })
        );
    }

    #[test]
    fn test_validate_charges_gst_and_advance() {
        assert!(validate_charges(&Charges::default()).is_ok());
        let charges = Charges {
            amenities: Money::from_rupees(-1),
            ..Default::default()
        };
        assert_eq!(
            validate_charges(&charges).unwrap_err().to_string(),
            "Amenities cannot be negative"
        );

        assert!(validate_gst_rate(GstRate::from_percentage(100.0)).is_ok());
        assert!(validate_gst_rate(GstRate::from_percentage(100.5)).is_err());

        let total = Money::from_rupees(1_000);
        assert!(validate_advance(total, total).is_ok());
        assert!(validate_advance(Money::zero(), total).is_ok());
        assert!(matches!(
            validate_advance(Money::from_paise(100001), total),
            Err(CoreError::AdvanceExceedsTotal { .. })
        ));
        assert!(validate_advance(Money::from_rupees(-1), total).is_err());
    }

    #[test]
    fn test_validate_new_employee() {
        assert!(validate_new_employee("Ravi", "ravi@example.com", "secret").is_ok());
        assert_eq!(
            validate_new_employee("Ravi", " ", "secret"),
            Err(ValidationError::required("Email"))
        );
        assert!(validate_new_employee("", "ravi@example.com", "secret").is_err());
        assert!(validate_new_employee("Ravi", "ravi@example.com", "").is_err());
    }
}
