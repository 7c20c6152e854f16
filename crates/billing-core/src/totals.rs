//! # Invoice Totals
//!
//! Derives every computed figure on an invoice from its inputs.
//!
//! ## Roll-up
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  items_total   = Σ (rate × area)            per line, rounded to paisa  │
//! │  extra_charges = parking + amenities + other                            │
//! │  sub_total     = items_total + extra_charges                            │
//! │  gst_amount    = sub_total × gst% / 100     rounded to paisa            │
//! │  total_amount  = sub_total + gst_amount                                 │
//! │                                                                         │
//! │  remaining     = ceil₹( max(sub + sub × gst% / 100 - advance, 0) )      │
//! │                  on the unrounded sub-total, rounded once              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The paisa-rounded figures are what an invoice shows. The remaining
//! balance is not derived from them: a fraction of a paisa dropped from a
//! line or from GST can be the fraction that makes the balance a whole rupee
//! higher. It is computed from [`InvoiceTotals::exact_sub_total`] in integer
//! math and rounded up exactly once.
//!
//! Inputs are not validated here. Zero or negative rates and areas are the
//! form's business (see [`crate::validation`]); the arithmetic is total.

use serde::{Deserialize, Serialize};

use crate::money::{Money, PAISE_PER_RUPEE};
use crate::types::{Charges, GstRate, Invoice, LineItem};

/// Resolution of [`InvoiceTotals::exact_sub_total`]: ten-thousandths of a paisa.
pub const SUB_PAISE_PER_PAISA: i128 = 10_000;

const BPS_SCALE: i128 = 10_000;

/// rate × area without rounding to the paisa.
fn exact_line_total(item: &LineItem) -> i128 {
    let fine = item.rate.paise() as f64 * item.area_sq_ft * SUB_PAISE_PER_PAISA as f64;
    if fine.is_finite() {
        fine.round() as i128
    } else {
        0
    }
}

/// Computed figures for one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub items_total: Money,
    pub extra_charges: Money,
    pub sub_total: Money,
    /// `sub_total` before any line was rounded, in [`SUB_PAISE_PER_PAISA`] units.
    #[serde(skip)]
    pub exact_sub_total: i128,
    pub gst_rate: GstRate,
    pub gst_amount: Money,
    pub total_amount: Money,
}

impl InvoiceTotals {
    /// Computes totals for a set of line items, flat charges and a GST rate.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    /// use billing_core::totals::InvoiceTotals;
    /// use billing_core::types::{Charges, GstRate, LineItem};
    ///
    /// let items = vec![LineItem {
    ///     description: "Flat 402".into(),
    ///     project_name: "Sora Heights".into(),
    ///     hsn_code: "9954".into(),
    ///     rate: Money::from_rupees(5_000),
    ///     area_sq_ft: 1_000.0,
    /// }];
    /// let charges = Charges { parking: Money::from_rupees(2_00_000), ..Default::default() };
    ///
    /// let totals = InvoiceTotals::compute(&items, &charges, GstRate::from_percentage(18.0));
    /// assert_eq!(totals.sub_total, Money::from_rupees(52_00_000));
    /// assert_eq!(totals.gst_amount, Money::from_rupees(9_36_000));
    /// assert_eq!(totals.total_amount, Money::from_rupees(61_36_000));
    /// ```
    pub fn compute(items: &[LineItem], charges: &Charges, gst_rate: GstRate) -> Self {
        let items_total: Money = items.iter().map(LineItem::line_total).sum();
        let extra_charges = charges.total();
        let sub_total = items_total + extra_charges;
        let gst_amount = sub_total.calculate_gst(gst_rate);

        let exact_sub_total = items.iter().map(exact_line_total).sum::<i128>()
            + extra_charges.paise() as i128 * SUB_PAISE_PER_PAISA;

        InvoiceTotals {
            items_total,
            extra_charges,
            sub_total,
            exact_sub_total,
            gst_rate,
            gst_amount,
            total_amount: sub_total + gst_amount,
        }
    }

    /// Outstanding balance after an advance, rounded up to the whole rupee.
    ///
    /// `ceil(max(sub + sub × bps / 10000 - advance, 0))` evaluated on the
    /// exact sub-total, so sub-paisa fractions still count.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    /// use billing_core::totals::InvoiceTotals;
    /// use billing_core::types::{Charges, GstRate};
    ///
    /// let charges = Charges { parking: Money::from_paise(5_000_339), ..Default::default() };
    /// let totals = InvoiceTotals::compute(&[], &charges, GstRate::from_percentage(18.0));
    /// // 50,003.39 × 1.18 = 59,004.0002
    /// assert_eq!(totals.total_amount, Money::from_rupees(59_004));
    /// assert_eq!(totals.remaining_after(Money::zero()), Money::from_rupees(59_005));
    /// assert_eq!(totals.remaining_after(Money::from_rupees(60_000)), Money::zero());
    /// ```
    pub fn remaining_after(&self, advance: Money) -> Money {
        let owed = self.exact_sub_total * (BPS_SCALE + self.gst_rate.bps() as i128)
            - advance.paise() as i128 * SUB_PAISE_PER_PAISA * BPS_SCALE;
        if owed <= 0 {
            return Money::zero();
        }

        let per_rupee = PAISE_PER_RUPEE as i128 * SUB_PAISE_PER_PAISA * BPS_SCALE;
        let rupees = (owed + per_rupee - 1) / per_rupee;
        Money::from_rupees(rupees as i64)
    }
}

/// Backend figures that disagree with a local recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsMismatch {
    pub field: &'static str,
    pub recorded: Money,
    pub computed: Money,
}

impl Invoice {
    /// Recomputes totals from the stored line items, charges and GST rate.
    pub fn recomputed_totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(&self.items, &self.charges, self.gst.percentage)
    }

    /// Compares the stored totals with a local recomputation.
    ///
    /// Differences within `tolerance` are ignored; the backend stores floats
    /// and may round GST differently by a paisa or two.
    pub fn totals_mismatches(&self, tolerance: Money) -> Vec<TotalsMismatch> {
        let computed = self.recomputed_totals();
        let tolerance = tolerance.abs();

        [
            ("itemsTotal", self.items_total, computed.items_total),
            ("subTotal", self.sub_total, computed.sub_total),
            ("gst.amount", self.gst.amount, computed.gst_amount),
            ("totalAmount", self.total_amount, computed.total_amount),
        ]
        .into_iter()
        .filter(|(_, recorded, computed)| (*recorded - *computed).abs() > tolerance)
        .map(|(field, recorded, computed)| TotalsMismatch {
            field,
            recorded,
            computed,
        })
        .collect()
    }

    /// Returns true when the stored totals match a local recomputation.
    pub fn totals_consistent(&self, tolerance: Money) -> bool {
        self.totals_mismatches(tolerance).is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompanyProfile, Customer, GstDetails, PaymentInstrument};
    use chrono::Utc;

    fn item(rate_paise: i64, area: f64) -> LineItem {
        LineItem {
            description: "Unit".to_string(),
            project_name: "Project".to_string(),
            hsn_code: "9954".to_string(),
            rate: Money::from_paise(rate_paise),
            area_sq_ft: area,
        }
    }

    fn charges(parking: i64, amenities: i64, other: i64) -> Charges {
        Charges {
            parking: Money::from_rupees(parking),
            amenities: Money::from_rupees(amenities),
            other_charges: Money::from_rupees(other),
        }
    }

    #[test]
    fn test_sub_total_is_items_plus_charges() {
        let cases: Vec<(Vec<LineItem>, Charges)> = vec![
            (vec![], charges(0, 0, 0)),
            (vec![], charges(10, 20, 30)),
            (vec![item(450_000, 1_000.0)], charges(0, 0, 0)),
            (vec![item(450_050, 999.5), item(12_345, 3.25)], charges(1_50_000, 75_000, 1)),
        ];

        for (items, charges) in cases {
            let totals = InvoiceTotals::compute(&items, &charges, GstRate::default());
            let expected_items: Money = items.iter().map(|i| i.line_total()).sum();
            assert_eq!(totals.items_total, expected_items);
            assert_eq!(
                totals.sub_total,
                totals.items_total + charges.parking + charges.amenities + charges.other_charges
            );
        }
    }

    #[test]
    fn test_gst_and_total() {
        let items = vec![item(100_000, 10.0)]; // ₹1,000 × 10 = ₹10,000
        for pct in [0.0, 5.0, 12.0, 12.5, 18.0, 28.0] {
            let rate = GstRate::from_percentage(pct);
            let totals = InvoiceTotals::compute(&items, &Charges::default(), rate);
            let expected_gst = Money::from_rupees_f64(10_000.0 * pct / 100.0);
            assert_eq!(totals.gst_amount, expected_gst, "gst at {pct}%");
            assert_eq!(totals.total_amount, totals.sub_total + totals.gst_amount);
        }
    }

    #[test]
    fn test_remaining_rounds_up() {
        let totals = InvoiceTotals::compute(&[item(100_040, 1.0)], &Charges::default(), GstRate::zero());
        assert_eq!(totals.remaining_after(Money::from_rupees(300)).paise(), 70100);
        assert_eq!(totals.remaining_after(Money::zero()).paise(), 100100);
        assert_eq!(totals.remaining_after(Money::from_paise(100040)), Money::zero());
        assert_eq!(totals.remaining_after(Money::from_rupees(2_000)), Money::zero());
    }

    #[test]
    fn test_remaining_keeps_sub_paisa_gst() {
        // 50,003.39 at 18% is 59,004.0002; GST rounded to the paisa would hide the 0.0002
        let charges = Charges {
            other_charges: Money::from_paise(5_000_339),
            ..Default::default()
        };
        let totals = InvoiceTotals::compute(&[], &charges, GstRate::from_percentage(18.0));
        assert_eq!(totals.gst_amount, Money::from_paise(900_061));
        assert_eq!(totals.total_amount, Money::from_paise(5_900_400));
        assert_eq!(totals.remaining_after(Money::zero()), Money::from_rupees(59_005));
        assert_eq!(totals.remaining_after(Money::from_rupees(59_004)), Money::from_rupees(1));
        assert_eq!(totals.remaining_after(Money::from_paise(5_900_401)), Money::zero());
    }

    #[test]
    fn test_remaining_keeps_sub_paisa_line_totals() {
        // ₹0.01 × 0.4 sq ft = 0.4 paise, which rounds to nothing on the line
        let items = vec![item(1, 0.4)];
        let totals = InvoiceTotals::compute(&items, &Charges::default(), GstRate::from_percentage(18.0));
        assert_eq!(totals.items_total, Money::zero());
        assert_eq!(totals.exact_sub_total, 4_000);
        assert_eq!(totals.remaining_after(Money::zero()), Money::from_rupees(1));
    }

    #[test]
    fn test_empty_invoice_is_all_zero() {
        let totals = InvoiceTotals::compute(&[], &Charges::default(), GstRate::default());
        assert_eq!(totals.total_amount, Money::zero());
        assert_eq!(totals.remaining_after(Money::zero()), Money::zero());
    }

    #[test]
    fn test_totals_mismatches_flags_drift() {
        let items = vec![item(450_000, 1_000.0)];
        let charges = charges(1_00_000, 0, 0);
        let totals = InvoiceTotals::compute(&items, &charges, GstRate::default());

        let mut invoice = Invoice {
            id: "inv-1".to_string(),
            company: CompanyProfile::default(),
            customer: Customer::default(),
            items,
            charges,
            gst: GstDetails {
                percentage: GstRate::default(),
                amount: totals.gst_amount,
            },
            payment: PaymentInstrument::default(),
            items_total: totals.items_total,
            sub_total: totals.sub_total,
            total_amount: totals.total_amount,
            advance: Money::zero(),
            remaining_amount: totals.total_amount,
            created_at: Utc::now(),
            executive_name: String::new(),
        };
        assert!(invoice.totals_consistent(Money::zero()));

        invoice.total_amount += Money::from_paise(1);
        assert!(invoice.totals_consistent(Money::from_paise(1)));

        let mismatches = invoice.totals_mismatches(Money::zero());
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].field, "totalAmount");
    }
}
