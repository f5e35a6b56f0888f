//! Bundle pricing: one core tier plus one care tier at a fixed discount.

use serde::Serialize;

use crate::catalog::{plan_details, PlanProduct, DEFAULT_CARE_KEY};

/// Discount applied when core and care are bought together.
pub const BUNDLE_DISCOUNT_PERCENT: u64 = 20;

/// A derived quote. Never persisted; recomputed on demand from catalog prices.
///
/// Invariant: `final_amount = round(base_amount * (1 - discount_percent/100))`
/// with round-to-nearest, ties away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleQuote {
    pub base_amount: u64,
    pub discount_percent: u64,
    pub final_amount: u64,
}

impl BundleQuote {
    /// The zeroed quote returned for unknown plan keys.
    ///
    /// Callers must treat a zero quote as "unpriced", never as a free tier.
    pub const ZERO: BundleQuote = BundleQuote {
        base_amount: 0,
        discount_percent: 0,
        final_amount: 0,
    };

    pub fn is_unpriced(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Price a core + care bundle.
///
/// `care_key` defaults to [`DEFAULT_CARE_KEY`]. If either key is unknown the
/// zeroed quote comes back rather than an error; the combination is integer
/// addition followed by the discount, rounded half away from zero. The result
/// is bit-reproducible: no floating point is involved.
pub fn bundle_quote(core_key: &str, care_key: Option<&str>) -> BundleQuote {
    let care_key = care_key.unwrap_or(DEFAULT_CARE_KEY);

    let (Some(core), Some(care)) = (
        plan_details(PlanProduct::Core, core_key),
        plan_details(PlanProduct::Care, care_key),
    ) else {
        return BundleQuote::ZERO;
    };

    let base_amount = core.price + care.price;
    BundleQuote {
        base_amount,
        discount_percent: BUNDLE_DISCOUNT_PERCENT,
        final_amount: apply_discount(base_amount, BUNDLE_DISCOUNT_PERCENT),
    }
}

/// Round-half-away-from-zero discount on a non-negative integer amount.
fn apply_discount(amount: u64, percent: u64) -> u64 {
    debug_assert!(percent <= 100);
    (amount * (100 - percent) + 50) / 100
}
