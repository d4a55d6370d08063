//! Read-time currency conversion.

use bigdecimal::{BigDecimal, RoundingMode};

/// Price expressed in the session currency: `base * rate`, rounded to two
/// decimal places. Pure; the converted value is never written back to the
/// product.
pub fn convert(base: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    (base * rate).with_scale_round(2, RoundingMode::HalfUp)
}
