//! Frequency and ripple conversions shared by the filter designers.
//!
//! ## Ripple conventions
//!
//! Chebyshev designs are parameterized by the ripple factor ε. The passband
//! ripple in decibels is `10·log10(1 + ε²)`. The ladder recurrences use the
//! quantity `β = ln(coth(ripple_dB / 17.37))`, where 17.37 is `40 / ln 10`.
//!
//! ## References
//!
//! - G. Matthaei, L. Young, E. M. T. Jones, *Microwave Filters,
//!   Impedance-Matching Networks, and Coupling Structures*, ch. 4.
//! - A. I. Zverev, *Handbook of Filter Synthesis*.

use crate::math::{coth, Real};

/// Ripple factor giving 0.5 dB of passband ripple.
pub const RIPPLE_HALF_DB: f64 = 0.349_311_400_188_948_1;
/// Ripple factor giving 1 dB of passband ripple.
pub const RIPPLE_ONE_DB: f64 = 0.508_847_139_909_587_4;

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency<T: Real>(hz: T) -> T {
    T::lit(2.0) * T::PI() * hz
}

/// Returns the linear frequency (Hz) corresponding to an angular frequency.
#[inline]
#[must_use]
pub fn linear_frequency<T: Real>(omega: T) -> T {
    omega / (T::lit(2.0) * T::PI())
}

/// Decibels per neper-like unit used by the Chebyshev β term (`40 / ln 10`).
#[must_use]
pub fn db_scale<T: Real>() -> T {
    T::lit(40.0) / T::LN_10()
}

/// Passband ripple in dB for ripple factor `epsilon`.
#[must_use]
pub fn ripple_db<T: Real>(epsilon: T) -> T {
    T::lit(10.0) * (T::one() + epsilon * epsilon).log10()
}

/// Ripple factor ε for a passband ripple given in dB.
#[must_use]
pub fn ripple_factor_from_db<T: Real>(ripple_db: T) -> T {
    (T::lit(10.0).powf(ripple_db / T::lit(10.0)) - T::one()).sqrt()
}

/// The Chebyshev β term, `ln(coth(ripple_dB / 17.37))`.
#[must_use]
pub fn chebyshev_beta<T: Real>(epsilon: T) -> T {
    coth(ripple_db(epsilon) / db_scale()).ln()
}
