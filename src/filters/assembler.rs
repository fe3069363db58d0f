//! Characteristic-polynomial assembly and normalization.

use num_complex::Complex;

use crate::errors::{LadderError, Result};
use crate::math::Real;
use crate::polynomial::Polynomial;

use super::spec::Approximation;

/// Expands `∏ (s - pole)` and collapses the result to real coefficients.
///
/// Fails with [`LadderError::PrecisionLoss`] when the poles are not a
/// conjugate-symmetric set and an imaginary residual survives.
pub fn expand_poles<T: Real>(poles: &[Complex<T>]) -> Result<Polynomial<T>> {
    Polynomial::from_roots(poles).into_real("pole expansion")
}

/// Divides coefficient `i` (highest degree first) by `cutoff^i`.
///
/// The result is the polynomial in the normalized variable `s / ωc` scaled by
/// `1 / ωc^N`, i.e. the unit-cutoff characteristic polynomial.
#[must_use]
pub fn normalize<T: Real>(poly: &Polynomial<T>, cutoff: T) -> Polynomial<T> {
    let degree = poly.degree();
    poly.map(|power, &c| c / cutoff.powi((degree - power) as i32))
}

/// Inverse of [`normalize`]: multiplies coefficient `i` by `cutoff^i`.
#[must_use]
pub fn denormalize<T: Real>(poly: &Polynomial<T>, cutoff: T) -> Polynomial<T> {
    let degree = poly.degree();
    poly.map(|power, &c| c * cutoff.powi((degree - power) as i32))
}

/// Rescales a normalized polynomial into the denominator `D(s)` of the realized ladder.
///
/// `D(s) = resistance · P(s/ωc) / P(0)`, so `D(0)` equals `resistance`, the
/// DC level the terminated ladder presents (source plus load for a
/// voltage-driven ladder).
pub fn to_component_polynomial<T: Real>(
    normalized: &Polynomial<T>,
    resistance: T,
    cutoff: T,
) -> Result<Polynomial<T>> {
    let dc = *normalized.constant();
    if dc.is_zero() || !dc.is_finite() {
        return Err(LadderError::degenerate("component polynomial (P(0))"));
    }
    let scale = resistance / dc;
    Ok(normalized.map(|power, &c| c * scale / cutoff.powi(power as i32)))
}

/// Target characteristic polynomial at the actual cutoff.
///
/// Butterworth is the monic pole expansion. Chebyshev carries the gain
/// `2^(N-1)·ε` of the Chebyshev polynomial. Cauer is the caller's denominator
/// with `s` replaced by `s / ωc`, multiplied through by `ωc^N`.
pub fn characteristic_polynomial<T: Real>(
    approximation: &Approximation<T>,
    poles: &[Complex<T>],
    cutoff: T,
) -> Result<Polynomial<T>> {
    let poly = match approximation {
        Approximation::Butterworth => expand_poles(poles)?,
        Approximation::Chebyshev { ripple } => {
            let gain = T::lit(2.0).powi(poles.len() as i32 - 1) * *ripple;
            expand_poles(poles)?.scale(&gain)
        }
        Approximation::Cauer { coefficients } => {
            denormalize(&Polynomial::new(coefficients.clone()), cutoff)
        }
    };
    tracing::debug!(polynomial = %poly, "characteristic polynomial");
    Ok(poly)
}
