//! s-plane pole placement for the closed-form approximation families.
//!
//! Butterworth poles sit on a circle of radius ωc; Chebyshev poles sit on an
//! ellipse whose semi-axes follow from the ripple factor. Only the upper half
//! (non-negative imaginary part) is computed explicitly. The lower half is
//! mirrored so that every conjugate pair is exact and pole expansion yields
//! real coefficients up to rounding of the products alone.

use num_complex::Complex;

use crate::errors::{LadderError, Result};
use crate::math::Real;
use crate::polynomial::Polynomial;

use super::spec::Approximation;

/// Ordered poles for `approximation` of `order` at cutoff `cutoff` (rad/s).
///
/// Poles are returned in index order `k = 1..=N`; every pole has a negative
/// real part. Cauer poles are the roots of the supplied denominator scaled to
/// the cutoff.
pub fn locate_poles<T: Real>(
    approximation: &Approximation<T>,
    order: usize,
    cutoff: T,
) -> Result<Vec<Complex<T>>> {
    if order == 0 {
        return Err(LadderError::InvalidSpec("order must be at least 1".into()));
    }
    let poles = match approximation {
        Approximation::Butterworth => butterworth_poles(order, cutoff),
        Approximation::Chebyshev { ripple } => chebyshev_poles(order, cutoff, *ripple),
        Approximation::Cauer { coefficients } => cauer_poles(coefficients, cutoff)?,
    };
    tracing::debug!(order, count = poles.len(), "located poles");
    Ok(poles)
}

/// Butterworth pole `k` at `ωc·exp(iπ(2k + N - 1) / 2N)`.
#[must_use]
pub fn butterworth_poles<T: Real>(order: usize, cutoff: T) -> Vec<Complex<T>> {
    let n = T::from_count(order);
    mirrored(order, |k| {
        let theta = T::PI() * T::from_count(2 * k + order - 1) / (T::lit(2.0) * n);
        Complex::from_polar(cutoff, theta)
    })
}

/// Chebyshev pole `m` at `ωc·(-sinh(a)·sin θm + i·cosh(a)·cos θm)`.
///
/// `a = asinh(1/ε) / N` and `θm = (π/2)(2m - 1) / N`.
#[must_use]
pub fn chebyshev_poles<T: Real>(order: usize, cutoff: T, ripple: T) -> Vec<Complex<T>> {
    let n = T::from_count(order);
    let a = ripple.recip().asinh() / n;
    let (sinh_a, cosh_a) = (a.sinh(), a.cosh());
    mirrored(order, |m| {
        let theta = T::FRAC_PI_2() * T::from_count(2 * m - 1) / n;
        Complex::new(-cutoff * sinh_a * theta.sin(), cutoff * cosh_a * theta.cos())
    })
}

/// Computes poles `1..=⌈N/2⌉` with `upper` and mirrors the rest as conjugates.
///
/// For odd N the middle pole is forced onto the real axis.
fn mirrored<T: Real, F>(order: usize, mut upper: F) -> Vec<Complex<T>>
where
    F: FnMut(usize) -> Complex<T>,
{
    let half = order.div_ceil(2);
    let mut poles: Vec<Complex<T>> = (1..=half).map(&mut upper).collect();
    if order % 2 == 1 {
        poles[half - 1].im = T::zero();
    }
    for k in (half + 1)..=order {
        poles.push(poles[order - k].conj());
    }
    poles
}

fn cauer_poles<T: Real>(coefficients: &[T], cutoff: T) -> Result<Vec<Complex<T>>> {
    let denominator = Polynomial::new(coefficients.to_vec());
    Ok(denominator
        .roots()?
        .into_iter()
        .map(|root| root * cutoff)
        .collect())
}
