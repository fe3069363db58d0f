//! Shared numerical primitives anchored on `num-traits` and `num-bigfloat`.
//!
//! Every synthesis stage is generic over [`Real`]. The crate default is
//! [`Scalar`] (`BigFloat`, roughly forty significant decimal digits) because
//! pole magnitudes and Cauer coefficient ratios span many orders of magnitude
//! at higher filter orders. `f64` is supported for quick estimates and tests.
//!
//! Caller-supplied values enter through [`Real::lit`], so they carry at most
//! [`INPUT_PRECISION`] whatever the working scalar.

use std::fmt;

use num_bigfloat::BigFloat;
use num_complex::Complex;
use num_traits::{Float, FloatConst};

/// Primary scalar type used across the crate.
pub type Scalar = BigFloat;

/// Relative precision of values supplied as `f64` literals.
pub const INPUT_PRECISION: f64 = f64::EPSILON;

/// Real scalar usable by the synthesis engine.
pub trait Real: Float + FloatConst + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Converts an `f64` literal into this scalar.
    fn lit(value: f64) -> Self;

    /// Lossy conversion to `f64` for reporting and netlist emission.
    fn as_f64(self) -> f64;

    /// Relative tolerance below which two quantities are considered equal up to rounding.
    fn tolerance() -> Self;

    /// Unit roundoff of the working precision.
    ///
    /// `Float::epsilon` is not used: num-bigfloat leaves it at the `f32` default.
    fn precision() -> Self;

    /// Tolerance used to classify numerically found polynomial roots as real.
    ///
    /// A double root of a polynomial whose coefficients carry
    /// [`INPUT_PRECISION`] splits by about `√INPUT_PRECISION`, into two close
    /// real roots or a close conjugate pair, whatever the working precision.
    fn root_tolerance() -> Self {
        Self::lit(1.0e-6)
    }

    /// Converts a small integer (orders, indices) into this scalar.
    fn from_count(n: usize) -> Self {
        Self::lit(n as f64)
    }
}

impl Real for f64 {
    fn lit(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }

    fn tolerance() -> Self {
        1.0e-9
    }

    fn precision() -> Self {
        f64::EPSILON
    }
}

impl Real for BigFloat {
    fn lit(value: f64) -> Self {
        BigFloat::from_f64(value)
    }

    fn as_f64(self) -> f64 {
        self.to_f64()
    }

    fn tolerance() -> Self {
        BigFloat::from_f64(1.0e-30)
    }

    fn precision() -> Self {
        num_bigfloat::EPSILON
    }
}

/// Purely imaginary Laplace variable `s = jω`.
#[must_use]
pub fn jw<T: Real>(omega: T) -> Complex<T> {
    Complex::new(T::zero(), omega)
}

/// Hyperbolic cotangent.
#[must_use]
pub fn coth<T: Real>(x: T) -> T {
    x.tanh().recip()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn bigfloat_literals_survive_roundtrip() {
        let x = Scalar::lit(0.125);
        assert_relative_eq!(x.as_f64(), 0.125);
    }

    #[test]
    fn jw_is_purely_imaginary() {
        let s = jw(Scalar::lit(3.0));
        assert_eq!(s.re.as_f64(), 0.0);
        assert_relative_eq!(s.im.as_f64(), 3.0);
    }

    #[test]
    fn coth_matches_definition() {
        let x = 0.3_f64;
        assert_relative_eq!(coth(x), x.cosh() / x.sinh(), epsilon = 1.0e-12);
    }

    #[test]
    fn bigfloat_tolerance_is_tighter_than_f64() {
        assert!(Scalar::tolerance().as_f64() < f64::tolerance());
    }

    #[test]
    fn precision_reflects_the_working_mantissa() {
        let p = Scalar::precision();
        assert!(p.as_f64() < 1.0e-38, "{p}");
        assert!(p < Scalar::tolerance());
        assert_eq!(f64::precision(), f64::EPSILON);
    }
}
