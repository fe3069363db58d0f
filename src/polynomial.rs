//! Dense polynomials in the Laplace variable `s`.
//!
//! Coefficients are always stored highest degree first: `[1, 2, 2, 1]` is
//! `s³ + 2s² + 2s + 1`. Every producer and consumer in the crate uses this
//! order, including the Cauer coefficient lists supplied by callers.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};

use num_complex::Complex;
use num_traits::{Num, One, Zero};

use crate::errors::{LadderError, Result};
use crate::math::Real;

/// Maximum Durand–Kerner sweeps before giving up on further refinement.
const MAX_ROOT_ITERATIONS: usize = 500;

/// Polynomial with coefficients of type `C`, highest degree first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPolynomial<C>"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<C> {
    coeffs: Vec<C>,
}

/// Unchecked wire form of [`Polynomial`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPolynomial<C> {
    coeffs: Vec<C>,
}

#[cfg(feature = "serde")]
impl<C> TryFrom<RawPolynomial<C>> for Polynomial<C> {
    type Error = LadderError;

    fn try_from(raw: RawPolynomial<C>) -> Result<Self> {
        if raw.coeffs.is_empty() {
            return Err(LadderError::InvalidSpec(
                "a polynomial needs at least one coefficient".into(),
            ));
        }
        Ok(Self { coeffs: raw.coeffs })
    }
}

impl<C: Clone + Num> Polynomial<C> {
    /// Creates a polynomial from coefficients ordered highest degree first.
    ///
    /// An empty list is the zero polynomial.
    #[must_use]
    pub fn new(coeffs: Vec<C>) -> Self {
        if coeffs.is_empty() {
            return Self::constant_term(C::zero());
        }
        Self { coeffs }
    }

    /// Degree-zero polynomial.
    #[must_use]
    pub fn constant_term(value: C) -> Self {
        Self {
            coeffs: vec![value],
        }
    }

    /// The polynomial `1`.
    #[must_use]
    pub fn one() -> Self {
        Self::constant_term(C::one())
    }

    /// Expands `∏ (s - root)` starting from `1`.
    #[must_use]
    pub fn from_roots<'a>(roots: impl IntoIterator<Item = &'a C>) -> Self
    where
        C: 'a,
    {
        roots
            .into_iter()
            .fold(Self::one(), |acc, root| acc.mul_linear(root))
    }

    /// Coefficients, highest degree first.
    #[must_use]
    pub fn coefficients(&self) -> &[C] {
        &self.coeffs
    }

    /// Consumes the polynomial, returning its coefficients.
    #[must_use]
    pub fn into_coefficients(self) -> Vec<C> {
        self.coeffs
    }

    /// Nominal degree (leading zeros are not stripped).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient of the highest power.
    #[must_use]
    pub fn leading(&self) -> &C {
        &self.coeffs[0]
    }

    /// Coefficient of `s⁰`.
    #[must_use]
    pub fn constant(&self) -> &C {
        &self.coeffs[self.coeffs.len() - 1]
    }

    /// Coefficient of `s^power`, if within the nominal degree.
    #[must_use]
    pub fn coefficient(&self, power: usize) -> Option<&C> {
        self.degree()
            .checked_sub(power)
            .and_then(|idx| self.coeffs.get(idx))
    }

    /// Evaluates at `x` with Horner's rule.
    #[must_use]
    pub fn eval(&self, x: &C) -> C {
        self.coeffs
            .iter()
            .fold(C::zero(), |acc, c| acc * x.clone() + c.clone())
    }

    /// Multiplies by `(s - root)`.
    ///
    /// The accumulator is shifted up one power (a zero is appended as the new
    /// constant term) and `-root` times each old coefficient is added into the
    /// next lower slot.
    #[must_use]
    pub fn mul_linear(&self, root: &C) -> Self {
        let mut next = self.coeffs.clone();
        next.push(C::zero());
        for (i, c) in self.coeffs.iter().enumerate() {
            next[i + 1] = next[i + 1].clone() - c.clone() * root.clone();
        }
        Self { coeffs: next }
    }

    /// Multiplies every coefficient by `k`.
    #[must_use]
    pub fn scale(&self, k: &C) -> Self {
        self.map(|_, c| c.clone() * k.clone())
    }

    /// Maps each coefficient, passing its power of `s`.
    #[must_use]
    pub fn map<D, F>(&self, mut f: F) -> Polynomial<D>
    where
        F: FnMut(usize, &C) -> D,
    {
        let degree = self.degree();
        Polynomial {
            coeffs: self
                .coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| f(degree - i, c))
                .collect(),
        }
    }
}

impl<C: Clone + Num> Add for &Polynomial<C> {
    type Output = Polynomial<C>;

    fn add(self, rhs: Self) -> Polynomial<C> {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let pad = |p: &Polynomial<C>, power: usize| p.coefficient(power).cloned().unwrap_or_else(C::zero);
        let coeffs = (0..len)
            .rev()
            .map(|power| pad(self, power) + pad(rhs, power))
            .collect();
        Polynomial { coeffs }
    }
}

impl<C: Clone + Num> Mul for &Polynomial<C> {
    type Output = Polynomial<C>;

    fn mul(self, rhs: Self) -> Polynomial<C> {
        let mut coeffs = vec![C::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] = coeffs[i + j].clone() + a.clone() * b.clone();
            }
        }
        Polynomial { coeffs }
    }
}

impl<T: Real> Polynomial<T> {
    /// Promotes to complex coefficients.
    #[must_use]
    pub fn to_complex(&self) -> Polynomial<Complex<T>> {
        self.map(|_, &c| Complex::new(c, T::zero()))
    }

    /// Evaluates at a complex point.
    #[must_use]
    pub fn eval_complex(&self, s: Complex<T>) -> Complex<T> {
        self.coeffs
            .iter()
            .fold(Complex::zero(), |acc, &c| acc * s + c)
    }

    /// Removes exactly-zero leading coefficients.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let first = self
            .coeffs
            .iter()
            .position(|c| !c.is_zero())
            .unwrap_or(self.coeffs.len() - 1);
        Self {
            coeffs: self.coeffs[first..].to_vec(),
        }
    }

    /// Scales so the leading coefficient is one.
    pub fn monic(&self) -> Result<Self> {
        let lead = *self.leading();
        if lead.is_zero() || !lead.is_finite() {
            return Err(LadderError::degenerate("monic scaling (leading coefficient)"));
        }
        Ok(self.map(|_, &c| c / lead))
    }

    /// Largest coefficient magnitude.
    #[must_use]
    pub fn magnitude(&self) -> T {
        self.coeffs.iter().fold(T::zero(), |m, c| m.max(c.abs()))
    }

    /// Maximum relative coefficient deviation between the monic forms of two polynomials.
    ///
    /// Returns infinity when the degrees differ or either leading coefficient vanishes.
    #[must_use]
    pub fn deviation(&self, other: &Self) -> T {
        let (Ok(a), Ok(b)) = (self.monic(), other.monic()) else {
            return T::infinity();
        };
        if a.degree() != b.degree() {
            return T::infinity();
        }
        let scale = a.magnitude().max(b.magnitude()).max(T::one());
        a.coeffs
            .iter()
            .zip(&b.coeffs)
            .fold(T::zero(), |worst, (&x, &y)| worst.max((x - y).abs() / scale))
    }

    /// All complex roots, found by Durand–Kerner simultaneous iteration.
    ///
    /// Iteration stops once every correction is within a small multiple of
    /// [`Real::precision`]. Roots whose imaginary part is below [`Real::root_tolerance`] are
    /// returned as exactly real. The result is sorted by `(|im|, re)`, so real
    /// roots come first in ascending order and repeated calls agree.
    pub fn roots(&self) -> Result<Vec<Complex<T>>> {
        let poly = self.trimmed();
        let lead = *poly.leading();
        if lead.is_zero() {
            return Err(LadderError::degenerate("roots of the zero polynomial"));
        }
        let n = poly.degree();
        if n == 0 {
            return Ok(Vec::new());
        }
        let monic = poly.map(|_, &c| Complex::new(c / lead, T::zero()));

        let seed = Complex::new(T::lit(0.4), T::lit(0.9));
        let mut roots: Vec<Complex<T>> = (0..n).map(|k| seed.powu(k as u32)).collect();
        let tol = T::precision() * T::lit(1.0e3);

        let mut converged = false;
        for _ in 0..MAX_ROOT_ITERATIONS {
            let mut worst = T::zero();
            for i in 0..n {
                let z = roots[i];
                let den = roots
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .fold(Complex::<T>::one(), |acc, (_, &r)| acc * (z - r));
                if den.is_zero() {
                    continue;
                }
                let delta = monic.eval(&z) / den;
                roots[i] = z - delta;
                worst = worst.max(delta.norm() / z.norm().max(T::one()));
            }
            if worst <= tol {
                converged = true;
                break;
            }
        }
        if !converged {
            tracing::debug!(degree = n, "root iteration stopped at the sweep limit (multiple roots?)");
        }

        let real_tol = T::root_tolerance();
        for root in &mut roots {
            if root.im.abs() <= real_tol * root.re.abs().max(T::one()) {
                root.im = T::zero();
            }
        }
        roots.sort_by(|a, b| {
            a.im.abs()
                .partial_cmp(&b.im.abs())
                .unwrap_or(Ordering::Equal)
                .then(a.re.partial_cmp(&b.re).unwrap_or(Ordering::Equal))
        });
        Ok(roots)
    }
}

impl<T: Real> Polynomial<Complex<T>> {
    /// Collapses complex coefficients to real, reporting residual imaginary parts.
    ///
    /// `quantity` names the polynomial in the error.
    pub fn into_real(&self, quantity: &str) -> Result<Polynomial<T>> {
        let scale = self
            .coeffs
            .iter()
            .fold(T::one(), |m, c| m.max(c.norm()));
        let residual = self
            .coeffs
            .iter()
            .fold(T::zero(), |m, c| m.max(c.im.abs()));
        if residual > T::tolerance() * scale {
            return Err(LadderError::PrecisionLoss {
                quantity: quantity.to_string(),
                residual: format!("{:e}", residual.as_f64()),
            });
        }
        Ok(self.real_part())
    }

    /// Real parts of the coefficients, without checking the imaginary residual.
    #[must_use]
    pub fn real_part(&self) -> Polynomial<T> {
        self.map(|_, c| c.re)
    }
}

fn superscript(power: usize) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    power
        .to_string()
        .chars()
        .filter_map(|d| d.to_digit(10).map(|d| DIGITS[d as usize]))
        .collect()
}

impl<T: Real> fmt::Display for Polynomial<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degree = self.degree();
        let mut wrote = false;
        for (i, c) in self.coeffs.iter().enumerate() {
            let power = degree - i;
            let value = c.as_f64();
            if value == 0.0 && (wrote || power > 0) {
                continue;
            }
            let magnitude = value.abs();
            match (wrote, value < 0.0) {
                (false, true) => f.write_str("-")?,
                (true, true) => f.write_str(" - ")?,
                (true, false) => f.write_str(" + ")?,
                (false, false) => {}
            }
            if magnitude != 1.0 || power == 0 {
                write!(f, "{magnitude}")?;
            }
            match power {
                0 => {}
                1 => f.write_str("s")?,
                p => write!(f, "s{}", superscript(p))?,
            }
            wrote = true;
        }
        if !wrote {
            f.write_str("0")?;
        }
        Ok(())
    }
}
