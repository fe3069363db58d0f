//! Normalized ladder coefficients ("g-values") from closed-form recurrences.
//!
//! `g₀` is the normalized source termination, `g₁…g_N` the reactive elements
//! and `g_{N+1}` the normalized load termination.

use crate::constants::chebyshev_beta;
use crate::errors::{LadderError, Result};
use crate::math::{coth, Real};

use super::spec::Approximation;

/// Order in which `g₁…g_N` run along the physical ladder.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `g₁` is adjacent to the source.
    SourceFirst,
    /// `g₁` is adjacent to the load.
    LoadFirst,
}

/// How normalized values map onto the reference resistance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// Inductors scale by `R`, capacitors by `1/R`.
    Load,
    /// Inductors scale by `2R`, capacitors by `2/R` (equal source and load).
    Doubled,
}

/// Meaning of the terminal value `g_{N+1}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTermination {
    /// A resistance after a shunt capacitor, a conductance after a series inductor.
    Dual,
    /// A resistance in the voltage-driven ladder (a conductance in its current-driven dual).
    Resistance,
}

/// Normalized ladder coefficients `g₀ … g_{N+1}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawGValues<T>",
        bound(deserialize = "T: Real + serde::Deserialize<'de>")
    )
)]
#[derive(Debug, Clone, PartialEq)]
pub struct GValues<T> {
    values: Vec<T>,
    orientation: Orientation,
    scaling: Scaling,
    load: LoadTermination,
}

/// Unchecked wire form of [`GValues`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGValues<T> {
    values: Vec<T>,
    orientation: Orientation,
    scaling: Scaling,
    load: LoadTermination,
}

#[cfg(feature = "serde")]
impl<T: Real> TryFrom<RawGValues<T>> for GValues<T> {
    type Error = LadderError;

    fn try_from(raw: RawGValues<T>) -> Result<Self> {
        Self::new(raw.values, raw.orientation, raw.scaling, raw.load)
    }
}

impl<T: Real> GValues<T> {
    /// Wraps explicit coefficients. `values` must hold at least three entries.
    pub fn new(
        values: Vec<T>,
        orientation: Orientation,
        scaling: Scaling,
        load: LoadTermination,
    ) -> Result<Self> {
        if values.len() < 3 {
            return Err(LadderError::InvalidSpec(format!(
                "a ladder needs g₀, at least one reactive value and a load (got {} values)",
                values.len()
            )));
        }
        Ok(Self {
            values,
            orientation,
            scaling,
            load,
        })
    }

    /// All values `g₀ … g_{N+1}`.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Filter order N.
    #[must_use]
    pub fn order(&self) -> usize {
        self.values.len() - 2
    }

    /// Normalized source termination `g₀` (zero when no source resistor is present).
    #[must_use]
    pub fn source(&self) -> T {
        self.values[0]
    }

    /// Reactive values `g₁ … g_N` in recurrence order.
    #[must_use]
    pub fn reactive(&self) -> &[T] {
        &self.values[1..self.values.len() - 1]
    }

    /// Terminal value `g_{N+1}`.
    #[must_use]
    pub fn load(&self) -> T {
        self.values[self.values.len() - 1]
    }

    /// Reactive values in physical order, source to load.
    #[must_use]
    pub fn reactive_source_to_load(&self) -> Vec<T> {
        match self.orientation {
            Orientation::SourceFirst => self.reactive().to_vec(),
            Orientation::LoadFirst => self.reactive().iter().rev().copied().collect(),
        }
    }

    /// Orientation of the reactive values.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Impedance scaling applied during denormalization.
    #[must_use]
    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    /// Interpretation of `g_{N+1}`.
    #[must_use]
    pub fn load_termination(&self) -> LoadTermination {
        self.load
    }
}

/// g-values for a closed-form family.
///
/// Cauer ladders have no closed-form recurrence; their element values come
/// from [`super::cauer::cauer_elements`].
pub fn g_values<T: Real>(
    approximation: &Approximation<T>,
    order: usize,
    source_resistance: bool,
) -> Result<GValues<T>> {
    if order == 0 {
        return Err(LadderError::InvalidSpec("order must be at least 1".into()));
    }
    let g = match approximation {
        Approximation::Butterworth if source_resistance => butterworth_doubly_terminated(order),
        Approximation::Butterworth => butterworth_singly_terminated(order),
        Approximation::Chebyshev { ripple } => chebyshev(order, *ripple),
        Approximation::Cauer { .. } => {
            return Err(LadderError::InvalidSpec(
                "Cauer ladders are synthesized from coefficients, not a recurrence".into(),
            ))
        }
    }?;
    tracing::debug!(order, g = ?g.values().iter().map(|v| v.as_f64()).collect::<Vec<_>>(), "g-values");
    Ok(g)
}

/// `a_j = sin((2j - 1)π / 2N)` for `j = 1..=N`.
fn sine_terms<T: Real>(order: usize) -> Vec<T> {
    let two_n = T::from_count(2 * order);
    (1..=order)
        .map(|j| (T::from_count(2 * j - 1) * T::PI() / two_n).sin())
        .collect()
}

/// Equal terminations: `g_j = a_j`, scaled by 2R when denormalized.
fn butterworth_doubly_terminated<T: Real>(order: usize) -> Result<GValues<T>> {
    let mut values = Vec::with_capacity(order + 2);
    values.push(T::one());
    values.extend(sine_terms::<T>(order));
    values.push(T::one());
    GValues::new(values, Orientation::SourceFirst, Scaling::Doubled, LoadTermination::Dual)
}

/// Ideal source, resistive load.
///
/// `c_j = cos²(jπ / 2N)`, `g₁ = a₁`, `g_k = a_{k-1}·a_k / (c_{k-1}·g_{k-1})`.
/// The values run from the load end.
fn butterworth_singly_terminated<T: Real>(order: usize) -> Result<GValues<T>> {
    let a = sine_terms::<T>(order);
    let two_n = T::from_count(2 * order);
    let c: Vec<T> = (1..=order)
        .map(|j| (T::from_count(j) * T::PI() / two_n).cos().powi(2))
        .collect();

    let mut g: Vec<T> = Vec::with_capacity(order + 2);
    g.push(T::zero());
    g.push(a[0]);
    for k in 2..=order {
        let den = c[k - 2] * g[k - 1];
        if den.is_zero() {
            return Err(LadderError::degenerate(format!("g{k}")));
        }
        g.push(a[k - 2] * a[k - 1] / den);
    }
    g.push(T::one());
    GValues::new(g, Orientation::LoadFirst, Scaling::Load, LoadTermination::Dual)
}

/// Doubly terminated Chebyshev.
///
/// `y = sinh(β / 2N)`, `b_k = y² + sin²(kπ / N)`, `g₁ = 2a₁ / y`,
/// `g_k = 4a_{k-1}a_k / (b_{k-1}g_{k-1})`; `g_{N+1}` is 1 for odd N and
/// `coth²(β/4)` for even N.
fn chebyshev<T: Real>(order: usize, ripple: T) -> Result<GValues<T>> {
    let beta = chebyshev_beta(ripple);
    let n = T::from_count(order);
    let y = (beta / (T::lit(2.0) * n)).sinh();
    if y.is_zero() || !y.is_finite() {
        return Err(LadderError::degenerate("Chebyshev y = sinh(β/2N)"));
    }
    let a = sine_terms::<T>(order);
    let b: Vec<T> = (1..=order)
        .map(|k| y * y + (T::from_count(k) * T::PI() / n).sin().powi(2))
        .collect();

    let mut g: Vec<T> = Vec::with_capacity(order + 2);
    g.push(T::one());
    g.push(T::lit(2.0) * a[0] / y);
    for k in 2..=order {
        g.push(T::lit(4.0) * a[k - 2] * a[k - 1] / (b[k - 2] * g[k - 1]));
    }
    g.push(if order % 2 == 1 {
        T::one()
    } else {
        coth(beta / T::lit(4.0)).powi(2)
    });
    GValues::new(g, Orientation::SourceFirst, Scaling::Load, LoadTermination::Dual)
}
