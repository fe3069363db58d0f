//! Cauer ladder synthesis from an all-pole transfer-function denominator.
//!
//! Element values are solved in closed form by coefficient count, with the
//! source resistance normalized to 1 Ω and the cutoff to 1 rad/s. Writing
//! `s_i` for the coefficient of `s^i`:
//!
//! | count | ladder                | method                                          |
//! |-------|-----------------------|-------------------------------------------------|
//! | 2     | R C R                 | `C1 = 2·s1/s0`, matched load                    |
//! | 3     | R C L R               | `C1 = 2·s2/s1`, `Rtot` closed form              |
//! | 4     | R C L C R             | load from a palindromic sextic, then back-solve |
//! | 5     | R C L C L R           | closed form with one square root                |
//!
//! The realized denominator equals the target multiplied by `Rtot / s0`.
//!
//! A load taken from a repeated sextic root, or a `C3` taken at a vanishing
//! discriminant, is only determined to the precision of the input
//! coefficients. Such solutions are flagged through
//! [`CauerElements::repeated_root`].

use std::fmt;

use crate::circuits::component::Component;
use crate::errors::{LadderError, Result};
use crate::math::{Real, INPUT_PRECISION};
use crate::polynomial::Polynomial;

use super::assign::assign_components;
use super::recurrence::{GValues, LoadTermination, Orientation, Scaling};
use super::spec::{validate_cauer_coefficients, Excitation, Topology};

/// Relative size below which the `C3` discriminant counts as zero.
const DISCRIMINANT_FLOOR: f64 = 1.0e4 * INPUT_PRECISION;

/// Outcome of the load-resistance root selection for four coefficients.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RootReport<T> {
    /// Real, positive roots of the auxiliary sextic in ascending order.
    pub candidates: Vec<T>,
    /// The root used as the normalized load resistance.
    pub selected: T,
    /// More than one distinct physical root was available.
    pub ambiguous: bool,
    /// The selected root is (numerically) a multiple root of the sextic.
    pub repeated: bool,
}

/// Normalized Cauer element values.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CauerElements<T> {
    values: Vec<T>,
    root: Option<RootReport<T>>,
    repeated_root: bool,
}

impl<T: Real> CauerElements<T> {
    /// `[R0, C1, L2, …, R_load]`, source to load, with `R0 = 1`.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Present when root finding picked the load resistance.
    #[must_use]
    pub fn root(&self) -> Option<&RootReport<T>> {
        self.root.as_ref()
    }

    /// The solution sits on a repeated root, so it only matches the input to input precision.
    #[must_use]
    pub fn repeated_root(&self) -> bool {
        self.repeated_root
    }

    /// Reactive element count.
    #[must_use]
    pub fn order(&self) -> usize {
        self.values.len() - 2
    }

    /// Normalized load resistance.
    #[must_use]
    pub fn load(&self) -> T {
        self.values[self.values.len() - 1]
    }

    /// Wraps the values for the component assigner.
    pub fn g_values(&self) -> Result<GValues<T>> {
        GValues::new(
            self.values.clone(),
            Orientation::SourceFirst,
            Scaling::Load,
            LoadTermination::Resistance,
        )
    }
}

/// Coefficient of `s^i`.
struct Powers<'a, T>(&'a [T]);

impl<T: Real> Powers<'_, T> {
    fn s(&self, power: usize) -> T {
        self.0[self.0.len() - 1 - power]
    }
}

fn checked_div<T: Real>(num: T, den: T, quantity: &str) -> Result<T> {
    let value = num / den;
    if den.is_zero() || !value.is_finite() {
        return Err(LadderError::degenerate(quantity));
    }
    Ok(value)
}

fn physical<T: Real>(value: T, quantity: &str) -> Result<T> {
    if value.is_finite() && value > T::zero() {
        Ok(value)
    } else {
        Err(LadderError::NonPhysical {
            quantity: quantity.to_string(),
            value: value.to_string(),
        })
    }
}

/// Solves the normalized element values for `coefficients` (highest order first).
pub fn cauer_elements<T: Real>(coefficients: &[T]) -> Result<CauerElements<T>> {
    validate_cauer_coefficients(coefficients)?;
    let s = Powers(coefficients);
    let two = T::lit(2.0);

    let solved = match coefficients.len() {
        2 => Solved::closed(vec![checked_div(two * s.s(1), s.s(0), "C1")?], T::one()),
        3 => {
            let c1 = checked_div(two * s.s(2), s.s(1), "C1")?;
            let rtot = checked_div(
                -s.s(0) * c1 * c1,
                s.s(2) - s.s(0) * c1 * c1,
                "total resistance",
            )?;
            let r3 = rtot - T::one();
            Solved::closed(vec![c1, c1 * r3], r3)
        }
        4 => four_coefficients(&s)?,
        5 => five_coefficients(&s)?,
        count => {
            return Err(LadderError::Unsupported(format!(
                "{count} coefficients"
            )))
        }
    };

    let mut values = Vec::with_capacity(solved.reactive.len() + 2);
    values.push(T::one());
    for (i, value) in solved.reactive.into_iter().enumerate() {
        let letter = if i % 2 == 0 { 'C' } else { 'L' };
        values.push(physical(value, &format!("{letter}{}", i + 1))?);
    }
    values.push(physical(solved.load, "load resistance")?);
    tracing::debug!(
        values = ?values.iter().map(|v| v.as_f64()).collect::<Vec<_>>(),
        repeated_root = solved.repeated,
        "Cauer element values"
    );
    Ok(CauerElements {
        values,
        root: solved.root,
        repeated_root: solved.repeated,
    })
}

struct Solved<T> {
    reactive: Vec<T>,
    load: T,
    root: Option<RootReport<T>>,
    repeated: bool,
}

impl<T> Solved<T> {
    fn closed(reactive: Vec<T>, load: T) -> Self {
        Self {
            reactive,
            load,
            root: None,
            repeated: false,
        }
    }
}

/// Four coefficients: the normalized load `R4` is a root of
/// `a·x⁶ + b·x⁵ + 3a·x⁴ + (s2³ + 2b)·x³ + 3a·x² + b·x + a` with
/// `a = s0·s3²`, `b = -s1·s2·s3`.
fn four_coefficients<T: Real>(s: &Powers<'_, T>) -> Result<Solved<T>> {
    let a = s.s(0) * s.s(3) * s.s(3);
    let b = -s.s(1) * s.s(2) * s.s(3);
    let three_a = T::lit(3.0) * a;
    let sextic = Polynomial::new(vec![
        a,
        b,
        three_a,
        s.s(2).powi(3) + T::lit(2.0) * b,
        three_a,
        b,
        a,
    ]);
    let report = select_load_root(&sextic)?;
    let r4 = report.selected;

    let c3 = checked_div(s.s(3) * (T::one() + r4 * r4), s.s(2) * r4, "C3")?;
    let c1 = c3 / r4;
    let l2 = checked_div(s.s(3) * ((T::one() + r4) / s.s(0)), (c1 * r4).powi(2), "L2")?;
    Ok(Solved {
        reactive: vec![c1, l2, c3],
        load: r4,
        repeated: report.repeated,
        root: Some(report),
    })
}

/// Keeps the real, positive roots of `sextic` and takes the second smallest.
///
/// The sextic is palindromic, so its roots pair up as `r` and `1/r`; the
/// choice among several physical candidates is reported as ambiguous. Roots
/// closer than [`Real::root_tolerance`] are one multiple root: an equal
/// terminated ladder puts a double root at its load.
fn select_load_root<T: Real>(sextic: &Polynomial<T>) -> Result<RootReport<T>> {
    let roots = sextic.roots()?;
    tracing::debug!(
        roots = ?roots.iter().map(|r| (r.re.as_f64(), r.im.as_f64())).collect::<Vec<_>>(),
        "load-resistance sextic roots"
    );
    let mut candidates: Vec<T> = roots
        .iter()
        .filter(|r| r.im.is_zero() && r.re > T::zero())
        .map(|r| r.re)
        .collect();
    candidates.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

    let selected = match candidates.as_slice() {
        [] => {
            return Err(LadderError::RootSelectionFailure {
                candidates: render(&roots),
            })
        }
        [only] => *only,
        [_, second, ..] => *second,
    };
    let close = |x: T, y: T| (x - y).abs() <= T::root_tolerance() * x.abs().max(y.abs()).max(T::one());
    let distinct = candidates
        .windows(2)
        .filter(|pair| !close(pair[0], pair[1]))
        .count()
        + 1;
    let ambiguous = distinct > 1;
    let repeated = candidates.iter().filter(|&&c| close(c, selected)).count() > 1;
    if ambiguous {
        tracing::warn!(
            candidates = ?candidates.iter().map(|c| c.as_f64()).collect::<Vec<_>>(),
            selected = selected.as_f64(),
            "several physical load resistances; using the second smallest"
        );
    }
    Ok(RootReport {
        candidates,
        selected,
        ambiguous,
        repeated,
    })
}

fn render<T: Real>(values: &[num_complex::Complex<T>]) -> String {
    struct Roots<'a, T>(&'a [num_complex::Complex<T>]);
    impl<T: Real> fmt::Display for Roots<'_, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for (i, r) in self.0.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:.6e}{:+.6e}i", r.re.as_f64(), r.im.as_f64())?;
            }
            Ok(())
        }
    }
    Roots(values).to_string()
}

/// Five coefficients: total resistance in closed form, then `C3` from a quadratic.
fn five_coefficients<T: Real>(s: &Powers<'_, T>) -> Result<Solved<T>> {
    let (s0, s1, s2, s3, s4) = (s.s(0), s.s(1), s.s(2), s.s(3), s.s(4));
    let lit = T::lit;
    let rtot = checked_div(
        lit(16.0) * s0 * s4 * (lit(2.0) - s4 * s4),
        lit(32.0) * s0 * s4 + lit(4.0) * s2 * s3 * s3 * s4
            - lit(8.0) * s1 * s3
            - lit(16.0) * s0 * s4.powi(3)
            - s3.powi(4),
        "total resistance",
    )?;
    let c1 = checked_div(lit(2.0) * s4, s3, "C1")?;

    let nnn = lit(16.0) * s0 * s4.powi(3) * (rtot - T::one()) + s3.powi(4) * rtot
        - lit(4.0) * s2 * s3 * s3 * s4 * rtot;
    let ddd = lit(16.0) * s0 * s3 * s4 * s4 * (rtot - T::one());
    let eee = lit(64.0) * s0 * s3.powi(4) * s4 * s4 * rtot;
    let mut discriminant = nnn * nnn - eee;
    // Rounding of the inputs alone can push a zero discriminant either way.
    let repeated = discriminant.abs() <= lit(DISCRIMINANT_FLOOR) * (nnn * nnn).max(eee.abs());
    if discriminant < T::zero() {
        if !repeated {
            return Err(LadderError::degenerate("C3 discriminant"));
        }
        discriminant = T::zero();
    }
    let c3 = checked_div(discriminant.sqrt() - nnn, ddd, "C3")?;
    let l4 = checked_div(lit(2.0) * s4 * (rtot - T::one()), s3, "L4")?;
    let r5 = rtot - T::one();
    let l2 = checked_div(s4 * (rtot / s0), c1 * c3 * l4, "L2")?;
    Ok(Solved {
        reactive: vec![c1, l2, c3, l4],
        load: r5,
        root: None,
        repeated,
    })
}

/// Normalized Cauer ladder (1 Ω source, 1 rad/s, voltage drive) for `coefficients`.
pub fn synthesize<T: Real>(coefficients: &[T]) -> Result<Vec<Component<T>>> {
    let elements = cauer_elements(coefficients)?;
    let topology = Topology {
        excitation: Excitation::Voltage,
        source_resistance: true,
    };
    assign_components(&elements.g_values()?, topology, T::one(), T::one())
}
