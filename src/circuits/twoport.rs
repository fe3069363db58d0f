//! ABCD two-port cascades of ladder sections.
//!
//! The same cascade runs over two entry types: complex numbers for a response
//! at one frequency, and polynomials in `s` for the realized denominator used
//! to verify a synthesized ladder against its target polynomial.

use num_complex::Complex;
use num_traits::{One, Zero};

use crate::circuits::component::{Component, ComponentKind};
use crate::errors::{LadderError, Result};
use crate::filters::spec::{Excitation, Topology};
use crate::math::Real;
use crate::polynomial::Polynomial;

/// Ring operations needed of an ABCD entry.
pub trait Entry: Clone {
    /// Additive identity.
    fn zero() -> Self;
    /// Multiplicative identity.
    fn one() -> Self;
    /// `self + rhs`.
    fn plus(&self, rhs: &Self) -> Self;
    /// `self · rhs`.
    fn times(&self, rhs: &Self) -> Self;
}

impl<T: Real> Entry for Complex<T> {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }
}

impl<T: Real> Entry for Polynomial<T> {
    fn zero() -> Self {
        Self::constant_term(T::zero())
    }

    fn one() -> Self {
        Self::one()
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }
}

/// ABCD-based two-port network.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPort<E> {
    /// A element of the ABCD matrix.
    pub a: E,
    /// B element of the ABCD matrix.
    pub b: E,
    /// C element of the ABCD matrix.
    pub c: E,
    /// D element of the ABCD matrix.
    pub d: E,
}

impl<E: Entry> TwoPort<E> {
    /// Identity two-port (through connection): [[1, 0], [0, 1]].
    #[must_use]
    pub fn identity() -> Self {
        Self::from_abcd(E::one(), E::zero(), E::zero(), E::one())
    }

    /// Constructs a two-port from explicit ABCD elements.
    #[must_use]
    pub fn from_abcd(a: E, b: E, c: E, d: E) -> Self {
        Self { a, b, c, d }
    }

    /// Series impedance `Z` represented as a two-port.
    #[must_use]
    pub fn series_impedance(z: E) -> Self {
        Self::from_abcd(E::one(), z, E::zero(), E::one())
    }

    /// Shunt admittance `Y` represented as a two-port.
    #[must_use]
    pub fn shunt_admittance(y: E) -> Self {
        Self::from_abcd(E::one(), E::zero(), y, E::one())
    }

    /// ABCD determinant `ad - bc`, computed as `ad + (-1)·bc`.
    #[must_use]
    pub fn determinant(&self, minus_one: &E) -> E {
        self.a
            .times(&self.d)
            .plus(&minus_one.times(&self.b.times(&self.c)))
    }

    /// Cascades this two-port with `rhs` (i.e., self followed by rhs).
    #[must_use]
    pub fn cascade(&self, rhs: &Self) -> Self {
        Self {
            a: self.a.times(&rhs.a).plus(&self.b.times(&rhs.c)),
            b: self.a.times(&rhs.b).plus(&self.b.times(&rhs.d)),
            c: self.c.times(&rhs.a).plus(&self.d.times(&rhs.c)),
            d: self.c.times(&rhs.b).plus(&self.d.times(&rhs.d)),
        }
    }

    /// Cascades a sequence of two-ports from first to last. Returns identity for empty.
    #[must_use]
    pub fn cascade_all<'a>(list: impl IntoIterator<Item = &'a Self>) -> Self
    where
        E: 'a,
    {
        list.into_iter()
            .fold(Self::identity(), |acc, t| acc.cascade(t))
    }

    /// Denominator `D` of `H = R_load / D` with `load` across port 2.
    ///
    /// Voltage drive gives `H = V2/Vs` and `D = R_load·A + B`; current drive
    /// gives the transimpedance `H = V2/Is` and `D = R_load·C + D`.
    #[must_use]
    pub fn terminated(&self, load: &E, excitation: Excitation) -> E {
        match excitation {
            Excitation::Voltage => load.times(&self.a).plus(&self.b),
            Excitation::Current => load.times(&self.c).plus(&self.d),
        }
    }
}

impl<T: Real> TwoPort<Complex<T>> {
    /// Input impedance at port 1 when port 2 is terminated by `z_load`.
    #[must_use]
    pub fn input_impedance(&self, z_load: Complex<T>) -> Complex<T> {
        (self.a * z_load + self.b) / (self.c * z_load + self.d)
    }
}

/// A component list split into its terminations and reactive section.
#[derive(Debug, Clone, Copy)]
pub struct Ladder<'a, T> {
    /// Source resistance, series for voltage drive and shunt for current drive.
    pub source: Option<T>,
    /// Reactive elements, source to load.
    pub reactive: &'a [Component<T>],
    /// Load resistance.
    pub load: T,
}

impl<'a, T: Real> Ladder<'a, T> {
    /// Splits `components` (source to load) according to `topology`.
    pub fn split(components: &'a [Component<T>], topology: Topology) -> Result<Self> {
        let Some((last, rest)) = components.split_last() else {
            return Err(LadderError::InvalidSpec("empty component list".into()));
        };
        if last.kind() != ComponentKind::Resistor {
            return Err(LadderError::InvalidSpec(format!(
                "ladder must end in a load resistor, found {}",
                last.name()
            )));
        }
        let (source, reactive) = if topology.source_resistance {
            match rest.split_first() {
                Some((first, tail)) if first.kind() == ComponentKind::Resistor => {
                    (Some(first.value()), tail)
                }
                _ => {
                    return Err(LadderError::InvalidSpec(
                        "ladder must start with a source resistor".into(),
                    ))
                }
            }
        } else {
            (None, rest)
        };
        if let Some(bad) = reactive.iter().find(|c| !c.kind().is_reactive()) {
            return Err(LadderError::InvalidSpec(format!(
                "unexpected {} between the terminations",
                bad.name()
            )));
        }
        Ok(Self {
            source,
            reactive,
            load: last.value(),
        })
    }

    /// Cascades source and reactive sections.
    ///
    /// `lift(value, power)` builds the entry for `value · s^power`.
    pub fn cascade<E, F>(&self, excitation: Excitation, lift: F) -> TwoPort<E>
    where
        E: Entry,
        F: Fn(T, i32) -> E,
    {
        let source = self.source.map(|rs| match excitation {
            Excitation::Voltage => TwoPort::series_impedance(lift(rs, 0)),
            Excitation::Current => TwoPort::shunt_admittance(lift(rs.recip(), 0)),
        });
        let sections: Vec<TwoPort<E>> = source
            .into_iter()
            .chain(self.reactive.iter().map(|c| match c.kind() {
                ComponentKind::Capacitor => TwoPort::shunt_admittance(lift(c.value(), 1)),
                ComponentKind::Inductor => TwoPort::series_impedance(lift(c.value(), 1)),
                ComponentKind::Resistor => TwoPort::series_impedance(lift(c.value(), 0)),
            }))
            .collect();
        TwoPort::cascade_all(&sections)
    }
}

/// Denominator `D(s)` realized by `components`, such that `H(s) = R_load / D(s)`.
pub fn realized_polynomial<T: Real>(
    components: &[Component<T>],
    topology: Topology,
) -> Result<Polynomial<T>> {
    let ladder = Ladder::split(components, topology)?;
    let abcd = ladder.cascade(topology.excitation, |value, power| {
        let mut coeffs = vec![T::zero(); power as usize + 1];
        coeffs[0] = value;
        Polynomial::new(coeffs)
    });
    let load = Polynomial::constant_term(ladder.load);
    let realized = abcd.terminated(&load, topology.excitation).trimmed();
    tracing::debug!(polynomial = %realized, "realized ladder denominator");
    Ok(realized)
}

/// Transfer function `H(s)` of `components` evaluated numerically at `s`.
pub fn transfer<T: Real>(
    components: &[Component<T>],
    topology: Topology,
    s: Complex<T>,
) -> Result<Complex<T>> {
    let ladder = Ladder::split(components, topology)?;
    let abcd = ladder.cascade(topology.excitation, |value, power| s.powi(power) * value);
    let load = Complex::new(ladder.load, T::zero());
    let den = abcd.terminated(&load, topology.excitation);
    if den.is_zero() {
        return Err(LadderError::degenerate("transfer function denominator"));
    }
    Ok(load / den)
}
