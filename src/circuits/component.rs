use std::fmt;

use num_complex::Complex;

use crate::math::{Real, Scalar};

/// Lumped element kinds appearing in a ladder.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Resistor (ohms).
    Resistor,
    /// Inductor (henries), always in series.
    Inductor,
    /// Capacitor (farads), always in shunt.
    Capacitor,
}

impl ComponentKind {
    /// SPICE element letter.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Resistor => 'R',
            Self::Inductor => 'L',
            Self::Capacitor => 'C',
        }
    }

    /// True for inductors and capacitors.
    #[must_use]
    pub fn is_reactive(self) -> bool {
        !matches!(self, Self::Resistor)
    }

    /// Parses a SPICE element letter.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'R' => Some(Self::Resistor),
            'L' => Some(Self::Inductor),
            'C' => Some(Self::Capacitor),
            _ => None,
        }
    }
}

/// One denormalized ladder element: `(kind, position, value)`.
///
/// Positions are 1-based and follow the physical ladder from source to load.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Component<T = Scalar> {
    kind: ComponentKind,
    position: usize,
    value: T,
}

impl<T: Real> Component<T> {
    /// Creates a component.
    #[must_use]
    pub fn new(kind: ComponentKind, position: usize, value: T) -> Self {
        Self {
            kind,
            position,
            value,
        }
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// 1-based ladder position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Value in ohms, henries or farads.
    #[must_use]
    pub fn value(&self) -> T {
        self.value
    }

    /// Human-readable identifier (e.g. `L3`).
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}{}", self.kind.letter(), self.position)
    }

    /// Impedance at the complex frequency `s`.
    #[must_use]
    pub fn impedance(&self, s: Complex<T>) -> Complex<T> {
        match self.kind {
            ComponentKind::Resistor => Complex::new(self.value, T::zero()),
            ComponentKind::Inductor => s * self.value,
            ComponentKind::Capacitor => (s * self.value).inv(),
        }
    }

    /// Admittance at the complex frequency `s`.
    #[must_use]
    pub fn admittance(&self, s: Complex<T>) -> Complex<T> {
        match self.kind {
            ComponentKind::Resistor => Complex::new(self.value.recip(), T::zero()),
            ComponentKind::Inductor => (s * self.value).inv(),
            ComponentKind::Capacitor => s * self.value,
        }
    }
}

impl<T: Real> fmt::Display for Component<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn resistor_impedance_is_real() {
        let r = Component::new(ComponentKind::Resistor, 1, 100.0);
        let z = r.impedance(Complex::new(0.0, 1.0));
        assert_relative_eq!(z.re, 100.0);
        assert_relative_eq!(z.im, 0.0);
    }

    #[test]
    fn capacitor_impedance_is_reactive() {
        let c = Component::new(ComponentKind::Capacitor, 2, 1e-6);
        let omega = 1.0e3;
        let z = c.impedance(Complex::new(0.0, omega));
        assert_relative_eq!(z.re, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(z.im, -1.0 / (omega * 1e-6), max_relative = 1.0e-12);
    }

    #[test]
    fn admittance_inverts_impedance() {
        let l = Component::new(ComponentKind::Inductor, 3, 2.5e-3);
        let s = Complex::new(0.0, 5.0e3);
        let product = l.impedance(s) * l.admittance(s);
        assert_relative_eq!(product.re, 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(product.im, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn names_follow_spice_letters() {
        let l = Component::new(ComponentKind::Inductor, 3, 1.0);
        assert_eq!(l.name(), "L3");
        assert_eq!(ComponentKind::from_letter('c'), Some(ComponentKind::Capacitor));
        assert!(!ComponentKind::Resistor.is_reactive());
    }
}
