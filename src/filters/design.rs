//! End-to-end ladder design with a realized-network cross-check.
//!
//! Poles, target polynomials and the cross-check are all worked at 1 rad/s
//! and 1 Ω, where every coefficient stays near unity whatever the order.
//! Only the component values and the reported `characteristic`,
//! `component_polynomial` and `realized` polynomials carry the actual cutoff
//! and resistance. At high orders those reports can leave the exponent range
//! of the scalar; the verification never sees them.

use std::fmt;

use num_complex::Complex;

use crate::circuits::component::Component;
use crate::circuits::twoport::{realized_polynomial, Ladder};
use crate::errors::{LadderError, Result};
use crate::math::{jw, Real, Scalar, INPUT_PRECISION};
use crate::polynomial::Polynomial;

use super::assembler::{characteristic_polynomial, denormalize, to_component_polynomial};
use super::assign::assign_components;
use super::cauer::{cauer_elements, CauerElements};
use super::poles::locate_poles;
use super::recurrence::{g_values, GValues};
use super::spec::{Approximation, Excitation, FilterSpec};

/// Factor on [`Real::tolerance`] accepted between realized and target polynomials.
pub const VERIFICATION_SLACK: f64 = 1.0e6;

/// A synthesized ladder with every intermediate used to produce it.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct LadderDesign<T = Scalar> {
    /// The specification this design realizes.
    pub spec: FilterSpec<T>,
    /// Poles at the actual cutoff, in index order.
    pub poles: Vec<Complex<T>>,
    /// Normalized coefficients handed to the component assigner.
    pub g_values: GValues<T>,
    /// Cauer element solution, including any root selection report.
    pub cauer: Option<CauerElements<T>>,
    /// Components from source to load.
    pub components: Vec<Component<T>>,
    /// Target characteristic polynomial at the actual cutoff.
    pub characteristic: Polynomial<T>,
    /// Characteristic polynomial at unit cutoff.
    pub normalized: Polynomial<T>,
    /// Target denominator `D(s)` scaled to the ladder terminations.
    pub component_polynomial: Polynomial<T>,
    /// Denominator of the same ladder at 1 Ω and 1 rad/s, from the ABCD cascade.
    pub unit_realized: Polynomial<T>,
    /// `unit_realized` rescaled to the actual cutoff and terminations.
    pub realized: Polynomial<T>,
    /// Maximum relative coefficient deviation between realized and target.
    pub deviation: T,
}

/// Synthesizes `spec` and verifies the result against its target polynomial.
pub fn design<T: Real>(spec: &FilterSpec<T>) -> Result<LadderDesign<T>> {
    let _span = tracing::debug_span!(
        "design",
        family = spec.family().name(),
        order = spec.order()
    )
    .entered();

    let approximation = spec.approximation();
    let cutoff = *spec.cutoff();
    let topology = spec.topology();

    let unit_poles = locate_poles(approximation, spec.order(), T::one())?;
    let (g, cauer) = match approximation {
        Approximation::Cauer { coefficients } => {
            let elements = cauer_elements(coefficients)?;
            (elements.g_values()?, Some(elements))
        }
        closed_form => (
            g_values(closed_form, spec.order(), spec.source_resistance())?,
            None,
        ),
    };
    let unit_components = assign_components(&g, topology, T::one(), T::one())?;
    let components = assign_components(&g, topology, cutoff, *spec.resistance())?;

    let normalized = characteristic_polynomial(approximation, &unit_poles, T::one())?;
    let unit_dc = dc_denominator(&Ladder::split(&unit_components, topology)?, topology.excitation);
    let unit_target = to_component_polynomial(&normalized, unit_dc, T::one())?;
    let unit_realized = realized_polynomial(&unit_components, topology)?;

    let deviation = unit_realized.deviation(&unit_target);
    let limit = verification_limit::<T>(cauer.as_ref());
    if deviation.is_nan() || deviation > limit {
        return Err(LadderError::VerificationMismatch {
            deviation: format!("{:e}", deviation.as_f64()),
        });
    }

    let dc = dc_denominator(&Ladder::split(&components, topology)?, topology.excitation);
    let component_polynomial = to_component_polynomial(&normalized, dc, cutoff)?;
    let realized = to_component_polynomial(&unit_realized, dc, cutoff)?;
    let characteristic = denormalize(&normalized, cutoff);
    let poles = unit_poles.iter().map(|&p| p * cutoff).collect();
    tracing::info!(
        family = spec.family().name(),
        order = spec.order(),
        components = components.len(),
        deviation = deviation.as_f64(),
        "ladder synthesized"
    );

    Ok(LadderDesign {
        spec: spec.clone(),
        poles,
        g_values: g,
        cauer,
        components,
        characteristic,
        normalized,
        component_polynomial,
        unit_realized,
        realized,
        deviation,
    })
}

/// Accepted deviation: working precision, or input precision for a Cauer
/// solution taken at a repeated root.
fn verification_limit<T: Real>(cauer: Option<&CauerElements<T>>) -> T {
    let working = T::tolerance() * T::lit(VERIFICATION_SLACK);
    if cauer.is_some_and(CauerElements::repeated_root) {
        tracing::debug!("repeated Cauer root; verifying at input precision");
        working.max(T::lit(INPUT_PRECISION * VERIFICATION_SLACK))
    } else {
        working
    }
}

/// `D(0)` of a terminated ladder: inductors short, capacitors open.
fn dc_denominator<T: Real>(ladder: &Ladder<'_, T>, excitation: Excitation) -> T {
    match (excitation, ladder.source) {
        (Excitation::Voltage, Some(rs)) => rs + ladder.load,
        (Excitation::Voltage, None) => ladder.load,
        (Excitation::Current, Some(rs)) => T::one() + ladder.load / rs,
        (Excitation::Current, None) => T::one(),
    }
}

impl<T: Real> LadderDesign<T> {
    /// Load resistance of the realized ladder.
    #[must_use]
    pub fn load(&self) -> T {
        self.components
            .last()
            .map_or_else(T::zero, Component::value)
    }

    /// Realized transfer function `R_load / D(jω)` at angular frequency `omega`.
    ///
    /// Voltage gain for voltage drive, transimpedance for current drive.
    /// `D` is evaluated through the unit ladder at `ω/ωc`.
    #[must_use]
    pub fn response(&self, omega: T) -> Complex<T> {
        let s = jw(omega / *self.spec.cutoff());
        let scale = *self.realized.constant() / *self.unit_realized.constant();
        let load = Complex::new(self.load(), T::zero());
        load / (self.unit_realized.eval_complex(s) * scale)
    }

    /// True when the Cauer load resistance was picked among several physical roots.
    #[must_use]
    pub fn has_ambiguous_root(&self) -> bool {
        self.cauer
            .as_ref()
            .and_then(CauerElements::root)
            .is_some_and(|r| r.ambiguous)
    }
}

/// One factor `(s/ωc - p)` of the factored denominator.
struct Factor<T>(Complex<T>);

impl<T: Real> fmt::Display for Factor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (re, im) = (self.0.re.as_f64(), self.0.im.as_f64());
        if im == 0.0 {
            let sign = if re > 0.0 { '-' } else { '+' };
            write!(f, "(s/ωc {sign} {:.6})", re.abs())
        } else {
            write!(f, "(s/ωc - ({re:.6}{im:+.6}i))")
        }
    }
}

impl<T: Real> fmt::Display for LadderDesign<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cutoff = *self.spec.cutoff();
        writeln!(
            f,
            "{} order {}, cutoff {:.6e} rad/s",
            self.spec.family().name(),
            self.spec.order(),
            cutoff.as_f64()
        )?;
        for c in &self.components {
            writeln!(f, "  {}: {:.6e}", c.name(), c.value().as_f64())?;
        }
        writeln!(f, "normalized:  {}", self.normalized)?;
        writeln!(f, "target D(s): {}", self.component_polynomial)?;

        // D(s) = D(0)·∏(s/ωc - p)/∏(-p) over the unit poles p.
        let unit: Vec<Complex<T>> = self.poles.iter().map(|&p| p / cutoff).collect();
        let product = unit
            .iter()
            .fold(Complex::new(T::one(), T::zero()), |acc, &p| acc * -p);
        let gain = *self.component_polynomial.constant() / product.re;
        write!(f, "factored:    {:.6e}", gain.as_f64())?;
        for p in unit {
            write!(f, " {}", Factor(p))?;
        }
        writeln!(f)?;
        write!(f, "realized:    {}", self.realized)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::circuits::component::ComponentKind;
    use crate::filters::spec::Cutoff;

    #[test]
    fn butterworth_voltage_and_current_duals() {
        for excitation in [Excitation::Voltage, Excitation::Current] {
            let spec = FilterSpec::butterworth(4, Cutoff::Radians(1.0e3), 50.0)
                .unwrap()
                .with_excitation(excitation);
            let d = design(&spec).unwrap();
            assert_eq!(d.components.len(), 5);
            assert!(d.deviation < 1.0e-9);
        }
    }

    #[test]
    fn response_is_three_db_down_at_cutoff() {
        let spec = FilterSpec::butterworth(5, Cutoff::Radians(2.0), 1.0)
            .unwrap()
            .with_source_resistance();
        let d = design(&spec).unwrap();
        let dc = d.response(0.0).norm();
        assert_relative_eq!(dc, 0.5, max_relative = 1.0e-9);
        assert_relative_eq!(d.response(2.0).norm() / dc, std::f64::consts::FRAC_1_SQRT_2, max_relative = 1.0e-9);
    }

    #[test]
    fn cauer_design_scales_to_cutoff_and_source() {
        let spec = FilterSpec::cauer(vec![1.0, 1.0], Cutoff::Radians(10.0), 50.0).unwrap();
        let d = design(&spec).unwrap();
        assert_eq!(d.components[1].kind(), ComponentKind::Capacitor);
        assert_relative_eq!(d.components[1].value(), 2.0 / (50.0 * 10.0), max_relative = 1.0e-12);
        assert_relative_eq!(d.load(), 50.0);
        assert!(!d.has_ambiguous_root());
    }

    #[test]
    fn four_coefficient_cauer_reports_ambiguity() {
        let spec = FilterSpec::cauer_normalized(vec![1.0, 1.5, 2.0, 1.0]).unwrap();
        let d = design(&spec).unwrap();
        assert!(d.has_ambiguous_root());
    }

    #[test]
    fn summary_lists_every_component() {
        let spec = FilterSpec::butterworth(3, Cutoff::Radians(1.0), 1.0).unwrap();
        let text = design(&spec).unwrap().to_string();
        for name in ["L1", "C2", "L3", "R4"] {
            assert!(text.contains(name), "{text}");
        }
    }

    #[test]
    fn summary_carries_the_factored_denominator() {
        let spec = FilterSpec::butterworth(3, Cutoff::Radians(1.0e3), 1.0).unwrap();
        let text = design(&spec).unwrap().to_string();
        let line = text
            .lines()
            .find(|l| l.starts_with("factored:"))
            .unwrap_or_else(|| panic!("{text}"));
        // Butterworth poles have unit product, so the prefactor is D(0) = R_load.
        assert!(line.starts_with("factored:    1.000000e0 "), "{line}");
        assert_eq!(line.matches("(s/ωc").count(), 3, "{line}");
        assert!(line.contains("(s/ωc + 1.000000)"), "{line}");
    }

    #[test]
    fn factored_prefactor_reproduces_the_dc_level() {
        // Even-order Chebyshev: ∏(-p) differs from one.
        let spec = FilterSpec::chebyshev_db(4, Cutoff::Radians(3.0), 50.0, 1.0).unwrap();
        let d = design(&spec).unwrap();
        let unit: Vec<Complex<f64>> = d.poles.iter().map(|&p| p / 3.0).collect();
        let at_dc = unit.iter().fold(Complex::new(1.0, 0.0), |acc, &p| acc * -p);
        let gain: f64 = d
            .to_string()
            .lines()
            .find_map(|l| l.strip_prefix("factored:"))
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap()
            .parse()
            .unwrap();
        assert_relative_eq!(gain * at_dc.re, *d.component_polynomial.constant(), max_relative = 1.0e-5);
    }

    #[test]
    fn verification_runs_at_unit_scale() {
        let spec = FilterSpec::butterworth(6, Cutoff::Hertz(1.0e6), 50.0)
            .unwrap()
            .with_source_resistance();
        let d = design(&spec).unwrap();
        assert_relative_eq!(*d.unit_realized.constant(), 2.0, max_relative = 1.0e-12);
        assert_relative_eq!(*d.realized.constant(), 100.0, max_relative = 1.0e-12);
        assert!(d.realized.deviation(&d.component_polynomial) < 1.0e-9);
        let wc = *d.spec.cutoff();
        let from_components = crate::circuits::twoport::transfer(&d.components, d.spec.topology(), jw(wc)).unwrap();
        let h = d.response(wc);
        assert_relative_eq!(h.re, from_components.re, max_relative = 1.0e-9, epsilon = 1.0e-12);
        assert_relative_eq!(h.im, from_components.im, max_relative = 1.0e-9, epsilon = 1.0e-12);
    }

    #[test]
    fn repeated_cauer_roots_verify_at_input_precision() {
        let butterworth = [1.0, 2.613_125_929_752_753, 3.414_213_562_373_095, 2.613_125_929_752_753, 1.0];
        for excitation in [Excitation::Voltage, Excitation::Current] {
            let spec = FilterSpec::cauer_normalized(butterworth.iter().copied().map(Scalar::lit).collect())
                .unwrap()
                .with_excitation(excitation);
            let d = design(&spec).unwrap();
            assert!(d.cauer.as_ref().unwrap().repeated_root());
            assert!(d.deviation < Scalar::lit(1.0e-12), "{}", d.deviation);
        }
        assert!(verification_limit::<Scalar>(None) < Scalar::lit(1.0e-20));
    }
}
