//! Filter specifications: approximation family, order, cutoff and terminations.

use crate::constants::{angular_frequency, ripple_factor_from_db};
use crate::errors::{LadderError, Result};
use crate::math::{Real, Scalar};

/// Smallest number of Cauer transfer-function coefficients (a first-order ladder).
pub const MIN_CAUER_COEFFICIENTS: usize = 2;
/// Largest number of Cauer transfer-function coefficients handled by [`super::cauer`].
pub const MAX_CAUER_COEFFICIENTS: usize = 5;

/// Supported approximation families.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterFamily {
    /// Maximally flat magnitude.
    Butterworth,
    /// Equiripple passband.
    Chebyshev,
    /// Ladder matched to an arbitrary all-pole transfer function.
    Cauer,
}

impl FilterFamily {
    /// Human-readable family name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Butterworth => "Butterworth",
            Self::Chebyshev => "Chebyshev",
            Self::Cauer => "Cauer",
        }
    }
}

/// Approximation family together with its family-specific parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Approximation<T = Scalar> {
    /// Butterworth response.
    Butterworth,
    /// Chebyshev response with ripple factor ε.
    Chebyshev {
        /// Ripple factor ε (> 0).
        ripple: T,
    },
    /// Cauer ladder realizing a normalized all-pole transfer function.
    Cauer {
        /// Denominator coefficients, highest order first.
        coefficients: Vec<T>,
    },
}

impl<T> Approximation<T> {
    /// Family tag.
    #[must_use]
    pub fn family(&self) -> FilterFamily {
        match self {
            Self::Butterworth => FilterFamily::Butterworth,
            Self::Chebyshev { .. } => FilterFamily::Chebyshev,
            Self::Cauer { .. } => FilterFamily::Cauer,
        }
    }
}

/// How the ladder is driven.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Excitation {
    /// Voltage source; a source resistor sits in series (Thévenin).
    #[default]
    Voltage,
    /// Current source; a source resistor sits in shunt (Norton).
    Current,
}

/// Cutoff frequency as supplied by the caller.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff<T = Scalar> {
    /// Linear frequency in hertz.
    Hertz(T),
    /// Angular frequency in rad/s.
    Radians(T),
}

impl<T: Real> Cutoff<T> {
    /// Angular frequency in rad/s.
    #[must_use]
    pub fn radians(self) -> T {
        match self {
            Self::Hertz(hz) => angular_frequency(hz),
            Self::Radians(w) => w,
        }
    }
}

/// Ladder terminations and excitation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Topology {
    /// Source type.
    pub excitation: Excitation,
    /// Whether a source resistor equal to the reference resistance is present.
    pub source_resistance: bool,
}

/// Immutable description of one filter design.
///
/// Deserialized specs pass through the same checks as the constructors.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawFilterSpec<T>",
        bound(deserialize = "T: Real + serde::Deserialize<'de>")
    )
)]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec<T = Scalar> {
    approximation: Approximation<T>,
    order: usize,
    cutoff: T,
    resistance: T,
    excitation: Excitation,
    source_resistance: bool,
}

/// Unchecked wire form of [`FilterSpec`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawFilterSpec<T> {
    approximation: Approximation<T>,
    order: usize,
    cutoff: T,
    resistance: T,
    excitation: Excitation,
    source_resistance: bool,
}

#[cfg(feature = "serde")]
impl<T: Real> TryFrom<RawFilterSpec<T>> for FilterSpec<T> {
    type Error = LadderError;

    fn try_from(raw: RawFilterSpec<T>) -> Result<Self> {
        let cutoff = Cutoff::Radians(raw.cutoff);
        let spec = match raw.approximation {
            Approximation::Butterworth => Self::butterworth(raw.order, cutoff, raw.resistance)?,
            Approximation::Chebyshev { ripple } => {
                Self::chebyshev(raw.order, cutoff, raw.resistance, ripple)?
            }
            Approximation::Cauer { coefficients } => Self::cauer(coefficients, cutoff, raw.resistance)?,
        };
        if spec.order != raw.order {
            return Err(LadderError::InvalidSpec(format!(
                "order {} does not match {} coefficients",
                raw.order,
                spec.order + 1
            )));
        }
        let spec = spec.with_excitation(raw.excitation);
        Ok(if raw.source_resistance {
            spec.with_source_resistance()
        } else {
            spec
        })
    }
}

fn require_positive<T: Real>(value: T, what: &str) -> Result<()> {
    if value.is_finite() && value > T::zero() {
        Ok(())
    } else {
        Err(LadderError::InvalidSpec(format!(
            "{what} must be finite and positive (got {value})"
        )))
    }
}

fn require_order(order: usize) -> Result<()> {
    if order == 0 {
        return Err(LadderError::InvalidSpec("order must be at least 1".into()));
    }
    Ok(())
}

/// Checks a Cauer coefficient list before any computation touches it.
pub fn validate_cauer_coefficients<T: Real>(coefficients: &[T]) -> Result<()> {
    let count = coefficients.len();
    if count < MIN_CAUER_COEFFICIENTS {
        return Err(LadderError::InvalidSpec(format!(
            "at least {MIN_CAUER_COEFFICIENTS} coefficients must be specified (got {count})"
        )));
    }
    if count > MAX_CAUER_COEFFICIENTS {
        return Err(LadderError::Unsupported(format!(
            "more than {MAX_CAUER_COEFFICIENTS} coefficients is not supported (got {count})"
        )));
    }
    if let Some(bad) = coefficients.iter().find(|c| !c.is_finite()) {
        return Err(LadderError::InvalidSpec(format!(
            "coefficients must be finite (got {bad})"
        )));
    }
    if coefficients[0].is_zero() {
        return Err(LadderError::InvalidSpec(
            "leading coefficient must be nonzero".into(),
        ));
    }
    if coefficients[count - 1].is_zero() {
        return Err(LadderError::InvalidSpec(
            "constant coefficient must be nonzero".into(),
        ));
    }
    Ok(())
}

impl<T: Real> FilterSpec<T> {
    /// Butterworth ladder of `order` into `load_ohms`, without a source resistor.
    pub fn butterworth(order: usize, cutoff: Cutoff<T>, load_ohms: T) -> Result<Self> {
        Self::build(Approximation::Butterworth, order, cutoff.radians(), load_ohms, false)
    }

    /// Chebyshev ladder with ripple factor `ripple` (ε).
    ///
    /// Chebyshev ladders are always doubly terminated.
    pub fn chebyshev(order: usize, cutoff: Cutoff<T>, load_ohms: T, ripple: T) -> Result<Self> {
        require_positive(ripple, "ripple factor")?;
        Self::build(
            Approximation::Chebyshev { ripple },
            order,
            cutoff.radians(),
            load_ohms,
            true,
        )
    }

    /// Chebyshev ladder with the passband ripple given in dB.
    pub fn chebyshev_db(order: usize, cutoff: Cutoff<T>, load_ohms: T, ripple_db: T) -> Result<Self> {
        require_positive(ripple_db, "ripple")?;
        Self::chebyshev(order, cutoff, load_ohms, ripple_factor_from_db(ripple_db))
    }

    /// Cauer ladder for normalized transfer-function `coefficients` (highest order first).
    ///
    /// Element values are scaled to `cutoff` and the source resistance `source_ohms`.
    pub fn cauer(coefficients: Vec<T>, cutoff: Cutoff<T>, source_ohms: T) -> Result<Self> {
        validate_cauer_coefficients(&coefficients)?;
        let order = coefficients.len() - 1;
        Self::build(
            Approximation::Cauer { coefficients },
            order,
            cutoff.radians(),
            source_ohms,
            true,
        )
    }

    /// Cauer ladder at 1 rad/s and 1 Ω, the normalized defaults.
    pub fn cauer_normalized(coefficients: Vec<T>) -> Result<Self> {
        Self::cauer(coefficients, Cutoff::Radians(T::one()), T::one())
    }

    fn build(
        approximation: Approximation<T>,
        order: usize,
        cutoff: T,
        resistance: T,
        source_resistance: bool,
    ) -> Result<Self> {
        require_order(order)?;
        require_positive(cutoff, "cutoff frequency")?;
        require_positive(resistance, "resistance")?;
        Ok(Self {
            approximation,
            order,
            cutoff,
            resistance,
            excitation: Excitation::Voltage,
            source_resistance,
        })
    }

    /// Drives the ladder from `excitation`.
    #[must_use]
    pub fn with_excitation(mut self, excitation: Excitation) -> Self {
        self.excitation = excitation;
        self
    }

    /// Adds a source resistor equal to the load (Butterworth only).
    ///
    /// Chebyshev and Cauer ladders are always doubly terminated, so this is a
    /// no-op for them.
    #[must_use]
    pub fn with_source_resistance(mut self) -> Self {
        self.source_resistance = true;
        self
    }
}

impl<T> FilterSpec<T> {
    /// Approximation family and parameters.
    #[must_use]
    pub fn approximation(&self) -> &Approximation<T> {
        &self.approximation
    }

    /// Family tag.
    #[must_use]
    pub fn family(&self) -> FilterFamily {
        self.approximation.family()
    }

    /// Filter order N (number of reactive elements).
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Cutoff in rad/s.
    #[must_use]
    pub fn cutoff(&self) -> &T {
        &self.cutoff
    }

    /// Reference resistance: the load for Butterworth/Chebyshev, the source for Cauer.
    #[must_use]
    pub fn resistance(&self) -> &T {
        &self.resistance
    }

    /// Source type.
    #[must_use]
    pub fn excitation(&self) -> Excitation {
        self.excitation
    }

    /// Whether a source resistor is present.
    #[must_use]
    pub fn source_resistance(&self) -> bool {
        self.source_resistance
    }

    /// Excitation and termination flags.
    #[must_use]
    pub fn topology(&self) -> Topology {
        Topology {
            excitation: self.excitation,
            source_resistance: self.source_resistance,
        }
    }
}
