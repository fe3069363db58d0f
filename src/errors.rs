//! Shared error types used across submodules.

use thiserror::Error;

/// Convenience alias for results produced by the synthesis engine.
pub type Result<T, E = LadderError> = std::result::Result<T, E>;

/// Top-level error type for the crate.
///
/// Every computation is deterministic, so none of these are retryable: the
/// same input always fails the same way.
#[derive(Debug, Error)]
pub enum LadderError {
    /// Order, coefficient count, cutoff, resistance or ripple outside the supported range.
    #[error("invalid filter specification: {0}")]
    InvalidSpec(String),
    /// Input is well formed but beyond what the designers implement.
    #[error("unsupported filter specification: {0}")]
    Unsupported(String),
    /// Division by a vanishing denominator or a similarly ill-posed step.
    #[error("numeric degeneracy while computing {quantity}")]
    NumericDegeneracy {
        /// Name of the quantity that could not be computed.
        quantity: String,
    },
    /// A computed element value is negative, zero or not finite.
    #[error("non-physical value for {quantity}: {value}")]
    NonPhysical {
        /// Name of the offending element or intermediate.
        quantity: String,
        /// The computed value, rendered for the message.
        value: String,
    },
    /// Root finding produced no real, positive candidate.
    #[error("no physical root available for the load resistance (roots: {candidates})")]
    RootSelectionFailure {
        /// All roots that were examined, rendered for the message.
        candidates: String,
    },
    /// A result that should be real carries an imaginary residual above tolerance.
    #[error("precision loss in {quantity}: imaginary residual {residual}")]
    PrecisionLoss {
        /// Name of the quantity being collapsed to real.
        quantity: String,
        /// Largest residual observed, rendered for the message.
        residual: String,
    },
    /// The realized ladder does not reproduce the target polynomial.
    #[error("realized ladder deviates from the target polynomial by {deviation}")]
    VerificationMismatch {
        /// Maximum relative coefficient deviation, rendered for the message.
        deviation: String,
    },
    /// Malformed netlist text or an unsolvable netlist.
    #[error("netlist error: {0}")]
    Netlist(String),
    /// I/O failure while writing a netlist.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LadderError {
    /// Builds a [`LadderError::NumericDegeneracy`] for `quantity`.
    pub fn degenerate(quantity: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            quantity: quantity.into(),
        }
    }

    /// True for usage-class failures rejected before any computation.
    #[must_use]
    pub fn is_invalid_spec(&self) -> bool {
        matches!(self, Self::InvalidSpec(_) | Self::Unsupported(_))
    }

    /// Process exit status a command-line front end should use for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidSpec(_) | Self::Unsupported(_) => 2,
            Self::NumericDegeneracy { .. } | Self::NonPhysical { .. } | Self::PrecisionLoss { .. } => 3,
            Self::RootSelectionFailure { .. } => 4,
            Self::VerificationMismatch { .. } => 5,
            Self::Netlist(_) | Self::Io(_) => 1,
        }
    }
}
