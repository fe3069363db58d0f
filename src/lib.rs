#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Frequency conversions and ripple constants.
pub mod constants;
/// Scalar trait, precision model and small numeric helpers.
pub mod math;
/// Polynomials in the Laplace variable and their roots.
pub mod polynomial;
/// Ladder synthesis engine.
pub mod filters;
/// Components, two-ports, netlists and nodal analysis.
pub mod circuits;
/// Frequency sweep builders and post-processing helpers.
pub mod sweep;
/// Subscriber setup for the `tracing` events the engine emits.
pub mod logging;
/// Error types shared between modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
