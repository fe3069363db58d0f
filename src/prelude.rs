//! Convenience re-exports for designing and checking ladder filters.

pub use crate::circuits::{
    component::{Component, ComponentKind},
    netlist::{write_netlist, Netlist, NetlistOptions},
    nodal::solve_ac,
    twoport::{realized_polynomial, transfer, TwoPort},
};
pub use crate::constants::*;
pub use crate::errors::{LadderError, Result};
pub use crate::filters::{
    design, synthesize, Approximation, Cutoff, Excitation, FilterFamily, FilterSpec,
    LadderDesign, Topology,
};
pub use crate::logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use crate::math::{Real, Scalar};
pub use crate::polynomial::Polynomial;
pub use crate::sweep::{angular_freq_decades, logspace, mag_db, phase_deg, response_sweep};
