//! Lumped ladder elements, two-port cascades and netlist round trips.

/// Tagged lumped components.
pub mod component;
/// ABCD cascades with numeric and polynomial entries.
pub mod twoport;
/// ngspice deck writer and reader.
pub mod netlist;
/// Dense MNA solve of parsed decks.
pub mod nodal;

pub use component::{Component, ComponentKind};
pub use netlist::{write_netlist, Netlist, NetlistOptions};
pub use nodal::{solve_ac, AcSolution};
pub use twoport::{realized_polynomial, transfer, Ladder, TwoPort};
