//! LC ladder synthesis: pole placement, g-value recurrences, component
//! assignment, polynomial assembly and Cauer element solving.

/// Filter specifications and validation.
pub mod spec;
/// s-plane pole placement.
pub mod poles;
/// g-value recurrences.
pub mod recurrence;
/// Series/shunt assignment and denormalization.
pub mod assign;
/// Characteristic and component polynomials.
pub mod assembler;
/// Cauer element solving from transfer-function coefficients.
pub mod cauer;
/// End-to-end design and verification.
pub mod design;

pub use assign::{assign_components, Alternation, Slot};
pub use cauer::{cauer_elements, synthesize, CauerElements, RootReport};
pub use design::{design, LadderDesign};
pub use poles::locate_poles;
pub use recurrence::{g_values, GValues};
pub use spec::{Approximation, Cutoff, Excitation, FilterFamily, FilterSpec, Topology};
