//! Denormalization of g-values into an ordered, tagged component list.
//!
//! Series inductors and shunt capacitors alternate along the ladder. Which of
//! the two comes first is decided once per design by [`Slot::first`]; every
//! subsequent element simply takes the next slot of an [`Alternation`].

use crate::circuits::component::{Component, ComponentKind};
use crate::errors::{LadderError, Result};
use crate::math::Real;

use super::recurrence::{GValues, LoadTermination, Scaling};
use super::spec::{Excitation, Topology};

/// Placement of the next reactive element.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Next element is a series inductor.
    Inductor,
    /// Next element is a shunt capacitor.
    Capacitor,
}

impl Slot {
    /// Slot of the element adjacent to the source.
    ///
    /// A source resistor is followed by a shunt capacitor; an ideal source by a
    /// series inductor. Current excitation realizes the dual ladder and flips
    /// the whole assignment.
    #[must_use]
    pub fn first(topology: Topology) -> Self {
        let slot = if topology.source_resistance {
            Self::Capacitor
        } else {
            Self::Inductor
        };
        match topology.excitation {
            Excitation::Voltage => slot,
            Excitation::Current => slot.flipped(),
        }
    }

    /// The other slot.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Inductor => Self::Capacitor,
            Self::Capacitor => Self::Inductor,
        }
    }

    /// Component kind realizing this slot.
    #[must_use]
    pub fn kind(self) -> ComponentKind {
        match self {
            Self::Inductor => ComponentKind::Inductor,
            Self::Capacitor => ComponentKind::Capacitor,
        }
    }
}

/// Endless series/shunt alternation starting from a fixed slot.
#[derive(Debug, Clone)]
pub struct Alternation {
    next: Slot,
}

impl Alternation {
    /// Alternation whose first element is `first`.
    #[must_use]
    pub fn starting_with(first: Slot) -> Self {
        Self { next: first }
    }
}

impl Iterator for Alternation {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        let slot = self.next;
        self.next = slot.flipped();
        Some(slot)
    }
}

fn physical<T: Real>(quantity: String, value: T) -> Result<T> {
    if value.is_finite() && value > T::zero() {
        Ok(value)
    } else {
        Err(LadderError::NonPhysical {
            quantity,
            value: value.to_string(),
        })
    }
}

/// Maps `g` onto components for `topology`, scaled to `resistance` ohms and `cutoff` rad/s.
///
/// The output runs from source to load: an optional source resistor, the
/// reactive elements, then the load resistor.
pub fn assign_components<T: Real>(
    g: &GValues<T>,
    topology: Topology,
    cutoff: T,
    resistance: T,
) -> Result<Vec<Component<T>>> {
    let factor = match g.scaling() {
        Scaling::Load => T::one(),
        Scaling::Doubled => T::lit(2.0),
    };
    let mut components = Vec::with_capacity(g.order() + 2);
    let mut position = 0;
    let mut push = |components: &mut Vec<Component<T>>, kind: ComponentKind, value: T| -> Result<()> {
        position += 1;
        let value = physical(format!("{}{position}", kind.letter()), value)?;
        components.push(Component::new(kind, position, value));
        Ok(())
    };

    if topology.source_resistance {
        push(&mut components, ComponentKind::Resistor, resistance * g.source())?;
    }

    let mut last = None;
    for (slot, value) in Alternation::starting_with(Slot::first(topology)).zip(g.reactive_source_to_load()) {
        let denormalized = match slot {
            Slot::Inductor => value * resistance * factor / cutoff,
            Slot::Capacitor => value * factor / (resistance * cutoff),
        };
        push(&mut components, slot.kind(), denormalized)?;
        last = Some(slot);
    }

    let conductance = match g.load_termination() {
        LoadTermination::Dual => last == Some(Slot::Inductor),
        LoadTermination::Resistance => topology.excitation == Excitation::Current,
    };
    let load = if conductance {
        resistance / g.load()
    } else {
        resistance * g.load()
    };
    push(&mut components, ComponentKind::Resistor, load)?;
    Ok(components)
}
