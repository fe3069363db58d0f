//! Dense modified nodal analysis (MNA) of a parsed deck at a single frequency.
//!
//! Used to confirm that an emitted netlist reproduces the transfer function of
//! the ladder it was written from. Values are `f64`, matching the precision
//! at which they were printed.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;

use crate::circuits::component::ComponentKind;
use crate::errors::{LadderError, Result};

use super::netlist::{is_ground, CardKind, Netlist};

type C64 = Complex<f64>;

/// Node index (0-based). The ground node is represented by `None`.
pub type Node = Option<usize>;

/// Conductance standing in for an inductor at DC.
const DC_SHORT: f64 = 1.0e12;

/// Builder for an MNA system with `node_count` nodes and `source_count` voltage sources.
#[derive(Debug, Clone)]
pub struct MnaBuilder {
    n: usize,
    a: DMatrix<C64>,
    b: DVector<C64>,
    m: usize,
}

impl MnaBuilder {
    /// Empty system sized for the given nodes and voltage sources.
    #[must_use]
    pub fn new(node_count: usize, source_count: usize) -> Self {
        let dim = node_count + source_count;
        Self {
            n: node_count,
            a: DMatrix::zeros(dim, dim),
            b: DVector::zeros(dim),
            m: 0,
        }
    }

    /// Stamps an admittance `y` between nodes `a` and `b`.
    pub fn stamp_admittance(&mut self, a: Node, b: Node, y: C64) {
        match (a, b) {
            (Some(i), Some(j)) => {
                self.a[(i, i)] += y;
                self.a[(j, j)] += y;
                self.a[(i, j)] -= y;
                self.a[(j, i)] -= y;
            }
            (Some(i), None) => self.a[(i, i)] += y,
            (None, Some(j)) => self.a[(j, j)] += y,
            (None, None) => {}
        }
    }

    /// Stamps a current source `i` flowing from `pos` through the source to `neg`.
    ///
    /// This is the SPICE convention: the current enters the network at `neg`.
    pub fn stamp_current_source(&mut self, pos: Node, neg: Node, i: C64) {
        if let Some(p) = pos {
            self.b[p] -= i;
        }
        if let Some(n) = neg {
            self.b[n] += i;
        }
    }

    /// Adds an independent voltage source `v(pos) - v(neg) = v`.
    pub fn stamp_voltage_source(&mut self, pos: Node, neg: Node, v: C64) -> Result<usize> {
        let k = self.m;
        let row = self.n + k;
        if row >= self.a.nrows() {
            return Err(LadderError::Netlist("more voltage sources than allocated".into()));
        }
        self.m += 1;
        let one = C64::new(1.0, 0.0);
        if let Some(p) = pos {
            self.a[(p, row)] += one;
            self.a[(row, p)] += one;
        }
        if let Some(n) = neg {
            self.a[(n, row)] -= one;
            self.a[(row, n)] -= one;
        }
        self.b[row] += v;
        Ok(k)
    }

    /// Solves for node voltages followed by source currents.
    #[must_use]
    pub fn solve(&self) -> Option<DVector<C64>> {
        self.a.clone().lu().solve(&self.b)
    }
}

/// Node voltages of a solved deck.
#[derive(Debug, Clone)]
pub struct AcSolution {
    omega: f64,
    voltages: HashMap<String, C64>,
}

impl AcSolution {
    /// Angular frequency of the solution.
    #[must_use]
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Voltage at `node` (ground is zero).
    #[must_use]
    pub fn voltage(&self, node: &str) -> Option<C64> {
        if is_ground(node) {
            return Some(C64::new(0.0, 0.0));
        }
        self.voltages.get(node).copied()
    }
}

/// Solves `deck` at angular frequency `omega` (rad/s), driving each source at its AC magnitude.
pub fn solve_ac(deck: &Netlist, omega: f64) -> Result<AcSolution> {
    let names = deck.nodes();
    let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let node = |name: &str| -> Node {
        if is_ground(name) {
            None
        } else {
            index.get(name).copied()
        }
    };
    let sources = deck
        .cards
        .iter()
        .filter(|c| c.kind == CardKind::VoltageSource)
        .count();

    let mut mna = MnaBuilder::new(names.len(), sources);
    let s = C64::new(0.0, omega);
    for card in &deck.cards {
        let (a, b) = (node(&card.n1), node(&card.n2));
        match card.kind {
            CardKind::Element(ComponentKind::Resistor) => {
                if card.value == 0.0 {
                    return Err(LadderError::Netlist(format!("{} has zero resistance", card.name)));
                }
                mna.stamp_admittance(a, b, C64::new(card.value.recip(), 0.0));
            }
            CardKind::Element(ComponentKind::Capacitor) => {
                mna.stamp_admittance(a, b, s * card.value);
            }
            CardKind::Element(ComponentKind::Inductor) => {
                let y = if omega == 0.0 {
                    C64::new(DC_SHORT, 0.0)
                } else {
                    (s * card.value).inv()
                };
                mna.stamp_admittance(a, b, y);
            }
            CardKind::VoltageSource => {
                mna.stamp_voltage_source(a, b, C64::new(card.value, 0.0))?;
            }
            CardKind::CurrentSource => {
                mna.stamp_current_source(a, b, C64::new(card.value, 0.0));
            }
        }
    }

    let x = mna
        .solve()
        .ok_or_else(|| LadderError::Netlist(format!("singular MNA system at ω = {omega}")))?;
    let voltages = names
        .iter()
        .enumerate()
        .map(|(i, n)| ((*n).to_string(), x[i]))
        .collect();
    tracing::debug!(omega, nodes = names.len(), sources, "solved MNA system");
    Ok(AcSolution { omega, voltages })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn dc_voltage_divider() {
        let deck = Netlist::parse("divider\nV1 a 0 DC 0 AC 10\nR1 a b 1k\nR2 b 0 2k\n").unwrap();
        let sol = solve_ac(&deck, 0.0).unwrap();
        assert_relative_eq!(sol.voltage("b").unwrap().re, 10.0 * 2.0 / 3.0, epsilon = 1e-9);
        assert_eq!(sol.voltage("0"), Some(C64::new(0.0, 0.0)));
    }

    #[test]
    fn current_source_into_resistor() {
        let deck = Netlist::parse("norton\nI1 0 a AC 1\nR1 a 0 50\n").unwrap();
        let sol = solve_ac(&deck, 1.0).unwrap();
        assert_relative_eq!(sol.voltage("a").unwrap().re, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn rc_corner_is_three_db_down() {
        let deck = Netlist::parse("rc\nV1 in 0 AC 1\nR1 in out 1k\nC1 out 0 1u\n").unwrap();
        let corner = 1.0 / (1.0e3 * 1.0e-6);
        let sol = solve_ac(&deck, corner).unwrap();
        assert_relative_eq!(sol.voltage("out").unwrap().norm(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn floating_deck_is_singular() {
        let deck = Netlist::parse("float\nI1 0 a AC 1\nC1 a 0 1u\n").unwrap();
        assert!(solve_ac(&deck, 0.0).is_err());
    }
}
