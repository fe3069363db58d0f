//! ngspice deck emission for synthesized ladders, and a reader for the same subset.
//!
//! Nodes are named `in` (source side), `1`, `2`, … between series elements,
//! and `out` (load side). Every series element (a Thévenin source resistor or
//! an inductor) opens a new node; shunt elements return to ground `0`.

use std::io::Write;

use crate::circuits::component::{Component, ComponentKind};
use crate::errors::{LadderError, Result};
use crate::filters::design::LadderDesign;
use crate::filters::spec::{Excitation, FilterFamily, Topology};
use crate::math::Real;

/// Name of the source-side node.
pub const INPUT_NODE: &str = "in";
/// Name of the load node plotted by the analysis.
pub const OUTPUT_NODE: &str = "out";
/// Name of the ground node.
pub const GROUND_NODE: &str = "0";

/// Layout of the analysis section of an emitted deck.
#[derive(Debug, Clone, PartialEq)]
pub struct NetlistOptions {
    /// First line of the deck.
    pub title: String,
    /// Points per decade of the `.AC DEC` sweep.
    pub points_per_decade: usize,
    /// Sweep start in hertz.
    pub start_hz: f64,
    /// Sweep stop in hertz.
    pub stop_hz: f64,
}

impl Default for NetlistOptions {
    fn default() -> Self {
        Self {
            title: "Passive LC ladder".into(),
            points_per_decade: 100,
            start_hz: 0.01,
            stop_hz: 1.0e9,
        }
    }
}

impl NetlistOptions {
    /// Default sweep with a title naming `family`.
    #[must_use]
    pub fn for_family(family: FilterFamily) -> Self {
        Self {
            title: format!("Passive {}", family.name()),
            ..Self::default()
        }
    }
}

/// Writes an ngspice deck for `components` (source to load) driven as `topology` describes.
pub fn write_netlist<W: Write, T: Real>(
    mut w: W,
    components: &[Component<T>],
    topology: Topology,
    options: &NetlistOptions,
) -> Result<()> {
    if components.is_empty() {
        return Err(LadderError::Netlist("no components to write".into()));
    }
    let series_count = components
        .iter()
        .enumerate()
        .filter(|&(i, c)| is_series(c, i, components.len(), topology))
        .count();

    writeln!(w, "{}", options.title)?;
    writeln!(w)?;
    match topology.excitation {
        Excitation::Voltage => writeln!(w, "Vin {INPUT_NODE} {GROUND_NODE} DC 0 AC 1")?,
        Excitation::Current => writeln!(w, "Iin {GROUND_NODE} {INPUT_NODE} DC 0 AC 1")?,
    }

    let mut node = INPUT_NODE.to_string();
    let mut opened = 0;
    for (i, c) in components.iter().enumerate() {
        let value = c.value().as_f64();
        if is_series(c, i, components.len(), topology) {
            opened += 1;
            let next = if opened == series_count {
                OUTPUT_NODE.to_string()
            } else {
                opened.to_string()
            };
            writeln!(w, "{} {node} {next} {value:e}", c.name())?;
            node = next;
        } else {
            writeln!(w, "{} {node} {GROUND_NODE} {value:e}", c.name())?;
        }
    }

    let plotted = if series_count == 0 { INPUT_NODE } else { OUTPUT_NODE };
    let offset = if topology.excitation == Excitation::Voltage && topology.source_resistance {
        "+6"
    } else {
        ""
    };
    writeln!(w)?;
    writeln!(
        w,
        ".AC DEC {} {} {}",
        options.points_per_decade,
        engineering(options.start_hz),
        engineering(options.stop_hz)
    )?;
    writeln!(w, ".control")?;
    writeln!(w, "run")?;
    writeln!(w, "plot vdb({plotted}){offset}")?;
    writeln!(w, ".endc")?;
    writeln!(w, ".END")?;
    Ok(())
}

/// True when the element at `index` sits in series with the signal path.
fn is_series<T: Real>(c: &Component<T>, index: usize, len: usize, topology: Topology) -> bool {
    match c.kind() {
        ComponentKind::Inductor => true,
        ComponentKind::Capacitor => false,
        ComponentKind::Resistor => {
            index == 0
                && len > 1
                && topology.source_resistance
                && topology.excitation == Excitation::Voltage
        }
    }
}

fn engineering(hz: f64) -> String {
    const SUFFIXES: [(f64, &str); 4] = [(1.0e12, "T"), (1.0e9, "GIG"), (1.0e6, "MEG"), (1.0e3, "K")];
    SUFFIXES
        .iter()
        .find(|(scale, _)| hz >= *scale && (hz / scale).fract() == 0.0)
        .map_or_else(|| hz.to_string(), |(scale, suffix)| format!("{}{suffix}", hz / scale))
}

impl<T: Real> LadderDesign<T> {
    /// Writes this design's deck with the default sweep.
    pub fn write_netlist<W: Write>(&self, w: W) -> Result<()> {
        write_netlist(
            w,
            &self.components,
            self.spec.topology(),
            &NetlistOptions::for_family(self.spec.family()),
        )
    }
}

/// Kinds of card understood by [`Netlist::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// A lumped R, L or C.
    Element(ComponentKind),
    /// Independent voltage source.
    VoltageSource,
    /// Independent current source, positive current flowing from `n1` to `n2` through it.
    CurrentSource,
}

/// One parsed two-terminal card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Card name as written (`L3`, `Vin`).
    pub name: String,
    /// Card kind.
    pub kind: CardKind,
    /// First node.
    pub n1: String,
    /// Second node.
    pub n2: String,
    /// Element value, or the AC magnitude of a source.
    pub value: f64,
}

/// Parsed deck.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Netlist {
    /// Title line.
    pub title: String,
    /// Cards in file order.
    pub cards: Vec<Card>,
}

impl Netlist {
    /// Parses R, L, C, V and I cards; dot-commands and `.control` blocks are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();
        let title = lines
            .next()
            .map(|(_, l)| l.trim().to_string())
            .unwrap_or_default();
        let mut cards = Vec::new();
        let mut in_control = false;
        for (index, line) in lines {
            let l = line.trim();
            let lower = l.to_ascii_lowercase();
            if lower.starts_with(".control") {
                in_control = true;
                continue;
            }
            if lower.starts_with(".endc") {
                in_control = false;
                continue;
            }
            if in_control || l.is_empty() || l.starts_with('*') || l.starts_with(';') || l.starts_with('.') {
                continue;
            }
            cards.push(parse_card(l).map_err(|e| LadderError::Netlist(format!("line {}: {e}", index + 1)))?);
        }
        Ok(Self { title, cards })
    }

    /// Distinct non-ground node names in order of first appearance.
    #[must_use]
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = Vec::new();
        for card in &self.cards {
            for n in [card.n1.as_str(), card.n2.as_str()] {
                if !is_ground(n) && !nodes.contains(&n) {
                    nodes.push(n);
                }
            }
        }
        nodes
    }
}

/// True for `0` and `gnd`.
#[must_use]
pub fn is_ground(node: &str) -> bool {
    node == GROUND_NODE || node.eq_ignore_ascii_case("gnd")
}

fn parse_card(line: &str) -> std::result::Result<Card, String> {
    let toks: Vec<&str> = line.split_whitespace().collect();
    if toks.len() < 4 {
        return Err(format!("expected `name n1 n2 value`, got `{line}`"));
    }
    let head = toks[0].chars().next().unwrap_or(' ').to_ascii_uppercase();
    let kind = match head {
        'V' => CardKind::VoltageSource,
        'I' => CardKind::CurrentSource,
        letter => CardKind::Element(
            ComponentKind::from_letter(letter).ok_or_else(|| format!("unsupported card `{}`", toks[0]))?,
        ),
    };
    let value = match kind {
        CardKind::Element(_) => parse_value(toks[3])?,
        CardKind::VoltageSource | CardKind::CurrentSource => source_ac_magnitude(&toks[3..])?,
    };
    Ok(Card {
        name: toks[0].to_string(),
        kind,
        n1: toks[1].to_string(),
        n2: toks[2].to_string(),
        value,
    })
}

fn source_ac_magnitude(toks: &[&str]) -> std::result::Result<f64, String> {
    let mut i = 0;
    while i < toks.len() {
        if toks[i].eq_ignore_ascii_case("AC") {
            return toks.get(i + 1).map_or(Ok(1.0), |t| parse_value(t));
        }
        i += 1;
    }
    Ok(0.0)
}

/// Parses a SPICE number with an optional engineering suffix (`f p n u m k meg g t`).
pub fn parse_value(tok: &str) -> std::result::Result<f64, String> {
    let lower = tok.trim().to_ascii_lowercase();
    let (base, mult) = if let Some(base) = lower.strip_suffix("meg") {
        (base, 1.0e6)
    } else if let Some(base) = lower.strip_suffix("gig") {
        (base, 1.0e9)
    } else {
        match lower.chars().last() {
            Some('f') => (&lower[..lower.len() - 1], 1.0e-15),
            Some('p') => (&lower[..lower.len() - 1], 1.0e-12),
            Some('n') => (&lower[..lower.len() - 1], 1.0e-9),
            Some('u') => (&lower[..lower.len() - 1], 1.0e-6),
            Some('m') => (&lower[..lower.len() - 1], 1.0e-3),
            Some('k') => (&lower[..lower.len() - 1], 1.0e3),
            Some('g') => (&lower[..lower.len() - 1], 1.0e9),
            Some('t') => (&lower[..lower.len() - 1], 1.0e12),
            _ => (lower.as_str(), 1.0),
        }
    };
    base.parse::<f64>()
        .map(|v| v * mult)
        .map_err(|_| format!("invalid number `{tok}`"))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn topology(excitation: Excitation, source_resistance: bool) -> Topology {
        Topology {
            excitation,
            source_resistance,
        }
    }

    fn butterworth_third() -> Vec<Component<f64>> {
        vec![
            Component::new(ComponentKind::Inductor, 1, 1.5),
            Component::new(ComponentKind::Capacitor, 2, 4.0 / 3.0),
            Component::new(ComponentKind::Inductor, 3, 0.5),
            Component::new(ComponentKind::Resistor, 4, 1.0),
        ]
    }

    fn render(components: &[Component<f64>], topology: Topology) -> String {
        let mut buf = Vec::new();
        write_netlist(&mut buf, components, topology, &NetlistOptions::for_family(FilterFamily::Butterworth)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn deck_layout() {
        let text = render(&butterworth_third(), topology(Excitation::Voltage, false));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Passive Butterworth");
        assert_eq!(lines[2], "Vin in 0 DC 0 AC 1");
        assert_eq!(lines[3], "L1 in 1 1.5e0");
        assert!(lines[4].starts_with("C2 1 0 "));
        assert_eq!(lines[5], "L3 1 out 5e-1");
        assert_eq!(lines[6], "R4 out 0 1e0");
        assert!(text.contains(".AC DEC 100 0.01 1GIG"));
        assert!(text.contains("plot vdb(out)\n"));
        assert!(text.trim_end().ends_with(".END"));
    }

    #[test]
    fn thevenin_source_resistor_opens_a_node_and_offsets_the_plot() {
        let parts = vec![
            Component::new(ComponentKind::Resistor, 1, 50.0),
            Component::new(ComponentKind::Capacitor, 2, 1.0e-6),
            Component::new(ComponentKind::Resistor, 3, 50.0),
        ];
        let text = render(&parts, topology(Excitation::Voltage, true));
        assert!(text.contains("R1 in out 5e1"));
        assert!(text.contains("C2 out 0 1e-6"));
        assert!(text.contains("plot vdb(out)+6"));
    }

    #[test]
    fn norton_source_resistor_is_shunt() {
        let parts = vec![
            Component::new(ComponentKind::Resistor, 1, 50.0),
            Component::new(ComponentKind::Inductor, 2, 1.0e-3),
            Component::new(ComponentKind::Resistor, 3, 50.0),
        ];
        let text = render(&parts, topology(Excitation::Current, true));
        assert!(text.contains("Iin 0 in DC 0 AC 1"));
        assert!(text.contains("R1 in 0 5e1"));
        assert!(text.contains("L2 in out 1e-3"));
        assert!(text.contains("plot vdb(out)\n"));
    }

    #[test]
    fn parse_reads_back_the_emitted_deck() {
        let text = render(&butterworth_third(), topology(Excitation::Voltage, false));
        let deck = Netlist::parse(&text).unwrap();
        assert_eq!(deck.title, "Passive Butterworth");
        assert_eq!(deck.cards.len(), 5);
        assert_eq!(deck.cards[0].kind, CardKind::VoltageSource);
        assert_relative_eq!(deck.cards[0].value, 1.0);
        assert_eq!(deck.cards[2].kind, CardKind::Element(ComponentKind::Capacitor));
        assert_relative_eq!(deck.cards[2].value, 4.0 / 3.0, max_relative = 1e-12);
        assert_eq!(deck.nodes(), ["in", "1", "out"]);
    }

    #[test]
    fn engineering_suffixes() {
        assert_relative_eq!(parse_value("4.7k").unwrap(), 4.7e3);
        assert_relative_eq!(parse_value("2MEG").unwrap(), 2.0e6);
        assert_relative_eq!(parse_value("10m").unwrap(), 1.0e-2);
        assert_relative_eq!(parse_value("3.3u").unwrap(), 3.3e-6);
        assert_relative_eq!(parse_value("1e-3").unwrap(), 1.0e-3);
        assert!(parse_value("abc").is_err());
    }

    #[test]
    fn malformed_cards_name_the_line() {
        let err = Netlist::parse("title\nR1 in\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
        let err = Netlist::parse("title\nQ1 a b c 1\n").unwrap_err();
        assert!(matches!(err, LadderError::Netlist(_)));
    }
}
