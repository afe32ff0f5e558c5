//! Series/parallel circuit representation.

use std::fmt;

use itertools::Itertools;

use crate::notation::format_value;

/// Token placed between the elements of a series group when rendering.
pub const SERIES_SEP: &str = " - ";
/// Token placed between the branches of a parallel group when rendering.
pub const PARALLEL_SEP: &str = " || ";
/// Rendering of a circuit with nothing in it.
pub const EMPTY_CIRCUIT: &str = "[]";

/// A network of resistors built from nested series and parallel groups.
#[derive(Debug, Clone, PartialEq)]
pub enum Circuit {
    /// Elements connected end to end, their resistances add.
    Series(Vec<Element>),
    /// Branches connected across the same two nodes, their conductances add.
    Parallel(Vec<Circuit>),
}

/// One member of a series group.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Resistor(f64),
    Branch(Circuit),
}

impl Element {
    /// Resistance contributed by this element to the surrounding series group.
    pub fn resistance(&self) -> f64 {
        match self {
            Element::Resistor(r) => *r,
            Element::Branch(c) => c.resistance(),
        }
    }

    fn resistor_count(&self) -> usize {
        match self {
            Element::Resistor(_) => 1,
            Element::Branch(c) => c.resistor_count(),
        }
    }
}

impl Circuit {
    /// An empty series group, the starting point of every search.
    pub fn empty() -> Self {
        Circuit::Series(Vec::new())
    }

    /// A two-way parallel split of two single resistors, `[[a] || [b]]`.
    pub fn pair(a: f64, b: f64) -> Self {
        Circuit::Parallel(vec![
            Circuit::Series(vec![Element::Resistor(a)]),
            Circuit::Series(vec![Element::Resistor(b)]),
        ])
    }

    /// Number of top-level elements or branches.
    pub fn len(&self) -> usize {
        match self {
            Circuit::Series(els) => els.len(),
            Circuit::Parallel(brs) => brs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of resistor instances anywhere in the circuit.
    pub fn resistor_count(&self) -> usize {
        match self {
            Circuit::Series(els) => els.iter().map(Element::resistor_count).sum(),
            Circuit::Parallel(brs) => brs.iter().map(Circuit::resistor_count).sum(),
        }
    }

    /// Returns the equivalent resistance of the circuit.
    ///
    /// An empty group has no conducting path and evaluates to infinity.
    ///
    /// ```
    /// use resistor_combo::{Circuit, Element};
    ///
    /// let c = Circuit::Series(vec![Element::Resistor(10.0), Element::Branch(Circuit::pair(20.0, 20.0))]);
    /// assert!((c.resistance() - 20.0).abs() < 1e-9);
    /// ```
    pub fn resistance(&self) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        match self {
            Circuit::Series(els) => els.iter().map(Element::resistance).sum(),
            Circuit::Parallel(brs) => {
                1.0 / brs.iter().map(|b| 1.0 / b.resistance()).sum::<f64>()
            }
        }
    }

    /// Appends an element to a series group, returning the extended copy.
    pub(crate) fn with(&self, el: Element) -> Circuit {
        match self {
            Circuit::Series(els) => {
                let mut els = els.clone();
                els.push(el);
                Circuit::Series(els)
            }
            Circuit::Parallel(_) => Circuit::Series(vec![Element::Branch(self.clone()), el]),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Resistor(r) if f.alternate() => write!(f, "{}", format_value(*r)),
            Element::Resistor(r) => write!(f, "{}", r),
            Element::Branch(c) => fmt::Display::fmt(c, f),
        }
    }
}

/// Renders the circuit as nested brackets, `-` joining series elements and `||` joining
/// parallel branches. The alternate flag (`{:#}`) prints values in engineering notation.
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(EMPTY_CIRCUIT);
        }
        let alt = f.alternate();
        let inner = match self {
            Circuit::Series(els) => els
                .iter()
                .map(|e| if alt { format!("{:#}", e) } else { e.to_string() })
                .join(SERIES_SEP),
            Circuit::Parallel(brs) => brs
                .iter()
                .map(|b| if alt { format!("{:#}", b) } else { b.to_string() })
                .join(PARALLEL_SEP),
        };
        write!(f, "[{}]", inner)
    }
}

/// Renders a circuit to its canonical text form.
pub fn render(circuit: &Circuit) -> String {
    circuit.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(vals: &[f64]) -> Circuit {
        Circuit::Series(vals.iter().map(|v| Element::Resistor(*v)).collect())
    }

    #[test]
    fn series_law() {
        assert_eq!(series(&[10.0, 20.0, 33.0]).resistance(), 63.0);
        assert_eq!(series(&[47.0]).resistance(), 47.0);
    }

    #[test]
    fn parallel_law() {
        assert!((Circuit::pair(100.0, 100.0).resistance() - 50.0).abs() < 1e-12);
        let r = Circuit::pair(10.0, 20.0).resistance();
        assert!((r - 20.0 / 3.0).abs() < 1e-12);

        let nested = Circuit::Parallel(vec![series(&[10.0, 10.0]), Circuit::pair(40.0, 40.0)]);
        assert!((nested.resistance() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn empty_groups_do_not_conduct() {
        assert_eq!(Circuit::empty().resistance(), f64::INFINITY);
        assert_eq!(Circuit::Parallel(vec![]).resistance(), f64::INFINITY);
    }

    #[test]
    fn branches_add_in_series() {
        let c = series(&[10.0])
            .with(Element::Branch(Circuit::pair(30.0, 60.0)))
            .with(Element::Branch(Circuit::pair(10.0, 10.0)));
        assert_eq!(c.len(), 3);
        assert_eq!(c.resistor_count(), 5);
        assert!((c.resistance() - 35.0).abs() < 1e-12);
    }

    #[test]
    fn renders_canonical_text() {
        assert_eq!(Circuit::empty().to_string(), "[]");
        assert_eq!(series(&[10.0, 20.0]).to_string(), "[10 - 20]");
        assert_eq!(Circuit::pair(10.0, 20.0).to_string(), "[[10] || [20]]");

        let c = series(&[10.0]).with(Element::Branch(Circuit::pair(4.7, 2200.0)));
        assert_eq!(render(&c), "[10 - [[4.7] || [2200]]]");
        assert_eq!(format!("{:#}", c), "[10R - [[4R7] || [2K2]]]");
    }

    #[test]
    fn single_branch_renders_with_outer_brackets() {
        let c = Circuit::empty().with(Element::Branch(Circuit::pair(10.0, 20.0)));
        assert_eq!(c.to_string(), "[[[10] || [20]]]");
    }

    #[test]
    fn with_leaves_original_untouched() {
        let base = series(&[1.0]);
        let ext = base.with(Element::Resistor(2.0));
        assert_eq!(base, series(&[1.0]));
        assert_eq!(ext, series(&[1.0, 2.0]));
    }
}
