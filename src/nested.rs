//! Untyped nested-list circuits.
//!
//! Before circuits carried an explicit series/parallel tag they were plain nested lists, and the
//! kind of a list was read off its first element: a list whose first element is itself a list is
//! a parallel group, anything else is a series of bare values. That rule is kept here so results
//! can be compared against circuits stored in the old form.
//!
//! The rule is only well defined for homogeneous lists. A series reading that meets a nested
//! list, or a parallel reading that meets a bare value, fails with [`MalformedCircuit`] instead
//! of producing a number.

use itertools::Itertools;

use crate::circuit::{Circuit, Element, EMPTY_CIRCUIT, PARALLEL_SEP, SERIES_SEP};

/// A circuit as an untagged nested list.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedCircuit {
    Value(f64),
    List(Vec<NestedCircuit>),
}

/// A nested list that mixes bare values and sub-lists at one level.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed circuit at depth {depth}: {reason}")]
pub struct MalformedCircuit {
    pub depth: usize,
    pub reason: &'static str,
}

enum Reading<'a> {
    Empty,
    Series(Vec<f64>),
    Parallel(&'a [NestedCircuit]),
}

impl NestedCircuit {
    fn read(&self, depth: usize) -> Result<Reading<'_>, MalformedCircuit> {
        let items = match self {
            NestedCircuit::List(items) => items,
            NestedCircuit::Value(_) => {
                return Err(MalformedCircuit {
                    depth,
                    reason: "bare value where a group was expected",
                })
            }
        };
        match items.first() {
            None => Ok(Reading::Empty),
            Some(NestedCircuit::List(_)) => Ok(Reading::Parallel(items)),
            Some(NestedCircuit::Value(_)) => items
                .iter()
                .map(|item| match item {
                    NestedCircuit::Value(v) => Ok(*v),
                    NestedCircuit::List(_) => Err(MalformedCircuit {
                        depth,
                        reason: "nested group inside a series of values",
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Reading::Series),
        }
    }

    fn resistance_at(&self, depth: usize) -> Result<f64, MalformedCircuit> {
        match self.read(depth)? {
            Reading::Empty => Ok(f64::INFINITY),
            Reading::Series(vals) => Ok(vals.iter().sum()),
            Reading::Parallel(branches) => {
                let mut conductance = 0.0;
                for b in branches {
                    conductance += 1.0 / b.resistance_at(depth + 1)?;
                }
                Ok(1.0 / conductance)
            }
        }
    }

    fn render_at(&self, depth: usize) -> Result<String, MalformedCircuit> {
        Ok(match self.read(depth)? {
            Reading::Empty => EMPTY_CIRCUIT.to_string(),
            Reading::Series(vals) => format!("[{}]", vals.iter().join(SERIES_SEP)),
            Reading::Parallel(branches) => format!(
                "[{}]",
                branches
                    .iter()
                    .map(|b| b.render_at(depth + 1))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(PARALLEL_SEP)
            ),
        })
    }

    /// Evaluates the list using the first-element rule.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCircuit`] if any level of the list is not homogeneous.
    ///
    /// ```
    /// use resistor_combo::NestedCircuit::{List, Value};
    ///
    /// let pair = List(vec![List(vec![Value(10.0)]), List(vec![Value(10.0)])]);
    /// assert!((pair.resistance().unwrap() - 5.0).abs() < 1e-9);
    ///
    /// let mixed = List(vec![Value(10.0), pair]);
    /// assert!(mixed.resistance().is_err());
    /// ```
    pub fn resistance(&self) -> Result<f64, MalformedCircuit> {
        self.resistance_at(0)
    }

    /// Renders the list with the same tokens as [`Circuit`]'s `Display` impl.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCircuit`] under the same conditions as [`NestedCircuit::resistance`].
    pub fn render(&self) -> Result<String, MalformedCircuit> {
        self.render_at(0)
    }
}

impl From<&Element> for NestedCircuit {
    fn from(el: &Element) -> Self {
        match el {
            Element::Resistor(r) => NestedCircuit::Value(*r),
            Element::Branch(c) => c.into(),
        }
    }
}

impl From<&Circuit> for NestedCircuit {
    fn from(c: &Circuit) -> Self {
        match c {
            Circuit::Series(els) => NestedCircuit::List(els.iter().map(Into::into).collect()),
            Circuit::Parallel(brs) => NestedCircuit::List(brs.iter().map(Into::into).collect()),
        }
    }
}
