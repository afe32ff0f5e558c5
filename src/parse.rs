//! Parsing of the bracketed circuit text produced by [`Circuit`]'s `Display` impl.
//!
//! ```text
//! circuit := '[' ']' | '[' item (sep item)* ']'
//! item    := circuit | value
//! sep     := '-' | '||'
//! ```
//!
//! All separators inside one pair of brackets must agree. Values may use engineering notation.

use std::str::FromStr;

use crate::{
    circuit::{Circuit, Element},
    notation::{parse_notation, ParseValueError},
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected '{found}' at offset {pos}")]
    Unexpected { pos: usize, found: char },

    #[error("series and parallel separators mixed in one group at offset {pos}")]
    MixedSeparators { pos: usize },

    #[error("bare value in a parallel group at offset {pos}")]
    ValueInParallel { pos: usize },

    #[error("trailing input at offset {pos}")]
    TrailingInput { pos: usize },

    #[error(transparent)]
    Value(#[from] ParseValueError),
}

#[derive(Clone, Copy, PartialEq)]
enum Sep {
    Series,
    Parallel,
}

enum Item {
    Value(f64),
    Group(Circuit),
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::Unexpected {
                pos: self.pos,
                found,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        self.skip_ws();
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn sep(&mut self) -> Result<Option<Sep>, ParseError> {
        self.skip_ws();
        if self.src[self.pos..].starts_with("||") {
            self.pos += 2;
            Ok(Some(Sep::Parallel))
        } else if self.peek() == Some('-') {
            self.pos += 1;
            Ok(Some(Sep::Series))
        } else if self.peek() == Some(']') {
            Ok(None)
        } else {
            Err(self.unexpected())
        }
    }

    fn value(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        let mut prev = ' ';
        while let Some(c) = self.peek() {
            let exp_sign = (c == '-' || c == '+') && (prev == 'e' || prev == 'E');
            if !(c.is_ascii_alphanumeric() || c == '.' || exp_sign) {
                break;
            }
            prev = c;
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        Ok(parse_notation(&self.src[start..self.pos])?)
    }

    fn item(&mut self) -> Result<Item, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => Ok(Item::Group(self.circuit()?)),
            Some(_) => Ok(Item::Value(self.value()?)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn circuit(&mut self) -> Result<Circuit, ParseError> {
        self.expect('[')?;
        self.skip_ws();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Circuit::empty());
        }

        let mut items = vec![(self.pos, self.item()?)];
        let mut kind = None;
        loop {
            let sep_pos = self.pos;
            match self.sep()? {
                None => break,
                Some(s) if kind.is_some_and(|k| k != s) => {
                    return Err(ParseError::MixedSeparators { pos: sep_pos })
                }
                Some(s) => kind = Some(s),
            }
            self.skip_ws();
            items.push((self.pos, self.item()?));
        }
        self.expect(']')?;

        if kind == Some(Sep::Parallel) {
            items
                .into_iter()
                .map(|(pos, item)| match item {
                    Item::Group(c) => Ok(c),
                    Item::Value(_) => Err(ParseError::ValueInParallel { pos }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Circuit::Parallel)
        } else {
            Ok(Circuit::Series(
                items
                    .into_iter()
                    .map(|(_, item)| match item {
                        Item::Value(v) => Element::Resistor(v),
                        Item::Group(c) => Element::Branch(c),
                    })
                    .collect(),
            ))
        }
    }
}

impl FromStr for Circuit {
    type Err = ParseError;

    /// Parses the rendered form of a circuit.
    ///
    /// A group holding a single bracketed item, `[[a] || [b]]` wrapped once more, reads as a
    /// series holding one branch, which is how the search builds it.
    ///
    /// ```
    /// use resistor_combo::Circuit;
    ///
    /// let c: Circuit = "[10 - [[4K7] || [4K7]]]".parse().unwrap();
    /// assert!((c.resistance() - 2360.0).abs() < 1e-9);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut p = Parser { src: s, pos: 0 };
        let circuit = p.circuit()?;
        p.skip_ws();
        if p.pos != s.len() {
            return Err(ParseError::TrailingInput { pos: p.pos });
        }
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_the_search_builds() {
        let c = Circuit::empty()
            .with(Element::Resistor(10.0))
            .with(Element::Branch(Circuit::pair(20.0, 30.0)))
            .with(Element::Branch(Circuit::pair(1.5, 1e-3)));
        assert_eq!(c.to_string().parse::<Circuit>(), Ok(c));
    }

    #[test]
    fn single_branch_is_a_series_of_one() {
        let c: Circuit = "[[[10] || [20]]]".parse().unwrap();
        assert_eq!(
            c,
            Circuit::Series(vec![Element::Branch(Circuit::pair(10.0, 20.0))])
        );
    }

    #[test]
    fn accepts_loose_whitespace_and_notation() {
        let c: Circuit = " [ 1K-[ [2K2]||[2K2] ] ] ".parse().unwrap();
        assert!((c.resistance() - 2100.0).abs() < 1e-9);
    }

    #[test]
    fn exponent_sign_is_not_a_separator() {
        let c: Circuit = "[1e-3 - 2E+1]".parse().unwrap();
        assert!((c.resistance() - 20.001).abs() < 1e-12);
    }

    #[test]
    fn empty_circuit() {
        assert_eq!("[]".parse::<Circuit>(), Ok(Circuit::empty()));
    }

    #[test]
    fn rejects_mixed_separators() {
        assert_eq!(
            "[[1] || [2] - [3]]".parse::<Circuit>(),
            Err(ParseError::MixedSeparators { pos: 11 })
        );
    }

    #[test]
    fn rejects_bare_values_in_parallel() {
        assert_eq!(
            "[[1] || 2]".parse::<Circuit>(),
            Err(ParseError::ValueInParallel { pos: 8 })
        );
    }

    #[test]
    fn rejects_truncated_and_trailing_input() {
        assert_eq!("[1 - 2".parse::<Circuit>(), Err(ParseError::UnexpectedEnd));
        assert_eq!(
            "[1] x".parse::<Circuit>(),
            Err(ParseError::TrailingInput { pos: 4 })
        );
        assert!(matches!(
            "[1 - ohm]".parse::<Circuit>(),
            Err(ParseError::Value(_))
        ));
    }
}
