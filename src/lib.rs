//! A resistor combination finder for circuit design.
//!
//! Given a handful of resistors on hand and a resistance you need, it searches networks of up to
//! three elements in series, where each element is either a single resistor or two resistors in
//! parallel, and reports the network closest to the target.
//!
//! # Example
//! ```rust
//! extern crate resistor_combo;
//!
//! use resistor_combo::*;
//!
//! fn main() {
//!     let mut search = CircuitSearch::configure(vec![1000.0, 2200.0, 4700.0], 1500.0).unwrap();
//!     search.search();
//!
//!     let best = search.best_result().expect("Error: No circuit found");
//!     println!("Circuit: {:#}", best.circuit);
//!     println!("Total: {:.2}", best.total);
//!     println!("Error: {:.2}%", best.error_percent);
//! }
//! ```
//! Running this example produces:
//! ```text
//! Circuit: [[[2K2] || [4K7]]]
//! Total: 1498.55
//! Error: 0.10%
//! ```

pub mod circuit;
#[cfg(feature = "expr_input")]
mod expr_input;
pub mod nested;
pub mod notation;
pub mod parse;
pub mod search;

pub use circuit::{render, Circuit, Element};
pub use nested::{MalformedCircuit, NestedCircuit};
pub use parse::ParseError;
pub use search::{
    BestMatch, Candidate, CircuitSearch, Error, SearchStats, MAX_DEPTH, MAX_POOL_SIZE,
};
