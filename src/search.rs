//! The bounded series/parallel search.

use itertools::Itertools;
use tracing::{debug, info, instrument, trace};

use crate::circuit::{Circuit, Element};

/// Maximum number of top-level elements in a candidate circuit.
pub const MAX_DEPTH: usize = 3;

/// Largest pool the `rcombo` shell accepts. The search itself has no hard limit, but its cost
/// grows steeply with the pool size.
pub const MAX_POOL_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Nothing was recorded because there were no resistors to combine.
    #[error("no resistors to combine")]
    EmptyPool,

    #[error("target resistance is zero, error percentage is undefined")]
    ZeroTarget,

    #[error("search has not been run")]
    NotSearched,

    #[error("resistor {index} has value {value}, values must be positive and finite")]
    InvalidResistance { index: usize, value: f64 },

    #[error("target {0} must be finite and not negative")]
    InvalidTarget(f64),
}

/// Counters for the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidate circuits evaluated.
    pub evaluated: usize,
    /// Times the best match was replaced.
    pub improvements: usize,
}

/// A circuit evaluated during the search, as seen by [`CircuitSearch::search_with`].
#[derive(Debug)]
pub struct Candidate<'a> {
    pub circuit: &'a Circuit,
    pub total: f64,
    pub error: f64,
    /// Lowest error recorded so far, including this candidate.
    pub best_error: f64,
}

/// The closest circuit found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub circuit: Circuit,
    /// Equivalent resistance of `circuit`.
    pub total: f64,
    /// Absolute difference between `total` and the target.
    pub error: f64,
    /// `error` as a percentage of the target.
    pub error_percent: f64,
}

#[derive(Debug, Clone)]
struct Record {
    circuit: Circuit,
    total: f64,
    error: f64,
}

/// Working state of one search. Created when a search starts and consumed when it returns.
struct SearchState {
    target: f64,
    best: Option<Record>,
    stats: SearchStats,
}

impl SearchState {
    fn new(target: f64) -> Self {
        SearchState {
            target,
            best: None,
            stats: SearchStats::default(),
        }
    }

    fn best_error(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |b| b.error)
    }

    fn record<F: FnMut(&Candidate)>(&mut self, circuit: &Circuit, observer: &mut F) {
        let total = circuit.resistance();
        let error = (total - self.target).abs();
        self.stats.evaluated += 1;
        trace!(%circuit, total, error, "evaluated candidate");

        // Strict: on a tie the earlier circuit stays.
        if error < self.best_error() {
            debug!(%circuit, total, error, "new best match");
            self.stats.improvements += 1;
            self.best = Some(Record {
                circuit: circuit.clone(),
                total,
                error,
            });
        }

        observer(&Candidate {
            circuit,
            total,
            error,
            best_error: self.best_error(),
        });
    }

    fn expand<F: FnMut(&Candidate)>(
        &mut self,
        available: &[f64],
        circuit: &Circuit,
        depth: usize,
        observer: &mut F,
    ) {
        if !circuit.is_empty() {
            self.record(circuit, observer);
        }
        if depth >= MAX_DEPTH {
            return;
        }

        for (i, &r) in available.iter().enumerate() {
            let next = circuit.with(Element::Resistor(r));
            self.expand(&available[i + 1..], &next, depth + 1, observer);
        }

        if available.len() < 2 {
            return;
        }
        for (i, j) in (0..available.len()).tuple_combinations() {
            let (r1, r2) = (available[i], available[j]);
            // Drops position `i`, but every entry equal in value to `r2`.
            let remaining = available
                .iter()
                .enumerate()
                .filter(|&(k, &r)| k != i && r != r2)
                .map(|(_, &r)| r)
                .collect::<Vec<f64>>();
            let next = circuit.with(Element::Branch(Circuit::pair(r1, r2)));
            self.expand(&remaining, &next, depth + 1, observer);
        }
    }
}

/// Searches series/parallel combinations of a resistor pool for the closest match to a target.
///
/// ```
/// use resistor_combo::CircuitSearch;
///
/// let mut search = CircuitSearch::configure(vec![220.0, 330.0, 470.0], 150.0).unwrap();
/// search.search();
/// let best = search.best_result().unwrap();
/// println!("{} = {:.2} ({:.2}%)", best.circuit, best.total, best.error_percent);
/// ```
#[derive(Debug)]
pub struct CircuitSearch {
    pool: Vec<f64>,
    target: f64,
    best: Option<Record>,
    stats: SearchStats,
    searched: bool,
}

impl CircuitSearch {
    /// Creates a search over `pool` for `target`. The pool is sorted ascending, duplicates are
    /// kept and treated as separate parts.
    ///
    /// An empty pool is accepted; searching it records nothing and [`best_result`] reports
    /// [`Error::EmptyPool`].
    ///
    /// # Errors
    ///
    /// Fails if a pool value is not positive and finite, or the target is negative or not
    /// finite.
    ///
    /// [`best_result`]: CircuitSearch::best_result
    pub fn configure(pool: impl IntoIterator<Item = f64>, target: f64) -> Result<Self, Error> {
        let mut pool = pool.into_iter().collect::<Vec<f64>>();
        if let Some((index, &value)) = pool
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(Error::InvalidResistance { index, value });
        }
        if !(target.is_finite() && target >= 0.0) {
            return Err(Error::InvalidTarget(target));
        }
        pool.sort_by(f64::total_cmp);

        Ok(CircuitSearch {
            pool,
            target,
            best: None,
            stats: SearchStats::default(),
            searched: false,
        })
    }

    /// The pool in the order the search visits it.
    pub fn pool(&self) -> &[f64] {
        &self.pool
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Runs the search, replacing the result of any previous run.
    pub fn search(&mut self) {
        self.search_with(|_| {})
    }

    /// Runs the search, calling `observer` for every candidate in the order it is evaluated.
    ///
    /// Candidates are built depth first, at most [`MAX_DEPTH`] elements deep. At every level
    /// each remaining resistor is first tried as a series extension, then each pair of
    /// remaining resistors as a parallel branch.
    #[instrument(skip_all, fields(pool = self.pool.len(), target = self.target))]
    pub fn search_with(&mut self, mut observer: impl FnMut(&Candidate)) {
        let mut state = SearchState::new(self.target);
        state.expand(&self.pool, &Circuit::empty(), 0, &mut observer);

        match &state.best {
            Some(b) => info!(
                evaluated = state.stats.evaluated,
                circuit = %b.circuit,
                total = b.total,
                error = b.error,
                "search finished"
            ),
            None => info!("search finished without a candidate"),
        }

        self.best = state.best;
        self.stats = state.stats;
        self.searched = true;
    }

    /// The best circuit found, if any, without computing the error percentage.
    pub fn best_circuit(&self) -> Option<&Circuit> {
        self.best.as_ref().map(|b| &b.circuit)
    }

    /// Returns the closest circuit found by the last search.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSearched`] before [`search`](CircuitSearch::search) has run
    /// - [`Error::EmptyPool`] if the pool was empty, so no circuit exists
    /// - [`Error::ZeroTarget`] if the target is zero and the percentage is undefined
    pub fn best_result(&self) -> Result<BestMatch, Error> {
        if !self.searched {
            return Err(Error::NotSearched);
        }
        let best = self.best.as_ref().ok_or(Error::EmptyPool)?;
        if self.target == 0.0 {
            return Err(Error::ZeroTarget);
        }
        Ok(BestMatch {
            circuit: best.circuit.clone(),
            total: best.total,
            error: best.error,
            error_percent: best.error / self.target * 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pool: &[f64], target: f64) -> CircuitSearch {
        let mut s = CircuitSearch::configure(pool.iter().cloned(), target).unwrap();
        s.search();
        s
    }

    fn candidates(pool: &[f64], target: f64) -> Vec<(Circuit, f64)> {
        let mut s = CircuitSearch::configure(pool.iter().cloned(), target).unwrap();
        let mut seen = Vec::new();
        s.search_with(|c| seen.push((c.circuit.clone(), c.total)));
        seen
    }

    #[test]
    fn pool_is_sorted_and_kept_whole() {
        let s = CircuitSearch::configure(vec![47.0, 10.0, 22.0, 10.0], 30.0).unwrap();
        assert_eq!(s.pool(), &[10.0, 10.0, 22.0, 47.0]);
    }

    #[test]
    fn exact_single_resistor() {
        let best = run(&[100.0], 100.0).best_result().unwrap();
        assert_eq!(best.circuit.to_string(), "[100]");
        assert_eq!(best.total, 100.0);
        assert_eq!(best.error_percent, 0.0);
    }

    #[test]
    fn single_resistor_pool_yields_one_candidate() {
        let seen = candidates(&[100.0], 100.0);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn two_resistor_pool_candidates_in_order() {
        let seen = candidates(&[20.0, 10.0], 15.0)
            .into_iter()
            .map(|(c, _)| c.to_string())
            .collect::<Vec<_>>();
        assert_eq!(seen, ["[10]", "[10 - 20]", "[20]", "[[[10] || [20]]]"]);
    }

    #[test]
    fn parallel_pair_beats_series_pair() {
        let seen = candidates(&[10.0, 20.0], 15.0);
        let series = seen.iter().find(|(c, _)| c.to_string() == "[10 - 20]").unwrap();
        let parallel = seen
            .iter()
            .find(|(c, _)| c.to_string() == "[[[10] || [20]]]")
            .unwrap();
        assert_eq!(series.1, 30.0);
        assert!((parallel.1 - 20.0 / 3.0).abs() < 1e-9);
        assert!((parallel.1 - 15.0).abs() < (series.1 - 15.0).abs());
    }

    #[test]
    fn ties_keep_the_first_circuit() {
        // [4] and [6] are both 1 away from 5
        let s = run(&[6.0, 4.0], 5.0);
        let best = s.best_result().unwrap();
        assert_eq!(best.circuit.to_string(), "[4]");
        assert_eq!(best.error, 1.0);
        assert!((best.error_percent - 20.0).abs() < 1e-9);
        assert_eq!(s.stats().improvements, 1);
    }

    #[test]
    fn empty_pool_has_no_result() {
        let s = run(&[], 10.0);
        assert_eq!(s.best_result(), Err(Error::EmptyPool));
        assert_eq!(s.best_circuit(), None);
        assert_eq!(s.stats().evaluated, 0);
    }

    #[test]
    fn zero_target_percentage_is_an_error() {
        let s = run(&[10.0, 20.0], 0.0);
        assert_eq!(s.best_result(), Err(Error::ZeroTarget));
        assert!(s.best_circuit().is_some());
    }

    #[test]
    fn result_requires_a_search() {
        let s = CircuitSearch::configure(vec![10.0], 10.0).unwrap();
        assert_eq!(s.best_result(), Err(Error::NotSearched));
    }

    #[test]
    fn rejects_non_physical_values() {
        assert_eq!(
            CircuitSearch::configure(vec![10.0, 0.0], 5.0).unwrap_err(),
            Error::InvalidResistance {
                index: 1,
                value: 0.0
            }
        );
        assert!(CircuitSearch::configure(vec![-1.0], 5.0).is_err());
        assert!(CircuitSearch::configure(vec![f64::NAN], 5.0).is_err());
        assert_eq!(
            CircuitSearch::configure(vec![10.0], -5.0).unwrap_err(),
            Error::InvalidTarget(-5.0)
        );
        assert!(CircuitSearch::configure(vec![10.0], f64::INFINITY).is_err());
    }

    #[test]
    fn duplicate_values_are_removed_together() {
        // the pair takes two of the 10s, the value match drops the third
        let seen = candidates(&[10.0, 10.0, 10.0], 100.0);
        for (c, _) in &seen {
            if let Circuit::Series(els) = c {
                if matches!(els.first(), Some(Element::Branch(_))) {
                    assert_eq!(els.len(), 1, "{}", c);
                }
            }
        }

        let distinct = candidates(&[10.0, 11.0, 12.0], 100.0);
        assert!(distinct
            .iter()
            .any(|(c, _)| c.to_string() == "[[[10] || [11]] - 12]"));
    }

    #[test]
    fn rerun_replaces_previous_result() {
        let mut s = run(&[10.0, 20.0], 30.0);
        let first = s.best_result().unwrap();
        s.search();
        assert_eq!(s.best_result().unwrap(), first);
        assert_eq!(s.stats().improvements, 2);
    }
}
