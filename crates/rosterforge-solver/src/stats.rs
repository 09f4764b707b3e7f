//! Search statistics.

use std::time::Duration;

/// Counters collected during one backend run.
///
/// # Example
///
/// ```
/// use rosterforge_solver::SearchStats;
///
/// let mut stats = SearchStats::default();
/// stats.record_node();
/// stats.record_node();
/// stats.record_conflict();
///
/// assert_eq!(stats.nodes, 2);
/// assert_eq!(stats.conflicts, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Decisions taken.
    pub nodes: u64,
    /// Propagation failures.
    pub conflicts: u64,
    /// Improving solutions found.
    pub solutions: u64,
    /// Searches abandoned at their conflict budget and started over.
    pub restarts: u64,
    /// Wall-clock time spent in the backend.
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn record_node(&mut self) {
        self.nodes += 1;
    }

    pub fn record_conflict(&mut self) {
        self.conflicts += 1;
    }

    pub fn record_solution(&mut self) {
        self.solutions += 1;
    }

    pub fn record_restart(&mut self) {
        self.restarts += 1;
    }

    /// Returns the nodes per second rate.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.nodes as f64 / secs
        } else {
            0.0
        }
    }
}
