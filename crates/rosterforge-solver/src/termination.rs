//! Search termination.

use std::time::{Duration, Instant};

use crate::backend::SearchLimits;

/// How many nodes pass between two clock checks.
const CHECK_INTERVAL: u64 = 256;

/// Stops a search on a time limit or a node limit, whichever comes first.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rosterforge_solver::{SearchLimits, Termination};
///
/// let limits = SearchLimits::new().with_node_limit(10);
/// let termination = Termination::start(&limits);
///
/// assert!(!termination.is_terminated(9));
/// assert!(termination.is_terminated(10));
/// ```
#[derive(Debug, Clone)]
pub struct Termination {
    started: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl Termination {
    /// Starts the clock for `limits`.
    pub fn start(limits: &SearchLimits) -> Self {
        Self {
            started: Instant::now(),
            time_limit: limits.time_limit,
            node_limit: limits.node_limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns true once a limit is reached after `nodes` decisions.
    ///
    /// The node limit is checked on every call, the clock only every few
    /// hundred nodes.
    pub fn is_terminated(&self, nodes: u64) -> bool {
        if self.node_limit.is_some_and(|limit| nodes >= limit) {
            return true;
        }
        if nodes % CHECK_INTERVAL != 0 {
            return false;
        }
        self.time_limit.is_some_and(|limit| self.elapsed() >= limit)
    }
}
