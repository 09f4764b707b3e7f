//! The contract between the model assembler and a solver backend.

use std::time::Duration;

use rosterforge_config::SolverConfig;
use rosterforge_core::CpModel;

use crate::status::CpSolution;

/// Limits handed to a backend for one run.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
}

impl SearchLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits taken from a solver configuration, with the default time budget.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            time_limit: Some(config.effective_time_limit()),
            node_limit: config.node_limit(),
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }
}

/// A solver for [`CpModel`]s.
///
/// Implementations minimize the model objective (if any) within `limits` and
/// report the best assignment found together with a status:
/// - `Optimal`/`Infeasible` when the search was exhaustive,
/// - `Feasible`/`Unknown` when a limit stopped it.
pub trait ConstraintSolver: Send {
    fn solve(&mut self, model: &CpModel, limits: &SearchLimits) -> CpSolution;

    /// Short backend name for logs.
    fn name(&self) -> &'static str {
        "unnamed"
    }
}

impl<T: ConstraintSolver + ?Sized> ConstraintSolver for Box<T> {
    fn solve(&mut self, model: &CpModel, limits: &SearchLimits) -> CpSolution {
        (**self).solve(model, limits)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
