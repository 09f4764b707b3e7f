//! Solve status and reported assignments.

use std::fmt;

use rosterforge_core::model::{BoolVar, IntVar, LinearExpr};
use serde::{Deserialize, Serialize};

use crate::stats::SearchStats;

/// Outcome class of a backend run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// A solution was found and proven optimal.
    Optimal,
    /// A solution was found but the search stopped before proving optimality.
    Feasible,
    /// The model was proven to have no solution.
    Infeasible,
    /// The search stopped before finding a solution or proving there is none.
    Unknown,
}

impl SolveStatus {
    /// Returns true for the two statuses that carry an assignment.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Returns the status as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a backend reports for one model.
///
/// `values` holds one value per model variable when the status has a
/// solution and is empty otherwise.
#[derive(Debug, Clone)]
pub struct CpSolution {
    pub status: SolveStatus,
    pub values: Vec<i64>,
    pub objective_value: Option<i64>,
    pub stats: SearchStats,
}

impl CpSolution {
    /// A solution-less outcome.
    pub fn without_assignment(status: SolveStatus, stats: SearchStats) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: None,
            stats,
        }
    }

    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }

    /// Value of `var` in the winning assignment.
    pub fn value(&self, var: impl Into<IntVar>) -> Option<i64> {
        self.values.get(var.into().id().index()).copied()
    }

    /// Truth value of `var` in the winning assignment.
    pub fn boolean_value(&self, var: BoolVar) -> Option<bool> {
        self.value(var).map(|v| v != 0)
    }

    /// Evaluates `expr` against the winning assignment.
    pub fn evaluate(&self, expr: &LinearExpr) -> Option<i64> {
        if !self.has_solution() {
            return None;
        }
        Some(expr.evaluate(&self.values))
    }
}
