//! Integer linear expressions.

use super::var::{IntVar, VarId};

/// `constant + Σ coefficient · variable`.
///
/// Terms are kept in insertion order; a variable may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(VarId, i64)>,
    constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: i64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// The sum of `vars`, each with coefficient 1.
    pub fn sum<V: Into<IntVar>>(vars: impl IntoIterator<Item = V>) -> Self {
        let terms = vars.into_iter().map(|v| (v.into().id(), 1)).collect();
        Self { terms, constant: 0 }
    }

    /// `Σ coefficient · variable` over `(variable, coefficient)` pairs.
    pub fn weighted_sum<V: Into<IntVar>>(pairs: impl IntoIterator<Item = (V, i64)>) -> Self {
        let terms = pairs
            .into_iter()
            .filter(|(_, c)| *c != 0)
            .map(|(v, c)| (v.into().id(), c))
            .collect();
        Self { terms, constant: 0 }
    }

    pub fn term(var: impl Into<IntVar>, coefficient: i64) -> Self {
        Self::new().plus(var, coefficient)
    }

    /// Adds `coefficient · var`; zero coefficients are dropped.
    pub fn plus(mut self, var: impl Into<IntVar>, coefficient: i64) -> Self {
        if coefficient != 0 {
            self.terms.push((var.into().id(), coefficient));
        }
        self
    }

    pub fn plus_constant(mut self, value: i64) -> Self {
        self.constant += value;
        self
    }

    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    pub fn constant_term(&self) -> i64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression under a full assignment indexed by variable,
    /// saturating instead of overflowing.
    pub fn evaluate(&self, values: &[i64]) -> i64 {
        self.terms.iter().fold(self.constant, |acc, &(var, c)| {
            acc.saturating_add(c.saturating_mul(values[var.index()]))
        })
    }
}
