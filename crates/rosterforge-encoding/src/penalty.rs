//! Penalty terms and the objective accumulator.

use rosterforge_core::model::{CpModel, IntVar, LinearExpr};

/// A non-negative cost variable and its weight in the objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyTerm {
    pub var: IntVar,
    pub coefficient: i64,
    /// Which rule and which excursion produced the term.
    pub label: String,
}

impl PenaltyTerm {
    pub fn new(var: impl Into<IntVar>, coefficient: i64, label: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            coefficient,
            label: label.into(),
        }
    }
}

/// Owns the running list of penalty terms during model assembly.
///
/// Consumed by [`finalize`](Self::finalize), so the objective is built exactly once.
#[derive(Debug, Default)]
pub struct ObjectiveBuilder {
    terms: Vec<PenaltyTerm>,
}

impl ObjectiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: PenaltyTerm) {
        self.terms.push(term);
    }

    pub fn extend(&mut self, terms: impl IntoIterator<Item = PenaltyTerm>) {
        self.terms.extend(terms);
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sets `Σ coefficient · var` as the objective to minimize and hands back the terms.
    pub fn finalize(self, model: &mut CpModel) -> Vec<PenaltyTerm> {
        let objective = LinearExpr::weighted_sum(self.terms.iter().map(|t| (t.var, t.coefficient)));
        model.minimize(objective);
        self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_sets_weighted_objective() {
        let mut model = CpModel::new("objective");
        let a = model.new_bool_var("a");
        let n = model.new_int_var(0, 4, "n");

        let mut builder = ObjectiveBuilder::new();
        builder.add(PenaltyTerm::new(a, 5, "a"));
        builder.extend([PenaltyTerm::new(n, 2, "n")]);
        assert_eq!(builder.len(), 2);

        let terms = builder.finalize(&mut model);
        assert_eq!(terms.len(), 2);
        assert_eq!(model.objective_value(&[1, 3]), Some(11));
    }

    #[test]
    fn test_empty_objective_is_zero() {
        let mut model = CpModel::new("objective");
        let terms = ObjectiveBuilder::new().finalize(&mut model);
        assert!(terms.is_empty());
        assert_eq!(model.objective_value(&[]), Some(0));
    }
}
