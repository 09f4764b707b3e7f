//! Backend-neutral constraint model.
//!
//! A [`CpModel`] is plain data: bounded integer and boolean variables, the
//! primitive constraints of [`Constraint`], and an optional linear objective to
//! minimize. Encoders register constraints on it; a backend consumes it.
//!
//! # Example
//!
//! ```
//! use rosterforge_core::model::{CpModel, LinearExpr};
//!
//! let mut model = CpModel::new("pick_two");
//! let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
//! model.add_equality(LinearExpr::sum(works.iter().copied()), 2);
//! model.minimize(LinearExpr::term(works[0], 3));
//!
//! let assignment = [0, 1, 1, 0];
//! assert!(model.check_assignment(&assignment).is_ok());
//! assert_eq!(model.objective_value(&assignment), Some(0));
//! ```

mod constraint;
mod expr;
mod var;


use std::fmt;

pub use constraint::{
    Constraint, ConstraintRef, Enforceable, Enforcement, LinearConstraint, Literals,
};
pub use expr::LinearExpr;
pub use var::{BoolVar, IntVar, Literal, VarId};

/// Declared domain and name of a model variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    pub lb: i64,
    pub ub: i64,
    pub is_bool: bool,
}

/// Why an assignment does not satisfy a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The assignment does not have one value per variable.
    Arity { expected: usize, actual: usize },
    /// A value lies outside its variable's declared domain.
    Domain { var: VarId, value: i64 },
    /// A constraint evaluates to false.
    Constraint { index: usize, kind: &'static str },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Arity { expected, actual } => {
                write!(f, "expected {} values, got {}", expected, actual)
            }
            Violation::Domain { var, value } => {
                write!(f, "value {} outside the domain of {:?}", value, var)
            }
            Violation::Constraint { index, kind } => {
                write!(f, "{} constraint #{} is violated", kind, index)
            }
        }
    }
}

/// A boolean/integer constraint model with a minimization objective.
#[derive(Debug, Clone, Default)]
pub struct CpModel {
    name: String,
    variables: Vec<VariableInfo>,
    pub(crate) constraints: Vec<Constraint>,
    objective: Option<LinearExpr>,
    hints: Vec<(VarId, i64)>,
}

impl CpModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        BoolVar(self.push_variable(name.into(), 0, 1, true))
    }

    /// Creates an integer variable with domain `[lb, ub]`.
    ///
    /// An empty domain (`lb > ub`) is accepted and makes the model infeasible.
    pub fn new_int_var(&mut self, lb: i64, ub: i64, name: impl Into<String>) -> IntVar {
        IntVar(self.push_variable(name.into(), lb, ub, false))
    }

    fn push_variable(&mut self, name: String, lb: i64, ub: i64, is_bool: bool) -> VarId {
        let id = VarId::from_index(self.variables.len());
        self.variables.push(VariableInfo {
            name,
            lb,
            ub,
            is_bool,
        });
        id
    }

    fn push(&mut self, constraint: Constraint) -> usize {
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }

    /// `lb <= expr <= ub`.
    pub fn add_linear(&mut self, expr: LinearExpr, lb: i64, ub: i64) -> Enforceable<'_> {
        let index = self.push(Constraint::Linear(LinearConstraint {
            expr,
            lb,
            ub,
            enforcement: Enforcement::new(),
        }));
        Enforceable::new(self, index)
    }

    pub fn add_equality(&mut self, expr: LinearExpr, value: i64) -> Enforceable<'_> {
        self.add_linear(expr, value, value)
    }

    pub fn add_less_or_equal(&mut self, expr: LinearExpr, ub: i64) -> Enforceable<'_> {
        self.add_linear(expr, i64::MIN, ub)
    }

    pub fn add_greater_or_equal(&mut self, expr: LinearExpr, lb: i64) -> Enforceable<'_> {
        self.add_linear(expr, lb, i64::MAX)
    }

    /// At least one of `literals` is true. An empty disjunction is unsatisfiable.
    pub fn add_bool_or(&mut self, literals: impl IntoIterator<Item = Literal>) -> ConstraintRef {
        ConstraintRef(self.push(Constraint::BoolOr(literals.into_iter().collect())))
    }

    pub fn add_at_least_one(&mut self, vars: impl IntoIterator<Item = BoolVar>) -> ConstraintRef {
        self.add_bool_or(vars.into_iter().map(BoolVar::literal))
    }

    pub fn add_implication(&mut self, premise: Literal, conclusion: Literal) -> ConstraintRef {
        ConstraintRef(self.push(Constraint::Implication {
            premise,
            conclusion,
        }))
    }

    pub fn add_bool_and(&mut self, literals: impl IntoIterator<Item = Literal>) -> Enforceable<'_> {
        let index = self.push(Constraint::BoolAnd {
            literals: literals.into_iter().collect(),
            enforcement: Enforcement::new(),
        });
        Enforceable::new(self, index)
    }

    /// `target == max(floor, exprs...)`.
    pub fn add_max_equality(
        &mut self,
        target: IntVar,
        exprs: impl IntoIterator<Item = IntVar>,
        floor: i64,
    ) -> ConstraintRef {
        ConstraintRef(self.push(Constraint::MaxEquality {
            target,
            exprs: exprs.into_iter().collect(),
            floor,
        }))
    }

    /// Sets the objective to minimize, replacing any previous one.
    pub fn minimize(&mut self, expr: LinearExpr) {
        self.objective = Some(expr);
    }

    pub fn objective(&self) -> Option<&LinearExpr> {
        self.objective.as_ref()
    }

    /// Suggests `value` for `var` as a starting point for the search.
    ///
    /// Hints never constrain the model. When a variable is hinted more than
    /// once the last hint wins.
    pub fn add_hint(&mut self, var: impl Into<IntVar>, value: i64) {
        self.hints.push((var.into().id(), value));
    }

    /// Every hint in the order it was given.
    pub fn hints(&self) -> &[(VarId, i64)] {
        &self.hints
    }

    pub fn clear_hints(&mut self) {
        self.hints.clear();
    }

    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> &VariableInfo {
        &self.variables[var.index()]
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Checks a full assignment (one value per variable) against every domain and constraint.
    pub fn check_assignment(&self, values: &[i64]) -> Result<(), Violation> {
        if values.len() != self.variables.len() {
            return Err(Violation::Arity {
                expected: self.variables.len(),
                actual: values.len(),
            });
        }
        for (index, (info, &value)) in self.variables.iter().zip(values).enumerate() {
            if value < info.lb || value > info.ub {
                return Err(Violation::Domain {
                    var: VarId::from_index(index),
                    value,
                });
            }
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            if !constraint.is_satisfied(values) {
                return Err(Violation::Constraint {
                    index,
                    kind: constraint.kind(),
                });
            }
        }
        Ok(())
    }

    /// The objective value of a full assignment, if an objective is set.
    pub fn objective_value(&self, values: &[i64]) -> Option<i64> {
        self.objective.as_ref().map(|o| o.evaluate(values))
    }
}
