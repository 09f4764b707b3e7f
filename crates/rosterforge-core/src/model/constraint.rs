//! Primitive constraints understood by every backend.

use smallvec::SmallVec;

use super::expr::LinearExpr;
use super::var::{IntVar, Literal};
use super::CpModel;

/// Literal list for disjunctions and conjunctions.
pub type Literals = SmallVec<[Literal; 8]>;

/// Enforcement literals: the constraint only has to hold when all of them are true.
pub type Enforcement = SmallVec<[Literal; 2]>;

/// `lb <= expr <= ub`, active only when every enforcement literal holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub lb: i64,
    pub ub: i64,
    pub enforcement: Enforcement,
}

/// A primitive constraint of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Linear(LinearConstraint),
    /// At least one literal is true.
    BoolOr(Literals),
    /// Every literal is true whenever all enforcement literals are true.
    BoolAnd {
        literals: Literals,
        enforcement: Enforcement,
    },
    /// `premise => conclusion`.
    Implication { premise: Literal, conclusion: Literal },
    /// `target == max(floor, exprs...)`.
    MaxEquality {
        target: IntVar,
        exprs: Vec<IntVar>,
        floor: i64,
    },
}

impl Constraint {
    /// Short name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Linear(_) => "linear",
            Constraint::BoolOr(_) => "bool_or",
            Constraint::BoolAnd { .. } => "bool_and",
            Constraint::Implication { .. } => "implication",
            Constraint::MaxEquality { .. } => "max_equality",
        }
    }

    /// Evaluates the constraint under a full assignment.
    pub fn is_satisfied(&self, values: &[i64]) -> bool {
        let lit = |l: &Literal| l.holds(values[l.var().index()]);
        match self {
            Constraint::Linear(c) => {
                if !c.enforcement.iter().all(lit) {
                    return true;
                }
                let v = c.expr.evaluate(values);
                c.lb <= v && v <= c.ub
            }
            Constraint::BoolOr(literals) => literals.iter().any(lit),
            Constraint::BoolAnd {
                literals,
                enforcement,
            } => !enforcement.iter().all(lit) || literals.iter().all(lit),
            Constraint::Implication {
                premise,
                conclusion,
            } => !lit(premise) || lit(conclusion),
            Constraint::MaxEquality {
                target,
                exprs,
                floor,
            } => {
                let max = exprs
                    .iter()
                    .map(|v| values[v.id().index()])
                    .fold(*floor, i64::max);
                values[target.id().index()] == max
            }
        }
    }
}

/// Index of a registered constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintRef(pub(crate) usize);

impl ConstraintRef {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A freshly added constraint that may still receive enforcement literals.
///
/// ```
/// use rosterforge_core::model::CpModel;
///
/// let mut model = CpModel::new("demo");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// let c = model.new_bool_var("c");
///
/// // c => (!a and !b)
/// model.add_bool_and([!a, !b]).only_enforce_if([c.literal()]);
/// assert_eq!(model.num_constraints(), 1);
/// ```
pub struct Enforceable<'m> {
    model: &'m mut CpModel,
    index: usize,
}

impl<'m> Enforceable<'m> {
    pub(crate) fn new(model: &'m mut CpModel, index: usize) -> Self {
        Self { model, index }
    }

    /// Makes the constraint conditional on all of `literals`.
    pub fn only_enforce_if(self, literals: impl IntoIterator<Item = Literal>) -> ConstraintRef {
        match &mut self.model.constraints[self.index] {
            Constraint::Linear(c) => c.enforcement.extend(literals),
            Constraint::BoolAnd { enforcement, .. } => enforcement.extend(literals),
            // Only linear and conjunction constraints are handed out as `Enforceable`.
            _ => {}
        }
        ConstraintRef(self.index)
    }

    pub fn constraint_ref(&self) -> ConstraintRef {
        ConstraintRef(self.index)
    }
}
