//! Bounds propagators compiled from model constraints.

use std::collections::BTreeMap;

use rosterforge_core::model::{Constraint, CpModel, LinearExpr, Literal};

use super::domains::{Conflict, Domains, Propagation, HORIZON};

#[derive(Debug, Clone)]
pub(crate) enum Propagator {
    /// `lb <= Σ c·x <= ub` whenever every enforcement literal holds.
    Linear {
        terms: Vec<(usize, i64)>,
        lb: i64,
        ub: i64,
        enforcement: Vec<Literal>,
    },
    /// At least one literal holds.
    Clause(Vec<Literal>),
    /// `target == max(floor, vars...)`.
    Max {
        target: usize,
        vars: Vec<usize>,
        floor: i64,
    },
}

impl Propagator {
    /// Lowers a model constraint to one or more propagators.
    pub(crate) fn compile(constraint: &Constraint, out: &mut Vec<Propagator>) {
        match constraint {
            Constraint::Linear(c) => out.push(Self::linear(
                &c.expr,
                c.lb,
                c.ub,
                c.enforcement.iter().copied().collect(),
            )),
            Constraint::BoolOr(literals) => out.push(Propagator::Clause(literals.to_vec())),
            Constraint::BoolAnd {
                literals,
                enforcement,
            } => {
                for &literal in literals {
                    let clause = enforcement
                        .iter()
                        .map(|&e| !e)
                        .chain(std::iter::once(literal))
                        .collect();
                    out.push(Propagator::Clause(clause));
                }
            }
            Constraint::Implication {
                premise,
                conclusion,
            } => out.push(Propagator::Clause(vec![!*premise, *conclusion])),
            Constraint::MaxEquality {
                target,
                exprs,
                floor,
            } => out.push(Propagator::Max {
                target: target.id().index(),
                vars: exprs.iter().map(|v| v.id().index()).collect(),
                floor: *floor,
            }),
        }
    }

    /// Linear propagator with duplicate variables merged and the constant
    /// folded into the bounds.
    pub(crate) fn linear(
        expr: &LinearExpr,
        lb: i64,
        ub: i64,
        enforcement: Vec<Literal>,
    ) -> Propagator {
        let mut merged: BTreeMap<usize, i64> = BTreeMap::new();
        for &(var, c) in expr.terms() {
            *merged.entry(var.index()).or_insert(0) += c;
        }
        let terms = merged.into_iter().filter(|&(_, c)| c != 0).collect();
        let constant = expr.constant_term();
        Propagator::Linear {
            terms,
            lb: lb.saturating_sub(constant).clamp(-HORIZON, HORIZON),
            ub: ub.saturating_sub(constant).clamp(-HORIZON, HORIZON),
            enforcement,
        }
    }

    /// Variables whose bound changes may enable new deductions.
    pub(crate) fn watched(&self) -> Vec<usize> {
        match self {
            Propagator::Linear {
                terms, enforcement, ..
            } => terms
                .iter()
                .map(|&(v, _)| v)
                .chain(enforcement.iter().map(|l| l.var().index()))
                .collect(),
            Propagator::Clause(literals) => literals.iter().map(|l| l.var().index()).collect(),
            Propagator::Max { target, vars, .. } => {
                std::iter::once(*target).chain(vars.iter().copied()).collect()
            }
        }
    }

    pub(crate) fn propagate(&self, domains: &mut Domains) -> Propagation {
        match self {
            Propagator::Linear {
                terms,
                lb,
                ub,
                enforcement,
            } => propagate_linear(terms, *lb, *ub, enforcement, domains),
            Propagator::Clause(literals) => propagate_clause(literals, domains),
            Propagator::Max {
                target,
                vars,
                floor,
            } => propagate_max(*target, vars, *floor, domains),
        }
    }

    /// Tightens the upper bound of a linear propagator (used for objective cuts).
    pub(crate) fn tighten_upper(&mut self, bound: i64) {
        if let Propagator::Linear { ub, .. } = self {
            *ub = (*ub).min(bound);
        }
    }
}

fn term_range(domains: &Domains, var: usize, c: i64) -> (i64, i64) {
    let (lo, hi) = (
        c.saturating_mul(domains.lb(var)),
        c.saturating_mul(domains.ub(var)),
    );
    if c > 0 {
        (lo, hi)
    } else {
        (hi, lo)
    }
}

fn propagate_linear(
    terms: &[(usize, i64)],
    lb: i64,
    ub: i64,
    enforcement: &[Literal],
    domains: &mut Domains,
) -> Propagation {
    let mut pending = None;
    let mut unfixed = 0;
    for &literal in enforcement {
        match domains.literal_value(literal) {
            Some(false) => return Ok(()),
            Some(true) => {}
            None => {
                unfixed += 1;
                pending = Some(literal);
            }
        }
    }

    let (min_sum, max_sum) = terms.iter().fold((0i64, 0i64), |(lo, hi), &(v, c)| {
        let (tlo, thi) = term_range(domains, v, c);
        (lo.saturating_add(tlo), hi.saturating_add(thi))
    });
    let violated = min_sum > ub || max_sum < lb;

    if unfixed > 0 {
        // With a single open enforcement literal a violated body refutes it.
        if let (true, 1, Some(literal)) = (violated, unfixed, pending) {
            return domains.assert_literal(!literal);
        }
        return Ok(());
    }
    if violated {
        return Err(Conflict);
    }

    for &(var, c) in terms {
        let (tlo, thi) = term_range(domains, var, c);
        let upper = ub.saturating_sub(min_sum.saturating_sub(tlo));
        let lower = lb.saturating_sub(max_sum.saturating_sub(thi));
        if c > 0 {
            domains.set_ub(var, floor_div(upper, c))?;
            domains.set_lb(var, ceil_div(lower, c))?;
        } else {
            domains.set_lb(var, ceil_div(upper, c))?;
            domains.set_ub(var, floor_div(lower, c))?;
        }
    }
    Ok(())
}

fn propagate_clause(literals: &[Literal], domains: &mut Domains) -> Propagation {
    let mut open = None;
    for &literal in literals {
        match domains.literal_value(literal) {
            Some(true) => return Ok(()),
            Some(false) => {}
            None if open.is_some() => return Ok(()),
            None => open = Some(literal),
        }
    }
    match open {
        Some(literal) => domains.assert_literal(literal),
        None => Err(Conflict),
    }
}

fn propagate_max(target: usize, vars: &[usize], floor: i64, domains: &mut Domains) -> Propagation {
    let lower = vars.iter().map(|&v| domains.lb(v)).fold(floor, i64::max);
    let upper = vars.iter().map(|&v| domains.ub(v)).fold(floor, i64::max);
    domains.set_lb(target, lower)?;
    domains.set_ub(target, upper)?;

    let cap = domains.ub(target);
    for &var in vars {
        domains.set_ub(var, cap)?;
    }

    let need = domains.lb(target);
    if need > floor {
        let mut supports = 0;
        let mut last = None;
        for &var in vars {
            if domains.ub(var) >= need {
                supports += 1;
                last = Some(var);
            }
        }
        match (supports, last) {
            (0, _) => return Err(Conflict),
            (1, Some(only)) => domains.set_lb(only, need)?,
            _ => {}
        }
    }
    Ok(())
}

pub(crate) fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

pub(crate) fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) == (b < 0)) {
        q + 1
    } else {
        q
    }
}
