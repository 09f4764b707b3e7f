//! Interval domains with an undo trail.

use rosterforge_core::model::{CpModel, Literal};

/// Bounds beyond this magnitude are treated as unbounded.
pub(crate) const HORIZON: i64 = 1 << 48;

/// Raised when a domain becomes empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict;

pub(crate) type Propagation = Result<(), Conflict>;

#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    var: usize,
    lb: i64,
    ub: i64,
}

/// Current `[lb, ub]` of every variable.
///
/// Every narrowing is recorded so a search can undo back to any earlier
/// trail length. Narrowed variables are also queued in `touched` until the
/// propagation loop drains them.
#[derive(Debug, Clone)]
pub(crate) struct Domains {
    lb: Vec<i64>,
    ub: Vec<i64>,
    trail: Vec<TrailEntry>,
    touched: Vec<usize>,
}

impl Domains {
    pub(crate) fn new(model: &CpModel) -> Self {
        let lb = model
            .variables()
            .iter()
            .map(|v| v.lb.clamp(-HORIZON, HORIZON))
            .collect();
        let ub = model
            .variables()
            .iter()
            .map(|v| v.ub.clamp(-HORIZON, HORIZON))
            .collect();
        Self {
            lb,
            ub,
            trail: Vec::new(),
            touched: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lb.len()
    }

    /// True if some variable was declared with an empty domain.
    pub(crate) fn has_empty_domain(&self) -> bool {
        self.lb.iter().zip(&self.ub).any(|(lb, ub)| lb > ub)
    }

    #[inline]
    pub(crate) fn lb(&self, var: usize) -> i64 {
        self.lb[var]
    }

    #[inline]
    pub(crate) fn ub(&self, var: usize) -> i64 {
        self.ub[var]
    }

    #[inline]
    pub(crate) fn is_fixed(&self, var: usize) -> bool {
        self.lb[var] == self.ub[var]
    }

    pub(crate) fn lower_bounds(&self) -> &[i64] {
        &self.lb
    }

    pub(crate) fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Restores every domain to its state at trail length `len`.
    pub(crate) fn undo_to(&mut self, len: usize) {
        while self.trail.len() > len {
            if let Some(entry) = self.trail.pop() {
                self.lb[entry.var] = entry.lb;
                self.ub[entry.var] = entry.ub;
            }
        }
        self.touched.clear();
    }

    pub(crate) fn take_touched(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.touched)
    }

    fn save(&mut self, var: usize) {
        self.trail.push(TrailEntry {
            var,
            lb: self.lb[var],
            ub: self.ub[var],
        });
        self.touched.push(var);
    }

    pub(crate) fn set_lb(&mut self, var: usize, value: i64) -> Propagation {
        if value <= self.lb[var] {
            return Ok(());
        }
        if value > self.ub[var] {
            return Err(Conflict);
        }
        self.save(var);
        self.lb[var] = value;
        Ok(())
    }

    pub(crate) fn set_ub(&mut self, var: usize, value: i64) -> Propagation {
        if value >= self.ub[var] {
            return Ok(());
        }
        if value < self.lb[var] {
            return Err(Conflict);
        }
        self.save(var);
        self.ub[var] = value;
        Ok(())
    }

    /// `Some(truth)` once the literal's variable is fixed.
    #[inline]
    pub(crate) fn literal_value(&self, literal: Literal) -> Option<bool> {
        let var = literal.var().index();
        if self.is_fixed(var) {
            Some(literal.holds(self.lb[var]))
        } else {
            None
        }
    }

    /// Makes `literal` true.
    pub(crate) fn assert_literal(&mut self, literal: Literal) -> Propagation {
        let var = literal.var().index();
        let value = literal.satisfying_value();
        self.set_lb(var, value)?;
        self.set_ub(var, value)
    }
}
