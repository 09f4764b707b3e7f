//! Constraint resolution: concrete bound tuples from layered overrides.

use rosterforge_config::PolicyDefaults;
use rosterforge_core::{BoundOverride, BoundTuple, ScheduleProblem};

/// Resolves a layered override against `default`, keeping the hard bounds in order.
///
/// `hard_max` is clamped down to `capacity`. If `hard_min` then exceeds it,
/// `hard_min` collapses onto `hard_max`. Soft bounds and costs are taken as
/// given; the encoders ignore soft bounds outside the hard band.
///
/// ```
/// use rosterforge_core::{BoundOverride, BoundTuple};
/// use rosterforge_encoding::resolve_bounds;
///
/// let default = BoundTuple::new(3, 6, 1, 0, 10, 8);
/// let layer = BoundOverride::new().with_hard_min(9);
///
/// let bounds = resolve_bounds(&layer, &default, 8);
/// assert_eq!((bounds.hard_min, bounds.hard_max), (8, 8));
/// ```
pub fn resolve_bounds(layer: &BoundOverride, default: &BoundTuple, capacity: u32) -> BoundTuple {
    let hard_max = layer.hard_max.unwrap_or(default.hard_max).min(capacity);
    let hard_min = layer.hard_min.unwrap_or(default.hard_min).min(hard_max);
    BoundTuple {
        hard_min,
        soft_min: layer.soft_min.unwrap_or(default.soft_min),
        min_cost: layer.min_cost.unwrap_or(default.min_cost),
        soft_max: layer.soft_max.unwrap_or(default.soft_max),
        hard_max,
        max_cost: layer.max_cost.unwrap_or(default.max_cost),
    }
}

/// Resolves the daily and weekly policies of a problem.
///
/// Daily layers, most specific first: the day's shift override for the
/// employee, the employee's policy for that day, the employee's daily
/// defaults, the global shift default. Weekly layers: the employee's weekly
/// policy, the global weekly default.
#[derive(Debug, Clone, Copy)]
pub struct PolicyResolver<'a> {
    problem: &'a ScheduleProblem,
    defaults: &'a PolicyDefaults,
}

impl<'a> PolicyResolver<'a> {
    pub fn new(problem: &'a ScheduleProblem, defaults: &'a PolicyDefaults) -> Self {
        Self { problem, defaults }
    }

    /// Layered daily override of `employee` on `day`.
    pub fn daily_layer(&self, employee: usize, day: usize) -> BoundOverride {
        let policy = self
            .problem
            .policy(employee)
            .map(|p| p.daily_for(day))
            .unwrap_or_default();
        match self.problem.days.get(day).and_then(|d| d.shift_override(employee)) {
            Some(shift) => shift.or(&policy),
            None => policy,
        }
    }

    /// Concrete shift-length bounds of `employee` on `day`, clamped to the day's hours.
    pub fn daily(&self, employee: usize, day: usize) -> BoundTuple {
        let capacity = self.problem.days.get(day).map_or(0, |d| d.hours);
        resolve_bounds(&self.daily_layer(employee, day), &self.defaults.shift, capacity)
    }

    /// Concrete total-hours bounds of `employee`, clamped to the published hours.
    pub fn weekly(&self, employee: usize) -> BoundTuple {
        let layer = self
            .problem
            .policy(employee)
            .map(|p| p.weekly)
            .unwrap_or_default();
        resolve_bounds(&layer, &self.defaults.weekly, self.problem.total_hours())
    }
}
