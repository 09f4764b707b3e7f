//! Greedy starting schedules, handed to the backend as search hints.
//!
//! The construction staffs each day hour by hour: an uncovered hour opens a
//! fresh shift for the employee furthest below their weekly minimum, or
//! stretches a shift already on that day. Employees still short of their
//! weekly minimum afterwards have their shifts lengthened or get new ones.
//! The result respects shift and weekly hard bounds by construction but may
//! leave hours uncovered when no employee can take them.

use std::cmp::Reverse;

use rosterforge_core::model::CpModel;
use rosterforge_core::{BoundTuple, ScheduleProblem};
use tracing::debug;

use crate::assembler::ResolvedPolicies;
use crate::grid::ScheduleGrid;

/// One contiguous block of working hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub start: usize,
    pub len: usize,
}

impl Shift {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn covers(&self, hour: usize) -> bool {
        self.start <= hour && hour < self.end()
    }
}

/// A tentative schedule with at most one shift per employee and day.
///
/// # Example
///
/// ```
/// use rosterforge_config::PolicyDefaults;
/// use rosterforge_core::{BookingRequirement, BoundTuple, Day, ScheduleProblem};
/// use rosterforge_encoding::{GreedySchedule, ModelAssembler};
///
/// let problem = ScheduleProblem::new(2, vec![Day::new(8)])
///     .with_booking(BookingRequirement::new(0, 5, 2));
/// let defaults = PolicyDefaults::new(BoundTuple::hard(2, 6), BoundTuple::hard(0, 8));
/// let policies = ModelAssembler::compile(&problem, &defaults).unwrap().policies;
///
/// let schedule = GreedySchedule::build(&problem, &policies);
/// assert_eq!(schedule.uncovered(&problem), 0);
/// assert_eq!(schedule.headcount(0, 5), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreedySchedule {
    /// Indexed by `[employee][day]`.
    shifts: Vec<Vec<Option<Shift>>>,
    totals: Vec<usize>,
}

impl GreedySchedule {
    /// Builds a schedule for `problem` under its resolved `policies`.
    pub fn build(problem: &ScheduleProblem, policies: &ResolvedPolicies) -> Self {
        let mut schedule = Self {
            shifts: vec![vec![None; problem.day_count()]; problem.employees],
            totals: vec![0; problem.employees],
        };

        for (d, day) in problem.days.iter().enumerate() {
            let hours = day.hours as usize;
            let demand = demand(problem, d, hours);
            let mut from = 0;
            while let Some(h) = (from..hours).find(|&h| schedule.headcount(d, h) < demand[h]) {
                if !schedule.open_shift(policies, d, h, hours)
                    && !schedule.stretch_shift(policies, d, h)
                {
                    from = h + 1;
                }
            }
        }

        for e in 0..problem.employees {
            schedule.top_up(problem, policies, e);
        }

        debug!(
            event = "greedy_schedule",
            employees = problem.employees,
            days = problem.day_count(),
            uncovered = schedule.uncovered(problem),
        );
        schedule
    }

    pub fn shift(&self, employee: usize, day: usize) -> Option<Shift> {
        self.shifts.get(employee)?.get(day).copied().flatten()
    }

    /// Hours `employee` works across every day.
    pub fn total(&self, employee: usize) -> usize {
        self.totals.get(employee).copied().unwrap_or(0)
    }

    pub fn headcount(&self, day: usize, hour: usize) -> usize {
        self.shifts
            .iter()
            .filter_map(|days| days.get(day).copied().flatten())
            .filter(|s| s.covers(hour))
            .count()
    }

    /// Number of slots staffed below their required headcount.
    pub fn uncovered(&self, problem: &ScheduleProblem) -> usize {
        problem
            .days
            .iter()
            .enumerate()
            .map(|(d, day)| {
                let hours = day.hours as usize;
                let demand = demand(problem, d, hours);
                (0..hours).filter(|&h| self.headcount(d, h) < demand[h]).count()
            })
            .sum()
    }

    /// Hints every work indicator of `grid` with this schedule.
    pub fn apply_hints(&self, model: &mut CpModel, grid: &ScheduleGrid) {
        for e in 0..grid.employees() {
            for d in 0..grid.day_count() {
                let shift = self.shift(e, d);
                for (h, work) in grid.day_works(e, d).into_iter().enumerate() {
                    let value = shift.is_some_and(|s| s.covers(h));
                    model.add_hint(work, i64::from(value));
                }
            }
        }
    }

    fn assign(&mut self, employee: usize, day: usize, shift: Shift) {
        let previous = self.shifts[employee][day].map_or(0, |s| s.len);
        self.totals[employee] = self.totals[employee] - previous + shift.len;
        self.shifts[employee][day] = Some(shift);
    }

    /// Hours `employee` may still add before the weekly hard maximum.
    fn room(&self, policies: &ResolvedPolicies, employee: usize) -> usize {
        (policies.weekly[employee].hard_max as usize).saturating_sub(self.totals[employee])
    }

    /// Opens a shift covering `hour` for an employee idle on `day`.
    fn open_shift(
        &mut self,
        policies: &ResolvedPolicies,
        day: usize,
        hour: usize,
        hours: usize,
    ) -> bool {
        let candidate = (0..self.shifts.len())
            .filter(|&e| self.shifts[e][day].is_none())
            .filter_map(|e| {
                let longest = (policies.daily[e][day].hard_max as usize)
                    .min(hours)
                    .min(self.room(policies, e));
                let len = fitting_length(&policies.daily[e][day], longest)?;
                Some((e, len))
            })
            .max_by_key(|&(e, _)| {
                let weekly_min = policies.weekly[e].hard_min as usize;
                (
                    weekly_min.saturating_sub(self.totals[e]),
                    self.room(policies, e),
                    Reverse(e),
                )
            });

        match candidate {
            Some((e, len)) => {
                let start = hour.min(hours - len);
                self.assign(e, day, Shift { start, len });
                true
            }
            None => false,
        }
    }

    /// Stretches the shift needing the fewest extra hours to reach `hour`.
    fn stretch_shift(&mut self, policies: &ResolvedPolicies, day: usize, hour: usize) -> bool {
        let candidate = (0..self.shifts.len())
            .filter_map(|e| {
                let shift = self.shifts[e][day]?;
                if shift.covers(hour) {
                    return None;
                }
                let start = shift.start.min(hour);
                let len = shift.end().max(hour + 1) - start;
                let extra = len - shift.len;
                let fits = len <= policies.daily[e][day].hard_max as usize
                    && extra <= self.room(policies, e);
                fits.then_some((e, Shift { start, len }, extra))
            })
            .min_by_key(|&(e, _, extra)| (extra, e));

        match candidate {
            Some((e, shift, _)) => {
                self.assign(e, day, shift);
                true
            }
            None => false,
        }
    }

    /// Adds hours to `employee` until the weekly target is reached or nothing fits.
    fn top_up(&mut self, problem: &ScheduleProblem, policies: &ResolvedPolicies, employee: usize) {
        let weekly = policies.weekly[employee];
        let mut target = weekly.hard_min;
        if weekly.penalizes_shortfall() {
            target = target.max(weekly.soft_min);
        }
        let target = target.min(weekly.hard_max) as usize;

        for (d, day) in problem.days.iter().enumerate() {
            let missing = target.saturating_sub(self.totals[employee]);
            if missing == 0 {
                return;
            }
            let Some(shift) = self.shifts[employee][d] else {
                continue;
            };
            let hours = day.hours as usize;
            let longest = (policies.daily[employee][d].hard_max as usize).min(hours);
            let grow = missing.min(longest.saturating_sub(shift.len));
            let right = grow.min(hours - shift.end());
            let left = (grow - right).min(shift.start);
            self.assign(
                employee,
                d,
                Shift {
                    start: shift.start - left,
                    len: shift.len + right + left,
                },
            );
        }

        for (d, day) in problem.days.iter().enumerate() {
            let missing = target.saturating_sub(self.totals[employee]);
            if missing == 0 {
                return;
            }
            if self.shifts[employee][d].is_some() {
                continue;
            }
            let bounds = &policies.daily[employee][d];
            let longest = (bounds.hard_max as usize)
                .min(day.hours as usize)
                .min(self.room(policies, employee));
            let lowest = (bounds.hard_min as usize).max(1);
            if longest < lowest {
                continue;
            }
            let len = missing.clamp(lowest, longest);
            self.assign(employee, d, Shift { start: 0, len });
        }
    }
}

/// Required headcount of every hour of `day`: one, or the largest booking.
fn demand(problem: &ScheduleProblem, day: usize, hours: usize) -> Vec<usize> {
    let mut demand = vec![1; hours];
    for booking in problem.bookings.iter().filter(|b| b.day == day) {
        if let Some(slot) = demand.get_mut(booking.hour as usize) {
            *slot = (*slot).max(booking.min_count as usize);
        }
    }
    demand
}

/// A shift length within the soft band of `bounds` where possible, no longer
/// than `longest`. `None` when even the shortest admissible shift does not fit.
fn fitting_length(bounds: &BoundTuple, longest: usize) -> Option<usize> {
    let lowest = (bounds.hard_min as usize).max(1);
    if longest < lowest {
        return None;
    }
    let mut preferred = bounds.hard_max as usize;
    if bounds.penalizes_excess() {
        preferred = preferred.min(bounds.soft_max as usize);
    }
    if bounds.penalizes_shortfall() {
        preferred = preferred.max(bounds.soft_min as usize);
    }
    Some(preferred.clamp(lowest, longest))
}

#[cfg(test)]
#[path = "hint_tests.rs"]
mod tests;
