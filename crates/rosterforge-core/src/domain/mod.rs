//! Scheduling domain: days, employee policies and booking requirements.
//!
//! A [`ScheduleProblem`] is the validated, solver-independent description of
//! one scheduling request. It is immutable once built; every model compiled
//! from it is a fresh, independent unit.

use std::collections::BTreeMap;

use crate::bounds::BoundOverride;
use crate::error::{Result, RosterError};

/// Most schedulable hours a single day may publish.
pub const MAX_DAY_HOURS: u32 = 24;

/// One published day: its number of schedulable hours and per-employee shift overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Day {
    pub hours: u32,
    pub shift_overrides: Vec<ShiftOverride>,
}

impl Day {
    /// Creates a day with `hours` schedulable hours and no overrides.
    pub fn new(hours: u32) -> Self {
        Self {
            hours,
            shift_overrides: Vec::new(),
        }
    }

    /// Adds a shift-length override for one employee on this day.
    pub fn with_shift_override(mut self, employee: usize, bounds: BoundOverride) -> Self {
        self.shift_overrides.push(ShiftOverride { employee, bounds });
        self
    }

    /// Returns the override declared for `employee`, if any.
    ///
    /// When an employee is listed more than once the first entry wins.
    pub fn shift_override(&self, employee: usize) -> Option<&BoundOverride> {
        self.shift_overrides
            .iter()
            .find(|o| o.employee == employee)
            .map(|o| &o.bounds)
    }
}

/// A shift-length override attached to a day descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOverride {
    pub employee: usize,
    pub bounds: BoundOverride,
}

/// Per-employee policy overrides for the daily and weekly scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePolicy {
    /// Applies to every day without a day-specific entry.
    pub daily_defaults: BoundOverride,
    /// Day-specific overrides keyed by day index.
    pub daily: BTreeMap<usize, BoundOverride>,
    pub weekly: BoundOverride,
}

impl EmployeePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_daily_defaults(mut self, bounds: BoundOverride) -> Self {
        self.daily_defaults = bounds;
        self
    }

    pub fn with_daily(mut self, day: usize, bounds: BoundOverride) -> Self {
        self.daily.insert(day, bounds);
        self
    }

    pub fn with_weekly(mut self, bounds: BoundOverride) -> Self {
        self.weekly = bounds;
        self
    }

    /// The employee-level daily layer for `day`: the day entry over the defaults.
    pub fn daily_for(&self, day: usize) -> BoundOverride {
        match self.daily.get(&day) {
            Some(specific) => specific.or(&self.daily_defaults),
            None => self.daily_defaults,
        }
    }
}

/// A hard lower bound on simultaneous headcount for one (day, hour) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingRequirement {
    pub day: usize,
    pub hour: u32,
    pub min_count: u32,
}

impl BookingRequirement {
    pub fn new(day: usize, hour: u32, min_count: u32) -> Self {
        Self {
            day,
            hour,
            min_count,
        }
    }

    /// Parses the flat `"day,hour,count,day,hour,count,..."` form.
    ///
    /// ```
    /// use rosterforge_core::BookingRequirement;
    ///
    /// let bookings = BookingRequirement::parse_flat("0,3,2, 1,0,1").unwrap();
    /// assert_eq!(bookings, vec![
    ///     BookingRequirement::new(0, 3, 2),
    ///     BookingRequirement::new(1, 0, 1),
    /// ]);
    /// ```
    pub fn parse_flat(input: &str) -> Result<Vec<BookingRequirement>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let numbers = trimmed
            .split(',')
            .map(|token| {
                token.trim().parse::<u32>().map_err(|_| {
                    RosterError::configuration(format!("invalid booking value `{}`", token.trim()))
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        if numbers.len() % 3 != 0 {
            return Err(RosterError::configuration(format!(
                "booking list must contain (day, hour, count) triples, got {} values",
                numbers.len()
            )));
        }

        Ok(numbers
            .chunks_exact(3)
            .map(|triple| BookingRequirement::new(triple[0] as usize, triple[1], triple[2]))
            .collect())
    }
}

/// A complete scheduling request in domain form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleProblem {
    pub employees: usize,
    pub days: Vec<Day>,
    /// Indexed by employee; missing trailing entries mean "use the global defaults".
    pub policies: Vec<EmployeePolicy>,
    pub bookings: Vec<BookingRequirement>,
}

impl ScheduleProblem {
    pub fn new(employees: usize, days: Vec<Day>) -> Self {
        Self {
            employees,
            days,
            policies: Vec::new(),
            bookings: Vec::new(),
        }
    }

    pub fn with_policy(mut self, employee: usize, policy: EmployeePolicy) -> Self {
        if self.policies.len() <= employee {
            self.policies.resize_with(employee + 1, EmployeePolicy::default);
        }
        self.policies[employee] = policy;
        self
    }

    pub fn with_booking(mut self, booking: BookingRequirement) -> Self {
        self.bookings.push(booking);
        self
    }

    /// The policy of `employee`, or `None` when the global defaults apply.
    pub fn policy(&self, employee: usize) -> Option<&EmployeePolicy> {
        self.policies.get(employee)
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// The largest hour count over all days.
    pub fn max_hours(&self) -> u32 {
        self.days.iter().map(|d| d.hours).max().unwrap_or(0)
    }

    /// Total schedulable hours across all days, saturating at `u32::MAX`.
    pub fn total_hours(&self) -> u32 {
        self.days
            .iter()
            .fold(0u32, |total, d| total.saturating_add(d.hours))
    }

    /// Checks every cross reference before any model variable is created.
    pub fn validate(&self) -> Result<()> {
        if self.policies.len() > self.employees {
            return Err(RosterError::configuration(format!(
                "{} employee policies given for {} employees",
                self.policies.len(),
                self.employees
            )));
        }

        for (d, day) in self.days.iter().enumerate() {
            if day.hours > MAX_DAY_HOURS {
                return Err(RosterError::configuration(format!(
                    "day {} has {} hours, at most {} are allowed",
                    d, day.hours, MAX_DAY_HOURS
                )));
            }
            for shift in &day.shift_overrides {
                if shift.employee >= self.employees {
                    return Err(RosterError::configuration(format!(
                        "day {} has a shift override for unknown employee {}",
                        d, shift.employee
                    )));
                }
            }
        }

        for (e, policy) in self.policies.iter().enumerate() {
            if let Some(&day) = policy.daily.keys().find(|&&day| day >= self.days.len()) {
                return Err(RosterError::configuration(format!(
                    "employee {} has a daily override for unknown day {}",
                    e, day
                )));
            }
        }

        for booking in &self.bookings {
            let Some(day) = self.days.get(booking.day) else {
                return Err(RosterError::configuration(format!(
                    "booking references unknown day {}",
                    booking.day
                )));
            };
            if booking.hour >= day.hours {
                return Err(RosterError::configuration(format!(
                    "booking references hour {} of day {}, which has {} hours",
                    booking.hour, booking.day, day.hours
                )));
            }
        }

        Ok(())
    }
}
