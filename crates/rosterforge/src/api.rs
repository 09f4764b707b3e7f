//! JSON request and response types.
//!
//! A request describes the grid, per-day shift overrides, per-employee
//! policies and bookings:
//!
//! ```json
//! {
//!   "employees": 2,
//!   "days": [
//!     { "hours": 8, "shift_constraints": [{ "employee": 0, "max_hours": 4 }] },
//!     { "hours": 6 }
//!   ],
//!   "constraints": [
//!     { "daily": { "defaults": { "hard_min": 2 }, "1": { "hard_max": 3 } },
//!       "weekly": { "soft_min": 6, "min_cost": 2 } }
//!   ],
//!   "bookings": [[0, 3, 2]]
//! }
//! ```
//!
//! `bookings` may also be given in the flat `"day,hour,count,..."` string form.

use std::collections::BTreeMap;

use rosterforge_core::{
    BookingRequirement, BoundOverride, Day, EmployeePolicy, Result, RosterError, ScheduleProblem,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::{DaySchedule, EmployeeTotal};
use crate::solver::ScheduleOutcome;

/// Key of the daily policy entry that applies to every day.
pub const DAILY_DEFAULTS_KEY: &str = "defaults";

/// A scheduling request as received over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub employees: usize,
    #[serde(default)]
    pub days: Vec<DayRequest>,
    /// Employee policies, indexed by employee.
    #[serde(default)]
    pub constraints: Vec<PolicyRequest>,
    #[serde(default)]
    pub bookings: BookingsRequest,
}

/// One day of the request.
///
/// `hours` is kept untyped so that a missing or non-integer value surfaces
/// as a configuration error naming the day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRequest {
    #[serde(default)]
    pub hours: Value,
    #[serde(default)]
    pub shift_constraints: Vec<ShiftConstraintRequest>,
}

/// A shift-length override for one employee on one day.
///
/// A non-integer `max_hours` is ignored and the next policy layer applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftConstraintRequest {
    #[serde(default)]
    pub employee: Option<usize>,
    #[serde(default)]
    pub max_hours: Option<Value>,
    #[serde(default)]
    pub min_hours: Option<u32>,
}

/// Daily and weekly overrides of one employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyRequest {
    /// Keyed by day index, or [`DAILY_DEFAULTS_KEY`].
    #[serde(default)]
    pub daily: BTreeMap<String, BoundOverride>,
    #[serde(default)]
    pub weekly: BoundOverride,
}

/// Booking requirements in either accepted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingsRequest {
    /// `[[day, hour, count], ...]`
    Triples(Vec<(usize, u32, u32)>),
    /// `"day,hour,count,day,hour,count"`
    Flat(String),
}

impl Default for BookingsRequest {
    fn default() -> Self {
        BookingsRequest::Triples(Vec::new())
    }
}

impl BookingsRequest {
    pub fn to_requirements(&self) -> Result<Vec<BookingRequirement>> {
        match self {
            BookingsRequest::Triples(triples) => Ok(triples
                .iter()
                .map(|&(day, hour, count)| BookingRequirement::new(day, hour, count))
                .collect()),
            BookingsRequest::Flat(flat) => BookingRequirement::parse_flat(flat),
        }
    }
}

impl ScheduleRequest {
    /// Parses a request from JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| RosterError::configuration(format!("malformed request: {}", e)))
    }

    /// Converts the wire form into a validated [`ScheduleProblem`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a day without an integer hour count,
    /// a shift override without an employee, an unknown daily policy key, or
    /// any reference outside the grid.
    pub fn into_problem(self) -> Result<ScheduleProblem> {
        let days = self
            .days
            .iter()
            .enumerate()
            .map(|(d, day)| day.to_day(d))
            .collect::<Result<Vec<_>>>()?;

        let mut problem = ScheduleProblem::new(self.employees, days);
        for (e, policy) in self.constraints.iter().enumerate() {
            problem = problem.with_policy(e, policy.to_policy(e)?);
        }
        problem.bookings = self.bookings.to_requirements()?;

        problem.validate()?;
        Ok(problem)
    }
}

impl DayRequest {
    fn to_day(&self, index: usize) -> Result<Day> {
        let hours = self
            .hours
            .as_u64()
            .and_then(|h| u32::try_from(h).ok())
            .ok_or_else(|| {
                RosterError::configuration(format!(
                    "day {} needs an integer number of hours, got {}",
                    index, self.hours
                ))
            })?;

        let mut day = Day::new(hours);
        for shift in &self.shift_constraints {
            let employee = shift.employee.ok_or_else(|| {
                RosterError::configuration(format!(
                    "shift constraint on day {} does not name an employee",
                    index
                ))
            })?;
            let mut bounds = BoundOverride::new();
            if let Some(max) = shift
                .max_hours
                .as_ref()
                .and_then(Value::as_u64)
                .and_then(|h| u32::try_from(h).ok())
            {
                bounds = bounds.with_hard_max(max);
            }
            if let Some(min) = shift.min_hours {
                bounds = bounds.with_hard_min(min);
            }
            day = day.with_shift_override(employee, bounds);
        }
        Ok(day)
    }
}

impl PolicyRequest {
    fn to_policy(&self, employee: usize) -> Result<EmployeePolicy> {
        let mut policy = EmployeePolicy::new().with_weekly(self.weekly);
        for (key, bounds) in &self.daily {
            if key == DAILY_DEFAULTS_KEY {
                policy = policy.with_daily_defaults(*bounds);
                continue;
            }
            let day = key.trim().parse::<usize>().map_err(|_| {
                RosterError::configuration(format!(
                    "employee {} has a daily policy under unknown key `{}`",
                    employee, key
                ))
            })?;
            policy = policy.with_daily(day, *bounds);
        }
        Ok(policy)
    }
}

/// The response returned for a request.
///
/// `days` and `employees` are present only when `success` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<DaySchedule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<EmployeeTotal>>,
}

impl ScheduleResponse {
    pub fn failure() -> Self {
        Self {
            success: false,
            days: None,
            employees: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RosterError::Internal(e.to_string()))
    }
}

impl From<&ScheduleOutcome> for ScheduleResponse {
    fn from(outcome: &ScheduleOutcome) -> Self {
        match (&outcome.schedule, outcome.is_success()) {
            (Some(schedule), true) => Self {
                success: true,
                days: Some(schedule.days.clone()),
                employees: Some(schedule.employees.clone()),
            },
            _ => Self::failure(),
        }
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
