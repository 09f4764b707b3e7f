//! Reading a schedule back out of a solved model.

use rosterforge_encoding::ScheduleGrid;
use rosterforge_solver::CpSolution;
use serde::{Deserialize, Serialize};

/// The hours one employee works on one day, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerHours {
    pub id: usize,
    pub hours: Vec<u32>,
}

/// Every employee's working hours on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub id: usize,
    pub workers: Vec<WorkerHours>,
}

/// Total hours an employee works across the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTotal {
    pub id: usize,
    pub hours: u32,
}

/// The decoded schedule: per-day worker hours and per-employee totals.
///
/// Employees who do not work on a day are still listed with an empty hour list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub days: Vec<DaySchedule>,
    pub employees: Vec<EmployeeTotal>,
}

impl ScheduleResult {
    /// Hours worked by `employee` on `day`, empty when either is unknown.
    pub fn hours_of(&self, employee: usize, day: usize) -> &[u32] {
        self.days
            .get(day)
            .and_then(|d| d.workers.iter().find(|w| w.id == employee))
            .map(|w| w.hours.as_slice())
            .unwrap_or(&[])
    }

    /// Total hours worked by `employee`.
    pub fn total_hours(&self, employee: usize) -> u32 {
        self.employees
            .iter()
            .find(|t| t.id == employee)
            .map_or(0, |t| t.hours)
    }

    /// Number of employees working during `(day, hour)`.
    pub fn headcount(&self, day: usize, hour: u32) -> usize {
        self.days.get(day).map_or(0, |d| {
            d.workers
                .iter()
                .filter(|w| w.hours.contains(&hour))
                .count()
        })
    }
}

/// Decodes the work indicators of `grid` from a solved assignment.
///
/// Returns `None` when the solution carries no assignment.
pub fn extract_schedule(grid: &ScheduleGrid, solution: &CpSolution) -> Option<ScheduleResult> {
    if !solution.has_solution() {
        return None;
    }

    let mut totals = vec![0u32; grid.employees()];
    let mut days = Vec::with_capacity(grid.day_count());

    for d in 0..grid.day_count() {
        let mut workers = Vec::with_capacity(grid.employees());
        for (e, total) in totals.iter_mut().enumerate() {
            let hours: Vec<u32> = (0..grid.hours(d))
                .filter(|&h| {
                    grid.work(e, d, h)
                        .and_then(|w| solution.boolean_value(w))
                        .unwrap_or(false)
                })
                .map(|h| h as u32)
                .collect();
            *total += hours.len() as u32;
            workers.push(WorkerHours { id: e, hours });
        }
        days.push(DaySchedule { id: d, workers });
    }

    let employees = totals
        .into_iter()
        .enumerate()
        .map(|(id, hours)| EmployeeTotal { id, hours })
        .collect();

    Some(ScheduleResult { days, employees })
}
