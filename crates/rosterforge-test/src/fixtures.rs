//! Problem builders and model helpers.
//!
//! # Example
//!
//! ```
//! use rosterforge_test::fixtures::{open_defaults, week};
//!
//! let problem = week(3, &[4, 4, 2]);
//! assert_eq!(problem.employees, 3);
//! assert_eq!(problem.total_hours(), 10);
//! assert_eq!(open_defaults().shift.min_cost, 0);
//! ```

use rosterforge_config::PolicyDefaults;
use rosterforge_core::model::{BoolVar, CpModel, LinearExpr};
use rosterforge_core::{BookingRequirement, BoundTuple, Day, ScheduleProblem};

/// One day of `hours` hours.
pub fn single_day(employees: usize, hours: u32) -> ScheduleProblem {
    week(employees, &[hours])
}

/// One day per entry of `day_hours`, no overrides and no bookings.
pub fn week(employees: usize, day_hours: &[u32]) -> ScheduleProblem {
    ScheduleProblem::new(employees, day_hours.iter().map(|&h| Day::new(h)).collect())
}

/// A working week of realistic size: four employees, five twelve-hour days
/// and three bookings above the staffing floor.
pub fn demo_week() -> ScheduleProblem {
    week(4, &[12; 5])
        .with_booking(BookingRequirement::new(0, 0, 3))
        .with_booking(BookingRequirement::new(1, 4, 2))
        .with_booking(BookingRequirement::new(3, 1, 2))
}

/// Policies for [`demo_week`]: shifts of 3 to 10 hours, ideally 7 to 9,
/// and weeks of 20 to 35 hours, ideally 25 to 27.
pub fn demo_defaults() -> PolicyDefaults {
    PolicyDefaults::new(
        BoundTuple::new(3, 7, 1, 9, 10, 1),
        BoundTuple::new(20, 25, 1, 27, 35, 1),
    )
}

/// Defaults that never constrain or penalize a schedule.
pub fn open_defaults() -> PolicyDefaults {
    PolicyDefaults::new(BoundTuple::hard(0, 24), BoundTuple::hard(0, 24 * 7))
}

/// Pins each of `works` to the matching entry of `bits`.
pub fn pin(model: &mut CpModel, works: &[BoolVar], bits: &[bool]) {
    for (&work, &bit) in works.iter().zip(bits) {
        model.add_equality(LinearExpr::term(work, 1), i64::from(bit));
    }
}
