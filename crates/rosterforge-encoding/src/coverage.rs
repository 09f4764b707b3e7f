//! Staffing constraints over (day, hour) slots.

use rosterforge_core::model::{CpModel, LinearExpr};
use rosterforge_core::BookingRequirement;
use tracing::trace;

use crate::grid::ScheduleGrid;

/// Requires at least `min_count` employees working each booked slot.
///
/// Bookings must reference published slots; see [`ScheduleProblem::validate`].
///
/// [`ScheduleProblem::validate`]: rosterforge_core::ScheduleProblem::validate
pub fn add_booking_constraints(
    model: &mut CpModel,
    grid: &ScheduleGrid,
    bookings: &[BookingRequirement],
) {
    for booking in bookings {
        let works = grid.slot_works(booking.day, booking.hour as usize);
        model.add_greater_or_equal(LinearExpr::sum(works), i64::from(booking.min_count));
    }
    trace!(event = "bookings_encoded", bookings = bookings.len());
}

/// Requires at least one employee working every published slot.
///
/// With no employees every slot is uncoverable and the model is infeasible.
pub fn add_coverage_floor(model: &mut CpModel, grid: &ScheduleGrid) -> usize {
    let mut slots = 0;
    for (day, hour) in grid.slots() {
        model.add_at_least_one(grid.slot_works(day, hour));
        slots += 1;
    }
    trace!(event = "coverage_encoded", slots);
    slots
}
