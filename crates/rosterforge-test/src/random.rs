//! Seeded random problems.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rosterforge_core::{BookingRequirement, BoundOverride, Day, EmployeePolicy, ScheduleProblem};

/// A small random problem: 1 to 3 employees, 1 or 2 days of 2 to 5 hours,
/// random shift overrides, policies and bookings.
///
/// The same seed always yields the same problem. Problems are not guaranteed
/// to be feasible.
///
/// ```
/// use rosterforge_test::random::random_problem;
///
/// let problem = random_problem(3);
/// assert_eq!(problem, random_problem(3));
/// assert!(problem.validate().is_ok());
/// ```
pub fn random_problem(seed: u64) -> ScheduleProblem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let employees = rng.random_range(1..=3usize);
    let day_count = rng.random_range(1..=2usize);

    let mut days = Vec::with_capacity(day_count);
    for _ in 0..day_count {
        let hours = rng.random_range(2..=5u32);
        let mut day = Day::new(hours);
        if rng.random_bool(0.3) {
            let employee = rng.random_range(0..employees);
            day = day.with_shift_override(employee, random_override(&mut rng, hours));
        }
        days.push(day);
    }

    let mut problem = ScheduleProblem::new(employees, days);
    for employee in 0..employees {
        if rng.random_bool(0.5) {
            let mut policy = EmployeePolicy::new();
            if rng.random_bool(0.5) {
                policy = policy.with_daily_defaults(random_override(&mut rng, 5));
            }
            if rng.random_bool(0.3) {
                let day = rng.random_range(0..day_count);
                policy = policy.with_daily(day, random_override(&mut rng, 5));
            }
            if rng.random_bool(0.5) {
                policy = policy.with_weekly(random_override(&mut rng, 10));
            }
            problem = problem.with_policy(employee, policy);
        }
    }

    for _ in 0..rng.random_range(0..3) {
        let day = rng.random_range(0..day_count);
        let hour = rng.random_range(0..problem.days[day].hours);
        let min_count = rng.random_range(1..=employees as u32);
        problem = problem.with_booking(BookingRequirement::new(day, hour, min_count));
    }
    problem
}

/// A partial override with values drawn up to `scale`.
pub fn random_override(rng: &mut ChaCha8Rng, scale: u32) -> BoundOverride {
    let mut bounds = BoundOverride::new();
    if rng.random_bool(0.5) {
        bounds = bounds.with_hard_min(rng.random_range(0..=scale / 2));
    }
    if rng.random_bool(0.5) {
        bounds = bounds.with_hard_max(rng.random_range(0..=scale));
    }
    if rng.random_bool(0.4) {
        bounds = bounds
            .with_soft_min(rng.random_range(0..=scale))
            .with_min_cost(rng.random_range(0..=3));
    }
    if rng.random_bool(0.4) {
        bounds = bounds
            .with_soft_max(rng.random_range(0..=scale))
            .with_max_cost(rng.random_range(0..=3));
    }
    bounds
}
