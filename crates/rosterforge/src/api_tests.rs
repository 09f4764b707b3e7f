//! Tests for the JSON wire types.

use super::*;
use crate::extract::ScheduleResult;
use rosterforge_solver::{SearchStats, SolveStatus};
use serde_json::json;

fn request(value: serde_json::Value) -> ScheduleRequest {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_full_request_converts() {
    let input = r#"{
        "employees": 2,
        "days": [
            { "hours": 8, "shift_constraints": [{ "employee": 0, "max_hours": 4, "min_hours": 2 }] },
            { "hours": 6 }
        ],
        "constraints": [
            { "daily": { "defaults": { "hard_min": 2 }, "1": { "hard_max": 3 } },
              "weekly": { "soft_min": 6, "min_cost": 2 } }
        ],
        "bookings": [[0, 3, 2], [1, 5, 1]]
    }"#;

    let problem = ScheduleRequest::from_json(input).unwrap().into_problem().unwrap();

    assert_eq!(problem.employees, 2);
    assert_eq!(problem.days[0].hours, 8);
    assert_eq!(
        problem.days[0].shift_override(0),
        Some(&BoundOverride::new().with_hard_max(4).with_hard_min(2))
    );
    assert!(problem.days[1].shift_overrides.is_empty());

    let policy = problem.policy(0).unwrap();
    assert_eq!(policy.daily_defaults.hard_min, Some(2));
    assert_eq!(policy.daily_for(1).hard_max, Some(3));
    assert_eq!(policy.weekly.soft_min, Some(6));
    assert_eq!(policy.weekly.min_cost, Some(2));
    assert!(problem.policy(1).is_none());

    assert_eq!(
        problem.bookings,
        vec![BookingRequirement::new(0, 3, 2), BookingRequirement::new(1, 5, 1)]
    );
}

#[test]
fn test_flat_bookings() {
    let problem = request(json!({
        "employees": 1,
        "days": [{ "hours": 4 }],
        "bookings": "0,1,1, 0,2,1"
    }))
    .into_problem()
    .unwrap();

    assert_eq!(problem.bookings.len(), 2);
    assert_eq!(problem.bookings[1], BookingRequirement::new(0, 2, 1));
}

#[test]
fn test_day_without_integer_hours() {
    for hours in [json!(null), json!("8"), json!(7.5), json!(-1)] {
        let err = request(json!({ "employees": 1, "days": [{ "hours": hours }] }))
            .into_problem()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("day 0"));
    }

    let missing = request(json!({ "employees": 1, "days": [{}] }));
    assert!(missing.into_problem().unwrap_err().is_configuration());
}

#[test]
fn test_oversized_day_is_rejected_before_compiling() {
    let err = request(json!({ "employees": 1, "days": [{ "hours": 4_294_967_295u64 }] }))
        .into_problem()
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("at most 24"));

    let too_big = request(json!({ "employees": 1, "days": [{ "hours": 1u64 << 40 }] }));
    assert!(too_big.into_problem().unwrap_err().is_configuration());
}

#[test]
fn test_shift_constraint_needs_an_employee() {
    let err = request(json!({
        "employees": 1,
        "days": [{ "hours": 4, "shift_constraints": [{ "max_hours": 2 }] }]
    }))
    .into_problem()
    .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_non_integer_max_hours_is_ignored() {
    let problem = request(json!({
        "employees": 1,
        "days": [{ "hours": 4, "shift_constraints": [{ "employee": 0, "max_hours": "lots" }] }]
    }))
    .into_problem()
    .unwrap();

    assert_eq!(problem.days[0].shift_override(0), Some(&BoundOverride::new()));
}

#[test]
fn test_unknown_daily_key() {
    let err = request(json!({
        "employees": 1,
        "days": [{ "hours": 4 }],
        "constraints": [{ "daily": { "monday": { "hard_max": 2 } } }]
    }))
    .into_problem()
    .unwrap_err();
    assert!(err.to_string().contains("monday"));
}

#[test]
fn test_references_outside_the_grid() {
    let too_many_policies = request(json!({
        "employees": 1,
        "days": [{ "hours": 4 }],
        "constraints": [{}, {}]
    }));
    assert!(too_many_policies.into_problem().unwrap_err().is_configuration());

    let bad_booking = request(json!({
        "employees": 1,
        "days": [{ "hours": 4 }],
        "bookings": [[0, 4, 1]]
    }));
    assert!(bad_booking.into_problem().unwrap_err().is_configuration());

    let bad_override = request(json!({
        "employees": 1,
        "days": [{ "hours": 4, "shift_constraints": [{ "employee": 3, "max_hours": 2 }] }]
    }));
    assert!(bad_override.into_problem().unwrap_err().is_configuration());
}

#[test]
fn test_malformed_json() {
    let err = ScheduleRequest::from_json("{ \"employees\": ").unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_response_shape() {
    let schedule = ScheduleResult {
        days: vec![DaySchedule {
            id: 0,
            workers: vec![crate::extract::WorkerHours {
                id: 0,
                hours: vec![0, 1],
            }],
        }],
        employees: vec![EmployeeTotal { id: 0, hours: 2 }],
    };
    let outcome = ScheduleOutcome {
        status: SolveStatus::Feasible,
        objective: Some(0),
        penalties: Vec::new(),
        schedule: Some(schedule),
        stats: SearchStats::default(),
    };

    let value: serde_json::Value =
        serde_json::from_str(&ScheduleResponse::from(&outcome).to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "success": true,
            "days": [{ "id": 0, "workers": [{ "id": 0, "hours": [0, 1] }] }],
            "employees": [{ "id": 0, "hours": 2 }]
        })
    );

    let failed = ScheduleOutcome {
        status: SolveStatus::Infeasible,
        objective: None,
        penalties: Vec::new(),
        schedule: None,
        stats: SearchStats::default(),
    };
    assert_eq!(
        ScheduleResponse::from(&failed).to_json().unwrap(),
        r#"{"success":false}"#
    );
}
