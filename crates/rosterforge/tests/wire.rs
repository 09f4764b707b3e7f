//! Requests in, responses out.

use rosterforge::{
    BoundTuple, PolicyDefaults, ScheduleRequest, ScheduleResponse, SolverConfig, SolverManager,
};
use serde_json::{json, Value};

fn manager() -> SolverManager {
    SolverManager::with_config(
        SolverConfig::new()
            .with_node_limit(40_000)
            .with_defaults(PolicyDefaults::new(
                BoundTuple::new(1, 2, 1, 4, 6, 1),
                BoundTuple::hard(0, 20),
            )),
    )
}

async fn respond(manager: &SolverManager, request: Value) -> Value {
    let request: ScheduleRequest = serde_json::from_value(request).unwrap();
    let response = manager.solve_request(request).await.unwrap();
    serde_json::from_str(&response.to_json().unwrap()).unwrap()
}

#[tokio::test]
async fn successful_response_lists_every_day_and_employee() {
    let manager = manager();
    let response = respond(
        &manager,
        json!({
            "employees": 2,
            "days": [
                { "hours": 4, "shift_constraints": [{ "employee": 1, "max_hours": 2 }] },
                { "hours": 3 }
            ],
            "constraints": [{ "weekly": { "hard_max": 7 } }],
            "bookings": [[0, 0, 2]]
        }),
    )
    .await;

    assert_eq!(response["success"], json!(true));
    let days = response["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    for day in days {
        assert_eq!(day["workers"].as_array().unwrap().len(), 2);
    }

    let day0_employee1 = days[0]["workers"][1]["hours"].as_array().unwrap();
    assert!(day0_employee1.len() <= 2);
    assert!(day0_employee1.contains(&json!(0)));

    let totals = response["employees"].as_array().unwrap();
    assert_eq!(totals.len(), 2);
    assert!(totals[0]["hours"].as_u64().unwrap() <= 7);
}

#[tokio::test]
async fn infeasible_request_has_no_schedule_body() {
    let manager = manager();
    let response = respond(
        &manager,
        json!({
            "employees": 1,
            "days": [{ "hours": 3 }],
            "bookings": "0,1,2"
        }),
    )
    .await;

    assert_eq!(response, json!({ "success": false }));
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let manager = manager();
    let requests = (1..=3).map(|employees| {
        json!({
            "employees": employees,
            "days": [{ "hours": 2 + employees }],
            "bookings": [[0, 1, employees]]
        })
    });

    let responses = solve_all(&manager, requests.collect()).await;
    for (i, response) in responses.iter().enumerate() {
        assert!(response.success, "request {i}");
        assert_eq!(response.employees.as_ref().unwrap().len(), i + 1);
    }
}

async fn solve_all(manager: &SolverManager, requests: Vec<Value>) -> Vec<ScheduleResponse> {
    let handles: Vec<_> = requests
        .into_iter()
        .map(|r| {
            let problem = serde_json::from_value::<ScheduleRequest>(r)
                .unwrap()
                .into_problem()
                .unwrap();
            manager.solve(problem)
        })
        .collect();

    let mut responses = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle.outcome().await.unwrap();
        responses.push(ScheduleResponse::from(&outcome));
    }
    responses
}
