//! Background solving jobs.
//!
//! Solves are CPU-bound, so each job runs on tokio's blocking pool. A job ends
//! when its backend finishes or its time budget runs out; there is no other
//! way to stop it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rosterforge_config::SolverConfig;
use rosterforge_core::{Result, RosterError, ScheduleProblem};
use rosterforge_solver::{BranchAndBoundSolver, ConstraintSolver, SearchLimits, SolveStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::debug;

use crate::api::{ScheduleRequest, ScheduleResponse};
use crate::solver::{solve_with_limits, ScheduleOutcome};

/// Status of a solving job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Solving,
    NotSolving,
}

/// Registry entry of one job.
#[derive(Debug)]
struct SolveJob {
    status: JobStatus,
    result: Option<SolveStatus>,
}

/// A running job, resolved by awaiting [`SolveHandle::outcome`].
#[derive(Debug)]
pub struct SolveHandle {
    id: String,
    receiver: oneshot::Receiver<Result<ScheduleOutcome>>,
}

impl SolveHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Waits for the job to finish.
    pub async fn outcome(self) -> Result<ScheduleOutcome> {
        self.receiver
            .await
            .map_err(|_| RosterError::Internal(format!("solve job {} was dropped", self.id)))?
    }
}

/// Runs scheduling solves in the background and tracks their status.
///
/// Jobs must be started from within a tokio runtime.
pub struct SolverManager {
    jobs: RwLock<HashMap<String, Arc<RwLock<SolveJob>>>>,
    config: SolverConfig,
    next_id: AtomicU64,
}

impl SolverManager {
    /// Creates a manager with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            config,
            next_id: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Starts solving `problem` with the reference backend.
    pub fn solve(&self, problem: ScheduleProblem) -> SolveHandle {
        self.solve_with(problem, BranchAndBoundSolver::new())
    }

    /// Starts solving `problem` with `backend`.
    pub fn solve_with<B>(&self, problem: ScheduleProblem, mut backend: B) -> SolveHandle
    where
        B: ConstraintSolver + 'static,
    {
        let id = format!("job-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let job = Arc::new(RwLock::new(SolveJob {
            status: JobStatus::Solving,
            result: None,
        }));
        self.jobs.write().insert(id.clone(), job.clone());

        let (sender, receiver) = oneshot::channel();
        let config = self.config.clone();
        let limits = SearchLimits::from_config(&config);
        let job_id = id.clone();

        // Spawn a blocking task for CPU-bound solving
        tokio::task::spawn_blocking(move || {
            let result = solve_with_limits(&problem, &config, &mut backend, limits);
            {
                let mut job = job.write();
                job.status = JobStatus::NotSolving;
                job.result = result.as_ref().ok().map(|o| o.status);
            }
            debug!(event = "job_finished", job = job_id.as_str());
            let _ = sender.send(result);
        });

        SolveHandle { id, receiver }
    }

    /// Converts and solves a wire request, waiting for the response.
    ///
    /// The job is removed from the registry once its response is built.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the request is malformed. An
    /// infeasible or timed-out solve is not an error; it yields `success: false`.
    pub async fn solve_request(&self, request: ScheduleRequest) -> Result<ScheduleResponse> {
        let problem = request.into_problem()?;
        let handle = self.solve(problem);
        let id = handle.id().to_string();
        let outcome = handle.outcome().await;
        self.remove_job(&id);
        Ok(ScheduleResponse::from(&outcome?))
    }

    pub fn status(&self, id: &str) -> Option<JobStatus> {
        self.jobs.read().get(id).map(|job| job.read().status)
    }

    /// Final solve status of a finished job.
    pub fn result(&self, id: &str) -> Option<SolveStatus> {
        self.jobs.read().get(id).and_then(|job| job.read().result)
    }

    pub fn list_jobs(&self) -> Vec<String> {
        self.jobs.read().keys().cloned().collect()
    }

    pub fn remove_job(&self, id: &str) -> bool {
        self.jobs.write().remove(id).is_some()
    }
}

impl Default for SolverManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_core::Day;
    use rosterforge_test::open_defaults;

    fn manager() -> SolverManager {
        SolverManager::with_config(
            SolverConfig::new()
                .with_node_limit(50_000)
                .with_defaults(open_defaults()),
        )
    }

    #[tokio::test]
    async fn test_background_solve() {
        let manager = manager();
        let handle = manager.solve(ScheduleProblem::new(2, vec![Day::new(3)]));
        let id = handle.id().to_string();

        let outcome = handle.outcome().await.unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(manager.status(&id), Some(JobStatus::NotSolving));
        assert_eq!(manager.result(&id), Some(SolveStatus::Optimal));
        assert_eq!(manager.list_jobs(), vec![id.clone()]);
        assert!(manager.remove_job(&id));
        assert!(manager.status(&id).is_none());
    }

    #[tokio::test]
    async fn test_job_ids_are_unique() {
        let manager = manager();
        let a = manager.solve(ScheduleProblem::new(1, vec![Day::new(1)]));
        let b = manager.solve(ScheduleProblem::new(1, vec![Day::new(1)]));
        assert_ne!(a.id(), b.id());
        a.outcome().await.unwrap();
        b.outcome().await.unwrap();
        assert_eq!(manager.list_jobs().len(), 2);
    }

    #[tokio::test]
    async fn test_solve_request() {
        let manager = manager();
        let request = ScheduleRequest::from_json(r#"{ "employees": 1, "days": [{ "hours": 2 }] }"#)
            .unwrap();
        let response = manager.solve_request(request).await.unwrap();
        assert!(response.success);
        assert_eq!(response.employees.unwrap()[0].hours, 2);

        let infeasible =
            ScheduleRequest::from_json(r#"{ "employees": 0, "days": [{ "hours": 2 }] }"#).unwrap();
        assert!(!manager.solve_request(infeasible).await.unwrap().success);

        let invalid = ScheduleRequest::from_json(r#"{ "employees": 1, "days": [{}] }"#).unwrap();
        assert!(manager.solve_request(invalid).await.unwrap_err().is_configuration());
    }

    #[tokio::test]
    async fn test_answered_requests_leave_no_jobs_behind() {
        let manager = manager();
        for employees in 1..=5 {
            let request = ScheduleRequest::from_json(&format!(
                r#"{{ "employees": {employees}, "days": [{{ "hours": 3 }}] }}"#
            ))
            .unwrap();
            assert!(manager.solve_request(request).await.unwrap().success);
        }
        assert!(manager.list_jobs().is_empty());

        // Handles started directly stay registered until removed.
        let handle = manager.solve(ScheduleProblem::new(1, vec![Day::new(1)]));
        let id = handle.id().to_string();
        handle.outcome().await.unwrap();
        assert_eq!(manager.list_jobs(), vec![id]);
    }
}
