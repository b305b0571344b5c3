//! Jobs API endpoints and run polling

use std::collections::HashMap;
use std::time::Duration;

use dbx_core::domain::run::{Run, RunLifeCycleState};
use dbx_core::dto::job::{RunNowRequest, RunNowResponse};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::WorkspaceClient;
use crate::error::{ClientError, Result};

/// How to wait for a run to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Pause between two status queries
    pub interval: Duration,
    /// Give up after this long; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: None,
        }
    }
}

impl WorkspaceClient {
    // =============================================================================
    // Job Runs
    // =============================================================================

    /// Trigger a run of an existing job
    ///
    /// # Arguments
    /// * `job_id` - The job to run
    /// * `notebook_params` - Widget values passed to the job's notebook task
    ///
    /// # Returns
    /// The id of the new run
    pub async fn run_now(
        &self,
        job_id: i64,
        notebook_params: HashMap<String, String>,
    ) -> Result<RunNowResponse> {
        info!(job_id, "Triggering job run");
        let response = self
            .post("api/2.0/jobs/run-now")
            .json(&RunNowRequest {
                job_id,
                notebook_params,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a run with its current state
    pub async fn get_run(&self, run_id: i64) -> Result<Run> {
        let response = self
            .get("api/2.0/jobs/runs/get")
            .query(&[("run_id", run_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get only the life-cycle state of a run
    pub async fn get_run_status(&self, run_id: i64) -> Result<RunLifeCycleState> {
        Ok(self.get_run(run_id).await?.state.life_cycle_state)
    }

    /// Block until a run reaches a terminal life-cycle state
    ///
    /// The state is queried immediately, then again after every
    /// `options.interval`. Whether the run succeeded is left to the caller,
    /// see [`Run::succeeded`].
    ///
    /// # Errors
    /// The first failed status query aborts the wait. With a timeout set,
    /// [`ClientError::Timeout`] is returned once it has elapsed.
    pub async fn wait_for_run(&self, run_id: i64, options: &PollOptions) -> Result<Run> {
        let started = Instant::now();

        loop {
            let run = self.get_run(run_id).await?;
            let state = &run.state.life_cycle_state;

            if state.is_terminal() {
                info!(run_id, state = %state, "Run finished");
                return Ok(run);
            }

            debug!(run_id, state = %state, "Run still in progress");

            let waited = started.elapsed();
            let pause = match options.timeout {
                Some(timeout) if waited >= timeout => {
                    return Err(ClientError::Timeout { run_id, waited });
                }
                // Never sleep past the deadline
                Some(timeout) => options.interval.min(timeout - waited),
                None => options.interval,
            };

            tokio::time::sleep(pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbx_core::domain::run::RunResultState;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn run_body(life_cycle: &str, result: Option<&str>) -> serde_json::Value {
        let mut state = serde_json::json!({
            "life_cycle_state": life_cycle,
            "state_message": ""
        });
        if let Some(result) = result {
            state["result_state"] = serde_json::json!(result);
        }
        serde_json::json!({
            "job_id": 7,
            "run_id": 99,
            "run_page_url": "https://adb-1.azuredatabricks.net/#job/7/run/99",
            "state": state
        })
    }

    fn fast_poll() -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(10),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_run_now() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/jobs/run-now"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "job_id": 7,
                "notebook_params": { "train_type": "CT_pipeline" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "run_id": 99, "number_in_job": 3 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let params = HashMap::from([("train_type".to_string(), "CT_pipeline".to_string())]);
        let response = client.run_now(7, params).await.unwrap();

        assert_eq!(response.run_id, 99);
        assert_eq!(response.number_in_job, Some(3));
    }

    #[tokio::test]
    async fn test_run_now_unknown_job() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/jobs/run-now"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error_code": "INVALID_PARAMETER_VALUE",
                "message": "Job 7 does not exist."
            })))
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let err = client.run_now(7, HashMap::new()).await.unwrap_err();
        assert!(err.to_string().contains("Job 7 does not exist."));
    }

    #[tokio::test]
    async fn test_get_run_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .and(query_param("run_id", "99"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("PENDING", None)))
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let status = client.get_run_status(99).await.unwrap();
        assert_eq!(status, RunLifeCycleState::Pending);
    }

    #[tokio::test]
    async fn test_wait_for_run_polls_until_terminal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("RUNNING", None)))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(run_body("TERMINATED", Some("SUCCESS"))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let run = client.wait_for_run(99, &fast_poll()).await.unwrap();

        assert_eq!(run.state.life_cycle_state, RunLifeCycleState::Terminated);
        assert!(run.succeeded());
    }

    #[tokio::test]
    async fn test_wait_for_run_returns_failed_runs() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(run_body("TERMINATED", Some("FAILED"))),
            )
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let run = client.wait_for_run(99, &fast_poll()).await.unwrap();

        assert!(!run.succeeded());
        assert_eq!(run.state.result_state, Some(RunResultState::Failed));
    }

    #[tokio::test]
    async fn test_wait_for_run_stops_on_internal_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("INTERNAL_ERROR", None)))
            .expect(1)
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let run = client.wait_for_run(99, &fast_poll()).await.unwrap();
        assert_eq!(run.state.life_cycle_state, RunLifeCycleState::InternalError);
    }

    #[tokio::test]
    async fn test_wait_for_run_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("RUNNING", None)))
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let options = PollOptions {
            interval: Duration::from_millis(10),
            timeout: Some(Duration::from_millis(50)),
        };
        let err = client.wait_for_run(99, &options).await.unwrap_err();

        match err {
            ClientError::Timeout { run_id, waited } => {
                assert_eq!(run_id, 99);
                assert!(waited >= Duration::from_millis(50));
            }
            other => panic!("Expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_for_run_timeout_shorter_than_interval() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(run_body("RUNNING", None)))
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let options = PollOptions {
            interval: Duration::from_secs(600),
            timeout: Some(Duration::from_millis(50)),
        };
        let result =
            tokio::time::timeout(Duration::from_secs(5), client.wait_for_run(99, &options)).await;

        match result {
            Ok(Err(ClientError::Timeout { waited, .. })) => {
                assert!(waited >= Duration::from_millis(50));
                assert!(waited < Duration::from_secs(5));
            }
            Ok(other) => panic!("Expected Timeout, got {:?}", other),
            Err(_) => panic!("wait_for_run slept a full interval past its timeout"),
        }
    }

    #[tokio::test]
    async fn test_wait_for_run_aborts_on_query_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/2.0/jobs/runs/get"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let err = client.wait_for_run(99, &fast_poll()).await.unwrap_err();
        assert!(err.is_server_error());
    }
}
