//! Job run domain types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Coarse phase of a job run as reported by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunLifeCycleState {
    Pending,
    Queued,
    Running,
    Terminating,
    Terminated,
    Skipped,
    InternalError,
    Blocked,
    WaitingForRetry,
    /// A state this client does not know about yet
    Unknown(String),
}

impl RunLifeCycleState {
    /// Whether the run has stopped and will not change state again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Terminated | Self::Skipped | Self::InternalError
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Terminating => "TERMINATING",
            Self::Terminated => "TERMINATED",
            Self::Skipped => "SKIPPED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Blocked => "BLOCKED",
            Self::WaitingForRetry => "WAITING_FOR_RETRY",
            Self::Unknown(s) => s,
        }
    }
}

impl From<&str> for RunLifeCycleState {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "QUEUED" => Self::Queued,
            "RUNNING" => Self::Running,
            "TERMINATING" => Self::Terminating,
            "TERMINATED" => Self::Terminated,
            "SKIPPED" => Self::Skipped,
            "INTERNAL_ERROR" => Self::InternalError,
            "BLOCKED" => Self::Blocked,
            "WAITING_FOR_RETRY" => Self::WaitingForRetry,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Outcome of a run once its life cycle is terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResultState {
    Success,
    Failed,
    TimedOut,
    Canceled,
    MaximumConcurrentRunsReached,
    Excluded,
    SuccessWithFailures,
    UpstreamFailed,
    UpstreamCanceled,
    Unknown(String),
}

impl RunResultState {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::TimedOut => "TIMEDOUT",
            Self::Canceled => "CANCELED",
            Self::MaximumConcurrentRunsReached => "MAXIMUM_CONCURRENT_RUNS_REACHED",
            Self::Excluded => "EXCLUDED",
            Self::SuccessWithFailures => "SUCCESS_WITH_FAILURES",
            Self::UpstreamFailed => "UPSTREAM_FAILED",
            Self::UpstreamCanceled => "UPSTREAM_CANCELED",
            Self::Unknown(s) => s,
        }
    }
}

impl From<&str> for RunResultState {
    fn from(s: &str) -> Self {
        match s {
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            "TIMEDOUT" => Self::TimedOut,
            "CANCELED" => Self::Canceled,
            "MAXIMUM_CONCURRENT_RUNS_REACHED" => Self::MaximumConcurrentRunsReached,
            "EXCLUDED" => Self::Excluded,
            "SUCCESS_WITH_FAILURES" => Self::SuccessWithFailures,
            "UPSTREAM_FAILED" => Self::UpstreamFailed,
            "UPSTREAM_CANCELED" => Self::UpstreamCanceled,
            other => Self::Unknown(other.to_string()),
        }
    }
}

// Both state enums travel as bare strings; unknown values must not fail decoding.
macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(<$ty>::from(s.as_str()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_serde!(RunLifeCycleState);
string_serde!(RunResultState);

/// State block of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub life_cycle_state: RunLifeCycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_state: Option<RunResultState>,
    #[serde(default)]
    pub state_message: String,
}

/// A single execution of a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: i64,
    #[serde(default)]
    pub job_id: Option<i64>,
    #[serde(default)]
    pub run_name: Option<String>,
    #[serde(default)]
    pub run_page_url: Option<String>,
    pub state: RunState,
    /// Epoch milliseconds
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Epoch milliseconds, zero while running
    #[serde(default)]
    pub end_time: Option<i64>,
}

impl Run {
    pub fn started_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.start_time
            .filter(|ms| *ms > 0)
            .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
    }

    pub fn ended_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.end_time
            .filter(|ms| *ms > 0)
            .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
    }

    /// True when the run is terminal and reported success
    pub fn succeeded(&self) -> bool {
        self.state.life_cycle_state.is_terminal()
            && self
                .state
                .result_state
                .as_ref()
                .is_some_and(RunResultState::is_success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RunLifeCycleState::Terminated.is_terminal());
        assert!(RunLifeCycleState::Skipped.is_terminal());
        assert!(RunLifeCycleState::InternalError.is_terminal());
        assert!(!RunLifeCycleState::Running.is_terminal());
        assert!(!RunLifeCycleState::Terminating.is_terminal());
        assert!(!RunLifeCycleState::Unknown("NEW_STATE".into()).is_terminal());
    }

    #[test]
    fn test_run_deserialization() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "job_id": 11,
            "run_id": 455644833,
            "run_page_url": "https://example.cloud.databricks.com/#job/11/run/1",
            "start_time": 1625060460483_i64,
            "end_time": 0,
            "state": {
                "life_cycle_state": "RUNNING",
                "state_message": ""
            },
            "tasks": []
        }))
        .unwrap();

        assert_eq!(run.run_id, 455644833);
        assert_eq!(run.state.life_cycle_state, RunLifeCycleState::Running);
        assert!(run.state.result_state.is_none());
        assert!(run.started_at().is_some());
        assert!(run.ended_at().is_none());
        assert!(!run.succeeded());
    }

    #[test]
    fn test_unknown_states_survive() {
        let state: RunState = serde_json::from_value(serde_json::json!({
            "life_cycle_state": "PARKED",
            "result_state": "PARTIAL"
        }))
        .unwrap();

        assert_eq!(
            state.life_cycle_state,
            RunLifeCycleState::Unknown("PARKED".into())
        );
        assert_eq!(state.life_cycle_state.to_string(), "PARKED");
        assert_eq!(
            state.result_state,
            Some(RunResultState::Unknown("PARTIAL".into()))
        );
    }

    #[test]
    fn test_succeeded_requires_success_result() {
        let mut run: Run = serde_json::from_value(serde_json::json!({
            "run_id": 1,
            "state": { "life_cycle_state": "TERMINATED", "result_state": "SUCCESS" }
        }))
        .unwrap();
        assert!(run.succeeded());

        run.state.result_state = Some(RunResultState::Failed);
        assert!(!run.succeeded());
    }
}
