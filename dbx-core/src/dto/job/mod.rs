//! Job DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `jobs/run-now`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowRequest {
    pub job_id: i64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub notebook_params: HashMap<String, String>,
}

/// Response of `jobs/run-now`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowResponse {
    pub run_id: i64,
    #[serde(default)]
    pub number_in_job: Option<i64>,
}
