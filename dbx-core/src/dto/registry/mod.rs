//! Model registry DTOs

use serde::{Deserialize, Serialize};

use crate::domain::model::{Metric, ModelStage, ModelVersion};

/// Response of `mlflow/model-versions/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchModelVersionsResponse {
    #[serde(default)]
    pub model_versions: Vec<ModelVersion>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Response of `mlflow/runs/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRunResponse {
    pub run: TrackingRun,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingRun {
    #[serde(default)]
    pub data: TrackingRunData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingRunData {
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

impl TrackingRun {
    /// Latest value of a metric, if it was logged
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.data
            .metrics
            .iter()
            .filter(|m| m.key == key)
            .max_by_key(|m| (m.timestamp.unwrap_or(0), m.step.unwrap_or(0)))
            .map(|m| m.value)
    }
}

/// Body of `mlflow/model-versions/transition-stage`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStageRequest {
    pub name: String,
    pub version: String,
    pub stage: ModelStage,
    pub archive_existing_versions: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_lookup_takes_latest() {
        let resp: GetRunResponse = serde_json::from_value(serde_json::json!({
            "run": {
                "info": { "run_id": "abc" },
                "data": {
                    "metrics": [
                        { "key": "acc", "value": 0.7, "timestamp": 1, "step": 0 },
                        { "key": "acc", "value": 0.9, "timestamp": 2, "step": 0 },
                        { "key": "loss", "value": 0.1, "timestamp": 3, "step": 0 }
                    ]
                }
            }
        }))
        .unwrap();

        assert_eq!(resp.run.metric("acc"), Some(0.9));
        assert_eq!(resp.run.metric("f1"), None);
    }

    #[test]
    fn test_run_without_data() {
        let resp: GetRunResponse =
            serde_json::from_value(serde_json::json!({ "run": { "info": {} } })).unwrap();
        assert_eq!(resp.run.metric("acc"), None);
    }
}
