//! Model registry API endpoints and promotion

use dbx_core::domain::model::{ModelStage, ModelVersion};
use dbx_core::dto::registry::{
    GetRunResponse, SearchModelVersionsResponse, TransitionStageRequest,
};
use dbx_core::promotion::{PromotionDecision, PromotionError, plan_promotion};
use tracing::info;

use crate::WorkspaceClient;
use crate::error::{ClientError, Result};

/// Build the `name=` search filter for a model
///
/// The filter grammar has no escape sequences, so a name is quoted with
/// whichever quote character it does not contain.
fn name_filter(name: &str) -> Result<String> {
    if !name.contains('\'') {
        Ok(format!("name='{}'", name))
    } else if !name.contains('"') {
        Ok(format!("name=\"{}\"", name))
    } else {
        Err(ClientError::InvalidRequest(format!(
            "model name {} contains both quote characters",
            name
        )))
    }
}

impl WorkspaceClient {
    // =============================================================================
    // Registry Queries
    // =============================================================================

    /// List every registered version of a model
    ///
    /// Follows `next_page_token` until the registry reports no more pages.
    pub async fn search_model_versions(&self, name: &str) -> Result<Vec<ModelVersion>> {
        let filter = name_filter(name)?;
        let mut versions = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .get("api/2.0/mlflow/model-versions/search")
                .query(&[("filter", filter.as_str())]);
            if let Some(token) = &page_token {
                request = request.query(&[("page_token", token.as_str())]);
            }

            let response = request.send().await?;
            let page: SearchModelVersionsResponse = self.handle_response(response).await?;
            versions.extend(page.model_versions);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(versions)
    }

    /// Latest value of a metric logged by a tracking run
    ///
    /// # Returns
    /// `None` if the run never logged the metric
    pub async fn get_run_metric(&self, run_id: &str, key: &str) -> Result<Option<f64>> {
        let response = self
            .get("api/2.0/mlflow/runs/get")
            .query(&[("run_id", run_id)])
            .send()
            .await?;

        let body: GetRunResponse = self.handle_response(response).await?;
        Ok(body.run.metric(key))
    }

    // =============================================================================
    // Stage Transitions
    // =============================================================================

    /// Move a model version to another stage
    pub async fn transition_stage(
        &self,
        name: &str,
        version: &str,
        stage: ModelStage,
    ) -> Result<()> {
        info!(model = name, version, stage = %stage, "Transitioning model version");
        let response = self
            .post("api/2.0/mlflow/model-versions/transition-stage")
            .json(&TransitionStageRequest {
                name: name.to_string(),
                version: version.to_string(),
                stage,
                archive_existing_versions: false,
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Promote the newest version of a model if it beats production
    ///
    /// When nothing is in production the newest version is promoted directly,
    /// and when the newest version already is in production nothing is
    /// fetched or changed. Otherwise the `metric` logged by each version's run
    /// is compared and the old production version is archived before the new
    /// one is promoted.
    ///
    /// # Returns
    /// The decision that was applied
    pub async fn promote_model(&self, name: &str, metric: &str) -> Result<PromotionDecision> {
        let versions = self.search_model_versions(name).await?;
        let candidates = plan_promotion(name, &versions)?;

        let decision = match candidates.production.clone() {
            Some(production) if candidates.needs_metrics() => {
                let production_metric = self.version_metric(&production, metric).await?;
                let latest_metric = self.version_metric(&candidates.latest, metric).await?;
                candidates.decide(Some(latest_metric), Some(production_metric))
            }
            _ => candidates.decide(None, None),
        };

        match &decision {
            PromotionDecision::PromoteFirst { version } => {
                self.transition_stage(name, &version.version, ModelStage::Production)
                    .await?;
            }
            PromotionDecision::Replace {
                archive, promote, ..
            } => {
                self.transition_stage(name, &archive.version, ModelStage::Archived)
                    .await?;
                self.transition_stage(name, &promote.version, ModelStage::Production)
                    .await?;
            }
            PromotionDecision::Keep { .. } => {
                info!(model = name, "Production version unchanged");
            }
        }

        Ok(decision)
    }

    async fn version_metric(&self, version: &ModelVersion, metric: &str) -> Result<f64> {
        let run_id = version
            .run_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PromotionError::MissingRun(version.version.clone()))?;

        let value = self
            .get_run_metric(run_id, metric)
            .await?
            .ok_or_else(|| PromotionError::MissingMetric {
                version: version.version.clone(),
                run_id: run_id.to_string(),
                metric: metric.to_string(),
            })?;
        Ok(value)
    }
}
