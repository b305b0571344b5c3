//! Model promotion planning
//!
//! Decides which registered model version should serve in production. The
//! newest version replaces the current production version only when its
//! tracked metric is strictly better; when nothing is in production yet the
//! newest version is promoted unconditionally.

use thiserror::Error;

use crate::domain::model::ModelVersion;

/// Reasons a promotion cannot be planned
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PromotionError {
    #[error("no versions registered for model {0}")]
    NoVersions(String),

    #[error("model {name} has {count} versions in Production, expected at most one")]
    AmbiguousProduction { name: String, count: usize },

    #[error("run {run_id} of model version {version} has no metric {metric}")]
    MissingMetric {
        version: String,
        run_id: String,
        metric: String,
    },

    #[error("model version {0} has no tracking run")]
    MissingRun(String),
}

/// Versions relevant to a promotion
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionCandidates {
    /// Highest version number
    pub latest: ModelVersion,
    /// The single version currently in production
    pub production: Option<ModelVersion>,
}

/// Outcome of comparing the latest version against production
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionDecision {
    /// Nothing is in production; promote the latest version
    PromoteFirst { version: ModelVersion },
    /// Latest is better; archive the old production version, then promote
    Replace {
        archive: ModelVersion,
        promote: ModelVersion,
        production_metric: f64,
        latest_metric: f64,
    },
    /// Production stays as is
    ///
    /// Metrics are `None` when the latest version is the production version,
    /// since nothing was compared.
    Keep {
        production: ModelVersion,
        production_metric: Option<f64>,
        latest_metric: Option<f64>,
    },
}

/// Pick the latest and production versions of a model
pub fn plan_promotion(
    name: &str,
    versions: &[ModelVersion],
) -> Result<PromotionCandidates, PromotionError> {
    let latest = versions
        .iter()
        .max_by_key(|v| v.version_number())
        .ok_or_else(|| PromotionError::NoVersions(name.to_string()))?;

    let production: Vec<&ModelVersion> = versions.iter().filter(|v| v.is_production()).collect();
    if production.len() > 1 {
        return Err(PromotionError::AmbiguousProduction {
            name: name.to_string(),
            count: production.len(),
        });
    }

    Ok(PromotionCandidates {
        latest: latest.clone(),
        production: production.first().map(|v| (*v).clone()),
    })
}

impl PromotionCandidates {
    /// Decide given the metric of each candidate's run
    ///
    /// Metrics are only consulted when a production version exists that is
    /// not the latest version; pass `None` for both otherwise (see
    /// [`PromotionCandidates::needs_metrics`]).
    pub fn decide(self, latest_metric: Option<f64>, production_metric: Option<f64>) -> PromotionDecision {
        let Some(production) = self.production else {
            return PromotionDecision::PromoteFirst {
                version: self.latest,
            };
        };

        if self.latest.version == production.version {
            return PromotionDecision::Keep {
                production,
                production_metric: None,
                latest_metric: None,
            };
        }

        match (latest_metric, production_metric) {
            (Some(latest), Some(current)) if latest > current => PromotionDecision::Replace {
                archive: production,
                promote: self.latest,
                production_metric: current,
                latest_metric: latest,
            },
            _ => PromotionDecision::Keep {
                production,
                production_metric,
                latest_metric,
            },
        }
    }

    /// Whether [`decide`](Self::decide) needs the metric of each version
    pub fn needs_metrics(&self) -> bool {
        self.production
            .as_ref()
            .is_some_and(|production| production.version != self.latest.version)
    }
}
