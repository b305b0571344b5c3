//! Model registry domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a registered model version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelStage {
    #[default]
    None,
    Staging,
    Production,
    Archived,
}

impl ModelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Staging => "Staging",
            Self::Production => "Production",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for ModelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version of a registered model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub name: String,
    /// Decimal string as returned by the registry
    pub version: String,
    #[serde(default)]
    pub current_stage: ModelStage,
    /// Tracking run that produced this version
    #[serde(default)]
    pub run_id: Option<String>,
}

impl ModelVersion {
    /// Numeric version; unparsable versions sort below every real one
    pub fn version_number(&self) -> u64 {
        self.version.parse().unwrap_or(0)
    }

    pub fn is_production(&self) -> bool {
        self.current_stage == ModelStage::Production
    }
}

/// A logged metric of a tracking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    pub value: f64,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub step: Option<i64>,
}
