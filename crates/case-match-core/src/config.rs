//! Engine configuration: reference data plus the curated category mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ReferenceData;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown concern '{concern_id}' mapped for case {case_id}")]
    UnknownConcern { case_id: String, concern_id: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Curated case ID → concern IDs tags. An entry here beats keyword inference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct CategoryMapping(HashMap<String, Vec<String>>);

impl CategoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a case with a concern.
    pub fn insert(&mut self, case_id: impl Into<String>, concern_id: impl Into<String>) {
        let concerns = self.0.entry(case_id.into()).or_default();
        let concern_id = concern_id.into();
        if !concerns.contains(&concern_id) {
            concerns.push(concern_id);
        }
    }

    /// Concerns curated for a case, if any.
    pub fn concerns_for(&self, case_id: &str) -> Option<&[String]> {
        self.0.get(case_id).map(Vec::as_slice)
    }

    /// Whether the case carries a curated tag for this concern.
    pub fn is_tagged(&self, case_id: &str, concern_id: &str) -> bool {
        self.concerns_for(case_id)
            .is_some_and(|concerns| concerns.iter().any(|c| c == concern_id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn entries(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Vec<String>)> for CategoryMapping {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the matcher needs besides the catalog and the selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchConfig {
    pub reference: ReferenceData,
    pub category_mapping: CategoryMapping,
}

impl MatchConfig {
    /// Built-in reference data with a caller-supplied mapping.
    pub fn with_mapping(category_mapping: CategoryMapping) -> Self {
        Self {
            reference: ReferenceData::default(),
            category_mapping,
        }
    }

    /// Load from JSON. Missing sections fall back to the built-in defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Every mapped concern must exist in the reference data.
    pub fn validate(&self) -> ConfigResult<()> {
        for (case_id, concerns) in self.category_mapping.entries() {
            if let Some(unknown) = concerns.iter().find(|c| self.reference.concern(c).is_none()) {
                return Err(ConfigError::UnknownConcern {
                    case_id: case_id.clone(),
                    concern_id: unknown.clone(),
                });
            }
        }
        Ok(())
    }
}
