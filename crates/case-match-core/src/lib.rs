//! Case-Match Core Library
//!
//! Matches treatment cases from a practice's catalog to a prospective
//! patient's consultation answers.
//!
//! # Architecture
//!
//! ```text
//! Case Catalog ──┐
//!                ├─→ Concern Filter ─→ Area Gate ─→ Surgical Filter ─→ Scoring
//! Selection ─────┘                                                        │
//!                                                                         ▼
//!                         ┌───────────────────────────────────────────────┤
//!                         │                       │                       │
//!                         ▼                       ▼                       ▼
//!                 Ranked per-concern      Deduplicated concern     Treatment groups
//!                    case lists              partition
//! ```
//!
//! # Core Principle
//!
//! **Curated data beats inference.** An explicit surgical flag or a curated
//! category tag always overrides keyword heuristics.
//!
//! # Modules
//!
//! - [`models`]: Domain types (CaseItem, SelectionState, Concern, Area, ...)
//! - [`config`]: Reference data and the injected category mapping
//! - [`matcher`]: Surgical filter, keyword/area resolver, scorer, matching engine
//! - [`wizard`]: Consultation step sequencing and selection gating

pub mod config;
pub mod matcher;
pub mod models;
pub mod wizard;

// Re-export commonly used types
pub use config::{CategoryMapping, ConfigError, MatchConfig};
pub use matcher::{
    calculate_matching_score, is_surgical_case, normalize_keyword, relevant_areas_for_case,
    Matcher,
};
pub use models::{
    Area, CaseItem, Concern, ConcernMatches, DeduplicatedMatches, ReferenceData, ScoreBreakdown,
    ScoredCase, SelectionSnapshot, SelectionState, TreatmentGroup,
};
pub use wizard::{SelectionChange, Step, Wizard, WizardError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CaseMatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Wizard error: {0}")]
    WizardError(String),
}

impl From<ConfigError> for CaseMatchError {
    fn from(e: ConfigError) -> Self {
        CaseMatchError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for CaseMatchError {
    fn from(e: serde_json::Error) -> Self {
        CaseMatchError::SerializationError(e.to_string())
    }
}

impl From<WizardError> for CaseMatchError {
    fn from(e: WizardError) -> Self {
        CaseMatchError::WizardError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CaseMatchError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CaseMatchError::InvalidInput(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an engine from a JSON configuration (reference data and category mapping).
#[uniffi::export]
pub fn open_engine(config_json: String) -> Result<Arc<CaseMatchEngine>, CaseMatchError> {
    let config = MatchConfig::from_json(&config_json)?;
    Ok(Arc::new(CaseMatchEngine::new(config)))
}

/// Open an engine with the built-in reference data and no curated mapping.
#[uniffi::export]
pub fn open_default_engine() -> Arc<CaseMatchEngine> {
    Arc::new(CaseMatchEngine::new(MatchConfig::default()))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe matcher plus the current catalog, for FFI hosts.
#[derive(uniffi::Object)]
pub struct CaseMatchEngine {
    matcher: Matcher,
    catalog: Mutex<Vec<CaseItem>>,
}

impl CaseMatchEngine {
    fn new(config: MatchConfig) -> Self {
        Self {
            matcher: Matcher::new(config),
            catalog: Mutex::new(Vec::new()),
        }
    }
}

#[uniffi::export]
impl CaseMatchEngine {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Replace the catalog with a JSON array of canonical cases.
    pub fn load_catalog_json(&self, json: String) -> Result<u32, CaseMatchError> {
        let cases: Vec<CaseItem> = serde_json::from_str(&json)?;
        self.replace_catalog(cases)
    }

    /// Replace the catalog with already-normalized cases.
    pub fn set_catalog(&self, cases: Vec<FfiCaseItem>) -> Result<u32, CaseMatchError> {
        self.replace_catalog(cases.into_iter().map(Into::into).collect())
    }

    /// Number of cases currently loaded.
    pub fn catalog_size(&self) -> Result<u32, CaseMatchError> {
        Ok(self.catalog.lock()?.len() as u32)
    }

    // =========================================================================
    // Matching Operations
    // =========================================================================

    /// Ranked non-surgical cases for one concern.
    pub fn matching_cases_for_concern(
        &self,
        concern_id: String,
        selection: FfiSelection,
    ) -> Result<Vec<FfiScoredCase>, CaseMatchError> {
        let catalog = self.catalog.lock()?;
        let selection: SelectionState = selection.into();
        let cases = self
            .matcher
            .matching_cases_for_concern(&concern_id, &catalog, &selection);
        Ok(cases.into_iter().map(Into::into).collect())
    }

    /// Per-concern buckets for the selection's concerns, each case at most once.
    pub fn deduplicated_cases_per_concern(
        &self,
        selection: FfiSelection,
    ) -> Result<Vec<FfiConcernMatches>, CaseMatchError> {
        let catalog = self.catalog.lock()?;
        let selection: SelectionState = selection.into();
        let matches = self.matcher.deduplicated_cases_per_concern(
            &selection.selected_concerns,
            &catalog,
            &selection,
        );
        Ok(matches.buckets.into_iter().map(Into::into).collect())
    }

    /// Area IDs with at least one matching case; never empty.
    pub fn available_areas_for_concerns(
        &self,
        selection: FfiSelection,
    ) -> Result<Vec<String>, CaseMatchError> {
        let catalog = self.catalog.lock()?;
        let selection: SelectionState = selection.into();
        Ok(self.matcher.available_areas_for_concerns(
            &selection.selected_concerns,
            &catalog,
            &selection,
        ))
    }

    /// Group the given cases by treatment suggestion.
    pub fn group_cases_by_treatment_suggestion(
        &self,
        cases: Vec<FfiCaseItem>,
        selection: FfiSelection,
    ) -> Vec<FfiTreatmentGroup> {
        let cases: Vec<CaseItem> = cases.into_iter().map(Into::into).collect();
        let selection: SelectionState = selection.into();
        self.matcher
            .group_cases_by_treatment_suggestion(&cases, &selection)
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Whether a case is surgical.
    pub fn is_surgical(&self, case: FfiCaseItem) -> bool {
        let case: CaseItem = case.into();
        is_surgical_case(&case)
    }

    /// Matching score (0-95) of a case for a selection.
    pub fn score_case(&self, case: FfiCaseItem, selection: FfiSelection) -> u32 {
        let case: CaseItem = case.into();
        let selection: SelectionState = selection.into();
        self.matcher.score_case(&case, &selection).matching_score
    }
}

impl CaseMatchEngine {
    fn replace_catalog(&self, cases: Vec<CaseItem>) -> Result<u32, CaseMatchError> {
        let mut catalog = self.catalog.lock()?;
        *catalog = cases;
        Ok(catalog.len() as u32)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe case.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaseItem {
    pub id: String,
    pub name: String,
    pub headline: String,
    pub story: String,
    pub patient: String,
    pub treatment: String,
    pub solved: Vec<String>,
    pub matching_criteria: Vec<String>,
    pub surgical: Option<String>,
    pub patient_age: Option<u32>,
    pub skin_type: Option<String>,
    pub skin_tone: Option<String>,
    pub area_names: Vec<String>,
}

impl From<CaseItem> for FfiCaseItem {
    fn from(case: CaseItem) -> Self {
        Self {
            id: case.id,
            name: case.name,
            headline: case.headline,
            story: case.story,
            patient: case.patient,
            treatment: case.treatment,
            solved: case.solved,
            matching_criteria: case.matching_criteria,
            surgical: case.surgical,
            patient_age: case.patient_age,
            skin_type: case.skin_type,
            skin_tone: case.skin_tone,
            area_names: case.area_names,
        }
    }
}

impl From<FfiCaseItem> for CaseItem {
    fn from(case: FfiCaseItem) -> Self {
        CaseItem {
            id: case.id,
            name: case.name,
            headline: case.headline,
            story: case.story,
            patient: case.patient,
            treatment: case.treatment,
            solved: case.solved,
            matching_criteria: case.matching_criteria,
            surgical: case.surgical,
            patient_age: case.patient_age,
            skin_type: case.skin_type,
            skin_tone: case.skin_tone,
            area_names: case.area_names,
        }
    }
}

/// FFI-safe selection.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSelection {
    pub selected_concerns: Vec<String>,
    pub selected_areas: Vec<String>,
    pub age_range: Option<String>,
    pub skin_type: Option<String>,
    pub skin_tone: Option<String>,
    pub ethnic_background: Option<String>,
}

impl From<FfiSelection> for SelectionState {
    fn from(selection: FfiSelection) -> Self {
        SelectionState {
            selected_concerns: selection.selected_concerns,
            selected_areas: selection.selected_areas,
            age_range: selection.age_range,
            skin_type: selection.skin_type,
            skin_tone: selection.skin_tone,
            ethnic_background: selection.ethnic_background,
        }
    }
}

/// FFI-safe scored case.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScoredCase {
    pub item: FfiCaseItem,
    pub matching_score: u32,
    pub age_score: u32,
    pub concern_score: u32,
    pub skin_type_score: u32,
    pub skin_tone_score: u32,
}

impl From<ScoredCase> for FfiScoredCase {
    fn from(scored: ScoredCase) -> Self {
        Self {
            matching_score: scored.matching_score,
            age_score: scored.breakdown.age,
            concern_score: scored.breakdown.concern,
            skin_type_score: scored.breakdown.skin_type,
            skin_tone_score: scored.breakdown.skin_tone,
            item: scored.case.into(),
        }
    }
}

/// FFI-safe concern bucket.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConcernMatches {
    pub concern_id: String,
    pub cases: Vec<FfiScoredCase>,
}

impl From<ConcernMatches> for FfiConcernMatches {
    fn from(matches: ConcernMatches) -> Self {
        Self {
            concern_id: matches.concern_id,
            cases: matches.cases.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe treatment group.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatmentGroup {
    pub suggestion: String,
    pub treatments: Vec<String>,
    pub cases: Vec<FfiScoredCase>,
}

impl From<TreatmentGroup> for FfiTreatmentGroup {
    fn from(group: TreatmentGroup) -> Self {
        Self {
            suggestion: group.suggestion,
            treatments: group.treatments,
            cases: group.cases.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(concerns: &[&str]) -> FfiSelection {
        FfiSelection {
            selected_concerns: concerns.iter().map(|s| s.to_string()).collect(),
            selected_areas: Vec::new(),
            age_range: None,
            skin_type: None,
            skin_tone: None,
            ethnic_background: None,
        }
    }

    #[test]
    fn test_engine_round_trip() {
        let engine = open_default_engine();
        let loaded = engine
            .load_catalog_json(
                r#"[
                    {"id":"a","name":"Resolve Volume Loss with Fillers"},
                    {"id":"b","name":"Rhinoplasty for Volume"},
                    {"id":"c","name":"Soften Wrinkles and Restore Volume"}
                ]"#
                .into(),
            )
            .unwrap();
        assert_eq!(loaded, 3);

        let matches = engine
            .matching_cases_for_concern("volume-loss".into(), selection(&["volume-loss"]))
            .unwrap();
        let ids: Vec<&str> = matches.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let buckets = engine
            .deduplicated_cases_per_concern(selection(&["fine-lines-wrinkles", "volume-loss"]))
            .unwrap();
        assert_eq!(buckets[0].cases.len(), 1);
        assert_eq!(buckets[1].cases.len(), 1);
    }

    #[test]
    fn test_load_catalog_with_boolean_flag_and_text_age() {
        let engine = open_default_engine();
        let loaded = engine
            .load_catalog_json(
                r#"[
                    {"id":"a","name":"Resolve Volume Loss with Fillers","surgical":false,"patientAge":"44"},
                    {"id":"b","name":"Restore Volume with Implant","surgical":true}
                ]"#
                .into(),
            )
            .unwrap();
        assert_eq!(loaded, 2);

        let matches = engine
            .matching_cases_for_concern("volume-loss".into(), selection(&["volume-loss"]))
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].item.id, "a");
        assert_eq!(matches[0].item.patient_age, Some(44));
    }

    #[test]
    fn test_open_engine_with_mapping() {
        let engine = open_engine(r#"{"categoryMapping":{"x":["pigmentation"]}}"#.into()).unwrap();
        engine
            .set_catalog(vec![CaseItem::new("x", "Glow Up").into()])
            .unwrap();

        let matches = engine
            .matching_cases_for_concern("pigmentation".into(), selection(&["pigmentation"]))
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(engine.catalog_size().unwrap(), 1);
    }

    #[test]
    fn test_open_engine_bad_config() {
        assert!(matches!(
            open_engine("not json".into()),
            Err(CaseMatchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_malformed_catalog() {
        let engine = open_default_engine();
        assert!(matches!(
            engine.load_catalog_json("{".into()),
            Err(CaseMatchError::SerializationError(_))
        ));
    }

    #[test]
    fn test_available_areas_default_to_all() {
        let engine = open_default_engine();
        let areas = engine.available_areas_for_concerns(selection(&[])).unwrap();
        assert_eq!(areas.len(), ReferenceData::default().areas.len());
    }
}
