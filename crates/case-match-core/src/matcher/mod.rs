//! Case matching engine.
//!
//! Pipeline: Concern Filter → Area Gate → Surgical Filter → Scoring → Ranking
//!
//! Every operation is pure over the supplied catalog and selection: no I/O,
//! no caching between calls, and no errors. Missing data degrades to an
//! empty result or partial credit.

mod areas;
mod grouping;
mod keywords;
mod scorer;
mod surgical;

pub use areas::*;
pub use grouping::*;
pub use keywords::*;
pub use scorer::*;
pub use surgical::*;

use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::models::{
    CaseItem, Concern, ConcernMatches, DeduplicatedMatches, ScoredCase, SelectionState,
    TreatmentGroup, FULL_FACE_ID,
};

/// Matcher that coordinates filtering, scoring and grouping.
#[derive(Debug)]
pub struct Matcher {
    config: MatchConfig,
    patterns: KeywordPatterns,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl Matcher {
    /// Create a matcher, precompiling every concern keyword.
    pub fn new(config: MatchConfig) -> Self {
        let patterns = KeywordPatterns::compile(&config.reference);
        Self { config, patterns }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Score one case for a selection.
    pub fn score_case(&self, case: &CaseItem, selection: &SelectionState) -> ScoredCase {
        let breakdown = calculate_matching_score(case, selection, &self.config.reference);
        ScoredCase::new(case.clone(), breakdown)
    }

    /// Non-surgical cases matching one concern, best score first.
    ///
    /// When the selection names areas, a case must also overlap them.
    /// Equal scores keep catalog order.
    pub fn matching_cases_for_concern(
        &self,
        concern_id: &str,
        catalog: &[CaseItem],
        selection: &SelectionState,
    ) -> Vec<ScoredCase> {
        let Some(concern) = self.config.reference.concern(concern_id) else {
            tracing::debug!(concern_id, "unknown concern, no cases matched");
            return Vec::new();
        };

        let concern_matched: Vec<&CaseItem> = catalog
            .iter()
            .filter(|case| self.matches_concern(case, concern))
            .collect();
        let concern_count = concern_matched.len();

        let area_matched: Vec<&CaseItem> = if selection.has_areas() {
            concern_matched
                .into_iter()
                .filter(|case| self.matches_selected_areas(case, &selection.selected_areas))
                .collect()
        } else {
            concern_matched
        };
        let area_count = area_matched.len();

        let mut scored: Vec<ScoredCase> = area_matched
            .into_iter()
            .filter(|case| !is_surgical_case(case))
            .map(|case| self.score_case(case, selection))
            .collect();

        tracing::debug!(
            concern_id,
            catalog = catalog.len(),
            concern_matched = concern_count,
            area_matched = area_count,
            non_surgical = scored.len(),
            "filtered cases for concern"
        );

        if scored.is_empty() {
            tracing::debug!(concern_id, "no cases matched concern");
        }

        // Stable: ties keep catalog order
        scored.sort_by(|a, b| b.matching_score.cmp(&a.matching_score));
        scored
    }

    /// Per-concern matches in which each case appears at most once.
    ///
    /// Concerns are visited in the given order; the first concern to match a
    /// case claims it and later concerns never see it.
    pub fn deduplicated_cases_per_concern(
        &self,
        concern_ids: &[String],
        catalog: &[CaseItem],
        selection: &SelectionState,
    ) -> DeduplicatedMatches {
        let mut claimed: HashSet<String> = HashSet::new();
        let mut buckets = Vec::with_capacity(concern_ids.len());

        for concern_id in concern_ids {
            let cases: Vec<ScoredCase> = self
                .matching_cases_for_concern(concern_id, catalog, selection)
                .into_iter()
                .filter(|scored| claimed.insert(scored.case.id.clone()))
                .collect();

            buckets.push(ConcernMatches {
                concern_id: concern_id.clone(),
                cases,
            });
        }

        DeduplicatedMatches { buckets }
    }

    /// Area IDs that have at least one matching case for the concerns.
    ///
    /// Never empty: with no concerns or no inferable areas every area is offered.
    pub fn available_areas_for_concerns(
        &self,
        concern_ids: &[String],
        catalog: &[CaseItem],
        selection: &SelectionState,
    ) -> Vec<String> {
        let reference = &self.config.reference;
        let unfiltered = SelectionState {
            selected_areas: Vec::new(),
            ..selection.clone()
        };

        let mut found: HashSet<String> = HashSet::new();
        for concern_id in concern_ids {
            for scored in self.matching_cases_for_concern(concern_id, catalog, &unfiltered) {
                found.extend(relevant_area_ids_for_case(&scored.case, reference));
            }
        }

        if found.contains(FULL_FACE_ID) {
            found.extend(reference.facial_area_ids().map(str::to_string));
        }

        if found.is_empty() {
            return reference.all_area_ids();
        }

        reference
            .areas
            .iter()
            .filter(|area| found.contains(&area.id))
            .map(|area| area.id.clone())
            .collect()
    }

    /// Score and group cases by the concern label parsed from their names.
    pub fn group_cases_by_treatment_suggestion(
        &self,
        cases: &[CaseItem],
        selection: &SelectionState,
    ) -> Vec<TreatmentGroup> {
        let scored = cases
            .iter()
            .map(|case| self.score_case(case, selection))
            .collect();
        group_scored_cases(scored)
    }

    /// Curated tag first, then keywords in name, criteria and solved issues.
    fn matches_concern(&self, case: &CaseItem, concern: &Concern) -> bool {
        if self.config.category_mapping.is_tagged(&case.id, &concern.id) {
            return true;
        }

        case.keyword_fields().any(|field| {
            let field = field.to_lowercase();
            self.patterns.matches_any_lowered(&concern.maps_to_photos, &field)
                || self.patterns.matches_any_lowered(&concern.maps_to_specific_issues, &field)
        })
    }

    fn matches_selected_areas(&self, case: &CaseItem, selected: &[String]) -> bool {
        let reference = &self.config.reference;
        let facial_selected = selected
            .iter()
            .any(|id| id == FULL_FACE_ID || reference.is_facial_area(id));

        if facial_selected && signals_all_areas(case) {
            return true;
        }

        let case_areas = relevant_area_ids_for_case(case, reference);
        if facial_selected && case_areas.iter().any(|id| id == FULL_FACE_ID) {
            return true;
        }

        case_areas.iter().any(|id| selected.contains(id))
    }
}
