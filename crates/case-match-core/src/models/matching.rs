//! Matching result models.

use serde::{Deserialize, Serialize};

use super::CaseItem;

/// Upper bound of a matching score. Scores are estimates, never certainty.
pub const MAX_MATCHING_SCORE: u32 = 95;

/// Breakdown of how a case was scored against a selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    /// Baseline relevance - always 15
    pub base: u32,
    /// Age proximity (0 - 30)
    pub age: u32,
    /// Concern keyword match (0 or 25 - 40)
    pub concern: u32,
    /// Skin type match (8 - 15)
    pub skin_type: u32,
    /// Skin tone proximity (5 - 10)
    pub skin_tone: u32,
}

impl ScoreBreakdown {
    /// Sum of all components, clamped to `0..=MAX_MATCHING_SCORE`.
    pub fn total(&self) -> u32 {
        let sum = self.base + self.age + self.concern + self.skin_type + self.skin_tone;
        sum.min(MAX_MATCHING_SCORE)
    }
}

/// A case paired with its score for one selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCase {
    pub case: CaseItem,
    pub matching_score: u32,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCase {
    /// Attach a breakdown to a case.
    pub fn new(case: CaseItem, breakdown: ScoreBreakdown) -> Self {
        Self {
            case,
            matching_score: breakdown.total(),
            breakdown,
        }
    }

    pub fn id(&self) -> &str {
        &self.case.id
    }
}

/// Cases assigned to one concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConcernMatches {
    pub concern_id: String,
    pub cases: Vec<ScoredCase>,
}

/// Concern buckets in which every case appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeduplicatedMatches {
    /// Buckets in the order the concerns were selected
    pub buckets: Vec<ConcernMatches>,
}

impl DeduplicatedMatches {
    /// Cases claimed by a concern, if that concern was requested.
    pub fn get(&self, concern_id: &str) -> Option<&[ScoredCase]> {
        self.buckets
            .iter()
            .find(|b| b.concern_id == concern_id)
            .map(|b| b.cases.as_slice())
    }

    /// Number of distinct cases across all buckets.
    pub fn total_unique_cases(&self) -> usize {
        self.buckets.iter().map(|b| b.cases.len()).sum()
    }

    /// Case IDs across all buckets, in bucket order.
    pub fn case_ids(&self) -> Vec<&str> {
        self.buckets
            .iter()
            .flat_map(|b| b.cases.iter().map(ScoredCase::id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.cases.is_empty())
    }
}

/// Cases sharing one parsed concern label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentGroup {
    /// Concern label parsed from the case names
    pub suggestion: String,
    /// Distinct treatment labels within the group, first-seen order
    pub treatments: Vec<String>,
    /// Member cases, score descending
    pub cases: Vec<ScoredCase>,
}
