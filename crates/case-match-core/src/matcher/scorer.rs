//! Relevance scoring of a case against a selection.
//!
//! Additive point budget:
//! - Base: 15
//! - Age proximity: up to 30
//! - Concern keyword match: 0, or 25 - 40
//! - Skin type: 8 - 15
//! - Skin tone: 5 - 10
//!
//! The sum is capped at 95. Missing optional fields earn partial credit,
//! never a hard mismatch.

use crate::models::{CaseItem, ReferenceData, ScoreBreakdown, SelectionState};

const BASE_POINTS: u32 = 15;

/// Credit when the selection has an age band but the case has no age.
const AGE_UNKNOWN_POINTS: u32 = 15;

/// (maximum age difference, points), checked in order.
const AGE_BUCKETS: &[(i64, u32)] = &[(0, 30), (2, 27), (5, 24), (10, 20), (15, 16)];
const AGE_FAR_POINTS: u32 = 12;

const CONCERN_MATCH_FLOOR: u32 = 25;
const CONCERN_MATCH_RANGE: f64 = 15.0;

const SKIN_TYPE_EXACT_POINTS: u32 = 15;
const SKIN_TYPE_PARTIAL_POINTS: u32 = 8;

const SKIN_TONE_EXACT_POINTS: u32 = 10;
const SKIN_TONE_ADJACENT_POINTS: u32 = 7;
const SKIN_TONE_PARTIAL_POINTS: u32 = 5;

/// Tones considered close to each user tone.
const SKIN_TONE_GROUPS: &[(&str, &[&str])] = &[
    ("light", &["light", "fair"]),
    ("fair", &["light", "fair", "medium"]),
    ("medium", &["fair", "medium", "tan"]),
    ("tan", &["medium", "tan", "brown"]),
    ("brown", &["tan", "brown", "deep"]),
    ("deep", &["brown", "deep"]),
];

/// Score a case for a selection. `total()` of the result is in `0..=95`.
pub fn calculate_matching_score(
    case: &CaseItem,
    selection: &SelectionState,
    reference: &ReferenceData,
) -> ScoreBreakdown {
    ScoreBreakdown {
        base: BASE_POINTS,
        age: score_age(selection.age_midpoint(), case.patient_age),
        concern: score_concerns(case, &selection.selected_concerns, reference),
        skin_type: score_skin_type(selection.skin_type.as_deref(), case.skin_type.as_deref()),
        skin_tone: score_skin_tone(selection.skin_tone.as_deref(), case.skin_tone.as_deref()),
    }
}

/// Age proximity between the selection's band midpoint and the case age.
pub fn score_age(midpoint: Option<i64>, case_age: Option<u32>) -> u32 {
    match (midpoint, case_age) {
        (Some(midpoint), Some(age)) => {
            let diff = (i64::from(age) - midpoint).abs();
            AGE_BUCKETS
                .iter()
                .find(|(max_diff, _)| diff <= *max_diff)
                .map(|(_, points)| *points)
                .unwrap_or(AGE_FAR_POINTS)
        }
        (Some(_), None) => AGE_UNKNOWN_POINTS,
        (None, _) => 0,
    }
}

/// Concern match: 25 plus up to 15 by the share of selected concerns hit.
fn score_concerns(case: &CaseItem, selected: &[String], reference: &ReferenceData) -> u32 {
    if selected.is_empty() {
        return 0;
    }

    let name = case.name.to_lowercase();
    let criteria: Vec<String> = case.matching_criteria.iter().map(|c| c.to_lowercase()).collect();

    let matched = selected
        .iter()
        .filter_map(|id| reference.concern(id))
        .filter(|concern| {
            concern.maps_to_photos.iter().any(|keyword| {
                let keyword = keyword.trim().to_lowercase();
                !keyword.is_empty()
                    && (name.contains(&keyword) || criteria.iter().any(|c| c.contains(&keyword)))
            })
        })
        .count();

    if matched == 0 {
        return 0;
    }

    let ratio = matched as f64 / selected.len() as f64;
    CONCERN_MATCH_FLOOR + (ratio * CONCERN_MATCH_RANGE).round() as u32
}

fn score_skin_type(selected: Option<&str>, case: Option<&str>) -> u32 {
    match (selected, case) {
        (Some(s), Some(c)) if s.trim().eq_ignore_ascii_case(c.trim()) => SKIN_TYPE_EXACT_POINTS,
        _ => SKIN_TYPE_PARTIAL_POINTS,
    }
}

fn score_skin_tone(selected: Option<&str>, case: Option<&str>) -> u32 {
    let (Some(selected), Some(case)) = (selected, case) else {
        return SKIN_TONE_PARTIAL_POINTS;
    };

    let selected = selected.trim().to_lowercase();
    let case = case.trim().to_lowercase();

    if selected == case {
        return SKIN_TONE_EXACT_POINTS;
    }

    let adjacent = SKIN_TONE_GROUPS
        .iter()
        .find(|(tone, _)| *tone == selected)
        .is_some_and(|(_, group)| group.contains(&case.as_str()));

    if adjacent {
        SKIN_TONE_ADJACENT_POINTS
    } else {
        SKIN_TONE_PARTIAL_POINTS
    }
}
