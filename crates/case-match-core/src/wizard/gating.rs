//! Completeness predicates that gate forward navigation.

use crate::models::{SelectionState, MAX_SELECTIONS};

use super::Step;

/// 1 to 3 concerns chosen.
pub fn concerns_complete(selection: &SelectionState) -> bool {
    (1..=MAX_SELECTIONS).contains(&selection.selected_concerns.len())
}

/// 1 to 3 areas chosen.
pub fn areas_complete(selection: &SelectionState) -> bool {
    (1..=MAX_SELECTIONS).contains(&selection.selected_areas.len())
}

/// A non-blank scalar answer.
pub fn scalar_complete(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Whether the user may leave `step` going forward.
pub fn is_step_complete(step: &Step, selection: &SelectionState, quiz_answers: &[Option<String>]) -> bool {
    match step {
        Step::Concerns => concerns_complete(selection),
        Step::Areas => areas_complete(selection),
        Step::Age => scalar_complete(selection.age_range.as_deref()),
        Step::SkinType => scalar_complete(selection.skin_type.as_deref()),
        Step::SkinTypeQuiz(q) => quiz_answers.get(*q).is_some_and(Option::is_some),
        Step::SkinTone => scalar_complete(selection.skin_tone.as_deref()),
        Step::EthnicBackground => scalar_complete(selection.ethnic_background.as_deref()),
        Step::Landing
        | Step::Onboarding(_)
        | Step::Celebration
        | Step::LeadCapture
        | Step::Results
        | Step::ConcernDetail(_)
        | Step::CaseDetail(_) => true,
    }
}
