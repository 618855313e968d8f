//! Wizard steps and their forward order.

use serde::{Deserialize, Serialize};

/// Number of onboarding sub-steps.
pub const ONBOARDING_STEPS: u8 = 3;

/// A position in the consultation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Landing,
    /// Onboarding sub-step (0-based)
    Onboarding(u8),
    Concerns,
    Areas,
    Age,
    SkinType,
    /// "Not sure" skin-type sub-flow, current question index
    SkinTypeQuiz(usize),
    SkinTone,
    EthnicBackground,
    Celebration,
    LeadCapture,
    Results,
    /// Results for one concern
    ConcernDetail(String),
    /// A single case
    CaseDetail(String),
}

impl Step {
    /// Default successor, or `None` for the results views and the last
    /// quiz question (whose successor depends on the answers).
    pub fn next(&self, quiz_len: usize) -> Option<Step> {
        let next = match self {
            Step::Landing => Step::Onboarding(0),
            Step::Onboarding(i) if i + 1 < ONBOARDING_STEPS => Step::Onboarding(i + 1),
            Step::Onboarding(_) => Step::Concerns,
            Step::Concerns => Step::Areas,
            Step::Areas => Step::Age,
            Step::Age => Step::SkinType,
            Step::SkinType => Step::SkinTone,
            Step::SkinTypeQuiz(q) if q + 1 < quiz_len => Step::SkinTypeQuiz(q + 1),
            Step::SkinTypeQuiz(_) => Step::SkinTone,
            Step::SkinTone => Step::EthnicBackground,
            Step::EthnicBackground => Step::Celebration,
            Step::Celebration => Step::LeadCapture,
            Step::LeadCapture => Step::Results,
            Step::Results | Step::ConcernDetail(_) | Step::CaseDetail(_) => return None,
        };
        Some(next)
    }

    /// Whether this step is one of the post-submission results views.
    pub fn is_results_view(&self) -> bool {
        matches!(self, Step::Results | Step::ConcernDetail(_) | Step::CaseDetail(_))
    }
}
