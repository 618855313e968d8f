//! Consultation wizard: step sequencing and selection gating.
//!
//! Flow: Landing → Onboarding → Concerns → Areas → Age → Skin Type
//! (→ "not sure" quiz) → Skin Tone → Ethnic Background → Celebration
//! → Lead Capture → Results → Concern Detail → Case Detail
//!
//! Back navigation replays a history stack, so it always restores the exact
//! prior step, including the quiz question.

mod gating;
mod skin_quiz;
mod steps;

pub use gating::*;
pub use skin_quiz::*;
pub use steps::*;

use thiserror::Error;

use crate::models::{SelectionSnapshot, SelectionState, MAX_SELECTIONS};

/// Wizard navigation errors.
#[derive(Error, Debug, PartialEq)]
pub enum WizardError {
    #[error("Step {0:?} is incomplete")]
    StepIncomplete(Step),

    #[error("No step before {0:?}")]
    NoPreviousStep(Step),

    #[error("No step after {0:?}")]
    NoNextStep(Step),

    #[error("Expected step {expected}, currently at {actual:?}")]
    WrongStep { expected: &'static str, actual: Step },

    #[error("Invalid quiz answer: {0}")]
    InvalidAnswer(String),
}

pub type WizardResult<T> = Result<T, WizardError>;

/// Outcome of toggling a concern or area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
    /// Already at the limit; selection unchanged
    LimitReached,
}

/// Stepwise state container owning the live selection.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: Step,
    history: Vec<Step>,
    selection: SelectionState,
    quiz_answers: Vec<Option<String>>,
    snapshot: Option<SelectionSnapshot>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Start a wizard at the landing step with an empty selection.
    pub fn new() -> Self {
        Self {
            step: Step::Landing,
            history: Vec::new(),
            selection: SelectionState::new(),
            quiz_answers: vec![None; SKIN_TYPE_QUIZ.len()],
            snapshot: None,
        }
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Snapshot frozen at lead submission, if submitted.
    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn quiz_answers(&self) -> &[Option<String>] {
        &self.quiz_answers
    }

    /// Whether the current step's completeness predicate holds.
    pub fn can_advance(&self) -> bool {
        is_step_complete(&self.step, &self.selection, &self.quiz_answers)
    }

    /// Move forward one step if the current step is complete.
    ///
    /// Leaving the last quiz question infers the skin type; leaving lead
    /// capture freezes a selection snapshot.
    pub fn advance(&mut self) -> WizardResult<&Step> {
        if !self.can_advance() {
            return Err(WizardError::StepIncomplete(self.step.clone()));
        }

        let next = self
            .step
            .next(SKIN_TYPE_QUIZ.len())
            .ok_or_else(|| WizardError::NoNextStep(self.step.clone()))?;

        match self.step {
            Step::SkinTypeQuiz(_) if next == Step::SkinTone => {
                self.selection.skin_type = infer_skin_type(&self.quiz_answers);
            }
            Step::LeadCapture => {
                self.snapshot = Some(self.selection.snapshot());
            }
            _ => {}
        }

        self.go_to(next);
        Ok(&self.step)
    }

    /// Return to the exact previous step.
    pub fn back(&mut self) -> WizardResult<&Step> {
        let previous = self
            .history
            .pop()
            .ok_or_else(|| WizardError::NoPreviousStep(self.step.clone()))?;
        self.step = previous;
        Ok(&self.step)
    }

    /// Submit the lead and return the frozen selection.
    pub fn submit_lead(&mut self) -> WizardResult<SelectionSnapshot> {
        self.expect_step(&Step::LeadCapture, "LeadCapture")?;
        self.advance()?;
        self.snapshot
            .clone()
            .ok_or_else(|| WizardError::StepIncomplete(Step::LeadCapture))
    }

    // =========================================================================
    // Selection mutations
    // =========================================================================

    /// Add or remove a concern; a 4th concern is rejected.
    pub fn toggle_concern(&mut self, concern_id: &str) -> SelectionChange {
        toggle_limited(&mut self.selection.selected_concerns, concern_id, "concern")
    }

    /// Add or remove an area; a 4th area is rejected.
    pub fn toggle_area(&mut self, area_id: &str) -> SelectionChange {
        toggle_limited(&mut self.selection.selected_areas, area_id, "area")
    }

    pub fn set_age_range(&mut self, age_range: impl Into<String>) {
        self.selection.age_range = Some(age_range.into());
    }

    /// Choose a skin type directly. Clears any quiz progress.
    pub fn set_skin_type(&mut self, skin_type: impl Into<String>) {
        self.selection.skin_type = Some(skin_type.into());
        self.quiz_answers = vec![None; SKIN_TYPE_QUIZ.len()];
    }

    pub fn set_skin_tone(&mut self, skin_tone: impl Into<String>) {
        self.selection.skin_tone = Some(skin_tone.into());
    }

    pub fn set_ethnic_background(&mut self, ethnic_background: impl Into<String>) {
        self.selection.ethnic_background = Some(ethnic_background.into());
    }

    // =========================================================================
    // "Not sure" skin-type sub-flow
    // =========================================================================

    /// Enter the skin-type quiz from the skin-type step.
    pub fn choose_not_sure(&mut self) -> WizardResult<&Step> {
        self.expect_step(&Step::SkinType, "SkinType")?;
        self.selection.skin_type = None;
        self.quiz_answers = vec![None; SKIN_TYPE_QUIZ.len()];
        self.go_to(Step::SkinTypeQuiz(0));
        Ok(&self.step)
    }

    /// The question currently shown, if in the quiz.
    pub fn current_question(&self) -> Option<&'static QuizQuestion> {
        match self.step {
            Step::SkinTypeQuiz(q) => SKIN_TYPE_QUIZ.get(q),
            _ => None,
        }
    }

    /// Answer the current quiz question by option id.
    pub fn answer_quiz(&mut self, option_id: &str) -> WizardResult<()> {
        let Step::SkinTypeQuiz(q) = self.step else {
            return Err(WizardError::WrongStep {
                expected: "SkinTypeQuiz",
                actual: self.step.clone(),
            });
        };

        let vote = SKIN_TYPE_QUIZ
            .get(q)
            .and_then(|question| question.vote_for(option_id))
            .ok_or_else(|| WizardError::InvalidAnswer(option_id.to_string()))?;

        if let Some(slot) = self.quiz_answers.get_mut(q) {
            *slot = Some(vote.to_string());
        }
        Ok(())
    }

    // =========================================================================
    // Results navigation
    // =========================================================================

    /// Open one concern's results from the results overview.
    pub fn open_concern(&mut self, concern_id: &str) -> WizardResult<&Step> {
        self.expect_step(&Step::Results, "Results")?;
        self.go_to(Step::ConcernDetail(concern_id.to_string()));
        Ok(&self.step)
    }

    /// Open a case from the results overview or a concern's results.
    pub fn open_case(&mut self, case_id: &str) -> WizardResult<&Step> {
        if !matches!(self.step, Step::Results | Step::ConcernDetail(_)) {
            return Err(WizardError::WrongStep {
                expected: "Results or ConcernDetail",
                actual: self.step.clone(),
            });
        }
        self.go_to(Step::CaseDetail(case_id.to_string()));
        Ok(&self.step)
    }

    fn go_to(&mut self, next: Step) {
        let previous = std::mem::replace(&mut self.step, next);
        self.history.push(previous);
    }

    fn expect_step(&self, expected: &Step, name: &'static str) -> WizardResult<()> {
        if &self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected: name,
                actual: self.step.clone(),
            })
        }
    }
}

fn toggle_limited(selected: &mut Vec<String>, id: &str, kind: &str) -> SelectionChange {
    if let Some(pos) = selected.iter().position(|s| s == id) {
        selected.remove(pos);
        return SelectionChange::Removed;
    }

    if selected.len() >= MAX_SELECTIONS {
        tracing::warn!(kind, id, limit = MAX_SELECTIONS, "selection limit reached");
        return SelectionChange::LimitReached;
    }

    selected.push(id.to_string());
    SelectionChange::Added
}
