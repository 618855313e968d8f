//! User selection models.

use serde::{Deserialize, Serialize};

/// Maximum number of concerns or areas a user may pick.
pub const MAX_SELECTIONS: usize = 3;

/// Age band with an open upper bound.
const OPEN_TOP_BAND: &str = "60+";

/// Midpoint used for the open upper band.
const OPEN_TOP_MIDPOINT: i64 = 65;

/// One user's in-progress consultation answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionState {
    /// Chosen concern IDs (0-3)
    pub selected_concerns: Vec<String>,
    /// Chosen area IDs (0-3)
    pub selected_areas: Vec<String>,
    /// Age band (e.g., "40-49", "60+")
    pub age_range: Option<String>,
    /// Skin type (e.g., "dry")
    pub skin_type: Option<String>,
    /// Skin tone (e.g., "medium")
    pub skin_tone: Option<String>,
    /// Ethnic background
    pub ethnic_background: Option<String>,
}

/// Immutable copy of a selection taken at lead submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionSnapshot {
    /// Unique snapshot ID
    pub snapshot_id: String,
    /// Capture timestamp (RFC 3339)
    pub taken_at: String,
    /// Frozen selection
    pub selection: SelectionState,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any area has been chosen.
    pub fn has_areas(&self) -> bool {
        !self.selected_areas.is_empty()
    }

    /// Midpoint of the chosen age band, if one is chosen and parseable.
    pub fn age_midpoint(&self) -> Option<i64> {
        self.age_range.as_deref().and_then(age_range_midpoint)
    }

    /// Freeze the current answers before async submission work.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            snapshot_id: uuid::Uuid::new_v4().to_string(),
            taken_at: chrono::Utc::now().to_rfc3339(),
            selection: self.clone(),
        }
    }
}

/// Midpoint of an age band: bottom of the band + 5, or 65 for "60+".
pub fn age_range_midpoint(range: &str) -> Option<i64> {
    let range = range.trim();
    if range == OPEN_TOP_BAND {
        return Some(OPEN_TOP_MIDPOINT);
    }

    let digits: String = range.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|bottom| bottom + 5)
}
