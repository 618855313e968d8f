//! Case catalog models.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A single treatment case in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseItem {
    /// Stable identifier - unique within the catalog, the dedup key
    pub id: String,
    /// Case title (e.g., "Resolve Volume Loss with Fillers")
    pub name: String,
    /// Short marketing headline
    pub headline: String,
    /// Narrative of the treatment outcome
    pub story: String,
    /// Patient description
    pub patient: String,
    /// Treatment description
    pub treatment: String,
    /// Issues this case resolved
    pub solved: Vec<String>,
    /// Free-text tags used for concern matching
    pub matching_criteria: Vec<String>,
    /// Curated surgical flag ("surgical" / "non-surgical"); booleans are accepted
    #[serde(deserialize_with = "deserialize_surgical_flag")]
    pub surgical: Option<String>,
    /// Patient age in years; numeric strings are accepted
    #[serde(deserialize_with = "deserialize_patient_age")]
    pub patient_age: Option<u32>,
    /// Patient skin type (e.g., "dry", "oily")
    pub skin_type: Option<String>,
    /// Patient skin tone (e.g., "fair", "medium")
    pub skin_tone: Option<String>,
    /// Treated areas as recorded in the catalog
    pub area_names: Vec<String>,
}

impl CaseItem {
    /// Create a new case with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Lower-cased `name` followed by every matching criterion and solved issue.
    pub fn search_text(&self) -> String {
        let mut text = self.name.to_lowercase();
        for entry in self.matching_criteria.iter().chain(self.solved.iter()) {
            text.push(' ');
            text.push_str(&entry.to_lowercase());
        }
        text
    }

    /// Fields that may contain keyword hits, in match priority order.
    pub fn keyword_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.matching_criteria.iter().map(String::as_str))
            .chain(self.solved.iter().map(String::as_str))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_surgical_flag<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagValue>::deserialize(deserializer)? {
        Some(FlagValue::Bool(true)) => Some("surgical".into()),
        Some(FlagValue::Bool(false)) => Some("non-surgical".into()),
        Some(FlagValue::Text(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgeValue {
    Whole(u64),
    Fractional(f64),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_patient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match Option::<AgeValue>::deserialize(deserializer)? {
        Some(AgeValue::Whole(n)) => u32::try_from(n).ok(),
        Some(AgeValue::Fractional(f)) if f >= 0.0 => u32::try_from(f.round() as u64).ok(),
        Some(AgeValue::Text(text)) => {
            let digits: String = text.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    };
    Ok(age)
}
