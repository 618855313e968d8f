//! Field-name variants and value coercion for raw records.

use serde_json::{Map, Value};

pub const ID_FIELDS: &[&str] = &["id", "ID", "Case ID"];
pub const NAME_FIELDS: &[&str] = &["Name", "name", "Case Name", "Title"];
pub const HEADLINE_FIELDS: &[&str] = &["Headline", "headline"];
pub const STORY_FIELDS: &[&str] = &["Story", "story"];
pub const PATIENT_FIELDS: &[&str] = &["Patient", "patient"];
pub const TREATMENT_FIELDS: &[&str] = &["Treatment", "treatment", "Treatments"];
pub const SOLVED_FIELDS: &[&str] = &["Solved", "solved", "Issues Solved"];
pub const MATCHING_CRITERIA_FIELDS: &[&str] =
    &["Matching Criteria", "matchingCriteria", "matching_criteria"];
pub const SURGICAL_FIELDS: &[&str] = &["Surgical", "surgical", "Surgical/Non-Surgical"];
pub const PATIENT_AGE_FIELDS: &[&str] = &["Patient Age", "patientAge", "Age"];
pub const SKIN_TYPE_FIELDS: &[&str] = &["Skin Type", "skinType"];
pub const SKIN_TONE_FIELDS: &[&str] = &["Skin Tone", "skinTone"];
pub const AREA_NAME_FIELDS: &[&str] = &["Area Names", "areaNames", "Areas", "Area"];
pub const CONCERN_CATEGORY_FIELDS: &[&str] =
    &["Concern Categories", "concernCategories", "Categories"];
pub const PROVIDER_FIELDS: &[&str] = &["Provider", "provider", "Provider ID"];

/// Reads typed values out of a raw field map, trying each name variant in order.
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    /// First non-null value among the name variants.
    pub fn value(&self, names: &[&str]) -> Option<&'a Value> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find(|value| !value.is_null())
    }

    /// A single text value. Arrays (lookup fields) are joined with ", ".
    pub fn text(&self, names: &[&str]) -> Option<String> {
        self.value(names).and_then(value_to_text)
    }

    /// A list of text values. Plain strings are split on commas and newlines.
    pub fn list(&self, names: &[&str]) -> Vec<String> {
        match self.value(names) {
            Some(Value::Array(items)) => items.iter().filter_map(value_to_text).collect(),
            Some(Value::String(s)) => split_list(s),
            Some(other) => value_to_text(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// A non-negative whole number, from a number or a numeric string.
    pub fn whole_number(&self, names: &[&str]) -> Option<u32> {
        match self.value(names)? {
            Value::Array(items) => items.first().and_then(value_to_whole_number),
            other => value_to_whole_number(other),
        }
    }

    /// The surgical flag: booleans map onto "surgical" / "non-surgical".
    pub fn surgical_flag(&self, names: &[&str]) -> Option<String> {
        match self.value(names)? {
            Value::Bool(true) => Some("surgical".into()),
            Value::Bool(false) => Some("non-surgical".into()),
            other => value_to_text(other),
        }
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn value_to_whole_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split([',', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
