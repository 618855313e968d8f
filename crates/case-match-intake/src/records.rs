//! Raw tabular-store records and their normalization into canonical cases.

use case_match_core::CaseItem;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::fields::*;

/// Intake errors.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog format: {0}")]
    InvalidFormat(String),

    #[error("Record '{record_id}' is missing required field '{field}'")]
    MissingField {
        record_id: String,
        field: &'static str,
    },
}

pub type IntakeResult<T> = Result<T, IntakeError>;

/// One record as exported by the tabular store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
            created_time: None,
        }
    }

    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader::new(&self.fields)
    }

    /// Record id, falling back to an id column inside `fields`.
    pub fn record_id(&self) -> Option<String> {
        let id = self.id.trim();
        if id.is_empty() {
            self.reader().text(ID_FIELDS)
        } else {
            Some(id.to_string())
        }
    }

    /// Concern categories tagged on this record, as written in the store.
    pub fn concern_categories(&self) -> Vec<String> {
        self.reader().list(CONCERN_CATEGORY_FIELDS)
    }

    /// Provider identifiers this record belongs to.
    pub fn providers(&self) -> Vec<String> {
        self.reader().list(PROVIDER_FIELDS)
    }
}

/// One page of a paginated export. `offset` is present when more pages follow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

impl CatalogPage {
    pub fn has_more(&self) -> bool {
        self.offset.as_deref().is_some_and(|o| !o.is_empty())
    }
}

/// Parse one export page.
pub fn parse_catalog_page(json: &str) -> IntakeResult<CatalogPage> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(IntakeError::InvalidFormat(
            "catalog page must be a JSON object".into(),
        ));
    }
    if value.get("records").is_some_and(|r| !r.is_array()) {
        return Err(IntakeError::InvalidFormat("'records' must be an array".into()));
    }

    Ok(serde_json::from_value(value)?)
}

/// Convert a raw record into a canonical case.
pub fn normalize_record(raw: &RawRecord) -> IntakeResult<CaseItem> {
    let id = raw.record_id().ok_or_else(|| IntakeError::MissingField {
        record_id: "<unknown>".into(),
        field: "id",
    })?;

    let reader = raw.reader();
    let name = reader.text(NAME_FIELDS).ok_or_else(|| IntakeError::MissingField {
        record_id: id.clone(),
        field: "name",
    })?;

    Ok(CaseItem {
        id,
        name,
        headline: reader.text(HEADLINE_FIELDS).unwrap_or_default(),
        story: reader.text(STORY_FIELDS).unwrap_or_default(),
        patient: reader.text(PATIENT_FIELDS).unwrap_or_default(),
        treatment: reader.text(TREATMENT_FIELDS).unwrap_or_default(),
        solved: reader.list(SOLVED_FIELDS),
        matching_criteria: reader.list(MATCHING_CRITERIA_FIELDS),
        surgical: reader.surgical_flag(SURGICAL_FIELDS),
        patient_age: reader.whole_number(PATIENT_AGE_FIELDS),
        skin_type: reader.text(SKIN_TYPE_FIELDS),
        skin_tone: reader.text(SKIN_TONE_FIELDS),
        area_names: reader.list(AREA_NAME_FIELDS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "records": [
            {
                "id": "rec001",
                "createdTime": "2024-03-01T10:00:00.000Z",
                "fields": {
                    "Name": "Resolve Volume Loss with Filler",
                    "Headline": "Restored cheek volume",
                    "Treatment": ["Cheek Filler"],
                    "Solved": "Hollow cheeks, Tired look",
                    "Matching Criteria": ["volume", "cheeks"],
                    "Surgical": false,
                    "Patient Age": 47,
                    "Skin Type": "Combination",
                    "Skin Tone": "Medium",
                    "Area Names": ["Cheeks"],
                    "Concern Categories": ["volume-loss"]
                }
            },
            {
                "id": "rec002",
                "fields": {
                    "name": "Smooth Forehead Lines",
                    "matchingCriteria": "wrinkles, forehead",
                    "Age": "38",
                    "Areas": "Forehead, Eyes"
                }
            }
        ],
        "offset": "itrNext/rec002"
    }"#;

    #[test]
    fn test_parse_catalog_page() {
        let page = parse_catalog_page(PAGE).unwrap();

        assert_eq!(page.records.len(), 2);
        assert!(page.has_more());
        assert_eq!(page.records[0].id, "rec001");
        assert_eq!(
            page.records[0].created_time.as_deref(),
            Some("2024-03-01T10:00:00.000Z")
        );
    }

    #[test]
    fn test_parse_last_page() {
        let page = parse_catalog_page(r#"{"records": []}"#).unwrap();
        assert!(page.records.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        assert!(matches!(
            parse_catalog_page("[1, 2]"),
            Err(IntakeError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_catalog_page(r#"{"records": "nope"}"#),
            Err(IntakeError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_catalog_page("{not json"),
            Err(IntakeError::JsonParse(_))
        ));
    }

    #[test]
    fn test_normalize_full_record() {
        let page = parse_catalog_page(PAGE).unwrap();
        let case = normalize_record(&page.records[0]).unwrap();

        assert_eq!(case.id, "rec001");
        assert_eq!(case.name, "Resolve Volume Loss with Filler");
        assert_eq!(case.headline, "Restored cheek volume");
        assert_eq!(case.treatment, "Cheek Filler");
        assert_eq!(case.solved, vec!["Hollow cheeks", "Tired look"]);
        assert_eq!(case.matching_criteria, vec!["volume", "cheeks"]);
        assert_eq!(case.surgical.as_deref(), Some("non-surgical"));
        assert_eq!(case.patient_age, Some(47));
        assert_eq!(case.skin_type.as_deref(), Some("Combination"));
        assert_eq!(case.skin_tone.as_deref(), Some("Medium"));
        assert_eq!(case.area_names, vec!["Cheeks"]);
        assert!(case.story.is_empty());
    }

    #[test]
    fn test_normalize_lowercase_variants() {
        let page = parse_catalog_page(PAGE).unwrap();
        let case = normalize_record(&page.records[1]).unwrap();

        assert_eq!(case.name, "Smooth Forehead Lines");
        assert_eq!(case.matching_criteria, vec!["wrinkles", "forehead"]);
        assert_eq!(case.patient_age, Some(38));
        assert_eq!(case.area_names, vec!["Forehead", "Eyes"]);
        assert_eq!(case.surgical, None);
        assert_eq!(case.skin_type, None);
    }

    #[test]
    fn test_normalize_missing_name() {
        let raw = RawRecord::new("rec404", Map::new());

        match normalize_record(&raw) {
            Err(IntakeError::MissingField { record_id, field }) => {
                assert_eq!(record_id, "rec404");
                assert_eq!(field, "name");
            }
            other => panic!("expected missing name, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_id_from_fields() {
        let mut fields = Map::new();
        fields.insert("Case ID".into(), Value::from("case-7"));
        fields.insert("Name".into(), Value::from("Lip Balance"));

        let case = normalize_record(&RawRecord::new("  ", fields)).unwrap();
        assert_eq!(case.id, "case-7");
    }

    #[test]
    fn test_normalize_missing_id() {
        let mut fields = Map::new();
        fields.insert("Name".into(), Value::from("Lip Balance"));

        assert!(matches!(
            normalize_record(&RawRecord::new("", fields)),
            Err(IntakeError::MissingField { field: "id", .. })
        ));
    }

    #[test]
    fn test_record_tags() {
        let page = parse_catalog_page(PAGE).unwrap();
        assert_eq!(page.records[0].concern_categories(), vec!["volume-loss"]);
        assert!(page.records[1].concern_categories().is_empty());
        assert!(page.records[1].providers().is_empty());
    }
}
