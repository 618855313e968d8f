//! Catalog assembly: pages in, validated cases and category mapping out.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use case_match_core::{CaseItem, CategoryMapping, MatchConfig, ReferenceData};
use serde_json::Value;
use tracing::{debug, warn};

use crate::records::*;

/// A record that could not be turned into a case.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub record_id: String,
    pub reason: String,
}

/// Accumulates normalized cases across export pages.
#[derive(Debug, Clone)]
pub struct CatalogIntake {
    reference: ReferenceData,
    provider: Option<String>,
    cases: Vec<CaseItem>,
    rejected: Vec<RejectedRecord>,
    category_mapping: CategoryMapping,
    seen: HashSet<String>,
}

impl Default for CatalogIntake {
    fn default() -> Self {
        Self::new(ReferenceData::default())
    }
}

impl CatalogIntake {
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            reference,
            provider: None,
            cases: Vec::new(),
            rejected: Vec::new(),
            category_mapping: CategoryMapping::new(),
            seen: HashSet::new(),
        }
    }

    /// Only keep records belonging to this provider (case-insensitive).
    pub fn for_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Build a catalog from every page with the built-in reference data.
    pub fn from_pages(pages: impl IntoIterator<Item = CatalogPage>) -> Self {
        let mut intake = Self::default();
        for page in pages {
            intake.add_page(&page);
        }
        intake
    }

    pub fn add_page(&mut self, page: &CatalogPage) {
        for raw in &page.records {
            self.add_record(raw);
        }
        debug!(
            records = page.records.len(),
            cases = self.cases.len(),
            rejected = self.rejected.len(),
            "catalog page ingested"
        );
    }

    pub fn add_record(&mut self, raw: &RawRecord) {
        let record_id = raw.record_id().unwrap_or_default();
        if !self.belongs_to_provider(raw) {
            debug!(record_id = %record_id, "record skipped: other provider");
            return;
        }

        let case = match normalize_record(raw) {
            Ok(case) => case,
            Err(e) => {
                warn!(record_id = %record_id, error = %e, "catalog record rejected");
                self.rejected.push(RejectedRecord {
                    record_id,
                    reason: e.to_string(),
                });
                return;
            }
        };

        // First occurrence wins; the later record is not merged.
        if !self.seen.insert(case.id.clone()) {
            warn!(record_id = %case.id, "duplicate case id dropped");
            self.rejected.push(RejectedRecord {
                record_id: case.id,
                reason: "duplicate id".into(),
            });
            return;
        }

        for category in raw.concern_categories() {
            match self.resolve_concern(&category) {
                Some(concern_id) => self.category_mapping.insert(case.id.clone(), concern_id),
                None => warn!(
                    record_id = %case.id,
                    category = %category,
                    "unknown concern category ignored"
                ),
            }
        }

        self.cases.push(case);
    }

    /// Add one element of an injected case array.
    ///
    /// Elements go through the same normalization as export records, so
    /// boolean surgical flags and textual ages are accepted.
    pub fn add_injected(&mut self, item: Value) {
        match item {
            Value::Object(fields) => self.add_record(&RawRecord::new("", fields)),
            other => {
                warn!(element = %other, "injected catalog element is not an object");
                self.rejected.push(RejectedRecord {
                    record_id: String::new(),
                    reason: "expected a case object".into(),
                });
            }
        }
    }

    /// Build a catalog from injected case elements with the built-in reference data.
    pub fn from_injected(items: impl IntoIterator<Item = Value>) -> Self {
        let mut intake = Self::default();
        for item in items {
            intake.add_injected(item);
        }
        intake
    }

    fn belongs_to_provider(&self, raw: &RawRecord) -> bool {
        match &self.provider {
            None => true,
            Some(wanted) => raw
                .providers()
                .iter()
                .any(|p| p.eq_ignore_ascii_case(wanted)),
        }
    }

    /// Categories may be stored as concern ids or display names.
    fn resolve_concern(&self, category: &str) -> Option<String> {
        let category = category.trim();
        self.reference
            .concerns
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(category) || c.name.eq_ignore_ascii_case(category))
            .map(|c| c.id.clone())
    }

    pub fn cases(&self) -> &[CaseItem] {
        &self.cases
    }

    pub fn into_cases(self) -> Vec<CaseItem> {
        self.cases
    }

    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn category_mapping(&self) -> &CategoryMapping {
        &self.category_mapping
    }

    /// Matcher configuration carrying this catalog's curated mapping.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            reference: self.reference.clone(),
            category_mapping: self.category_mapping.clone(),
        }
    }
}

/// Parse an injected array of canonical cases.
///
/// Each element is normalized on its own: records with a blank id or name
/// are dropped, as are repeated ids after the first, and the rest survive.
pub fn parse_injected_catalog(json: &str) -> IntakeResult<Vec<CaseItem>> {
    let items: Vec<Value> = serde_json::from_str(json)?;
    let total = items.len();

    let intake = CatalogIntake::from_injected(items);
    debug!(total, kept = intake.cases().len(), "injected catalog parsed");
    Ok(intake.into_cases())
}

/// Load a catalog from disk.
///
/// Accepts a canonical case array, a single export page, or an array of
/// export pages.
pub fn load_catalog_file(path: impl AsRef<Path>) -> IntakeResult<CatalogIntake> {
    let text = fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&text)?;

    match value {
        Value::Object(_) => {
            let page = parse_catalog_page(&text)?;
            Ok(CatalogIntake::from_pages([page]))
        }
        Value::Array(items) => {
            let is_pages = items
                .first()
                .is_some_and(|item| item.get("records").is_some());
            if is_pages {
                let pages: Vec<CatalogPage> = serde_json::from_value(Value::Array(items))?;
                Ok(CatalogIntake::from_pages(pages))
            } else {
                Ok(CatalogIntake::from_injected(items))
            }
        }
        _ => Err(IntakeError::InvalidFormat(format!(
            "{} does not contain a case catalog",
            path.as_ref().display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record(id: &str, fields: Value) -> RawRecord {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        RawRecord::new(id, fields)
    }

    fn page(records: Vec<RawRecord>) -> CatalogPage {
        CatalogPage {
            records,
            offset: None,
        }
    }

    #[test]
    fn test_from_pages_keeps_order() {
        let intake = CatalogIntake::from_pages([
            page(vec![
                record("a", json!({"Name": "Smooth Lines"})),
                record("b", json!({"Name": "Lift Cheeks"})),
            ]),
            page(vec![record("c", json!({"Name": "Lip Balance"}))]),
        ]);

        let ids: Vec<&str> = intake.cases().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(intake.rejected().is_empty());
    }

    #[test]
    fn test_duplicate_first_wins() {
        let intake = CatalogIntake::from_pages([page(vec![
            record("a", json!({"Name": "First"})),
            record("a", json!({"Name": "Second"})),
        ])]);

        assert_eq!(intake.cases().len(), 1);
        assert_eq!(intake.cases()[0].name, "First");
        assert_eq!(intake.rejected()[0].reason, "duplicate id");
    }

    #[test]
    fn test_rejected_records_collected() {
        let intake = CatalogIntake::from_pages([page(vec![
            record("a", json!({"Headline": "No name here"})),
            record("b", json!({"Name": "Fine"})),
        ])]);

        assert_eq!(intake.cases().len(), 1);
        assert_eq!(intake.rejected().len(), 1);
        assert_eq!(intake.rejected()[0].record_id, "a");
        assert!(intake.rejected()[0].reason.contains("name"));
    }

    #[test]
    fn test_category_mapping_from_ids_and_names() {
        let intake = CatalogIntake::from_pages([page(vec![
            record(
                "a",
                json!({"Name": "Cheeks", "Concern Categories": ["volume-loss", "Under-Eye Concerns"]}),
            ),
            record("b", json!({"Name": "Lines", "concernCategories": "Made Up, fine-lines-wrinkles"})),
        ])]);

        let mapping = intake.category_mapping();
        assert!(mapping.is_tagged("a", "volume-loss"));
        assert!(mapping.is_tagged("a", "under-eye"));
        assert!(mapping.is_tagged("b", "fine-lines-wrinkles"));
        assert_eq!(mapping.concerns_for("b").map(|c| c.len()), Some(1));
        assert!(intake.match_config().validate().is_ok());
    }

    #[test]
    fn test_provider_filter() {
        let mut intake = CatalogIntake::default().for_provider("clinic-1");
        intake.add_page(&page(vec![
            record("a", json!({"Name": "Ours", "Provider": ["Clinic-1"]})),
            record("b", json!({"Name": "Theirs", "Provider": "clinic-2"})),
            record("c", json!({"Name": "Untagged"})),
        ]));

        let ids: Vec<&str> = intake.cases().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert!(intake.rejected().is_empty());
    }

    #[test]
    fn test_parse_injected_catalog() {
        let cases = parse_injected_catalog(
            r#"[
                {"id": "1", "name": "Smooth Lines", "matchingCriteria": ["wrinkles"], "patientAge": 45},
                {"id": "1", "name": "Again"},
                {"id": "", "name": "Nameless id"},
                {"id": "2", "name": "Lip Balance"}
            ]"#,
        )
        .unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].matching_criteria, vec!["wrinkles"]);
        assert_eq!(cases[0].patient_age, Some(45));
        assert_eq!(cases[1].id, "2");
    }

    #[test]
    fn test_injected_catalog_normalizes_each_element() {
        let cases = parse_injected_catalog(
            r#"[
                {"id": "1", "name": "Resolve Volume Loss with Fillers", "surgical": false},
                {"id": "2", "name": "Smooth Lines", "patientAge": "44"},
                {"id": 3, "name": "Lip Balance", "matchingCriteria": "lips, volume"},
                "not a case"
            ]"#,
        )
        .unwrap();

        let ids: Vec<&str> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(cases[0].surgical.as_deref(), Some("non-surgical"));
        assert_eq!(cases[1].patient_age, Some(44));
        assert_eq!(cases[2].matching_criteria, vec!["lips", "volume"]);
    }

    #[test]
    fn test_injected_rejects_are_collected() {
        let intake = CatalogIntake::from_injected(vec![
            json!({"id": "1", "name": "Smooth Lines", "concernCategories": ["fine-lines-wrinkles"]}),
            json!({"id": "2"}),
            json!(42),
        ]);

        assert_eq!(intake.cases().len(), 1);
        assert!(intake.category_mapping().is_tagged("1", "fine-lines-wrinkles"));
        let rejected: Vec<&str> = intake.rejected().iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(rejected, vec!["2", ""]);
    }

    #[test]
    fn test_parse_injected_catalog_rejects_object() {
        assert!(matches!(
            parse_injected_catalog(r#"{"id": "1"}"#),
            Err(IntakeError::JsonParse(_))
        ));
    }
}
