//! Area inference for cases.
//!
//! Free text (name, matching criteria, solved issues) is searched first; the
//! structured `area_names` field is only consulted when no keyword hits, so a
//! specific area always wins over a generic "Full Face" tag.

use strsim::jaro_winkler;

use crate::models::{CaseItem, ReferenceData, FULL_FACE_NAME};

/// Ordered keyword rules: any keyword hit tags the case with the area.
const AREA_RULES: &[(&[&str], &str)] = &[
    (&["forehead", "temple", "glabella", "11s"], "Forehead"),
    (&["under eye", "under-eye", "eyelid", "crow's feet", "tear trough"], "Eyes"),
    (&["brow", "eyebrow"], "Eyes"),
    (&["cheek"], "Cheeks"),
    (&["nose", "nasal"], "Nose"),
    (&["lip", "mouth", "philtral"], "Lips"),
    (&["jawline", "jowl"], "Jawline"),
    (&["chin"], "Chin"),
    (&["neck"], "Neck"),
    (&["chest", "decolletage"], "Chest"),
    (&["hand"], "Hands"),
    (&["arm"], "Arms"),
    (&["body"], "Body"),
];

/// Catalog spellings that differ from the canonical area names.
const AREA_ALIASES: &[(&str, &str)] = &[
    ("mouth & lips", "Lips"),
    ("mouth and lips", "Lips"),
    ("jaw", "Jawline"),
    ("décolletage", "Chest"),
    ("decolletage", "Chest"),
];

/// Minimum Jaro-Winkler similarity for a near-miss area spelling.
const AREA_NAME_SIMILARITY: f64 = 0.93;

/// Area names inferred for a case, in rule order. Empty when nothing is inferable.
pub fn relevant_areas_for_case(case: &CaseItem, reference: &ReferenceData) -> Vec<String> {
    let from_keywords = areas_from_keywords(case);
    if !from_keywords.is_empty() {
        return from_keywords;
    }
    areas_from_area_names(case, reference)
}

/// Area IDs inferred for a case. Names missing from the reference data are dropped.
pub fn relevant_area_ids_for_case(case: &CaseItem, reference: &ReferenceData) -> Vec<String> {
    relevant_areas_for_case(case, reference)
        .iter()
        .filter_map(|name| reference.area_id_for_name(name))
        .map(str::to_string)
        .collect()
}

/// Whether the case's structured area field says it covers everything.
pub fn signals_all_areas(case: &CaseItem) -> bool {
    case.area_names.iter().any(|entry| is_all_signal(entry))
}

/// Map a catalog area label onto a canonical area name.
pub fn canonical_area_name(label: &str, reference: &ReferenceData) -> Option<String> {
    let lower = label.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some((_, name)) = AREA_ALIASES.iter().find(|(alias, _)| *alias == lower) {
        return Some(name.to_string());
    }

    if let Some(area) = reference
        .areas
        .iter()
        .find(|a| a.name.to_lowercase() == lower || a.id == lower)
    {
        return Some(area.name.clone());
    }

    reference
        .areas
        .iter()
        .map(|a| (a, jaro_winkler(&lower, &a.name.to_lowercase())))
        .filter(|(_, similarity)| *similarity >= AREA_NAME_SIMILARITY)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(a, _)| a.name.clone())
}

fn areas_from_keywords(case: &CaseItem) -> Vec<String> {
    let text = case.search_text();
    let mut areas: Vec<String> = Vec::new();

    for (keywords, area) in AREA_RULES {
        if keywords.iter().any(|k| text.contains(k)) && !areas.iter().any(|a| a == area) {
            areas.push(area.to_string());
        }
    }

    areas
}

fn areas_from_area_names(case: &CaseItem, reference: &ReferenceData) -> Vec<String> {
    let entries = &case.area_names;
    if entries.is_empty() {
        return Vec::new();
    }

    if entries.len() == 1 && is_all_signal(&entries[0]) {
        return vec![FULL_FACE_NAME.to_string()];
    }

    let mut areas: Vec<String> = Vec::new();
    for name in entries
        .iter()
        .filter(|e| !is_all_signal(e))
        .filter_map(|e| canonical_area_name(e, reference))
    {
        if !areas.contains(&name) {
            areas.push(name);
        }
    }

    if areas.is_empty() && entries.iter().any(|e| is_all_signal(e)) {
        return vec![FULL_FACE_NAME.to_string()];
    }

    areas
}

fn is_all_signal(entry: &str) -> bool {
    let lower = entry.trim().to_lowercase();
    lower == "all" || lower == "skin" || lower.starts_with("all ")
}
