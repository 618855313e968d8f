//! Treatment-suggestion grouping of matched cases.

use crate::models::{ScoredCase, TreatmentGroup};

/// Leading verbs stripped from case names.
const NAME_PREFIXES: &[&str] = &["resolve ", "treat ", "fix "];

/// Separators between the concern and the treatment in a case name.
const TREATMENT_SEPARATORS: &[&str] = &[" with ", " using ", " via "];

/// Split a case name into (concern label, treatment label).
///
/// "Resolve Volume Loss with Fillers" → ("Volume Loss", "Fillers"). Without a
/// separator the treatment label is the whole name.
pub fn parse_case_name(name: &str) -> (String, String) {
    let name = name.trim();
    let lower = name.to_ascii_lowercase();

    let start = NAME_PREFIXES
        .iter()
        .find(|p| lower.starts_with(*p))
        .map(|p| p.len())
        .unwrap_or(0);
    let rest = &name[start..];
    let rest_lower = &lower[start..];

    // Padded so a separator directly after the stripped prefix is still found.
    let padded = format!(" {rest_lower}");
    let split = TREATMENT_SEPARATORS
        .iter()
        .filter_map(|sep| padded.find(sep).map(|pos| (pos, sep.len())))
        .min_by_key(|(pos, _)| *pos);

    let (concern, treatment) = match split {
        Some((pos, len)) => (
            rest[..pos.saturating_sub(1)].trim(),
            rest[pos + len - 1..].trim(),
        ),
        None => (rest.trim(), name),
    };

    let concern = if concern.is_empty() { name } else { concern };
    let treatment = if treatment.is_empty() { name } else { treatment };

    (concern.to_string(), treatment.to_string())
}

/// Bucket cases by concern label (then treatment), largest group first.
///
/// Every input case lands in exactly one group.
pub fn group_scored_cases(cases: Vec<ScoredCase>) -> Vec<TreatmentGroup> {
    struct Bucket {
        key: String,
        suggestion: String,
        treatments: Vec<(String, Vec<ScoredCase>)>,
    }

    let mut buckets: Vec<Bucket> = Vec::new();

    for scored in cases {
        let (concern, treatment) = parse_case_name(&scored.case.name);
        let key = concern.to_lowercase();

        let index = match buckets.iter().position(|b| b.key == key) {
            Some(index) => index,
            None => {
                buckets.push(Bucket {
                    key,
                    suggestion: concern,
                    treatments: Vec::new(),
                });
                buckets.len() - 1
            }
        };

        let treatments = &mut buckets[index].treatments;
        match treatments
            .iter_mut()
            .find(|(t, _)| t.eq_ignore_ascii_case(&treatment))
        {
            Some((_, members)) => members.push(scored),
            None => treatments.push((treatment, vec![scored])),
        }
    }

    let mut groups: Vec<TreatmentGroup> = buckets
        .into_iter()
        .map(|bucket| {
            let treatments = bucket.treatments.iter().map(|(t, _)| t.clone()).collect();
            let mut cases: Vec<ScoredCase> = bucket
                .treatments
                .into_iter()
                .flat_map(|(_, members)| members)
                .collect();
            cases.sort_by(|a, b| b.matching_score.cmp(&a.matching_score));

            TreatmentGroup {
                suggestion: bucket.suggestion,
                treatments,
                cases,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.cases.len().cmp(&a.cases.len()));
    groups
}
