//! Surgical case classification.
//!
//! The curated `surgical` field always wins; keyword inference over the
//! case's name, headline and treatment is only a fallback.

use crate::models::CaseItem;

/// Terms that mark a case as surgical.
const SURGICAL_KEYWORDS: &[&str] = &[
    "surgical",
    "surgery",
    "rhinoplasty",
    "blepharoplasty",
    "facelift",
    "face lift",
    "neck lift",
    "brow lift",
    "browlift",
    "brow-lift",
    "forehead lift",
    "otoplasty",
    "liposuction",
    "liposculpture",
    "abdominoplasty",
    "tummy tuck",
    "breast augmentation",
    "breast lift",
    "mastopexy",
    "augmentation",
    "implant",
];

/// Whether a case involves invasive surgery.
pub fn is_surgical_case(case: &CaseItem) -> bool {
    if let Some(flag) = case.surgical.as_deref() {
        match flag.trim().to_lowercase().as_str() {
            "surgical" => return true,
            "non-surgical" | "nonsurgical" => return false,
            _ => {}
        }
    }

    let text = format!("{} {} {}", case.name, case.headline, case.treatment).to_lowercase();
    SURGICAL_KEYWORDS.iter().any(|k| text.contains(k))
}
