//! Static reference data: concerns and areas offered by the consultation.

use serde::{Deserialize, Serialize};

/// Area ID for the generic whole-face label.
pub const FULL_FACE_ID: &str = "full-face";

/// Display name for the generic whole-face label.
pub const FULL_FACE_NAME: &str = "Full Face";

/// Built-in area IDs that "Full Face" stands in for.
pub const FACIAL_AREA_IDS: &[&str] = &["forehead", "eyes", "cheeks", "nose", "lips", "jawline", "chin"];

/// A user-facing aesthetic goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Concern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Keywords that tie a case to this concern
    #[serde(default)]
    pub maps_to_photos: Vec<String>,
    /// Additional issue-level keywords
    #[serde(default)]
    pub maps_to_specific_issues: Vec<String>,
}

/// A user-facing anatomical region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Area {
    pub id: String,
    pub name: String,
    /// Covered by a "Full Face" selection or case
    #[serde(default)]
    pub facial: bool,
}

/// Concerns and areas, loaded once and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceData {
    pub concerns: Vec<Concern>,
    pub areas: Vec<Area>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            concerns: default_concerns(),
            areas: default_areas(),
        }
    }
}

impl ReferenceData {
    /// Look up a concern by ID.
    pub fn concern(&self, id: &str) -> Option<&Concern> {
        self.concerns.iter().find(|c| c.id == id)
    }

    /// Look up an area by ID.
    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// Find the area ID for a canonical display name (case-insensitive).
    pub fn area_id_for_name(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.areas
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.id.as_str())
    }

    /// All area IDs in display order.
    pub fn all_area_ids(&self) -> Vec<String> {
        self.areas.iter().map(|a| a.id.clone()).collect()
    }

    /// Whether an area ID belongs to the face.
    pub fn is_facial_area(&self, id: &str) -> bool {
        self.area(id).is_some_and(|a| a.facial)
    }

    /// IDs of the facial areas, in display order.
    pub fn facial_area_ids(&self) -> impl Iterator<Item = &str> {
        self.areas.iter().filter(|a| a.facial).map(|a| a.id.as_str())
    }
}

fn concern(id: &str, name: &str, description: &str, photos: &[&str], issues: &[&str]) -> Concern {
    Concern {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        maps_to_photos: photos.iter().map(|s| s.to_string()).collect(),
        maps_to_specific_issues: issues.iter().map(|s| s.to_string()).collect(),
    }
}

/// Default concern catalog.
fn default_concerns() -> Vec<Concern> {
    vec![
        concern(
            "fine-lines-wrinkles",
            "Fine Lines & Wrinkles",
            "Soften expression lines and creases",
            &["wrinkle", "fine line", "crow's feet", "forehead lines", "frown lines", "11s"],
            &["smile lines", "laugh lines", "marionette lines"],
        ),
        concern(
            "volume-loss",
            "Volume Loss",
            "Restore lost fullness and structure",
            &["volume loss", "volume", "hollow", "sunken"],
            &["tear trough", "deflated", "flat cheeks"],
        ),
        concern(
            "skin-texture",
            "Skin Texture",
            "Refine pores, scarring and rough skin",
            &["texture", "pores", "rough skin", "acne scar", "scarring"],
            &["orange peel", "uneven skin"],
        ),
        concern(
            "pigmentation",
            "Pigmentation & Redness",
            "Even out spots, sun damage and redness",
            &["pigment", "sun damage", "dark spots", "melasma", "age spots"],
            &["redness", "rosacea", "broken capillaries"],
        ),
        concern(
            "sagging-skin",
            "Sagging Skin",
            "Lift and tighten loose skin",
            &["sagging", "laxity", "loose skin", "skin tightening"],
            &["jowls", "crepey"],
        ),
        concern(
            "facial-balancing",
            "Facial Balancing",
            "Improve proportion, profile and definition",
            &["balancing", "profile", "contour", "definition", "symmetry"],
            &["weak chin", "undefined jawline"],
        ),
        concern(
            "lip-enhancement",
            "Lip Enhancement",
            "Add shape, volume or hydration to the lips",
            &["lip enhancement", "lip filler", "thin lips", "lip shape"],
            &["lip lines", "asymmetric lips"],
        ),
        concern(
            "under-eye",
            "Under-Eye Concerns",
            "Brighten dark circles and hollows under the eyes",
            &["under eye", "dark circles", "eye bags"],
            &["puffy eyes", "tired eyes"],
        ),
        concern(
            "body-contouring",
            "Body Contouring",
            "Reduce stubborn fat and improve body shape",
            &["body contouring", "fat reduction", "stubborn fat", "cellulite"],
            &["double chin", "love handles"],
        ),
    ]
}

/// Default area catalog.
fn default_areas() -> Vec<Area> {
    [
        ("forehead", "Forehead"),
        ("eyes", "Eyes"),
        ("cheeks", "Cheeks"),
        ("nose", "Nose"),
        ("lips", "Lips"),
        ("jawline", "Jawline"),
        ("chin", "Chin"),
        ("neck", "Neck"),
        ("chest", "Chest"),
        ("hands", "Hands"),
        ("arms", "Arms"),
        ("body", "Body"),
        (FULL_FACE_ID, FULL_FACE_NAME),
    ]
    .into_iter()
    .map(|(id, name)| Area {
        id: id.into(),
        name: name.into(),
        facial: FACIAL_AREA_IDS.contains(&id),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reference_lookup() {
        let reference = ReferenceData::default();

        assert!(reference.concern("volume-loss").is_some());
        assert!(reference.concern("unknown").is_none());
        assert_eq!(reference.area("lips").map(|a| a.name.as_str()), Some("Lips"));
    }

    #[test]
    fn test_area_id_for_name() {
        let reference = ReferenceData::default();

        assert_eq!(reference.area_id_for_name("Cheeks"), Some("cheeks"));
        assert_eq!(reference.area_id_for_name("full face"), Some(FULL_FACE_ID));
        assert_eq!(reference.area_id_for_name("Elbow"), None);
    }

    #[test]
    fn test_facial_areas_exist_in_defaults() {
        let reference = ReferenceData::default();
        for id in FACIAL_AREA_IDS {
            assert!(reference.area(id).is_some(), "missing facial area {}", id);
            assert!(reference.is_facial_area(id));
        }
        assert!(!reference.is_facial_area("neck"));
        assert!(!reference.is_facial_area(FULL_FACE_ID));
        assert_eq!(reference.facial_area_ids().count(), FACIAL_AREA_IDS.len());
    }

    #[test]
    fn test_custom_reference_marks_facial_areas() {
        let reference: ReferenceData = serde_json::from_str(
            r#"{
                "concerns": [],
                "areas": [
                    {"id": "upper-face", "name": "Upper Face", "facial": true},
                    {"id": "knees", "name": "Knees"}
                ]
            }"#,
        )
        .unwrap();

        assert!(reference.is_facial_area("upper-face"));
        assert!(!reference.is_facial_area("knees"));
        assert!(!reference.is_facial_area("cheeks"));
        assert_eq!(reference.facial_area_ids().collect::<Vec<_>>(), vec!["upper-face"]);
    }
}
