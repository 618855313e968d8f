//! Catalog intake for the case matcher.
//!
//! Turns tabular-store exports (paginated `{"records": [...], "offset": ...}`
//! pages) or injected case arrays into canonical [`CaseItem`]s. This is the
//! only place that knows about field-name variants; the matcher only ever
//! sees validated records.
//!
//! [`CaseItem`]: case_match_core::CaseItem

pub mod catalog;
pub mod fields;
pub mod records;

pub use catalog::*;
pub use records::*;
