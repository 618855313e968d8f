//! Domain models for the case-match system.

mod case;
mod matching;
mod reference;
mod selection;

pub use case::*;
pub use matching::*;
pub use reference::*;
pub use selection::*;
