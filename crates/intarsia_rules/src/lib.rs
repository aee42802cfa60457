//! Rule registry and the built-in field rule set for Intarsia.
//!
//! Rules are plain structs registered explicitly at startup; the registry
//! answers the two lookups the pipeline needs (by identifier, and by field
//! kind + reference target) in a single pass over the static catalog.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod email;
mod image;
mod link;
mod media;
mod number;
mod options;
mod registry;
mod taxonomy;
mod telephone;
mod term;
mod text;

pub use email::EmailRule;
pub use image::ImageRule;
pub use link::LinkRule;
pub use media::{HttpMediaFetcher, LocalMediaStorage};
pub use number::NumberRule;
pub use options::OptionsRule;
pub use registry::RuleRegistry;
pub use taxonomy::TaxonomyRule;
pub use telephone::TelephoneRule;
pub use term::MemoryTermStore;
pub use text::TextCompletionRule;
