// Public fallible APIs in this crate share one concrete error contract (`IndexError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod builder;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod registry;
pub mod source;
pub mod tokenize;

pub use builder::IndexBuilder;
pub use config::{HelpManifest, IndexingConfig};
pub use error::{ErrorPayload, IndexError, Result};
pub use index::LanguageIndex;
pub use models::{IndexHits, IndexStats, RegistryState, RegistryStatus, TitleHits};
pub use registry::{IndexRegistry, IndexSnapshot};
pub use source::{DocumentHandle, DocumentSource, ResourceLocation};
