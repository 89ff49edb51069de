mod env;
mod indexing;
mod manifest;

pub use indexing::{
    DEFAULT_BUILD_DELAY, DEFAULT_MIN_QUERY_CHARS, DEFAULT_PRUNE_DIVISOR, DEFAULT_PRUNE_FLOOR,
    IndexingConfig,
};
pub use manifest::HelpManifest;
