use std::time::Duration;

use super::env::{read_env_u64, read_env_usize};

const ENV_BUILD_DELAY_MS: &str = "HELPINDEX_BUILD_DELAY_MS";
const ENV_PRUNE_FLOOR: &str = "HELPINDEX_PRUNE_FLOOR";
const ENV_PRUNE_DIVISOR: &str = "HELPINDEX_PRUNE_DIVISOR";
const ENV_MIN_QUERY_CHARS: &str = "HELPINDEX_MIN_QUERY_CHARS";

pub const DEFAULT_BUILD_DELAY: Duration = Duration::from_millis(2_000);
pub const DEFAULT_PRUNE_FLOOR: usize = 20;
pub const DEFAULT_PRUNE_DIVISOR: usize = 10;
pub const DEFAULT_MIN_QUERY_CHARS: usize = 1;

/// Tunables for building and querying help indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingConfig {
    /// Pause before the background build starts, so it does not compete with
    /// application startup.
    pub build_delay: Duration,
    /// Lower bound of the generic-token limit.
    pub prune_floor: usize,
    /// Tokens found in more than `scanned / prune_divisor` pages are generic.
    pub prune_divisor: usize,
    /// Queries shorter than this (after trimming) yield no hits.
    pub min_query_chars: usize,
}

impl IndexingConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            build_delay: read_env_u64(ENV_BUILD_DELAY_MS)
                .map_or(DEFAULT_BUILD_DELAY, Duration::from_millis),
            prune_floor: read_env_usize(ENV_PRUNE_FLOOR, DEFAULT_PRUNE_FLOOR, 1),
            prune_divisor: read_env_usize(ENV_PRUNE_DIVISOR, DEFAULT_PRUNE_DIVISOR, 1),
            min_query_chars: read_env_usize(ENV_MIN_QUERY_CHARS, DEFAULT_MIN_QUERY_CHARS, 1),
        }
    }

    #[must_use]
    pub const fn with_build_delay(mut self, delay: Duration) -> Self {
        self.build_delay = delay;
        self
    }

    /// Page-count limit above which a token counts as generic.
    #[must_use]
    pub fn pruning_limit(&self, scanned_documents: usize) -> usize {
        let divisor = self.prune_divisor.max(1);
        self.prune_floor.max(scanned_documents / divisor)
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            build_delay: DEFAULT_BUILD_DELAY,
            prune_floor: DEFAULT_PRUNE_FLOOR,
            prune_divisor: DEFAULT_PRUNE_DIVISOR,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
        }
    }
}
