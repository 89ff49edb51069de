use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title -> page name.
pub type TitleHits = BTreeMap<String, String>;

/// Token -> pages containing it.
pub type IndexHits = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub language: String,
    pub scanned_documents: usize,
    pub skipped_documents: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pruning_limit: Option<usize>,
    pub tokens_before_prune: usize,
    pub tokens_after_prune: usize,
    pub titles: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryState {
    Unconfigured,
    Configured,
    Building,
    Ready,
}

impl RegistryState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Configured => "configured",
            Self::Building => "building",
            Self::Ready => "ready",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub state: RegistryState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_language: Option<String>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub indexes: Vec<IndexStats>,
}
