use std::collections::{BTreeMap, BTreeSet};

use crate::config::DEFAULT_MIN_QUERY_CHARS;
use crate::models::{IndexHits, IndexStats, TitleHits};
use crate::tokenize::scan_document;

/// Characters that mark a token as noise (numbers, markup and formula residue).
pub const NOISE_CHARS: &[char] = &[
    '(', ')', '[', ']', '|', '\'', '"', '&', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    '\\', '-', '+', '*', '/', ':', '=',
];

#[must_use]
pub fn is_noise_token(token: &str) -> bool {
    token.contains(NOISE_CHARS)
}

#[derive(Debug, Clone, Default)]
struct Postings {
    token: String,
    pages: BTreeSet<String>,
}

/// Inverted index over the help pages of one language.
///
/// Tokens are keyed by their lowercase form, so `Server` and `server` share
/// one posting list; the spelling seen first is what hits report.
#[derive(Debug, Clone)]
pub struct LanguageIndex {
    language: String,
    min_query_chars: usize,
    titles: BTreeMap<String, String>,
    pages: BTreeMap<String, String>,
    tokens: BTreeMap<String, Postings>,
    stats: IndexStats,
}

impl LanguageIndex {
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            stats: IndexStats {
                language: language.clone(),
                ..IndexStats::default()
            },
            language,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            titles: BTreeMap::new(),
            pages: BTreeMap::new(),
            tokens: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars.max(1);
        self
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Adds one page. A title already claimed by another page is reassigned to
    /// this one; the earlier page keeps its own page -> title entry.
    pub fn scan(&mut self, page_name: &str, content: &str) {
        let document = scan_document(content);
        self.titles
            .insert(document.title.clone(), page_name.to_string());
        self.pages.insert(page_name.to_string(), document.title);
        for token in document.tokens {
            let key = token.to_lowercase();
            self.tokens
                .entry(key)
                .or_insert_with(|| Postings {
                    token,
                    pages: BTreeSet::new(),
                })
                .pages
                .insert(page_name.to_string());
        }
        self.stats.scanned_documents += 1;
        self.stats.titles = self.titles.len();
    }

    pub(crate) fn note_skipped(&mut self) {
        self.stats.skipped_documents += 1;
    }

    /// Drops noise tokens and every token found on more than `limit` pages.
    /// Runs once, after the last page has been scanned; later calls are
    /// ignored. Returns the number of tokens removed.
    pub(crate) fn reduce(&mut self, limit: usize) -> usize {
        if let Some(applied) = self.stats.pruning_limit {
            tracing::debug!(
                language = %self.language,
                applied,
                requested = limit,
                "index already reduced; ignoring repeat call"
            );
            return 0;
        }

        let before = self.tokens.len();
        self.tokens
            .retain(|key, postings| !is_noise_token(key) && postings.pages.len() <= limit);
        let after = self.tokens.len();

        self.stats.pruning_limit = Some(limit);
        self.stats.tokens_before_prune = before;
        self.stats.tokens_after_prune = after;
        before - after
    }

    #[must_use]
    pub fn index_hits(&self, query: &str) -> IndexHits {
        let Some(needle) = normalize_query(query, self.min_query_chars) else {
            return IndexHits::new();
        };
        self.tokens
            .iter()
            .filter(|(key, _)| key.contains(needle.as_str()))
            .map(|(_, postings)| (postings.token.clone(), postings.pages.clone()))
            .collect()
    }

    #[must_use]
    pub fn title_hits(&self, query: &str) -> TitleHits {
        let Some(needle) = normalize_query(query, self.min_query_chars) else {
            return TitleHits::new();
        };
        self.titles
            .iter()
            .filter(|(title, _)| title.to_lowercase().contains(needle.as_str()))
            .map(|(title, page)| (title.clone(), page.clone()))
            .collect()
    }

    #[must_use]
    pub fn page_title(&self, page_name: &str) -> Option<&str> {
        self.pages.get(page_name).map(String::as_str)
    }
}

fn normalize_query(query: &str, min_chars: usize) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.chars().count() < min_chars {
        return None;
    }
    Some(trimmed.to_lowercase())
}
