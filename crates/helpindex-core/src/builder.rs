use crate::config::IndexingConfig;
use crate::index::LanguageIndex;
use crate::source::{DocumentSource, ResourceLocation, open_source};

/// Builds one [`LanguageIndex`] per call from a document collection.
///
/// Failures never escape: an unresolvable location yields an empty index and
/// an unreadable page is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBuilder {
    config: IndexingConfig,
}

impl IndexBuilder {
    #[must_use]
    pub const fn new(config: IndexingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn build(&self, language: &str, location: &ResourceLocation) -> LanguageIndex {
        match open_source(location) {
            Ok(mut source) => self.build_from_source(language, source.as_mut()),
            Err(err) => {
                tracing::warn!(
                    language,
                    location = %location,
                    error = %err,
                    "help location unavailable; language stays empty"
                );
                self.empty_index(language)
            }
        }
    }

    #[must_use]
    pub fn build_from_source(
        &self,
        language: &str,
        source: &mut dyn DocumentSource,
    ) -> LanguageIndex {
        let mut index = self.empty_index(language);
        let handles = match source.list_documents() {
            Ok(handles) => handles,
            Err(err) => {
                tracing::warn!(language, error = %err, "failed to list help pages");
                Vec::new()
            }
        };

        for handle in &handles {
            match source.read_text(handle) {
                Ok(text) => {
                    tracing::debug!(language, page = handle.page_name(), "scanning help page");
                    index.scan(handle.page_name(), &text);
                }
                Err(err) => {
                    tracing::warn!(
                        language,
                        page = handle.page_name(),
                        error = %err,
                        "skipping unreadable help page"
                    );
                    index.note_skipped();
                }
            }
        }

        let limit = self.config.pruning_limit(index.stats().scanned_documents);
        let removed = index.reduce(limit);
        tracing::info!(
            language,
            pages = index.stats().scanned_documents,
            skipped = index.stats().skipped_documents,
            tokens = index.token_count(),
            removed,
            limit,
            "help index built"
        );
        index
    }

    fn empty_index(&self, language: &str) -> LanguageIndex {
        LanguageIndex::new(language).with_min_query_chars(self.config.min_query_chars)
    }
}
