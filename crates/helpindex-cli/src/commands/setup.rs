use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use helpindex_core::{HelpManifest, IndexError, IndexRegistry, IndexingConfig, ResourceLocation};

use crate::cli::Cli;

/// Everything the registry needs, merged from environment, manifest and flags.
/// Flags win over the manifest, the manifest wins over the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct HelpSetup {
    pub(super) root: PathBuf,
    pub(super) config: IndexingConfig,
    pub(super) languages: Vec<(String, ResourceLocation)>,
    pub(super) selected: Option<String>,
}

impl HelpSetup {
    pub(super) fn resolve(cli: &Cli) -> Result<Self> {
        let manifest = cli
            .manifest
            .as_deref()
            .map(|path| {
                HelpManifest::load(path)
                    .with_context(|| format!("failed to load manifest {}", path.display()))
            })
            .transpose()?;

        let mut config = IndexingConfig::from_env();
        if let Some(delay) = manifest.as_ref().and_then(HelpManifest::build_delay) {
            config = config.with_build_delay(delay);
        }
        if let Some(delay_ms) = cli.build_delay_ms {
            config = config.with_build_delay(Duration::from_millis(delay_ms));
        }

        let mut languages = match &manifest {
            Some(manifest) => manifest
                .locations()
                .context("manifest contains an invalid help location")?,
            None => Vec::new(),
        };
        languages.extend(
            cli.languages
                .iter()
                .map(|binding| (binding.code.clone(), binding.location.clone())),
        );
        if languages.is_empty() {
            return Err(IndexError::Validation(
                "no help languages configured; pass --manifest or --lang CODE=LOCATION"
                    .to_string(),
            )
            .into());
        }

        let root = cli
            .root
            .clone()
            .or_else(|| manifest.as_ref().and_then(|manifest| manifest.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));
        let selected = cli
            .language
            .clone()
            .or_else(|| {
                manifest
                    .as_ref()
                    .and_then(|manifest| manifest.default_language.clone())
            })
            .or_else(|| languages.first().map(|(code, _)| code.clone()));

        Ok(Self {
            root,
            config,
            languages,
            selected,
        })
    }

    /// Registers every language, selects the query language and schedules the build.
    pub(super) fn start(&self) -> Result<IndexRegistry> {
        let registry = IndexRegistry::new(self.config);
        for (code, location) in &self.languages {
            registry
                .add_language(code, location.clone())
                .with_context(|| format!("failed to register language {code}"))?;
        }

        let Some(code) = self.selected.as_deref() else {
            return Err(IndexError::Validation("no help language selected".to_string()).into());
        };
        registry
            .set_language(code)
            .with_context(|| format!("failed to select language {code}"))?;

        registry
            .init(&self.root)
            .context("failed to start help index build")?;
        tracing::debug!(
            root = %self.root.display(),
            language = code,
            "help index build started"
        );
        Ok(registry)
    }
}
