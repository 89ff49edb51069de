use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{IndexError, Result};
use crate::source::ResourceLocation;

/// Describes which help bundles exist for which languages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelpManifest {
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub build_delay_ms: Option<u64>,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
}

impl HelpManifest {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(raw)?;
        if manifest.languages.keys().any(|code| code.trim().is_empty()) {
            return Err(IndexError::Validation(
                "manifest contains a blank language code".to_string(),
            ));
        }
        Ok(manifest)
    }

    /// Reads a manifest file. A relative `root` is anchored at the manifest's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IndexError::NotFound(path.display().to_string()));
        }
        let mut manifest = Self::from_toml_str(&fs::read_to_string(path)?)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        manifest.root = Some(match manifest.root.take() {
            Some(root) if root.is_relative() => base.join(root),
            Some(root) => root,
            None => base.to_path_buf(),
        });
        Ok(manifest)
    }

    #[must_use]
    pub fn build_delay(&self) -> Option<Duration> {
        self.build_delay_ms.map(Duration::from_millis)
    }

    /// Parses every language descriptor, failing on the first malformed one.
    pub fn locations(&self) -> Result<Vec<(String, ResourceLocation)>> {
        self.languages
            .iter()
            .map(|(code, descriptor)| Ok((code.clone(), ResourceLocation::parse(descriptor)?)))
            .collect()
    }
}
