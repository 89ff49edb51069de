use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};

use crate::builder::IndexBuilder;
use crate::config::IndexingConfig;
use crate::error::{IndexError, Result};
use crate::index::LanguageIndex;
use crate::models::{IndexHits, IndexStats, RegistryState, RegistryStatus, TitleHits};
use crate::source::ResourceLocation;

const BUILD_THREAD_NAME: &str = "helpindex-build";

/// Every language index produced by one background build. Never mutated
/// after publication.
#[derive(Debug)]
pub struct IndexSnapshot {
    indexes: BTreeMap<String, Arc<LanguageIndex>>,
    published_at: DateTime<Utc>,
}

impl IndexSnapshot {
    #[must_use]
    pub fn language(&self, code: &str) -> Option<&LanguageIndex> {
        self.indexes.get(code).map(Arc::as_ref)
    }

    #[must_use]
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn stats(&self) -> impl Iterator<Item = &IndexStats> {
        self.indexes.values().map(|index| index.stats())
    }
}

#[derive(Debug, Default)]
struct Registration {
    locations: BTreeMap<String, ResourceLocation>,
    started: bool,
}

#[derive(Debug, Default)]
struct Publication {
    snapshot: ArcSwapOption<IndexSnapshot>,
    ready: AtomicBool,
    done: Mutex<bool>,
    done_changed: Condvar,
}

impl Publication {
    fn publish(&self, snapshot: IndexSnapshot) {
        self.snapshot.store(Some(Arc::new(snapshot)));
        // Written last: a reader that sees `ready` also sees the snapshot.
        self.ready.store(true, Ordering::Release);

        let mut done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        *done = true;
        self.done_changed.notify_all();
    }

    fn ready_snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }
        self.snapshot.load_full()
    }
}

/// Owns the help indexes of all registered languages.
///
/// Lifecycle: register languages with [`add_language`](Self::add_language),
/// then call [`init`](Self::init) once. `init` hands the whole build to one
/// background thread; until it publishes, every query returns an empty
/// result instead of waiting. There is no rebuild.
pub struct IndexRegistry {
    config: IndexingConfig,
    registration: Mutex<Registration>,
    current_language: ArcSwapOption<String>,
    publication: Arc<Publication>,
}

impl std::fmt::Debug for IndexRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexRegistry")
            .field("config", &self.config)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::new(IndexingConfig::default())
    }
}

impl IndexRegistry {
    #[must_use]
    pub fn new(config: IndexingConfig) -> Self {
        Self {
            config,
            registration: Mutex::new(Registration::default()),
            current_language: ArcSwapOption::empty(),
            publication: Arc::new(Publication::default()),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(IndexingConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &IndexingConfig {
        &self.config
    }

    /// Registers (or replaces) the help location of a language. Only allowed
    /// before [`init`](Self::init).
    pub fn add_language(&self, code: &str, location: ResourceLocation) -> Result<()> {
        let code = normalize_language(code)?;
        let mut registration = self.lock_registration()?;
        if registration.started {
            return Err(IndexError::Conflict(format!(
                "cannot register language {code}: index build already started"
            )));
        }
        registration.locations.insert(code, location);
        Ok(())
    }

    /// Starts the one-time background build. Relative locations are resolved
    /// against `resource_root`.
    pub fn init(&self, resource_root: impl AsRef<Path>) -> Result<()> {
        let mut registration = self.lock_registration()?;
        if registration.started {
            return Err(IndexError::Conflict("index build already started".to_string()));
        }

        let root = resource_root.as_ref().to_path_buf();
        let jobs = registration
            .locations
            .iter()
            .map(|(code, location)| (code.clone(), location.resolve(&root)))
            .collect::<Vec<_>>();
        let builder = IndexBuilder::new(self.config);
        let delay = self.config.build_delay;
        let publication = Arc::clone(&self.publication);

        tracing::info!(
            languages = jobs.len(),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            root = %root.display(),
            "scheduling help index build"
        );
        thread::Builder::new()
            .name(BUILD_THREAD_NAME.to_string())
            .spawn(move || run_build(&builder, delay, &jobs, &publication))?;

        registration.started = true;
        Ok(())
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.publication.ready.load(Ordering::Acquire)
    }

    /// Blocks until the build is published or `timeout` elapses. Queries never
    /// need this; it exists for callers that want a complete index up front.
    #[must_use]
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        let done = self
            .publication
            .done
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (done, _) = self
            .publication
            .done_changed
            .wait_timeout_while(done, timeout, |done| !*done)
            .unwrap_or_else(PoisonError::into_inner);
        *done
    }

    #[must_use]
    pub fn state(&self) -> RegistryState {
        if self.is_ready() {
            return RegistryState::Ready;
        }
        let registration = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if registration.started {
            RegistryState::Building
        } else if registration.locations.is_empty() {
            RegistryState::Unconfigured
        } else {
            RegistryState::Configured
        }
    }

    /// Selects the language later queries run against. Needs no rebuild and
    /// may name a language that is not (yet) indexed.
    pub fn set_language(&self, code: &str) -> Result<()> {
        let code = normalize_language(code)?;
        self.current_language.store(Some(Arc::new(code)));
        Ok(())
    }

    #[must_use]
    pub fn current_language(&self) -> Option<String> {
        self.current_language
            .load_full()
            .map(|code| code.as_ref().clone())
    }

    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .locations
            .keys()
            .cloned()
            .collect()
    }

    /// The published snapshot, once ready.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.publication.ready_snapshot()
    }

    #[must_use]
    pub fn title_hits(&self, query: &str) -> TitleHits {
        self.with_current_index(|index| index.title_hits(query))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn index_hits(&self, query: &str) -> IndexHits {
        self.with_current_index(|index| index.index_hits(query))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn page_title(&self, page_name: &str) -> Option<String> {
        self.with_current_index(|index| index.page_title(page_name).map(ToString::to_string))
            .flatten()
    }

    #[must_use]
    pub fn stats(&self) -> Vec<IndexStats> {
        self.snapshot()
            .map(|snapshot| snapshot.stats().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn status(&self) -> RegistryStatus {
        let snapshot = self.snapshot();
        RegistryStatus {
            state: self.state(),
            current_language: self.current_language(),
            languages: self.languages(),
            published_at: snapshot.as_ref().map(|snapshot| snapshot.published_at()),
            indexes: snapshot
                .map(|snapshot| snapshot.stats().cloned().collect())
                .unwrap_or_default(),
        }
    }

    fn with_current_index<T>(&self, query: impl FnOnce(&LanguageIndex) -> T) -> Option<T> {
        let snapshot = self.publication.ready_snapshot()?;
        let language = self.current_language.load_full()?;
        snapshot.language(language.as_str()).map(query)
    }

    fn lock_registration(&self) -> Result<std::sync::MutexGuard<'_, Registration>> {
        self.registration
            .lock()
            .map_err(|_| IndexError::Internal("registration lock poisoned".to_string()))
    }
}

fn normalize_language(raw: &str) -> Result<String> {
    let code = raw.trim().to_ascii_lowercase();
    if code.is_empty() {
        return Err(IndexError::InvalidLanguage(raw.to_string()));
    }
    Ok(code)
}

fn run_build(
    builder: &IndexBuilder,
    delay: Duration,
    jobs: &[(String, ResourceLocation)],
    publication: &Publication,
) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let mut indexes = BTreeMap::new();
    for (code, location) in jobs {
        let index = builder.build(code, location);
        indexes.insert(code.clone(), Arc::new(index));
    }

    tracing::info!(languages = indexes.len(), "help index ready");
    publication.publish(IndexSnapshot {
        indexes,
        published_at: Utc::now(),
    });
}
