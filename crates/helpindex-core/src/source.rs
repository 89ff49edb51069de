use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{IndexError, Result};

const ARCHIVE_SEPARATOR: &str = "!/";
const HTML_PATTERNS: [&str; 2] = ["*.html", "*.htm"];

/// Where the help pages of one language live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    Directory(PathBuf),
    /// Entries directly below `prefix` inside a zip (or jar) bundle.
    Archive { archive: PathBuf, prefix: String },
}

impl ResourceLocation {
    /// Parses `dir`, `bundle.zip` or `bundle.zip!/inner/prefix`.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let trimmed = descriptor.trim();
        if trimmed.is_empty() {
            return Err(IndexError::InvalidLocation(
                "empty location descriptor".to_string(),
            ));
        }

        if let Some((archive, prefix)) = trimmed.split_once(ARCHIVE_SEPARATOR) {
            if archive.trim().is_empty() {
                return Err(IndexError::InvalidLocation(format!(
                    "missing archive path: {trimmed}"
                )));
            }
            return Ok(Self::Archive {
                archive: PathBuf::from(archive.trim()),
                prefix: normalize_prefix(prefix),
            });
        }

        let path = PathBuf::from(trimmed);
        if is_archive_path(&path) {
            return Ok(Self::Archive {
                archive: path,
                prefix: String::new(),
            });
        }
        Ok(Self::Directory(path))
    }

    /// Anchors relative paths at `root`.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> Self {
        let anchor = |path: &Path| {
            if path.is_relative() {
                root.join(path)
            } else {
                path.to_path_buf()
            }
        };
        match self {
            Self::Directory(path) => Self::Directory(anchor(path)),
            Self::Archive { archive, prefix } => Self::Archive {
                archive: anchor(archive),
                prefix: prefix.clone(),
            },
        }
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(path) => write!(f, "{}", path.display()),
            Self::Archive { archive, prefix } if prefix.is_empty() => {
                write!(f, "{}", archive.display())
            }
            Self::Archive { archive, prefix } => {
                write!(f, "{}{ARCHIVE_SEPARATOR}{prefix}", archive.display())
            }
        }
    }
}

fn normalize_prefix(raw: &str) -> String {
    raw.trim().trim_matches('/').to_string()
}

fn is_archive_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "zip" | "jar"))
        .unwrap_or(false)
}

/// One readable page inside a [`DocumentSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    page_name: String,
    entry: String,
}

impl DocumentHandle {
    /// `page_name` is what queries report; `entry` is the source's own key for
    /// reading the page back.
    #[must_use]
    pub fn new(page_name: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            entry: entry.into(),
        }
    }

    #[must_use]
    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }
}

/// Lists and reads the help pages of one location.
pub trait DocumentSource {
    /// HTML pages in page-name order. Non-HTML entries are left out.
    fn list_documents(&mut self) -> Result<Vec<DocumentHandle>>;

    /// Page text as UTF-8 with lines joined by `\n`.
    fn read_text(&mut self, handle: &DocumentHandle) -> Result<String>;
}

pub fn open_source(location: &ResourceLocation) -> Result<Box<dyn DocumentSource>> {
    match location {
        ResourceLocation::Directory(path) => Ok(Box::new(DirectorySource::open(path)?)),
        ResourceLocation::Archive { archive, prefix } => {
            Ok(Box::new(ArchiveSource::open(archive, prefix)?))
        }
    }
}

#[derive(Debug, Clone)]
struct HtmlFilter {
    patterns: GlobSet,
}

impl HtmlFilter {
    fn new() -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in HTML_PATTERNS {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|err| IndexError::Internal(format!("html glob '{pattern}': {err}")))?;
            builder.add(glob);
        }
        let patterns = builder
            .build()
            .map_err(|err| IndexError::Internal(format!("html globs: {err}")))?;
        Ok(Self { patterns })
    }

    fn allows(&self, file_name: &str) -> bool {
        self.patterns.is_match(file_name)
    }
}

fn join_lines(raw: &str) -> String {
    raw.lines().collect::<Vec<_>>().join("\n")
}

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    filter: HtmlFilter,
}

impl DirectorySource {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(IndexError::InvalidLocation(format!(
                "not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
            filter: HtmlFilter::new()?,
        })
    }
}

impl DocumentSource for DirectorySource {
    fn list_documents(&mut self) -> Result<Vec<DocumentHandle>> {
        let mut out = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(
                        root = %self.root.display(),
                        error = %err,
                        "skipping unreadable directory entry"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if self.filter.allows(name) {
                out.push(DocumentHandle::new(name, name));
            }
        }
        Ok(out)
    }

    fn read_text(&mut self, handle: &DocumentHandle) -> Result<String> {
        let raw = fs::read_to_string(self.root.join(&handle.entry))?;
        Ok(join_lines(&raw))
    }
}

pub struct ArchiveSource {
    archive_path: PathBuf,
    prefix: String,
    archive: ZipArchive<fs::File>,
    filter: HtmlFilter,
}

impl fmt::Debug for ArchiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveSource")
            .field("archive_path", &self.archive_path)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl ArchiveSource {
    pub fn open(archive_path: &Path, prefix: &str) -> Result<Self> {
        if !archive_path.is_file() {
            return Err(IndexError::InvalidLocation(format!(
                "archive not found: {}",
                archive_path.display()
            )));
        }
        let archive = ZipArchive::new(fs::File::open(archive_path)?).map_err(|err| {
            IndexError::InvalidArchive(format!("{}: {err}", archive_path.display()))
        })?;
        let prefix = normalize_prefix(prefix);
        if !prefix.is_empty() {
            let dir = format!("{prefix}/");
            if !archive.file_names().any(|name| name.starts_with(&dir)) {
                return Err(IndexError::NotFound(format!(
                    "bundle entry {prefix} in {}",
                    archive_path.display()
                )));
            }
        }
        Ok(Self {
            archive_path: archive_path.to_path_buf(),
            prefix,
            archive,
            filter: HtmlFilter::new()?,
        })
    }

    fn page_name_of<'a>(&self, entry_name: &'a str) -> Option<&'a str> {
        let relative = if self.prefix.is_empty() {
            entry_name
        } else {
            entry_name
                .strip_prefix(self.prefix.as_str())?
                .strip_prefix('/')?
        };
        if relative.is_empty() || relative.contains('/') {
            return None;
        }
        Some(relative)
    }
}

impl DocumentSource for ArchiveSource {
    fn list_documents(&mut self) -> Result<Vec<DocumentHandle>> {
        let mut out = Vec::new();
        for name in self.archive.file_names() {
            let Some(page_name) = self.page_name_of(name) else {
                continue;
            };
            if self.filter.allows(page_name) {
                out.push(DocumentHandle::new(page_name, name));
            }
        }
        out.sort_by(|a, b| a.page_name.cmp(&b.page_name));
        Ok(out)
    }

    fn read_text(&mut self, handle: &DocumentHandle) -> Result<String> {
        let mut file = self.archive.by_name(&handle.entry)?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)?;
        Ok(join_lines(&raw))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).expect("create zip");
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, text) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).expect("add dir");
            } else {
                zip.start_file(*name, options).expect("start file");
                zip.write_all(text.as_bytes()).expect("write entry");
            }
        }
        zip.finish().expect("finish zip");
    }

    fn page_names(source: &mut dyn DocumentSource) -> Vec<String> {
        source
            .list_documents()
            .expect("list documents")
            .iter()
            .map(|handle| handle.page_name().to_string())
            .collect()
    }

    #[test]
    fn parse_distinguishes_directories_and_archives() {
        assert_eq!(
            ResourceLocation::parse(" help/en ").expect("dir"),
            ResourceLocation::Directory(PathBuf::from("help/en"))
        );
        assert_eq!(
            ResourceLocation::parse("help.JAR").expect("jar"),
            ResourceLocation::Archive {
                archive: PathBuf::from("help.JAR"),
                prefix: String::new(),
            }
        );
        assert_eq!(
            ResourceLocation::parse("bundle.zip!/docs/en/").expect("prefixed"),
            ResourceLocation::Archive {
                archive: PathBuf::from("bundle.zip"),
                prefix: "docs/en".to_string(),
            }
        );
    }

    #[test]
    fn parse_rejects_malformed_descriptors() {
        for raw in ["", "   ", "!/en"] {
            let err = ResourceLocation::parse(raw).expect_err("malformed");
            assert_eq!(err.code(), "INVALID_LOCATION", "descriptor {raw:?}");
        }
    }

    #[test]
    fn resolve_anchors_only_relative_paths() {
        let root = Path::new("/opt/app");
        assert_eq!(
            ResourceLocation::Directory(PathBuf::from("help")).resolve(root),
            ResourceLocation::Directory(PathBuf::from("/opt/app/help"))
        );
        assert_eq!(
            ResourceLocation::Directory(PathBuf::from("/srv/help")).resolve(root),
            ResourceLocation::Directory(PathBuf::from("/srv/help"))
        );
    }

    #[test]
    fn display_round_trips_archive_descriptor() {
        let location = ResourceLocation::parse("bundle.zip!/en").expect("parse");
        assert_eq!(location.to_string(), "bundle.zip!/en");
        assert_eq!(ResourceLocation::parse(&location.to_string()).expect("reparse"), location);
    }

    #[test]
    fn directory_source_lists_html_files_sorted_and_case_insensitively() {
        let temp = tempfile::tempdir().expect("tempdir");
        for name in ["b.HTML", "a.htm", "notes.txt", "c.html.bak", "d.Html"] {
            fs::write(temp.path().join(name), "<p>x</p>").expect("write page");
        }
        fs::create_dir(temp.path().join("nested.html")).expect("mkdir");
        fs::create_dir(temp.path().join("sub")).expect("mkdir");
        fs::write(temp.path().join("sub").join("deep.html"), "x").expect("write deep");

        let mut source = DirectorySource::open(temp.path()).expect("open dir");
        assert_eq!(page_names(&mut source), vec!["a.htm", "b.HTML", "d.Html"]);
    }

    #[test]
    fn directory_source_joins_lines_with_newlines() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("a.html"), "one\r\ntwo\r\nthree\n").expect("write page");

        let mut source = DirectorySource::open(temp.path()).expect("open dir");
        let handles = source.list_documents().expect("list");
        assert_eq!(source.read_text(&handles[0]).expect("read"), "one\ntwo\nthree");
    }

    #[test]
    fn directory_source_rejects_missing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = DirectorySource::open(&temp.path().join("absent")).expect_err("missing");
        assert_eq!(err.code(), "INVALID_LOCATION");
    }

    #[test]
    fn archive_source_lists_pages_directly_below_prefix() {
        let temp = tempfile::tempdir().expect("tempdir");
        let zip_path = temp.path().join("bundle.zip");
        write_zip(
            &zip_path,
            &[
                ("help/", ""),
                ("help/en/", ""),
                ("help/en/zeta.html", "<p>z</p>"),
                ("help/en/alpha.HTM", "<p>a</p>"),
                ("help/en/logo.png", "png"),
                ("help/en/img/inner.html", "<p>i</p>"),
                ("help/de/alpha.html", "<p>de</p>"),
            ],
        );

        let mut source = ArchiveSource::open(&zip_path, "/help/en/").expect("open archive");
        assert_eq!(page_names(&mut source), vec!["alpha.HTM", "zeta.html"]);

        let handles = source.list_documents().expect("list");
        assert_eq!(source.read_text(&handles[1]).expect("read"), "<p>z</p>");
    }

    #[test]
    fn archive_source_without_prefix_uses_top_level_entries() {
        let temp = tempfile::tempdir().expect("tempdir");
        let zip_path = temp.path().join("bundle.zip");
        write_zip(
            &zip_path,
            &[("index.html", "<p>i</p>"), ("en/other.html", "<p>o</p>")],
        );

        let mut source = ArchiveSource::open(&zip_path, "").expect("open archive");
        assert_eq!(page_names(&mut source), vec!["index.html"]);
    }

    #[test]
    fn archive_source_reports_missing_prefix_and_bad_archives() {
        let temp = tempfile::tempdir().expect("tempdir");
        let zip_path = temp.path().join("bundle.zip");
        write_zip(&zip_path, &[("en/a.html", "<p>a</p>")]);

        let missing = ArchiveSource::open(&zip_path, "fr").expect_err("missing prefix");
        assert_eq!(missing.code(), "NOT_FOUND");

        let garbage = temp.path().join("garbage.zip");
        fs::write(&garbage, b"not a zip").expect("write garbage");
        let invalid = ArchiveSource::open(&garbage, "").expect_err("garbage archive");
        assert_eq!(invalid.code(), "INVALID_ARCHIVE");

        let absent = ArchiveSource::open(&temp.path().join("absent.zip"), "").expect_err("absent");
        assert_eq!(absent.code(), "INVALID_LOCATION");
    }

    #[test]
    fn archive_source_fails_reading_invalid_utf8() {
        let temp = tempfile::tempdir().expect("tempdir");
        let zip_path = temp.path().join("bundle.zip");
        let mut zip = ZipWriter::new(fs::File::create(&zip_path).expect("create zip"));
        zip.start_file("bad.html", SimpleFileOptions::default())
            .expect("start file");
        zip.write_all(&[0xff, 0xfe, 0x00]).expect("write entry");
        zip.finish().expect("finish zip");

        let mut source = ArchiveSource::open(&zip_path, "").expect("open archive");
        let handles = source.list_documents().expect("list");
        assert!(source.read_text(&handles[0]).is_err());
    }

    #[test]
    fn open_source_dispatches_on_location_kind() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("a.html"), "<p>a</p>").expect("write page");

        let mut source =
            open_source(&ResourceLocation::Directory(temp.path().to_path_buf())).expect("open");
        assert_eq!(page_names(source.as_mut()), vec!["a.html"]);

        let err = open_source(&ResourceLocation::Archive {
            archive: temp.path().join("missing.zip"),
            prefix: String::new(),
        })
        .err()
        .expect("missing archive");
        assert_eq!(err.code(), "INVALID_LOCATION");
    }
}
