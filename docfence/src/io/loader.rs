//! Tutorial discovery and lazy loading.
//!
//! Discovery walks the input directory once and fixes the file list; reading
//! happens only when a document is requested, so the sequence can be
//! iterated again (or split across workers) without walking twice.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::types::LoadFailure;
use crate::io::config::DocfenceConfig;

/// Raw text of one tutorial file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub path: PathBuf,
    /// Path relative to the input directory, `/`-separated.
    pub relative: String,
    pub text: String,
}

impl RawDocument {
    /// File name without its extension, used as a fallback title.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.relative.clone())
    }
}

/// Discovered tutorial files under one input directory.
#[derive(Debug, Clone)]
pub struct Loader {
    root: PathBuf,
    files: Vec<PathBuf>,
    failures: Vec<LoadFailure>,
}

impl Loader {
    /// Walk `root` and collect tutorial files in path order.
    ///
    /// Fails only when `root` itself is missing or not a directory. Entries
    /// that cannot be walked are kept as [`LoadFailure`]s.
    pub fn discover(root: &Path, config: &DocfenceConfig) -> Result<Self> {
        if !root.exists() {
            bail!("input directory {} does not exist", root.display());
        }
        if !root.is_dir() {
            bail!("input path {} is not a directory", root.display());
        }

        let mut files = Vec::new();
        let mut failures = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && config.matches_extension(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(|path| relative_path(root, path))
                        .unwrap_or_else(|| ".".to_string());
                    warn!(path = %path, error = %err, "skipping unreadable entry");
                    failures.push(LoadFailure {
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }
        files.sort();
        debug!(root = %root.display(), files = files.len(), "discovered tutorials");

        Ok(Self {
            root: root.to_path_buf(),
            files,
            failures,
        })
    }

    /// Drop discovered files under `dir` (e.g. an output directory nested in
    /// the input directory).
    pub fn without_dir(mut self, dir: &Path) -> Self {
        self.files.retain(|path| !path.starts_with(dir));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Entries that could not be walked during discovery.
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Read one discovered file.
    pub fn load(&self, path: &Path) -> std::result::Result<RawDocument, LoadFailure> {
        let relative = relative_path(&self.root, path);
        match fs::read_to_string(path) {
            Ok(text) => Ok(RawDocument {
                path: path.to_path_buf(),
                relative,
                text,
            }),
            Err(err) => {
                warn!(path = %relative, error = %err, "failed to read tutorial");
                Err(LoadFailure {
                    path: relative,
                    message: err.to_string(),
                })
            }
        }
    }

    /// Lazily read every discovered file, in path order.
    pub fn documents(
        &self,
    ) -> impl Iterator<Item = std::result::Result<RawDocument, LoadFailure>> + '_ {
        self.files.iter().map(|path| self.load(path))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// `/`-separated path of `path` below `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
