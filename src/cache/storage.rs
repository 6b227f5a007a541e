//! Cache storage implementation

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Current cache format version
const CACHE_VERSION: u32 = 1;

/// On-disk layout of the cache file
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    /// Cache format version
    version: u32,
    /// Raw comment text -> rendered HTML body
    entries: BTreeMap<String, String>,
}

/// How the in-memory cache came to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOrigin {
    /// No cache file existed
    Missing,
    /// Started empty on request (--clear-cache)
    Cleared,
    /// Entries were read from the cache file
    Loaded,
    /// The cache file existed but could not be used; started empty
    Recovered { reason: String },
}

/// Mapping from raw comment text to rendered HTML, bound to a file path
#[derive(Debug)]
pub struct RenderCache {
    path: PathBuf,
    entries: HashMap<String, String>,
    origin: CacheOrigin,
}

impl RenderCache {
    /// Create an empty cache that will be saved to `path`
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: HashMap::new(),
            origin: CacheOrigin::Cleared,
        }
    }

    /// Load the cache stored at `path`
    ///
    /// Never fails: a missing file gives an empty cache, and a file that
    /// cannot be read or parsed gives an empty cache marked `Recovered`.
    pub fn load(path: &Path) -> Self {
        let (entries, origin) = if !path.exists() {
            (HashMap::new(), CacheOrigin::Missing)
        } else {
            match read_cache_file(path) {
                Ok(entries) => (entries, CacheOrigin::Loaded),
                Err(reason) => {
                    tracing::warn!(
                        path = %path.display(),
                        %reason,
                        "discarding unreadable render cache"
                    );
                    (HashMap::new(), CacheOrigin::Recovered { reason })
                }
            }
        };

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            ?origin,
            "render cache loaded"
        );

        Self {
            path: path.to_path_buf(),
            entries,
            origin,
        }
    }

    /// Path the cache is saved to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the entries came from
    pub fn origin(&self) -> &CacheOrigin {
        &self.origin
    }

    /// Look up the rendered HTML for a raw comment
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    /// Record the rendered HTML for a raw comment.
    /// An existing entry for the same text is kept as is.
    pub fn insert(&mut self, raw: &str, html: String) {
        self.entries.entry(raw.to_string()).or_insert(html);
    }

    /// Number of cached comments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no comment is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache to `<path>.new`, then rename it over `path`
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    FilterError::CacheError(format!(
                        "Failed to create cache directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let temp_path = temp_path_for(&self.path);
        let snapshot = CacheFile {
            version: CACHE_VERSION,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };

        let file = File::create(&temp_path).map_err(|e| {
            FilterError::CacheError(format!(
                "Failed to create cache file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &snapshot)
            .map_err(|e| FilterError::CacheError(format!("Failed to write cache: {}", e)))?;
        let file = writer
            .into_inner()
            .map_err(|e| FilterError::CacheError(format!("Failed to write cache: {}", e)))?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            FilterError::CacheError(format!(
                "Failed to replace cache file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            entries = self.entries.len(),
            "render cache saved"
        );
        Ok(())
    }
}

/// `<path>.new`, the staging file for atomic saves
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".new");
    PathBuf::from(name)
}

fn read_cache_file(path: &Path) -> std::result::Result<HashMap<String, String>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);
    let stored: CacheFile = serde_json::from_reader(reader).map_err(|e| e.to_string())?;

    if stored.version != CACHE_VERSION {
        return Err(format!(
            "cache version {} is not supported (expected {})",
            stored.version, CACHE_VERSION
        ));
    }

    Ok(stored.entries.into_iter().collect())
}
