//! Configuration types for rst-comment-filter

use std::path::PathBuf;

/// Default location of the render cache, relative to the working directory
pub const DEFAULT_CACHE_PATH: &str = "build/rst-cache.json";

/// Default interpreter used to run the docutils driver
pub const DEFAULT_PYTHON: &str = "python3";

/// Configuration options for a filter run
#[derive(Debug, Clone)]
pub struct Config {
    /// Source file whose block comments are rewritten
    pub input_path: PathBuf,

    /// Where the render cache is loaded from and saved to
    pub cache_path: PathBuf,

    /// Start from an empty cache instead of loading the stored one.
    /// The stored file is overwritten when the run ends.
    pub clear_cache: bool,

    /// Python interpreter that hosts docutils
    pub python: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            clear_cache: false,
            python: String::from(DEFAULT_PYTHON),
        }
    }
}
