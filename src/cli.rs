//! CLI argument parsing using clap

use crate::config::{Config, DEFAULT_CACHE_PATH, DEFAULT_PYTHON};
use clap::Parser;
use std::path::PathBuf;

/// Render reStructuredText block comments as Doxygen HTML comments
#[derive(Parser, Debug)]
#[command(name = "rst-comment-filter")]
#[command(version)]
#[command(
    about = "Interpret C block comments as reStructuredText and replace them by the HTML output",
    long_about = None
)]
pub struct Cli {
    /// Source file to filter; the result is written to stdout
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Render cache location
    #[arg(long = "cache-file", value_name = "PATH", default_value = DEFAULT_CACHE_PATH)]
    pub cache_file: PathBuf,

    /// Ignore the stored render cache and rebuild it from scratch
    #[arg(long = "clear-cache")]
    pub clear_cache: bool,

    /// Python interpreter with docutils installed
    #[arg(long = "python", value_name = "EXE", default_value = DEFAULT_PYTHON)]
    pub python: String,
}

impl Cli {
    /// Convert parsed arguments into a Config
    pub fn into_config(self) -> Config {
        Config {
            input_path: self.input,
            cache_path: self.cache_file,
            clear_cache: self.clear_cache,
            python: self.python,
        }
    }
}
