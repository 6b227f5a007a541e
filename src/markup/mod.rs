//! Markup rendering backends
//!
//! Comment text is reStructuredText. Rendering is delegated to an engine
//! behind the [`MarkupEngine`] trait so the pipeline does not care whether
//! HTML comes from docutils or from a test double.

mod docutils;

use crate::config::Config;
use crate::error::Result;

pub use docutils::DocutilsEngine;

/// Trait for markup-to-HTML rendering
pub trait MarkupEngine {
    /// Name of the engine (used in logs and tests)
    fn name(&self) -> &'static str;

    /// Render markup text and return the HTML body fragment
    ///
    /// An error here is fatal for the whole run; callers do not retry or
    /// skip the comment.
    fn render(&self, text: &str) -> Result<String>;
}

/// Create the engine described by the configuration
pub fn create_engine(config: &Config) -> Box<dyn MarkupEngine> {
    Box::new(DocutilsEngine::new(&config.python))
}
