//! Comment rewriting
//!
//! Renders one comment body (from the cache when possible) and wraps the
//! HTML in a Doxygen documentation comment.

use crate::cache::RenderCache;
use crate::core::normalize::{normalize, strip_api_tag};
use crate::core::scanner::preline;
use crate::error::Result;
use crate::markup::MarkupEngine;

/// Doxygen comment flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocMarker {
    /// `/**`, documents the entity that follows
    Leading,
    /// `/**<`, documents the entity before it on the same line
    Trailing,
}

impl DocMarker {
    /// Choose the marker from the source text preceding the comment on its line
    pub fn for_preline(preline: &str) -> Self {
        if preline.trim().is_empty() {
            DocMarker::Leading
        } else {
            DocMarker::Trailing
        }
    }

    pub fn open(self) -> &'static str {
        match self {
            DocMarker::Leading => "/**",
            DocMarker::Trailing => "/**<",
        }
    }
}

/// Whether the HTML came from the cache or a fresh render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSource {
    Cache,
    Engine,
}

/// Rendered HTML for `raw`, looked up in the cache or rendered and stored
pub fn render_cached(
    raw: &str,
    cache: &mut RenderCache,
    engine: &dyn MarkupEngine,
) -> Result<(String, RenderSource)> {
    if let Some(html) = cache.get(raw) {
        return Ok((html.to_string(), RenderSource::Cache));
    }

    let text = normalize(raw);
    let html = engine.render(strip_api_tag(&text))?;
    cache.insert(raw, html.clone());
    Ok((html, RenderSource::Engine))
}

/// Replacement text for one comment match: the preceding text followed by
/// the rendered comment in Doxygen form
pub fn rewrite(
    preceding: &str,
    raw: &str,
    cache: &mut RenderCache,
    engine: &dyn MarkupEngine,
) -> Result<(String, RenderSource)> {
    let marker = DocMarker::for_preline(preline(preceding));
    let (html, source) = render_cached(raw, cache, engine)?;

    let replacement = format!("{}{} {} */", preceding, marker.open(), html);
    Ok((replacement, source))
}
