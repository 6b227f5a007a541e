//! Whole-file filtering
//!
//! Loads the render cache, rewrites every comment of the input file and
//! writes the result. The cache is saved exactly once when the run ends,
//! whether or not it succeeded, so renders finished before a failure are
//! not lost.

use crate::cache::RenderCache;
use crate::config::Config;
use crate::core::rewriter::{rewrite, RenderSource};
use crate::core::scanner::find_comments;
use crate::error::{FilterError, Result};
use crate::markup::MarkupEngine;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Counters for one filter run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Comments rewritten
    pub comments: usize,
    /// Comments whose HTML came from the cache
    pub cache_hits: usize,
    /// Comments sent to the markup engine
    pub rendered: usize,
}

/// Rewrite every comment in `text`
///
/// Matches are replaced in one left-to-right pass; replaced text is never
/// scanned again. The first engine error aborts the pass.
pub fn filter_source(
    text: &str,
    cache: &mut RenderCache,
    engine: &dyn MarkupEngine,
) -> Result<(String, FilterStats)> {
    let mut output = String::with_capacity(text.len());
    let mut stats = FilterStats::default();
    let mut last_end = 0;

    for comment in find_comments(text) {
        output.push_str(&text[last_end..comment.span.start]);

        let (replacement, source) = rewrite(comment.preceding, comment.raw, cache, engine)?;
        output.push_str(&replacement);
        last_end = comment.span.end;

        stats.comments += 1;
        match source {
            RenderSource::Cache => stats.cache_hits += 1,
            RenderSource::Engine => stats.rendered += 1,
        }
    }

    output.push_str(&text[last_end..]);
    Ok((output, stats))
}

/// Filter the configured input file into `out`
pub fn run(config: &Config, engine: &dyn MarkupEngine, out: &mut dyn Write) -> Result<FilterStats> {
    let mut cache = if config.clear_cache {
        RenderCache::empty(&config.cache_path)
    } else {
        RenderCache::load(&config.cache_path)
    };

    let outcome = filter_file(&config.input_path, &mut cache, engine, out);
    let saved = cache.save();

    match (outcome, saved) {
        (Ok(stats), Ok(())) => {
            tracing::info!(
                input = %config.input_path.display(),
                comments = stats.comments,
                cache_hits = stats.cache_hits,
                rendered = stats.rendered,
                engine = engine.name(),
                cache_origin = ?cache.origin(),
                "filtered source file"
            );
            Ok(stats)
        }
        (Ok(_), Err(save_err)) => Err(save_err),
        (Err(err), Ok(())) => {
            tracing::debug!(
                entries = cache.len(),
                path = %cache.path().display(),
                "render cache saved after failed run"
            );
            Err(err)
        }
        (Err(err), Err(save_err)) => {
            tracing::error!(error = %save_err, "could not save render cache");
            Err(err)
        }
    }
}

fn filter_file(
    path: &Path,
    cache: &mut RenderCache,
    engine: &dyn MarkupEngine,
    out: &mut dyn Write,
) -> Result<FilterStats> {
    let text = fs::read_to_string(path).map_err(|e| FilterError::FileNotFound {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let text = universal_newlines(&text);

    let (filtered, stats) = filter_source(&text, cache, engine)?;
    out.write_all(filtered.as_bytes())?;
    out.flush()?;
    Ok(stats)
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
fn universal_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
