//! Persistent cache of rendered comment HTML
//!
//! Rendering a comment through the markup engine is expensive, so the HTML
//! for each raw comment body is kept across runs. Entries are keyed by the
//! exact raw comment text; any textual change renders again.

mod storage;

pub use storage::{CacheOrigin, RenderCache};
