//! Comment discovery, normalization and rewriting

pub mod normalize;
pub mod pipeline;
pub mod rewriter;
pub mod scanner;

#[cfg(test)]
mod testing;

pub use pipeline::run;
