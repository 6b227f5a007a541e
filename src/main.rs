//! rst-comment-filter - reStructuredText comments to Doxygen HTML
//!
//! Interprets C block comments as reStructuredText, replaces them by the
//! rendered HTML and adds Doxygen `/**` and `/**<` markers where
//! appropriate. Rendered HTML is cached across runs.

mod cache;
mod cli;
mod config;
mod core;
mod error;
mod markup;

use clap::Parser;
use cli::Cli;
use markup::create_engine;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the filtered source
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Cli::parse().into_config();
    let engine = create_engine(&config);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    match core::run(&config, engine.as_ref(), &mut writer) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
