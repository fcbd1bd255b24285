//! Batch DDS -> PNG conversion
//!
//! Walks the fixed conversion table in order. Missing sources are skipped
//! with a "File not found" line and a failing entry never stops the run.

mod config;
mod runner;
mod table;

pub use config::RunConfig;
pub use runner::{ConversionRunner, EntryOutcome, RunResult};
pub use table::CONVERSIONS;

/// One (source, destination) pair, both relative to the base directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionEntry {
    pub source: &'static str,
    pub destination: &'static str,
}

impl ConversionEntry {
    pub const fn new(source: &'static str, destination: &'static str) -> Self {
        Self { source, destination }
    }
}
