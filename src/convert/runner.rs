//! Sequential conversion runner

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{ConversionEntry, RunConfig};
use crate::paths;
use crate::textures::{save_by_extension, Codec, DecodedImage, TextureError};

/// What happened to a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Written to `output`
    Converted { output: PathBuf, width: u32, height: u32 },
    /// Source not on disk, nothing attempted
    Missing { source: PathBuf },
    /// Open, decode, encode or write failed
    Failed { source: PathBuf, error: String },
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EntryOutcome::Converted { .. })
    }
}

/// Tally for one run. Displays as `succeeded/total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Entries in the table, missing ones included
    pub total: usize,
    /// Per-entry outcomes in table order
    pub outcomes: Vec<EntryOutcome>,
}

impl RunResult {
    fn new(total: usize) -> Self {
        Self {
            total,
            outcomes: Vec::with_capacity(total),
        }
    }

    fn record(&mut self, outcome: EntryOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn missing(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Missing { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Failed { .. }))
            .count()
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded(), self.total)
    }
}

/// Converts every entry of a [`RunConfig`] with the given codec
pub struct ConversionRunner<C> {
    config: RunConfig,
    codec: C,
}

impl<C: Codec> ConversionRunner<C> {
    pub fn new(config: RunConfig, codec: C) -> Self {
        Self { config, codec }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Process all entries in order. Never stops early.
    pub fn run(&self) -> RunResult {
        let mut result = RunResult::new(self.config.entries.len());

        info!(
            "Converting {} textures under {}",
            result.total,
            self.config.base_dir.display()
        );

        for entry in &self.config.entries {
            let outcome = self.convert_entry(entry);
            result.record(outcome);
        }

        info!(
            "Conversion complete: {} succeeded, {} missing, {} failed",
            result.succeeded(),
            result.missing(),
            result.failed()
        );

        result
    }

    fn convert_entry(&self, entry: &ConversionEntry) -> EntryOutcome {
        let source = paths::resolve(&self.config.base_dir, entry.source);
        let output = paths::resolve(&self.config.base_dir, entry.destination);

        if !source.exists() {
            debug!("Skipping {}: source missing", entry.source);
            println!("File not found: {}", source.display());
            return EntryOutcome::Missing { source };
        }

        println!("Converting: {}", source.display());

        match self.convert_file(&source, &output) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                println!("  Saved: {} ({}x{})", output.display(), width, height);
                EntryOutcome::Converted { output, width, height }
            }
            Err(e) => {
                let error = e.to_string();
                debug!("Failed to convert {}: {}", source.display(), error);
                println!("  Error: {}", error);
                EntryOutcome::Failed { source, error }
            }
        }
    }

    fn convert_file(&self, source: &Path, output: &Path) -> Result<DecodedImage, TextureError> {
        paths::ensure_parent_dirs(output).map_err(|e| TextureError::Persist {
            path: output.to_path_buf(),
            source: e,
        })?;

        let image = self.codec.open(source)?;
        debug!("Decoded {:?}", image.source_kind());

        save_by_extension(&self.codec, &image, output)?;
        Ok(image)
    }
}
