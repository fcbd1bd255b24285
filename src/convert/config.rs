//! Run configuration
//!
//! Nothing here is user-configurable: the base directory is the working
//! directory and the entries come from the fixed table.

use std::path::{Path, PathBuf};

use super::table::CONVERSIONS;
use super::ConversionEntry;

/// Configuration for a conversion run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root that every entry is resolved against
    pub base_dir: PathBuf,

    /// Entries to convert, in order
    pub entries: Vec<ConversionEntry>,
}

impl RunConfig {
    pub fn new(base_dir: impl Into<PathBuf>, entries: &[ConversionEntry]) -> Self {
        Self {
            base_dir: base_dir.into(),
            entries: entries.to_vec(),
        }
    }

    /// Fixed table rooted at `base_dir`
    pub fn fixed(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(base_dir, CONVERSIONS)
    }

    /// Fixed table rooted at the process working directory
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::fixed(std::env::current_dir()?))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_uses_table() {
        let config = RunConfig::fixed("/srv/map");
        assert_eq!(config.base_dir(), Path::new("/srv/map"));
        assert_eq!(config.entries.as_slice(), CONVERSIONS);
    }

    #[test]
    fn test_from_current_dir() -> std::io::Result<()> {
        let config = RunConfig::from_current_dir()?;
        assert_eq!(config.base_dir, std::env::current_dir()?);
        assert_eq!(config.entries.len(), CONVERSIONS.len());
        Ok(())
    }
}
