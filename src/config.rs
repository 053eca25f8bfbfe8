//! Configuration management for the graph core analyzer

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Edge count at which loading switches to the partitioned out-of-core path
pub const DEFAULT_PARTITION_THRESHOLD: u64 = 30_000_000;

/// Token separator for edge-list input and score output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Tab,
    Space,
    Comma,
}

impl Delimiter {
    /// Character used to split and join tokens
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Space => ' ',
            Delimiter::Comma => ',',
        }
    }

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            Delimiter::Tab => "tab",
            Delimiter::Space => "space",
            Delimiter::Comma => "comma",
        }
    }
}

impl FromStr for Delimiter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tab" => Ok(Delimiter::Tab),
            "space" => Ok(Delimiter::Space),
            "comma" => Ok(Delimiter::Comma),
            other => Err(Error::Config(format!(
                "unknown delimiter '{}', expected one of [tab, space, comma]",
                other
            ))),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for loading a graph and writing results
#[derive(Debug, Clone)]
pub struct Config {
    /// Separator of the input edge list
    pub delimiter: Delimiter,

    /// Separator written between vertex index and score
    pub output_delimiter: Delimiter,

    /// Edges per partition; inputs at or above this size are loaded out of core
    pub partition_threshold: u64,

    /// Merge partition files on the rayon pool
    pub parallel_merge: bool,

    /// Directory for partition files (system temp dir when unset)
    pub temp_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Tab,
            output_delimiter: Delimiter::Tab,
            partition_threshold: DEFAULT_PARTITION_THRESHOLD,
            parallel_merge: false,
            temp_dir: None,
        }
    }
}

impl Config {
    /// Create a configuration for the given input delimiter
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }

    pub fn with_partition_threshold(mut self, threshold: u64) -> Self {
        self.partition_threshold = threshold;
        self
    }

    pub fn with_parallel_merge(mut self, parallel: bool) -> Self {
        self.parallel_merge = parallel;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Reject settings that would make the loader misbehave
    pub fn validate(&self) -> Result<()> {
        if self.partition_threshold == 0 {
            return Err(Error::Config(
                "partition threshold must be greater than zero".to_string(),
            ));
        }
        if let Some(dir) = &self.temp_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::Config("temp dir must not be empty".to_string()));
            }
        }
        Ok(())
    }
}
