use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Widest provenance id (`u32::MAX`) in decimal digits.
pub const DEFAULT_PAD_WIDTH: usize = 10;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse options: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("pad_width must be between 1 and 20, got {0}")]
    InvalidPadWidth(usize),
    #[error("unknown collation '{0}', expected ordinal, natural or natural-reverse")]
    UnknownCollation(String),
}

/// How unit keys are ordered for presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collation {
    #[default]
    Ordinal,
    Natural,
    NaturalReverse,
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collation::Ordinal => write!(f, "ordinal"),
            Collation::Natural => write!(f, "natural"),
            Collation::NaturalReverse => write!(f, "natural-reverse"),
        }
    }
}

impl FromStr for Collation {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ordinal" => Ok(Collation::Ordinal),
            "natural" => Ok(Collation::Natural),
            "natural-reverse" | "natural_reverse" => Ok(Collation::NaturalReverse),
            other => Err(OptionsError::UnknownCollation(other.to_owned())),
        }
    }
}

/// Settings for one reconciliation pass.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReconcileOptions {
    /// Prefix unit keys with zero-padded provenance ids.
    #[serde(default)]
    pub renaming: bool,
    #[serde(default)]
    pub collation: Collation,
    #[serde(default = "default_pad_width")]
    pub pad_width: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            renaming: false,
            collation: Collation::default(),
            pad_width: default_pad_width(),
        }
    }
}

impl ReconcileOptions {
    pub fn validate(self) -> Result<Self, OptionsError> {
        if self.pad_width == 0 || self.pad_width > 20 {
            return Err(OptionsError::InvalidPadWidth(self.pad_width));
        }
        Ok(self)
    }
}

fn default_pad_width() -> usize {
    DEFAULT_PAD_WIDTH
}

pub fn parse_options_str(input: &str) -> Result<ReconcileOptions, OptionsError> {
    let options: ReconcileOptions = toml::from_str(input)?;
    options.validate()
}

pub fn parse_options_file(path: impl AsRef<Path>) -> Result<ReconcileOptions, OptionsError> {
    let content = fs::read_to_string(path)?;
    parse_options_str(&content)
}
