//! Configuration for the document filter

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use spec_rules::Vocabulary;
use thiserror::Error;

/// Default cutoff: documents must be older than this
pub const DEFAULT_CUTOFF: &str = "2023-06-27T23:00:00Z";

/// Default comma-separated word list
pub const DEFAULT_WORDS: &str = "First,Third";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid DOC_FILTER_CUTOFF '{value}': {source}")]
    InvalidCutoff {
        value: String,
        source: chrono::ParseError,
    },

    #[error("DOC_FILTER_WORDS must name at least one word")]
    NoWords,
}

/// Document filter configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file with documents; built-in samples when unset
    pub input: Option<PathBuf>,

    /// Documents dated at or after this instant are rejected
    pub cutoff: DateTime<Utc>,

    /// A document matches if its title and content both contain one of these
    pub words: Vec<String>,

    /// Operator tokens used when logging the rule
    pub vocabulary: Vocabulary,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cutoff = lookup("DOC_FILTER_CUTOFF").unwrap_or_else(|| DEFAULT_CUTOFF.to_string());
        let words = lookup("DOC_FILTER_WORDS").unwrap_or_else(|| DEFAULT_WORDS.to_string());

        Ok(Self {
            input: lookup("DOC_FILTER_INPUT").map(PathBuf::from),
            cutoff: parse_cutoff(&cutoff)?,
            words: parse_words(&words)?,
            vocabulary: Vocabulary::from_lookup(&lookup),
        })
    }
}

pub fn parse_cutoff(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| ConfigError::InvalidCutoff {
            value: value.to_string(),
            source,
        })
}

pub fn parse_words(value: &str) -> Result<Vec<String>, ConfigError> {
    let words: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect();

    if words.is_empty() {
        return Err(ConfigError::NoWords);
    }
    Ok(words)
}
