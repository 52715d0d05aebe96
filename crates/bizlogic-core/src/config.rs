//! Executor configuration.
//!
//! Values are built in memory or deserialized from data the host already
//! holds. Missing fields default to an empty redaction list; `default_type`
//! has no sensible default and must be set.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Replacement text for redacted spans in failure causes.
pub const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("default_type must be a non-empty type name")]
    EmptyDefaultType,

    #[error("invalid redaction pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("redaction pattern '{0}' matches the empty string")]
    EmptyMatchPattern(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Declaring type used when a rule reference carries no type segment.
    pub default_type: String,

    /// Regular expressions whose matches are masked in failure causes.
    pub redaction_patterns: Vec<String>,
}

impl ExecutorConfig {
    pub fn new(default_type: impl Into<String>) -> Self {
        Self {
            default_type: default_type.into(),
            redaction_patterns: Vec::new(),
        }
    }

    pub fn with_redaction_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.redaction_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_type.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultType);
        }
        Redactor::compile(&self.redaction_patterns)?;
        Ok(())
    }
}

/// Masks configured patterns in diagnostic text.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    patterns: Vec<Regex>,
}

impl Redactor {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let pattern = p.as_ref();
                let re = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
                if re.is_match("") {
                    return Err(ConfigError::EmptyMatchPattern(pattern.to_string()));
                }
                Ok(re)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn redact(&self, text: &str) -> String {
        self.patterns
            .iter()
            .fold(text.to_string(), |acc, re| re.replace_all(&acc, REDACTED).into_owned())
    }
}
