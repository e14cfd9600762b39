//! Mediator configuration
//!
//! The configuration is fixed for the lifetime of a mediator: mixing
//! delimiters across subscriptions would silently break matching.

use serde::{Deserialize, Serialize};

use crate::error::{MediatorError, Result};

/// Delimiter used when none is configured
pub const DEFAULT_NAMESPACE_DELIMITER: &str = "::";

/// Environment variable read by [`MediatorConfig::from_env`]
pub const NAMESPACE_DELIMITER_ENV: &str = "ENVOI_NAMESPACE_DELIMITER";

/// Configuration for a [`Mediator`](crate::Mediator)
///
/// Missing fields fall back to their defaults, so a partial document
/// overlays the default configuration:
///
/// ```rust
/// use mediator::MediatorConfig;
///
/// let config = MediatorConfig::from_json(r#"{ "namespaceDelimiter": "/" }"#).unwrap();
/// assert_eq!(config.namespace_delimiter, "/");
///
/// let config = MediatorConfig::from_json("{}").unwrap();
/// assert_eq!(config, MediatorConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediatorConfig {
    /// Separator between namespace segments
    /// Default: "::"
    #[serde(alias = "namespaceDelimiter")]
    pub namespace_delimiter: String,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            namespace_delimiter: DEFAULT_NAMESPACE_DELIMITER.to_string(),
        }
    }
}

impl MediatorConfig {
    /// Create a MediatorConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the namespace delimiter
    pub fn with_namespace_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.namespace_delimiter = delimiter.into();
        self
    }

    /// Parse a JSON document, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MediatorError::InvalidArgument(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from `ENVOI_NAMESPACE_DELIMITER`
    ///
    /// Unset or empty variables keep the default delimiter.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(NAMESPACE_DELIMITER_ENV) {
            Some(delimiter) if !delimiter.is_empty() => {
                Self::default().with_namespace_delimiter(delimiter)
            }
            _ => Self::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.namespace_delimiter.is_empty() {
            return Err(MediatorError::InvalidArgument(
                "Namespace delimiter must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
