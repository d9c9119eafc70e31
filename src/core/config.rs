//! Configuration for the metric adapter.
//!
//! The harness that owns the accumulator deserializes this from its own
//! config file; this module only defines the shape, defaults, and
//! validation.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one accumulator instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Timestamp truncation unit applied to produced datapoints.
    /// One nanosecond means no truncation beyond the input's resolution.
    #[serde(with = "humantime_serde")]
    pub precision: Duration,
    /// Instrumentation scope name stamped on produced scope containers
    pub scope_name: String,
    /// Instrumentation scope version stamped on produced scope containers
    pub scope_version: String,
    /// Container-assignment policy
    pub grouping: GroupingMode,
}

/// Built-in container-assignment policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// Every accepted call opens its own resource container
    PerCall,
    /// Calls sharing a measurement name land in one resource container
    BySource,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            precision: Duration::from_nanos(1),
            scope_name: env!("CARGO_PKG_NAME").to_owned(),
            scope_version: env!("CARGO_PKG_VERSION").to_owned(),
            grouping: GroupingMode::PerCall,
        }
    }
}

impl AdapterConfig {
    /// Creates a builder for fluent construction
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::default()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.precision.is_zero() {
            return Err(Error::config("precision must be non-zero"));
        }
        if self.scope_name.is_empty() {
            return Err(Error::config("scope_name cannot be empty"));
        }
        Ok(())
    }
}

/// Builder for [`AdapterConfig`]
#[derive(Debug, Default)]
pub struct AdapterConfigBuilder {
    precision: Option<Duration>,
    scope_name: Option<String>,
    scope_version: Option<String>,
    grouping: Option<GroupingMode>,
}

impl AdapterConfigBuilder {
    /// Sets the timestamp truncation unit
    pub fn precision(mut self, precision: Duration) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the instrumentation scope name
    pub fn scope_name<S: Into<String>>(mut self, name: S) -> Self {
        self.scope_name = Some(name.into());
        self
    }

    /// Sets the instrumentation scope version
    pub fn scope_version<S: Into<String>>(mut self, version: S) -> Self {
        self.scope_version = Some(version.into());
        self
    }

    /// Sets the container-assignment policy
    pub fn grouping(mut self, grouping: GroupingMode) -> Self {
        self.grouping = Some(grouping);
        self
    }

    /// Builds and validates the configuration
    pub fn build(self) -> Result<AdapterConfig> {
        let defaults = AdapterConfig::default();
        let config = AdapterConfig {
            precision: self.precision.unwrap_or(defaults.precision),
            scope_name: self.scope_name.unwrap_or(defaults.scope_name),
            scope_version: self.scope_version.unwrap_or(defaults.scope_version),
            grouping: self.grouping.unwrap_or(defaults.grouping),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AdapterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.precision, Duration::from_nanos(1));
        assert_eq!(config.grouping, GroupingMode::PerCall);
    }

    #[test]
    fn test_builder_overrides() {
        let config = AdapterConfig::builder()
            .precision(Duration::from_micros(1))
            .scope_name("agent")
            .grouping(GroupingMode::BySource)
            .build()
            .unwrap();
        assert_eq!(config.precision, Duration::from_micros(1));
        assert_eq!(config.scope_name, "agent");
        assert_eq!(config.grouping, GroupingMode::BySource);
    }

    #[test]
    fn test_zero_precision_rejected() {
        let result = AdapterConfig::builder().precision(Duration::ZERO).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_scope_name_rejected() {
        let result = AdapterConfig::builder().scope_name("").build();
        assert!(result.is_err());
    }
}
