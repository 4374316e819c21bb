//! Configuration for the group type manager.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::error::{GroupTypeError, GroupTypeResult};

/// Configuration for group type caching and diagnostics.
///
/// # Example
///
/// ```rust,ignore
/// let config = GroupTypeManagerConfig::builder()
///     .cache_max_age_ms(30_000)
///     .cache_max_projects(10_000)
///     .slow_operation_warning_ms(10_000)
///     .build();
/// config.validate()?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
pub struct GroupTypeManagerConfig {
    /// Maximum age of a cached project mapping, in milliseconds.
    ///
    /// Older entries are ignored and refetched from the store.
    ///
    /// Default: 30 seconds
    #[serde(default = "GroupTypeManagerConfig::default_cache_max_age_ms")]
    pub cache_max_age_ms: u64,

    /// Maximum number of projects whose mapping is kept in memory.
    ///
    /// Least recently used projects are evicted past this bound.
    ///
    /// Default: 10 000
    #[serde(default = "GroupTypeManagerConfig::default_cache_max_projects")]
    pub cache_max_projects: usize,

    /// Store calls running longer than this many milliseconds log a warning.
    ///
    /// The call itself is never cancelled.
    ///
    /// Default: 10 seconds
    #[serde(default = "GroupTypeManagerConfig::default_slow_operation_warning_ms")]
    pub slow_operation_warning_ms: u64,
}

impl GroupTypeManagerConfig {
    pub const DEFAULT_CACHE_MAX_AGE_MS: u64 = 30_000;
    pub const DEFAULT_CACHE_MAX_PROJECTS: usize = 10_000;
    pub const DEFAULT_SLOW_OPERATION_WARNING_MS: u64 = 10_000;

    pub fn default_cache_max_age_ms() -> u64 {
        Self::DEFAULT_CACHE_MAX_AGE_MS
    }

    pub fn default_cache_max_projects() -> usize {
        Self::DEFAULT_CACHE_MAX_PROJECTS
    }

    pub fn default_slow_operation_warning_ms() -> u64 {
        Self::DEFAULT_SLOW_OPERATION_WARNING_MS
    }

    /// Parse a configuration from JSON, filling absent fields with defaults.
    pub fn from_json(json: &str) -> GroupTypeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every bound is usable.
    pub fn validate(&self) -> GroupTypeResult<()> {
        if self.cache_max_age_ms == 0 {
            return Err(GroupTypeError::invalid_config(
                "cache_max_age_ms must be greater than zero",
            ));
        }
        if self.cache_max_projects == 0 {
            return Err(GroupTypeError::invalid_config(
                "cache_max_projects must be greater than zero",
            ));
        }
        if self.slow_operation_warning_ms == 0 {
            return Err(GroupTypeError::invalid_config(
                "slow_operation_warning_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_millis(self.cache_max_age_ms)
    }

    pub fn slow_operation_warning(&self) -> Duration {
        Duration::from_millis(self.slow_operation_warning_ms)
    }
}

impl Default for GroupTypeManagerConfig {
    fn default() -> Self {
        Self {
            cache_max_age_ms: Self::DEFAULT_CACHE_MAX_AGE_MS,
            cache_max_projects: Self::DEFAULT_CACHE_MAX_PROJECTS,
            slow_operation_warning_ms: Self::DEFAULT_SLOW_OPERATION_WARNING_MS,
        }
    }
}
