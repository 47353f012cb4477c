//! Configuration types for the metadata pipeline.
//!
//! This module provides configuration structures that control how failed
//! validation and incomplete input are handled. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining validation and normalize settings.
//! - [`ValidationConfig`] - Controls whether integrity errors are fatal.
//! - [`NormalizeConfig`] - Controls how nodes missing mandatory data are handled.
//!
//! # Example
//!
//! ```
//! # use plansheet::config::{AppConfig, MissingTransformPolicy, ValidationPolicy};
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.validation().policy(), ValidationPolicy::Strict);
//! assert_eq!(config.normalize().missing_region_transform(), MissingTransformPolicy::Skip);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
///
/// Groups [`ValidationConfig`] and [`NormalizeConfig`] into a single
/// configuration root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Validation configuration section.
    #[serde(default)]
    validation: ValidationConfig,

    /// Normalization configuration section.
    #[serde(default)]
    normalize: NormalizeConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    ///
    /// # Arguments
    ///
    /// * `validation` - How failed validation is treated.
    /// * `normalize` - How incomplete input is treated during normalization.
    pub fn new(validation: ValidationConfig, normalize: NormalizeConfig) -> Self {
        Self {
            validation,
            normalize,
        }
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Returns the normalization configuration.
    pub fn normalize(&self) -> &NormalizeConfig {
        &self.normalize
    }
}

/// What to do when a document fails its invariant checks.
///
/// Shape errors are always fatal; without a typed document there is nothing
/// to continue with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Integrity errors abort the pipeline.
    #[default]
    Strict,
    /// Integrity errors are logged and the coerced document is normalized anyway.
    Lenient,
}

/// Validation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    policy: ValidationPolicy,
}

impl ValidationConfig {
    /// Creates a new [`ValidationConfig`].
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Returns the [`ValidationPolicy`].
    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }
}

/// What the normalizer does with a region revision lacking its `imageTransform`.
///
/// Validated input never contains one; this only matters when validation was
/// bypassed or run in lenient mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTransformPolicy {
    /// Leave the revision out of the model.
    #[default]
    Skip,
    /// Fail normalization.
    Reject,
}

/// Normalization settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    missing_region_transform: MissingTransformPolicy,
}

impl NormalizeConfig {
    /// Creates a new [`NormalizeConfig`].
    pub fn new(missing_region_transform: MissingTransformPolicy) -> Self {
        Self {
            missing_region_transform,
        }
    }

    /// Returns the [`MissingTransformPolicy`] for region revisions.
    pub fn missing_region_transform(&self) -> MissingTransformPolicy {
        self.missing_region_transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.validation().policy(), ValidationPolicy::Strict);
        assert_eq!(
            config.normalize().missing_region_transform(),
            MissingTransformPolicy::Skip
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [validation]
            policy = "lenient"

            [normalize]
            missing_region_transform = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.validation().policy(), ValidationPolicy::Lenient);
        assert_eq!(
            config.normalize().missing_region_transform(),
            MissingTransformPolicy::Reject
        );
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[validation]\npolicy = \"loose\"");
        assert!(result.is_err());
    }
}
