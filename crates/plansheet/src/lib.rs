//! Plansheet - construction drawing metadata as a flat layer graph.
//!
//! Validation, normalization and caching of drawing metadata. A document
//! describing drawings, their disciplines, regions and revisions is checked
//! and flattened into [`NormalizedMeta`], where every node is addressable by
//! a stable [`LayerKey`](plansheet_core::key::LayerKey).

pub mod config;
pub mod normalize;
pub mod render;
pub mod source;

mod error;
mod meta;

pub use plansheet_core::{geometry, key, layer};
pub use plansheet_schema::{Document, Validated, format_issues};

pub use error::PlansheetError;
pub use meta::{NavigationEntry, NormalizedMeta};

use log::{debug, info, warn};
use serde_json::Value;

use plansheet_schema::error::{Diagnostic, ValidationError};

use config::{AppConfig, ValidationPolicy};

/// Builder for validating and normalizing metadata documents.
///
/// This provides an API for processing a metadata document through the
/// validation and normalization stages, applying the configured policies.
///
/// # Examples
///
/// ```rust
/// use plansheet::{MetadataBuilder, config::AppConfig};
///
/// let source = r#"{
///     "project": { "name": "Tower", "unit": "mm" },
///     "disciplines": [{ "name": "구조" }],
///     "drawings": {
///         "101": { "id": "101", "name": "Ground", "image": "101.png",
///                  "parent": null, "position": null }
///     }
/// }"#;
///
/// // With custom config
/// let builder = MetadataBuilder::new(AppConfig::default());
///
/// let meta = builder.build_from_str(source)
///     .expect("Failed to build");
/// assert!(meta.layer("drawing:101").is_some());
///
/// // Or use default config
/// let builder = MetadataBuilder::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    config: AppConfig,
}

impl MetadataBuilder {
    /// Create a new metadata builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including validation and normalize policies
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validate a raw document.
    ///
    /// Warnings are logged and returned with the document.
    ///
    /// # Errors
    ///
    /// Returns `PlansheetError::Validation` with every diagnostic if the
    /// document does not match the schema or breaks an invariant.
    pub fn validate(&self, value: &Value) -> Result<Validated, PlansheetError> {
        let validated = plansheet_schema::validate(value)?;
        log_warnings(&validated.warnings);
        Ok(validated)
    }

    /// Normalize a validated document into the layer graph.
    ///
    /// # Errors
    ///
    /// Returns `PlansheetError::Normalize` if the configured policy rejects
    /// incomplete region revisions and one is found.
    pub fn normalize(&self, document: &Document) -> Result<NormalizedMeta, PlansheetError> {
        let policy = self.config.normalize().missing_region_transform();
        let meta = normalize::normalize_with(document, policy)?;
        info!(layers = meta.layers_by_key().len(); "Metadata normalized");
        Ok(meta)
    }

    /// Validate and normalize a raw document.
    ///
    /// Under [`ValidationPolicy::Lenient`], a document that matched the schema
    /// but failed invariant checks is normalized anyway and its errors are
    /// logged. Invalid identifiers and duplicate revision versions stay
    /// fatal, since they would break layer keys.
    ///
    /// # Errors
    ///
    /// Returns `PlansheetError` for validation or normalization failures.
    pub fn build(&self, value: &Value) -> Result<NormalizedMeta, PlansheetError> {
        let document = match self.validate(value) {
            Ok(validated) => validated.document,
            Err(PlansheetError::Validation(err)) => self.recover(err)?,
            Err(err) => return Err(err),
        };
        self.normalize(&document)
    }

    /// Parse JSON text, then [`build`](Self::build) it.
    ///
    /// # Errors
    ///
    /// Returns `PlansheetError::Json` if `source` is not JSON, otherwise as
    /// [`build`](Self::build).
    pub fn build_from_str(&self, source: &str) -> Result<NormalizedMeta, PlansheetError> {
        let value: Value = serde_json::from_str(source)?;
        self.build(&value)
    }

    /// Continue with the coerced document of a failed validation if allowed.
    fn recover(&self, err: ValidationError) -> Result<Document, PlansheetError> {
        if self.config.validation().policy() != ValidationPolicy::Lenient {
            return Err(err.into());
        }

        if !err.is_recoverable() {
            debug!("Shape errors and key-unsafe identifiers cannot be recovered");
            return Err(err.into());
        }

        let (diagnostics, document) = err.into_parts();
        let Some(document) = document else {
            return Err(ValidationError::new(diagnostics).into());
        };

        for diagnostic in &diagnostics {
            warn!(
                code:? = diagnostic.code(),
                path = diagnostic.path().to_string();
                "Ignoring validation {}: {}", diagnostic.severity(), diagnostic.message()
            );
        }
        info!(issues = diagnostics.len(); "Continuing with lenient validation");
        Ok(document)
    }
}

fn log_warnings(warnings: &[Diagnostic]) {
    for warning in warnings {
        warn!(
            code:? = warning.code(),
            path = warning.path().to_string();
            "{}", warning.message()
        );
    }
}
