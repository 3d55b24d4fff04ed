use miette::Diagnostic;
use thiserror::Error;

use crate::location::Location;

/// Errors raised while resolving, loading and applying config data.
///
/// Resolution "not found" errors are the only locally-recoverable kind (the
/// importer swallows them for optional locations, or when
/// `spring.config.on-not-found=ignore` is set). Every other variant aborts
/// the whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A mandatory location produced no config data at all.
    #[error("Config data location '{location}' does not exist")]
    #[diagnostic(
        code(samovar::location_not_found),
        help("prefix the location with 'optional:' if it may legitimately be absent")
    )]
    LocationNotFound { location: Location },

    /// A concrete resource referenced by an already-resolved location is
    /// missing (for example a file that a pattern listed before it vanished).
    #[error("Config data resource '{resource}' via location '{location}' does not exist")]
    #[diagnostic(code(samovar::resource_not_found))]
    ResourceNotFound { resource: String, location: Location },

    /// I/O or parse failure while reading a resource. Always fatal.
    #[error("Failed to load config data from '{resource}'")]
    #[diagnostic(code(samovar::load))]
    Load {
        resource: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A location string that does not follow the location grammar.
    #[error("Invalid config data location '{value}': {reason}")]
    #[diagnostic(code(samovar::invalid_location))]
    InvalidLocation { value: String, reason: String },

    /// A property that is not allowed where it was found, or whose value
    /// cannot be interpreted.
    #[error("Property '{key}' in '{origin}' is invalid: {reason}")]
    #[diagnostic(code(samovar::invalid_property))]
    InvalidProperty {
        key: String,
        origin: String,
        reason: String,
    },

    /// Binding touched a property that lives in a property source whose
    /// activation predicate does not match the current context.
    #[error("Inactive property source '{source_name}' cannot be used to resolve '{key}'")]
    #[diagnostic(
        code(samovar::inactive_access),
        help("the document defining '{key}' is gated by an activation predicate that does not match the current cloud platform or profiles")
    )]
    InactiveAccess { key: String, source_name: String },

    /// The environment asked for the legacy processing pipeline.
    #[error("Legacy config processing has been requested via 'spring.config.use-legacy-processing'")]
    #[diagnostic(code(samovar::use_legacy_processing))]
    UseLegacyProcessing,
}

impl ConfigError {
    /// True for the "config data not found" family of errors, which the
    /// importer may recover from locally.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::LocationNotFound { .. } | ConfigError::ResourceNotFound { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, ConfigError>;
