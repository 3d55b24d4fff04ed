//! Decoding resources into property sets.
//!
//! [`PropertySetLoader`] is the parsing capability: one implementation per
//! file format, selected by extension suffix when references are built. The
//! [`ConfigDataLoader`] sits on top and turns a resolved [`Resource`] into
//! [`ConfigData`], attaching per-set options.

use std::fmt;

use crate::environment::PropertySet;
use crate::error::{ConfigError, Result};
use crate::resource::Resource;

/// Per-property-set option flags.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Options(u8);

impl Options {
    pub const NONE: Options = Options(0);
    /// The set came from a profile-specific resource or document.
    pub const PROFILE_SPECIFIC: Options = Options(1);
    /// `spring.config.import` declarations in the set are not followed.
    pub const IGNORE_IMPORTS: Options = Options(1 << 1);
    /// The set takes no part in profile deduction.
    pub const IGNORE_PROFILES: Options = Options(1 << 2);

    pub fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn with(self, other: Options) -> Options {
        Options(self.0 | other.0)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(Options::PROFILE_SPECIFIC) {
            flags.push("PROFILE_SPECIFIC");
        }
        if self.contains(Options::IGNORE_IMPORTS) {
            flags.push("IGNORE_IMPORTS");
        }
        if self.contains(Options::IGNORE_PROFILES) {
            flags.push("IGNORE_PROFILES");
        }
        write!(f, "Options({})", flags.join(" | "))
    }
}

/// A format parser. Implementations decode the full text of one resource
/// into an ordered list of named property sets (several for multi-document
/// formats).
pub trait PropertySetLoader: Send + Sync {
    /// File extensions (without the dot) this loader recognises.
    fn extensions(&self) -> &[&str];

    /// Decode `content` into property sets. `name` is the base name to give
    /// the sets; multi-document loaders append a ` (document #N)` suffix.
    fn load(&self, name: &str, content: &str) -> Result<Vec<PropertySet>>;
}

/// A loader's output: property sets plus one option bitmask per set.
#[derive(Debug, Clone, Default)]
pub struct ConfigData {
    sets: Vec<(PropertySet, Options)>,
}

impl ConfigData {
    /// The constant result for empty-directory markers.
    pub fn empty() -> ConfigData {
        ConfigData::default()
    }

    /// Wrap `sets`, attaching `options` to every one of them.
    pub fn new(sets: Vec<PropertySet>, options: Options) -> ConfigData {
        ConfigData {
            sets: sets.into_iter().map(|set| (set, options)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertySet, Options)> {
        self.sets.iter().map(|(set, options)| (set, *options))
    }
}

/// Turns a resolved [`Resource`] into [`ConfigData`] by delegating to the
/// [`PropertySetLoader`] recorded on its reference.
#[derive(Debug, Default)]
pub struct ConfigDataLoader;

impl ConfigDataLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, resource: &Resource) -> Result<ConfigData> {
        if resource.is_empty_directory() {
            return Ok(ConfigData::empty());
        }
        if !resource.exists() {
            return Err(ConfigError::ResourceNotFound {
                resource: resource.to_string(),
                location: resource.location().clone(),
            });
        }
        let name = format!(
            "Config resource '{}' via location '{}'",
            resource,
            resource.location()
        );
        let content = resource.read_to_string().map_err(|err| ConfigError::Load {
            resource: resource.to_string(),
            source: Box::new(err),
        })?;
        let sets = resource.reference().loader().load(&name, &content)?;
        let options = if resource.profile().is_some() {
            Options::PROFILE_SPECIFIC
        } else {
            Options::NONE
        };
        Ok(ConfigData::new(sets, options))
    }
}
