//! Candidate files derived from locations.
//!
//! A [`Reference`] names one concrete file a [`Location`](crate::location::Location)
//! may resolve to: directory expansion produces one reference per
//! config-name × loader-extension × profile combination, a file location
//! produces exactly one.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::loader::PropertySetLoader;
use crate::location::Location;

#[derive(Clone)]
pub struct Reference {
    location: Location,
    directory: Option<String>,
    root: String,
    profile: Option<String>,
    extension: Option<String>,
    loader: Arc<dyn PropertySetLoader>,
}

impl Reference {
    /// A reference synthesised by directory expansion: `root` is the
    /// directory plus the config name, without profile or extension.
    pub(crate) fn for_directory(
        location: Location,
        directory: &str,
        root: String,
        profile: Option<&str>,
        extension: &str,
        loader: Arc<dyn PropertySetLoader>,
    ) -> Self {
        Self {
            location,
            directory: Some(directory.to_string()),
            root,
            profile: profile.map(str::to_string),
            extension: Some(extension.to_string()),
            loader,
        }
    }

    /// A reference to an explicitly named file. `extension` is `None` for
    /// extension-hinted locations, whose on-disk name has no extension.
    pub(crate) fn for_file(
        location: Location,
        root: String,
        profile: Option<&str>,
        extension: Option<&str>,
        loader: Arc<dyn PropertySetLoader>,
    ) -> Self {
        Self {
            location,
            directory: None,
            root,
            profile: profile.map(str::to_string),
            extension: extension.map(str::to_string),
            loader,
        }
    }

    /// The concrete location string handed to the resource loader.
    pub fn resolvable_location(&self) -> String {
        let mut out = self.root.clone();
        if let Some(profile) = &self.profile {
            out.push('-');
            out.push_str(profile);
        }
        if let Some(extension) = &self.extension {
            out.push('.');
            out.push_str(extension);
        }
        out
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn directory(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn loader(&self) -> &Arc<dyn PropertySetLoader> {
        &self.loader
    }

    /// A missing resource behind a skippable reference is silently dropped:
    /// optional locations, profile variants, and directory-expansion
    /// candidates all are.
    pub fn skippable(&self) -> bool {
        self.location.is_optional() || self.profile.is_some() || self.directory.is_some()
    }

    pub fn is_pattern(&self) -> bool {
        self.root.contains('*')
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.directory == other.directory
            && self.root == other.root
            && self.profile == other.profile
            && self.extension == other.extension
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.directory.hash(state);
        self.root.hash(state);
        self.profile.hash(state);
        self.extension.hash(state);
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("location", &self.location)
            .field("resolvable", &self.resolvable_location())
            .finish()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolvable_location())
    }
}
