//! Resolved configuration resources.
//!
//! A [`Resource`] pairs the [`Reference`] that found it with the raw byte
//! resource behind it. Identity (equality, hashing) is the underlying byte
//! resource, not the reference: one file reached through two references
//! must load only once.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::Path;

use crate::location::Location;
use crate::reference::Reference;
use crate::source::RawResource;

#[derive(Debug, Clone)]
pub struct Resource {
    reference: Reference,
    raw: RawResource,
    empty_directory: bool,
}

impl Resource {
    pub(crate) fn file(reference: Reference, raw: RawResource) -> Self {
        Self {
            reference,
            raw,
            empty_directory: false,
        }
    }

    /// Marker for a directory that was legitimately visited but produced no
    /// config files.
    pub(crate) fn empty_directory(reference: Reference, raw: RawResource) -> Self {
        Self {
            reference,
            raw,
            empty_directory: true,
        }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn location(&self) -> &Location {
        self.reference.location()
    }

    pub fn profile(&self) -> Option<&str> {
        self.reference.profile()
    }

    pub fn is_profile_specific(&self) -> bool {
        self.reference.profile().is_some()
    }

    pub fn is_optional(&self) -> bool {
        self.reference.location().is_optional()
    }

    pub fn is_empty_directory(&self) -> bool {
        self.empty_directory
    }

    pub fn exists(&self) -> bool {
        self.raw.exists()
    }

    pub fn path(&self) -> &Path {
        self.raw.path()
    }

    pub fn read_to_string(&self) -> io::Result<String> {
        self.raw.read_to_string()
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.raw.path() == other.raw.path() && self.empty_directory == other.empty_directory
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.path().hash(state);
        self.empty_directory.hash(state);
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty_directory {
            write!(f, "empty directory {}", self.raw.description())
        } else {
            f.write_str(self.raw.description())
        }
    }
}
