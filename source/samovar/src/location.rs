//! User-facing addresses of configuration sources.
//!
//! A location string is what the operator writes in `spring.config.location`
//! or what a loaded document writes in `spring.config.import`. The grammar:
//!
//! ```text
//! loc     := ["optional:"] [prefix ":"] body
//! prefix  := ALPHA (ALPHA | DIGIT | "*")*
//! hint    := body "[." ext "]"
//! glob    := body containing "*"
//! dir     := body ending "/"
//! group   := loc (";" loc)*
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ConfigError, Result};

/// Prefix marking a location whose absence is not an error.
pub const OPTIONAL_PREFIX: &str = "optional:";

fn url_prefix() -> &'static Regex {
    static URL_PREFIX: OnceLock<Regex> = OnceLock::new();
    URL_PREFIX.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9*]*:").expect("valid regex"))
}

/// A single parsed config data location.
///
/// Equality and hashing ignore the `optional:` marker: two spellings of the
/// same address are the same location.
#[derive(Debug, Clone, Eq)]
pub struct Location {
    value: String,
    optional: bool,
}

impl Location {
    /// Parse one location, stripping a single leading `optional:` prefix.
    pub fn of(input: &str) -> Result<Location> {
        let (optional, value) = match input.strip_prefix(OPTIONAL_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        if value.is_empty() {
            return Err(ConfigError::InvalidLocation {
                value: input.to_string(),
                reason: "location must not be empty".to_string(),
            });
        }
        if value.starts_with(OPTIONAL_PREFIX) {
            return Err(ConfigError::InvalidLocation {
                value: input.to_string(),
                reason: "the 'optional:' prefix may only be given once".to_string(),
            });
        }
        Ok(Location {
            value: value.to_string(),
            optional,
        })
    }

    /// Parse a `;`-separated location group. Blank members are ignored.
    pub fn parse_group(input: &str) -> Result<Vec<Location>> {
        input
            .split(';')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(Location::of)
            .collect()
    }

    /// The address without the `optional:` marker.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.value.starts_with(prefix)
    }

    pub fn non_prefixed_value<'a>(&'a self, prefix: &str) -> &'a str {
        self.value.strip_prefix(prefix).unwrap_or(&self.value)
    }

    /// Absolute locations start with `/` or carry a URL-style prefix.
    pub fn is_absolute(&self) -> bool {
        self.value.starts_with('/') || url_prefix().is_match(&self.value)
    }

    /// Directory locations end with a path separator.
    pub fn is_directory(&self) -> bool {
        self.value.ends_with('/') || self.value.ends_with(std::path::MAIN_SEPARATOR)
    }

    pub fn is_pattern(&self) -> bool {
        self.value.contains('*')
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{OPTIONAL_PREFIX}{}", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}
