//! Byte-resource access.
//!
//! [`ResourceLoader`] is the capability the location resolver consults to
//! turn resolvable location strings into concrete resources. The shipped
//! [`StandardResourceLoader`] understands `classpath:` locations (searched
//! across a configured list of roots) and `file:`/bare locations (relative
//! to a working directory), plus the single-`*/` directory pattern.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{ConfigError, Result};

pub const CLASSPATH_PREFIX: &str = "classpath:";
pub const FILE_PREFIX: &str = "file:";

/// What a pattern lookup should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    File,
    Directory,
}

/// A located byte resource. The `path` is the resource identity used for
/// deduplication; the `description` is the stable human-readable form that
/// ends up in property source names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawResource {
    path: PathBuf,
    description: String,
    exists: bool,
    directory: bool,
}

impl RawResource {
    pub fn new(path: PathBuf, description: String, exists: bool, directory: bool) -> Self {
        Self {
            path,
            description,
            exists,
            directory,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_directory(&self) -> bool {
        self.directory
    }

    pub fn read_to_string(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// Resolves location strings to [`RawResource`]s.
pub trait ResourceLoader {
    fn get_resource(&self, location: &str) -> Result<RawResource>;

    /// Expand a pattern location. Patterns contain exactly one `*`, as a
    /// whole `*/` path segment; matches are returned sorted by name.
    fn get_resources(&self, location: &str, resource_type: ResourceType) -> Result<Vec<RawResource>>;
}

/// Filesystem-backed [`ResourceLoader`].
#[derive(Debug, Clone)]
pub struct StandardResourceLoader {
    classpath_roots: Vec<PathBuf>,
    working_dir: PathBuf,
}

impl StandardResourceLoader {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            classpath_roots: Vec::new(),
            working_dir: std::env::current_dir()?,
        })
    }

    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            classpath_roots: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    /// Add a directory searched for `classpath:` locations. Roots are
    /// consulted in the order they were added; the first root holding an
    /// existing file wins.
    #[must_use]
    pub fn with_classpath_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.classpath_roots.push(root.into());
        self
    }

    fn classpath_resource(&self, relative: &str) -> RawResource {
        let description = format!("class path resource [{relative}]");
        for root in &self.classpath_roots {
            let candidate = root.join(relative);
            if let Ok(metadata) = fs::metadata(&candidate) {
                return RawResource::new(
                    identity_path(&candidate),
                    description,
                    true,
                    metadata.is_dir(),
                );
            }
        }
        let base = self
            .classpath_roots
            .first()
            .cloned()
            .unwrap_or_else(|| self.working_dir.clone());
        RawResource::new(identity_path(&base.join(relative)), description, false, false)
    }

    fn file_resource(&self, given: &str) -> RawResource {
        let path = Path::new(given);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        };
        let description = format!("file [{}]", clean_path(Path::new(given)).display());
        match fs::metadata(&path) {
            Ok(metadata) => {
                RawResource::new(identity_path(&path), description, true, metadata.is_dir())
            }
            Err(_) => RawResource::new(identity_path(&path), description, false, false),
        }
    }
}

impl ResourceLoader for StandardResourceLoader {
    fn get_resource(&self, location: &str) -> Result<RawResource> {
        if let Some(rest) = location.strip_prefix(CLASSPATH_PREFIX) {
            return Ok(self.classpath_resource(rest.trim_start_matches('/')));
        }
        if let Some(rest) = location.strip_prefix(FILE_PREFIX) {
            return Ok(self.file_resource(rest));
        }
        if let Some(colon) = location.find(':') {
            if !location[..colon].contains('/') {
                return Err(ConfigError::InvalidLocation {
                    value: location.to_string(),
                    reason: format!("unknown prefix '{}'", &location[..=colon]),
                });
            }
        }
        Ok(self.file_resource(location))
    }

    fn get_resources(&self, location: &str, resource_type: ResourceType) -> Result<Vec<RawResource>> {
        let star = match location.find('*') {
            Some(star) => star,
            None => {
                let resource = self.get_resource(location)?;
                return Ok(if resource.exists() { vec![resource] } else { Vec::new() });
            }
        };
        if location.matches('*').count() != 1 {
            return Err(ConfigError::InvalidLocation {
                value: location.to_string(),
                reason: "search patterns cannot contain multiple wildcards".to_string(),
            });
        }
        if !location[star..].starts_with("*/") || star == 0 || &location[star - 1..star] != "/" {
            return Err(ConfigError::InvalidLocation {
                value: location.to_string(),
                reason: "the wildcard must be a whole '*/' path segment".to_string(),
            });
        }

        let base = self.get_resource(&location[..star])?;
        if !base.exists() || !base.is_directory() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        let listing = fs::read_dir(base.path()).map_err(|err| ConfigError::Load {
            resource: base.description().to_string(),
            source: Box::new(err),
        })?;
        for entry in listing {
            let entry = entry.map_err(|err| ConfigError::Load {
                resource: base.description().to_string(),
                source: Box::new(err),
            })?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        let mut resources = Vec::new();
        for name in names {
            let candidate = self.get_resource(&location.replacen('*', &name, 1))?;
            let matched = match resource_type {
                ResourceType::File => candidate.exists() && !candidate.is_directory(),
                ResourceType::Directory => candidate.exists() && candidate.is_directory(),
            };
            if matched {
                resources.push(candidate);
            }
        }
        Ok(resources)
    }
}

/// Canonical identity for deduplication: symlink-resolved when the resource
/// exists, lexically cleaned otherwise.
fn identity_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| clean_path(path))
}

fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
