//! Turning locations into concrete resources.
//!
//! A directory location expands into references per config-name ×
//! loader-extension × profile; a file location picks the single loader whose
//! extension matches. References are then resolved through the
//! [`ResourceLoader`], with skippable (optional, profile-variant or
//! directory-expansion) candidates silently dropped when missing, and
//! empty-directory markers synthesised when a directory yields nothing.

use std::collections::VecDeque;
use std::sync::OnceLock;
use std::sync::Arc;

use indexmap::IndexSet;
use regex::Regex;

use crate::binder::Binder;
use crate::error::{ConfigError, Result};
use crate::loader::PropertySetLoader;
use crate::location::Location;
use crate::profiles::Profiles;
use crate::reference::Reference;
use crate::resource::Resource;
use crate::source::{ResourceLoader, ResourceType};

pub const CONFIG_NAME_PROPERTY: &str = "spring.config.name";

fn extension_hint() -> &'static Regex {
    static EXTENSION_HINT: OnceLock<Regex> = OnceLock::new();
    EXTENSION_HINT.get_or_init(|| Regex::new(r"^(.+)\[\.(\w+)\]$").expect("valid regex"))
}

/// Everything the resolver needs from the importing contributor.
pub struct ResolverContext<'a> {
    parent: Option<&'a Resource>,
    resource_loader: &'a dyn ResourceLoader,
    binder: &'a Binder<'a>,
}

impl<'a> ResolverContext<'a> {
    pub fn new(
        parent: Option<&'a Resource>,
        resource_loader: &'a dyn ResourceLoader,
        binder: &'a Binder<'a>,
    ) -> Self {
        Self {
            parent,
            resource_loader,
            binder,
        }
    }

    /// The resource the importing contributor was itself loaded from, used
    /// to anchor relative locations.
    pub fn parent(&self) -> Option<&Resource> {
        self.parent
    }

    pub fn resource_loader(&self) -> &dyn ResourceLoader {
        self.resource_loader
    }

    /// A binder over the whole contributor tree.
    pub fn binder(&self) -> &Binder<'a> {
        self.binder
    }
}

pub struct LocationResolver {
    config_names: Vec<String>,
    loaders: Vec<Arc<dyn PropertySetLoader>>,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("config_names", &self.config_names)
            .finish()
    }
}

impl LocationResolver {
    /// Build a resolver, binding `spring.config.name` (default
    /// `application`). Config names must not contain wildcards.
    pub fn new(binder: &Binder<'_>, loaders: Vec<Arc<dyn PropertySetLoader>>) -> Result<Self> {
        let mut config_names = binder.get_list(CONFIG_NAME_PROPERTY)?;
        if config_names.is_empty() {
            config_names.push("application".to_string());
        }
        for name in &config_names {
            if name.contains('*') {
                return Err(ConfigError::InvalidProperty {
                    key: CONFIG_NAME_PROPERTY.to_string(),
                    origin: binder.origin_of(CONFIG_NAME_PROPERTY),
                    reason: format!("config name '{name}' cannot contain '*'"),
                });
            }
        }
        Ok(Self {
            config_names,
            loaders,
        })
    }

    pub fn resolve(&self, ctx: &ResolverContext<'_>, location: &Location) -> Result<Vec<Resource>> {
        let references = self.references(ctx, location, None)?;
        self.resolve_references(ctx, &references)
    }

    pub fn resolve_profile_specific(
        &self,
        ctx: &ResolverContext<'_>,
        location: &Location,
        profiles: &Profiles,
    ) -> Result<Vec<Resource>> {
        let mut references = IndexSet::new();
        for profile in profiles.accepted() {
            references.extend(self.references(ctx, location, Some(profile.as_str()))?);
        }
        self.resolve_references(ctx, &references)
    }

    fn references(
        &self,
        ctx: &ResolverContext<'_>,
        location: &Location,
        profile: Option<&str>,
    ) -> Result<IndexSet<Reference>> {
        let resource_location = self.resource_location(ctx, location);
        if resource_location.ends_with('/') || resource_location.ends_with(std::path::MAIN_SEPARATOR)
        {
            Ok(self.directory_references(location, &resource_location, profile))
        } else {
            self.file_reference(location, &resource_location, profile)
        }
    }

    /// Relative locations are anchored at the directory of the importing
    /// contributor's own resource.
    fn resource_location(&self, ctx: &ResolverContext<'_>, location: &Location) -> String {
        let value = location.value();
        if location.is_absolute() {
            return value.to_string();
        }
        if let Some(parent) = ctx.parent() {
            let parent_location = parent.reference().resolvable_location();
            if let Some(slash) = parent_location.rfind('/') {
                return format!("{}{}", &parent_location[..=slash], value);
            }
        }
        value.to_string()
    }

    /// One reference per config-name × loader-extension. Each per-name group
    /// is assembled front-first, so the first loader's reference resolves
    /// last and takes the highest precedence.
    fn directory_references(
        &self,
        location: &Location,
        directory: &str,
        profile: Option<&str>,
    ) -> IndexSet<Reference> {
        let mut references = IndexSet::new();
        for name in &self.config_names {
            let mut group: VecDeque<Reference> = VecDeque::new();
            for loader in &self.loaders {
                for extension in loader.extensions() {
                    let reference = Reference::for_directory(
                        location.clone(),
                        directory,
                        format!("{directory}{name}"),
                        profile,
                        extension,
                        loader.clone(),
                    );
                    if !group.contains(&reference) {
                        group.push_front(reference);
                    }
                }
            }
            references.extend(group);
        }
        references
    }

    /// The single reference for an explicit file, chosen by extension
    /// suffix. An extension hint (`name[.ext]`) forces the loader and names
    /// an extensionless file on disk.
    fn file_reference(
        &self,
        location: &Location,
        file: &str,
        profile: Option<&str>,
    ) -> Result<IndexSet<Reference>> {
        let (file, hinted) = match extension_hint().captures(file) {
            Some(captures) => (
                format!("{}.{}", &captures[1], &captures[2]),
                true,
            ),
            None => (file.to_string(), false),
        };
        for loader in &self.loaders {
            if let Some(extension) = loadable_extension(loader.as_ref(), &file) {
                let root = file[..file.len() - extension.len() - 1].to_string();
                let reference = Reference::for_file(
                    location.clone(),
                    root,
                    profile,
                    if hinted { None } else { Some(extension.as_str()) },
                    loader.clone(),
                );
                return Ok(IndexSet::from_iter([reference]));
            }
        }
        if location.is_optional() {
            return Ok(IndexSet::new());
        }
        Err(ConfigError::InvalidLocation {
            value: location.to_string(),
            reason: "file extension is not known to any property set loader".to_string(),
        })
    }

    fn resolve_references(
        &self,
        ctx: &ResolverContext<'_>,
        references: &IndexSet<Reference>,
    ) -> Result<Vec<Resource>> {
        let mut resolved = Vec::new();
        for reference in references {
            resolved.extend(self.resolve_reference(ctx, reference)?);
        }
        if resolved.is_empty() {
            resolved.extend(self.resolve_empty_directories(ctx, references)?);
        }
        Ok(resolved)
    }

    fn resolve_reference(
        &self,
        ctx: &ResolverContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<Resource>> {
        let target = reference.resolvable_location();
        if reference.is_pattern() {
            let raws = ctx
                .resource_loader()
                .get_resources(&target, ResourceType::File)?;
            return Ok(raws
                .into_iter()
                .map(|raw| Resource::file(reference.clone(), raw))
                .collect());
        }
        let raw = ctx.resource_loader().get_resource(&target)?;
        if !raw.exists() && reference.skippable() {
            tracing::trace!(reference = %target, "skipping missing config data resource");
            return Ok(Vec::new());
        }
        Ok(vec![Resource::file(reference.clone(), raw)])
    }

    /// A directory that produced no file resources is still a visited
    /// location: emit one marker per existing directory (per matched
    /// subdirectory for patterns) so the mandatory-location bookkeeping
    /// sees it.
    fn resolve_empty_directories(
        &self,
        ctx: &ResolverContext<'_>,
        references: &IndexSet<Reference>,
    ) -> Result<Vec<Resource>> {
        let mut markers: IndexSet<Resource> = IndexSet::new();
        for reference in references {
            let Some(directory) = reference.directory() else {
                continue;
            };
            if directory.contains('*') {
                for raw in ctx
                    .resource_loader()
                    .get_resources(directory, ResourceType::Directory)?
                {
                    markers.insert(Resource::empty_directory(reference.clone(), raw));
                }
            } else {
                let raw = ctx.resource_loader().get_resource(directory)?;
                if raw.exists() && raw.is_directory() {
                    markers.insert(Resource::empty_directory(reference.clone(), raw));
                }
            }
        }
        Ok(markers.into_iter().collect())
    }
}

fn loadable_extension(loader: &dyn PropertySetLoader, file: &str) -> Option<String> {
    let lower = file.to_ascii_lowercase();
    loader
        .extensions()
        .iter()
        .find(|extension| lower.ends_with(&format!(".{extension}")))
        .map(|extension| file[file.len() - extension.len()..].to_string())
}
