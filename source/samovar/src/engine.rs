//! The top-level `process_and_apply` orchestration.
//!
//! Builds the initial contributor tree out of the environment's existing
//! sources and the configured locations, runs the three fixed-point phases
//! with the two activation computations between them, then validates and
//! applies the result back onto the environment.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::activation::{ActivationContext, CloudPlatform};
use crate::binder::{Binder, BinderOptions};
use crate::bootstrap::{BootstrapContext, Scope};
use crate::contributor::{
    deduce_profiles, Contributor, ContributorTree, Kind, IMPORT_PROPERTY,
};
use crate::environment::{Environment, DEFAULT_PROPERTIES};
use crate::error::{ConfigError, Result};
use crate::events::{ConfigUpdateListener, NoOpListener};
use crate::importer::{Importer, NotFoundAction, ON_NOT_FOUND_PROPERTY};
use crate::loader::{ConfigDataLoader, Options, PropertySetLoader};
use crate::loaders::{PropertiesLoader, YamlLoader};
use crate::location::Location;
use crate::profiles::{
    Profiles, ACTIVE_PROFILES_PROPERTY, INCLUDE_PROFILES_PROPERTY,
};
use crate::resolver::LocationResolver;
use crate::source::ResourceLoader;

pub const LOCATION_PROPERTY: &str = "spring.config.location";
pub const ADDITIONAL_LOCATION_PROPERTY: &str = "spring.config.additional-location";
pub const USE_LEGACY_PROCESSING_PROPERTY: &str = "spring.config.use-legacy-processing";

/// Searched when `spring.config.location` is unset. Each `;` group becomes
/// one initial-import contributor; later groups override earlier ones.
const DEFAULT_SEARCH_LOCATIONS: [&str; 2] = [
    "optional:classpath:/;optional:classpath:/config/",
    "optional:file:./;optional:file:./config/;optional:file:./config/*/",
];

/// Hands out binders over the final processed tree; registered in the
/// bootstrap context under the prototype scope.
#[derive(Clone)]
pub struct TreeBinderFactory {
    tree: ContributorTree,
    activation: ActivationContext,
}

impl TreeBinderFactory {
    pub fn binder(&self) -> Binder<'_> {
        Binder::for_tree(&self.tree, Some(&self.activation), BinderOptions::default())
    }
}

pub struct ConfigDataEngine {
    resource_loader: Box<dyn ResourceLoader>,
    loaders: Vec<Arc<dyn PropertySetLoader>>,
    additional_profiles: Vec<String>,
    listener: Box<dyn ConfigUpdateListener>,
    bootstrap: BootstrapContext,
}

impl ConfigDataEngine {
    /// An engine with the built-in loaders (`.properties` first, then
    /// YAML).
    pub fn new(resource_loader: impl ResourceLoader + 'static) -> Self {
        Self {
            resource_loader: Box::new(resource_loader),
            loaders: vec![Arc::new(PropertiesLoader), Arc::new(YamlLoader)],
            additional_profiles: Vec::new(),
            listener: Box::new(NoOpListener),
            bootstrap: BootstrapContext::new(),
        }
    }

    /// Replace the loader set. Order matters: earlier loaders take
    /// precedence when a directory holds several matching files.
    #[must_use]
    pub fn with_loaders(mut self, loaders: Vec<Arc<dyn PropertySetLoader>>) -> Self {
        self.loaders = loaders;
        self
    }

    /// Profiles activated on top of whatever the properties declare.
    #[must_use]
    pub fn with_additional_profiles(
        mut self,
        profiles: impl IntoIterator<Item = String>,
    ) -> Self {
        self.additional_profiles.extend(profiles);
        self
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl ConfigUpdateListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn bootstrap(&self) -> &BootstrapContext {
        &self.bootstrap
    }

    /// Expand the configured locations into property sources and apply them
    /// to the environment.
    pub fn process_and_apply(&self, environment: &mut Environment) -> Result<()> {
        let (tree, resolver, not_found_action) = {
            let binder = Binder::of_environment(environment);
            if binder
                .bind::<bool>(USE_LEGACY_PROCESSING_PROPERTY)?
                .unwrap_or(false)
            {
                return Err(ConfigError::UseLegacyProcessing);
            }
            let not_found_action = match binder.get(ON_NOT_FOUND_PROPERTY)? {
                Some(value) => {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidProperty {
                            key: ON_NOT_FOUND_PROPERTY.to_string(),
                            origin: binder.origin_of(ON_NOT_FOUND_PROPERTY),
                            reason: format!("expected 'fail' or 'ignore', got '{value}'"),
                        })?
                }
                None => NotFoundAction::default(),
            };
            let resolver = LocationResolver::new(&binder, self.loaders.clone())?;
            let tree = self.create_contributors(environment, &binder)?;
            (tree, resolver, not_found_action)
        };

        let mut importer = Importer::new(
            resolver,
            ConfigDataLoader::new(),
            self.resource_loader.as_ref(),
            not_found_action,
        );

        let tree = tree.with_processed_imports(&mut importer, None)?;

        let platform =
            CloudPlatform::detect(&Binder::for_tree(&tree, None, BinderOptions::default()))?;
        if let Some(platform) = platform {
            tracing::debug!(%platform, "detected cloud platform");
        }
        let activation = ActivationContext::new(platform);
        let tree = tree.with_processed_imports(&mut importer, Some(&activation))?;

        let profiles = deduce_profiles(&tree, &activation, &self.additional_profiles)?;
        tracing::debug!(active = ?profiles.active(), default = ?profiles.default_profiles(), "deduced profiles");
        let activation = activation.with_profiles(profiles.clone());
        let tree = tree.with_processed_imports(&mut importer, Some(&activation))?;

        let factory = TreeBinderFactory {
            tree: tree.clone(),
            activation: activation.clone(),
        };
        self.bootstrap
            .register(Scope::Prototype, move || factory.clone());

        self.apply(environment, &tree, &activation, &importer, &profiles)
    }

    /// Existing sources first (`defaultProperties` in front so it loses to
    /// everything), then one initial-import contributor per location group:
    /// the configured (or default) search locations, then the additional
    /// locations, then environment-declared imports — later groups win.
    fn create_contributors(
        &self,
        environment: &Environment,
        binder: &Binder<'_>,
    ) -> Result<ContributorTree> {
        let mut contributors: Vec<Arc<Contributor>> = Vec::new();
        let mut default_properties = None;
        for set in environment.sources() {
            if set.name() == DEFAULT_PROPERTIES {
                default_properties = Some(set.clone());
            } else {
                contributors.push(Arc::new(Contributor::of_existing(set.clone())));
            }
        }
        if let Some(set) = default_properties {
            contributors.insert(0, Arc::new(Contributor::of_existing(set)));
        }

        let mut groups = bind_location_groups(binder, LOCATION_PROPERTY)?;
        if groups.is_empty() {
            groups = DEFAULT_SEARCH_LOCATIONS
                .iter()
                .map(|value| Location::parse_group(value))
                .collect::<Result<_>>()?;
        }
        groups.extend(bind_location_groups(binder, ADDITIONAL_LOCATION_PROPERTY)?);
        groups.extend(bind_location_groups(binder, IMPORT_PROPERTY)?);
        for group in groups {
            contributors.push(Arc::new(Contributor::of_initial_import(group)));
        }
        Ok(ContributorTree::of(contributors))
    }

    fn apply(
        &self,
        environment: &mut Environment,
        tree: &ContributorTree,
        activation: &ActivationContext,
        importer: &Importer<'_>,
        profiles: &Profiles,
    ) -> Result<()> {
        check_invalid_properties(tree)?;
        check_mandatory_locations(tree, activation, importer)?;

        for contributor in tree.iter() {
            if contributor.kind() != Kind::BoundImport
                || !contributor.is_active(Some(activation))
            {
                continue;
            }
            let Some(set) = contributor.property_set() else {
                continue;
            };
            tracing::trace!(source = set.name(), "adding imported property source");
            environment.add_last(set.clone());
            self.listener.on_property_source_added(
                set,
                contributor.location(),
                contributor.resource(),
            );
        }

        environment.move_to_front(DEFAULT_PROPERTIES);
        environment.set_active_profiles(profiles.active().to_vec());
        environment.set_default_profiles(profiles.default_profiles().to_vec());
        self.listener.on_set_profiles(profiles);
        Ok(())
    }
}

fn bind_location_groups(binder: &Binder<'_>, key: &str) -> Result<Vec<Vec<Location>>> {
    let mut groups = Vec::new();
    for element in binder.get_list(key)? {
        let group = Location::parse_group(&element)?;
        if !group.is_empty() {
            groups.push(group);
        }
    }
    Ok(groups)
}

/// Keys whose presence inside a profile-specific property source is an
/// error.
const PROFILE_SPECIFIC_ERRORS: [&str; 2] = [ACTIVE_PROFILES_PROPERTY, INCLUDE_PROFILES_PROPERTY];

fn check_invalid_properties(tree: &ContributorTree) -> Result<()> {
    for contributor in tree.iter() {
        let Some(set) = contributor.property_set() else {
            continue;
        };
        if set.contains("spring.profiles") {
            tracing::warn!(
                source = set.name(),
                "'spring.profiles' is deprecated, use 'spring.config.activate.on-profile'"
            );
        }
        let profile_specific = contributor.is_profile_specific()
            || contributor.options().contains(Options::PROFILE_SPECIFIC);
        if profile_specific && !contributor.options().contains(Options::IGNORE_PROFILES) {
            for key in PROFILE_SPECIFIC_ERRORS {
                if set.contains(key) {
                    return Err(ConfigError::InvalidProperty {
                        key: key.to_string(),
                        origin: set.name().to_string(),
                        reason: "profile-specific property sources cannot declare it"
                            .to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Every mandatory import of an active contributor must have resolved to
/// something: a contributor location, a loaded location, or a recorded
/// optional miss. Skipped entirely under `on-not-found=ignore`.
fn check_mandatory_locations(
    tree: &ContributorTree,
    activation: &ActivationContext,
    importer: &Importer<'_>,
) -> Result<()> {
    if importer.not_found_action() == NotFoundAction::Ignore {
        return Ok(());
    }
    let mut mandatory: IndexSet<Location> = IndexSet::new();
    for contributor in tree.iter() {
        if contributor.is_active(Some(activation)) {
            for location in contributor.imports() {
                if !location.is_optional() {
                    mandatory.insert(location.clone());
                }
            }
        }
    }
    for contributor in tree.iter() {
        if let Some(location) = contributor.location() {
            mandatory.shift_remove(location);
        }
    }
    for location in importer.loaded_locations() {
        mandatory.shift_remove(location);
    }
    for location in importer.optional_locations() {
        mandatory.shift_remove(location);
    }
    if let Some(location) = mandatory.first() {
        return Err(ConfigError::LocationNotFound {
            location: location.clone(),
        });
    }
    Ok(())
}
