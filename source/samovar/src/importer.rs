//! Resolve-and-load with run-wide deduplication.
//!
//! The importer owns the resolver, the config-data loader and the dedup
//! bookkeeping for one processing run: which resources have been loaded,
//! which locations produced them, and which locations were legitimately
//! absent. A resource reached through two different locations loads once.

use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};

use crate::activation::ActivationContext;
use crate::binder::{Binder, BinderOptions};
use crate::contributor::ContributorTree;
use crate::error::{ConfigError, Result};
use crate::loader::{ConfigData, ConfigDataLoader};
use crate::location::Location;
use crate::resolver::{LocationResolver, ResolverContext};
use crate::resource::Resource;
use crate::source::ResourceLoader;

pub const ON_NOT_FOUND_PROPERTY: &str = "spring.config.on-not-found";

/// What to do when a mandatory location yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundAction {
    #[default]
    Fail,
    Ignore,
}

impl FromStr for NotFoundAction {
    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(NotFoundAction::Fail),
            "ignore" => Ok(NotFoundAction::Ignore),
            _ => Err(()),
        }
    }
}

/// One successfully loaded (location, resource) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionResult {
    location: Location,
    resource: Resource,
}

impl ResolutionResult {
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }
}

pub struct Importer<'a> {
    resolver: LocationResolver,
    loader: ConfigDataLoader,
    resource_loader: &'a dyn ResourceLoader,
    not_found_action: NotFoundAction,
    loaded: IndexSet<Resource>,
    loaded_locations: IndexSet<Location>,
    optional_locations: IndexSet<Location>,
}

impl<'a> Importer<'a> {
    pub fn new(
        resolver: LocationResolver,
        loader: ConfigDataLoader,
        resource_loader: &'a dyn ResourceLoader,
        not_found_action: NotFoundAction,
    ) -> Self {
        Self {
            resolver,
            loader,
            resource_loader,
            not_found_action,
            loaded: IndexSet::new(),
            loaded_locations: IndexSet::new(),
            optional_locations: IndexSet::new(),
        }
    }

    /// Locations that produced loaded config data (including markers for
    /// visited-but-empty directories).
    pub fn loaded_locations(&self) -> &IndexSet<Location> {
        &self.loaded_locations
    }

    /// Locations that were allowed to be absent and were.
    pub fn optional_locations(&self) -> &IndexSet<Location> {
        &self.optional_locations
    }

    /// Resolve every location (against the active profiles, when the
    /// context carries any) and load each resolved resource once.
    ///
    /// Candidates are loaded in reverse resolution order so that, when one
    /// resource is declared twice in a batch, the *last* declaration claims
    /// its map slot; converting the map back to children re-reverses it
    /// into declaration order.
    pub fn resolve_and_load(
        &mut self,
        activation: Option<&ActivationContext>,
        parent: Option<&Resource>,
        tree: &ContributorTree,
        locations: &[Location],
    ) -> Result<IndexMap<ResolutionResult, ConfigData>> {
        let binder = Binder::for_tree(tree, activation, BinderOptions::default());
        let ctx = ResolverContext::new(parent, self.resource_loader, &binder);
        let profiles = activation.and_then(|activation| activation.profiles());

        let mut candidates = Vec::new();
        for location in locations {
            // With profiles in play, the base resources resolve first and
            // the profile variants after them, so the variants win; repeats
            // of already loaded resources fall to the dedup below.
            let outcome = match profiles {
                Some(profiles) => self.resolver.resolve(&ctx, location).and_then(|mut all| {
                    all.extend(self.resolver.resolve_profile_specific(&ctx, location, profiles)?);
                    Ok(all)
                }),
                None => self.resolver.resolve(&ctx, location),
            };
            match outcome {
                Ok(resources) => {
                    candidates.extend(resources.into_iter().map(|r| (location.clone(), r)));
                }
                Err(err) if err.is_not_found() => self.handle_not_found(err, location)?,
                Err(err) => return Err(err),
            }
        }

        let mut result = IndexMap::new();
        for (location, resource) in candidates.into_iter().rev() {
            if resource.is_optional() {
                self.optional_locations.insert(location.clone());
            }
            if self.loaded.contains(&resource) {
                tracing::debug!(resource = %resource, "skipping already loaded config data");
                self.loaded_locations.insert(location);
                continue;
            }
            match self.loader.load(&resource) {
                Ok(data) => {
                    tracing::debug!(resource = %resource, location = %location, "loaded config data");
                    self.loaded.insert(resource.clone());
                    self.loaded_locations.insert(location.clone());
                    result.insert(ResolutionResult { location, resource }, data);
                }
                Err(err) if err.is_not_found() => self.handle_not_found(err, &location)?,
                Err(err) => return Err(err),
            }
        }
        Ok(result)
    }

    /// Optional locations and `on-not-found=ignore` swallow the error; the
    /// location is recorded as legitimately absent either way.
    fn handle_not_found(&mut self, err: ConfigError, location: &Location) -> Result<()> {
        if location.is_optional() || self.not_found_action == NotFoundAction::Ignore {
            tracing::trace!(%location, "skipping missing config data: {err}");
            self.optional_locations.insert(location.clone());
            return Ok(());
        }
        Err(err)
    }

    /// The not-found policy applied at the end of the run to mandatory
    /// locations that never produced anything.
    pub(crate) fn not_found_action(&self) -> NotFoundAction {
        self.not_found_action
    }
}
