//! The immutable contributor tree.
//!
//! Every stage of expanding a location into bound properties is a
//! [`Contributor`] node. Nodes never mutate: structural updates path-copy
//! from the root, reusing untouched subtrees. Walk order (depth-first,
//! pre-order, `Before` children ahead of `After` children, insertion order
//! within a phase) is the property-source precedence order: later-visited
//! nodes override earlier ones.

use std::sync::Arc;

use crate::activation::{ActivationContext, CloudPlatform};
use crate::binder::Binder;
use crate::environment::PropertySet;
use crate::error::{ConfigError, Result};
use crate::loader::Options;
use crate::location::Location;
use crate::profiles::Profiles;
use crate::resource::Resource;

pub const IMPORT_PROPERTY: &str = "spring.config.import";
pub const ON_PROFILE_PROPERTY: &str = "spring.config.activate.on-profile";
pub const ON_CLOUD_PLATFORM_PROPERTY: &str = "spring.config.activate.on-cloud-platform";

/// The import phase a child group was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    BeforeProfileActivation,
    AfterProfileActivation,
}

impl Phase {
    /// The phase the processor works in under the given activation context.
    pub fn for_activation(activation: Option<&ActivationContext>) -> Phase {
        match activation {
            Some(activation) if activation.profiles().is_some() => Phase::AfterProfileActivation,
            _ => Phase::BeforeProfileActivation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Synthetic holder of all other contributors.
    Root,
    /// A property set that was in the environment before the run.
    Existing,
    /// A user-declared starting location group, not yet resolved.
    InitialImport,
    /// A loaded property set whose own config keys are still unread.
    UnboundImport,
    /// An import whose config keys have been bound.
    BoundImport,
    /// A location that was visited but produced no data.
    EmptyLocation,
}

/// Activation predicate carried by bound imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activate {
    pub on_profile: Option<String>,
    pub on_cloud_platform: Option<CloudPlatform>,
}

impl Activate {
    /// Inactive while no context exists; otherwise both coordinates must
    /// match (an unset coordinate always matches).
    fn is_active(&self, activation: Option<&ActivationContext>) -> bool {
        let Some(activation) = activation else {
            return false;
        };
        let platform_matches = self
            .on_cloud_platform
            .map_or(true, |wanted| activation.cloud_platform() == Some(wanted));
        let profile_matches = self.on_profile.as_deref().map_or(true, |expression| {
            activation
                .profiles()
                .map_or(false, |profiles| profiles.is_accepted(expression))
        });
        platform_matches && profile_matches
    }
}

/// The `spring.config.*` keys bound out of a contributor's own property set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigProperties {
    imports: Vec<Location>,
    activate: Option<Activate>,
}

impl ConfigProperties {
    pub(crate) fn of_imports(imports: Vec<Location>) -> Self {
        Self {
            imports,
            activate: None,
        }
    }

    pub(crate) fn bind(binder: &Binder<'_>, origin: &str) -> Result<Option<ConfigProperties>> {
        let mut imports = Vec::new();
        for element in binder.get_list(IMPORT_PROPERTY)? {
            imports.extend(Location::parse_group(&element)?);
        }
        let on_profile = binder.get(ON_PROFILE_PROPERTY)?;
        let on_cloud_platform = match binder.get(ON_CLOUD_PLATFORM_PROPERTY)? {
            Some(value) => {
                Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidProperty {
                            key: ON_CLOUD_PLATFORM_PROPERTY.to_string(),
                            origin: origin.to_string(),
                            reason: format!("unknown cloud platform '{value}'"),
                        })?,
                )
            }
            None => None,
        };
        if imports.is_empty() && on_profile.is_none() && on_cloud_platform.is_none() {
            return Ok(None);
        }
        let activate = if on_profile.is_some() || on_cloud_platform.is_some() {
            Some(Activate {
                on_profile,
                on_cloud_platform,
            })
        } else {
            None
        };
        Ok(Some(ConfigProperties { imports, activate }))
    }

    pub(crate) fn without_imports(self) -> Self {
        Self {
            imports: Vec::new(),
            activate: self.activate,
        }
    }

    fn is_active(&self, activation: Option<&ActivationContext>) -> bool {
        self.activate
            .as_ref()
            .map_or(true, |activate| activate.is_active(activation))
    }
}

#[derive(Debug)]
pub struct Contributor {
    kind: Kind,
    location: Option<Location>,
    resource: Option<Resource>,
    profile_specific: bool,
    property_set: Option<PropertySet>,
    properties: Option<ConfigProperties>,
    options: Options,
    children: Vec<(Phase, Vec<Arc<Contributor>>)>,
}

impl Contributor {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            location: None,
            resource: None,
            profile_specific: false,
            property_set: None,
            properties: None,
            options: Options::NONE,
            children: Vec::new(),
        }
    }

    pub fn of_root(children: Vec<Arc<Contributor>>) -> Self {
        Self {
            children: vec![(Phase::BeforeProfileActivation, children)],
            ..Self::new(Kind::Root)
        }
    }

    pub fn of_existing(set: PropertySet) -> Self {
        Self {
            property_set: Some(set),
            ..Self::new(Kind::Existing)
        }
    }

    /// A starting location group; all members are resolved together, so a
    /// profile variant from any member overrides the base files of them all.
    pub fn of_initial_import(locations: Vec<Location>) -> Self {
        Self {
            properties: Some(ConfigProperties::of_imports(locations)),
            ..Self::new(Kind::InitialImport)
        }
    }

    pub(crate) fn of_unbound_import(
        location: Location,
        resource: Resource,
        profile_specific: bool,
        set: PropertySet,
        options: Options,
    ) -> Self {
        Self {
            location: Some(location),
            resource: Some(resource),
            profile_specific,
            property_set: Some(set),
            options,
            ..Self::new(Kind::UnboundImport)
        }
    }

    pub(crate) fn of_empty_location(location: Location, profile_specific: bool) -> Self {
        Self {
            location: Some(location),
            profile_specific,
            ..Self::new(Kind::EmptyLocation)
        }
    }

    /// Upgrade an unbound import with its bound config properties.
    pub(crate) fn with_bound(&self, properties: Option<ConfigProperties>) -> Contributor {
        Contributor {
            kind: Kind::BoundImport,
            location: self.location.clone(),
            resource: self.resource.clone(),
            profile_specific: self.profile_specific,
            property_set: self.property_set.clone(),
            properties,
            options: self.options,
            children: self.children.clone(),
        }
    }

    /// Attach (or replace) the child group for one phase. An empty child
    /// list still marks the phase as processed.
    pub(crate) fn with_children(
        &self,
        phase: Phase,
        children: Vec<Arc<Contributor>>,
    ) -> Contributor {
        let mut updated = self.children.clone();
        match updated.iter_mut().find(|(p, _)| *p == phase) {
            Some((_, existing)) => *existing = children,
            None => updated.push((phase, children)),
        }
        Contributor {
            kind: self.kind,
            location: self.location.clone(),
            resource: self.resource.clone(),
            profile_specific: self.profile_specific,
            property_set: self.property_set.clone(),
            properties: self.properties.clone(),
            options: self.options,
            children: updated,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    pub fn is_profile_specific(&self) -> bool {
        self.profile_specific
    }

    pub fn property_set(&self) -> Option<&PropertySet> {
        self.property_set.as_ref()
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub(crate) fn imports(&self) -> &[Location] {
        self.properties
            .as_ref()
            .map(|properties| properties.imports.as_slice())
            .unwrap_or(&[])
    }

    /// Unbound imports are never active; everything else is active unless a
    /// bound activation predicate says otherwise.
    pub(crate) fn is_active(&self, activation: Option<&ActivationContext>) -> bool {
        if self.kind == Kind::UnboundImport {
            return false;
        }
        self.properties
            .as_ref()
            .map_or(true, |properties| properties.is_active(activation))
    }

    pub(crate) fn children_for(&self, phase: Phase) -> &[Arc<Contributor>] {
        self.children
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, children)| children.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn has_processed(&self, phase: Phase) -> bool {
        self.children.iter().any(|(p, _)| *p == phase)
    }

    pub(crate) fn has_unprocessed_imports(&self, phase: Phase) -> bool {
        !self.imports().is_empty() && !self.has_processed(phase)
    }
}

/// The whole tree: a synthetic root over all contributors.
#[derive(Debug, Clone)]
pub struct ContributorTree {
    root: Arc<Contributor>,
}

impl ContributorTree {
    pub fn of(contributors: Vec<Arc<Contributor>>) -> Self {
        Self {
            root: Arc::new(Contributor::of_root(contributors)),
        }
    }

    pub fn root(&self) -> &Arc<Contributor> {
        &self.root
    }

    /// Depth-first pre-order walk, driven by an explicit stack.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter {
            stack: vec![&self.root],
        }
    }

    /// Path-copy replacement of one node. Ancestors on the path to the node
    /// are rebuilt; every other subtree is shared with `self`.
    pub(crate) fn with_replacement(
        &self,
        old: &Arc<Contributor>,
        new: Arc<Contributor>,
    ) -> ContributorTree {
        ContributorTree {
            root: replace_in(&self.root, old, &new).unwrap_or_else(|| self.root.clone()),
        }
    }
}

fn replace_in(
    node: &Arc<Contributor>,
    old: &Arc<Contributor>,
    new: &Arc<Contributor>,
) -> Option<Arc<Contributor>> {
    if Arc::ptr_eq(node, old) {
        return Some(new.clone());
    }
    for (group_index, (phase, children)) in node.children.iter().enumerate() {
        for (child_index, child) in children.iter().enumerate() {
            if let Some(replaced) = replace_in(child, old, new) {
                let mut children = children.clone();
                children[child_index] = replaced;
                let mut groups = node.children.clone();
                groups[group_index] = (*phase, children);
                return Some(Arc::new(Contributor {
                    kind: node.kind,
                    location: node.location.clone(),
                    resource: node.resource.clone(),
                    profile_specific: node.profile_specific,
                    property_set: node.property_set.clone(),
                    properties: node.properties.clone(),
                    options: node.options,
                    children: groups,
                }));
            }
        }
    }
    None
}

pub struct TreeIter<'a> {
    stack: Vec<&'a Arc<Contributor>>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a Arc<Contributor>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for phase in [Phase::AfterProfileActivation, Phase::BeforeProfileActivation] {
            for child in node.children_for(phase).iter().rev() {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

/// Profiles declared through `spring.profiles.include` across the tree,
/// honouring [`Options::IGNORE_PROFILES`] and trapping declarations in
/// inactive contributors.
pub(crate) fn included_profiles(
    tree: &ContributorTree,
    activation: &ActivationContext,
) -> Result<Vec<String>> {
    let mut included = Vec::new();
    for contributor in tree.iter() {
        let Some(set) = contributor.property_set() else {
            continue;
        };
        if contributor.options().contains(Options::IGNORE_PROFILES) {
            continue;
        }
        let binder = Binder::for_contributor(tree, Some(activation), contributor);
        let declared = binder.get_list(crate::profiles::INCLUDE_PROFILES_PROPERTY)?;
        if declared.is_empty() {
            continue;
        }
        if !contributor.is_active(Some(activation)) {
            return Err(ConfigError::InactiveAccess {
                key: crate::profiles::INCLUDE_PROFILES_PROPERTY.to_string(),
                source_name: set.name().to_string(),
            });
        }
        for profile in declared {
            if !included.contains(&profile) {
                included.push(profile);
            }
        }
    }
    Ok(included)
}

/// Deduce the full profile state from the tree.
pub(crate) fn deduce_profiles(
    tree: &ContributorTree,
    activation: &ActivationContext,
    additional_profiles: &[String],
) -> Result<Profiles> {
    let mut additional = additional_profiles.to_vec();
    for profile in included_profiles(tree, activation)? {
        if !additional.contains(&profile) {
            additional.push(profile);
        }
    }
    let binder = Binder::for_tree(
        tree,
        Some(activation),
        crate::binder::BinderOptions {
            fail_on_inactive: true,
            skip_ignore_profiles: true,
        },
    );
    Profiles::deduce(&binder, &additional)
}
