//! The fixed-point import processor.
//!
//! Each iteration either binds one unbound import (reading its
//! `spring.config.*` keys) or processes one contributor's imports for the
//! current phase, splicing the resulting children into a fresh tree. The
//! supply of unbound imports and unconsumed import lists is finite and
//! non-regenerating, so the loop terminates.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::activation::ActivationContext;
use crate::binder::Binder;
use crate::contributor::{ConfigProperties, Contributor, ContributorTree, Kind, Phase};
use crate::error::Result;
use crate::importer::{Importer, ResolutionResult};
use crate::loader::{ConfigData, Options};

impl ContributorTree {
    /// Run the import loop to its fixed point for the phase selected by
    /// `activation` (the after-activation phase once profiles are known).
    pub(crate) fn with_processed_imports(
        &self,
        importer: &mut Importer<'_>,
        activation: Option<&ActivationContext>,
    ) -> Result<ContributorTree> {
        let phase = Phase::for_activation(activation);
        let mut tree = self.clone();
        loop {
            let Some(next) = find_next(&tree, activation, phase) else {
                return Ok(tree);
            };
            if next.kind() == Kind::UnboundImport {
                let bound = bind_contributor(&tree, &next, activation)?;
                tree = tree.with_replacement(&next, Arc::new(bound));
                continue;
            }
            let imports = next.imports().to_vec();
            tracing::trace!(?phase, imports = imports.len(), "processing imports");
            let imported =
                importer.resolve_and_load(activation, next.resource(), &tree, &imports)?;
            let children = as_contributors(&imported);
            tree = tree.with_replacement(&next, Arc::new(next.with_children(phase, children)));
        }
    }
}

/// Pre-order search for the next contributor to work on: an unbound import,
/// or an active node with an unconsumed import list for this phase.
fn find_next(
    tree: &ContributorTree,
    activation: Option<&ActivationContext>,
    phase: Phase,
) -> Option<Arc<Contributor>> {
    tree.iter()
        .find(|contributor| {
            contributor.kind() == Kind::UnboundImport
                || (contributor.is_active(activation)
                    && contributor.has_unprocessed_imports(phase))
        })
        .cloned()
}

/// Read the contributor's own `spring.config.*` keys, resolving
/// placeholders against the whole tree, and upgrade it to a bound import.
fn bind_contributor(
    tree: &ContributorTree,
    contributor: &Arc<Contributor>,
    activation: Option<&ActivationContext>,
) -> Result<Contributor> {
    let binder = Binder::for_contributor(tree, activation, contributor);
    let origin = contributor
        .property_set()
        .map(|set| set.name().to_string())
        .unwrap_or_default();
    let mut properties = ConfigProperties::bind(&binder, &origin)?;
    if contributor.options().contains(Options::IGNORE_IMPORTS) {
        properties = properties.map(ConfigProperties::without_imports);
    }
    Ok(contributor.with_bound(properties))
}

/// Convert one import batch into child contributors. The importer's map is
/// in reverse declaration order, so it is walked backwards; property sets
/// keep document order. The walk therefore visits the batch in declaration
/// order, and the last document of a file ends up with the highest
/// precedence.
fn as_contributors(imported: &IndexMap<ResolutionResult, ConfigData>) -> Vec<Arc<Contributor>> {
    let mut children = Vec::new();
    for (result, data) in imported.iter().rev() {
        let location = result.location().clone();
        let profile_specific = result.resource().is_profile_specific();
        if data.is_empty() {
            children.push(Arc::new(Contributor::of_empty_location(
                location,
                profile_specific,
            )));
            continue;
        }
        for (set, options) in data.iter() {
            children.push(Arc::new(Contributor::of_unbound_import(
                location.clone(),
                result.resource().clone(),
                profile_specific,
                set.clone(),
                options,
            )));
        }
    }
    children
}
