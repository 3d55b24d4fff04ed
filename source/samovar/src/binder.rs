//! Property binding over ordered sources.
//!
//! A [`Binder`] answers typed lookups against a precedence-ordered list of
//! property sets, resolving `${name}` / `${name:default}` placeholders
//! against the same (or a wider) list. When built over a contributor tree
//! it can be asked to *trap* lookups that touch an inactive contributor,
//! which is how [`ConfigError::InactiveAccess`] surfaces.

use std::str::FromStr;
use std::sync::Arc;

use crate::activation::ActivationContext;
use crate::contributor::{Contributor, ContributorTree, Kind};
use crate::environment::{Environment, PropertySet};
use crate::error::{ConfigError, Result};
use crate::loader::Options;

const PLACEHOLDER_DEPTH_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct BinderOptions {
    /// Error out when a lookup touches a source whose contributor fails its
    /// activation predicate (instead of silently excluding it).
    pub fail_on_inactive: bool,
    /// Exclude sources carrying [`Options::IGNORE_PROFILES`]; used for
    /// profile deduction.
    pub skip_ignore_profiles: bool,
}

#[derive(Clone, Copy)]
struct Source<'a> {
    set: &'a PropertySet,
    active: bool,
}

pub struct Binder<'a> {
    key_sources: Vec<Source<'a>>,
    placeholder_sources: Vec<Source<'a>>,
}

impl<'a> Binder<'a> {
    /// Bind against the environment's own property sources.
    pub fn of_environment(environment: &'a Environment) -> Binder<'a> {
        let mut sources: Vec<Source<'a>> = environment
            .sources()
            .iter()
            .map(|set| Source { set, active: true })
            .collect();
        sources.reverse();
        Binder {
            key_sources: sources.clone(),
            placeholder_sources: sources,
        }
    }

    /// Bind against every contributor in the tree that carries properties.
    pub(crate) fn for_tree(
        tree: &'a ContributorTree,
        activation: Option<&ActivationContext>,
        options: BinderOptions,
    ) -> Binder<'a> {
        let sources = tree_sources(tree, activation, options, None);
        Binder {
            key_sources: sources.clone(),
            placeholder_sources: sources,
        }
    }

    /// Bind a single contributor's own keys, resolving placeholders against
    /// the whole tree. Placeholder lookups that land in an inactive
    /// contributor trap; the contributor itself is always allowed.
    pub(crate) fn for_contributor(
        tree: &'a ContributorTree,
        activation: Option<&ActivationContext>,
        current: &'a Arc<Contributor>,
    ) -> Binder<'a> {
        let key_sources = current
            .property_set()
            .map(|set| Source { set, active: true })
            .into_iter()
            .collect();
        let placeholder_sources = tree_sources(
            tree,
            activation,
            BinderOptions {
                fail_on_inactive: true,
                skip_ignore_profiles: false,
            },
            Some(current),
        );
        Binder {
            key_sources,
            placeholder_sources,
        }
    }

    /// Look up a key and resolve placeholders in its value.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match self.lookup(key, &self.key_sources)? {
            Some(value) => self.resolve_placeholders(value, 0).map(Some),
            None => Ok(None),
        }
    }

    /// Look up a key and parse it into `T`.
    pub fn bind<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => {
                value
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidProperty {
                        key: key.to_string(),
                        origin: self.origin_of(key),
                        reason: format!("cannot interpret value '{value}'"),
                    })
            }
            None => Ok(None),
        }
    }

    /// Bind a list: `key[0]`, `key[1]`, … entries if present, otherwise the
    /// plain value split on unescaped commas.
    pub fn get_list(&self, key: &str) -> Result<Vec<String>> {
        let mut items = Vec::new();
        let mut index = 0;
        while let Some(value) = self.lookup(&format!("{key}[{index}]"), &self.key_sources)? {
            items.push(self.resolve_placeholders(value, 0)?);
            index += 1;
        }
        if !items.is_empty() {
            return Ok(items);
        }
        match self.get(key)? {
            Some(value) => Ok(split_unescaped_commas(&value)),
            None => Ok(Vec::new()),
        }
    }

    /// The name of the source that would answer a lookup for `key`.
    pub(crate) fn origin_of(&self, key: &str) -> String {
        self.key_sources
            .iter()
            .find(|source| source.set.contains(key))
            .map(|source| source.set.name().to_string())
            .unwrap_or_else(|| "environment".to_string())
    }

    /// Scan every source: the first hit in precedence order wins, but a hit
    /// in an inactive source is an error no matter where it sits.
    fn lookup(&self, key: &str, sources: &[Source<'a>]) -> Result<Option<&'a str>> {
        let mut found: Option<&'a str> = None;
        for source in sources {
            if let Some(value) = source.set.get(key) {
                if !source.active {
                    return Err(ConfigError::InactiveAccess {
                        key: key.to_string(),
                        source_name: source.set.name().to_string(),
                    });
                }
                if found.is_none() {
                    found = Some(value);
                }
            }
        }
        Ok(found)
    }

    fn resolve_placeholders(&self, value: &str, depth: usize) -> Result<String> {
        if depth > PLACEHOLDER_DEPTH_LIMIT || !value.contains("${") {
            return Ok(value.to_string());
        }
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = matching_brace(after) else {
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            let inner = &after[..end];
            let (name, default) = match inner.find(':') {
                Some(colon) => (&inner[..colon], Some(&inner[colon + 1..])),
                None => (inner, None),
            };
            let name = self.resolve_placeholders(name, depth + 1)?;
            match self.lookup(&name, &self.placeholder_sources)? {
                Some(resolved) => out.push_str(&self.resolve_placeholders(resolved, depth + 1)?),
                None => match default {
                    Some(default) => {
                        out.push_str(&self.resolve_placeholders(default, depth + 1)?);
                    }
                    None => {
                        out.push_str("${");
                        out.push_str(inner);
                        out.push('}');
                    }
                },
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (index, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn tree_sources<'a>(
    tree: &'a ContributorTree,
    activation: Option<&ActivationContext>,
    options: BinderOptions,
    current: Option<&Arc<Contributor>>,
) -> Vec<Source<'a>> {
    let mut sources = Vec::new();
    for contributor in tree.iter() {
        let Some(set) = contributor.property_set() else {
            continue;
        };
        if options.skip_ignore_profiles && contributor.options().contains(Options::IGNORE_PROFILES)
        {
            continue;
        }
        let active = match current {
            Some(current) if Arc::ptr_eq(current, contributor) => true,
            _ => contributor.kind() == Kind::UnboundImport || contributor.is_active(activation),
        };
        if !active && !options.fail_on_inactive {
            continue;
        }
        sources.push(Source { set, active });
    }
    sources.reverse();
    sources
}

/// Split on commas, honouring `\,` escapes. Blank items are dropped.
pub(crate) fn split_unescaped_commas(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in value.chars() {
        if escaped {
            if c != ',' {
                current.push('\\');
            }
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == ',' {
            items.push(current.clone());
            current.clear();
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    items.push(current);
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
