//! Active and default profile deduction.
//!
//! Profiles come out of `spring.profiles.active` / `.default` across the
//! whole contributor tree, merged with any additional profiles the host
//! supplies, then expanded through `spring.profiles.group.<name>`
//! declarations transitively.

use crate::binder::Binder;
use crate::error::Result;

pub const ACTIVE_PROFILES_PROPERTY: &str = "spring.profiles.active";
pub const DEFAULT_PROFILES_PROPERTY: &str = "spring.profiles.default";
pub const INCLUDE_PROFILES_PROPERTY: &str = "spring.profiles.include";
pub(crate) const GROUP_PROFILES_PREFIX: &str = "spring.profiles.group.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profiles {
    active: Vec<String>,
    default_profiles: Vec<String>,
}

impl Default for Profiles {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            default_profiles: vec!["default".to_string()],
        }
    }
}

impl Profiles {
    pub(crate) fn deduce(binder: &Binder<'_>, additional: &[String]) -> Result<Profiles> {
        let mut active = binder.get_list(ACTIVE_PROFILES_PROPERTY)?;
        for profile in additional {
            if !active.contains(profile) {
                active.push(profile.clone());
            }
        }
        let active = expand_groups(binder, active)?;

        let mut default_profiles = binder.get_list(DEFAULT_PROFILES_PROPERTY)?;
        if default_profiles.is_empty() {
            default_profiles.push("default".to_string());
        }
        let default_profiles = expand_groups(binder, default_profiles)?;

        Ok(Profiles {
            active,
            default_profiles,
        })
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn default_profiles(&self) -> &[String] {
        &self.default_profiles
    }

    /// The profiles currently in effect: the active ones, or the defaults
    /// when nothing was activated.
    pub fn accepted(&self) -> &[String] {
        if self.active.is_empty() {
            &self.default_profiles
        } else {
            &self.active
        }
    }

    /// Evaluate an `on-profile` expression: a profile name, or a `!`-negated
    /// one.
    pub fn is_accepted(&self, expression: &str) -> bool {
        let expression = expression.trim();
        match expression.strip_prefix('!') {
            Some(negated) => !self.accepted().iter().any(|p| p == negated.trim()),
            None => self.accepted().iter().any(|p| p == expression),
        }
    }
}

/// Depth-first group expansion: each profile is followed by its group
/// members, duplicates dropped, cycles ignored.
fn expand_groups(binder: &Binder<'_>, profiles: Vec<String>) -> Result<Vec<String>> {
    let mut stack: Vec<String> = profiles.into_iter().rev().collect();
    let mut expanded: Vec<String> = Vec::new();
    while let Some(profile) = stack.pop() {
        if expanded.contains(&profile) {
            continue;
        }
        let members = binder.get_list(&format!("{GROUP_PROFILES_PREFIX}{profile}"))?;
        expanded.push(profile);
        for member in members.into_iter().rev() {
            stack.push(member);
        }
    }
    Ok(expanded)
}
