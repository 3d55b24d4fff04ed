//! Activation coordinates: cloud platform and profiles.
//!
//! The [`ActivationContext`] is built in three stages across the processing
//! run: absent, platform-only, then platform plus profiles. Each bound
//! contributor's activation predicate is evaluated against it.

use std::fmt;
use std::str::FromStr;

use crate::binder::Binder;
use crate::error::{ConfigError, Result};
use crate::profiles::Profiles;

/// Property forcing a platform instead of detecting one.
pub const CLOUD_PLATFORM_PROPERTY: &str = "spring.main.cloud-platform";

/// A deployment platform, inferred from well-known connector properties or
/// forced through [`CLOUD_PLATFORM_PROPERTY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudPlatform {
    None,
    CloudFoundry,
    Heroku,
    Kubernetes,
}

impl CloudPlatform {
    /// Detect the active platform. An explicit `spring.main.cloud-platform`
    /// wins; otherwise the binder is probed for connector keys.
    pub(crate) fn detect(binder: &Binder<'_>) -> Result<Option<CloudPlatform>> {
        if let Some(value) = binder.get(CLOUD_PLATFORM_PROPERTY)? {
            let platform = value.trim().parse().map_err(|_| ConfigError::InvalidProperty {
                key: CLOUD_PLATFORM_PROPERTY.to_string(),
                origin: "environment".to_string(),
                reason: format!("unknown cloud platform '{value}'"),
            })?;
            return Ok(Some(platform));
        }
        Self::detect_from_connectors(binder)
    }

    fn detect_from_connectors(binder: &Binder<'_>) -> Result<Option<CloudPlatform>> {
        if binder.get("VCAP_APPLICATION")?.is_some() || binder.get("VCAP_SERVICES")?.is_some() {
            return Ok(Some(CloudPlatform::CloudFoundry));
        }
        if binder.get("DYNO")?.is_some() {
            return Ok(Some(CloudPlatform::Heroku));
        }
        if binder.get("KUBERNETES_SERVICE_HOST")?.is_some()
            && binder.get("KUBERNETES_SERVICE_PORT")?.is_some()
        {
            return Ok(Some(CloudPlatform::Kubernetes));
        }
        Ok(None)
    }
}

impl FromStr for CloudPlatform {
    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Ok(CloudPlatform::None),
            "cloud-foundry" => Ok(CloudPlatform::CloudFoundry),
            "heroku" => Ok(CloudPlatform::Heroku),
            "kubernetes" => Ok(CloudPlatform::Kubernetes),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CloudPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CloudPlatform::None => "none",
            CloudPlatform::CloudFoundry => "cloud-foundry",
            CloudPlatform::Heroku => "heroku",
            CloudPlatform::Kubernetes => "kubernetes",
        })
    }
}

/// The coordinates activation predicates are evaluated against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationContext {
    cloud_platform: Option<CloudPlatform>,
    profiles: Option<Profiles>,
}

impl ActivationContext {
    pub fn new(cloud_platform: Option<CloudPlatform>) -> Self {
        Self {
            cloud_platform,
            profiles: None,
        }
    }

    #[must_use]
    pub fn with_profiles(self, profiles: Profiles) -> Self {
        Self {
            cloud_platform: self.cloud_platform,
            profiles: Some(profiles),
        }
    }

    pub fn cloud_platform(&self) -> Option<CloudPlatform> {
        self.cloud_platform
    }

    pub fn profiles(&self) -> Option<&Profiles> {
        self.profiles.as_ref()
    }
}
