//! Host notifications during apply.

use crate::environment::PropertySet;
use crate::location::Location;
use crate::profiles::Profiles;
use crate::resource::Resource;

/// Installed by the host to observe the applier's work.
pub trait ConfigUpdateListener {
    /// A property source was appended to the environment.
    fn on_property_source_added(
        &self,
        _set: &PropertySet,
        _location: Option<&Location>,
        _resource: Option<&Resource>,
    ) {
    }

    /// The final profiles were set on the environment.
    fn on_set_profiles(&self, _profiles: &Profiles) {}
}

/// Default listener that ignores everything.
pub struct NoOpListener;

impl ConfigUpdateListener for NoOpListener {}
