//! Bootstrap-time configuration processing.
//!
//! samovar expands a small set of initial configuration locations —
//! recursively, in three activation phases — into an ordered list of
//! property sources that populate an [`Environment`]. Property files may
//! import further locations (`spring.config.import`), gate themselves on
//! profiles or a cloud platform (`spring.config.activate.*`), and activate
//! profiles (`spring.profiles.*`); the engine converges on a deterministic
//! final ordering where later sources override earlier ones.
//!
//! ```no_run
//! use samovar::{ConfigDataEngine, Environment, StandardResourceLoader};
//!
//! let loader = StandardResourceLoader::new()?;
//! let engine = ConfigDataEngine::new(loader);
//! let mut environment = Environment::new();
//! engine.process_and_apply(&mut environment)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod activation;
pub mod binder;
pub mod bootstrap;
pub mod contributor;
pub mod engine;
pub mod environment;
pub mod error;
pub mod events;
pub mod importer;
pub mod loader;
pub mod loaders;
pub mod location;
mod processor;
pub mod profiles;
pub mod reference;
pub mod resolver;
pub mod resource;
pub mod source;

pub use activation::{ActivationContext, CloudPlatform};
pub use binder::Binder;
pub use bootstrap::{BootstrapContext, Scope};
pub use contributor::{Contributor, ContributorTree, Kind, Phase};
pub use engine::{ConfigDataEngine, TreeBinderFactory};
pub use environment::{Environment, PropertySet, DEFAULT_PROPERTIES};
pub use error::{ConfigError, Result};
pub use events::{ConfigUpdateListener, NoOpListener};
pub use importer::NotFoundAction;
pub use loader::{ConfigData, Options, PropertySetLoader};
pub use loaders::{PropertiesLoader, YamlLoader};
pub use location::Location;
pub use profiles::Profiles;
pub use resolver::LocationResolver;
pub use resource::Resource;
pub use source::{RawResource, ResourceLoader, ResourceType, StandardResourceLoader};

#[macro_export]
macro_rules! assert_err_contains {
    ($err_msg:expr, $expected:expr) => {
        #[cfg(test)]
        assert!(
            $err_msg.contains($expected),
            "expected: {}, got: {}",
            $expected,
            $err_msg
        );
    };
}
