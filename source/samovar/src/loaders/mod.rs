//! Built-in property set loaders.

mod properties;
mod yaml;

pub use properties::PropertiesLoader;
pub use yaml::YamlLoader;
