use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use samovar::{
    ConfigDataEngine, ConfigUpdateListener, Environment, Location, PropertySet, Profiles,
    Resource, StandardResourceLoader,
};
use tempfile::TempDir;

/// A scratch application layout: a classpath directory and a separate
/// working directory, both inside one temp dir.
pub struct TestApp {
    _dir: TempDir,
    pub classpath: PathBuf,
    pub workdir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let classpath = dir.path().join("classes");
        let workdir = dir.path().join("work");
        fs::create_dir_all(&classpath).expect("classpath dir");
        fs::create_dir_all(&workdir).expect("workdir");
        Self {
            _dir: dir,
            classpath,
            workdir,
        }
    }

    pub fn write_classpath(&self, name: &str, content: &str) {
        write(&self.classpath.join(name), content);
    }

    pub fn write_workdir(&self, name: &str, content: &str) {
        write(&self.workdir.join(name), content);
    }

    pub fn engine(&self) -> ConfigDataEngine {
        ConfigDataEngine::new(
            StandardResourceLoader::with_working_dir(&self.workdir)
                .with_classpath_root(&self.classpath),
        )
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir");
    }
    fs::write(path, content).expect("write file");
}

/// An environment pre-seeded with one "commandLineArgs" source.
pub fn environment_with(entries: &[(&str, &str)]) -> Environment {
    let mut environment = Environment::new();
    if !entries.is_empty() {
        environment.add_last(PropertySet::with_entries(
            "commandLineArgs",
            entries.iter().copied(),
        ));
    }
    environment
}

/// Records applier events for ordering assertions.
#[derive(Clone, Default)]
pub struct RecordingListener {
    pub added: Rc<RefCell<Vec<String>>>,
    pub profiles: Rc<RefCell<Vec<Vec<String>>>>,
}

impl ConfigUpdateListener for RecordingListener {
    fn on_property_source_added(
        &self,
        set: &PropertySet,
        _location: Option<&Location>,
        _resource: Option<&Resource>,
    ) {
        self.added.borrow_mut().push(set.name().to_string());
    }

    fn on_set_profiles(&self, profiles: &Profiles) {
        self.profiles.borrow_mut().push(profiles.active().to_vec());
    }
}
