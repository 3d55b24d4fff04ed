#[cfg(test)]
mod tests {
    use crate::common::{environment_with, TestApp};
    use samovar::Environment;

    #[test]
    fn test_classpath_application_yaml_is_loaded_by_default() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("1"));
        assert_eq!(environment.sources().len(), 1);
        assert!(environment.sources()[0]
            .name()
            .starts_with("Config resource 'class path resource [application.yaml]'"));
    }

    #[test]
    fn test_property_source_name_includes_the_location() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(
            environment.sources()[0].name(),
            "Config resource 'class path resource [application.yaml]' via location 'optional:classpath:/'"
        );
    }

    #[test]
    fn test_working_dir_config_overrides_classpath() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: classpath\nonly-classpath: 1\n");
        app.write_workdir("config/application.yaml", "foo: workdir\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("workdir"));
        assert_eq!(environment.get("only-classpath"), Some("1"));
        assert_eq!(environment.sources().len(), 2);
    }

    #[test]
    fn test_config_subdirectory_wildcard_is_searched() {
        let app = TestApp::new();
        app.write_workdir("config/db/application.yaml", "db: 1\n");
        app.write_workdir("config/mq/application.yaml", "mq: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("db"), Some("1"));
        assert_eq!(environment.get("mq"), Some("1"));
    }

    #[test]
    fn test_config_name_override() {
        let app = TestApp::new();
        app.write_classpath("myapp.yaml", "foo: named\n");
        app.write_classpath("application.yaml", "foo: default\n");

        let mut environment = environment_with(&[("spring.config.name", "myapp")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("named"));
    }

    #[test]
    fn test_properties_loader_wins_over_yaml_in_one_directory() {
        let app = TestApp::new();
        app.write_classpath("application.properties", "foo=props\n");
        app.write_classpath("application.yaml", "foo: yaml\nyaml-only: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("props"));
        assert_eq!(environment.get("yaml-only"), Some("1"));
    }

    #[test]
    fn test_explicit_location_replaces_defaults() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: default\n");
        app.write_workdir("special/application.yaml", "foo: special\n");

        let mut environment =
            environment_with(&[("spring.config.location", "optional:file:./special/")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        // The classpath default location is no longer searched.
        assert_eq!(environment.get("foo"), Some("special"));
        assert_eq!(
            environment
                .sources()
                .iter()
                .filter(|set| set.name().starts_with("Config resource"))
                .count(),
            1
        );
    }
}
