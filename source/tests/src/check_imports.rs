#[cfg(test)]
mod tests {
    use crate::common::{environment_with, TestApp};
    use samovar::Environment;

    #[test]
    fn test_recursive_import_from_classpath() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "spring:\n  config:\n    import: classpath:extra.yaml\nfoo: 1\n",
        );
        app.write_classpath("extra.yaml", "bar: x\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("bar"), Some("x"));

        // The imported source is appended after the importing one.
        let names: Vec<&str> = environment
            .sources()
            .iter()
            .map(|set| set.name())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].contains("[application.yaml]"));
        assert!(names[1].contains("[extra.yaml]"));
    }

    #[test]
    fn test_import_overrides_the_importing_file() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "spring:\n  config:\n    import: classpath:extra.yaml\nfoo: base\n",
        );
        app.write_classpath("extra.yaml", "foo: imported\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("imported"));
    }

    #[test]
    fn test_import_chain_two_levels_deep() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "spring:\n  config:\n    import: classpath:level1.yaml\n",
        );
        app.write_classpath(
            "level1.yaml",
            "spring:\n  config:\n    import: classpath:level2.yaml\nlevel: 1\n",
        );
        app.write_classpath("level2.yaml", "level: 2\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("level"), Some("2"));
        assert_eq!(environment.sources().len(), 3);
    }

    #[test]
    fn test_relative_import_is_anchored_at_the_importing_file() {
        let app = TestApp::new();
        app.write_workdir(
            "conf/application.yaml",
            "spring:\n  config:\n    import: extra.yaml\n",
        );
        app.write_workdir("conf/extra.yaml", "bar: relative\n");

        let mut environment =
            environment_with(&[("spring.config.location", "optional:file:./conf/")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("bar"), Some("relative"));
    }

    #[test]
    fn test_same_file_imported_twice_loads_once() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "spring:\n  config:\n    import: classpath:a.yaml,classpath:b.yaml\n",
        );
        app.write_classpath("a.yaml", "spring:\n  config:\n    import: classpath:shared.yaml\n");
        app.write_classpath("b.yaml", "spring:\n  config:\n    import: classpath:shared.yaml\n");
        app.write_classpath("shared.yaml", "shared: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("shared"), Some("1"));
        let shared_sources = environment
            .sources()
            .iter()
            .filter(|set| set.name().contains("[shared.yaml]"))
            .count();
        assert_eq!(shared_sources, 1);
    }

    #[test]
    fn test_import_from_properties_file() {
        let app = TestApp::new();
        app.write_classpath(
            "application.properties",
            "spring.config.import=classpath:extra.yaml\nfoo=props\n",
        );
        app.write_classpath("extra.yaml", "bar: yaml\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("props"));
        assert_eq!(environment.get("bar"), Some("yaml"));
    }

    #[test]
    fn test_environment_declared_import() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: base\n");
        app.write_classpath("override.yaml", "foo: imported\n");

        let mut environment =
            environment_with(&[("spring.config.import", "classpath:override.yaml")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        // Environment-declared imports take precedence over the defaults.
        assert_eq!(environment.get("foo"), Some("imported"));
    }

    #[test]
    fn test_import_with_placeholder_in_location() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "extra-file: extra.yaml\nspring:\n  config:\n    import: \"classpath:${extra-file}\"\n",
        );
        app.write_classpath("extra.yaml", "bar: via-placeholder\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("bar"), Some("via-placeholder"));
    }
}
