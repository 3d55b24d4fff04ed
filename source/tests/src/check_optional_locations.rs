#[cfg(test)]
mod tests {
    use crate::common::{environment_with, TestApp};
    use samovar::ConfigError;

    #[test]
    fn test_missing_optional_location_is_silent() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: 1\n");

        let mut environment = environment_with(&[
            ("spring.config.location", "optional:file:/does/not/exist/"),
            ("spring.config.additional-location", "classpath:/"),
        ]);
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("1"));
        let loaded = environment
            .sources()
            .iter()
            .filter(|set| set.name().starts_with("Config resource"))
            .count();
        assert_eq!(loaded, 1);
    }

    #[test]
    fn test_missing_mandatory_location_fails() {
        let app = TestApp::new();

        let mut environment = environment_with(&[("spring.config.location", "file:/nope/")]);
        let err = app
            .engine()
            .process_and_apply(&mut environment)
            .unwrap_err();
        match err {
            ConfigError::LocationNotFound { location } => {
                assert_eq!(location.value(), "file:/nope/");
            }
            other => panic!("expected LocationNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_missing_mandatory_file_fails() {
        let app = TestApp::new();

        let mut environment =
            environment_with(&[("spring.config.location", "file:./missing.yaml")]);
        let err = app
            .engine()
            .process_and_apply(&mut environment)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_on_not_found_ignore_swallows_mandatory_misses() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: 1\n");

        let mut environment = environment_with(&[
            ("spring.config.location", "file:/nope/"),
            ("spring.config.additional-location", "classpath:/"),
            ("spring.config.on-not-found", "ignore"),
        ]);
        app.engine().process_and_apply(&mut environment).unwrap();
        assert_eq!(environment.get("foo"), Some("1"));
    }

    #[test]
    fn test_optional_prefix_wins_over_fail_action() {
        let app = TestApp::new();

        let mut environment = environment_with(&[
            ("spring.config.location", "optional:file:./missing.yaml"),
            ("spring.config.on-not-found", "fail"),
        ]);
        app.engine().process_and_apply(&mut environment).unwrap();
    }

    #[test]
    fn test_mandatory_empty_directory_counts_as_visited() {
        let app = TestApp::new();
        app.write_workdir("conf/.keep", "");
        std::fs::remove_file(app.workdir.join("conf/.keep")).unwrap();

        let mut environment = environment_with(&[("spring.config.location", "file:./conf/")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        let loaded = environment
            .sources()
            .iter()
            .filter(|set| set.name().starts_with("Config resource"))
            .count();
        assert_eq!(loaded, 0);
    }
}
