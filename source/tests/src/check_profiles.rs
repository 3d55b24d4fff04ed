#[cfg(test)]
mod tests {
    use crate::common::{environment_with, TestApp};
    use samovar::{ConfigError, Environment};

    #[test]
    fn test_profile_file_wins_over_base() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: 1\n");
        app.write_classpath("application-dev.yaml", "foo: 2\n");

        let mut environment = environment_with(&[("spring.profiles.active", "dev")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("2"));
        assert_eq!(environment.active_profiles(), ["dev"]);

        // The profile-specific source sits after the base source.
        let names: Vec<&str> = environment
            .sources()
            .iter()
            .map(|set| set.name())
            .filter(|name| name.starts_with("Config resource"))
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].contains("[application.yaml]"));
        assert!(names[1].contains("[application-dev.yaml]"));
    }

    #[test]
    fn test_profile_activated_by_a_loaded_file() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "spring:\n  profiles:\n    active: dev\n");
        app.write_classpath("application-dev.yaml", "from-dev: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("from-dev"), Some("1"));
        assert_eq!(environment.active_profiles(), ["dev"]);
    }

    #[test]
    fn test_additional_profiles_from_the_host() {
        let app = TestApp::new();
        app.write_classpath("application-extra.yaml", "from-extra: 1\n");

        let mut environment = Environment::new();
        app.engine()
            .with_additional_profiles(["extra".to_string()])
            .process_and_apply(&mut environment)
            .unwrap();

        assert_eq!(environment.get("from-extra"), Some("1"));
        assert_eq!(environment.active_profiles(), ["extra"]);
    }

    #[test]
    fn test_profile_groups_expand_transitively() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "spring:\n  profiles:\n    group:\n      prod: proddb,prodmq\n",
        );
        app.write_classpath("application-proddb.yaml", "db: tuned\n");

        let mut environment = environment_with(&[("spring.profiles.active", "prod")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(
            environment.active_profiles(),
            ["prod", "proddb", "prodmq"]
        );
        assert_eq!(environment.get("db"), Some("tuned"));
    }

    #[test]
    fn test_included_profiles_are_added() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "spring:\n  profiles:\n    include: shared\n",
        );
        app.write_classpath("application-shared.yaml", "from-shared: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("from-shared"), Some("1"));
        assert_eq!(environment.active_profiles(), ["shared"]);
    }

    #[test]
    fn test_on_profile_gated_document() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "shared: base\n",
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-profile: dev\n",
                "shared: dev-only\n",
            ),
        );

        let mut plain = Environment::new();
        app.engine().process_and_apply(&mut plain).unwrap();
        assert_eq!(plain.get("shared"), Some("base"));

        let mut dev = environment_with(&[("spring.profiles.active", "dev")]);
        app.engine().process_and_apply(&mut dev).unwrap();
        assert_eq!(dev.get("shared"), Some("dev-only"));
    }

    #[test]
    fn test_negated_on_profile_expression() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-profile: \"!prod\"\n",
                "debug-tools: enabled\n",
            ),
        );

        let mut plain = Environment::new();
        app.engine().process_and_apply(&mut plain).unwrap();
        assert_eq!(plain.get("debug-tools"), Some("enabled"));

        let mut prod = environment_with(&[("spring.profiles.active", "prod")]);
        app.engine().process_and_apply(&mut prod).unwrap();
        assert_eq!(prod.get("debug-tools"), None);
    }

    #[test]
    fn test_profile_keys_in_profile_specific_file_are_rejected() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: 1\n");
        app.write_classpath(
            "application-dev.yaml",
            "spring:\n  profiles:\n    active: hacked\n",
        );

        let mut environment = environment_with(&[("spring.profiles.active", "dev")]);
        let err = app
            .engine()
            .process_and_apply(&mut environment)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProperty { .. }));
    }

    #[test]
    fn test_default_profile_file_is_used_without_active_profiles() {
        let app = TestApp::new();
        app.write_classpath("application-default.yaml", "from-default: 1\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("from-default"), Some("1"));
        assert!(environment.active_profiles().is_empty());
        assert_eq!(environment.default_profiles(), ["default"]);
    }
}
