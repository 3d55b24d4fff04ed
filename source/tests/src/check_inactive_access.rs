#[cfg(test)]
mod tests {
    use crate::common::TestApp;
    use samovar::{ConfigError, Environment};

    #[test]
    fn test_placeholder_resolving_only_in_an_inactive_document_fails() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "spring:\n",
                "  profiles:\n",
                "    include: \"${infra-profile}\"\n",
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-profile: prod\n",
                "infra-profile: metrics\n",
            ),
        );

        let mut environment = Environment::new();
        let err = app
            .engine()
            .process_and_apply(&mut environment)
            .unwrap_err();
        match err {
            ConfigError::InactiveAccess { key, .. } => {
                assert_eq!(key, "infra-profile");
            }
            other => panic!("expected InactiveAccess, got: {other:?}"),
        }
    }

    #[test]
    fn test_profile_keys_declared_in_an_inactive_document_fail() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "foo: 1\n",
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-profile: prod\n",
                "  profiles:\n",
                "    active: sneaky\n",
            ),
        );

        let mut environment = Environment::new();
        let err = app
            .engine()
            .process_and_apply(&mut environment)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InactiveAccess { .. }));
    }

    #[test]
    fn test_placeholder_resolving_in_an_active_document_is_fine() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "spring:\n",
                "  profiles:\n",
                "    include: \"${infra-profile}\"\n",
                "---\n",
                "infra-profile: metrics\n",
            ),
        );

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.active_profiles(), ["metrics"]);
    }
}
