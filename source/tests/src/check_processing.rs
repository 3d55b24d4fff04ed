#[cfg(test)]
mod tests {
    use crate::common::{environment_with, RecordingListener, TestApp};
    use samovar::{Environment, PropertySet, DEFAULT_PROPERTIES};

    #[test]
    fn test_sources_are_appended_in_notification_order() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            "spring:\n  config:\n    import: classpath:extra.yaml\n",
        );
        app.write_classpath("extra.yaml", "bar: x\n");
        app.write_classpath("application-dev.yaml", "from-dev: 1\n");

        let listener = RecordingListener::default();
        let added = listener.added.clone();
        let profiles = listener.profiles.clone();

        let mut environment = environment_with(&[("spring.profiles.active", "dev")]);
        app.engine()
            .with_listener(listener)
            .process_and_apply(&mut environment)
            .unwrap();

        let appended: Vec<String> = environment
            .sources()
            .iter()
            .map(|set| set.name().to_string())
            .filter(|name| name.starts_with("Config resource"))
            .collect();
        assert_eq!(*added.borrow(), appended);
        assert_eq!(*profiles.borrow(), vec![vec!["dev".to_string()]]);
    }

    #[test]
    fn test_multi_document_precedence_within_one_file() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: first\n---\nfoo: second\n");

        let mut environment = Environment::new();
        app.engine().process_and_apply(&mut environment).unwrap();

        // The last document in the file wins.
        assert_eq!(environment.get("foo"), Some("second"));
        assert_eq!(environment.sources().len(), 2);
        assert!(environment.sources()[0].name().ends_with("(document #0)"));
        assert!(environment.sources()[1].name().ends_with("(document #1)"));
    }

    #[test]
    fn test_one_file_reachable_via_two_locations_loads_once() {
        let app = TestApp::new();
        app.write_workdir("application.yaml", "foo: 1\n");

        let engine = samovar::ConfigDataEngine::new(
            samovar::StandardResourceLoader::with_working_dir(&app.workdir)
                .with_classpath_root(&app.workdir),
        );
        let mut environment = Environment::new();
        engine.process_and_apply(&mut environment).unwrap();

        // classpath:/ and file:./ both reach the same file.
        assert_eq!(environment.sources().len(), 1);
        assert_eq!(environment.get("foo"), Some("1"));
    }

    #[test]
    fn test_default_properties_stays_weakest() {
        let app = TestApp::new();
        app.write_classpath("application.yaml", "foo: loaded\n");

        let mut environment = Environment::new();
        environment.add_last(PropertySet::with_entries(
            DEFAULT_PROPERTIES,
            [("foo", "fallback"), ("only-default", "kept")],
        ));
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("foo"), Some("loaded"));
        assert_eq!(environment.get("only-default"), Some("kept"));
        assert_eq!(environment.sources()[0].name(), DEFAULT_PROPERTIES);
    }

    #[test]
    fn test_platform_gated_document_activates_on_kubernetes() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-cloud-platform: kubernetes\n",
                "in-cluster: 1\n",
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-cloud-platform: cloud-foundry\n",
                "in-cf: 1\n",
            ),
        );

        let mut environment = environment_with(&[
            ("KUBERNETES_SERVICE_HOST", "10.0.0.1"),
            ("KUBERNETES_SERVICE_PORT", "443"),
        ]);
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("in-cluster"), Some("1"));
        assert_eq!(environment.get("in-cf"), None);
    }

    #[test]
    fn test_forced_cloud_platform_property() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-cloud-platform: heroku\n",
                "dyno-tuning: 1\n",
            ),
        );

        let mut environment =
            environment_with(&[("spring.main.cloud-platform", "heroku")]);
        app.engine().process_and_apply(&mut environment).unwrap();

        assert_eq!(environment.get("dyno-tuning"), Some("1"));
    }

    #[test]
    fn test_platform_gated_import_is_expanded_in_the_second_phase() {
        let app = TestApp::new();
        app.write_classpath(
            "application.yaml",
            concat!(
                "---\n",
                "spring:\n",
                "  config:\n",
                "    activate:\n",
                "      on-cloud-platform: heroku\n",
                "    import: \"classpath:heroku.yaml\"\n",
            ),
        );
        app.write_classpath("heroku.yaml", "from-heroku: 1\n");

        let mut environment = environment_with(&[("DYNO", "web.1")]);
        app.engine().process_and_apply(&mut environment).unwrap();
        assert_eq!(environment.get("from-heroku"), Some("1"));

        // Without the platform the import is never followed.
        let mut plain = Environment::new();
        app.engine().process_and_apply(&mut plain).unwrap();
        assert_eq!(plain.get("from-heroku"), None);
    }
}
