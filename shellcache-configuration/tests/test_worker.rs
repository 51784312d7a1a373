use pretty_assertions::assert_eq;
use shellcache::{AssetMatch, DEFAULT_EXTENSIONS, NavigationStrategy, PolicyConfig};
use shellcache_configuration::{ConfigError, ConfigWorker};

#[test]
fn test_minimal_worker_deserialize() {
    let yaml = r#"
origin: "http://localhost:3000"
cache_name: portfolio-v1
"#;

    let worker = ConfigWorker::from_yaml(yaml).expect("failed to deserialize");

    assert_eq!(worker.origin, "http://localhost:3000");
    assert_eq!(worker.cache_name, "portfolio-v1");
    assert!(worker.manifest.is_empty());
    assert_eq!(worker.extensions, None);
    assert!(!worker.skip_waiting);
    assert_eq!(worker.policy, PolicyConfig::advanced());
}

#[test]
fn test_full_worker_into_config() {
    let yaml = r#"
origin: "https://portfolio.example"
cache_name: portfolio-v2
manifest:
  - /
  - /index.html
  - /index.html
extensions: [".JS", css, css]
skip_waiting: true
policy:
  assets: ExtensionsOrSameOrigin
  navigation: CacheFirst
  offline_fallback: /index.html
"#;

    let config = ConfigWorker::from_yaml(yaml)
        .expect("failed to deserialize")
        .into_config()
        .expect("failed to validate");

    assert_eq!(config.origin().to_string(), "https://portfolio.example");
    assert_eq!(config.cache_name().as_str(), "portfolio-v2");
    assert_eq!(config.manifest().iter().collect::<Vec<_>>(), vec!["/", "/index.html"]);
    assert_eq!(config.extensions(), ["js", "css"]);
    assert!(config.skip_waiting());
    assert_eq!(config.policy(), &PolicyConfig::simple("/index.html"));
    assert_eq!(config.policy().assets, AssetMatch::ExtensionsOrSameOrigin);
    assert_eq!(config.policy().navigation, NavigationStrategy::CacheFirst);
}

#[test]
fn test_default_extensions_when_absent() {
    let config = ConfigWorker::from_yaml("origin: \"http://localhost\"\ncache_name: v1\n")
        .unwrap()
        .into_config()
        .unwrap();

    assert_eq!(config.extensions().len(), DEFAULT_EXTENSIONS.len());
    assert!(config.allows_extension("woff2"));
}

#[test]
fn test_cross_origin_manifest_entries_are_accepted() {
    let yaml = r#"
origin: "http://localhost:3000"
cache_name: v1
manifest: ["/", "https://fonts.example/inter.woff2"]
"#;

    let config = ConfigWorker::from_yaml(yaml).unwrap().into_config().unwrap();
    assert_eq!(config.manifest().len(), 2);
}

#[test]
fn test_invalid_origin() {
    let yaml = "origin: \"/relative\"\ncache_name: v1\n";

    let error = ConfigWorker::from_yaml(yaml).unwrap().into_config().unwrap_err();
    assert!(matches!(error, ConfigError::InvalidOrigin { .. }), "{error}");
}

#[test]
fn test_blank_cache_name() {
    let yaml = "origin: \"http://localhost\"\ncache_name: \"  \"\n";

    let error = ConfigWorker::from_yaml(yaml).unwrap().into_config().unwrap_err();
    assert!(matches!(error, ConfigError::EmptyCacheName));
}

#[test]
fn test_relative_manifest_url() {
    let yaml = r#"
origin: "http://localhost"
cache_name: v1
manifest: ["/", "styles.css"]
"#;

    let error = ConfigWorker::from_yaml(yaml).unwrap().into_config().unwrap_err();
    match error {
        ConfigError::InvalidManifestUrl { url, .. } => assert_eq!(url, "styles.css"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_extension() {
    let yaml = r#"
origin: "http://localhost"
cache_name: v1
extensions: [js, "tar.gz"]
"#;

    let error = ConfigWorker::from_yaml(yaml).unwrap().into_config().unwrap_err();
    match error {
        ConfigError::InvalidExtension(extension) => assert_eq!(extension, "tar.gz"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_fallback_must_be_precached() {
    let yaml = r#"
origin: "http://localhost"
cache_name: v1
manifest: ["/"]
policy:
  offline_fallback: /index.html
"#;

    let error = ConfigWorker::from_yaml(yaml).unwrap().into_config().unwrap_err();
    match error {
        ConfigError::FallbackNotPrecached(shell) => assert_eq!(shell, "/index.html"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_field_is_rejected() {
    let yaml = "origin: \"http://localhost\"\ncache_name: v1\nttl: 60s\n";

    let error = ConfigWorker::from_yaml(yaml).unwrap_err();
    assert!(matches!(error, ConfigError::Yaml(_)));
}

#[test]
fn test_worker_serialization_roundtrip() {
    let worker = ConfigWorker {
        origin: "http://localhost:3000".into(),
        cache_name: "portfolio-v1".into(),
        manifest: vec!["/".into(), "/index.html".into()],
        extensions: Some(vec!["js".into()]),
        skip_waiting: true,
        policy: PolicyConfig::simple("/"),
    };

    let yaml = serde_saphyr::to_string(&worker).expect("failed to serialize");
    let deserialized = ConfigWorker::from_yaml(&yaml).expect("failed to deserialize");

    assert_eq!(worker, deserialized);
}
