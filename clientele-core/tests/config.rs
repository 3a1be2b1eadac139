use clientele_core::config::{ClienteleConfig, ConfigError, ConfigProperties, ConfigValue};
use clientele_core::{LogFormat, LogSettings};
use serial_test::serial;

#[test]
fn test_empty_config() {
    let config = ClienteleConfig::empty();
    assert!(matches!(
        config.get::<String>("nonexistent"),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_set_and_get() {
    let mut config = ClienteleConfig::empty();
    config.set("clientele.store.url", ConfigValue::String("sqlite::memory:".into()));
    assert_eq!(
        config.get::<String>("clientele.store.url").unwrap(),
        "sqlite::memory:"
    );
}

#[test]
fn test_get_or_default() {
    let config = ClienteleConfig::empty();
    assert_eq!(config.get_or("missing", 42i64), 42);
}

#[test]
fn test_get_opt_rejects_malformed_value() {
    let mut config = ClienteleConfig::empty();
    config.set("pool", ConfigValue::String("many".into()));
    assert!(config.get_opt::<u32>("pool").is_err());
    assert_eq!(config.get_opt::<u32>("absent").unwrap(), None);
}

#[test]
fn test_flatten_yaml() {
    let yaml = r#"
clientele:
  store:
    backend: sqlite
    url: "sqlite::memory:"
    max-connections: 3
"#;
    let config = ClienteleConfig::from_yaml_str(yaml, "test").unwrap();

    assert_eq!(config.get::<String>("clientele.store.backend").unwrap(), "sqlite");
    assert_eq!(config.get::<u32>("clientele.store.max-connections").unwrap(), 3);
    // environment spelling resolves to the same key
    assert_eq!(config.get::<u32>("clientele.store.max_connections").unwrap(), 3);
}

#[test]
fn test_list_config() {
    let yaml = r#"
clientele:
  tags:
    - "retail"
    - "wholesale"
"#;
    let config = ClienteleConfig::from_yaml_str(yaml, "test").unwrap();
    let tags: Vec<String> = config.get("clientele.tags").unwrap();
    assert_eq!(tags, vec!["retail", "wholesale"]);
    assert_eq!(config.get::<String>("clientele.tags.1").unwrap(), "wholesale");
}

#[test]
fn test_invalid_yaml_is_load_error() {
    let err = ClienteleConfig::from_yaml_str("clientele: [unclosed", "test").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_log_settings_defaults() {
    let config = ClienteleConfig::empty().with_typed::<LogSettings>().unwrap();
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.filter, "info");
}

#[test]
fn test_log_settings_from_yaml() {
    let yaml = r#"
clientele:
  log:
    format: json
    filter: "debug,sqlx=warn"
"#;
    let settings =
        LogSettings::from_config(&ClienteleConfig::from_yaml_str(yaml, "test").unwrap()).unwrap();
    assert_eq!(settings.format, LogFormat::Json);
    assert_eq!(settings.filter, "debug,sqlx=warn");
}

#[test]
fn test_log_settings_rejects_unknown_format() {
    let yaml = "clientele:\n  log:\n    format: xml\n";
    let err = LogSettings::from_config(&ClienteleConfig::from_yaml_str(yaml, "test").unwrap())
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "clientele.log.format"));
}

#[test]
#[serial]
fn test_load_from_dir_with_profile_override() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("clientele.yaml"),
        "clientele:\n  store:\n    backend: memory\n    max-connections: 2\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("clientele-prod.yaml"),
        "clientele:\n  store:\n    backend: sqlite\n",
    )
    .unwrap();

    std::env::remove_var("CLIENTELE_PROFILE");
    let config = ClienteleConfig::load_from_dir(dir.path(), "prod").unwrap();

    assert_eq!(config.profile(), "prod");
    assert_eq!(config.get::<String>("clientele.store.backend").unwrap(), "sqlite");
    assert_eq!(config.get::<i64>("clientele.store.max-connections").unwrap(), 2);
}

#[test]
#[serial]
fn test_env_overrides_file_value() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("clientele.yaml"),
        "clientele:\n  store:\n    missing-id: error\n",
    )
    .unwrap();

    std::env::set_var("CLIENTELE_STORE_MISSING_ID", "ignore");
    let config = ClienteleConfig::load_from_dir(dir.path(), "dev");
    std::env::remove_var("CLIENTELE_STORE_MISSING_ID");

    let config = config.unwrap();
    assert_eq!(config.get::<String>("clientele.store.missing-id").unwrap(), "ignore");
}

#[test]
#[serial]
fn test_missing_files_yield_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClienteleConfig::load_from_dir(dir.path(), "dev").unwrap();
    assert!(!config.contains_key("clientele.store.backend"));
}
