use docbase_sync::domain::SyncError;
use docbase_sync::infrastructure::{Config, ConfigStore, Settings, TomlConfigStore};
use docbase_sync::apply_settings;
use tempfile::TempDir;

#[test]
fn given_saved_credentials_when_loading_config_then_validates() {
    // Arrange
    let temp_dir = TempDir::new().unwrap();
    let store = TomlConfigStore::new(temp_dir.path().join("config.toml"));
    let mut config = Config::default();
    apply_settings(
        &mut config.docbase,
        Some("tok".to_string()),
        Some("acme".to_string()),
        None,
        None,
    )
    .unwrap();
    store.save(&config).unwrap();

    // Act
    let settings = store.load().unwrap().docbase;
    settings.validate().unwrap();

    // Assert
    assert_eq!(settings.team_id, "acme");
    assert_eq!(settings.access_token, "tok");
}

#[test]
fn given_no_config_file_when_validating_then_returns_config_error() {
    // Arrange
    let temp_dir = TempDir::new().unwrap();
    let store = TomlConfigStore::new(temp_dir.path().join("absent.toml"));

    // Act
    let result = store.load().unwrap().docbase.validate();

    // Assert
    assert!(matches!(result, Err(SyncError::Config(_))));
}

#[test]
fn given_existing_config_when_applying_partial_update_then_keeps_other_fields() {
    // Arrange
    let temp_dir = TempDir::new().unwrap();
    let store = TomlConfigStore::new(temp_dir.path().join("config.toml"));
    store
        .save(&Config {
            docbase: Settings {
                access_token: "old".to_string(),
                team_id: "acme".to_string(),
                ..Default::default()
            },
        })
        .unwrap();

    // Act
    let mut config = store.load().unwrap();
    apply_settings(&mut config.docbase, Some("new".to_string()), None, None, None).unwrap();
    store.save(&config).unwrap();

    // Assert
    let reloaded = store.load().unwrap().docbase;
    assert_eq!(reloaded.access_token, "new");
    assert_eq!(reloaded.team_id, "acme");
}

#[test]
fn given_stored_credentials_when_overriding_then_override_wins() {
    // Arrange
    let temp_dir = TempDir::new().unwrap();
    let store = TomlConfigStore::new(temp_dir.path().join("config.toml"));
    store
        .save(&Config {
            docbase: Settings {
                access_token: "stored".to_string(),
                team_id: "acme".to_string(),
                ..Default::default()
            },
        })
        .unwrap();

    // Act
    let settings = store
        .load()
        .unwrap()
        .docbase
        .with_overrides(Some("from-env".to_string()), None);

    // Assert
    assert_eq!(settings.access_token, "from-env");
    assert_eq!(settings.team_id, "acme");
    assert!(settings.validate().is_ok());
}
