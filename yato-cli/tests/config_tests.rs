// ABOUTME: Comprehensive tests for configuration file loading, validation, and merging
// ABOUTME: Tests TOML parsing, XDG path resolution, and hierarchical config merging

use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use yato_cli::config::Config;
use yato_images::RenderStrategy;

#[test]
fn test_config_deserialize_complete() {
    let toml_content = r#"
        cache_dir = "/var/cache/yato-covers"
        protocol = "sixel"
        fetch_timeout = "45s"
        max_palette = 128
        progress = false
    "#;

    let config: Config = toml::from_str(toml_content).expect("Should parse valid TOML");

    assert_eq!(
        config.cache_dir,
        Some(PathBuf::from("/var/cache/yato-covers"))
    );
    assert_eq!(config.render_strategy(), Some(RenderStrategy::SixelProtocol));
    assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(45)));
    assert_eq!(config.max_palette, Some(128));
    assert!(!config.show_progress());
}

#[test]
fn test_config_deserialize_empty() {
    let config: Config = toml::from_str("").expect("Should parse empty TOML");
    assert_eq!(config, Config::default());
    assert_eq!(config.fetch_timeout(), None);
}

#[test]
fn test_config_validation_errors() {
    let result: Result<Config, _> = toml::from_str(r#"protocol = "braille""#);
    assert!(result.is_err(), "Should reject unknown protocol");

    let result: Result<Config, _> = toml::from_str(r#"fetch_timeout = "soon""#);
    assert!(result.is_err(), "Should reject invalid duration");

    let result: Result<Config, _> = toml::from_str(r#"fetch_timeout = "xs""#);
    assert!(result.is_err(), "Should reject non-numeric duration");
}

#[test]
fn test_protocol_aliases_accepted() {
    for (value, expected) in [
        ("kitty", RenderStrategy::KittyProtocol),
        ("iterm", RenderStrategy::ITerm2Protocol),
        ("ASCII", RenderStrategy::AsciiFallback),
        ("none", RenderStrategy::None),
    ] {
        let config: Config = toml::from_str(&format!("protocol = \"{}\"", value)).unwrap();
        assert_eq!(config.render_strategy(), Some(expected), "{}", value);
    }
}

#[test]
fn test_config_load_hierarchy() {
    let temp_dir = TempDir::new().expect("Should create temp dir");
    let config_dir = temp_dir.path().join(".config").join("yato");
    std::fs::create_dir_all(&config_dir).expect("Should create config dir");

    let user_config_path = config_dir.join("images.toml");
    std::fs::write(
        &user_config_path,
        r#"
        protocol = "kitty"
        max_palette = 64
        fetch_timeout = "1m"
    "#,
    )
    .expect("Should write user config");

    let project_config_path = temp_dir.path().join("yato-images.toml");
    std::fs::write(
        &project_config_path,
        r#"
        protocol = "ascii"
        cache_dir = "covers"
    "#,
    )
    .expect("Should write project config");

    let config = Config::load_from_paths(&[
        user_config_path.to_str().unwrap(),
        project_config_path.to_str().unwrap(),
    ])
    .expect("Should load config hierarchy");

    // Project config should override user config
    assert_eq!(config.protocol, Some("ascii".to_string()));
    assert_eq!(config.cache_dir, Some(PathBuf::from("covers")));

    // User config values should be preserved when not overridden
    assert_eq!(config.max_palette, Some(64));
    assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(60)));
}

#[test]
fn test_missing_and_broken_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let broken = temp_dir.path().join("broken.toml");
    std::fs::write(&broken, "protocol = [").unwrap();
    let missing = temp_dir.path().join("missing.toml");

    let config =
        Config::load_from_paths(&[broken.to_str().unwrap(), missing.to_str().unwrap()]).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("images.toml");
    std::fs::write(&path, "max_palette = 0").unwrap();

    assert!(Config::load_from_file(&path).is_err());

    let err = Config::load_from_file(temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.toml"));
}

#[test]
fn test_config_xdg_paths() {
    let paths = Config::get_config_paths();

    // Should include project config as highest priority
    assert!(paths.iter().any(|p| p.ends_with("yato-images.toml")));

    // Should include a user-level config
    assert!(
        paths
            .iter()
            .any(|p| p.contains("yato") && p.ends_with("images.toml"))
    );
}

#[test]
fn test_config_error_messages() {
    let invalid_toml = r#"
        protocol = "kitty"
        [invalid
    "#;

    let result: Result<Config, _> = toml::from_str(invalid_toml);
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(
        error_msg.contains("TOML"),
        "Error should mention TOML format issue"
    );
}
