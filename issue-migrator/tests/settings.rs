use std::path::PathBuf;
use std::time::Duration;

use issue_migrator::{load_settings, ConfigError, RepoRef, RunnerConfig, Settings};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/settings")
        .join(name)
}

#[test]
fn resolves_full_settings_fixture() {
    let settings = load_settings(&fixture("full.toml"), Settings::default()).unwrap();
    let config = RunnerConfig::from_settings(settings).unwrap();

    assert_eq!(config.source(), &RepoRef::new("octo", "source"));
    assert_eq!(config.target(), &RepoRef::new("octo", "target"));
    assert_eq!(config.token(), "ghp_fixture");
    assert_eq!(config.policy().pacing, Duration::from_millis(500));
    assert_eq!(config.policy().secondary_base, Duration::from_secs(30));
    assert_eq!(config.policy().max_secondary_retries, 3);
    assert_eq!(config.policy().max_wait, Duration::from_secs(600));
    assert_eq!(
        config.attribution_format(),
        Some("_{{author}} wrote on {{date}}:_")
    );
}

#[test]
fn token_comes_from_local_overlay() {
    let settings = load_settings(&fixture("minimal.toml"), Settings::default()).unwrap();
    let config = RunnerConfig::from_settings(settings).unwrap();

    assert_eq!(config.token(), "ghp_local");
    assert_eq!(config.attribution_format(), None);
}

#[test]
fn command_line_overrides_win() {
    let overrides = Settings {
        target_repo: Some("octo/elsewhere".to_string()),
        token: Some("ghp_cli".to_string()),
        ..Default::default()
    };
    let settings = load_settings(&fixture("minimal.toml"), overrides).unwrap();
    let config = RunnerConfig::from_settings(settings).unwrap();

    assert_eq!(config.target(), &RepoRef::new("octo", "elsewhere"));
    assert_eq!(config.token(), "ghp_cli");
}

#[test]
fn rejects_unknown_keys() {
    let result = load_settings(&fixture("unknown-key.toml"), Settings::default());
    assert!(matches!(result, Err(ConfigError::TomlError { .. })));
}

#[test]
fn rejects_identical_repositories() {
    let settings = load_settings(&fixture("same-repo.toml"), Settings::default()).unwrap();
    let result = RunnerConfig::from_settings(settings);

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn missing_file_is_reported() {
    let result = load_settings(&fixture("absent.toml"), Settings::default());
    assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
}
