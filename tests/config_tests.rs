//! Tests for sanitizer configuration loading, overrides and validation.

use std::collections::HashMap;
use std::fs;

use dbscrub::config::{ENV_CACHE_CAPACITY, ENV_DIALECT, ENV_ENABLED, ENV_MAX_STATEMENT_LENGTH};
use dbscrub::{DbScrubError, SanitizerConfig, SqlDialect};
use tempfile::TempDir;

fn write_project_config(dir: &TempDir, yaml: &str) {
    let config_dir = dir.path().join(".dbscrub");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.yml"), yaml).unwrap();
}

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = SanitizerConfig::load_project(dir.path()).unwrap();
    assert_eq!(config, SanitizerConfig::default());
    assert!(config.enabled);
    assert_eq!(config.cache_capacity, 1000);
    assert_eq!(config.max_statement_length, 32 * 1024);
}

#[test]
fn project_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    write_project_config(
        &dir,
        "enabled: false\ncache_capacity: 16\nmax_statement_length: 2048\ndialect: double_quoted_identifiers\n",
    );
    let config = SanitizerConfig::load_project(dir.path()).unwrap();
    assert!(!config.enabled);
    assert_eq!(config.cache_capacity, 16);
    assert_eq!(config.max_statement_length, 2048);
    assert_eq!(config.dialect, SqlDialect::DoubleQuotedIdentifiers);
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    write_project_config(&dir, "cache_capacity: 5\n");
    let config = SanitizerConfig::load_project(dir.path()).unwrap();
    assert!(config.enabled);
    assert_eq!(config.cache_capacity, 5);
    assert_eq!(config.dialect, SqlDialect::DoubleQuotedStrings);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    write_project_config(&dir, "cache_capacity: [not, a, number]\n");
    let err = SanitizerConfig::load_project(dir.path()).unwrap_err();
    match err {
        DbScrubError::ConfigParse { path, .. } => {
            assert!(path.ends_with(".dbscrub/config.yml"));
        }
        other => panic!("expected ConfigParse, got {other:?}"),
    }
}

#[test]
fn load_from_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scrub.yml");
    fs::write(&path, "enabled: true\ncache_capacity: 0\n").unwrap();
    let config = SanitizerConfig::load_from(&path).unwrap();
    assert_eq!(config.cache_capacity, 0);
}

#[test]
fn load_prefers_project_file() {
    let dir = TempDir::new().unwrap();
    write_project_config(&dir, "cache_capacity: 7\nmax_statement_length: 128\n");
    let config = SanitizerConfig::load(dir.path()).unwrap();
    assert_eq!(config.max_statement_length, 128);
}

#[test]
fn load_rejects_zero_statement_length() {
    let dir = TempDir::new().unwrap();
    write_project_config(&dir, "max_statement_length: 0\n");
    let err = SanitizerConfig::load(dir.path()).unwrap_err();
    assert!(matches!(err, DbScrubError::InvalidConfig { .. }));
    assert!(err.to_string().contains("max_statement_length"));
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn overrides_replace_file_values() {
    let config = SanitizerConfig::default().with_overrides(lookup(&[
        (ENV_ENABLED, "off"),
        (ENV_CACHE_CAPACITY, " 42 "),
        (ENV_MAX_STATEMENT_LENGTH, "4096"),
        (ENV_DIALECT, "ansi"),
    ]));
    assert!(!config.enabled);
    assert_eq!(config.cache_capacity, 42);
    assert_eq!(config.max_statement_length, 4096);
    assert_eq!(config.dialect, SqlDialect::DoubleQuotedIdentifiers);
}

#[test]
fn invalid_overrides_are_ignored() {
    let config = SanitizerConfig::default().with_overrides(lookup(&[
        (ENV_ENABLED, "sometimes"),
        (ENV_CACHE_CAPACITY, "-1"),
        (ENV_MAX_STATEMENT_LENGTH, "lots"),
        (ENV_DIALECT, "oracle"),
    ]));
    assert_eq!(config, SanitizerConfig::default());
}

#[test]
fn no_overrides_is_identity() {
    let config = SanitizerConfig {
        cache_capacity: 3,
        ..SanitizerConfig::default()
    };
    assert_eq!(config.clone().with_overrides(|_| None), config);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn config_round_trips_through_yaml() {
    let config = SanitizerConfig {
        enabled: false,
        cache_capacity: 12,
        max_statement_length: 99,
        dialect: SqlDialect::DoubleQuotedIdentifiers,
    };
    let yaml = serde_yaml::to_string(&config).unwrap();
    assert!(yaml.contains("dialect: double_quoted_identifiers"));
    let back: SanitizerConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, config);
}

#[test]
fn statement_info_serializes_to_json() {
    let info = dbscrub::StatementSanitizer::default().sanitize("SELECT * FROM users WHERE id = 1");
    let json = serde_json::to_value(&*info).unwrap();
    assert_eq!(json["operation"], "SELECT");
    assert_eq!(json["table"], "users");
    assert_eq!(json["sanitized_text"], "SELECT * FROM users WHERE id = ?");
}
