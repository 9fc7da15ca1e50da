//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION with negation support
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use prereqs::config::{local_config_path, Settings};

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.merge.remote_suffix, "R");
    assert!(settings
        .parser
        .note_phrases
        .contains(&"consent of instructor".to_string()));
}

#[test]
fn given_local_config_with_phrases_when_load_then_unions_with_current() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
[parser]
note_phrases = ["restricted to majors", "!department stamp"]
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    let phrases = &settings.parser.note_phrases;
    assert!(phrases.contains(&"restricted to majors".to_string()));
    assert!(phrases.contains(&"graduate standing".to_string()));
    assert!(
        !phrases.contains(&"department stamp".to_string()),
        "'department stamp' should be removed by negation"
    );
    assert_eq!(phrases.len(), 9);
}

#[test]
fn given_local_config_with_scalars_when_load_then_overrides_scalars() {
    // Arrange
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
[merge]
remote_note = "Online section available"

[output]
dir = "~/prereq-trees"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.merge.remote_note, "Online section available");
    assert_eq!(settings.merge.remote_exclusions, vec!["POLI".to_string()]);
    let home = std::env::var("HOME").expect("HOME should be set");
    assert_eq!(
        settings.output.dir,
        Some(PathBuf::from(format!("{home}/prereq-trees")))
    );
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "[parser\nnote_phrases = 1").unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(matches!(
        result,
        Err(prereqs::application::ApplicationError::Config { .. })
    ));
}

#[test]
fn given_template_when_parsed_then_is_valid_config() {
    let settings: Settings = toml::from_str(&Settings::template()).expect("template parses");
    assert_eq!(settings, Settings::default());
}
