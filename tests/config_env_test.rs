//! Environment variable overrides for Settings.
//!
//! Kept in its own test binary: it mutates the process environment.

use tempfile::TempDir;

use prereqs::config::Settings;

#[test]
fn given_env_vars_when_load_then_replace_config_values() {
    // Arrange
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join(".prereqs.toml"),
        "[merge]\nremote_exclusions = [\"MUS\"]\n",
    )
    .unwrap();
    std::env::set_var("PREREQS_MERGE__REMOTE_EXCLUSIONS", "POLI,LIGN");
    std::env::set_var("PREREQS_OUTPUT__PRETTY", "false");
    std::env::set_var("PREREQS_PARSER__NOTE_PHRASES", "foo,baz");

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(
        settings.merge.remote_exclusions,
        vec!["POLI".to_string(), "LIGN".to_string()]
    );
    assert!(!settings.output.pretty);
    assert_eq!(
        settings.parser.note_phrases,
        vec!["foo".to_string(), "baz".to_string()]
    );

    std::env::remove_var("PREREQS_MERGE__REMOTE_EXCLUSIONS");
    std::env::remove_var("PREREQS_OUTPUT__PRETTY");
    std::env::remove_var("PREREQS_PARSER__NOTE_PHRASES");
}
