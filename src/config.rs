//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/prereqs/prereqs.toml`
//! 3. Local config: `<project_dir>/.prereqs.toml`
//! 4. Environment variables: `PREREQS_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_NOTE_PHRASES;

/// Requirement-text parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Phrases pulled out of requirement text into notes
    pub note_phrases: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            note_phrases: DEFAULT_NOTE_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Listing merge settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MergeConfig {
    /// Code suffix marking a remote section (e.g. `CSE 8AR`)
    pub remote_suffix: String,
    /// Departments whose codes legitimately end in the suffix
    pub remote_exclusions: Vec<String>,
    /// Note attached to the in-person course when a remote variant is folded in
    pub remote_note: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            remote_suffix: "R".into(),
            remote_exclusions: vec!["POLI".into()],
            remote_note: "Remote course also offered".into(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON
    pub pretty: bool,
    /// Expand independent roots on the rayon pool
    pub parallel: bool,
    /// Default directory for per-department tree files
    pub dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            parallel: true,
            dir: None,
        }
    }
}

/// Raw parser config for intermediate parsing (arrays are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawParserConfig {
    pub note_phrases: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMergeConfig {
    pub remote_suffix: Option<String>,
    pub remote_exclusions: Option<Vec<String>>,
    pub remote_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub pretty: Option<bool>,
    pub parallel: Option<bool>,
    pub dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub parser: RawParserConfig,
    pub merge: RawMergeConfig,
    pub output: RawOutputConfig,
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
/// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for pattern in overlay {
        if let Some(negated) = pattern.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(pattern.clone());
        }
    }

    // Sorted for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

fn union(base: &[String], overlay: &Option<Vec<String>>) -> Vec<String> {
    overlay
        .as_ref()
        .map(|o| merge_array(base, o))
        .unwrap_or_else(|| base.to_vec())
}

fn replace(base: &[String], overlay: &Option<Vec<String>>) -> Vec<String> {
    overlay.clone().unwrap_or_else(|| base.to_vec())
}

/// Unified configuration for prereqs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub parser: ParserConfig,
    pub merge: MergeConfig,
    pub output: OutputConfig,
}

/// Get the XDG config directory for prereqs.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "prereqs").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("prereqs.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".prereqs.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in the output directory.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.output.dir {
            let raw = dir.to_string_lossy();
            let expanded = shellexpand::full(&raw)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            self.output.dir = Some(PathBuf::from(expanded));
        }
    }

    /// Local layer: scalars override, arrays UNION with `!` negation.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            parser: ParserConfig {
                note_phrases: union(&self.parser.note_phrases, &overlay.parser.note_phrases),
            },
            merge: MergeConfig {
                remote_suffix: overlay
                    .merge
                    .remote_suffix
                    .clone()
                    .unwrap_or_else(|| self.merge.remote_suffix.clone()),
                remote_exclusions: union(
                    &self.merge.remote_exclusions,
                    &overlay.merge.remote_exclusions,
                ),
                remote_note: overlay
                    .merge
                    .remote_note
                    .clone()
                    .unwrap_or_else(|| self.merge.remote_note.clone()),
            },
            output: self.merge_output(&overlay.output),
        }
    }

    /// Global layer: scalars override, arrays REPLACE the defaults.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            parser: ParserConfig {
                note_phrases: replace(&self.parser.note_phrases, &global.parser.note_phrases),
            },
            merge: MergeConfig {
                remote_suffix: global
                    .merge
                    .remote_suffix
                    .clone()
                    .unwrap_or_else(|| self.merge.remote_suffix.clone()),
                remote_exclusions: replace(
                    &self.merge.remote_exclusions,
                    &global.merge.remote_exclusions,
                ),
                remote_note: global
                    .merge
                    .remote_note
                    .clone()
                    .unwrap_or_else(|| self.merge.remote_note.clone()),
            },
            output: self.merge_output(&global.output),
        }
    }

    fn merge_output(&self, overlay: &RawOutputConfig) -> OutputConfig {
        OutputConfig {
            pretty: overlay.pretty.unwrap_or(self.output.pretty),
            parallel: overlay.parallel.unwrap_or(self.output.parallel),
            dir: overlay.dir.clone().or_else(|| self.output.dir.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply PREREQS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("PREREQS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("parser.note_phrases")
                .with_list_parse_key("merge.remote_exclusions"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<String>>("parser.note_phrases") {
            settings.parser.note_phrases = val;
        }
        if let Ok(val) = config.get_string("merge.remote_suffix") {
            settings.merge.remote_suffix = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("merge.remote_exclusions") {
            settings.merge.remote_exclusions = val;
        }
        if let Ok(val) = config.get_string("merge.remote_note") {
            settings.merge.remote_note = val;
        }
        if let Ok(val) = config.get_bool("output.pretty") {
            settings.output.pretty = val;
        }
        if let Ok(val) = config.get_bool("output.parallel") {
            settings.output.parallel = val;
        }
        if let Ok(val) = config.get_string("output.dir") {
            settings.output.dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# prereqs configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/prereqs/prereqs.toml  (defines your baseline)
#   Local:  <project_dir>/.prereqs.toml     (project-specific additions)
#   Env:    PREREQS_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!item" in local config to REMOVE an inherited item:
#     note_phrases = ["restricted to majors", "!department stamp"]

[parser]
# Phrases moved out of the requirement text into notes
# note_phrases = ["graduate standing", "consent of instructor"]

[merge]
# Code suffix marking a remote section
# remote_suffix = "R"

# Departments whose codes legitimately end in the suffix
# remote_exclusions = ["POLI"]

# remote_note = "Remote course also offered"

[output]
# pretty = true
# parallel = true

# Default directory for `tree --dept` output
# dir = "~/prereqs"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_default_settings_then_has_expected_values() {
        let settings = Settings::default();
        assert_eq!(settings.parser.note_phrases.len(), DEFAULT_NOTE_PHRASES.len());
        assert_eq!(settings.merge.remote_suffix, "R");
        assert_eq!(settings.merge.remote_exclusions, strings(&["POLI"]));
        assert!(settings.output.pretty);
        assert_eq!(settings.output.dir, None);
    }

    #[test]
    fn given_tilde_in_output_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.output.dir = Some(PathBuf::from("~/prereqs"));

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.output.dir.expect("dir kept");
        assert!(dir.to_string_lossy().starts_with(&home));
        assert!(!dir.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_merge_array_union() {
        let result = merge_array(&strings(&["a", "b"]), &strings(&["c"]));
        assert_eq!(result, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_array_negation() {
        let result = merge_array(&strings(&["a", "b"]), &strings(&["!a", "c"]));
        assert_eq!(result, strings(&["b", "c"]));
    }

    #[test]
    fn test_merge_array_negation_nonexistent() {
        let result = merge_array(&strings(&["a", "b"]), &strings(&["!x"]));
        assert_eq!(result, strings(&["a", "b"]));
    }

    #[test]
    fn test_merge_array_duplicates() {
        let result = merge_array(&strings(&["a", "b"]), &strings(&["a", "c"]));
        assert_eq!(result, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_apply_global_replaces_arrays() {
        let base = Settings::default();
        let global = RawSettings {
            merge: RawMergeConfig {
                remote_exclusions: Some(strings(&["POLI", "MUS"])),
                remote_note: Some("Online section".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let result = base.apply_global(&global);

        assert_eq!(result.merge.remote_exclusions, strings(&["POLI", "MUS"]));
        assert_eq!(result.merge.remote_note, "Online section");
        assert_eq!(result.merge.remote_suffix, "R");
        assert_eq!(result.parser, base.parser);
    }

    #[test]
    fn test_merge_with_unions_arrays_and_overrides_scalars() {
        let base = Settings::default();
        let local = RawSettings {
            parser: RawParserConfig {
                note_phrases: Some(strings(&["restricted to majors", "!department stamp"])),
            },
            output: RawOutputConfig {
                pretty: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };

        let result = base.merge_with(&local);

        assert!(result.parser.note_phrases.contains(&"restricted to majors".to_string()));
        assert!(result.parser.note_phrases.contains(&"graduate standing".to_string()));
        assert!(!result.parser.note_phrases.contains(&"department stamp".to_string()));
        assert!(!result.output.pretty);
        assert!(result.output.parallel);
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().expect("serialize");
        let back: Settings = toml::from_str(&text).expect("parse");
        assert_eq!(back, settings);
    }
}
