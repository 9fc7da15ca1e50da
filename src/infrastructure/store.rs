//! JSON catalog store
//!
//! Loads loader rows and parsed listings, and writes JSON output through the
//! `FileSystem` boundary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::application::ApplicationError;
use crate::domain::{CourseRecord, ListingEntry, ParsedCourse};
use crate::infrastructure::error::{InfraError, InfraResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

pub struct CatalogStore {
    fs: Arc<dyn FileSystem>,
    pretty: bool,
}

impl CatalogStore {
    pub fn new(fs: Arc<dyn FileSystem>, pretty: bool) -> Self {
        Self { fs, pretty }
    }

    /// Load `{code, title, raw_prereq}` rows from a JSON array.
    pub fn load_records(&self, path: &Path) -> InfraResult<Vec<CourseRecord>> {
        self.read_json(path)
    }

    /// Load a listing from a JSON file, or from every `*.json` file under a
    /// directory (sorted by path, concatenated).
    #[instrument(level = "debug", skip(self))]
    pub fn load_listing(&self, path: &Path) -> InfraResult<Vec<ListingEntry>> {
        if !self.fs.is_dir(path) {
            return self.read_json(path);
        }

        let files = Self::json_files(path);
        if files.is_empty() {
            return Err(ApplicationError::invalid_listing(
                path.display().to_string(),
                "directory holds no .json files",
            )
            .into());
        }

        let mut entries = Vec::new();
        for file in &files {
            let mut part: Vec<ListingEntry> = self.read_json(file)?;
            debug!("load_listing: {} entries from {}", part.len(), file.display());
            entries.append(&mut part);
        }
        Ok(entries)
    }

    /// Courses of a listing, envelope or bare.
    pub fn load_courses(&self, path: &Path) -> InfraResult<Vec<ParsedCourse>> {
        Ok(self
            .load_listing(path)?
            .into_iter()
            .map(ListingEntry::into_course)
            .collect())
    }

    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> InfraResult<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(|e| InfraError::json("serialize output", e))
    }

    /// Write `value` as JSON, creating parent directories as needed.
    pub fn save<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> InfraResult<()> {
        let mut text = self.to_json(value)?;
        text.push('\n');
        self.fs
            .ensure_parent(path)
            .with_output_context("create directory for", path)?;
        self.fs.write(path, &text).with_output_context("write", path)?;
        debug!("save: wrote {}", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> InfraResult<T> {
        let text = self.fs.read_to_string(path).with_path_context("read", path)?;
        serde_json::from_str(&text).map_err(|e| InfraError::json(path.display().to_string(), e))
    }

    fn json_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        files
    }
}
