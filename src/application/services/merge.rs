//! Listing merge service
//!
//! Reconciles two independently sourced listings into one set keyed by
//! course code, folding remote-section variants into their in-person course.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::{extract_department, normalize, CatalogEntry};

pub struct MergeService {
    settings: Arc<Settings>,
}

impl MergeService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Merge `left` and `right`, sorted by code.
    ///
    /// Entries present in both come from `left`. Within one listing a later
    /// duplicate replaces an earlier one.
    #[instrument(level = "debug", skip_all, fields(left = left.len(), right = right.len()))]
    pub fn merge(&self, left: Vec<CatalogEntry>, right: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        let mut combined = Self::keyed(left);
        let right = Self::keyed(right);

        let common = right.keys().filter(|code| combined.contains_key(*code)).count();
        debug!(
            "merge: {} only left, {} only right, {} common",
            combined.len() - common,
            right.len() - common,
            common
        );

        for (code, entry) in right {
            combined.entry(code).or_insert(entry);
        }

        self.fold_remote_variants(&mut combined);
        combined.into_values().collect()
    }

    fn keyed(entries: Vec<CatalogEntry>) -> BTreeMap<String, CatalogEntry> {
        entries
            .into_iter()
            .map(|entry| (normalize(&entry.course.code), entry))
            .collect()
    }

    /// Counterpart code of a remote variant, if `code` is one.
    pub fn remote_counterpart(&self, code: &str) -> Option<String> {
        let merge = &self.settings.merge;
        if merge.remote_suffix.is_empty() {
            return None;
        }
        let base = code.strip_suffix(merge.remote_suffix.as_str())?;
        let department = extract_department(code)?;
        if merge
            .remote_exclusions
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(&department))
        {
            return None;
        }
        let base = normalize(base);
        (base != normalize(code)).then_some(base)
    }

    fn fold_remote_variants(&self, combined: &mut BTreeMap<String, CatalogEntry>) {
        let variants: Vec<(String, String)> = combined
            .keys()
            .filter_map(|code| {
                self.remote_counterpart(code)
                    .filter(|base| combined.contains_key(base))
                    .map(|base| (code.clone(), base))
            })
            .collect();

        for (variant, base) in variants {
            let Some(removed) = combined.remove(&variant) else {
                continue;
            };
            let Some(counterpart) = combined.get_mut(&base) else {
                continue;
            };
            debug!("merge: folding {} into {}", variant, base);

            let notes = &mut counterpart.course.notes;
            let seen: BTreeSet<String> = notes.iter().cloned().collect();
            let additions = std::iter::once(self.settings.merge.remote_note.clone())
                .chain(removed.course.notes)
                .filter(|note| !seen.contains(note))
                .unique()
                .collect_vec();
            notes.extend(additions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MergeService {
        MergeService::new(Arc::new(Settings::default()))
    }

    #[test]
    fn test_remote_counterpart() {
        let service = service();
        assert_eq!(service.remote_counterpart("CSE 8AR"), Some("CSE 8A".to_string()));
        assert_eq!(service.remote_counterpart("POLI 100R"), None);
        assert_eq!(service.remote_counterpart("CSE 8A"), None);
    }
}
