//! Catalog batch parsing service
//!
//! Turns loader rows into envelope entries carrying parsed prerequisites.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    CatalogEntry, CatalogMeta, CourseRecord, ParseResult, ParsedCourse, PrereqParser,
};

/// Counts over a parsed listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub parseable: usize,
    pub with_prereq: usize,
    pub with_notes: usize,
}

/// Service for parsing requirement strings, singly or per listing.
pub struct CatalogService {
    parser: PrereqParser,
    settings: Arc<Settings>,
}

impl CatalogService {
    /// Create a catalog service using the configured note vocabulary.
    pub fn new(settings: Arc<Settings>) -> Self {
        let parser = PrereqParser::with_phrases(settings.parser.note_phrases.iter().cloned());
        Self { parser, settings }
    }

    pub fn parse_text(&self, raw: &str) -> ParseResult {
        self.parser.parse(raw)
    }

    pub fn parse_record(&self, record: CourseRecord) -> ParsedCourse {
        let parsed = self.parser.parse(&record.raw_prereq);
        ParsedCourse::from_record(record, parsed)
    }

    /// Validate and parse every record, stamping each with `meta`.
    ///
    /// Output order equals input order. A record with an empty code rejects
    /// the whole batch before any parsing happens.
    #[instrument(level = "debug", skip_all, fields(count = records.len()))]
    pub fn parse_records(
        &self,
        records: Vec<CourseRecord>,
        meta: &CatalogMeta,
    ) -> ApplicationResult<Vec<CatalogEntry>> {
        for record in &records {
            record.validate()?;
        }

        let courses: Vec<ParsedCourse> = if self.settings.output.parallel {
            records
                .into_par_iter()
                .map(|record| self.parse_record(record))
                .collect()
        } else {
            records
                .into_iter()
                .map(|record| self.parse_record(record))
                .collect()
        };

        let entries: Vec<CatalogEntry> = courses
            .into_iter()
            .map(|course| CatalogEntry {
                meta: meta.clone(),
                course,
            })
            .collect();
        debug!("parse_records: {:?}", Self::summarize(&entries));
        Ok(entries)
    }

    pub fn summarize(entries: &[CatalogEntry]) -> CatalogSummary {
        entries.iter().fold(CatalogSummary::default(), |mut acc, entry| {
            acc.total += 1;
            acc.parseable += usize::from(entry.course.parseable);
            acc.with_prereq += usize::from(entry.course.prereq.is_some());
            acc.with_notes += usize::from(!entry.course.notes.is_empty());
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrereqNode;

    fn service(parallel: bool) -> CatalogService {
        let mut settings = Settings::default();
        settings.output.parallel = parallel;
        CatalogService::new(Arc::new(settings))
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let records: Vec<CourseRecord> = (1..=40)
            .map(|n| CourseRecord::new(format!("CSE {n}"), "t", format!("CSE {}", n + 100)))
            .collect();
        let meta = CatalogMeta::now();

        let sequential = service(false).parse_records(records.clone(), &meta).unwrap();
        let parallel = service(true).parse_records(records, &meta).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(parallel[0].course.prereq, Some(PrereqNode::course("CSE 101")));
    }

    #[test]
    fn test_blank_code_rejects_batch() {
        let records = vec![
            CourseRecord::new("CSE 12", "t", "CSE 11"),
            CourseRecord::new("", "t", "CSE 11"),
        ];
        assert!(service(false).parse_records(records, &CatalogMeta::now()).is_err());
    }
}
