//! Domain entities: catalog records in and out of the parser

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ast::PrereqNode;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::parse::ParseResult;

/// One catalog row as supplied by a loader.
///
/// Accepts the scraper's column names (`Code`, `Title`, `Prerequisites`)
/// as aliases. A missing or null requirement is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(alias = "Code")]
    pub code: String,
    #[serde(alias = "Title", default)]
    pub title: String,
    #[serde(
        alias = "Prerequisites",
        alias = "prerequisites",
        default,
        deserialize_with = "nullable_string"
    )]
    pub raw_prereq: String,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl CourseRecord {
    pub fn new(code: impl Into<String>, title: impl Into<String>, raw_prereq: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            raw_prereq: raw_prereq.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.code.trim().is_empty() {
            return Err(DomainError::InvalidRecord {
                code: self.code.clone(),
                reason: "empty course code".to_string(),
            });
        }
        Ok(())
    }
}

/// A catalog row with its parsed immediate prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCourse {
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub raw_prereq: String,
    #[serde(default)]
    pub parseable: bool,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub prereq: Option<PrereqNode>,
}

impl ParsedCourse {
    pub fn from_record(record: CourseRecord, parsed: ParseResult) -> Self {
        Self {
            code: record.code,
            title: record.title,
            raw_prereq: record.raw_prereq,
            parseable: parsed.parseable,
            notes: parsed.notes,
            prereq: parsed.ast,
        }
    }
}

/// Provenance stamped on every emitted listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMeta {
    /// Calendar date of the run, `YYYY-MM-DD`
    pub version: String,
    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`
    pub generated_at: String,
}

impl CatalogMeta {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            version: now.format("%Y-%m-%d").to_string(),
            generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}

/// Listing entry as written by the catalog command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub meta: CatalogMeta,
    pub course: ParsedCourse,
}

/// Listing entry as read: either the envelope form or a bare course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingEntry {
    Envelope(CatalogEntry),
    Bare(ParsedCourse),
}

impl ListingEntry {
    pub fn course(&self) -> &ParsedCourse {
        match self {
            ListingEntry::Envelope(entry) => &entry.course,
            ListingEntry::Bare(course) => course,
        }
    }

    pub fn into_course(self) -> ParsedCourse {
        match self {
            ListingEntry::Envelope(entry) => entry.course,
            ListingEntry::Bare(course) => course,
        }
    }

    /// Wrap as an envelope, stamping `meta` on bare courses.
    pub fn into_envelope(self, meta: &CatalogMeta) -> CatalogEntry {
        match self {
            ListingEntry::Envelope(entry) => entry,
            ListingEntry::Bare(course) => CatalogEntry {
                meta: meta.clone(),
                course,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_record_accepts_scraper_columns_and_null() {
        let record: CourseRecord = serde_json::from_value(json!({
            "Subject": "CSE",
            "Code": "CSE 100",
            "Title": "Advanced Data Structures",
            "Prerequisites": null
        }))
        .unwrap();
        assert_eq!(record, CourseRecord::new("CSE 100", "Advanced Data Structures", ""));
    }

    #[test]
    fn test_record_with_blank_code_is_invalid() {
        assert!(CourseRecord::new("  ", "x", "").validate().is_err());
        assert!(CourseRecord::new("CSE 12", "x", "").validate().is_ok());
    }

    #[test]
    fn test_meta_formats() {
        let meta = CatalogMeta::at(Utc.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap());
        assert_eq!(meta.version, "2026-03-09");
        assert_eq!(meta.generated_at, "2026-03-09T07:05:01Z");
    }

    #[test]
    fn test_listing_entry_reads_both_shapes() {
        let entries: Vec<ListingEntry> = serde_json::from_value(json!([
            {
                "meta": {"version": "2026-01-01", "generated_at": "2026-01-01T00:00:00Z"},
                "course": {"code": "CSE 12", "title": "Data Structures", "parseable": true,
                           "notes": [], "prereq": {"type": "COURSE", "course_id": "CSE 11"}}
            },
            {"code": "CSE 11", "title": "Intro", "prereq": null}
        ]))
        .unwrap();

        assert!(matches!(entries[0], ListingEntry::Envelope(_)));
        assert_eq!(entries[0].course().prereq, Some(PrereqNode::course("CSE 11")));
        assert!(matches!(entries[1], ListingEntry::Bare(_)));
        assert_eq!(entries[1].course().code, "CSE 11");
    }
}
