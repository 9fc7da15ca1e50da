//! Dependency tree service
//!
//! Builds the course table from a full listing and expands target courses
//! into transitive dependency trees.

use std::path::PathBuf;
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::config::Settings;
use crate::domain::{
    extract_department, normalize, CourseTable, DependencyExpander, DependencyNode, ParsedCourse,
};

/// Service for expanding courses against a whole listing.
pub struct DependencyService {
    settings: Arc<Settings>,
}

impl DependencyService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Freeze the full listing into a lookup table.
    #[instrument(level = "debug", skip_all, fields(courses = courses.len()))]
    pub fn build_table(&self, courses: &[ParsedCourse]) -> CourseTable {
        let table = CourseTable::from_courses(courses);
        let unknown = table.unknown_references();
        if !unknown.is_empty() {
            debug!(
                "build_table: {} referenced courses not in listing: {}",
                unknown.len(),
                unknown.iter().take(10).join(", ")
            );
        }
        table
    }

    /// Normalized codes of the courses to expand, in listing order without
    /// repeats. `department` restricts to courses of that department.
    pub fn target_codes(&self, courses: &[ParsedCourse], department: Option<&str>) -> Vec<String> {
        let department = department.map(|d| d.trim().to_uppercase());
        courses
            .iter()
            .filter(|course| match &department {
                Some(dept) => extract_department(&course.code).as_deref() == Some(dept.as_str()),
                None => true,
            })
            .map(|course| normalize(&course.code))
            .unique()
            .collect()
    }

    /// Expand every target course. The table is always built from the full
    /// listing so cross-department prerequisites resolve.
    #[instrument(level = "debug", skip(self, courses))]
    pub fn build_trees(
        &self,
        courses: &[ParsedCourse],
        department: Option<&str>,
    ) -> Vec<DependencyNode> {
        let table = self.build_table(courses);
        let targets = self.target_codes(courses, department);
        if targets.is_empty() {
            warn!("build_trees: no courses match department {:?}", department);
        }

        let expander = DependencyExpander::new(&table);
        let trees = if self.settings.output.parallel {
            expander.expand_all_parallel(&targets)
        } else {
            expander.expand_all(&targets)
        };
        debug!("build_trees: expanded {} roots", trees.len());
        trees
    }

    /// Expand a single course. Unknown courses come back as a childless root.
    pub fn build_tree(&self, courses: &[ParsedCourse], code: &str) -> DependencyNode {
        let table = self.build_table(courses);
        if !table.contains(code) {
            warn!("build_tree: {} is not in the listing", normalize(code));
        }
        DependencyExpander::new(&table).expand(code)
    }

    /// Default output file for a department's trees, when an output
    /// directory is configured.
    pub fn department_output_path(&self, department: &str) -> Option<PathBuf> {
        self.settings
            .output
            .dir
            .as_ref()
            .map(|dir| dir.join(format!("{}_tree.json", department.trim().to_uppercase())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrereqNode;

    fn course(code: &str, prereq: Option<PrereqNode>) -> ParsedCourse {
        ParsedCourse {
            code: code.to_string(),
            title: String::new(),
            raw_prereq: String::new(),
            parseable: prereq.is_some(),
            notes: vec![],
            prereq,
        }
    }

    #[test]
    fn test_target_codes_filters_department_and_dedupes() {
        let service = DependencyService::new(Arc::new(Settings::default()));
        let courses = vec![
            course("CSE 12", None),
            course("MATH 20A", None),
            course("cse 12", None),
            course("CSE 100", None),
        ];

        assert_eq!(service.target_codes(&courses, Some("cse")), vec!["CSE 12", "CSE 100"]);
        assert_eq!(service.target_codes(&courses, None).len(), 3);
    }

    #[test]
    fn test_department_output_path_requires_dir() {
        let mut settings = Settings::default();
        assert_eq!(
            DependencyService::new(Arc::new(settings.clone())).department_output_path("CSE"),
            None
        );

        settings.output.dir = Some(PathBuf::from("/tmp/trees"));
        assert_eq!(
            DependencyService::new(Arc::new(settings)).department_output_path("cse"),
            Some(PathBuf::from("/tmp/trees/CSE_tree.json"))
        );
    }
}
