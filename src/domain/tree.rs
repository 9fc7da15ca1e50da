//! Transitive dependency trees.
//!
//! Every course reference in an immediate prerequisite tree is replaced by a
//! node carrying that course's own prerequisites, recursively, until a course
//! without prerequisites or a repeat on the current root-to-leaf path.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::ast::PrereqNode;
use crate::domain::code::normalize;
use crate::domain::entities::ParsedCourse;

/// Code of the synthetic node grouping alternatives.
pub const OR_GROUP: &str = "OR";
/// Code of the synthetic node grouping a conjunction nested in alternatives.
pub const AND_GROUP: &str = "AND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Root,
    Child,
}

/// Why a course node has no children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// No prerequisites, or not in the table
    Leaf,
    /// Already on the current expansion path
    CycleStop,
}

/// Node of an expanded dependency tree.
///
/// Serializes as `{"code": .., "type": "ROOT" | "CHILD", "children": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<DependencyNode>,
    #[serde(skip)]
    pub terminal: Option<Terminal>,
}

impl DependencyNode {
    pub fn root(code: impl Into<String>, children: Vec<DependencyNode>) -> Self {
        Self {
            code: code.into(),
            kind: NodeKind::Root,
            children,
            terminal: None,
        }
    }

    pub fn child(code: impl Into<String>, children: Vec<DependencyNode>) -> Self {
        Self {
            code: code.into(),
            kind: NodeKind::Child,
            children,
            terminal: None,
        }
    }

    fn terminal(code: impl Into<String>, terminal: Terminal) -> Self {
        Self {
            terminal: Some(terminal),
            ..Self::child(code, Vec::new())
        }
    }

    /// Synthetic OR/AND grouping node rather than a course.
    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Child && (self.code == OR_GROUP || self.code == AND_GROUP)
    }

    pub fn is_cycle_stop(&self) -> bool {
        self.terminal == Some(Terminal::CycleStop)
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DependencyNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Codes of all childless course nodes, left to right.
    pub fn leaf_codes(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut Vec<String>) {
        if self.children.is_empty() {
            if !self.is_group() {
                leaves.push(self.code.clone());
            }
        } else {
            for child in &self.children {
                child.collect_leaves(leaves);
            }
        }
    }

    /// Number of course nodes below this one, grouping nodes excluded.
    pub fn course_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.course_count() + usize::from(!child.is_group()))
            .sum()
    }
}

/// Course code to immediate prerequisites, frozen before expansion.
#[derive(Debug, Default, Clone)]
pub struct CourseTable {
    entries: HashMap<String, Option<PrereqNode>>,
}

impl CourseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a full listing. Codes are normalized; a later duplicate
    /// replaces an earlier one.
    pub fn from_courses<'a>(courses: impl IntoIterator<Item = &'a ParsedCourse>) -> Self {
        let mut table = Self::new();
        for course in courses {
            table.insert(&course.code, course.prereq.clone());
        }
        table
    }

    pub fn insert(&mut self, code: &str, prereq: Option<PrereqNode>) {
        let code = normalize(code);
        if self.entries.contains_key(&code) {
            debug!("course table: duplicate {}, keeping last", code);
        }
        self.entries
            .insert(code, prereq.and_then(PrereqNode::normalized));
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(&normalize(code))
    }

    pub fn prerequisites(&self, code: &str) -> Option<&PrereqNode> {
        self.entries.get(code).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Referenced course codes missing from the table, sorted.
    pub fn unknown_references(&self) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .entries
            .values()
            .flatten()
            .flat_map(|ast| ast.courses())
            .map(normalize)
            .filter(|code| !self.entries.contains_key(code))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        unknown.sort();
        unknown
    }
}

/// Expands courses against a read-only table.
///
/// The visited set holds the courses currently being expanded on the
/// root-to-leaf path (Expanding). A course leaves the set once its subtree
/// is done (Expanded), so siblings never see each other's visits. Meeting a
/// course that is still Expanding yields a childless CycleStop node.
pub struct DependencyExpander<'t> {
    table: &'t CourseTable,
}

impl<'t> DependencyExpander<'t> {
    pub fn new(table: &'t CourseTable) -> Self {
        Self { table }
    }

    /// Full tree rooted at `code`. Unknown courses yield a childless root.
    #[instrument(level = "trace", skip(self))]
    pub fn expand(&self, code: &str) -> DependencyNode {
        let code = normalize(code);
        let mut path = HashSet::new();
        path.insert(code.clone());

        let children = match self.table.prerequisites(&code) {
            Some(ast) => self.expand_requirement(ast, &mut path),
            None => Vec::new(),
        };
        DependencyNode::root(code, children)
    }

    /// Expand many roots. Each root gets its own path; output order matches
    /// input order.
    pub fn expand_all(&self, codes: &[String]) -> Vec<DependencyNode> {
        codes.iter().map(|code| self.expand(code)).collect()
    }

    /// Same as [`expand_all`](Self::expand_all), spread across the rayon pool.
    pub fn expand_all_parallel(&self, codes: &[String]) -> Vec<DependencyNode> {
        codes.par_iter().map(|code| self.expand(code)).collect()
    }

    /// Children contributed by one requirement. A conjunction flattens into
    /// its parent; alternatives become one synthetic OR node.
    fn expand_requirement(
        &self,
        ast: &PrereqNode,
        path: &mut HashSet<String>,
    ) -> Vec<DependencyNode> {
        match ast {
            PrereqNode::Course { course_id } => vec![self.expand_course(course_id, path)],
            PrereqNode::And { items } => {
                let mut children = Vec::new();
                for item in items {
                    children.extend(self.expand_requirement(item, path));
                }
                children
            }
            PrereqNode::Or { .. } => vec![self.expand_alternative(ast, path)],
        }
    }

    fn expand_alternative(&self, ast: &PrereqNode, path: &mut HashSet<String>) -> DependencyNode {
        match ast {
            PrereqNode::Course { course_id } => self.expand_course(course_id, path),
            PrereqNode::Or { items } => DependencyNode::child(
                OR_GROUP,
                items
                    .iter()
                    .map(|item| self.expand_alternative(item, path))
                    .collect(),
            ),
            PrereqNode::And { .. } => {
                DependencyNode::child(AND_GROUP, self.expand_requirement(ast, path))
            }
        }
    }

    fn expand_course(&self, course_id: &str, path: &mut HashSet<String>) -> DependencyNode {
        let code = normalize(course_id);
        if path.contains(&code) {
            trace!("expand: cycle stop at {}", code);
            return DependencyNode::terminal(code, Terminal::CycleStop);
        }
        let Some(ast) = self.table.prerequisites(&code) else {
            return DependencyNode::terminal(code, Terminal::Leaf);
        };

        path.insert(code.clone());
        let children = self.expand_requirement(ast, path);
        path.remove(&code);

        DependencyNode::child(code, children)
    }
}
