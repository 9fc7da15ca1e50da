//! Prerequisite expression tree.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Boolean requirement over course codes, one level deep (immediate
/// prerequisites only).
///
/// Serializes as `{"type": "COURSE", "course_id": ..}` or
/// `{"type": "OR" | "AND", "items": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum PrereqNode {
    Course { course_id: String },
    Or { items: Vec<PrereqNode> },
    And { items: Vec<PrereqNode> },
}

impl PrereqNode {
    pub fn course(code: impl Into<String>) -> Self {
        PrereqNode::Course {
            course_id: code.into(),
        }
    }

    /// Alternatives; a single item collapses into itself, none yields `None`.
    pub fn any_of(mut items: Vec<PrereqNode>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(PrereqNode::Or { items }),
        }
    }

    /// Conjunction; a single item collapses into itself, none yields `None`.
    pub fn all_of(mut items: Vec<PrereqNode>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(PrereqNode::And { items }),
        }
    }

    /// Re-establish the group invariants on a tree that did not come from
    /// the grammar builder (e.g. deserialized listings that wrap everything
    /// in an `AND`, sometimes with zero or one item).
    pub fn normalized(self) -> Option<Self> {
        match self {
            PrereqNode::Course { .. } => Some(self),
            PrereqNode::Or { items } => {
                Self::any_of(items.into_iter().filter_map(Self::normalized).collect())
            }
            PrereqNode::And { items } => {
                Self::all_of(items.into_iter().filter_map(Self::normalized).collect())
            }
        }
    }

    /// Course codes referenced by this tree, in source order.
    pub fn courses(&self) -> Vec<&str> {
        let mut codes = Vec::new();
        self.collect_courses(&mut codes);
        codes
    }

    fn collect_courses<'a>(&'a self, codes: &mut Vec<&'a str>) {
        match self {
            PrereqNode::Course { course_id } => codes.push(course_id),
            PrereqNode::Or { items } | PrereqNode::And { items } => {
                for item in items {
                    item.collect_courses(codes);
                }
            }
        }
    }

    /// Whether a student who completed `completed` meets this requirement.
    pub fn is_satisfied_by(&self, completed: &HashSet<String>) -> bool {
        match self {
            PrereqNode::Course { course_id } => completed.contains(course_id),
            PrereqNode::Or { items } => items.iter().any(|item| item.is_satisfied_by(completed)),
            PrereqNode::And { items } => items.iter().all(|item| item.is_satisfied_by(completed)),
        }
    }
}

impl fmt::Display for PrereqNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_group(
            f: &mut fmt::Formatter<'_>,
            items: &[PrereqNode],
            joiner: &str,
            nested: bool,
        ) -> fmt::Result {
            if nested {
                write!(f, "(")?;
            }
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {joiner} ")?;
                }
                match item {
                    PrereqNode::Course { course_id } => write!(f, "{course_id}")?,
                    PrereqNode::Or { items } => write_group(f, items, "or", true)?,
                    PrereqNode::And { items } => write_group(f, items, "and", true)?,
                }
            }
            if nested {
                write!(f, ")")?;
            }
            Ok(())
        }

        match self {
            PrereqNode::Course { course_id } => write!(f, "{course_id}"),
            PrereqNode::Or { items } => write_group(f, items, "or", false),
            PrereqNode::And { items } => write_group(f, items, "and", false),
        }
    }
}
