//! Course prerequisite parsing and dependency expansion.
//!
//! Requirement strings such as `"CSE 12 and (CSE 15L or CSE 30); consent of
//! instructor"` become an AND/OR tree over canonical course codes plus free
//! text notes. A listing of parsed courses can then be expanded into
//! transitive dependency trees.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{parse_prereqs, DependencyExpander, ParseResult, PrereqNode};
