//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod ast;
pub mod code;
pub mod entities;
pub mod error;
pub mod grammar;
pub mod notes;
pub mod parse;
pub mod token;
pub mod tree;
pub mod tree_traits;

pub use ast::PrereqNode;
pub use code::{expand_range, extract_department, looks_like_course, normalize, CodeMatcher, CourseCode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use notes::{NoteExtractor, DEFAULT_NOTE_PHRASES};
pub use parse::{parse_prereqs, ParseResult, PrereqParser};
pub use token::{tokenize, Token};
pub use tree::{CourseTable, DependencyExpander, DependencyNode, NodeKind, Terminal};
pub use tree_traits::TreeNodeConvert;
