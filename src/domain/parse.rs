//! Raw requirement string to prerequisite tree.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ast::PrereqNode;
use crate::domain::grammar;
use crate::domain::notes::NoteExtractor;
use crate::domain::token::tokenize;

/// Outcome of parsing one requirement string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseResult {
    pub ast: Option<PrereqNode>,
    pub parseable: bool,
    pub notes: Vec<String>,
}

impl ParseResult {
    pub fn unparseable() -> Self {
        Self::default()
    }
}

/// Note extraction, tokenization and grammar building in one pass.
#[derive(Default)]
pub struct PrereqParser {
    notes: NoteExtractor,
}

impl PrereqParser {
    pub fn new(notes: NoteExtractor) -> Self {
        Self { notes }
    }

    /// Parser using a custom note-phrase vocabulary.
    pub fn with_phrases(phrases: impl IntoIterator<Item = String>) -> Self {
        Self::new(NoteExtractor::new(phrases))
    }

    pub fn parse(&self, raw: &str) -> ParseResult {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return ParseResult::unparseable();
        }

        let (structural, notes) = self.notes.extract(raw);
        let tokens = tokenize(&structural);
        let ast = grammar::build(&tokens);
        debug!(
            "parse: {:?} -> {} tokens, {} notes",
            structural,
            tokens.len(),
            notes.len()
        );

        ParseResult {
            ast,
            parseable: true,
            notes,
        }
    }
}

/// Parse with the default note vocabulary.
pub fn parse_prereqs(raw: &str) -> ParseResult {
    PrereqParser::default().parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("None")]
    #[case("none")]
    fn test_empty_or_none_is_unparseable(#[case] raw: &str) {
        assert_eq!(parse_prereqs(raw), ParseResult::unparseable());
    }

    #[test]
    fn test_notes_only_is_parseable_without_ast() {
        let result = parse_prereqs("consent of instructor");
        assert!(result.parseable);
        assert_eq!(result.ast, None);
        assert_eq!(result.notes, vec!["consent of instructor"]);
    }

    #[test]
    fn test_custom_vocabulary() {
        let parser = PrereqParser::with_phrases(vec!["restricted to majors".to_string()]);
        let result = parser.parse("CSE 12 and restricted to majors");
        assert_eq!(result.ast, Some(PrereqNode::course("CSE 12")));
        assert_eq!(result.notes, vec!["restricted to majors"]);
    }
}
