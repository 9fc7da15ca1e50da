//! Word-level tokenizer for structural requirement text.

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::domain::code::CodeMatcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Course(String),
    And,
    Or,
}

/// Scanner output before comma separators are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Token(Token),
    /// Between the codes of one letter range; every code is required.
    Joint,
    Comma,
}

const OPENING: &[char] = &['(', '[', '"', '\''];
const CLOSING: &[char] = &[')', ']', '"', '\'', '.', ',', ';', ':'];

/// Remove "with a grade of X [or above|or better]" clauses.
pub fn strip_grade_clauses(text: &str) -> String {
    static GRADE_RE: OnceLock<Regex> = OnceLock::new();
    let re = GRADE_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\s+with\s+a\s+(?:minimum\s+)?grade\s+of\s+[^\s;,]+(?:\s+or\s+(?:above|better|higher))?",
        )
        .unwrap()
    });
    re.replace_all(text, "").into_owned()
}

/// Split text into COURSE/AND/OR tokens.
///
/// Unrecognized words are dropped. The last department seen is carried
/// left to right across the whole text, so "MATH 20A or 20B" yields two
/// MATH courses.
pub fn tokenize(text: &str) -> Vec<Token> {
    let text = strip_grade_clauses(text);
    let lexemes = scan(&text, false).unwrap_or_default();
    resolve_commas(lexemes)
}

/// Tokenize only if every word is a course reference or a connective.
///
/// Used to decide whether a trailing statement is a clean course clause
/// rather than prose.
pub fn tokenize_strict(text: &str) -> Option<Vec<Token>> {
    let text = strip_grade_clauses(text);
    let lexemes = scan(&text, true)?;
    let tokens = resolve_commas(lexemes);
    tokens
        .iter()
        .any(|t| matches!(t, Token::Course(_)))
        .then_some(tokens)
}

struct Word<'a> {
    core: &'a str,
    comma: bool,
}

fn clean(word: &str) -> Word<'_> {
    let opened = word.trim_start_matches(OPENING);
    let core = opened.trim_end_matches(CLOSING);
    let comma = opened[core.len()..].contains(',');
    Word { core, comma }
}

fn scan(text: &str, strict: bool) -> Option<Vec<Lexeme>> {
    let matcher = CodeMatcher::shared();
    let words: Vec<Word> = text.split_whitespace().map(clean).collect();
    let mut lexemes = Vec::new();
    let mut last_department: Option<String> = None;
    let mut i = 0;

    while i < words.len() {
        let word = &words[i];
        i += 1;
        if word.core.is_empty() {
            continue;
        }

        match word.core.to_ascii_lowercase().as_str() {
            "and" => {
                lexemes.push(Lexeme::Token(Token::And));
                continue;
            }
            "or" | "and/or" => {
                lexemes.push(Lexeme::Token(Token::Or));
                continue;
            }
            _ => {}
        }

        let mut comma = word.comma;
        let paired = matcher.department(word.core).and_then(|department| {
            let next = words.get(i)?;
            let codes = matcher.expand_number(&department, next.core)?;
            Some((department, codes))
        });
        let codes = if let Some((department, codes)) = paired {
            comma = words[i].comma;
            i += 1;
            last_department = Some(department);
            codes
        } else if let Some((department, codes)) = matcher.expand_word(word.core) {
            last_department = Some(department);
            codes
        } else if let Some(codes) = last_department
            .as_deref()
            .and_then(|department| matcher.expand_number(department, word.core))
        {
            codes
        } else {
            if strict {
                return None;
            }
            trace!("tokenize: dropping {:?}", word.core);
            continue;
        };

        for (n, code) in codes.into_iter().enumerate() {
            if n > 0 {
                lexemes.push(Lexeme::Joint);
            }
            lexemes.push(Lexeme::Token(Token::Course(code)));
        }
        if comma {
            lexemes.push(Lexeme::Comma);
        }
    }

    Some(lexemes)
}

/// A comma takes the conjunction that closes its list: "A, B, or C" is an
/// OR list, "A, B, and C" (or a list without conjunction) is an AND list.
fn resolve_commas(lexemes: Vec<Lexeme>) -> Vec<Token> {
    let closing: Vec<Option<Token>> = {
        let mut next_operator = None;
        let mut closing = vec![None; lexemes.len()];
        for (idx, lexeme) in lexemes.iter().enumerate().rev() {
            match lexeme {
                Lexeme::Token(Token::And) => next_operator = Some(Token::And),
                Lexeme::Token(Token::Or) => next_operator = Some(Token::Or),
                Lexeme::Comma => closing[idx] = next_operator.clone(),
                Lexeme::Token(Token::Course(_)) | Lexeme::Joint => {}
            }
        }
        closing
    };

    lexemes
        .into_iter()
        .zip(closing)
        .map(|(lexeme, closing)| match lexeme {
            Lexeme::Token(token) => token,
            Lexeme::Joint => Token::And,
            Lexeme::Comma => closing.unwrap_or(Token::And),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn course(code: &str) -> Token {
        Token::Course(code.to_string())
    }

    #[test]
    fn test_operators_and_courses() {
        assert_eq!(
            tokenize("CSE 12 and CSE 15L or CSE30"),
            vec![course("CSE 12"), Token::And, course("CSE 15L"), Token::Or, course("CSE 30")]
        );
    }

    #[test]
    fn test_omitted_department_is_filled_from_last_seen() {
        assert_eq!(
            tokenize("MATH 20A or 20B"),
            vec![course("MATH 20A"), Token::Or, course("MATH 20B")]
        );
    }

    #[test]
    fn test_range_after_department_expands_in_order() {
        assert_eq!(
            tokenize("MATH 20A-C"),
            vec![
                course("MATH 20A"),
                Token::And,
                course("MATH 20B"),
                Token::And,
                course("MATH 20C")
            ]
        );
    }

    #[test]
    fn test_range_inside_comma_list_keeps_closing_conjunction() {
        assert_eq!(
            tokenize("CSE 11, MATH 18A-B, or CSE 8B"),
            vec![
                course("CSE 11"),
                Token::Or,
                course("MATH 18A"),
                Token::And,
                course("MATH 18B"),
                Token::Or,
                course("CSE 8B")
            ]
        );
    }

    #[rstest]
    #[case("Math 20A or Math 20B", vec![course("MATH 20A"), Token::Or, course("MATH 20B")])]
    #[case("cse 12 and cse 15l", vec![course("CSE 12"), Token::And, course("CSE 15L")])]
    #[case("completion of 12 units", vec![])]
    fn test_department_words_in_any_case(#[case] text: &str, #[case] expected: Vec<Token>) {
        assert_eq!(tokenize(text), expected);
    }

    #[test]
    fn test_unrecognized_words_are_dropped() {
        assert_eq!(
            tokenize("satisfactory completion of CSE 12"),
            vec![course("CSE 12")]
        );
    }

    #[test]
    fn test_bare_number_without_department_is_dropped() {
        assert_eq!(tokenize("12 or CSE 15"), vec![Token::Or, course("CSE 15")]);
    }

    #[test]
    fn test_parentheses_are_stripped() {
        assert_eq!(
            tokenize("(CSE 15L or CSE 30)"),
            vec![course("CSE 15L"), Token::Or, course("CSE 30")]
        );
    }

    #[test]
    fn test_grade_clause_removed() {
        assert_eq!(
            tokenize("CSE 12 with a grade of C or better and CSE 21"),
            vec![course("CSE 12"), Token::And, course("CSE 21")]
        );
    }

    #[rstest]
    #[case("MATH 20A, 20B, or 20C", Token::Or)]
    #[case("MATH 20A, 20B, and 20C", Token::And)]
    #[case("MATH 20A, 20B, 20C", Token::And)]
    fn test_comma_lists_take_closing_conjunction(#[case] text: &str, #[case] op: Token) {
        let tokens = tokenize(text);
        let ops: Vec<&Token> = tokens.iter().filter(|t| !matches!(t, Token::Course(_))).collect();
        assert!(!ops.is_empty());
        assert!(ops.iter().all(|t| **t == op), "{text}: {tokens:?}");
    }

    #[rstest]
    #[case("CSE 30", true)]
    #[case("ECE 271A-B", true)]
    #[case("CSE 30 or CSE 31", true)]
    #[case("CSE 30 is recommended", false)]
    #[case("restricted to majors", false)]
    fn test_tokenize_strict(#[case] text: &str, #[case] accepted: bool) {
        assert_eq!(tokenize_strict(text).is_some(), accepted, "{text}");
    }
}
