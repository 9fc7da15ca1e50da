//! Course code recognition and normalization.
//!
//! A course code has the shape `DEPT NUM[SUFFIX]`: a department of 2-6
//! uppercase letters (cross-listed departments joined by `/`), a 1-3 digit
//! number and up to two trailing suffix letters. The canonical rendering uses exactly one space
//! between department and number, e.g. `CSE 12`, `MATH 20A`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::error::DomainError;

/// A course code split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseCode {
    pub department: String,
    pub number: String,
    pub suffix: String,
}

impl CourseCode {
    pub fn new(
        department: impl Into<String>,
        number: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            department: department.into(),
            number: number.into(),
            suffix: suffix.into(),
        }
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.department, self.number, self.suffix)
    }
}

impl FromStr for CourseCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeMatcher::shared()
            .parse(s)
            .ok_or_else(|| DomainError::InvalidCourseCode(s.to_string()))
    }
}

/// Recognizes course-code tokens, department words and letter ranges.
pub struct CodeMatcher {
    course_re: Regex,
    department_re: Regex,
    number_re: Regex,
    number_range_re: Regex,
    range_re: Regex,
}

impl Default for CodeMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeMatcher {
    pub fn new() -> Self {
        Self {
            course_re: Regex::new(r"^([A-Z]{2,6}(?:/[A-Z]{2,6})?)\s*-?\s*(\d{1,3})([A-Z]{0,2})$").unwrap(),
            department_re: Regex::new(r"^[A-Z]{2,6}(?:/[A-Z]{2,6})?$").unwrap(),
            number_re: Regex::new(r"^(\d{1,3})([A-Z]{0,2})$").unwrap(),
            number_range_re: Regex::new(r"^(\d{1,3})([A-Z])-([A-Z])$").unwrap(),
            range_re: Regex::new(r"^([A-Z]{2,6}(?:/[A-Z]{2,6})?)-?(\d{1,3})([A-Z])-([A-Z])$").unwrap(),
        }
    }

    /// Process-wide matcher; the patterns are fixed so one instance suffices.
    pub fn shared() -> &'static CodeMatcher {
        static MATCHER: OnceLock<CodeMatcher> = OnceLock::new();
        MATCHER.get_or_init(CodeMatcher::new)
    }

    /// Parse a single course code, tolerating case, inner spaces and a
    /// hyphen between department and number.
    pub fn parse(&self, text: &str) -> Option<CourseCode> {
        let upper = text.trim().to_uppercase();
        if let Some(code) = self.capture_course(&upper) {
            return Some(code);
        }
        self.capture_course(&compact(&upper))
    }

    fn capture_course(&self, text: &str) -> Option<CourseCode> {
        let caps = self.course_re.captures(text)?;
        Some(CourseCode::new(&caps[1], &caps[2], &caps[3]))
    }

    pub fn looks_like_course(&self, text: &str) -> bool {
        self.parse(text).is_some()
    }

    /// Canonical form of `text`. Course codes render as `DEPT NUM[SUFFIX]`;
    /// anything else is uppercased with whitespace collapsed.
    pub fn normalize(&self, text: &str) -> String {
        match self.parse(text) {
            Some(code) => code.to_string(),
            None => text.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase(),
        }
    }

    /// Department of a course code or course range.
    pub fn extract_department(&self, text: &str) -> Option<String> {
        if let Some(code) = self.parse(text) {
            return Some(code.department);
        }
        let compacted = compact(&text.to_uppercase());
        self.range_re
            .captures(&compacted)
            .map(|caps| caps[1].to_string())
    }

    /// Uppercased department for a department-only word such as `CSE`,
    /// `Math` or `ethn/hist`.
    ///
    /// Short prose words (`of`, `to`, ...) are never departments, so
    /// "completion of 12 units" does not yield a course.
    pub fn department(&self, word: &str) -> Option<String> {
        let upper = word.to_ascii_uppercase();
        if PROSE_WORDS.contains(&upper.as_str()) || !self.department_re.is_match(&upper) {
            return None;
        }
        Some(upper)
    }

    /// Expand `DEPT NUM LETTER-LETTER` into one code per letter, inclusive.
    ///
    /// Non-range input and malformed ranges (end letter before start letter)
    /// come back as a single-element list holding the literal input.
    pub fn expand_range(&self, text: &str) -> Vec<String> {
        let compacted = compact(&text.to_uppercase());
        if let Some(caps) = self.range_re.captures(&compacted) {
            let start = first_char(&caps[3]);
            let end = first_char(&caps[4]);
            if let Some(letters) = letter_span(start, end) {
                return letters
                    .into_iter()
                    .map(|letter| CourseCode::new(&caps[1], &caps[2], letter.to_string()).to_string())
                    .collect();
            }
        }
        vec![text.to_string()]
    }

    /// Combine a known department with a number-shaped word (`12`, `15L`,
    /// `20A-E`). Returns `None` when the word is not number-shaped or holds a
    /// malformed range.
    pub fn expand_number(&self, department: &str, word: &str) -> Option<Vec<String>> {
        let upper = word.to_uppercase();
        if let Some(caps) = self.number_re.captures(&upper) {
            return Some(vec![CourseCode::new(department, &caps[1], &caps[2]).to_string()]);
        }
        let caps = self.number_range_re.captures(&upper)?;
        let letters = letter_span(first_char(&caps[2]), first_char(&caps[3]))?;
        Some(
            letters
                .into_iter()
                .map(|letter| CourseCode::new(department, &caps[1], letter.to_string()).to_string())
                .collect(),
        )
    }

    /// A self-contained course word (`CSE12`, `MATH-20A`, `MATH20A-E`),
    /// returned as its department and the codes it stands for.
    pub fn expand_word(&self, word: &str) -> Option<(String, Vec<String>)> {
        if let Some(code) = self.parse(word) {
            let department = code.department.clone();
            return Some((department, vec![code.to_string()]));
        }
        let compacted = compact(&word.to_uppercase());
        let caps = self.range_re.captures(&compacted)?;
        let letters = letter_span(first_char(&caps[3]), first_char(&caps[4]))?;
        let codes = letters
            .into_iter()
            .map(|letter| CourseCode::new(&caps[1], &caps[2], letter.to_string()).to_string())
            .collect();
        Some((caps[1].to_string(), codes))
    }
}

/// Words that share the department shape but only ever appear as prose.
const PROSE_WORDS: &[&str] = &[
    "OF", "IN", "AT", "TO", "ON", "BY", "IS", "AS", "AN", "BE", "OR", "AND", "THE", "FOR",
    "ANY", "ALL", "ONE", "TWO", "FROM", "WITH", "LEAST", "THAN", "MORE", "UNITS", "UNIT",
    "YEAR", "YEARS", "LEVEL", "PLUS", "TOTAL", "ABOVE", "BELOW",
];

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn first_char(text: &str) -> char {
    text.chars().next().unwrap_or('A')
}

fn letter_span(start: char, end: char) -> Option<Vec<char>> {
    if end < start {
        return None;
    }
    Some((start..=end).collect())
}

pub fn looks_like_course(text: &str) -> bool {
    CodeMatcher::shared().looks_like_course(text)
}

pub fn normalize(text: &str) -> String {
    CodeMatcher::shared().normalize(text)
}

pub fn extract_department(text: &str) -> Option<String> {
    CodeMatcher::shared().extract_department(text)
}

pub fn expand_range(text: &str) -> Vec<String> {
    CodeMatcher::shared().expand_range(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CSE 12", true)]
    #[case("CSE12", true)]
    #[case("cse 15l", true)]
    #[case("MATH-20A", true)]
    #[case("ETHN/HIST 100", true)]
    #[case("ECE 271AB", true)]
    #[case("BENG 1000", false)]
    #[case("C 12", false)]
    #[case("consent of instructor", false)]
    #[case("", false)]
    fn test_looks_like_course(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(looks_like_course(text), expected, "{text:?}");
    }

    #[rstest]
    #[case("CSE12", "CSE 12")]
    #[case("cse 15l", "CSE 15L")]
    #[case("MATH -  20A", "MATH 20A")]
    #[case("  graduate   standing ", "GRADUATE STANDING")]
    fn test_normalize(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(normalize(text), expected);
    }

    #[rstest]
    #[case("CSE 12")]
    #[case("MATH20A")]
    #[case("ECE-271ab")]
    #[case("not a course")]
    fn test_normalize_is_idempotent(#[case] text: &str) {
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_expand_range_letters() {
        assert_eq!(
            expand_range("MATH 20A-E"),
            vec!["MATH 20A", "MATH 20B", "MATH 20C", "MATH 20D", "MATH 20E"]
        );
        assert_eq!(expand_range("ECE271A-B"), vec!["ECE 271A", "ECE 271B"]);
    }

    #[rstest]
    #[case("MATH 20E-A")]
    #[case("CSE 12")]
    #[case("free text")]
    fn test_expand_range_returns_literal_otherwise(#[case] text: &str) {
        assert_eq!(expand_range(text), vec![text.to_string()]);
    }

    #[test]
    fn test_extract_department() {
        assert_eq!(extract_department("CSE 15L").as_deref(), Some("CSE"));
        assert_eq!(extract_department("math 20a-c").as_deref(), Some("MATH"));
        assert_eq!(extract_department("units"), None);
    }

    #[test]
    fn test_expand_number_with_department() {
        let matcher = CodeMatcher::shared();
        assert_eq!(matcher.expand_number("MATH", "20b"), Some(vec!["MATH 20B".to_string()]));
        assert_eq!(
            matcher.expand_number("MATH", "18A-B"),
            Some(vec!["MATH 18A".to_string(), "MATH 18B".to_string()])
        );
        assert_eq!(matcher.expand_number("MATH", "20C-A"), None);
        assert_eq!(matcher.expand_number("MATH", "units"), None);
    }

    #[rstest]
    #[case("CSE", Some("CSE"))]
    #[case("Math", Some("MATH"))]
    #[case("ethn/hist", Some("ETHN/HIST"))]
    #[case("of", None)]
    #[case("least", None)]
    #[case("C", None)]
    #[case("completion", None)]
    fn test_department_words(#[case] word: &str, #[case] expected: Option<&str>) {
        assert_eq!(CodeMatcher::shared().department(word).as_deref(), expected);
    }

    #[test]
    fn test_course_code_from_str() {
        let code: CourseCode = "cse15l".parse().unwrap();
        assert_eq!(code, CourseCode::new("CSE", "15", "L"));
        assert_eq!(code.to_string(), "CSE 15L");
        assert!("nope".parse::<CourseCode>().is_err());
    }
}
