//! Separates structural requirement text from free-text notes.

use regex::Regex;

use crate::domain::token::{strip_grade_clauses, tokenize_strict};

/// Non-course phrases pulled out of requirement text by default.
pub const DEFAULT_NOTE_PHRASES: &[&str] = &[
    "graduate standing",
    "consent of instructor",
    "upper-division standing",
    "department approval",
    "lower-division standing",
    "department stamp",
    "instructor approval",
    "junior standing",
    "senior standing",
];

/// Extracts known phrases and trailing statements into notes.
pub struct NoteExtractor {
    /// Lowercased, longest first
    phrases: Vec<String>,
    /// One case-insensitive whole-word pattern per phrase
    phrase_res: Vec<Regex>,
    whitespace_re: Regex,
    separator_re: Regex,
    comma_connective_re: Regex,
    dangling_tail_re: Regex,
    dangling_head_re: Regex,
}

impl Default for NoteExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_NOTE_PHRASES.iter().map(|p| p.to_string()))
    }
}

impl NoteExtractor {
    pub fn new(phrases: impl IntoIterator<Item = String>) -> Self {
        let mut phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();
        let phrase_res = phrases.iter().map(|p| phrase_regex(p)).collect();

        Self {
            phrases,
            phrase_res,
            whitespace_re: Regex::new(r"\s+").unwrap(),
            separator_re: Regex::new(r"\s*;[\s;]*").unwrap(),
            comma_connective_re: Regex::new(r"(?i),\s+(and|or)\s+").unwrap(),
            dangling_tail_re: Regex::new(r"(?i)\s+(?:or|and)\s*(;|$)").unwrap(),
            dangling_head_re: Regex::new(r"(?i)(^|;)\s*(?:or|and)\s+").unwrap(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Split `raw` into structural text and notes.
    ///
    /// Phrases match whole words only and keep their original case in the
    /// notes. Only the first
    /// `;`-separated statement is structural; later statements become notes
    /// unless they are themselves a clean course clause, in which case they
    /// are AND-ed back onto the structural text.
    pub fn extract(&self, raw: &str) -> (String, Vec<String>) {
        let mut notes = Vec::new();
        let mut text = raw.to_string();

        for re in &self.phrase_res {
            while let Some(range) = re.find(&text).map(|m| m.range()) {
                notes.push(text[range.clone()].to_string());
                text.replace_range(range, "");
                text = self.trim_dangling(&text);
            }
        }

        let text = strip_grade_clauses(&self.normalize_spacing(&text));

        let mut statements = text.split(';').map(str::trim).filter(|s| !s.is_empty());
        let mut structural = statements.next().unwrap_or_default().to_string();
        for statement in statements {
            if tokenize_strict(statement).is_some() {
                structural.push_str(" and ");
                structural.push_str(statement);
            } else {
                notes.push(statement.to_string());
            }
        }

        (structural, notes)
    }

    fn trim_dangling(&self, text: &str) -> String {
        let text = self.dangling_tail_re.replace_all(text, "$1");
        self.dangling_head_re.replace_all(&text, "$1").into_owned()
    }

    fn normalize_spacing(&self, text: &str) -> String {
        let text = self.whitespace_re.replace_all(text, " ");
        let text = self.separator_re.replace_all(&text, "; ");
        let text = self.comma_connective_re.replace_all(&text, " $1 ");
        let text = self.trim_dangling(&text);
        text.trim_matches(|c: char| c == ' ' || c == ';' || c == ',')
            .trim()
            .to_string()
    }
}

/// `\b` is only added on sides where the phrase starts or ends with a word
/// character; elsewhere it would never match.
fn phrase_regex(phrase: &str) -> Regex {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let head = if is_word(phrase.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(phrase.chars().last()) { r"\b" } else { "" };
    Regex::new(&format!("(?i){head}{}{tail}", regex::escape(phrase))).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_extracted_with_original_case() {
        let extractor = NoteExtractor::default();
        let (text, notes) = extractor.extract("CSE 12 and Consent of Instructor");
        assert_eq!(text, "CSE 12");
        assert_eq!(notes, vec!["Consent of Instructor"]);
    }

    #[test]
    fn test_repeated_phrase_extracted_each_time() {
        let extractor = NoteExtractor::default();
        let (text, notes) =
            extractor.extract("graduate standing or CSE 100 or graduate standing");
        assert_eq!(text, "CSE 100");
        assert_eq!(notes, vec!["graduate standing", "graduate standing"]);
    }

    #[test]
    fn test_trailing_prose_statement_becomes_note() {
        let extractor = NoteExtractor::default();
        let (text, notes) = extractor.extract("CSE 12;; restricted to CS majors");
        assert_eq!(text, "CSE 12");
        assert_eq!(notes, vec!["restricted to CS majors"]);
    }

    #[test]
    fn test_trailing_course_statement_is_folded_back() {
        let extractor = NoteExtractor::default();
        let (text, notes) = extractor.extract("CSE 12; ECE 271A-B");
        assert_eq!(text, "CSE 12 and ECE 271A-B");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_spacing_and_stray_punctuation_collapsed() {
        let extractor = NoteExtractor::default();
        let (text, _) = extractor.extract("  ;CSE 12,   and   CSE 21 ; ");
        assert_eq!(text, "CSE 12 and CSE 21");
    }

    #[test]
    fn test_phrase_inside_longer_word_is_not_extracted() {
        let extractor = NoteExtractor::default();
        let (text, notes) = extractor.extract("undergraduate standing and CSE 12");
        assert_eq!(text, "undergraduate standing and CSE 12");
        assert!(notes.is_empty());
    }

    #[test]
    fn test_phrase_with_punctuated_edges() {
        let extractor = NoteExtractor::new(vec!["(see catalog)".to_string()]);
        let (text, notes) = extractor.extract("CSE 12 (see catalog)");
        assert_eq!(text, "CSE 12");
        assert_eq!(notes, vec!["(see catalog)"]);
    }

    #[test]
    fn test_custom_phrases_prefer_longest_match() {
        let extractor = NoteExtractor::new(vec![
            "standing".to_string(),
            "senior standing".to_string(),
        ]);
        let (_, notes) = extractor.extract("senior standing");
        assert_eq!(notes, vec!["senior standing"]);
    }
}
