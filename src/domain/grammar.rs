//! Builds a prerequisite tree from a token stream.
//!
//! OR binds tighter than AND: "A and B or C and D" is `AND[A, OR[B, C], D]`.

use crate::domain::ast::PrereqNode;
use crate::domain::token::Token;

/// Build the AST for `tokens`, or `None` when no course remains.
///
/// Leading and trailing operators are discarded. Courses accumulate into
/// the current OR group; AND closes the group; OR between courses is
/// implied by the accumulation.
pub fn build(tokens: &[Token]) -> Option<PrereqNode> {
    let start = tokens.iter().position(is_course)?;
    let end = tokens.iter().rposition(is_course)?;

    let mut groups: Vec<Vec<PrereqNode>> = Vec::new();
    let mut current: Vec<PrereqNode> = Vec::new();

    for token in &tokens[start..=end] {
        match token {
            Token::Course(code) => current.push(PrereqNode::course(code.clone())),
            Token::And => {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
            }
            Token::Or => {}
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    PrereqNode::all_of(groups.into_iter().filter_map(PrereqNode::any_of).collect())
}

fn is_course(token: &Token) -> bool {
    matches!(token, Token::Course(_))
}
