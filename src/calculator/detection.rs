//! Character-set and grouping checks for formula text.
//!
//! The evaluator only accepts digits, the decimal point, the five binary
//! operators and parentheses. Whitespace separates tokens.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches strings made only of characters the evaluator understands.
    static ref EXPRESSION_CHARS: Regex = Regex::new(r"^[0-9+\-*/.()%\s]*$").unwrap();

    /// Matches the first character the evaluator does not understand.
    static ref DISALLOWED_CHAR: Regex = Regex::new(r"[^0-9+\-*/.()%\s]").unwrap();
}

/// Check if input contains only characters allowed in an expression.
pub fn is_allowed_expression(input: &str) -> bool {
    EXPRESSION_CHARS.is_match(input)
}

/// Byte offset of the first disallowed character, if any.
pub fn first_disallowed(input: &str) -> Option<(usize, char)> {
    DISALLOWED_CHAR
        .find(input)
        .and_then(|m| m.as_str().chars().next().map(|c| (m.start(), c)))
}

/// Count the `(` that have no matching `)` yet.
///
/// Stray closing parentheses never push the count below zero.
pub fn unclosed_groups(input: &str) -> usize {
    input.chars().fold(0usize, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth.saturating_sub(1),
        _ => depth,
    })
}

/// Check if every `(` is closed and no `)` appears without an opener.
pub fn is_balanced(input: &str) -> bool {
    let mut depth: isize = 0;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// What the formula text ends with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tail {
    Empty,
    /// An opening parenthesis.
    Open,
    /// A closing parenthesis.
    Close,
    /// A binary operator waiting for its right operand.
    Operator,
    /// A sign directly after `(` or at the start.
    UnaryOperator,
    /// A number literal.
    Number,
    /// Anything else, e.g. `=` or a percentage trace.
    Other,
}

impl Tail {
    /// Check if an operand has to follow before the formula is complete.
    pub fn needs_operand(self) -> bool {
        matches!(
            self,
            Self::Empty | Self::Open | Self::Operator | Self::UnaryOperator
        )
    }
}

/// Classify the end of a formula.
pub fn tail(formula: &str) -> Tail {
    let trimmed = formula.trim_end();
    let mut chars = trimmed.chars().rev();
    match chars.next() {
        None => Tail::Empty,
        Some('(') => Tail::Open,
        Some(')') => Tail::Close,
        Some('0'..='9' | '.') => Tail::Number,
        Some('+' | '-' | '*' | '/' | '%') => match chars.find(|c| !c.is_whitespace()) {
            None | Some('(') => Tail::UnaryOperator,
            Some(_) => Tail::Operator,
        },
        Some(_) => Tail::Other,
    }
}
