//! Tokenizer for calculator expressions.

use super::detection;
use super::error::CalcError;
use super::state::Operator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Operator(Operator),
    LeftParen,
    RightParen,
}

/// A token and the byte offset where it starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Split an expression into tokens.
///
/// Numbers are digit runs with at most one decimal point; a lone `.` is
/// rejected. Signs are left to the parser so that unary minus binds tighter
/// than any binary operator.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    if let Some((offset, c)) = detection::first_disallowed(input) {
        return Err(CalcError::syntax(
            offset,
            format!("unexpected character {c:?}"),
        ));
    }

    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        let kind = match b {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b'0'..=b'9' | b'.' => {
                let (value, len) = read_number(input, pos)?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    offset: pos,
                });
                pos += len;
                continue;
            }
            _ => match Operator::from_char(b as char) {
                Some(op) => TokenKind::Operator(op),
                None => {
                    return Err(CalcError::syntax(pos, "unexpected character"));
                }
            },
        };
        tokens.push(Token { kind, offset: pos });
        pos += 1;
    }

    Ok(tokens)
}

fn read_number(input: &str, start: usize) -> Result<(f64, usize), CalcError> {
    let bytes = input.as_bytes();
    let mut end = start;
    let mut seen_point = false;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_point => {
                seen_point = true;
                end += 1;
            }
            b'.' => return Err(CalcError::syntax(end, "second decimal point in number")),
            _ => break,
        }
    }

    let text = &input[start..end];
    if text == "." {
        return Err(CalcError::syntax(start, "decimal point without digits"));
    }

    text.parse::<f64>()
        .map(|value| (value, end - start))
        .map_err(|_| CalcError::syntax(start, format!("invalid number {text:?}")))
}
