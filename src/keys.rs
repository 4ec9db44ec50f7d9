//! Key tokens typed by a user, mapped to calculator input events.
//!
//! A token is one key (`7`, `.`, `+`, `×`, `()`, `=`, `C`, `50%`) or a run
//! of digits and decimal points (`12.5`) which expands to one event per key.

use thiserror::Error;

use crate::calculator::{InputEvent, Operator};

/// A key token that does not name any calculator key.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown key {0:?}")]
pub struct UnknownKey(pub String);

/// Parse one key token.
pub fn parse_key(token: &str) -> Result<Vec<InputEvent>, UnknownKey> {
    let unknown = || UnknownKey(token.to_string());

    match token {
        "=" | "enter" => return Ok(vec![InputEvent::Equals]),
        "c" | "C" | "clear" | "esc" => return Ok(vec![InputEvent::Clear]),
        "(" | ")" | "()" => return Ok(vec![InputEvent::Parentheses]),
        _ => {}
    }

    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && let Some(op) = Operator::from_char(c)
    {
        return Ok(vec![InputEvent::Operator(op)]);
    }

    if let Some(percent) = token.strip_suffix('%') {
        return percent
            .parse::<u8>()
            .map(|p| vec![InputEvent::Percentage(p)])
            .map_err(|_| unknown());
    }

    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Ok(token
            .chars()
            .map(|c| match c {
                '.' => InputEvent::Decimal,
                d => InputEvent::Digit(d),
            })
            .collect());
    }

    Err(unknown())
}

/// Parse a whitespace-separated line of key tokens.
pub fn parse_keys(line: &str) -> Result<Vec<InputEvent>, UnknownKey> {
    let mut events = Vec::new();
    for token in line.split_whitespace() {
        events.extend(parse_key(token)?);
    }
    Ok(events)
}
