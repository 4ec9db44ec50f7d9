//! Expression evaluation.
//!
//! A recursive-descent parser with one level per precedence tier:
//!
//! ```text
//! expression = term (('+' | '-') term)*
//! term       = factor (('*' | '/' | '%') factor)*
//! factor     = '-' factor | '+' factor | '(' expression ')' | number
//! ```
//!
//! Every binary step goes through [`apply`], which the engine also uses for
//! accumulator arithmetic.

use tracing::debug;

use super::error::CalcError;
use super::lexer::{Token, TokenKind, tokenize};
use super::state::Operator;

/// Apply a binary operator.
///
/// A zero divisor for `/` or `%` is [`CalcError::DivisionByZero`]; a result
/// that is not finite is [`CalcError::Overflow`].
pub fn apply(op: Operator, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
    let value = match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide | Operator::Modulo if rhs == 0.0 => {
            return Err(CalcError::DivisionByZero);
        }
        Operator::Divide => lhs / rhs,
        Operator::Modulo => lhs % rhs,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::Overflow)
    }
}

/// Evaluate an expression such as `"(2 + 3) * 4"`.
pub fn evaluate(expr: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: expr.len(),
    };

    let value = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(CalcError::syntax(token.offset, "unexpected trailing input"));
    }

    debug!(expr, value, "evaluated expression");
    Ok(value)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Offset reported when input ends early.
    end: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op) = self.binary_operator(&[Operator::Add, Operator::Subtract]) {
            let rhs = self.term()?;
            value = apply(op, value, rhs)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(op) =
            self.binary_operator(&[Operator::Multiply, Operator::Divide, Operator::Modulo])
        {
            let rhs = self.factor()?;
            value = apply(op, value, rhs)?;
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, CalcError> {
        let Some(token) = self.advance() else {
            return Err(CalcError::syntax(self.end, "unexpected end of expression"));
        };

        match token.kind {
            TokenKind::Operator(Operator::Subtract) => Ok(-self.factor()?),
            TokenKind::Operator(Operator::Add) => self.factor(),
            TokenKind::LeftParen => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RightParen,
                        ..
                    }) => Ok(value),
                    Some(other) => Err(CalcError::syntax(other.offset, "expected ')'")),
                    None => Err(CalcError::syntax(self.end, "unclosed '('")),
                }
            }
            TokenKind::Number(value) => Ok(value),
            TokenKind::Operator(op) => Err(CalcError::syntax(
                token.offset,
                format!("operator '{op}' is missing its left operand"),
            )),
            TokenKind::RightParen => Err(CalcError::syntax(token.offset, "unexpected ')'")),
        }
    }

    /// Consume the next token if it is one of `ops`.
    fn binary_operator(&mut self, ops: &[Operator]) -> Option<Operator> {
        match self.peek()?.kind {
            TokenKind::Operator(op) if ops.contains(&op) => {
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }
}
