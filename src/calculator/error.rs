//! Error kinds raised by the evaluator and the formatter.

use thiserror::Error;

/// Errors produced while evaluating or formatting calculator values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CalcError {
    /// The expression is malformed.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A `/` or `%` had a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A value reaching the formatter was not a number.
    #[error("not a number: {0:?}")]
    Format(String),

    /// The result does not fit in a finite double.
    #[error("result is not a finite number")]
    Overflow,
}

impl CalcError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}
