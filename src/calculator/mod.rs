//! Calculator core.
//!
//! This module provides:
//! - The input state machine driving display and formula text
//! - A recursive-descent evaluator for full expressions
//! - Display formatting with thousand separators

mod detection;
mod engine;
mod error;
mod evaluation;
mod format;
mod lexer;
mod state;

pub use detection::{is_allowed_expression, is_balanced, unclosed_groups};
pub use engine::{Engine, EngineContext, reduce};
pub use error::CalcError;
pub use evaluation::{apply, evaluate};
pub use format::{
    NumberLocale, format_balance, format_display, format_grouped, format_number,
    try_format_display,
};
pub use state::{CalculatorState, ERROR_MARKER, InputEvent, Operator, QUICK_PERCENTAGES};
