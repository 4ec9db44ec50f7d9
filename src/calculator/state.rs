//! Calculator state and the input events that drive it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::detection;

/// Text shown in the display after an arithmetic error.
pub const ERROR_MARKER: &str = "Error";

/// Percentages offered as quick actions against the balance.
pub const QUICK_PERCENTAGES: [u8; 4] = [25, 50, 75, 100];

/// A binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl Operator {
    /// ASCII symbol used in formula text and accepted by the evaluator.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Modulo => '%',
        }
    }

    /// Parse an operator, accepting the typographic keypad symbols too.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' | '−' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            '%' => Some(Self::Modulo),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single key press forwarded by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A digit `'0'..='9'`. Other characters are ignored.
    Digit(char),
    Decimal,
    Operator(Operator),
    /// Percentage of the external balance, e.g. `Percentage(50)`.
    Percentage(u8),
    /// Opens or closes a group depending on the current depth.
    Parentheses,
    Equals,
    Clear,
}

/// Everything the presentation layer needs to render the calculator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    /// Numeric text being entered or the last result.
    pub display: String,
    /// Human-readable trace of the expression.
    pub formula: String,
    /// Left operand captured at the last operator press.
    pub accumulator: Option<f64>,
    /// Set together with `accumulator`.
    pub pending_operator: Option<Operator>,
    /// The next digit starts a new number.
    pub awaiting_fresh_operand: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            formula: String::new(),
            accumulator: None,
            pending_operator: None,
            awaiting_fresh_operand: false,
        }
    }
}

impl CalculatorState {
    /// The canonical initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// State entered after an arithmetic error.
    pub fn error() -> Self {
        Self {
            display: ERROR_MARKER.to_string(),
            awaiting_fresh_operand: true,
            ..Self::default()
        }
    }

    /// Check if the display shows the error marker.
    pub fn is_error(&self) -> bool {
        self.display == ERROR_MARKER
    }

    /// Check if a binary operation is waiting for its right operand.
    pub fn has_pending_operation(&self) -> bool {
        self.accumulator.is_some() && self.pending_operator.is_some()
    }

    /// Number of groups opened in the formula and not yet closed.
    pub fn open_groups(&self) -> usize {
        detection::unclosed_groups(&self.formula)
    }

    /// Check if the formula is a live expression built with parentheses,
    /// as opposed to a finished trace such as `"7 + 3 ="`.
    pub fn in_expression(&self) -> bool {
        self.formula.contains('(') && !self.formula.ends_with('=')
    }

    /// Parse the display as a number. `None` for the error marker.
    pub fn display_value(&self) -> Option<f64> {
        self.display.parse().ok()
    }
}
