//! Render-ready snapshot of the calculator for presentation layers.

use serde::{Deserialize, Serialize};

use crate::calculator::{CalculatorState, Engine, NumberLocale, format_balance, format_display};

/// What a front end draws: the formula line, the big display and the
/// balance label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorView {
    /// The formula trace shown above the display.
    pub formula: String,
    /// The display formatted for reading (with thousand separators),
    /// or the error marker.
    pub display: String,
    /// The display as entered, for copying (raw number).
    pub raw_display: String,
    /// Balance line shown under the display.
    pub balance_label: String,
    /// Whether this is an error result.
    pub is_error: bool,
}

impl CalculatorView {
    /// Build a view of a state.
    pub fn from_state(state: &CalculatorState, balance: f64, locale: &NumberLocale) -> Self {
        let display = if state.is_error() {
            state.display.clone()
        } else {
            format_display(&state.display, locale)
        };

        Self {
            formula: state.formula.clone(),
            display,
            raw_display: state.display.clone(),
            balance_label: format_balance(balance, locale),
            is_error: state.is_error(),
        }
    }

    /// Build a view of an engine's current state.
    pub fn from_engine(engine: &Engine, locale: &NumberLocale) -> Self {
        Self::from_state(engine.state(), engine.balance(), locale)
    }

    /// Get the text to copy to clipboard.
    /// Returns `None` for errors.
    pub fn text_for_clipboard(&self) -> Option<&str> {
        (!self.is_error).then_some(self.raw_display.as_str())
    }
}
