//! The calculator state machine.
//!
//! [`reduce`] maps a state and one input event to the next state. It never
//! fails: arithmetic errors turn into [`CalculatorState::error`]. [`Engine`]
//! owns the current state plus the read-only balance, for hosts that want a
//! mutable cell.

use tracing::{debug, trace, warn};

use super::detection::{self, Tail};
use super::error::CalcError;
use super::evaluation::{apply, evaluate};
use super::format::format_number;
use super::state::{CalculatorState, InputEvent, Operator};

/// Read-only inputs to the transition function.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineContext {
    /// Reference value for percentage events.
    pub balance: f64,
    /// Stop accepting digits once the display holds this many.
    pub max_input_length: Option<usize>,
}

impl EngineContext {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            max_input_length: None,
        }
    }
}

/// Compute the state that follows `event`.
pub fn reduce(
    state: &CalculatorState,
    event: InputEvent,
    ctx: &EngineContext,
) -> CalculatorState {
    trace!(?event, display = %state.display, formula = %state.formula, "input event");

    let mut next = state.clone();
    let outcome = match event {
        InputEvent::Digit(digit) => {
            input_digit(&mut next, digit, ctx.max_input_length);
            Ok(())
        }
        InputEvent::Decimal => {
            input_decimal(&mut next);
            Ok(())
        }
        InputEvent::Operator(op) => input_operator(&mut next, op),
        InputEvent::Percentage(percent) => apply_percentage(&mut next, percent, ctx.balance),
        InputEvent::Parentheses => toggle_group(&mut next),
        InputEvent::Equals => calculate(&mut next),
        InputEvent::Clear => {
            clear(&mut next);
            Ok(())
        }
    };

    match outcome {
        Ok(()) => next,
        Err(err) => {
            warn!(%err, ?event, formula = %state.formula, "calculation failed");
            CalculatorState::error()
        }
    }
}

fn input_digit(state: &mut CalculatorState, digit: char, max_len: Option<usize>) {
    if !digit.is_ascii_digit() {
        trace!(?digit, "ignoring non-digit");
        return;
    }

    if state.awaiting_fresh_operand {
        state.display = digit.to_string();
        state.awaiting_fresh_operand = false;
    } else if state.display == "0" {
        state.display = digit.to_string();
    } else {
        let len = state.display.chars().filter(char::is_ascii_digit).count();
        if max_len.is_some_and(|max| len >= max) {
            trace!(len, "input length cap reached");
            return;
        }
        state.display.push(digit);
        if !state.display_value().is_some_and(f64::is_finite) {
            trace!(len, "digit would overflow");
            state.display.pop();
        }
    }
}

fn input_decimal(state: &mut CalculatorState) {
    if state.awaiting_fresh_operand {
        state.display = "0.".to_string();
        state.awaiting_fresh_operand = false;
    } else if !state.display.contains('.') {
        state.display.push('.');
    }
}

fn input_operator(state: &mut CalculatorState, op: Operator) -> Result<(), CalcError> {
    if state.in_expression() {
        return expression_operator(state, op);
    }
    if state.is_error() {
        return Ok(());
    }

    match (state.accumulator, state.pending_operator) {
        (Some(acc), Some(_)) if operator_just_pressed(state) => {
            debug!(%op, "replacing pending operator");
            state.pending_operator = Some(op);
            state.formula = format!("{} {}", format_number(acc), op);
        }
        (Some(acc), Some(pending)) => {
            let result = apply(pending, acc, operand(state)?)?;
            debug!(acc, %pending, result, "chaining on intermediate result");
            state.display = format_number(result);
            state.accumulator = Some(result);
            state.pending_operator = Some(op);
            state.formula = format!("{} {}", state.display, op);
        }
        _ => {
            let acc = operand(state)?;
            state.accumulator = Some(acc);
            state.pending_operator = Some(op);
            state.formula = format!("{} {}", format_number(acc), op);
        }
    }

    state.awaiting_fresh_operand = true;
    Ok(())
}

fn apply_percentage(
    state: &mut CalculatorState,
    percent: u8,
    balance: f64,
) -> Result<(), CalcError> {
    let value = balance * f64::from(percent) / 100.0;
    if !value.is_finite() {
        return Err(CalcError::Overflow);
    }

    state.display = format_number(value);
    state.awaiting_fresh_operand = true;

    if state.in_expression() {
        let tail = detection::tail(&state.formula);
        if ends_with_value(tail) {
            push_token(&mut state.formula, "*");
        }
        push_token(&mut state.formula, &state.display);
    } else {
        state.formula = format!("{}% of ${}", percent, format_number(balance));
    }
    Ok(())
}

fn toggle_group(state: &mut CalculatorState) -> Result<(), CalcError> {
    if state.in_expression() && state.open_groups() > 0 {
        close_group(state)
    } else {
        open_group(state)
    }
}

fn open_group(state: &mut CalculatorState) -> Result<(), CalcError> {
    if state.in_expression() {
        let tail = detection::tail(&state.formula);
        if operand_entered(state) {
            if ends_with_value(tail) {
                push_token(&mut state.formula, "*");
            }
            let value = normalized_display(state)?;
            push_token(&mut state.formula, &value);
            push_token(&mut state.formula, "*");
        } else if ends_with_value(tail) {
            push_token(&mut state.formula, "*");
        }
    } else {
        let carried = if shown_value_carries(state) {
            Some(normalized_display(state)?)
        } else {
            None
        };

        // Fold a pending binary operation into the expression text.
        state.formula = match (state.accumulator.take(), state.pending_operator.take()) {
            (Some(acc), Some(op)) => format!("{} {}", format_number(acc), op),
            _ => String::new(),
        };
        if let Some(value) = carried {
            push_token(&mut state.formula, &value);
            push_token(&mut state.formula, "*");
        }
    }

    push_token(&mut state.formula, "(");
    state.awaiting_fresh_operand = true;
    Ok(())
}

fn close_group(state: &mut CalculatorState) -> Result<(), CalcError> {
    commit_operand(state)?;
    push_token(&mut state.formula, ")");

    let group = innermost_closed_group(&state.formula);
    let value = evaluate(group)?;
    debug!(group, value, "closed group");
    state.display = format_number(value);
    state.awaiting_fresh_operand = true;
    Ok(())
}

fn expression_operator(state: &mut CalculatorState, op: Operator) -> Result<(), CalcError> {
    let tail = detection::tail(&state.formula);

    if state.awaiting_fresh_operand && tail == Tail::Operator {
        replace_trailing_operator(&mut state.formula, op);
    } else if state.awaiting_fresh_operand && matches!(tail, Tail::Open | Tail::UnaryOperator) {
        // Only a sign may start a group.
        if matches!(op, Operator::Add | Operator::Subtract) {
            if tail == Tail::UnaryOperator {
                replace_trailing_operator(&mut state.formula, op);
            } else {
                push_token(&mut state.formula, &op.to_string());
            }
        }
    } else {
        commit_operand(state)?;
        push_token(&mut state.formula, &op.to_string());
    }

    state.awaiting_fresh_operand = true;
    Ok(())
}

fn calculate(state: &mut CalculatorState) -> Result<(), CalcError> {
    if state.in_expression() {
        return calculate_expression(state);
    }
    if state.is_error() {
        return Ok(());
    }

    let (Some(acc), Some(op)) = (state.accumulator, state.pending_operator) else {
        trace!("equals without pending operation");
        return Ok(());
    };

    let rhs = operand(state)?;
    let result = apply(op, acc, rhs)?;
    debug!(acc, %op, rhs, result, "calculated");

    state.formula = format!(
        "{} {} {} =",
        format_number(acc),
        op,
        format_number(rhs)
    );
    state.display = format_number(result);
    state.accumulator = None;
    state.pending_operator = None;
    state.awaiting_fresh_operand = true;
    Ok(())
}

fn calculate_expression(state: &mut CalculatorState) -> Result<(), CalcError> {
    commit_operand(state)?;
    for _ in 0..state.open_groups() {
        push_token(&mut state.formula, ")");
    }

    let result = evaluate(&state.formula)?;
    debug!(formula = %state.formula, result, "calculated expression");

    push_token(&mut state.formula, "=");
    state.display = format_number(result);
    state.accumulator = None;
    state.pending_operator = None;
    state.awaiting_fresh_operand = true;
    Ok(())
}

fn clear(state: &mut CalculatorState) {
    if state.display != "0" {
        state.display = "0".to_string();
    } else {
        *state = CalculatorState::new();
    }
}

/// Parse the display as the current operand.
fn operand(state: &CalculatorState) -> Result<f64, CalcError> {
    let value = state
        .display_value()
        .ok_or_else(|| CalcError::Format(state.display.clone()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::Overflow)
    }
}

/// The display in formula form, e.g. `"3."` becomes `"3"`.
///
/// The error marker counts as `0`.
fn normalized_display(state: &CalculatorState) -> Result<String, CalcError> {
    if state.is_error() {
        return Ok("0".to_string());
    }
    operand(state).map(format_number)
}

/// Check if the user typed a number since the last operator.
fn operand_entered(state: &CalculatorState) -> bool {
    !state.awaiting_fresh_operand && state.display != "0" && !state.is_error()
}

/// Check if a shown result or percentage should start a new expression.
fn shown_value_carries(state: &CalculatorState) -> bool {
    if operand_entered(state) {
        return true;
    }
    state.awaiting_fresh_operand
        && state.display != "0"
        && !state.is_error()
        && matches!(detection::tail(&state.formula), Tail::Number | Tail::Other)
}

fn ends_with_value(tail: Tail) -> bool {
    matches!(tail, Tail::Close | Tail::Number)
}

fn operator_just_pressed(state: &CalculatorState) -> bool {
    state.awaiting_fresh_operand && detection::tail(&state.formula) == Tail::Operator
}

/// Append the display to an expression if an operand is due.
///
/// A number typed right after `)` or a percentage multiplies it.
fn commit_operand(state: &mut CalculatorState) -> Result<(), CalcError> {
    let tail = detection::tail(&state.formula);
    if tail.needs_operand() {
        let value = normalized_display(state)?;
        push_token(&mut state.formula, &value);
    } else if ends_with_value(tail) && !state.awaiting_fresh_operand {
        let value = normalized_display(state)?;
        push_token(&mut state.formula, "*");
        push_token(&mut state.formula, &value);
    }
    Ok(())
}

/// Append a token, keeping `(` and `)` and signs tight to their neighbours.
fn push_token(formula: &mut String, token: &str) {
    let tight = formula.is_empty()
        || token == ")"
        || matches!(
            detection::tail(formula),
            Tail::Open | Tail::UnaryOperator
        );
    if !tight {
        formula.push(' ');
    }
    formula.push_str(token);
}

fn replace_trailing_operator(formula: &mut String, op: Operator) {
    let trimmed_len = formula.trim_end().len();
    formula.truncate(trimmed_len);
    formula.pop();
    formula.push(op.symbol());
}

/// The text of the group whose `)` ends the formula, parentheses included.
fn innermost_closed_group(formula: &str) -> &str {
    let mut depth = 0usize;
    for (idx, c) in formula.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return &formula[idx..];
                }
            }
            _ => {}
        }
    }
    formula
}

/// A calculator bound to a balance, holding its current state.
#[derive(Clone, Debug)]
pub struct Engine {
    context: EngineContext,
    state: CalculatorState,
}

impl Engine {
    /// Create an engine in the initial state.
    pub fn new(balance: f64) -> Self {
        Self::with_context(EngineContext::new(balance))
    }

    pub fn with_context(context: EngineContext) -> Self {
        Self {
            context,
            state: CalculatorState::new(),
        }
    }

    /// Handle one event and return the new state.
    pub fn handle(&mut self, event: InputEvent) -> &CalculatorState {
        self.state = reduce(&self.state, event, &self.context);
        &self.state
    }

    /// Handle events in order.
    pub fn handle_all(
        &mut self,
        events: impl IntoIterator<Item = InputEvent>,
    ) -> &CalculatorState {
        for event in events {
            self.handle(event);
        }
        &self.state
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn balance(&self) -> f64 {
        self.context.balance
    }

    /// Return to the initial state, keeping the balance.
    pub fn reset(&mut self) {
        self.state = CalculatorState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BALANCE: f64 = 24757.22;

    fn run(events: &[InputEvent]) -> CalculatorState {
        let mut engine = Engine::new(BALANCE);
        engine.handle_all(events.iter().copied()).clone()
    }

    fn digits(text: &str) -> Vec<InputEvent> {
        text.chars()
            .map(|c| match c {
                '.' => InputEvent::Decimal,
                c => InputEvent::Digit(c),
            })
            .collect()
    }

    fn op(c: char) -> InputEvent {
        InputEvent::Operator(Operator::from_char(c).unwrap())
    }

    #[test]
    fn test_digits_concatenate() {
        let state = run(&digits("1234"));
        assert_eq!(state.display, "1234");
        assert!(state.formula.is_empty());
    }

    #[test]
    fn test_leading_zeros_collapse() {
        assert_eq!(run(&digits("0007")).display, "7");
        assert_eq!(run(&digits("000")).display, "0");
    }

    #[test]
    fn test_single_decimal_point() {
        assert_eq!(run(&digits("1.2.3.")).display, "1.23");
        assert_eq!(run(&digits(".5")).display, "0.5");
    }

    #[test]
    fn test_non_digit_ignored() {
        let state = run(&[InputEvent::Digit('x')]);
        assert_eq!(state, CalculatorState::new());
    }

    #[test]
    fn test_input_length_cap() {
        let mut engine = Engine::with_context(EngineContext {
            balance: BALANCE,
            max_input_length: Some(3),
        });
        engine.handle_all(digits("12.345"));
        assert_eq!(engine.state().display, "12.3");
    }

    #[test]
    fn test_simple_addition() {
        let mut events = digits("7");
        events.push(op('+'));
        events.extend(digits("3"));
        events.push(InputEvent::Equals);

        let state = run(&events);
        assert_eq!(state.display, "10");
        assert_eq!(state.formula, "7 + 3 =");
        assert_eq!(state.accumulator, None);
        assert_eq!(state.pending_operator, None);
        assert!(state.awaiting_fresh_operand);
    }

    #[test]
    fn test_operator_captures_accumulator() {
        let state = run(&[InputEvent::Digit('8'), op('*')]);
        assert_eq!(state.accumulator, Some(8.0));
        assert_eq!(state.pending_operator, Some(Operator::Multiply));
        assert_eq!(state.formula, "8 *");
        assert!(state.awaiting_fresh_operand);
        assert_eq!(state.display, "8");
    }

    #[test]
    fn test_operator_chaining_evaluates() {
        let state = run(&[
            InputEvent::Digit('7'),
            op('+'),
            InputEvent::Digit('3'),
            op('×'),
        ]);
        assert_eq!(state.display, "10");
        assert_eq!(state.accumulator, Some(10.0));
        assert_eq!(state.pending_operator, Some(Operator::Multiply));
        assert_eq!(state.formula, "10 *");
    }

    #[test]
    fn test_operator_replacement_without_operand() {
        let state = run(&[InputEvent::Digit('7'), op('+'), op('−'), op('/')]);
        assert_eq!(state.accumulator, Some(7.0));
        assert_eq!(state.pending_operator, Some(Operator::Divide));
        assert_eq!(state.formula, "7 /");
    }

    #[test]
    fn test_equals_repeats_operand() {
        let state = run(&[InputEvent::Digit('7'), op('+'), InputEvent::Equals]);
        assert_eq!(state.display, "14");
        assert_eq!(state.formula, "7 + 7 =");
    }

    #[test]
    fn test_equals_without_operator_is_noop() {
        let before = run(&digits("42"));
        let after = reduce(&before, InputEvent::Equals, &EngineContext::new(BALANCE));
        assert_eq!(before, after);
        assert_eq!(after.accumulator, None);
    }

    #[test]
    fn test_division_by_zero_enters_error_state() {
        let state = run(&[
            InputEvent::Digit('5'),
            op('/'),
            InputEvent::Digit('0'),
            InputEvent::Equals,
        ]);
        assert_eq!(state, CalculatorState::error());
    }

    #[test]
    fn test_modulo_by_zero_while_chaining() {
        let state = run(&[
            InputEvent::Digit('5'),
            op('%'),
            InputEvent::Digit('0'),
            op('+'),
        ]);
        assert!(state.is_error());
        assert!(state.formula.is_empty());
        assert_eq!(state.pending_operator, None);
    }

    #[test]
    fn test_error_state_recovery() {
        let mut engine = Engine::new(BALANCE);
        engine.handle_all([
            InputEvent::Digit('1'),
            op('/'),
            InputEvent::Digit('0'),
            InputEvent::Equals,
        ]);
        assert!(engine.state().is_error());

        // Operators and equals are ignored until a new number arrives.
        engine.handle(op('+'));
        engine.handle(InputEvent::Equals);
        assert!(engine.state().is_error());

        engine.handle(InputEvent::Digit('4'));
        assert_eq!(engine.state().display, "4");
    }

    #[test]
    fn test_percentage_of_balance() {
        let state = run(&[InputEvent::Percentage(50)]);
        assert_eq!(state.display, "12378.61");
        assert_eq!(state.formula, "50% of $24757.22");
        assert!(state.awaiting_fresh_operand);
    }

    #[test]
    fn test_percentage_feeds_pending_operation() {
        let state = run(&[
            InputEvent::Digit('1'),
            op('+'),
            InputEvent::Percentage(100),
            InputEvent::Equals,
        ]);
        assert_eq!(state.display, "24758.22");
        assert_eq!(state.formula, "1 + 24757.22 =");
    }

    #[test]
    fn test_clear_is_two_stage() {
        let mut engine = Engine::new(BALANCE);
        engine.handle_all([InputEvent::Digit('7'), op('+'), InputEvent::Digit('3')]);

        engine.handle(InputEvent::Clear);
        assert_eq!(engine.state().display, "0");
        assert_eq!(engine.state().formula, "7 +");
        assert_eq!(engine.state().accumulator, Some(7.0));

        engine.handle(InputEvent::Clear);
        assert_eq!(engine.state(), &CalculatorState::new());
    }

    #[test]
    fn test_group_evaluates_with_precedence() {
        // 2 * (3 + 4) =
        let state = run(&[
            InputEvent::Digit('2'),
            op('*'),
            InputEvent::Parentheses,
            InputEvent::Digit('3'),
            op('+'),
            InputEvent::Digit('4'),
            InputEvent::Parentheses,
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "2 * (3 + 4) =");
        assert_eq!(state.display, "14");
        assert!(!state.in_expression());
    }

    #[test]
    fn test_closing_group_shows_its_value() {
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Digit('3'),
            op('+'),
            InputEvent::Digit('4'),
            InputEvent::Parentheses,
        ]);
        assert_eq!(state.formula, "(3 + 4)");
        assert_eq!(state.display, "7");
        assert_eq!(state.open_groups(), 0);
    }

    #[test]
    fn test_expression_precedence_inside_mode() {
        // (1) + 2 * 3 = evaluates with precedence once in expression mode
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Digit('1'),
            InputEvent::Parentheses,
            op('+'),
            InputEvent::Digit('2'),
            op('*'),
            InputEvent::Digit('3'),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "(1) + 2 * 3 =");
        assert_eq!(state.display, "7");
    }

    #[test]
    fn test_equals_closes_open_groups() {
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Digit('2'),
            op('+'),
            InputEvent::Digit('3'),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "(2 + 3) =");
        assert_eq!(state.display, "5");
    }

    #[test]
    fn test_parentheses_toggle() {
        // A second press closes the open group instead of nesting.
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Digit('2'),
            op('+'),
            InputEvent::Parentheses,
        ]);
        assert_eq!(state.formula, "(2 + 2)");
        assert_eq!(state.display, "4");
        assert_eq!(state.open_groups(), 0);
    }

    #[test]
    fn test_digits_after_group_multiply() {
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Digit('3'),
            InputEvent::Parentheses,
            InputEvent::Digit('2'),
            op('+'),
            InputEvent::Digit('1'),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "(3) * 2 + 1 =");
        assert_eq!(state.display, "7");
    }

    #[test]
    fn test_group_after_error() {
        let state = run(&[
            InputEvent::Digit('1'),
            op('/'),
            InputEvent::Digit('0'),
            InputEvent::Equals,
            InputEvent::Parentheses,
            op('-'),
            InputEvent::Digit('2'),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "(-2) =");
        assert_eq!(state.display, "-2");
    }

    #[test]
    fn test_implicit_multiplication_before_group() {
        let state = run(&[
            InputEvent::Digit('2'),
            InputEvent::Parentheses,
            InputEvent::Digit('5'),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "2 * (5) =");
        assert_eq!(state.display, "10");
    }

    #[test]
    fn test_unary_minus_in_group() {
        let state = run(&[
            InputEvent::Digit('4'),
            op('+'),
            InputEvent::Parentheses,
            op('-'),
            InputEvent::Digit('6'),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "4 + (-6) =");
        assert_eq!(state.display, "-2");
    }

    #[test]
    fn test_multiplicative_operator_cannot_open_group() {
        let state = run(&[InputEvent::Parentheses, op('*')]);
        assert_eq!(state.formula, "(");
    }

    #[test]
    fn test_expression_division_by_zero() {
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Digit('5'),
            op('/'),
            InputEvent::Digit('0'),
            InputEvent::Parentheses,
        ]);
        assert_eq!(state, CalculatorState::error());
    }

    #[test]
    fn test_percentage_inside_group_is_operand() {
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Digit('2'),
            op('+'),
            InputEvent::Percentage(50),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "(2 + 12378.61) =");
        assert_eq!(state.display, "12380.61");
    }

    #[test]
    fn test_percentage_inside_group_then_operator() {
        let state = run(&[
            InputEvent::Parentheses,
            InputEvent::Percentage(100),
            op('-'),
            InputEvent::Digit('7'),
            InputEvent::Parentheses,
        ]);
        assert_eq!(state.formula, "(24757.22 - 7)");
        assert_eq!(state.display, "24750.22");
    }

    #[test]
    fn test_percentage_carried_into_group() {
        let state = run(&[
            InputEvent::Digit('1'),
            op('+'),
            InputEvent::Percentage(50),
            InputEvent::Parentheses,
            InputEvent::Digit('2'),
            InputEvent::Equals,
        ]);
        assert_eq!(state.formula, "1 + 12378.61 * (2) =");
        assert_eq!(state.display, "24758.22");
    }

    #[test]
    fn test_result_carried_into_group() {
        let state = run(&[
            InputEvent::Digit('7'),
            op('+'),
            InputEvent::Digit('3'),
            InputEvent::Equals,
            InputEvent::Parentheses,
        ]);
        assert_eq!(state.formula, "10 * (");
        assert!(state.in_expression());
    }

    #[test]
    fn test_cleared_result_not_carried() {
        let state = run(&[
            InputEvent::Digit('7'),
            op('+'),
            InputEvent::Digit('3'),
            InputEvent::Equals,
            InputEvent::Clear,
            InputEvent::Parentheses,
        ]);
        assert_eq!(state.formula, "(");
    }

    #[test]
    fn test_digits_stop_before_overflow() {
        let mut engine = Engine::new(BALANCE);
        engine.handle_all(std::iter::repeat_n(InputEvent::Digit('9'), 400));
        assert_eq!(engine.state().display.len(), 308);
        assert!(engine.state().display_value().unwrap().is_finite());

        engine.handle(op('+'));
        assert!(!engine.state().formula.contains("inf"));
        assert!(engine.state().accumulator.unwrap().is_finite());
    }

    #[test]
    fn test_non_finite_operand_is_overflow() {
        let ctx = EngineContext::new(BALANCE);
        let state = CalculatorState {
            display: "9".repeat(400),
            ..CalculatorState::new()
        };
        assert_eq!(reduce(&state, op('+'), &ctx), CalculatorState::error());

        let grouped = CalculatorState {
            display: "9".repeat(400),
            formula: "(1 +".to_string(),
            ..CalculatorState::new()
        };
        assert_eq!(
            reduce(&grouped, InputEvent::Equals, &ctx),
            CalculatorState::error()
        );
    }

    #[test]
    fn test_reset_keeps_balance() {
        let mut engine = Engine::new(BALANCE);
        engine.handle_all([InputEvent::Digit('9'), op('+')]);
        engine.reset();
        assert_eq!(engine.state(), &CalculatorState::new());
        assert_eq!(engine.context().balance, BALANCE);
        assert_eq!(engine.handle(InputEvent::Percentage(100)).display, "24757.22");
    }

    #[test]
    fn test_pending_operator_invariant() {
        let ctx = EngineContext::new(BALANCE);
        let mut state = CalculatorState::new();
        for event in [
            InputEvent::Digit('9'),
            op('-'),
            InputEvent::Parentheses,
            InputEvent::Digit('1'),
            InputEvent::Parentheses,
            InputEvent::Equals,
        ] {
            state = reduce(&state, event, &ctx);
            assert_eq!(state.accumulator.is_some(), state.pending_operator.is_some());
        }
        assert_eq!(state.display, "8");
    }
}
