//! A calculator bound to an account balance.
//!
//! The core is [`calculator::reduce`], a pure transition from a
//! [`calculator::CalculatorState`] and one [`calculator::InputEvent`] to the
//! next state. Front ends own the state, forward key presses, and render
//! a [`view::CalculatorView`].

pub mod calculator;
pub mod config;
pub mod keys;
pub mod view;
