use thiserror::Error;

/// Errors produced when numerically evaluating an expression tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable without a value was reached during evaluation.
    #[error("variable `{0}` has no value")]
    Symbolic(String),
    /// A division (or logarithm base 1, or zeroth root) produced a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// The operation is undefined for the evaluated operand.
    #[error("{op} is undefined for {value}")]
    Domain { op: &'static str, value: f64 },
    /// An n-ary operation without a neutral element was evaluated with no operands.
    #[error("{0} of no operands")]
    EmptyOperands(&'static str),
}

/// Errors produced when saving or loading a [`Session`](crate::session::Session).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io: {0}")]
    Io(#[from] std::io::Error),
    #[error("session format: {0}")]
    Json(#[from] serde_json::Error),
}
