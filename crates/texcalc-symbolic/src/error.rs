use thiserror::Error;

/// Errors produced by symbolic rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolicError {
    /// The operation has no canonical algebraic form (e.g. `max`/`min`).
    #[error("no canonical form for {0}")]
    Unsupported(&'static str),
    /// An operation node is missing an operand.
    #[error("malformed operation tree: {0} is missing an operand")]
    Arity(&'static str),
    /// The rewrite needs a single free symbol but found none or several.
    #[error("expression is not univariate")]
    NotUnivariate,
    /// The expression is not a polynomial in the chosen symbol.
    #[error("expression is not a polynomial in `{0}`")]
    NotPolynomial(String),
}
