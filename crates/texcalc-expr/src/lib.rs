//! # texcalc
//!
//! LaTeX typesetting of algebraic expressions in symbolic form with
//! automatic substitution and result computation, i.e. calculation lines of
//! the form `var = general expression = substituted expression = result`:
//!
//! ```text
//! r = 3 m
//! F = 4 kN
//! M = r * F = 3 * 4 = 12 kNm
//! ```
//!
//! ## Overview
//!
//! The building blocks are:
//!
//! - [`Variable`] - a named quantity with an optional value, a physical
//!   unit, and formatting preferences. A variable without a value is
//!   *symbolic* and renders as its name.
//! - [`Operation`] - one of the predefined operations
//!   (see [`operation`]) applied to one or more operands; operands nest, so
//!   a whole formula is one operation tree.
//! - [`Expression`] - a named operation with a unit; its `Display` form is
//!   the full calculation line.
//!
//! The usual arithmetic operators are overloaded on all three (and on bare
//! numbers on either side), so trees build the way formulas read:
//!
//! ```
//! use texcalc_expr::{Expression, Variable};
//!
//! let r = Variable::new("r", 3.0).with_unit("m");
//! let f = Variable::new("F", 4.0).with_unit("kN");
//! let m = Expression::new("M", &r * &f).with_unit("kNm");
//! assert_eq!(
//!     m.to_string(),
//!     r"M = {r} \cdot {F} = 3 \ \mathrm{m} \cdot 4 \ \mathrm{kN} = 12 \ \mathrm{kNm}"
//! );
//! ```
//!
//! ## Rendering pipeline
//!
//! ```text
//! Variable / Expression / Operation
//!         |                        latex_symbolic()     {r} \cdot {F}
//!         +-- operation tree  -->  latex_substituted()  3 \ \mathrm{m} \cdot 4 \ \mathrm{kN}
//!         |                        latex_result()       12
//!         +-- eval() -> Result<f64, EvalError>
//! ```
//!
//! Numeric output is controlled per value by [`NumberFormat`] and an
//! exponent for scientific presentation (see [`format`]).
//!
//! ## Symbolic variables
//!
//! ```
//! use texcalc_expr::{Expression, Variable, sqr, sin};
//!
//! let x = Variable::symbolic("x");
//! let e = Expression::new("e", sqr(sin(&x)));
//! assert_eq!(e.operation.latex_symbolic(), r"\sin{ {x} }^2");
//! assert!(e.eval().is_err());
//! ```
//!
//! ## Exporting and persistence
//!
//! Computed values export as LaTeX macro definitions (see [`export`]), and
//! whole calculation sessions persist as JSON files (see [`session`]):
//!
//! ```no_run
//! use texcalc_expr::{Session, Variable};
//!
//! let mut session = Session::new();
//! session.insert_var(Variable::new("r", 3.0).with_unit("m"));
//! session.save("session.json")?;
//! # Ok::<(), texcalc_expr::SessionError>(())
//! ```

/// Error types for evaluation and session persistence.
pub mod error;
/// LaTeX macro export (`\def`, `\newcommand`, `\renewcommand`).
pub mod export;
/// Named expressions.
pub mod expression;
/// Numeric and unit formatting.
pub mod format;
/// Operand nodes and operator overloads.
pub mod node;
/// Operation trees and predefined operation constructors.
pub mod operation;
/// JSON session persistence.
pub mod session;
/// Variables and predefined constants.
pub mod variable;

pub use error::{EvalError, SessionError};
pub use export::{MacroBody, MacroCommand, latex_macro};
pub use expression::Expression;
pub use format::{NumberFormat, UnitFormat};
pub use node::Node;
pub use operation::{
    OpKind, Operation, abrackets, abs, cbrackets, cos, cosh, div, div_inline, exp, ln, log, log10,
    maximum, minimum, mul, neg, parens, pos, pow, root, sbrackets, sin, sinh, sqr, sqrt, sub, sum,
    tan, tanh,
};
pub use session::{Session, SessionEntry};
pub use variable::{Variable, euler, one, pi, two, zero};

/// Crate version, matching the published package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
