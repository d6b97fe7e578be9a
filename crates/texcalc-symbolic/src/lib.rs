//! # texcalc-symbolic
//!
//! Symbolic rewriting for `texcalc-expr` operation trees: `simplify`,
//! `expand`, `factor`, `collect`, `cancel`, and `apart`.
//!
//! Trees are normalized onto a small canonical form (sums, products, powers,
//! opaque functions), rewritten there, and converted back into presentable
//! operation trees - negations, fractions, and brackets reappear where a
//! reader expects them, and variables keep their units and formatting.
//!
//! ```
//! use texcalc_expr::{Expression, Variable};
//! use texcalc_symbolic::Rewrite;
//!
//! let v1 = Variable::symbolic("v_1");
//! let v2 = Variable::symbolic("v_2");
//! let e = Expression::new("e", &v1 + &v2 + &v1);
//! let simplified = e.simplify(false)?;
//! assert_eq!(
//!     simplified.operation.latex_symbolic(),
//!     r"{v_2} + {2} \cdot {v_1}"
//! );
//! # Ok::<(), texcalc_symbolic::SymbolicError>(())
//! ```
//!
//! Variables with values participate symbolically by default; passing
//! `substitute_values = true` folds them into their numeric values first,
//! matching the substitution step of the rendering pipeline.
//!
//! The polynomial rewrites (`factor`, `cancel`, `apart`) work on univariate
//! expressions with rational coefficients; `apart` additionally needs a
//! denominator that splits into distinct rational linear factors and falls
//! back to `cancel` otherwise.

/// Conversion between operation trees and the canonical form.
pub mod convert;
/// Error types.
pub mod error;
/// Dense univariate polynomials.
pub mod poly;
/// The rewriting operations.
pub mod rewrite;
/// The canonical algebraic form.
pub mod sym;

pub use convert::{SymContext, from_node, from_operation, to_node, to_operation};
pub use error::SymbolicError;
pub use rewrite::Rewrite;
pub use sym::{FuncKind, Sym};
