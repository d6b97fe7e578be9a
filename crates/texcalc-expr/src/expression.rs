//! Named expressions: a variable-like quantity whose value is an operation
//! tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::format::{NumberFormat, UnitFormat, latex_number, with_unit};
use crate::node::Node;
use crate::operation::{Operation, pos};
use crate::variable::Variable;

/// A named mathematical expression.
///
/// Where a [`Variable`] holds a value, an `Expression` holds an
/// [`Operation`]; its `Display` form is the full calculation line
/// `name = symbolic = substituted = result unit`:
///
/// ```
/// use texcalc_expr::{Expression, Variable};
///
/// let v1 = Variable::new("H_{ello}", 3.25).with_unit("m");
/// let v2 = Variable::new("W^{orld}", 5.63).with_unit("m");
/// let e = Expression::new("E_{xample}", &v1 + &v2).with_unit("m");
/// assert_eq!(
///     e.to_string(),
///     r"E_{xample} = {H_{ello}} + {W^{orld}} = 3.25 \ \mathrm{m} + 5.63 \ \mathrm{m} = 8.88 \ \mathrm{m}"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub name: String,
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(default)]
    pub format: NumberFormat,
    #[serde(default)]
    pub unit_format: UnitFormat,
    #[serde(default)]
    pub exponent: i32,
}

impl Expression {
    /// Creates an expression over any operand; non-operation operands are
    /// wrapped transparently.
    pub fn new(name: impl Into<String>, operand: impl Into<Node>) -> Self {
        let operation = match operand.into() {
            Node::Operation(op) => op,
            other => pos(other),
        };
        Self {
            name: name.into(),
            operation,
            unit: String::new(),
            format: NumberFormat::default(),
            unit_format: UnitFormat::default(),
            exponent: 0,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_unit_format(mut self, unit_format: UnitFormat) -> Self {
        self.unit_format = unit_format;
        self
    }

    /// Sets the exponent for scientific presentation; `0` disables it.
    pub fn with_exponent(mut self, exponent: i32) -> Self {
        self.exponent = exponent;
        self
    }

    /// Numerically evaluates the underlying operation.
    pub fn eval(&self) -> Result<f64, EvalError> {
        self.operation.eval()
    }

    /// Symbolic rendering: the braced name.
    pub fn latex_symbolic(&self) -> String {
        format!("{{{}}}", self.name)
    }

    /// The formatted result; falls back to the braced name when the
    /// expression contains symbolic variables.
    pub fn latex_result(&self) -> String {
        self.latex_result_using(self.format, self.exponent)
    }

    /// Like [`latex_result`](Self::latex_result) with format and exponent
    /// overridden.
    pub fn latex_result_using(&self, format: NumberFormat, exponent: i32) -> String {
        match self.eval() {
            Ok(value) => latex_number(value, format, exponent),
            Err(_) => self.latex_symbolic(),
        }
    }

    /// The formatted result followed by the unit (when one is set).
    pub fn latex_result_with_unit(&self) -> String {
        with_unit(self.latex_result(), &self.unit, self.unit_format)
    }

    /// Substituted rendering: the result with its unit.
    pub fn latex_substituted(&self) -> String {
        if self.eval().is_err() {
            self.latex_symbolic()
        } else {
            self.latex_result_with_unit()
        }
    }

    /// Evaluates the receiver into a new variable carrying the same unit and
    /// formatting.
    pub fn to_variable(&self, new_name: impl Into<String>) -> Result<Variable, EvalError> {
        let name = new_name.into();
        Ok(Variable {
            name: if name.is_empty() {
                self.name.clone()
            } else {
                name
            },
            value: Some(self.eval()?),
            unit: self.unit.clone(),
            format: self.format,
            unit_format: self.unit_format,
            exponent: self.exponent,
        })
    }
}

impl Variable {
    /// Captures an expression's evaluated value together with its name,
    /// unit, and formatting.
    pub fn from_expression(expr: &Expression) -> Result<Variable, EvalError> {
        expr.to_variable("")
    }
}

impl fmt::Display for Expression {
    /// `name = symbolic = substituted = result unit`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} = {} = {}",
            self.name,
            self.operation.latex_symbolic(),
            self.operation.latex_substituted(),
            self.latex_result_with_unit()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{sbrackets, sqr, sqrt};

    #[test]
    fn display_is_the_full_calculation_line() {
        let v1 = Variable::new("H_{ello}", 3.25).with_unit("m");
        let v2 = Variable::new("W^{orld}", 5.63).with_unit("m");
        let e = Expression::new("E_{xample}", &v1 + &v2).with_unit("m");
        assert_eq!(
            e.to_string(),
            r"E_{xample} = {H_{ello}} + {W^{orld}} = 3.25 \ \mathrm{m} + 5.63 \ \mathrm{m} = 8.88 \ \mathrm{m}"
        );
    }

    #[test]
    fn nested_operations_render_through() {
        let v1 = Variable::new("a_{22}", 3.45);
        let v2 = Variable::new("F", 5.88);
        let v6 = Variable::new("F_6", -6.5);
        let o1 = (&v1 + sqrt(&v2)) / 2.0;
        let e = Expression::new("E_1^i", sbrackets(o1) - sqr(&v6)).with_unit("kNm");
        assert_eq!(
            e.operation.latex_symbolic(),
            r"\left[ \frac{ {a_{22}} + \sqrt{ {F} } }{ {2} } \right] - {F_6}^2"
        );
        let expected = (3.45 + 5.88f64.sqrt()) / 2.0 - 42.25;
        assert!((e.eval().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn expressions_nest_as_operands() {
        let v = Variable::new("v", 2.0).with_unit("m");
        let inner = Expression::new("E_2", &v + &v).with_unit("m");
        let outer = &inner * 3.0;
        assert_eq!(outer.latex_symbolic(), r"{E_2} \cdot {3}");
        assert_eq!(outer.latex_substituted(), r"4 \ \mathrm{m} \cdot 3");
        assert_eq!(outer.eval(), Ok(12.0));
    }

    #[test]
    fn symbolic_expression_falls_back_to_name() {
        let x = Variable::symbolic("x");
        let e = Expression::new("e", &x + 1.0);
        assert_eq!(e.latex_result(), "{e}");
        assert_eq!(e.eval(), Err(EvalError::Symbolic("x".to_string())));
    }

    #[test]
    fn to_variable_keeps_unit_and_formatting() {
        let v = Variable::new("v", 2.0);
        let e = Expression::new("E", &v * &v)
            .with_unit("kNm")
            .with_format(NumberFormat::Fixed(1));
        let out = e.to_variable("").unwrap();
        assert_eq!(out.name, "E");
        assert_eq!(out.unit, "kNm");
        assert_eq!(out.latex_result_with_unit(), r"4.0 \ \mathrm{kNm}");
        assert_eq!(Variable::from_expression(&e).unwrap(), out);
    }
}
