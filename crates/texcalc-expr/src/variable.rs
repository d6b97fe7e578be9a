//! Physical or mathematical variables: a symbolic name, an optional value,
//! a unit, and formatting preferences.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::format::{NumberFormat, UnitFormat, latex_number, with_unit};

/// A named quantity, the fundamental building block of operations and
/// expressions.
///
/// A variable without a value is *symbolic*: it renders as its name and
/// reports [`EvalError::Symbolic`] when evaluated. The name is raw LaTeX, so
/// subscripts and superscripts work as expected (`a_{22}`, `F^{ult}`).
///
/// ```
/// use texcalc_expr::Variable;
///
/// let f = Variable::new("F", 4.0).with_unit("kN");
/// assert_eq!(f.to_string(), r"F = 4 \ \mathrm{kN}");
/// assert_eq!(f.latex_symbolic(), "{F}");
///
/// let x = Variable::symbolic("x");
/// assert!(x.is_symbolic());
/// assert_eq!(x.latex_result(), "{x}");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(default)]
    pub format: NumberFormat,
    #[serde(default)]
    pub unit_format: UnitFormat,
    #[serde(default)]
    pub exponent: i32,
}

impl Variable {
    /// Creates a variable with a value, no unit, and default formatting.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            unit: String::new(),
            format: NumberFormat::default(),
            unit_format: UnitFormat::default(),
            exponent: 0,
        }
    }

    /// Creates a symbolic variable, one without a value.
    pub fn symbolic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            unit: String::new(),
            format: NumberFormat::default(),
            unit_format: UnitFormat::default(),
            exponent: 0,
        }
    }

    /// Creates an anonymous numeric literal whose name is its printed value.
    ///
    /// This is how bare numbers entering an operation (`2 + a`) become tree
    /// leaves.
    pub fn number(value: f64) -> Self {
        Self::new(NumberFormat::Auto.format(value), value)
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

    /// True when the variable has no value.
    pub fn is_symbolic(&self) -> bool {
        self.value.is_none()
    }

    /// The numeric value, or [`EvalError::Symbolic`] when there is none.
    pub fn eval(&self) -> Result<f64, EvalError> {
        self.value
            .ok_or_else(|| EvalError::Symbolic(self.name.clone()))
    }

    /// Symbolic rendering: the braced name.
    pub fn latex_symbolic(&self) -> String {
        format!("{{{}}}", self.name)
    }

    /// The formatted value; symbolic variables fall back to the braced name.
    pub fn latex_result(&self) -> String {
        self.latex_result_using(self.format, self.exponent)
    }

    /// Like [`latex_result`](Self::latex_result) with format and exponent
    /// overridden.
    pub fn latex_result_using(&self, format: NumberFormat, exponent: i32) -> String {
        match self.value {
            Some(value) => latex_number(value, format, exponent),
            None => self.latex_symbolic(),
        }
    }

    /// The formatted value followed by the unit (when one is set).
    pub fn latex_result_with_unit(&self) -> String {
        with_unit(self.latex_result(), &self.unit, self.unit_format)
    }

    /// Substituted rendering: the value with its unit, or the braced name for
    /// symbolic variables.
    pub fn latex_substituted(&self) -> String {
        if self.is_symbolic() {
            self.latex_symbolic()
        } else {
            self.latex_result_with_unit()
        }
    }
}

impl fmt::Display for Variable {
    /// `name = result unit`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.latex_result_with_unit())
    }
}

/// The constant 0, printed without decimals.
pub fn zero() -> Variable {
    Variable::new("0", 0.0)
}

/// The constant 1, printed without decimals.
pub fn one() -> Variable {
    Variable::new("1", 1.0)
}

/// The constant 2, printed without decimals.
pub fn two() -> Variable {
    Variable::new("2", 2.0)
}

/// Euler's number, rendered as `\mathrm{e}`.
pub fn euler() -> Variable {
    Variable::new(r"\mathrm{e}", std::f64::consts::E)
}

/// The constant pi, rendered as `\pi`.
pub fn pi() -> Variable {
    Variable::new(r"\pi", std::f64::consts::PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valued_variable_renders_value_and_unit() {
        let v = Variable::new("H_{ello}", 3.25).with_unit("m");
        assert_eq!(v.latex_symbolic(), "{H_{ello}}");
        assert_eq!(v.latex_result(), "3.25");
        assert_eq!(v.latex_result_with_unit(), r"3.25 \ \mathrm{m}");
        assert_eq!(v.to_string(), r"H_{ello} = 3.25 \ \mathrm{m}");
    }

    #[test]
    fn symbolic_variable_renders_name_everywhere() {
        let x = Variable::symbolic("x");
        assert!(x.is_symbolic());
        assert_eq!(x.latex_result(), "{x}");
        assert_eq!(x.latex_substituted(), "{x}");
        assert_eq!(x.eval(), Err(EvalError::Symbolic("x".to_string())));
    }

    #[test]
    fn negative_values_are_parenthesized() {
        let v = Variable::new("F", -6.543).with_unit("kN");
        assert_eq!(v.latex_result(), r"\left( -6.543 \right)");
    }

    #[test]
    fn exponent_moves_to_scientific_form() {
        let v = Variable::new("F", 43400.0).with_unit("N").with_exponent(2);
        assert_eq!(
            v.latex_result_with_unit(),
            r"{ 434 \cdot 10^{2} } \ \mathrm{N}"
        );
    }

    #[test]
    fn number_literal_names_itself() {
        assert_eq!(Variable::number(2.0).name, "2");
        assert_eq!(Variable::number(-2.1).name, "-2.1");
    }

    #[test]
    fn constants() {
        assert_eq!(two().eval(), Ok(2.0));
        assert_eq!(pi().latex_symbolic(), r"{\pi}");
        assert!((euler().eval().unwrap() - std::f64::consts::E).abs() < 1e-12);
    }
}
