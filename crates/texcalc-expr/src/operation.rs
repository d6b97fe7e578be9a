//! Operation trees and the predefined operation constructors.
//!
//! An [`Operation`] applies one of the supported operation kinds to one, two,
//! or more operands. Operands are [`Node`]s, so variables, expressions, and
//! other operations nest freely into a hierarchy that renders both in
//! symbolic form (`{a} + \sqrt{ {b} }`) and in substituted form
//! (`3.25 + \sqrt{ 5.88 }`), and that evaluates numerically.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::format::{NumberFormat, latex_number};
use crate::node::Node;
use crate::variable::Variable;

/// The supported operation kinds.
///
/// N-ary kinds accept one or more operands; the remaining kinds take exactly
/// two (`Sub` through `Log`) or exactly one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    // n-ary
    Add,
    Mul,
    Max,
    Min,
    // binary
    Sub,
    /// Division rendered as `\frac{...}{...}`.
    Div,
    /// Division rendered inline as `a / b`.
    DivInline,
    Pow,
    /// `Root(n, x)` renders `\sqrt[n]{x}` and evaluates `x^(1/n)`.
    Root,
    /// `Log(b, x)` renders `\log_b{x}` and evaluates `ln x / ln b`.
    Log,
    // unary
    Neg,
    Pos,
    Abs,
    Sqr,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Parens,
    Brackets,
    Braces,
    Angles,
}

impl OpKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Mul => "mul",
            OpKind::Max => "max",
            OpKind::Min => "min",
            OpKind::Sub => "sub",
            OpKind::Div => "div",
            OpKind::DivInline => "div",
            OpKind::Pow => "pow",
            OpKind::Root => "root",
            OpKind::Log => "log",
            OpKind::Neg => "neg",
            OpKind::Pos => "pos",
            OpKind::Abs => "abs",
            OpKind::Sqr => "sqr",
            OpKind::Sqrt => "sqrt",
            OpKind::Sin => "sin",
            OpKind::Cos => "cos",
            OpKind::Tan => "tan",
            OpKind::Sinh => "sinh",
            OpKind::Cosh => "cosh",
            OpKind::Tanh => "tanh",
            OpKind::Exp => "exp",
            OpKind::Ln => "ln",
            OpKind::Log10 => "log10",
            OpKind::Parens => "parens",
            OpKind::Brackets => "brackets",
            OpKind::Braces => "braces",
            OpKind::Angles => "angles",
        }
    }
}

/// Rendering flavor shared by the symbolic and substituted walks.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RenderMode {
    Symbolic,
    Substituted,
}

/// An operation applied to one or more operand nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OpKind,
    pub args: Vec<Node>,
    #[serde(default)]
    pub format: NumberFormat,
    #[serde(default)]
    pub exponent: i32,
}

impl Operation {
    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_exponent(mut self, exponent: i32) -> Self {
        self.exponent = exponent;
        self
    }

    /// Symbolic rendering: operand names combined by the operation template.
    pub fn latex_symbolic(&self) -> String {
        self.render(RenderMode::Symbolic)
    }

    /// Substituted rendering: operand values combined by the operation
    /// template.
    pub fn latex_substituted(&self) -> String {
        self.render(RenderMode::Substituted)
    }

    /// The formatted numeric result.
    pub fn latex_result(&self) -> Result<String, EvalError> {
        self.latex_result_using(self.format, self.exponent)
    }

    /// Like [`latex_result`](Self::latex_result) with format and exponent
    /// overridden.
    pub fn latex_result_using(
        &self,
        format: NumberFormat,
        exponent: i32,
    ) -> Result<String, EvalError> {
        Ok(latex_number(self.eval()?, format, exponent))
    }

    /// Evaluates the receiver into a new named variable.
    pub fn to_variable(&self, name: impl Into<String>) -> Result<Variable, EvalError> {
        Ok(Variable::new(name, self.eval()?))
    }

    pub(crate) fn render(&self, mode: RenderMode) -> String {
        let arg = |i: usize| {
            self.args
                .get(i)
                .map(|a| a.render(mode))
                .unwrap_or_default()
        };
        match self.kind {
            OpKind::Add => self.join(mode, " + "),
            OpKind::Mul => self.join(mode, r" \cdot "),
            OpKind::Max => format!(r"\max{{\left( {} \right)}}", self.join(mode, ", ")),
            OpKind::Min => format!(r"\min{{\left( {} \right)}}", self.join(mode, ", ")),
            OpKind::Sub => format!("{} - {}", arg(0), arg(1)),
            OpKind::Div => format!(r"\frac{{ {} }}{{ {} }}", arg(0), arg(1)),
            OpKind::DivInline => format!("{} / {}", arg(0), arg(1)),
            OpKind::Pow => format!(r"{{ {} }}^{{ {} }}", arg(0), arg(1)),
            OpKind::Root => format!(r"\sqrt[ {} ]{{ {} }}", arg(0), arg(1)),
            OpKind::Log => format!(r"\log_{{ {} }}{{ {} }}", arg(0), arg(1)),
            OpKind::Neg => format!(r"\left( - {} \right)", arg(0)),
            OpKind::Pos => arg(0),
            OpKind::Abs => format!(r"\left| {} \right|", arg(0)),
            OpKind::Sqr => format!("{}^2", arg(0)),
            OpKind::Sqrt => format!(r"\sqrt{{ {} }}", arg(0)),
            OpKind::Sin => format!(r"\sin{{ {} }}", arg(0)),
            OpKind::Cos => format!(r"\cos{{ {} }}", arg(0)),
            OpKind::Tan => format!(r"\tan{{ {} }}", arg(0)),
            OpKind::Sinh => format!(r"\sinh{{ {} }}", arg(0)),
            OpKind::Cosh => format!(r"\cosh{{ {} }}", arg(0)),
            OpKind::Tanh => format!(r"\tanh{{ {} }}", arg(0)),
            OpKind::Exp => format!(r"\mathrm{{e}}^{{ {} }}", arg(0)),
            OpKind::Ln => format!(r"\ln{{ {} }}", arg(0)),
            OpKind::Log10 => format!(r"\log_{{10}}{{ {} }}", arg(0)),
            OpKind::Parens => format!(r"\left( {} \right)", arg(0)),
            OpKind::Brackets => format!(r"\left[ {} \right]", arg(0)),
            OpKind::Braces => format!(r"\left\{{ {} \right\}}", arg(0)),
            OpKind::Angles => format!(r"\left\langle {} \right\rangle", arg(0)),
        }
    }

    fn join(&self, mode: RenderMode, sep: &str) -> String {
        self.args
            .iter()
            .map(|a| a.render(mode))
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Numerically evaluates the operation tree.
    pub fn eval(&self) -> Result<f64, EvalError> {
        debug!("evaluating {}", self.latex_symbolic());
        match self.kind {
            OpKind::Add => {
                let mut acc = 0.0;
                for a in &self.args {
                    acc += a.eval()?;
                }
                Ok(acc)
            }
            OpKind::Mul => {
                let mut acc = 1.0;
                for a in &self.args {
                    acc *= a.eval()?;
                }
                Ok(acc)
            }
            OpKind::Max => self.fold_extremum(f64::max),
            OpKind::Min => self.fold_extremum(f64::min),
            OpKind::Sub => Ok(self.operand(0)? - self.operand(1)?),
            OpKind::Div | OpKind::DivInline => {
                let num = self.operand(0)?;
                let den = self.operand(1)?;
                if is_zero(den) {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(num / den)
            }
            OpKind::Pow => {
                let base = self.operand(0)?;
                let exp = self.operand(1)?;
                checked_pow(base, exp, "pow")
            }
            OpKind::Root => {
                let index = self.operand(0)?;
                let radicand = self.operand(1)?;
                if is_zero(index) {
                    return Err(EvalError::DivisionByZero);
                }
                checked_pow(radicand, 1.0 / index, "root")
            }
            OpKind::Log => {
                let base = self.operand(0)?;
                let arg = self.operand(1)?;
                if arg <= 0.0 {
                    return Err(EvalError::Domain { op: "log", value: arg });
                }
                if base <= 0.0 {
                    return Err(EvalError::Domain { op: "log", value: base });
                }
                let den = base.ln();
                if is_zero(den) {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(arg.ln() / den)
            }
            OpKind::Neg => Ok(-self.operand(0)?),
            OpKind::Pos => self.operand(0),
            OpKind::Abs => Ok(self.operand(0)?.abs()),
            OpKind::Sqr => {
                let v = self.operand(0)?;
                Ok(v * v)
            }
            OpKind::Sqrt => {
                let v = self.operand(0)?;
                if v < 0.0 {
                    return Err(EvalError::Domain { op: "sqrt", value: v });
                }
                Ok(v.sqrt())
            }
            OpKind::Sin => Ok(self.operand(0)?.sin()),
            OpKind::Cos => Ok(self.operand(0)?.cos()),
            OpKind::Tan => Ok(self.operand(0)?.tan()),
            OpKind::Sinh => Ok(self.operand(0)?.sinh()),
            OpKind::Cosh => Ok(self.operand(0)?.cosh()),
            OpKind::Tanh => Ok(self.operand(0)?.tanh()),
            OpKind::Exp => Ok(self.operand(0)?.exp()),
            OpKind::Ln => self.checked_log(f64::ln, "ln"),
            OpKind::Log10 => self.checked_log(f64::log10, "log10"),
            OpKind::Parens | OpKind::Brackets | OpKind::Braces | OpKind::Angles => self.operand(0),
        }
    }

    fn operand(&self, i: usize) -> Result<f64, EvalError> {
        self.args
            .get(i)
            .ok_or(EvalError::EmptyOperands(self.kind.name()))?
            .eval()
    }

    fn fold_extremum(&self, pick: fn(f64, f64) -> f64) -> Result<f64, EvalError> {
        let mut acc: Option<f64> = None;
        for a in &self.args {
            let v = a.eval()?;
            acc = Some(match acc {
                Some(prev) => pick(prev, v),
                None => v,
            });
        }
        acc.ok_or(EvalError::EmptyOperands(self.kind.name()))
    }

    fn checked_log(&self, apply: fn(f64) -> f64, op: &'static str) -> Result<f64, EvalError> {
        let v = self.operand(0)?;
        if v <= 0.0 {
            return Err(EvalError::Domain { op, value: v });
        }
        Ok(apply(v))
    }
}

impl fmt::Display for Operation {
    /// `symbolic = substituted`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.latex_symbolic(), self.latex_substituted())
    }
}

fn is_zero(value: f64) -> bool {
    value.abs() < f64::EPSILON
}

fn checked_pow(base: f64, exp: f64, op: &'static str) -> Result<f64, EvalError> {
    if base < 0.0 && exp.fract() != 0.0 {
        return Err(EvalError::Domain { op, value: base });
    }
    Ok(base.powf(exp))
}

fn nary<I>(kind: OpKind, args: I) -> Operation
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Operation {
        kind,
        args: args.into_iter().map(Into::into).collect(),
        format: NumberFormat::default(),
        exponent: 0,
    }
}

fn binary(kind: OpKind, a: impl Into<Node>, b: impl Into<Node>) -> Operation {
    nary(kind, [a.into(), b.into()])
}

fn unary(kind: OpKind, a: impl Into<Node>) -> Operation {
    nary(kind, [a.into()])
}

/// Addition of one or more operands, `a + b + ...`.
pub fn sum<I>(args: I) -> Operation
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    nary(OpKind::Add, args)
}

/// Multiplication of one or more operands, `a \cdot b \cdot ...`.
pub fn mul<I>(args: I) -> Operation
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    nary(OpKind::Mul, args)
}

/// `\max` of one or more operands.
pub fn maximum<I>(args: I) -> Operation
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    nary(OpKind::Max, args)
}

/// `\min` of one or more operands.
pub fn minimum<I>(args: I) -> Operation
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    nary(OpKind::Min, args)
}

/// Subtraction, `a - b`.
pub fn sub(a: impl Into<Node>, b: impl Into<Node>) -> Operation {
    binary(OpKind::Sub, a, b)
}

/// Division rendered as `\frac{ a }{ b }`.
pub fn div(a: impl Into<Node>, b: impl Into<Node>) -> Operation {
    binary(OpKind::Div, a, b)
}

/// Division rendered inline as `a / b`.
pub fn div_inline(a: impl Into<Node>, b: impl Into<Node>) -> Operation {
    binary(OpKind::DivInline, a, b)
}

/// Power, `{ a }^{ b }`.
pub fn pow(a: impl Into<Node>, b: impl Into<Node>) -> Operation {
    binary(OpKind::Pow, a, b)
}

/// `root(n, x)` renders `\sqrt[ n ]{ x }` and evaluates `x^(1/n)`.
pub fn root(index: impl Into<Node>, radicand: impl Into<Node>) -> Operation {
    binary(OpKind::Root, index, radicand)
}

/// `log(b, x)` renders `\log_{ b }{ x }` and evaluates `ln x / ln b`.
pub fn log(base: impl Into<Node>, arg: impl Into<Node>) -> Operation {
    binary(OpKind::Log, base, arg)
}

/// Negation, `\left( - a \right)`.
pub fn neg(a: impl Into<Node>) -> Operation {
    unary(OpKind::Neg, a)
}

/// Identity; renders its operand unchanged.
pub fn pos(a: impl Into<Node>) -> Operation {
    unary(OpKind::Pos, a)
}

/// Absolute value, `\left| a \right|`.
pub fn abs(a: impl Into<Node>) -> Operation {
    unary(OpKind::Abs, a)
}

/// Square, `a^2`.
pub fn sqr(a: impl Into<Node>) -> Operation {
    unary(OpKind::Sqr, a)
}

/// Square root, `\sqrt{ a }`.
pub fn sqrt(a: impl Into<Node>) -> Operation {
    unary(OpKind::Sqrt, a)
}

/// Sine.
pub fn sin(a: impl Into<Node>) -> Operation {
    unary(OpKind::Sin, a)
}

/// Cosine.
pub fn cos(a: impl Into<Node>) -> Operation {
    unary(OpKind::Cos, a)
}

/// Tangent.
pub fn tan(a: impl Into<Node>) -> Operation {
    unary(OpKind::Tan, a)
}

/// Hyperbolic sine.
pub fn sinh(a: impl Into<Node>) -> Operation {
    unary(OpKind::Sinh, a)
}

/// Hyperbolic cosine.
pub fn cosh(a: impl Into<Node>) -> Operation {
    unary(OpKind::Cosh, a)
}

/// Hyperbolic tangent.
pub fn tanh(a: impl Into<Node>) -> Operation {
    unary(OpKind::Tanh, a)
}

/// Exponential, `\mathrm{e}^{ a }`.
pub fn exp(a: impl Into<Node>) -> Operation {
    unary(OpKind::Exp, a)
}

/// Natural logarithm, `\ln{ a }`.
pub fn ln(a: impl Into<Node>) -> Operation {
    unary(OpKind::Ln, a)
}

/// Decadic logarithm, `\log_{10}{ a }`.
pub fn log10(a: impl Into<Node>) -> Operation {
    unary(OpKind::Log10, a)
}

/// Wraps the operand in round brackets.
pub fn parens(a: impl Into<Node>) -> Operation {
    unary(OpKind::Parens, a)
}

/// Wraps the operand in square brackets.
pub fn sbrackets(a: impl Into<Node>) -> Operation {
    unary(OpKind::Brackets, a)
}

/// Wraps the operand in curly brackets.
pub fn cbrackets(a: impl Into<Node>) -> Operation {
    unary(OpKind::Braces, a)
}

/// Wraps the operand in angle brackets.
pub fn abrackets(a: impl Into<Node>) -> Operation {
    unary(OpKind::Angles, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn arithmetic_results() {
        let a = Variable::new("a", 5.0);
        let b = Variable::new("b", 3.0);
        assert_eq!(sum([&a, &b]).eval(), Ok(8.0));
        assert_eq!(sub(&a, &b).eval(), Ok(2.0));
        assert_eq!(mul([&a, &b]).eval(), Ok(15.0));
        assert_eq!(div(&a, 2.0).eval(), Ok(2.5));
        assert_eq!(div_inline(&a, 2.0).eval(), Ok(2.5));
        assert_eq!(pow(&a, &b).eval(), Ok(125.0));
        assert_eq!(neg(&a).eval(), Ok(-5.0));
        assert_eq!(pos(&a).eval(), Ok(5.0));
        assert_eq!(abs(Variable::new("a", -5.0)).eval(), Ok(5.0));
        assert_eq!(sqr(&a).eval(), Ok(25.0));
    }

    #[test]
    fn nary_results() {
        let a = Variable::new("a", 5.0);
        let b = Variable::new("b", 15.0);
        let c = Variable::new("c", 2.0);
        assert_eq!(sum([&a, &b, &c]).eval(), Ok(22.0));
        assert_eq!(mul([&a, &b, &c]).eval(), Ok(150.0));
        assert_eq!(maximum([&a, &b, &c]).eval(), Ok(15.0));
        assert_eq!(minimum([&a, &b, &c]).eval(), Ok(2.0));
        assert_eq!(
            maximum(Vec::<Node>::new()).eval(),
            Err(EvalError::EmptyOperands("max"))
        );
    }

    #[test]
    fn transcendental_results() {
        use std::f64::consts::{E, FRAC_PI_2, PI};
        assert!(close(sqrt(Variable::new("a", 25.0)).eval().unwrap(), 5.0));
        assert!(close(sin(Variable::new("a", FRAC_PI_2)).eval().unwrap(), 1.0));
        assert!(close(cos(Variable::new("a", FRAC_PI_2)).eval().unwrap(), 0.0));
        assert!(close(
            tan(Variable::new("a", PI / 3.0)).eval().unwrap(),
            3f64.sqrt()
        ));
        assert!(close(
            sinh(Variable::new("a", -2.0)).eval().unwrap(),
            -3.626860407847019
        ));
        assert!(close(
            cosh(Variable::new("a", -2.0)).eval().unwrap(),
            3.7621956910836314
        ));
        assert!(close(
            tanh(Variable::new("a", -2.0)).eval().unwrap(),
            -0.9640275800758169
        ));
        assert!(close(exp(Variable::new("a", 2.0)).eval().unwrap(), E * E));
        assert!(close(ln(Variable::new("a", 2.0)).eval().unwrap(), 2f64.ln()));
        assert!(close(log10(Variable::new("a", 10000.0)).eval().unwrap(), 4.0));
        assert!(close(
            log(Variable::new("a", 2.0), Variable::new("b", 64.0))
                .eval()
                .unwrap(),
            6.0
        ));
        assert!(close(root(3.0, Variable::new("x", 8.0)).eval().unwrap(), 2.0));
    }

    #[test]
    fn brackets_are_transparent_in_eval() {
        let a = Variable::new("a", 2.0);
        assert_eq!(parens(&a).eval(), Ok(2.0));
        assert_eq!(sbrackets(&a).eval(), Ok(2.0));
        assert_eq!(cbrackets(&a).eval(), Ok(2.0));
        assert_eq!(abrackets(&a).eval(), Ok(2.0));
    }

    #[test]
    fn error_cases() {
        let a = Variable::new("a", 5.0);
        assert_eq!(div(&a, 0.0).eval(), Err(EvalError::DivisionByZero));
        assert_eq!(root(0.0, &a).eval(), Err(EvalError::DivisionByZero));
        assert_eq!(
            sqrt(Variable::new("a", -1.0)).eval(),
            Err(EvalError::Domain { op: "sqrt", value: -1.0 })
        );
        assert_eq!(
            ln(Variable::new("a", 0.0)).eval(),
            Err(EvalError::Domain { op: "ln", value: 0.0 })
        );
        assert_eq!(
            pow(Variable::new("a", -2.0), Variable::new("b", 0.5)).eval(),
            Err(EvalError::Domain { op: "pow", value: -2.0 })
        );
        assert_eq!(
            sum([Variable::symbolic("x")]).eval(),
            Err(EvalError::Symbolic("x".to_string()))
        );
    }

    #[test]
    fn symbolic_rendering_templates() {
        let a = Variable::new("a", 2.0);
        let b = Variable::new("b", 3.0);
        assert_eq!(sum([&a, &b]).latex_symbolic(), "{a} + {b}");
        assert_eq!(mul([&a, &b]).latex_symbolic(), r"{a} \cdot {b}");
        assert_eq!(sub(&a, &b).latex_symbolic(), "{a} - {b}");
        assert_eq!(div(&a, &b).latex_symbolic(), r"\frac{ {a} }{ {b} }");
        assert_eq!(div_inline(&a, &b).latex_symbolic(), "{a} / {b}");
        assert_eq!(pow(&a, &b).latex_symbolic(), r"{ {a} }^{ {b} }");
        assert_eq!(root(&a, &b).latex_symbolic(), r"\sqrt[ {a} ]{ {b} }");
        assert_eq!(log(&a, &b).latex_symbolic(), r"\log_{ {a} }{ {b} }");
        assert_eq!(
            maximum([&a, &b]).latex_symbolic(),
            r"\max{\left( {a}, {b} \right)}"
        );
        assert_eq!(neg(&a).latex_symbolic(), r"\left( - {a} \right)");
        assert_eq!(abs(&a).latex_symbolic(), r"\left| {a} \right|");
        assert_eq!(sqr(&a).latex_symbolic(), "{a}^2");
        assert_eq!(sqrt(&a).latex_symbolic(), r"\sqrt{ {a} }");
        assert_eq!(exp(&a).latex_symbolic(), r"\mathrm{e}^{ {a} }");
        assert_eq!(ln(&a).latex_symbolic(), r"\ln{ {a} }");
        assert_eq!(log10(&a).latex_symbolic(), r"\log_{10}{ {a} }");
        assert_eq!(parens(&a).latex_symbolic(), r"\left( {a} \right)");
        assert_eq!(sbrackets(&a).latex_symbolic(), r"\left[ {a} \right]");
        assert_eq!(cbrackets(&a).latex_symbolic(), r"\left\{ {a} \right\}");
        assert_eq!(
            abrackets(&a).latex_symbolic(),
            r"\left\langle {a} \right\rangle"
        );
    }

    #[test]
    fn substituted_rendering_carries_units() {
        let a = Variable::new("a", 2.0);
        let b = Variable::new("b", 3.0).with_unit("in");
        let c = mul([Node::from(&b), parens(&a + &b).into()]);
        assert_eq!(c.eval(), Ok(15.0));
        assert_eq!(
            c.latex_substituted(),
            r"3 \ \mathrm{in} \cdot \left( 2 + 3 \ \mathrm{in} \right)"
        );
    }

    #[test]
    fn display_shows_symbolic_and_substituted() {
        let a = Variable::new("a", 2.0);
        let op = sqr(&a);
        assert_eq!(op.to_string(), "{a}^2 = 2^2");
    }

    #[test]
    fn to_variable_captures_result() {
        let v = sum([Variable::new("a", 1.5), Variable::new("b", 2.5)])
            .to_variable("c")
            .unwrap();
        assert_eq!(v.name, "c");
        assert_eq!(v.eval(), Ok(4.0));
    }
}
