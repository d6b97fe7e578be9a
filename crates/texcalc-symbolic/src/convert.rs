//! Conversion between `texcalc-expr` operation trees and the canonical form.
//!
//! Converting *in* normalizes derived operations onto the four canonical
//! constructors (`a - b` becomes `a + (-1)*b`, `\frac{a}{b}` becomes
//! `a * b^-1`, roots become fractional powers). Converting *out* rebuilds a
//! presentable operation tree: collected `-1` coefficients render as
//! negations, negative powers move into fractions, and sums nested inside
//! products regain their brackets. Variables seen on the way in are recorded
//! in a [`SymContext`] so the way out restores their units and formatting.

use std::collections::BTreeMap;

use texcalc_expr::operation::{
    self, Operation, abs, cos, cosh, div, exp, ln, parens, pos, pow, sin, sinh, sqrt, tan, tanh,
};
use texcalc_expr::{Node, NumberFormat, OpKind, Variable};

use crate::error::SymbolicError;
use crate::sym::{FuncKind, Sym};

/// Records the variables behind the symbols of a converted tree.
#[derive(Debug, Clone, Default)]
pub struct SymContext {
    vars: BTreeMap<String, Variable>,
}

impl SymContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, variable: &Variable) {
        self.vars
            .entry(variable.name.clone())
            .or_insert_with(|| variable.clone());
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }
}

/// Converts an operand tree into canonical form.
///
/// With `substitute_values` set, variables that carry a value are replaced by
/// that value; otherwise they stay symbolic. Anonymous numeric literals (a
/// variable named by its own printed value) always become numbers.
pub fn from_node(
    node: &Node,
    substitute_values: bool,
    ctx: &mut SymContext,
) -> Result<Sym, SymbolicError> {
    match node {
        Node::Variable(v) => Ok(from_variable(v, substitute_values, ctx)),
        Node::Expression(e) => from_operation(&e.operation, substitute_values, ctx),
        Node::Operation(o) => from_operation(o, substitute_values, ctx),
    }
}

fn from_variable(v: &Variable, substitute_values: bool, ctx: &mut SymContext) -> Sym {
    match v.value {
        Some(value) if v.name == NumberFormat::Auto.format(value) => Sym::Num(value),
        Some(value) if substitute_values => Sym::Num(value),
        _ => {
            ctx.record(v);
            Sym::Symbol(v.name.clone())
        }
    }
}

/// Converts an operation tree into canonical form.
pub fn from_operation(
    op: &Operation,
    substitute_values: bool,
    ctx: &mut SymContext,
) -> Result<Sym, SymbolicError> {
    let mut args = Vec::with_capacity(op.args.len());
    for a in &op.args {
        args.push(from_node(a, substitute_values, ctx)?);
    }
    let mut take = args.into_iter();
    Ok(match op.kind {
        OpKind::Add => Sym::Add(take.collect()),
        OpKind::Mul => Sym::Mul(take.collect()),
        OpKind::Max => return Err(SymbolicError::Unsupported("max")),
        OpKind::Min => return Err(SymbolicError::Unsupported("min")),
        OpKind::Sub => {
            let a = next_arg(&mut take, "sub")?;
            let b = next_arg(&mut take, "sub")?;
            Sym::Add(vec![a, Sym::Mul(vec![Sym::Num(-1.0), b])])
        }
        OpKind::Div | OpKind::DivInline => {
            let a = next_arg(&mut take, "div")?;
            let b = next_arg(&mut take, "div")?;
            Sym::Mul(vec![a, sym_pow(b, Sym::Num(-1.0))])
        }
        OpKind::Pow => {
            let a = next_arg(&mut take, "pow")?;
            let b = next_arg(&mut take, "pow")?;
            sym_pow(a, b)
        }
        OpKind::Root => {
            let index = next_arg(&mut take, "root")?;
            let radicand = next_arg(&mut take, "root")?;
            sym_pow(radicand, sym_pow(index, Sym::Num(-1.0)))
        }
        OpKind::Log => {
            let base = next_arg(&mut take, "log")?;
            let arg = next_arg(&mut take, "log")?;
            Sym::Mul(vec![
                Sym::Func(FuncKind::Ln, Box::new(arg)),
                sym_pow(Sym::Func(FuncKind::Ln, Box::new(base)), Sym::Num(-1.0)),
            ])
        }
        OpKind::Neg => Sym::Mul(vec![Sym::Num(-1.0), next_arg(&mut take, "neg")?]),
        OpKind::Pos | OpKind::Parens | OpKind::Brackets | OpKind::Braces | OpKind::Angles => {
            next_arg(&mut take, "wrapper")?
        }
        OpKind::Abs => Sym::Func(FuncKind::Abs, Box::new(next_arg(&mut take, "abs")?)),
        OpKind::Sqr => sym_pow(next_arg(&mut take, "sqr")?, Sym::Num(2.0)),
        OpKind::Sqrt => sym_pow(next_arg(&mut take, "sqrt")?, Sym::Num(0.5)),
        OpKind::Sin => Sym::Func(FuncKind::Sin, Box::new(next_arg(&mut take, "sin")?)),
        OpKind::Cos => Sym::Func(FuncKind::Cos, Box::new(next_arg(&mut take, "cos")?)),
        OpKind::Tan => Sym::Func(FuncKind::Tan, Box::new(next_arg(&mut take, "tan")?)),
        OpKind::Sinh => Sym::Func(FuncKind::Sinh, Box::new(next_arg(&mut take, "sinh")?)),
        OpKind::Cosh => Sym::Func(FuncKind::Cosh, Box::new(next_arg(&mut take, "cosh")?)),
        OpKind::Tanh => Sym::Func(FuncKind::Tanh, Box::new(next_arg(&mut take, "tanh")?)),
        OpKind::Exp => Sym::Func(FuncKind::Exp, Box::new(next_arg(&mut take, "exp")?)),
        OpKind::Ln => Sym::Func(FuncKind::Ln, Box::new(next_arg(&mut take, "ln")?)),
        OpKind::Log10 => Sym::Mul(vec![
            Sym::Func(FuncKind::Ln, Box::new(next_arg(&mut take, "log10")?)),
            sym_pow(Sym::Func(FuncKind::Ln, Box::new(Sym::Num(10.0))), Sym::Num(-1.0)),
        ]),
    })
}

fn next_arg(
    args: &mut std::vec::IntoIter<Sym>,
    op_name: &'static str,
) -> Result<Sym, SymbolicError> {
    args.next().ok_or(SymbolicError::Arity(op_name))
}

fn sym_pow(base: Sym, exp: Sym) -> Sym {
    Sym::Pow(Box::new(base), Box::new(exp))
}

/// Rebuilds an operand tree from canonical form.
pub fn to_node(sym: &Sym, ctx: &SymContext) -> Node {
    match sym {
        Sym::Num(n) => Node::Variable(Variable::number(*n)),
        Sym::Symbol(name) => Node::Variable(
            ctx.variable(name)
                .cloned()
                .unwrap_or_else(|| Variable::symbolic(name.clone())),
        ),
        Sym::Add(terms) => {
            Node::Operation(operation::sum(terms.iter().map(|t| term_to_node(t, ctx))))
        }
        Sym::Mul(factors) => mul_to_node(factors, ctx),
        Sym::Pow(base, exp) => pow_to_node(base, exp, ctx),
        Sym::Func(kind, arg) => {
            let inner = to_node(arg, ctx);
            Node::Operation(match kind {
                FuncKind::Sin => sin(inner),
                FuncKind::Cos => cos(inner),
                FuncKind::Tan => tan(inner),
                FuncKind::Sinh => sinh(inner),
                FuncKind::Cosh => cosh(inner),
                FuncKind::Tanh => tanh(inner),
                FuncKind::Exp => exp(inner),
                FuncKind::Ln => ln(inner),
                FuncKind::Abs => abs(inner),
            })
        }
    }
}

/// Rebuilds an operation from canonical form; leaf results are wrapped
/// transparently.
pub fn to_operation(sym: &Sym, ctx: &SymContext) -> Operation {
    match to_node(sym, ctx) {
        Node::Operation(op) => op,
        other => pos(other),
    }
}

/// Sum terms with a collected `-1` coefficient render as negations.
fn term_to_node(term: &Sym, ctx: &SymContext) -> Node {
    if let Sym::Mul(factors) = term
        && factors.len() > 1
        && factors[0] == Sym::Num(-1.0)
    {
        let rest: Vec<Sym> = factors[1..].to_vec();
        let inner = if rest.len() == 1 {
            to_node(&rest[0], ctx)
        } else {
            mul_to_node(&rest, ctx)
        };
        return Node::Operation(operation::neg(inner));
    }
    to_node(term, ctx)
}

/// Products split negative powers into a fraction's denominator.
fn mul_to_node(factors: &[Sym], ctx: &SymContext) -> Node {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for f in factors {
        match f {
            Sym::Pow(base, exp) if exp.as_num().is_some_and(|e| e < 0.0) => {
                let e = exp.as_num().unwrap_or(-1.0);
                if e == -1.0 {
                    denominator.push((**base).clone());
                } else {
                    denominator.push(Sym::Pow(base.clone(), Box::new(Sym::Num(-e))));
                }
            }
            other => numerator.push(other.clone()),
        }
    }
    let build = |parts: &[Sym]| -> Node {
        match parts.len() {
            0 => Node::Variable(Variable::number(1.0)),
            1 => to_node(&parts[0], ctx),
            _ => Node::Operation(operation::mul(parts.iter().map(|p| factor_to_node(p, ctx)))),
        }
    };
    if denominator.is_empty() {
        build(&numerator)
    } else {
        Node::Operation(div(build(&numerator), build(&denominator)))
    }
}

/// Sums nested inside a product regain their brackets.
fn factor_to_node(factor: &Sym, ctx: &SymContext) -> Node {
    match factor {
        Sym::Add(_) => Node::Operation(parens(to_node(factor, ctx))),
        _ => to_node(factor, ctx),
    }
}

fn pow_to_node(base: &Sym, exp: &Sym, ctx: &SymContext) -> Node {
    match exp.as_num() {
        Some(e) if e == 0.5 => return Node::Operation(sqrt(base_to_node(base, ctx))),
        Some(e) if e < 0.0 => {
            let denominator = if e == -1.0 {
                to_node(base, ctx)
            } else {
                let flipped = Sym::Pow(Box::new(base.clone()), Box::new(Sym::Num(-e)));
                to_node(&flipped, ctx)
            };
            return Node::Operation(div(Variable::number(1.0), denominator));
        }
        _ => {}
    }
    Node::Operation(pow(base_to_node(base, ctx), to_node(exp, ctx)))
}

fn base_to_node(base: &Sym, ctx: &SymContext) -> Node {
    match base {
        Sym::Add(_) | Sym::Mul(_) => Node::Operation(parens(to_node(base, ctx))),
        _ => to_node(base, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texcalc_expr::operation::{log, root, sqr, sub};

    fn convert(op: &Operation, substitute: bool) -> (Sym, SymContext) {
        let mut ctx = SymContext::new();
        let sym = from_operation(op, substitute, &mut ctx)
            .expect("conversion should succeed")
            .canonical();
        (sym, ctx)
    }

    #[test]
    fn subtraction_normalizes_to_signed_sum() {
        let a = Variable::symbolic("a");
        let b = Variable::symbolic("b");
        let (sym, _) = convert(&sub(&a, &b), false);
        assert_eq!(
            sym,
            Sym::Add(vec![
                Sym::Symbol("a".into()),
                Sym::Mul(vec![Sym::Num(-1.0), Sym::Symbol("b".into())]),
            ])
        );
    }

    #[test]
    fn roots_normalize_to_fractional_powers() {
        let x = Variable::symbolic("x");
        let (sym, _) = convert(&root(2.0, &x), false);
        assert_eq!(
            sym,
            Sym::Pow(
                Box::new(Sym::Symbol("x".into())),
                Box::new(Sym::Num(0.5))
            )
        );
    }

    #[test]
    fn log_normalizes_to_ln_ratio() {
        let b = Variable::new("b", 2.0);
        let x = Variable::symbolic("x");
        let (sym, _) = convert(&log(&b, &x), true);
        // ln x * (ln 2)^-1, with the constant folded
        match sym {
            Sym::Mul(factors) => {
                assert_eq!(factors.len(), 2);
                let coeff = factors[0].as_num().expect("folded coefficient");
                assert!((coeff - 1.0 / 2f64.ln()).abs() < 1e-12);
                assert_eq!(
                    factors[1],
                    Sym::Func(FuncKind::Ln, Box::new(Sym::Symbol("x".into())))
                );
            }
            other => panic!("expected product, got {other:?}"),
        }
    }

    #[test]
    fn values_substitute_only_on_request() {
        let v = Variable::new("v", 1.5);
        let op = sqr(&v);
        let (kept, ctx) = convert(&op, false);
        assert_eq!(
            kept,
            Sym::Pow(Box::new(Sym::Symbol("v".into())), Box::new(Sym::Num(2.0)))
        );
        assert!(ctx.variable("v").is_some());
        let (substituted, _) = convert(&op, true);
        assert_eq!(substituted, Sym::Num(2.25));
    }

    #[test]
    fn context_restores_units_on_the_way_out() {
        let v = Variable::new("v", 2.0).with_unit("m");
        let op = sqr(&v);
        let (sym, ctx) = convert(&op, false);
        let back = to_operation(&sym, &ctx);
        match &back.args[0] {
            Node::Variable(restored) => assert_eq!(restored.unit, "m"),
            other => panic!("expected variable operand, got {other:?}"),
        }
    }

    #[test]
    fn negated_terms_render_as_negations() {
        let a = Variable::symbolic("a");
        let (cancelled, _) = convert(&sub(&a, &a), false);
        assert_eq!(cancelled, Sym::Num(0.0));
        let b = Variable::symbolic("b");
        let (sym, ctx) = convert(&sub(&a, &b), false);
        let back = to_operation(&sym, &ctx);
        assert_eq!(back.latex_symbolic(), r"{a} + \left( - {b} \right)");
    }

    #[test]
    fn negative_powers_render_as_fractions() {
        let x = Variable::symbolic("x");
        let op = div(Variable::number(1.0), &x);
        let (sym, ctx) = convert(&op, false);
        let back = to_operation(&sym, &ctx);
        assert_eq!(back.latex_symbolic(), r"\frac{ {1} }{ {x} }");
    }
}
