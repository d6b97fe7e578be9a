//! The rewriting operations: `simplify`, `expand`, `factor`, `collect`,
//! `cancel`, and `apart`.
//!
//! Each operation converts the tree into canonical form, rewrites it, and
//! converts back, restoring recorded variables (units, formatting) on the way
//! out. The `substitute_values` flag mirrors evaluation semantics: when set,
//! variables carrying values are treated as those values; otherwise they stay
//! symbolic and only genuinely numeric leaves fold.

use std::collections::BTreeSet;

use log::debug;

use texcalc_expr::Expression;
use texcalc_expr::operation::Operation;

use crate::convert::{SymContext, from_operation, to_operation};
use crate::error::SymbolicError;
use crate::poly::{Poly, poly_from_sym, poly_to_sym};
use crate::sym::{Sym, apply_coefficient, expand_sym, fold_pythagorean, split_coefficient};

/// Symbolic rewriting, available on [`Operation`] and [`Expression`].
///
/// Rewriting an expression preserves its name, unit, and formatting; only the
/// operation tree changes.
pub trait Rewrite: Sized {
    /// Canonicalizes: folds constants, collects like terms and factors, and
    /// cancels common univariate polynomial factors.
    fn simplify(&self, substitute_values: bool) -> Result<Self, SymbolicError>;
    /// Distributes products over sums and expands integer powers of sums.
    fn expand(&self, substitute_values: bool) -> Result<Self, SymbolicError>;
    /// Factors univariate polynomials over their rational roots; other sums
    /// have their common monomial factor extracted.
    fn factor(&self, substitute_values: bool) -> Result<Self, SymbolicError>;
    /// Groups the terms of a sum by powers of the named symbol.
    fn collect(&self, symbol: &str, substitute_values: bool) -> Result<Self, SymbolicError>;
    /// Puts a univariate rational expression over a common denominator and
    /// cancels the polynomial GCD.
    fn cancel(&self, substitute_values: bool) -> Result<Self, SymbolicError>;
    /// Univariate partial-fraction decomposition over distinct rational
    /// linear factors; falls back to [`cancel`](Rewrite::cancel) otherwise.
    fn apart(&self, substitute_values: bool) -> Result<Self, SymbolicError>;
}

impl Rewrite for Operation {
    fn simplify(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        rewrite(self, substitute_values, simplify_sym)
    }

    fn expand(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        rewrite(self, substitute_values, |sym| {
            Ok(expand_sym(sym).canonical())
        })
    }

    fn factor(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        rewrite(self, substitute_values, factor_sym)
    }

    fn collect(&self, symbol: &str, substitute_values: bool) -> Result<Self, SymbolicError> {
        rewrite(self, substitute_values, |sym| collect_sym(sym, symbol))
    }

    fn cancel(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        rewrite(self, substitute_values, cancel_sym)
    }

    fn apart(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        rewrite(self, substitute_values, apart_sym)
    }
}

impl Rewrite for Expression {
    fn simplify(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        map_expression(self, |op| op.simplify(substitute_values))
    }

    fn expand(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        map_expression(self, |op| op.expand(substitute_values))
    }

    fn factor(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        map_expression(self, |op| op.factor(substitute_values))
    }

    fn collect(&self, symbol: &str, substitute_values: bool) -> Result<Self, SymbolicError> {
        map_expression(self, |op| op.collect(symbol, substitute_values))
    }

    fn cancel(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        map_expression(self, |op| op.cancel(substitute_values))
    }

    fn apart(&self, substitute_values: bool) -> Result<Self, SymbolicError> {
        map_expression(self, |op| op.apart(substitute_values))
    }
}

/// Rewrites the operation of an expression, keeping name, unit, and
/// formatting.
fn map_expression(
    expr: &Expression,
    f: impl FnOnce(&Operation) -> Result<Operation, SymbolicError>,
) -> Result<Expression, SymbolicError> {
    Ok(Expression {
        operation: f(&expr.operation)?,
        ..expr.clone()
    })
}

fn rewrite(
    op: &Operation,
    substitute_values: bool,
    f: impl FnOnce(Sym) -> Result<Sym, SymbolicError>,
) -> Result<Operation, SymbolicError> {
    debug!("rewriting {}", op.latex_symbolic());
    let mut ctx = SymContext::new();
    let sym = from_operation(op, substitute_values, &mut ctx)?;
    let sym = f(sym)?;
    Ok(to_operation(&sym, &ctx))
}

fn simplify_sym(sym: Sym) -> Result<Sym, SymbolicError> {
    let sym = fold_pythagorean(sym.canonical());
    Ok(try_cancel(&sym).unwrap_or(sym))
}

/// Attempts univariate rational cancellation; `None` when it does not apply
/// or would not shrink anything.
fn try_cancel(sym: &Sym) -> Option<Sym> {
    let var = single_symbol(sym)?;
    let (num, den) = rational_form(sym);
    let den = expand_sym(den).canonical();
    if den.as_num().is_some() {
        return None;
    }
    let pn = poly_from_sym(&expand_sym(num).canonical(), &var).ok()?;
    let pd = poly_from_sym(&den, &var).ok()?;
    if pn.gcd(&pd).degree() < 1 {
        return None;
    }
    let (pn, pd) = cancel_polys(pn, pd)?;
    Some(build_fraction(&pn, &pd, &var))
}

fn single_symbol(sym: &Sym) -> Option<String> {
    let mut names = BTreeSet::new();
    sym.symbols(&mut names);
    if names.len() == 1 {
        names.into_iter().next()
    } else {
        None
    }
}

fn cancel_sym(sym: Sym) -> Result<Sym, SymbolicError> {
    let sym = sym.canonical();
    let mut names = BTreeSet::new();
    sym.symbols(&mut names);
    match names.len() {
        0 => return Ok(sym),
        1 => {}
        _ => return Err(SymbolicError::NotUnivariate),
    }
    let Some(var) = names.into_iter().next() else {
        return Ok(sym);
    };
    let (num, den) = rational_form(&sym);
    let polys = (
        poly_from_sym(&expand_sym(num).canonical(), &var),
        poly_from_sym(&expand_sym(den).canonical(), &var),
    );
    // non-polynomial content (e.g. transcendentals) passes through untouched
    let (Ok(pn), Ok(pd)) = polys else {
        return Ok(sym);
    };
    let Some((pn, pd)) = cancel_polys(pn, pd) else {
        return Ok(sym);
    };
    Ok(build_fraction(&pn, &pd, &var))
}

fn apart_sym(sym: Sym) -> Result<Sym, SymbolicError> {
    let sym = sym.canonical();
    let mut names = BTreeSet::new();
    sym.symbols(&mut names);
    match names.len() {
        0 => return Ok(sym),
        1 => {}
        _ => return Err(SymbolicError::NotUnivariate),
    }
    let Some(var) = names.into_iter().next() else {
        return Ok(sym);
    };
    let (num, den) = rational_form(&sym);
    let polys = (
        poly_from_sym(&expand_sym(num).canonical(), &var),
        poly_from_sym(&expand_sym(den).canonical(), &var),
    );
    let (Ok(pn), Ok(pd)) = polys else {
        return Ok(sym);
    };
    let Some((pn, pd)) = cancel_polys(pn, pd) else {
        return Ok(sym);
    };
    if pd.degree() == 0 {
        return Ok(build_fraction(&pn, &pd, &var));
    }
    let Some((quotient, remainder)) = pn.div_rem(&pd) else {
        return Ok(build_fraction(&pn, &pd, &var));
    };
    let (_, roots, rest) = pd.factor_roots();
    if rest.degree() > 0 || has_duplicates(&roots) {
        // denominator does not split into distinct rational linear factors
        return Ok(build_fraction(&pn, &pd, &var));
    }
    let derivative = pd.derivative();
    let mut terms = Vec::new();
    push_terms(&mut terms, poly_to_sym(&quotient, &var));
    for root in roots {
        let coefficient = remainder.eval(root) / derivative.eval(root);
        if coefficient == 0.0 {
            continue;
        }
        let linear = linear_factor(&var, root);
        let fraction = Sym::Pow(Box::new(linear), Box::new(Sym::Num(-1.0)));
        terms.push(apply_coefficient(coefficient, fraction));
    }
    Ok(assemble_sum(terms))
}

fn has_duplicates(roots: &[f64]) -> bool {
    let mut sorted = roots.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).any(|w| (w[0] - w[1]).abs() < 1e-9)
}

fn push_terms(terms: &mut Vec<Sym>, sym: Sym) {
    match sym {
        Sym::Num(n) if n == 0.0 => {}
        Sym::Add(parts) => terms.extend(parts),
        other => terms.push(other),
    }
}

fn assemble_sum(mut terms: Vec<Sym>) -> Sym {
    match terms.len() {
        0 => Sym::Num(0.0),
        1 => terms.remove(0),
        _ => Sym::Add(terms),
    }
}

fn linear_factor(var: &str, root: f64) -> Sym {
    if root == 0.0 {
        Sym::Symbol(var.to_string())
    } else {
        Sym::Add(vec![Sym::Symbol(var.to_string()), Sym::Num(-root)])
    }
}

/// Divides out the monic GCD; constant denominators fold into the numerator.
/// `None` only when the denominator is the zero polynomial.
fn cancel_polys(pn: Poly, pd: Poly) -> Option<(Poly, Poly)> {
    if pd.is_zero() {
        return None;
    }
    if pd.degree() == 0 {
        return Some((pn.scale(1.0 / pd.leading()), Poly::constant(1.0)));
    }
    let g = pn.gcd(&pd);
    if g.degree() < 1 {
        return Some((pn, pd));
    }
    let (pn2, _) = pn.div_rem(&g)?;
    let (pd2, _) = pd.div_rem(&g)?;
    if pd2.degree() == 0 {
        return Some((pn2.scale(1.0 / pd2.leading()), Poly::constant(1.0)));
    }
    Some((pn2, pd2))
}

fn build_fraction(pn: &Poly, pd: &Poly, var: &str) -> Sym {
    let num = poly_to_sym(pn, var);
    if pd.degree() == 0 && pd.leading() == 1.0 {
        return num;
    }
    Sym::Mul(vec![
        num,
        Sym::Pow(Box::new(poly_to_sym(pd, var)), Box::new(Sym::Num(-1.0))),
    ])
}

/// Splits a canonical form into numerator and denominator.
fn rational_form(sym: &Sym) -> (Sym, Sym) {
    match sym {
        Sym::Add(terms) => {
            let mut num = Sym::Num(0.0);
            let mut den = Sym::Num(1.0);
            for t in terms {
                let (tn, td) = rational_form(t);
                num = Sym::Add(vec![
                    Sym::Mul(vec![num, td.clone()]),
                    Sym::Mul(vec![tn, den.clone()]),
                ]);
                den = Sym::Mul(vec![den, td]);
            }
            (num, den)
        }
        Sym::Mul(factors) => {
            let mut nums = Vec::new();
            let mut dens = Vec::new();
            for f in factors {
                let (fnum, fden) = rational_form(f);
                nums.push(fnum);
                dens.push(fden);
            }
            (Sym::Mul(nums), Sym::Mul(dens))
        }
        Sym::Pow(base, exp) => match exp.as_num() {
            Some(e) if e < 0.0 && e.fract() == 0.0 => (
                Sym::Num(1.0),
                Sym::Pow(base.clone(), Box::new(Sym::Num(-e))),
            ),
            Some(e) if e > 0.0 && e.fract() == 0.0 => {
                let (bn, bd) = rational_form(base);
                (
                    Sym::Pow(Box::new(bn), Box::new(Sym::Num(e))),
                    Sym::Pow(Box::new(bd), Box::new(Sym::Num(e))),
                )
            }
            _ => (sym.clone(), Sym::Num(1.0)),
        },
        other => (other.clone(), Sym::Num(1.0)),
    }
}

fn factor_sym(sym: Sym) -> Result<Sym, SymbolicError> {
    let sym = expand_sym(sym).canonical();
    if let Some(var) = single_symbol(&sym)
        && let Ok(poly) = poly_from_sym(&sym, &var)
        && poly.degree() >= 2
    {
        let (leading, roots, rest) = poly.factor_roots();
        if !roots.is_empty() {
            return Ok(assemble_factors(leading, &roots, &rest, &var));
        }
    }
    Ok(monomial_factor(sym))
}

fn assemble_factors(leading: f64, roots: &[f64], rest: &Poly, var: &str) -> Sym {
    let mut factors = Vec::new();
    if leading != 1.0 {
        factors.push(Sym::Num(leading));
    }
    let mut sorted = roots.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut i = 0;
    while i < sorted.len() {
        let root = sorted[i];
        let multiplicity = sorted[i..].iter().take_while(|r| **r == root).count();
        i += multiplicity;
        let linear = linear_factor(var, root);
        if multiplicity == 1 {
            factors.push(linear);
        } else {
            factors.push(Sym::Pow(
                Box::new(linear),
                Box::new(Sym::Num(multiplicity as f64)),
            ));
        }
    }
    if rest.degree() >= 1 {
        factors.push(poly_to_sym(rest, var));
    }
    match factors.len() {
        1 => factors.remove(0),
        _ => Sym::Mul(factors),
    }
}

/// Pulls the common numeric and symbolic monomial factor out of a sum.
fn monomial_factor(sym: Sym) -> Sym {
    let terms = match sym {
        Sym::Add(terms) => terms,
        other => return other,
    };
    let split: Vec<(f64, Option<Sym>)> = terms.into_iter().map(split_coefficient).collect();
    let gcd = common_numeric_factor(&split);
    let common = common_symbolic_factors(&split);
    if gcd == 1.0 && common.is_empty() {
        return Sym::Add(rebuild_terms(split));
    }
    let residual: Vec<Sym> = split
        .into_iter()
        .map(|(coeff, rest)| divide_term(coeff / gcd, rest, &common))
        .collect();
    let mut factors = Vec::new();
    if gcd != 1.0 {
        factors.push(Sym::Num(gcd));
    }
    for (base, exponent) in common {
        if exponent == 1.0 {
            factors.push(base);
        } else {
            factors.push(Sym::Pow(Box::new(base), Box::new(Sym::Num(exponent))));
        }
    }
    factors.push(Sym::Add(residual));
    Sym::Mul(factors)
}

fn rebuild_terms(split: Vec<(f64, Option<Sym>)>) -> Vec<Sym> {
    split
        .into_iter()
        .map(|(coeff, rest)| match rest {
            None => Sym::Num(coeff),
            Some(rest) => apply_coefficient(coeff, rest),
        })
        .collect()
}

fn common_numeric_factor(split: &[(f64, Option<Sym>)]) -> f64 {
    let mut gcd: i64 = 0;
    for (coeff, _) in split {
        if coeff.fract() != 0.0 {
            return 1.0;
        }
        gcd = integer_gcd(gcd, coeff.abs() as i64);
    }
    if gcd <= 1 {
        return 1.0;
    }
    if split.iter().all(|(c, _)| *c < 0.0) {
        -(gcd as f64)
    } else {
        gcd as f64
    }
}

fn integer_gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { integer_gcd(b, a % b) }
}

fn term_factors(rest: &Option<Sym>) -> Vec<(Sym, f64)> {
    fn factor_entry(f: &Sym) -> (Sym, f64) {
        if let Sym::Pow(base, exp) = f
            && let Some(e) = exp.as_num()
        {
            return ((**base).clone(), e);
        }
        (f.clone(), 1.0)
    }
    match rest {
        None => Vec::new(),
        Some(Sym::Mul(factors)) => factors.iter().map(factor_entry).collect(),
        Some(other) => vec![factor_entry(other)],
    }
}

fn common_symbolic_factors(split: &[(f64, Option<Sym>)]) -> Vec<(Sym, f64)> {
    let mut common: Option<Vec<(Sym, f64)>> = None;
    for (_, rest) in split {
        let factors = term_factors(rest);
        common = Some(match common {
            None => factors,
            Some(acc) => acc
                .into_iter()
                .filter_map(|(base, exp)| {
                    factors
                        .iter()
                        .find(|(b, _)| *b == base)
                        .map(|(_, e)| (base, exp.min(*e)))
                })
                .collect(),
        });
    }
    common
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, e)| *e > 0.0)
        .collect()
}

fn divide_term(coeff: f64, rest: Option<Sym>, common: &[(Sym, f64)]) -> Sym {
    let mut remaining = Vec::new();
    for (base, exp) in term_factors(&rest) {
        let removed = common
            .iter()
            .find(|(b, _)| *b == base)
            .map(|(_, e)| *e)
            .unwrap_or(0.0);
        let left = exp - removed;
        if left == 0.0 {
            continue;
        }
        if left == 1.0 {
            remaining.push(base);
        } else {
            remaining.push(Sym::Pow(Box::new(base), Box::new(Sym::Num(left))));
        }
    }
    let rest = match remaining.len() {
        0 => None,
        1 => Some(remaining.remove(0)),
        _ => Some(Sym::Mul(remaining)),
    };
    match rest {
        None => Sym::Num(coeff),
        Some(rest) => apply_coefficient(coeff, rest),
    }
}

fn collect_sym(sym: Sym, symbol: &str) -> Result<Sym, SymbolicError> {
    let terms = match sym.canonical() {
        Sym::Add(terms) => terms,
        other => return Ok(other),
    };
    let mut groups: Vec<(f64, Vec<Sym>)> = Vec::new();
    for t in terms {
        let (power, rest) = split_symbol_power(t, symbol);
        if let Some(group) = groups.iter_mut().find(|(p, _)| *p == power) {
            group.1.push(rest);
        } else {
            groups.push((power, vec![rest]));
        }
    }
    groups.sort_by(|a, b| b.0.total_cmp(&a.0));
    let mut out = Vec::new();
    for (power, coeffs) in groups {
        let coefficient = Sym::Add(coeffs).canonical();
        if coefficient == Sym::Num(0.0) {
            continue;
        }
        let term = if power == 0.0 {
            coefficient
        } else {
            let base = if power == 1.0 {
                Sym::Symbol(symbol.to_string())
            } else {
                Sym::Pow(
                    Box::new(Sym::Symbol(symbol.to_string())),
                    Box::new(Sym::Num(power)),
                )
            };
            if coefficient == Sym::Num(1.0) {
                base
            } else {
                Sym::Mul(vec![coefficient, base])
            }
        };
        out.push(term);
    }
    Ok(assemble_sum(out))
}

fn symbol_power(factor: &Sym, symbol: &str) -> Option<f64> {
    match factor {
        Sym::Symbol(name) if name == symbol => Some(1.0),
        Sym::Pow(base, exp) => match (base.as_ref(), exp.as_num()) {
            (Sym::Symbol(name), Some(e)) if name == symbol => Some(e),
            _ => None,
        },
        _ => None,
    }
}

fn split_symbol_power(term: Sym, symbol: &str) -> (f64, Sym) {
    if let Some(power) = symbol_power(&term, symbol) {
        return (power, Sym::Num(1.0));
    }
    match term {
        Sym::Mul(factors) => {
            let mut power = 0.0;
            let mut rest = Vec::new();
            for f in factors {
                match symbol_power(&f, symbol) {
                    Some(p) => power += p,
                    None => rest.push(f),
                }
            }
            let rest = match rest.len() {
                0 => Sym::Num(1.0),
                1 => rest.remove(0),
                _ => Sym::Mul(rest),
            };
            (power, rest)
        }
        other => (0.0, other),
    }
}
