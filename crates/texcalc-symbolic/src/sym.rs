//! The canonical algebraic form used by every rewrite.
//!
//! Operation trees normalize onto four constructors (sums, products, powers,
//! function applications) plus numeric and symbolic leaves, mirroring how
//! subtraction becomes `a + (-1)*b` and division becomes `a * b^-1` in any
//! CAS core. [`Sym::canonical`] flattens nested sums and products, folds
//! constants, and collects like terms and like factors, with a deterministic
//! term order so rendered output is stable.

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A node of the canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum Sym {
    Num(f64),
    Symbol(String),
    Add(Vec<Sym>),
    Mul(Vec<Sym>),
    Pow(Box<Sym>, Box<Sym>),
    Func(FuncKind, Box<Sym>),
}

/// Transcendental functions kept opaque by the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind {
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Abs,
}

impl FuncKind {
    /// Numeric evaluation, `None` outside the function's domain.
    fn apply(self, v: f64) -> Option<f64> {
        let out = match self {
            FuncKind::Sin => v.sin(),
            FuncKind::Cos => v.cos(),
            FuncKind::Tan => v.tan(),
            FuncKind::Sinh => v.sinh(),
            FuncKind::Cosh => v.cosh(),
            FuncKind::Tanh => v.tanh(),
            FuncKind::Exp => v.exp(),
            FuncKind::Ln => {
                if v <= 0.0 {
                    return None;
                }
                v.ln()
            }
            FuncKind::Abs => v.abs(),
        };
        out.is_finite().then_some(out)
    }
}

impl Sym {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Sym::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Collects the free symbol names of the receiver.
    pub fn symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Sym::Num(_) => {}
            Sym::Symbol(name) => {
                out.insert(name.clone());
            }
            Sym::Add(parts) | Sym::Mul(parts) => {
                for p in parts {
                    p.symbols(out);
                }
            }
            Sym::Pow(b, e) => {
                b.symbols(out);
                e.symbols(out);
            }
            Sym::Func(_, a) => a.symbols(out),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Sym::Num(_) => 0,
            Sym::Symbol(_) => 1,
            Sym::Func(..) => 2,
            Sym::Pow(..) => 3,
            Sym::Mul(_) => 4,
            Sym::Add(_) => 5,
        }
    }

    fn sort_key(&self) -> String {
        format!("{self:?}")
    }

    /// Rewrites the receiver into canonical form.
    pub fn canonical(self) -> Sym {
        match self {
            Sym::Add(terms) => canonical_add(terms),
            Sym::Mul(factors) => canonical_mul(factors),
            Sym::Pow(base, exp) => canonical_pow(base.canonical(), exp.canonical()),
            Sym::Func(kind, arg) => {
                let arg = arg.canonical();
                if let Some(v) = arg.as_num().and_then(|v| kind.apply(v)) {
                    Sym::Num(v)
                } else {
                    Sym::Func(kind, Box::new(arg))
                }
            }
            leaf => leaf,
        }
    }
}

pub(crate) fn cmp_sym(a: &Sym, b: &Sym) -> Ordering {
    a.rank()
        .cmp(&b.rank())
        .then_with(|| a.sort_key().cmp(&b.sort_key()))
}

/// Splits a term into its numeric coefficient and the remaining factor
/// product (`None` for a pure number).
pub(crate) fn split_coefficient(term: Sym) -> (f64, Option<Sym>) {
    match term {
        Sym::Num(n) => (n, None),
        Sym::Mul(factors) => {
            let mut coeff = 1.0;
            let mut rest = Vec::new();
            for f in factors {
                match f {
                    Sym::Num(n) => coeff *= n,
                    other => rest.push(other),
                }
            }
            match rest.len() {
                0 | 1 => (coeff, rest.pop()),
                _ => (coeff, Some(Sym::Mul(rest))),
            }
        }
        other => (1.0, Some(other)),
    }
}

/// Reattaches a collected coefficient to a factor product.
pub(crate) fn apply_coefficient(coeff: f64, rest: Sym) -> Sym {
    if coeff == 1.0 {
        return rest;
    }
    match rest {
        Sym::Mul(mut factors) => {
            factors.insert(0, Sym::Num(coeff));
            Sym::Mul(factors)
        }
        other => Sym::Mul(vec![Sym::Num(coeff), other]),
    }
}

fn canonical_add(terms: Vec<Sym>) -> Sym {
    let mut flat = Vec::new();
    for t in terms {
        match t.canonical() {
            Sym::Add(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    let mut constant = 0.0;
    let mut groups: Vec<(Sym, f64)> = Vec::new();
    for t in flat {
        let (coeff, rest) = split_coefficient(t);
        match rest {
            None => constant += coeff,
            Some(rest) => {
                if let Some(group) = groups.iter_mut().find(|(r, _)| *r == rest) {
                    group.1 += coeff;
                } else {
                    groups.push((rest, coeff));
                }
            }
        }
    }
    let mut out = Vec::new();
    if constant != 0.0 {
        out.push(Sym::Num(constant));
    }
    for (rest, coeff) in groups {
        if coeff == 0.0 {
            continue;
        }
        out.push(apply_coefficient(coeff, rest));
    }
    match out.len() {
        0 => Sym::Num(constant),
        1 => out.remove(0),
        _ => {
            out.sort_by(cmp_sym);
            Sym::Add(out)
        }
    }
}

fn canonical_mul(factors: Vec<Sym>) -> Sym {
    let mut flat = Vec::new();
    for f in factors {
        match f.canonical() {
            Sym::Mul(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    let mut coeff = 1.0;
    let mut powers: Vec<(Sym, Vec<Sym>)> = Vec::new();
    for f in flat {
        match f {
            Sym::Num(n) => coeff *= n,
            Sym::Pow(base, exp) => push_power(&mut powers, *base, *exp),
            other => push_power(&mut powers, other, Sym::Num(1.0)),
        }
    }
    if coeff == 0.0 {
        return Sym::Num(0.0);
    }
    let mut out = Vec::new();
    for (base, exps) in powers {
        let exp = Sym::Add(exps).canonical();
        match exp.as_num() {
            Some(e) if e == 0.0 => continue,
            Some(e) if e == 1.0 => out.push(base),
            _ => out.push(canonical_pow(base, exp)),
        }
    }
    // folding a power may itself produce a number
    out.retain(|f| match f.as_num() {
        Some(n) => {
            coeff *= n;
            false
        }
        None => true,
    });
    if coeff == 0.0 {
        return Sym::Num(0.0);
    }
    out.sort_by(cmp_sym);
    if out.is_empty() {
        return Sym::Num(coeff);
    }
    if coeff != 1.0 {
        out.insert(0, Sym::Num(coeff));
    }
    if out.len() == 1 {
        out.remove(0)
    } else {
        Sym::Mul(out)
    }
}

fn push_power(powers: &mut Vec<(Sym, Vec<Sym>)>, base: Sym, exp: Sym) {
    if let Some(entry) = powers.iter_mut().find(|(b, _)| *b == base) {
        entry.1.push(exp);
    } else {
        powers.push((base, vec![exp]));
    }
}

pub(crate) fn canonical_pow(base: Sym, exp: Sym) -> Sym {
    match (base, exp) {
        (base, Sym::Num(e)) if e == 1.0 => base,
        (_, Sym::Num(e)) if e == 0.0 => Sym::Num(1.0),
        (Sym::Num(b), Sym::Num(e)) if b >= 0.0 || e.fract() == 0.0 => {
            let v = b.powf(e);
            if v.is_finite() {
                Sym::Num(v)
            } else {
                Sym::Pow(Box::new(Sym::Num(b)), Box::new(Sym::Num(e)))
            }
        }
        (Sym::Pow(inner_base, inner_exp), Sym::Num(e)) if e.fract() == 0.0 => canonical_pow(
            *inner_base,
            Sym::Mul(vec![*inner_exp, Sym::Num(e)]).canonical(),
        ),
        (base, exp) => Sym::Pow(Box::new(base), Box::new(exp)),
    }
}

/// Distributes products over sums and expands small integer powers of sums.
/// The result is not canonical; callers canonicalize afterwards.
pub(crate) fn expand_sym(sym: Sym) -> Sym {
    match sym {
        Sym::Add(terms) => Sym::Add(terms.into_iter().map(expand_sym).collect()),
        Sym::Mul(factors) => distribute(factors.into_iter().map(expand_sym).collect()),
        Sym::Pow(base, exp) => {
            let base = expand_sym(*base);
            let exp = expand_sym(*exp);
            match (&base, exp.as_num()) {
                (Sym::Add(_), Some(e)) if e.fract() == 0.0 && (2.0..=32.0).contains(&e) => {
                    distribute(vec![base; e as usize])
                }
                _ => Sym::Pow(Box::new(base), Box::new(exp)),
            }
        }
        Sym::Func(kind, arg) => Sym::Func(kind, Box::new(expand_sym(*arg))),
        leaf => leaf,
    }
}

fn distribute(factors: Vec<Sym>) -> Sym {
    let mut products: Vec<Vec<Sym>> = vec![Vec::new()];
    for f in factors {
        match f {
            Sym::Add(terms) => {
                let mut next = Vec::with_capacity(products.len() * terms.len());
                for partial in &products {
                    for t in &terms {
                        let mut p = partial.clone();
                        p.push(t.clone());
                        next.push(p);
                    }
                }
                products = next;
            }
            other => {
                for p in &mut products {
                    p.push(other.clone());
                }
            }
        }
    }
    let mut terms: Vec<Sym> = products.into_iter().map(Sym::Mul).collect();
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        Sym::Add(terms)
    }
}

/// Replaces matching `sin^2 u + cos^2 u` term pairs in sums by their shared
/// coefficient.
pub(crate) fn fold_pythagorean(sym: Sym) -> Sym {
    match sym {
        Sym::Add(terms) => {
            let mut parts: Vec<(f64, Option<Sym>)> = terms
                .into_iter()
                .map(|t| {
                    let (c, rest) = split_coefficient(fold_pythagorean(t));
                    (c, rest)
                })
                .collect();
            loop {
                let Some((i, j)) = find_pythagorean_pair(&parts) else {
                    break;
                };
                let coeff = parts[i].0;
                parts.remove(j.max(i));
                parts.remove(j.min(i));
                parts.push((coeff, None));
            }
            Sym::Add(
                parts
                    .into_iter()
                    .map(|(c, rest)| match rest {
                        Some(rest) => apply_coefficient(c, rest),
                        None => Sym::Num(c),
                    })
                    .collect(),
            )
            .canonical()
        }
        Sym::Mul(factors) => {
            Sym::Mul(factors.into_iter().map(fold_pythagorean).collect()).canonical()
        }
        Sym::Pow(b, e) => canonical_pow(fold_pythagorean(*b), fold_pythagorean(*e)),
        Sym::Func(kind, arg) => Sym::Func(kind, Box::new(fold_pythagorean(*arg))),
        leaf => leaf,
    }
}

fn find_pythagorean_pair(parts: &[(f64, Option<Sym>)]) -> Option<(usize, usize)> {
    fn squared_arg(rest: &Option<Sym>, kind: FuncKind) -> Option<&Sym> {
        match rest {
            Some(Sym::Pow(base, exp)) if exp.as_num() == Some(2.0) => match base.as_ref() {
                Sym::Func(k, arg) if *k == kind => Some(arg),
                _ => None,
            },
            _ => None,
        }
    }
    for (i, (ci, resti)) in parts.iter().enumerate() {
        let Some(sin_arg) = squared_arg(resti, FuncKind::Sin) else {
            continue;
        };
        for (j, (cj, restj)) in parts.iter().enumerate() {
            if i == j || ci != cj {
                continue;
            }
            if squared_arg(restj, FuncKind::Cos) == Some(sin_arg) {
                return Some((i, j));
            }
        }
    }
    None
}
