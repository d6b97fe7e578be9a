//! Dense univariate polynomials over `f64`, used by `factor`, `cancel`, and
//! `apart`.
//!
//! Coefficients that land within `1e-9` of an integer are snapped, so the
//! usual integer-coefficient inputs survive repeated division and GCD steps
//! exactly.

use crate::error::SymbolicError;
use crate::sym::Sym;

const SNAP_TOLERANCE: f64 = 1e-9;

fn snap(v: f64) -> f64 {
    let rounded = v.round();
    if (v - rounded).abs() < SNAP_TOLERANCE {
        rounded
    } else {
        v
    }
}

/// A dense univariate polynomial; `coeffs[i]` multiplies `x^i`.
///
/// The zero polynomial is the empty coefficient vector; any other value keeps
/// a nonzero leading coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    coeffs: Vec<f64>,
}

impl Poly {
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    pub fn constant(c: f64) -> Self {
        Self::from_coeffs(vec![c])
    }

    /// The monomial `x`.
    pub fn x() -> Self {
        Self::from_coeffs(vec![0.0, 1.0])
    }

    pub fn from_coeffs(coeffs: Vec<f64>) -> Self {
        let mut coeffs: Vec<f64> = coeffs.into_iter().map(snap).collect();
        while coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn leading(&self) -> f64 {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    pub fn coeff(&self, power: usize) -> f64 {
        self.coeffs.get(power).copied().unwrap_or(0.0)
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let n = self.coeffs.len().max(other.coeffs.len());
        Poly::from_coeffs((0..n).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Poly::from_coeffs(out)
    }

    pub fn scale(&self, factor: f64) -> Poly {
        Poly::from_coeffs(self.coeffs.iter().map(|c| c * factor).collect())
    }

    pub fn pow(&self, exponent: usize) -> Poly {
        let mut out = Poly::constant(1.0);
        for _ in 0..exponent {
            out = out.mul(self);
        }
        out
    }

    /// Euclidean division; `None` when dividing by zero.
    pub fn div_rem(&self, divisor: &Poly) -> Option<(Poly, Poly)> {
        if divisor.is_zero() {
            return None;
        }
        let mut remainder = self.coeffs.clone();
        let dlead = divisor.leading();
        let ddeg = divisor.degree();
        if remainder.len() < divisor.coeffs.len() {
            return Some((Poly::zero(), self.clone()));
        }
        let mut quotient = vec![0.0; remainder.len() - ddeg];
        while remainder.len() >= divisor.coeffs.len() {
            let shift = remainder.len() - divisor.coeffs.len();
            let factor = remainder.last().copied().unwrap_or(0.0) / dlead;
            quotient[shift] = factor;
            for (i, c) in divisor.coeffs.iter().enumerate() {
                remainder[shift + i] = snap(remainder[shift + i] - factor * c);
            }
            // the top coefficient cancels by construction
            remainder.pop();
            while remainder.last() == Some(&0.0) {
                remainder.pop();
            }
        }
        Some((Poly::from_coeffs(quotient), Poly::from_coeffs(remainder)))
    }

    /// Monic greatest common divisor via the Euclidean algorithm.
    pub fn gcd(&self, other: &Poly) -> Poly {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let (_, r) = match a.div_rem(&b) {
                Some(qr) => qr,
                None => break,
            };
            a = b;
            b = r.monic();
        }
        a.monic()
    }

    /// Divides by the leading coefficient; zero stays zero.
    pub fn monic(&self) -> Poly {
        if self.is_zero() {
            return Poly::zero();
        }
        self.scale(1.0 / self.leading())
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn derivative(&self) -> Poly {
        Poly::from_coeffs(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| i as f64 * c)
                .collect(),
        )
    }

    /// Splits off rational roots: returns the leading coefficient, the roots
    /// found (with multiplicity), and the unfactored remainder (monic).
    ///
    /// Root search uses the rational root theorem, so it needs integer
    /// coefficients; polynomials that are not integral after snapping return
    /// no roots.
    pub fn factor_roots(&self) -> (f64, Vec<f64>, Poly) {
        let leading = self.leading();
        let mut rest = self.monic();
        let mut roots = Vec::new();
        loop {
            if rest.degree() == 0 {
                break;
            }
            if rest.coeff(0) == 0.0 {
                // x divides
                roots.push(0.0);
                let (q, _) = match rest.div_rem(&Poly::x()) {
                    Some(qr) => qr,
                    None => break,
                };
                rest = q;
                continue;
            }
            match rest.find_rational_root() {
                Some(root) => {
                    roots.push(root);
                    let linear = Poly::from_coeffs(vec![-root, 1.0]);
                    let (q, _) = match rest.div_rem(&linear) {
                        Some(qr) => qr,
                        None => break,
                    };
                    rest = q;
                }
                None => break,
            }
        }
        (leading, roots, rest)
    }

    fn find_rational_root(&self) -> Option<f64> {
        // Work on an integer-scaled copy: multiply through by the smallest
        // power of 10 that makes every coefficient integral, up to a point.
        let mut scaled = self.clone();
        let mut tries = 0;
        while scaled.coeffs.iter().any(|c| c.fract() != 0.0) {
            if tries >= 4 {
                return None;
            }
            scaled = scaled.scale(10.0);
            tries += 1;
        }
        let constant = scaled.coeff(0).abs();
        let leading = scaled.leading().abs();
        if constant == 0.0 || leading == 0.0 {
            return None;
        }
        let ps = divisors(constant as i64);
        let qs = divisors(leading as i64);
        for p in &ps {
            for q in &qs {
                for sign in [1.0, -1.0] {
                    let candidate = sign * (*p as f64) / (*q as f64);
                    if self.eval(candidate).abs() < SNAP_TOLERANCE {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }
}

fn divisors(n: i64) -> Vec<i64> {
    let n = n.abs();
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            if d != n / d {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out.sort_unstable();
    out
}

/// Converts a canonical, expanded form into a polynomial in `var`.
pub fn poly_from_sym(sym: &Sym, var: &str) -> Result<Poly, SymbolicError> {
    match sym {
        Sym::Num(n) => Ok(Poly::constant(*n)),
        Sym::Symbol(name) if name == var => Ok(Poly::x()),
        Sym::Symbol(name) => Err(SymbolicError::NotPolynomial(name.clone())),
        Sym::Add(terms) => {
            let mut acc = Poly::zero();
            for t in terms {
                acc = acc.add(&poly_from_sym(t, var)?);
            }
            Ok(acc)
        }
        Sym::Mul(factors) => {
            let mut acc = Poly::constant(1.0);
            for f in factors {
                acc = acc.mul(&poly_from_sym(f, var)?);
            }
            Ok(acc)
        }
        Sym::Pow(base, exp) => match exp.as_num() {
            Some(e) if e.fract() == 0.0 && e >= 0.0 => {
                Ok(poly_from_sym(base, var)?.pow(e as usize))
            }
            _ => Err(SymbolicError::NotPolynomial(var.to_string())),
        },
        Sym::Func(..) => Err(SymbolicError::NotPolynomial(var.to_string())),
    }
}

/// Renders a polynomial back into canonical-form terms, constant first.
pub fn poly_to_sym(poly: &Poly, var: &str) -> Sym {
    if poly.is_zero() {
        return Sym::Num(0.0);
    }
    let mut terms = Vec::new();
    for power in 0..=poly.degree() {
        let c = poly.coeff(power);
        if c == 0.0 {
            continue;
        }
        let term = match power {
            0 => Sym::Num(c),
            _ => {
                let base = if power == 1 {
                    Sym::Symbol(var.to_string())
                } else {
                    Sym::Pow(
                        Box::new(Sym::Symbol(var.to_string())),
                        Box::new(Sym::Num(power as f64)),
                    )
                };
                if c == 1.0 {
                    base
                } else {
                    Sym::Mul(vec![Sym::Num(c), base])
                }
            }
        };
        terms.push(term);
    }
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        Sym::Add(terms)
    }
}
