use expect_test::expect;
use texcalc_expr::operation::{div, maximum, pow, sqr};
use texcalc_expr::{Expression, Variable, cos, sin};
use texcalc_symbolic::{Rewrite, SymbolicError};

#[test]
fn simplify_collects_like_terms() {
    let v1 = Variable::symbolic("v1");
    let v2 = Variable::symbolic("v2");
    let v3 = Variable::new("v3", 1.23);
    let v4 = Variable::new("v4", 4.56);
    let op = (&v1 + &v1 + &v2 + &v3 + &v2 + &v3) - &v4;

    let kept = op.simplify(false).unwrap();
    expect![[r"\left( - {v4} \right) + {2} \cdot {v1} + {2} \cdot {v2} + {2} \cdot {v3}"]]
        .assert_eq(&kept.latex_symbolic());

    let substituted = op.simplify(true).unwrap();
    expect![[r"{-2.1} + {2} \cdot {v1} + {2} \cdot {v2}"]]
        .assert_eq(&substituted.latex_symbolic());
}

#[test]
fn simplify_applies_pythagorean_identity() {
    let x = Variable::symbolic("x");
    let op = sqr(sin(&x)) + sqr(cos(&x));
    let out = op.simplify(false).unwrap();
    assert_eq!(out.latex_symbolic(), "{1}");
    assert_eq!(out.eval(), Ok(1.0));
}

#[test]
fn simplify_cancels_rational_expressions() {
    let x = Variable::symbolic("x");
    let op = div(
        pow(&x, 3.0) + sqr(&x) - &x - 1.0,
        sqr(&x) + 2.0 * &x + 1.0,
    );
    let out = op.simplify(false).unwrap();
    assert_eq!(out.latex_symbolic(), r"{-1} + {x}");
}

#[test]
fn expand_distributes_powers_and_products() {
    let x = Variable::symbolic("x");

    let square = pow(&x + 1.0, 2.0).expand(false).unwrap();
    expect![[r"{1} + { {x} }^{ {2} } + {2} \cdot {x}"]].assert_eq(&square.latex_symbolic());

    let product = ((&x + 2.0) * (&x - 3.0)).expand(false).unwrap();
    expect![[r"{-6} + { {x} }^{ {2} } + \left( - {x} \right)"]]
        .assert_eq(&product.latex_symbolic());
}

#[test]
fn factor_splits_rational_roots() {
    let x = Variable::symbolic("x");
    let out = (sqr(&x) + 5.0 * &x + 6.0).factor(false).unwrap();
    assert_eq!(
        out.latex_symbolic(),
        r"\left( {x} + {3} \right) \cdot \left( {x} + {2} \right)"
    );
}

#[test]
fn factor_extracts_monomial_factor() {
    let x = Variable::symbolic("x");
    let out = (2.0 * sqr(&x) + 4.0 * &x).factor(false).unwrap();
    assert_eq!(
        out.latex_symbolic(),
        r"{2} \cdot \left( {x} + {2} \right) \cdot {x}"
    );
}

#[test]
fn collect_groups_by_symbol_power() {
    let x = Variable::symbolic("x");
    let y = Variable::symbolic("y");
    let op = &x * &y + &x - 3.0 + 2.0 * sqr(&x);
    let out = op.collect("x", false).unwrap();
    assert_eq!(
        out.latex_symbolic(),
        r"{2} \cdot { {x} }^{ {2} } + \left( {1} + {y} \right) \cdot {x} + {-3}"
    );
}

#[test]
fn cancel_reduces_common_factors() {
    let x = Variable::symbolic("x");
    let op = div(sqr(&x) + 3.0 * &x + 2.0, sqr(&x) + &x);
    let out = op.cancel(false).unwrap();
    assert_eq!(out.latex_symbolic(), r"\frac{ {2} + {x} }{ {x} }");
}

#[test]
fn apart_decomposes_distinct_linear_factors() {
    let x = Variable::symbolic("x");
    let op = div(3.0 * &x + 5.0, sqr(&x) + 3.0 * &x + 2.0);
    let out = op.apart(false).unwrap();
    expect![[r"\frac{ {2} }{ {x} + {1} } + \frac{ {1} }{ {x} + {2} }"]]
        .assert_eq(&out.latex_symbolic());
}

#[test]
fn apart_falls_back_without_linear_split() {
    let x = Variable::symbolic("x");
    // denominator x^2 + 1 has no rational roots
    let op = div(&x + 1.0, sqr(&x) + 1.0);
    let out = op.apart(false).unwrap();
    assert_eq!(
        out.latex_symbolic(),
        r"\frac{ {1} + {x} }{ {1} + { {x} }^{ {2} } }"
    );
}

#[test]
fn multivariate_rational_rewrites_are_rejected() {
    let x = Variable::symbolic("x");
    let y = Variable::symbolic("y");
    assert_eq!(
        div(&x, &y).cancel(false),
        Err(SymbolicError::NotUnivariate)
    );
    assert_eq!(
        maximum([&x, &y]).simplify(false),
        Err(SymbolicError::Unsupported("max"))
    );
}

#[test]
fn rewrites_keep_variable_units() {
    let v = Variable::new("v", 2.0).with_unit("m");
    let out = (&v + &v).simplify(false).unwrap();
    assert_eq!(out.latex_symbolic(), r"{2} \cdot {v}");
    assert_eq!(out.latex_substituted(), r"2 \cdot 2 \ \mathrm{m}");
}

#[test]
fn expression_rewrites_keep_name_and_unit() {
    let v1 = Variable::symbolic("v_1");
    let e = Expression::new("e", &v1 + &v1).with_unit("kN");
    let out = e.simplify(false).unwrap();
    assert_eq!(out.name, "e");
    assert_eq!(out.unit, "kN");
    assert_eq!(out.operation.latex_symbolic(), r"{2} \cdot {v_1}");
}
