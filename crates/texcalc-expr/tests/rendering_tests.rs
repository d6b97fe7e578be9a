use expect_test::expect;
use texcalc_expr::{
    Expression, MacroBody, MacroCommand, NumberFormat, Variable, sbrackets, sqr, sqrt,
};

#[test]
fn calculation_line_renders_all_four_parts() {
    let a = Variable::new("a", 3.0).with_unit("mm");
    let f = Variable::new("F", 16.0).with_unit("kN");
    let g = Variable::new("g", -2.0);
    let e = Expression::new("E_1^i", sbrackets((&a + sqrt(&f)) / 2.0) - sqr(&g)).with_unit("kNm");
    expect![[
        r"E_1^i = \left[ \frac{ {a} + \sqrt{ {F} } }{ {2} } \right] - {g}^2 = \left[ \frac{ 3 \ \mathrm{mm} + \sqrt{ 16 \ \mathrm{kN} } }{ 2 } \right] - \left( -2 \right)^2 = \left( -0.5 \right) \ \mathrm{kNm}"
    ]]
    .assert_eq(&e.to_string());
}

#[test]
fn scientific_and_fixed_formats_render() {
    let scientific = Variable::new("F", 4.34).with_unit("kN").with_exponent(-2);
    expect![[r"F = { 434 \cdot 10^{-2} } \ \mathrm{kN}"]].assert_eq(&scientific.to_string());

    let fixed = Variable::new("F", 2.56)
        .with_unit("kN")
        .with_format(NumberFormat::Fixed(4));
    expect![[r"F = 2.5600 \ \mathrm{kN}"]].assert_eq(&fixed.to_string());
}

#[test]
fn expression_converts_to_variable_and_exports() {
    let r = Variable::new("r", 3.0).with_unit("m");
    let f = Variable::new("F", 4.0).with_unit("kN");
    let m = Expression::new("M", &r * &f).with_unit("kNm");
    let v = m.to_variable("M_7").unwrap();
    expect![[r"M_7 = 12 \ \mathrm{kNm}"]].assert_eq(&v.to_string());
    expect![[r"\def\MYM{M_7 = 12 \ \mathrm{kNm}}"]].assert_eq(
        &v.latex_macro("MYM", MacroBody::Full, MacroCommand::Def)
            .unwrap(),
    );
}

#[test]
fn symbolic_variables_render_without_values() {
    let x = Variable::symbolic("x");
    let c = Variable::new("c", 2.0);
    let e = Expression::new("e", (&x + &c) * &c);
    // symbolic leaves keep their names in the substituted form
    expect![[r"{x} + 2 \cdot 2"]].assert_eq(&e.operation.latex_substituted());
    // the whole expression cannot evaluate, so the result renders as its name
    expect![[r"{e}"]].assert_eq(&e.latex_result());
}
