//! Prints the classic three-line calculation the crate exists for.

use texcalc_expr::{Expression, Variable};

fn main() {
    let r = Variable::new("r", 3.0).with_unit("m");
    println!("$$ {r} $$");
    let f = Variable::new("F", 4.0).with_unit("kN");
    println!("$$ {f} $$");
    let m = Expression::new("M", &r * &f).with_unit("kNm");
    println!("$$ {m} $$");
}
