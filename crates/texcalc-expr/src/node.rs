//! Operand nodes and the operator overloads that combine them.
//!
//! Anything that can appear inside an operation (a [`Variable`], a nested
//! [`Expression`], another [`Operation`], or a bare number) converts into a
//! [`Node`]. The standard `+`, `-`, `*`, `/` operators (and unary `-`) are
//! overloaded on all of these, each producing a new [`Operation`], so
//! hierarchies build the way the formulas read:
//!
//! ```
//! use texcalc_expr::{Variable, sqrt};
//!
//! let a = Variable::new("a", 9.0);
//! let b = Variable::new("b", 4.0);
//! let op = &a + sqrt(&b) * 2.0;
//! assert_eq!(op.latex_symbolic(), r"{a} + \sqrt{ {b} } \cdot {2}");
//! assert_eq!(op.eval(), Ok(13.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::expression::Expression;
use crate::operation::{self, Operation, RenderMode};
use crate::variable::Variable;

/// A node of an operation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Node {
    Variable(Variable),
    Operation(Operation),
    Expression(Box<Expression>),
}

impl Node {
    /// Numerically evaluates the node.
    pub fn eval(&self) -> Result<f64, EvalError> {
        match self {
            Node::Variable(v) => v.eval(),
            Node::Operation(o) => o.eval(),
            Node::Expression(e) => e.eval(),
        }
    }

    /// Symbolic rendering of the node.
    pub fn latex_symbolic(&self) -> String {
        self.render(RenderMode::Symbolic)
    }

    /// Substituted rendering of the node.
    pub fn latex_substituted(&self) -> String {
        self.render(RenderMode::Substituted)
    }

    pub(crate) fn render(&self, mode: RenderMode) -> String {
        match (self, mode) {
            (Node::Variable(v), RenderMode::Symbolic) => v.latex_symbolic(),
            (Node::Variable(v), RenderMode::Substituted) => v.latex_substituted(),
            (Node::Operation(o), _) => o.render(mode),
            (Node::Expression(e), RenderMode::Symbolic) => e.latex_symbolic(),
            (Node::Expression(e), RenderMode::Substituted) => e.latex_substituted(),
        }
    }
}

impl From<Variable> for Node {
    fn from(v: Variable) -> Self {
        Node::Variable(v)
    }
}

impl From<&Variable> for Node {
    fn from(v: &Variable) -> Self {
        Node::Variable(v.clone())
    }
}

impl From<Operation> for Node {
    fn from(o: Operation) -> Self {
        Node::Operation(o)
    }
}

impl From<&Operation> for Node {
    fn from(o: &Operation) -> Self {
        Node::Operation(o.clone())
    }
}

impl From<Expression> for Node {
    fn from(e: Expression) -> Self {
        Node::Expression(Box::new(e))
    }
}

impl From<&Expression> for Node {
    fn from(e: &Expression) -> Self {
        Node::Expression(Box::new(e.clone()))
    }
}

impl From<&Node> for Node {
    fn from(n: &Node) -> Self {
        n.clone()
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Variable(Variable::number(v))
    }
}

impl From<i64> for Node {
    fn from(v: i64) -> Self {
        Node::Variable(Variable::number(v as f64))
    }
}

impl From<i32> for Node {
    fn from(v: i32) -> Self {
        Node::Variable(Variable::number(f64::from(v)))
    }
}

macro_rules! impl_node_ops {
    ($($t:ty),+ $(,)?) => {$(
        impl<R: Into<Node>> std::ops::Add<R> for $t {
            type Output = Operation;
            fn add(self, rhs: R) -> Operation {
                operation::sum([Node::from(self), rhs.into()])
            }
        }
        impl<R: Into<Node>> std::ops::Sub<R> for $t {
            type Output = Operation;
            fn sub(self, rhs: R) -> Operation {
                operation::sub(Node::from(self), rhs.into())
            }
        }
        impl<R: Into<Node>> std::ops::Mul<R> for $t {
            type Output = Operation;
            fn mul(self, rhs: R) -> Operation {
                operation::mul([Node::from(self), rhs.into()])
            }
        }
        impl<R: Into<Node>> std::ops::Div<R> for $t {
            type Output = Operation;
            fn div(self, rhs: R) -> Operation {
                operation::div(Node::from(self), rhs.into())
            }
        }
        impl std::ops::Neg for $t {
            type Output = Operation;
            fn neg(self) -> Operation {
                operation::neg(Node::from(self))
            }
        }
    )+};
}

impl_node_ops!(
    Variable,
    &Variable,
    Operation,
    &Operation,
    Expression,
    &Expression,
    Node,
    &Node,
);

macro_rules! impl_scalar_ops {
    ($($s:ty),+ $(,)?) => {$(
        impl_scalar_ops!(@rhs $s, Variable);
        impl_scalar_ops!(@rhs $s, &Variable);
        impl_scalar_ops!(@rhs $s, Operation);
        impl_scalar_ops!(@rhs $s, &Operation);
        impl_scalar_ops!(@rhs $s, Expression);
        impl_scalar_ops!(@rhs $s, &Expression);
        impl_scalar_ops!(@rhs $s, Node);
        impl_scalar_ops!(@rhs $s, &Node);
    )+};
    (@rhs $s:ty, $t:ty) => {
        impl std::ops::Add<$t> for $s {
            type Output = Operation;
            fn add(self, rhs: $t) -> Operation {
                operation::sum([Node::from(self), Node::from(rhs)])
            }
        }
        impl std::ops::Sub<$t> for $s {
            type Output = Operation;
            fn sub(self, rhs: $t) -> Operation {
                operation::sub(Node::from(self), Node::from(rhs))
            }
        }
        impl std::ops::Mul<$t> for $s {
            type Output = Operation;
            fn mul(self, rhs: $t) -> Operation {
                operation::mul([Node::from(self), Node::from(rhs)])
            }
        }
        impl std::ops::Div<$t> for $s {
            type Output = Operation;
            fn div(self, rhs: $t) -> Operation {
                operation::div(Node::from(self), Node::from(rhs))
            }
        }
    };
}

impl_scalar_ops!(f64, i64, i32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_build_operations() {
        let a = Variable::new("a", 5.0);
        assert_eq!((&a + &a).eval(), Ok(10.0));
        assert_eq!((&a - 7.0).eval(), Ok(-2.0));
        assert_eq!((7.0 - &a).eval(), Ok(2.0));
        assert_eq!((2.0 * &a).eval(), Ok(10.0));
        assert_eq!((&a / 2.0).eval(), Ok(2.5));
        assert_eq!((10.0 / &a).eval(), Ok(2.0));
        assert_eq!((2i32 + &a).eval(), Ok(7.0));
        assert_eq!((-&a).eval(), Ok(-5.0));
    }

    #[test]
    fn operators_chain_through_operations() {
        let a = Variable::new("a", 5.0);
        let b = Variable::new("b", 3.0);
        let op = (&a + &b) / (&a - &b);
        assert_eq!(op.eval(), Ok(4.0));
        assert_eq!(
            op.latex_symbolic(),
            r"\frac{ {a} + {b} }{ {a} - {b} }"
        );
    }

    #[test]
    fn scalar_operands_become_literal_leaves() {
        let a = Variable::new("a", 5.0);
        let op = 2i32 + &a;
        assert_eq!(op.latex_symbolic(), "{2} + {a}");
        assert_eq!(op.latex_substituted(), "2 + 5");
    }
}
