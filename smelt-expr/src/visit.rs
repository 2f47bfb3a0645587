//! Pre-order traversal over expression trees.

use crate::expr::Expr;

/// Visit `expr` and every child, parents first.
pub fn walk(expr: &Expr, visit: &mut impl FnMut(&Expr)) {
    visit(expr);
    each_child(expr, &mut |child| walk(child, visit));
}

/// Apply `f` to each direct child of `expr`.
pub fn each_child(expr: &Expr, f: &mut impl FnMut(&Expr)) {
    match expr {
        Expr::Literal(_) | Expr::Default(_) | Expr::Var(_) | Expr::This(_) | Expr::Base(_) => {}
        Expr::Unary { operand, .. } => f(operand),
        Expr::Binary { left, right, .. } => {
            f(left);
            f(right);
        }
        Expr::Conditional {
            test,
            if_true,
            if_false,
        } => {
            f(test);
            f(if_true);
            f(if_false);
        }
        Expr::Assign { target, value } => {
            f(target);
            f(value);
        }
        Expr::Call { receiver, args, .. } => {
            if let Some(receiver) = receiver {
                f(receiver);
            }
            for arg in args {
                f(arg);
            }
        }
        Expr::FieldAccess { receiver, .. } | Expr::PropertyAccess { receiver, .. } => {
            if let Some(receiver) = receiver {
                f(receiver);
            }
        }
        Expr::New { args, .. } => {
            for arg in args {
                f(arg);
            }
        }
        Expr::Block(block) => {
            for statement in &block.statements {
                f(statement);
            }
        }
    }
}
