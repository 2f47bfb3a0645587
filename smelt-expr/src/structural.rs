//! Identity-erasing structural comparison of expression trees.
//!
//! Two trees are structurally equal when they have the same shape, the same
//! literals and types, and their variables agree by name and type rather than
//! by binding identity. The generic-parameter cache and the block-extraction
//! dedup both key on this notion, so independently constructed but equal
//! trees collapse.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::expr::{Block, Expr};

/// A hashable, comparable wrapper around an expression tree with structural
/// semantics. Suitable as a map key.
#[derive(Debug, Clone)]
pub struct StructuralExpr(pub Expr);

impl PartialEq for StructuralExpr {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(&self.0, &other.0)
    }
}

impl Eq for StructuralExpr {}

impl Hash for StructuralExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_expr(&self.0, state);
    }
}

/// Structural hash of a tree, consistent with [`structural_eq`].
pub fn structural_hash(expr: &Expr) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_expr(expr, &mut hasher);
    hasher.finish()
}

/// Structural equality of two trees.
pub fn structural_eq(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Literal(x), Expr::Literal(y)) => x == y,
        (Expr::Default(x), Expr::Default(y)) => x == y,
        (Expr::Var(x), Expr::Var(y)) => x.name() == y.name() && x.ty() == y.ty(),
        (Expr::This(x), Expr::This(y)) | (Expr::Base(x), Expr::Base(y)) => x == y,
        (
            Expr::Unary { op: xo, operand: xe },
            Expr::Unary { op: yo, operand: ye },
        ) => xo == yo && structural_eq(xe, ye),
        (
            Expr::Binary {
                op: xo,
                left: xl,
                right: xr,
            },
            Expr::Binary {
                op: yo,
                left: yl,
                right: yr,
            },
        ) => xo == yo && structural_eq(xl, yl) && structural_eq(xr, yr),
        (
            Expr::Conditional {
                test: xt,
                if_true: xa,
                if_false: xb,
            },
            Expr::Conditional {
                test: yt,
                if_true: ya,
                if_false: yb,
            },
        ) => structural_eq(xt, yt) && structural_eq(xa, ya) && structural_eq(xb, yb),
        (
            Expr::Assign {
                target: xt,
                value: xv,
            },
            Expr::Assign {
                target: yt,
                value: yv,
            },
        ) => structural_eq(xt, yt) && structural_eq(xv, yv),
        (
            Expr::Call {
                method: xm,
                receiver: xr,
                args: xa,
            },
            Expr::Call {
                method: ym,
                receiver: yr,
                args: ya,
            },
        ) => {
            xm.name() == ym.name()
                && xm.owner() == ym.owner()
                && option_eq(xr, yr)
                && slice_eq(xa, ya)
        }
        (
            Expr::FieldAccess {
                field: xf,
                receiver: xr,
            },
            Expr::FieldAccess {
                field: yf,
                receiver: yr,
            },
        ) => xf.name() == yf.name() && xf.owner() == yf.owner() && option_eq(xr, yr),
        (
            Expr::PropertyAccess {
                property: xp,
                receiver: xr,
            },
            Expr::PropertyAccess {
                property: yp,
                receiver: yr,
            },
        ) => xp.name() == yp.name() && xp.owner() == yp.owner() && option_eq(xr, yr),
        (
            Expr::New {
                ty: xt, args: xa, ..
            },
            Expr::New {
                ty: yt, args: ya, ..
            },
        ) => xt == yt && slice_eq(xa, ya),
        (Expr::Block(x), Expr::Block(y)) => block_eq(x, y),
        _ => false,
    }
}

fn block_eq(a: &Block, b: &Block) -> bool {
    a.variables.len() == b.variables.len()
        && a.variables
            .iter()
            .zip(&b.variables)
            .all(|(x, y)| x.name() == y.name() && x.ty() == y.ty())
        && slice_eq(&a.statements, &b.statements)
}

fn option_eq(a: &Option<Box<Expr>>, b: &Option<Box<Expr>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => structural_eq(x, y),
        _ => false,
    }
}

fn slice_eq(a: &[Expr], b: &[Expr]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structural_eq(x, y))
}

fn hash_expr<H: Hasher>(expr: &Expr, state: &mut H) {
    core::mem::discriminant(expr).hash(state);
    match expr {
        Expr::Literal(value) => value.hash(state),
        Expr::Default(ty) => ty.hash(state),
        Expr::Var(var) => {
            var.name().hash(state);
            var.ty().hash(state);
        }
        Expr::This(ty) | Expr::Base(ty) => ty.hash(state),
        Expr::Unary { op, operand } => {
            op.hash(state);
            hash_expr(operand, state);
        }
        Expr::Binary { op, left, right } => {
            op.hash(state);
            hash_expr(left, state);
            hash_expr(right, state);
        }
        Expr::Conditional {
            test,
            if_true,
            if_false,
        } => {
            hash_expr(test, state);
            hash_expr(if_true, state);
            hash_expr(if_false, state);
        }
        Expr::Assign { target, value } => {
            hash_expr(target, state);
            hash_expr(value, state);
        }
        Expr::Call {
            method,
            receiver,
            args,
        } => {
            method.name().hash(state);
            method.owner().hash(state);
            hash_option(receiver, state);
            for arg in args {
                hash_expr(arg, state);
            }
        }
        Expr::FieldAccess { field, receiver } => {
            field.name().hash(state);
            field.owner().hash(state);
            hash_option(receiver, state);
        }
        Expr::PropertyAccess { property, receiver } => {
            property.name().hash(state);
            property.owner().hash(state);
            hash_option(receiver, state);
        }
        Expr::New { ty, args, .. } => {
            ty.hash(state);
            for arg in args {
                hash_expr(arg, state);
            }
        }
        Expr::Block(block) => {
            block.variables.len().hash(state);
            for var in &block.variables {
                var.name().hash(state);
                var.ty().hash(state);
            }
            for statement in &block.statements {
                hash_expr(statement, state);
            }
        }
    }
}

fn hash_option<H: Hasher>(receiver: &Option<Box<Expr>>, state: &mut H) {
    receiver.is_some().hash(state);
    if let Some(receiver) = receiver {
        hash_expr(receiver, state);
    }
}
