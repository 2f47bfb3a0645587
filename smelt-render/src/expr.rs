//! Expressions rendered as source text.

use smelt_core::escape_reserved;
use smelt_expr::{Expr, MemberRef, TypeRef};

use crate::types::type_name;

/// Render `expr` in an operand position within the type `current`.
///
/// `current` decides whether static member accesses need qualification:
/// members of the enclosing type are emitted bare.
pub fn render_expr(expr: &Expr, current: &TypeRef) -> String {
    match expr {
        Expr::Literal(value) => value.to_string(),
        Expr::Default(ty) => format!("default({})", type_name(ty)),
        Expr::Var(var) => escape_reserved(var.name()),
        Expr::This(_) => "this".to_string(),
        Expr::Base(_) => "base".to_string(),
        Expr::Unary { op, operand } => {
            format!("{}{}", op.symbol(), render_operand(operand, current))
        }
        Expr::Binary { op, left, right } => format!(
            "{} {} {}",
            render_operand(left, current),
            op.symbol(),
            render_operand(right, current)
        ),
        Expr::Conditional {
            test,
            if_true,
            if_false,
        } => format!(
            "{} ? {} : {}",
            render_operand(test, current),
            render_operand(if_true, current),
            render_operand(if_false, current)
        ),
        Expr::Assign { target, value } => format!(
            "{} = {}",
            render_expr(target, current),
            render_operand(value, current)
        ),
        Expr::Call {
            method,
            receiver,
            args,
        } => {
            let args = render_args(args, current);
            format!(
                "{}{}({})",
                member_prefix(method, receiver.as_deref(), current),
                escape_reserved(method.name()),
                args
            )
        }
        Expr::FieldAccess { field, receiver } => format!(
            "{}{}",
            member_prefix(field, receiver.as_deref(), current),
            escape_reserved(field.name())
        ),
        Expr::PropertyAccess { property, receiver } => format!(
            "{}{}",
            member_prefix(property, receiver.as_deref(), current),
            escape_reserved(property.name())
        ),
        Expr::New { ty, args, .. } => {
            format!("new {}({})", type_name(ty), render_args(args, current))
        }
        // translation lifts multi-statement blocks out of operand positions;
        // a surviving single-statement block is just its one expression
        Expr::Block(block) => match block.statements.as_slice() {
            [only] => render_expr(only, current),
            _ => block
                .statements
                .last()
                .map(|last| render_expr(last, current))
                .unwrap_or_default(),
        },
    }
}

/// Render a child operand, parenthesizing compound expressions.
fn render_operand(expr: &Expr, current: &TypeRef) -> String {
    let rendered = render_expr(expr, current);
    match expr {
        Expr::Binary { .. } | Expr::Conditional { .. } | Expr::Assign { .. } => {
            format!("({rendered})")
        }
        _ => rendered,
    }
}

fn render_args(args: &[Expr], current: &TypeRef) -> String {
    let rendered: Vec<String> = args.iter().map(|arg| render_expr(arg, current)).collect();
    rendered.join(", ")
}

/// The access prefix of a member expression: an explicit receiver, a type
/// qualification for foreign statics, or nothing for the enclosing type.
fn member_prefix(member: &MemberRef, receiver: Option<&Expr>, current: &TypeRef) -> String {
    if let Some(receiver) = receiver {
        return format!("{}.", render_operand(receiver, current));
    }
    if member.is_static() && member.owner() != current {
        return format!("{}.", type_name(member.owner()));
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smelt_expr::{BinaryOp, MemberKind, ParamSig, Var, Visibility};

    fn current() -> TypeRef {
        TypeRef::string()
    }

    #[test]
    fn literals_and_variables() {
        assert_eq!(render_expr(&Expr::literal("Hello!"), &current()), "\"Hello!\"");
        let v = Var::new("count", TypeRef::int());
        assert_eq!(render_expr(&v.read(), &current()), "count");
    }

    #[test]
    fn compound_operands_are_parenthesized() {
        let sum = Expr::binary(BinaryOp::Add, Expr::literal(1), Expr::literal(2)).unwrap();
        let doubled =
            Expr::binary(BinaryOp::Multiply, sum, Expr::literal(3)).unwrap();
        assert_eq!(render_expr(&doubled, &current()), "(1 + 2) * 3");
    }

    #[test]
    fn conditionals_render_ternary() {
        let expr = Expr::conditional(
            Expr::literal(true),
            Expr::literal(1),
            Expr::literal(2),
        )
        .unwrap();
        assert_eq!(render_expr(&expr, &current()), "true ? 1 : 2");
    }

    #[test]
    fn foreign_static_calls_are_qualified() {
        let parse = MemberRef::new(
            TypeRef::int(),
            MemberKind::Method,
            "Parse",
            vec![ParamSig::new("text", TypeRef::string())],
            TypeRef::int(),
            true,
            Visibility::Public,
        );
        let call = parse.call(vec![Expr::literal("42")]).unwrap();
        assert_eq!(render_expr(&call, &current()), "int.Parse(\"42\")");

        let local = MemberRef::new(
            current(),
            MemberKind::Method,
            "GetInt32",
            vec![],
            TypeRef::int(),
            true,
            Visibility::Private,
        );
        let call = local.call(vec![]).unwrap();
        assert_eq!(render_expr(&call, &current()), "GetInt32()");
    }

    #[test]
    fn reserved_names_are_escaped() {
        let v = Var::new("event", TypeRef::int());
        assert_eq!(render_expr(&v.read(), &current()), "@event");
    }
}
