//! Constant evaluation of expression bodies.
//!
//! Enough of an interpreter to make compiled types behaviorally complete:
//! literals, defaults, variables, assignment, blocks, conditionals, and
//! arithmetic/logic over constants. Anything that would need an object model
//! (calls, field state, instantiation) reports why it cannot run.

use smelt_expr::{BinaryOp, ConstValue, Expr, TypeRef, UnaryOp, Var};

/// Variable bindings, identity-keyed.
pub(crate) struct Env {
    bindings: Vec<(Var, ConstValue)>,
}

impl Env {
    pub(crate) fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub(crate) fn bind(&mut self, var: Var, value: ConstValue) {
        self.bindings.push((var, value));
    }

    fn get(&self, var: &Var) -> Option<ConstValue> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound.same(var))
            .map(|(_, value)| value.clone())
    }

    fn set(&mut self, var: &Var, value: ConstValue) -> Result<(), String> {
        for (bound, slot) in self.bindings.iter_mut().rev() {
            if bound.same(var) {
                *slot = value;
                return Ok(());
            }
        }
        Err(format!("assignment to unbound variable '{}'", var.name()))
    }

    fn truncate(&mut self, len: usize) {
        self.bindings.truncate(len);
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }
}

/// The zero value of a type: what `default` produces.
pub(crate) fn zero_value(ty: &TypeRef) -> ConstValue {
    match ty {
        TypeRef::Builtin(builtin) => builtin.zero(),
        _ => ConstValue::Null,
    }
}

pub(crate) fn evaluate(expr: &Expr, env: &mut Env) -> Result<ConstValue, String> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Default(ty) => Ok(zero_value(ty)),
        Expr::Var(var) => env
            .get(var)
            .ok_or_else(|| format!("unbound variable '{}'", var.name())),
        Expr::Assign { target, value } => {
            let value = evaluate(value, env)?;
            match target.as_ref() {
                Expr::Var(var) => {
                    env.set(var, value.clone())?;
                    Ok(value)
                }
                other => Err(format!(
                    "assignment to a {} is not constant-evaluable",
                    other.kind_label()
                )),
            }
        }
        Expr::Block(block) => {
            let depth = env.len();
            for var in &block.variables {
                let zero = zero_value(var.ty());
                env.bind(var.clone(), zero);
            }
            let mut result = ConstValue::Null;
            for statement in &block.statements {
                result = evaluate(statement, env)?;
            }
            env.truncate(depth);
            Ok(result)
        }
        Expr::Conditional {
            test,
            if_true,
            if_false,
        } => match evaluate(test, env)? {
            ConstValue::Bool(true) => evaluate(if_true, env),
            ConstValue::Bool(false) => evaluate(if_false, env),
            other => Err(format!("conditional test evaluated to '{other}'")),
        },
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, env)?;
            apply_unary(*op, value)
        }
        Expr::Binary { op, left, right } => {
            // short-circuit before evaluating the right operand
            if matches!(op, BinaryOp::And | BinaryOp::Or) {
                let lhs = evaluate(left, env)?;
                return match (op, lhs) {
                    (BinaryOp::And, ConstValue::Bool(false)) => Ok(ConstValue::Bool(false)),
                    (BinaryOp::Or, ConstValue::Bool(true)) => Ok(ConstValue::Bool(true)),
                    (_, ConstValue::Bool(_)) => evaluate(right, env),
                    (_, other) => Err(format!("logical operand evaluated to '{other}'")),
                };
            }
            let lhs = evaluate(left, env)?;
            let rhs = evaluate(right, env)?;
            apply_binary(*op, lhs, rhs)
        }
        other => Err(format!(
            "a {} expression is not constant-evaluable",
            other.kind_label()
        )),
    }
}

fn apply_unary(op: UnaryOp, value: ConstValue) -> Result<ConstValue, String> {
    match (op, value) {
        (UnaryOp::Not, ConstValue::Bool(v)) => Ok(ConstValue::Bool(!v)),
        (UnaryOp::Negate, ConstValue::Int(v)) => Ok(ConstValue::Int(-v)),
        (UnaryOp::Negate, ConstValue::Long(v)) => Ok(ConstValue::Long(-v)),
        (UnaryOp::Negate, ConstValue::Double(v)) => Ok(ConstValue::Double(-v)),
        (op, value) => Err(format!("operator '{}' undefined for '{value}'", op.symbol())),
    }
}

fn apply_binary(op: BinaryOp, lhs: ConstValue, rhs: ConstValue) -> Result<ConstValue, String> {
    use BinaryOp::*;
    use ConstValue::*;

    if matches!(op, Equal | NotEqual) {
        let equal = lhs == rhs;
        return Ok(Bool(if op == Equal { equal } else { !equal }));
    }
    match (lhs, rhs) {
        (Int(a), Int(b)) => int_op(op, a, b),
        (Long(a), Long(b)) => long_op(op, a, b),
        (Double(a), Double(b)) => double_op(op, a, b),
        (Str(a), Str(b)) if op == Add => Ok(Str(format!("{a}{b}"))),
        (a, b) => Err(format!(
            "operator '{}' undefined for '{a}' and '{b}'",
            op.symbol()
        )),
    }
}

fn int_op(op: BinaryOp, a: i32, b: i32) -> Result<ConstValue, String> {
    use BinaryOp::*;
    use ConstValue::*;
    Ok(match op {
        Add => Int(a.wrapping_add(b)),
        Subtract => Int(a.wrapping_sub(b)),
        Multiply => Int(a.wrapping_mul(b)),
        Divide => Int(a.checked_div(b).ok_or("division by zero")?),
        Modulo => Int(a.checked_rem(b).ok_or("division by zero")?),
        LessThan => Bool(a < b),
        LessOrEqual => Bool(a <= b),
        GreaterThan => Bool(a > b),
        GreaterOrEqual => Bool(a >= b),
        other => return Err(format!("operator '{}' undefined for int", other.symbol())),
    })
}

fn long_op(op: BinaryOp, a: i64, b: i64) -> Result<ConstValue, String> {
    use BinaryOp::*;
    use ConstValue::*;
    Ok(match op {
        Add => Long(a.wrapping_add(b)),
        Subtract => Long(a.wrapping_sub(b)),
        Multiply => Long(a.wrapping_mul(b)),
        Divide => Long(a.checked_div(b).ok_or("division by zero")?),
        Modulo => Long(a.checked_rem(b).ok_or("division by zero")?),
        LessThan => Bool(a < b),
        LessOrEqual => Bool(a <= b),
        GreaterThan => Bool(a > b),
        GreaterOrEqual => Bool(a >= b),
        other => return Err(format!("operator '{}' undefined for long", other.symbol())),
    })
}

fn double_op(op: BinaryOp, a: f64, b: f64) -> Result<ConstValue, String> {
    use BinaryOp::*;
    use ConstValue::*;
    Ok(match op {
        Add => Double(a + b),
        Subtract => Double(a - b),
        Multiply => Double(a * b),
        Divide => Double(a / b),
        Modulo => Double(a % b),
        LessThan => Bool(a < b),
        LessOrEqual => Bool(a <= b),
        GreaterThan => Bool(a > b),
        GreaterOrEqual => Bool(a >= b),
        other => return Err(format!("operator '{}' undefined for double", other.symbol())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smelt_expr::Block;

    fn eval(expr: &Expr) -> ConstValue {
        evaluate(expr, &mut Env::new()).unwrap()
    }

    #[test]
    fn literals_and_defaults() {
        assert_eq!(eval(&Expr::literal("Hello!")), ConstValue::from("Hello!"));
        assert_eq!(eval(&Expr::default_of(TypeRef::int())), ConstValue::Int(0));
        assert_eq!(
            eval(&Expr::default_of(TypeRef::string())),
            ConstValue::Null
        );
    }

    #[test]
    fn blocks_bind_locals_and_yield_trailing_value() {
        let v = Var::new("v", TypeRef::int());
        let block = Expr::block(Block::with_variables(
            vec![v.clone()],
            vec![
                v.assign(Expr::literal(2)).unwrap(),
                Expr::binary(BinaryOp::Multiply, v.read(), Expr::literal(21)).unwrap(),
            ],
        ));
        assert_eq!(eval(&block), ConstValue::Int(42));
    }

    #[test]
    fn conditionals_pick_the_right_arm() {
        let expr = Expr::conditional(
            Expr::binary(BinaryOp::LessThan, Expr::literal(1), Expr::literal(2)).unwrap(),
            Expr::literal("yes"),
            Expr::literal("no"),
        )
        .unwrap();
        assert_eq!(eval(&expr), ConstValue::from("yes"));
    }

    #[test]
    fn division_by_zero_reports() {
        let expr = Expr::binary(BinaryOp::Divide, Expr::literal(1), Expr::literal(0)).unwrap();
        let err = evaluate(&expr, &mut Env::new()).unwrap_err();
        assert_eq!(err, "division by zero");
    }

    #[test]
    fn string_concatenation() {
        let expr =
            Expr::binary(BinaryOp::Add, Expr::literal("Hello"), Expr::literal("!")).unwrap();
        assert_eq!(eval(&expr), ConstValue::from("Hello!"));
    }

    #[test]
    fn short_circuit_skips_right_operand() {
        // right operand would fail if evaluated
        let bad = Var::new("unbound", TypeRef::bool());
        let expr =
            Expr::binary(BinaryOp::And, Expr::literal(false), bad.read()).unwrap();
        assert_eq!(eval(&expr), ConstValue::Bool(false));
    }
}
