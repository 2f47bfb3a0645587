//! The expression node set.
//!
//! Constructors validate operand shapes so a tree, once built, is
//! well-formed: conditionals have boolean tests and agreeing arms, binary
//! operands agree on type, assignment targets are writable. Anything deeper
//! (assignability through base chains) is the declaring graph's concern.

use std::sync::Arc;

use crate::error::ExprError;
use crate::literal::ConstValue;
use crate::member::MemberRef;
use crate::types::{BuiltinType, TypeRef};

#[derive(Debug)]
struct VarData {
    name: String,
    ty: TypeRef,
}

/// A named, typed variable: a parameter or a block local.
///
/// Identity is the handle itself — two variables with the same name and type
/// are still distinct binding sites. Structural comparison (which erases
/// identity) lives in [`crate::structural`].
#[derive(Debug, Clone)]
pub struct Var(Arc<VarData>);

impl Var {
    /// Create a fresh variable.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self(Arc::new(VarData {
            name: name.into(),
            ty,
        }))
    }

    /// The variable's name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The variable's type.
    pub fn ty(&self) -> &TypeRef {
        &self.0.ty
    }

    /// Whether two handles denote the same binding site.
    pub fn same(&self, other: &Var) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Reference this variable in an expression.
    pub fn read(&self) -> Expr {
        Expr::Var(self.clone())
    }

    /// Assign `value` to this variable.
    pub fn assign(&self, value: Expr) -> Result<Expr, ExprError> {
        Expr::assign(self.read(), value)
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Var {}

impl std::hash::Hash for Var {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical negation.
    Not,
    /// Arithmetic negation.
    Negate,
}

impl UnaryOp {
    /// Operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition (string concatenation for strings).
    Add,
    /// Subtraction.
    Subtract,
    /// Multiplication.
    Multiply,
    /// Division.
    Divide,
    /// Remainder.
    Modulo,
    /// Short-circuit conjunction.
    And,
    /// Short-circuit disjunction.
    Or,
    /// Equality.
    Equal,
    /// Inequality.
    NotEqual,
    /// Strict less-than.
    LessThan,
    /// Less-than-or-equal.
    LessOrEqual,
    /// Strict greater-than.
    GreaterThan,
    /// Greater-than-or-equal.
    GreaterOrEqual,
}

impl BinaryOp {
    /// Operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::And => "&&",
            Self::Or => "||",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Whether the result is boolean regardless of operand type.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessOrEqual
                | Self::GreaterThan
                | Self::GreaterOrEqual
        )
    }

    /// Whether the operator requires boolean operands.
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// A statement sequence with local variable declarations.
///
/// The block's result is its trailing statement's value; an empty block is
/// `void`-typed.
#[derive(Debug, Clone)]
pub struct Block {
    /// Locals declared by this block, bound for all its statements.
    pub variables: Vec<Var>,
    /// Statements in execution order.
    pub statements: Vec<Expr>,
}

impl Block {
    /// Create a block with no locals.
    pub fn new(statements: Vec<Expr>) -> Self {
        Self {
            variables: Vec::new(),
            statements,
        }
    }

    /// Create a block declaring `variables` for the span of `statements`.
    pub fn with_variables(variables: Vec<Var>, statements: Vec<Expr>) -> Self {
        Self {
            variables,
            statements,
        }
    }

    /// The block's result type.
    pub fn result_type(&self) -> TypeRef {
        self.statements
            .last()
            .map(Expr::ty)
            .unwrap_or_else(TypeRef::void)
    }

    /// Whether this block cannot stand in a single-expression position:
    /// it declares locals or sequences more than one statement.
    pub fn needs_extraction(&self) -> bool {
        self.statements.len() >= 2 || !self.variables.is_empty()
    }
}

/// An expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A typed constant.
    Literal(ConstValue),
    /// The zero value of a type.
    Default(TypeRef),
    /// A variable reference.
    Var(Var),
    /// The implicit instance of the given type.
    This(TypeRef),
    /// The base-type view of the implicit instance.
    Base(TypeRef),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A ternary conditional.
    Conditional {
        /// Boolean test.
        test: Box<Expr>,
        /// Value when the test holds.
        if_true: Box<Expr>,
        /// Value when the test fails.
        if_false: Box<Expr>,
    },
    /// An assignment.
    Assign {
        /// Target: variable, field, or property access.
        target: Box<Expr>,
        /// Assigned value.
        value: Box<Expr>,
    },
    /// A member call.
    Call {
        /// The called member.
        method: MemberRef,
        /// Explicit receiver; `None` for static or implicit-this calls.
        receiver: Option<Box<Expr>>,
        /// Arguments in order.
        args: Vec<Expr>,
    },
    /// A field read.
    FieldAccess {
        /// The field.
        field: MemberRef,
        /// Explicit receiver; `None` for static or implicit-this access.
        receiver: Option<Box<Expr>>,
    },
    /// A property read.
    PropertyAccess {
        /// The property.
        property: MemberRef,
        /// Explicit receiver; `None` for static or implicit-this access.
        receiver: Option<Box<Expr>>,
    },
    /// Object creation.
    New {
        /// The created type.
        ty: TypeRef,
        /// Constructor, when one was configured; `None` for the implicit one.
        ctor: Option<MemberRef>,
        /// Arguments in order.
        args: Vec<Expr>,
    },
    /// A statement block.
    Block(Block),
}

impl Expr {
    /// A literal constant.
    pub fn literal(value: impl Into<ConstValue>) -> Self {
        Self::Literal(value.into())
    }

    /// The zero value of `ty`.
    pub fn default_of(ty: TypeRef) -> Self {
        Self::Default(ty)
    }

    /// A unary operation; validates the operand type.
    pub fn unary(op: UnaryOp, operand: Expr) -> Result<Self, ExprError> {
        let ty = operand.ty();
        let ok = match op {
            UnaryOp::Not => ty == TypeRef::bool(),
            UnaryOp::Negate => is_numeric(&ty),
        };
        if !ok {
            return Err(ExprError::UnsupportedOperand {
                op: op.symbol(),
                operand: ty.label(),
            });
        }
        Ok(Self::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// A binary operation; validates operand agreement and support.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Result<Self, ExprError> {
        let lt = left.ty();
        let rt = right.ty();
        if lt != rt {
            return Err(ExprError::OperandTypeMismatch {
                op: op.symbol(),
                left: lt.label(),
                right: rt.label(),
            });
        }
        let supported = if op.is_logical() {
            lt == TypeRef::bool()
        } else if op.is_comparison() {
            // equality applies to everything; orderings need numeric operands
            matches!(op, BinaryOp::Equal | BinaryOp::NotEqual) || is_numeric(&lt)
        } else if op == BinaryOp::Add {
            is_numeric(&lt) || lt == TypeRef::string()
        } else {
            is_numeric(&lt)
        };
        if !supported {
            return Err(ExprError::UnsupportedOperand {
                op: op.symbol(),
                operand: lt.label(),
            });
        }
        Ok(Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// A ternary conditional; the test must be boolean and the arms must
    /// agree on type.
    pub fn conditional(test: Expr, if_true: Expr, if_false: Expr) -> Result<Self, ExprError> {
        if test.ty() != TypeRef::bool() {
            return Err(ExprError::ConditionNotBoolean {
                actual: test.ty().label(),
            });
        }
        let tt = if_true.ty();
        let ft = if_false.ty();
        if tt != ft {
            return Err(ExprError::BranchTypeMismatch {
                if_true: tt.label(),
                if_false: ft.label(),
            });
        }
        Ok(Self::Conditional {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    /// An assignment; the target must be a variable, field, or property, and
    /// the value must fit its type.
    pub fn assign(target: Expr, value: Expr) -> Result<Self, ExprError> {
        match target {
            Self::Var(_) | Self::FieldAccess { .. } | Self::PropertyAccess { .. } => {}
            ref other => {
                return Err(ExprError::InvalidAssignTarget {
                    target: other.kind_label(),
                });
            }
        }
        let expected = target.ty();
        let actual = value.ty();
        let fits = expected == actual
            || expected.is_object() && !actual.is_void()
            || value.is_null_literal() && !expected.is_void();
        if !fits {
            return Err(ExprError::AssignTypeMismatch {
                expected: expected.label(),
                actual: actual.label(),
            });
        }
        Ok(Self::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// A statement block expression.
    pub fn block(block: Block) -> Self {
        Self::Block(block)
    }

    /// The static type of this expression.
    pub fn ty(&self) -> TypeRef {
        match self {
            Self::Literal(value) => value.type_ref(),
            Self::Default(ty) => ty.clone(),
            Self::Var(var) => var.ty().clone(),
            Self::This(ty) | Self::Base(ty) => ty.clone(),
            Self::Unary { op, operand } => match op {
                UnaryOp::Not => TypeRef::bool(),
                UnaryOp::Negate => operand.ty(),
            },
            Self::Binary { op, left, .. } => {
                if op.is_comparison() || op.is_logical() {
                    TypeRef::bool()
                } else {
                    left.ty()
                }
            }
            Self::Conditional { if_true, .. } => if_true.ty(),
            Self::Assign { value, .. } => value.ty(),
            Self::Call { method, .. } => method.return_type().clone(),
            Self::FieldAccess { field, .. } => field.return_type().clone(),
            Self::PropertyAccess { property, .. } => property.return_type().clone(),
            Self::New { ty, .. } => ty.clone(),
            Self::Block(block) => block.result_type(),
        }
    }

    /// Whether this is the null literal.
    pub fn is_null_literal(&self) -> bool {
        matches!(self, Self::Literal(ConstValue::Null))
    }

    /// Lowercase label of this node's kind, for diagnostics.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Default(_) => "default",
            Self::Var(_) => "variable",
            Self::This(_) => "this",
            Self::Base(_) => "base",
            Self::Unary { .. } => "unary",
            Self::Binary { .. } => "binary",
            Self::Conditional { .. } => "conditional",
            Self::Assign { .. } => "assignment",
            Self::Call { .. } => "call",
            Self::FieldAccess { .. } => "field access",
            Self::PropertyAccess { .. } => "property access",
            Self::New { .. } => "object creation",
            Self::Block(_) => "block",
        }
    }
}

fn is_numeric(ty: &TypeRef) -> bool {
    matches!(
        ty,
        TypeRef::Builtin(BuiltinType::Int)
            | TypeRef::Builtin(BuiltinType::Long)
            | TypeRef::Builtin(BuiltinType::Double)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditional_requires_boolean_test() {
        let err = Expr::conditional(Expr::literal(1), Expr::literal(2), Expr::literal(3))
            .unwrap_err();
        assert!(matches!(err, ExprError::ConditionNotBoolean { .. }));
    }

    #[test]
    fn conditional_arms_must_agree() {
        let err = Expr::conditional(Expr::literal(true), Expr::literal(2), Expr::literal("x"))
            .unwrap_err();
        match err {
            ExprError::BranchTypeMismatch { if_true, if_false } => {
                assert_eq!(if_true, "int");
                assert_eq!(if_false, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn binary_operands_must_agree() {
        let err =
            Expr::binary(BinaryOp::Add, Expr::literal(1), Expr::literal("x")).unwrap_err();
        assert!(matches!(err, ExprError::OperandTypeMismatch { .. }));
    }

    #[test]
    fn logical_operators_need_booleans() {
        let err = Expr::binary(BinaryOp::And, Expr::literal(1), Expr::literal(2)).unwrap_err();
        assert!(matches!(err, ExprError::UnsupportedOperand { .. }));

        let ok = Expr::binary(BinaryOp::And, Expr::literal(true), Expr::literal(false)).unwrap();
        assert_eq!(ok.ty(), TypeRef::bool());
    }

    #[test]
    fn comparisons_are_boolean_typed() {
        let cmp = Expr::binary(BinaryOp::LessThan, Expr::literal(1), Expr::literal(2)).unwrap();
        assert_eq!(cmp.ty(), TypeRef::bool());
    }

    #[test]
    fn string_concatenation_is_addition() {
        let cat = Expr::binary(BinaryOp::Add, Expr::literal("a"), Expr::literal("b")).unwrap();
        assert_eq!(cat.ty(), TypeRef::string());
    }

    #[test]
    fn assignment_targets_are_restricted() {
        let err = Expr::assign(Expr::literal(1), Expr::literal(2)).unwrap_err();
        assert!(matches!(
            err,
            ExprError::InvalidAssignTarget { target: "literal" }
        ));

        let v = Var::new("x", TypeRef::int());
        let ok = v.assign(Expr::literal(2)).unwrap();
        assert_eq!(ok.ty(), TypeRef::int());
    }

    #[test]
    fn block_result_is_trailing_statement() {
        let v = Var::new("v", TypeRef::int());
        let block = Block::with_variables(
            vec![v.clone()],
            vec![
                v.assign(Expr::literal(2)).unwrap(),
                Expr::binary(BinaryOp::Multiply, v.read(), Expr::literal(3)).unwrap(),
            ],
        );
        assert_eq!(block.result_type(), TypeRef::int());
        assert!(block.needs_extraction());

        let single = Block::new(vec![Expr::literal(1)]);
        assert!(!single.needs_extraction());
    }

    #[test]
    fn variables_are_identity_distinct() {
        let a = Var::new("x", TypeRef::int());
        let b = Var::new("x", TypeRef::int());
        assert!(!a.same(&b));
        assert!(a.same(&a.clone()));
    }
}
