//! The shared node abstraction.
//!
//! Declarations and expressions are one node hierarchy: everything has a kind
//! tag and a result type. This is what lets a method declaration appear as a
//! call target inside a sibling's body without a bridging layer.

use crate::expr::{Expr, Var};
use crate::member::{MemberKind, MemberRef};
use crate::types::TypeRef;

/// Kind tag shared by expression and declaration nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A typed constant.
    Literal,
    /// The zero value of a type.
    Default,
    /// A variable reference.
    Variable,
    /// The implicit instance.
    This,
    /// The base-type view of the implicit instance.
    Base,
    /// A unary operation.
    Unary,
    /// A binary operation.
    Binary,
    /// A ternary conditional.
    Conditional,
    /// An assignment.
    Assign,
    /// A member call.
    Call,
    /// A field read.
    FieldAccess,
    /// A property read.
    PropertyAccess,
    /// Object creation.
    New,
    /// A statement block.
    Block,
    /// A source-file declaration.
    SourceFile,
    /// A type declaration.
    Type,
    /// A method declaration.
    Method,
    /// A constructor declaration.
    Constructor,
    /// A property declaration.
    Property,
    /// A field declaration.
    Field,
    /// A parameter declaration.
    Parameter,
    /// A generic-parameter declaration.
    GenericParameter,
}

/// Anything that participates in the node graph.
pub trait Node {
    /// The node's kind tag.
    fn kind(&self) -> NodeKind;

    /// The node's result type: an expression's static type, a member's
    /// return type, a declared type's self-reference.
    fn node_type(&self) -> TypeRef;
}

impl Node for Expr {
    fn kind(&self) -> NodeKind {
        match self {
            Expr::Literal(_) => NodeKind::Literal,
            Expr::Default(_) => NodeKind::Default,
            Expr::Var(_) => NodeKind::Variable,
            Expr::This(_) => NodeKind::This,
            Expr::Base(_) => NodeKind::Base,
            Expr::Unary { .. } => NodeKind::Unary,
            Expr::Binary { .. } => NodeKind::Binary,
            Expr::Conditional { .. } => NodeKind::Conditional,
            Expr::Assign { .. } => NodeKind::Assign,
            Expr::Call { .. } => NodeKind::Call,
            Expr::FieldAccess { .. } => NodeKind::FieldAccess,
            Expr::PropertyAccess { .. } => NodeKind::PropertyAccess,
            Expr::New { .. } => NodeKind::New,
            Expr::Block(_) => NodeKind::Block,
        }
    }

    fn node_type(&self) -> TypeRef {
        self.ty()
    }
}

impl Node for Var {
    fn kind(&self) -> NodeKind {
        NodeKind::Variable
    }

    fn node_type(&self) -> TypeRef {
        self.ty().clone()
    }
}

impl Node for MemberRef {
    fn kind(&self) -> NodeKind {
        match MemberRef::kind(self) {
            MemberKind::Method => NodeKind::Method,
            MemberKind::Constructor => NodeKind::Constructor,
            MemberKind::Property => NodeKind::Property,
            MemberKind::Field => NodeKind::Field,
        }
    }

    fn node_type(&self) -> TypeRef {
        self.return_type().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{ParamSig, Visibility};

    #[test]
    fn expressions_report_their_kind() {
        assert_eq!(Expr::literal(1).kind(), NodeKind::Literal);
        assert_eq!(
            Expr::default_of(TypeRef::string()).kind(),
            NodeKind::Default
        );
    }

    #[test]
    fn member_handles_are_nodes() {
        let m = MemberRef::new(
            TypeRef::string(),
            MemberKind::Method,
            "GetMessage",
            Vec::<ParamSig>::new(),
            TypeRef::string(),
            false,
            Visibility::Public,
        );
        assert_eq!(Node::kind(&m), NodeKind::Method);
        assert_eq!(m.node_type(), TypeRef::string());
    }
}
