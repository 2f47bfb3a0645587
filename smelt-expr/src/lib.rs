//! General-purpose typed expression tree substrate for the smelt source
//! generator.
//!
//! Declarations in `smelt-decl` are layered on top of the node abstractions
//! here: every declaration handle is a [`Node`] with a kind tag and a result
//! type, so it can stand in any expression position (call a sibling method,
//! read a sibling field) without a separate bridging layer.
//!
//! # Core Abstractions
//!
//! - [`TypeRef`] / [`TypeInfo`] - reflective type descriptions, uniform over
//!   builtin, external, declared, and synthesized types
//! - [`Expr`] - the expression node set, with validating constructors
//! - [`MemberRef`] - snapshot handles to configured members, usable as
//!   expression operands
//! - [`scope`] - free-variable analysis over bodies
//! - [`structural`] - identity-erasing structural equality and hashing

pub mod error;
pub mod expr;
pub mod literal;
pub mod member;
pub mod node;
pub mod scope;
pub mod structural;
pub mod types;
pub mod visit;
pub mod well_known;

pub use error::ExprError;
pub use expr::{BinaryOp, Block, Expr, UnaryOp, Var};
pub use literal::ConstValue;
pub use member::{MemberKind, MemberRef, MemberSig, ParamSig, Visibility};
pub use node::{Node, NodeKind};
pub use types::{BuiltinType, DeclId, ExternalType, TypeInfo, TypeKind, TypeLookup, TypeRef};
