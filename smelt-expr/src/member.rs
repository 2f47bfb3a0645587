//! Member signatures and snapshot handles.
//!
//! A [`MemberRef`] is handed out when a member finishes configuration and is
//! the way bodies reference siblings: it carries enough of the member's shape
//! (owner, parameter types, return type, staticness) to type and validate a
//! call without consulting the graph again.

use std::fmt;
use std::sync::Arc;

use crate::error::ExprError;
use crate::expr::Expr;
use crate::types::TypeRef;

/// Access level of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere.
    #[default]
    Public,
    /// Visible within the declaring binary.
    Internal,
    /// Visible to subtypes.
    Protected,
    /// Visible within the declaring type.
    Private,
}

impl Visibility {
    /// Whether this is private visibility.
    pub fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }

    /// Source keyword for this visibility.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

/// Kind of a member declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A method.
    Method,
    /// A constructor.
    Constructor,
    /// A property.
    Property,
    /// A field.
    Field,
}

impl MemberKind {
    /// Lowercase label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Property => "property",
            Self::Field => "field",
        }
    }
}

/// A member signature as carried by reflective type shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSig {
    /// Member kind.
    pub kind: MemberKind,
    /// Member name (the declaring type's name for constructors).
    pub name: String,
    /// Parameter types in order.
    pub params: Vec<TypeRef>,
    /// Return type (`void` for constructors and setters).
    pub return_type: TypeRef,
    /// Whether the member is static.
    pub is_static: bool,
    /// Whether the member is abstract.
    pub is_abstract: bool,
    /// Member visibility.
    pub visibility: Visibility,
}

impl MemberSig {
    /// Describe an abstract interface-style method.
    pub fn method(name: impl Into<String>, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            params,
            return_type,
            is_static: false,
            is_abstract: true,
            visibility: Visibility::Public,
        }
    }

    /// Describe a public constructor.
    pub fn constructor(type_name: impl Into<String>, params: Vec<TypeRef>) -> Self {
        Self {
            kind: MemberKind::Constructor,
            name: type_name.into(),
            params,
            return_type: TypeRef::void(),
            is_static: false,
            is_abstract: false,
            visibility: Visibility::Public,
        }
    }

    /// The `Name(type, type)` signature string used in diagnostics.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(TypeRef::label).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// A named, typed parameter as carried by a member handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: TypeRef,
}

impl ParamSig {
    /// Create a parameter signature.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug)]
struct MemberRefData {
    owner: TypeRef,
    kind: MemberKind,
    name: String,
    params: Vec<ParamSig>,
    return_type: TypeRef,
    is_static: bool,
    visibility: Visibility,
}

/// Snapshot handle to a configured member, usable as an expression operand.
#[derive(Debug, Clone)]
pub struct MemberRef(Arc<MemberRefData>);

impl MemberRef {
    /// Create a handle. Called by the declaration layer when a member
    /// finishes configuration.
    pub fn new(
        owner: TypeRef,
        kind: MemberKind,
        name: impl Into<String>,
        params: Vec<ParamSig>,
        return_type: TypeRef,
        is_static: bool,
        visibility: Visibility,
    ) -> Self {
        Self(Arc::new(MemberRefData {
            owner,
            kind,
            name: name.into(),
            params,
            return_type,
            is_static,
            visibility,
        }))
    }

    /// The declaring type.
    pub fn owner(&self) -> &TypeRef {
        &self.0.owner
    }

    /// The member kind.
    pub fn kind(&self) -> MemberKind {
        self.0.kind
    }

    /// The member name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The parameters, in order.
    pub fn params(&self) -> &[ParamSig] {
        &self.0.params
    }

    /// The return (or field/property) type.
    pub fn return_type(&self) -> &TypeRef {
        &self.0.return_type
    }

    /// Whether the member is static.
    pub fn is_static(&self) -> bool {
        self.0.is_static
    }

    /// The member's visibility.
    pub fn visibility(&self) -> Visibility {
        self.0.visibility
    }

    /// The `Name(type, type)` signature string used in diagnostics.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.0.params.iter().map(|p| p.ty.label()).collect();
        format!("{}({})", self.0.name, params.join(", "))
    }

    /// Whether two handles denote the same member occurrence.
    pub fn same(&self, other: &MemberRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Call this method with `args`, statically or through the implicit
    /// instance of the enclosing body.
    ///
    /// Fails when the argument count or an argument type does not match the
    /// member's parameters, citing expected vs. actual.
    pub fn call(&self, args: Vec<Expr>) -> Result<Expr, ExprError> {
        self.validate_args(&args)?;
        Ok(Expr::Call {
            method: self.clone(),
            receiver: None,
            args,
        })
    }

    /// Call this instance method on an explicit receiver expression.
    pub fn call_on(&self, receiver: Expr, args: Vec<Expr>) -> Result<Expr, ExprError> {
        if self.0.is_static {
            return Err(ExprError::ReceiverOnStatic {
                member: self.signature(),
            });
        }
        self.validate_args(&args)?;
        Ok(Expr::Call {
            method: self.clone(),
            receiver: Some(Box::new(receiver)),
            args,
        })
    }

    /// Create an instance of the declaring type through this constructor.
    pub fn instantiate(&self, args: Vec<Expr>) -> Result<Expr, ExprError> {
        self.validate_args(&args)?;
        Ok(Expr::New {
            ty: self.0.owner.clone(),
            ctor: Some(self.clone()),
            args,
        })
    }

    /// Read this field or property through the implicit instance (or
    /// statically).
    pub fn read(&self) -> Expr {
        match self.0.kind {
            MemberKind::Property => Expr::PropertyAccess {
                property: self.clone(),
                receiver: None,
            },
            _ => Expr::FieldAccess {
                field: self.clone(),
                receiver: None,
            },
        }
    }

    /// Read this field or property on an explicit receiver expression.
    pub fn read_on(&self, receiver: Expr) -> Expr {
        match self.0.kind {
            MemberKind::Property => Expr::PropertyAccess {
                property: self.clone(),
                receiver: Some(Box::new(receiver)),
            },
            _ => Expr::FieldAccess {
                field: self.clone(),
                receiver: Some(Box::new(receiver)),
            },
        }
    }

    /// Validate `args` against this member's parameters without building a
    /// call node. Used by constructor chain configuration, which stores the
    /// arguments outside an expression tree.
    pub fn validate_args(&self, args: &[Expr]) -> Result<(), ExprError> {
        if args.len() != self.0.params.len() {
            return Err(ExprError::ArgumentCount {
                member: self.signature(),
                expected: self.0.params.len(),
                actual: args.len(),
            });
        }
        for (index, (param, arg)) in self.0.params.iter().zip(args).enumerate() {
            if !accepts(&param.ty, arg) {
                return Err(ExprError::ArgumentType {
                    member: self.signature(),
                    index,
                    expected: param.ty.label(),
                    actual: arg.ty().label(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// Shallow assignability used at expression-construction time.
///
/// Exact matches, anything non-void into `object`, `T` into `T?`, and the
/// null literal into any reference or nullable type are accepted here.
/// Mismatches between declared or synthesized types are deferred to the
/// declaring graph, which re-checks with base chains available.
pub(crate) fn accepts(param: &TypeRef, arg: &Expr) -> bool {
    let arg_ty = arg.ty();
    if *param == arg_ty {
        return true;
    }
    if param.is_object() && !arg_ty.is_void() {
        return true;
    }
    if let TypeRef::Nullable(inner) = param {
        if **inner == arg_ty {
            return true;
        }
    }
    if arg.is_null_literal() && !param.is_void() {
        return true;
    }
    matches!(
        arg_ty,
        TypeRef::Declared(_) | TypeRef::Synthesized(_) | TypeRef::External(_)
    )
}
