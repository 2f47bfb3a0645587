//! Member nodes and their configuration builders.
//!
//! Members are exclusively owned by their declaring type node; builders are
//! handed to user callbacks and validate as configuration happens. Finishing
//! a member produces the [`MemberRef`] snapshot handle sibling bodies use to
//! reference it.

use smelt_expr::{
    Expr, MemberKind, MemberRef, ParamSig, TypeKind, TypeLookup, TypeRef, Var, Visibility,
};

use crate::error::{Error, Result};
use crate::generics::{GenericParam, GenericParamBuilder};
use crate::modifiers::{MemberModifiers, TypeModifier};
use crate::validate;

/// Passing mode of a parameter. Exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamMode {
    /// Ordinary by-value parameter.
    #[default]
    Value,
    /// By-reference parameter.
    Ref,
    /// Output parameter.
    Out,
    /// Trailing variadic parameter.
    Params,
}

impl ParamMode {
    /// Source keyword prefix, empty for by-value.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Value => "",
            Self::Ref => "ref",
            Self::Out => "out",
            Self::Params => "params",
        }
    }
}

/// A declared parameter: a variable plus its passing mode.
#[derive(Debug, Clone)]
pub struct Param {
    pub(crate) var: Var,
    pub(crate) mode: ParamMode,
}

impl Param {
    /// The parameter's name.
    pub fn name(&self) -> &str {
        self.var.name()
    }

    /// The parameter's type.
    pub fn ty(&self) -> &TypeRef {
        self.var.ty()
    }

    /// The parameter's passing mode.
    pub fn mode(&self) -> ParamMode {
        self.mode
    }

    /// The underlying variable, referenced by the member's body.
    pub fn var(&self) -> &Var {
        &self.var
    }
}

impl smelt_expr::Node for Param {
    fn kind(&self) -> smelt_expr::NodeKind {
        smelt_expr::NodeKind::Parameter
    }

    fn node_type(&self) -> TypeRef {
        self.var.ty().clone()
    }
}

/// A method node.
#[derive(Debug, Clone)]
pub struct Method {
    pub(crate) name: String,
    pub(crate) visibility: Visibility,
    pub(crate) mods: MemberModifiers,
    pub(crate) generics: Vec<GenericParam>,
    pub(crate) params: Vec<Param>,
    pub(crate) return_type: TypeRef,
    pub(crate) body: Option<Expr>,
    pub(crate) handle: MemberRef,
}

impl Method {
    /// The method's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The method's visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The method's modifier flags.
    pub fn modifiers(&self) -> &MemberModifiers {
        &self.mods
    }

    /// The method's generic parameters, in declaration order.
    pub fn generic_params(&self) -> &[GenericParam] {
        &self.generics
    }

    /// The parameters, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The return type.
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    /// The body, absent for abstract and interface methods.
    pub fn body(&self) -> Option<&Expr> {
        self.body.as_ref()
    }

    /// The snapshot handle sibling bodies call through.
    pub fn handle(&self) -> &MemberRef {
        &self.handle
    }
}

/// How a constructor chains to another constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    /// `: this(...)` — a sibling constructor on the same type.
    This,
    /// `: base(...)` — a constructor on an accessible base type.
    Base,
}

/// A configured constructor chain call.
#[derive(Debug, Clone)]
pub struct ChainedCall {
    pub(crate) kind: ChainKind,
    pub(crate) target: MemberRef,
    pub(crate) args: Vec<Expr>,
}

impl ChainedCall {
    /// Whether this chains to a sibling or a base constructor.
    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    /// The target constructor.
    pub fn target(&self) -> &MemberRef {
        &self.target
    }

    /// The chained arguments.
    pub fn args(&self) -> &[Expr] {
        &self.args
    }
}

/// A constructor node.
#[derive(Debug, Clone)]
pub struct Ctor {
    pub(crate) type_name: String,
    pub(crate) visibility: Visibility,
    pub(crate) params: Vec<Param>,
    pub(crate) body: Expr,
    pub(crate) chain: Option<ChainedCall>,
    pub(crate) handle: MemberRef,
}

impl Ctor {
    /// The declaring type's name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The constructor's visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The parameters, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The body.
    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// The chained call, if one was configured.
    pub fn chain(&self) -> Option<&ChainedCall> {
        self.chain.as_ref()
    }

    /// The snapshot handle sibling constructors chain through.
    pub fn handle(&self) -> &MemberRef {
        &self.handle
    }
}

/// A property node.
#[derive(Debug, Clone)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) visibility: Visibility,
    pub(crate) mods: MemberModifiers,
    pub(crate) getter: Option<Expr>,
    pub(crate) has_setter: bool,
    pub(crate) handle: MemberRef,
}

impl Property {
    /// The property's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property's type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The property's visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The property's modifier flags.
    pub fn modifiers(&self) -> &MemberModifiers {
        &self.mods
    }

    /// The getter body; `None` for auto-implemented properties.
    pub fn getter(&self) -> Option<&Expr> {
        self.getter.as_ref()
    }

    /// Whether a setter is emitted.
    pub fn has_setter(&self) -> bool {
        self.has_setter
    }

    /// The snapshot handle sibling bodies read through.
    pub fn handle(&self) -> &MemberRef {
        &self.handle
    }
}

/// A field node.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) visibility: Visibility,
    pub(crate) is_static: bool,
    pub(crate) is_readonly: bool,
    pub(crate) initializer: Option<Expr>,
    pub(crate) handle: MemberRef,
}

impl Field {
    /// The field's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The field's visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether the field is static.
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether the field is read-only.
    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    /// The initializer expression, if any.
    pub fn initializer(&self) -> Option<&Expr> {
        self.initializer.as_ref()
    }

    /// The snapshot handle sibling bodies read through.
    pub fn handle(&self) -> &MemberRef {
        &self.handle
    }
}

/// A member node of any kind.
#[derive(Debug, Clone)]
pub enum Member {
    /// A method.
    Method(Method),
    /// A constructor.
    Constructor(Ctor),
    /// A property.
    Property(Property),
    /// A field.
    Field(Field),
}

impl Member {
    /// The member's name (the declaring type's name for constructors).
    pub fn name(&self) -> &str {
        match self {
            Self::Method(m) => &m.name,
            Self::Constructor(c) => &c.type_name,
            Self::Property(p) => &p.name,
            Self::Field(f) => &f.name,
        }
    }

    /// The `Name(type, type)` signature used for uniqueness and diagnostics.
    pub fn signature(&self) -> String {
        match self {
            Self::Method(m) => validate::signature(&m.name, &m.params),
            Self::Constructor(c) => validate::signature(&c.type_name, &c.params),
            Self::Property(p) => validate::signature(&p.name, &[]),
            Self::Field(f) => validate::signature(&f.name, &[]),
        }
    }

    /// The snapshot handle for this member.
    pub fn handle(&self) -> &MemberRef {
        match self {
            Self::Method(m) => &m.handle,
            Self::Constructor(c) => &c.handle,
            Self::Property(p) => &p.handle,
            Self::Field(f) => &f.handle,
        }
    }

    /// Whether this member is abstract.
    pub fn is_abstract(&self) -> bool {
        match self {
            Self::Method(m) => m.mods.is_abstract(),
            Self::Property(p) => p.mods.is_abstract(),
            _ => false,
        }
    }

    /// Whether this member is static.
    pub fn is_static(&self) -> bool {
        match self {
            Self::Method(m) => m.mods.is_static(),
            Self::Property(p) => p.mods.is_static(),
            Self::Field(f) => f.is_static,
            Self::Constructor(_) => false,
        }
    }
}

/// Declaring-type context handed to member builders.
pub(crate) struct MemberContext<'a> {
    pub owner: TypeRef,
    pub owner_name: String,
    pub type_kind: TypeKind,
    pub type_modifier: Option<TypeModifier>,
    pub base: Option<TypeRef>,
    pub lookup: &'a dyn TypeLookup,
}

impl MemberContext<'_> {
    fn interface_mode(&self) -> bool {
        self.type_kind == TypeKind::Interface
    }

    fn type_is_abstract(&self) -> bool {
        self.type_modifier == Some(TypeModifier::Abstract) || self.interface_mode()
    }
}

/// Configures one method during its callback.
pub struct MethodBuilder<'a> {
    ctx: MemberContext<'a>,
    name: String,
    visibility: Visibility,
    mods: MemberModifiers,
    generics: Vec<GenericParam>,
    params: Vec<Param>,
    return_type: TypeRef,
    body: Option<Expr>,
}

impl<'a> MethodBuilder<'a> {
    pub(crate) fn new(ctx: MemberContext<'a>, name: String) -> Self {
        Self {
            ctx,
            name,
            visibility: Visibility::Public,
            mods: MemberModifiers::new(),
            generics: Vec::new(),
            params: Vec::new(),
            return_type: TypeRef::void(),
            body: None,
        }
    }

    fn signature(&self) -> String {
        validate::signature(&self.name, &self.params)
    }

    /// Declare a generic parameter on this method.
    ///
    /// The returned [`GenericParam`] lazily synthesizes the concrete type
    /// that stands in for the parameter inside expression trees.
    pub fn generic_param(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut GenericParamBuilder<'_>) -> Result<()>,
    ) -> Result<GenericParam> {
        validate::ensure_identifier(name, "generic parameter")?;
        if self.generics.iter().any(|g| g.name() == name) {
            return Err(Box::new(Error::DuplicateGenericParameter {
                owner: self.signature(),
                name: name.to_string(),
            }));
        }
        let mut builder = GenericParamBuilder::new(name.to_string(), self.ctx.lookup);
        configure(&mut builder)?;
        let param = builder.finish();
        self.generics.push(param.clone());
        Ok(param)
    }

    /// Declare a by-value parameter, returning its variable for body use.
    pub fn param(&mut self, name: &str, ty: TypeRef) -> Result<Var> {
        self.param_with(name, ty, ParamMode::Value)
    }

    /// Declare a `ref` parameter.
    pub fn ref_param(&mut self, name: &str, ty: TypeRef) -> Result<Var> {
        self.param_with(name, ty, ParamMode::Ref)
    }

    /// Declare an `out` parameter.
    pub fn out_param(&mut self, name: &str, ty: TypeRef) -> Result<Var> {
        self.param_with(name, ty, ParamMode::Out)
    }

    /// Declare a trailing `params` array parameter.
    pub fn params_param(&mut self, name: &str, element: TypeRef) -> Result<Var> {
        self.param_with(name, TypeRef::array(element), ParamMode::Params)
    }

    fn param_with(&mut self, name: &str, ty: TypeRef, mode: ParamMode) -> Result<Var> {
        let member = self.signature();
        validate::declare_param(&mut self.params, &member, name, ty, mode)
    }

    /// Set the return type; `void` when never called.
    pub fn returns(&mut self, ty: TypeRef) -> &mut Self {
        self.return_type = ty;
        self
    }

    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.visibility = visibility;
        self
    }

    /// Apply the `static` modifier.
    pub fn static_(&mut self) -> Result<&mut Self> {
        self.mods.set_static(&self.signature())?;
        Ok(self)
    }

    /// Apply the `abstract` modifier. Fails on a non-abstract declaring type.
    pub fn abstract_(&mut self) -> Result<&mut Self> {
        if !self.ctx.type_is_abstract() {
            return Err(Box::new(Error::AbstractMemberOnConcreteType {
                type_name: self.ctx.owner_name.clone(),
                signature: self.signature(),
            }));
        }
        self.mods.set_abstract(&self.signature())?;
        Ok(self)
    }

    /// Apply the `virtual` modifier.
    pub fn virtual_(&mut self) -> Result<&mut Self> {
        self.mods.set_virtual(&self.signature())?;
        Ok(self)
    }

    /// Supply the body expression.
    pub fn body(&mut self, body: Expr) -> &mut Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn finish(self) -> Result<Method> {
        let signature = self.signature();
        let implicitly_abstract = self.ctx.interface_mode() || self.mods.is_abstract();
        match (&self.body, implicitly_abstract) {
            (Some(_), true) => {
                return Err(Box::new(Error::BodyOnAbstract { signature }));
            }
            (None, false) => {
                return Err(Box::new(Error::MissingBody { signature }));
            }
            _ => {}
        }
        if let Some(body) = &self.body {
            let bound: Vec<Var> = self.params.iter().map(|p| p.var.clone()).collect();
            validate::check_free_variables(body, &bound, &signature)?;
        }
        let handle = MemberRef::new(
            self.ctx.owner.clone(),
            MemberKind::Method,
            self.name.clone(),
            self.params
                .iter()
                .map(|p| ParamSig::new(p.name(), p.ty().clone()))
                .collect(),
            self.return_type.clone(),
            self.mods.is_static(),
            self.visibility,
        );
        Ok(Method {
            name: self.name,
            visibility: self.visibility,
            mods: self.mods,
            generics: self.generics,
            params: self.params,
            return_type: self.return_type,
            body: self.body,
            handle,
        })
    }
}

/// Configures one constructor during its callback.
pub struct CtorBuilder<'a> {
    ctx: MemberContext<'a>,
    visibility: Visibility,
    params: Vec<Param>,
    body: Option<Expr>,
    chain: Option<ChainedCall>,
}

impl<'a> CtorBuilder<'a> {
    pub(crate) fn new(ctx: MemberContext<'a>) -> Self {
        Self {
            ctx,
            visibility: Visibility::Public,
            params: Vec::new(),
            body: None,
            chain: None,
        }
    }

    fn signature(&self) -> String {
        validate::signature(&self.ctx.owner_name, &self.params)
    }

    /// Declare a by-value parameter, returning its variable for body use.
    pub fn param(&mut self, name: &str, ty: TypeRef) -> Result<Var> {
        let member = self.signature();
        validate::declare_param(&mut self.params, &member, name, ty, ParamMode::Value)
    }

    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.visibility = visibility;
        self
    }

    /// Supply the body expression.
    pub fn body(&mut self, body: Expr) -> &mut Self {
        self.body = Some(body);
        self
    }

    /// Chain to another constructor: a sibling on the same type or one on an
    /// accessible base type.
    pub fn chains_to(&mut self, target: &MemberRef, args: Vec<Expr>) -> Result<&mut Self> {
        let caller = self.signature();
        if target.kind() != MemberKind::Constructor {
            return Err(Box::new(Error::ConstructorChain {
                caller,
                target: target.signature(),
            }));
        }
        let kind = if *target.owner() == self.ctx.owner {
            ChainKind::This
        } else if validate::is_ancestor(self.ctx.lookup, self.ctx.base.as_ref(), target.owner()) {
            if target.visibility().is_private() {
                return Err(Box::new(Error::PrivateConstructorChain {
                    caller,
                    target: target.signature(),
                }));
            }
            ChainKind::Base
        } else {
            return Err(Box::new(Error::ConstructorChain {
                caller,
                target: target.signature(),
            }));
        };
        target.validate_args(&args)?;
        self.chain = Some(ChainedCall {
            kind,
            target: target.clone(),
            args,
        });
        Ok(self)
    }

    pub(crate) fn finish(self) -> Result<Ctor> {
        let signature = self.signature();
        let body = self.body.ok_or_else(|| {
            Box::new(Error::MissingBody {
                signature: signature.clone(),
            })
        })?;
        let bound: Vec<Var> = self.params.iter().map(|p| p.var.clone()).collect();
        validate::check_free_variables(&body, &bound, &signature)?;
        if let Some(chain) = &self.chain {
            for arg in &chain.args {
                validate::check_free_variables(arg, &bound, &signature)?;
            }
        }
        let handle = MemberRef::new(
            self.ctx.owner.clone(),
            MemberKind::Constructor,
            self.ctx.owner_name.clone(),
            self.params
                .iter()
                .map(|p| ParamSig::new(p.name(), p.ty().clone()))
                .collect(),
            TypeRef::void(),
            false,
            self.visibility,
        );
        Ok(Ctor {
            type_name: self.ctx.owner_name,
            visibility: self.visibility,
            params: self.params,
            body,
            chain: self.chain,
            handle,
        })
    }
}

/// Configures one property during its callback.
pub struct PropertyBuilder<'a> {
    ctx: MemberContext<'a>,
    name: String,
    ty: TypeRef,
    visibility: Visibility,
    mods: MemberModifiers,
    getter: Option<Expr>,
    has_setter: bool,
}

impl<'a> PropertyBuilder<'a> {
    pub(crate) fn new(ctx: MemberContext<'a>, name: String, ty: TypeRef) -> Self {
        Self {
            ctx,
            name,
            ty,
            visibility: Visibility::Public,
            mods: MemberModifiers::new(),
            getter: None,
            has_setter: false,
        }
    }

    fn signature(&self) -> String {
        validate::signature(&self.name, &[])
    }

    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.visibility = visibility;
        self
    }

    /// Apply the `static` modifier.
    pub fn static_(&mut self) -> Result<&mut Self> {
        self.mods.set_static(&self.signature())?;
        Ok(self)
    }

    /// Apply the `abstract` modifier. Fails on a non-abstract declaring type.
    pub fn abstract_(&mut self) -> Result<&mut Self> {
        if !self.ctx.type_is_abstract() {
            return Err(Box::new(Error::AbstractMemberOnConcreteType {
                type_name: self.ctx.owner_name.clone(),
                signature: self.signature(),
            }));
        }
        self.mods.set_abstract(&self.signature())?;
        Ok(self)
    }

    /// Apply the `virtual` modifier.
    pub fn virtual_(&mut self) -> Result<&mut Self> {
        self.mods.set_virtual(&self.signature())?;
        Ok(self)
    }

    /// Supply a getter body; without one the property is auto-implemented.
    pub fn getter(&mut self, body: Expr) -> &mut Self {
        self.getter = Some(body);
        self
    }

    /// Emit a setter alongside the getter.
    pub fn with_setter(&mut self) -> &mut Self {
        self.has_setter = true;
        self
    }

    pub(crate) fn finish(self) -> Result<Property> {
        let signature = self.signature();
        let implicitly_abstract = self.ctx.interface_mode() || self.mods.is_abstract();
        if implicitly_abstract && self.getter.is_some() {
            return Err(Box::new(Error::BodyOnAbstract { signature }));
        }
        if let Some(getter) = &self.getter {
            validate::check_free_variables(getter, &[], &signature)?;
        }
        let handle = MemberRef::new(
            self.ctx.owner.clone(),
            MemberKind::Property,
            self.name.clone(),
            Vec::new(),
            self.ty.clone(),
            self.mods.is_static(),
            self.visibility,
        );
        Ok(Property {
            name: self.name,
            ty: self.ty,
            visibility: self.visibility,
            mods: self.mods,
            getter: self.getter,
            has_setter: self.has_setter,
            handle,
        })
    }
}

/// Configures one field during its callback.
pub struct FieldBuilder<'a> {
    ctx: MemberContext<'a>,
    name: String,
    ty: TypeRef,
    visibility: Visibility,
    is_static: bool,
    is_readonly: bool,
    initializer: Option<Expr>,
}

impl<'a> FieldBuilder<'a> {
    pub(crate) fn new(ctx: MemberContext<'a>, name: String, ty: TypeRef) -> Self {
        Self {
            ctx,
            name,
            ty,
            visibility: Visibility::Public,
            is_static: false,
            is_readonly: false,
            initializer: None,
        }
    }

    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.visibility = visibility;
        self
    }

    /// Apply the `static` modifier.
    pub fn static_(&mut self) -> &mut Self {
        self.is_static = true;
        self
    }

    /// Apply the `readonly` modifier.
    pub fn readonly(&mut self) -> &mut Self {
        self.is_readonly = true;
        self
    }

    /// Supply an initializer expression.
    pub fn initializer(&mut self, value: Expr) -> &mut Self {
        self.initializer = Some(value);
        self
    }

    pub(crate) fn finish(self) -> Result<Field> {
        if let Some(initializer) = &self.initializer {
            validate::check_free_variables(initializer, &[], &validate::signature(&self.name, &[]))?;
        }
        let handle = MemberRef::new(
            self.ctx.owner.clone(),
            MemberKind::Field,
            self.name.clone(),
            Vec::new(),
            self.ty.clone(),
            self.is_static,
            self.visibility,
        );
        Ok(Field {
            name: self.name,
            ty: self.ty,
            visibility: self.visibility,
            is_static: self.is_static,
            is_readonly: self.is_readonly,
            initializer: self.initializer,
            handle,
        })
    }
}
