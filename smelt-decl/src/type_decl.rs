//! Type declaration nodes and their configurators.
//!
//! One shared builder core carries the operations every kind supports; the
//! public per-kind configurators (class, struct, interface, enum, attribute)
//! expose only the operations valid for their kind, so shape rules like
//! "structs have no base type" hold by construction rather than by check.

use std::sync::{Arc, OnceLock};

use smelt_expr::{
    DeclId, MemberRef, MemberSig, TypeInfo, TypeKind, TypeLookup, TypeRef, Visibility, well_known,
};

use crate::error::{Error, Result};
use crate::generics::{GenericParam, GenericParamBuilder};
use crate::implement::{ClosingBuilder, ImplementedInterface, open_params_of};
use crate::members::{
    CtorBuilder, FieldBuilder, Member, MemberContext, MethodBuilder, PropertyBuilder,
};
use crate::modifiers::TypeModifier;
use crate::validate;

/// A named constant of an enum declaration.
#[derive(Debug, Clone)]
pub struct EnumMember {
    pub(crate) name: String,
    pub(crate) value: Option<i64>,
}

impl EnumMember {
    /// The constant's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit value, if one was configured.
    pub fn value(&self) -> Option<i64> {
        self.value
    }
}

/// One named type declaration in a source file.
#[derive(Debug)]
pub struct TypeDecl {
    pub(crate) id: DeclId,
    pub(crate) namespace: Option<String>,
    pub(crate) kind: TypeKind,
    pub(crate) visibility: Visibility,
    pub(crate) modifier: Option<TypeModifier>,
    pub(crate) base: Option<TypeRef>,
    pub(crate) interfaces: Vec<ImplementedInterface>,
    pub(crate) generics: Vec<GenericParam>,
    pub(crate) members: Vec<Member>,
    pub(crate) enum_members: Vec<EnumMember>,
    info_cache: OnceLock<Arc<TypeInfo>>,
}

impl TypeDecl {
    pub(crate) fn new(id: DeclId, namespace: Option<String>, kind: TypeKind) -> Self {
        Self {
            id,
            namespace,
            kind,
            visibility: Visibility::Public,
            modifier: None,
            base: None,
            interfaces: Vec::new(),
            generics: Vec::new(),
            members: Vec::new(),
            enum_members: Vec::new(),
            info_cache: OnceLock::new(),
        }
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// The declaration identity.
    pub fn id(&self) -> &DeclId {
        &self.id
    }

    /// The declaration kind.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The declared visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The type modifier, if one was applied.
    pub fn modifier(&self) -> Option<TypeModifier> {
        self.modifier
    }

    /// The effective base type. Attribute declarations default to the
    /// platform attribute base when none was configured.
    pub fn base(&self) -> Option<TypeRef> {
        match (&self.base, self.kind) {
            (Some(base), _) => Some(base.clone()),
            (None, TypeKind::Attribute) => Some(well_known::attribute_base()),
            _ => None,
        }
    }

    /// The implemented interfaces, in configuration order.
    pub fn interfaces(&self) -> &[ImplementedInterface] {
        &self.interfaces
    }

    /// The generic parameters, in declaration order.
    pub fn generic_params(&self) -> &[GenericParam] {
        &self.generics
    }

    /// The members, in configuration order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// The enum constants, for enum declarations.
    pub fn enum_members(&self) -> &[EnumMember] {
        &self.enum_members
    }

    /// This declaration as a type reference.
    pub fn as_ref(&self) -> TypeRef {
        TypeRef::Declared(self.id.clone())
    }

    /// Whether the type is abstract (interfaces count).
    pub fn is_abstract(&self) -> bool {
        self.modifier == Some(TypeModifier::Abstract) || self.kind == TypeKind::Interface
    }

    /// The reflective shape, computed fresh. Used while the graph is still
    /// under construction.
    pub(crate) fn compute_info(&self) -> Arc<TypeInfo> {
        Arc::new(TypeInfo {
            namespace: self.namespace.clone(),
            name: self.name().to_string(),
            kind: self.kind,
            is_abstract: self.is_abstract(),
            is_sealed: self.modifier == Some(TypeModifier::Sealed),
            is_static: self.modifier == Some(TypeModifier::Static),
            base: self.base(),
            interfaces: self
                .interfaces
                .iter()
                .map(ImplementedInterface::emitted_ref)
                .collect(),
            generic_params: self.generics.iter().map(|g| g.name().to_string()).collect(),
            members: self.members.iter().map(member_sig).collect(),
        })
    }

    /// The reflective shape, cached after the graph is frozen.
    pub(crate) fn cached_info(&self) -> Arc<TypeInfo> {
        self.info_cache.get_or_init(|| self.compute_info()).clone()
    }
}

impl smelt_expr::Node for TypeDecl {
    fn kind(&self) -> smelt_expr::NodeKind {
        smelt_expr::NodeKind::Type
    }

    fn node_type(&self) -> TypeRef {
        self.as_ref()
    }
}

fn member_sig(member: &Member) -> MemberSig {
    let handle = member.handle();
    MemberSig {
        kind: handle.kind(),
        name: handle.name().to_string(),
        params: handle.params().iter().map(|p| p.ty.clone()).collect(),
        return_type: handle.return_type().clone(),
        is_static: member.is_static(),
        is_abstract: member.is_abstract(),
        visibility: handle.visibility(),
    }
}

/// Resolves declared references against the types configured so far.
pub(crate) struct SiblingLookup<'a> {
    pub types: &'a [TypeDecl],
    pub graph: u64,
}

impl TypeLookup for SiblingLookup<'_> {
    fn declared_info(&self, id: &DeclId) -> Option<Arc<TypeInfo>> {
        if id.graph() != self.graph {
            return None;
        }
        self.types
            .get(id.index() as usize)
            .filter(|decl| decl.id() == id)
            .map(|decl| decl.compute_info())
    }
}

/// Shared configuration core behind the per-kind builders.
pub(crate) struct TypeBuilderCore<'a> {
    siblings: &'a [TypeDecl],
    graph: u64,
    pub(crate) decl: TypeDecl,
}

impl<'a> TypeBuilderCore<'a> {
    pub(crate) fn new(
        siblings: &'a [TypeDecl],
        graph: u64,
        id: DeclId,
        namespace: Option<String>,
        kind: TypeKind,
    ) -> Self {
        Self {
            siblings,
            graph,
            decl: TypeDecl::new(id, namespace, kind),
        }
    }

    fn lookup(&self) -> SiblingLookup<'a> {
        SiblingLookup {
            types: self.siblings,
            graph: self.graph,
        }
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.decl.visibility = visibility;
    }

    pub(crate) fn set_modifier(&mut self, modifier: TypeModifier) -> Result<()> {
        if let Some(existing) = self.decl.modifier {
            if existing != modifier {
                return Err(Box::new(Error::ConflictingModifiers {
                    signature: self.decl.name().to_string(),
                    first: existing.label(),
                    second: modifier.label(),
                }));
            }
            return Ok(());
        }
        self.decl.modifier = Some(modifier);
        Ok(())
    }

    pub(crate) fn set_base(&mut self, base: TypeRef) -> Result<()> {
        if let Some(existing) = &self.decl.base {
            return Err(Box::new(Error::BaseTypeAlreadySet {
                type_name: self.decl.name().to_string(),
                existing: existing.label(),
            }));
        }
        let lookup = self.lookup();
        if let Some(reason) = validate::base_shape_problem(&lookup, &base) {
            return Err(Box::new(Error::InvalidBaseType {
                type_name: self.decl.name().to_string(),
                base: base.label(),
                reason,
            }));
        }
        self.decl.base = Some(base);
        Ok(())
    }

    pub(crate) fn implements(&mut self, target: TypeRef) -> Result<()> {
        self.implements_with(target, |_| Ok(()))
    }

    pub(crate) fn implements_with(
        &mut self,
        target: TypeRef,
        configure: impl FnOnce(&mut ClosingBuilder<'_>) -> Result<()>,
    ) -> Result<()> {
        let lookup = self.lookup();
        let not_interface = || {
            Box::new(Error::NotAnInterface {
                type_name: self.decl.name().to_string(),
                target: target.label(),
            })
        };
        let info = target.info(&lookup).ok_or_else(not_interface)?;
        if !info.is_interface() {
            return Err(not_interface());
        }
        let mut implemented = ImplementedInterface::new(target.clone(), open_params_of(&info));
        let mut builder = ClosingBuilder::new(&mut implemented);
        configure(&mut builder)?;
        self.decl.interfaces.push(implemented);
        Ok(())
    }

    pub(crate) fn add_generic_param(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut GenericParamBuilder<'_>) -> Result<()>,
    ) -> Result<GenericParam> {
        validate::ensure_identifier(name, "generic parameter")?;
        if self.decl.generics.iter().any(|g| g.name() == name) {
            return Err(Box::new(Error::DuplicateGenericParameter {
                owner: self.decl.name().to_string(),
                name: name.to_string(),
            }));
        }
        let lookup = self.lookup();
        let mut builder = GenericParamBuilder::new(name.to_string(), &lookup);
        configure(&mut builder)?;
        let param = builder.finish();
        self.decl.generics.push(param.clone());
        Ok(param)
    }

    fn member_ctx<'b>(&self, lookup: &'b SiblingLookup<'a>) -> MemberContext<'b>
    where
        'a: 'b,
    {
        MemberContext {
            owner: self.decl.as_ref(),
            owner_name: self.decl.name().to_string(),
            type_kind: self.decl.kind,
            type_modifier: self.decl.modifier,
            base: self.decl.base.clone(),
            lookup,
        }
    }

    pub(crate) fn add_method(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut MethodBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        validate::ensure_identifier(name, "method")?;
        let lookup = self.lookup();
        let mut builder = MethodBuilder::new(self.member_ctx(&lookup), name.to_string());
        configure(&mut builder)?;
        let method = builder.finish()?;
        self.push_member(Member::Method(method))
    }

    pub(crate) fn add_ctor(
        &mut self,
        configure: impl FnOnce(&mut CtorBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        let lookup = self.lookup();
        let mut builder = CtorBuilder::new(self.member_ctx(&lookup));
        configure(&mut builder)?;
        let ctor = builder.finish()?;
        self.push_member(Member::Constructor(ctor))
    }

    pub(crate) fn add_property(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut PropertyBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        validate::ensure_identifier(name, "property")?;
        let lookup = self.lookup();
        let mut builder = PropertyBuilder::new(self.member_ctx(&lookup), name.to_string(), ty);
        configure(&mut builder)?;
        let property = builder.finish()?;
        self.push_member(Member::Property(property))
    }

    pub(crate) fn add_field(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut FieldBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        validate::ensure_identifier(name, "field")?;
        let lookup = self.lookup();
        let mut builder = FieldBuilder::new(self.member_ctx(&lookup), name.to_string(), ty);
        configure(&mut builder)?;
        let field = builder.finish()?;
        self.push_member(Member::Field(field))
    }

    pub(crate) fn add_enum_member(&mut self, name: &str, value: Option<i64>) -> Result<()> {
        validate::ensure_identifier(name, "enum member")?;
        if self.decl.enum_members.iter().any(|m| m.name == name) {
            return Err(Box::new(Error::DuplicateEnumMember {
                type_name: self.decl.name().to_string(),
                name: name.to_string(),
            }));
        }
        self.decl.enum_members.push(EnumMember {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn push_member(&mut self, member: Member) -> Result<MemberRef> {
        let signature = member.signature();
        if self.decl.members.iter().any(|m| m.signature() == signature) {
            return Err(Box::new(Error::DuplicateSignature {
                type_name: self.decl.name().to_string(),
                signature,
            }));
        }
        let handle = member.handle().clone();
        self.decl.members.push(member);
        Ok(handle)
    }
}

/// Configures a class declaration.
pub struct ClassBuilder<'a> {
    pub(crate) core: TypeBuilderCore<'a>,
}

impl ClassBuilder<'_> {
    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.core.set_visibility(visibility);
        self
    }

    /// Apply the `static` modifier.
    pub fn static_(&mut self) -> Result<&mut Self> {
        self.core.set_modifier(TypeModifier::Static)?;
        Ok(self)
    }

    /// Apply the `abstract` modifier.
    pub fn abstract_(&mut self) -> Result<&mut Self> {
        self.core.set_modifier(TypeModifier::Abstract)?;
        Ok(self)
    }

    /// Apply the `sealed` modifier.
    pub fn sealed(&mut self) -> Result<&mut Self> {
        self.core.set_modifier(TypeModifier::Sealed)?;
        Ok(self)
    }

    /// Set the base type. Fails when one is already set or when the given
    /// type is not an inheritable class shape.
    pub fn base_type(&mut self, base: TypeRef) -> Result<&mut Self> {
        self.core.set_base(base)?;
        Ok(self)
    }

    /// Implement an interface.
    pub fn implements(&mut self, target: TypeRef) -> Result<&mut Self> {
        self.core.implements(target)?;
        Ok(self)
    }

    /// Implement a generic interface, closing its open parameters.
    pub fn implements_closed(
        &mut self,
        target: TypeRef,
        configure: impl FnOnce(&mut ClosingBuilder<'_>) -> Result<()>,
    ) -> Result<&mut Self> {
        self.core.implements_with(target, configure)?;
        Ok(self)
    }

    /// Declare a generic parameter on the class.
    pub fn generic_param(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut GenericParamBuilder<'_>) -> Result<()>,
    ) -> Result<GenericParam> {
        self.core.add_generic_param(name, configure)
    }

    /// Add a method.
    pub fn method(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut MethodBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_method(name, configure)
    }

    /// Add a constructor.
    pub fn ctor(
        &mut self,
        configure: impl FnOnce(&mut CtorBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_ctor(configure)
    }

    /// Add a property.
    pub fn property(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut PropertyBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_property(name, ty, configure)
    }

    /// Add a field.
    pub fn field(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut FieldBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_field(name, ty, configure)
    }
}

/// Configures a struct declaration.
pub struct StructBuilder<'a> {
    pub(crate) core: TypeBuilderCore<'a>,
}

impl StructBuilder<'_> {
    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.core.set_visibility(visibility);
        self
    }

    /// Implement an interface.
    pub fn implements(&mut self, target: TypeRef) -> Result<&mut Self> {
        self.core.implements(target)?;
        Ok(self)
    }

    /// Implement a generic interface, closing its open parameters.
    pub fn implements_closed(
        &mut self,
        target: TypeRef,
        configure: impl FnOnce(&mut ClosingBuilder<'_>) -> Result<()>,
    ) -> Result<&mut Self> {
        self.core.implements_with(target, configure)?;
        Ok(self)
    }

    /// Declare a generic parameter on the struct.
    pub fn generic_param(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut GenericParamBuilder<'_>) -> Result<()>,
    ) -> Result<GenericParam> {
        self.core.add_generic_param(name, configure)
    }

    /// Add a method.
    pub fn method(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut MethodBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_method(name, configure)
    }

    /// Add a constructor.
    pub fn ctor(
        &mut self,
        configure: impl FnOnce(&mut CtorBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_ctor(configure)
    }

    /// Add a property.
    pub fn property(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut PropertyBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_property(name, ty, configure)
    }

    /// Add a field.
    pub fn field(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut FieldBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_field(name, ty, configure)
    }
}

/// Configures an interface declaration. Members are implicitly abstract.
pub struct InterfaceBuilder<'a> {
    pub(crate) core: TypeBuilderCore<'a>,
}

impl InterfaceBuilder<'_> {
    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.core.set_visibility(visibility);
        self
    }

    /// Extend another interface.
    pub fn extends(&mut self, target: TypeRef) -> Result<&mut Self> {
        self.core.implements(target)?;
        Ok(self)
    }

    /// Declare a generic parameter on the interface.
    pub fn generic_param(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut GenericParamBuilder<'_>) -> Result<()>,
    ) -> Result<GenericParam> {
        self.core.add_generic_param(name, configure)
    }

    /// Add an abstract method contract.
    pub fn method(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut MethodBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_method(name, configure)
    }

    /// Add an abstract property contract.
    pub fn property(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut PropertyBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_property(name, ty, configure)
    }
}

/// Configures an enum declaration.
pub struct EnumBuilder<'a> {
    pub(crate) core: TypeBuilderCore<'a>,
}

impl EnumBuilder<'_> {
    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.core.set_visibility(visibility);
        self
    }

    /// Add a constant.
    pub fn member(&mut self, name: &str) -> Result<&mut Self> {
        self.core.add_enum_member(name, None)?;
        Ok(self)
    }

    /// Add a constant with an explicit value.
    pub fn member_valued(&mut self, name: &str, value: i64) -> Result<&mut Self> {
        self.core.add_enum_member(name, Some(value))?;
        Ok(self)
    }
}

/// Configures an attribute declaration: a class deriving from the platform
/// attribute base type.
pub struct AttributeBuilder<'a> {
    pub(crate) core: TypeBuilderCore<'a>,
}

impl AttributeBuilder<'_> {
    /// Set the visibility.
    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.core.set_visibility(visibility);
        self
    }

    /// Apply the `sealed` modifier.
    pub fn sealed(&mut self) -> Result<&mut Self> {
        self.core.set_modifier(TypeModifier::Sealed)?;
        Ok(self)
    }

    /// Derive from another attribute class instead of the platform base.
    pub fn base_type(&mut self, base: TypeRef) -> Result<&mut Self> {
        self.core.set_base(base)?;
        Ok(self)
    }

    /// Add a constructor.
    pub fn ctor(
        &mut self,
        configure: impl FnOnce(&mut CtorBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_ctor(configure)
    }

    /// Add a property.
    pub fn property(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut PropertyBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_property(name, ty, configure)
    }

    /// Add a field.
    pub fn field(
        &mut self,
        name: &str,
        ty: TypeRef,
        configure: impl FnOnce(&mut FieldBuilder<'_>) -> Result<()>,
    ) -> Result<MemberRef> {
        self.core.add_field(name, ty, configure)
    }
}
