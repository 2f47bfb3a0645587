//! Synthesis of concrete backing types for generic parameters.
//!
//! The backing type satisfies the same structural contract the constraints
//! imply: a non-interface type constraint becomes its base type (abstract
//! base makes the backing type abstract), a `struct` constraint yields a
//! value type, everything else yields an ordinary concrete class. Interface
//! constraints are implemented with default-returning stubs so the backing
//! type is complete and instantiable, then the one-type graph round-trips
//! through the compilation bridge and the first (only) compiled type is kept.

use std::sync::Arc;

use smelt_expr::{Block, Expr, ExternalType, MemberKind, TypeInfo, TypeKind, TypeRef};
use tracing::debug;

use crate::compile::ModelCompiler;
use crate::error::{Error, Result};
use crate::generics::cache::{self, GenericParamKey};
use crate::generics::param::{Constraint, GenericParamData};
use crate::source_file::SourceFile;
use crate::type_decl::TypeBuilderCore;

pub(crate) fn synthesize(data: &GenericParamData) -> Result<Arc<TypeInfo>> {
    let key = GenericParamKey::of(data);
    cache::get_or_synthesize(key, || build_backing_type(data))
}

fn build_backing_type(data: &GenericParamData) -> Result<Arc<TypeInfo>> {
    debug!(parameter = %data.name, "synthesizing backing type");
    let base = data.constraints.iter().find(|c| !c.is_interface());
    let interfaces: Vec<&Constraint> =
        data.constraints.iter().filter(|c| c.is_interface()).collect();

    let name = data.name.clone();
    let file = SourceFile::build(|f| {
        if data.struct_constraint {
            f.struct_(&name, |s| {
                for iface in &interfaces {
                    s.core.implements(externalize(iface))?;
                    add_stubs(&mut s.core, &iface.info)?;
                }
                Ok(())
            })?;
        } else {
            f.class(&name, |c| {
                if let Some(base) = base {
                    c.core.set_base(externalize(base))?;
                    if base.info.is_abstract {
                        c.abstract_()?;
                    }
                }
                for iface in &interfaces {
                    c.core.implements(externalize(iface))?;
                    add_stubs(&mut c.core, &iface.info)?;
                }
                Ok(())
            })?;
        }
        Ok(())
    })?;

    let unit = ModelCompiler::new().compile_graph(&file)?;
    let first = unit
        .types()
        .first()
        .ok_or_else(|| Error::compilation(vec!["bridge produced no types".to_string()]))?;
    Ok(first.info().clone())
}

/// Re-express a constraint for use inside the backing type's own graph.
///
/// Declared references belong to the originating graph and would not resolve
/// there, so they are replaced by an external description built from the
/// shape snapshotted at configuration time.
fn externalize(constraint: &Constraint) -> TypeRef {
    if !matches!(constraint.ty, TypeRef::Declared(_)) {
        return constraint.ty.clone();
    }
    let info = &constraint.info;
    let mut ext = match info.kind {
        TypeKind::Interface => ExternalType::interface("", &info.name),
        TypeKind::Struct | TypeKind::Enum => ExternalType::value_type("", &info.name),
        TypeKind::Class | TypeKind::Attribute => ExternalType::class("", &info.name),
    };
    ext.namespace = info.namespace.clone();
    ext.is_abstract = info.is_abstract;
    ext.is_sealed = info.is_sealed;
    ext.base = info.base.clone();
    ext.interfaces = info.interfaces.clone();
    ext.generic_params = info.generic_params.clone();
    ext.members = info.members.clone();
    ext.into_ref()
}

fn add_stubs(core: &mut TypeBuilderCore<'_>, iface: &TypeInfo) -> Result<()> {
    for sig in iface.abstract_members() {
        match sig.kind {
            MemberKind::Method => {
                let return_type = sig.return_type.clone();
                let params = sig.params.clone();
                let name = sig.name.clone();
                core.add_method(&name, |m| {
                    for (index, ty) in params.iter().enumerate() {
                        m.param(&format!("value{index}"), ty.clone())?;
                    }
                    m.returns(return_type.clone());
                    if return_type.is_void() {
                        m.body(Expr::block(Block::new(Vec::new())));
                    } else {
                        m.body(Expr::default_of(return_type.clone()));
                    }
                    Ok(())
                })?;
            }
            MemberKind::Property => {
                let ty = sig.return_type.clone();
                core.add_property(&sig.name.clone(), ty.clone(), |p| {
                    p.getter(Expr::default_of(ty.clone()));
                    Ok(())
                })?;
            }
            _ => {}
        }
    }
    Ok(())
}
