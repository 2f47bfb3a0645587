//! Centralized validation helpers.
//!
//! Identifier checks, rendered signatures, parameter declaration, free
//! variable resolution, assignability, and base-type shape checks live here
//! so every configurator reports the same diagnostics.

use smelt_core::check_name;
use smelt_expr::scope::free_variables;
use smelt_expr::{Expr, TypeKind, TypeLookup, TypeRef, Var};

use crate::error::{Error, Result};
use crate::members::{Param, ParamMode};

/// Validate an identifier, attributing the error to `context`.
pub fn ensure_identifier(name: &str, context: &str) -> Result<()> {
    check_name(name).map_err(|problem| Error::invalid_name(name, context, problem))
}

/// The `Name(type, type)` signature string used in diagnostics and for
/// member-uniqueness comparison.
pub fn signature(name: &str, params: &[Param]) -> String {
    let types: Vec<String> = params.iter().map(|p| p.ty().label()).collect();
    format!("{name}({})", types.join(", "))
}

/// Declare a parameter on `params`, validating its name and uniqueness.
pub(crate) fn declare_param(
    params: &mut Vec<Param>,
    member: &str,
    name: &str,
    ty: TypeRef,
    mode: ParamMode,
) -> Result<Var> {
    ensure_identifier(name, "parameter")?;
    if params.iter().any(|p| p.name() == name) {
        return Err(Box::new(Error::DuplicateParameter {
            member: member.to_string(),
            name: name.to_string(),
        }));
    }
    let var = Var::new(name, ty);
    params.push(Param {
        var: var.clone(),
        mode,
    });
    Ok(var)
}

/// Resolve free variables of `body` against `bound`; any leftover reference
/// is a configuration error naming every offender with its type.
pub fn check_free_variables(body: &Expr, bound: &[Var], member: &str) -> Result<()> {
    let free = free_variables(body, bound);
    if free.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = free
        .iter()
        .map(|v| format!("{}: {}", v.name(), v.ty().label()))
        .collect();
    Err(Box::new(Error::UndefinedVariables {
        member: member.to_string(),
        variables: listed.join(", "),
    }))
}

/// Why a type cannot serve as a base type, if it cannot.
pub fn base_shape_problem(lookup: &dyn TypeLookup, base: &TypeRef) -> Option<String> {
    match base {
        TypeRef::Array(_) => return Some("it is an array type".to_string()),
        TypeRef::Nullable(_) => return Some("it is a nullable value type".to_string()),
        _ => {}
    }
    let Some(info) = base.info(lookup) else {
        // An unresolved declared reference can only come from a foreign
        // graph; nothing useful can be said about its shape.
        return Some("it is not declared in this source file".to_string());
    };
    if info.is_interface() {
        return Some("it is an interface".to_string());
    }
    if info.is_value_type() {
        return Some("it is a value type".to_string());
    }
    if !info.kind.is_class_like() {
        return Some(format!("it is a {}", info.kind.label()));
    }
    if info.is_sealed {
        return Some("it is sealed".to_string());
    }
    if info.is_static {
        return Some("it is static".to_string());
    }
    None
}

/// Whether `candidate` appears in the base chain starting at `base`.
pub fn is_ancestor(
    lookup: &dyn TypeLookup,
    base: Option<&TypeRef>,
    candidate: &TypeRef,
) -> bool {
    let mut current = base.cloned();
    // Base chains are finite in well-formed graphs; the guard keeps a
    // malformed external description from looping.
    let mut hops = 0;
    while let Some(ty) = current {
        if ty == *candidate {
            return true;
        }
        hops += 1;
        if hops > 64 {
            return false;
        }
        current = ty.info(lookup).and_then(|info| info.base.clone());
    }
    false
}

/// Whether a value of `from` is assignable to `to`, walking base chains and
/// interface sets through `lookup`.
pub fn is_assignable(lookup: &dyn TypeLookup, from: &TypeRef, to: &TypeRef) -> bool {
    if from == to {
        return true;
    }
    if to.is_object() && !from.is_void() {
        return true;
    }
    if let TypeRef::Nullable(inner) = to {
        if **inner == *from {
            return true;
        }
    }
    let Some(info) = from.info(lookup) else {
        return false;
    };
    if info.interfaces.iter().any(|i| {
        i == to || matches!(i, TypeRef::Closed { open, .. } if **open == *to)
    }) {
        return true;
    }
    if is_ancestor(lookup, info.base.as_ref(), to) {
        return true;
    }
    // Interfaces may be satisfied further up the base chain.
    if let Some(base) = &info.base {
        if info.kind != TypeKind::Interface {
            return is_assignable(lookup, base, to);
        }
    }
    false
}
