//! Catalog of well-known platform types.
//!
//! Builtin reflective shapes are process-wide statics; a handful of stock
//! external interfaces are provided for constraint configuration and tests.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::member::MemberSig;
use crate::types::{BuiltinType, ExternalType, TypeInfo, TypeKind, TypeRef};

static BUILTIN_INFOS: Lazy<Vec<Arc<TypeInfo>>> = Lazy::new(|| {
    [
        BuiltinType::Void,
        BuiltinType::Object,
        BuiltinType::Bool,
        BuiltinType::Char,
        BuiltinType::Int,
        BuiltinType::Long,
        BuiltinType::Double,
        BuiltinType::String,
    ]
    .into_iter()
    .map(|builtin| {
        Arc::new(TypeInfo {
            namespace: Some("System".to_string()),
            name: builtin.platform_name().to_string(),
            kind: if builtin.is_value_type() {
                TypeKind::Struct
            } else {
                TypeKind::Class
            },
            is_abstract: false,
            is_sealed: !matches!(builtin, BuiltinType::Object),
            is_static: false,
            base: if matches!(builtin, BuiltinType::Object) {
                None
            } else {
                Some(TypeRef::object())
            },
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            members: Vec::new(),
        })
    })
    .collect()
});

/// Reflective shape of a builtin type.
pub fn builtin_info(builtin: BuiltinType) -> Arc<TypeInfo> {
    let index = match builtin {
        BuiltinType::Void => 0,
        BuiltinType::Object => 1,
        BuiltinType::Bool => 2,
        BuiltinType::Char => 3,
        BuiltinType::Int => 4,
        BuiltinType::Long => 5,
        BuiltinType::Double => 6,
        BuiltinType::String => 7,
    };
    BUILTIN_INFOS[index].clone()
}

static DISPOSABLE: Lazy<TypeRef> = Lazy::new(|| {
    ExternalType::interface("System", "IDisposable")
        .assembly("System.Runtime")
        .member(MemberSig::method("Dispose", vec![], TypeRef::void()))
        .into_ref()
});

static COMPARABLE: Lazy<TypeRef> = Lazy::new(|| {
    ExternalType::interface("System", "IComparable")
        .assembly("System.Runtime")
        .member(MemberSig::method(
            "CompareTo",
            vec![TypeRef::object()],
            TypeRef::int(),
        ))
        .into_ref()
});

static ATTRIBUTE_BASE: Lazy<TypeRef> = Lazy::new(|| {
    ExternalType::class("System", "Attribute")
        .abstract_()
        .assembly("System.Runtime")
        .into_ref()
});

/// `System.IDisposable`.
pub fn disposable() -> TypeRef {
    DISPOSABLE.clone()
}

/// Non-generic `System.IComparable`.
pub fn comparable() -> TypeRef {
    COMPARABLE.clone()
}

/// `System.Attribute`, the implicit base of attribute declarations.
pub fn attribute_base() -> TypeRef {
    ATTRIBUTE_BASE.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoLookup;

    #[test]
    fn builtin_infos_are_shared() {
        let a = builtin_info(BuiltinType::Int);
        let b = builtin_info(BuiltinType::Int);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.full_name(), "System.Int32");
        assert!(a.is_value_type());
    }

    #[test]
    fn stock_interfaces_carry_members() {
        let disposable = disposable();
        let info = disposable.info(&NoLookup).unwrap();
        assert!(info.is_interface());
        assert_eq!(info.members.len(), 1);
        assert_eq!(info.members[0].name, "Dispose");
    }

    #[test]
    fn attribute_base_is_abstract_class() {
        let info = attribute_base().info(&NoLookup).unwrap();
        assert_eq!(info.kind, TypeKind::Class);
        assert!(info.is_abstract);
    }
}
