//! Type references rendered as source text.

use smelt_core::escape_reserved;
use smelt_expr::TypeRef;

/// The source form of a type reference: builtin keyword, namespace-qualified
/// external name, bare declared name.
pub fn type_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Builtin(builtin) => builtin.keyword().to_string(),
        TypeRef::External(ext) => ext.full_name(),
        TypeRef::Declared(id) => escape_reserved(id.name()),
        TypeRef::Synthesized(info) => escape_reserved(&info.name),
        TypeRef::Array(element) => format!("{}[]", type_name(element)),
        TypeRef::Nullable(inner) => format!("{}?", type_name(inner)),
        TypeRef::Closed { open, args } => {
            let args: Vec<String> = args.iter().map(type_name).collect();
            format!("{}<{}>", type_name(open), args.join(", "))
        }
    }
}
