//! Reflective type descriptions.
//!
//! Expression nodes carry a [`TypeRef`]: a cheap, clonable reference that can
//! name a builtin, an externally reflected type, a sibling type node in the
//! graph under construction, or a synthesized generic-parameter backing type.
//! The full reflective shape of a type is a [`TypeInfo`], resolved on demand
//! through a [`TypeLookup`] so declared types can be described before and
//! after their graph is frozen.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::literal::ConstValue;
use crate::member::{MemberKind, MemberSig};

/// Kind of a named type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A reference type with members and optional base type.
    Class,
    /// A value type.
    Struct,
    /// A member-contract type; all members are implicitly abstract.
    Interface,
    /// A value type enumerating named constants.
    Enum,
    /// A class deriving from the platform attribute base type.
    Attribute,
}

impl TypeKind {
    /// Whether instances are values rather than references.
    pub fn is_value_type(self) -> bool {
        matches!(self, Self::Struct | Self::Enum)
    }

    /// Whether this kind can serve as a base type.
    pub fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Attribute)
    }

    /// Lowercase label used in diagnostics and rendered source.
    pub fn label(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Attribute => "attribute",
        }
    }
}

/// Builtin platform types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// No value; only valid as a return type.
    Void,
    /// The root reference type.
    Object,
    /// Boolean value type.
    Bool,
    /// UTF-16 code unit value type.
    Char,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 64-bit IEEE float.
    Double,
    /// Immutable reference string.
    String,
}

impl BuiltinType {
    /// The platform type name, e.g. `Int32`.
    pub fn platform_name(self) -> &'static str {
        match self {
            Self::Void => "Void",
            Self::Object => "Object",
            Self::Bool => "Boolean",
            Self::Char => "Char",
            Self::Int => "Int32",
            Self::Long => "Int64",
            Self::Double => "Double",
            Self::String => "String",
        }
    }

    /// The language keyword alias, e.g. `int`.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Object => "object",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
        }
    }

    /// Whether this builtin is a value type.
    pub fn is_value_type(self) -> bool {
        !matches!(self, Self::Object | Self::String)
    }

    /// The zero value used by default expressions and synthesized stubs.
    pub fn zero(self) -> ConstValue {
        match self {
            Self::Void | Self::Object | Self::String => ConstValue::Null,
            Self::Bool => ConstValue::Bool(false),
            Self::Char => ConstValue::Char('\0'),
            Self::Int => ConstValue::Int(0),
            Self::Long => ConstValue::Long(0),
            Self::Double => ConstValue::Double(0.0),
        }
    }
}

/// Identity of a type node declared in a graph under construction.
///
/// Carries the declaring graph's nonce so references never resolve against a
/// foreign graph, and the declared name so diagnostics can name the type
/// before its reflective shape exists.
#[derive(Debug, Clone)]
pub struct DeclId {
    graph: u64,
    index: u32,
    name: Arc<str>,
}

impl DeclId {
    /// Create an identity for the `index`-th type of graph `graph`.
    pub fn new(graph: u64, index: u32, name: impl Into<Arc<str>>) -> Self {
        Self {
            graph,
            index,
            name: name.into(),
        }
    }

    /// The declared type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the type within its source file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Nonce of the owning graph.
    pub fn graph(&self) -> u64 {
        self.graph
    }
}

impl PartialEq for DeclId {
    fn eq(&self, other: &Self) -> bool {
        self.graph == other.graph && self.index == other.index
    }
}

impl Eq for DeclId {}

impl Hash for DeclId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph.hash(state);
        self.index.hash(state);
    }
}

/// An externally reflected type: something the generated source references
/// but this graph does not declare.
#[derive(Debug)]
pub struct ExternalType {
    /// Containing namespace, if any.
    pub namespace: Option<String>,
    /// Simple type name.
    pub name: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Whether the type is sealed.
    pub is_sealed: bool,
    /// Binary the type lives in; collected into the source file's reference set.
    pub assembly: Option<String>,
    /// Open generic parameter names, in declaration order.
    pub generic_params: Vec<String>,
    /// Base type, if any.
    pub base: Option<TypeRef>,
    /// Implemented interfaces.
    pub interfaces: Vec<TypeRef>,
    /// Known member signatures.
    pub members: Vec<MemberSig>,
    info: OnceLock<Arc<TypeInfo>>,
}

impl ExternalType {
    /// Start describing an external class.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_kind(namespace, name, TypeKind::Class)
    }

    /// Start describing an external interface.
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_kind(namespace, name, TypeKind::Interface)
    }

    /// Start describing an external value type.
    pub fn value_type(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_kind(namespace, name, TypeKind::Struct)
    }

    fn with_kind(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
            kind,
            is_abstract: false,
            is_sealed: false,
            assembly: None,
            generic_params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            info: OnceLock::new(),
        }
    }

    /// Mark the type abstract.
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Mark the type sealed.
    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    /// Record the binary the type lives in.
    pub fn assembly(mut self, name: impl Into<String>) -> Self {
        self.assembly = Some(name.into());
        self
    }

    /// Declare an open generic parameter.
    pub fn generic_param(mut self, name: impl Into<String>) -> Self {
        self.generic_params.push(name.into());
        self
    }

    /// Set the base type.
    pub fn base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a known member signature.
    pub fn member(mut self, sig: MemberSig) -> Self {
        self.members.push(sig);
        self
    }

    /// Finish and wrap in a [`TypeRef`].
    pub fn into_ref(self) -> TypeRef {
        TypeRef::External(Arc::new(self))
    }

    /// Namespace-qualified name.
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    fn info_of(this: &Arc<Self>) -> Arc<TypeInfo> {
        this.info
            .get_or_init(|| {
                Arc::new(TypeInfo {
                    namespace: this.namespace.clone(),
                    name: this.name.clone(),
                    kind: this.kind,
                    is_abstract: this.is_abstract,
                    is_sealed: this.is_sealed,
                    is_static: false,
                    base: this.base.clone(),
                    interfaces: this.interfaces.clone(),
                    generic_params: this.generic_params.clone(),
                    members: this.members.clone(),
                })
            })
            .clone()
    }
}

// External types are nominal: two descriptions of the same namespace-qualified
// name (at the same generic arity) denote the same type.
impl PartialEq for ExternalType {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace
            && self.name == other.name
            && self.generic_params.len() == other.generic_params.len()
    }
}

impl Eq for ExternalType {}

impl Hash for ExternalType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.name.hash(state);
        self.generic_params.len().hash(state);
    }
}

/// A reference to a type, cheap to clone and compare.
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// A builtin platform type.
    Builtin(BuiltinType),
    /// An externally reflected type.
    External(Arc<ExternalType>),
    /// A sibling type node declared in the same graph.
    Declared(DeclId),
    /// A synthesized generic-parameter backing type. Reference-equal iff the
    /// originating descriptors were structurally equal (one cache entry).
    Synthesized(Arc<TypeInfo>),
    /// A single-dimensional array of the element type.
    Array(Box<TypeRef>),
    /// A nullable wrapper over a value type.
    Nullable(Box<TypeRef>),
    /// A generic type with its open parameters closed.
    Closed {
        /// The open generic type.
        open: Box<TypeRef>,
        /// Closing type arguments, in parameter order.
        args: Vec<TypeRef>,
    },
}

impl TypeRef {
    /// Shorthand for the builtin `void`.
    pub fn void() -> Self {
        Self::Builtin(BuiltinType::Void)
    }

    /// Shorthand for the builtin `object`.
    pub fn object() -> Self {
        Self::Builtin(BuiltinType::Object)
    }

    /// Shorthand for the builtin `bool`.
    pub fn bool() -> Self {
        Self::Builtin(BuiltinType::Bool)
    }

    /// Shorthand for the builtin `int`.
    pub fn int() -> Self {
        Self::Builtin(BuiltinType::Int)
    }

    /// Shorthand for the builtin `long`.
    pub fn long() -> Self {
        Self::Builtin(BuiltinType::Long)
    }

    /// Shorthand for the builtin `double`.
    pub fn double() -> Self {
        Self::Builtin(BuiltinType::Double)
    }

    /// Shorthand for the builtin `char`.
    pub fn char() -> Self {
        Self::Builtin(BuiltinType::Char)
    }

    /// Shorthand for the builtin `string`.
    pub fn string() -> Self {
        Self::Builtin(BuiltinType::String)
    }

    /// An array of `element`.
    pub fn array(element: TypeRef) -> Self {
        Self::Array(Box::new(element))
    }

    /// A nullable wrapper over `inner`.
    pub fn nullable(inner: TypeRef) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Close an open generic type with `args`.
    pub fn closed(open: TypeRef, args: Vec<TypeRef>) -> Self {
        Self::Closed {
            open: Box::new(open),
            args,
        }
    }

    /// Whether this is the builtin `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Builtin(BuiltinType::Void))
    }

    /// Whether this is the builtin `object`.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Builtin(BuiltinType::Object))
    }

    /// Resolve the reflective shape of this type.
    ///
    /// Declared references resolve through `lookup`; every other variant is
    /// self-describing. Returns `None` only for a declared reference the
    /// lookup does not know.
    pub fn info(&self, lookup: &dyn TypeLookup) -> Option<Arc<TypeInfo>> {
        match self {
            Self::Builtin(b) => Some(well_known_info(*b)),
            Self::External(ext) => Some(ExternalType::info_of(ext)),
            Self::Declared(id) => lookup.declared_info(id),
            Self::Synthesized(info) => Some(info.clone()),
            Self::Array(element) => Some(Arc::new(TypeInfo {
                namespace: Some("System".to_string()),
                name: format!("{}[]", element.label()),
                kind: TypeKind::Class,
                is_abstract: false,
                is_sealed: true,
                is_static: false,
                base: Some(TypeRef::object()),
                interfaces: Vec::new(),
                generic_params: Vec::new(),
                members: Vec::new(),
            })),
            Self::Nullable(inner) => Some(Arc::new(TypeInfo {
                namespace: Some("System".to_string()),
                name: format!("{}?", inner.label()),
                kind: TypeKind::Struct,
                is_abstract: false,
                is_sealed: true,
                is_static: false,
                base: None,
                interfaces: Vec::new(),
                generic_params: Vec::new(),
                members: Vec::new(),
            })),
            Self::Closed { open, .. } => open.info(lookup),
        }
    }

    /// Whether instances of this type are values.
    ///
    /// Answerable without a lookup for everything except declared references,
    /// which report `false` when unresolved (value-type declarations are
    /// resolved by the declaring graph before this matters).
    pub fn is_value_type(&self, lookup: &dyn TypeLookup) -> bool {
        match self {
            Self::Builtin(b) => b.is_value_type(),
            Self::Nullable(_) => true,
            Self::Array(_) => false,
            _ => self
                .info(lookup)
                .map(|info| info.kind.is_value_type())
                .unwrap_or(false),
        }
    }

    /// Human-readable label used in diagnostics and rendered source.
    pub fn label(&self) -> String {
        match self {
            Self::Builtin(b) => b.keyword().to_string(),
            Self::External(ext) => ext.full_name(),
            Self::Declared(id) => id.name().to_string(),
            Self::Synthesized(info) => info.name.clone(),
            Self::Array(element) => format!("{}[]", element.label()),
            Self::Nullable(inner) => format!("{}?", inner.label()),
            Self::Closed { open, args } => {
                let args: Vec<String> = args.iter().map(TypeRef::label).collect();
                format!("{}<{}>", open.label(), args.join(", "))
            }
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::External(a), Self::External(b)) => a == b,
            (Self::Declared(a), Self::Declared(b)) => a == b,
            (Self::Synthesized(a), Self::Synthesized(b)) => Arc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Nullable(a), Self::Nullable(b)) => a == b,
            (
                Self::Closed { open: a, args: x },
                Self::Closed { open: b, args: y },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Builtin(b) => b.hash(state),
            Self::External(ext) => ext.hash(state),
            Self::Declared(id) => id.hash(state),
            Self::Synthesized(info) => (Arc::as_ptr(info) as usize).hash(state),
            Self::Array(element) => element.hash(state),
            Self::Nullable(inner) => inner.hash(state),
            Self::Closed { open, args } => {
                open.hash(state);
                args.hash(state);
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The reflective shape of a type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    /// Containing namespace, if any.
    pub namespace: Option<String>,
    /// Simple type name.
    pub name: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Whether the type is sealed.
    pub is_sealed: bool,
    /// Whether the type is static.
    pub is_static: bool,
    /// Base type, if any.
    pub base: Option<TypeRef>,
    /// Implemented interfaces.
    pub interfaces: Vec<TypeRef>,
    /// Open generic parameter names.
    pub generic_params: Vec<String>,
    /// Member signatures.
    pub members: Vec<MemberSig>,
}

impl TypeInfo {
    /// Namespace-qualified name.
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Whether instances are values rather than references.
    pub fn is_value_type(&self) -> bool {
        self.kind.is_value_type()
    }

    /// Whether this is an interface.
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether a public parameterless constructor is available.
    ///
    /// A class with no declared constructors has an implicit one.
    pub fn has_parameterless_ctor(&self) -> bool {
        let ctors: Vec<_> = self
            .members
            .iter()
            .filter(|m| m.kind == MemberKind::Constructor)
            .collect();
        if ctors.is_empty() {
            return !self.is_abstract && !self.is_interface();
        }
        ctors
            .iter()
            .any(|c| c.params.is_empty() && c.visibility == crate::member::Visibility::Public)
    }

    /// All abstract member signatures, the ones a complete subtype must implement.
    pub fn abstract_members(&self) -> impl Iterator<Item = &MemberSig> {
        self.members
            .iter()
            .filter(|m| m.is_abstract || self.kind == TypeKind::Interface)
    }
}

/// Resolution of declared type references to their reflective shapes.
///
/// Implemented by source-file builders (partial shapes during configuration)
/// and frozen source files (lazily computed, cached shapes).
pub trait TypeLookup {
    /// Resolve the shape of a declared type, if this lookup owns it.
    fn declared_info(&self, id: &DeclId) -> Option<Arc<TypeInfo>>;
}

/// A lookup that resolves nothing; for contexts with no declared types.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl TypeLookup for NoLookup {
    fn declared_info(&self, _id: &DeclId) -> Option<Arc<TypeInfo>> {
        None
    }
}

fn well_known_info(builtin: BuiltinType) -> Arc<TypeInfo> {
    crate::well_known::builtin_info(builtin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_labels_use_keywords() {
        assert_eq!(TypeRef::int().label(), "int");
        assert_eq!(TypeRef::string().label(), "string");
        assert_eq!(TypeRef::array(TypeRef::int()).label(), "int[]");
        assert_eq!(TypeRef::nullable(TypeRef::int()).label(), "int?");
    }

    #[test]
    fn external_types_compare_nominally() {
        let a = ExternalType::interface("System", "IDisposable").into_ref();
        let b = ExternalType::interface("System", "IDisposable")
            .assembly("System.Runtime")
            .into_ref();
        assert_eq!(a, b);

        let c = ExternalType::interface("System", "IComparable").into_ref();
        assert_ne!(a, c);
    }

    #[test]
    fn decl_ids_compare_within_graph_only() {
        let a = DeclId::new(1, 0, "Messager");
        let b = DeclId::new(1, 0, "Messager");
        let other_graph = DeclId::new(2, 0, "Messager");
        assert_eq!(a, b);
        assert_ne!(a, other_graph);
    }

    #[test]
    fn closed_generic_label() {
        let open = ExternalType::interface("System", "IComparable")
            .generic_param("T")
            .into_ref();
        let closed = TypeRef::closed(open, vec![TypeRef::int()]);
        assert_eq!(closed.label(), "System.IComparable<int>");
    }

    #[test]
    fn value_type_queries() {
        assert!(TypeRef::int().is_value_type(&NoLookup));
        assert!(!TypeRef::string().is_value_type(&NoLookup));
        assert!(TypeRef::nullable(TypeRef::int()).is_value_type(&NoLookup));
        assert!(!TypeRef::array(TypeRef::int()).is_value_type(&NoLookup));
    }
}
