//! The source-file node: one-shot builder entry, frozen graph.
//!
//! Configuration happens synchronously inside the callback passed to
//! [`SourceFile::build`]; nodes append in call order. Once the callback
//! returns, the graph is frozen: translation, rendering, and compilation all
//! read it, nothing mutates it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use smelt_expr::visit::walk;
use smelt_expr::{DeclId, Expr, TypeInfo, TypeKind, TypeLookup, TypeRef};

use crate::error::Result;
use crate::members::Member;
use crate::type_decl::{
    AttributeBuilder, ClassBuilder, EnumBuilder, InterfaceBuilder, StructBuilder, TypeBuilderCore,
    TypeDecl,
};
use crate::validate;

static GRAPH_NONCE: AtomicU64 = AtomicU64::new(1);

/// A frozen declaration graph: ordered types, an optional namespace, and the
/// external binary references required to compile its contents.
#[derive(Debug)]
pub struct SourceFile {
    graph: u64,
    namespace: Option<String>,
    types: Vec<TypeDecl>,
    references: IndexSet<String>,
}

impl SourceFile {
    /// Build a source file by running `configure` against a fresh builder.
    ///
    /// All node creation happens inside the callback, on the calling thread;
    /// the first configuration error aborts the build and propagates.
    pub fn build(
        configure: impl FnOnce(&mut SourceFileBuilder) -> Result<()>,
    ) -> Result<SourceFile> {
        let mut builder = SourceFileBuilder {
            graph: GRAPH_NONCE.fetch_add(1, Ordering::Relaxed),
            namespace: None,
            types: Vec::new(),
        };
        configure(&mut builder)?;
        let references = collect_references(&builder.types);
        Ok(SourceFile {
            graph: builder.graph,
            namespace: builder.namespace,
            types: builder.types,
            references,
        })
    }

    /// The configured namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The declared types, in configuration order (which is emission order).
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Find a declared type by name.
    pub fn type_named(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name() == name)
    }

    /// Assemblies of every external type the graph references.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(String::as_str)
    }
}

impl smelt_expr::Node for SourceFile {
    fn kind(&self) -> smelt_expr::NodeKind {
        smelt_expr::NodeKind::SourceFile
    }

    fn node_type(&self) -> TypeRef {
        TypeRef::void()
    }
}

impl TypeLookup for SourceFile {
    fn declared_info(&self, id: &DeclId) -> Option<Arc<TypeInfo>> {
        if id.graph() != self.graph {
            return None;
        }
        self.types
            .get(id.index() as usize)
            .filter(|decl| decl.id() == id)
            .map(|decl| decl.cached_info())
    }
}

/// Mutable configurator handed to the [`SourceFile::build`] callback.
pub struct SourceFileBuilder {
    graph: u64,
    namespace: Option<String>,
    types: Vec<TypeDecl>,
}

impl SourceFileBuilder {
    /// Set the namespace the types are emitted into. Dot-separated segments
    /// are validated individually.
    pub fn namespace(&mut self, namespace: &str) -> Result<&mut Self> {
        for segment in namespace.split('.') {
            validate::ensure_identifier(segment, "namespace segment")?;
        }
        self.namespace = Some(namespace.to_string());
        Ok(self)
    }

    /// Add a class declaration.
    pub fn class(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut ClassBuilder<'_>) -> Result<()>,
    ) -> Result<TypeRef> {
        let id = self.check_new_type(name)?;
        let decl = {
            let mut builder = ClassBuilder {
                core: self.new_core(id, TypeKind::Class),
            };
            configure(&mut builder)?;
            builder.core.decl
        };
        Ok(self.push_type(decl))
    }

    /// Add a struct declaration.
    pub fn struct_(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut StructBuilder<'_>) -> Result<()>,
    ) -> Result<TypeRef> {
        let id = self.check_new_type(name)?;
        let decl = {
            let mut builder = StructBuilder {
                core: self.new_core(id, TypeKind::Struct),
            };
            configure(&mut builder)?;
            builder.core.decl
        };
        Ok(self.push_type(decl))
    }

    /// Add an interface declaration.
    pub fn interface(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut InterfaceBuilder<'_>) -> Result<()>,
    ) -> Result<TypeRef> {
        let id = self.check_new_type(name)?;
        let decl = {
            let mut builder = InterfaceBuilder {
                core: self.new_core(id, TypeKind::Interface),
            };
            configure(&mut builder)?;
            builder.core.decl
        };
        Ok(self.push_type(decl))
    }

    /// Add an enum declaration.
    pub fn enum_(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut EnumBuilder<'_>) -> Result<()>,
    ) -> Result<TypeRef> {
        let id = self.check_new_type(name)?;
        let decl = {
            let mut builder = EnumBuilder {
                core: self.new_core(id, TypeKind::Enum),
            };
            configure(&mut builder)?;
            builder.core.decl
        };
        Ok(self.push_type(decl))
    }

    /// Add an attribute declaration.
    pub fn attribute(
        &mut self,
        name: &str,
        configure: impl FnOnce(&mut AttributeBuilder<'_>) -> Result<()>,
    ) -> Result<TypeRef> {
        let id = self.check_new_type(name)?;
        let decl = {
            let mut builder = AttributeBuilder {
                core: self.new_core(id, TypeKind::Attribute),
            };
            configure(&mut builder)?;
            builder.core.decl
        };
        Ok(self.push_type(decl))
    }

    fn check_new_type(&self, name: &str) -> Result<DeclId> {
        validate::ensure_identifier(name, "type")?;
        if self.types.iter().any(|t| t.name() == name) {
            return Err(Box::new(crate::error::Error::DuplicateTypeName {
                name: name.to_string(),
            }));
        }
        Ok(DeclId::new(self.graph, self.types.len() as u32, name))
    }

    fn new_core(&self, id: DeclId, kind: TypeKind) -> TypeBuilderCore<'_> {
        TypeBuilderCore::new(&self.types, self.graph, id, self.namespace.clone(), kind)
    }

    fn push_type(&mut self, decl: TypeDecl) -> TypeRef {
        let type_ref = decl.as_ref();
        self.types.push(decl);
        type_ref
    }
}

/// Collect the assemblies of every external type reachable from the graph:
/// bases, interfaces, generic constraints, member signatures, and bodies.
fn collect_references(types: &[TypeDecl]) -> IndexSet<String> {
    let mut assemblies = IndexSet::new();

    for decl in types {
        if let Some(base) = decl.base() {
            collect_from_type(&base, &mut assemblies);
        }
        for implemented in decl.interfaces() {
            collect_from_type(&implemented.emitted_ref(), &mut assemblies);
        }
        for generic in decl.generic_params() {
            for constraint in generic.constraints() {
                collect_from_type(&constraint, &mut assemblies);
            }
        }
        for member in decl.members() {
            let handle = member.handle();
            collect_from_type(handle.return_type(), &mut assemblies);
            for param in handle.params() {
                collect_from_type(&param.ty, &mut assemblies);
            }
            let bodies: Vec<&Expr> = match member {
                Member::Method(m) => m.body().into_iter().collect(),
                Member::Constructor(c) => {
                    let mut all = vec![c.body()];
                    if let Some(chain) = c.chain() {
                        all.extend(chain.args());
                    }
                    all
                }
                Member::Property(p) => p.getter().into_iter().collect(),
                Member::Field(f) => f.initializer().into_iter().collect(),
            };
            for body in bodies {
                walk(body, &mut |expr| {
                    collect_from_type(&expr.ty(), &mut assemblies);
                    if let Expr::New { ty, .. } = expr {
                        collect_from_type(ty, &mut assemblies);
                    }
                });
            }
        }
    }
    assemblies
}

fn collect_from_type(ty: &TypeRef, assemblies: &mut IndexSet<String>) {
    match ty {
        TypeRef::External(ext) => {
            if let Some(assembly) = &ext.assembly {
                assemblies.insert(assembly.clone());
            }
            if let Some(base) = &ext.base {
                collect_from_type(base, assemblies);
            }
            for iface in &ext.interfaces {
                collect_from_type(iface, assemblies);
            }
        }
        TypeRef::Array(inner) | TypeRef::Nullable(inner) => {
            collect_from_type(inner, assemblies);
        }
        TypeRef::Closed { open, args } => {
            collect_from_type(open, assemblies);
            for arg in args {
                collect_from_type(arg, assemblies);
            }
        }
        _ => {}
    }
}
