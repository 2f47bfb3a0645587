//! The in-process model compiler.
//!
//! Re-validates a finished graph the way a host compiler would and
//! materializes each declared type into a [`CompiledType`]: its cached
//! reflective shape plus invokable members. This is the bridge implementation
//! the generic-parameter synthesizer round-trips through.

use std::sync::Arc;

use smelt_expr::{MemberSig, TypeRef};
use tracing::debug;

use crate::compile::bridge::CompileOutcome;
use crate::compile::unit::{CompiledMethod, CompiledType, CompiledUnit};
use crate::error::Result;
use crate::members::Member;
use crate::source_file::SourceFile;
use crate::type_decl::TypeDecl;

/// Compiles declaration graphs in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelCompiler;

impl ModelCompiler {
    /// Create a model compiler.
    pub fn new() -> Self {
        Self
    }

    /// Compile `file`, yielding an outcome in the bridge's shape.
    pub fn run(&self, file: &SourceFile) -> CompileOutcome {
        let diagnostics = self.check(file);
        if !diagnostics.is_empty() {
            debug!(count = diagnostics.len(), "model compilation failed");
            return CompileOutcome::failure(diagnostics);
        }
        let types = file
            .types()
            .iter()
            .map(|decl| Arc::new(materialize(decl)))
            .collect();
        CompileOutcome::success(CompiledUnit::new(types))
    }

    /// Compile `file`, aggregating diagnostics into one error on failure.
    pub fn compile_graph(&self, file: &SourceFile) -> Result<CompiledUnit> {
        self.run(file).into_result()
    }

    /// Semantic checks over the frozen graph. Construction-time validation
    /// already enforced per-call invariants; this pass checks what only the
    /// whole graph can answer.
    pub fn check(&self, file: &SourceFile) -> Vec<String> {
        let mut diagnostics = Vec::new();
        for decl in file.types() {
            if decl.is_abstract() {
                continue;
            }
            self.check_contracts(file, decl, &mut diagnostics);
        }
        diagnostics
    }

    /// Every abstract member of every implemented interface (and of the base
    /// chain) must be implemented on a concrete type.
    fn check_contracts(&self, file: &SourceFile, decl: &TypeDecl, diagnostics: &mut Vec<String>) {
        let mut require = |contract: &TypeRef, sig: &MemberSig| {
            let implemented = decl.members().iter().any(|member| {
                let handle = member.handle();
                handle.name() == sig.name
                    && handle.params().len() == sig.params.len()
                    && handle
                        .params()
                        .iter()
                        .zip(&sig.params)
                        .all(|(p, expected)| p.ty == *expected)
            });
            if !implemented {
                diagnostics.push(format!(
                    "'{}' does not implement '{}.{}'",
                    decl.name(),
                    contract.label(),
                    sig.signature()
                ));
            }
        };

        for implemented in decl.interfaces() {
            let target = implemented.target().clone();
            if let Some(info) = target.info(file) {
                for sig in info.abstract_members() {
                    require(&target, sig);
                }
            }
        }

        let mut base = decl.base();
        let mut hops = 0;
        while let Some(ty) = base {
            let Some(info) = ty.info(file) else { break };
            for sig in &info.members {
                if sig.is_abstract {
                    require(&ty, sig);
                }
            }
            hops += 1;
            if hops > 64 {
                break;
            }
            base = info.base.clone();
        }
    }
}

fn materialize(decl: &TypeDecl) -> CompiledType {
    let mut methods = Vec::new();
    for member in decl.members() {
        match member {
            Member::Method(method) => {
                if let Some(body) = method.body() {
                    methods.push(CompiledMethod {
                        name: method.name().to_string(),
                        params: method.params().iter().map(|p| p.var().clone()).collect(),
                        body: body.clone(),
                    });
                }
            }
            Member::Property(property) => {
                if let Some(getter) = property.getter() {
                    methods.push(CompiledMethod {
                        name: property.name().to_string(),
                        params: Vec::new(),
                        body: getter.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    CompiledType::new(decl.cached_info(), methods)
}
