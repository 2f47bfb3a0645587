//! Plain-text renderer for smelt declaration graphs.
//!
//! Consumes the translation hand-off (ordered types, namespace, references)
//! and produces formatted source text. Output is deterministic: insertion
//! order is emission order, so snapshot tests stay stable.

mod code_builder;
mod decl;
mod expr;
mod types;

pub use code_builder::CodeBuilder;
pub use expr::render_expr;
pub use types::type_name;

use smelt_decl::{SourceFile, SourceText, TranslationUnit};

/// Renders translation units into source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpRenderer;

impl CSharpRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render a translated graph to source text.
    pub fn render(&self, unit: &TranslationUnit<'_>) -> String {
        let mut builder = CodeBuilder::new();
        let namespaced = unit.namespace().is_some();
        if let Some(namespace) = unit.namespace() {
            builder.open_block(&format!("namespace {namespace}"));
        }
        for (index, translated) in unit.types().iter().enumerate() {
            if index > 0 {
                builder.push_blank();
            }
            decl::render_type(&mut builder, translated);
        }
        if namespaced {
            builder.close_block();
        }
        builder.build()
    }

    /// Translate and render `file` in one step.
    pub fn render_file(&self, file: &SourceFile) -> String {
        self.render(&file.translate())
    }

    /// Translate and render `file` as a named source text for the
    /// compilation bridge, named after its first type.
    pub fn render_source(&self, file: &SourceFile) -> SourceText {
        let name = file
            .types()
            .first()
            .map(|decl| format!("{}.cs", decl.name()))
            .unwrap_or_else(|| "Empty.cs".to_string());
        SourceText::new(name, self.render_file(file))
    }
}
