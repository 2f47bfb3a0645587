//! Convenience wrappers over the compilation bridge.

use smelt_decl::{Compile, CompiledUnit, ModelCompiler, Result, SourceFile};
use smelt_render::CSharpRenderer;
use tracing::debug;

/// Compile a finished graph to in-memory types, or fail with one aggregate
/// error listing every diagnostic.
pub fn compile_to_types(file: &SourceFile) -> Result<CompiledUnit> {
    ModelCompiler::new().compile_graph(file)
}

/// Render a finished graph and hand the text to `compiler`, failing with one
/// aggregate error listing every diagnostic.
///
/// The hand-off is synchronous and non-cancellable; a hang in the host
/// compiler hangs the caller.
pub fn compile_and_check(file: &SourceFile, compiler: &dyn Compile) -> Result<CompiledUnit> {
    let source = CSharpRenderer::new().render_source(file);
    let references: Vec<String> = file.references().map(str::to_string).collect();
    debug!(source = %source.name, references = references.len(), "verifying emitted source");
    compiler.compile(&[source], &references).into_result()
}
