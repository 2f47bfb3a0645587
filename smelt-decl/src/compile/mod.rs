//! The compilation bridge.
//!
//! The text-level [`Compile`] contract is what external collaborators (host
//! compiler wrappers) implement; the in-process [`ModelCompiler`] implements
//! the same outcome shape over the declaration graph itself and is what the
//! generic-parameter synthesizer round-trips through. Compilation failures
//! are reported once, as a collected list of diagnostic strings; there is no
//! retry and no partial success.

mod bridge;
mod eval;
mod model;
mod unit;

pub use bridge::{Compile, CompileOutcome, SourceText};
pub use model::ModelCompiler;
pub use unit::{CompiledType, CompiledUnit};
