//! The bridge contract: sources plus references in, types or diagnostics out.

use crate::compile::unit::CompiledUnit;
use crate::error::{Error, Result};

/// One named source text handed to a compiler.
#[derive(Debug, Clone)]
pub struct SourceText {
    /// File name the text would be written under.
    pub name: String,
    /// The source text.
    pub text: String,
}

impl SourceText {
    /// Create a named source text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// The result of one compile-and-load hand-off.
#[derive(Debug)]
pub struct CompileOutcome {
    unit: Option<CompiledUnit>,
    diagnostics: Vec<String>,
}

impl CompileOutcome {
    /// A successful outcome carrying the loaded unit.
    pub fn success(unit: CompiledUnit) -> Self {
        Self {
            unit: Some(unit),
            diagnostics: Vec::new(),
        }
    }

    /// A failed outcome carrying collected diagnostics.
    pub fn failure(diagnostics: Vec<String>) -> Self {
        Self {
            unit: None,
            diagnostics,
        }
    }

    /// Whether compilation succeeded.
    pub fn succeeded(&self) -> bool {
        self.unit.is_some()
    }

    /// The loaded unit, when compilation succeeded.
    pub fn unit(&self) -> Option<&CompiledUnit> {
        self.unit.as_ref()
    }

    /// The collected diagnostics, empty on success.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Convert into a `Result`, aggregating diagnostics into one error.
    pub fn into_result(self) -> Result<CompiledUnit> {
        match self.unit {
            Some(unit) => Ok(unit),
            None => Err(Error::compilation(self.diagnostics)),
        }
    }
}

/// The compilation bridge contract.
///
/// Implementations are synchronous, non-cancellable, and one-shot: a hang in
/// the host compiler hangs the caller, and failures are reported once via the
/// outcome's diagnostics.
pub trait Compile {
    /// Compile `sources` against `references`.
    fn compile(&self, sources: &[SourceText], references: &[String]) -> CompileOutcome;
}
