//! Generic-parameter descriptors and constraint configuration.

use std::sync::{Arc, OnceLock};

use smelt_expr::{TypeInfo, TypeLookup, TypeRef};

use crate::error::{Error, Result};
use crate::generics::synthesizer;

/// A type constraint together with the reflective shape it had when it was
/// configured. Snapshotting here lets synthesis run without access to the
/// originating graph.
#[derive(Debug, Clone)]
pub(crate) struct Constraint {
    pub ty: TypeRef,
    pub info: Arc<TypeInfo>,
}

impl Constraint {
    pub(crate) fn is_interface(&self) -> bool {
        self.info.is_interface()
    }

    pub(crate) fn label(&self) -> String {
        self.ty.label()
    }
}

#[derive(Debug)]
pub(crate) struct GenericParamData {
    pub name: String,
    pub struct_constraint: bool,
    pub class_constraint: bool,
    pub newable: bool,
    pub constraints: Vec<Constraint>,
    pub synthesized: OnceLock<Arc<TypeInfo>>,
}

/// A frozen generic-parameter node.
///
/// Cloning shares the descriptor; the synthesized backing type is memoized
/// both on the node and in the process-wide structural cache.
#[derive(Debug, Clone)]
pub struct GenericParam(pub(crate) Arc<GenericParamData>);

impl GenericParam {
    /// The parameter's name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Whether the `struct` constraint is set.
    pub fn has_struct_constraint(&self) -> bool {
        self.0.struct_constraint
    }

    /// Whether the `class` constraint is set.
    pub fn has_class_constraint(&self) -> bool {
        self.0.class_constraint
    }

    /// Whether the `new()` constraint is set.
    pub fn has_newable_constraint(&self) -> bool {
        self.0.newable
    }

    /// The configured type constraints, in application order.
    pub fn constraints(&self) -> Vec<TypeRef> {
        self.0.constraints.iter().map(|c| c.ty.clone()).collect()
    }

    /// The concrete type standing in for this parameter inside expression
    /// trees.
    ///
    /// Synthesized on first use by round-tripping a one-type declaration
    /// graph through the compilation bridge, then memoized process-wide by
    /// structural equality of the descriptor: equal name and constraints
    /// yield the same (reference-equal) type, any difference yields a
    /// distinct one.
    pub fn parameter_type(&self) -> Result<TypeRef> {
        if let Some(info) = self.0.synthesized.get() {
            return Ok(TypeRef::Synthesized(info.clone()));
        }
        let info = synthesizer::synthesize(&self.0)?;
        let _ = self.0.synthesized.set(info.clone());
        Ok(TypeRef::Synthesized(info))
    }
}

/// Configures one generic parameter during its callback.
pub struct GenericParamBuilder<'a> {
    lookup: &'a dyn TypeLookup,
    name: String,
    struct_constraint: bool,
    class_constraint: bool,
    newable: bool,
    constraints: Vec<Constraint>,
}

impl<'a> GenericParamBuilder<'a> {
    pub(crate) fn new(name: String, lookup: &'a dyn TypeLookup) -> Self {
        Self {
            lookup,
            name,
            struct_constraint: false,
            class_constraint: false,
            newable: false,
            constraints: Vec::new(),
        }
    }

    /// Constrain the parameter to value types.
    pub fn struct_constraint(&mut self) -> Result<&mut Self> {
        if self.class_constraint {
            return Err(self.conflict("class", "struct"));
        }
        if self.newable {
            return Err(self.conflict("new()", "struct"));
        }
        if let Some(existing) = self.constraints.first() {
            return Err(self.conflict_owned(existing.label(), "struct".to_string()));
        }
        self.struct_constraint = true;
        Ok(self)
    }

    /// Constrain the parameter to reference types.
    pub fn class_constraint(&mut self) -> Result<&mut Self> {
        if self.struct_constraint {
            return Err(self.conflict("struct", "class"));
        }
        if let Some(existing) = self.constraints.first() {
            return Err(self.conflict_owned(existing.label(), "class".to_string()));
        }
        self.class_constraint = true;
        Ok(self)
    }

    /// Require an accessible parameterless constructor.
    pub fn newable(&mut self) -> Result<&mut Self> {
        if self.struct_constraint {
            return Err(self.conflict("struct", "new()"));
        }
        self.newable = true;
        Ok(self)
    }

    /// Add a type constraint: an interface the parameter must implement, or
    /// at most one class it must derive from.
    pub fn type_constraint(&mut self, ty: TypeRef) -> Result<&mut Self> {
        let label = ty.label();
        if self.struct_constraint {
            return Err(self.conflict_owned("struct".to_string(), label));
        }
        if self.class_constraint {
            return Err(self.conflict_owned("class".to_string(), label));
        }
        let info = ty.info(self.lookup).ok_or_else(|| {
            Box::new(Error::InvalidBaseType {
                type_name: self.name.clone(),
                base: label.clone(),
                reason: "it is not declared in this source file".to_string(),
            })
        })?;
        let constraint = Constraint { ty, info };
        if !constraint.is_interface() {
            if let Some(existing) = self.constraints.iter().find(|c| !c.is_interface()) {
                return Err(self.conflict_owned(existing.label(), label));
            }
        }
        self.constraints.push(constraint);
        Ok(self)
    }

    pub(crate) fn finish(self) -> GenericParam {
        GenericParam(Arc::new(GenericParamData {
            name: self.name,
            struct_constraint: self.struct_constraint,
            class_constraint: self.class_constraint,
            newable: self.newable,
            constraints: self.constraints,
            synthesized: OnceLock::new(),
        }))
    }

    fn conflict(&self, first: &str, second: &str) -> Box<Error> {
        self.conflict_owned(first.to_string(), second.to_string())
    }

    fn conflict_owned(&self, first: String, second: String) -> Box<Error> {
        Box::new(Error::ConflictingConstraints {
            parameter: self.name.clone(),
            first,
            second,
        })
    }
}
