//! Interface implementation and generic-parameter closing nodes.

use indexmap::IndexMap;
use smelt_expr::{TypeInfo, TypeRef};

use crate::error::{Error, Result};

/// The act of a type implementing an interface (or extending a generic
/// base), with any open generic parameters closed.
#[derive(Debug, Clone)]
pub struct ImplementedInterface {
    pub(crate) target: TypeRef,
    pub(crate) open_params: Vec<String>,
    pub(crate) closings: IndexMap<String, TypeRef>,
}

impl ImplementedInterface {
    pub(crate) fn new(target: TypeRef, open_params: Vec<String>) -> Self {
        Self {
            target,
            open_params,
            closings: IndexMap::new(),
        }
    }

    /// The implemented interface.
    pub fn target(&self) -> &TypeRef {
        &self.target
    }

    /// The configured closings, keyed by parameter name.
    pub fn closings(&self) -> &IndexMap<String, TypeRef> {
        &self.closings
    }

    /// The reference emitted in the type's base list: the closed form when
    /// every open parameter was closed, the open form otherwise.
    pub fn emitted_ref(&self) -> TypeRef {
        if self.open_params.is_empty() || self.closings.len() != self.open_params.len() {
            return self.target.clone();
        }
        let args: Vec<TypeRef> = self
            .open_params
            .iter()
            .filter_map(|name| self.closings.get(name).cloned())
            .collect();
        TypeRef::closed(self.target.clone(), args)
    }
}

/// Configures the closings of one implemented interface.
#[derive(Debug)]
pub struct ClosingBuilder<'a> {
    implemented: &'a mut ImplementedInterface,
}

impl<'a> ClosingBuilder<'a> {
    pub(crate) fn new(implemented: &'a mut ImplementedInterface) -> Self {
        Self { implemented }
    }

    /// Close the open parameter `name` with `ty`.
    ///
    /// Fails when the target declares no such parameter or when it was
    /// already closed.
    pub fn close(&mut self, name: &str, ty: TypeRef) -> Result<&mut Self> {
        let target = self.implemented.target.label();
        if !self.implemented.open_params.iter().any(|p| p == name) {
            return Err(Box::new(Error::UnknownGenericParameter {
                target,
                name: name.to_string(),
            }));
        }
        if self.implemented.closings.contains_key(name) {
            return Err(Box::new(Error::ParameterAlreadyClosed {
                target,
                name: name.to_string(),
            }));
        }
        self.implemented.closings.insert(name.to_string(), ty);
        Ok(self)
    }
}

/// Extract the open parameter names of an interface shape.
pub(crate) fn open_params_of(info: &TypeInfo) -> Vec<String> {
    info.generic_params.clone()
}
