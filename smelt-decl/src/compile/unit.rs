//! Compiled units and types: the in-process analog of a loaded binary.

use std::sync::Arc;

use smelt_expr::{ConstValue, Expr, TypeInfo, Var};

use crate::compile::eval::{self, Env};
use crate::error::{Error, Result};

/// One invokable member of a compiled type.
#[derive(Debug, Clone)]
pub(crate) struct CompiledMethod {
    pub name: String,
    pub params: Vec<Var>,
    pub body: Expr,
}

/// A materialized type: its reflective shape plus invokable members.
#[derive(Debug)]
pub struct CompiledType {
    info: Arc<TypeInfo>,
    methods: Vec<CompiledMethod>,
}

impl CompiledType {
    pub(crate) fn new(info: Arc<TypeInfo>, methods: Vec<CompiledMethod>) -> Self {
        Self { info, methods }
    }

    /// The type's reflective shape.
    pub fn info(&self) -> &Arc<TypeInfo> {
        &self.info
    }

    /// The type's name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Whether an instance can be created without arguments.
    pub fn has_parameterless_ctor(&self) -> bool {
        self.info.has_parameterless_ctor()
    }

    /// Invoke a member whose body is constant-evaluable, binding `args` to
    /// its parameters.
    pub fn invoke(&self, name: &str, args: &[ConstValue]) -> Result<ConstValue> {
        let member = format!("{}.{}", self.info.name, name);
        let method = self
            .methods
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| {
                Box::new(Error::NotInvokable {
                    member: member.clone(),
                    reason: "no member with that name has a body".to_string(),
                })
            })?;
        if method.params.len() != args.len() {
            return Err(Box::new(Error::NotInvokable {
                member,
                reason: format!(
                    "expected {} argument(s), got {}",
                    method.params.len(),
                    args.len()
                ),
            }));
        }
        let mut env = Env::new();
        for (param, arg) in method.params.iter().zip(args) {
            env.bind(param.clone(), arg.clone());
        }
        eval::evaluate(&method.body, &mut env)
            .map_err(|reason| Box::new(Error::NotInvokable { member, reason }))
    }
}

/// The product of a successful compile: the types, in declaration order.
#[derive(Debug)]
pub struct CompiledUnit {
    types: Vec<Arc<CompiledType>>,
}

impl CompiledUnit {
    pub(crate) fn new(types: Vec<Arc<CompiledType>>) -> Self {
        Self { types }
    }

    /// An empty unit, for bridges that verify source without loading it.
    pub fn new_empty() -> Self {
        Self { types: Vec::new() }
    }

    /// The compiled types, in declaration order.
    pub fn types(&self) -> &[Arc<CompiledType>] {
        &self.types
    }

    /// Find a compiled type by name.
    pub fn type_named(&self, name: &str) -> Option<&Arc<CompiledType>> {
        self.types.iter().find(|t| t.name() == name)
    }
}
