//! The block-extraction engine.
//!
//! Single-expression positions (conditional tests and arms, unary and binary
//! operands, call and creation arguments, assignment values) cannot hold a
//! statement block. During translation each such block is lifted into a
//! synthesized private helper method on the declaring type — parameters are
//! the block's free variables in first-occurrence order, the return type is
//! the block's result type — and the position is replaced by a call passing
//! those variables. Extraction runs inside-out, so nested blocks chain.
//! Structurally equal blocks extracted for one declaring type reuse one
//! helper within a translation pass.

use std::collections::HashMap;

use indexmap::IndexSet;
use smelt_expr::scope::free_variables;
use smelt_expr::structural::StructuralExpr;
use smelt_expr::{
    Block, BuiltinType, Expr, MemberKind, MemberRef, ParamSig, TypeRef, Visibility,
};
use tracing::trace;

use crate::members::{Method, Param, ParamMode};
use crate::modifiers::MemberModifiers;

/// Per-declaring-type extraction state for one translation pass.
pub(crate) struct Extractor {
    owner: TypeRef,
    taken_names: IndexSet<String>,
    memo: HashMap<StructuralExpr, MemberRef>,
    helpers: Vec<Method>,
    static_context: bool,
}

impl Extractor {
    pub(crate) fn new(owner: TypeRef, member_names: impl IntoIterator<Item = String>) -> Self {
        Self {
            owner,
            taken_names: member_names.into_iter().collect(),
            memo: HashMap::new(),
            helpers: Vec::new(),
            static_context: false,
        }
    }

    /// The helpers synthesized so far, in creation order.
    pub(crate) fn into_helpers(self) -> Vec<Method> {
        self.helpers
    }

    /// Rewrite a value in a single-expression position (a field initializer,
    /// a chained-constructor argument).
    pub(crate) fn rewrite_value(&mut self, value: &Expr, static_context: bool) -> Expr {
        self.static_context = static_context;
        self.rewrite_operand(value.clone())
    }

    /// Rewrite one member body. `static_context` decides whether helpers
    /// synthesized for it are static.
    pub(crate) fn rewrite_body(&mut self, body: &Expr, static_context: bool) -> Expr {
        self.static_context = static_context;
        // The body root is a statement position: a bare block is fine there.
        match body {
            Expr::Block(block) => Expr::Block(self.rewrite_block(block)),
            other => self.rewrite_children(other.clone()),
        }
    }

    fn rewrite_block(&mut self, block: &Block) -> Block {
        let statements = block
            .statements
            .iter()
            .map(|statement| match statement {
                // a directly nested block is still a statement position
                Expr::Block(inner) => Expr::Block(self.rewrite_block(inner)),
                other => self.rewrite_children(other.clone()),
            })
            .collect();
        Block {
            variables: block.variables.clone(),
            statements,
        }
    }

    /// Rewrite every operand position of `expr`, extracting blocks that land
    /// in them.
    fn rewrite_children(&mut self, expr: Expr) -> Expr {
        match expr {
            Expr::Unary { op, operand } => Expr::Unary {
                op,
                operand: Box::new(self.rewrite_operand(*operand)),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op,
                left: Box::new(self.rewrite_operand(*left)),
                right: Box::new(self.rewrite_operand(*right)),
            },
            Expr::Conditional {
                test,
                if_true,
                if_false,
            } => Expr::Conditional {
                test: Box::new(self.rewrite_operand(*test)),
                if_true: Box::new(self.rewrite_operand(*if_true)),
                if_false: Box::new(self.rewrite_operand(*if_false)),
            },
            Expr::Assign { target, value } => Expr::Assign {
                target,
                value: Box::new(self.rewrite_operand(*value)),
            },
            Expr::Call {
                method,
                receiver,
                args,
            } => Expr::Call {
                method,
                receiver: receiver.map(|r| Box::new(self.rewrite_operand(*r))),
                args: args
                    .into_iter()
                    .map(|arg| self.rewrite_operand(arg))
                    .collect(),
            },
            Expr::New { ty, ctor, args } => Expr::New {
                ty,
                ctor,
                args: args
                    .into_iter()
                    .map(|arg| self.rewrite_operand(arg))
                    .collect(),
            },
            Expr::FieldAccess { field, receiver } => Expr::FieldAccess {
                field,
                receiver: receiver.map(|r| Box::new(self.rewrite_operand(*r))),
            },
            Expr::PropertyAccess { property, receiver } => Expr::PropertyAccess {
                property,
                receiver: receiver.map(|r| Box::new(self.rewrite_operand(*r))),
            },
            leaf => leaf,
        }
    }

    /// Rewrite a single-expression position: recurse first (inside-out), then
    /// lift the block out if one remains here.
    fn rewrite_operand(&mut self, expr: Expr) -> Expr {
        let expr = match &expr {
            Expr::Block(block) => Expr::Block(self.rewrite_block(block)),
            _ => self.rewrite_children(expr),
        };
        match expr {
            Expr::Block(block) if block.needs_extraction() => self.extract(block),
            other => other,
        }
    }

    /// Lift `block` into a helper method and return the replacement call.
    fn extract(&mut self, block: Block) -> Expr {
        let block_expr = Expr::Block(block);
        let captured = free_variables(&block_expr, &[]);
        let args: Vec<Expr> = captured.iter().map(|var| var.read()).collect();

        let key = StructuralExpr(block_expr.clone());
        if let Some(existing) = self.memo.get(&key) {
            trace!(helper = existing.name(), "reusing extracted helper");
            return Expr::Call {
                method: existing.clone(),
                receiver: None,
                args,
            };
        }

        let Expr::Block(block) = block_expr else {
            unreachable!("constructed above");
        };
        let return_type = block.result_type();
        let name = self.fresh_name(&return_type);
        trace!(helper = %name, captures = captured.len(), "extracting block");

        let handle = MemberRef::new(
            self.owner.clone(),
            MemberKind::Method,
            name.clone(),
            captured
                .iter()
                .map(|var| ParamSig::new(var.name(), var.ty().clone()))
                .collect(),
            return_type.clone(),
            self.static_context,
            Visibility::Private,
        );

        let mut mods = MemberModifiers::new();
        if self.static_context {
            // helpers mirror the staticness of the member they came from;
            // the signature is fresh so this cannot conflict
            let _ = mods.set_static(&name);
        }
        self.helpers.push(Method {
            name,
            visibility: Visibility::Private,
            mods,
            generics: Vec::new(),
            params: captured
                .iter()
                .map(|var| Param {
                    var: var.clone(),
                    mode: ParamMode::Value,
                })
                .collect(),
            return_type,
            body: Some(Expr::Block(block)),
            handle: handle.clone(),
        });
        self.memo.insert(key, handle.clone());

        Expr::Call {
            method: handle,
            receiver: None,
            args,
        }
    }

    /// A deterministic helper name derived from the return type, with numeric
    /// suffixes to dodge both declared members and earlier helpers.
    fn fresh_name(&mut self, return_type: &TypeRef) -> String {
        let base = helper_base_name(return_type);
        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.taken_names.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}{suffix}");
        }
        self.taken_names.insert(candidate.clone());
        candidate
    }
}

fn helper_base_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Builtin(BuiltinType::Void) => "DoAction".to_string(),
        TypeRef::Builtin(builtin) => format!("Get{}", builtin.platform_name()),
        TypeRef::Array(element) => format!("{}Array", helper_base_name(element)),
        TypeRef::Nullable(inner) => format!("{}OrDefault", helper_base_name(inner)),
        other => format!("Get{}", sanitize(&other.label())),
    }
}

fn sanitize(label: &str) -> String {
    label
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect()
}
