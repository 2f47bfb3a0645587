//! The translation pass.
//!
//! Translation takes the frozen graph to the form the renderer consumes:
//! every member body is rewritten by the block-extraction engine, and the
//! helpers synthesized along the way are attached to their declaring type.
//! The pass is deterministic and starts from the frozen graph each time, so
//! repeated translation re-derives the same helpers instead of accumulating
//! more.

use smelt_expr::Expr;

use crate::extract::Extractor;
use crate::members::{Member, Method};
use crate::source_file::SourceFile;
use crate::type_decl::TypeDecl;

/// One member with its translated bodies.
#[derive(Debug)]
pub struct TranslatedMember<'a> {
    member: &'a Member,
    body: Option<Expr>,
    chain_args: Option<Vec<Expr>>,
}

impl<'a> TranslatedMember<'a> {
    /// The underlying member node.
    pub fn member(&self) -> &'a Member {
        self.member
    }

    /// The translated body (method body, constructor body, property getter,
    /// or field initializer), when the member has one.
    pub fn body(&self) -> Option<&Expr> {
        self.body.as_ref()
    }

    /// The translated constructor chain arguments, when the member is a
    /// chaining constructor.
    pub fn chain_args(&self) -> Option<&[Expr]> {
        self.chain_args.as_deref()
    }
}

/// One type with its translated members and synthesized helpers.
#[derive(Debug)]
pub struct TranslatedType<'a> {
    decl: &'a TypeDecl,
    members: Vec<TranslatedMember<'a>>,
    helpers: Vec<Method>,
}

impl<'a> TranslatedType<'a> {
    /// The underlying type node.
    pub fn decl(&self) -> &'a TypeDecl {
        self.decl
    }

    /// The translated members, in configuration order.
    pub fn members(&self) -> &[TranslatedMember<'a>] {
        &self.members
    }

    /// The helpers synthesized by block extraction, in creation order.
    pub fn helpers(&self) -> &[Method] {
        &self.helpers
    }
}

/// The render hand-off: ordered types, namespace, references.
#[derive(Debug)]
pub struct TranslationUnit<'a> {
    file: &'a SourceFile,
    types: Vec<TranslatedType<'a>>,
}

impl<'a> TranslationUnit<'a> {
    /// The originating source file.
    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    /// The namespace, if one was configured.
    pub fn namespace(&self) -> Option<&str> {
        self.file.namespace()
    }

    /// The translated types, in emission order.
    pub fn types(&self) -> &[TranslatedType<'a>] {
        &self.types
    }
}

impl SourceFile {
    /// Translate the graph for rendering, running block extraction over
    /// every member body.
    pub fn translate(&self) -> TranslationUnit<'_> {
        let types = self.types().iter().map(translate_type).collect();
        TranslationUnit { file: self, types }
    }
}

fn translate_type(decl: &TypeDecl) -> TranslatedType<'_> {
    let mut extractor = Extractor::new(
        decl.as_ref(),
        decl.members().iter().map(|m| m.name().to_string()),
    );
    let members = decl
        .members()
        .iter()
        .map(|member| translate_member(member, &mut extractor))
        .collect();
    TranslatedType {
        decl,
        members,
        helpers: extractor.into_helpers(),
    }
}

fn translate_member<'a>(member: &'a Member, extractor: &mut Extractor) -> TranslatedMember<'a> {
    let (body, chain_args) = match member {
        Member::Method(method) => (
            method
                .body()
                .map(|body| extractor.rewrite_body(body, method.modifiers().is_static())),
            None,
        ),
        Member::Constructor(ctor) => (
            Some(extractor.rewrite_body(ctor.body(), false)),
            ctor.chain().map(|chain| {
                chain
                    .args()
                    .iter()
                    .map(|arg| extractor.rewrite_value(arg, false))
                    .collect()
            }),
        ),
        Member::Property(property) => (
            property
                .getter()
                .map(|getter| extractor.rewrite_body(getter, property.modifiers().is_static())),
            None,
        ),
        Member::Field(field) => (
            field
                .initializer()
                .map(|init| extractor.rewrite_value(init, field.is_static())),
            None,
        ),
    };
    TranslatedMember {
        member,
        body,
        chain_args,
    }
}
