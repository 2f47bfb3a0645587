//! Declaration node model, generic parameter synthesis, and block extraction
//! for the smelt source generator.
//!
//! A user builds an in-memory model of source-level constructs (classes,
//! structs, interfaces, enums, attributes, their members and generic
//! parameters) by composing expression-tree nodes, then renders the model
//! into compilable source. Construction is one-shot: a configuration
//! callback runs against a mutable builder, validation fires at every call,
//! and the finished [`SourceFile`] is immutable.
//!
//! # Example
//!
//! ```
//! use smelt_decl::SourceFile;
//! use smelt_expr::{Expr, TypeRef};
//!
//! let file = SourceFile::build(|f| {
//!     f.namespace("Generated.Messages")?;
//!     f.class("Messager", |c| {
//!         c.method("GetMessage", |m| {
//!             m.returns(TypeRef::string());
//!             m.body(Expr::literal("Hello!"));
//!             Ok(())
//!         })?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(file.types().len(), 1);
//! ```

pub mod compile;
pub mod error;
mod extract;
pub mod generics;
pub mod implement;
pub mod members;
pub mod modifiers;
pub mod source_file;
pub mod translate;
pub mod type_decl;
pub mod validate;

pub use compile::{Compile, CompileOutcome, CompiledType, CompiledUnit, ModelCompiler, SourceText};
pub use error::{Error, Result};
pub use generics::{GenericParam, GenericParamBuilder};
pub use implement::{ClosingBuilder, ImplementedInterface};
pub use members::{
    ChainKind, ChainedCall, Ctor, CtorBuilder, Field, FieldBuilder, Member, Method, MethodBuilder,
    Param, ParamMode, Property, PropertyBuilder,
};
pub use modifiers::{MemberModifiers, TypeModifier};
pub use source_file::{SourceFile, SourceFileBuilder};
pub use translate::{TranslatedMember, TranslatedType, TranslationUnit};
pub use type_decl::{
    AttributeBuilder, ClassBuilder, EnumBuilder, EnumMember, InterfaceBuilder, StructBuilder,
    TypeDecl,
};
