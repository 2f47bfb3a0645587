//! Configuration-time and compilation error taxonomy.
//!
//! Every violated invariant surfaces as an [`Error`] that aborts the current
//! build; nothing is silently corrected. Errors are boxed to keep `Result`
//! small on the stack.

use miette::Diagnostic;
use smelt_core::NameProblem;
use smelt_expr::ExprError;
use thiserror::Error;

/// Result type for declaration-building operations (boxed to reduce size on
/// stack).
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// A declaration graph could not be built or compiled.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A name is not shaped like an identifier.
    #[error("invalid {context} name '{name}': {reason}")]
    #[diagnostic(
        code(smelt::invalid_name),
        help("use only letters, digits, and underscores, starting with a letter or underscore")
    )]
    InvalidName {
        /// The offending name.
        name: String,
        /// What was being named (type, method, parameter, ...).
        context: String,
        /// The specific shape problem.
        reason: String,
    },

    /// Two sibling types share a name.
    #[error("a type named '{name}' already exists in this source file")]
    #[diagnostic(code(smelt::duplicate_type))]
    DuplicateTypeName {
        /// The clashing name.
        name: String,
    },

    /// Two members of one type share a signature.
    #[error("type '{type_name}' already declares a member with signature '{signature}'")]
    #[diagnostic(code(smelt::duplicate_signature))]
    DuplicateSignature {
        /// The declaring type.
        type_name: String,
        /// The full clashing signature.
        signature: String,
    },

    /// A base type was set twice.
    #[error("'{type_name}' already has base type '{existing}'")]
    #[diagnostic(code(smelt::base_already_set))]
    BaseTypeAlreadySet {
        /// The configured type.
        type_name: String,
        /// The previously-set base type.
        existing: String,
    },

    /// The given base type is not an inheritable shape.
    #[error("'{base}' cannot be the base type of '{type_name}': {reason}")]
    #[diagnostic(
        code(smelt::invalid_base),
        help("a base type must be a non-sealed, non-interface class")
    )]
    InvalidBaseType {
        /// The configured type.
        type_name: String,
        /// The rejected base type.
        base: String,
        /// Why the shape is unusable.
        reason: String,
    },

    /// An implements target is not an interface.
    #[error("'{type_name}' cannot implement '{target}': it is not an interface")]
    #[diagnostic(code(smelt::not_an_interface))]
    NotAnInterface {
        /// The configured type.
        type_name: String,
        /// The rejected target.
        target: String,
    },

    /// An abstract member was added to a non-abstract type.
    #[error("abstract member '{signature}' cannot be declared on non-abstract type '{type_name}'")]
    #[diagnostic(code(smelt::abstract_on_concrete))]
    AbstractMemberOnConcreteType {
        /// The declaring type.
        type_name: String,
        /// The member's signature.
        signature: String,
    },

    /// Two pairwise-exclusive modifiers were both applied.
    #[error("'{signature}' cannot be both {first} and {second}")]
    #[diagnostic(code(smelt::conflicting_modifiers))]
    ConflictingModifiers {
        /// The member's signature.
        signature: String,
        /// The modifier applied first.
        first: &'static str,
        /// The modifier applied second.
        second: &'static str,
    },

    /// Two generic-parameter constraints conflict.
    #[error("generic parameter '{parameter}' cannot be constrained by both {first} and {second}")]
    #[diagnostic(code(smelt::conflicting_constraints))]
    ConflictingConstraints {
        /// The parameter name.
        parameter: String,
        /// The constraint applied first.
        first: String,
        /// The constraint applied second.
        second: String,
    },

    /// A generic parameter name was declared twice on one owner.
    #[error("'{owner}' already declares a generic parameter named '{name}'")]
    #[diagnostic(code(smelt::duplicate_generic_parameter))]
    DuplicateGenericParameter {
        /// The owning type or method.
        owner: String,
        /// The clashing parameter name.
        name: String,
    },

    /// A parameter name was declared twice on one member.
    #[error("'{member}' already declares a parameter named '{name}'")]
    #[diagnostic(code(smelt::duplicate_parameter))]
    DuplicateParameter {
        /// The owning member.
        member: String,
        /// The clashing parameter name.
        name: String,
    },

    /// A non-abstract method or constructor has no body.
    #[error("non-abstract member '{signature}' requires a body")]
    #[diagnostic(code(smelt::missing_body))]
    MissingBody {
        /// The member's signature.
        signature: String,
    },

    /// An abstract or interface member was given a body.
    #[error("abstract member '{signature}' cannot have a body")]
    #[diagnostic(code(smelt::body_on_abstract))]
    BodyOnAbstract {
        /// The member's signature.
        signature: String,
    },

    /// A constructor chains to a constructor it cannot reach.
    #[error("constructor {caller} cannot call constructor {target}")]
    #[diagnostic(
        code(smelt::constructor_chain),
        help("a chained constructor must belong to the same type or an accessible base type")
    )]
    ConstructorChain {
        /// The chaining constructor's signature.
        caller: String,
        /// The target constructor's signature.
        target: String,
    },

    /// A constructor chains to a private constructor of another type.
    #[error("constructor {caller} cannot call private constructor {target}")]
    #[diagnostic(code(smelt::private_constructor_chain))]
    PrivateConstructorChain {
        /// The chaining constructor's signature.
        caller: String,
        /// The target constructor's signature.
        target: String,
    },

    /// A body references variables that are neither parameters nor block
    /// locals.
    #[error("body of '{member}' references undefined variable(s): {variables}")]
    #[diagnostic(
        code(smelt::undefined_variables),
        help("every referenced variable must be a parameter or declared by an enclosing block")
    )]
    UndefinedVariables {
        /// The member whose body is malformed.
        member: String,
        /// Comma-separated `name: type` pairs, in first-occurrence order.
        variables: String,
    },

    /// A closing referenced a generic parameter the target does not declare.
    #[error("'{target}' has no generic parameter named '{name}'")]
    #[diagnostic(code(smelt::unknown_generic_parameter))]
    UnknownGenericParameter {
        /// The generic type being closed.
        target: String,
        /// The unrecognized parameter name.
        name: String,
    },

    /// A generic parameter was closed twice in one implementation.
    #[error("generic parameter '{name}' of '{target}' is already closed")]
    #[diagnostic(code(smelt::parameter_already_closed))]
    ParameterAlreadyClosed {
        /// The generic type being closed.
        target: String,
        /// The doubly-closed parameter name.
        name: String,
    },

    /// An enum declares the same constant twice.
    #[error("enum '{type_name}' already declares a member named '{name}'")]
    #[diagnostic(code(smelt::duplicate_enum_member))]
    DuplicateEnumMember {
        /// The declaring enum.
        type_name: String,
        /// The clashing constant name.
        name: String,
    },

    /// An expression operand was structurally malformed.
    #[error(transparent)]
    #[diagnostic(code(smelt::expression))]
    Expression {
        /// The underlying construction error.
        #[from]
        source: ExprError,
    },

    /// The compilation bridge reported diagnostics.
    #[error("compilation failed with {count} diagnostic(s):\n{rendered}")]
    #[diagnostic(code(smelt::compilation))]
    Compilation {
        /// Number of diagnostics.
        count: usize,
        /// Newline-joined diagnostic lines.
        rendered: String,
        /// The raw diagnostics.
        diagnostics: Vec<String>,
    },

    /// A compiled member could not be invoked in-process.
    #[error("cannot invoke '{member}': {reason}")]
    #[diagnostic(code(smelt::not_invokable))]
    NotInvokable {
        /// The member that was asked for.
        member: String,
        /// Why invocation is unavailable.
        reason: String,
    },
}

impl Error {
    /// Build an [`Error::InvalidName`] from a validation problem.
    pub fn invalid_name(
        name: impl Into<String>,
        context: impl Into<String>,
        problem: NameProblem,
    ) -> Box<Self> {
        Box::new(Self::InvalidName {
            name: name.into(),
            context: context.into(),
            reason: problem.to_string(),
        })
    }

    /// Build an [`Error::Compilation`] from collected diagnostics.
    pub fn compilation(diagnostics: Vec<String>) -> Box<Self> {
        Box::new(Self::Compilation {
            count: diagnostics.len(),
            rendered: diagnostics.join("\n"),
            diagnostics,
        })
    }
}

impl From<ExprError> for Box<Error> {
    fn from(source: ExprError) -> Self {
        Box::new(Error::Expression { source })
    }
}
