//! Structural errors raised at expression construction.
//!
//! These fire at the call site, before any node enters a graph, so a
//! malformed operand never becomes part of a body.

use thiserror::Error;

/// An expression could not be constructed from the given operands.
#[derive(Debug, Error)]
pub enum ExprError {
    /// Wrong number of arguments for a member call.
    #[error("{member} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Signature of the member being called.
        member: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// An argument's type does not fit the parameter.
    #[error("argument {index} of {member} expects '{expected}', got '{actual}'")]
    ArgumentType {
        /// Signature of the member being called.
        member: String,
        /// Zero-based argument position.
        index: usize,
        /// Declared parameter type.
        expected: String,
        /// Supplied argument type.
        actual: String,
    },

    /// An explicit receiver was supplied for a static member.
    #[error("static member {member} cannot be called on an instance")]
    ReceiverOnStatic {
        /// Signature of the member being called.
        member: String,
    },

    /// A conditional test expression is not boolean.
    #[error("conditional test must be 'bool', got '{actual}'")]
    ConditionNotBoolean {
        /// Type of the supplied test expression.
        actual: String,
    },

    /// The arms of a conditional disagree on type.
    #[error("conditional arms must agree on type: '{if_true}' vs '{if_false}'")]
    BranchTypeMismatch {
        /// Type of the true arm.
        if_true: String,
        /// Type of the false arm.
        if_false: String,
    },

    /// Binary operands disagree on type.
    #[error("operands of '{op}' must agree on type: '{left}' vs '{right}'")]
    OperandTypeMismatch {
        /// Operator symbol.
        op: &'static str,
        /// Type of the left operand.
        left: String,
        /// Type of the right operand.
        right: String,
    },

    /// An operand type does not support the operator.
    #[error("operator '{op}' is not defined for '{operand}'")]
    UnsupportedOperand {
        /// Operator symbol.
        op: &'static str,
        /// The offending operand type.
        operand: String,
    },

    /// Assignment to something that is not a variable, field, or property.
    #[error("cannot assign to a {target} expression")]
    InvalidAssignTarget {
        /// Kind label of the attempted target.
        target: &'static str,
    },

    /// Assigned value does not fit the target's type.
    #[error("cannot assign '{actual}' to '{expected}'")]
    AssignTypeMismatch {
        /// The target's type.
        expected: String,
        /// The value's type.
        actual: String,
    },
}
