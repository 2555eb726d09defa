//! Runtime error taxonomy (see `SPEC_FULL.md` §7.2). Hand-rolled `Display` and
//! `std::error::Error`, matching `ouros::repl_error::ReplError`'s style rather
//! than pulling in `thiserror`.

use std::fmt;

use crate::value::Variant;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A `BinOp` was applied to operand types with no defined operator for it,
    /// or to a type combination the runtime does not define at all (e.g.
    /// Vector and a scalar).
    InvalidOperator { op: &'static str, lhs: &'static str, rhs: &'static str },
    /// Field or index access against a value that is neither an object, a
    /// vector, nor Undefined.
    FieldAccessOnNonObject { field: String, found: &'static str },
    /// `size` was read on something other than an object.
    SizeOnNonObject { found: &'static str },
    /// `size` was the target of a store.
    SizeIsReadOnly,
    /// A vector property name other than x/y/z/0/1/2.
    InvalidVectorProperty(String),
    /// Assigning a field on an object failed; wraps the underlying cause per
    /// the spec's required "failed setting field X to Y on object" context.
    FieldStoreFailed { field: String, value: String, source: Box<RuntimeError> },
    /// A function-pointer value was required but a different type was found.
    NotAFunctionPointer { found: &'static str },
    /// `CallFunction`/`CallFunctionFile`/`CallFunctionPointer` could not
    /// resolve a function by (file, name).
    FunctionNotFound { file: String, name: String },
    /// Tried to pop more values than are on the operand stack.
    StackUnderflow,
    /// `Test` was applied to a value that is not Integer or Undefined.
    InvalidTestOperand(&'static str),
    /// `notify`/`waittill`/`endon` referenced an object that is not an
    /// `ObjectPtr`.
    NotAnObject(&'static str),
    /// A host-function argument coercion (`get_int`/`get_float`/`get_string`/
    /// `get_vector`) or an opcode expecting a string (e.g. an event name)
    /// found a value of the wrong type.
    TypeMismatch { expected: &'static str, found: &'static str },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperator { op, lhs, rhs } => {
                write!(f, "invalid operator {op} for operands of type {lhs} and {rhs}")
            }
            Self::FieldAccessOnNonObject { field, found } => {
                write!(f, "cannot access field {field} on value of type {found}")
            }
            Self::SizeOnNonObject { found } => write!(f, "size is not defined on value of type {found}"),
            Self::SizeIsReadOnly => write!(f, "size is a read-only field"),
            Self::InvalidVectorProperty(name) => write!(f, "vector out of bounds: {name}"),
            Self::FieldStoreFailed { field, value, source } => {
                write!(f, "failed setting field {field} to {value} on object: {source}")
            }
            Self::NotAFunctionPointer { found } => write!(f, "expected a function pointer, found {found}"),
            Self::FunctionNotFound { file, name } => write!(f, "function not found: {file}::{name}"),
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::InvalidTestOperand(found) => write!(f, "cannot test value of type {found}"),
            Self::NotAnObject(found) => write!(f, "expected an object, found {found}"),
            Self::TypeMismatch { expected, found } => write!(f, "expected {expected}, found {found}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

pub(crate) fn type_name(value: &Variant) -> &'static str {
    match value {
        Variant::Undefined => "undefined",
        Variant::Integer(_) => "int",
        Variant::Number(_) => "float",
        Variant::String(_) => "string",
        Variant::Vector(_) => "vector",
        Variant::FunctionPointer { .. } => "function pointer",
        Variant::LocalizedString { .. } => "localized string",
        Variant::Animation(_) => "animation",
        Variant::Object(_) => "object",
    }
}
