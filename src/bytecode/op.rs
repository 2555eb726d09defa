//! The instruction set consumed by the VM (`SPEC_FULL.md` §4.2). Normally
//! emitted by an external AST→bytecode compiler; this crate only consumes it
//! and provides [`crate::bytecode::CodeBuilder`] as the assembly boundary.

use std::rc::Rc;

use super::code::{BinaryOp, LabelId, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    PushInteger(i32),
    PushNumber(f32),
    PushString(Rc<str>),
    PushAnimationString(Rc<str>),
    PushLocalizedString(Rc<str>),
    PushFunctionPointer { file: Option<Rc<str>>, name: Rc<str> },
    PushUndefined,
    /// Pops three values (pushed right-to-left: the first pop is z, the
    /// third is x) and pushes a `Vector`. See `DESIGN.md` Open Question 3.
    PushVector,
    /// Pushes a new empty object used as array backing storage.
    PushArray,
    Pop,

    LoadValue(Rc<str>),
    LoadRef(Rc<str>),
    /// Pops (object-or-vector-or-undefined, property-name) and pushes the
    /// field/component value.
    LoadObjectFieldValue,
    /// Pops (object-or-vector-or-undefined, property-name) and pushes an
    /// lvalue `Reference`, auto-boxing Undefined receivers in place.
    LoadObjectFieldRef,
    /// Pops (lvalue, value) and performs the assignment.
    StoreRef,

    /// Expects right pushed first, then left, so left is on top and is
    /// popped first; pushes `left OP right`. See `DESIGN.md` Open Question 1.
    BinOp(BinaryOp),
    Unary(UnaryOp),
    /// Sets the VM's zero flag if the popped operand is Integer 0 or
    /// Undefined; clears it otherwise.
    Test,

    Jump(LabelId),
    JumpZero(LabelId),
    JumpNotZero(LabelId),
    Label(LabelId),

    Constant0,
    Constant1,

    CallFunction { name: Rc<str>, num_args: u8, has_object: bool, threaded: bool },
    CallFunctionFile { file: Rc<str>, name: Rc<str>, num_args: u8, has_object: bool, threaded: bool },
    CallFunctionPointer { num_args: u8, has_object: bool, threaded: bool },
    /// `true` when a return value is on the stack to pop into the caller.
    Ret(bool),

    Wait,
    WaitTillFrameEnd,
    /// Pops (event-name, object-if-method, `num_params` parameter names) and
    /// installs an `EventLock`.
    WaitTill { num_params: u8, has_object: bool },
}
