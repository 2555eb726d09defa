//! Call protocol helpers (`SPEC_FULL.md` §4.3), grounded on
//! `instructions.cpp`'s `CallFunctionPointer`/`CallFunctionFile`/
//! `CallFunction::execute`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::bytecode::{normalize_file, CompiledFunction, FunctionTable};
use crate::error::RuntimeError;
use crate::object::Object;
use crate::value::Variant;
use crate::vm::frame::FunctionContext;

/// Resolves `(file, name)` against the per-file table, falling back to the
/// cross-file registry for symbols not visible by exact file match.
pub fn resolve_function(
    functions: &FunctionTable,
    caller_file: &str,
    explicit_file: Option<&str>,
    name: &str,
) -> Result<Rc<CompiledFunction>, RuntimeError> {
    let file = explicit_file.map_or_else(|| caller_file.to_owned(), normalize_file);
    functions
        .get(&file, name)
        .ok_or_else(|| RuntimeError::FunctionNotFound { file, name: name.to_owned() })
}

/// Builds the callee's `FunctionContext`, binding `args` (already reordered
/// into left-to-right order, the leftmost argument at index 0) to the
/// function's parameters positionally.
#[must_use]
pub fn bind_call_arguments(
    function: &Rc<CompiledFunction>,
    args: Vec<Variant>,
    self_object: Option<Rc<RefCell<Object>>>,
) -> FunctionContext {
    let mut frame = FunctionContext::new(function.clone(), self_object);
    for (param, value) in function.params.iter().zip(args) {
        frame.bind_param(param, value);
    }
    frame
}

/// The three intrinsic `self`-methods recognized before the host registry is
/// consulted (`SPEC_FULL.md` §4.5's "Built-in `self` methods").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    Notify,
    WaitTill,
    Endon,
}

#[must_use]
pub fn intrinsic_for(name: &str) -> Option<Intrinsic> {
    if name.eq_ignore_ascii_case("notify") {
        Some(Intrinsic::Notify)
    } else if name.eq_ignore_ascii_case("waittill") {
        Some(Intrinsic::WaitTill)
    } else if name.eq_ignore_ascii_case("endon") {
        Some(Intrinsic::Endon)
    } else {
        None
    }
}
