//! Compiled-function storage and the operand enums used by [`super::op::Opcode::BinOp`]
//! and [`super::op::Opcode::Unary`].

use std::rc::Rc;

use ahash::AHashMap;

use super::op::Opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    BitwiseNot,
    LogicalNot,
    Negate,
}

/// A single function's linear instruction stream plus its label table.
///
/// A label id absent from `labels` is a weak/expired jump target: the VM
/// treats a jump to it as a no-op (`SPEC_FULL.md` §9, `DESIGN.md` Open
/// Question 4) rather than erroring.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    pub file: Rc<str>,
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub instructions: Vec<Opcode>,
    pub labels: AHashMap<LabelId, usize>,
}

/// Normalizes a file key the way `instructions.cpp`'s call opcodes normalize
/// backslashes to forward slashes before lookup.
#[must_use]
pub fn normalize_file(file: &str) -> String {
    file.replace('\\', "/").to_ascii_lowercase()
}

/// Maps `(file, function name)` to compiled functions, plus a global
/// cross-file fallback registry for symbols that would otherwise be
/// invisible due to include-once semantics (`SPEC_FULL.md` §4.3).
#[derive(Debug, Default)]
pub struct FunctionTable {
    by_file: AHashMap<(String, String), Rc<CompiledFunction>>,
    global_fallback: AHashMap<String, Rc<CompiledFunction>>,
}

impl FunctionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: &str, name: &str, function: CompiledFunction) {
        let key_name = name.to_ascii_lowercase();
        let rc = Rc::new(function);
        self.global_fallback.entry(key_name.clone()).or_insert_with(|| rc.clone());
        self.by_file.insert((normalize_file(file), key_name), rc);
    }

    #[must_use]
    pub fn get(&self, file: &str, name: &str) -> Option<Rc<CompiledFunction>> {
        let key_name = name.to_ascii_lowercase();
        self.by_file
            .get(&(normalize_file(file), key_name.clone()))
            .or_else(|| self.global_fallback.get(&key_name))
            .cloned()
    }
}
