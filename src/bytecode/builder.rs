//! `CodeBuilder`: a small label-patching assembler over [`super::op::Opcode`],
//! adapted from `ouros::bytecode::builder::CodeBuilder`. It is the boundary
//! API an external AST→bytecode compiler would target; this crate's own VM
//! tests also use it directly to hand-assemble fixtures (`SPEC_FULL.md` §8).
//!
//! ```
//! use gsc::bytecode::{CodeBuilder, BinaryOp};
//!
//! let mut builder = CodeBuilder::new("test.gsc", "main");
//! builder.emit_push_integer(1);
//! builder.emit_push_integer(2);
//! builder.emit_binop(BinaryOp::Add);
//! builder.emit_ret(true);
//! let function = builder.build();
//! assert_eq!(function.instructions.len(), 4);
//! ```

use std::rc::Rc;

use ahash::AHashMap;

use super::code::{BinaryOp, CompiledFunction, LabelId, UnaryOp};
use super::op::Opcode;

pub struct CodeBuilder {
    file: Rc<str>,
    name: Rc<str>,
    params: Vec<Rc<str>>,
    instructions: Vec<Opcode>,
    labels: AHashMap<LabelId, usize>,
    next_label: u32,
}

impl CodeBuilder {
    #[must_use]
    pub fn new(file: &str, name: &str) -> Self {
        Self {
            file: Rc::from(file),
            name: Rc::from(name),
            params: Vec::new(),
            instructions: Vec::new(),
            labels: AHashMap::new(),
            next_label: 0,
        }
    }

    pub fn with_params(mut self, params: &[&str]) -> Self {
        self.params = params.iter().map(|p| Rc::from(*p)).collect();
        self
    }

    /// Allocates a fresh label id without binding it to any instruction
    /// position yet. A label never passed to [`Self::mark_label`] remains
    /// absent from the built function's label table, which is the weak/no-op
    /// jump target behavior the VM relies on.
    pub fn new_label(&mut self) -> LabelId {
        let id = LabelId(self.next_label);
        self.next_label += 1;
        id
    }

    /// Binds `label` to the instruction position that will be emitted next.
    pub fn mark_label(&mut self, label: LabelId) {
        self.labels.insert(label, self.instructions.len());
    }

    fn push(&mut self, op: Opcode) {
        self.instructions.push(op);
    }

    pub fn emit_push_integer(&mut self, value: i32) {
        self.push(Opcode::PushInteger(value));
    }

    pub fn emit_push_number(&mut self, value: f32) {
        self.push(Opcode::PushNumber(value));
    }

    pub fn emit_push_string(&mut self, value: &str) {
        self.push(Opcode::PushString(Rc::from(value)));
    }

    pub fn emit_push_animation_string(&mut self, value: &str) {
        self.push(Opcode::PushAnimationString(Rc::from(value)));
    }

    pub fn emit_push_localized_string(&mut self, reference: &str) {
        self.push(Opcode::PushLocalizedString(Rc::from(reference)));
    }

    pub fn emit_push_function_pointer(&mut self, file: Option<&str>, name: &str) {
        self.push(Opcode::PushFunctionPointer { file: file.map(Rc::from), name: Rc::from(name) });
    }

    pub fn emit_push_undefined(&mut self) {
        self.push(Opcode::PushUndefined);
    }

    /// Caller must have pushed z, then y, then x (so x is popped last /
    /// deepest); see `DESIGN.md` Open Question 3.
    pub fn emit_push_vector(&mut self) {
        self.push(Opcode::PushVector);
    }

    pub fn emit_push_array(&mut self) {
        self.push(Opcode::PushArray);
    }

    pub fn emit_pop(&mut self) {
        self.push(Opcode::Pop);
    }

    pub fn emit_load_value(&mut self, name: &str) {
        self.push(Opcode::LoadValue(Rc::from(name)));
    }

    pub fn emit_load_ref(&mut self, name: &str) {
        self.push(Opcode::LoadRef(Rc::from(name)));
    }

    pub fn emit_load_field_value(&mut self) {
        self.push(Opcode::LoadObjectFieldValue);
    }

    pub fn emit_load_field_ref(&mut self) {
        self.push(Opcode::LoadObjectFieldRef);
    }

    pub fn emit_store_ref(&mut self) {
        self.push(Opcode::StoreRef);
    }

    /// Caller must push the right operand first, then the left operand; see
    /// `DESIGN.md` Open Question 1.
    pub fn emit_binop(&mut self, op: BinaryOp) {
        self.push(Opcode::BinOp(op));
    }

    pub fn emit_unary(&mut self, op: UnaryOp) {
        self.push(Opcode::Unary(op));
    }

    pub fn emit_test(&mut self) {
        self.push(Opcode::Test);
    }

    pub fn emit_jump(&mut self, label: LabelId) {
        self.push(Opcode::Jump(label));
    }

    pub fn emit_jump_zero(&mut self, label: LabelId) {
        self.push(Opcode::JumpZero(label));
    }

    pub fn emit_jump_not_zero(&mut self, label: LabelId) {
        self.push(Opcode::JumpNotZero(label));
    }

    pub fn emit_constant0(&mut self) {
        self.push(Opcode::Constant0);
    }

    pub fn emit_constant1(&mut self) {
        self.push(Opcode::Constant1);
    }

    pub fn emit_call(&mut self, name: &str, num_args: u8, has_object: bool, threaded: bool) {
        self.push(Opcode::CallFunction { name: Rc::from(name), num_args, has_object, threaded });
    }

    pub fn emit_call_file(&mut self, file: &str, name: &str, num_args: u8, has_object: bool, threaded: bool) {
        self.push(Opcode::CallFunctionFile {
            file: Rc::from(file),
            name: Rc::from(name),
            num_args,
            has_object,
            threaded,
        });
    }

    pub fn emit_call_function_pointer(&mut self, num_args: u8, has_object: bool, threaded: bool) {
        self.push(Opcode::CallFunctionPointer { num_args, has_object, threaded });
    }

    pub fn emit_ret(&mut self, has_value: bool) {
        self.push(Opcode::Ret(has_value));
    }

    pub fn emit_wait(&mut self) {
        self.push(Opcode::Wait);
    }

    pub fn emit_wait_till_frame_end(&mut self) {
        self.push(Opcode::WaitTillFrameEnd);
    }

    pub fn emit_wait_till(&mut self, num_params: u8, has_object: bool) {
        self.push(Opcode::WaitTill { num_params, has_object });
    }

    #[must_use]
    pub fn build(self) -> CompiledFunction {
        CompiledFunction {
            file: self.file,
            name: self.name,
            params: self.params,
            instructions: self.instructions,
            labels: self.labels,
        }
    }
}
