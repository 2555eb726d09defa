//! Virtual machine core: fetch/execute loop, the cooperative tick boundary,
//! and the two well-known objects `level`/`game` (`SPEC_FULL.md` §4.5).
//! Grounded on `virtual_machine.h`'s `VirtualMachine` class.

pub mod binary;
pub mod call;
pub mod frame;
pub mod host;
pub mod scheduler;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::bytecode::{FunctionTable, Opcode};
use crate::error::{type_name, RuntimeError};
use crate::object::Object;
use crate::value::Variant;

use call::Intrinsic;
use frame::Reference;
use host::{HostFunctions, HostReturn, VMContext};
use scheduler::{Scheduler, ThreadId};

/// One instruction's outcome, for the thread-level run loop in [`VM::run_thread`].
struct Step {
    /// The thread must stop being scheduled for the rest of this tick (it
    /// installed a lock, finished, or was deleted).
    stop: bool,
}

/// The virtual machine. Owns the compiled function table, an optional host
/// bridge, the cooperative scheduler, and the two long-lived well-known
/// objects.
pub struct VM {
    functions: FunctionTable,
    host: Option<Box<dyn HostFunctions>>,
    scheduler: Scheduler,
    level: Rc<RefCell<Object>>,
    game: Rc<RefCell<Object>>,
}

impl VM {
    #[must_use]
    pub fn new(functions: FunctionTable) -> Self {
        Self {
            functions,
            host: None,
            scheduler: Scheduler::new(),
            level: Rc::new(RefCell::new(Object::new())),
            game: Rc::new(RefCell::new(Object::new())),
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: Box<dyn HostFunctions>) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn level(&self) -> Rc<RefCell<Object>> {
        self.level.clone()
    }

    #[must_use]
    pub fn game(&self) -> Rc<RefCell<Object>> {
        self.game.clone()
    }

    pub fn advance_frame(&mut self) {
        self.scheduler.advance_frame();
    }

    /// Spawns a top-level thread. Like any spawned thread it is staged and
    /// only promoted into the active set at the next tick boundary.
    pub fn spawn_thread(
        &mut self,
        file: &str,
        name: &str,
        args: Vec<Variant>,
    ) -> Result<ThreadId, RuntimeError> {
        let function = call::resolve_function(&self.functions, file, Some(file), name)?;
        let frame = call::bind_call_arguments(&function, args, None);
        Ok(self.scheduler.spawn(frame))
    }

    /// Runs ticks until the named thread finishes, returning its return
    /// value (`Undefined` if it returned nothing). Intended for tests and
    /// simple embeddings; a real host drives [`Self::tick`] on its own
    /// schedule (once per game frame) instead.
    pub fn run_to_completion(&mut self, thread: ThreadId) -> Result<Option<Variant>, RuntimeError> {
        while self.scheduler.is_alive(thread) {
            self.tick()?;
            if let Some(result) = self.scheduler.take_result(thread) {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }

    /// Runs exactly one tick: promotes staged threads, then runs every
    /// eligible thread until it suspends or finishes.
    pub fn tick(&mut self) -> Result<(), RuntimeError> {
        let now = Instant::now();
        let eligible = self.scheduler.begin_tick(now);
        for id in eligible {
            self.run_thread(id)?;
        }
        Ok(())
    }

    fn run_thread(&mut self, id: ThreadId) -> Result<(), RuntimeError> {
        loop {
            match self.scheduler.thread_mut(id) {
                Some(thread) if thread.marked_for_deletion => break,
                Some(_) => {}
                None => break,
            }
            let step = self.fetch_and_execute(id)?;
            if step.stop {
                break;
            }
        }
        Ok(())
    }

    fn fetch_and_execute(&mut self, id: ThreadId) -> Result<Step, RuntimeError> {
        let opcode = {
            let thread = self.scheduler.thread_mut(id).expect("thread exists while running");
            let frame = thread.call_stack.last_mut().expect("a thread always has a frame");
            let ip = frame.instruction_index;
            match frame.code.instructions.get(ip).cloned() {
                Some(opcode) => {
                    frame.instruction_index += 1;
                    opcode
                }
                None => {
                    thread.call_stack.pop();
                    if thread.call_stack.is_empty() {
                        thread.result = Some(Variant::Undefined);
                        thread.marked_for_deletion = true;
                    }
                    return Ok(Step { stop: true });
                }
            }
        };
        self.execute_opcode(id, opcode)
    }

    fn pop(&mut self, id: ThreadId) -> Result<Variant, RuntimeError> {
        self.scheduler.thread_mut(id).and_then(|t| t.operand_stack.pop()).ok_or(RuntimeError::StackUnderflow)
    }

    fn push(&mut self, id: ThreadId, value: Variant) {
        if let Some(thread) = self.scheduler.thread_mut(id) {
            thread.operand_stack.push(value);
        }
    }

    fn pop_ref(&mut self, id: ThreadId) -> Result<Reference, RuntimeError> {
        self.scheduler.thread_mut(id).and_then(|t| t.ref_stack.pop()).ok_or(RuntimeError::StackUnderflow)
    }

    fn push_ref(&mut self, id: ThreadId, reference: Reference) {
        if let Some(thread) = self.scheduler.thread_mut(id) {
            thread.ref_stack.push(reference);
        }
    }

    fn pop_string(&mut self, id: ThreadId) -> Result<String, RuntimeError> {
        match self.pop(id)? {
            Variant::String(s) => Ok(s.to_string()),
            other => Err(RuntimeError::TypeMismatch { expected: "string", found: type_name(&other) }),
        }
    }

    fn pop_object(&mut self, id: ThreadId) -> Result<Rc<RefCell<Object>>, RuntimeError> {
        match self.pop(id)? {
            Variant::Object(object) => Ok(object),
            other => Err(RuntimeError::NotAnObject(type_name(&other))),
        }
    }

    fn current_file(&mut self, id: ThreadId) -> Rc<str> {
        self.scheduler.thread_mut(id).and_then(|t| t.call_stack.last()).map_or_else(|| Rc::from(""), |f| f.file.clone())
    }

    fn current_self_object(&mut self, id: ThreadId) -> Option<Rc<RefCell<Object>>> {
        self.scheduler.thread_mut(id).and_then(|t| t.call_stack.last()).and_then(|f| f.self_object.clone())
    }

    #[allow(clippy::too_many_lines)]
    fn execute_opcode(&mut self, id: ThreadId, opcode: Opcode) -> Result<Step, RuntimeError> {
        match opcode {
            Opcode::PushInteger(value) => {
                self.push(id, Variant::Integer(value));
            }
            Opcode::PushNumber(value) => {
                self.push(id, Variant::Number(value));
            }
            Opcode::PushString(value) => {
                self.push(id, Variant::String(value));
            }
            Opcode::PushAnimationString(value) => {
                self.push(id, Variant::Animation(value));
            }
            Opcode::PushLocalizedString(reference) => {
                self.push(id, Variant::LocalizedString { reference });
            }
            Opcode::PushFunctionPointer { file, name } => {
                let file = file.unwrap_or_else(|| self.current_file(id));
                self.push(id, Variant::FunctionPointer { file, name });
            }
            Opcode::PushUndefined => {
                self.push(id, Variant::Undefined);
            }
            Opcode::PushVector => {
                // popped top-to-bottom is z, y, x (DESIGN.md Open Question 3).
                let z = as_number(&self.pop(id)?);
                let y = as_number(&self.pop(id)?);
                let x = as_number(&self.pop(id)?);
                self.push(id, Variant::Vector(crate::value::Vector3::new(x, y, z)));
            }
            Opcode::PushArray => {
                self.push(id, Variant::Object(Rc::new(RefCell::new(Object::new()))));
            }
            Opcode::Pop => {
                self.pop(id)?;
            }
            Opcode::LoadValue(name) => {
                let value = {
                    let thread = self.scheduler.thread_mut(id).expect("thread exists");
                    let frame = thread.call_stack.last_mut().expect("frame exists");
                    frame.cell_for(&name).borrow().clone()
                };
                self.push(id, value);
            }
            Opcode::LoadRef(name) => {
                let cell = {
                    let thread = self.scheduler.thread_mut(id).expect("thread exists");
                    let frame = thread.call_stack.last_mut().expect("frame exists");
                    frame.cell_for(&name)
                };
                self.push_ref(id, Reference::Variable(cell));
            }
            Opcode::LoadObjectFieldValue => {
                // property on top, receiver below (our own convention; the
                // compiler that would fix this is out of scope).
                let property = self.pop_string(id)?;
                let receiver = self.pop(id)?;
                let value = load_field_value(&receiver, &property)?;
                self.push(id, value);
            }
            Opcode::LoadObjectFieldRef => {
                let property = self.pop_string(id)?;
                let base = self.pop_ref(id)?;
                let reference = base.field_ref(&property)?;
                self.push_ref(id, reference);
            }
            Opcode::StoreRef => {
                let reference = self.pop_ref(id)?;
                let value = self.pop(id)?;
                if let Err(source) = reference.store(value.clone()) {
                    if matches!(reference, Reference::ObjectField { .. } | Reference::VectorComponentOfField { .. })
                    {
                        return Err(RuntimeError::FieldStoreFailed {
                            field: field_name_of(&reference),
                            value: display_value(&value),
                            source: Box::new(source),
                        });
                    }
                    return Err(source);
                }
            }
            Opcode::BinOp(op) => {
                // right was pushed first, left second, so left is on top.
                let left = self.pop(id)?;
                let right = self.pop(id)?;
                let result = binary::binop(op, &left, &right)?;
                self.push(id, result);
            }
            Opcode::Unary(op) => {
                let operand = self.pop(id)?;
                self.push(id, apply_unary(op, &operand)?);
            }
            Opcode::Test => {
                let operand = self.pop(id)?;
                let zero = match operand {
                    Variant::Integer(0) | Variant::Undefined => true,
                    Variant::Integer(_) => false,
                    other => return Err(RuntimeError::InvalidTestOperand(type_name(&other))),
                };
                if let Some(thread) = self.scheduler.thread_mut(id) {
                    thread.zero_flag = zero;
                }
            }
            Opcode::Jump(label) => self.jump_to_label(id, label, JumpKind::Always),
            Opcode::JumpZero(label) => self.jump_to_label(id, label, JumpKind::IfZero),
            Opcode::JumpNotZero(label) => self.jump_to_label(id, label, JumpKind::IfNotZero),
            Opcode::Label(_) => {}
            Opcode::Constant0 => self.push(id, Variant::Integer(0)),
            Opcode::Constant1 => self.push(id, Variant::Integer(1)),
            Opcode::CallFunction { name, num_args, has_object, threaded } => {
                return self.do_call(id, None, &name, num_args, has_object, threaded);
            }
            Opcode::CallFunctionFile { file, name, num_args, has_object, threaded } => {
                return self.do_call(id, Some(file), &name, num_args, has_object, threaded);
            }
            Opcode::CallFunctionPointer { num_args, has_object, threaded } => {
                // args, then receiver (if any), then the function pointer value.
                let saved_args = self.collect_args(id, num_args)?;
                let self_object = if has_object { Some(self.pop_object(id)?) } else { self.current_self_object(id) };
                let fp = self.pop(id)?;
                let Variant::FunctionPointer { file, name } = fp else {
                    return Err(RuntimeError::NotAFunctionPointer { found: type_name(&fp) });
                };
                return self.invoke(id, &file, &name, saved_args, self_object, threaded);
            }
            Opcode::Ret(has_value) => {
                let value = if has_value { self.pop(id)? } else { Variant::Undefined };
                let thread = self.scheduler.thread_mut(id).expect("thread exists");
                thread.call_stack.pop();
                if thread.call_stack.is_empty() {
                    thread.result = Some(value);
                    thread.marked_for_deletion = true;
                    return Ok(Step { stop: true });
                }
                thread.operand_stack.push(value);
            }
            Opcode::Wait => {
                let seconds = as_number(&self.pop(id)?);
                if let Some(thread) = self.scheduler.thread_mut(id) {
                    thread.install_duration_lock(Instant::now() + Duration::from_secs_f32(seconds.max(0.0)));
                }
                return Ok(Step { stop: true });
            }
            Opcode::WaitTillFrameEnd => {
                let frame = self.scheduler.current_frame();
                if let Some(thread) = self.scheduler.thread_mut(id) {
                    thread.install_frame_end_lock(frame);
                }
                return Ok(Step { stop: true });
            }
            Opcode::WaitTill { num_params, has_object } => {
                // pop order matches instructions.cpp: receiver (if any), then
                // event name, then param names; param names are then
                // reversed into source order.
                let object = if has_object { Some(self.pop_object(id)?) } else { self.current_self_object(id) };
                let Some(object) = object else {
                    return Err(RuntimeError::NotAnObject("undefined"));
                };
                let event = self.pop_string(id)?;
                let mut params = Vec::with_capacity(num_params as usize);
                for _ in 0..num_params {
                    params.push(Rc::from(self.pop_string(id)?.as_str()));
                }
                params.reverse();
                if let Some(thread) = self.scheduler.thread_mut(id) {
                    thread.install_event_lock(&object, event, params);
                }
                return Ok(Step { stop: true });
            }
        }
        Ok(Step { stop: false })
    }

    fn collect_args(&mut self, id: ThreadId, num_args: u8) -> Result<Vec<Variant>, RuntimeError> {
        let mut args = Vec::with_capacity(num_args as usize);
        for _ in 0..num_args {
            args.push(self.pop(id)?);
        }
        args.reverse();
        Ok(args)
    }

    fn do_call(
        &mut self,
        id: ThreadId,
        file: Option<Rc<str>>,
        name: &str,
        num_args: u8,
        has_object: bool,
        threaded: bool,
    ) -> Result<Step, RuntimeError> {
        if has_object && file.is_none() {
            if let Some(kind) = call::intrinsic_for(name) {
                return self.do_intrinsic(id, kind, num_args);
            }
        }
        let args = self.collect_args(id, num_args)?;
        let self_object = if has_object { Some(self.pop_object(id)?) } else { self.current_self_object(id) };
        let file = file.unwrap_or_else(|| self.current_file(id));
        self.invoke(id, &file, name, args, self_object, threaded)
    }

    fn do_intrinsic(&mut self, id: ThreadId, kind: Intrinsic, num_args: u8) -> Result<Step, RuntimeError> {
        let args = self.collect_args(id, num_args)?;
        let object = self.pop_object(id)?;
        match kind {
            Intrinsic::Notify => {
                let mut iter = args.into_iter();
                let event = match iter.next() {
                    Some(Variant::String(s)) => s.to_string(),
                    other => return Err(RuntimeError::NotAFunctionPointer { found: other.map_or("undefined", |v| type_name(&v)) }),
                };
                let payload: Vec<Variant> = iter.collect();
                self.scheduler.notify(&object, &event, payload);
                self.push(id, Variant::Undefined);
                Ok(Step { stop: false })
            }
            Intrinsic::WaitTill => {
                let mut iter = args.into_iter();
                let event = match iter.next() {
                    Some(Variant::String(s)) => s.to_string(),
                    other => return Err(RuntimeError::NotAFunctionPointer { found: other.map_or("undefined", |v| type_name(&v)) }),
                };
                let params: Vec<Rc<str>> = iter
                    .map(|v| match v {
                        Variant::String(s) => Rc::from(s.as_ref()),
                        _ => Rc::from(""),
                    })
                    .collect();
                if let Some(thread) = self.scheduler.thread_mut(id) {
                    thread.install_event_lock(&object, event, params);
                }
                Ok(Step { stop: true })
            }
            Intrinsic::Endon => {
                let event = match args.into_iter().next() {
                    Some(Variant::String(s)) => s.to_string(),
                    other => return Err(RuntimeError::NotAFunctionPointer { found: other.map_or("undefined", |v| type_name(&v)) }),
                };
                if let Some(thread) = self.scheduler.thread_mut(id) {
                    thread.install_endon(object, event);
                }
                self.push(id, Variant::Undefined);
                Ok(Step { stop: false })
            }
        }
    }

    fn invoke(
        &mut self,
        id: ThreadId,
        file: &str,
        name: &str,
        args: Vec<Variant>,
        self_object: Option<Rc<RefCell<Object>>>,
        threaded: bool,
    ) -> Result<Step, RuntimeError> {
        match call::resolve_function(&self.functions, file, Some(file), name) {
            Ok(function) => {
                let new_frame = call::bind_call_arguments(&function, args, self_object);
                if threaded {
                    // thread handle: a plain integer id (DESIGN.md Open Question 9).
                    let new_id = self.scheduler.spawn(new_frame);
                    self.push(id, Variant::Integer(new_id.raw() as i32));
                } else if let Some(thread) = self.scheduler.thread_mut(id) {
                    thread.call_stack.push(new_frame);
                }
                Ok(Step { stop: false })
            }
            Err(not_found) => {
                let Some(host) = self.host.as_mut() else {
                    return Err(not_found);
                };
                // VMContext indexes most-recent-first; `args` is left-to-right.
                let mut reversed = args;
                reversed.reverse();
                let mut ctx = VMContext::new(&reversed, self_object);
                match host.call(name, &mut ctx) {
                    Ok(HostReturn::Value(value)) => {
                        self.push(id, value);
                        Ok(Step { stop: false })
                    }
                    Ok(HostReturn::None) => {
                        self.push(id, Variant::Undefined);
                        Ok(Step { stop: false })
                    }
                    Err(error) => Err(error),
                }
            }
        }
    }

    fn jump_to_label(&mut self, id: ThreadId, label: crate::bytecode::LabelId, kind: JumpKind) {
        let Some(thread) = self.scheduler.thread_mut(id) else { return };
        let take = match kind {
            JumpKind::Always => true,
            JumpKind::IfZero => thread.zero_flag,
            JumpKind::IfNotZero => !thread.zero_flag,
        };
        if !take {
            return;
        }
        let Some(frame) = thread.call_stack.last_mut() else { return };
        // A missing label is a weak/expired jump target: no-op instead of an
        // error (DESIGN.md Open Question 4).
        if let Some(&target) = frame.code.labels.get(&label) {
            frame.instruction_index = target;
        }
    }
}

enum JumpKind {
    Always,
    IfZero,
    IfNotZero,
}

fn as_number(value: &Variant) -> f32 {
    match value {
        Variant::Integer(i) => *i as f32,
        Variant::Number(n) => *n,
        _ => 0.0,
    }
}

fn load_field_value(receiver: &Variant, property: &str) -> Result<Variant, RuntimeError> {
    match receiver {
        Variant::Vector(v) => {
            let index = crate::value::Vector3::index_for_property(property)
                .ok_or_else(|| RuntimeError::InvalidVectorProperty(property.to_owned()))?;
            Ok(v.get(index).map_or(Variant::Undefined, Variant::Number))
        }
        Variant::Object(object) => {
            if property.eq_ignore_ascii_case("size") {
                Ok(Variant::Integer(object.borrow().field_count() as i32))
            } else {
                Ok(object.borrow().get_field(property))
            }
        }
        Variant::Undefined => Ok(Variant::Undefined),
        other => Err(RuntimeError::FieldAccessOnNonObject { field: property.to_owned(), found: type_name(other) }),
    }
}

fn apply_unary(op: crate::bytecode::UnaryOp, operand: &Variant) -> Result<Variant, RuntimeError> {
    use crate::bytecode::UnaryOp;
    match op {
        UnaryOp::BitwiseNot => match operand {
            Variant::Integer(i) => Ok(Variant::Integer(!i)),
            Variant::Number(n) => Ok(Variant::Integer(!(*n as i32))),
            other => Err(RuntimeError::InvalidOperator { op: "~", lhs: type_name(other), rhs: type_name(other) }),
        },
        UnaryOp::Negate => match operand {
            Variant::Integer(i) => Ok(Variant::Integer(-i)),
            Variant::Number(n) => Ok(Variant::Number(-n)),
            other => Err(RuntimeError::InvalidOperator { op: "-", lhs: type_name(other), rhs: type_name(other) }),
        },
        UnaryOp::LogicalNot => {
            let truthy = match operand {
                Variant::Undefined => false,
                Variant::Integer(i) => *i != 0,
                Variant::Number(n) => *n != 0.0,
                Variant::String(s) => !s.is_empty(),
                _ => true,
            };
            Ok(Variant::Integer(i32::from(!truthy)))
        }
    }
}

fn field_name_of(reference: &Reference) -> String {
    match reference {
        Reference::ObjectField { field, .. } | Reference::VectorComponentOfField { field, .. } => field.clone(),
        _ => String::new(),
    }
}

fn display_value(value: &Variant) -> String {
    match value {
        Variant::String(s) => s.to_string(),
        Variant::Integer(i) => i.to_string(),
        Variant::Number(n) => n.to_string(),
        Variant::Undefined => "undefined".to_owned(),
        other => type_name(other).to_owned(),
    }
}
