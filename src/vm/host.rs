//! Host function registry and the `VMContext` argument/return marshalling
//! surface (`SPEC_FULL.md` §6), grounded on `virtual_machine.h`'s `VMContext`
//! abstract interface and `StockFunction` signature.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{type_name, RuntimeError};
use crate::object::Object;
use crate::value::{Variant, Vector3};

/// A host-registered callable. Implementors typically dispatch on `name`
/// internally rather than registering one object per function.
pub trait HostFunctions {
    fn call(&mut self, name: &str, ctx: &mut VMContext<'_>) -> Result<HostReturn, RuntimeError>;
}

pub enum HostReturn {
    None,
    Value(Variant),
}

/// Arguments in most-recent-first order (index 0 is the top of the operand
/// stack at call time) plus the bound receiver, if this was a method call.
pub struct VMContext<'a> {
    args: &'a [Variant],
    self_object: Option<Rc<RefCell<Object>>>,
}

impl<'a> VMContext<'a> {
    #[must_use]
    pub fn new(args: &'a [Variant], self_object: Option<Rc<RefCell<Object>>>) -> Self {
        Self { args, self_object }
    }

    #[must_use]
    pub fn self_object(&self) -> Option<Rc<RefCell<Object>>> {
        self.self_object.clone()
    }

    #[must_use]
    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn get_variant(&self, index: usize) -> Variant {
        self.args.get(index).cloned().unwrap_or(Variant::Undefined)
    }

    pub fn get_int(&self, index: usize) -> Result<i32, RuntimeError> {
        match self.get_variant(index) {
            Variant::Integer(i) => Ok(i),
            Variant::Number(n) => Ok(n as i32),
            other => Err(RuntimeError::TypeMismatch { expected: "int", found: type_name(&other) }),
        }
    }

    pub fn get_float(&self, index: usize) -> Result<f32, RuntimeError> {
        match self.get_variant(index) {
            Variant::Number(n) => Ok(n),
            Variant::Integer(i) => Ok(i as f32),
            other => Err(RuntimeError::TypeMismatch { expected: "float", found: type_name(&other) }),
        }
    }

    pub fn get_string(&self, index: usize) -> Result<String, RuntimeError> {
        match self.get_variant(index) {
            Variant::String(s) => Ok(s.to_string()),
            other => Err(RuntimeError::TypeMismatch { expected: "string", found: type_name(&other) }),
        }
    }

    pub fn get_vector(&self, index: usize) -> Result<Vector3, RuntimeError> {
        match self.get_variant(index) {
            Variant::Vector(v) => Ok(v),
            other => Err(RuntimeError::TypeMismatch { expected: "vector", found: type_name(&other) }),
        }
    }

    pub fn get_object(&self, index: usize) -> Result<Rc<RefCell<Object>>, RuntimeError> {
        match self.get_variant(index) {
            Variant::Object(obj) => Ok(obj),
            other => Err(RuntimeError::NotAnObject(type_name(&other))),
        }
    }
}
