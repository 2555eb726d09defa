//! Per-call state (`FunctionContext`) and the lvalue [`Reference`] type
//! (`SPEC_FULL.md` §3, §4.4). Grounded on `virtual_machine.h`'s
//! `FunctionContext` struct.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::bytecode::CompiledFunction;
use crate::error::RuntimeError;
use crate::object::Object;
use crate::value::{Variant, Vector3};

/// One active call. Variables are stored behind `Rc<RefCell<_>>` cells so a
/// [`Reference::Variable`] can alias the same storage the function context
/// itself holds.
pub struct FunctionContext {
    pub file: Rc<str>,
    pub function: Rc<str>,
    pub self_object: Option<Rc<RefCell<Object>>>,
    pub variables: AHashMap<String, Rc<RefCell<Variant>>>,
    pub instruction_index: usize,
    pub code: Rc<CompiledFunction>,
}

impl FunctionContext {
    #[must_use]
    pub fn new(code: Rc<CompiledFunction>, self_object: Option<Rc<RefCell<Object>>>) -> Self {
        Self {
            file: code.file.clone(),
            function: code.name.clone(),
            self_object,
            variables: AHashMap::new(),
            instruction_index: 0,
            code,
        }
    }

    /// Case-insensitive lookup that auto-creates an `Undefined` cell on miss,
    /// matching `FunctionContext::get_variable()` in `virtual_machine.h`.
    pub fn cell_for(&mut self, name: &str) -> Rc<RefCell<Variant>> {
        let key = name.to_ascii_lowercase();
        self.variables.entry(key).or_insert_with(|| Rc::new(RefCell::new(Variant::Undefined))).clone()
    }

    pub fn bind_param(&mut self, name: &str, value: Variant) {
        self.variables.insert(name.to_ascii_lowercase(), Rc::new(RefCell::new(value)));
    }
}

/// An lvalue: one of a named local variable, a field of an object, or an
/// indexed component of a vector stored either in a variable or a field.
pub enum Reference {
    Variable(Rc<RefCell<Variant>>),
    VectorComponentOfVariable { cell: Rc<RefCell<Variant>>, index: usize },
    ObjectField { object: Rc<RefCell<Object>>, field: String },
    VectorComponentOfField { object: Rc<RefCell<Object>>, field: String, index: usize },
}

impl Reference {
    #[must_use]
    pub fn load(&self) -> Variant {
        match self {
            Self::Variable(cell) => cell.borrow().clone(),
            Self::VectorComponentOfVariable { cell, index } => match &*cell.borrow() {
                Variant::Vector(v) => v.get(*index).map_or(Variant::Undefined, Variant::Number),
                _ => Variant::Undefined,
            },
            Self::ObjectField { object, field } => object.borrow().get_field(field),
            Self::VectorComponentOfField { object, field, index } => {
                match object.borrow().get_field(field) {
                    Variant::Vector(v) => v.get(*index).map_or(Variant::Undefined, Variant::Number),
                    _ => Variant::Undefined,
                }
            }
        }
    }

    pub fn store(&self, value: Variant) -> Result<(), RuntimeError> {
        match self {
            Self::Variable(cell) => {
                *cell.borrow_mut() = value;
                Ok(())
            }
            Self::VectorComponentOfVariable { cell, index } => {
                let mut borrow = cell.borrow_mut();
                let Variant::Vector(v) = &mut *borrow else {
                    return Err(RuntimeError::FieldAccessOnNonObject {
                        field: component_name(*index),
                        found: crate::error::type_name(&borrow),
                    });
                };
                let number = as_number(&value);
                if !v.set(*index, number) {
                    return Err(RuntimeError::InvalidVectorProperty(component_name(*index)));
                }
                Ok(())
            }
            Self::ObjectField { object, field } => {
                if field.eq_ignore_ascii_case("size") {
                    return Err(RuntimeError::SizeIsReadOnly);
                }
                object.borrow_mut().set_field(field, value);
                Ok(())
            }
            Self::VectorComponentOfField { object, field, index } => {
                let mut obj = object.borrow_mut();
                let mut current = match obj.get_field(field) {
                    Variant::Vector(v) => v,
                    Variant::Undefined => Vector3::new(0.0, 0.0, 0.0),
                    other => {
                        return Err(RuntimeError::FieldAccessOnNonObject {
                            field: field.clone(),
                            found: crate::error::type_name(&other),
                        })
                    }
                };
                current.set(*index, as_number(&value));
                obj.set_field(field, Variant::Vector(current));
                Ok(())
            }
        }
    }
}

impl Reference {
    /// Resolves `self.<property>` (or `self[property]`) as a new `Reference`,
    /// auto-boxing an `Undefined` receiver into a fresh object and writing it
    /// back through `self` so the original location observes the new object
    /// (`SPEC_FULL.md` §4.4, `DESIGN.md` Open Question 2).
    pub fn field_ref(&self, property: &str) -> Result<Reference, RuntimeError> {
        match self.load() {
            Variant::Object(object) => {
                if property.eq_ignore_ascii_case("size") {
                    return Err(RuntimeError::SizeIsReadOnly);
                }
                Ok(Reference::ObjectField { object, field: property.to_owned() })
            }
            Variant::Undefined => {
                let boxed = Rc::new(RefCell::new(Object::new()));
                self.store(Variant::Object(boxed.clone()))?;
                Ok(Reference::ObjectField { object: boxed, field: property.to_owned() })
            }
            Variant::Vector(_) => {
                let index = Vector3::index_for_property(property)
                    .ok_or_else(|| RuntimeError::InvalidVectorProperty(property.to_owned()))?;
                match self {
                    Self::Variable(cell) => {
                        Ok(Reference::VectorComponentOfVariable { cell: cell.clone(), index })
                    }
                    Self::ObjectField { object, field } => Ok(Reference::VectorComponentOfField {
                        object: object.clone(),
                        field: field.clone(),
                        index,
                    }),
                    Self::VectorComponentOfVariable { .. } | Self::VectorComponentOfField { .. } => {
                        Err(RuntimeError::FieldAccessOnNonObject { field: property.to_owned(), found: "float" })
                    }
                }
            }
            other => Err(RuntimeError::FieldAccessOnNonObject {
                field: property.to_owned(),
                found: crate::error::type_name(&other),
            }),
        }
    }
}

fn as_number(value: &Variant) -> f32 {
    match value {
        Variant::Integer(i) => *i as f32,
        Variant::Number(n) => *n,
        _ => 0.0,
    }
}

fn component_name(index: usize) -> String {
    match index {
        0 => "x".to_owned(),
        1 => "y".to_owned(),
        _ => "z".to_owned(),
    }
}
