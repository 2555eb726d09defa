//! `BinOp` type-dispatch (`SPEC_FULL.md` §4.4), grounded on
//! `virtual_machine.h`'s `handle_binary_op` template and its float/Vector/
//! string/generic specializations.

use crate::bytecode::BinaryOp;
use crate::error::{type_name, RuntimeError};
use crate::value::{Variant, Vector3};

fn op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

fn invalid(op: BinaryOp, lhs: &Variant, rhs: &Variant) -> RuntimeError {
    RuntimeError::InvalidOperator { op: op_name(op), lhs: type_name(lhs), rhs: type_name(rhs) }
}

/// Computes `left OP right`. See `DESIGN.md` Open Question 1 for the operand
/// naming convention.
pub fn binop(op: BinaryOp, left: &Variant, right: &Variant) -> Result<Variant, RuntimeError> {
    if matches!(left, Variant::String(_)) || matches!(right, Variant::String(_)) {
        return string_op(op, left, right);
    }
    if let (Variant::Vector(a), Variant::Vector(b)) = (left, right) {
        return vector_op(op, *a, *b);
    }
    if matches!(left, Variant::Vector(_)) || matches!(right, Variant::Vector(_)) {
        return Err(invalid(op, left, right));
    }
    if is_float(left) || is_float(right) {
        return float_op(op, as_f32(left), as_f32(right), left, right);
    }
    integer_op(op, as_i32(left), as_i32(right), left, right)
}

fn is_float(value: &Variant) -> bool {
    matches!(value, Variant::Number(_))
}

fn as_f32(value: &Variant) -> f32 {
    match value {
        Variant::Number(n) => *n,
        Variant::Integer(i) => *i as f32,
        _ => 0.0,
    }
}

fn as_i32(value: &Variant) -> i32 {
    match value {
        Variant::Integer(i) => *i,
        Variant::Number(n) => *n as i32,
        _ => 0,
    }
}

fn string_op(op: BinaryOp, left: &Variant, right: &Variant) -> Result<Variant, RuntimeError> {
    match op {
        BinaryOp::Add => Ok(Variant::String(format!("{}{}", display(left), display(right)).into())),
        BinaryOp::Eq => Ok(bool_to_int(display(left) == display(right))),
        BinaryOp::Ne => Ok(bool_to_int(display(left) != display(right))),
        _ => Err(invalid(op, left, right)),
    }
}

fn display(value: &Variant) -> String {
    match value {
        Variant::String(s) => s.to_string(),
        Variant::Integer(i) => i.to_string(),
        Variant::Number(n) => n.to_string(),
        Variant::Undefined => String::new(),
        other => type_name(other).to_owned(),
    }
}

fn vector_op(op: BinaryOp, a: Vector3, b: Vector3) -> Result<Variant, RuntimeError> {
    let result = match op {
        BinaryOp::Add => Vector3::new(a.x + b.x, a.y + b.y, a.z + b.z),
        BinaryOp::Sub => Vector3::new(a.x - b.x, a.y - b.y, a.z - b.z),
        BinaryOp::Mul => Vector3::new(a.x * b.x, a.y * b.y, a.z * b.z),
        BinaryOp::Div => Vector3::new(a.x / b.x, a.y / b.y, a.z / b.z),
        _ => {
            return Err(invalid(op, &Variant::Vector(a), &Variant::Vector(b)));
        }
    };
    Ok(Variant::Vector(result))
}

fn float_op(op: BinaryOp, a: f32, b: f32, left: &Variant, right: &Variant) -> Result<Variant, RuntimeError> {
    let result = match op {
        BinaryOp::Add => Variant::Number(a + b),
        BinaryOp::Sub => Variant::Number(a - b),
        BinaryOp::Mul => Variant::Number(a * b),
        BinaryOp::Div => Variant::Number(a / b),
        BinaryOp::Mod => Variant::Number(a % b),
        BinaryOp::Eq => bool_to_int(a == b),
        BinaryOp::Ne => bool_to_int(a != b),
        BinaryOp::Gt => bool_to_int(a > b),
        BinaryOp::Ge => bool_to_int(a >= b),
        BinaryOp::Lt => bool_to_int(a < b),
        BinaryOp::Le => bool_to_int(a <= b),
        _ => return Err(invalid(op, left, right)),
    };
    Ok(result)
}

fn integer_op(op: BinaryOp, a: i32, b: i32, left: &Variant, right: &Variant) -> Result<Variant, RuntimeError> {
    let result = match op {
        BinaryOp::Add => Variant::Integer(a.wrapping_add(b)),
        BinaryOp::Sub => Variant::Integer(a.wrapping_sub(b)),
        BinaryOp::Mul => Variant::Integer(a.wrapping_mul(b)),
        BinaryOp::Div => Variant::Integer(a.checked_div(b).unwrap_or(0)),
        BinaryOp::Mod => Variant::Integer(a.checked_rem(b).unwrap_or(0)),
        BinaryOp::BitAnd => Variant::Integer(a & b),
        BinaryOp::BitOr => Variant::Integer(a | b),
        BinaryOp::BitXor => Variant::Integer(a ^ b),
        BinaryOp::Shl => Variant::Integer(a.wrapping_shl(b as u32)),
        BinaryOp::Shr => Variant::Integer(a.wrapping_shr(b as u32)),
        BinaryOp::Eq => bool_to_int(a == b),
        BinaryOp::Ne => bool_to_int(a != b),
        BinaryOp::Gt => bool_to_int(a > b),
        BinaryOp::Ge => bool_to_int(a >= b),
        BinaryOp::Lt => bool_to_int(a < b),
        BinaryOp::Le => bool_to_int(a <= b),
        BinaryOp::And => bool_to_int(a != 0 && b != 0),
        BinaryOp::Or => bool_to_int(a != 0 || b != 0),
    };
    let _ = (left, right);
    Ok(result)
}

fn bool_to_int(value: bool) -> Variant {
    Variant::Integer(i32::from(value))
}
