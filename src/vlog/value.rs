// Copyright (c) 2016-2021 Fabian Schuiki

//! Four-valued scalars and constant values.
//!
//! [`Scalar`] is the {0, 1, X, Z} value domain of a single Verilog bit.
//! [`Value`] is the tagged union the constant folder operates on: it mirrors
//! the expression instantiation logic but carries plain values instead of
//! building expression nodes, and is used wherever the grammar mandates a
//! compile-time constant.
//!
//! All operations in this module are pure and total. Conditions that have no
//! defined result — division by zero, comparisons against `X` — produce `X`
//! values or [`Value::Error`], never a panic.

use crate::bitvec::BitVector;
use crate::ty::{self, ValueType};
use std::fmt;
use std::ops::Not;

/// A single four-state bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Zero,
    One,
    X,
    Z,
}

impl Scalar {
    /// Create a scalar from a boolean.
    pub fn from_bool(v: bool) -> Scalar {
        if v {
            Scalar::One
        } else {
            Scalar::Zero
        }
    }

    /// Create a scalar from an integer: nonzero becomes `1`.
    pub fn from_int(v: i32) -> Scalar {
        Scalar::from_bool(v != 0)
    }

    /// Create a scalar from a real: nonzero becomes `1`.
    pub fn from_real(v: f64) -> Scalar {
        Scalar::from_bool(v != 0.0)
    }

    pub fn is_zero(self) -> bool {
        self == Scalar::Zero
    }

    pub fn is_one(self) -> bool {
        self == Scalar::One
    }

    pub fn is_x(self) -> bool {
        self == Scalar::X
    }

    pub fn is_z(self) -> bool {
        self == Scalar::Z
    }

    /// Whether this is `X` or `Z`.
    pub fn is_xz(self) -> bool {
        self == Scalar::X || self == Scalar::Z
    }

    /// Convert to a boolean: `1` maps to true, everything else to false.
    pub fn to_bool(self) -> bool {
        self == Scalar::One
    }

    /// Collapse to a logic value: `Z` becomes `X`.
    pub fn to_logic(self) -> Scalar {
        match self {
            Scalar::Z => Scalar::X,
            v => v,
        }
    }

    /// Convert to an integer: `1` maps to 1, everything else to 0.
    pub fn to_int(self) -> i32 {
        if self == Scalar::One {
            1
        } else {
            0
        }
    }

    /// Convert to a real: `1` maps to 1.0, everything else to 0.0.
    pub fn to_real(self) -> f64 {
        if self == Scalar::One {
            1.0
        } else {
            0.0
        }
    }

    /// Four-state AND: `0` if either operand is `0`, `1` if both are `1`,
    /// `X` otherwise.
    pub fn and(a: Scalar, b: Scalar) -> Scalar {
        if a.is_zero() || b.is_zero() {
            Scalar::Zero
        } else if a.is_one() && b.is_one() {
            Scalar::One
        } else {
            Scalar::X
        }
    }

    /// Four-state OR: `1` if either operand is `1`, `0` if both are `0`,
    /// `X` otherwise.
    pub fn or(a: Scalar, b: Scalar) -> Scalar {
        if a.is_one() || b.is_one() {
            Scalar::One
        } else if a.is_zero() && b.is_zero() {
            Scalar::Zero
        } else {
            Scalar::X
        }
    }

    /// Four-state XOR.
    pub fn xor(a: Scalar, b: Scalar) -> Scalar {
        if a.is_xz() || b.is_xz() {
            Scalar::X
        } else {
            Scalar::from_bool(a != b)
        }
    }

    /// Four-state equality: `X` if either operand is `X`/`Z`, otherwise a
    /// bit equality test in which `Z` is a distinct state.
    pub fn eq(a: Scalar, b: Scalar) -> Scalar {
        if a.is_xz() || b.is_xz() {
            Scalar::X
        } else {
            Scalar::from_bool(a == b)
        }
    }

    /// Four-state inequality, the complement of [`Scalar::eq`].
    pub fn neq(a: Scalar, b: Scalar) -> Scalar {
        !Scalar::eq(a, b)
    }
}

impl Not for Scalar {
    type Output = Scalar;

    fn not(self) -> Scalar {
        match self {
            Scalar::Zero => Scalar::One,
            Scalar::One => Scalar::Zero,
            Scalar::X | Scalar::Z => Scalar::X,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Scalar::Zero => write!(f, "0"),
            Scalar::One => write!(f, "1"),
            Scalar::X => write!(f, "X"),
            Scalar::Z => write!(f, "Z"),
        }
    }
}

/// A constant value.
///
/// The distinction between `Int` and `Uint` mirrors the source forms the
/// folder encounters: genvar references and `integer` arithmetic stay `Int`,
/// index computations stay `Uint`, and everything vector-shaped lives in a
/// [`BitVector`]. `Error` absorbs failed computations; all operations on it
/// yield `Error` again, so a single diagnostic suffices.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Uint(u32),
    Scalar(Scalar),
    Real(f64),
    Time(u64),
    BitVec(BitVector),
    Error,
}

impl Value {
    pub fn is_error(&self) -> bool {
        matches!(*self, Value::Error)
    }

    pub fn is_int(&self) -> bool {
        matches!(*self, Value::Int(_))
    }

    pub fn is_uint(&self) -> bool {
        matches!(*self, Value::Uint(_))
    }

    pub fn is_real(&self) -> bool {
        matches!(*self, Value::Real(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(*self, Value::Scalar(_))
    }

    pub fn is_time(&self) -> bool {
        matches!(*self, Value::Time(_))
    }

    pub fn is_bitvector(&self) -> bool {
        matches!(*self, Value::BitVec(_))
    }

    /// Whether the value can be converted to an `i32`.
    pub fn is_int_conv(&self) -> bool {
        self.int_value().is_some()
    }

    /// Whether the value can be converted to a `u32`.
    pub fn is_uint_conv(&self) -> bool {
        self.uint_value().is_some()
    }

    /// Whether the value can be converted to a real.
    pub fn is_real_conv(&self) -> bool {
        self.real_value().is_some()
    }

    /// Whether the value can be converted to a bit vector.
    pub fn is_bitvector_conv(&self) -> bool {
        !matches!(*self, Value::Real(_) | Value::Error)
    }

    /// Whether the value is of a signed type.
    pub fn is_signed(&self) -> bool {
        match *self {
            Value::Int(_) | Value::Real(_) => true,
            Value::BitVec(ref bv) => bv.is_signed(),
            _ => false,
        }
    }

    /// The bit size of the value.
    pub fn bit_size(&self) -> usize {
        match *self {
            Value::Int(_) | Value::Uint(_) => ty::INTEGER_SIZE,
            Value::Scalar(_) => 1,
            Value::Real(_) => ty::REAL_SIZE,
            Value::Time(_) => ty::TIME_SIZE,
            Value::BitVec(ref bv) => bv.size(),
            Value::Error => 0,
        }
    }

    /// The type of the value.
    pub fn value_type(&self) -> ValueType {
        match *self {
            Value::Int(_) => ValueType::Integer,
            Value::Uint(_) => ValueType::BitVector {
                signed: false,
                sized: false,
                width: ty::INTEGER_SIZE,
            },
            Value::Scalar(_) => ValueType::bit(),
            Value::Real(_) => ValueType::Real,
            Value::Time(_) => ValueType::Time,
            Value::BitVec(ref bv) => bv.value_type(),
            Value::Error => ValueType::None,
        }
    }

    /// Convert to an `i32`, if possible.
    pub fn int_value(&self) -> Option<i32> {
        match *self {
            Value::Int(v) => Some(v),
            Value::Uint(v) => Some(v as i32),
            Value::Scalar(s) if !s.is_xz() => Some(s.to_int()),
            Value::Real(v) => {
                let r = v.round();
                if r.is_finite() && r >= i32::min_value() as f64 && r <= i32::max_value() as f64 {
                    Some(r as i32)
                } else {
                    None
                }
            }
            Value::Time(v) => {
                if v <= i32::max_value() as u64 {
                    Some(v as i32)
                } else {
                    None
                }
            }
            Value::BitVec(ref bv) => bv.to_int(),
            _ => None,
        }
    }

    /// Convert to a `u32`, if possible.
    pub fn uint_value(&self) -> Option<u32> {
        match *self {
            Value::Int(v) => Some(v as u32),
            Value::Uint(v) => Some(v),
            Value::Scalar(s) if !s.is_xz() => Some(s.to_int() as u32),
            Value::Real(v) => {
                let r = v.round();
                if r.is_finite() && r >= 0.0 && r <= u32::max_value() as f64 {
                    Some(r as u32)
                } else {
                    None
                }
            }
            Value::Time(v) => {
                if v <= u32::max_value() as u64 {
                    Some(v as u32)
                } else {
                    None
                }
            }
            Value::BitVec(ref bv) => bv.to_uint(),
            _ => None,
        }
    }

    /// Convert to a scalar: the least significant bit.
    pub fn scalar_value(&self) -> Scalar {
        match *self {
            Value::Int(v) => Scalar::from_bool(v & 1 != 0),
            Value::Uint(v) => Scalar::from_bool(v & 1 != 0),
            Value::Scalar(s) => s,
            Value::Real(v) => Scalar::from_real(v),
            Value::Time(v) => Scalar::from_bool(v & 1 != 0),
            Value::BitVec(ref bv) => bv.to_scalar(),
            Value::Error => Scalar::X,
        }
    }

    /// Convert to a logic value: the truth value of the whole quantity.
    pub fn logic_value(&self) -> Scalar {
        match *self {
            Value::Int(v) => Scalar::from_int(v),
            Value::Uint(v) => Scalar::from_bool(v != 0),
            Value::Scalar(s) => s.to_logic(),
            Value::Real(v) => Scalar::from_real(v),
            Value::Time(v) => Scalar::from_bool(v != 0),
            Value::BitVec(ref bv) => bv.to_logic(),
            Value::Error => Scalar::X,
        }
    }

    /// Convert to a real, if possible.
    pub fn real_value(&self) -> Option<f64> {
        match *self {
            Value::Int(v) => Some(v as f64),
            Value::Uint(v) => Some(v as f64),
            Value::Scalar(s) if !s.is_xz() => Some(s.to_real()),
            Value::Real(v) => Some(v),
            Value::Time(v) => Some(v as f64),
            Value::BitVec(ref bv) => bv.to_real(),
            _ => None,
        }
    }

    /// Convert to a `time` value, if possible.
    pub fn time_value(&self) -> Option<u64> {
        match *self {
            Value::Int(v) if v >= 0 => Some(v as u64),
            Value::Uint(v) => Some(v as u64),
            Value::Scalar(s) if !s.is_xz() => Some(s.to_int() as u64),
            Value::Real(v) => {
                let r = v.round();
                if r.is_finite() && r >= 0.0 {
                    Some(r as u64)
                } else {
                    None
                }
            }
            Value::Time(v) => Some(v),
            Value::BitVec(ref bv) => bv.to_time(),
            _ => None,
        }
    }

    /// Convert to a bit vector, optionally coerced into a requested type.
    pub fn bitvector_value(&self, req: Option<ValueType>) -> BitVector {
        let bv = match *self {
            Value::Int(v) => BitVector::from_int(v),
            Value::Uint(v) => BitVector::from_uint(v),
            Value::Scalar(s) => BitVector::from_scalar(s),
            Value::Real(v) => BitVector::from_real(v),
            Value::Time(v) => BitVector::from_time(v),
            Value::BitVec(ref bv) => bv.clone(),
            Value::Error => BitVector::filled_x(1),
        };
        match req {
            Some(t) if t.is_bitvector() => bv.coerce(t),
            _ => bv,
        }
    }

    /// Convert into the given type, per the coercion rules of §4.1: widening
    /// zero/sign-extends, narrowing truncates, real conversions round to the
    /// nearest integer.
    pub fn coerce(&self, vt: ValueType) -> Value {
        if self.is_error() {
            return Value::Error;
        }
        match vt {
            ValueType::None => self.clone(),
            ValueType::Integer => match self.int_value() {
                Some(v) => Value::Int(v),
                None => Value::BitVec(
                    self.bitvector_value(Some(ValueType::Integer.as_bitvector().unwrap())),
                ),
            },
            ValueType::Real => match self.real_value() {
                Some(v) => Value::Real(v),
                None => Value::Error,
            },
            ValueType::Time => match self.time_value() {
                Some(v) => Value::Time(v),
                None => Value::BitVec(
                    self.bitvector_value(Some(ValueType::Time.as_bitvector().unwrap())),
                ),
            },
            t @ ValueType::BitVector { .. } => Value::BitVec(self.bitvector_value(Some(t))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Scalar(s) => write!(f, "1'b{}", s),
            Value::Real(v) => write!(f, "{}", v),
            Value::Time(v) => write!(f, "{}", v),
            Value::BitVec(ref bv) => write!(f, "{}", bv),
            Value::Error => write!(f, "<error>"),
        }
    }
}

// The operation functions below follow the same promotion scheme: errors
// propagate, int/uint pairs stay machine integers, a real operand promotes
// the operation to real, and everything else goes through the bit vector
// algebra.

/// Arithmetic negation.
pub fn neg(src: &Value) -> Value {
    match *src {
        Value::Int(v) => Value::Int(v.wrapping_neg()),
        Value::Uint(v) => Value::Uint(v.wrapping_neg()),
        Value::Scalar(s) if !s.is_xz() => Value::Uint((s.to_int() as u32).wrapping_neg()),
        Value::Real(v) => Value::Real(-v),
        Value::Error => Value::Error,
        _ => Value::BitVec(src.bitvector_value(None).negate()),
    }
}

fn machine_ints(a: &Value, b: &Value) -> Option<(i32, i32, bool)> {
    match (a, b) {
        (&Value::Uint(x), &Value::Uint(y)) => Some((x as i32, y as i32, true)),
        (&Value::Uint(x), &Value::Int(y)) => Some((x as i32, y, false)),
        (&Value::Int(x), &Value::Uint(y)) => Some((x, y as i32, false)),
        (&Value::Int(x), &Value::Int(y)) => Some((x, y, false)),
        _ => None,
    }
}

macro_rules! arith_op {
    ($name:ident, $int_op:ident, $real_op:tt, $bv:ident) => {
        pub fn $name(a: &Value, b: &Value) -> Value {
            if a.is_error() || b.is_error() {
                return Value::Error;
            }
            if let Some((x, y, unsigned)) = machine_ints(a, b) {
                let r = x.$int_op(y);
                return if unsigned {
                    Value::Uint(r as u32)
                } else {
                    Value::Int(r)
                };
            }
            if a.is_real() || b.is_real() {
                return match (a.real_value(), b.real_value()) {
                    (Some(x), Some(y)) => Value::Real(x $real_op y),
                    _ => Value::Error,
                };
            }
            Value::BitVec(a.bitvector_value(None).$bv(&b.bitvector_value(None)))
        }
    };
}

arith_op!(sub, wrapping_sub, -, sub);
arith_op!(mul, wrapping_mul, *, mul);

/// Addition. Two `time` operands stay a `time`.
pub fn add(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    if let Some((x, y, unsigned)) = machine_ints(a, b) {
        let r = x.wrapping_add(y);
        return if unsigned {
            Value::Uint(r as u32)
        } else {
            Value::Int(r)
        };
    }
    if a.is_real() || b.is_real() {
        return match (a.real_value(), b.real_value()) {
            (Some(x), Some(y)) => Value::Real(x + y),
            _ => Value::Error,
        };
    }
    if let (&Value::Time(x), &Value::Time(y)) = (a, b) {
        return Value::Time(x.wrapping_add(y));
    }
    Value::BitVec(a.bitvector_value(None).add(&b.bitvector_value(None)))
}

/// Division. Integer division by zero yields `X`.
pub fn div(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    if let Some((x, y, unsigned)) = machine_ints(a, b) {
        if y == 0 {
            return Value::Scalar(Scalar::X);
        }
        return if unsigned {
            Value::Uint((x as u32).wrapping_div(y as u32))
        } else {
            Value::Int(x.wrapping_div(y))
        };
    }
    if a.is_real() || b.is_real() {
        return match (a.real_value(), b.real_value()) {
            (Some(x), Some(y)) => Value::Real(x / y),
            _ => Value::Error,
        };
    }
    Value::BitVec(a.bitvector_value(None).div(&b.bitvector_value(None)))
}

/// Modulus. Real operands are an error; division by zero yields `X`.
pub fn rem(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    if let Some((x, y, unsigned)) = machine_ints(a, b) {
        if y == 0 {
            return Value::Scalar(Scalar::X);
        }
        return if unsigned {
            Value::Uint((x as u32).wrapping_rem(y as u32))
        } else {
            Value::Int(x.wrapping_rem(y))
        };
    }
    if a.is_real() || b.is_real() {
        return Value::Error;
    }
    Value::BitVec(a.bitvector_value(None).rem(&b.bitvector_value(None)))
}

/// Exponentiation. The result is real if either operand is of a signed or
/// real type, otherwise it stays in the bit vector algebra.
pub fn power(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    if a.is_real() || a.is_int() || b.is_real() || b.is_int() {
        let (x, y) = match (a.real_value(), b.real_value()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Value::Error,
        };
        if (x == 0.0 && y <= 0.0) || (x < 0.0 && y.round() != y) {
            return Value::Scalar(Scalar::X);
        }
        return Value::Real(x.powf(y));
    }
    Value::BitVec(a.bitvector_value(None).pow(&b.bitvector_value(None)))
}

fn compare<FI, FR, FB>(a: &Value, b: &Value, fi: FI, fr: FR, fb: FB) -> Value
where
    FI: FnOnce(i64, i64) -> bool,
    FR: FnOnce(f64, f64) -> bool,
    FB: FnOnce(&BitVector, &BitVector) -> Scalar,
{
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    match (a, b) {
        (&Value::Int(x), &Value::Int(y)) => {
            return Value::Scalar(Scalar::from_bool(fi(x as i64, y as i64)))
        }
        (&Value::Int(x), &Value::Uint(y)) => {
            return Value::Scalar(Scalar::from_bool(fi(x as i64, y as i64)))
        }
        (&Value::Uint(x), &Value::Int(y)) => {
            return Value::Scalar(Scalar::from_bool(fi(x as i64, y as i64)))
        }
        (&Value::Uint(x), &Value::Uint(y)) => {
            return Value::Scalar(Scalar::from_bool(fi(x as i64, y as i64)))
        }
        _ => (),
    }
    if a.is_real() || b.is_real() {
        return match (a.real_value(), b.real_value()) {
            (Some(x), Some(y)) => Value::Scalar(Scalar::from_bool(fr(x, y))),
            _ => Value::Error,
        };
    }
    Value::Scalar(fb(&a.bitvector_value(None), &b.bitvector_value(None)))
}

/// Less-than comparison; `X` when incomparable.
pub fn lt(a: &Value, b: &Value) -> Value {
    compare(a, b, |x, y| x < y, |x, y| x < y, BitVector::lt)
}

/// Greater-than comparison; `X` when incomparable.
pub fn gt(a: &Value, b: &Value) -> Value {
    lt(b, a)
}

/// Less-or-equal comparison; `X` when incomparable.
pub fn le(a: &Value, b: &Value) -> Value {
    compare(a, b, |x, y| x <= y, |x, y| x <= y, BitVector::le)
}

/// Greater-or-equal comparison; `X` when incomparable.
pub fn ge(a: &Value, b: &Value) -> Value {
    le(b, a)
}

/// Logical equality; `X` when either operand contains `X`/`Z`.
pub fn eq(a: &Value, b: &Value) -> Value {
    compare(a, b, |x, y| x == y, |x, y| x == y, BitVector::eq)
}

/// Logical inequality; `X` when either operand contains `X`/`Z`.
pub fn ne(a: &Value, b: &Value) -> Value {
    match eq(a, b) {
        Value::Scalar(s) => Value::Scalar(!s),
        v => v,
    }
}

/// Case equality treating `X` as a wildcard.
pub fn eq_with_x(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    Value::Scalar(Scalar::from_bool(
        a.bitvector_value(None).eq_with_x(&b.bitvector_value(None)),
    ))
}

/// Case equality treating `X` and `Z` as wildcards.
pub fn eq_with_xz(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    Value::Scalar(Scalar::from_bool(
        a.bitvector_value(None).eq_with_xz(&b.bitvector_value(None)),
    ))
}

/// Case equality: exact four-state match.
pub fn case_eq(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    Value::Scalar(Scalar::from_bool(
        a.bitvector_value(None).case_eq(&b.bitvector_value(None)),
    ))
}

/// Case inequality: exact four-state mismatch.
pub fn case_ne(a: &Value, b: &Value) -> Value {
    match case_eq(a, b) {
        Value::Scalar(s) => Value::Scalar(!s),
        v => v,
    }
}

/// Logical NOT over the truth value.
pub fn log_not(src: &Value) -> Value {
    if src.is_error() {
        return Value::Error;
    }
    Value::Scalar(!src.logic_value())
}

/// Logical AND over the truth values.
pub fn log_and(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    Value::Scalar(Scalar::and(a.logic_value(), b.logic_value()))
}

/// Logical OR over the truth values.
pub fn log_or(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() {
        return Value::Error;
    }
    Value::Scalar(Scalar::or(a.logic_value(), b.logic_value()))
}

/// Bitwise negation. Real operands are an error.
pub fn bit_negate(src: &Value) -> Value {
    if src.is_error() || src.is_real() {
        return Value::Error;
    }
    Value::BitVec(src.bitvector_value(None).bit_negate())
}

macro_rules! bitwise_op {
    ($name:ident, $bv:ident) => {
        /// A bitwise binary operation. Real operands are an error.
        pub fn $name(a: &Value, b: &Value) -> Value {
            if a.is_error() || b.is_error() || a.is_real() || b.is_real() {
                return Value::Error;
            }
            Value::BitVec(a.bitvector_value(None).$bv(&b.bitvector_value(None)))
        }
    };
}

bitwise_op!(bit_and, bit_and);
bitwise_op!(bit_or, bit_or);
bitwise_op!(bit_xor, bit_xor);
bitwise_op!(bit_xnor, bit_xnor);

macro_rules! reduction_op {
    ($name:ident) => {
        /// A reduction over all bits. Real operands are an error.
        pub fn $name(src: &Value) -> Value {
            if src.is_error() || src.is_real() {
                return Value::Error;
            }
            Value::Scalar(src.bitvector_value(None).$name())
        }
    };
}

reduction_op!(reduction_and);
reduction_op!(reduction_or);
reduction_op!(reduction_xor);
reduction_op!(reduction_nand);
reduction_op!(reduction_nor);
reduction_op!(reduction_xnor);

fn shift_amount(b: &Value) -> Option<u32> {
    b.uint_value()
}

/// Logical shift left. Real operands are an error.
pub fn shl(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() || a.is_real() || b.is_real() {
        return Value::Error;
    }
    let bv = a.bitvector_value(None);
    match shift_amount(b) {
        Some(n) => Value::BitVec(bv.shl(n as usize)),
        None => Value::BitVec(BitVector::filled_x(bv.size())),
    }
}

/// Logical shift right.
pub fn shr(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() || a.is_real() || b.is_real() {
        return Value::Error;
    }
    let bv = a.bitvector_value(None);
    match shift_amount(b) {
        Some(n) => Value::BitVec(bv.shr(n as usize)),
        None => Value::BitVec(BitVector::filled_x(bv.size())),
    }
}

/// Arithmetic shift left; identical to the logical shift.
pub fn ashl(a: &Value, b: &Value) -> Value {
    shl(a, b)
}

/// Arithmetic shift right: shifts in sign bits for signed operands.
pub fn ashr(a: &Value, b: &Value) -> Value {
    if a.is_error() || b.is_error() || a.is_real() || b.is_real() {
        return Value::Error;
    }
    let bv = a.bitvector_value(None);
    match shift_amount(b) {
        Some(n) => Value::BitVec(bv.ashr(n as usize)),
        None => Value::BitVec(BitVector::filled_x(bv.size())),
    }
}

/// The conditional operator. An `X`/`Z` condition merges both branches:
/// bits that agree survive, bits that disagree become `X`.
pub fn ite(cond: &Value, t: &Value, e: &Value) -> Value {
    if cond.is_error() || t.is_error() || e.is_error() {
        return Value::Error;
    }
    match cond.logic_value() {
        Scalar::One => t.clone(),
        Scalar::Zero => e.clone(),
        _ => {
            if t.is_real() || e.is_real() {
                return Value::Error;
            }
            let a = t.bitvector_value(None);
            let b = e.bitvector_value(None);
            let vt = ty::binary_type(a.value_type(), b.value_type());
            let a = a.coerce(vt);
            let b = b.coerce(vt);
            let mut out = BitVector::filled_x(vt.width());
            for i in 0..vt.width() {
                let (x, y) = (a.get(i), b.get(i));
                if x == y {
                    out.set(i, x);
                }
            }
            Value::BitVec(out)
        }
    }
}

/// Concatenation. Real or unsized operands are an error; the first list
/// element becomes the most significant part.
pub fn concat(parts: &[Value]) -> Value {
    let mut list = Vec::with_capacity(parts.len());
    for p in parts {
        if !p.is_bitvector_conv() {
            return Value::Error;
        }
        list.push(p.bitvector_value(None));
    }
    Value::BitVec(BitVector::concat(&list))
}

/// Multi-concatenation: `parts` repeated `rep` times.
pub fn multi_concat(rep: &Value, parts: &[Value]) -> Value {
    let n = match rep.uint_value() {
        Some(n) => n,
        None => return Value::Error,
    };
    match concat(parts) {
        Value::BitVec(bv) => Value::BitVec(bv.repeat(n as usize)),
        v => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Scalar; 4] = [Scalar::Zero, Scalar::One, Scalar::X, Scalar::Z];

    #[test]
    fn not_involution_on_known_bits() {
        for &a in &ALL {
            let nn = !!a;
            if a.is_xz() {
                assert_eq!(nn, Scalar::X);
            } else {
                assert_eq!(nn, a);
            }
        }
    }

    #[test]
    fn and_zero_dominates() {
        for &a in &ALL {
            for &b in &ALL {
                let r = Scalar::and(a, b);
                assert_eq!(r.is_zero(), a.is_zero() || b.is_zero());
            }
        }
    }

    #[test]
    fn or_one_dominates() {
        for &a in &ALL {
            for &b in &ALL {
                let r = Scalar::or(a, b);
                assert_eq!(r.is_one(), a.is_one() || b.is_one());
            }
        }
    }

    #[test]
    fn eq_is_x_under_uncertainty() {
        for &a in &ALL {
            for &b in &ALL {
                let r = Scalar::eq(a, b);
                assert_eq!(r.is_x(), a.is_xz() || b.is_xz());
            }
        }
        assert_eq!(Scalar::eq(Scalar::Zero, Scalar::Zero), Scalar::One);
        assert_eq!(Scalar::eq(Scalar::Zero, Scalar::One), Scalar::Zero);
    }

    #[test]
    fn z_collapses_to_x_as_logic() {
        assert_eq!(Scalar::Z.to_logic(), Scalar::X);
        assert_eq!(Scalar::One.to_logic(), Scalar::One);
    }

    #[test]
    fn int_arith_stays_int() {
        let a = Value::Int(7);
        let b = Value::Int(-3);
        match add(&a, &b) {
            Value::Int(4) => (),
            v => panic!("unexpected {:?}", v),
        }
    }

    #[test]
    fn real_promotes() {
        let a = Value::Int(1);
        let b = Value::Real(0.5);
        match add(&a, &b) {
            Value::Real(v) => assert_eq!(v, 1.5),
            v => panic!("unexpected {:?}", v),
        }
    }

    #[test]
    fn division_by_zero_is_x() {
        assert_eq!(div(&Value::Int(4), &Value::Int(0)).logic_value(), Scalar::X);
    }

    #[test]
    fn rem_of_reals_is_error() {
        assert!(rem(&Value::Real(1.0), &Value::Real(2.0)).is_error());
    }

    #[test]
    fn error_propagates_once() {
        let e = add(&Value::Error, &Value::Int(1));
        assert!(e.is_error());
        assert!(mul(&e, &e).is_error());
    }

    #[test]
    fn ternary_merges_on_x() {
        use crate::ast::Base;
        let t = Value::BitVec(BitVector::from_literal(Some(4), false, Base::Bin, "1010"));
        let e = Value::BitVec(BitVector::from_literal(Some(4), false, Base::Bin, "1001"));
        let r = ite(&Value::Scalar(Scalar::X), &t, &e);
        let bv = r.bitvector_value(None);
        assert_eq!(bv.get(3), Scalar::One);
        assert_eq!(bv.get(0), Scalar::X);
    }
}
