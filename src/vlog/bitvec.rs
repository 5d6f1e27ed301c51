// Copyright (c) 2016-2021 Fabian Schuiki

//! Four-state bit vectors.
//!
//! A [`BitVector`] is an ordered sequence of four-state bits together with a
//! signedness and a flag recording whether its width was explicitly given in
//! the source text. The bits are kept in two planes: `aval` and `bval`
//! encode each bit as (a,b) = (0,0) for `0`, (1,0) for `1`, (0,1) for `Z`,
//! and (1,1) for `X`, which is the encoding VPI mandates for
//! `vpi_get_value`.
//!
//! Every operation produces a fresh vector; nothing aliases. Arithmetic on
//! vectors that contain `X` or `Z` bits yields an all-`X` result of the
//! inferred width, as simulation would.

use crate::ast::Base;
use crate::ty::{self, ValueType};
use crate::value::Scalar;
use bit_vec::BitVec;
use num::bigint::{BigInt, Sign};
use num::{BigUint, Integer, One, Signed, ToPrimitive, Zero};
use std::fmt;

/// A four-state bit vector.
#[derive(Clone, PartialEq, Eq)]
pub struct BitVector {
    width: usize,
    signed: bool,
    sized: bool,
    base: Base,
    aval: BitVec,
    bval: BitVec,
}

impl BitVector {
    /// Create a vector of the given width with all bits `X`.
    pub fn filled_x(width: usize) -> BitVector {
        BitVector::filled(width, Scalar::X)
    }

    /// Create a vector of the given width with every bit set to `bit`.
    pub fn filled(width: usize, bit: Scalar) -> BitVector {
        let (a, b) = encode(bit);
        BitVector {
            width,
            signed: false,
            sized: true,
            base: Base::Bin,
            aval: BitVec::from_elem(width, a),
            bval: BitVec::from_elem(width, b),
        }
    }

    /// Create a one bit vector from a scalar.
    pub fn from_scalar(bit: Scalar) -> BitVector {
        BitVector::filled(1, bit)
    }

    /// Create a 32 bit signed vector from an `integer` value. The result is
    /// unsized, like an undecorated decimal literal.
    pub fn from_int(v: i32) -> BitVector {
        let mut bv = BitVector::filled(ty::INTEGER_SIZE, Scalar::Zero);
        bv.signed = true;
        bv.sized = false;
        bv.base = Base::Dec;
        bv.store_u64(v as u32 as u64);
        bv
    }

    /// Create a 32 bit unsigned, unsized vector.
    pub fn from_uint(v: u32) -> BitVector {
        let mut bv = BitVector::filled(ty::INTEGER_SIZE, Scalar::Zero);
        bv.sized = false;
        bv.base = Base::Dec;
        bv.store_u64(v as u64);
        bv
    }

    /// Create a 64 bit unsigned vector from a `time` value.
    pub fn from_time(v: u64) -> BitVector {
        let mut bv = BitVector::filled(ty::TIME_SIZE, Scalar::Zero);
        bv.base = Base::Dec;
        bv.store_u64(v);
        bv
    }

    /// Create a vector from a real value, rounding to the nearest integer.
    /// The result is 32 bits signed unless the magnitude requires more bits,
    /// in which case it grows to hold the rounded value. A NaN or infinite
    /// value yields all `X`.
    pub fn from_real(v: f64) -> BitVector {
        if !v.is_finite() {
            let mut bv = BitVector::filled_x(ty::INTEGER_SIZE);
            bv.signed = true;
            return bv;
        }
        let rounded = v.round();
        let big = BigInt::from(rounded as i64);
        let width = std::cmp::max(ty::INTEGER_SIZE, big.bits() as usize + 1);
        BitVector::from_bigint(&big, width, true, true, Base::Dec)
    }

    /// Create a vector holding the two's complement pattern of `v` at the
    /// given width.
    pub fn from_bigint(v: &BigInt, width: usize, signed: bool, sized: bool, base: Base) -> BitVector {
        let modulus = BigUint::one() << width;
        let pattern = match v.sign() {
            Sign::Minus => {
                let mag = v.magnitude() % &modulus;
                if mag.is_zero() {
                    mag
                } else {
                    &modulus - mag
                }
            }
            _ => v.magnitude() % &modulus,
        };
        let mut bv = BitVector::filled(width, Scalar::Zero);
        bv.signed = signed;
        bv.sized = sized;
        bv.base = base;
        for (i, byte) in pattern.to_bytes_le().iter().enumerate() {
            for j in 0..8 {
                let pos = i * 8 + j;
                if pos < width && (byte >> j) & 1 != 0 {
                    bv.aval.set(pos, true);
                }
            }
        }
        bv
    }

    /// Create a vector from a based literal, e.g. the `8`, `h`, `"ff"` of
    /// `8'hff`. Digits may contain `x`, `z`, `?`, and `_`. If `size` is
    /// `None` the literal is unsized with a natural width of at least 32
    /// bits.
    pub fn from_literal(size: Option<u32>, signed: bool, base: Base, digits: &str) -> BitVector {
        let bits_per_digit = match base {
            Base::Bin => 1,
            Base::Oct => 3,
            Base::Hex => 4,
            Base::Dec => 0,
        };
        let mut bits = Vec::new();
        if bits_per_digit > 0 {
            for c in digits.chars().rev() {
                match c {
                    '_' => continue,
                    'x' | 'X' => bits.extend(std::iter::repeat(Scalar::X).take(bits_per_digit)),
                    'z' | 'Z' | '?' => {
                        bits.extend(std::iter::repeat(Scalar::Z).take(bits_per_digit))
                    }
                    _ => {
                        let d = c.to_digit(16).unwrap_or(0);
                        for j in 0..bits_per_digit {
                            bits.push(if (d >> j) & 1 != 0 {
                                Scalar::One
                            } else {
                                Scalar::Zero
                            });
                        }
                    }
                }
            }
        } else {
            // A decimal literal is either a plain number or a single x/z
            // digit covering the whole vector.
            let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
            match cleaned.as_str() {
                "x" | "X" => bits.push(Scalar::X),
                "z" | "Z" | "?" => bits.push(Scalar::Z),
                _ => {
                    let num = cleaned.parse::<BigUint>().unwrap_or_else(|_| BigUint::zero());
                    let nbits = num.bits() as usize;
                    for i in 0..nbits {
                        bits.push(if ((&num >> i) & BigUint::one()).is_one() {
                            Scalar::One
                        } else {
                            Scalar::Zero
                        });
                    }
                }
            }
        }
        let width = match size {
            Some(s) => s as usize,
            None => std::cmp::max(ty::INTEGER_SIZE, bits.len()),
        };
        let mut bv = BitVector::filled(width, Scalar::Zero);
        bv.signed = signed;
        bv.sized = size.is_some();
        bv.base = base;
        // Truncate or x/z-extend per the literal rules.
        let ext = match bits.last() {
            Some(&Scalar::X) => Scalar::X,
            Some(&Scalar::Z) => Scalar::Z,
            _ => Scalar::Zero,
        };
        for i in 0..width {
            let bit = bits.get(i).copied().unwrap_or(ext);
            bv.set(i, bit);
        }
        bv
    }

    /// Create a vector from a string literal: 8 bits per character, the
    /// first character in the most significant position.
    pub fn from_string(s: &str) -> BitVector {
        let bytes = s.as_bytes();
        let width = std::cmp::max(bytes.len() * 8, 8);
        let mut bv = BitVector::filled(width, Scalar::Zero);
        bv.base = Base::Hex;
        for (pos, &byte) in bytes.iter().rev().enumerate() {
            for j in 0..8 {
                if (byte >> j) & 1 != 0 {
                    bv.set(pos * 8 + j, Scalar::One);
                }
            }
        }
        bv
    }

    /// The width of the vector in bits.
    pub fn size(&self) -> usize {
        self.width
    }

    /// Whether the vector is signed.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Whether the width of the vector was explicitly specified.
    pub fn is_sized(&self) -> bool {
        self.sized
    }

    /// The display base of the vector.
    pub fn base(&self) -> Base {
        self.base
    }

    /// The type of the vector.
    pub fn value_type(&self) -> ValueType {
        ValueType::BitVector {
            signed: self.signed,
            sized: self.sized,
            width: self.width,
        }
    }

    /// Get the bit at the given LSB-relative offset. Out-of-range offsets
    /// read as `X`.
    pub fn get(&self, offset: usize) -> Scalar {
        if offset >= self.width {
            return Scalar::X;
        }
        decode(
            self.aval.get(offset).unwrap_or(false),
            self.bval.get(offset).unwrap_or(false),
        )
    }

    /// Set the bit at the given LSB-relative offset. Out-of-range offsets
    /// are ignored.
    pub fn set(&mut self, offset: usize, bit: Scalar) {
        if offset >= self.width {
            return;
        }
        let (a, b) = encode(bit);
        self.aval.set(offset, a);
        self.bval.set(offset, b);
    }

    /// Whether any bit of the vector is `X` or `Z`.
    pub fn has_xz(&self) -> bool {
        self.bval.any()
    }

    /// Iterate over the bits, LSB first.
    pub fn bits<'a>(&'a self) -> impl Iterator<Item = Scalar> + 'a {
        (0..self.width).map(move |i| self.get(i))
    }

    /// The least significant bit.
    pub fn to_scalar(&self) -> Scalar {
        self.get(0)
    }

    /// The truth value of the vector: `1` if any bit is `1`, `X` if the
    /// vector contains `X`/`Z` bits but no `1`, `0` otherwise.
    pub fn to_logic(&self) -> Scalar {
        let mut seen_xz = false;
        for bit in self.bits() {
            match bit {
                Scalar::One => return Scalar::One,
                Scalar::X | Scalar::Z => seen_xz = true,
                Scalar::Zero => (),
            }
        }
        if seen_xz {
            Scalar::X
        } else {
            Scalar::Zero
        }
    }

    /// Interpret the vector as an unsigned number. `None` if any bit is
    /// `X`/`Z`.
    pub fn to_biguint(&self) -> Option<BigUint> {
        if self.has_xz() {
            return None;
        }
        let mut bytes = vec![0u8; (self.width + 7) / 8];
        for i in 0..self.width {
            if self.aval.get(i).unwrap_or(false) {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        Some(BigUint::from_bytes_le(&bytes))
    }

    /// Interpret the vector as a number, two's complement if it is signed.
    /// `None` if any bit is `X`/`Z`.
    pub fn to_bigint(&self) -> Option<BigInt> {
        let mag = self.to_biguint()?;
        if self.signed && self.width > 0 && self.aval.get(self.width - 1).unwrap_or(false) {
            let modulus = BigUint::one() << self.width;
            Some(BigInt::from_biguint(Sign::Minus, modulus - mag))
        } else {
            Some(BigInt::from(mag))
        }
    }

    /// Convert to an `i32`, if the value is free of `X`/`Z` and fits.
    pub fn to_int(&self) -> Option<i32> {
        self.to_bigint()?.to_i32()
    }

    /// Convert to a `u32`, if the value is free of `X`/`Z` and fits.
    pub fn to_uint(&self) -> Option<u32> {
        self.to_bigint()?.to_u32()
    }

    /// Convert to a `time` value, if the value is free of `X`/`Z` and fits.
    pub fn to_time(&self) -> Option<u64> {
        self.to_bigint()?.to_u64()
    }

    /// Convert to a real number. `None` if any bit is `X`/`Z`.
    pub fn to_real(&self) -> Option<f64> {
        let v = self.to_bigint()?;
        v.to_f64()
    }

    fn store_u64(&mut self, v: u64) {
        for i in 0..std::cmp::min(self.width, 64) {
            self.aval.set(i, (v >> i) & 1 != 0);
            self.bval.set(i, false);
        }
    }

    /// Re-size and re-sign the vector to the given type. Widening
    /// sign-extends a signed vector and zero-extends an unsigned one, except
    /// that an `X` or `Z` in the most significant bit extends as itself.
    /// Narrowing truncates.
    pub fn coerce(&self, vt: ValueType) -> BitVector {
        let target = match vt.as_bitvector() {
            Some(t) => t,
            None => return self.clone(),
        };
        let (signed, sized, width) = match target {
            ValueType::BitVector {
                signed,
                sized,
                width,
            } => (signed, sized, width),
            _ => unreachable!(),
        };
        let mut out = BitVector::filled(width, Scalar::Zero);
        out.signed = signed;
        out.sized = sized;
        out.base = self.base;
        let ext = if self.width == 0 {
            Scalar::X
        } else {
            match self.get(self.width - 1) {
                Scalar::X => Scalar::X,
                Scalar::Z => Scalar::Z,
                msb => {
                    if self.signed {
                        msb
                    } else {
                        Scalar::Zero
                    }
                }
            }
        };
        for i in 0..width {
            let bit = if i < self.width { self.get(i) } else { ext };
            out.set(i, bit);
        }
        out
    }

    /// The common type of a binary operation on two vectors.
    fn common_type(&self, other: &BitVector) -> ValueType {
        ty::binary_type(self.value_type(), other.value_type())
    }

    fn all_x_as(vt: ValueType) -> BitVector {
        let mut bv = BitVector::filled_x(vt.width());
        bv.signed = vt.is_signed();
        bv.sized = vt.is_sized();
        bv
    }

    /// Two's complement negation. The sign of the result matches the
    /// operand.
    pub fn negate(&self) -> BitVector {
        let vt = self.value_type();
        match self.to_biguint() {
            Some(v) => {
                let modulus = BigUint::one() << self.width;
                let mag = if v.is_zero() { v } else { (&modulus) - (v % &modulus) };
                BitVector::from_bigint(
                    &BigInt::from(mag),
                    self.width,
                    self.signed,
                    self.sized,
                    self.base,
                )
            }
            None => BitVector::all_x_as(vt),
        }
    }

    fn arith<F>(&self, other: &BitVector, f: F) -> BitVector
    where
        F: FnOnce(BigInt, BigInt) -> Option<BigInt>,
    {
        let vt = self.common_type(other);
        let a = self.coerce(vt);
        let b = other.coerce(vt);
        match (a.to_bigint(), b.to_bigint()) {
            (Some(x), Some(y)) => match f(x, y) {
                Some(r) => {
                    BitVector::from_bigint(&r, vt.width(), vt.is_signed(), vt.is_sized(), self.base)
                }
                None => BitVector::all_x_as(vt),
            },
            _ => BitVector::all_x_as(vt),
        }
    }

    pub fn add(&self, other: &BitVector) -> BitVector {
        self.arith(other, |a, b| Some(a + b))
    }

    pub fn sub(&self, other: &BitVector) -> BitVector {
        self.arith(other, |a, b| Some(a - b))
    }

    pub fn mul(&self, other: &BitVector) -> BitVector {
        self.arith(other, |a, b| Some(a * b))
    }

    /// Division. A zero divisor yields all `X`.
    pub fn div(&self, other: &BitVector) -> BitVector {
        self.arith(other, |a, b| if b.is_zero() { None } else { Some(a / b) })
    }

    /// Remainder. The result takes the sign of the first operand. A zero
    /// divisor yields all `X`.
    pub fn rem(&self, other: &BitVector) -> BitVector {
        self.arith(other, |a, b| if b.is_zero() { None } else { Some(a % b) })
    }

    /// Exponentiation per IEEE 1364 §4.1.5: a negative exponent yields `X`
    /// unless the base is 1 or -1, and 0 to a non-positive power is `X`.
    pub fn pow(&self, other: &BitVector) -> BitVector {
        let vt = self.common_type(other);
        let base = match self.to_bigint() {
            Some(v) => v,
            None => return BitVector::all_x_as(vt),
        };
        let exp = match other.to_bigint() {
            Some(v) => v,
            None => return BitVector::all_x_as(vt),
        };
        let result = if exp.is_negative() {
            if base.magnitude().is_one() {
                // (-1)**odd = -1, otherwise 1
                if base.is_negative() && exp.magnitude().is_odd() {
                    Some(BigInt::from(-1))
                } else {
                    Some(BigInt::one())
                }
            } else if base.is_zero() {
                None
            } else {
                Some(BigInt::zero())
            }
        } else if base.is_zero() && exp.is_zero() {
            Some(BigInt::one())
        } else {
            // Compute modulo 2^width to keep huge exponents cheap.
            let modulus = BigUint::one() << vt.width();
            let m = BigInt::from(modulus.clone());
            let b = (((base % &m) + &m) % &m).to_biguint().unwrap();
            let e = exp.to_biguint().unwrap();
            Some(BigInt::from(b.modpow(&e, &modulus)))
        };
        match result {
            Some(r) => {
                BitVector::from_bigint(&r, vt.width(), vt.is_signed(), vt.is_sized(), self.base)
            }
            None => BitVector::all_x_as(vt),
        }
    }

    fn bitwise2<F>(&self, other: &BitVector, f: F) -> BitVector
    where
        F: Fn(Scalar, Scalar) -> Scalar,
    {
        let vt = self.common_type(other);
        let a = self.coerce(vt);
        let b = other.coerce(vt);
        let mut out = BitVector::all_x_as(vt);
        for i in 0..vt.width() {
            out.set(i, f(a.get(i), b.get(i)));
        }
        out
    }

    /// Bitwise negation.
    pub fn bit_negate(&self) -> BitVector {
        let mut out = self.clone();
        for i in 0..self.width {
            out.set(i, !self.get(i));
        }
        out
    }

    pub fn bit_and(&self, other: &BitVector) -> BitVector {
        self.bitwise2(other, Scalar::and)
    }

    pub fn bit_or(&self, other: &BitVector) -> BitVector {
        self.bitwise2(other, Scalar::or)
    }

    pub fn bit_xor(&self, other: &BitVector) -> BitVector {
        self.bitwise2(other, Scalar::xor)
    }

    pub fn bit_xnor(&self, other: &BitVector) -> BitVector {
        self.bitwise2(other, |a, b| !Scalar::xor(a, b))
    }

    /// Reduction AND over all bits.
    pub fn reduction_and(&self) -> Scalar {
        self.bits().fold(Scalar::One, Scalar::and)
    }

    /// Reduction OR over all bits.
    pub fn reduction_or(&self) -> Scalar {
        self.bits().fold(Scalar::Zero, Scalar::or)
    }

    /// Reduction XOR over all bits.
    pub fn reduction_xor(&self) -> Scalar {
        self.bits().fold(Scalar::Zero, Scalar::xor)
    }

    pub fn reduction_nand(&self) -> Scalar {
        !self.reduction_and()
    }

    pub fn reduction_nor(&self) -> Scalar {
        !self.reduction_or()
    }

    pub fn reduction_xnor(&self) -> Scalar {
        !self.reduction_xor()
    }

    /// Logical shift left. Vacated bits are filled with zero; the result
    /// keeps the type of the first operand.
    pub fn shl(&self, amount: usize) -> BitVector {
        let mut out = BitVector::filled(self.width, Scalar::Zero);
        out.signed = self.signed;
        out.sized = self.sized;
        out.base = self.base;
        for i in amount..self.width {
            out.set(i, self.get(i - amount));
        }
        out
    }

    /// Logical shift right. Vacated bits are filled with zero.
    pub fn shr(&self, amount: usize) -> BitVector {
        let mut out = BitVector::filled(self.width, Scalar::Zero);
        out.signed = self.signed;
        out.sized = self.sized;
        out.base = self.base;
        for i in 0..self.width.saturating_sub(amount) {
            out.set(i, self.get(i + amount));
        }
        out
    }

    /// Arithmetic shift right. A signed vector shifts in copies of its sign
    /// bit, an unsigned vector zeroes.
    pub fn ashr(&self, amount: usize) -> BitVector {
        if !self.signed || self.width == 0 {
            return self.shr(amount);
        }
        let sign = self.get(self.width - 1);
        let mut out = BitVector::filled(self.width, sign);
        out.signed = self.signed;
        out.sized = self.sized;
        out.base = self.base;
        for i in 0..self.width.saturating_sub(amount) {
            out.set(i, self.get(i + amount));
        }
        out
    }

    fn compare_prep(&self, other: &BitVector) -> Option<(BigInt, BigInt)> {
        let signed = self.signed && other.signed;
        let a = if signed {
            self.to_bigint()?
        } else {
            BigInt::from(self.to_biguint()?)
        };
        let b = if signed {
            other.to_bigint()?
        } else {
            BigInt::from(other.to_biguint()?)
        };
        Some((a, b))
    }

    /// Less-than comparison. `X` if either operand contains `X`/`Z`. Signed
    /// comparison iff both operands are signed.
    pub fn lt(&self, other: &BitVector) -> Scalar {
        match self.compare_prep(other) {
            Some((a, b)) => Scalar::from_bool(a < b),
            None => Scalar::X,
        }
    }

    /// Less-or-equal comparison, `X` on `X`/`Z` operands.
    pub fn le(&self, other: &BitVector) -> Scalar {
        match self.compare_prep(other) {
            Some((a, b)) => Scalar::from_bool(a <= b),
            None => Scalar::X,
        }
    }

    /// Logical equality. `X` if either operand contains `X`/`Z`.
    pub fn eq(&self, other: &BitVector) -> Scalar {
        if self.has_xz() || other.has_xz() {
            return Scalar::X;
        }
        Scalar::from_bool(self.case_eq(other))
    }

    /// Logical inequality. `X` if either operand contains `X`/`Z`.
    pub fn ne(&self, other: &BitVector) -> Scalar {
        !self.eq(other)
    }

    /// Case equality: a four-state bit pattern comparison where `X` and `Z`
    /// match only themselves.
    pub fn case_eq(&self, other: &BitVector) -> bool {
        let vt = self.common_type(other);
        let a = self.coerce(vt);
        let b = other.coerce(vt);
        a.bits().eq(b.bits())
    }

    /// Equality with `X` as a wildcard on either side.
    pub fn eq_with_x(&self, other: &BitVector) -> bool {
        let vt = self.common_type(other);
        let a = self.coerce(vt);
        let b = other.coerce(vt);
        let result = a.bits().zip(b.bits()).all(|(x, y)| {
            x == Scalar::X || y == Scalar::X || x == y
        });
        result
    }

    /// Equality with `X` and `Z` as wildcards on either side.
    pub fn eq_with_xz(&self, other: &BitVector) -> bool {
        let vt = self.common_type(other);
        let a = self.coerce(vt);
        let b = other.coerce(vt);
        let result = a.bits().zip(b.bits()).all(|(x, y)| {
            x == Scalar::X || y == Scalar::X || x == Scalar::Z || y == Scalar::Z || x == y
        });
        result
    }

    /// Concatenate a list of vectors. The first element of the list holds
    /// the most significant bits, as in source order of `{a, b, c}`. The
    /// result is unsigned and sized.
    pub fn concat(list: &[BitVector]) -> BitVector {
        let width = list.iter().map(|v| v.size()).sum();
        let mut out = BitVector::filled(width, Scalar::Zero);
        let mut pos = width;
        for v in list {
            pos -= v.size();
            for i in 0..v.size() {
                out.set(pos + i, v.get(i));
            }
        }
        out
    }

    /// Repeat this vector `n` times.
    pub fn repeat(&self, n: usize) -> BitVector {
        let list = vec![self.clone(); n];
        BitVector::concat(&list)
    }

    /// Extract `width` bits starting at the LSB-relative `offset`. Bits
    /// beyond the vector read as `X`.
    pub fn slice(&self, offset: usize, width: usize) -> BitVector {
        let mut out = BitVector::filled_x(width);
        for i in 0..width {
            out.set(i, self.get(offset + i));
        }
        out
    }

    /// Overwrite `width` bits starting at the LSB-relative `offset`. Bits
    /// beyond the vector are dropped.
    pub fn set_slice(&mut self, offset: usize, value: &BitVector) {
        for i in 0..value.size() {
            self.set(offset + i, value.get(i));
        }
    }
}

fn encode(bit: Scalar) -> (bool, bool) {
    match bit {
        Scalar::Zero => (false, false),
        Scalar::One => (true, false),
        Scalar::Z => (false, true),
        Scalar::X => (true, true),
    }
}

fn decode(a: bool, b: bool) -> Scalar {
    match (a, b) {
        (false, false) => Scalar::Zero,
        (true, false) => Scalar::One,
        (false, true) => Scalar::Z,
        (true, true) => Scalar::X,
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BitVector({})", self)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.base {
            Base::Dec => {
                let all_x = self.bits().all(|b| b == Scalar::X);
                let all_z = self.bits().all(|b| b == Scalar::Z);
                if self.has_xz() && !all_x && !all_z {
                    // not expressible as a decimal literal
                    let mut c = self.clone();
                    c.base = Base::Hex;
                    return write!(f, "{}", c);
                }
                if self.sized {
                    write!(f, "{}'d", self.width)?;
                } else if !self.signed {
                    write!(f, "'d")?;
                }
                if all_x {
                    write!(f, "x")
                } else if all_z {
                    write!(f, "z")
                } else {
                    match self.to_bigint() {
                        Some(v) => write!(f, "{}", v),
                        None => write!(f, "x"),
                    }
                }
            }
            _ => {
                let (letter, bits_per_digit) = match self.base {
                    Base::Bin => ('b', 1),
                    Base::Oct => ('o', 3),
                    _ => ('h', 4),
                };
                if self.sized {
                    write!(f, "{}'{}{}", self.width, if self.signed { "s" } else { "" }, letter)?;
                } else {
                    write!(f, "'{}{}", if self.signed { "s" } else { "" }, letter)?;
                }
                let ndigits = (self.width + bits_per_digit - 1) / bits_per_digit;
                for d in (0..ndigits).rev() {
                    let mut val: u32 = 0;
                    let mut has_x = false;
                    let mut has_z = false;
                    let mut all_x = true;
                    let mut all_z = true;
                    for j in (0..bits_per_digit).rev() {
                        let pos = d * bits_per_digit + j;
                        if pos >= self.width {
                            continue;
                        }
                        match self.get(pos) {
                            Scalar::Zero => {
                                all_x = false;
                                all_z = false;
                            }
                            Scalar::One => {
                                val |= 1 << j;
                                all_x = false;
                                all_z = false;
                            }
                            Scalar::X => {
                                has_x = true;
                                all_z = false;
                            }
                            Scalar::Z => {
                                has_z = true;
                                all_x = false;
                            }
                        }
                    }
                    if has_x {
                        write!(f, "{}", if all_x { 'x' } else { 'X' })?;
                    } else if has_z {
                        write!(f, "{}", if all_z { 'z' } else { 'Z' })?;
                    } else {
                        write!(f, "{}", std::char::from_digit(val, 16).unwrap())?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_round_trip() {
        let bv = BitVector::from_literal(Some(8), false, Base::Hex, "ff");
        assert_eq!(bv.size(), 8);
        assert_eq!(bv.to_uint(), Some(255));
        assert_eq!(format!("{}", bv), "8'hff");
    }

    #[test]
    fn literal_xz_digits() {
        let bv = BitVector::from_literal(Some(8), false, Base::Hex, "xz");
        assert!(bv.has_xz());
        assert_eq!(bv.get(0), Scalar::Z);
        assert_eq!(bv.get(4), Scalar::X);
        assert_eq!(format!("{}", bv), "8'hxz");
    }

    #[test]
    fn unsized_literal_is_32_bits() {
        let bv = BitVector::from_literal(None, false, Base::Hex, "ff");
        assert_eq!(bv.size(), 32);
        assert!(!bv.is_sized());
    }

    #[test]
    fn arithmetic_with_xz_poisons() {
        let a = BitVector::from_literal(Some(8), false, Base::Hex, "f0");
        let b = BitVector::from_literal(Some(8), false, Base::Hex, "0x");
        let sum = a.add(&b);
        assert_eq!(sum.size(), 8);
        assert!(sum.bits().all(|b| b == Scalar::X));
    }

    #[test]
    fn signed_extension_on_coerce() {
        let a = BitVector::from_literal(Some(4), true, Base::Hex, "f");
        let w = a.coerce(ValueType::signed(8));
        assert_eq!(w.to_int(), Some(-1));
        let u = BitVector::from_literal(Some(4), false, Base::Hex, "f");
        let wu = u.coerce(ValueType::unsigned(8));
        assert_eq!(wu.to_uint(), Some(15));
    }

    #[test]
    fn x_extension_on_widening() {
        let a = BitVector::from_literal(Some(4), false, Base::Bin, "x1");
        let w = a.coerce(ValueType::unsigned(8));
        assert_eq!(w.get(7), Scalar::X);
        assert_eq!(w.get(0), Scalar::One);
    }

    #[test]
    fn division_by_zero_is_x() {
        let a = BitVector::from_uint(7);
        let b = BitVector::from_uint(0);
        assert!(a.div(&b).has_xz());
        assert!(a.rem(&b).has_xz());
    }

    #[test]
    fn signed_arithmetic() {
        let a = BitVector::from_int(-6);
        let b = BitVector::from_int(4);
        assert_eq!(a.add(&b).to_int(), Some(-2));
        assert_eq!(a.div(&b).to_int(), Some(-1));
        assert_eq!(a.rem(&b).to_int(), Some(-2));
    }

    #[test]
    fn comparison_signedness() {
        let a = BitVector::from_literal(Some(4), true, Base::Hex, "f"); // -1 signed
        let b = BitVector::from_literal(Some(4), true, Base::Hex, "1");
        assert_eq!(a.lt(&b), Scalar::One);
        // once either operand is unsigned, the comparison is unsigned
        let c = BitVector::from_literal(Some(4), false, Base::Hex, "f");
        assert_eq!(c.lt(&b), Scalar::Zero);
    }

    #[test]
    fn concat_msb_first() {
        let a = BitVector::from_literal(Some(4), false, Base::Hex, "a");
        let b = BitVector::from_literal(Some(4), false, Base::Hex, "5");
        let c = BitVector::concat(&[a, b]);
        assert_eq!(c.size(), 8);
        assert_eq!(c.to_uint(), Some(0xa5));
    }

    #[test]
    fn shifts() {
        let a = BitVector::from_literal(Some(8), false, Base::Hex, "81");
        assert_eq!(a.shl(1).to_uint(), Some(0x02));
        assert_eq!(a.shr(1).to_uint(), Some(0x40));
        let s = BitVector::from_literal(Some(8), true, Base::Hex, "81");
        assert_eq!(s.ashr(1).to_biguint().and_then(|v| v.to_u32()), Some(0xc0));
    }

    #[test]
    fn case_equality_distinguishes_xz() {
        let a = BitVector::from_literal(Some(4), false, Base::Bin, "1x0z");
        let b = BitVector::from_literal(Some(4), false, Base::Bin, "1x0z");
        let c = BitVector::from_literal(Some(4), false, Base::Bin, "1x0x");
        assert!(a.case_eq(&b));
        assert!(!a.case_eq(&c));
        assert_eq!(a.eq(&b), Scalar::X);
    }

    #[test]
    fn power_semantics() {
        let a = BitVector::from_uint(3);
        let b = BitVector::from_uint(4);
        assert_eq!(a.pow(&b).to_uint(), Some(81));
        let z = BitVector::from_uint(0);
        assert_eq!(z.pow(&z).to_uint(), Some(1));
    }
}
