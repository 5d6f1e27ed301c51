// Copyright (c) 2016-2021 Fabian Schuiki

//! The declaration model.
//!
//! A [`DeclHead`] carries the metadata shared by all items declared in one
//! statement: kind, signedness, range, strengths, and the delay that phase 3
//! links in. A [`Decl`] is one declared item; a [`DeclArray`] is one declared
//! array with a flat backing store of `elem_size` elements.
//!
//! The physical storage representation is selected by the declared type:
//! scalar-backed for one bit nets and regs, vector-backed for multi-bit regs
//! and `integer`/`time` variables, real-backed for `real`/`realtime`, and
//! storage-less for named events. Calling an accessor that is meaningless
//! for the representation returns an `Err`; the elaboration driver prevents
//! such calls through its type checks, so hitting one is an internal
//! consistency error, not a user-facing diagnostic.

use crate::bitvec::BitVector;
use crate::crate_prelude::*;
use crate::expr::Delay;
use crate::range::{Range, RangeArray};
use crate::scope::Scope;
use crate::ty::ValueType;
use crate::value::Scalar;
use std::cell::{Cell, RefCell};

/// The VPI-style object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjKind {
    Net,
    Reg,
    IntegerVar,
    TimeVar,
    RealVar,
    NamedEvent,
    Parameter,
    SpecParam,
    Genvar,
    Module,
    Task,
    Function,
    Scope,
}

impl std::fmt::Display for ObjKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match *self {
            ObjKind::Net => "net",
            ObjKind::Reg => "reg",
            ObjKind::IntegerVar => "integer variable",
            ObjKind::TimeVar => "time variable",
            ObjKind::RealVar => "real variable",
            ObjKind::NamedEvent => "named event",
            ObjKind::Parameter => "parameter",
            ObjKind::SpecParam => "specparam",
            ObjKind::Genvar => "genvar",
            ObjKind::Module => "module",
            ObjKind::Task => "task",
            ObjKind::Function => "function",
            ObjKind::Scope => "scope",
        };
        write!(f, "{}", s)
    }
}

/// What a declaration head declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Net(ast::NetType),
    Reg,
    IntegerVar,
    TimeVar,
    RealVar,
    NamedEvent,
}

impl DeclKind {
    /// Map a variable kind of the parse tree onto a declaration kind.
    pub fn from_var_kind(vk: ast::VarKind) -> DeclKind {
        match vk {
            ast::VarKind::Integer => DeclKind::IntegerVar,
            ast::VarKind::Real | ast::VarKind::Realtime => DeclKind::RealVar,
            ast::VarKind::Time => DeclKind::TimeVar,
        }
    }

    /// The object kind declarations of this kind report.
    pub fn obj_kind(self) -> ObjKind {
        match self {
            DeclKind::Net(_) => ObjKind::Net,
            DeclKind::Reg => ObjKind::Reg,
            DeclKind::IntegerVar => ObjKind::IntegerVar,
            DeclKind::TimeVar => ObjKind::TimeVar,
            DeclKind::RealVar => ObjKind::RealVar,
            DeclKind::NamedEvent => ObjKind::NamedEvent,
        }
    }
}

/// The metadata shared by all items of one declaration statement.
#[derive(Debug)]
pub struct DeclHead<'a> {
    pub scope: &'a Scope<'a>,
    pub span: Span,
    pub kind: DeclKind,
    pub signed: bool,
    pub range: Option<Range>,
    pub strength: Option<(ast::Strength, ast::Strength)>,
    /// The delay of a net declaration. Linked in phase 3, since the delay
    /// expression may reference objects declared later.
    pub delay: RefCell<Option<&'a Delay<'a>>>,
}

impl<'a> DeclHead<'a> {
    /// The type of values declared under this head.
    pub fn value_type(&self) -> ValueType {
        match self.kind {
            DeclKind::Net(_) | DeclKind::Reg => ValueType::BitVector {
                signed: self.signed,
                sized: true,
                width: self.bit_size(),
            },
            DeclKind::IntegerVar => ValueType::Integer,
            DeclKind::TimeVar => ValueType::Time,
            DeclKind::RealVar => ValueType::Real,
            DeclKind::NamedEvent => ValueType::None,
        }
    }

    /// The bit width of one declared item.
    pub fn bit_size(&self) -> usize {
        match self.kind {
            DeclKind::Net(_) | DeclKind::Reg => self.range.map(|r| r.size()).unwrap_or(1),
            DeclKind::IntegerVar => crate::ty::INTEGER_SIZE,
            DeclKind::TimeVar => crate::ty::TIME_SIZE,
            DeclKind::RealVar => crate::ty::REAL_SIZE,
            DeclKind::NamedEvent => 0,
        }
    }

    /// Whether declared items have an explicit range.
    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    /// The range of an `integer`/`time` variable is implied; nets and regs
    /// answer with the declared one.
    pub fn implied_range(&self) -> Option<Range> {
        match self.kind {
            DeclKind::IntegerVar | DeclKind::TimeVar => {
                Some(Range::implied(self.bit_size() as i32 - 1, 0))
            }
            _ => self.range,
        }
    }

    /// The LSB-relative offset of a bit index, or `None` when out of range.
    /// Items without any range answer for the implicit `[0:0]`.
    pub fn calc_bit_offset(&self, index: i32) -> Option<usize> {
        match self.implied_range() {
            Some(r) => r.offset(index),
            None => {
                if index == 0 && self.bit_size() >= 1 {
                    Some(0)
                } else {
                    None
                }
            }
        }
    }

    /// Whether bit numbering counts down toward the LSB, i.e. `left >=
    /// right` on the effective range.
    pub fn is_big_endian(&self) -> bool {
        self.implied_range().map(|r| r.is_big_endian()).unwrap_or(true)
    }
}

/// The physical value storage of a declaration.
#[derive(Debug)]
pub enum DeclValue {
    /// A one bit net or reg.
    Scalar(Cell<Scalar>),
    /// A multi-bit net or reg, or an `integer`/`time` variable.
    Vector(RefCell<BitVector>),
    /// A `real`/`realtime` variable.
    Real(Cell<f64>),
    /// A named event; carries no value at all.
    None,
}

impl DeclValue {
    /// Select and initialize the storage representation for a head. Values
    /// start out all `X` (reals start at 0.0, as simulation would).
    pub fn for_head(head: &DeclHead) -> DeclValue {
        match head.kind {
            DeclKind::Net(_) | DeclKind::Reg if head.bit_size() == 1 => {
                DeclValue::Scalar(Cell::new(Scalar::X))
            }
            DeclKind::Net(_) | DeclKind::Reg => {
                DeclValue::Vector(RefCell::new(BitVector::filled_x(head.bit_size())))
            }
            DeclKind::IntegerVar | DeclKind::TimeVar => {
                DeclValue::Vector(RefCell::new(
                    BitVector::filled_x(head.bit_size()).coerce(head.value_type()),
                ))
            }
            DeclKind::RealVar => DeclValue::Real(Cell::new(0.0)),
            DeclKind::NamedEvent => DeclValue::None,
        }
    }

    fn get_scalar(&self) -> Result<Scalar> {
        match *self {
            DeclValue::Scalar(ref c) => Ok(c.get()),
            DeclValue::Vector(ref v) => Ok(v.borrow().to_scalar()),
            DeclValue::Real(ref c) => Ok(Scalar::from_real(c.get())),
            DeclValue::None => Err(()),
        }
    }

    fn set_scalar(&self, value: Scalar) -> Result<()> {
        match *self {
            DeclValue::Scalar(ref c) => {
                c.set(value);
                Ok(())
            }
            DeclValue::Vector(ref v) => {
                v.borrow_mut().set(0, value);
                Ok(())
            }
            DeclValue::Real(ref c) => {
                c.set(value.to_real());
                Ok(())
            }
            DeclValue::None => Err(()),
        }
    }

    fn get_real(&self) -> Result<f64> {
        match *self {
            DeclValue::Real(ref c) => Ok(c.get()),
            DeclValue::Scalar(ref c) => Ok(c.get().to_real()),
            DeclValue::Vector(ref v) => Ok(v.borrow().to_real().unwrap_or(0.0)),
            DeclValue::None => Err(()),
        }
    }

    fn set_real(&self, value: f64) -> Result<()> {
        match *self {
            DeclValue::Real(ref c) => {
                c.set(value);
                Ok(())
            }
            DeclValue::Vector(ref v) => {
                let vt = v.borrow().value_type();
                *v.borrow_mut() = BitVector::from_real(value).coerce(vt);
                Ok(())
            }
            DeclValue::Scalar(ref c) => {
                c.set(Scalar::from_real(value));
                Ok(())
            }
            DeclValue::None => Err(()),
        }
    }

    fn get_bitvector(&self, vt: ValueType) -> Result<BitVector> {
        match *self {
            DeclValue::Vector(ref v) => Ok(v.borrow().clone()),
            DeclValue::Scalar(ref c) => {
                Ok(BitVector::from_scalar(c.get()).coerce(vt))
            }
            DeclValue::Real(_) | DeclValue::None => Err(()),
        }
    }

    fn set_bitvector(&self, value: &BitVector, vt: ValueType) -> Result<()> {
        match *self {
            DeclValue::Vector(ref v) => {
                *v.borrow_mut() = value.coerce(vt);
                Ok(())
            }
            DeclValue::Scalar(ref c) => {
                c.set(value.to_scalar());
                Ok(())
            }
            DeclValue::Real(_) | DeclValue::None => Err(()),
        }
    }

    fn get_bitselect(&self, offset: Option<usize>) -> Result<Scalar> {
        let offset = match offset {
            Some(o) => o,
            // out of range reads yield X, never an error
            None => return Ok(Scalar::X),
        };
        match *self {
            DeclValue::Scalar(ref c) => Ok(if offset == 0 { c.get() } else { Scalar::X }),
            DeclValue::Vector(ref v) => Ok(v.borrow().get(offset)),
            DeclValue::Real(_) | DeclValue::None => Err(()),
        }
    }

    fn set_bitselect(&self, offset: Option<usize>, value: Scalar) -> Result<()> {
        let offset = match offset {
            Some(o) => o,
            // out of range writes are dropped
            None => return Ok(()),
        };
        match *self {
            DeclValue::Scalar(ref c) => {
                if offset == 0 {
                    c.set(value);
                }
                Ok(())
            }
            DeclValue::Vector(ref v) => {
                v.borrow_mut().set(offset, value);
                Ok(())
            }
            DeclValue::Real(_) | DeclValue::None => Err(()),
        }
    }

    fn get_partselect(&self, offset: Option<usize>, width: usize) -> Result<BitVector> {
        let offset = match offset {
            Some(o) => o,
            None => return Ok(BitVector::filled_x(width)),
        };
        match *self {
            DeclValue::Scalar(ref c) => {
                let mut out = BitVector::filled_x(width);
                if offset == 0 && width >= 1 {
                    out.set(0, c.get());
                }
                Ok(out)
            }
            DeclValue::Vector(ref v) => Ok(v.borrow().slice(offset, width)),
            DeclValue::Real(_) | DeclValue::None => Err(()),
        }
    }

    fn set_partselect(&self, offset: Option<usize>, value: &BitVector) -> Result<()> {
        let offset = match offset {
            Some(o) => o,
            None => return Ok(()),
        };
        match *self {
            DeclValue::Scalar(ref c) => {
                if offset == 0 && value.size() >= 1 {
                    c.set(value.get(0));
                }
                Ok(())
            }
            DeclValue::Vector(ref v) => {
                v.borrow_mut().set_slice(offset, value);
                Ok(())
            }
            DeclValue::Real(_) | DeclValue::None => Err(()),
        }
    }
}

/// A single declared item.
#[derive(Debug)]
pub struct Decl<'a> {
    pub id: NodeId,
    pub head: &'a DeclHead<'a>,
    pub name: Name,
    pub span: Span,
    /// The elaborated initial value, if the grammar allows one here.
    pub init: RefCell<Option<&'a crate::expr::Expr<'a>>>,
    value: DeclValue,
}

impl<'a> Decl<'a> {
    /// Create a declaration with storage matching the head.
    pub fn new(head: &'a DeclHead<'a>, name: Name, span: Span) -> Decl<'a> {
        Decl {
            id: NodeId::alloc(),
            head,
            name,
            span,
            init: RefCell::new(None),
            value: DeclValue::for_head(head),
        }
    }

    /// The object kind of the declaration.
    pub fn kind(&self) -> ObjKind {
        self.head.kind.obj_kind()
    }

    /// The hierarchical name of the declaration.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.head.scope.full_name(), self.name)
    }

    /// The type of the declared value.
    pub fn value_type(&self) -> ValueType {
        self.head.value_type()
    }

    pub fn is_signed(&self) -> bool {
        self.head.signed
    }

    pub fn bit_size(&self) -> usize {
        self.head.bit_size()
    }

    /// Read the value as a scalar.
    pub fn get_scalar(&self) -> Result<Scalar> {
        self.value.get_scalar()
    }

    /// Write a scalar value.
    pub fn set_scalar(&self, value: Scalar) -> Result<()> {
        self.value.set_scalar(value)
    }

    /// Read the value as a real.
    pub fn get_real(&self) -> Result<f64> {
        self.value.get_real()
    }

    /// Write a real value.
    pub fn set_real(&self, value: f64) -> Result<()> {
        self.value.set_real(value)
    }

    /// Read the value as a bit vector.
    pub fn get_bitvector(&self) -> Result<BitVector> {
        self.value.get_bitvector(self.value_type())
    }

    /// Write a bit vector value, coercing it to the declared type.
    pub fn set_bitvector(&self, value: &BitVector) -> Result<()> {
        self.value.set_bitvector(value, self.value_type())
    }

    /// Read one bit. Out-of-range indices read as `X`.
    pub fn get_bitselect(&self, index: i32) -> Result<Scalar> {
        self.value.get_bitselect(self.head.calc_bit_offset(index))
    }

    /// Write one bit. Out-of-range writes are dropped.
    pub fn set_bitselect(&self, index: i32, value: Scalar) -> Result<()> {
        self.value.set_bitselect(self.head.calc_bit_offset(index), value)
    }

    /// Read a contiguous bit range given by its bound indices.
    pub fn get_partselect(&self, left: i32, right: i32) -> Result<BitVector> {
        let width = Range::implied(left, right).size();
        let lsb = if self.head.is_big_endian() {
            std::cmp::min(left, right)
        } else {
            std::cmp::max(left, right)
        };
        self.value
            .get_partselect(self.head.calc_bit_offset(lsb), width)
    }

    /// Write a contiguous bit range given by its bound indices.
    pub fn set_partselect(&self, left: i32, right: i32, value: &BitVector) -> Result<()> {
        let lsb = if self.head.is_big_endian() {
            std::cmp::min(left, right)
        } else {
            std::cmp::max(left, right)
        };
        self.value
            .set_partselect(self.head.calc_bit_offset(lsb), value)
    }
}

/// The backing store of a declaration array.
#[derive(Debug)]
enum ArrayStorage {
    Scalar(Vec<Cell<Scalar>>),
    Vector(Vec<RefCell<BitVector>>),
    Real(Vec<Cell<f64>>),
    None,
}

/// A declared array. The backing store is flat; index tuples are flattened
/// through the dimension list.
#[derive(Debug)]
pub struct DeclArray<'a> {
    pub id: NodeId,
    pub head: &'a DeclHead<'a>,
    pub name: Name,
    pub span: Span,
    pub dims: RangeArray,
    storage: ArrayStorage,
}

impl<'a> DeclArray<'a> {
    /// Create an array declaration with `dims.elem_size()` elements of the
    /// representation matching the head.
    pub fn new(head: &'a DeclHead<'a>, name: Name, span: Span, dims: RangeArray) -> DeclArray<'a> {
        let n = dims.elem_size();
        let storage = match DeclValue::for_head(head) {
            DeclValue::Scalar(_) => {
                ArrayStorage::Scalar((0..n).map(|_| Cell::new(Scalar::X)).collect())
            }
            DeclValue::Vector(proto) => ArrayStorage::Vector(
                (0..n).map(|_| RefCell::new(proto.borrow().clone())).collect(),
            ),
            DeclValue::Real(_) => ArrayStorage::Real((0..n).map(|_| Cell::new(0.0)).collect()),
            DeclValue::None => ArrayStorage::None,
        };
        DeclArray {
            id: NodeId::alloc(),
            head,
            name,
            span,
            dims,
            storage,
        }
    }

    /// The object kind of the array elements.
    pub fn elem_kind(&self) -> ObjKind {
        self.head.kind.obj_kind()
    }

    /// The hierarchical name of the array.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.head.scope.full_name(), self.name)
    }

    /// The type of one element.
    pub fn value_type(&self) -> ValueType {
        self.head.value_type()
    }

    /// The number of dimensions.
    pub fn dimension(&self) -> usize {
        self.dims.dimension()
    }

    /// The number of elements in the backing store.
    pub fn elem_size(&self) -> usize {
        self.dims.elem_size()
    }

    fn elem(&self, indices: &[i32]) -> Option<usize> {
        self.dims.offset_of(indices)
    }

    /// Read one element as a scalar. Out-of-range tuples read as `X`.
    pub fn get_scalar(&self, indices: &[i32]) -> Result<Scalar> {
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(Scalar::X),
        };
        match self.storage {
            ArrayStorage::Scalar(ref v) => Ok(v[off].get()),
            ArrayStorage::Vector(ref v) => Ok(v[off].borrow().to_scalar()),
            ArrayStorage::Real(ref v) => Ok(Scalar::from_real(v[off].get())),
            ArrayStorage::None => Err(()),
        }
    }

    /// Write one element as a scalar. Out-of-range writes are dropped.
    pub fn set_scalar(&self, indices: &[i32], value: Scalar) -> Result<()> {
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(()),
        };
        match self.storage {
            ArrayStorage::Scalar(ref v) => {
                v[off].set(value);
                Ok(())
            }
            ArrayStorage::Vector(ref v) => {
                v[off].borrow_mut().set(0, value);
                Ok(())
            }
            ArrayStorage::Real(ref v) => {
                v[off].set(value.to_real());
                Ok(())
            }
            ArrayStorage::None => Err(()),
        }
    }

    /// Read one element as a real.
    pub fn get_real(&self, indices: &[i32]) -> Result<f64> {
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(0.0),
        };
        match self.storage {
            ArrayStorage::Real(ref v) => Ok(v[off].get()),
            ArrayStorage::Scalar(ref v) => Ok(v[off].get().to_real()),
            ArrayStorage::Vector(ref v) => Ok(v[off].borrow().to_real().unwrap_or(0.0)),
            ArrayStorage::None => Err(()),
        }
    }

    /// Write one element as a real.
    pub fn set_real(&self, indices: &[i32], value: f64) -> Result<()> {
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(()),
        };
        match self.storage {
            ArrayStorage::Real(ref v) => {
                v[off].set(value);
                Ok(())
            }
            ArrayStorage::Vector(ref v) => {
                let vt = v[off].borrow().value_type();
                *v[off].borrow_mut() = BitVector::from_real(value).coerce(vt);
                Ok(())
            }
            ArrayStorage::Scalar(ref v) => {
                v[off].set(Scalar::from_real(value));
                Ok(())
            }
            ArrayStorage::None => Err(()),
        }
    }

    /// Read one element as a bit vector. Out-of-range tuples read all `X`.
    pub fn get_bitvector(&self, indices: &[i32]) -> Result<BitVector> {
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(BitVector::filled_x(self.head.bit_size())),
        };
        match self.storage {
            ArrayStorage::Vector(ref v) => Ok(v[off].borrow().clone()),
            ArrayStorage::Scalar(ref v) => {
                Ok(BitVector::from_scalar(v[off].get()).coerce(self.value_type()))
            }
            ArrayStorage::Real(_) | ArrayStorage::None => Err(()),
        }
    }

    /// Write one element as a bit vector, coercing it to the element type.
    pub fn set_bitvector(&self, indices: &[i32], value: &BitVector) -> Result<()> {
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(()),
        };
        match self.storage {
            ArrayStorage::Vector(ref v) => {
                *v[off].borrow_mut() = value.coerce(self.value_type());
                Ok(())
            }
            ArrayStorage::Scalar(ref v) => {
                v[off].set(value.to_scalar());
                Ok(())
            }
            ArrayStorage::Real(_) | ArrayStorage::None => Err(()),
        }
    }

    /// Read one bit of one element.
    pub fn get_bitselect(&self, indices: &[i32], index: i32) -> Result<Scalar> {
        let bit = self.head.calc_bit_offset(index);
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(Scalar::X),
        };
        let bit = match bit {
            Some(b) => b,
            None => return Ok(Scalar::X),
        };
        match self.storage {
            ArrayStorage::Scalar(ref v) => Ok(if bit == 0 { v[off].get() } else { Scalar::X }),
            ArrayStorage::Vector(ref v) => Ok(v[off].borrow().get(bit)),
            ArrayStorage::Real(_) | ArrayStorage::None => Err(()),
        }
    }

    /// Write one bit of one element.
    pub fn set_bitselect(&self, indices: &[i32], index: i32, value: Scalar) -> Result<()> {
        let bit = self.head.calc_bit_offset(index);
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(()),
        };
        let bit = match bit {
            Some(b) => b,
            None => return Ok(()),
        };
        match self.storage {
            ArrayStorage::Scalar(ref v) => {
                if bit == 0 {
                    v[off].set(value);
                }
                Ok(())
            }
            ArrayStorage::Vector(ref v) => {
                v[off].borrow_mut().set(bit, value);
                Ok(())
            }
            ArrayStorage::Real(_) | ArrayStorage::None => Err(()),
        }
    }

    /// Read a part select of one element.
    pub fn get_partselect(&self, indices: &[i32], left: i32, right: i32) -> Result<BitVector> {
        let width = Range::implied(left, right).size();
        let lsb = if self.head.is_big_endian() {
            std::cmp::min(left, right)
        } else {
            std::cmp::max(left, right)
        };
        let bit = self.head.calc_bit_offset(lsb);
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(BitVector::filled_x(width)),
        };
        let bit = match bit {
            Some(b) => b,
            None => return Ok(BitVector::filled_x(width)),
        };
        match self.storage {
            ArrayStorage::Vector(ref v) => Ok(v[off].borrow().slice(bit, width)),
            ArrayStorage::Scalar(ref v) => {
                let mut out = BitVector::filled_x(width);
                if bit == 0 && width >= 1 {
                    out.set(0, v[off].get());
                }
                Ok(out)
            }
            ArrayStorage::Real(_) | ArrayStorage::None => Err(()),
        }
    }

    /// Write a part select of one element.
    pub fn set_partselect(
        &self,
        indices: &[i32],
        left: i32,
        right: i32,
        value: &BitVector,
    ) -> Result<()> {
        let lsb = if self.head.is_big_endian() {
            std::cmp::min(left, right)
        } else {
            std::cmp::max(left, right)
        };
        let bit = self.head.calc_bit_offset(lsb);
        let off = match self.elem(indices) {
            Some(o) => o,
            None => return Ok(()),
        };
        let bit = match bit {
            Some(b) => b,
            None => return Ok(()),
        };
        match self.storage {
            ArrayStorage::Vector(ref v) => {
                v[off].borrow_mut().set_slice(bit, value);
                Ok(())
            }
            ArrayStorage::Scalar(ref v) => {
                if bit == 0 && value.size() >= 1 {
                    v[off].set(value.get(0));
                }
                Ok(())
            }
            ArrayStorage::Real(_) | ArrayStorage::None => Err(()),
        }
    }
}

/// A compile-time integer variable indexing generate loops.
#[derive(Debug)]
pub struct Genvar<'a> {
    pub id: NodeId,
    pub scope: &'a Scope<'a>,
    pub name: Name,
    pub span: Span,
    value: Cell<i32>,
    in_use: Cell<bool>,
}

impl<'a> Genvar<'a> {
    pub fn new(scope: &'a Scope<'a>, name: Name, span: Span) -> Genvar<'a> {
        Genvar {
            id: NodeId::alloc(),
            scope,
            name,
            span,
            value: Cell::new(0),
            in_use: Cell::new(false),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.scope.full_name(), self.name)
    }

    pub fn value(&self) -> i32 {
        self.value.get()
    }

    pub fn set_value(&self, v: i32) {
        self.value.set(v)
    }

    /// Whether a generate loop is currently iterating over this genvar.
    pub fn is_in_use(&self) -> bool {
        self.in_use.get()
    }

    pub fn set_in_use(&self, v: bool) {
        self.in_use.set(v)
    }
}
