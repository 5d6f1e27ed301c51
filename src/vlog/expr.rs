// Copyright (c) 2016-2021 Fabian Schuiki

//! The elaborated expression node family.
//!
//! Expression nodes are arena-owned by the elaboration session and referenced
//! by their parents. Every node knows its [`ValueType`]; a parent that needs
//! an operand evaluated at a wider size pushes the requirement down with
//! [`Expr::set_reqsize`], which is how a 4 bit literal added to an 8 bit reg
//! ends up evaluated at 8 bits. Evaluation never fails: conditions without a
//! defined result produce `X` values.

use crate::bitvec::BitVector;
use crate::crate_prelude::*;
use crate::decl::{Decl, DeclArray};
use crate::param::Parameter;
use crate::scope::ObjHandle;
use crate::taskfunc::TaskFunc;
use crate::ty::{self, ValueType};
use crate::value::{self, Scalar, Value};
use itertools::Itertools;
use std::cell::Cell;

/// An elaborated delay control.
#[derive(Debug)]
pub struct Delay<'a> {
    pub span: Span,
    pub exprs: Vec<&'a Expr<'a>>,
}

/// An elaborated expression.
#[derive(Debug)]
pub struct Expr<'a> {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind<'a>,
    /// The type the expression evaluates at. Starts out as the natural
    /// (self-determined) type and may be widened by `set_reqsize`.
    ty: Cell<ValueType>,
}

/// The object a primary or select refers to.
#[derive(Debug)]
pub enum SelTarget<'a> {
    Decl(&'a Decl<'a>),
    Array {
        array: &'a DeclArray<'a>,
        indices: Vec<&'a Expr<'a>>,
    },
    Param(&'a Parameter<'a>),
}

/// The index of a bit select. The constant variant is pre-evaluated at
/// elaboration time; the variable variant re-evaluates on every access.
#[derive(Debug)]
pub enum BitIndex<'a> {
    Const(i32),
    Var(&'a Expr<'a>),
}

/// The addressing mode of a part select.
#[derive(Debug)]
pub enum PartMode<'a> {
    /// `[msb:lsb]` with both bounds constant.
    Const { left: i32, right: i32 },
    /// `[base +: width]`.
    Plus { base: &'a Expr<'a>, width: u32 },
    /// `[base -: width]`.
    Minus { base: &'a Expr<'a>, width: u32 },
}

/// The different expression nodes.
#[derive(Debug)]
pub enum ExprKind<'a> {
    /// A plain integer constant, e.g. a genvar reference.
    IntConst(i32),
    BitVecConst(BitVector),
    RealConst(f64),
    StringConst { text: String, bits: BitVector },
    /// A reference to a declaration, array element, or parameter.
    Primary(SelTarget<'a>),
    BitSelect {
        target: SelTarget<'a>,
        index: BitIndex<'a>,
    },
    PartSelect {
        target: SelTarget<'a>,
        mode: PartMode<'a>,
    },
    /// A scope or task/function reference passed to a system task/function.
    ArgHandle(ObjHandle<'a>),
    Unary {
        op: ast::Op,
        opr: &'a Expr<'a>,
    },
    Binary {
        op: ast::Op,
        lhs: &'a Expr<'a>,
        rhs: &'a Expr<'a>,
    },
    Ternary {
        cond: &'a Expr<'a>,
        then_expr: &'a Expr<'a>,
        else_expr: &'a Expr<'a>,
    },
    Concat(Vec<&'a Expr<'a>>),
    MultiConcat {
        rep: u32,
        parts: Vec<&'a Expr<'a>>,
    },
    FuncCall {
        func: &'a TaskFunc<'a>,
        args: Vec<&'a Expr<'a>>,
    },
    SysFuncCall {
        name: Name,
        args: Vec<&'a Expr<'a>>,
    },
}

impl<'a> SelTarget<'a> {
    /// The type of the referenced object.
    pub fn value_type(&self) -> ValueType {
        match *self {
            SelTarget::Decl(d) => d.value_type(),
            SelTarget::Array { array, .. } => array.value_type(),
            SelTarget::Param(p) => p.value_type(),
        }
    }

    /// Whether references to the target are compile-time constants.
    pub fn is_const(&self) -> bool {
        match *self {
            SelTarget::Param(_) => true,
            _ => false,
        }
    }

    /// Whether bit numbering counts down toward the LSB.
    pub fn is_big_endian(&self) -> bool {
        match *self {
            SelTarget::Decl(d) => d.head.is_big_endian(),
            SelTarget::Array { array, .. } => array.head.is_big_endian(),
            SelTarget::Param(p) => p.range().map(|r| r.is_big_endian()).unwrap_or(true),
        }
    }

    /// Evaluate the array index tuple, if this is an array element.
    fn indices(&self) -> Option<Vec<i32>> {
        match *self {
            SelTarget::Array { ref indices, .. } => {
                indices.iter().map(|e| e.eval_int()).collect()
            }
            _ => Some(vec![]),
        }
    }

    /// Read the referenced value.
    pub fn read(&self) -> Value {
        match *self {
            SelTarget::Decl(d) => match d.value_type() {
                ValueType::Real => d.get_real().map(Value::Real).unwrap_or(Value::Error),
                ValueType::None => Value::Error,
                _ => d.get_bitvector().map(Value::BitVec).unwrap_or(Value::Error),
            },
            SelTarget::Array { array, .. } => {
                let idx = match self.indices() {
                    Some(i) => i,
                    None => {
                        return Value::BitVec(BitVector::filled_x(array.head.bit_size().max(1)))
                    }
                };
                match array.value_type() {
                    ValueType::Real => array
                        .get_real(&idx)
                        .map(Value::Real)
                        .unwrap_or(Value::Error),
                    ValueType::None => Value::Error,
                    _ => array
                        .get_bitvector(&idx)
                        .map(Value::BitVec)
                        .unwrap_or(Value::Error),
                }
            }
            SelTarget::Param(p) => p.value(),
        }
    }

    /// Write the referenced value. Fails on parameters and named events.
    pub fn write(&self, v: &Value) -> Result<()> {
        match *self {
            SelTarget::Decl(d) => match d.value_type() {
                ValueType::Real => d.set_real(v.real_value().unwrap_or(0.0)),
                ValueType::None => Err(()),
                _ => d.set_bitvector(&v.bitvector_value(None)),
            },
            SelTarget::Array { array, .. } => {
                let idx = match self.indices() {
                    Some(i) => i,
                    None => return Ok(()),
                };
                match array.value_type() {
                    ValueType::Real => array.set_real(&idx, v.real_value().unwrap_or(0.0)),
                    ValueType::None => Err(()),
                    _ => array.set_bitvector(&idx, &v.bitvector_value(None)),
                }
            }
            SelTarget::Param(_) => Err(()),
        }
    }

    /// Read one bit of the referenced value.
    pub fn read_bitselect(&self, index: i32) -> Scalar {
        match *self {
            SelTarget::Decl(d) => d.get_bitselect(index).unwrap_or(Scalar::X),
            SelTarget::Array { array, .. } => match self.indices() {
                Some(idx) => array.get_bitselect(&idx, index).unwrap_or(Scalar::X),
                None => Scalar::X,
            },
            SelTarget::Param(p) => match p.calc_bit_offset(index) {
                Some(off) => p.value().bitvector_value(None).get(off),
                None => Scalar::X,
            },
        }
    }

    /// Write one bit of the referenced value.
    pub fn write_bitselect(&self, index: i32, v: Scalar) -> Result<()> {
        match *self {
            SelTarget::Decl(d) => d.set_bitselect(index, v),
            SelTarget::Array { array, .. } => match self.indices() {
                Some(idx) => array.set_bitselect(&idx, index, v),
                None => Ok(()),
            },
            SelTarget::Param(_) => Err(()),
        }
    }

    /// Read a part of the referenced value, given the bound indices.
    pub fn read_partselect(&self, left: i32, right: i32) -> BitVector {
        match *self {
            SelTarget::Decl(d) => d
                .get_partselect(left, right)
                .unwrap_or_else(|_| BitVector::filled_x(crate::range::Range::implied(left, right).size())),
            SelTarget::Array { array, .. } => {
                let width = crate::range::Range::implied(left, right).size();
                match self.indices() {
                    Some(idx) => array
                        .get_partselect(&idx, left, right)
                        .unwrap_or_else(|_| BitVector::filled_x(width)),
                    None => BitVector::filled_x(width),
                }
            }
            SelTarget::Param(p) => {
                let width = crate::range::Range::implied(left, right).size();
                let lsb = if self.is_big_endian() {
                    std::cmp::min(left, right)
                } else {
                    std::cmp::max(left, right)
                };
                match p.calc_bit_offset(lsb) {
                    Some(off) => p.value().bitvector_value(None).slice(off, width),
                    None => BitVector::filled_x(width),
                }
            }
        }
    }

    /// Write a part of the referenced value, given the bound indices.
    pub fn write_partselect(&self, left: i32, right: i32, v: &BitVector) -> Result<()> {
        match *self {
            SelTarget::Decl(d) => d.set_partselect(left, right, v),
            SelTarget::Array { array, .. } => match self.indices() {
                Some(idx) => array.set_partselect(&idx, left, right, v),
                None => Ok(()),
            },
            SelTarget::Param(_) => Err(()),
        }
    }

    /// The source name of the target, with array indices.
    pub fn decompile(&self) -> String {
        match *self {
            SelTarget::Decl(d) => format!("{}", d.name),
            SelTarget::Array { array, ref indices } => {
                let mut s = format!("{}", array.name);
                for i in indices {
                    s.push_str(&format!("[{}]", i.decompile()));
                }
                s
            }
            SelTarget::Param(p) => format!("{}", p.name),
        }
    }
}

impl<'a> Expr<'a> {
    fn new(span: Span, kind: ExprKind<'a>, ty: ValueType) -> Expr<'a> {
        Expr {
            id: NodeId::alloc(),
            span,
            kind,
            ty: Cell::new(ty),
        }
    }

    /// An integer constant, e.g. an elaborated genvar reference.
    pub fn new_int_const(span: Span, v: i32) -> Expr<'a> {
        Expr::new(span, ExprKind::IntConst(v), ValueType::Integer)
    }

    /// A bit vector constant.
    pub fn new_bitvec_const(span: Span, bv: BitVector) -> Expr<'a> {
        let ty = bv.value_type();
        Expr::new(span, ExprKind::BitVecConst(bv), ty)
    }

    /// A real constant.
    pub fn new_real_const(span: Span, v: f64) -> Expr<'a> {
        Expr::new(span, ExprKind::RealConst(v), ValueType::Real)
    }

    /// A string constant, packed 8 bits per character.
    pub fn new_string_const(span: Span, text: String) -> Expr<'a> {
        let bits = BitVector::from_string(&text);
        let ty = bits.value_type();
        Expr::new(span, ExprKind::StringConst { text, bits }, ty)
    }

    /// A reference to a declaration, array element, or parameter.
    pub fn new_primary(span: Span, target: SelTarget<'a>) -> Expr<'a> {
        let ty = target.value_type();
        Expr::new(span, ExprKind::Primary(target), ty)
    }

    /// A scope or task/function handle used as a system task argument.
    pub fn new_arg_handle(span: Span, handle: ObjHandle<'a>) -> Expr<'a> {
        Expr::new(span, ExprKind::ArgHandle(handle), ValueType::None)
    }

    /// A bit select. The result is always an unsigned single bit.
    pub fn new_bitselect(span: Span, target: SelTarget<'a>, index: BitIndex<'a>) -> Expr<'a> {
        Expr::new(
            span,
            ExprKind::BitSelect { target, index },
            ValueType::bit(),
        )
    }

    /// A part select. The width is always constant.
    pub fn new_partselect(span: Span, target: SelTarget<'a>, mode: PartMode<'a>) -> Expr<'a> {
        let width = match mode {
            PartMode::Const { left, right } => crate::range::Range::implied(left, right).size(),
            PartMode::Plus { width, .. } | PartMode::Minus { width, .. } => width as usize,
        };
        Expr::new(
            span,
            ExprKind::PartSelect { target, mode },
            ValueType::unsigned(width),
        )
    }

    /// A unary operator node.
    pub fn new_unary(span: Span, op: ast::Op, opr: &'a Expr<'a>) -> Expr<'a> {
        use ast::Op::*;
        let ty = match op {
            // fixed, unsigned single bit
            LogicNot | RedAnd | RedNand | RedOr | RedNor | RedXor | RedXnor => ValueType::bit(),
            Posedge | Negedge => ValueType::bit(),
            // takes the operand type
            _ => opr.value_type(),
        };
        Expr::new(span, ExprKind::Unary { op, opr }, ty)
    }

    /// A binary operator node. Comparison and equality operands are sized
    /// against each other at construction; everything else stays
    /// self-determined until a requirement arrives.
    pub fn new_binary(span: Span, op: ast::Op, lhs: &'a Expr<'a>, rhs: &'a Expr<'a>) -> Expr<'a> {
        use ast::Op::*;
        let ty = match op {
            Add | Sub | Mul | Div | Mod | BitAnd | BitOr | BitXor | BitXnor => {
                ty::binary_type(lhs.value_type(), rhs.value_type())
            }
            Pow => ty::power_type(lhs.value_type(), rhs.value_type()),
            Eq | Neq | CaseEq | CaseNeq | Lt | Gt | Le | Ge => {
                let opt = ty::comparison_operand_type(lhs.value_type(), rhs.value_type());
                if !opt.is_real() {
                    lhs.set_reqsize(opt);
                    rhs.set_reqsize(opt);
                }
                ValueType::bit()
            }
            LogicAnd | LogicOr => ValueType::bit(),
            // shifts take the type of the first operand
            Shl | Shr | Ashl | Ashr => lhs.value_type(),
            _ => ty::binary_type(lhs.value_type(), rhs.value_type()),
        };
        Expr::new(span, ExprKind::Binary { op, lhs, rhs }, ty)
    }

    /// A ternary operator node.
    pub fn new_ternary(
        span: Span,
        cond: &'a Expr<'a>,
        then_expr: &'a Expr<'a>,
        else_expr: &'a Expr<'a>,
    ) -> Expr<'a> {
        let ty = ty::binary_type(then_expr.value_type(), else_expr.value_type());
        Expr::new(
            span,
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            },
            ty,
        )
    }

    /// A concatenation. Always unsigned, sized to the sum of the operand
    /// widths.
    pub fn new_concat(span: Span, parts: Vec<&'a Expr<'a>>) -> Expr<'a> {
        let ty = ty::concat_type(parts.iter().map(|p| p.value_type().width()));
        Expr::new(span, ExprKind::Concat(parts), ty)
    }

    /// A multi-concatenation with a constant repetition count.
    pub fn new_multi_concat(span: Span, rep: u32, parts: Vec<&'a Expr<'a>>) -> Expr<'a> {
        let inner: usize = parts.iter().map(|p| p.value_type().width()).sum();
        let ty = ValueType::unsigned(inner * rep as usize);
        Expr::new(span, ExprKind::MultiConcat { rep, parts }, ty)
    }

    /// A function call.
    pub fn new_func_call(span: Span, func: &'a TaskFunc<'a>, args: Vec<&'a Expr<'a>>) -> Expr<'a> {
        let ty = func.value_type();
        Expr::new(span, ExprKind::FuncCall { func, args }, ty)
    }

    /// A system function call. The return type of a system function is not
    /// known to the elaborator; it is treated as an integer.
    pub fn new_sys_func_call(span: Span, name: Name, args: Vec<&'a Expr<'a>>) -> Expr<'a> {
        Expr::new(
            span,
            ExprKind::SysFuncCall { name, args },
            ValueType::Integer,
        )
    }

    /// The type the expression currently evaluates at.
    pub fn value_type(&self) -> ValueType {
        self.ty.get()
    }

    /// Whether the expression is a compile-time constant.
    pub fn is_const(&self) -> bool {
        match self.kind {
            ExprKind::IntConst(_)
            | ExprKind::BitVecConst(_)
            | ExprKind::RealConst(_)
            | ExprKind::StringConst { .. } => true,
            ExprKind::Primary(ref t) => t.is_const(),
            ExprKind::BitSelect {
                ref target,
                ref index,
            } => {
                target.is_const()
                    && match *index {
                        BitIndex::Const(_) => true,
                        BitIndex::Var(e) => e.is_const(),
                    }
            }
            ExprKind::PartSelect {
                ref target,
                ref mode,
            } => {
                target.is_const()
                    && match *mode {
                        PartMode::Const { .. } => true,
                        PartMode::Plus { base, .. } | PartMode::Minus { base, .. } => {
                            base.is_const()
                        }
                    }
            }
            ExprKind::ArgHandle(_) => false,
            ExprKind::Unary { opr, .. } => opr.is_const(),
            ExprKind::Binary { lhs, rhs, .. } => lhs.is_const() && rhs.is_const(),
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => cond.is_const() && then_expr.is_const() && else_expr.is_const(),
            ExprKind::Concat(ref parts) => parts.iter().all(|p| p.is_const()),
            ExprKind::MultiConcat { ref parts, .. } => parts.iter().all(|p| p.is_const()),
            ExprKind::FuncCall { ref args, .. } => args.iter().all(|a| a.is_const()),
            ExprKind::SysFuncCall { .. } => false,
        }
    }

    /// Push an output size/sign requirement down into this expression,
    /// recursing into the operands where the operator semantics call for it.
    pub fn set_reqsize(&self, req: ValueType) {
        use ast::Op::*;
        if req.is_real() || req.is_none() {
            return;
        }
        match self.kind {
            ExprKind::Unary { op, opr } => match op {
                BitNeg | Plus | Minus => {
                    self.ty.set(merge_req(self.ty.get(), req));
                    opr.set_reqsize(self.ty.get());
                }
                _ => (),
            },
            ExprKind::Binary { op, lhs, rhs } => match op {
                Add | Sub | Mul | Div | Mod | BitAnd | BitOr | BitXor | BitXnor => {
                    self.ty.set(merge_req(self.ty.get(), req));
                    lhs.set_reqsize(self.ty.get());
                    rhs.set_reqsize(self.ty.get());
                }
                Shl | Shr | Ashl | Ashr => {
                    self.ty.set(merge_req(self.ty.get(), req));
                    lhs.set_reqsize(self.ty.get());
                }
                Pow => {
                    if !self.ty.get().is_real() {
                        self.ty.set(merge_req(self.ty.get(), req));
                    }
                }
                _ => (),
            },
            ExprKind::Ternary {
                then_expr,
                else_expr,
                ..
            } => {
                self.ty.set(merge_req(self.ty.get(), req));
                then_expr.set_reqsize(self.ty.get());
                else_expr.set_reqsize(self.ty.get());
            }
            // Constants, primaries, selects, concatenations, and calls are
            // self-determined: the requirement only affects how this node's
            // result is extended, which the stored type records.
            _ => {
                if self.ty.get().is_bitvector() {
                    self.ty.set(merge_req(self.ty.get(), req));
                }
            }
        }
    }

    /// Request evaluation at the expression's own natural size.
    pub fn set_selfsize(&self) {
        // the natural type was recorded at construction
    }

    fn eval_natural(&self) -> Value {
        use ast::Op::*;
        match self.kind {
            ExprKind::IntConst(v) => Value::Int(v),
            ExprKind::BitVecConst(ref bv) => Value::BitVec(bv.clone()),
            ExprKind::RealConst(v) => Value::Real(v),
            ExprKind::StringConst { ref bits, .. } => Value::BitVec(bits.clone()),
            ExprKind::Primary(ref t) => t.read(),
            ExprKind::ArgHandle(_) => Value::Error,
            ExprKind::BitSelect {
                ref target,
                ref index,
            } => {
                let i = match *index {
                    BitIndex::Const(i) => Some(i),
                    BitIndex::Var(e) => e.eval_int(),
                };
                match i {
                    Some(i) => Value::Scalar(target.read_bitselect(i)),
                    None => Value::Scalar(Scalar::X),
                }
            }
            ExprKind::PartSelect {
                ref target,
                ref mode,
            } => {
                let bounds = mode.bounds(target.is_big_endian());
                match bounds {
                    Some((l, r)) => Value::BitVec(target.read_partselect(l, r)),
                    None => Value::BitVec(BitVector::filled_x(self.ty.get().width())),
                }
            }
            ExprKind::Unary { op, opr } => {
                let v = opr.eval_value();
                match op {
                    Plus => v,
                    Minus => value::neg(&v),
                    LogicNot => value::log_not(&v),
                    BitNeg => value::bit_negate(&v),
                    RedAnd => value::reduction_and(&v),
                    RedNand => value::reduction_nand(&v),
                    RedOr => value::reduction_or(&v),
                    RedNor => value::reduction_nor(&v),
                    RedXor => value::reduction_xor(&v),
                    RedXnor => value::reduction_xnor(&v),
                    // edge expressions have no value
                    _ => Value::Scalar(Scalar::X),
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let a = lhs.eval_value();
                let b = rhs.eval_value();
                match op {
                    Add => value::add(&a, &b),
                    Sub => value::sub(&a, &b),
                    Mul => value::mul(&a, &b),
                    Div => value::div(&a, &b),
                    Mod => value::rem(&a, &b),
                    Pow => value::power(&a, &b),
                    LogicAnd => value::log_and(&a, &b),
                    LogicOr => value::log_or(&a, &b),
                    BitAnd => value::bit_and(&a, &b),
                    BitOr => value::bit_or(&a, &b),
                    BitXor => value::bit_xor(&a, &b),
                    BitXnor => value::bit_xnor(&a, &b),
                    Eq => value::eq(&a, &b),
                    Neq => value::ne(&a, &b),
                    CaseEq => value::case_eq(&a, &b),
                    CaseNeq => value::case_ne(&a, &b),
                    Lt => value::lt(&a, &b),
                    Gt => value::gt(&a, &b),
                    Le => value::le(&a, &b),
                    Ge => value::ge(&a, &b),
                    Shl | Ashl => value::shl(&a, &b),
                    Shr => value::shr(&a, &b),
                    Ashr => value::ashr(&a, &b),
                    _ => Value::Error,
                }
            }
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => value::ite(
                &cond.eval_value(),
                &then_expr.eval_value(),
                &else_expr.eval_value(),
            ),
            ExprKind::Concat(ref parts) => {
                let vals: Vec<_> = parts.iter().map(|p| p.eval_value()).collect();
                value::concat(&vals)
            }
            ExprKind::MultiConcat { rep, ref parts } => {
                let vals: Vec<_> = parts.iter().map(|p| p.eval_value()).collect();
                value::multi_concat(&Value::Uint(rep), &vals)
            }
            ExprKind::FuncCall { func, ref args } => {
                let vals: Vec<_> = args.iter().map(|a| a.eval_value()).collect();
                func.eval_const_call(&vals)
            }
            ExprKind::SysFuncCall { .. } => Value::Error,
        }
    }

    /// Evaluate the expression to a value, at the expression's current type.
    pub fn eval_value(&self) -> Value {
        let v = self.eval_natural();
        match self.ty.get() {
            ValueType::None => v,
            t => v.coerce(t),
        }
    }

    /// Evaluate to a single bit.
    pub fn eval_scalar(&self) -> Scalar {
        self.eval_value().scalar_value()
    }

    /// Evaluate to the truth value.
    pub fn eval_logic(&self) -> Scalar {
        self.eval_value().logic_value()
    }

    /// Evaluate to a boolean: true iff the truth value is `1`.
    pub fn eval_bool(&self) -> bool {
        self.eval_logic().to_bool()
    }

    /// Evaluate to an integer, if the value converts.
    pub fn eval_int(&self) -> Option<i32> {
        self.eval_value().int_value()
    }

    /// Evaluate to a real, if the value converts.
    pub fn eval_real(&self) -> Option<f64> {
        self.eval_value().real_value()
    }

    /// Evaluate to a bit vector, optionally coerced into a requested type.
    pub fn eval_bitvector(&self, req: Option<ValueType>) -> BitVector {
        self.eval_value().bitvector_value(req)
    }

    /// The flattened left-hand-side leaf list. Nested concatenations are
    /// flattened into a single ordered list whose index 0 is the least
    /// significant element, regardless of the MSB-first source order.
    pub fn lhs_elems(&'a self) -> Vec<&'a Expr<'a>> {
        match self.kind {
            ExprKind::Concat(ref parts) => {
                let mut out = Vec::new();
                for p in parts.iter().rev() {
                    out.extend(p.lhs_elems());
                }
                out
            }
            _ => vec![self],
        }
    }

    /// The number of left-hand-side leaves.
    pub fn lhs_elem_num(&'a self) -> usize {
        self.lhs_elems().len()
    }

    /// The `pos`-th left-hand-side leaf; index 0 is the least significant.
    pub fn lhs_elem(&'a self, pos: usize) -> Option<&'a Expr<'a>> {
        self.lhs_elems().get(pos).copied()
    }

    /// Store a value through this expression as a left-hand side. Reports
    /// an internal error for nodes that cannot stand on a left-hand side;
    /// the driver rules those out during instantiation.
    pub fn assign_value(&'a self, v: &Value) -> Result<()> {
        match self.kind {
            ExprKind::Primary(ref t) => t.write(v),
            ExprKind::BitSelect {
                ref target,
                ref index,
            } => {
                let i = match *index {
                    BitIndex::Const(i) => Some(i),
                    BitIndex::Var(e) => e.eval_int(),
                };
                match i {
                    Some(i) => target.write_bitselect(i, v.scalar_value()),
                    None => Ok(()),
                }
            }
            ExprKind::PartSelect {
                ref target,
                ref mode,
            } => match mode.bounds(target.is_big_endian()) {
                Some((l, r)) => {
                    let width = crate::range::Range::implied(l, r).size();
                    target.write_partselect(
                        l,
                        r,
                        &v.bitvector_value(Some(ValueType::unsigned(width))),
                    )
                }
                None => Ok(()),
            },
            ExprKind::Concat(_) => {
                let elems = self.lhs_elems();
                let total: usize = elems.iter().map(|e| e.value_type().width()).sum();
                let bv = v.bitvector_value(Some(ValueType::unsigned(total)));
                let mut offset = 0;
                for e in elems {
                    let w = e.value_type().width();
                    e.assign_value(&Value::BitVec(bv.slice(offset, w)))?;
                    offset += w;
                }
                Ok(())
            }
            _ => Err(()),
        }
    }

    /// Regenerate source text for the expression.
    pub fn decompile(&self) -> String {
        use ast::Op::*;
        match self.kind {
            ExprKind::IntConst(v) => format!("{}", v),
            ExprKind::BitVecConst(ref bv) => format!("{}", bv),
            ExprKind::RealConst(v) => format!("{}", v),
            ExprKind::StringConst { ref text, .. } => format!("\"{}\"", text),
            ExprKind::Primary(ref t) => t.decompile(),
            ExprKind::ArgHandle(ref h) => format!("{}", h.name()),
            ExprKind::BitSelect {
                ref target,
                ref index,
            } => match *index {
                BitIndex::Const(i) => format!("{}[{}]", target.decompile(), i),
                BitIndex::Var(e) => format!("{}[{}]", target.decompile(), e.decompile()),
            },
            ExprKind::PartSelect {
                ref target,
                ref mode,
            } => match *mode {
                PartMode::Const { left, right } => {
                    format!("{}[{}:{}]", target.decompile(), left, right)
                }
                PartMode::Plus { base, width } => {
                    format!("{}[{} +: {}]", target.decompile(), base.decompile(), width)
                }
                PartMode::Minus { base, width } => {
                    format!("{}[{} -: {}]", target.decompile(), base.decompile(), width)
                }
            },
            ExprKind::Unary { op, opr } => match op {
                Posedge => format!("posedge {}", opr.decompile()),
                Negedge => format!("negedge {}", opr.decompile()),
                _ => format!("{}{}", op.as_str(), opr.decompile()),
            },
            ExprKind::Binary { op, lhs, rhs } => {
                format!("({} {} {})", lhs.decompile(), op.as_str(), rhs.decompile())
            }
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => format!(
                "({} ? {} : {})",
                cond.decompile(),
                then_expr.decompile(),
                else_expr.decompile()
            ),
            ExprKind::Concat(ref parts) => {
                format!("{{{}}}", parts.iter().map(|p| p.decompile()).format(", "))
            }
            ExprKind::MultiConcat { rep, ref parts } => format!(
                "{{{}{{{}}}}}",
                rep,
                parts.iter().map(|p| p.decompile()).format(", ")
            ),
            ExprKind::FuncCall { func, ref args } => format!(
                "{}({})",
                func.scope.name,
                args.iter().map(|a| a.decompile()).format(", ")
            ),
            ExprKind::SysFuncCall { name, ref args } => {
                if args.is_empty() {
                    format!("{}", name)
                } else {
                    format!("{}({})", name, args.iter().map(|a| a.decompile()).format(", "))
                }
            }
        }
    }
}

impl<'a> PartMode<'a> {
    /// Resolve the bound indices of the select, given the endianness of the
    /// target object. `None` if a variable base does not evaluate.
    pub fn bounds(&self, big_endian: bool) -> Option<(i32, i32)> {
        match *self {
            PartMode::Const { left, right } => Some((left, right)),
            PartMode::Plus { base, width } => {
                let b = base.eval_int()?;
                let w = width as i32;
                if big_endian {
                    Some((b + w - 1, b))
                } else {
                    Some((b, b + w - 1))
                }
            }
            PartMode::Minus { base, width } => {
                let b = base.eval_int()?;
                let w = width as i32;
                if big_endian {
                    Some((b, b - w + 1))
                } else {
                    Some((b - w + 1, b))
                }
            }
        }
    }
}

/// Merge a requested type into the current type of a node: the width grows
/// to the larger of the two, the requested signedness wins.
fn merge_req(cur: ValueType, req: ValueType) -> ValueType {
    match (cur.as_bitvector(), req.as_bitvector()) {
        (Some(c), Some(r)) => ValueType::BitVector {
            signed: r.is_signed(),
            sized: c.is_sized() || r.is_sized(),
            width: std::cmp::max(c.width(), r.width()),
        },
        _ => cur,
    }
}
