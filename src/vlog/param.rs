// Copyright (c) 2016-2021 Fabian Schuiki

//! Parameters.
//!
//! A parameter is a declaration-like entity that additionally carries its
//! initializer expression and the folded constant value. The effective value
//! type follows the case analysis of IEEE 1364 §3.11.1/§12.2: depending on
//! whether the declaration carried a type and/or a range, the declared parts
//! win and the rest is taken from the resolved value. A `defparam` or named
//! override substitutes a new right-hand side and re-runs exactly this
//! resolution; `localparam` is identical but immune to override.

use crate::crate_prelude::*;
use crate::decl::ObjKind;
use crate::range::Range;
use crate::scope::Scope;
use crate::ty::{self, ValueType};
use crate::value::Value;
use std::cell::RefCell;

/// The metadata shared by all parameters of one declaration statement.
#[derive(Debug)]
pub struct ParamHead<'a> {
    pub scope: &'a Scope<'a>,
    pub span: Span,
    /// The declared variable kind, e.g. `parameter integer N = 4;`.
    pub var_kind: Option<ast::VarKind>,
    pub signed: bool,
    pub range: Option<Range>,
    pub is_specparam: bool,
}

impl<'a> ParamHead<'a> {
    /// The declared part of the value type. [`ValueType::None`] if the
    /// declaration carried neither type nor range.
    pub fn value_type(&self) -> ValueType {
        match self.var_kind {
            Some(ast::VarKind::Integer) => ValueType::Integer,
            Some(ast::VarKind::Real) | Some(ast::VarKind::Realtime) => ValueType::Real,
            Some(ast::VarKind::Time) => ValueType::Time,
            None => match self.range {
                Some(r) => ValueType::BitVector {
                    signed: self.signed,
                    sized: true,
                    width: r.size(),
                },
                None => ValueType::None,
            },
        }
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    /// The LSB-relative offset of a bit index within the declared range.
    pub fn calc_bit_offset(&self, index: i32) -> Option<usize> {
        self.range.and_then(|r| r.offset(index))
    }
}

/// A parameter.
#[derive(Debug)]
pub struct Parameter<'a> {
    pub id: NodeId,
    pub head: &'a ParamHead<'a>,
    pub name: Name,
    pub span: Span,
    pub local: bool,
    /// The parse-tree expression of the current right-hand side. Replaced
    /// when an override is applied.
    expr: RefCell<Option<&'a ast::Expr>>,
    /// The folded value, coerced into the declared part of the type.
    value: RefCell<Value>,
}

impl<'a> Parameter<'a> {
    pub fn new(head: &'a ParamHead<'a>, name: Name, span: Span, local: bool) -> Parameter<'a> {
        Parameter {
            id: NodeId::alloc(),
            head,
            name,
            span,
            local,
            expr: RefCell::new(None),
            value: RefCell::new(Value::Error),
        }
    }

    /// The object kind of the parameter.
    pub fn kind(&self) -> ObjKind {
        if self.head.is_specparam {
            ObjKind::SpecParam
        } else {
            ObjKind::Parameter
        }
    }

    /// Whether this is a `localparam`, which no override may touch.
    pub fn is_local_param(&self) -> bool {
        self.local
    }

    /// The hierarchical name of the parameter.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.head.scope.full_name(), self.name)
    }

    /// Store a new right-hand side and its folded value. The value is
    /// coerced into the declared part of the type; used both for the
    /// initializer and for overrides.
    pub fn set_expr(&self, expr: &'a ast::Expr, value: Value) {
        *self.expr.borrow_mut() = Some(expr);
        *self.value.borrow_mut() = value.coerce(self.head.value_type());
    }

    /// The parse-tree expression of the current right-hand side.
    pub fn expr(&self) -> Option<&'a ast::Expr> {
        *self.expr.borrow()
    }

    /// The folded value of the parameter.
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Whether the parameter resolved to a signed type.
    pub fn is_signed(&self) -> bool {
        self.value_type().is_signed()
    }

    /// The resolved bit width.
    pub fn bit_size(&self) -> usize {
        self.value_type().width()
    }

    /// The effective range of the parameter: the declared one, or the
    /// implied `[size-1:0]` when only the value determines the width.
    pub fn range(&self) -> Option<Range> {
        match self.head.range {
            Some(r) => Some(r),
            None => match self.value_type() {
                ValueType::BitVector { width, .. } => Some(Range::implied(width as i32 - 1, 0)),
                ValueType::Integer => Some(Range::implied(ty::INTEGER_SIZE as i32 - 1, 0)),
                ValueType::Time => Some(Range::implied(ty::TIME_SIZE as i32 - 1, 0)),
                _ => None,
            },
        }
    }

    /// The LSB-relative offset of a bit index within the effective range.
    pub fn calc_bit_offset(&self, index: i32) -> Option<usize> {
        self.range().and_then(|r| r.offset(index))
    }

    /// The effective value type, resolved per IEEE 1364 §3.11.1:
    ///
    ///  - (A) no type, no range: the type of the resolved value, verbatim,
    ///    except that a signed-only declaration forces signedness over an
    ///    implied `[size-1:0]` range.
    ///  - (B) range but no type: unsigned, sized to the declared range.
    ///  - (C)/(D) explicit type: the declared type; absent a range the width
    ///    comes from the resolved value.
    ///  - (E) an unsized resolved value takes an implementation-defined
    ///    width of at least 32 bits; the natural width of the value already
    ///    satisfies this.
    pub fn value_type(&self) -> ValueType {
        let declared = self.head.value_type();
        let value = self.value.borrow();
        match declared {
            ValueType::None => {
                let vt = value.value_type();
                match vt {
                    ValueType::BitVector {
                        signed,
                        sized,
                        width,
                    } => ValueType::BitVector {
                        signed: signed || self.head.signed,
                        sized,
                        width,
                    },
                    ValueType::None => ValueType::None,
                    other => other,
                }
            }
            ValueType::BitVector { sized: true, .. } => declared,
            ValueType::BitVector { signed, .. } => {
                // declared signedness, width from the value
                let bv = value.bitvector_value(None);
                ValueType::BitVector {
                    signed,
                    sized: bv.is_sized(),
                    width: bv.size(),
                }
            }
            other => other,
        }
    }
}

/// The elaborated record of one parameter assignment: the original
/// initializer, a `#(...)` override, or a `defparam`.
#[derive(Debug)]
pub struct ParamAssign<'a> {
    pub span: Span,
    /// The module the assignment lives in.
    pub module: &'a Scope<'a>,
    pub param: &'a Parameter<'a>,
    pub rhs: &'a ast::Expr,
    /// True for the right-hand side written at the declaration itself.
    pub is_decl_assign: bool,
}

/// An elaborated `defparam` item.
#[derive(Debug)]
pub struct DefParam<'a> {
    pub span: Span,
    pub module: &'a Scope<'a>,
    pub param: &'a Parameter<'a>,
    pub rhs: &'a ast::Expr,
}
