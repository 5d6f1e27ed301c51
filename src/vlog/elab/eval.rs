// Copyright (c) 2016-2021 Fabian Schuiki

//! Constant folding over the parse tree.
//!
//! The `evaluate_*` family mirrors the expression instantiation logic, but
//! works over plain [`Value`]s instead of building expression nodes. It is
//! used wherever the grammar mandates a compile-time constant: parameter
//! initializers, declaration ranges, array dimensions, generate conditions,
//! and genvar arithmetic.

use crate::bitvec::BitVector;
use crate::crate_prelude::*;
use crate::elab::Elaborator;
use crate::param::Parameter;
use crate::scope::Scope;
use crate::value::{self, Scalar, Value};

impl<'a> Elaborator<'a> {
    /// Evaluate a constant expression to a value. Errors yield
    /// [`Value::Error`]; the diagnostic is emitted once if `put_error` is
    /// set.
    pub fn evaluate_expr(&self, scope: &'a Scope<'a>, pt: &'a ast::Expr, put_error: bool) -> Value {
        use ast::Op::*;
        match pt.data {
            ast::ParenExpr(ref inner) => self.evaluate_expr(scope, inner, put_error),
            ast::ConstExpr(ref c) => match *c {
                ast::ConstData::IntConst(v) => Value::Int(v as i32),
                ast::ConstData::SizedConst {
                    size,
                    signed,
                    base,
                    ref digits,
                } => Value::BitVec(BitVector::from_literal(Some(size), signed, base, digits)),
                ast::ConstData::BasedConst {
                    signed,
                    base,
                    ref digits,
                } => Value::BitVec(BitVector::from_literal(None, signed, base, digits)),
                ast::ConstData::RealConst(v) => Value::Real(v),
                ast::ConstData::StringConst(ref s) => Value::BitVec(BitVector::from_string(s)),
            },
            ast::UnaryExpr(op, ref pt_opr) => {
                let v = self.evaluate_expr(scope, pt_opr, put_error);
                match op {
                    Plus => v,
                    Minus => value::neg(&v),
                    LogicNot => value::log_not(&v),
                    BitNeg => self.check_real1(pt, &v, put_error, value::bit_negate),
                    RedAnd => self.check_real1(pt, &v, put_error, value::reduction_and),
                    RedNand => self.check_real1(pt, &v, put_error, value::reduction_nand),
                    RedOr => self.check_real1(pt, &v, put_error, value::reduction_or),
                    RedNor => self.check_real1(pt, &v, put_error, value::reduction_nor),
                    RedXor => self.check_real1(pt, &v, put_error, value::reduction_xor),
                    RedXnor => self.check_real1(pt, &v, put_error, value::reduction_xnor),
                    _ => {
                        if put_error {
                            self.emit(
                                DiagBuilder2::error(
                                    "edge expression shall not be used in a constant expression",
                                )
                                .span(pt.span),
                            );
                        }
                        Value::Error
                    }
                }
            }
            ast::BinaryExpr(op, ref pt_l, ref pt_r) => {
                let a = self.evaluate_expr(scope, pt_l, put_error);
                let b = self.evaluate_expr(scope, pt_r, put_error);
                match op {
                    Add => value::add(&a, &b),
                    Sub => value::sub(&a, &b),
                    Mul => value::mul(&a, &b),
                    Div => value::div(&a, &b),
                    Mod => self.check_real2(pt, &a, &b, put_error, value::rem),
                    Pow => value::power(&a, &b),
                    LogicAnd => value::log_and(&a, &b),
                    LogicOr => value::log_or(&a, &b),
                    BitAnd => self.check_real2(pt, &a, &b, put_error, value::bit_and),
                    BitOr => self.check_real2(pt, &a, &b, put_error, value::bit_or),
                    BitXor => self.check_real2(pt, &a, &b, put_error, value::bit_xor),
                    BitXnor => self.check_real2(pt, &a, &b, put_error, value::bit_xnor),
                    Eq => value::eq(&a, &b),
                    Neq => value::ne(&a, &b),
                    CaseEq => value::case_eq(&a, &b),
                    CaseNeq => value::case_ne(&a, &b),
                    Lt => value::lt(&a, &b),
                    Gt => value::gt(&a, &b),
                    Le => value::le(&a, &b),
                    Ge => value::ge(&a, &b),
                    Shl | Ashl => self.check_real2(pt, &a, &b, put_error, value::shl),
                    Shr => self.check_real2(pt, &a, &b, put_error, value::shr),
                    Ashr => self.check_real2(pt, &a, &b, put_error, value::ashr),
                    _ => Value::Error,
                }
            }
            ast::TernaryExpr(ref c, ref t, ref e) => value::ite(
                &self.evaluate_expr(scope, c, put_error),
                &self.evaluate_expr(scope, t, put_error),
                &self.evaluate_expr(scope, e, put_error),
            ),
            ast::ConcatExpr(ref parts) => {
                let vals: Vec<_> = parts
                    .iter()
                    .map(|p| self.evaluate_expr(scope, p, put_error))
                    .collect();
                value::concat(&vals)
            }
            ast::MultiConcatExpr(ref rep, ref parts) => {
                let rep = self.evaluate_expr(scope, rep, put_error);
                let vals: Vec<_> = parts
                    .iter()
                    .map(|p| self.evaluate_expr(scope, p, put_error))
                    .collect();
                value::multi_concat(&rep, &vals)
            }
            ast::PrimaryExpr(ref p) => self.evaluate_primary(scope, pt, p, put_error),
            ast::CallExpr(name, ref args) => {
                let func = match self.instantiate_constant_function_by_name(scope, pt.span, name) {
                    Some(f) => f,
                    None => return Value::Error,
                };
                let vals: Vec<_> = args
                    .iter()
                    .map(|a| self.evaluate_expr(scope, a, put_error))
                    .collect();
                if vals.iter().any(|v| v.is_error()) {
                    return Value::Error;
                }
                let result = func.eval_const_call(&vals);
                if result.is_error() && put_error {
                    self.emit(
                        DiagBuilder2::error(format!(
                            "`{}` did not evaluate to a constant",
                            name
                        ))
                        .span(pt.span),
                    );
                }
                result
            }
            ast::SysCallExpr(name, _) => {
                if put_error {
                    self.emit(
                        DiagBuilder2::error(format!(
                            "{} : system function call shall not be used in a constant expression",
                            name
                        ))
                        .span(pt.span),
                    );
                }
                Value::Error
            }
        }
    }

    /// Evaluate a constant primary: only genvars and parameters are legal.
    fn evaluate_primary(
        &self,
        scope: &'a Scope<'a>,
        pt: &'a ast::Expr,
        primary: &'a ast::Primary,
        put_error: bool,
    ) -> Value {
        if !primary.path.is_empty() {
            if put_error {
                self.emit(
                    DiagBuilder2::error(format!(
                        "{} : hierarchical name shall not be used in a constant expression",
                        primary.name
                    ))
                    .span(pt.span),
                );
            }
            return Value::Error;
        }
        let handle = match self.find_obj_up(scope, &[], primary.name, None) {
            Some(h) => h,
            None => {
                if put_error {
                    let _: Result<()> = self.error_not_found(pt.span, primary.name);
                }
                return Value::Error;
            }
        };
        if let Some(genvar) = handle.genvar() {
            if !primary.indices.is_empty() || primary.range_sel.is_some() {
                if put_error {
                    self.emit(
                        DiagBuilder2::error(format!("`{}` : dimension mismatch", primary.name))
                            .span(pt.span),
                    );
                }
                return Value::Error;
            }
            return Value::Int(genvar.value());
        }
        let param = match handle.parameter() {
            Some(p) => p,
            None => {
                if put_error {
                    self.emit(
                        DiagBuilder2::error(format!("`{}` is not a parameter", primary.name))
                            .span(pt.span),
                    );
                }
                return Value::Error;
            }
        };
        self.evaluate_param_select(scope, pt, primary, param, put_error)
    }

    /// Apply the selects of a constant primary to a parameter value.
    fn evaluate_param_select(
        &self,
        scope: &'a Scope<'a>,
        pt: &'a ast::Expr,
        primary: &'a ast::Primary,
        param: &'a Parameter<'a>,
        put_error: bool,
    ) -> Value {
        let mut isize = primary.indices.len();
        let has_range = primary.range_sel.is_some();
        let has_bit = isize == 1 && !has_range;
        if has_bit {
            isize -= 1;
        }
        if isize != 0 {
            if put_error {
                self.emit(
                    DiagBuilder2::error(format!("`{}` : dimension mismatch", primary.name))
                        .span(pt.span),
                );
            }
            return Value::Error;
        }
        if (has_bit || has_range) && param.value_type().is_real() {
            if put_error {
                self.emit(
                    DiagBuilder2::error(format!(
                        "`{}` : bit/part select on a real",
                        primary.name
                    ))
                    .span(pt.span),
                );
            }
            return Value::Error;
        }
        if has_bit {
            let index = match self.evaluate_int(scope, &primary.indices[0], put_error) {
                Some(i) => i,
                None => return Value::Error,
            };
            return match param.calc_bit_offset(index) {
                Some(off) => Value::Scalar(param.value().bitvector_value(None).get(off)),
                None => Value::Scalar(Scalar::X),
            };
        }
        if has_range {
            let rs = primary.range_sel.as_ref().unwrap();
            let left = match self.evaluate_int(scope, &rs.left, put_error) {
                Some(v) => v,
                None => return Value::Error,
            };
            let right = match self.evaluate_int(scope, &rs.right, put_error) {
                Some(v) => v,
                None => return Value::Error,
            };
            let big = param.range().map(|r| r.is_big_endian()).unwrap_or(true);
            let (l, r) = match rs.mode {
                ast::RangeMode::Colon => (left, right),
                ast::RangeMode::PlusColon => {
                    if big {
                        (left + right - 1, left)
                    } else {
                        (left, left + right - 1)
                    }
                }
                ast::RangeMode::MinusColon => {
                    if big {
                        (left, left - right + 1)
                    } else {
                        (left - right + 1, left)
                    }
                }
            };
            let width = crate::range::Range::implied(l, r).size();
            let lsb = if big {
                std::cmp::min(l, r)
            } else {
                std::cmp::max(l, r)
            };
            return match param.calc_bit_offset(lsb) {
                Some(off) => Value::BitVec(param.value().bitvector_value(None).slice(off, width)),
                None => Value::BitVec(BitVector::filled_x(width)),
            };
        }
        param.value()
    }

    /// Evaluate a constant expression to an integer.
    pub fn evaluate_int(
        &self,
        scope: &'a Scope<'a>,
        pt: &'a ast::Expr,
        put_error: bool,
    ) -> Option<i32> {
        let v = self.evaluate_expr(scope, pt, put_error);
        match v.int_value() {
            Some(i) => Some(i),
            None => {
                if put_error && !v.is_error() {
                    self.emit(
                        DiagBuilder2::error("integer value required").span(pt.span),
                    );
                }
                None
            }
        }
    }

    /// Evaluate a constant expression to a scalar.
    pub fn evaluate_scalar(
        &self,
        scope: &'a Scope<'a>,
        pt: &'a ast::Expr,
        put_error: bool,
    ) -> Option<Scalar> {
        let v = self.evaluate_expr(scope, pt, put_error);
        if v.is_error() {
            None
        } else {
            Some(v.scalar_value())
        }
    }

    /// Evaluate a constant expression to a boolean truth value.
    pub fn evaluate_bool(
        &self,
        scope: &'a Scope<'a>,
        pt: &'a ast::Expr,
        put_error: bool,
    ) -> Option<bool> {
        let v = self.evaluate_expr(scope, pt, put_error);
        if v.is_error() {
            None
        } else {
            Some(v.logic_value().to_bool())
        }
    }

    /// Evaluate a constant expression to a bit vector.
    pub fn evaluate_bitvector(
        &self,
        scope: &'a Scope<'a>,
        pt: &'a ast::Expr,
        put_error: bool,
    ) -> Option<BitVector> {
        let v = self.evaluate_expr(scope, pt, put_error);
        if !v.is_bitvector_conv() {
            if put_error && !v.is_error() {
                self.emit(DiagBuilder2::error("bit vector value required").span(pt.span));
            }
            None
        } else {
            Some(v.bitvector_value(None))
        }
    }

    fn check_real1<F>(&self, pt: &ast::Expr, v: &Value, put_error: bool, f: F) -> Value
    where
        F: FnOnce(&Value) -> Value,
    {
        if v.is_real() {
            if put_error {
                self.emit(
                    DiagBuilder2::error("real operand is not allowed here").span(pt.span),
                );
            }
            return Value::Error;
        }
        f(v)
    }

    fn check_real2<F>(&self, pt: &ast::Expr, a: &Value, b: &Value, put_error: bool, f: F) -> Value
    where
        F: FnOnce(&Value, &Value) -> Value,
    {
        if a.is_real() || b.is_real() {
            if put_error {
                self.emit(
                    DiagBuilder2::error("real operand is not allowed here").span(pt.span),
                );
            }
            return Value::Error;
        }
        f(a, b)
    }
}
