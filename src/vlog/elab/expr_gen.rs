// Copyright (c) 2016-2021 Fabian Schuiki

//! Expression instantiation.
//!
//! The entry points mirror the grammar positions an expression can stand in:
//! plain expressions, event expressions, system task/function arguments,
//! left-hand sides, right-hand sides (which push the left-hand type down
//! into the new expression), constant expressions, and named events. All of
//! them report their diagnostics once and return `Err` without further
//! noise; out-of-range selects are value-level warnings and never fail
//! elaboration.

use crate::crate_prelude::*;
use crate::decl::{Decl, DeclArray, DeclHead, DeclKind, ObjKind};
use crate::elab::Elaborator;
use crate::env::ElbEnv;
use crate::expr::{BitIndex, Delay, Expr, PartMode, SelTarget};
use crate::param::Parameter;
use crate::scope::{ObjHandle, Scope};

/// The outcome of select resolution on a primary: which select forms the
/// parse tree carried, and their elaborated index expressions.
struct ResolvedSel<'a> {
    has_bit_select: bool,
    has_range_select: bool,
    index1: Option<&'a Expr<'a>>,
    index2: Option<&'a Expr<'a>>,
}

impl<'a> Elaborator<'a> {
    /// Instantiate an expression.
    pub fn instantiate_expr(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        let pt_expr = strip_parens(pt_expr);
        match pt_expr.data {
            ast::ConstExpr(ref c) => Ok(self.instantiate_const(pt_expr, c)),
            ast::PrimaryExpr(ref p) => self.instantiate_primary(scope, env, pt_expr, p),
            ast::UnaryExpr(op, ref opr) => self.instantiate_unary(scope, env, pt_expr, op, opr),
            ast::BinaryExpr(op, ref l, ref r) => {
                self.instantiate_binary(scope, env, pt_expr, op, l, r)
            }
            ast::TernaryExpr(ref c, ref t, ref e) => {
                let cond = self.instantiate_expr(scope, env, c)?;
                let t = self.instantiate_expr(scope, env, t)?;
                let e = self.instantiate_expr(scope, env, e)?;
                Ok(&*self
                    .arena
                    .exprs
                    .alloc(Expr::new_ternary(pt_expr.span, cond, t, e)))
            }
            ast::ConcatExpr(ref parts) => {
                let mut elems = Vec::with_capacity(parts.len());
                for p in parts {
                    let e = self.instantiate_expr(scope, env, p)?;
                    if e.value_type().is_real() {
                        return self.error_illegal_real(pt_expr.span, "concatenation");
                    }
                    elems.push(e);
                }
                Ok(&*self.arena.exprs.alloc(Expr::new_concat(pt_expr.span, elems)))
            }
            ast::MultiConcatExpr(ref rep, ref parts) => {
                // the repetition count must be a constant
                let rep_val = match self.evaluate_int(scope, rep, true) {
                    Some(v) if v >= 0 => v as u32,
                    _ => return Err(()),
                };
                let mut elems = Vec::with_capacity(parts.len());
                for p in parts {
                    let e = self.instantiate_expr(scope, env, p)?;
                    if e.value_type().is_real() {
                        return self.error_illegal_real(pt_expr.span, "concatenation");
                    }
                    elems.push(e);
                }
                Ok(&*self
                    .arena
                    .exprs
                    .alloc(Expr::new_multi_concat(pt_expr.span, rep_val, elems)))
            }
            ast::CallExpr(name, ref args) => {
                self.instantiate_funccall(scope, env, pt_expr, name, args)
            }
            ast::SysCallExpr(name, ref args) => {
                if env.inside_constant_function() {
                    self.emit(
                        DiagBuilder2::error(format!(
                            "{} : system function call shall not be used in a constant function",
                            name
                        ))
                        .span(pt_expr.span),
                    );
                    return Err(());
                }
                if env.is_constant() {
                    self.emit(
                        DiagBuilder2::error(format!(
                            "{} : system function call shall not be used in a constant expression",
                            name
                        ))
                        .span(pt_expr.span),
                    );
                    return Err(());
                }
                let mut elems = Vec::with_capacity(args.len());
                for a in args {
                    elems.push(self.instantiate_arg(scope, env, a)?);
                }
                Ok(&*self
                    .arena
                    .exprs
                    .alloc(Expr::new_sys_func_call(pt_expr.span, name, elems)))
            }
            ast::ParenExpr(_) => unreachable!(),
        }
    }

    /// Instantiate a constant expression.
    pub fn instantiate_constant_expr(
        &self,
        scope: &'a Scope<'a>,
        pt_expr: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        self.instantiate_expr(scope, ElbEnv::constant(), pt_expr)
    }

    /// Instantiate an event expression. Only here may `posedge`/`negedge`
    /// appear, and only here may a named event be referenced.
    pub fn instantiate_event_expr(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        let pt_expr = strip_parens(pt_expr);
        match pt_expr.data {
            ast::UnaryExpr(op @ ast::Op::Posedge, ref opr)
            | ast::UnaryExpr(op @ ast::Op::Negedge, ref opr) => {
                let opr = self.instantiate_expr(scope, env, opr)?;
                Ok(&*self.arena.exprs.alloc(Expr::new_unary(pt_expr.span, op, opr)))
            }
            ast::PrimaryExpr(ref p) => {
                // on top of the usual identifiers, named events are valid
                self.instantiate_primary(scope, env.event_expr(), pt_expr, p)
            }
            ast::ConstExpr(_) => {
                self.emit(
                    DiagBuilder2::error("constant shall not be used in an event description")
                        .span(pt_expr.span),
                );
                Err(())
            }
            ast::CallExpr(..) | ast::SysCallExpr(..) => {
                self.emit(
                    DiagBuilder2::error("function call shall not be used in an event description")
                        .span(pt_expr.span),
                );
                Err(())
            }
            _ => self.instantiate_expr(scope, env, pt_expr),
        }
    }

    /// Instantiate a system task/function argument. Scope and task/function
    /// names are valid arguments here.
    pub fn instantiate_arg(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        let pt_expr = strip_parens(pt_expr);
        match pt_expr.data {
            ast::PrimaryExpr(ref p) => {
                self.instantiate_primary(scope, env.system_tf_arg(), pt_expr, p)
            }
            _ => self.instantiate_expr(scope, env, pt_expr),
        }
    }

    /// Instantiate a left-hand side. Only primaries and concatenations of
    /// left-hand sides are acceptable.
    pub fn instantiate_lhs(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        match pt_expr.data {
            ast::ConcatExpr(ref parts) => {
                let mut elems = Vec::with_capacity(parts.len());
                for p in parts {
                    elems.push(self.instantiate_lhs(scope, env, p)?);
                }
                let expr = &*self.arena.exprs.alloc(Expr::new_concat(pt_expr.span, elems));
                expr.set_selfsize();
                Ok(expr)
            }
            ast::PrimaryExpr(ref p) => self.instantiate_lhs_primary(scope, env, pt_expr, p),
            ast::ConstExpr(_) => {
                self.emit(
                    DiagBuilder2::error("constant shall not be used in LHS").span(pt_expr.span),
                );
                Err(())
            }
            ast::CallExpr(..) | ast::SysCallExpr(..) => {
                self.emit(
                    DiagBuilder2::error("function call shall not be used in LHS")
                        .span(pt_expr.span),
                );
                Err(())
            }
            _ => {
                self.emit(DiagBuilder2::error("illegal operator in LHS").span(pt_expr.span));
                Err(())
            }
        }
    }

    /// Instantiate a right-hand side: the left-hand type is pushed down into
    /// the fresh expression so it evaluates at the assignment width.
    pub fn instantiate_rhs(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        lhs: &'a Expr<'a>,
    ) -> Result<&'a Expr<'a>> {
        let expr = self.instantiate_expr(scope, env, pt_expr)?;
        expr.set_reqsize(lhs.value_type());
        Ok(expr)
    }

    /// Instantiate a primary that must be a named event.
    pub fn instantiate_namedevent(
        &self,
        scope: &'a Scope<'a>,
        pt_expr: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        let primary = match pt_expr.data {
            ast::PrimaryExpr(ref p) => p,
            _ => return Err(()),
        };
        let handle = match self.find_obj_up(scope, &primary.path, primary.name, None) {
            Some(h) => h,
            None => return self.error_not_found(pt_expr.span, primary.name),
        };
        if let Some(decl) = handle.decl() {
            if decl.kind() == ObjKind::NamedEvent {
                let sel = self.resolve1(scope, primary, pt_expr.span, false, None, false)?;
                if sel.has_bit_select || sel.has_range_select {
                    return self.error_dimension_mismatch(pt_expr.span, primary.name);
                }
                return Ok(&*self
                    .arena
                    .exprs
                    .alloc(Expr::new_primary(pt_expr.span, SelTarget::Decl(decl))));
            }
        }
        if let Some(arr) = handle.decl_array() {
            if arr.elem_kind() == ObjKind::NamedEvent {
                let (indices, sel) =
                    self.resolve2(scope, primary, pt_expr.span, arr, false, None, false)?;
                if sel.has_bit_select {
                    // a named event has no bits to select
                    return self.error_dimension_mismatch(pt_expr.span, primary.name);
                }
                return Ok(&*self.arena.exprs.alloc(Expr::new_primary(
                    pt_expr.span,
                    SelTarget::Array {
                        array: arr,
                        indices,
                    },
                )));
            }
        }
        self.emit(
            DiagBuilder2::error(format!("`{}` is not a named event", primary.name))
                .span(pt_expr.span),
        );
        Err(())
    }

    /// Instantiate a delay control.
    pub fn instantiate_delay(
        &self,
        scope: &'a Scope<'a>,
        pt_delay: &'a ast::Delay,
    ) -> Result<&'a Delay<'a>> {
        let env = ElbEnv::default();
        let mut exprs = Vec::with_capacity(pt_delay.values.len());
        for pt in pt_delay.values.iter().take(3) {
            exprs.push(self.instantiate_expr(scope, env, pt)?);
        }
        Ok(&*self.arena.delays.alloc(Delay {
            span: pt_delay.span,
            exprs,
        }))
    }

    fn instantiate_const(&self, pt_expr: &'a ast::Expr, c: &ast::ConstData) -> &'a Expr<'a> {
        use crate::bitvec::BitVector;
        let expr = match *c {
            ast::ConstData::IntConst(v) => Expr::new_int_const(pt_expr.span, v as i32),
            ast::ConstData::SizedConst {
                size,
                signed,
                base,
                ref digits,
            } => Expr::new_bitvec_const(
                pt_expr.span,
                BitVector::from_literal(Some(size), signed, base, digits),
            ),
            ast::ConstData::BasedConst {
                signed,
                base,
                ref digits,
            } => Expr::new_bitvec_const(
                pt_expr.span,
                BitVector::from_literal(None, signed, base, digits),
            ),
            ast::ConstData::RealConst(v) => Expr::new_real_const(pt_expr.span, v),
            ast::ConstData::StringConst(ref s) => {
                Expr::new_string_const(pt_expr.span, s.clone())
            }
        };
        &*self.arena.exprs.alloc(expr)
    }

    fn instantiate_unary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        op: ast::Op,
        pt_opr: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        use ast::Op::*;
        let opr = self.instantiate_expr(scope, env, pt_opr)?;
        match op {
            BitNeg | RedAnd | RedNand | RedOr | RedNor | RedXor | RedXnor => {
                if opr.value_type().is_real() {
                    return self.error_illegal_real(pt_expr.span, op.as_str());
                }
            }
            Posedge | Negedge => {
                self.emit(
                    DiagBuilder2::error("edge expression shall only appear in event descriptions")
                        .span(pt_expr.span),
                );
                return Err(());
            }
            _ => (),
        }
        Ok(&*self.arena.exprs.alloc(Expr::new_unary(pt_expr.span, op, opr)))
    }

    fn instantiate_binary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        op: ast::Op,
        pt_lhs: &'a ast::Expr,
        pt_rhs: &'a ast::Expr,
    ) -> Result<&'a Expr<'a>> {
        use ast::Op::*;
        let lhs = self.instantiate_expr(scope, env, pt_lhs)?;
        let rhs = self.instantiate_expr(scope, env, pt_rhs)?;
        match op {
            BitAnd | BitOr | BitXor | BitXnor | Shl | Shr | Ashl | Ashr | Mod => {
                if lhs.value_type().is_real() || rhs.value_type().is_real() {
                    return self.error_illegal_real(pt_expr.span, op.as_str());
                }
            }
            _ => (),
        }
        Ok(&*self
            .arena
            .exprs
            .alloc(Expr::new_binary(pt_expr.span, op, lhs, rhs)))
    }

    /// Instantiate a function call. Inside a constant expression or constant
    /// function, the callee must itself elaborate as a constant function.
    fn instantiate_funccall(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        name: Name,
        pt_args: &'a [ast::Expr],
    ) -> Result<&'a Expr<'a>> {
        let func = if env.is_constant() || env.inside_constant_function() {
            match self.instantiate_constant_function_by_name(scope, pt_expr.span, name) {
                Some(f) => f,
                None => return Err(()),
            }
        } else {
            let handle = match self.find_obj_up(scope, &[], name, None) {
                Some(h) => h,
                None => return self.error_not_found(pt_expr.span, name),
            };
            match handle.taskfunc() {
                Some(tf) if tf.is_function() => tf,
                _ => {
                    self.emit(
                        DiagBuilder2::error(format!("`{}` is not a function", name))
                            .span(pt_expr.span),
                    );
                    return Err(());
                }
            }
        };

        let inputs = func.inputs();
        if inputs.len() != pt_args.len() {
            self.emit(
                DiagBuilder2::error(format!(
                    "`{}` expects {} arguments, got {}",
                    name,
                    inputs.len(),
                    pt_args.len()
                ))
                .span(pt_expr.span),
            );
            return Err(());
        }
        let mut args = Vec::with_capacity(pt_args.len());
        for (pt_arg, input) in pt_args.iter().zip(inputs.iter()) {
            let arg = self.instantiate_expr(scope, env, pt_arg)?;
            // arguments are evaluated at the width of the formal input
            arg.set_reqsize(input.value_type());
            args.push(arg);
        }
        Ok(&*self
            .arena
            .exprs
            .alloc(Expr::new_func_call(pt_expr.span, func, args)))
    }

    /// Instantiate a primary expression, dispatching on the environment.
    fn instantiate_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
    ) -> Result<&'a Expr<'a>> {
        if env.is_constant() {
            self.instantiate_const_primary(scope, env, pt_expr, primary)
        } else if env.inside_constant_function() {
            self.instantiate_cf_primary(scope, env, pt_expr, primary)
        } else {
            self.instantiate_normal_primary(scope, env, pt_expr, primary)
        }
    }

    /// A primary inside a constant expression: only genvars and parameters
    /// are acceptable, and the name must be simple.
    fn instantiate_const_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
    ) -> Result<&'a Expr<'a>> {
        if !primary.path.is_empty() {
            self.emit(
                DiagBuilder2::error(format!(
                    "{} : hierarchical name shall not be used in a constant expression",
                    primary.name
                ))
                .span(pt_expr.span),
            );
            return Err(());
        }
        let module = scope.parent_module();
        let handle = match self.find_obj_up(scope, &[], primary.name, Some(module)) {
            Some(h) => h,
            None => return self.error_not_found(pt_expr.span, primary.name),
        };
        if let Some(genvar) = handle.genvar() {
            return self.instantiate_genvar(pt_expr, primary, genvar.value());
        }
        match handle.parameter() {
            Some(param) => self.instantiate_param_primary(scope, env, pt_expr, primary, param),
            None => {
                self.emit(
                    DiagBuilder2::error(format!("`{}` is not a parameter", primary.name))
                        .span(pt_expr.span),
                );
                Err(())
            }
        }
    }

    /// A primary inside a constant function body: names resolve within the
    /// function first, then to parameters/genvars of the enclosing module.
    fn instantiate_cf_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
    ) -> Result<&'a Expr<'a>> {
        if !primary.path.is_empty() {
            self.emit(
                DiagBuilder2::error(format!(
                    "{} : hierarchical name shall not be used inside a constant function",
                    primary.name
                ))
                .span(pt_expr.span),
            );
            return Err(());
        }
        let func = env.taskfunc().expect("constant function environment");
        if let Some(handle) = self.find_obj_up(scope, &[], primary.name, Some(func.scope)) {
            if let Some(decl) = handle.decl() {
                return self.instantiate_decl_primary(scope, env, pt_expr, primary, decl);
            }
            if let Some(arr) = handle.decl_array() {
                return self.instantiate_array_primary(scope, env, pt_expr, primary, arr);
            }
            if let Some(param) = handle.parameter() {
                return self.instantiate_param_primary(scope, env, pt_expr, primary, param);
            }
            self.emit(
                DiagBuilder2::error(format!(
                    "`{}` : illegal object inside a constant function",
                    primary.name
                ))
                .span(pt_expr.span),
            );
            return Err(());
        }
        // not inside the function: the enclosing module may provide a
        // genvar or parameter
        let module = scope.parent_module();
        let handle = match self.find_obj_up(module, &[], primary.name, Some(module)) {
            Some(h) => h,
            None => return self.error_not_found(pt_expr.span, primary.name),
        };
        if let Some(genvar) = handle.genvar() {
            return self.instantiate_genvar(pt_expr, primary, genvar.value());
        }
        match handle.parameter() {
            Some(param) => self.instantiate_param_primary(scope, env, pt_expr, primary, param),
            None => {
                self.emit(
                    DiagBuilder2::error(format!("`{}` is not a parameter", primary.name))
                        .span(pt_expr.span),
                );
                Err(())
            }
        }
    }

    /// An ordinary primary.
    fn instantiate_normal_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
    ) -> Result<&'a Expr<'a>> {
        let handle = match self.find_obj_up(scope, &primary.path, primary.name, None) {
            Some(h) => Some(h),
            None => self.declare_implicit_net(scope, pt_expr, primary)?,
        };
        let handle = match handle {
            Some(h) => h,
            None => return self.error_not_found(pt_expr.span, primary.name),
        };

        if let Some(genvar) = handle.genvar() {
            return self.instantiate_genvar(pt_expr, primary, genvar.value());
        }

        if env.is_system_tf_arg() && primary.indices.is_empty() && primary.range_sel.is_none() {
            // scopes, tasks and functions may be named as system tf args
            match handle {
                ObjHandle::Scope(_) | ObjHandle::TaskFunc(_) => {
                    return Ok(&*self
                        .arena
                        .exprs
                        .alloc(Expr::new_arg_handle(pt_expr.span, handle)));
                }
                _ => (),
            }
        }

        if let Some(decl) = handle.decl() {
            return self.instantiate_decl_primary(scope, env, pt_expr, primary, decl);
        }
        if let Some(arr) = handle.decl_array() {
            return self.instantiate_array_primary(scope, env, pt_expr, primary, arr);
        }
        if let Some(param) = handle.parameter() {
            return self.instantiate_param_primary(scope, env, pt_expr, primary, param);
        }
        self.error_illegal_object(pt_expr.span, primary.name)
    }

    /// A primary on a left-hand side. The acceptable object kinds depend on
    /// the assignment form the environment records.
    fn instantiate_lhs_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
    ) -> Result<&'a Expr<'a>> {
        let handle = if env.inside_constant_function() {
            if !primary.path.is_empty() {
                self.emit(
                    DiagBuilder2::error(format!(
                        "{} : hierarchical name shall not be used inside a constant function",
                        primary.name
                    ))
                    .span(pt_expr.span),
                );
                return Err(());
            }
            let func = env.taskfunc().expect("constant function environment");
            match self.find_obj_up(scope, &[], primary.name, Some(func.scope)) {
                Some(h) => h,
                None => return self.error_not_found(pt_expr.span, primary.name),
            }
        } else {
            match self.find_obj_up(scope, &primary.path, primary.name, None) {
                Some(h) => h,
                None => match self.declare_implicit_net(scope, pt_expr, primary)? {
                    Some(h) => h,
                    None => return self.error_not_found(pt_expr.span, primary.name),
                },
            }
        };

        if let Some(decl) = handle.decl() {
            let sel = self.resolve1(
                scope,
                primary,
                pt_expr.span,
                decl.value_type().is_real(),
                env.taskfunc().filter(|_| env.inside_constant_function()),
                primary.const_index,
            )?;
            let has_select = sel.has_bit_select || sel.has_range_select;
            let kind = decl.kind();
            if env.is_net_lhs() && kind != ObjKind::Net {
                return self.error_illegal_object(pt_expr.span, primary.name);
            }
            if env.is_var_lhs() && !is_variable_kind(kind) {
                return self.error_illegal_object(pt_expr.span, primary.name);
            }
            if env.is_pca_lhs() {
                if !is_variable_kind(kind) {
                    return self.error_illegal_object(pt_expr.span, primary.name);
                }
                if has_select {
                    self.emit(
                        DiagBuilder2::error(
                            "bit/part select shall not be used in LHS of assign/deassign",
                        )
                        .span(pt_expr.span),
                    );
                    return Err(());
                }
            }
            if env.is_force_lhs() {
                if kind != ObjKind::Net && !is_variable_kind(kind) {
                    return self.error_illegal_object(pt_expr.span, primary.name);
                }
                if has_select {
                    self.emit(
                        DiagBuilder2::error(
                            "bit/part select shall not be used in LHS of force/release",
                        )
                        .span(pt_expr.span),
                    );
                    return Err(());
                }
            }
            return self.build_decl_select(pt_expr, primary, SelTarget::Decl(decl), sel);
        }

        if let Some(arr) = handle.decl_array() {
            if env.is_pca_lhs() {
                self.emit(
                    DiagBuilder2::error(
                        "array element shall not be used in LHS of assign/deassign",
                    )
                    .span(pt_expr.span),
                );
                return Err(());
            }
            if env.is_force_lhs() {
                self.emit(
                    DiagBuilder2::error("array element shall not be used in LHS of force/release")
                        .span(pt_expr.span),
                );
                return Err(());
            }
            let kind = arr.elem_kind();
            if env.is_net_lhs() && kind != ObjKind::Net {
                return self.error_illegal_object(pt_expr.span, primary.name);
            }
            if env.is_var_lhs() && !is_variable_kind(kind) {
                return self.error_illegal_object(pt_expr.span, primary.name);
            }
            return self.instantiate_array_primary(scope, env, pt_expr, primary, arr);
        }

        self.error_illegal_object(pt_expr.span, primary.name)
    }

    /// Build the primary/select expression for a scalar declaration.
    fn instantiate_decl_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
        decl: &'a Decl<'a>,
    ) -> Result<&'a Expr<'a>> {
        let sel = self.resolve1(
            scope,
            primary,
            pt_expr.span,
            decl.value_type().is_real(),
            env.taskfunc().filter(|_| env.inside_constant_function()),
            primary.const_index,
        )?;
        let has_select = sel.has_bit_select || sel.has_range_select;
        if !env.is_valid_primary(decl.kind(), has_select) {
            return self.error_illegal_object(pt_expr.span, primary.name);
        }
        self.build_decl_select(pt_expr, primary, SelTarget::Decl(decl), sel)
    }

    /// Build the primary/select expression for an array element.
    fn instantiate_array_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
        arr: &'a DeclArray<'a>,
    ) -> Result<&'a Expr<'a>> {
        let (indices, sel) = self.resolve2(
            scope,
            primary,
            pt_expr.span,
            arr,
            arr.value_type().is_real(),
            env.taskfunc().filter(|_| env.inside_constant_function()),
            primary.const_index,
        )?;
        let has_select = sel.has_bit_select || sel.has_range_select;
        if !env.is_valid_primary(arr.elem_kind(), has_select) {
            return self.error_illegal_object(pt_expr.span, primary.name);
        }
        self.build_decl_select(
            pt_expr,
            primary,
            SelTarget::Array {
                array: arr,
                indices,
            },
            sel,
        )
    }

    /// Build the primary/select expression for a parameter reference.
    fn instantiate_param_primary(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
        param: &'a Parameter<'a>,
    ) -> Result<&'a Expr<'a>> {
        let sel = self.resolve1(
            scope,
            primary,
            pt_expr.span,
            param.value_type().is_real(),
            env.taskfunc().filter(|_| env.inside_constant_function()),
            true,
        )?;
        let has_select = sel.has_bit_select || sel.has_range_select;
        if !env.is_valid_primary(param.kind(), has_select) {
            return self.error_illegal_object(pt_expr.span, primary.name);
        }
        self.build_decl_select(pt_expr, primary, SelTarget::Param(param), sel)
    }

    /// A genvar reference becomes a plain integer constant.
    fn instantiate_genvar(
        &self,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
        value: i32,
    ) -> Result<&'a Expr<'a>> {
        if !primary.indices.is_empty() || primary.range_sel.is_some() {
            // a genvar is not an array
            return self.error_dimension_mismatch(pt_expr.span, primary.name);
        }
        Ok(&*self
            .arena
            .exprs
            .alloc(Expr::new_int_const(pt_expr.span, value)))
    }

    /// Synthesize the implicit one bit net an undeclared simple identifier
    /// stands for, if the module's default net type allows it.
    fn declare_implicit_net(
        &self,
        scope: &'a Scope<'a>,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
    ) -> Result<Option<ObjHandle<'a>>> {
        let module = scope.parent_module();
        let def_nettype = match module.def_net_type() {
            Some(nt) => nt,
            None => return Ok(None),
        };
        if !primary.is_simple() {
            return Ok(None);
        }
        let head = &*self.arena.decl_heads.alloc(DeclHead {
            scope: module,
            span: pt_expr.span,
            kind: DeclKind::Net(def_nettype),
            signed: false,
            range: None,
            strength: None,
            delay: Default::default(),
        });
        let net = &*self
            .arena
            .decls
            .alloc(Decl::new(head, primary.name, pt_expr.span));
        self.register(module, ObjHandle::Decl(net));
        Ok(self.find_obj(module, primary.name))
    }

    /// Turn the resolved select information into the final expression node,
    /// warning about statically out-of-range selects.
    fn build_decl_select(
        &self,
        pt_expr: &'a ast::Expr,
        primary: &'a ast::Primary,
        target: SelTarget<'a>,
        sel: ResolvedSel<'a>,
    ) -> Result<&'a Expr<'a>> {
        if sel.has_bit_select {
            let index_expr = sel.index1.unwrap();
            let index = if index_expr.is_const() {
                match index_expr.eval_int() {
                    Some(i) => {
                        self.warn_select_range(pt_expr.span, primary.name, &target, i, i);
                        BitIndex::Const(i)
                    }
                    None => BitIndex::Var(index_expr),
                }
            } else {
                BitIndex::Var(index_expr)
            };
            return Ok(&*self
                .arena
                .exprs
                .alloc(Expr::new_bitselect(pt_expr.span, target, index)));
        }
        if sel.has_range_select {
            let mode = primary.range_sel.as_ref().unwrap().mode;
            let index1 = sel.index1.unwrap();
            let index2 = sel.index2.unwrap();
            let part = match mode {
                ast::RangeMode::Colon => {
                    let left = self.expr_to_int(index1)?;
                    let right = self.expr_to_int(index2)?;
                    // the select direction must match the declared range
                    let big = left >= right;
                    if left != right && big != target.is_big_endian() {
                        self.emit(
                            DiagBuilder2::error(format!(
                                "{} : part select direction conflicts with the declared range",
                                primary.name
                            ))
                            .span(pt_expr.span),
                        );
                        return Err(());
                    }
                    self.warn_select_range(pt_expr.span, primary.name, &target, left, right);
                    PartMode::Const { left, right }
                }
                ast::RangeMode::PlusColon | ast::RangeMode::MinusColon => {
                    let width = self.expr_to_int(index2)?;
                    if width < 0 {
                        self.emit(
                            DiagBuilder2::error(format!(
                                "{} : width of an indexed part select must be positive",
                                primary.name
                            ))
                            .span(pt_expr.span),
                        );
                        return Err(());
                    }
                    if mode == ast::RangeMode::PlusColon {
                        PartMode::Plus {
                            base: index1,
                            width: width as u32,
                        }
                    } else {
                        PartMode::Minus {
                            base: index1,
                            width: width as u32,
                        }
                    }
                }
            };
            return Ok(&*self
                .arena
                .exprs
                .alloc(Expr::new_partselect(pt_expr.span, target, part)));
        }
        Ok(&*self.arena.exprs.alloc(Expr::new_primary(pt_expr.span, target)))
    }

    /// Warn when a constant select falls outside the declared range. The
    /// expression is still created; reads through it yield `X`.
    fn warn_select_range(
        &self,
        span: Span,
        name: Name,
        target: &SelTarget<'a>,
        left: i32,
        right: i32,
    ) {
        let range = match *target {
            SelTarget::Decl(d) => d.head.implied_range(),
            SelTarget::Array { array, .. } => array.head.implied_range(),
            SelTarget::Param(p) => p.range(),
        };
        if let Some(r) = range {
            if !r.contains(left) || !r.contains(right) {
                self.emit(
                    DiagBuilder2::warning(format!(
                        "select on `{}` lies outside the declared range {}; it will read as X",
                        name, r
                    ))
                    .span(span),
                );
            }
        }
    }

    /// Resolve the select parts of a primary on a non-array object: an
    /// index list of length one without a range select is a bit select,
    /// anything longer is a dimension mismatch.
    fn resolve1(
        &self,
        scope: &'a Scope<'a>,
        primary: &'a ast::Primary,
        span: Span,
        target_is_real: bool,
        cf: Option<&'a crate::taskfunc::TaskFunc<'a>>,
        const_mode: bool,
    ) -> Result<ResolvedSel<'a>> {
        let mut isize = primary.indices.len();
        let has_range_select = primary.range_sel.is_some();
        let mut has_bit_select = false;
        if isize == 1 && !has_range_select {
            has_bit_select = true;
            isize -= 1;
        }
        if isize != 0 {
            return self.error_dimension_mismatch(span, primary.name);
        }
        let mut sel = ResolvedSel {
            has_bit_select,
            has_range_select,
            index1: None,
            index2: None,
        };
        if has_bit_select {
            if target_is_real {
                return self.error_select_for_real(span, primary.name);
            }
            sel.index1 = Some(self.instantiate_index(
                scope,
                &primary.indices[0],
                const_mode || primary.const_index,
                cf,
            )?);
        } else if has_range_select {
            if target_is_real {
                return self.error_select_for_real(span, primary.name);
            }
            let rs = primary.range_sel.as_ref().unwrap();
            let left_const = const_mode || rs.mode == ast::RangeMode::Colon;
            sel.index1 = Some(self.instantiate_index(scope, &rs.left, left_const, cf)?);
            // the second bound of a range select is always constant
            sel.index2 = Some(self.instantiate_constant_expr(scope, &rs.right)?);
        }
        Ok(sel)
    }

    /// Resolve the indices and select parts of a primary on an array: the
    /// index list must cover all dimensions, plus one trailing bit select
    /// when no range select is present.
    fn resolve2(
        &self,
        scope: &'a Scope<'a>,
        primary: &'a ast::Primary,
        span: Span,
        arr: &'a DeclArray<'a>,
        target_is_real: bool,
        cf: Option<&'a crate::taskfunc::TaskFunc<'a>>,
        const_mode: bool,
    ) -> Result<(Vec<&'a Expr<'a>>, ResolvedSel<'a>)> {
        let dsize = arr.dimension();
        let isize = primary.indices.len();
        let has_range_select = primary.range_sel.is_some();
        let mut has_bit_select = false;
        if isize == dsize + 1 && !has_range_select {
            has_bit_select = true;
        } else if isize != dsize {
            return self.error_dimension_mismatch(span, primary.name);
        }
        let const_mode = const_mode || primary.const_index;
        let mut indices = Vec::with_capacity(dsize);
        let mut index1 = None;
        for (i, pt_index) in primary.indices.iter().enumerate() {
            let expr = self.instantiate_index(scope, pt_index, const_mode, cf)?;
            if i < dsize {
                indices.push(expr);
            } else {
                index1 = Some(expr);
            }
        }
        let mut sel = ResolvedSel {
            has_bit_select,
            has_range_select,
            index1,
            index2: None,
        };
        if (has_bit_select || has_range_select) && target_is_real {
            return self.error_select_for_real(span, primary.name);
        }
        if has_range_select {
            let rs = primary.range_sel.as_ref().unwrap();
            let left_const = const_mode || rs.mode == ast::RangeMode::Colon;
            sel.index1 = Some(self.instantiate_index(scope, &rs.left, left_const, cf)?);
            sel.index2 = Some(self.instantiate_constant_expr(scope, &rs.right)?);
        }
        Ok((indices, sel))
    }

    /// Instantiate one index expression in the environment the surrounding
    /// primary dictates.
    fn instantiate_index(
        &self,
        scope: &'a Scope<'a>,
        pt_index: &'a ast::Expr,
        const_mode: bool,
        cf: Option<&'a crate::taskfunc::TaskFunc<'a>>,
    ) -> Result<&'a Expr<'a>> {
        if const_mode {
            self.instantiate_constant_expr(scope, pt_index)
        } else if let Some(func) = cf {
            self.instantiate_expr(scope, ElbEnv::constant_function(func), pt_index)
        } else {
            self.instantiate_expr(scope, ElbEnv::default(), pt_index)
        }
    }

    /// Evaluate an already instantiated expression to an integer, reporting
    /// a diagnostic if it does not convert.
    pub(crate) fn expr_to_int(&self, expr: &'a Expr<'a>) -> Result<i32> {
        match expr.eval_int() {
            Some(v) => Ok(v),
            None => {
                self.emit(
                    DiagBuilder2::error(format!(
                        "{} : integer value required",
                        expr.decompile()
                    ))
                    .span(expr.span),
                );
                Err(())
            }
        }
    }

    pub(crate) fn error_not_found<T>(&self, span: Span, name: Name) -> Result<T> {
        self.emit(DiagBuilder2::error(format!("`{}` not found", name)).span(span));
        Err(())
    }

    fn error_illegal_object<T>(&self, span: Span, name: Name) -> Result<T> {
        self.emit(
            DiagBuilder2::error(format!("`{}` : illegal object type", name)).span(span),
        );
        Err(())
    }

    fn error_dimension_mismatch<T>(&self, span: Span, name: Name) -> Result<T> {
        self.emit(DiagBuilder2::error(format!("`{}` : dimension mismatch", name)).span(span));
        Err(())
    }

    fn error_select_for_real<T>(&self, span: Span, name: Name) -> Result<T> {
        self.emit(
            DiagBuilder2::error(format!("`{}` : bit/part select on a real", name)).span(span),
        );
        Err(())
    }

    fn error_illegal_real<T>(&self, span: Span, what: &str) -> Result<T> {
        self.emit(
            DiagBuilder2::error(format!("real operand is not allowed for `{}`", what)).span(span),
        );
        Err(())
    }
}

/// Peel the no-op parenthesization nodes off an expression.
fn strip_parens(mut pt: &ast::Expr) -> &ast::Expr {
    while let ast::ParenExpr(ref inner) = pt.data {
        pt = &**inner;
    }
    pt
}

fn is_variable_kind(kind: ObjKind) -> bool {
    matches!(
        kind,
        ObjKind::Reg | ObjKind::IntegerVar | ObjKind::RealVar | ObjKind::TimeVar
    )
}
