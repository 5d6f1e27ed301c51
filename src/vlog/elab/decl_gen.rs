// Copyright (c) 2016-2021 Fabian Schuiki

//! Declaration instantiation.
//!
//! This file covers the net/reg/variable/event/genvar declaration heads, the
//! parameter declarations, array dimension lists, and the IO declarations of
//! modules, tasks and functions.

use crate::crate_prelude::*;
use crate::decl::{Decl, DeclArray, DeclHead, DeclKind, Genvar, ObjKind};
use crate::elab::Elaborator;
use crate::param::{ParamAssign, ParamHead, Parameter};
use crate::range::{Range, RangeArray};
use crate::scope::{ObjHandle, Scope};
use crate::taskfunc::{IoDecl, TaskFunc};

/// Where an IO declaration attaches.
#[derive(Clone, Copy)]
pub enum IoParent<'a> {
    Module(&'a Scope<'a>),
    TaskFunc(&'a TaskFunc<'a>),
}

impl<'a> IoParent<'a> {
    fn scope(&self) -> &'a Scope<'a> {
        match *self {
            IoParent::Module(s) => s,
            IoParent::TaskFunc(tf) => tf.scope,
        }
    }
}

impl<'a> Elaborator<'a> {
    /// Phase 1 declaration work: create the parameters and genvars of a
    /// scope. Everything else waits until phase 2.
    pub(crate) fn phase1_decl(
        &self,
        scope: &'a Scope<'a>,
        heads: &'a [ast::DeclHead],
        force_to_local: bool,
    ) {
        for head in heads {
            match head.kind {
                ast::DeclHeadKind::Param { local, .. } => {
                    self.instantiate_param_head(scope, head, local || force_to_local)
                }
                ast::DeclHeadKind::Genvar => self.instantiate_genvar_head(scope, head),
                _ => (),
            }
        }
    }

    /// Instantiate the non-parameter declarations of a scope. Runs in
    /// phase 2, after every name of the scope exists.
    pub(crate) fn instantiate_decl(&self, scope: &'a Scope<'a>, heads: &'a [ast::DeclHead]) {
        for head in heads {
            match head.kind {
                ast::DeclHeadKind::Net { .. } => self.instantiate_net_head(scope, head),
                ast::DeclHeadKind::Reg => self.instantiate_plain_head(scope, head, DeclKind::Reg),
                ast::DeclHeadKind::Var(vk) => {
                    self.instantiate_plain_head(scope, head, DeclKind::from_var_kind(vk))
                }
                ast::DeclHeadKind::Event => {
                    self.instantiate_plain_head(scope, head, DeclKind::NamedEvent)
                }
                // created in phase 1
                ast::DeclHeadKind::Genvar | ast::DeclHeadKind::Param { .. } => (),
                // specparams live in specify blocks, which carry no
                // elaborated value model beyond the parameter itself
                ast::DeclHeadKind::Specparam => {
                    self.instantiate_param_head(scope, head, true)
                }
            }
        }
    }

    /// Instantiate a parameter (or localparam/specparam) head and its items.
    pub(crate) fn instantiate_param_head(
        &self,
        scope: &'a Scope<'a>,
        pt_head: &'a ast::DeclHead,
        is_local: bool,
    ) {
        let range = match self.instantiate_range(scope, &pt_head.range) {
            Ok(r) => r,
            Err(()) => return,
        };
        let var_kind = match pt_head.kind {
            ast::DeclHeadKind::Param { var_kind, .. } => var_kind,
            _ => None,
        };
        let head = self.arena.param_heads.alloc(ParamHead {
            scope,
            span: pt_head.span,
            var_kind,
            signed: pt_head.signed,
            range,
            is_specparam: matches!(pt_head.kind, ast::DeclHeadKind::Specparam),
        });

        for item in &pt_head.items {
            let pt_init = match item.init {
                Some(ref e) => e,
                None => {
                    self.emit(
                        DiagBuilder2::error(format!("parameter `{}` has no value", item.name))
                            .span(item.span),
                    );
                    continue;
                }
            };
            let param = &*self.arena.params.alloc(Parameter::new(
                head,
                item.name,
                item.name_span,
                is_local,
            ));
            self.register(scope, ObjHandle::Param(param));

            // The right-hand side is a constant expression, so its value is
            // computed right away.
            let value = self.evaluate_expr(scope, pt_init, true);
            param.set_expr(pt_init, value);

            let pa = self.arena.param_assigns.alloc(ParamAssign {
                span: item.span,
                module: scope.parent_module(),
                param,
                rhs: pt_init,
                is_decl_assign: true,
            });
            self.param_assigns.borrow_mut().push(pa);
        }
    }

    /// Instantiate a net declaration head and its items.
    fn instantiate_net_head(&self, scope: &'a Scope<'a>, pt_head: &'a ast::DeclHead) {
        let (net_type, strength, delay) = match pt_head.kind {
            ast::DeclHeadKind::Net {
                net_type,
                strength,
                ref delay,
            } => (net_type, strength, delay.as_ref()),
            _ => unreachable!(),
        };
        let range = match self.instantiate_range(scope, &pt_head.range) {
            Ok(r) => r,
            Err(()) => return,
        };
        let head = &*self.arena.decl_heads.alloc(DeclHead {
            scope,
            span: pt_head.span,
            kind: DeclKind::Net(net_type),
            signed: pt_head.signed,
            range,
            strength,
            delay: Default::default(),
        });
        if let Some(pt_delay) = delay {
            // the delay expression may reference later declarations
            self.add_phase3_stub(Box::new(move |elab| elab.link_net_delay(head, pt_delay)));
        }

        for item in &pt_head.items {
            if !item.dims.is_empty() {
                // an array; the grammar rules out initial values here
                let dims = match self.instantiate_dimension_list(scope, item) {
                    Ok(d) => d,
                    Err(()) => continue,
                };
                let arr = &*self.arena.decl_arrays.alloc(DeclArray::new(
                    head,
                    item.name,
                    item.name_span,
                    dims,
                ));
                self.register(scope, ObjHandle::DeclArray(arr));
            } else {
                let net = &*self
                    .arena
                    .decls
                    .alloc(Decl::new(head, item.name, item.name_span));
                self.register(scope, ObjHandle::Decl(net));
                if item.init.is_some() {
                    // a net initial value becomes a continuous assignment,
                    // synthesized once the right-hand side can resolve
                    self.add_phase3_stub(Box::new(move |elab| elab.link_net_assign(net, item)));
                }
            }
        }
    }

    /// Instantiate a reg/variable/event declaration head and its items.
    fn instantiate_plain_head(
        &self,
        scope: &'a Scope<'a>,
        pt_head: &'a ast::DeclHead,
        kind: DeclKind,
    ) {
        let range = match self.instantiate_range(scope, &pt_head.range) {
            Ok(r) => r,
            Err(()) => return,
        };
        if range.is_some() && !matches!(kind, DeclKind::Reg) {
            self.emit(
                DiagBuilder2::error("only reg and net declarations may carry a range")
                    .span(pt_head.span),
            );
            return;
        }
        let head = &*self.arena.decl_heads.alloc(DeclHead {
            scope,
            span: pt_head.span,
            kind,
            signed: pt_head.signed || matches!(kind, DeclKind::IntegerVar),
            range,
            strength: None,
            delay: Default::default(),
        });

        for item in &pt_head.items {
            if !item.dims.is_empty() {
                if item.init.is_some() {
                    self.emit(
                        DiagBuilder2::error(format!(
                            "array `{}` shall not have an initial value",
                            item.name
                        ))
                        .span(item.span),
                    );
                    continue;
                }
                let dims = match self.instantiate_dimension_list(scope, item) {
                    Ok(d) => d,
                    Err(()) => continue,
                };
                let arr = &*self.arena.decl_arrays.alloc(DeclArray::new(
                    head,
                    item.name,
                    item.name_span,
                    dims,
                ));
                self.register(scope, ObjHandle::DeclArray(arr));
            } else {
                if matches!(kind, DeclKind::NamedEvent) && item.init.is_some() {
                    self.emit(
                        DiagBuilder2::error(format!(
                            "named event `{}` shall not have an initial value",
                            item.name
                        ))
                        .span(item.span),
                    );
                    continue;
                }
                let decl = &*self
                    .arena
                    .decls
                    .alloc(Decl::new(head, item.name, item.name_span));
                self.register(scope, ObjHandle::Decl(decl));
                if let Some(ref pt_init) = item.init {
                    // the initial value is a constant expression, so it is
                    // built right away; on error the declaration itself
                    // survives
                    if let Ok(init) = self.instantiate_constant_expr(scope, pt_init) {
                        *decl.init.borrow_mut() = Some(init);
                    }
                }
            }
        }
    }

    /// Instantiate a genvar declaration head and its items.
    fn instantiate_genvar_head(&self, scope: &'a Scope<'a>, pt_head: &'a ast::DeclHead) {
        for item in &pt_head.items {
            let genvar = &*self
                .arena
                .genvars
                .alloc(Genvar::new(scope, item.name, item.name_span));
            self.register(scope, ObjHandle::Genvar(genvar));
        }
    }

    /// Elaborate the dimension list of an array declaration item.
    fn instantiate_dimension_list(
        &self,
        scope: &'a Scope<'a>,
        item: &'a ast::DeclItem,
    ) -> Result<RangeArray> {
        let mut dims = Vec::with_capacity(item.dims.len());
        for pt_range in &item.dims {
            let (left, right) = self.evaluate_range_pair(scope, pt_range)?;
            dims.push(Range::new(pt_range.span, left, right));
        }
        Ok(RangeArray::new(dims))
    }

    /// Elaborate an optional declaration range into bound values.
    pub(crate) fn instantiate_range(
        &self,
        scope: &'a Scope<'a>,
        range: &'a Option<ast::RangeExpr>,
    ) -> Result<Option<Range>> {
        match range {
            Some(r) => {
                let (left, right) = self.evaluate_range_pair(scope, r)?;
                Ok(Some(Range::new(r.span, left, right)))
            }
            None => Ok(None),
        }
    }

    fn evaluate_range_pair(
        &self,
        scope: &'a Scope<'a>,
        range: &'a ast::RangeExpr,
    ) -> Result<(i32, i32)> {
        let left = self.evaluate_int(scope, &range.left, true).ok_or(())?;
        let right = self.evaluate_int(scope, &range.right, true).ok_or(())?;
        Ok((left, right))
    }

    /// Phase 3: link the delay expressions onto a net declaration head.
    fn link_net_delay(&self, head: &'a DeclHead<'a>, pt_delay: &'a ast::Delay) {
        if let Ok(delay) = self.instantiate_delay(head.scope, pt_delay) {
            *head.delay.borrow_mut() = Some(delay);
        }
    }

    /// Phase 3: synthesize the continuous assignment that a net declaration
    /// with an initial value stands for.
    fn link_net_assign(&self, net: &'a Decl<'a>, pt_item: &'a ast::DeclItem) {
        use crate::expr::{Expr, SelTarget};
        let scope = net.head.scope;
        let pt_init = pt_item.init.as_ref().unwrap();
        let lhs = &*self
            .arena
            .exprs
            .alloc(Expr::new_primary(pt_item.span, SelTarget::Decl(net)));
        let rhs = match self.instantiate_rhs(scope, Default::default(), pt_init, lhs) {
            Ok(e) => e,
            Err(()) => return,
        };
        let ca = self.arena.cont_assigns.alloc(crate::item::ContAssign {
            span: pt_item.span,
            module: scope.parent_module(),
            lhs,
            rhs,
            delay: None,
        });
        self.cont_assigns.borrow_mut().push(ca);
    }

    /// Instantiate the IO declarations of a module, task, or function,
    /// checking them against same-named declarations per IEEE 1364 12.3.3.
    pub(crate) fn instantiate_iodecl(&self, parent: IoParent<'a>, heads: &'a [ast::IoHead]) {
        let scope = parent.scope();
        for pt_head in heads {
            let range = match self.instantiate_range(scope, &pt_head.range) {
                Ok(r) => r,
                Err(()) => continue,
            };

            for item in &pt_head.items {
                let existing = self.find_obj(scope, item.name);
                let decl = match existing {
                    Some(handle) => {
                        if pt_head.aux_kind.is_some() {
                            self.emit(
                                DiagBuilder2::error(format!(
                                    "`{}` has an aux-type declaration, but also another \
                                     declaration",
                                    item.name
                                ))
                                .span(item.span)
                                .add_note("the other declaration is here:")
                                .span(handle.span()),
                            );
                            continue;
                        }
                        if handle.decl_array().is_some() {
                            self.emit(
                                DiagBuilder2::error(format!(
                                    "array `{}` shall not be connected to an IO port",
                                    item.name
                                ))
                                .span(item.span),
                            );
                            continue;
                        }
                        let accepted = match parent {
                            IoParent::Module(_) => &[
                                ObjKind::Net,
                                ObjKind::Reg,
                                ObjKind::IntegerVar,
                                ObjKind::TimeVar,
                            ][..],
                            IoParent::TaskFunc(_) => {
                                &[ObjKind::Reg, ObjKind::IntegerVar, ObjKind::TimeVar][..]
                            }
                        };
                        let decl = handle.decl().filter(|d| accepted.contains(&d.kind()));
                        let decl = match decl {
                            Some(d) => d,
                            None => {
                                self.emit(
                                    DiagBuilder2::error(format!(
                                        "`{}` is not a reg or integer/time variable",
                                        item.name
                                    ))
                                    .span(item.span),
                                );
                                continue;
                            }
                        };
                        // IEEE 1364-2001 12.3.3: the ranges must agree
                        match (range, decl.head.range) {
                            (None, Some(r2)) => {
                                if !self.sess.opts.allow_empty_io_range {
                                    self.emit(
                                        DiagBuilder2::error(format!(
                                            "conflicting range declaration of `{}`",
                                            item.name
                                        ))
                                        .span(item.span)
                                        .add_note(format!("declared {} here:", r2))
                                        .span(decl.span),
                                    );
                                    continue;
                                }
                            }
                            (Some(r1), Some(r2)) => {
                                if r1.left != r2.left || r1.right != r2.right {
                                    self.emit(
                                        DiagBuilder2::error(format!(
                                            "conflicting range declaration of `{}`",
                                            item.name
                                        ))
                                        .span(item.span)
                                        .add_note(format!("declared {} here:", r2))
                                        .span(decl.span),
                                    );
                                    continue;
                                }
                            }
                            (Some(_), None) => {
                                self.emit(
                                    DiagBuilder2::error(format!(
                                        "conflicting range declaration of `{}`",
                                        item.name
                                    ))
                                    .span(item.span),
                                );
                                continue;
                            }
                            (None, None) => (),
                        }
                        decl
                    }
                    None => {
                        // no matching declaration: the IO declaration itself
                        // creates one
                        let kind = match pt_head.aux_kind {
                            Some(ast::IoAuxKind::Reg) => DeclKind::Reg,
                            Some(ast::IoAuxKind::Var(vk)) => DeclKind::from_var_kind(vk),
                            Some(ast::IoAuxKind::Net(nt)) => DeclKind::Net(nt),
                            None => match parent {
                                // a bare module port becomes a net, a bare
                                // task/function IO becomes a reg
                                IoParent::Module(s) => DeclKind::Net(
                                    s.def_net_type().unwrap_or(ast::NetType::Wire),
                                ),
                                IoParent::TaskFunc(_) => DeclKind::Reg,
                            },
                        };
                        let head = &*self.arena.decl_heads.alloc(DeclHead {
                            scope,
                            span: pt_head.span,
                            kind,
                            signed: pt_head.signed,
                            range,
                            strength: None,
                            delay: Default::default(),
                        });
                        let decl = &*self
                            .arena
                            .decls
                            .alloc(Decl::new(head, item.name, item.span));
                        self.register(scope, ObjHandle::Decl(decl));
                        decl
                    }
                };

                if let IoParent::TaskFunc(tf) = parent {
                    tf.add_io(IoDecl {
                        dir: pt_head.dir,
                        decl,
                    });
                }
            }
        }
    }
}
