// Copyright (c) 2016-2021 Fabian Schuiki

//! Module instantiation.
//!
//! Phase 1 of a module creates the module scope, its parameters and genvars,
//! applies any `#(...)` parameter overrides, and walks the items. The IO and
//! body declarations are deferred to phase 2, so that every name of the
//! module exists before any declaration range is evaluated against them.

use crate::crate_prelude::*;
use crate::elab::decl_gen::IoParent;
use crate::elab::Elaborator;
use crate::param::ParamAssign;
use crate::scope::{Scope, ScopeKind};
use crate::value::Value;

/// One parameter override of a module instantiation, already evaluated in
/// the instantiating scope.
pub(crate) struct ParamOverride<'a> {
    /// The formal name for named overrides; ordered overrides leave this
    /// empty and bind by position.
    pub name: Option<Name>,
    pub span: Span,
    pub rhs: &'a ast::Expr,
    pub value: Value,
}

impl<'a> Elaborator<'a> {
    /// Phase 1 of a module used as a top-level instance.
    pub(crate) fn phase1_module(
        &self,
        parent: Option<&'a Scope<'a>>,
        pt_module: &'a ast::ModDecl,
        overrides: &[ParamOverride<'a>],
    ) -> &'a Scope<'a> {
        self.phase1_module_named(parent, pt_module, pt_module.name, overrides)
    }

    /// Phase 1 of a module instance carrying an instance name.
    pub(crate) fn phase1_module_named(
        &self,
        parent: Option<&'a Scope<'a>>,
        pt_module: &'a ast::ModDecl,
        inst_name: Name,
        overrides: &[ParamOverride<'a>],
    ) -> &'a Scope<'a> {
        debug!("instantiating module `{}` as `{}`", pt_module.name, inst_name);
        let scope = self.new_scope(
            parent,
            ScopeKind::Module {
                def_net_type: pt_module.def_net_type,
            },
            inst_name,
            pt_module.name_span,
        );

        // task/function definitions are visible to every constant
        // expression of the module, even ahead of their declaration
        self.register_func_defs(scope, &pt_module.items);

        // parameter ports, then the overrides on top of them
        self.phase1_decl(scope, &pt_module.paramports, false);
        self.apply_param_overrides(scope, overrides);

        // parameters and genvars of the body
        self.phase1_decl(scope, &pt_module.decls, false);

        // body declarations follow in phase 2, then the IO declarations are
        // checked against them
        self.add_phase2_stub(Box::new(move |elab| {
            elab.instantiate_decl(scope, &pt_module.decls);
            elab.instantiate_iodecl(IoParent::Module(scope), &pt_module.iodecls);
        }));

        self.phase1_items(scope, &pt_module.items);
        scope
    }

    /// Apply `#(...)` overrides to the parameter ports of a freshly created
    /// module scope. An override substitutes the right-hand side and re-runs
    /// the type resolution; `localparam` is immune.
    fn apply_param_overrides(&self, scope: &'a Scope<'a>, overrides: &[ParamOverride<'a>]) {
        let ports: Vec<_> = self
            .objs(scope, crate::decl::ObjKind::Parameter)
            .into_iter()
            .filter_map(|h| h.parameter())
            .collect();
        let mut by_position = ports.iter();
        for ov in overrides {
            let param = match ov.name {
                Some(name) => match self.find_obj(scope, name).and_then(|h| h.parameter()) {
                    Some(p) => Some(p),
                    None => {
                        self.emit(
                            DiagBuilder2::error(format!(
                                "module `{}` has no parameter `{}`",
                                scope.name, name
                            ))
                            .span(ov.span),
                        );
                        None
                    }
                },
                None => match by_position.next() {
                    Some(p) => Some(*p),
                    None => {
                        self.emit(
                            DiagBuilder2::error("too many parameter values").span(ov.span),
                        );
                        None
                    }
                },
            };
            let param = match param {
                Some(p) => p,
                None => continue,
            };
            if param.is_local_param() {
                self.emit(
                    DiagBuilder2::error(format!(
                        "localparam `{}` cannot be overridden",
                        param.name
                    ))
                    .span(ov.span),
                );
                continue;
            }
            param.set_expr(ov.rhs, ov.value.clone());
            debug!("parameter override of {} applied", param.full_name());
            let pa = self.arena.param_assigns.alloc(ParamAssign {
                span: ov.span,
                module: scope,
                param,
                rhs: ov.rhs,
                is_decl_assign: false,
            });
            self.param_assigns.borrow_mut().push(pa);
        }
    }
}
