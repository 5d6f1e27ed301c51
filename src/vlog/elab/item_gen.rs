// Copyright (c) 2016-2021 Fabian Schuiki

//! Item instantiation: tasks, functions, generate constructs, continuous
//! assignments, processes, defparams, and module instances.

use crate::crate_prelude::*;
use crate::decl::{Decl, DeclHead, DeclKind};
use crate::elab::Elaborator;
use crate::elab::decl_gen::IoParent;
use crate::elab::module_gen::ParamOverride;
use crate::env::ElbEnv;
use crate::item::{Process, ProcessKind};
use crate::scope::{ObjHandle, Scope, ScopeKind};
use crate::taskfunc::{TaskFunc, TaskFuncKind};

impl<'a> Elaborator<'a> {
    /// Record the task/function definitions below the given items, so that
    /// constant function calls can resolve forward references before the
    /// definitions themselves are reached. Runs ahead of any declaration
    /// work of the scope.
    pub(crate) fn register_func_defs(&self, scope: &'a Scope<'a>, items: &'a [ast::Item]) {
        for item in items {
            match item.data {
                ast::TaskDecl(ref decl) => self.register_func_def(scope, decl.name, item),
                ast::FuncDecl(ref decl) => self.register_func_def(scope, decl.name, item),
                ast::GenRegion(ref sub) => self.register_func_defs(scope, sub),
                _ => (),
            }
        }
    }

    /// Phase 1 over the items of a scope: create every named object and
    /// sub-scope, and enqueue the phase 2/3 work.
    pub(crate) fn phase1_items(&self, scope: &'a Scope<'a>, items: &'a [ast::Item]) {
        for item in items {
            match item.data {
                ast::TaskDecl(ref decl) => self.phase1_task(scope, decl),
                ast::FuncDecl(ref decl) => self.phase1_function(scope, decl),
                ast::GenRegion(ref sub) => self.phase1_items(scope, sub),
                ast::GenFor(ref gen) => self.phase1_gen_for(scope, item, gen),
                ast::GenIf(ref gen) => self.phase1_gen_if(scope, gen),
                ast::GenCase(ref gen) => self.phase1_gen_case(scope, gen),
                ast::ContAssign(ref ca) => {
                    self.add_phase3_stub(Box::new(move |elab| {
                        elab.instantiate_cont_assign(scope, ca)
                    }));
                }
                ast::Defparam(ref items) => {
                    for dp in items {
                        self.add_defparam(scope, dp);
                    }
                }
                ast::Initial(ref stmt) => self.phase1_process(scope, item, ProcessKind::Initial, stmt),
                ast::Always(ref stmt) => self.phase1_process(scope, item, ProcessKind::Always, stmt),
                ast::Inst(ref inst) => self.phase1_inst(scope, item, inst),
            }
        }
    }

    /// Phase 1 of a task: create the scope and parameters, walk the body for
    /// named blocks, and defer the declarations and the body statement.
    fn phase1_task(&self, scope: &'a Scope<'a>, pt_task: &'a ast::TaskDecl) {
        debug!("instantiating task {}.{}", scope.full_name(), pt_task.name);
        let task_scope = self.new_scope(Some(scope), ScopeKind::Task, pt_task.name, pt_task.name_span);
        let task = &*self
            .arena
            .taskfuncs
            .alloc(TaskFunc::new(task_scope, TaskFuncKind::Task));
        self.register(scope, ObjHandle::TaskFunc(task));

        self.phase1_decl(task_scope, &pt_task.params, false);
        self.phase1_stmt(task_scope, &pt_task.body, false);

        self.add_phase2_stub(Box::new(move |elab| {
            elab.instantiate_decl(task_scope, &pt_task.decls);
            elab.instantiate_iodecl(IoParent::TaskFunc(task), &pt_task.iodecls);
        }));
        self.add_phase3_stub(Box::new(move |elab| {
            let env = ElbEnv::task(task);
            if let Ok(body) = elab.instantiate_stmt(task_scope, env, &pt_task.body) {
                task.set_stmt(body);
            }
        }));
    }

    /// Phase 1 of a function: like a task, but with the result variable
    /// carrying the function's name.
    fn phase1_function(&self, scope: &'a Scope<'a>, pt_func: &'a ast::FuncDecl) {
        debug!(
            "instantiating function {}.{}",
            scope.full_name(),
            pt_func.name
        );
        let range = match self.instantiate_range(scope, &pt_func.range) {
            Ok(r) => r,
            Err(()) => return,
        };
        let func_scope =
            self.new_scope(Some(scope), ScopeKind::Function, pt_func.name, pt_func.name_span);
        let func = &*self.arena.taskfuncs.alloc(TaskFunc::new(
            func_scope,
            TaskFuncKind::Function {
                signed: pt_func.signed,
                range,
                var_kind: pt_func.var_kind,
            },
        ));
        self.register(scope, ObjHandle::TaskFunc(func));

        self.phase1_decl(func_scope, &pt_func.params, false);
        self.create_function_ovar(func, pt_func, range);
        self.phase1_stmt(func_scope, &pt_func.body, false);

        self.add_phase2_stub(Box::new(move |elab| {
            elab.instantiate_decl(func_scope, &pt_func.decls);
            elab.instantiate_iodecl(IoParent::TaskFunc(func), &pt_func.iodecls);
        }));
        self.add_phase3_stub(Box::new(move |elab| {
            let env = ElbEnv::function(func);
            if let Ok(body) = elab.instantiate_stmt(func_scope, env, &pt_func.body) {
                func.set_stmt(body);
            }
        }));
    }

    /// Create the variable that shares the function's name and receives the
    /// return value: a reg unless the function declares a data type.
    fn create_function_ovar(
        &self,
        func: &'a TaskFunc<'a>,
        pt_func: &'a ast::FuncDecl,
        range: Option<crate::range::Range>,
    ) {
        let kind = match pt_func.var_kind {
            Some(vk) => DeclKind::from_var_kind(vk),
            None => DeclKind::Reg,
        };
        let head = &*self.arena.decl_heads.alloc(DeclHead {
            scope: func.scope,
            span: pt_func.name_span,
            kind,
            signed: pt_func.signed,
            range,
            strength: None,
            delay: Default::default(),
        });
        let decl = &*self
            .arena
            .decls
            .alloc(Decl::new(head, pt_func.name, pt_func.name_span));
        self.register(func.scope, ObjHandle::Decl(decl));
        func.set_ovar(decl);
    }

    /// Resolve a function name to a fully instantiated constant function,
    /// instantiating it on the spot when first referenced. Recursive
    /// references are a fatal elaboration error, not an endless descent.
    pub(crate) fn instantiate_constant_function_by_name(
        &self,
        scope: &'a Scope<'a>,
        span: Span,
        name: Name,
    ) -> Option<&'a TaskFunc<'a>> {
        let (def_scope, item) = match self.find_func_def(scope, name) {
            Some(x) => x,
            None => {
                self.emit(
                    DiagBuilder2::error(format!("constant function `{}` not found", name))
                        .span(span),
                );
                return None;
            }
        };
        if let Some(func) = self.constant_function(def_scope, name) {
            return Some(func);
        }
        let pt_func = match item.data {
            ast::FuncDecl(ref f) => f,
            _ => {
                self.emit(
                    DiagBuilder2::error(format!("`{}` is not a function", name)).span(span),
                );
                return None;
            }
        };
        if !self.enter_constant_function(item.id) {
            self.emit(
                DiagBuilder2::error(format!(
                    "`{}` : recursive constant function reference",
                    name
                ))
                .span(span),
            );
            return None;
        }
        let func = self.instantiate_constant_function(def_scope, pt_func);
        self.leave_constant_function(item.id);
        if let Some(func) = func {
            self.register_constant_function(def_scope, name, func);
        }
        func
    }

    /// Instantiate a constant function: a self-contained nested run of the
    /// declaration/statement pipeline, completed immediately rather than
    /// phase by phase.
    fn instantiate_constant_function(
        &self,
        scope: &'a Scope<'a>,
        pt_func: &'a ast::FuncDecl,
    ) -> Option<&'a TaskFunc<'a>> {
        let range = match self.instantiate_range(scope, &pt_func.range) {
            Ok(r) => r,
            Err(()) => return None,
        };
        let func_scope =
            self.new_scope(Some(scope), ScopeKind::Function, pt_func.name, pt_func.name_span);
        let func = &*self.arena.taskfuncs.alloc(TaskFunc::new(
            func_scope,
            TaskFuncKind::Function {
                signed: pt_func.signed,
                range,
                var_kind: pt_func.var_kind,
            },
        ));

        self.phase1_decl(func_scope, &pt_func.params, false);
        self.instantiate_decl(func_scope, &pt_func.decls);
        self.create_function_ovar(func, pt_func, range);
        self.instantiate_iodecl(IoParent::TaskFunc(func), &pt_func.iodecls);
        self.phase1_stmt(func_scope, &pt_func.body, true);
        let env = ElbEnv::constant_function(func);
        match self.instantiate_stmt(func_scope, env, &pt_func.body) {
            Ok(body) => {
                func.set_stmt(body);
                Some(func)
            }
            Err(()) => None,
        }
    }

    /// Expand a generate for loop: one generate block scope per iteration,
    /// named `block[value]`.
    fn phase1_gen_for(&self, scope: &'a Scope<'a>, item: &'a ast::Item, gen: &'a ast::GenFor) {
        let genvar = match self
            .find_obj_up(scope, &[], gen.genvar, None)
            .and_then(|h| h.genvar())
        {
            Some(g) => g,
            None => {
                self.emit(
                    DiagBuilder2::error(format!("`{}` is not a genvar", gen.genvar))
                        .span(item.span),
                );
                return;
            }
        };
        if genvar.is_in_use() {
            self.emit(
                DiagBuilder2::error(format!("genvar `{}` is already in use", gen.genvar))
                    .span(item.span),
            );
            return;
        }
        let block_name = match gen.block.name {
            Some(n) => n,
            None => {
                self.emit(
                    DiagBuilder2::error("a generate for loop requires a named block")
                        .span(gen.block.span),
                );
                return;
            }
        };
        let init = match self.evaluate_int(scope, &gen.init, true) {
            Some(v) => v,
            None => return,
        };
        genvar.set_in_use(true);
        genvar.set_value(init);
        loop {
            match self.evaluate_bool(scope, &gen.cond, true) {
                Some(true) => (),
                _ => break,
            }
            let iter_name = crate::common::name::get_name_table()
                .intern(&format!("{}[{}]", block_name, genvar.value()), true);
            let blk_scope =
                self.new_scope(Some(scope), ScopeKind::GenBlock, iter_name, gen.block.span);
            self.register(scope, ObjHandle::Scope(blk_scope));
            self.phase1_gen_block_body(blk_scope, &gen.block);
            match self.evaluate_int(scope, &gen.step, true) {
                Some(v) => genvar.set_value(v),
                None => break,
            }
        }
        genvar.set_in_use(false);
    }

    /// Expand a generate if with a constant condition.
    fn phase1_gen_if(&self, scope: &'a Scope<'a>, gen: &'a ast::GenIf) {
        let taken = match self.evaluate_bool(scope, &gen.cond, true) {
            Some(v) => v,
            None => return,
        };
        let block = if taken {
            Some(&gen.then_blk)
        } else {
            gen.else_blk.as_ref()
        };
        if let Some(block) = block {
            self.phase1_gen_block(scope, block);
        }
    }

    /// Expand a generate case with a constant selector.
    fn phase1_gen_case(&self, scope: &'a Scope<'a>, gen: &'a ast::GenCase) {
        let sel = self.evaluate_expr(scope, &gen.expr, true);
        if sel.is_error() {
            return;
        }
        let mut default = None;
        for (labels, block) in &gen.items {
            if labels.is_empty() {
                default = Some(block);
                continue;
            }
            for label in labels {
                let lv = self.evaluate_expr(scope, label, true);
                if crate::value::case_eq(&sel, &lv).logic_value().to_bool() {
                    self.phase1_gen_block(scope, block);
                    return;
                }
            }
        }
        if let Some(block) = default {
            self.phase1_gen_block(scope, block);
        }
    }

    /// Elaborate one generate block: named blocks get their own scope,
    /// unnamed ones melt into the parent.
    fn phase1_gen_block(&self, scope: &'a Scope<'a>, block: &'a ast::GenBlock) {
        match block.name {
            Some(name) => {
                let blk_scope = self.new_scope(Some(scope), ScopeKind::GenBlock, name, block.span);
                self.register(scope, ObjHandle::Scope(blk_scope));
                self.phase1_gen_block_body(blk_scope, block);
            }
            None => self.phase1_gen_block_body(scope, block),
        }
    }

    fn phase1_gen_block_body(&self, scope: &'a Scope<'a>, block: &'a ast::GenBlock) {
        self.register_func_defs(scope, &block.items);
        self.phase1_decl(scope, &block.decls, false);
        self.add_phase2_stub(Box::new(move |elab| {
            elab.instantiate_decl(scope, &block.decls)
        }));
        self.phase1_items(scope, &block.items);
    }

    /// Phase 3: instantiate one continuous assignment item.
    fn instantiate_cont_assign(&self, scope: &'a Scope<'a>, ca: &'a ast::ContAssign) {
        let delay = match ca.delay {
            Some(ref pt_delay) => match self.instantiate_delay(scope, pt_delay) {
                Ok(d) => Some(d),
                Err(()) => return,
            },
            None => None,
        };
        for (pt_lhs, pt_rhs) in &ca.assigns {
            let env = ElbEnv::default();
            let lhs = match self.instantiate_lhs(scope, env.net_lhs(), pt_lhs) {
                Ok(e) => e,
                Err(()) => continue,
            };
            let rhs = match self.instantiate_rhs(scope, env, pt_rhs, lhs) {
                Ok(e) => e,
                Err(()) => continue,
            };
            let assign = self.arena.cont_assigns.alloc(crate::item::ContAssign {
                span: pt_lhs.span.union(pt_rhs.span),
                module: scope.parent_module(),
                lhs,
                rhs,
                delay,
            });
            self.cont_assigns.borrow_mut().push(assign);
        }
    }

    /// Phase 1 of an `initial`/`always` process: walk the body for named
    /// blocks now, instantiate the statement in phase 3.
    fn phase1_process(
        &self,
        scope: &'a Scope<'a>,
        item: &'a ast::Item,
        kind: ProcessKind,
        stmt: &'a ast::Stmt,
    ) {
        let process = &*self
            .arena
            .processes
            .alloc(Process::new(item.span, scope, kind));
        self.processes.borrow_mut().push(process);
        self.phase1_stmt(scope, stmt, false);
        self.add_phase3_stub(Box::new(move |elab| {
            if let Ok(body) = elab.instantiate_stmt(scope, ElbEnv::default(), stmt) {
                process.set_stmt(body);
            }
        }));
    }

    /// Phase 1 of a module instantiation: create one module scope per
    /// instance, with the parameter overrides evaluated in the parent
    /// scope.
    fn phase1_inst(&self, scope: &'a Scope<'a>, item: &'a ast::Item, inst: &'a ast::InstItem) {
        let pt_module = match self.module_def(inst.target) {
            Some(m) => m,
            None => {
                self.emit(
                    DiagBuilder2::error(format!("module `{}` not found", inst.target))
                        .span(item.span),
                );
                return;
            }
        };
        for one in &inst.insts {
            let mut overrides = Vec::with_capacity(inst.param_assigns.len());
            for conn in &inst.param_assigns {
                let rhs = match conn.expr {
                    Some(ref e) => e,
                    None => continue,
                };
                overrides.push(ParamOverride {
                    name: conn.name,
                    span: conn.span,
                    rhs,
                    value: self.evaluate_expr(scope, rhs, true),
                });
            }
            let inst_scope = self.phase1_module_named(Some(scope), pt_module, one.name, &overrides);
            self.register(scope, ObjHandle::Scope(inst_scope));
        }
    }
}
