// Copyright (c) 2016-2021 Fabian Schuiki

//! The phased elaboration driver.
//!
//! The [`Elaborator`] walks the parse tree in three strictly ordered phases
//! per scope. Phase 1 creates named objects and their sub-scopes: modules,
//! parameters, genvars, tasks, functions, and expanded generate blocks.
//! Phase 2 instantiates declarations and IO lists of the scopes queued in
//! phase 1. Phase 3 instantiates statement bodies and fixes up deferred
//! cross-references such as net delays and net initial-value assignments.
//! Work that needs symbols which phase 1 has not created yet is enqueued as
//! a stub and drained once the earlier phase has run to completion, which is
//! what lets a task call another task declared later in the same scope
//! without a separate dependency-resolution pass.
//!
//! Everything the driver creates is allocated in an [`ElabArenas`] whose
//! lifetime spans the elaboration session.

mod decl_gen;
mod eval;
mod expr_gen;
mod item_gen;
mod module_gen;
mod stmt_gen;

use crate::common::make_arenas;
use crate::common::Session;
use crate::crate_prelude::*;
use crate::decl::{Decl, DeclArray, DeclHead, Genvar, ObjKind};
use crate::expr::{Delay, Expr};
use crate::item::{ContAssign, Process};
use crate::param::{DefParam, ParamAssign, ParamHead, Parameter};
use crate::scope::{ObjHandle, Scope, ScopeKind, SymbolTable};
use crate::stmt::Stmt;
use crate::taskfunc::TaskFunc;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

make_arenas! {
    /// The arenas that own every object an elaboration session creates.
    /// Nothing is freed individually; the whole allocation drops with the
    /// session.
    pub struct ElabArenas<'a> {
        scopes: Scope<'a>,
        decl_heads: DeclHead<'a>,
        decls: Decl<'a>,
        decl_arrays: DeclArray<'a>,
        param_heads: ParamHead<'a>,
        params: Parameter<'a>,
        genvars: Genvar<'a>,
        taskfuncs: TaskFunc<'a>,
        exprs: Expr<'a>,
        delays: Delay<'a>,
        stmts: Stmt<'a>,
        cont_assigns: ContAssign<'a>,
        processes: Process<'a>,
        param_assigns: ParamAssign<'a>,
        defparams: DefParam<'a>,
    }
}

/// A deferred unit of elaboration work.
type Stub<'a> = Box<dyn FnOnce(&Elaborator<'a>) + 'a>;

/// A queued `defparam` item, applied once phase 1 has created all
/// parameters.
struct PendingDefparam<'a> {
    scope: &'a Scope<'a>,
    pt: &'a ast::DefparamItem,
}

/// The elaboration driver.
pub struct Elaborator<'a> {
    pub sess: &'a Session,
    pub arena: &'a ElabArenas<'a>,
    pub symtab: SymbolTable<'a>,
    /// The module declarations of the parsed source, by name.
    module_defs: RefCell<HashMap<Name, &'a ast::ModDecl>>,
    /// The top-level module instances created by `elaborate`.
    top_modules: RefCell<Vec<&'a Scope<'a>>>,
    /// Task/function definitions, registered per scope in phase 1 so that
    /// constant function calls can resolve forward references.
    func_defs: RefCell<HashMap<(NodeId, Name), &'a ast::Item>>,
    /// Constant functions already instantiated, keyed by scope and name.
    cf_map: RefCell<HashMap<(NodeId, Name), &'a TaskFunc<'a>>>,
    /// Functions whose constant instantiation is currently on the stack.
    /// Replaces a mutable in-use mark on the shared parse tree.
    cf_in_progress: RefCell<HashSet<NodeId>>,
    /// Scopes created for named blocks and generate blocks, by parse-tree
    /// node, so that phase 3 statement instantiation finds them again.
    block_scopes: RefCell<HashMap<NodeId, &'a Scope<'a>>>,
    phase2: RefCell<VecDeque<Stub<'a>>>,
    phase3: RefCell<VecDeque<Stub<'a>>>,
    defparams_pending: RefCell<Vec<PendingDefparam<'a>>>,
    /// Elaborated continuous assignments, in creation order.
    pub cont_assigns: RefCell<Vec<&'a ContAssign<'a>>>,
    /// Elaborated parameter assignments, in creation order.
    pub param_assigns: RefCell<Vec<&'a ParamAssign<'a>>>,
    /// Elaborated defparams, in creation order.
    pub defparams: RefCell<Vec<&'a DefParam<'a>>>,
    /// Elaborated processes, in creation order.
    pub processes: RefCell<Vec<&'a Process<'a>>>,
}

impl<'a> Elaborator<'a> {
    /// Create a new elaboration session.
    pub fn new(sess: &'a Session, arena: &'a ElabArenas<'a>) -> Elaborator<'a> {
        Elaborator {
            sess,
            arena,
            symtab: SymbolTable::new(),
            module_defs: Default::default(),
            top_modules: Default::default(),
            func_defs: Default::default(),
            cf_map: Default::default(),
            cf_in_progress: Default::default(),
            block_scopes: Default::default(),
            phase2: Default::default(),
            phase3: Default::default(),
            defparams_pending: Default::default(),
            cont_assigns: Default::default(),
            param_assigns: Default::default(),
            defparams: Default::default(),
            processes: Default::default(),
        }
    }

    /// Elaborate a parsed source text. Modules that are never instantiated
    /// by another module become the top-level instances.
    ///
    /// This is a best-effort, collect-all-errors pass: elaboration of
    /// unrelated scopes continues past failures. The result is `Err` if any
    /// error was reported.
    pub fn elaborate(&self, root: &'a ast::Root) -> Result<Vec<&'a Scope<'a>>> {
        let mut instantiated = HashSet::new();
        for m in &root.modules {
            self.module_defs.borrow_mut().insert(m.name, m);
            collect_inst_targets(&m.items, &mut instantiated);
        }

        // phase 1
        for m in &root.modules {
            if instantiated.contains(&m.name) {
                continue;
            }
            debug!("top level module `{}`", m.name);
            let top = self.phase1_module(None, m, &[]);
            self.top_modules.borrow_mut().push(top);
        }
        self.apply_defparams();

        // phase 2
        loop {
            let stub = self.phase2.borrow_mut().pop_front();
            match stub {
                Some(s) => s(self),
                None => break,
            }
        }

        // phase 3
        loop {
            let stub = self.phase3.borrow_mut().pop_front();
            match stub {
                Some(s) => s(self),
                None => break,
            }
        }

        if self.sess.failed() {
            Err(())
        } else {
            Ok(self.top_modules.borrow().clone())
        }
    }

    /// The top-level module instances created so far.
    pub fn top_modules(&self) -> Vec<&'a Scope<'a>> {
        self.top_modules.borrow().clone()
    }

    /// Enqueue work that runs once phase 1 has completed.
    pub(crate) fn add_phase2_stub(&self, stub: Stub<'a>) {
        self.phase2.borrow_mut().push_back(stub);
    }

    /// Enqueue work that runs once phase 2 has completed.
    pub(crate) fn add_phase3_stub(&self, stub: Stub<'a>) {
        self.phase3.borrow_mut().push_back(stub);
    }

    /// Create a new scope in the arena.
    pub(crate) fn new_scope(
        &self,
        parent: Option<&'a Scope<'a>>,
        kind: ScopeKind,
        name: Name,
        span: Span,
    ) -> &'a Scope<'a> {
        self.arena.scopes.alloc(Scope {
            id: NodeId::alloc(),
            span,
            kind,
            name,
            parent,
        })
    }

    /// Look up a module declaration by name.
    pub(crate) fn module_def(&self, name: Name) -> Option<&'a ast::ModDecl> {
        self.module_defs.borrow().get(&name).copied()
    }

    /// Record a task/function definition for forward-reference lookup.
    pub(crate) fn register_func_def(&self, scope: &'a Scope<'a>, name: Name, item: &'a ast::Item) {
        self.func_defs.borrow_mut().insert((scope.id, name), item);
    }

    /// Find a task/function definition, walking up the scope tree.
    pub(crate) fn find_func_def(
        &self,
        mut scope: &'a Scope<'a>,
        name: Name,
    ) -> Option<(&'a Scope<'a>, &'a ast::Item)> {
        loop {
            let item = self.func_defs.borrow().get(&(scope.id, name)).copied();
            if let Some(item) = item {
                return Some((scope, item));
            }
            scope = scope.parent?;
        }
    }

    pub(crate) fn constant_function(&self, scope: &'a Scope<'a>, name: Name) -> Option<&'a TaskFunc<'a>> {
        self.cf_map.borrow().get(&(scope.id, name)).copied()
    }

    pub(crate) fn register_constant_function(
        &self,
        scope: &'a Scope<'a>,
        name: Name,
        func: &'a TaskFunc<'a>,
    ) {
        self.cf_map.borrow_mut().insert((scope.id, name), func);
    }

    /// Mark a function definition as being instantiated as a constant
    /// function. Returns false if it already is, i.e. on recursion.
    pub(crate) fn enter_constant_function(&self, id: NodeId) -> bool {
        self.cf_in_progress.borrow_mut().insert(id)
    }

    pub(crate) fn leave_constant_function(&self, id: NodeId) {
        self.cf_in_progress.borrow_mut().remove(&id);
    }

    /// Remember the scope created for a named or generate block.
    pub(crate) fn register_block_scope(&self, pt_id: NodeId, scope: &'a Scope<'a>) {
        self.block_scopes.borrow_mut().insert(pt_id, scope);
    }

    pub(crate) fn block_scope(&self, pt_id: NodeId) -> Option<&'a Scope<'a>> {
        self.block_scopes.borrow().get(&pt_id).copied()
    }

    /// Queue a `defparam` for application at the end of phase 1.
    pub(crate) fn add_defparam(&self, scope: &'a Scope<'a>, pt: &'a ast::DefparamItem) {
        self.defparams_pending
            .borrow_mut()
            .push(PendingDefparam { scope, pt });
    }

    /// Apply all queued `defparam` items. An override re-runs the parameter
    /// type resolution with the new right-hand side; `localparam` targets
    /// are rejected.
    fn apply_defparams(&self) {
        let pending = std::mem::take(&mut *self.defparams_pending.borrow_mut());
        for PendingDefparam { scope, pt } in pending {
            let handle = match self.find_obj_up(scope, &pt.path, pt.name, None) {
                Some(h) => h,
                None => {
                    self.emit(
                        DiagBuilder2::error(format!("`{}` not found", pt.name)).span(pt.span),
                    );
                    continue;
                }
            };
            let param = match handle.parameter() {
                Some(p) => p,
                None => {
                    self.emit(
                        DiagBuilder2::error(format!("`{}` is not a parameter", pt.name))
                            .span(pt.span),
                    );
                    continue;
                }
            };
            if param.is_local_param() {
                self.emit(
                    DiagBuilder2::error(format!(
                        "`{}` is a localparam and cannot be overridden",
                        pt.name
                    ))
                    .span(pt.span),
                );
                continue;
            }
            let value = self.evaluate_expr(scope, &pt.rhs, true);
            param.set_expr(&pt.rhs, value);
            debug!("defparam override of {} applied", param.full_name());
            let dp = self.arena.defparams.alloc(DefParam {
                span: pt.span,
                module: scope.parent_module(),
                param,
                rhs: &pt.rhs,
            });
            self.defparams.borrow_mut().push(dp);
        }
    }

    /// Resolve a possibly hierarchical name. A simple name searches up the
    /// scope tree (bounded by `limit`); a dotted name resolves its first
    /// branch upward and then descends scope by scope.
    pub(crate) fn find_obj_up(
        &self,
        scope: &'a Scope<'a>,
        path: &[ast::NameBranch],
        name: Name,
        limit: Option<&Scope<'a>>,
    ) -> Option<ObjHandle<'a>> {
        if path.is_empty() {
            return self.symtab.find_up(scope, name, limit);
        }
        let mut cur = match self.symtab.find_up(scope, self.branch_name(&path[0]), limit) {
            Some(h) => h.scope()?,
            None => return None,
        };
        for branch in &path[1..] {
            cur = self.symtab.find(cur, self.branch_name(branch))?.scope()?;
        }
        self.symtab.find(cur, name)
    }

    /// The effective name of a hierarchical branch: generate block
    /// iterations are registered as `name[index]`.
    fn branch_name(&self, branch: &ast::NameBranch) -> Name {
        match branch.index {
            // the index of a name branch must be a literal
            Some(ref idx) => {
                let v = match &idx.data {
                    ast::ConstExpr(ast::ConstData::IntConst(v)) => *v as i32,
                    _ => 0,
                };
                crate::common::name::get_name_table()
                    .intern(&format!("{}[{}]", branch.name, v), true)
            }
            None => branch.name,
        }
    }

    /// Register an object in the symbol directory and log its creation.
    pub(crate) fn register(&self, scope: &'a Scope<'a>, handle: ObjHandle<'a>) {
        debug!(
            "{}({}.{}) created",
            handle.obj_kind(),
            scope.full_name(),
            handle.name()
        );
        self.symtab.register(scope, handle);
    }

    /// All objects of a kind in a scope, in registration order.
    pub fn objs(&self, scope: &Scope<'a>, kind: ObjKind) -> Vec<ObjHandle<'a>> {
        self.symtab.objs(scope, kind)
    }

    /// Find a name in a scope, without walking up.
    pub fn find_obj(&self, scope: &Scope<'a>, name: Name) -> Option<ObjHandle<'a>> {
        self.symtab.find(scope, name)
    }
}

impl<'a> DiagEmitter for Elaborator<'a> {
    fn emit(&self, diag: DiagBuilder2) {
        let sev = diag.get_severity();
        self.sess.emit(diag);

        // If this is anything more than a warning, emit a backtrace in debug
        // builds.
        if sev >= Severity::Warning {
            trace!(
                "Diagnostic triggered here:\n{:?}",
                backtrace::Backtrace::new()
            );
        }
    }
}

/// Collect the names of modules instantiated anywhere below the given items.
fn collect_inst_targets(items: &[ast::Item], out: &mut HashSet<Name>) {
    for item in items {
        match item.data {
            ast::Inst(ref inst) => {
                out.insert(inst.target);
            }
            ast::GenRegion(ref sub) => collect_inst_targets(sub, out),
            ast::GenFor(ref g) => collect_inst_targets(&g.block.items, out),
            ast::GenIf(ref g) => {
                collect_inst_targets(&g.then_blk.items, out);
                if let Some(e) = &g.else_blk {
                    collect_inst_targets(&e.items, out);
                }
            }
            ast::GenCase(ref g) => {
                for (_, blk) in &g.items {
                    collect_inst_targets(&blk.items, out);
                }
            }
            _ => (),
        }
    }
}
