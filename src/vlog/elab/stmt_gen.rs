// Copyright (c) 2016-2021 Fabian Schuiki

//! Statement instantiation.
//!
//! Phase 1 walks a statement tree to create the scopes of named blocks and
//! to queue their declarations. Phase 3 (or the constant function pipeline)
//! turns the parse-tree statements into elaborated [`Stmt`] nodes. Inside a
//! constant function body, constructs with no compile-time meaning — event
//! controls, task enables, nonblocking assignments, system task calls — are
//! rejected here.

use crate::crate_prelude::*;
use crate::elab::Elaborator;
use crate::env::ElbEnv;
use crate::scope::{ObjHandle, Scope, ScopeKind};
use crate::stmt::{CaseItem, Stmt, StmtKind};

impl<'a> Elaborator<'a> {
    /// Phase 1 over a statement: create the scopes of named blocks.
    pub(crate) fn phase1_stmt(&self, scope: &'a Scope<'a>, pt_stmt: &'a ast::Stmt, cf: bool) {
        match pt_stmt.data {
            ast::BlockStmt {
                name,
                ref decls,
                ref stmts,
            } => {
                let inner = match name {
                    Some(n) => {
                        let blk = self.new_scope(Some(scope), ScopeKind::Block, n, pt_stmt.span);
                        self.register(scope, ObjHandle::Scope(blk));
                        self.register_block_scope(pt_stmt.id, blk);
                        self.phase1_decl(blk, decls, false);
                        if cf {
                            self.instantiate_decl(blk, decls);
                        } else {
                            self.add_phase2_stub(Box::new(move |elab| {
                                elab.instantiate_decl(blk, decls)
                            }));
                        }
                        blk
                    }
                    None => scope,
                };
                for s in stmts {
                    self.phase1_stmt(inner, s, cf);
                }
            }
            ast::IfStmt {
                ref then_stmt,
                ref else_stmt,
                ..
            } => {
                self.phase1_stmt(scope, then_stmt, cf);
                if let Some(e) = else_stmt {
                    self.phase1_stmt(scope, e, cf);
                }
            }
            ast::CaseStmt { ref items, .. } => {
                for item in items {
                    self.phase1_stmt(scope, &item.body, cf);
                }
            }
            ast::ForStmt { ref body, .. } | ast::WhileStmt { ref body, .. } => {
                self.phase1_stmt(scope, body, cf)
            }
            ast::EventControlStmt { ref body, .. } => self.phase1_stmt(scope, body, cf),
            _ => (),
        }
    }

    /// Instantiate a statement.
    pub(crate) fn instantiate_stmt(
        &self,
        scope: &'a Scope<'a>,
        env: ElbEnv<'a>,
        pt_stmt: &'a ast::Stmt,
    ) -> Result<&'a Stmt<'a>> {
        let cf = env.inside_constant_function();
        let kind = match pt_stmt.data {
            ast::NullStmt => StmtKind::Null,
            ast::BlockStmt {
                name,
                ref stmts,
                ..
            } => {
                let blk_scope = match name {
                    Some(_) => self.block_scope(pt_stmt.id),
                    None => None,
                };
                let inner = blk_scope.unwrap_or(scope);
                let mut elems = Vec::with_capacity(stmts.len());
                for s in stmts {
                    elems.push(self.instantiate_stmt(inner, env, s)?);
                }
                StmtKind::Block {
                    scope: blk_scope,
                    stmts: elems,
                }
            }
            ast::AssignStmt {
                blocking,
                ref lhs,
                ref rhs,
            } => {
                if cf && !blocking {
                    self.emit(
                        DiagBuilder2::error(
                            "nonblocking assignment shall not be used in a constant function",
                        )
                        .span(pt_stmt.span),
                    );
                    return Err(());
                }
                let lhs = self.instantiate_lhs(scope, env.var_lhs(), lhs)?;
                let rhs = self.instantiate_rhs(scope, env, rhs, lhs)?;
                StmtKind::Assign { blocking, lhs, rhs }
            }
            ast::IfStmt {
                ref cond,
                ref then_stmt,
                ref else_stmt,
            } => StmtKind::If {
                cond: self.instantiate_expr(scope, env, cond)?,
                then_stmt: self.instantiate_stmt(scope, env, then_stmt)?,
                else_stmt: match else_stmt {
                    Some(e) => Some(self.instantiate_stmt(scope, env, e)?),
                    None => None,
                },
            },
            ast::CaseStmt {
                ref expr,
                ref items,
            } => {
                let expr = self.instantiate_expr(scope, env, expr)?;
                let mut elems = Vec::with_capacity(items.len());
                for item in items {
                    let mut labels = Vec::with_capacity(item.labels.len());
                    for l in &item.labels {
                        labels.push(self.instantiate_expr(scope, env, l)?);
                    }
                    elems.push(CaseItem {
                        labels,
                        body: self.instantiate_stmt(scope, env, &item.body)?,
                    });
                }
                StmtKind::Case { expr, items: elems }
            }
            ast::ForStmt {
                ref init,
                ref cond,
                ref step,
                ref body,
            } => StmtKind::For {
                init: self.instantiate_stmt(scope, env, init)?,
                cond: self.instantiate_expr(scope, env, cond)?,
                step: self.instantiate_stmt(scope, env, step)?,
                body: self.instantiate_stmt(scope, env, body)?,
            },
            ast::WhileStmt { ref cond, ref body } => StmtKind::While {
                cond: self.instantiate_expr(scope, env, cond)?,
                body: self.instantiate_stmt(scope, env, body)?,
            },
            ast::EventControlStmt {
                ref events,
                ref body,
            } => {
                if cf {
                    self.emit(
                        DiagBuilder2::error(
                            "event control shall not be used in a constant function",
                        )
                        .span(pt_stmt.span),
                    );
                    return Err(());
                }
                let mut elems = Vec::with_capacity(events.len());
                for e in events {
                    elems.push(self.instantiate_event_expr(scope, env, e)?);
                }
                StmtKind::EventControl {
                    events: elems,
                    body: self.instantiate_stmt(scope, env, body)?,
                }
            }
            ast::EventTriggerStmt { ref event } => {
                if cf {
                    self.emit(
                        DiagBuilder2::error(
                            "event trigger shall not be used in a constant function",
                        )
                        .span(pt_stmt.span),
                    );
                    return Err(());
                }
                StmtKind::EventTrigger {
                    event: self.instantiate_namedevent(scope, event)?,
                }
            }
            ast::TaskEnableStmt {
                ref path,
                name,
                ref args,
            } => {
                if cf {
                    self.emit(
                        DiagBuilder2::error(
                            "task enable shall not be used in a constant function",
                        )
                        .span(pt_stmt.span),
                    );
                    return Err(());
                }
                let handle = match self.find_obj_up(scope, path, name, None) {
                    Some(h) => h,
                    None => return self.error_not_found(pt_stmt.span, name),
                };
                let task = match handle.taskfunc().filter(|tf| !tf.is_function()) {
                    Some(t) => t,
                    None => {
                        self.emit(
                            DiagBuilder2::error(format!("`{}` is not a task", name))
                                .span(pt_stmt.span),
                        );
                        return Err(());
                    }
                };
                let io = task.io();
                if io.len() != args.len() {
                    self.emit(
                        DiagBuilder2::error(format!(
                            "`{}` expects {} arguments, got {}",
                            name,
                            io.len(),
                            args.len()
                        ))
                        .span(pt_stmt.span),
                    );
                    return Err(());
                }
                let mut elems = Vec::with_capacity(args.len());
                for (pt_arg, io) in args.iter().zip(io.iter()) {
                    let arg = match io.dir {
                        ast::IoDir::Input => {
                            let e = self.instantiate_expr(scope, env, pt_arg)?;
                            e.set_reqsize(io.decl.value_type());
                            e
                        }
                        // output and inout arguments are left-hand sides
                        _ => self.instantiate_lhs(scope, env.var_lhs(), pt_arg)?,
                    };
                    elems.push(arg);
                }
                StmtKind::TaskEnable { task, args: elems }
            }
            ast::SysTaskEnableStmt { name, ref args } => {
                if cf {
                    self.emit(
                        DiagBuilder2::error(
                            "system task enable shall not be used in a constant function",
                        )
                        .span(pt_stmt.span),
                    );
                    return Err(());
                }
                let mut elems = Vec::with_capacity(args.len());
                for a in args {
                    elems.push(self.instantiate_arg(scope, env, a)?);
                }
                StmtKind::SysTaskEnable { name, args: elems }
            }
        };
        Ok(&*self.arena.stmts.alloc(Stmt::new(pt_stmt.span, kind)))
    }
}
