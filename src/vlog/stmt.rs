// Copyright (c) 2016-2021 Fabian Schuiki

//! The elaborated statement model.
//!
//! Statements are instantiated for task and function bodies and for
//! processes. Most of them only ever sit in the object model for downstream
//! consumers to query; the one place the elaborator itself runs them is
//! constant function evaluation, where [`Stmt::execute`] interprets the body
//! against the declaration storage, single-threaded and depth-first.

use crate::crate_prelude::*;
use crate::expr::Expr;
use crate::scope::Scope;
use crate::taskfunc::TaskFunc;
use crate::value;

/// An elaborated statement.
#[derive(Debug)]
pub struct Stmt<'a> {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind<'a>,
}

/// One arm of a case statement. An arm without labels is the `default`.
#[derive(Debug)]
pub struct CaseItem<'a> {
    pub labels: Vec<&'a Expr<'a>>,
    pub body: &'a Stmt<'a>,
}

/// The different statement kinds.
#[derive(Debug)]
pub enum StmtKind<'a> {
    Null,
    Block {
        /// The scope a named block owns.
        scope: Option<&'a Scope<'a>>,
        stmts: Vec<&'a Stmt<'a>>,
    },
    Assign {
        blocking: bool,
        lhs: &'a Expr<'a>,
        rhs: &'a Expr<'a>,
    },
    If {
        cond: &'a Expr<'a>,
        then_stmt: &'a Stmt<'a>,
        else_stmt: Option<&'a Stmt<'a>>,
    },
    Case {
        expr: &'a Expr<'a>,
        items: Vec<CaseItem<'a>>,
    },
    For {
        init: &'a Stmt<'a>,
        cond: &'a Expr<'a>,
        step: &'a Stmt<'a>,
        body: &'a Stmt<'a>,
    },
    While {
        cond: &'a Expr<'a>,
        body: &'a Stmt<'a>,
    },
    EventControl {
        events: Vec<&'a Expr<'a>>,
        body: &'a Stmt<'a>,
    },
    EventTrigger {
        event: &'a Expr<'a>,
    },
    TaskEnable {
        task: &'a TaskFunc<'a>,
        args: Vec<&'a Expr<'a>>,
    },
    SysTaskEnable {
        name: Name,
        args: Vec<&'a Expr<'a>>,
    },
}

impl<'a> Stmt<'a> {
    pub fn new(span: Span, kind: StmtKind<'a>) -> Stmt<'a> {
        Stmt {
            id: NodeId::alloc(),
            span,
            kind,
        }
    }

    /// Interpret the statement during constant function evaluation.
    ///
    /// Assignments write through the left-hand side into declaration
    /// storage. Statements that have no compile-time meaning — event
    /// controls, task enables — have been rejected during instantiation of
    /// a constant function body and are skipped here.
    pub fn execute(&'a self) -> Result<()> {
        match self.kind {
            StmtKind::Null => Ok(()),
            StmtKind::Block { ref stmts, .. } => {
                for s in stmts {
                    s.execute()?;
                }
                Ok(())
            }
            StmtKind::Assign { lhs, rhs, .. } => {
                let v = rhs.eval_value();
                lhs.assign_value(&v)
            }
            StmtKind::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                if cond.eval_bool() {
                    then_stmt.execute()
                } else if let Some(e) = else_stmt {
                    e.execute()
                } else {
                    Ok(())
                }
            }
            StmtKind::Case { expr, ref items } => {
                let v = expr.eval_value();
                let mut default = None;
                for item in items {
                    if item.labels.is_empty() {
                        default = Some(item.body);
                        continue;
                    }
                    for label in &item.labels {
                        // case labels match with === semantics
                        if value::case_eq(&v, &label.eval_value())
                            .logic_value()
                            .to_bool()
                        {
                            return item.body.execute();
                        }
                    }
                }
                match default {
                    Some(d) => d.execute(),
                    None => Ok(()),
                }
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                init.execute()?;
                while cond.eval_bool() {
                    body.execute()?;
                    step.execute()?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                while cond.eval_bool() {
                    body.execute()?;
                }
                Ok(())
            }
            StmtKind::EventControl { .. }
            | StmtKind::EventTrigger { .. }
            | StmtKind::TaskEnable { .. }
            | StmtKind::SysTaskEnable { .. } => Ok(()),
        }
    }
}
