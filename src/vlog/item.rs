// Copyright (c) 2016-2021 Fabian Schuiki

//! Elaborated module items that are neither declarations nor expressions:
//! continuous assignments and processes.

use crate::crate_prelude::*;
use crate::expr::{Delay, Expr};
use crate::scope::Scope;
use crate::stmt::Stmt;
use std::cell::RefCell;

/// An elaborated continuous assignment.
#[derive(Debug)]
pub struct ContAssign<'a> {
    pub span: Span,
    pub module: &'a Scope<'a>,
    pub lhs: &'a Expr<'a>,
    pub rhs: &'a Expr<'a>,
    pub delay: Option<&'a Delay<'a>>,
}

/// The kind of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    Initial,
    Always,
}

/// An elaborated `initial` or `always` process. The body statement is
/// instantiated in phase 3.
#[derive(Debug)]
pub struct Process<'a> {
    pub id: NodeId,
    pub span: Span,
    pub scope: &'a Scope<'a>,
    pub kind: ProcessKind,
    stmt: RefCell<Option<&'a Stmt<'a>>>,
}

impl<'a> Process<'a> {
    pub fn new(span: Span, scope: &'a Scope<'a>, kind: ProcessKind) -> Process<'a> {
        Process {
            id: NodeId::alloc(),
            span,
            scope,
            kind,
            stmt: RefCell::new(None),
        }
    }

    pub fn set_stmt(&self, stmt: &'a Stmt<'a>) {
        *self.stmt.borrow_mut() = Some(stmt);
    }

    pub fn stmt(&self) -> Option<&'a Stmt<'a>> {
        *self.stmt.borrow()
    }
}
