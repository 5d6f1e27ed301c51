// Copyright (c) 2016-2021 Fabian Schuiki

//! Tasks and functions.
//!
//! A [`TaskFunc`] couples the scope a task or function owns with its IO
//! declarations, its body statement, and — for functions — the result
//! variable that shares the function's name. The body statement and the IO
//! wiring are filled in by later elaboration phases, which is what makes
//! forward references between tasks work.

use crate::crate_prelude::*;
use crate::decl::{Decl, ObjKind};
use crate::range::Range;
use crate::scope::Scope;
use crate::stmt::Stmt;
use crate::ty::ValueType;
use crate::value::Value;
use std::cell::{Cell, RefCell};

/// Whether a [`TaskFunc`] is a task or a function, and the function return
/// type parts.
#[derive(Debug, Clone, Copy)]
pub enum TaskFuncKind {
    Task,
    Function {
        signed: bool,
        range: Option<Range>,
        var_kind: Option<ast::VarKind>,
    },
}

/// One IO declaration of a task or function.
#[derive(Debug, Clone, Copy)]
pub struct IoDecl<'a> {
    pub dir: ast::IoDir,
    pub decl: &'a Decl<'a>,
}

/// An elaborated task or function.
#[derive(Debug)]
pub struct TaskFunc<'a> {
    pub id: NodeId,
    /// The scope the task/function owns; its name is the task/function name.
    pub scope: &'a Scope<'a>,
    pub kind: TaskFuncKind,
    io: RefCell<Vec<IoDecl<'a>>>,
    /// The function result variable, carrying the function's name.
    ovar: RefCell<Option<&'a Decl<'a>>>,
    /// The body, instantiated in phase 3 (or immediately for constant
    /// functions).
    stmt: RefCell<Option<&'a Stmt<'a>>>,
    /// Set while a constant call to this function is being evaluated, to cut
    /// runaway recursion.
    in_use: Cell<bool>,
}

impl<'a> TaskFunc<'a> {
    pub fn new(scope: &'a Scope<'a>, kind: TaskFuncKind) -> TaskFunc<'a> {
        TaskFunc {
            id: NodeId::alloc(),
            scope,
            kind,
            io: RefCell::new(Vec::new()),
            ovar: RefCell::new(None),
            stmt: RefCell::new(None),
            in_use: Cell::new(false),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, TaskFuncKind::Function { .. })
    }

    pub fn obj_kind(&self) -> ObjKind {
        if self.is_function() {
            ObjKind::Function
        } else {
            ObjKind::Task
        }
    }

    pub fn full_name(&self) -> String {
        self.scope.full_name()
    }

    /// The type of the function return value; [`ValueType::None`] for a
    /// task.
    pub fn value_type(&self) -> ValueType {
        match self.kind {
            TaskFuncKind::Task => ValueType::None,
            TaskFuncKind::Function {
                signed,
                range,
                var_kind,
            } => match var_kind {
                Some(ast::VarKind::Integer) => ValueType::Integer,
                Some(ast::VarKind::Real) | Some(ast::VarKind::Realtime) => ValueType::Real,
                Some(ast::VarKind::Time) => ValueType::Time,
                None => ValueType::BitVector {
                    signed,
                    sized: true,
                    width: range.map(|r| r.size()).unwrap_or(1),
                },
            },
        }
    }

    /// Record one IO declaration.
    pub fn add_io(&self, io: IoDecl<'a>) {
        self.io.borrow_mut().push(io);
    }

    /// The IO declarations, in declaration order.
    pub fn io(&self) -> Vec<IoDecl<'a>> {
        self.io.borrow().clone()
    }

    /// The input declarations, in declaration order.
    pub fn inputs(&self) -> Vec<&'a Decl<'a>> {
        self.io
            .borrow()
            .iter()
            .filter(|io| io.dir == ast::IoDir::Input)
            .map(|io| io.decl)
            .collect()
    }

    /// Wire up the function result variable.
    pub fn set_ovar(&self, decl: &'a Decl<'a>) {
        *self.ovar.borrow_mut() = Some(decl);
    }

    pub fn ovar(&self) -> Option<&'a Decl<'a>> {
        *self.ovar.borrow()
    }

    /// Attach the elaborated body statement.
    pub fn set_stmt(&self, stmt: &'a Stmt<'a>) {
        *self.stmt.borrow_mut() = Some(stmt);
    }

    pub fn stmt(&self) -> Option<&'a Stmt<'a>> {
        *self.stmt.borrow()
    }

    /// Whether a constant call to this function is currently being
    /// evaluated.
    pub fn is_in_use(&self) -> bool {
        self.in_use.get()
    }

    /// Evaluate a constant call: bind the arguments to the input
    /// declarations, interpret the body, and read the result variable.
    /// A recursive call or a missing body yields an error value.
    pub fn eval_const_call(&self, args: &[Value]) -> Value {
        if self.in_use.get() {
            return Value::Error;
        }
        let stmt = match self.stmt() {
            Some(s) => s,
            None => return Value::Error,
        };
        let ovar = match self.ovar() {
            Some(o) => o,
            None => return Value::Error,
        };
        let inputs = self.inputs();
        if inputs.len() != args.len() {
            return Value::Error;
        }
        self.in_use.set(true);
        let mut failed = false;
        for (decl, arg) in inputs.iter().zip(args.iter()) {
            let coerced = arg.coerce(decl.value_type());
            let ok = match decl.value_type() {
                ValueType::Real => coerced
                    .real_value()
                    .map(|v| decl.set_real(v).is_ok())
                    .unwrap_or(false),
                _ => decl.set_bitvector(&coerced.bitvector_value(None)).is_ok(),
            };
            if !ok {
                failed = true;
            }
        }
        if !failed && stmt.execute().is_err() {
            failed = true;
        }
        let result = if failed {
            Value::Error
        } else {
            match ovar.value_type() {
                ValueType::Real => ovar
                    .get_real()
                    .map(Value::Real)
                    .unwrap_or(Value::Error),
                _ => ovar
                    .get_bitvector()
                    .map(Value::BitVec)
                    .unwrap_or(Value::Error),
            }
        };
        self.in_use.set(false);
        result
    }
}
