// Copyright (c) 2016-2021 Fabian Schuiki

//! Scopes and the symbol directory.
//!
//! A [`Scope`] is a named region that owns declarations: a module, task,
//! function, named block, or generate block. Scopes form a tree along their
//! parents. The [`SymbolTable`] maps a name within a scope to exactly one
//! elaborated object, and additionally keeps per-scope, per-kind object lists
//! in registration order, which is what the VPI iteration interface walks.

use crate::crate_prelude::*;
use crate::decl::{Decl, DeclArray, Genvar, ObjKind};
use crate::param::Parameter;
use crate::taskfunc::TaskFunc;
use std::cell::RefCell;
use std::collections::HashMap;

/// The different kinds of scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// A module instance. Carries the net type used for undeclared
    /// identifiers, per the `\`default_nettype` in effect at the module
    /// declaration.
    Module { def_net_type: Option<ast::NetType> },
    Task,
    Function,
    /// A named begin/end block.
    Block,
    /// A generate block, e.g. one unrolled iteration of a generate for.
    GenBlock,
}

/// A named region owning declarations.
#[derive(Debug)]
pub struct Scope<'a> {
    pub id: NodeId,
    pub span: Span,
    pub kind: ScopeKind,
    pub name: Name,
    pub parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    /// The hierarchical name of this scope, e.g. `top.blk.f`.
    pub fn full_name(&self) -> String {
        match self.parent {
            Some(p) => format!("{}.{}", p.full_name(), self.name),
            None => format!("{}", self.name),
        }
    }

    /// The module instance this scope is part of. A module scope is its own
    /// parent module.
    pub fn parent_module(&'a self) -> &'a Scope<'a> {
        let mut scope = self;
        loop {
            if let ScopeKind::Module { .. } = scope.kind {
                return scope;
            }
            scope = scope
                .parent
                .expect("scope tree must be rooted in a module");
        }
    }

    /// The net type assumed for undeclared identifiers within this scope.
    pub fn def_net_type(&'a self) -> Option<ast::NetType> {
        match self.parent_module().kind {
            ScopeKind::Module { def_net_type } => def_net_type,
            _ => unreachable!(),
        }
    }

    /// The object kind of the scope, for legality checks.
    pub fn obj_kind(&self) -> ObjKind {
        match self.kind {
            ScopeKind::Module { .. } => ObjKind::Module,
            ScopeKind::Task => ObjKind::Task,
            ScopeKind::Function => ObjKind::Function,
            ScopeKind::Block | ScopeKind::GenBlock => ObjKind::Scope,
        }
    }
}

/// A handle on any elaborated object a name can resolve to.
#[derive(Debug, Clone, Copy)]
pub enum ObjHandle<'a> {
    Decl(&'a Decl<'a>),
    DeclArray(&'a DeclArray<'a>),
    Param(&'a Parameter<'a>),
    Genvar(&'a Genvar<'a>),
    TaskFunc(&'a TaskFunc<'a>),
    Scope(&'a Scope<'a>),
}

impl<'a> ObjHandle<'a> {
    /// The declaration behind the handle, if it is one.
    pub fn decl(&self) -> Option<&'a Decl<'a>> {
        match *self {
            ObjHandle::Decl(x) => Some(x),
            _ => None,
        }
    }

    /// The declaration array behind the handle, if it is one.
    pub fn decl_array(&self) -> Option<&'a DeclArray<'a>> {
        match *self {
            ObjHandle::DeclArray(x) => Some(x),
            _ => None,
        }
    }

    /// The parameter behind the handle, if it is one.
    pub fn parameter(&self) -> Option<&'a Parameter<'a>> {
        match *self {
            ObjHandle::Param(x) => Some(x),
            _ => None,
        }
    }

    /// The genvar behind the handle, if it is one.
    pub fn genvar(&self) -> Option<&'a Genvar<'a>> {
        match *self {
            ObjHandle::Genvar(x) => Some(x),
            _ => None,
        }
    }

    /// The task or function behind the handle, if it is one.
    pub fn taskfunc(&self) -> Option<&'a TaskFunc<'a>> {
        match *self {
            ObjHandle::TaskFunc(x) => Some(x),
            _ => None,
        }
    }

    /// The scope behind the handle, if it names one. Tasks and functions
    /// answer with their body scope.
    pub fn scope(&self) -> Option<&'a Scope<'a>> {
        match *self {
            ObjHandle::Scope(x) => Some(x),
            ObjHandle::TaskFunc(x) => Some(x.scope),
            _ => None,
        }
    }

    /// The kind of the referenced object.
    pub fn obj_kind(&self) -> ObjKind {
        match *self {
            ObjHandle::Decl(x) => x.kind(),
            ObjHandle::DeclArray(x) => x.elem_kind(),
            ObjHandle::Param(x) => x.kind(),
            ObjHandle::Genvar(_) => ObjKind::Genvar,
            ObjHandle::TaskFunc(x) => x.obj_kind(),
            ObjHandle::Scope(x) => x.obj_kind(),
        }
    }

    /// The name of the referenced object.
    pub fn name(&self) -> Name {
        match *self {
            ObjHandle::Decl(x) => x.name,
            ObjHandle::DeclArray(x) => x.name,
            ObjHandle::Param(x) => x.name,
            ObjHandle::Genvar(x) => x.name,
            ObjHandle::TaskFunc(x) => x.scope.name,
            ObjHandle::Scope(x) => x.name,
        }
    }

    /// The source location of the referenced object.
    pub fn span(&self) -> Span {
        match *self {
            ObjHandle::Decl(x) => x.span,
            ObjHandle::DeclArray(x) => x.span,
            ObjHandle::Param(x) => x.span,
            ObjHandle::Genvar(x) => x.span,
            ObjHandle::TaskFunc(x) => x.scope.span,
            ObjHandle::Scope(x) => x.span,
        }
    }
}

/// The scope-qualified, kind-partitioned symbol directory.
///
/// Registration is append-only during elaboration; nothing is ever removed.
#[derive(Default)]
pub struct SymbolTable<'a> {
    by_name: RefCell<HashMap<(NodeId, Name), ObjHandle<'a>>>,
    by_kind: RefCell<HashMap<(NodeId, ObjKind), Vec<ObjHandle<'a>>>>,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> SymbolTable<'a> {
        Default::default()
    }

    /// Register an object under its name in the given scope, and append it
    /// to the per-kind list it belongs to.
    pub fn register(&self, scope: &'a Scope<'a>, handle: ObjHandle<'a>) {
        self.register_as(scope, handle.name(), handle)
    }

    /// Register an object under an explicit name, e.g. the function result
    /// variable which shares the function's name.
    pub fn register_as(&self, scope: &'a Scope<'a>, name: Name, handle: ObjHandle<'a>) {
        self.by_name
            .borrow_mut()
            .insert((scope.id, name), handle);
        self.by_kind
            .borrow_mut()
            .entry((scope.id, handle.obj_kind()))
            .or_insert_with(Vec::new)
            .push(handle);
    }

    /// Look up a name in exactly one scope.
    pub fn find(&self, scope: &Scope<'a>, name: Name) -> Option<ObjHandle<'a>> {
        self.by_name.borrow().get(&(scope.id, name)).copied()
    }

    /// Look up a simple name, walking up the scope tree. If `limit` is
    /// given, the search does not proceed past that scope.
    pub fn find_up(
        &self,
        mut scope: &'a Scope<'a>,
        name: Name,
        limit: Option<&Scope<'a>>,
    ) -> Option<ObjHandle<'a>> {
        loop {
            if let Some(h) = self.find(scope, name) {
                return Some(h);
            }
            if let Some(l) = limit {
                if l.id == scope.id {
                    return None;
                }
            }
            scope = scope.parent?;
        }
    }

    /// All objects of one kind registered in a scope, in registration order.
    pub fn objs(&self, scope: &Scope<'a>, kind: ObjKind) -> Vec<ObjHandle<'a>> {
        self.by_kind
            .borrow()
            .get(&(scope.id, kind))
            .cloned()
            .unwrap_or_default()
    }
}
