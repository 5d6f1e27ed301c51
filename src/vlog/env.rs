// Copyright (c) 2016-2021 Fabian Schuiki

//! The elaboration environment.
//!
//! An [`ElbEnv`] records where in the grammar the walk currently is: inside a
//! constant expression, on the left-hand side of a particular assignment
//! form, inside a task or function, and so on. It is an immutable value;
//! derived environments are built by copying and adding a flag. The central
//! legality check [`ElbEnv::is_valid_primary`] decides which object kinds a
//! primary may resolve to in the current context.

use crate::decl::ObjKind;
use crate::taskfunc::TaskFunc;

bitflags! {
    struct EnvFlags: u16 {
        const CONSTANT          = 0x0001;
        const FUNCTION          = 0x0002;
        const CONSTANT_FUNCTION = 0x0004;
        const TASK              = 0x0008;
        const SYSTEM_TF_ARG     = 0x0010;
        const EVENT_EXPR        = 0x0020;
        const NET_LHS           = 0x0040;
        const VAR_LHS           = 0x0080;
        const PCA_LHS           = 0x0100;
        const FORCE_LHS         = 0x0200;
    }
}

/// The context an expression or declaration is instantiated in.
#[derive(Clone, Copy)]
pub struct ElbEnv<'a> {
    flags: EnvFlags,
    taskfunc: Option<&'a TaskFunc<'a>>,
}

impl<'a> Default for ElbEnv<'a> {
    fn default() -> ElbEnv<'a> {
        ElbEnv {
            flags: EnvFlags::empty(),
            taskfunc: None,
        }
    }
}

impl<'a> ElbEnv<'a> {
    /// The environment of a constant expression.
    pub fn constant() -> ElbEnv<'a> {
        ElbEnv {
            flags: EnvFlags::CONSTANT,
            taskfunc: None,
        }
    }

    /// The environment of a constant function body.
    pub fn constant_function(func: &'a TaskFunc<'a>) -> ElbEnv<'a> {
        ElbEnv {
            flags: EnvFlags::FUNCTION | EnvFlags::CONSTANT_FUNCTION,
            taskfunc: Some(func),
        }
    }

    /// The environment of an ordinary function body.
    pub fn function(func: &'a TaskFunc<'a>) -> ElbEnv<'a> {
        ElbEnv {
            flags: EnvFlags::FUNCTION,
            taskfunc: Some(func),
        }
    }

    /// The environment of a task body.
    pub fn task(task: &'a TaskFunc<'a>) -> ElbEnv<'a> {
        ElbEnv {
            flags: EnvFlags::TASK,
            taskfunc: Some(task),
        }
    }

    fn with(self, flag: EnvFlags) -> ElbEnv<'a> {
        ElbEnv {
            flags: self.flags | flag,
            taskfunc: self.taskfunc,
        }
    }

    /// Derive the environment of a system task/function argument.
    pub fn system_tf_arg(self) -> ElbEnv<'a> {
        self.with(EnvFlags::SYSTEM_TF_ARG)
    }

    /// Derive the environment of an event expression.
    pub fn event_expr(self) -> ElbEnv<'a> {
        self.with(EnvFlags::EVENT_EXPR)
    }

    /// Derive the environment of a continuous-assignment left-hand side.
    pub fn net_lhs(self) -> ElbEnv<'a> {
        self.with(EnvFlags::NET_LHS)
    }

    /// Derive the environment of a procedural-assignment left-hand side.
    pub fn var_lhs(self) -> ElbEnv<'a> {
        self.with(EnvFlags::VAR_LHS)
    }

    /// Derive the environment of an assign/deassign left-hand side.
    pub fn pca_lhs(self) -> ElbEnv<'a> {
        self.with(EnvFlags::PCA_LHS)
    }

    /// Derive the environment of a force/release left-hand side.
    pub fn force_lhs(self) -> ElbEnv<'a> {
        self.with(EnvFlags::FORCE_LHS)
    }

    pub fn is_constant(&self) -> bool {
        self.flags.contains(EnvFlags::CONSTANT)
    }

    pub fn inside_function(&self) -> bool {
        self.flags.contains(EnvFlags::FUNCTION)
    }

    pub fn inside_constant_function(&self) -> bool {
        self.flags.contains(EnvFlags::CONSTANT_FUNCTION)
    }

    pub fn inside_task(&self) -> bool {
        self.flags.contains(EnvFlags::TASK)
    }

    pub fn is_system_tf_arg(&self) -> bool {
        self.flags.contains(EnvFlags::SYSTEM_TF_ARG)
    }

    pub fn is_event_expr(&self) -> bool {
        self.flags.contains(EnvFlags::EVENT_EXPR)
    }

    pub fn is_net_lhs(&self) -> bool {
        self.flags.contains(EnvFlags::NET_LHS)
    }

    pub fn is_var_lhs(&self) -> bool {
        self.flags.contains(EnvFlags::VAR_LHS)
    }

    pub fn is_pca_lhs(&self) -> bool {
        self.flags.contains(EnvFlags::PCA_LHS)
    }

    pub fn is_force_lhs(&self) -> bool {
        self.flags.contains(EnvFlags::FORCE_LHS)
    }

    pub fn is_lhs(&self) -> bool {
        self.flags.intersects(
            EnvFlags::NET_LHS | EnvFlags::VAR_LHS | EnvFlags::PCA_LHS | EnvFlags::FORCE_LHS,
        )
    }

    /// The enclosing task or function, if any.
    pub fn taskfunc(&self) -> Option<&'a TaskFunc<'a>> {
        self.taskfunc
    }

    /// Whether a primary resolving to an object of the given kind is legal
    /// in this context. `has_select` is true if the primary carries a bit or
    /// part select.
    pub fn is_valid_primary(&self, kind: ObjKind, has_select: bool) -> bool {
        match kind {
            // A named event may only stand in an event expression, and never
            // with a select on it.
            ObjKind::NamedEvent => self.is_event_expr() && !has_select,
            // Selects on reals are rejected; a plain real reference is fine.
            ObjKind::RealVar => !has_select,
            ObjKind::Net
            | ObjKind::Reg
            | ObjKind::IntegerVar
            | ObjKind::TimeVar
            | ObjKind::Parameter
            | ObjKind::SpecParam
            | ObjKind::Genvar => true,
            _ => false,
        }
    }
}
