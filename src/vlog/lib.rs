// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate implements the Verilog elaborator of the mealy compiler
//! framework.
//!
//! Elaboration takes a parse tree produced by an external parser and builds a
//! fully resolved, VPI-style object model out of it: declarations,
//! parameters, expressions, and their four-valued constant values. The
//! [`elab::Elaborator`] is the entry point; everything it creates lives in an
//! arena for the duration of the elaboration session and is observed through
//! the accessors on the created objects.

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

pub extern crate mealy_common as common;
pub extern crate mealy_vlog_syntax as syntax;

pub mod bitvec;
pub mod decl;
pub mod elab;
pub mod env;
pub mod expr;
pub mod item;
pub mod param;
pub mod range;
pub mod scope;
pub mod stmt;
pub mod taskfunc;
pub mod ty;
pub mod value;

pub use crate::syntax::ast;

/// A result whose error half carries no information: the diagnostic has
/// already been emitted.
pub type Result<T> = std::result::Result<T, ()>;

/// Items commonly used within the crate.
mod crate_prelude {
    #[allow(unused_imports)]
    pub(crate) use crate::{
        ast,
        common::errors::*,
        common::name::Name,
        common::source::{Span, Spanned},
        common::util::{HasDesc, HasSpan},
        common::NodeId,
        Result,
    };
}
