// Copyright (c) 2016-2021 Fabian Schuiki

//! The mealy Verilog elaboration framework.
//!
//! This crate ties the framework together: the shared compiler plumbing in
//! [`common`], the parse-tree definitions in [`syntax`], and the elaborator
//! itself in [`vlog`].

pub extern crate mealy_common as common;
pub extern crate mealy_vlog as vlog;
pub extern crate mealy_vlog_syntax as syntax;

pub use crate::common::{NodeId, Session};
pub use crate::vlog::elab::{ElabArenas, Elaborator};
