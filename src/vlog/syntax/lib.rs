// Copyright (c) 2016-2021 Fabian Schuiki

//! The Verilog parse tree definitions of the mealy compiler framework.
//!
//! This crate defines the tree produced by an external Verilog parser and
//! consumed by the elaborator. The nodes are plain data: there is no lexer
//! and no parser in here, only the types and their constructors, such that a
//! parser — or a test — can assemble trees by hand.

pub mod ast;
