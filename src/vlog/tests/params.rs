// Copyright (c) 2016-2021 Fabian Schuiki

mod common;
use common::*;

use mealy_vlog::ast;
use mealy_vlog::common::Session;
use mealy_vlog::elab::{ElabArenas, Elaborator};
use mealy_vlog::ty::ValueType;

#[test]
fn parameter_with_range_is_unsigned_sized() {
    // parameter [7:0] P = 5;
    let sess = Session::new();
    let mut m = module("top");
    m.paramports.push(param("P", Some(vrange(7, 0)), int(5)));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();
    let top = tops[0];

    let p = elab.find_obj(top, n("P")).unwrap().parameter().unwrap();
    assert_eq!(p.value_type(), ValueType::unsigned(8));
    assert_eq!(p.bit_size(), 8);
    let bv = p.value().bitvector_value(None);
    assert_eq!(bv.size(), 8);
    assert_eq!(bv.to_uint(), Some(5));
}

#[test]
fn parameter_without_type_takes_value_type() {
    // parameter P = 5; => integer
    let sess = Session::new();
    let mut m = module("top");
    m.paramports.push(param("P", None, int(5)));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let p = elab.find_obj(tops[0], n("P")).unwrap().parameter().unwrap();
    assert_eq!(p.value_type(), ValueType::Integer);
    assert_eq!(p.value().int_value(), Some(5));
}

#[test]
fn parameter_sized_initializer_keeps_its_width() {
    // parameter P = 8'hff;
    let sess = Session::new();
    let mut m = module("top");
    m.paramports
        .push(param("P", None, sized(8, ast::Base::Hex, "ff")));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let p = elab.find_obj(tops[0], n("P")).unwrap().parameter().unwrap();
    assert_eq!(p.value_type(), ValueType::unsigned(8));
}

#[test]
fn parameter_range_coerces_override() {
    // parameter [3:0] P = 5; overridden with 8'hff => truncated to 4 bits
    let sess = Session::new();
    let mut m = module("top");
    m.paramports.push(param("P", Some(vrange(3, 0)), int(5)));
    let mut top = module("top2");
    top.items.push(item(ast::Inst(ast::InstItem {
        target: n("top"),
        param_assigns: vec![ast::Connection {
            span: sp(),
            name: Some(n("P")),
            expr: Some(sized(8, ast::Base::Hex, "ff")),
        }],
        insts: vec![ast::Inst {
            id: mealy_vlog::common::NodeId::alloc(),
            span: sp(),
            name: n("u0"),
            port_conns: vec![],
        }],
    })));
    let root = root(vec![m, top]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();
    assert_eq!(tops.len(), 1);

    let inst = elab.find_obj(tops[0], n("u0")).unwrap().scope().unwrap();
    let p = elab.find_obj(inst, n("P")).unwrap().parameter().unwrap();
    assert_eq!(p.value_type(), ValueType::unsigned(4));
    assert_eq!(p.value().bitvector_value(None).to_uint(), Some(0xf));
}

#[test]
fn localparam_is_immune_to_override() {
    // localparam L = 1; defparam L = 2; is rejected
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(localparam("L", int(1)));
    m.items.push(item(ast::Defparam(vec![ast::DefparamItem {
        span: sp(),
        path: vec![],
        name: n("L"),
        rhs: int(2),
    }])));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    assert!(elab.elaborate(&root).is_err());
    assert!(sess.has_diag(
        mealy_vlog::common::errors::Severity::Error,
        "cannot be overridden"
    ));

    let tops = elab.top_modules();
    let l = elab.find_obj(tops[0], n("L")).unwrap().parameter().unwrap();
    assert_eq!(l.value().int_value(), Some(1));
}

#[test]
fn defparam_reruns_type_resolution() {
    // parameter P = 1; defparam P = 8'hff; => unsigned, sized, 8 bits
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(param("P", None, int(1)));
    m.items.push(item(ast::Defparam(vec![ast::DefparamItem {
        span: sp(),
        path: vec![],
        name: n("P"),
        rhs: sized(8, ast::Base::Hex, "ff"),
    }])));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let p = elab.find_obj(tops[0], n("P")).unwrap().parameter().unwrap();
    assert_eq!(p.value_type(), ValueType::unsigned(8));
    assert_eq!(p.value().bitvector_value(None).to_uint(), Some(0xff));
    assert_eq!(elab.defparams.borrow().len(), 1);
}

#[test]
fn parameter_reference_in_range() {
    // parameter W = 8; reg [W-1:0] r; => 8 bit reg
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(param("W", None, int(8)));
    m.decls.push(reg(
        "r",
        Some(ast::RangeExpr {
            span: sp(),
            left: binary(ast::Op::Sub, ident("W"), int(1)),
            right: int(0),
        }),
    ));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let r = elab.find_obj(tops[0], n("r")).unwrap().decl().unwrap();
    assert_eq!(r.bit_size(), 8);
}
