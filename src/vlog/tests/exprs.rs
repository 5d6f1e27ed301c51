// Copyright (c) 2016-2021 Fabian Schuiki

mod common;
use common::*;

use mealy_vlog::ast;
use mealy_vlog::common::errors::Severity;
use mealy_vlog::common::Session;
use mealy_vlog::elab::{ElabArenas, Elaborator};
use mealy_vlog::env::ElbEnv;
use mealy_vlog::ty::ValueType;
use mealy_vlog::value::Scalar;

#[test]
fn binary_op_size_sign_propagation() {
    // reg [3:0] a; reg signed [7:0] b; typeof(a + b) is unsigned, sized, 8
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("a", Some(vrange(3, 0))));
    m.decls.push(reg_signed("b", Some(vrange(7, 0))));
    let root = root(vec![m]);
    let sum = binary(ast::Op::Add, ident("a"), ident("b"));
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let e = elab
        .instantiate_expr(tops[0], ElbEnv::default(), &sum)
        .unwrap();
    assert_eq!(e.value_type(), ValueType::unsigned(8));
}

#[test]
fn reqsize_widens_operands() {
    // a 4 bit literal added to an 8 bit reg evaluates at 8 bits
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("r", Some(vrange(7, 0))));
    let root = root(vec![m]);
    let sum = binary(ast::Op::Add, sized(4, ast::Base::Hex, "f"), ident("r"));
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let r = elab.find_obj(tops[0], n("r")).unwrap().decl().unwrap();
    r.set_bitvector(&mealy_vlog::bitvec::BitVector::from_uint(0x01).coerce(r.value_type()))
        .unwrap();
    let e = elab
        .instantiate_expr(tops[0], ElbEnv::default(), &sum)
        .unwrap();
    assert_eq!(e.value_type(), ValueType::unsigned(8));
    // 4'hf + 8'h01 does not wrap at 4 bits
    assert_eq!(e.eval_bitvector(None).to_uint(), Some(0x10));
}

#[test]
fn out_of_range_bitselect_warns_and_reads_x() {
    // reg [3:0] r; r[7] reads X; elaboration succeeds with a warning
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("r", Some(vrange(3, 0))));
    let root = root(vec![m]);
    let sel = ident_idx("r", vec![int(7)]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let r = elab.find_obj(tops[0], n("r")).unwrap().decl().unwrap();
    r.set_bitvector(&mealy_vlog::bitvec::BitVector::from_uint(0xf).coerce(r.value_type()))
        .unwrap();
    let e = elab
        .instantiate_expr(tops[0], ElbEnv::default(), &sel)
        .unwrap();
    assert_eq!(e.eval_scalar(), Scalar::X);
    assert!(sess.has_diag(Severity::Warning, "outside the declared range"));
    assert!(!sess.failed());
}

#[test]
fn in_range_bitselect_reads_value() {
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("r", Some(vrange(3, 0))));
    let root = root(vec![m]);
    let sel = ident_idx("r", vec![int(1)]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let r = elab.find_obj(tops[0], n("r")).unwrap().decl().unwrap();
    r.set_bitvector(&mealy_vlog::bitvec::BitVector::from_uint(0b0010).coerce(r.value_type()))
        .unwrap();
    let e = elab
        .instantiate_expr(tops[0], ElbEnv::default(), &sel)
        .unwrap();
    assert_eq!(e.eval_scalar(), Scalar::One);
}

#[test]
fn part_select_direction_must_match() {
    // reg [7:0] r; r[0:7] conflicts with the declared direction
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("r", Some(vrange(7, 0))));
    let root = root(vec![m]);
    let sel = ident_sel("r", ast::RangeMode::Colon, int(0), int(7));
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    assert!(elab
        .instantiate_expr(tops[0], ElbEnv::default(), &sel)
        .is_err());
    assert!(sess.has_diag(Severity::Error, "conflicts with the declared range"));
}

#[test]
fn indexed_part_select() {
    // reg [7:0] r = 8'ha5; r[4 +: 4] == 4'ha
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("r", Some(vrange(7, 0))));
    let root = root(vec![m]);
    let sel = ident_sel("r", ast::RangeMode::PlusColon, int(4), int(4));
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let r = elab.find_obj(tops[0], n("r")).unwrap().decl().unwrap();
    r.set_bitvector(&mealy_vlog::bitvec::BitVector::from_uint(0xa5).coerce(r.value_type()))
        .unwrap();
    let e = elab
        .instantiate_expr(tops[0], ElbEnv::default(), &sel)
        .unwrap();
    assert_eq!(e.value_type(), ValueType::unsigned(4));
    assert_eq!(e.eval_bitvector(None).to_uint(), Some(0xa));
}

#[test]
fn named_event_outside_event_expression_is_illegal() {
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(event("e"));
    let root = root(vec![m]);
    let use_plain = ident("e");
    let use_event = ident("e");
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    assert!(elab
        .instantiate_expr(tops[0], ElbEnv::default(), &use_plain)
        .is_err());
    assert!(sess.has_diag(Severity::Error, "illegal object type"));

    // in an event expression the same reference is fine
    assert!(elab
        .instantiate_event_expr(tops[0], ElbEnv::default(), &use_event)
        .is_ok());
}

#[test]
fn hierarchical_name_in_constant_expression_is_illegal() {
    let sess = Session::new();
    let m = module("top");
    let root = root(vec![m]);
    let e = hier_ident(vec![("sub", None)], "x");
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    assert!(elab.instantiate_constant_expr(tops[0], &e).is_err());
    assert!(sess.has_diag(Severity::Error, "hierarchical name"));
}

#[test]
fn lhs_concat_flattens_lsb_first() {
    // {a, b} assigned 8'ha5: a takes the high nibble, b the low one;
    // the flattened element list puts the least significant leaf first
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("a", Some(vrange(3, 0))));
    m.decls.push(reg("b", Some(vrange(3, 0))));
    let root = root(vec![m]);
    let lhs = concat(vec![ident("a"), ident("b")]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let e = elab
        .instantiate_lhs(tops[0], ElbEnv::default().var_lhs(), &lhs)
        .unwrap();
    assert_eq!(e.lhs_elem_num(), 2);
    assert_eq!(e.lhs_elem(0).unwrap().decompile(), "b");
    assert_eq!(e.lhs_elem(1).unwrap().decompile(), "a");

    e.assign_value(&mealy_vlog::value::Value::BitVec(
        mealy_vlog::bitvec::BitVector::from_literal(Some(8), false, ast::Base::Hex, "a5"),
    ))
    .unwrap();
    let a = elab.find_obj(tops[0], n("a")).unwrap().decl().unwrap();
    let b = elab.find_obj(tops[0], n("b")).unwrap().decl().unwrap();
    assert_eq!(a.get_bitvector().unwrap().to_uint(), Some(0xa));
    assert_eq!(b.get_bitvector().unwrap().to_uint(), Some(0x5));
}

#[test]
fn decompilation_round_trips_structure() {
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("a", Some(vrange(3, 0))));
    m.decls.push(reg("b", Some(vrange(3, 0))));
    let root = root(vec![m]);
    let e = ternary(
        binary(ast::Op::Lt, ident("a"), ident("b")),
        ident_idx("a", vec![int(0)]),
        sized(4, ast::Base::Hex, "f"),
    );
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let e = elab.instantiate_expr(tops[0], ElbEnv::default(), &e).unwrap();
    assert_eq!(e.decompile(), "((a < b) ? a[0] : 4'hf)");
}

#[test]
fn real_operand_rejected_for_bitwise() {
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(decl_head(
        ast::DeclHeadKind::Var(ast::VarKind::Real),
        false,
        None,
        vec![decl_item("x", vec![], None)],
    ));
    let root = root(vec![m]);
    let e = binary(ast::Op::BitAnd, ident("x"), int(1));
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    assert!(elab.instantiate_expr(tops[0], ElbEnv::default(), &e).is_err());
    assert!(sess.has_diag(Severity::Error, "real operand"));
}

#[test]
fn select_on_real_is_illegal() {
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(decl_head(
        ast::DeclHeadKind::Var(ast::VarKind::Real),
        false,
        None,
        vec![decl_item("x", vec![], None)],
    ));
    let root = root(vec![m]);
    let e = ident_idx("x", vec![int(0)]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    assert!(elab.instantiate_expr(tops[0], ElbEnv::default(), &e).is_err());
    assert!(sess.has_diag(Severity::Error, "bit/part select on a real"));
}
