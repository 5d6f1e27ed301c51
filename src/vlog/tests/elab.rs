// Copyright (c) 2016-2021 Fabian Schuiki

mod common;
use common::*;

use mealy_vlog::ast;
use mealy_vlog::bitvec::BitVector;
use mealy_vlog::common::errors::Severity;
use mealy_vlog::common::Session;
use mealy_vlog::decl::ObjKind;
use mealy_vlog::elab::{ElabArenas, Elaborator};
use mealy_vlog::env::ElbEnv;

#[test]
fn empty_module() {
    let sess = Session::new();
    let root = root(vec![module("top")]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();
    assert_eq!(tops.len(), 1);
    assert_eq!(tops[0].full_name(), "top");
}

#[test]
fn two_dimensional_array() {
    // reg [0:3] arr[0:1][0:2]; element (1,2) sits at flat offset 5
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(decl_head(
        ast::DeclHeadKind::Reg,
        false,
        Some(vrange(0, 3)),
        vec![decl_item("arr", vec![vrange(0, 1), vrange(0, 2)], None)],
    ));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let arr = elab.find_obj(tops[0], n("arr")).unwrap().decl_array().unwrap();
    assert_eq!(arr.dimension(), 2);
    assert_eq!(arr.elem_size(), 6);
    assert_eq!(arr.dims.offset_of(&[1, 2]), Some(5));
    assert_eq!(arr.dims.indices_of(5), vec![1, 2]);

    // element storage is independent per flat slot
    arr.set_bitvector(&[1, 2], &BitVector::from_uint(0xa)).unwrap();
    assert_eq!(arr.get_bitvector(&[1, 2]).unwrap().to_uint(), Some(0xa));
    assert!(arr.get_bitvector(&[0, 2]).unwrap().has_xz());
    // an out-of-range tuple reads X and the write is dropped
    arr.set_bitvector(&[5, 0], &BitVector::from_uint(1)).unwrap();
    assert!(arr.get_bitvector(&[5, 0]).unwrap().has_xz());
}

#[test]
fn array_element_expression() {
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(decl_head(
        ast::DeclHeadKind::Reg,
        false,
        Some(vrange(7, 0)),
        vec![decl_item("mem", vec![vrange(0, 3)], None)],
    ));
    let root = root(vec![m]);
    let e = ident_idx("mem", vec![int(2)]);
    let wrong = ident_idx("mem", vec![int(0), int(0), int(0)]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let arr = elab.find_obj(tops[0], n("mem")).unwrap().decl_array().unwrap();
    arr.set_bitvector(&[2], &BitVector::from_uint(0x42)).unwrap();
    let e = elab.instantiate_expr(tops[0], ElbEnv::default(), &e).unwrap();
    assert_eq!(e.eval_bitvector(None).to_uint(), Some(0x42));

    // an index list that is neither dims nor dims+1 is a dimension mismatch
    assert!(elab
        .instantiate_expr(tops[0], ElbEnv::default(), &wrong)
        .is_err());
    assert!(sess.has_diag(Severity::Error, "dimension mismatch"));
}

#[test]
fn constant_function_evaluation() {
    // function [7:0] inc; input [7:0] x; inc = x + 1; endfunction
    // parameter P = inc(4); => 5
    let sess = Session::new();
    let mut m = module("top");
    m.items.push(func_decl(
        "inc",
        Some(vrange(7, 0)),
        &[("x", Some(vrange(7, 0)))],
        vec![],
        assign(ident("inc"), binary(ast::Op::Add, ident("x"), int(1))),
    ));
    m.decls.push(param("P", None, call("inc", vec![int(4)])));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let p = elab.find_obj(tops[0], n("P")).unwrap().parameter().unwrap();
    assert_eq!(p.value().bitvector_value(None).to_uint(), Some(5));
}

#[test]
fn constant_function_with_loop() {
    // function [31:0] fact; input [31:0] x; begin fact = 1;
    //   for (i = 1; i <= x; i = i + 1) fact = fact * i; end endfunction
    let sess = Session::new();
    let mut m = module("top");
    let body = block(
        None,
        vec![],
        vec![
            assign(ident("fact"), int(1)),
            for_loop(
                assign(ident("i"), int(1)),
                binary(ast::Op::Le, ident("i"), ident("x")),
                assign(ident("i"), binary(ast::Op::Add, ident("i"), int(1))),
                assign(ident("fact"), binary(ast::Op::Mul, ident("fact"), ident("i"))),
            ),
        ],
    );
    m.items.push(func_decl(
        "fact",
        Some(vrange(31, 0)),
        &[("x", Some(vrange(31, 0)))],
        vec![decl_head(
            ast::DeclHeadKind::Var(ast::VarKind::Integer),
            false,
            None,
            vec![decl_item("i", vec![], None)],
        )],
        body,
    ));
    m.decls.push(param("P", None, call("fact", vec![int(4)])));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let p = elab.find_obj(tops[0], n("P")).unwrap().parameter().unwrap();
    assert_eq!(p.value().bitvector_value(None).to_uint(), Some(24));
}

#[test]
fn recursive_constant_function_is_an_error() {
    // function f; input n; f = f(n); endfunction  parameter P = f(3);
    let sess = Session::new();
    let mut m = module("top");
    m.items.push(func_decl(
        "f",
        Some(vrange(7, 0)),
        &[("n", Some(vrange(7, 0)))],
        vec![],
        assign(ident("f"), call("f", vec![ident("n")])),
    ));
    m.decls.push(param("P", None, call("f", vec![int(3)])));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    assert!(elab.elaborate(&root).is_err());
    assert!(sess.has_diag(Severity::Error, "recursive constant function"));
}

#[test]
fn task_forward_reference() {
    // t1 calls t2, which is declared later in the same module
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("r", Some(vrange(7, 0))));
    m.items.push(task_decl(
        "t1",
        vec![],
        stmt(ast::TaskEnableStmt {
            path: vec![],
            name: n("t2"),
            args: vec![],
        }),
    ));
    m.items.push(task_decl("t2", vec![], assign(ident("r"), int(1))));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let t1 = elab.find_obj(tops[0], n("t1")).unwrap().taskfunc().unwrap();
    assert!(t1.stmt().is_some());
    assert!(!sess.failed());
}

#[test]
fn generate_for_expands_blocks() {
    // genvar i; for (i = 0; i < 3; i = i + 1) begin : blk wire [7:0] w; end
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(genvar("i"));
    m.items.push(item(ast::GenFor(ast::GenFor {
        genvar: n("i"),
        init: int(0),
        cond: binary(ast::Op::Lt, ident("i"), int(3)),
        step: binary(ast::Op::Add, ident("i"), int(1)),
        block: gen_block(Some("blk"), vec![wire("w", Some(vrange(7, 0)))], vec![]),
    })));
    let root = root(vec![m]);
    let hier = hier_ident(vec![("blk", Some(1))], "w");
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    for i in 0..3 {
        let blk = elab
            .find_obj(tops[0], n(&format!("blk[{}]", i)))
            .unwrap()
            .scope()
            .unwrap();
        let w = elab.find_obj(blk, n("w")).unwrap().decl().unwrap();
        assert_eq!(w.bit_size(), 8);
        assert_eq!(w.full_name(), format!("top.blk[{}].w", i));
    }
    assert!(elab.find_obj(tops[0], n("blk[3]")).is_none());

    // hierarchical names descend through the expanded blocks
    let e = elab
        .instantiate_expr(tops[0], ElbEnv::default(), &hier)
        .unwrap();
    assert_eq!(e.decompile(), "w");
}

#[test]
fn generate_if_picks_branch() {
    // parameter USE = 1; if (USE) begin : a wire x; end else begin : b wire y; end
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(param("USE", None, int(1)));
    m.items.push(item(ast::GenIf(ast::GenIf {
        cond: ident("USE"),
        then_blk: gen_block(Some("a"), vec![wire("x", None)], vec![]),
        else_blk: Some(gen_block(Some("b"), vec![wire("y", None)], vec![])),
    })));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    assert!(elab.find_obj(tops[0], n("a")).is_some());
    assert!(elab.find_obj(tops[0], n("b")).is_none());
}

#[test]
fn implicit_net_declared_on_use() {
    // assign u = r; with `u` undeclared creates an implicit one bit wire
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("r", None));
    m.items.push(item(ast::ContAssign(ast::ContAssign {
        strength: None,
        delay: None,
        assigns: vec![(ident("u"), ident("r"))],
    })));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let u = elab.find_obj(tops[0], n("u")).unwrap().decl().unwrap();
    assert_eq!(u.kind(), ObjKind::Net);
    assert_eq!(u.bit_size(), 1);
    assert_eq!(elab.cont_assigns.borrow().len(), 1);
}

#[test]
fn implicit_net_disabled_is_an_error() {
    let sess = Session::new();
    let mut m = module("top");
    m.def_net_type = None;
    m.items.push(item(ast::ContAssign(ast::ContAssign {
        strength: None,
        delay: None,
        assigns: vec![(ident("u"), int(1))],
    })));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    assert!(elab.elaborate(&root).is_err());
    assert!(sess.has_diag(Severity::Error, "not found"));
}

#[test]
fn net_initial_value_becomes_cont_assign() {
    // wire [3:0] w = 4'h7;
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(decl_head(
        ast::DeclHeadKind::Net {
            net_type: ast::NetType::Wire,
            strength: None,
            delay: None,
        },
        false,
        Some(vrange(3, 0)),
        vec![decl_item("w", vec![], Some(sized(4, ast::Base::Hex, "7")))],
    ));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    elab.elaborate(&root).unwrap();

    let assigns = elab.cont_assigns.borrow();
    assert_eq!(assigns.len(), 1);
    assert_eq!(assigns[0].lhs.decompile(), "w");
    assert_eq!(assigns[0].rhs.eval_bitvector(None).to_uint(), Some(7));
}

#[test]
fn io_range_conflict_is_an_error() {
    // task t; input [7:0] a; reg [3:0] a; ...
    let sess = Session::new();
    let mut m = module("top");
    let mut task = task_decl(
        "t",
        vec![io_head(ast::IoDir::Input, None, Some(vrange(7, 0)), &["a"])],
        stmt(ast::NullStmt),
    );
    if let ast::TaskDecl(ref mut t) = task.data {
        t.decls.push(reg("a", Some(vrange(3, 0))));
    }
    m.items.push(task);
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    assert!(elab.elaborate(&root).is_err());
    assert!(sess.has_diag(Severity::Error, "conflicting range"));
}

#[test]
fn process_with_event_control() {
    // always @(posedge clk or e) r = 1;
    let sess = Session::new();
    let mut m = module("top");
    m.decls.push(reg("clk", None));
    m.decls.push(reg("r", None));
    m.decls.push(event("e"));
    m.items.push(item(ast::Always(event_control(
        vec![unary(ast::Op::Posedge, ident("clk")), ident("e")],
        assign(ident("r"), int(1)),
    ))));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    elab.elaborate(&root).unwrap();

    let procs = elab.processes.borrow();
    assert_eq!(procs.len(), 1);
    assert!(procs[0].stmt().is_some());
    assert!(!sess.failed());
}

#[test]
fn named_block_owns_declarations() {
    // initial begin : blk integer i; i = 3; end
    let sess = Session::new();
    let mut m = module("top");
    m.items.push(item(ast::Initial(block(
        Some("blk"),
        vec![decl_head(
            ast::DeclHeadKind::Var(ast::VarKind::Integer),
            false,
            None,
            vec![decl_item("i", vec![], None)],
        )],
        vec![assign(ident("i"), int(3))],
    ))));
    let root = root(vec![m]);
    let arena = ElabArenas::default();
    let elab = Elaborator::new(&sess, &arena);
    let tops = elab.elaborate(&root).unwrap();

    let blk = elab.find_obj(tops[0], n("blk")).unwrap().scope().unwrap();
    let i = elab.find_obj(blk, n("i")).unwrap().decl().unwrap();
    assert_eq!(i.kind(), ObjKind::IntegerVar);
    assert_eq!(i.full_name(), "top.blk.i");
}
