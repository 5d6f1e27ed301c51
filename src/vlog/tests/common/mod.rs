// Copyright (c) 2016-2021 Fabian Schuiki

//! Helpers to assemble parse trees by hand, standing in for the external
//! parser.

#![allow(dead_code)]

use mealy_vlog::ast;
use mealy_vlog::common::name::{get_name_table, Name};
use mealy_vlog::common::source::{Span, INVALID_SPAN};
use mealy_vlog::common::NodeId;

pub fn n(s: &str) -> Name {
    get_name_table().intern(s, true)
}

pub fn sp() -> Span {
    INVALID_SPAN
}

pub fn expr(data: ast::ExprData) -> ast::Expr {
    ast::Expr::new(sp(), data)
}

/// An undecorated decimal literal.
pub fn int(v: u32) -> ast::Expr {
    expr(ast::ConstExpr(ast::ConstData::IntConst(v)))
}

/// A possibly negative constant, written as `-literal` where needed.
pub fn num(v: i32) -> ast::Expr {
    if v < 0 {
        unary(ast::Op::Minus, int(v.unsigned_abs()))
    } else {
        int(v as u32)
    }
}

/// A sized based literal such as `8'hff`.
pub fn sized(size: u32, base: ast::Base, digits: &str) -> ast::Expr {
    expr(ast::ConstExpr(ast::ConstData::SizedConst {
        size,
        signed: false,
        base,
        digits: digits.to_string(),
    }))
}

pub fn real(v: f64) -> ast::Expr {
    expr(ast::ConstExpr(ast::ConstData::RealConst(v)))
}

pub fn primary(s: &str, indices: Vec<ast::Expr>, range_sel: Option<ast::RangeSel>) -> ast::Primary {
    ast::Primary {
        path: vec![],
        name: n(s),
        indices,
        const_index: false,
        range_sel,
    }
}

/// A simple identifier reference.
pub fn ident(s: &str) -> ast::Expr {
    expr(ast::PrimaryExpr(primary(s, vec![], None)))
}

/// An identifier with index expressions, e.g. `mem[3][1]`.
pub fn ident_idx(s: &str, indices: Vec<ast::Expr>) -> ast::Expr {
    expr(ast::PrimaryExpr(primary(s, indices, None)))
}

/// An identifier with a range select, e.g. `r[7:4]` or `r[base +: 2]`.
pub fn ident_sel(s: &str, mode: ast::RangeMode, left: ast::Expr, right: ast::Expr) -> ast::Expr {
    expr(ast::PrimaryExpr(primary(
        s,
        vec![],
        Some(ast::RangeSel {
            mode,
            left: Box::new(left),
            right: Box::new(right),
        }),
    )))
}

/// A hierarchical identifier, e.g. `blk[1].w`.
pub fn hier_ident(path: Vec<(&str, Option<i32>)>, s: &str) -> ast::Expr {
    expr(ast::PrimaryExpr(ast::Primary {
        path: path
            .into_iter()
            .map(|(name, index)| ast::NameBranch {
                name: n(name),
                index: index.map(|i| Box::new(num(i))),
            })
            .collect(),
        name: n(s),
        indices: vec![],
        const_index: false,
        range_sel: None,
    }))
}

pub fn unary(op: ast::Op, e: ast::Expr) -> ast::Expr {
    expr(ast::UnaryExpr(op, Box::new(e)))
}

pub fn binary(op: ast::Op, l: ast::Expr, r: ast::Expr) -> ast::Expr {
    expr(ast::BinaryExpr(op, Box::new(l), Box::new(r)))
}

pub fn ternary(c: ast::Expr, t: ast::Expr, e: ast::Expr) -> ast::Expr {
    expr(ast::TernaryExpr(Box::new(c), Box::new(t), Box::new(e)))
}

pub fn concat(parts: Vec<ast::Expr>) -> ast::Expr {
    expr(ast::ConcatExpr(parts))
}

pub fn call(s: &str, args: Vec<ast::Expr>) -> ast::Expr {
    expr(ast::CallExpr(n(s), args))
}

pub fn vrange(left: i32, right: i32) -> ast::RangeExpr {
    ast::RangeExpr {
        span: sp(),
        left: num(left),
        right: num(right),
    }
}

pub fn decl_item(s: &str, dims: Vec<ast::RangeExpr>, init: Option<ast::Expr>) -> ast::DeclItem {
    ast::DeclItem {
        id: NodeId::alloc(),
        span: sp(),
        name: n(s),
        name_span: sp(),
        dims,
        init,
    }
}

pub fn decl_head(
    kind: ast::DeclHeadKind,
    signed: bool,
    range: Option<ast::RangeExpr>,
    items: Vec<ast::DeclItem>,
) -> ast::DeclHead {
    ast::DeclHead {
        id: NodeId::alloc(),
        span: sp(),
        kind,
        signed,
        range,
        items,
    }
}

/// `reg [range] name;`
pub fn reg(s: &str, range: Option<ast::RangeExpr>) -> ast::DeclHead {
    decl_head(
        ast::DeclHeadKind::Reg,
        false,
        range,
        vec![decl_item(s, vec![], None)],
    )
}

/// `reg signed [range] name;`
pub fn reg_signed(s: &str, range: Option<ast::RangeExpr>) -> ast::DeclHead {
    decl_head(
        ast::DeclHeadKind::Reg,
        true,
        range,
        vec![decl_item(s, vec![], None)],
    )
}

/// `wire [range] name;`
pub fn wire(s: &str, range: Option<ast::RangeExpr>) -> ast::DeclHead {
    decl_head(
        ast::DeclHeadKind::Net {
            net_type: ast::NetType::Wire,
            strength: None,
            delay: None,
        },
        false,
        range,
        vec![decl_item(s, vec![], None)],
    )
}

/// `parameter [range] name = init;`
pub fn param(s: &str, range: Option<ast::RangeExpr>, init: ast::Expr) -> ast::DeclHead {
    decl_head(
        ast::DeclHeadKind::Param {
            local: false,
            var_kind: None,
        },
        false,
        range,
        vec![decl_item(s, vec![], Some(init))],
    )
}

/// `localparam name = init;`
pub fn localparam(s: &str, init: ast::Expr) -> ast::DeclHead {
    decl_head(
        ast::DeclHeadKind::Param {
            local: true,
            var_kind: None,
        },
        false,
        None,
        vec![decl_item(s, vec![], Some(init))],
    )
}

pub fn genvar(s: &str) -> ast::DeclHead {
    decl_head(
        ast::DeclHeadKind::Genvar,
        false,
        None,
        vec![decl_item(s, vec![], None)],
    )
}

pub fn event(s: &str) -> ast::DeclHead {
    decl_head(
        ast::DeclHeadKind::Event,
        false,
        None,
        vec![decl_item(s, vec![], None)],
    )
}

pub fn io_head(
    dir: ast::IoDir,
    aux_kind: Option<ast::IoAuxKind>,
    range: Option<ast::RangeExpr>,
    names: &[&str],
) -> ast::IoHead {
    ast::IoHead {
        id: NodeId::alloc(),
        span: sp(),
        dir,
        aux_kind,
        signed: false,
        range,
        items: names
            .iter()
            .map(|s| ast::IoItem {
                id: NodeId::alloc(),
                span: sp(),
                name: n(s),
            })
            .collect(),
    }
}

pub fn stmt(data: ast::StmtData) -> ast::Stmt {
    ast::Stmt {
        id: NodeId::alloc(),
        span: sp(),
        data,
    }
}

/// A blocking assignment statement.
pub fn assign(lhs: ast::Expr, rhs: ast::Expr) -> ast::Stmt {
    stmt(ast::AssignStmt {
        blocking: true,
        lhs,
        rhs,
    })
}

pub fn block(name: Option<&str>, decls: Vec<ast::DeclHead>, stmts: Vec<ast::Stmt>) -> ast::Stmt {
    stmt(ast::BlockStmt {
        name: name.map(n),
        decls,
        stmts,
    })
}

pub fn if_else(cond: ast::Expr, t: ast::Stmt, e: Option<ast::Stmt>) -> ast::Stmt {
    stmt(ast::IfStmt {
        cond,
        then_stmt: Box::new(t),
        else_stmt: e.map(Box::new),
    })
}

pub fn for_loop(init: ast::Stmt, cond: ast::Expr, step: ast::Stmt, body: ast::Stmt) -> ast::Stmt {
    stmt(ast::ForStmt {
        init: Box::new(init),
        cond,
        step: Box::new(step),
        body: Box::new(body),
    })
}

pub fn event_control(events: Vec<ast::Expr>, body: ast::Stmt) -> ast::Stmt {
    stmt(ast::EventControlStmt {
        events,
        body: Box::new(body),
    })
}

pub fn item(data: ast::ItemData) -> ast::Item {
    ast::Item {
        id: NodeId::alloc(),
        span: sp(),
        data,
    }
}

/// A function with one input and a body statement.
pub fn func_decl(
    s: &str,
    range: Option<ast::RangeExpr>,
    inputs: &[(&str, Option<ast::RangeExpr>)],
    decls: Vec<ast::DeclHead>,
    body: ast::Stmt,
) -> ast::Item {
    item(ast::FuncDecl(ast::FuncDecl {
        name: n(s),
        name_span: sp(),
        signed: false,
        range,
        var_kind: None,
        params: vec![],
        iodecls: inputs
            .iter()
            .map(|(name, r)| {
                io_head(
                    ast::IoDir::Input,
                    None,
                    r.as_ref().map(|r| ast::RangeExpr {
                        span: r.span,
                        left: clone_expr(&r.left),
                        right: clone_expr(&r.right),
                    }),
                    &[*name],
                )
            })
            .collect(),
        decls,
        body,
    }))
}

/// A task with IO declarations and a body statement.
pub fn task_decl(s: &str, iodecls: Vec<ast::IoHead>, body: ast::Stmt) -> ast::Item {
    item(ast::TaskDecl(ast::TaskDecl {
        name: n(s),
        name_span: sp(),
        params: vec![],
        iodecls,
        decls: vec![],
        body,
    }))
}

pub fn gen_block(name: Option<&str>, decls: Vec<ast::DeclHead>, items: Vec<ast::Item>) -> ast::GenBlock {
    ast::GenBlock {
        id: NodeId::alloc(),
        span: sp(),
        name: name.map(n),
        decls,
        items,
    }
}

/// An empty module shell with implicit nets enabled.
pub fn module(s: &str) -> ast::ModDecl {
    ast::ModDecl {
        id: NodeId::alloc(),
        span: sp(),
        name: n(s),
        name_span: sp(),
        def_net_type: Some(ast::NetType::Wire),
        paramports: vec![],
        iodecls: vec![],
        decls: vec![],
        items: vec![],
    }
}

pub fn root(modules: Vec<ast::ModDecl>) -> ast::Root {
    ast::Root { modules }
}

/// Structural clone of an expression, with fresh node IDs.
pub fn clone_expr(e: &ast::Expr) -> ast::Expr {
    let data = match &e.data {
        ast::ConstExpr(c) => ast::ConstExpr(c.clone()),
        ast::PrimaryExpr(p) => ast::PrimaryExpr(ast::Primary {
            path: p
                .path
                .iter()
                .map(|b| ast::NameBranch {
                    name: b.name,
                    index: b.index.as_ref().map(|i| Box::new(clone_expr(i))),
                })
                .collect(),
            name: p.name,
            indices: p.indices.iter().map(clone_expr).collect(),
            const_index: p.const_index,
            range_sel: p.range_sel.as_ref().map(|rs| ast::RangeSel {
                mode: rs.mode,
                left: Box::new(clone_expr(&rs.left)),
                right: Box::new(clone_expr(&rs.right)),
            }),
        }),
        ast::UnaryExpr(op, a) => ast::UnaryExpr(*op, Box::new(clone_expr(a))),
        ast::BinaryExpr(op, a, b) => {
            ast::BinaryExpr(*op, Box::new(clone_expr(a)), Box::new(clone_expr(b)))
        }
        ast::TernaryExpr(a, b, c) => ast::TernaryExpr(
            Box::new(clone_expr(a)),
            Box::new(clone_expr(b)),
            Box::new(clone_expr(c)),
        ),
        ast::ConcatExpr(parts) => ast::ConcatExpr(parts.iter().map(clone_expr).collect()),
        ast::MultiConcatExpr(rep, parts) => ast::MultiConcatExpr(
            Box::new(clone_expr(rep)),
            parts.iter().map(clone_expr).collect(),
        ),
        ast::CallExpr(name, args) => ast::CallExpr(*name, args.iter().map(clone_expr).collect()),
        ast::SysCallExpr(name, args) => {
            ast::SysCallExpr(*name, args.iter().map(clone_expr).collect())
        }
        ast::ParenExpr(a) => ast::ParenExpr(Box::new(clone_expr(a))),
    };
    ast::Expr::new(e.span, data)
}
