// Copyright (c) 2016-2021 Fabian Schuiki

//! The nodes of the Verilog parse tree.
//!
//! The elaborator never mutates these nodes; they are shared, read-only input.
//! All nodes carry the span they cover in the source text.

use mealy_common::name::Name;
use mealy_common::source::Span;
use mealy_common::util::{HasDesc, HasSpan};
use mealy_common::NodeId;

pub use self::ExprData::*;
pub use self::ItemData::*;
pub use self::StmtData::*;

/// The root of a parsed source text: a list of module declarations.
#[derive(Debug)]
pub struct Root {
    pub modules: Vec<ModDecl>,
}

/// A module declaration.
#[derive(Debug)]
pub struct ModDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Name,
    pub name_span: Span,
    /// The net type `\`default_nettype` establishes for undeclared
    /// identifiers, or `None` if implicit nets are disabled.
    pub def_net_type: Option<NetType>,
    /// Parameter declarations in the `#(...)` header.
    pub paramports: Vec<DeclHead>,
    /// IO declarations.
    pub iodecls: Vec<IoHead>,
    /// Declarations in the module body.
    pub decls: Vec<DeclHead>,
    /// Items in the module body.
    pub items: Vec<Item>,
}

impl HasSpan for ModDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn human_span(&self) -> Span {
        self.name_span
    }
}

impl HasDesc for ModDecl {
    fn desc(&self) -> &'static str {
        "module declaration"
    }

    fn desc_full(&self) -> String {
        format!("module `{}`", self.name)
    }
}

/// The net types of IEEE 1364.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetType {
    Wire,
    Tri,
    Tri0,
    Tri1,
    Wand,
    TriAnd,
    Wor,
    TriOr,
    Supply0,
    Supply1,
}

/// A drive strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Supply,
    Strong,
    Pull,
    Weak,
    HighZ,
}

/// The variable kinds that carry their own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Integer,
    Real,
    Realtime,
    Time,
}

/// A declaration statement head. One head covers all items declared in the
/// same statement, e.g. both `a` and `b` in `reg signed [7:0] a, b;`.
#[derive(Debug)]
pub struct DeclHead {
    pub id: NodeId,
    pub span: Span,
    pub kind: DeclHeadKind,
    pub signed: bool,
    pub range: Option<RangeExpr>,
    pub items: Vec<DeclItem>,
}

/// What a declaration head declares.
#[derive(Debug)]
pub enum DeclHeadKind {
    Net {
        net_type: NetType,
        strength: Option<(Strength, Strength)>,
        delay: Option<Delay>,
    },
    Reg,
    Var(VarKind),
    Event,
    Genvar,
    Param { local: bool, var_kind: Option<VarKind> },
    Specparam,
}

impl DeclHead {
    /// Whether this head declares a `parameter` or `localparam`.
    pub fn is_param(&self) -> bool {
        matches!(self.kind, DeclHeadKind::Param { .. })
    }
}

/// A single declared item under a declaration head.
#[derive(Debug)]
pub struct DeclItem {
    pub id: NodeId,
    pub span: Span,
    pub name: Name,
    pub name_span: Span,
    /// Array dimensions, outermost first.
    pub dims: Vec<RangeExpr>,
    /// The initial value, where the grammar allows one.
    pub init: Option<Expr>,
}

/// A `[left:right]` range in a declaration.
#[derive(Debug)]
pub struct RangeExpr {
    pub span: Span,
    pub left: Expr,
    pub right: Expr,
}

/// An IO declaration head.
#[derive(Debug)]
pub struct IoHead {
    pub id: NodeId,
    pub span: Span,
    pub dir: IoDir,
    /// The auxiliary type if the declaration doubles as a variable
    /// declaration, e.g. `output reg [7:0] q;`.
    pub aux_kind: Option<IoAuxKind>,
    pub signed: bool,
    pub range: Option<RangeExpr>,
    pub items: Vec<IoItem>,
}

/// The direction of an IO declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDir {
    Input,
    Output,
    Inout,
}

/// The auxiliary type of an IO declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAuxKind {
    Net(NetType),
    Reg,
    Var(VarKind),
}

/// A single name in an IO declaration head.
#[derive(Debug)]
pub struct IoItem {
    pub id: NodeId,
    pub span: Span,
    pub name: Name,
}

/// A delay control, carrying one to three expressions.
#[derive(Debug)]
pub struct Delay {
    pub span: Span,
    pub values: Vec<Expr>,
}

/// An item in a module or generate block.
#[derive(Debug)]
pub struct Item {
    pub id: NodeId,
    pub span: Span,
    pub data: ItemData,
}

/// The different kinds of items.
#[derive(Debug)]
pub enum ItemData {
    TaskDecl(TaskDecl),
    FuncDecl(FuncDecl),
    /// A `generate ... endgenerate` region.
    GenRegion(Vec<Item>),
    GenFor(GenFor),
    GenIf(GenIf),
    GenCase(GenCase),
    ContAssign(ContAssign),
    Defparam(Vec<DefparamItem>),
    Initial(Stmt),
    Always(Stmt),
    Inst(InstItem),
}

/// A task declaration.
#[derive(Debug)]
pub struct TaskDecl {
    pub name: Name,
    pub name_span: Span,
    pub params: Vec<DeclHead>,
    pub iodecls: Vec<IoHead>,
    pub decls: Vec<DeclHead>,
    pub body: Stmt,
}

/// A function declaration.
#[derive(Debug)]
pub struct FuncDecl {
    pub name: Name,
    pub name_span: Span,
    pub signed: bool,
    /// The range of the return value. Exclusive with `var_kind`.
    pub range: Option<RangeExpr>,
    /// The data type of the return value, if not an implicit reg.
    pub var_kind: Option<VarKind>,
    pub params: Vec<DeclHead>,
    pub iodecls: Vec<IoHead>,
    pub decls: Vec<DeclHead>,
    pub body: Stmt,
}

/// A generate for loop.
#[derive(Debug)]
pub struct GenFor {
    /// The genvar assigned in the initialization.
    pub genvar: Name,
    pub init: Expr,
    pub cond: Expr,
    /// The value assigned to the genvar at the end of each iteration.
    pub step: Expr,
    pub block: GenBlock,
}

/// A generate if.
#[derive(Debug)]
pub struct GenIf {
    pub cond: Expr,
    pub then_blk: GenBlock,
    pub else_blk: Option<GenBlock>,
}

/// A generate case.
#[derive(Debug)]
pub struct GenCase {
    pub expr: Expr,
    /// Case items; an item with no labels is the `default`.
    pub items: Vec<(Vec<Expr>, GenBlock)>,
}

/// The body of a generate construct.
#[derive(Debug)]
pub struct GenBlock {
    pub id: NodeId,
    pub span: Span,
    pub name: Option<Name>,
    pub decls: Vec<DeclHead>,
    pub items: Vec<Item>,
}

/// A continuous assignment item, covering all assignments of one statement.
#[derive(Debug)]
pub struct ContAssign {
    pub strength: Option<(Strength, Strength)>,
    pub delay: Option<Delay>,
    pub assigns: Vec<(Expr, Expr)>,
}

/// One `defparam` assignment.
#[derive(Debug)]
pub struct DefparamItem {
    pub span: Span,
    pub path: Vec<NameBranch>,
    pub name: Name,
    pub rhs: Expr,
}

/// A module instantiation item.
#[derive(Debug)]
pub struct InstItem {
    /// The name of the instantiated module.
    pub target: Name,
    /// Parameter value assignments in the `#(...)` header.
    pub param_assigns: Vec<Connection>,
    pub insts: Vec<Inst>,
}

/// A single instance in a module instantiation item.
#[derive(Debug)]
pub struct Inst {
    pub id: NodeId,
    pub span: Span,
    pub name: Name,
    pub port_conns: Vec<Connection>,
}

/// An ordered or named connection.
#[derive(Debug)]
pub struct Connection {
    pub span: Span,
    /// The formal name for named connections.
    pub name: Option<Name>,
    /// The actual expression; `None` for an explicitly open connection.
    pub expr: Option<Expr>,
}

/// A statement.
#[derive(Debug)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub data: StmtData,
}

/// The different kinds of statements.
#[derive(Debug)]
pub enum StmtData {
    NullStmt,
    BlockStmt {
        name: Option<Name>,
        decls: Vec<DeclHead>,
        stmts: Vec<Stmt>,
    },
    AssignStmt {
        blocking: bool,
        lhs: Expr,
        rhs: Expr,
    },
    IfStmt {
        cond: Expr,
        then_stmt: Box<Stmt>,
        else_stmt: Option<Box<Stmt>>,
    },
    CaseStmt {
        expr: Expr,
        items: Vec<CaseItem>,
    },
    ForStmt {
        init: Box<Stmt>,
        cond: Expr,
        step: Box<Stmt>,
        body: Box<Stmt>,
    },
    WhileStmt {
        cond: Expr,
        body: Box<Stmt>,
    },
    EventControlStmt {
        events: Vec<Expr>,
        body: Box<Stmt>,
    },
    /// An event trigger, `-> e;`. The expression is a named-event primary.
    EventTriggerStmt {
        event: Expr,
    },
    TaskEnableStmt {
        path: Vec<NameBranch>,
        name: Name,
        args: Vec<Expr>,
    },
    SysTaskEnableStmt {
        name: Name,
        args: Vec<Expr>,
    },
}

/// One arm of a case statement. An arm with no labels is the `default`.
#[derive(Debug)]
pub struct CaseItem {
    pub span: Span,
    pub labels: Vec<Expr>,
    pub body: Stmt,
}

/// An expression.
#[derive(Debug)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub data: ExprData,
}

impl Expr {
    pub fn new(span: Span, data: ExprData) -> Expr {
        Expr {
            id: NodeId::alloc(),
            span,
            data,
        }
    }
}

impl HasSpan for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

impl HasDesc for Expr {
    fn desc(&self) -> &'static str {
        "expression"
    }
}

/// The different kinds of expressions.
#[derive(Debug)]
pub enum ExprData {
    ConstExpr(ConstData),
    PrimaryExpr(Primary),
    UnaryExpr(Op, Box<Expr>),
    BinaryExpr(Op, Box<Expr>, Box<Expr>),
    TernaryExpr(Box<Expr>, Box<Expr>, Box<Expr>),
    ConcatExpr(Vec<Expr>),
    MultiConcatExpr(Box<Expr>, Vec<Expr>),
    CallExpr(Name, Vec<Expr>),
    SysCallExpr(Name, Vec<Expr>),
    /// A parenthesized expression. Transparent to elaboration.
    ParenExpr(Box<Expr>),
}

/// A literal constant.
#[derive(Debug, Clone)]
pub enum ConstData {
    /// A plain unsized decimal literal such as `42`.
    IntConst(u32),
    /// A based literal with an explicit size, such as `8'hff`. The digits are
    /// kept verbatim and may contain `x`, `z` and `?`.
    SizedConst {
        size: u32,
        signed: bool,
        base: Base,
        digits: String,
    },
    /// A based literal without a size, such as `'hff`.
    BasedConst {
        signed: bool,
        base: Base,
        digits: String,
    },
    RealConst(f64),
    StringConst(String),
}

/// The base of a based literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    Bin,
    Oct,
    Dec,
    Hex,
}

/// An identifier reference, possibly hierarchical, indexed, and with a
/// bit or part select.
#[derive(Debug)]
pub struct Primary {
    /// The hierarchical prefix, outermost first.
    pub path: Vec<NameBranch>,
    pub name: Name,
    /// Index expressions. The last one may be a bit select.
    pub indices: Vec<Expr>,
    /// Force indices to be treated as constant expressions.
    pub const_index: bool,
    /// A trailing range select.
    pub range_sel: Option<RangeSel>,
}

impl Primary {
    /// Whether this is a bare identifier without hierarchy, indices, or
    /// selects.
    pub fn is_simple(&self) -> bool {
        self.path.is_empty() && self.indices.is_empty() && self.range_sel.is_none()
    }
}

/// One step of a hierarchical name.
#[derive(Debug)]
pub struct NameBranch {
    pub name: Name,
    pub index: Option<Box<Expr>>,
}

/// A range select on a primary.
#[derive(Debug)]
pub struct RangeSel {
    pub mode: RangeMode,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// The addressing mode of a range select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// `[msb:lsb]`
    Colon,
    /// `[base +: width]`
    PlusColon,
    /// `[base -: width]`
    MinusColon,
}

/// The operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // unary
    Plus,
    Minus,
    LogicNot,
    BitNeg,
    RedAnd,
    RedNand,
    RedOr,
    RedNor,
    RedXor,
    RedXnor,
    Posedge,
    Negedge,
    // binary
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    LogicAnd,
    LogicOr,
    BitAnd,
    BitOr,
    BitXor,
    BitXnor,
    Eq,
    Neq,
    CaseEq,
    CaseNeq,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    Ashl,
    Ashr,
}

impl Op {
    /// The source-text spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::LogicNot => "!",
            Op::BitNeg => "~",
            Op::RedAnd => "&",
            Op::RedNand => "~&",
            Op::RedOr => "|",
            Op::RedNor => "~|",
            Op::RedXor => "^",
            Op::RedXnor => "~^",
            Op::Posedge => "posedge ",
            Op::Negedge => "negedge ",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Pow => "**",
            Op::LogicAnd => "&&",
            Op::LogicOr => "||",
            Op::BitAnd => "&",
            Op::BitOr => "|",
            Op::BitXor => "^",
            Op::BitXnor => "~^",
            Op::Eq => "==",
            Op::Neq => "!=",
            Op::CaseEq => "===",
            Op::CaseNeq => "!==",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Le => "<=",
            Op::Ge => ">=",
            Op::Shl => "<<",
            Op::Shr => ">>",
            Op::Ashl => "<<<",
            Op::Ashr => ">>>",
        }
    }
}
