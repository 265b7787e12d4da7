//! Abstract syntax tree.
//!
//! Every statement carries the 1-based line it starts on; the runtime fires
//! its line events from these numbers.

#![allow(missing_docs)]

use std::rc::Rc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// A parsed source unit.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// Statement with its starting line.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub line: u32,
    pub kind: StmtKind,
}

impl Stmt {
    #[must_use]
    pub fn new(line: u32, kind: StmtKind) -> Self {
        Self { line, kind }
    }

    /// Constant expression statements (docstrings) compile to nothing and
    /// never produce a line event.
    #[must_use]
    pub fn is_constant_expr(&self) -> bool {
        matches!(self.kind, StmtKind::Expr(Expr::Literal(_)))
    }
}

/// Statement node.
#[derive(Debug, Clone)]
pub enum StmtKind {
    Expr(Expr),
    /// `a = b = value`; targets are assigned left to right.
    Assign {
        targets: Vec<Target>,
        value: Expr,
    },
    AugAssign {
        target: Target,
        op: BinaryOp,
        value: Expr,
    },
    If {
        branches: Vec<IfBranch>,
        orelse: Vec<Stmt>,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
    },
    For {
        target: Target,
        iter: Expr,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
    Pass,
    Return(Option<Expr>),
    Raise(Option<Expr>),
    FunctionDef(Rc<FunctionDef>),
}

/// One `if`/`elif` arm. The first arm's line equals the statement line.
#[derive(Debug, Clone)]
pub struct IfBranch {
    pub line: u32,
    pub test: Expr,
    pub body: Vec<Stmt>,
}

/// Function definition.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: SmolStr,
    pub line: u32,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    /// Names bound anywhere in the body (parameters included); reads of
    /// these never fall through to globals.
    pub locals: FxHashSet<SmolStr>,
}

impl FunctionDef {
    /// Number of parameters without a default value.
    #[must_use]
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }
}

/// Function parameter with an optional default.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: SmolStr,
    pub default: Option<Expr>,
}

/// Assignment target.
#[derive(Debug, Clone)]
pub enum Target {
    Name(SmolStr),
    Subscript { value: Box<Expr>, index: Box<Expr> },
    Tuple(Vec<Target>),
}

impl Target {
    /// Collect every plain name bound by this target.
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a SmolStr>) {
        match self {
            Target::Name(name) => out.push(name),
            Target::Subscript { .. } => {}
            Target::Tuple(items) => {
                for item in items {
                    item.bound_names(out);
                }
            }
        }
    }
}

/// Literal constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmolStr),
}

/// Keyword argument in a call.
#[derive(Debug, Clone)]
pub struct Keyword {
    pub name: SmolStr,
    pub value: Expr,
}

/// Expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Name(SmolStr),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    /// Only valid as a subscript index.
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Attribute {
        value: Box<Expr>,
        attr: SmolStr,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    BoolOp {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Chained comparison `a < b <= c`.
    Compare {
        left: Box<Expr>,
        rest: Vec<(CompareOp, Expr)>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// Short-circuit boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CompareOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
        }
    }
}
