// ABOUTME: Syntax tree node types produced by the parser

use std::rc::Rc;

/// A function parameter. The type note is parsed but carries no semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_note: Option<String>,
}

/// A function declaration. Shared behind `Rc` so closures can reference the
/// declaration without copying the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_note: Option<String>,
    pub body: Vec<Stmt>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let {
        name: String,
        type_note: Option<String>,
        init: Option<Expr>,
        line: u32,
        column: u32,
    },
    Const {
        name: String,
        type_note: Option<String>,
        init: Expr,
        line: u32,
        column: u32,
    },
    Assign {
        name: String,
        value: Expr,
        line: u32,
        column: u32,
    },
    IndexAssign {
        name: String,
        index: Expr,
        value: Expr,
        line: u32,
        column: u32,
    },
    If {
        /// Guard/body pairs: the `if` arm followed by any `else if` arms.
        branches: Vec<(Expr, Vec<Stmt>)>,
        else_body: Option<Vec<Stmt>>,
        line: u32,
        column: u32,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        line: u32,
        column: u32,
    },
    For {
        variable: String,
        iterable: Expr,
        body: Vec<Stmt>,
        line: u32,
        column: u32,
    },
    FuncDecl(Rc<FuncDecl>),
    Return {
        value: Option<Expr>,
        line: u32,
        column: u32,
    },
    Break {
        line: u32,
        column: u32,
    },
    Continue {
        line: u32,
        column: u32,
    },
    Import {
        path: String,
        line: u32,
        column: u32,
    },
    TryCatch {
        body: Vec<Stmt>,
        variable: String,
        handler: Vec<Stmt>,
        line: u32,
        column: u32,
    },
    Expression(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        line: u32,
        column: u32,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: u32,
        column: u32,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        line: u32,
        column: u32,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        line: u32,
        column: u32,
    },
    Array {
        elements: Vec<Expr>,
        line: u32,
        column: u32,
    },
    Number {
        value: f64,
        /// True when the literal was written with a decimal point.
        is_float: bool,
        line: u32,
        column: u32,
    },
    Str {
        value: String,
        line: u32,
        column: u32,
    },
    Bool {
        value: bool,
        line: u32,
        column: u32,
    },
    Nil {
        line: u32,
        column: u32,
    },
    Ident {
        name: String,
        line: u32,
        column: u32,
    },
}

impl Expr {
    /// The source position this node originated from.
    pub fn position(&self) -> (u32, u32) {
        match self {
            Expr::Binary { line, column, .. }
            | Expr::Unary { line, column, .. }
            | Expr::Call { line, column, .. }
            | Expr::Index { line, column, .. }
            | Expr::Array { line, column, .. }
            | Expr::Number { line, column, .. }
            | Expr::Str { line, column, .. }
            | Expr::Bool { line, column, .. }
            | Expr::Nil { line, column }
            | Expr::Ident { line, column, .. } => (*line, *column),
        }
    }
}
