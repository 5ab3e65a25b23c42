// AST (Abstract Syntax Tree) definitions for the loopc language

use crate::parser::lexer::TokenKind;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte range `[start, end)` into the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// Precedence levels of the arithmetic operators, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Additive,
    Multiplicative,
    Power,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Plus,
    Minus,
    Star,
    Slash,
    Mod,
    Power,
}

impl BinOp {
    /// Maps an operator token to its arithmetic operator, if it is one.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinOp::Plus),
            TokenKind::Minus => Some(BinOp::Minus),
            TokenKind::Star => Some(BinOp::Star),
            TokenKind::Slash => Some(BinOp::Slash),
            TokenKind::Percent => Some(BinOp::Mod),
            TokenKind::Caret => Some(BinOp::Power),
            _ => None,
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            BinOp::Plus | BinOp::Minus => Precedence::Additive,
            BinOp::Star | BinOp::Slash | BinOp::Mod => Precedence::Multiplicative,
            BinOp::Power => Precedence::Power,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Star => "*",
            BinOp::Slash => "/",
            BinOp::Mod => "%",
            BinOp::Power => "^",
        }
    }
}

/// Assignment operators. Compound forms are kept as written, never desugared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,      // =
    PlusAssign,  // +=
    MinusAssign, // -=
    StarAssign,  // *=
    SlashAssign, // /=
    ModAssign,   // %=
    PowerAssign, // ^=
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::PlusAssign),
            TokenKind::MinusEq => Some(AssignOp::MinusAssign),
            TokenKind::StarEq => Some(AssignOp::StarAssign),
            TokenKind::SlashEq => Some(AssignOp::SlashAssign),
            TokenKind::PercentEq => Some(AssignOp::ModAssign),
            TokenKind::CaretEq => Some(AssignOp::PowerAssign),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::PlusAssign => "+=",
            AssignOp::MinusAssign => "-=",
            AssignOp::StarAssign => "*=",
            AssignOp::SlashAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::PowerAssign => "^=",
        }
    }
}

/// Relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq, // ==
    Ne, // !=
    Ge, // >=
    Le, // <=
    Lt, // <
    Gt, // >
}

impl RelOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::EqEq => Some(RelOp::Eq),
            TokenKind::NotEq => Some(RelOp::Ne),
            TokenKind::Ge => Some(RelOp::Ge),
            TokenKind::Le => Some(RelOp::Le),
            TokenKind::Lt => Some(RelOp::Lt),
            TokenKind::Gt => Some(RelOp::Gt),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Ge => ">=",
            RelOp::Le => "<=",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
        }
    }
}

/// Boolean combinators joining conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(BoolOp::And),
            TokenKind::Or => Some(BoolOp::Or),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

macro_rules! display_symbol {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        })*
    };
}

display_symbol!(BinOp, AssignOp, RelOp, BoolOp);

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

/// Statements allowed at the top level of a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Declaration(Declaration),
    Equation(Equation),
    If(If),
    Loop(Loop),
}

impl Statement {
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::Declaration(node) => node.location,
            Statement::Equation(node) => node.location,
            Statement::If(node) => node.location,
            Statement::Loop(node) => node.location,
        }
    }
}

/// `int a, b = expr;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Distinct names, in source order. Never empty.
    pub names: Vec<String>,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

/// `target op value;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    pub target: String,
    pub op: AssignOp,
    pub value: Expr,
    pub location: SourceLocation,
}

/// Arithmetic expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Binary(BinaryOp),
    Final(Final),
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Binary(node) => node.location,
            Expr::Final(node) => node.location,
        }
    }

    /// Precedence of the outermost operator; `None` for leaves.
    pub fn precedence(&self) -> Option<Precedence> {
        match self {
            Expr::Binary(node) => Some(node.op.precedence()),
            Expr::Final(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOp {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    /// Location of the operator token
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinalKind {
    Ident,
    Number,
}

/// Leaf expression: an identifier or the text of a numeric literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Final {
    pub kind: FinalKind,
    pub value: String,
    pub location: SourceLocation,
}

impl Final {
    pub fn ident(value: impl Into<String>, location: SourceLocation) -> Self {
        Final {
            kind: FinalKind::Ident,
            value: value.into(),
            location,
        }
    }

    pub fn number(value: impl Into<String>, location: SourceLocation) -> Self {
        Final {
            kind: FinalKind::Number,
            value: value.into(),
            location,
        }
    }
}

/// `left op right` with a relational operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub op: RelOp,
    pub left: Expr,
    pub right: Expr,
    pub location: SourceLocation,
}

/// Conditions joined by `and`/`or`, always chained to the left:
/// `a and b or c` is `Combined(Combined(a, and, b), or, c)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditions {
    Single(Condition),
    Combined {
        op: BoolOp,
        left: Box<Conditions>,
        right: Condition,
        location: SourceLocation,
    },
}

impl Conditions {
    pub fn location(&self) -> SourceLocation {
        match self {
            Conditions::Single(condition) => condition.location,
            Conditions::Combined { location, .. } => *location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub conditions: Conditions,
    pub body: Vec<Equation>,
    pub elifs: Vec<Elif>,
    pub else_branch: Option<Else>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elif {
    pub conditions: Conditions,
    pub body: Vec<Equation>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Else {
    pub body: Vec<Equation>,
    pub location: SourceLocation,
}

/// `loopc conditions : begin ... end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub conditions: Conditions,
    pub body: Vec<Equation>,
    pub location: SourceLocation,
}
