//! Syntax tree nodes.
//!
//! Nodes are built by the grammar rules and consumed by the code
//! generator as soon as a subroutine has been parsed.
use std::fmt;

use smol_str::SmolStr;

use crate::tokens::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: SmolStr,
    pub span: Span,
}

/// Declared type of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Char,
    Boolean,
    Class(SmolStr),
}

impl Type {
    #[inline]
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Type::Class(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Char => write!(f, "char"),
            Self::Boolean => write!(f, "boolean"),
            Self::Class(name) => write!(f, "{name}"),
        }
    }
}

/// Variable declared at class level.
///
/// ```text
/// field int x, y;
/// ```
#[derive(Debug)]
pub struct ClassVarDec {
    pub kind: ClassVarKind,
    pub ty: Type,
    pub names: Vec<Ident>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassVarKind {
    Field,
    Static,
}

#[derive(Debug)]
pub struct SubroutineDec {
    pub kind: SubroutineKind,
    /// `None` when declared `void`.
    pub return_type: Option<Type>,
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: SubroutineBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

#[derive(Debug)]
pub struct Param {
    pub ty: Type,
    pub name: Ident,
}

#[derive(Debug)]
pub struct SubroutineBody {
    pub vars: Vec<VarDec>,
    pub statements: Vec<Statement>,
}

/// Local variable declaration.
///
/// ```text
/// var Array a, b;
/// ```
#[derive(Debug)]
pub struct VarDec {
    pub ty: Type,
    pub names: Vec<Ident>,
}

#[derive(Debug)]
pub enum Statement {
    Let(LetStmt),
    If(IfStmt),
    While(WhileStmt),
    Do(SubroutineCall),
    Return(Option<Expr>),
}

#[derive(Debug)]
pub struct LetStmt {
    pub target: Ident,
    /// Element index when assigning into an array.
    pub index: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Vec<Statement>,
    pub else_branch: Option<Vec<Statement>>,
}

#[derive(Debug)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Vec<Statement>,
}

/// Flat list of terms joined by binary operators.
///
/// There is no operator precedence. Operators apply left to
/// right in the order they appear.
#[derive(Debug)]
pub struct Expr {
    pub first: Term,
    pub rest: Vec<(BinaryOp, Term)>,
}

#[derive(Debug)]
pub enum Term {
    Int(u16),
    Str(StringConst),
    Keyword(KeywordConst),
    Var(Ident),
    Index(Ident, Box<Expr>),
    Call(SubroutineCall),
    Unary(UnaryOp, Box<Term>),
    Paren(Box<Expr>),
}

/// String constant as character codes, each a valid integer constant.
#[derive(Debug)]
pub struct StringConst {
    pub len: u16,
    pub chars: Vec<u16>,
}

#[derive(Debug)]
pub struct SubroutineCall {
    /// Left side of a dotted call, either a variable or a class.
    pub receiver: Option<Ident>,
    pub name: Ident,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordConst {
    True,
    False,
    Null,
    This,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}
