//! Syntactic analysis.
//!
//! The parser is built from a handful of combinators (see
//! [`combinators`]) and one rule per language construct. Rules bind
//! declarations into the symbol tables once the declaring construct has
//! fully matched, and each subroutine is handed to the code generator as
//! soon as its body is parsed.
mod class;
mod combinators;
mod expr;
mod nodes;
mod stmts;

pub use nodes::*;

use crate::{
    compile::{KnownClasses, SymbolTable},
    config::CompilerConf,
    error::CompileError,
    token_stream::TokenStream,
    CompiledClass,
};
use smol_str::SmolStr;

/// Outcome of a rule that did not succeed.
#[derive(Debug)]
pub enum ParseError {
    /// The rule did not match. No input was consumed and
    /// no symbol was declared.
    NoMatch,
    /// Compilation of the file must stop.
    Fatal(CompileError),
}

impl From<CompileError> for ParseError {
    fn from(err: CompileError) -> Self {
        ParseError::Fatal(err)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Single pass parser and compiler for one class.
pub struct Parser<'a, 'c> {
    input: TokenStream<'a>,
    /// Run-wide registry of class names. The class being
    /// compiled is added to it once its name is parsed.
    known: &'c mut KnownClasses,
    conf: &'c CompilerConf,
    class_name: SmolStr,
    /// Fields and statics.
    class_scope: SymbolTable,
    /// Arguments and locals, reset per subroutine.
    sub_scope: SymbolTable,
}

impl<'a, 'c> Parser<'a, 'c> {
    pub fn new(input: TokenStream<'a>, known: &'c mut KnownClasses, conf: &'c CompilerConf) -> Self {
        Self {
            input,
            known,
            conf,
            class_name: SmolStr::default(),
            class_scope: SymbolTable::default(),
            sub_scope: SymbolTable::default(),
        }
    }

    /// Parse and compile a whole class.
    pub fn parse_class(mut self) -> Result<CompiledClass, CompileError> {
        match self.class() {
            Ok(class) => Ok(class),
            Err(ParseError::NoMatch) => Err(self.input.syntax_error()),
            Err(ParseError::Fatal(err)) => Err(err),
        }
    }
}
