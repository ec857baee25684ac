//! Result and errors.
use std::fmt::{self, Display, Formatter};

use smol_str::SmolStr;

use crate::tokens::{Span, TokenKind};

pub type CompileResult<T> = std::result::Result<T, CompileError>;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("lexical error: {error}\n{location}")]
    Lex { error: LexError, location: Location },
    #[error("syntax error: expected {expected}, encountered {encountered}\n{location}")]
    Syntax {
        expected: String,
        encountered: TokenKind,
        location: Location,
    },
    #[error("'{name}' is already declared in this scope\n{location}")]
    Redeclared { name: SmolStr, location: Location },
    #[error("unknown variable '{name}'\n{location}")]
    UnknownVariable { name: SmolStr, location: Location },
    #[error("'{name}' is neither a variable nor a known class\n{location}")]
    UnknownCallTarget { name: SmolStr, location: Location },
    #[error("cannot call method '{method}' on '{name}' of primitive type '{ty}'\n{location}")]
    PrimitiveReceiver {
        name: SmolStr,
        ty: SmolStr,
        method: SmolStr,
        location: Location,
    },
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl CompileError {
    pub(crate) fn lex(source: &str, error: LexError) -> Self {
        let location = Location::new(source, error.span());
        Self::Lex { error, location }
    }

    /// Location in the source where the error occurred, if any.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Lex { location, .. }
            | Self::Syntax { location, .. }
            | Self::Redeclared { location, .. }
            | Self::UnknownVariable { location, .. }
            | Self::UnknownCallTarget { location, .. }
            | Self::PrimitiveReceiver { location, .. } => Some(location),
            Self::Io(_) | Self::Config(_) => None,
        }
    }
}

/// Errors raised by the scanner. All of them abort compilation of the file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unknown character {character:?}")]
    UnknownCharacter { character: char, span: Span },
    #[error("unterminated string constant")]
    UnterminatedString { span: Span },
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },
    #[error("integer constant {text} exceeds 32767")]
    IntegerOverflow { text: SmolStr, span: Span },
    #[error("character {character:?} has no code within 0..=32767")]
    UnrepresentableCharacter { character: char, span: Span },
    #[error("string constant longer than 32767 characters")]
    StringTooLong { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnknownCharacter { span, .. }
            | Self::UnrepresentableCharacter { span, .. }
            | Self::StringTooLong { span }
            | Self::UnterminatedString { span }
            | Self::UnterminatedComment { span }
            | Self::IntegerOverflow { span, .. } => *span,
        }
    }
}

/// Position of an error, with the offending line
/// copied out of the source for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub source_line: String,
}

impl Location {
    pub fn new(source: &str, span: Span) -> Self {
        let (line, column) = span.line_column(source);
        Self {
            line,
            column,
            source_line: span.surrounding_line(source).to_owned(),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            line,
            column,
            source_line,
        } = self;
        let gutter = line.to_string().len();
        writeln!(f, "{:gutter$} --> line {line}, column {column}", "")?;
        writeln!(f, "{line} | {source_line}")?;
        write!(f, "{:gutter$} | {:>column$}", "", "^")
    }
}
