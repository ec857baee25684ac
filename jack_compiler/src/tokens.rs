//! Tokens
use std::{fmt, str::FromStr};

#[derive(Debug, Clone)]
pub struct Token {
    pub span: Span,
    pub kind: TokenKind,
}

impl Token {
    /// Source text of the token.
    #[inline]
    pub fn fragment<'a>(&self, text: &'a str) -> &'a str {
        self.span.fragment(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier in the set of reserved words.
    Keyword(Keyword),
    /// Single character punctuation or operator.
    Symbol(Symbol),
    /// Integer literal, `0` to `32767`.
    Int,
    /// String literal. The span includes the quotes.
    Str,
    Ident,
    /// End-of-file
    EOF,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "'{keyword}'"),
            Self::Symbol(symbol) => write!(f, "'{symbol}'"),
            Self::Int => write!(f, "integer constant"),
            Self::Str => write!(f, "string constant"),
            Self::Ident => write!(f, "identifier"),
            Self::EOF => write!(f, "end-of-file"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        use Keyword as K;
        match self {
            K::Class       => "class",
            K::Constructor => "constructor",
            K::Function    => "function",
            K::Method      => "method",
            K::Field       => "field",
            K::Static      => "static",
            K::Var         => "var",
            K::Int         => "int",
            K::Char        => "char",
            K::Boolean     => "boolean",
            K::Void        => "void",
            K::True        => "true",
            K::False       => "false",
            K::Null        => "null",
            K::This        => "this",
            K::Let         => "let",
            K::Do          => "do",
            K::If          => "if",
            K::Else        => "else",
            K::While       => "while",
            K::Return      => "return",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Keyword {
    type Err = ();

    #[rustfmt::skip]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Keyword as K;
        match s {
            "class"       => Ok(K::Class),
            "constructor" => Ok(K::Constructor),
            "function"    => Ok(K::Function),
            "method"      => Ok(K::Method),
            "field"       => Ok(K::Field),
            "static"      => Ok(K::Static),
            "var"         => Ok(K::Var),
            "int"         => Ok(K::Int),
            "char"        => Ok(K::Char),
            "boolean"     => Ok(K::Boolean),
            "void"        => Ok(K::Void),
            "true"        => Ok(K::True),
            "false"       => Ok(K::False),
            "null"        => Ok(K::Null),
            "this"        => Ok(K::This),
            "let"         => Ok(K::Let),
            "do"          => Ok(K::Do),
            "if"          => Ok(K::If),
            "else"        => Ok(K::Else),
            "while"       => Ok(K::While),
            "return"      => Ok(K::Return),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Symbol {
    LeftBrace,    // {
    RightBrace,   // }
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Dot,          // .
    Comma,        // ,
    Semicolon,    // ;
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Amp,          // &
    Pipe,         // |
    Less,         // <
    Greater,      // >
    Eq,           // =
    Tilde,        // ~
}

impl Symbol {
    #[rustfmt::skip]
    pub fn from_char(c: char) -> Option<Self> {
        use Symbol as S;
        match c {
            '{' => Some(S::LeftBrace),
            '}' => Some(S::RightBrace),
            '(' => Some(S::LeftParen),
            ')' => Some(S::RightParen),
            '[' => Some(S::LeftBracket),
            ']' => Some(S::RightBracket),
            '.' => Some(S::Dot),
            ',' => Some(S::Comma),
            ';' => Some(S::Semicolon),
            '+' => Some(S::Plus),
            '-' => Some(S::Minus),
            '*' => Some(S::Star),
            '/' => Some(S::Slash),
            '&' => Some(S::Amp),
            '|' => Some(S::Pipe),
            '<' => Some(S::Less),
            '>' => Some(S::Greater),
            '=' => Some(S::Eq),
            '~' => Some(S::Tilde),
            _ => None,
        }
    }

    #[rustfmt::skip]
    pub fn as_char(&self) -> char {
        use Symbol as S;
        match self {
            S::LeftBrace    => '{',
            S::RightBrace   => '}',
            S::LeftParen    => '(',
            S::RightParen   => ')',
            S::LeftBracket  => '[',
            S::RightBracket => ']',
            S::Dot          => '.',
            S::Comma        => ',',
            S::Semicolon    => ';',
            S::Plus         => '+',
            S::Minus        => '-',
            S::Star         => '*',
            S::Slash        => '/',
            S::Amp          => '&',
            S::Pipe         => '|',
            S::Less         => '<',
            S::Greater      => '>',
            S::Eq           => '=',
            S::Tilde        => '~',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Chunk of source code, encoded as a byte offset and size.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Span {
    pub index: u32,
    pub size: u32,
}

impl Span {
    pub fn new(index: u32, size: u32) -> Self {
        Self { index, size }
    }

    #[inline]
    pub fn fragment<'a>(&self, text: &'a str) -> &'a str {
        &text[(self.index as usize)..(self.end() as usize)]
    }

    /// Ending index of the span, exclusive.
    #[inline]
    pub fn end(&self) -> u32 {
        self.index + self.size
    }

    /// One-based line and column of the span's start.
    pub fn line_column(&self, text: &str) -> (usize, usize) {
        let before = &text[..(self.index as usize).min(text.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        (line, column)
    }

    /// The full line of source containing the start of the span,
    /// without the line terminator.
    pub fn surrounding_line<'a>(&self, text: &'a str) -> &'a str {
        let index = (self.index as usize).min(text.len());
        let start = text[..index].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let end = text[index..].find('\n').map(|i| index + i).unwrap_or(text.len());
        text[start..end].trim_end_matches('\r')
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_line_column() {
        let text = "class A {\n  field int x;\n}";
        let span = Span::new(12, 5);
        assert_eq!(span.fragment(text), "field");
        assert_eq!(span.line_column(text), (2, 3));
        assert_eq!(span.surrounding_line(text), "  field int x;");
    }

    #[test]
    fn test_keyword_round_trip() {
        for text in ["class", "method", "while", "this"] {
            let keyword: Keyword = text.parse().unwrap();
            assert_eq!(keyword.as_str(), text);
        }
        assert!("Class".parse::<Keyword>().is_err());
    }
}
