//! Lexical analysis (tokenizer)
use crate::{
    error::LexError,
    tokens::{Keyword, Span, Symbol, Token, TokenKind},
};

use itertools::{multipeek, MultiPeek};
use smol_str::SmolStr;
use std::{iter::Iterator, str::CharIndices};

/// Largest integer constant the target machine can represent.
pub const MAX_INT: u16 = 32767;

/// Print the token stream, one token per line.
pub fn debug_print_lexer(lexer: Lexer) {
    let source = lexer.source_code();
    println!("offset | len | token                | fragment");

    for result in lexer {
        match result {
            Ok(token) => {
                let offset = token.span.index;
                let len = token.span.size;
                let kind = format!("{:?}", token.kind); // cannot format debug print {:?} into columns
                if token.kind == TokenKind::EOF {
                    println!("{offset:7}:{len: <3} {kind}");
                } else {
                    let fragment = token.fragment(source);
                    println!("{offset:7}:{len: <3} {kind: <22} {fragment:?}");
                }
            }
            Err(err) => println!("{err}"),
        }
    }
}

/// Lexical analyzer.
///
/// Produces tokens lazily, one per call to [`Lexer::next_token`]. Comments and
/// whitespace are consumed and discarded between tokens.
pub struct Lexer<'a> {
    source: SourceText<'a>,
    /// Start byte position of the current token.
    token_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self {
            source: SourceText::new(source_code),
            token_start: 0,
        }
    }

    /// Original source code that was passed in during construction.
    pub fn source_code(&self) -> &'a str {
        self.source.original
    }

    /// Scan the source characters and construct the next token.
    ///
    /// Once the source is exhausted every call returns an
    /// [`TokenKind::EOF`] token.
    #[rustfmt::skip]
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        use TokenKind as T;

        while let Some((index, next_char)) = self.source.next_char() {
            self.token_start = index;

            match next_char {
                ' ' | '\t' | '\r' | '\n' => continue,
                '/' => match self.source.peek_char() {
                    Some('/') => self.erase_line_comment(),
                    Some('*') => self.erase_block_comment()?,
                    _ => return Ok(self.make_token(T::Symbol(Symbol::Slash))),
                },
                '"'               => return self.consume_string(),
                '0'..='9'         => return self.consume_number(),
                '_' | 'a'..='z'
                    | 'A'..='Z'   => return Ok(self.consume_ident()),
                _ => {
                    return match Symbol::from_char(next_char) {
                        Some(symbol) => Ok(self.make_token(T::Symbol(symbol))),
                        None => Err(LexError::UnknownCharacter {
                            character: next_char,
                            span: self.make_span(),
                        }),
                    }
                }
            }
        }

        // Give end-of-source its own zero sized position.
        self.token_start = self.source.offset;
        Ok(self.make_token(T::EOF))
    }

    fn make_span(&self) -> Span {
        let start = self.token_start;
        let end = self.source.offset;
        debug_assert!(end >= start);
        Span::new(start as u32, (end - start) as u32)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token {
            span: self.make_span(),
            kind,
        }
    }

    fn fragment(&self) -> &'a str {
        self.make_span().fragment(self.source.original)
    }
}

/// Specialised tokens.
impl<'a> Lexer<'a> {
    /// Erase comment line up to, but not including, the trailing newline.
    fn erase_line_comment(&mut self) {
        while let Some(c) = self.source.peek_char() {
            if c == '\n' {
                break;
            }
            self.source.next_char();
        }
    }

    /// Erase a comment from `/*` to the first following `*/`.
    fn erase_block_comment(&mut self) -> Result<(), LexError> {
        // Opening star
        self.source.next_char();

        loop {
            match self.source.next_char() {
                Some((_, '*')) if self.source.peek_char() == Some('/') => {
                    self.source.next_char();
                    return Ok(());
                }
                Some(_) => continue,
                None => {
                    return Err(LexError::UnterminatedComment {
                        span: self.make_span(),
                    })
                }
            }
        }
    }

    /// Make a string literal token. The closing quote must
    /// appear on the same line.
    ///
    /// Every character code and the length must fit an integer constant,
    /// since the string is built one character at a time at runtime.
    fn consume_string(&mut self) -> Result<Token, LexError> {
        let mut len = 0_usize;

        loop {
            match self.source.peek_char() {
                Some('"') => {
                    self.source.next_char();
                    if len > MAX_INT as usize {
                        return Err(LexError::StringTooLong {
                            span: self.make_span(),
                        });
                    }
                    return Ok(self.make_token(TokenKind::Str));
                }
                Some('\n') | None => {
                    return Err(LexError::UnterminatedString {
                        span: self.make_span(),
                    })
                }
                Some(character) => {
                    self.source.next_char();
                    if u32::from(character) > u32::from(MAX_INT) {
                        let end = self.source.offset;
                        let start = end - character.len_utf8();
                        return Err(LexError::UnrepresentableCharacter {
                            character,
                            span: Span::new(start as u32, (end - start) as u32),
                        });
                    }
                    len += 1;
                }
            }
        }
    }

    /// Make a number literal token.
    fn consume_number(&mut self) -> Result<Token, LexError> {
        while let Some('0'..='9') = self.source.peek_char() {
            self.source.next_char();
        }

        let text = self.fragment();
        match text.parse::<u16>() {
            Ok(value) if value <= MAX_INT => Ok(self.make_token(TokenKind::Int)),
            _ => Err(LexError::IntegerOverflow {
                text: SmolStr::new(text),
                span: self.make_span(),
            }),
        }
    }

    /// Make an identifier or keyword token.
    fn consume_ident(&mut self) -> Token {
        while let Some('_' | 'a'..='z' | 'A'..='Z' | '0'..='9') = self.source.peek_char() {
            self.source.next_char();
        }

        // If a valid keyword can be parsed from the source fragment, then
        // the token is a reserved keyword instead of a user defined identifier.
        let token_kind = self
            .fragment()
            .parse::<Keyword>()
            .map(TokenKind::Keyword)
            .unwrap_or(TokenKind::Ident);
        self.make_token(token_kind)
    }
}

impl<'a> IntoIterator for Lexer<'a> {
    type Item = Result<Token, LexError>;
    type IntoIter = LexerIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        LexerIter {
            lexer: self,
            done: false,
        }
    }
}

/// Convenience iterator that wraps the lexer.
///
/// Stops after the first end-of-file token or the first error.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct LexerIter<'a> {
    // Track end so an EOF token is emitted once.
    done: bool,
    lexer: Lexer<'a>,
}

impl<'a> Iterator for LexerIter<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.lexer.next_token();
        self.done = !matches!(result, Ok(Token { kind, .. }) if kind != TokenKind::EOF);
        Some(result)
    }
}

/// Wrapper for source code that keeps a cursor position.
///
/// Allows forward lookup via peeking.
struct SourceText<'a> {
    /// Keep reference to the source so the parser can
    /// slice fragments from it.
    original: &'a str,

    /// Iterator over UTF-8 encoded source code.
    ///
    /// `MultiPeek` advances its peek cursor on every peek. The cursor is
    /// reset before each lookahead so a peek always sees the character
    /// directly after the last consumed one.
    chars: MultiPeek<CharIndices<'a>>,

    /// Byte position just past the last consumed character.
    offset: usize,
}

impl<'a> SourceText<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            original: source,
            chars: multipeek(source.char_indices()),
            offset: 0,
        }
    }

    /// Advance the cursor and return the next position and character.
    fn next_char(&mut self) -> Option<(usize, char)> {
        let (index, c) = self.chars.next()?;
        self.offset = index + c.len_utf8();
        Some((index, c))
    }

    /// Look at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.reset_peek();
        self.chars.peek().map(|(_, c)| *c)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .into_iter()
            .map(|result| result.map(|token| token.kind))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_slash_is_division() {
        use TokenKind as T;
        assert_eq!(
            kinds("a/b"),
            vec![T::Ident, T::Symbol(Symbol::Slash), T::Ident, T::EOF]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("let /* never closed").into_iter().last().unwrap();
        assert!(matches!(err, Err(LexError::UnterminatedComment { .. })));
    }

    #[test]
    fn test_string_codes_fit_integer_constant() {
        assert_eq!(kinds("\"caf\u{e9}\""), vec![TokenKind::Str, TokenKind::EOF]);

        let err = Lexer::new("\"\u{8000}\"").next_token().unwrap_err();
        assert_eq!(
            err,
            LexError::UnrepresentableCharacter {
                character: '\u{8000}',
                span: Span::new(1, 3),
            }
        );
    }
}
