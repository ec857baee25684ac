//! Buffered stream of tokens for look ahead and backtracking.
use crate::{
    error::{CompileError, CompileResult, Location},
    lex::Lexer,
    tokens::{Token, TokenKind},
};

/// Buffered stream of tokens that allows look ahead and rewinding.
///
/// Tokens are lazily lexed. Peeking or consuming the next token
/// triggers the internal lexer. Every lexed token is kept so the
/// parser can return to a [`Checkpoint`] when an alternative
/// does not match.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    /// Keep reference to the source so the parser can
    /// slice fragments from it.
    original: &'a str,
    /// Tokens lexed so far. The last one may be end-of-file.
    tokens: Vec<Token>,
    /// Index of the next token to be consumed.
    cursor: usize,
    /// The furthest position where a token failed to match,
    /// used to build a syntax error when no alternative is left.
    furthest: Option<Mismatch>,
}

/// Position in the token stream that can be returned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

#[derive(Debug)]
struct Mismatch {
    cursor: usize,
    expected: Vec<TokenKind>,
}

impl<'a> TokenStream<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            original: lexer.source_code(),
            lexer,
            tokens: Vec::new(),
            cursor: 0,
            furthest: None,
        }
    }

    pub fn source_code(&self) -> &'a str {
        self.original
    }

    /// Helper function to extract the token's string fragment
    /// from the original source code.
    #[inline]
    pub fn fragment(&self, token: &Token) -> &'a str {
        token.fragment(self.original)
    }

    /// Return the current token without advancing the cursor.
    pub fn peek(&mut self) -> CompileResult<&Token> {
        self.fill()?;
        Ok(&self.tokens[self.cursor])
    }

    /// Return the current token kind without advancing the cursor.
    #[inline]
    pub fn peek_kind(&mut self) -> CompileResult<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    /// Consumes the current token regardless of kind.
    ///
    /// The cursor never moves past end-of-file; consuming it
    /// again returns the same token.
    pub fn next_token(&mut self) -> CompileResult<Token> {
        self.fill()?;
        let token = self.tokens[self.cursor].clone();
        if token.kind != TokenKind::EOF {
            self.cursor += 1;
        }
        Ok(token)
    }

    /// Remember the current position.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.cursor)
    }

    /// Return to a previously remembered position. Tokens consumed
    /// since then will be produced again.
    #[inline]
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.0 <= self.tokens.len());
        self.cursor = checkpoint.0;
    }

    /// Note that the current token did not match the expected kind.
    ///
    /// Only the furthest position is kept. Expectations at the same
    /// position are accumulated.
    pub fn record_mismatch(&mut self, expected: TokenKind) {
        let cursor = self.cursor;

        if let Some(mismatch) = self.furthest.as_mut() {
            if mismatch.cursor > cursor {
                return;
            }
            if mismatch.cursor == cursor {
                if !mismatch.expected.contains(&expected) {
                    mismatch.expected.push(expected);
                }
                return;
            }
        }

        self.furthest = Some(Mismatch {
            cursor,
            expected: vec![expected],
        });
    }

    /// Build a syntax error from the furthest recorded mismatch.
    pub fn syntax_error(&self) -> CompileError {
        let (cursor, expected) = match &self.furthest {
            Some(mismatch) => (mismatch.cursor, mismatch.expected.as_slice()),
            None => (self.cursor, &[][..]),
        };

        // The mismatched token was peeked, so it's always buffered.
        let token = self
            .tokens
            .get(cursor)
            .or_else(|| self.tokens.last())
            .cloned()
            .unwrap_or(Token {
                span: Default::default(),
                kind: TokenKind::EOF,
            });

        let expected = if expected.is_empty() {
            "a declaration".to_owned()
        } else {
            expected
                .iter()
                .map(|kind| kind.to_string())
                .collect::<Vec<_>>()
                .join(" or ")
        };

        CompileError::Syntax {
            expected,
            encountered: token.kind,
            location: Location::new(self.original, token.span),
        }
    }

    /// Lex tokens until the cursor points at a buffered token.
    fn fill(&mut self) -> CompileResult<()> {
        while self.cursor >= self.tokens.len() {
            let token = self
                .lexer
                .next_token()
                .map_err(|err| CompileError::lex(self.original, err))?;
            self.tokens.push(token);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokens::{Keyword, Symbol};

    #[test]
    fn test_rewind() {
        let mut stream = TokenStream::new(Lexer::new("let x;"));
        let start = stream.checkpoint();
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Keyword(Keyword::Let));
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Ident);
        stream.rewind(start);
        assert_eq!(stream.peek_kind().unwrap(), TokenKind::Keyword(Keyword::Let));
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut stream = TokenStream::new(Lexer::new(";"));
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::Symbol(Symbol::Semicolon));
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::EOF);
        assert_eq!(stream.next_token().unwrap().kind, TokenKind::EOF);
    }
}
