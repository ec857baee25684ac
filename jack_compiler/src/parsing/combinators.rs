//! Parser combinators.
//!
//! These are the only functions that touch the token stream. Every
//! grammar rule is composed from them.
use super::{Ident, ParseError, ParseResult, Parser};
use crate::tokens::{Keyword, Symbol, Token, TokenKind};
use smol_str::SmolStr;

/// A grammar rule or step that can be tried as an alternative.
pub(crate) type Rule<'a, 'c, T> = fn(&mut Parser<'a, 'c>) -> ParseResult<T>;

impl<'a, 'c> Parser<'a, 'c> {
    /// Consume the next token if it's of the given kind.
    ///
    /// Nothing is consumed when the kinds differ.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.input.peek_kind()? == kind {
            Ok(self.input.next_token()?)
        } else {
            self.input.record_mismatch(kind);
            Err(ParseError::NoMatch)
        }
    }

    #[inline]
    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<Token> {
        self.expect(TokenKind::Keyword(keyword))
    }

    #[inline]
    pub(crate) fn expect_symbol(&mut self, symbol: Symbol) -> ParseResult<Token> {
        self.expect(TokenKind::Symbol(symbol))
    }

    pub(crate) fn ident(&mut self) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            name: SmolStr::new(self.input.fragment(&token)),
            span: token.span,
        })
    }

    /// Try each alternative in order, returning the first that matches.
    ///
    /// Alternatives that don't match are rewound before the next is tried.
    pub(crate) fn one_of<T>(&mut self, alternatives: &[Rule<'a, 'c, T>]) -> ParseResult<T> {
        for alternative in alternatives {
            match self.sequence(*alternative) {
                Err(ParseError::NoMatch) => continue,
                result => return result,
            }
        }
        Err(ParseError::NoMatch)
    }

    /// Run a group of steps as a unit.
    ///
    /// When any step doesn't match, the input is rewound to where the
    /// sequence started and the whole sequence doesn't match.
    pub(crate) fn sequence<T>(&mut self, mut steps: impl FnMut(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let checkpoint = self.input.checkpoint();
        match steps(self) {
            Err(ParseError::NoMatch) => {
                self.input.rewind(checkpoint);
                Err(ParseError::NoMatch)
            }
            result => result,
        }
    }

    /// Optional step.
    pub(crate) fn zero_or_one<T>(&mut self, step: impl FnMut(&mut Self) -> ParseResult<T>) -> ParseResult<Option<T>> {
        match self.sequence(step) {
            Ok(node) => Ok(Some(node)),
            Err(ParseError::NoMatch) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Repeat a step until it no longer matches.
    pub(crate) fn zero_or_more<T>(&mut self, mut step: impl FnMut(&mut Self) -> ParseResult<T>) -> ParseResult<Vec<T>> {
        let mut nodes = vec![];

        loop {
            let before = self.input.checkpoint();
            match self.sequence(&mut step) {
                Ok(node) => {
                    nodes.push(node);
                    // A step that matches nothing would repeat forever.
                    if self.input.checkpoint() == before {
                        break;
                    }
                }
                Err(ParseError::NoMatch) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(nodes)
    }

    /// Comma separated list of at least one item.
    pub(crate) fn comma_separated<T>(&mut self, mut item: impl FnMut(&mut Self) -> ParseResult<T>) -> ParseResult<Vec<T>> {
        self.sequence(|p| {
            let mut items = vec![item(p)?];
            items.extend(p.zero_or_more(|p| {
                p.expect_symbol(Symbol::Comma)?;
                item(p)
            })?);
            Ok(items)
        })
    }
}
