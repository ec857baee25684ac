//! Expression parsing.
use smol_str::SmolStr;

use super::{
    BinaryOp, Expr, KeywordConst, ParseError, ParseResult, Parser, StringConst, SubroutineCall, Term, UnaryOp,
};
use crate::{
    error::{CompileError, LexError},
    lex::MAX_INT,
    tokens::{Keyword as K, Span, Symbol as S, TokenKind},
};

#[rustfmt::skip]
const BINARY_OPS: &[(S, BinaryOp)] = &[
    (S::Plus,    BinaryOp::Add),
    (S::Minus,   BinaryOp::Sub),
    (S::Star,    BinaryOp::Mul),
    (S::Slash,   BinaryOp::Div),
    (S::Amp,     BinaryOp::And),
    (S::Pipe,    BinaryOp::Or),
    (S::Less,    BinaryOp::Lt),
    (S::Greater, BinaryOp::Gt),
    (S::Eq,      BinaryOp::Eq),
];

impl<'a, 'c> Parser<'a, 'c> {
    /// ```text
    /// term (op term)*
    /// ```
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        let first = self.term()?;
        let rest = self.zero_or_more(|p| {
            let op = p.binary_op()?;
            let term = p.term()?;
            Ok((op, term))
        })?;
        Ok(Expr { first, rest })
    }

    fn binary_op(&mut self) -> ParseResult<BinaryOp> {
        for (symbol, op) in BINARY_OPS {
            match self.expect_symbol(*symbol) {
                Ok(_) => return Ok(*op),
                Err(ParseError::NoMatch) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(ParseError::NoMatch)
    }

    /// The order of alternatives matters: a name followed by `(` or `.`
    /// is a call, followed by `[` an array element, else a variable.
    fn term(&mut self) -> ParseResult<Term> {
        self.one_of(&[
            Self::int_const,
            Self::string_const,
            |p| p.keyword_const().map(Term::Keyword),
            |p| {
                p.expect_symbol(S::LeftParen)?;
                let expr = p.expression()?;
                p.expect_symbol(S::RightParen)?;
                Ok(Term::Paren(Box::new(expr)))
            },
            |p| {
                let op = p.one_of(&[
                    |p| p.expect_symbol(S::Minus).map(|_| UnaryOp::Neg),
                    |p| p.expect_symbol(S::Tilde).map(|_| UnaryOp::Not),
                ])?;
                let term = p.term()?;
                Ok(Term::Unary(op, Box::new(term)))
            },
            |p| p.subroutine_call().map(Term::Call),
            |p| {
                let name = p.ident()?;
                p.expect_symbol(S::LeftBracket)?;
                let index = p.expression()?;
                p.expect_symbol(S::RightBracket)?;
                Ok(Term::Index(name, Box::new(index)))
            },
            |p| p.ident().map(Term::Var),
        ])
    }

    fn int_const(&mut self) -> ParseResult<Term> {
        let token = self.expect(TokenKind::Int)?;
        let text = self.input.fragment(&token);
        // The lexer already rejected values out of range.
        let value = text.parse::<u16>().map_err(|_| {
            let error = LexError::IntegerOverflow {
                text: SmolStr::new(text),
                span: token.span,
            };
            CompileError::lex(self.input.source_code(), error)
        })?;
        Ok(Term::Int(value))
    }

    fn string_const(&mut self) -> ParseResult<Term> {
        let token = self.expect(TokenKind::Str)?;
        let source = self.input.source_code();
        // Strip the quotes.
        let text = self.input.fragment(&token);
        let value = &text[1..text.len() - 1];

        // The lexer already rejected codes and lengths out of range.
        let mut chars = Vec::with_capacity(value.len());
        for (offset, character) in value.char_indices() {
            let code = u16::try_from(u32::from(character))
                .ok()
                .filter(|code| *code <= MAX_INT)
                .ok_or_else(|| {
                    let start = token.span.index + 1 + offset as u32;
                    let span = Span::new(start, character.len_utf8() as u32);
                    CompileError::lex(source, LexError::UnrepresentableCharacter { character, span })
                })?;
            chars.push(code);
        }
        let len = u16::try_from(chars.len())
            .ok()
            .filter(|len| *len <= MAX_INT)
            .ok_or_else(|| CompileError::lex(source, LexError::StringTooLong { span: token.span }))?;

        Ok(Term::Str(StringConst { len, chars }))
    }

    fn keyword_const(&mut self) -> ParseResult<KeywordConst> {
        self.one_of(&[
            |p| p.expect_keyword(K::True).map(|_| KeywordConst::True),
            |p| p.expect_keyword(K::False).map(|_| KeywordConst::False),
            |p| p.expect_keyword(K::Null).map(|_| KeywordConst::Null),
            |p| p.expect_keyword(K::This).map(|_| KeywordConst::This),
        ])
    }

    /// ```text
    /// name ( exprList ) | name . name ( exprList )
    /// ```
    pub(crate) fn subroutine_call(&mut self) -> ParseResult<SubroutineCall> {
        let first = self.ident()?;
        let second = self.zero_or_one(|p| {
            p.expect_symbol(S::Dot)?;
            p.ident()
        })?;
        self.expect_symbol(S::LeftParen)?;
        let args = self.expression_list()?;
        self.expect_symbol(S::RightParen)?;

        let (receiver, name) = match second {
            Some(name) => (Some(first), name),
            None => (None, first),
        };

        Ok(SubroutineCall { receiver, name, args })
    }

    /// ```text
    /// (expr (, expr)*)?
    /// ```
    fn expression_list(&mut self) -> ParseResult<Vec<Expr>> {
        let args = self.zero_or_one(|p| p.comma_separated(Self::expression))?;
        Ok(args.unwrap_or_default())
    }
}
