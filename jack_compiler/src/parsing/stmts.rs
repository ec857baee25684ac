//! Statement parsing.
use super::{Expr, IfStmt, LetStmt, ParseResult, Parser, Statement, WhileStmt};
use crate::tokens::{Keyword as K, Symbol as S};

impl<'a, 'c> Parser<'a, 'c> {
    pub(crate) fn statements(&mut self) -> ParseResult<Vec<Statement>> {
        self.zero_or_more(Self::statement)
    }

    /// Statements are told apart by their leading keyword.
    fn statement(&mut self) -> ParseResult<Statement> {
        self.one_of(&[
            |p| p.let_stmt().map(Statement::Let),
            |p| p.if_stmt().map(Statement::If),
            |p| p.while_stmt().map(Statement::While),
            Self::do_stmt,
            Self::return_stmt,
        ])
    }

    /// ```text
    /// let name ([ expr ])? = expr ;
    /// ```
    fn let_stmt(&mut self) -> ParseResult<LetStmt> {
        self.expect_keyword(K::Let)?;
        let target = self.ident()?;
        let index = self.zero_or_one(|p| {
            p.expect_symbol(S::LeftBracket)?;
            let index = p.expression()?;
            p.expect_symbol(S::RightBracket)?;
            Ok(index)
        })?;
        self.expect_symbol(S::Eq)?;
        let value = self.expression()?;
        self.expect_symbol(S::Semicolon)?;

        Ok(LetStmt { target, index, value })
    }

    /// ```text
    /// if ( expr ) { statement* } (else { statement* })?
    /// ```
    fn if_stmt(&mut self) -> ParseResult<IfStmt> {
        self.expect_keyword(K::If)?;
        let cond = self.condition()?;
        let then_branch = self.block()?;
        let else_branch = self.zero_or_one(|p| {
            p.expect_keyword(K::Else)?;
            p.block()
        })?;

        Ok(IfStmt {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// ```text
    /// while ( expr ) { statement* }
    /// ```
    fn while_stmt(&mut self) -> ParseResult<WhileStmt> {
        self.expect_keyword(K::While)?;
        let cond = self.condition()?;
        let body = self.block()?;
        Ok(WhileStmt { cond, body })
    }

    /// ```text
    /// do call ;
    /// ```
    fn do_stmt(&mut self) -> ParseResult<Statement> {
        self.expect_keyword(K::Do)?;
        let call = self.subroutine_call()?;
        self.expect_symbol(S::Semicolon)?;
        Ok(Statement::Do(call))
    }

    /// ```text
    /// return expr? ;
    /// ```
    fn return_stmt(&mut self) -> ParseResult<Statement> {
        self.expect_keyword(K::Return)?;
        let value = self.zero_or_one(Self::expression)?;
        self.expect_symbol(S::Semicolon)?;
        Ok(Statement::Return(value))
    }

    /// Parenthesised condition of `if` and `while`.
    fn condition(&mut self) -> ParseResult<Expr> {
        self.expect_symbol(S::LeftParen)?;
        let cond = self.expression()?;
        self.expect_symbol(S::RightParen)?;
        Ok(cond)
    }

    fn block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect_symbol(S::LeftBrace)?;
        let statements = self.statements()?;
        self.expect_symbol(S::RightBrace)?;
        Ok(statements)
    }
}
