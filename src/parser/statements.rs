//! Statement parsing implementation
//!
//! This module handles parsing of all supported statement types:
//!
//! - Variable declarations: `int x = 42;`
//! - Control flow: `if`, `while`, `for`
//! - `return`
//! - Compound statements: `{ ... }`
//! - Expression statements and the empty statement
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | for_stmt
//!             | return_stmt | block | expr_stmt | ";"
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<StmtId>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::LBrace(loc)) {
            self.push_scope();
            let statements = self.parse_block_statements();
            self.pop_scope();
            let statements = statements?;
            self.expect_token(
                &Token::RBrace(self.current_location()),
                "Expected '}' after block",
            )?;
            return Ok(self.program.push_stmt(StmtKind::Compound(statements), loc));
        }

        if self.match_token(&Token::Return(loc)) {
            return self.parse_return_statement(loc);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&Token::While(loc)) {
            return self.parse_while_statement(loc);
        }

        if self.match_token(&Token::For(loc)) {
            self.push_scope();
            let result = self.parse_for_statement(loc);
            self.pop_scope();
            return result;
        }

        if self.match_token(&Token::Semicolon(loc)) {
            return Ok(self.program.push_stmt(StmtKind::Empty, loc));
        }

        if self.is_type_keyword() {
            let decls = self.parse_local_declaration()?;
            return Ok(self.program.push_stmt(StmtKind::Decl(decls), loc));
        }

        let expr = self.parse_expression()?;
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after expression",
        )?;
        Ok(self.program.push_stmt(StmtKind::Expr(expr), loc))
    }

    fn parse_return_statement(&mut self, loc: SourceLocation) -> Result<StmtId, ParseError> {
        let expr = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after return",
        )?;

        Ok(self.program.push_stmt(StmtKind::Return(expr), loc))
    }

    fn parse_if_statement(&mut self, loc: SourceLocation) -> Result<StmtId, ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'if'",
        )?;
        let condition = self.parse_expression()?;
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after if condition",
        )?;

        let then_branch = self.parse_statement()?;

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(self.program.push_stmt(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            loc,
        ))
    }

    fn parse_while_statement(&mut self, loc: SourceLocation) -> Result<StmtId, ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'while'",
        )?;
        let condition = self.parse_expression()?;
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after while condition",
        )?;

        let body = self.parse_statement()?;

        Ok(self
            .program
            .push_stmt(StmtKind::While { condition, body }, loc))
    }

    /// Parse `for (init; condition; increment) body`; every clause is optional
    fn parse_for_statement(&mut self, loc: SourceLocation) -> Result<StmtId, ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after 'for'",
        )?;

        let init_loc = self.current_location();
        let init = if self.match_token(&Token::Semicolon(init_loc)) {
            None
        } else if self.is_type_keyword() {
            // Declaration includes its semicolon
            let decls = self.parse_local_declaration()?;
            Some(self.program.push_stmt(StmtKind::Decl(decls), init_loc))
        } else {
            let expr = self.parse_expression()?;
            self.expect_token(
                &Token::Semicolon(self.current_location()),
                "Expected ';' after for init",
            )?;
            Some(self.program.push_stmt(StmtKind::Expr(expr), init_loc))
        };

        let condition = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after for condition",
        )?;

        let increment = if self.check(&Token::RParen(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after for clauses",
        )?;

        let body = self.parse_statement()?;

        Ok(self.program.push_stmt(
            StmtKind::For {
                init,
                condition,
                increment,
                body,
            },
            loc,
        ))
    }
}
