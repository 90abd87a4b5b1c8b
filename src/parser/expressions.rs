//! Expression parsing implementation
//!
//! Recursive descent over the C precedence levels, from assignment (lowest,
//! right-associative) down to postfix and primary expressions. Every node is
//! pushed into the program arena together with its static type, which the
//! evaluator later consults for pointer arithmetic and `sizeof`.
//!
//! Operators outside the evaluator's supported subset (`&&`, `||`, bitwise
//! operators, compound assignment, `&`, `++`, `--`) are still parsed so that
//! they can be reported at run time instead of failing the whole parse.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        let lhs = self.parse_logical_or()?;

        let loc = self.current_location();
        let op = match self.peek() {
            Token::Eq(_) => BinOp::Assign,
            Token::PlusEq(_) => BinOp::AddAssign,
            Token::MinusEq(_) => BinOp::SubAssign,
            Token::StarEq(_) => BinOp::MulAssign,
            Token::SlashEq(_) => BinOp::DivAssign,
            Token::PercentEq(_) => BinOp::ModAssign,
            _ => return Ok(lhs),
        };
        self.advance();

        let rhs = self.parse_assignment()?;
        Ok(self.binary(op, lhs, rhs, loc))
    }

    /// Parse one left-associative precedence level
    fn parse_binary_level(
        &mut self,
        operators: fn(&Token) -> Option<BinOp>,
        next: fn(&mut Parser) -> Result<ExprId, ParseError>,
    ) -> Result<ExprId, ParseError> {
        let mut left = next(self)?;

        loop {
            let loc = self.current_location();
            let Some(op) = operators(self.peek()) else {
                break;
            };
            self.advance();
            let right = next(self)?;
            left = self.binary(op, left, right, loc);
        }

        Ok(left)
    }

    fn parse_logical_or(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::OrOr(_)).then_some(BinOp::Or),
            Parser::parse_logical_and,
        )
    }

    fn parse_logical_and(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::AndAnd(_)).then_some(BinOp::And),
            Parser::parse_bitwise_or,
        )
    }

    fn parse_bitwise_or(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::Pipe(_)).then_some(BinOp::BitOr),
            Parser::parse_bitwise_xor,
        )
    }

    fn parse_bitwise_xor(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::Caret(_)).then_some(BinOp::BitXor),
            Parser::parse_bitwise_and,
        )
    }

    fn parse_bitwise_and(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::Amp(_)).then_some(BinOp::BitAnd),
            Parser::parse_equality,
        )
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::EqEq(_) => Some(BinOp::Eq),
                Token::NotEq(_) => Some(BinOp::Ne),
                _ => None,
            },
            Parser::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::Lt(_) => Some(BinOp::Lt),
                Token::Le(_) => Some(BinOp::Le),
                Token::Gt(_) => Some(BinOp::Gt),
                Token::Ge(_) => Some(BinOp::Ge),
                _ => None,
            },
            Parser::parse_shift,
        )
    }

    fn parse_shift(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::LtLt(_) => Some(BinOp::BitShl),
                Token::GtGt(_) => Some(BinOp::BitShr),
                _ => None,
            },
            Parser::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::Plus(_) => Some(BinOp::Add),
                Token::Minus(_) => Some(BinOp::Sub),
                _ => None,
            },
            Parser::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::Star(_) => Some(BinOp::Mul),
                Token::Slash(_) => Some(BinOp::Div),
                Token::Percent(_) => Some(BinOp::Mod),
                _ => None,
            },
            Parser::parse_cast,
        )
    }

    /// Parse cast: `(type) expr`
    fn parse_cast(&mut self) -> Result<ExprId, ParseError> {
        let loc = self.current_location();
        if self.check(&Token::LParen(loc)) && self.type_keyword_ahead(1) {
            self.advance(); // consume '('
            let target_type = self.parse_type_name()?;
            self.expect_token(
                &Token::RParen(self.current_location()),
                "Expected ')' after cast type",
            )?;
            let expr = self.parse_cast()?;
            return Ok(self
                .program
                .push_expr(ExprKind::Cast { expr }, target_type, loc));
        }

        self.parse_unary()
    }

    /// Parse unary (! ~ - + & * ++ -- sizeof)
    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let loc = self.current_location();

        let op = match self.peek() {
            Token::Bang(_) => Some(UnOp::Not),
            Token::Tilde(_) => Some(UnOp::BitNot),
            Token::Minus(_) => Some(UnOp::Neg),
            Token::Plus(_) => Some(UnOp::Plus),
            Token::Amp(_) => Some(UnOp::AddrOf),
            Token::Star(_) => Some(UnOp::Deref),
            Token::PlusPlus(_) => Some(UnOp::PreInc),
            Token::MinusMinus(_) => Some(UnOp::PreDec),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.parse_cast()?;
            return Ok(self.unary(op, operand, loc));
        }

        if self.match_token(&Token::Sizeof(loc)) {
            let target_type = if self.check(&Token::LParen(self.current_location()))
                && self.type_keyword_ahead(1)
            {
                self.advance(); // consume '('
                let ty = self.parse_type_name()?;
                self.expect_token(
                    &Token::RParen(self.current_location()),
                    "Expected ')' after sizeof type",
                )?;
                ty
            } else {
                // The operand is only inspected for its type, never evaluated
                let operand = self.parse_unary()?;
                self.program.expr(operand).ty.clone()
            };

            return Ok(self
                .program
                .push_expr(ExprKind::SizeOf(target_type), Type::int(), loc));
        }

        self.parse_postfix()
    }

    /// Parse postfix (`[]`, `++`, `--`)
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.match_token(&Token::LBracket(loc)) {
                let index = self.parse_expression()?;
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after array index",
                )?;
                let ty = self.program.expr(expr).ty.element_type();
                expr = self
                    .program
                    .push_expr(ExprKind::Subscript { base: expr, index }, ty, loc);
            } else if self.match_token(&Token::PlusPlus(loc)) {
                expr = self.unary(UnOp::PostInc, expr, loc);
            } else if self.match_token(&Token::MinusMinus(loc)) {
                expr = self.unary(UnOp::PostDec, expr, loc);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse primary (literals, identifiers, calls, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let loc = self.current_location();

        match self.peek().clone() {
            Token::IntLiteral(n, _) => {
                self.advance();
                Ok(self
                    .program
                    .push_expr(ExprKind::IntLiteral(n), Type::int(), loc))
            }
            Token::Ident(name, _) => {
                self.advance();
                let id = self.resolve(&name, loc)?;

                if self.check(&Token::LParen(self.current_location())) {
                    return self.parse_call(id, &name, loc);
                }

                let ty = self.program.decl(id).ty();
                Ok(self.program.push_expr(ExprKind::DeclRef(id), ty, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_token(
                    &Token::RParen(self.current_location()),
                    "Expected ')' after expression",
                )?;
                let ty = self.program.expr(inner).ty.clone();
                Ok(self.program.push_expr(ExprKind::Paren(inner), ty, loc))
            }
            other => Err(ParseError::new(format!("Unexpected token: {}", other), loc)),
        }
    }

    /// Parse a call to the function declaration `callee`
    fn parse_call(
        &mut self,
        callee: DeclId,
        name: &str,
        loc: SourceLocation,
    ) -> Result<ExprId, ParseError> {
        if !self.program.decl(callee).is_function() {
            return Err(ParseError::new(
                format!("Called object '{}' is not a function", name),
                loc,
            ));
        }

        self.advance(); // consume '('
        let mut args = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after function arguments",
        )?;

        let ty = self.program.decl(callee).ty().return_type();
        Ok(self.program.push_expr(ExprKind::Call { callee, args }, ty, loc))
    }

    /// Parse a type name as used in casts and sizeof: base type plus pointers
    fn parse_type_name(&mut self) -> Result<Type, ParseError> {
        let base = self.parse_base_type()?;
        Ok(self.parse_pointer_suffix(base))
    }

    fn type_keyword_ahead(&self, n: usize) -> bool {
        matches!(
            self.peek_ahead(n),
            Some(Token::Int(_) | Token::Char(_) | Token::Void(_))
        )
    }

    fn binary(&mut self, op: BinOp, lhs: ExprId, rhs: ExprId, loc: SourceLocation) -> ExprId {
        let lhs_ty = &self.program.expr(lhs).ty;
        let rhs_ty = &self.program.expr(rhs).ty;

        let ty = if op.is_assignment() {
            lhs_ty.clone()
        } else if op.is_additive() {
            match (lhs_ty.is_pointer(), rhs_ty.is_pointer()) {
                (true, true) => Type::int(),
                (true, false) => lhs_ty.clone(),
                (false, true) => rhs_ty.clone(),
                (false, false) => Type::int(),
            }
        } else {
            Type::int()
        };

        self.program
            .push_expr(ExprKind::Binary { op, lhs, rhs }, ty, loc)
    }

    fn unary(&mut self, op: UnOp, operand: ExprId, loc: SourceLocation) -> ExprId {
        let operand_ty = &self.program.expr(operand).ty;
        let ty = match op {
            UnOp::Deref => operand_ty.element_type(),
            UnOp::AddrOf => operand_ty.clone().with_pointer(),
            UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => operand_ty.clone(),
            UnOp::Neg | UnOp::Plus | UnOp::Not | UnOp::BitNot => Type::int(),
        };

        self.program
            .push_expr(ExprKind::Unary { op, operand }, ty, loc)
    }
}
