//! Declaration parsing implementation
//!
//! Handles top-level declarations (global variables, function prototypes and
//! definitions), local declaration lists, and type specifiers.
//!
//! # Grammar
//!
//! ```text
//! top_level  ::= ["extern"] type declarator ( function_rest | var_rest )
//! type       ::= ("int" | "char" | "void")
//! declarator ::= "*"* identifier ["[" int_literal "]"]
//! var_rest   ::= ["=" expression] ("," declarator ["=" expression])* ";"
//! ```
//!
//! A function may be declared any number of times; every declaration shares a
//! single [`DeclId`] and the definition supplies parameters and body.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a top-level declaration (function or global variable list)
    pub(crate) fn parse_top_level_declaration(&mut self) -> Result<(), ParseError> {
        self.match_token(&Token::Extern(self.current_location()));

        let base = self.parse_base_type()?;
        let ty = self.parse_pointer_suffix(base.clone());
        let location = self.current_location();
        let name = self.expect_identifier()?;

        if self.check(&Token::LParen(self.current_location())) {
            return self.parse_function(ty, name, location);
        }

        let ids = self.parse_declarator_list(base, ty, name, location, Storage::Global)?;
        for id in ids {
            self.program.items.push(TopLevel::Variable(id));
        }
        Ok(())
    }

    /// Parse base type keyword: int, char, void
    pub(crate) fn parse_base_type(&mut self) -> Result<Type, ParseError> {
        let base = if self.match_token(&Token::Int(self.current_location())) {
            BaseType::Int
        } else if self.match_token(&Token::Char(self.current_location())) {
            BaseType::Char
        } else if self.match_token(&Token::Void(self.current_location())) {
            BaseType::Void
        } else {
            return Err(ParseError::new(
                format!("Expected type, found {}", self.peek()),
                self.current_location(),
            ));
        };
        Ok(Type::new(base))
    }

    /// Parse zero or more `*` after a base type
    pub(crate) fn parse_pointer_suffix(&mut self, mut ty: Type) -> Type {
        while self.match_token(&Token::Star(self.current_location())) {
            ty = ty.with_pointer();
        }
        ty
    }

    /// Parse a local declaration statement starting at the type keyword.
    /// Consumes the trailing semicolon.
    pub(crate) fn parse_local_declaration(&mut self) -> Result<Vec<DeclId>, ParseError> {
        let base = self.parse_base_type()?;
        let ty = self.parse_pointer_suffix(base.clone());
        let location = self.current_location();
        let name = self.expect_identifier()?;
        self.parse_declarator_list(base, ty, name, location, Storage::Local)
    }

    /// Parse the remainder of a variable declaration list after its first name
    fn parse_declarator_list(
        &mut self,
        base: Type,
        first_type: Type,
        first_name: String,
        first_location: SourceLocation,
        storage: Storage,
    ) -> Result<Vec<DeclId>, ParseError> {
        let mut ids = vec![self.parse_variable_rest(first_type, first_name, first_location, storage)?];

        while self.match_token(&Token::Comma(self.current_location())) {
            let ty = self.parse_pointer_suffix(base.clone());
            let location = self.current_location();
            let name = self.expect_identifier()?;
            ids.push(self.parse_variable_rest(ty, name, location, storage)?);
        }

        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after variable declaration",
        )?;
        Ok(ids)
    }

    /// Parse optional array bound and initializer of one declarator
    fn parse_variable_rest(
        &mut self,
        mut ty: Type,
        name: String,
        location: SourceLocation,
        storage: Storage,
    ) -> Result<DeclId, ParseError> {
        if self.match_token(&Token::LBracket(self.current_location())) {
            let len = self.parse_array_bound()?;
            ty = ty.with_array(len);
            if self.check(&Token::LBracket(self.current_location())) {
                return Err(ParseError::new(
                    "Multi-dimensional arrays are not supported",
                    self.current_location(),
                ));
            }
        }

        if ty.is_void() {
            return Err(ParseError::new(
                format!("Variable '{}' has incomplete type 'void'", name),
                location,
            ));
        }

        let id = self.program.push_decl(Decl {
            name: name.clone(),
            kind: DeclKind::Var {
                ty: ty.clone(),
                init: None,
                storage,
            },
            location,
        });
        self.declare(&name, id, location)?;

        if self.match_token(&Token::Eq(self.current_location())) {
            if ty.is_array() {
                return Err(ParseError::new(
                    "Array initializers are not supported",
                    self.previous_location(),
                ));
            }
            let init_expr = self.parse_expression()?;
            if let DeclKind::Var { init, .. } = &mut self.program.decl_mut(id).kind {
                *init = Some(init_expr);
            }
        }

        Ok(id)
    }

    /// Parse `N]` of an array declarator; N must be a positive integer constant
    fn parse_array_bound(&mut self) -> Result<usize, ParseError> {
        let location = self.current_location();
        let len = match self.peek() {
            Token::IntLiteral(n, _) if *n > 0 => *n as usize,
            _ => {
                return Err(ParseError::new(
                    "Array size must be a positive integer constant",
                    location,
                ));
            }
        };
        self.advance();
        self.expect_token(
            &Token::RBracket(self.current_location()),
            "Expected ']' after array size",
        )?;
        Ok(len)
    }

    /// Parse function prototype or definition after its name
    fn parse_function(
        &mut self,
        return_type: Type,
        name: String,
        location: SourceLocation,
    ) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            "Expected '(' after function name",
        )?;

        // Parameters live in the function scope, which the body shares
        self.push_scope();
        let result = self.parse_function_rest(return_type, name, location);
        self.pop_scope();
        result
    }

    fn parse_function_rest(
        &mut self,
        return_type: Type,
        name: String,
        location: SourceLocation,
    ) -> Result<(), ParseError> {
        let params = self.parse_parameter_list()?;
        self.expect_token(
            &Token::RParen(self.current_location()),
            "Expected ')' after parameters",
        )?;

        let id = match self.global_lookup(&name) {
            Some(existing) if self.program.decl(existing).is_function() => existing,
            Some(_) => {
                return Err(ParseError::new(
                    format!("Redefinition of '{}' as a different kind of symbol", name),
                    location,
                ));
            }
            None => {
                let id = self.program.push_decl(Decl {
                    name: name.clone(),
                    kind: DeclKind::Function {
                        return_type,
                        params: params.clone(),
                        body: None,
                    },
                    location,
                });
                if let Some(global) = self.scopes.first_mut() {
                    global.insert(name.clone(), id);
                }
                self.program.items.push(TopLevel::Function(id));
                id
            }
        };

        if self.match_token(&Token::LBrace(self.current_location())) {
            let has_body = matches!(
                self.program.decl(id).kind,
                DeclKind::Function { body: Some(_), .. }
            );
            if has_body {
                return Err(ParseError::new(
                    format!("Redefinition of function '{}'", name),
                    location,
                ));
            }

            // Definition parameters must be visible to recursive calls in the body
            if let DeclKind::Function { params: p, .. } = &mut self.program.decl_mut(id).kind {
                *p = params;
            }
            self.program.decl_mut(id).location = location;

            let body_location = self.previous_location();
            let statements = self.parse_block_statements()?;
            self.expect_token(
                &Token::RBrace(self.current_location()),
                "Expected '}' after function body",
            )?;
            let body_id = self
                .program
                .push_stmt(StmtKind::Compound(statements), body_location);

            if let DeclKind::Function { body, .. } = &mut self.program.decl_mut(id).kind {
                *body = Some(body_id);
            }
        } else {
            self.expect_token(
                &Token::Semicolon(self.current_location()),
                "Expected ';' or function body after declaration",
            )?;
        }

        Ok(())
    }

    /// Parse parameter list: `()`, `(void)`, or `(type [name], ...)`
    fn parse_parameter_list(&mut self) -> Result<Vec<DeclId>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        // (void) means no parameters in C
        if self.check(&Token::Void(self.current_location()))
            && matches!(self.peek_ahead(1), Some(Token::RParen(_)))
        {
            self.advance();
            return Ok(params);
        }

        loop {
            let base = self.parse_base_type()?;
            let mut ty = self.parse_pointer_suffix(base);
            let location = self.current_location();

            let name = match self.peek() {
                Token::Ident(name, _) => {
                    let name = name.clone();
                    self.advance();
                    name
                }
                _ => String::new(),
            };

            // Array parameters stay arrays and receive the caller's array id;
            // the declared length, if any, is not checked
            if self.match_token(&Token::LBracket(self.current_location())) {
                let len = match self.peek() {
                    Token::IntLiteral(n, _) => {
                        let len = usize::try_from(*n).unwrap_or(0);
                        self.advance();
                        len
                    }
                    _ => 0,
                };
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' in array parameter",
                )?;
                ty = ty.with_array(len);
            }

            if ty.is_void() {
                return Err(ParseError::new("Parameter has incomplete type 'void'", location));
            }

            let id = self.program.push_decl(Decl {
                name: name.clone(),
                kind: DeclKind::Var {
                    ty,
                    init: None,
                    storage: Storage::Param,
                },
                location,
            });
            if !name.is_empty() {
                self.declare(&name, id, location)?;
            }
            params.push(id);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }
}
