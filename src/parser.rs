// ABOUTME: Parser producing the Lux syntax tree from a token stream
//
// Recursive descent for statements, precedence climbing for expressions.
// Line-break tokens are soft statement terminators: redundant ones are
// absorbed and missing ones are tolerated.

use crate::ast::{BinaryOp, Expr, FuncDecl, Param, Stmt, UnaryOp};
use crate::error::LuxError;
use crate::token::{Token, TokenKind};
use std::rc::Rc;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: String,
}

/// Parses a full program (a statement list terminated by end-of-input).
pub fn parse(tokens: Vec<Token>, file: impl Into<String>) -> Result<Vec<Stmt>, LuxError> {
    Parser::new(tokens, file).parse_program()
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: impl Into<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            file: file.into(),
        }
    }

    fn parse_program(&mut self) -> Result<Vec<Stmt>, LuxError> {
        let mut program = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Eof) {
            program.push(self.parse_statement()?);
            self.skip_newlines();
        }
        Ok(program)
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_ahead(&self, offset: usize) -> TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, LuxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("Expected {}, found {}", kind, self.describe_peek())))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Absorbs an optional statement terminator.
    fn end_statement(&mut self) {
        self.skip_newlines();
    }

    fn describe_peek(&self) -> String {
        let token = self.peek();
        match token.kind {
            TokenKind::Eof | TokenKind::Newline => format!("{}", token.kind),
            TokenKind::Str => format!("string \"{}\"", token.lexeme),
            _ => format!("'{}'", token.lexeme),
        }
    }

    fn error_here(&self, message: String) -> LuxError {
        let token = self.peek();
        LuxError::Parse {
            message,
            file: self.file.clone(),
            line: token.line,
            column: token.column,
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Stmt, LuxError> {
        match self.peek_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::Const => self.parse_const(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Func => self.parse_func_decl(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let token = self.advance();
                self.end_statement();
                Ok(Stmt::Break {
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::Continue => {
                let token = self.advance();
                self.end_statement();
                Ok(Stmt::Continue {
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::Import => self.parse_import(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Ident => self.parse_ident_statement(),
            _ => {
                let expr = self.parse_expression()?;
                self.end_statement();
                Ok(Stmt::Expression(expr))
            }
        }
    }

    fn parse_let(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let name = self.expect(TokenKind::Ident)?.lexeme;
        let type_note = self.parse_type_note()?;
        let init = if self.check(TokenKind::Assign) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.end_statement();
        Ok(Stmt::Let {
            name,
            type_note,
            init,
            line: keyword.line,
            column: keyword.column,
        })
    }

    fn parse_const(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let name = self.expect(TokenKind::Ident)?.lexeme;
        let type_note = self.parse_type_note()?;
        self.expect(TokenKind::Assign)?;
        let init = self.parse_expression()?;
        self.end_statement();
        Ok(Stmt::Const {
            name,
            type_note,
            init,
            line: keyword.line,
            column: keyword.column,
        })
    }

    /// Optional `: typename` annotation; parsed but semantically ignored.
    fn parse_type_note(&mut self) -> Result<Option<String>, LuxError> {
        if self.check(TokenKind::Colon) {
            self.advance();
            Ok(Some(self.expect(TokenKind::Ident)?.lexeme))
        } else {
            Ok(None)
        }
    }

    /// Statements that begin with an identifier: assignment, index
    /// assignment, or an expression statement. `ident [ expr ] = …` is
    /// resolved speculatively: commit to an index assignment only when `=`
    /// follows the closing bracket, otherwise rewind and reparse the
    /// identifier as an expression.
    fn parse_ident_statement(&mut self) -> Result<Stmt, LuxError> {
        if self.peek_ahead(1) == TokenKind::Assign {
            let name_token = self.advance();
            self.advance(); // '='
            let value = self.parse_expression()?;
            self.end_statement();
            return Ok(Stmt::Assign {
                name: name_token.lexeme,
                value,
                line: name_token.line,
                column: name_token.column,
            });
        }

        if self.peek_ahead(1) == TokenKind::LBracket {
            let mark = self.pos;
            if let Some(stmt) = self.try_parse_index_assign()? {
                return Ok(stmt);
            }
            self.pos = mark;
        }

        let expr = self.parse_expression()?;
        self.end_statement();
        Ok(Stmt::Expression(expr))
    }

    fn try_parse_index_assign(&mut self) -> Result<Option<Stmt>, LuxError> {
        let name_token = self.advance();
        self.advance(); // '['
        let index = match self.parse_expression() {
            Ok(index) => index,
            // The expression path will produce the error with full context.
            Err(_) => return Ok(None),
        };
        if !self.check(TokenKind::RBracket) {
            return Ok(None);
        }
        self.advance();
        if !self.check(TokenKind::Assign) {
            return Ok(None);
        }
        self.advance();
        let value = self.parse_expression()?;
        self.end_statement();
        Ok(Some(Stmt::IndexAssign {
            name: name_token.lexeme,
            index,
            value,
            line: name_token.line,
            column: name_token.column,
        }))
    }

    fn parse_if(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let mut branches = Vec::new();
        let mut else_body = None;

        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then)?;
        let body = self.parse_block(&[TokenKind::Else, TokenKind::End])?;
        branches.push((condition, body));

        while self.check(TokenKind::Else) {
            self.advance();
            if self.check(TokenKind::If) {
                self.advance();
                let condition = self.parse_expression()?;
                self.expect(TokenKind::Then)?;
                let body = self.parse_block(&[TokenKind::Else, TokenKind::End])?;
                branches.push((condition, body));
            } else {
                else_body = Some(self.parse_block(&[TokenKind::End])?);
                break;
            }
        }

        self.expect(TokenKind::End)?;
        self.end_statement();
        Ok(Stmt::If {
            branches,
            else_body,
            line: keyword.line,
            column: keyword.column,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect(TokenKind::End)?;
        self.end_statement();
        Ok(Stmt::While {
            condition,
            body,
            line: keyword.line,
            column: keyword.column,
        })
    }

    fn parse_for(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let variable = self.expect(TokenKind::Ident)?.lexeme;
        self.expect(TokenKind::In)?;
        let iterable = self.parse_expression()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect(TokenKind::End)?;
        self.end_statement();
        Ok(Stmt::For {
            variable,
            iterable,
            body,
            line: keyword.line,
            column: keyword.column,
        })
    }

    fn parse_func_decl(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let name = self.expect(TokenKind::Ident)?.lexeme;
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param_name = self.expect(TokenKind::Ident)?.lexeme;
                let type_note = self.parse_type_note()?;
                params.push(Param {
                    name: param_name,
                    type_note,
                });
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_note = self.parse_type_note()?;

        let body = self.parse_block(&[TokenKind::End])?;
        self.expect(TokenKind::End)?;
        self.end_statement();
        Ok(Stmt::FuncDecl(Rc::new(FuncDecl {
            name,
            params,
            return_note,
            body,
            line: keyword.line,
            column: keyword.column,
        })))
    }

    fn parse_return(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let value = match self.peek_kind() {
            TokenKind::Newline
            | TokenKind::Eof
            | TokenKind::End
            | TokenKind::Else
            | TokenKind::Catch => None,
            _ => Some(self.parse_expression()?),
        };
        self.end_statement();
        Ok(Stmt::Return {
            value,
            line: keyword.line,
            column: keyword.column,
        })
    }

    fn parse_import(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let path = self.expect(TokenKind::Str)?.lexeme;
        self.end_statement();
        Ok(Stmt::Import {
            path,
            line: keyword.line,
            column: keyword.column,
        })
    }

    fn parse_try(&mut self) -> Result<Stmt, LuxError> {
        let keyword = self.advance();
        let body = self.parse_block(&[TokenKind::Catch])?;
        self.expect(TokenKind::Catch)?;
        let variable = self.expect(TokenKind::Ident)?.lexeme;
        let handler = self.parse_block(&[TokenKind::End])?;
        self.expect(TokenKind::End)?;
        self.end_statement();
        Ok(Stmt::TryCatch {
            body,
            variable,
            handler,
            line: keyword.line,
            column: keyword.column,
        })
    }

    /// Parses statements until one of the stop tokens (which is left for the
    /// caller to consume). End-of-input here means a block was never closed.
    fn parse_block(&mut self, stops: &[TokenKind]) -> Result<Vec<Stmt>, LuxError> {
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if stops.contains(&self.peek_kind()) {
                return Ok(body);
            }
            if self.check(TokenKind::Eof) {
                return Err(self.error_here(format!(
                    "Expected {}, found end of input",
                    stops[stops.len() - 1]
                )));
            }
            body.push(self.parse_statement()?);
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub fn parse_expression(&mut self) -> Result<Expr, LuxError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, LuxError> {
        let mut lhs = self.parse_unary()?;

        while let Some((l_bp, r_bp, op)) = binding_power(self.peek_kind()) {
            if l_bp < min_bp {
                break;
            }
            let op_token = self.advance();
            let rhs = self.parse_binary(r_bp)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: op_token.line,
                column: op_token.column,
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, LuxError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let op_token = self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            line: op_token.line,
            column: op_token.column,
        })
    }

    /// Primary expression plus its postfix chain. Calls are accepted only
    /// with a bare identifier callee; `[…]` indexing chains off identifiers
    /// and call results.
    fn parse_postfix(&mut self) -> Result<Expr, LuxError> {
        let mut expr = self.parse_primary()?;

        if matches!(expr, Expr::Ident { .. } | Expr::Call { .. }) {
            while self.check(TokenKind::LBracket) {
                let bracket = self.advance();
                let index = self.parse_expression()?;
                self.expect(TokenKind::RBracket)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                    line: bracket.line,
                    column: bracket.column,
                };
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, LuxError> {
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance();
                let value: f64 = token.lexeme.parse().map_err(|_| {
                    // Unreachable for lexer-produced tokens; guards hand-built streams.
                    self.error_here(format!("Invalid number literal '{}'", token.lexeme))
                })?;
                Ok(Expr::Number {
                    value,
                    is_float: token.lexeme.contains('.'),
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::Str => {
                let token = self.advance();
                Ok(Expr::Str {
                    value: token.lexeme,
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::True | TokenKind::False => {
                let token = self.advance();
                Ok(Expr::Bool {
                    value: token.kind == TokenKind::True,
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::Nil => {
                let token = self.advance();
                Ok(Expr::Nil {
                    line: token.line,
                    column: token.column,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::Ident => {
                let token = self.advance();
                if self.check(TokenKind::LParen) {
                    self.parse_call(token)
                } else {
                    Ok(Expr::Ident {
                        name: token.lexeme,
                        line: token.line,
                        column: token.column,
                    })
                }
            }
            _ => Err(self.error_here(format!("Unexpected token {}", self.describe_peek()))),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr, LuxError> {
        let bracket = self.advance();
        let mut elements = Vec::new();
        self.skip_newlines();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                self.skip_newlines();
                if self.check(TokenKind::Comma) {
                    self.advance();
                    self.skip_newlines();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::Array {
            elements,
            line: bracket.line,
            column: bracket.column,
        })
    }

    fn parse_call(&mut self, name_token: Token) -> Result<Expr, LuxError> {
        self.advance(); // '('
        let mut args = Vec::new();
        self.skip_newlines();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                self.skip_newlines();
                if self.check(TokenKind::Comma) {
                    self.advance();
                    self.skip_newlines();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Expr::Call {
            name: name_token.lexeme,
            args,
            line: name_token.line,
            column: name_token.column,
        })
    }
}

/// Binding powers for the precedence climb, lowest to highest. `^` is
/// right-associative: its right power is below its left one.
fn binding_power(kind: TokenKind) -> Option<(u8, u8, BinaryOp)> {
    let entry = match kind {
        TokenKind::Or => (1, 2, BinaryOp::Or),
        TokenKind::And => (3, 4, BinaryOp::And),
        TokenKind::EqEq => (5, 6, BinaryOp::Eq),
        TokenKind::BangEq => (5, 6, BinaryOp::NotEq),
        TokenKind::Less => (7, 8, BinaryOp::Less),
        TokenKind::Greater => (7, 8, BinaryOp::Greater),
        TokenKind::LessEq => (7, 8, BinaryOp::LessEq),
        TokenKind::GreaterEq => (7, 8, BinaryOp::GreaterEq),
        TokenKind::Plus => (9, 10, BinaryOp::Add),
        TokenKind::Minus => (9, 10, BinaryOp::Sub),
        TokenKind::Star => (11, 12, BinaryOp::Mul),
        TokenKind::Slash => (11, 12, BinaryOp::Div),
        TokenKind::Percent => (11, 12, BinaryOp::Mod),
        TokenKind::Caret => (14, 13, BinaryOp::Pow),
        _ => return None,
    };
    Some(entry)
}
