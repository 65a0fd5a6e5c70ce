//! Recursive-descent parser: token stream → program tree.
//!
//! Tracks three flags across the descent — `inside_display`,
//! `inside_conditional`, `inside_if_block` — that loosen or restrict which
//! productions are legal, plus a symbol table of declared names used for
//! validation only (the evaluator has its own, separate environment).

use std::collections::HashMap;

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Token, TokenKind};

type PERR = ParseErrorKind;

fn is_reserved_word(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Begin
            | TokenKind::End
            | TokenKind::BlockKw
            | TokenKind::TypeInt
            | TokenKind::TypeFloat
            | TokenKind::TypeChar
            | TokenKind::TypeBool
            | TokenKind::TypeString
            | TokenKind::Mugna
            | TokenKind::Kung
            | TokenKind::Wala
            | TokenKind::Alang
            | TokenKind::Sa
            | TokenKind::Samtang
            | TokenKind::Ipakita
            | TokenKind::Dawat
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
            | TokenKind::BoolTrue
            | TokenKind::BoolFalse
    )
}

fn assign_op_for(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Assign => AssignOp::Assign,
        TokenKind::PlusAssign => AssignOp::AddAssign,
        TokenKind::MinusAssign => AssignOp::SubAssign,
        TokenKind::StarAssign => AssignOp::MulAssign,
        TokenKind::SlashAssign => AssignOp::DivAssign,
        TokenKind::PercentAssign => AssignOp::ModAssign,
        _ => return None,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end_pos: usize,
    declared: HashMap<String, Kind>,
    inside_display: bool,
    inside_conditional: bool,
}

impl Parser {
    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn peek_line(&self) -> u32 {
        self.tokens.get(self.pos).map(|t| t.line).unwrap_or(0)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                line: self.peek_line(),
            });
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                PERR::ExpectedToken(what.to_string()),
                self.peek_line(),
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<Token, ParseError> {
        match self.peek_kind() {
            TokenKind::Ident => Ok(self.advance()),
            kind if is_reserved_word(kind) => {
                let tok = self.advance();
                Err(ParseError::new(
                    PERR::ReservedKeyword(tok.lexeme.clone()),
                    tok.line,
                ))
            }
            _ => Err(ParseError::new(
                PERR::ExpectedToken("an identifier".to_string()),
                self.peek_line(),
            )),
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    fn require_declared(&self, name: &str, line: u32) -> Result<(), ParseError> {
        if self.declared.contains_key(name) {
            Ok(())
        } else {
            Err(ParseError::new(
                PERR::UndeclaredVariable(name.to_string()),
                line,
            ))
        }
    }

    // ---- statements --------------------------------------------------

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            if self.pos >= self.end_pos {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            TokenKind::Mugna => self.parse_declaration(),
            TokenKind::Ident => self.parse_assignment_or_increment(),
            TokenKind::Ipakita => self.parse_output(),
            TokenKind::Dawat => self.parse_input(),
            TokenKind::Kung => self.parse_if(),
            TokenKind::Samtang => self.parse_while(),
            TokenKind::Alang => self.parse_for(),
            _ => Err(ParseError::new(
                PERR::ExpectedToken("a statement".to_string()),
                self.peek_line(),
            )),
        }
    }

    fn parse_type(&mut self) -> Result<Kind, ParseError> {
        let kind = match self.peek_kind() {
            TokenKind::TypeInt => Kind::Int,
            TokenKind::TypeFloat => Kind::Float,
            TokenKind::TypeChar => Kind::Char,
            TokenKind::TypeBool => Kind::Bool,
            TokenKind::TypeString => Kind::String,
            _ => {
                return Err(ParseError::new(
                    PERR::ExpectedToken(
                        "a type keyword (NUMERO, TIPIK, LETRA, TINUOD, or PULONG)".to_string(),
                    ),
                    self.peek_line(),
                ))
            }
        };
        self.advance();
        Ok(kind)
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line; // MUGNA
        let kind = self.parse_type()?;

        let mut targets = Vec::new();
        loop {
            let name_tok = self.expect_identifier()?;
            if self.declared.contains_key(&name_tok.lexeme) {
                return Err(ParseError::new(
                    PERR::DuplicateDeclaration(name_tok.lexeme.clone()),
                    name_tok.line,
                ));
            }

            let init = if self.check(TokenKind::Assign) {
                self.advance();
                // the initializer may reference earlier siblings in this
                // same declaration list, so register before parsing it.
                self.declared.insert(name_tok.lexeme.clone(), kind);
                Some(self.parse_expression()?)
            } else {
                self.declared.insert(name_tok.lexeme.clone(), kind);
                None
            };

            targets.push(DeclTarget {
                name: name_tok.lexeme,
                line: name_tok.line,
                init,
            });

            if self.check(TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }

        Ok(Stmt::Declaration {
            kind,
            targets,
            line,
        })
    }

    fn parse_assignment_or_increment(&mut self) -> Result<Stmt, ParseError> {
        let name_tok = self.advance();
        self.require_declared(&name_tok.lexeme, name_tok.line)?;

        if self.check(TokenKind::Increment) {
            self.advance();
            return Ok(Stmt::Increment {
                name: name_tok.lexeme,
                line: name_tok.line,
            });
        }

        let op = match assign_op_for(self.peek_kind()) {
            Some(op) => {
                self.advance();
                op
            }
            None => {
                return Err(ParseError::new(
                    PERR::ExpectedToken("'=' or '++'".to_string()),
                    self.peek_line(),
                ))
            }
        };
        let value = self.parse_expression()?;
        Ok(Stmt::Assignment {
            name: name_tok.lexeme,
            op,
            value,
            line: name_tok.line,
        })
    }

    /// Parses `name = expr` specifically, used for `ALANG SA`'s init slot.
    fn parse_plain_assignment(&mut self) -> Result<Stmt, ParseError> {
        let name_tok = self.expect_identifier()?;
        self.require_declared(&name_tok.lexeme, name_tok.line)?;
        self.expect(TokenKind::Assign, "'='")?;
        let value = self.parse_expression()?;
        Ok(Stmt::Assignment {
            name: name_tok.lexeme,
            op: AssignOp::Assign,
            value,
            line: name_tok.line,
        })
    }

    fn can_start_expr(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::CharLit
                | TokenKind::StringLit
                | TokenKind::BoolTrue
                | TokenKind::BoolFalse
                | TokenKind::Ident
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Not
        )
    }

    fn parse_output(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line; // IPAKITA
        self.expect(TokenKind::Colon, "':'")?;

        self.inside_display = true;
        let mut exprs = Vec::new();
        loop {
            if self.check(TokenKind::Newline) && self.tokens[self.pos].lexeme == "$" {
                exprs.push(Expr::Newline(self.peek_line()));
                self.advance();
                continue;
            }
            if !self.can_start_expr() {
                break;
            }
            exprs.push(self.parse_expression()?);
        }
        self.inside_display = false;

        if exprs.is_empty() {
            return Err(ParseError::new(
                PERR::ExpectedToken("an expression after IPAKITA:".to_string()),
                self.peek_line(),
            ));
        }
        Ok(Stmt::Output { exprs, line })
    }

    fn parse_input(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line; // DAWAT
        self.expect(TokenKind::Colon, "':'")?;

        let mut names = Vec::new();
        loop {
            let name_tok = self.expect_identifier()?;
            self.require_declared(&name_tok.lexeme, name_tok.line)?;
            names.push(name_tok.lexeme);
            if self.check(TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        Ok(Stmt::Input { names, line })
    }

    fn parse_block(&mut self, in_if_block: bool) -> Result<Block, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenKind::BlockEnd) {
                break;
            }
            if self.check(TokenKind::Eof) {
                return Err(ParseError::new(
                    PERR::ExpectedToken("'}'".to_string()),
                    self.peek_line(),
                ));
            }
            statements.push(self.parse_statement()?);
        }
        if statements.is_empty() && in_if_block {
            statements.push(Stmt::Empty(self.peek_line()));
        }
        Ok(statements)
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line; // KUNG
        self.parse_if_body(line)
    }

    fn parse_if_body(&mut self, line: u32) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::LParen, "'('")?;
        self.inside_conditional = true;
        let cond = self.parse_expression()?;
        self.inside_conditional = false;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::BlockKw, "'PUNDOK'")?;
        self.expect(TokenKind::BlockStart, "'{'")?;
        let then_block = self.parse_block(true)?;
        self.expect(TokenKind::BlockEnd, "'}'")?;

        let else_block = self.try_parse_else()?;
        Ok(Stmt::If {
            cond,
            then_block,
            else_block,
            line,
        })
    }

    fn try_parse_else(&mut self) -> Result<Option<ElseBranch>, ParseError> {
        let checkpoint = self.pos;
        self.skip_newlines();

        if !self.check(TokenKind::Kung) {
            self.pos = checkpoint;
            return Ok(None);
        }
        let kung_line = self.tokens[self.pos].line;
        self.advance(); // KUNG

        if self.check(TokenKind::Not) {
            self.advance(); // DILI
            let nested = self.parse_if_body(kung_line)?;
            return Ok(Some(ElseBranch::ElseIf(Box::new(nested))));
        }
        if self.check(TokenKind::Wala) {
            self.advance(); // WALA
            self.expect(TokenKind::BlockKw, "'PUNDOK'")?;
            self.expect(TokenKind::BlockStart, "'{'")?;
            let block = self.parse_block(true)?;
            self.expect(TokenKind::BlockEnd, "'}'")?;
            return Ok(Some(ElseBranch::Block(block)));
        }

        // This KUNG belongs to a new statement, not to this if-chain.
        self.pos = checkpoint;
        Ok(None)
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line; // SAMTANG
        self.expect(TokenKind::LParen, "'('")?;
        self.inside_conditional = true;
        let cond = self.parse_expression()?;
        self.inside_conditional = false;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::BlockKw, "'PUNDOK'")?;
        self.expect(TokenKind::BlockStart, "'{'")?;
        let body = self.parse_block(false)?;
        self.expect(TokenKind::BlockEnd, "'}'")?;
        Ok(Stmt::While { cond, body, line })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line; // ALANG
        self.expect(TokenKind::Sa, "'SA'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let init = self.parse_plain_assignment()?;
        self.expect(TokenKind::Comma, "','")?;
        self.inside_conditional = true;
        let cond = self.parse_expression()?;
        self.inside_conditional = false;
        self.expect(TokenKind::Comma, "','")?;
        let update = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::BlockKw, "'PUNDOK'")?;
        self.expect(TokenKind::BlockStart, "'{'")?;
        let body = self.parse_block(false)?;
        self.expect(TokenKind::BlockEnd, "'}'")?;
        Ok(Stmt::For {
            init: Box::new(init),
            cond,
            update,
            body,
            line,
        })
    }

    // ---- expressions ---------------------------------------------------

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment_expr()
    }

    fn parse_assignment_expr(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_or()?;

        if let Some(op) = assign_op_for(self.peek_kind()) {
            let line = self.peek_line();
            match expr {
                Expr::Variable(name, _) => {
                    if self.inside_conditional {
                        return Err(ParseError::new(PERR::DisallowedAssignInCondition, line));
                    }
                    self.advance();
                    let value = self.parse_assignment_expr()?;
                    Ok(Expr::Assign(name, op, Box::new(value), line))
                }
                _ => Err(ParseError::new(PERR::InvalidAssignmentTarget, line)),
            }
        } else {
            Ok(expr)
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::Or) {
            let line = self.advance().line;
            let right = self.parse_and()?;
            left = Expr::Logical(LogicalOp::Or, Box::new(left), Box::new(right), line);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::And) {
            let line = self.advance().line;
            let right = self.parse_equality()?;
            left = Expr::Logical(LogicalOp::And, Box::new(left), Box::new(right), line);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Ne,
                _ => break,
            };
            let line = self.advance().line;
            let right = self.parse_comparison()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right), line);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Greater => BinOp::Gt,
                TokenKind::Less => BinOp::Lt,
                TokenKind::GreaterEq => BinOp::Ge,
                TokenKind::LessEq => BinOp::Le,
                _ => break,
            };
            let line = self.advance().line;
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right), line);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;
        loop {
            match self.peek_kind() {
                TokenKind::Plus => {
                    let line = self.advance().line;
                    let right = self.parse_factor()?;
                    left = Expr::Binary(BinOp::Add, Box::new(left), Box::new(right), line);
                }
                TokenKind::Minus => {
                    let line = self.advance().line;
                    let right = self.parse_factor()?;
                    left = Expr::Binary(BinOp::Sub, Box::new(left), Box::new(right), line);
                }
                TokenKind::Concat => {
                    if !self.inside_display {
                        return Err(ParseError::new(
                            PERR::ConcatOutsideDisplay,
                            self.peek_line(),
                        ));
                    }
                    let line = self.advance().line;
                    let right = self.parse_factor()?;
                    left = Expr::Concat(Box::new(left), Box::new(right), line);
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let line = self.advance().line;
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right), line);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Minus => {
                let line = self.advance().line;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand), line))
            }
            TokenKind::Plus => {
                let line = self.advance().line;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary(UnaryOp::Pos, Box::new(operand), line))
            }
            TokenKind::Not => {
                let line = self.advance().line;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary(UnaryOp::Not, Box::new(operand), line))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_primary()?;
        if self.check(TokenKind::Increment) {
            if let Expr::Variable(name, line) = expr {
                self.advance();
                return Ok(Expr::PostIncrement(name, line));
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let line = self.peek_line();
        match self.peek_kind() {
            TokenKind::IntLit => {
                let tok = self.advance();
                let value: i32 = tok.lexeme.parse().map_err(|_| {
                    ParseError::new(
                        PERR::ExpectedToken("a valid 32-bit integer literal".to_string()),
                        tok.line,
                    )
                })?;
                Ok(Expr::Literal(Literal::Int(value), tok.line))
            }
            TokenKind::FloatLit => {
                let tok = self.advance();
                let value: f32 = tok.lexeme.parse().map_err(|_| {
                    ParseError::new(
                        PERR::ExpectedToken("a valid floating-point literal".to_string()),
                        tok.line,
                    )
                })?;
                Ok(Expr::Literal(Literal::Float(value), tok.line))
            }
            TokenKind::CharLit => {
                let tok = self.advance();
                let value = tok.lexeme.chars().next().unwrap_or('\0');
                Ok(Expr::Literal(Literal::Char(value), tok.line))
            }
            TokenKind::StringLit => {
                let tok = self.advance();
                Ok(Expr::Literal(Literal::Str(tok.lexeme), tok.line))
            }
            TokenKind::BoolTrue => {
                let tok = self.advance();
                Ok(Expr::Literal(Literal::Bool(true), tok.line))
            }
            TokenKind::BoolFalse => {
                let tok = self.advance();
                Ok(Expr::Literal(Literal::Bool(false), tok.line))
            }
            TokenKind::Ident => {
                let tok = self.advance();
                self.require_declared(&tok.lexeme, tok.line)?;
                Ok(Expr::Variable(tok.lexeme, tok.line))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::Group(Box::new(inner), line))
            }
            _ => Err(ParseError::new(
                PERR::ExpectedToken("an expression".to_string()),
                line,
            )),
        }
    }
}

/// Locates the single `SUGOD`/`KATAPUSAN` pair and rejects any non-newline
/// token outside of them. Runs before recursive descent begins.
fn validate_structure(tokens: &[Token]) -> Result<(usize, usize), ParseError> {
    let mut begins = Vec::new();
    let mut ends = Vec::new();
    for (i, t) in tokens.iter().enumerate() {
        match t.kind {
            TokenKind::Begin => begins.push(i),
            TokenKind::End => ends.push(i),
            _ => {}
        }
    }

    if begins.len() != 1 || ends.len() != 1 {
        let line = tokens.first().map(|t| t.line).unwrap_or(1);
        return Err(ParseError::new(
            PERR::StructureInvalid(
                "program must contain exactly one SUGOD and one KATAPUSAN".to_string(),
            ),
            line,
        ));
    }

    let b = begins[0];
    let e = ends[0];
    if e < b {
        return Err(ParseError::new(
            PERR::StructureInvalid("KATAPUSAN appears before SUGOD".to_string()),
            tokens[e].line,
        ));
    }

    for (i, t) in tokens.iter().enumerate() {
        if i == b || i == e || t.kind == TokenKind::Eof {
            continue;
        }
        if (i < b || i > e) && t.kind != TokenKind::Newline {
            return Err(ParseError::new(
                PERR::StructureInvalid(format!(
                    "unexpected token '{}' outside SUGOD/KATAPUSAN",
                    t.lexeme
                )),
                t.line,
            ));
        }
    }

    Ok((b, e))
}

/// Parses a complete token stream (as produced by [`crate::token::tokenize`])
/// into a program tree.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    let span = tracing::debug_span!("parse");
    let _enter = span.enter();

    let (begin, end) = validate_structure(&tokens)?;
    let mut parser = Parser {
        tokens,
        pos: begin + 1,
        end_pos: end,
        declared: HashMap::new(),
        inside_display: false,
        inside_conditional: false,
    };
    parser.parse_program()
}
