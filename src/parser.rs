use std::borrow::Cow;
use std::io;
use std::mem;

use tracing::trace;

use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::error::{Error, IntoSpanned, SpannedError};
use crate::ir::Emitter;
use crate::lexer::{Lexer, Span, Token, TokenKind};
use crate::symtab::{Slot, SymbolTable};
use crate::types::{needs_cast, Cast, Type};

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("unexpected token '{actual}', expected: '{expected}'")]
    UnexpectedToken {
        expected: Cow<'static, str>,
        actual: String,
    },
    #[error("invalid primary '{0}'")]
    InvalidPrimary(TokenKind),
    #[error("invalid operator '{0}'")]
    InvalidOperator(TokenKind),
    #[error("identifier '{0}' is used before declaration")]
    UndeclaredIdentifier(String),
}

pub type ParseError = SpannedError<ErrorKind>;

/// Recursive-descent parser with one token of lookahead, emitting IR as each
/// construct is type-resolved. The token stream is only reachable through
/// `next`/`advance`/`expect`/`accept`: every grammar procedure enters
/// positioned at the first token of its production and returns positioned
/// one token past it.
pub struct Parser<'a, W> {
    lexer: Lexer<'a>,
    token: Token,
    table: SymbolTable,
    emit: Emitter<W>,
}

impl<'a, W: io::Write> Parser<'a, W> {
    pub fn new(mut lexer: Lexer<'a>, out: W) -> Result<Self, Error> {
        let token = lexer.next_token()?;

        Ok(Self {
            lexer,
            token,
            table: SymbolTable::new(),
            emit: Emitter::new(out),
        })
    }

    fn span(&self) -> Span {
        self.token.span
    }

    /// Consumes the current token, pulling the next one into the lookahead.
    fn next(&mut self) -> Result<Token, Error> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.token, next))
    }

    fn advance(&mut self) -> Result<(), Error> {
        let _ = self.next()?;
        Ok(())
    }

    fn unexpected(&self, expected: impl Into<Cow<'static, str>>) -> Error {
        ErrorKind::UnexpectedToken {
            expected: expected.into(),
            actual: self.token.to_string(),
        }
        .at(self.span())
        .into()
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), Error> {
        if self.token.kind != expected {
            return Err(self.unexpected(expected.to_string()));
        }

        self.advance()
    }

    fn accept(&mut self, kind: &TokenKind) -> Result<bool, Error> {
        if &self.token.kind == kind {
            self.advance()?;
            return Ok(true);
        }

        Ok(false)
    }

    fn test_keyword(&self, keyword: &str) -> bool {
        matches!(&self.token.kind, TokenKind::Keyword(k) if k == keyword)
    }

    fn expect_keyword(&mut self, keyword: &'static str) -> Result<(), Error> {
        if !self.test_keyword(keyword) {
            return Err(self.unexpected(keyword));
        }

        self.advance()
    }

    fn ident(&mut self) -> Result<(String, Span), Error> {
        if !matches!(self.token.kind, TokenKind::Ident(_)) {
            return Err(self.unexpected("ident"));
        }

        let token = self.next()?;

        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.span)),
            _ => Err(self.unexpected("ident")),
        }
    }

    fn semi(&mut self) -> Result<(), Error> {
        self.expect(TokenKind::Punct(";"))
    }

    /// program := BEGIN statement* END
    pub fn parse(mut self, name: &str) -> Result<(), Error> {
        trace!(unit = name, "translation unit");

        self.emit.unit_begin(name)?;
        self.expect_keyword("BEGIN")?;
        self.emit.func_begin("main")?;

        while !self.test_keyword("END") {
            self.statement()?;
        }

        self.expect_keyword("END")?;
        self.emit.func_end("main")?;
        self.expect(TokenKind::Eof)
    }

    /// statement := declaration | assignment | readStmt | writeStmt
    fn statement(&mut self) -> Result<(), Error> {
        trace!(token = %self.token, "statement");

        match &self.token.kind {
            TokenKind::Keyword(keyword) => match keyword.as_str() {
                "read" => self.read_stmt(),
                "write" => self.write_stmt(),
                keyword => match Type::from_keyword(keyword) {
                    Some(ty) => self.declaration(ty),
                    None => Err(self.unexpected("statement")),
                },
            },
            TokenKind::Ident(_) => self.assignment(),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// declaration := ('int'|'long'|'float') ID (':=' expression)? ';'
    fn declaration(&mut self, ty: Type) -> Result<(), Error> {
        self.advance()?;
        let (name, span) = self.ident()?;

        let slot = self.table.declare(&name, ty).map_err(|e| e.at(span))?;
        self.emit.declare(&name, slot, ty)?;

        if self.accept(&TokenKind::Punct(":="))? {
            let value = self.expression()?;
            self.assign_to(slot, ty, value)?;
        }

        self.semi()
    }

    /// assignment := ID ':=' expression ';'
    fn assignment(&mut self) -> Result<(), Error> {
        let (name, span) = self.ident()?;

        let entry = self
            .table
            .lookup(&name)
            .ok_or_else(|| ErrorKind::UndeclaredIdentifier(name.clone()).at(span))?;
        let (slot, ty) = (entry.slot, entry.ty);

        self.expect(TokenKind::Punct(":="))?;
        let value = self.expression()?;
        self.assign_to(slot, ty, value)?;
        self.semi()
    }

    /// readStmt := 'read' '(' ID (',' ID)* ')' ';'
    fn read_stmt(&mut self) -> Result<(), Error> {
        self.advance()?;
        self.expect(TokenKind::Punct("("))?;

        loop {
            let (name, span) = self.ident()?;

            let entry = self
                .table
                .lookup(&name)
                .ok_or_else(|| ErrorKind::UndeclaredIdentifier(name.clone()).at(span))?;
            self.emit.read(entry.slot)?;

            if !self.accept(&TokenKind::Punct(","))? {
                break;
            }
        }

        self.expect(TokenKind::Punct(")"))?;
        self.semi()
    }

    /// writeStmt := 'write' '(' expression (',' expression)* ')' ';'
    fn write_stmt(&mut self) -> Result<(), Error> {
        self.advance()?;
        self.expect(TokenKind::Punct("("))?;

        loop {
            let value = self.expression()?;
            self.emit.write(&value)?;

            if !self.accept(&TokenKind::Punct(","))? {
                break;
            }
        }

        self.expect(TokenKind::Punct(")"))?;
        self.semi()
    }

    /// Widens `value` to `target` in a fresh temporary. The source kind does
    /// not matter; literal values are converted downstream, not here.
    fn cast(&mut self, value: Expr, target: Type) -> Result<Expr, Error> {
        let dest = self.table.alloc_slot();
        self.emit.convert(dest, &value, target)?;

        Ok(ExprKind::Temp(dest).typed(target))
    }

    /// Shared by declarations with initializers and assignments: a value of
    /// a different type is cast to the destination's declared type first.
    fn assign_to(&mut self, slot: Slot, ty: Type, value: Expr) -> Result<(), Error> {
        let value = if value.ty != ty {
            self.cast(value, ty)?
        } else {
            value
        };

        Ok(self.emit.assign(slot, &value)?)
    }

    fn infix(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Result<Expr, Error> {
        let (lhs, rhs) = match needs_cast(lhs.ty, rhs.ty) {
            Cast::None => (lhs, rhs),
            Cast::Left(target) => {
                let lhs = self.cast(lhs, target)?;
                (lhs, rhs)
            }
            Cast::Right(target) => {
                let rhs = self.cast(rhs, target)?;
                (lhs, rhs)
            }
        };

        let ty = lhs.ty;
        let dest = self.table.alloc_slot();
        self.emit.infix(op, dest, &lhs, &rhs)?;

        Ok(ExprKind::Temp(dest).typed(ty))
    }

    /// expression := primary (('+'|'-'|'*'|'/') primary)*
    ///
    /// Flat left-associative fold, no precedence among the four operators.
    fn expression(&mut self) -> Result<Expr, Error> {
        trace!(token = %self.token, "expression");

        let mut lhs = self.primary()?;

        loop {
            let punct = match self.token.kind {
                TokenKind::Punct(punct) => punct,
                // a non-punct token ends the expression; the caller decides
                // whether it is acceptable there
                _ => break,
            };

            let op = match punct {
                ";" | "," | ")" => break,
                punct => BinaryOp::from_punct(punct).ok_or_else(|| {
                    ErrorKind::InvalidOperator(self.token.kind.clone()).at(self.span())
                })?,
            };

            self.advance()?;
            let rhs = self.primary()?;
            lhs = self.infix(op, lhs, rhs)?;
        }

        Ok(lhs)
    }

    /// primary := '(' expression ')' | ID | INT_LITERAL | FLOAT_LITERAL
    fn primary(&mut self) -> Result<Expr, Error> {
        let token = self.next()?;

        match token.kind {
            TokenKind::IntLit(value) => Ok(ExprKind::IntLit(value).typed(Type::Int)),
            TokenKind::FloatLit(value) => Ok(ExprKind::FloatLit(value).typed(Type::Float)),
            TokenKind::Ident(name) => {
                let entry = self
                    .table
                    .lookup(&name)
                    .ok_or_else(|| ErrorKind::UndeclaredIdentifier(name.clone()).at(token.span))?;

                Ok(ExprKind::Var(entry.slot).typed(entry.ty))
            }
            TokenKind::Punct("(") => {
                let value = self.expression()?;
                self.expect(TokenKind::Punct(")"))?;
                Ok(value)
            }
            kind => Err(ErrorKind::InvalidPrimary(kind).at(token.span).into()),
        }
    }
}
