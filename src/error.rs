use std::fmt::{Debug, Display};

use crate::{
    lexer::{Span, TokenError},
    parser::ParseError,
    symtab::SymbolError,
};

pub trait IntoSpanned {
    fn at(self, span: Span) -> SpannedError<Self>
    where
        Self: Sized + Display;
}

impl<T: Display> IntoSpanned for T {
    fn at(self, span: Span) -> SpannedError<Self>
    where
        Self: Sized + Display,
    {
        SpannedError { kind: self, span }
    }
}

#[derive(Debug)]
pub struct SpannedError<T: Display> {
    pub kind: T,
    pub span: Span,
}

impl<T: Display> Display for SpannedError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl<T: Display + Debug> std::error::Error for SpannedError<T> {}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IO(#[from] std::io::Error),
    #[error("TokenError: {0}")]
    Lex(#[from] TokenError),
    #[error("ParseError: {0}")]
    Parse(#[from] ParseError),
    #[error("SymbolError: {0}")]
    Symbol(#[from] SymbolError),
    #[error("SerializeError: {0}")]
    Serialize(#[from] ron::Error),
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Error::IO(_) => Span::default(),
            Error::Lex(e) => e.span,
            Error::Parse(e) => e.span,
            Error::Symbol(e) => e.span,
            Error::Serialize(_) => Span::default(),
        }
    }
}
