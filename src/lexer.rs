use std::fmt::Display;

use serde::Serialize;

use crate::error::{IntoSpanned, SpannedError};

/// Longest identifier the language accepts.
pub const MAX_ID_LEN: usize = 32;
/// Most digits a numeric literal may carry (the dot is not counted).
pub const MAX_NUM_LEN: usize = 12;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub offset: u32,
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.offset)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum TokenKind {
    Ident(String),
    Keyword(String),
    Punct(&'static str),
    IntLit(i64),
    FloatLit(f64),
    Eof,
}

impl TokenKind {
    pub fn at(self, span: Span) -> Token {
        Token { kind: self, span }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "{name}"),
            Self::Keyword(name) => write!(f, "{name}"),
            Self::Punct(punct) => write!(f, "{punct}"),
            Self::IntLit(value) => write!(f, "{value}"),
            Self::FloatLit(value) => write!(f, "{value}"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}

fn is_term(c: &char) -> bool {
    matches!(c, '_' | 'a'..='z' | 'A'..='Z' | '0'..='9')
}

fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "BEGIN" | "END" | "read" | "write" | "int" | "long" | "float"
    )
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("illegal character '{0}'")]
    IllegalCharacter(char),
    #[error("identifier exceeds {MAX_ID_LEN} characters")]
    IdentifierTooLong,
    #[error("numeric literal exceeds {MAX_NUM_LEN} digits")]
    LiteralTooLong,
    #[error("numeric literal '{0}' is out of range")]
    NumericOverflow(String),
    #[error("expected '=' after ':'")]
    InvalidSyntax,
}

pub type TokenError = SpannedError<ErrorKind>;

/// Streaming tokenizer with one character of lookahead. Each call to
/// [`Lexer::next_token`] leaves the cursor on the first character that does
/// not belong to the token just produced.
pub struct Lexer<'a> {
    offset: usize,
    source: &'a [char],
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [char]) -> Self {
        Self { offset: 0, source }
    }

    fn cur(&self) -> Option<char> {
        self.source.get(self.offset).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.offset + 1).copied()
    }

    fn accept(&mut self, expected: char) -> bool {
        if self.cur() == Some(expected) {
            self.advance();
            return true;
        }

        false
    }

    fn advance(&mut self) {
        self.offset += 1;
    }

    fn span(&self) -> Span {
        Span {
            offset: self.offset as u32,
        }
    }

    fn term(&mut self) -> Result<Token, TokenError> {
        let span = self.span();
        let mut term = String::new();

        while let Some(c) = self.cur() {
            if !is_term(&c) {
                break;
            }

            self.advance();
            term.push(c);
        }

        if term.len() > MAX_ID_LEN {
            return Err(ErrorKind::IdentifierTooLong.at(span));
        }

        if is_keyword(&term) {
            Ok(TokenKind::Keyword(term).at(span))
        } else {
            Ok(TokenKind::Ident(term).at(span))
        }
    }

    fn number(&mut self) -> Result<Token, TokenError> {
        let span = self.span();
        let mut digits = 0;
        let mut num = String::new();

        while let Some(c) = self.cur() {
            if !c.is_ascii_digit() {
                break;
            }

            self.advance();
            digits += 1;
            num.push(c);
        }

        let mut dot = false;

        if self.cur() == Some('.') {
            dot = true;
            self.advance();
            num.push('.');

            while let Some(c) = self.cur() {
                if !c.is_ascii_digit() {
                    break;
                }

                self.advance();
                digits += 1;
                num.push(c);
            }
        }

        if digits > MAX_NUM_LEN {
            return Err(ErrorKind::LiteralTooLong.at(span));
        }

        if dot {
            let f = num
                .parse()
                .map_err(|_| ErrorKind::NumericOverflow(num.clone()).at(span))?;
            Ok(TokenKind::FloatLit(f).at(span))
        } else {
            let i = num
                .parse()
                .map_err(|_| ErrorKind::NumericOverflow(num.clone()).at(span))?;
            Ok(TokenKind::IntLit(i).at(span))
        }
    }

    /// Produces the next token, skipping whitespace and `--` line comments.
    pub fn next_token(&mut self) -> Result<Token, TokenError> {
        loop {
            let span = self.span();

            let cur = match self.cur() {
                Some(cur) => cur,
                None => return Ok(TokenKind::Eof.at(span)),
            };

            match cur {
                c if c.is_whitespace() => self.advance(),
                // line comment, discarded through end-of-line
                '-' if self.peek() == Some('-') => {
                    while let Some(c) = self.cur() {
                        self.advance();

                        if c == '\n' {
                            break;
                        }
                    }
                }
                'a'..='z' | 'A'..='Z' => return self.term(),
                '0'..='9' => return self.number(),
                ':' => {
                    self.advance();

                    if self.accept('=') {
                        return Ok(TokenKind::Punct(":=").at(span));
                    }

                    return Err(ErrorKind::InvalidSyntax.at(span));
                }
                '+' | '-' | '*' | '/' | '(' | ')' | ';' | ',' => {
                    self.advance();

                    let punct = match cur {
                        '+' => "+",
                        '-' => "-",
                        '*' => "*",
                        '/' => "/",
                        '(' => "(",
                        ')' => ")",
                        ';' => ";",
                        _ => ",",
                    };

                    return Ok(TokenKind::Punct(punct).at(span));
                }
                c => return Err(ErrorKind::IllegalCharacter(c).at(span)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Result<Vec<TokenKind>, TokenError> {
        let chars = source.chars().collect::<Vec<_>>();
        let mut lexer = Lexer::new(&chars);
        let mut kinds = vec![];

        loop {
            let token = lexer.next_token()?;

            if token.kind == TokenKind::Eof {
                return Ok(kinds);
            }

            kinds.push(token.kind);
        }
    }

    #[test]
    fn keywords_and_idents() {
        let kinds = lex("BEGIN int abc END begin").unwrap();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword("BEGIN".into()),
                TokenKind::Keyword("int".into()),
                TokenKind::Ident("abc".into()),
                TokenKind::Keyword("END".into()),
                TokenKind::Ident("begin".into()),
            ]
        );
    }

    #[test]
    fn assign_and_puncts() {
        let kinds = lex("a := (1 + 2) * 3, 4 / 5;").unwrap();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Punct(":="),
                TokenKind::Punct("("),
                TokenKind::IntLit(1),
                TokenKind::Punct("+"),
                TokenKind::IntLit(2),
                TokenKind::Punct(")"),
                TokenKind::Punct("*"),
                TokenKind::IntLit(3),
                TokenKind::Punct(","),
                TokenKind::IntLit(4),
                TokenKind::Punct("/"),
                TokenKind::IntLit(5),
                TokenKind::Punct(";"),
            ]
        );
    }

    #[test]
    fn minus_is_not_a_comment() {
        let kinds = lex("4 - 5").unwrap();

        assert_eq!(
            kinds,
            vec![
                TokenKind::IntLit(4),
                TokenKind::Punct("-"),
                TokenKind::IntLit(5),
            ]
        );
    }

    #[test]
    fn float_literals() {
        assert_eq!(lex("2.5").unwrap(), vec![TokenKind::FloatLit(2.5)]);
        assert_eq!(lex("1.").unwrap(), vec![TokenKind::FloatLit(1.0)]);
    }

    #[test]
    fn comments_are_skipped() {
        let kinds = lex("a -- rest of the line; ignored\n- b").unwrap();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Punct("-"),
                TokenKind::Ident("b".into()),
            ]
        );
    }

    #[test]
    fn comment_at_end_of_input() {
        assert_eq!(lex("a --done").unwrap(), vec![TokenKind::Ident("a".into())]);
    }

    #[test]
    fn identifier_length_boundary() {
        let max = "a".repeat(MAX_ID_LEN);
        assert_eq!(lex(&max).unwrap(), vec![TokenKind::Ident(max.clone())]);

        let over = "a".repeat(MAX_ID_LEN + 1);
        assert!(matches!(
            lex(&over).unwrap_err().kind,
            ErrorKind::IdentifierTooLong
        ));
    }

    #[test]
    fn literal_length_boundary() {
        let max = "9".repeat(MAX_NUM_LEN);
        assert_eq!(lex(&max).unwrap(), vec![TokenKind::IntLit(999_999_999_999)]);

        let over = "9".repeat(MAX_NUM_LEN + 1);
        assert!(matches!(
            lex(&over).unwrap_err().kind,
            ErrorKind::LiteralTooLong
        ));
    }

    #[test]
    fn lone_colon_is_rejected() {
        assert!(matches!(
            lex("a : b").unwrap_err().kind,
            ErrorKind::InvalidSyntax
        ));
    }

    #[test]
    fn illegal_character() {
        assert!(matches!(
            lex("a ? b").unwrap_err().kind,
            ErrorKind::IllegalCharacter('?')
        ));
    }

    #[test]
    fn eof_is_repeatable() {
        let chars = vec![];
        let mut lexer = Lexer::new(&chars);

        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}
