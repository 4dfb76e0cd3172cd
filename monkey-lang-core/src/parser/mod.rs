pub mod error;
pub mod expressions;
pub mod statements;

use log::{debug, trace};

use crate::ast::{Identifier, Program};
use crate::lexer::{Token, TokenKind, Tokenizer};
pub use error::{Expected, ParseError};
pub use expressions::Precedence;
use statements::parse_statement;

pub struct Parser<'a> {
    iter: std::iter::Peekable<Tokenizer<'a>>,
    errors: Vec<ParseError>,
    end_of_input: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        let end_of_input = tokenizer.input_len();
        let iter = tokenizer.peekable();
        Self {
            iter,
            errors: Vec::new(),
            end_of_input,
        }
    }

    /// Diagnostics recorded by [`Parser::parse_program`], in source order.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub(crate) fn next_token(&mut self) -> Token {
        self.iter
            .next()
            .unwrap_or_else(|| Token::eof(self.end_of_input))
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.iter
            .peek()
            .map(|token| token.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn next_if(&mut self, token_kind: TokenKind) -> Option<Token> {
        self.iter.next_if(|token| token.kind == token_kind)
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Identifier, ParseError> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Ident => Ok(Identifier { name: token.literal }),
            _ => Err(ParseError::unexpected_other(Expected::Identifier, token)),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next_token();
        if token.kind == token_kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected_token(token_kind, token))
        }
    }

    /// Parses statements until the end of input. A statement that fails to
    /// parse is left out of the program and its error is recorded; parsing
    /// resumes after the next semicolon.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while self.iter.peek().is_some() {
            match parse_statement(self) {
                Ok(statement) => {
                    statements.push(statement);
                    self.next_if(TokenKind::SemiColon);
                }
                Err(err) => {
                    debug!("parse error at {}..{}: {}", err.token().start, err.token().end, err);
                    self.synchronize(&err);
                    self.errors.push(err);
                }
            }
        }

        trace!(
            "parsed {} statements with {} errors",
            statements.len(),
            self.errors.len()
        );
        Program { statements }
    }

    fn synchronize(&mut self, err: &ParseError) {
        if matches!(err.token().kind, TokenKind::SemiColon | TokenKind::Eof) {
            return;
        }
        for token in self.iter.by_ref() {
            if token.kind == TokenKind::SemiColon {
                break;
            }
        }
    }
}
