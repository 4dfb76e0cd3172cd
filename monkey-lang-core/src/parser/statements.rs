use crate::ast::{LetStatement, ReturnStatement, Statement};
use crate::lexer::TokenKind;
use crate::parser::expressions::{parse_expression, Precedence};
use crate::parser::{ParseError, Parser};

/// Parses a single statement. A trailing semicolon is left for the caller.
pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    match parser.peek_kind() {
        TokenKind::Let => Ok(Statement::Let(parse_let_statement(parser)?)),
        TokenKind::Return => Ok(Statement::Return(parse_return_statement(parser)?)),
        _ => Ok(Statement::Expression(parse_expression(
            parser,
            Precedence::Lowest,
        )?)),
    }
}

fn parse_let_statement(parser: &mut Parser) -> Result<LetStatement, ParseError> {
    parser.expect_token(TokenKind::Let)?;
    let identifier = parser.parse_ident()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser, Precedence::Lowest)?;

    Ok(LetStatement { identifier, value })
}

fn parse_return_statement(parser: &mut Parser) -> Result<ReturnStatement, ParseError> {
    parser.expect_token(TokenKind::Return)?;
    let value = match parser.peek_kind() {
        TokenKind::SemiColon | TokenKind::RBrace | TokenKind::Eof => None,
        _ => Some(parse_expression(parser, Precedence::Lowest)?),
    };

    Ok(ReturnStatement { value })
}
