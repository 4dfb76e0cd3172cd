use super::error::ParseError;
use super::statements::parse_statement;
use crate::ast::{BlockStatement, Expression, InfixOperationKind, PrefixOperationKind};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, Ord, PartialEq, Eq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    /// Shared by calls `f(x)` and index expressions `a[i]`.
    Call,
}

pub fn precedence_of(token: TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Every nested construct re-enters here, so the stack is grown on demand
/// instead of overflowing on deeply nested input.
pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
        parse_expression_inner(parser, precedence)
    })
}

fn parse_expression_inner(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let token = parser.next_token();
    let Some(prefix_parse_function) = prefix_parsing_function(token.kind) else {
        return Err(ParseError::NoPrefixFunction(token));
    };
    let mut left_expression = prefix_parse_function(token, parser)?;

    // Tokens without an infix function have the lowest precedence, so the
    // loop stops on `;`, `)` and the like.
    while precedence < precedence_of(parser.peek_kind()) {
        let token = parser.next_token();
        let Some(infix_parse_function) = infix_parsing_function(token.kind) else {
            break;
        };
        left_expression = infix_parse_function(left_expression, token, parser)?;
    }

    Ok(left_expression)
}

type PrefixFunction = fn(Token, &mut Parser) -> Result<Expression, ParseError>;

type InfixFunction = fn(Expression, Token, &mut Parser) -> Result<Expression, ParseError>;

pub fn prefix_parsing_function(token: TokenKind) -> Option<PrefixFunction> {
    match token {
        TokenKind::Ident => Some(parse_identifier),
        TokenKind::Int => Some(parse_integer_literal),
        TokenKind::String => Some(parse_string_literal),
        TokenKind::True | TokenKind::False => Some(parse_boolean_literal),
        TokenKind::Bang | TokenKind::Minus => Some(parse_prefix_operation),
        TokenKind::LParen => Some(parse_grouped_expression),
        TokenKind::LBracket => Some(parse_array_literal),
        TokenKind::LBrace => Some(parse_hash_literal),
        TokenKind::If => Some(parse_if_expression),
        TokenKind::Function => Some(parse_function_literal),
        _ => None,
    }
}

pub fn infix_parsing_function(token: TokenKind) -> Option<InfixFunction> {
    match token {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Asterisk
        | TokenKind::Slash
        | TokenKind::LessThan
        | TokenKind::GreaterThan
        | TokenKind::Equal
        | TokenKind::NotEqual => Some(parse_infix_operation),
        TokenKind::LParen => Some(parse_call_expression),
        TokenKind::LBracket => Some(parse_index_expression),
        _ => None,
    }
}

fn parse_identifier(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::Identifier(crate::ast::Identifier {
        name: token.literal,
    }))
}

fn parse_integer_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.literal.parse() {
        Ok(value) => Ok(Expression::IntegerLiteral(value)),
        Err(_) => Err(ParseError::InvalidInteger(token)),
    }
}

fn parse_string_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::StringLiteral(token.literal.to_string()))
}

fn parse_boolean_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::BooleanLiteral(token.kind == TokenKind::True))
}

fn parse_prefix_operation(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let kind = match token.kind {
        TokenKind::Bang => PrefixOperationKind::Bang,
        _ => PrefixOperationKind::Minus,
    };
    Ok(Expression::PrefixOperation(
        kind,
        Box::new(parse_expression(parser, Precedence::Prefix)?),
    ))
}

fn parse_grouped_expression(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses comma separated elements up to and including `terminator`. The
/// opening delimiter has already been consumed.
fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    if parser.next_if(terminator).is_some() {
        return Ok(elements);
    }

    loop {
        elements.push(parse_element(parser)?);

        let next = parser.next_token();
        match next.kind {
            TokenKind::Comma => continue,
            kind if kind == terminator => return Ok(elements),
            _ => return Err(ParseError::unexpected_token(terminator, next)),
        }
    }
}

fn parse_array_literal(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let expressions = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral(expressions))
}

fn parse_hash_literal(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let pairs = parse_sequence(
        parser,
        |parser| {
            let key = parse_expression(parser, Precedence::Lowest)?;
            parser.expect_token(TokenKind::Colon)?;
            let value = parse_expression(parser, Precedence::Lowest)?;
            Ok((key, value))
        },
        TokenKind::RBrace,
    )?;
    Ok(Expression::HashLiteral(pairs))
}

fn parse_if_expression(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);
    parser.expect_token(TokenKind::RParen)?;

    parser.expect_token(TokenKind::LBrace)?;
    let consequence = parse_block_statement(parser)?;

    let alternative = if parser.next_if(TokenKind::Else).is_some() {
        parser.expect_token(TokenKind::LBrace)?;
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

/// Parses statements up to the closing `}`. The opening `{` has already been
/// consumed.
fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let mut statements = Vec::new();

    loop {
        match parser.peek_kind() {
            TokenKind::RBrace => {
                parser.next_token();
                return Ok(BlockStatement { statements });
            }
            TokenKind::Eof => {
                let eof = parser.next_token();
                return Err(ParseError::unexpected_token(TokenKind::RBrace, eof));
            }
            _ => {
                statements.push(parse_statement(parser)?);
                parser.next_if(TokenKind::SemiColon);
            }
        }
    }
}

fn parse_function_literal(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(parser, |parser| parser.parse_ident(), TokenKind::RParen)?;

    parser.expect_token(TokenKind::LBrace)?;
    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral { parameters, body })
}

fn parse_infix_operation(
    left: Expression,
    token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let kind = match token.kind {
        TokenKind::Plus => InfixOperationKind::Plus,
        TokenKind::Minus => InfixOperationKind::Minus,
        TokenKind::Asterisk => InfixOperationKind::Multiply,
        TokenKind::Slash => InfixOperationKind::Divide,
        TokenKind::LessThan => InfixOperationKind::LessThan,
        TokenKind::GreaterThan => InfixOperationKind::GreaterThan,
        TokenKind::Equal => InfixOperationKind::Equal,
        _ => InfixOperationKind::NotEqual,
    };
    let right = parse_expression(parser, precedence_of(token.kind))?;

    Ok(Expression::InfixOperation(kind, Box::new(left), Box::new(right)))
}

fn parse_call_expression(
    left: Expression,
    _token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        function: Box::new(left),
        arguments,
    })
}

fn parse_index_expression(
    left: Expression,
    _token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::IndexExpression {
        left: Box::new(left),
        index: Box::new(index),
    })
}
