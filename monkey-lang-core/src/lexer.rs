pub use crate::token::{Token, TokenKind};

use crate::token::lookup_ident;

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_whitespace(ch: char) -> bool {
        matches!(ch, ' ' | '\t' | '\n' | '\r')
    }

    /// Returns the next token. Once the input is exhausted every call yields
    /// an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_whitespace(*ch))
            .is_some()
        {}

        let Some((idx, ch)) = self.iter.next() else {
            return Token::eof(self.input.len());
        };

        match ch {
            '=' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    self.token_from(TokenKind::Equal, idx)
                } else {
                    self.token_from(TokenKind::Assign, idx)
                }
            }
            '!' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    self.token_from(TokenKind::NotEqual, idx)
                } else {
                    self.token_from(TokenKind::Bang, idx)
                }
            }
            '+' => self.token_from(TokenKind::Plus, idx),
            '-' => self.token_from(TokenKind::Minus, idx),
            '*' => self.token_from(TokenKind::Asterisk, idx),
            '/' => self.token_from(TokenKind::Slash, idx),
            '<' => self.token_from(TokenKind::LessThan, idx),
            '>' => self.token_from(TokenKind::GreaterThan, idx),
            ',' => self.token_from(TokenKind::Comma, idx),
            ';' => self.token_from(TokenKind::SemiColon, idx),
            ':' => self.token_from(TokenKind::Colon, idx),
            '(' => self.token_from(TokenKind::LParen, idx),
            ')' => self.token_from(TokenKind::RParen, idx),
            '{' => self.token_from(TokenKind::LBrace, idx),
            '}' => self.token_from(TokenKind::RBrace, idx),
            '[' => self.token_from(TokenKind::LBracket, idx),
            ']' => self.token_from(TokenKind::RBracket, idx),
            '"' => self.read_string(idx),
            c if Self::is_letter(c) => self.read_identifier(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            _ => self.token_from(TokenKind::Illegal, idx),
        }
    }

    /// Builds a token whose literal is the source text from `start` up to the
    /// current position.
    fn token_from(&mut self, kind: TokenKind, start: usize) -> Token {
        let end = self.next_idx();
        Token::new(kind, &self.input[start..end], start, end)
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| Self::is_letter(*ch)).is_some() {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        Token::new(lookup_ident(ident), ident, start, end)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        self.token_from(TokenKind::Int, start)
    }

    // No escape sequences. An unterminated string runs to the end of input.
    fn read_string(&mut self, start: usize) -> Token {
        let content_start = start + 1;
        let mut content_end = self.input.len();
        for (idx, ch) in self.iter.by_ref() {
            if ch == '"' {
                content_end = idx;
                break;
            }
        }

        Token::new(
            TokenKind::String,
            &self.input[content_start..content_end],
            start,
            self.next_idx(),
        )
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn test_single_characters() {
        let input = "=+(){},;";
        let output = Tokenizer::new(input).collect::<Vec<_>>();

        assert_eq!(
            output,
            vec![
                Token::new(TokenKind::Assign, "=", 0, 1),
                Token::new(TokenKind::Plus, "+", 1, 2),
                Token::new(TokenKind::LParen, "(", 2, 3),
                Token::new(TokenKind::RParen, ")", 3, 4),
                Token::new(TokenKind::LBrace, "{", 4, 5),
                Token::new(TokenKind::RBrace, "}", 5, 6),
                Token::new(TokenKind::Comma, ",", 6, 7),
                Token::new(TokenKind::SemiColon, ";", 7, 8),
            ]
        );
    }

    #[test]
    fn test_program() {
        let input = "let five = 5;
    let ten = 10;
    let add = fn(x, y) {
    x + y;
    };
    let result = add(five, ten);
    ";
        let expected = vec![
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "five"),
            (TokenKind::Assign, "="),
            (TokenKind::Int, "5"),
            (TokenKind::SemiColon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "ten"),
            (TokenKind::Assign, "="),
            (TokenKind::Int, "10"),
            (TokenKind::SemiColon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "add"),
            (TokenKind::Assign, "="),
            (TokenKind::Function, "fn"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "x"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "y"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Ident, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Ident, "y"),
            (TokenKind::SemiColon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::SemiColon, ";"),
            (TokenKind::Let, "let"),
            (TokenKind::Ident, "result"),
            (TokenKind::Assign, "="),
            (TokenKind::Ident, "add"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "five"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "ten"),
            (TokenKind::RParen, ")"),
            (TokenKind::SemiColon, ";"),
        ];

        let output = Tokenizer::new(input)
            .map(|token| (token.kind, token.literal.to_string()))
            .collect::<Vec<_>>();
        let expected = expected
            .into_iter()
            .map(|(kind, literal)| (kind, literal.to_owned()))
            .collect::<Vec<_>>();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_operators() {
        let input = "
    !-/*5;
    5 < 10 > 5;
    ";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Bang,
                TokenKind::Minus,
                TokenKind::Slash,
                TokenKind::Asterisk,
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Int,
                TokenKind::LessThan,
                TokenKind::Int,
                TokenKind::GreaterThan,
                TokenKind::Int,
                TokenKind::SemiColon,
            ]
        )
    }

    #[test]
    fn test_keywords() {
        let input = "if (5 < 10) {
    return true;
    } else {
    return false;
    }";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::If,
                TokenKind::LParen,
                TokenKind::Int,
                TokenKind::LessThan,
                TokenKind::Int,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::True,
                TokenKind::SemiColon,
                TokenKind::RBrace,
                TokenKind::Else,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::False,
                TokenKind::SemiColon,
                TokenKind::RBrace,
            ]
        )
    }

    #[test]
    fn test_two_character_operators() {
        let input = "10 == 10;
    10 != 9; a = !b";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Int,
                TokenKind::Equal,
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Int,
                TokenKind::NotEqual,
                TokenKind::Int,
                TokenKind::SemiColon,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Bang,
                TokenKind::Ident,
            ]
        )
    }

    #[test]
    fn test_collections() {
        assert_eq!(
            kinds("{1: 2}[0]"),
            vec![
                TokenKind::LBrace,
                TokenKind::Int,
                TokenKind::Colon,
                TokenKind::Int,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::Int,
                TokenKind::RBracket,
            ]
        )
    }

    #[test]
    fn test_strings() {
        let output = Tokenizer::new(r#""foobar" "foo bar" """#).collect::<Vec<_>>();
        assert_eq!(
            output,
            vec![
                Token::new(TokenKind::String, "foobar", 0, 8),
                Token::new(TokenKind::String, "foo bar", 9, 18),
                Token::new(TokenKind::String, "", 19, 21),
            ]
        );

        let unterminated = Tokenizer::new("\"abc def").collect::<Vec<_>>();
        assert_eq!(
            unterminated,
            vec![Token::new(TokenKind::String, "abc def", 0, 8)]
        );
    }

    #[test]
    fn test_illegal_and_identifiers() {
        let output = Tokenizer::new("foo_bar @ x1")
            .map(|token| (token.kind, token.literal.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            output,
            vec![
                (TokenKind::Ident, "foo_bar".to_owned()),
                (TokenKind::Illegal, "@".to_owned()),
                (TokenKind::Ident, "x".to_owned()),
                (TokenKind::Int, "1".to_owned()),
            ]
        );
    }

    #[test]
    fn test_eof_repeats() {
        let mut tokenizer = Tokenizer::new("  5 \t\r\n");
        assert_eq!(tokenizer.next_token().kind, TokenKind::Int);
        for _ in 0..3 {
            assert_eq!(tokenizer.next_token(), Token::eof(7));
        }
    }
}
