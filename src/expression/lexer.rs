// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # Expression lexer
//!
//! Splits the expression source into tokens consumed by the parser.
use std::fmt;

use crate::expression::error::SyntaxError;

/// A token produced by the lexer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Character offset of the token start.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Token types.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TokenKind {
    Identifier(String),
    StringLiteral(String),
    Integer(i64),
    Float(f64),

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Dot,
    Question,
    Colon,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Not,
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// `~=`
    Matches,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) => write!(f, "identifier `{name}`"),
            Self::StringLiteral(_) => write!(f, "string literal"),
            Self::Integer(_) | Self::Float(_) => write!(f, "number"),
            Self::OpenParen => write!(f, "("),
            Self::CloseParen => write!(f, ")"),
            Self::OpenBracket => write!(f, "["),
            Self::CloseBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Dot => write!(f, "."),
            Self::Question => write!(f, "?"),
            Self::Colon => write!(f, ":"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Not => write!(f, "!"),
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::LessEqual => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEqual => write!(f, ">="),
            Self::Matches => write!(f, "~="),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// Lexer for the expression language.
pub(crate) struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.pos >= self.input.len() {
                tokens.push(Token::new(TokenKind::Eof, self.pos));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let ch = self.input[self.pos];

        let two_char = |kind: TokenKind, lexer: &mut Self| -> Result<Token, SyntaxError> {
            lexer.pos += 2;
            Ok(Token::new(kind, start))
        };
        let one_char = |kind: TokenKind, lexer: &mut Self| -> Result<Token, SyntaxError> {
            lexer.pos += 1;
            Ok(Token::new(kind, start))
        };

        match ch {
            '(' => one_char(TokenKind::OpenParen, self),
            ')' => one_char(TokenKind::CloseParen, self),
            '[' => one_char(TokenKind::OpenBracket, self),
            ']' => one_char(TokenKind::CloseBracket, self),
            ',' => one_char(TokenKind::Comma, self),
            '.' if !self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                one_char(TokenKind::Dot, self)
            }
            '?' => one_char(TokenKind::Question, self),
            ':' => one_char(TokenKind::Colon, self),
            '+' => one_char(TokenKind::Plus, self),
            '-' => one_char(TokenKind::Minus, self),
            '*' => one_char(TokenKind::Star, self),
            '/' => one_char(TokenKind::Slash, self),
            '%' => one_char(TokenKind::Percent, self),
            '&' if self.peek_at(1) == Some('&') => two_char(TokenKind::And, self),
            '|' if self.peek_at(1) == Some('|') => two_char(TokenKind::Or, self),
            '=' if self.peek_at(1) == Some('=') => two_char(TokenKind::Equal, self),
            '!' if self.peek_at(1) == Some('=') => two_char(TokenKind::NotEqual, self),
            '!' => one_char(TokenKind::Not, self),
            '<' if self.peek_at(1) == Some('=') => two_char(TokenKind::LessEqual, self),
            '<' => one_char(TokenKind::Less, self),
            '>' if self.peek_at(1) == Some('=') => two_char(TokenKind::GreaterEqual, self),
            '>' => one_char(TokenKind::Greater, self),
            '~' if self.peek_at(1) == Some('=') => two_char(TokenKind::Matches, self),
            '\'' | '"' => self.read_string_literal(ch),
            c if c.is_ascii_digit() || c == '.' => self.read_number(),
            c if c.is_alphabetic() || c == '_' || c == '$' => Ok(self.read_identifier()),
            _ => Err(SyntaxError::new(
                start,
                format!("unexpected character '{ch}'"),
            )),
        }
    }

    fn read_string_literal(&mut self, quote: char) -> Result<Token, SyntaxError> {
        let start = self.pos;
        self.pos += 1;

        let mut text = String::new();
        while let Some(ch) = self.input.get(self.pos).copied() {
            match ch {
                c if c == quote => {
                    self.pos += 1;
                    return Ok(Token::new(TokenKind::StringLiteral(text), start));
                }
                '\\' => {
                    let escaped = self.peek_at(1).ok_or_else(|| {
                        SyntaxError::new(start, "unterminated string literal")
                    })?;
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        '\\' | '\'' | '"' => text.push(escaped),
                        // regex escapes such as `\d` are kept verbatim
                        other => {
                            text.push('\\');
                            text.push(other);
                        }
                    }
                    self.pos += 2;
                }
                other => {
                    text.push(other);
                    self.pos += 1;
                }
            }
        }

        Err(SyntaxError::new(start, "unterminated string literal"))
    }

    fn read_number(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let mut text = String::new();
        let mut is_float = false;

        while let Some(ch) = self.input.get(self.pos).copied() {
            if ch.is_ascii_digit() {
                text.push(ch);
            } else if ch == '.'
                && !is_float
                && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                text.push(ch);
            } else {
                break;
            }
            self.pos += 1;
        }

        let kind = if is_float {
            text.parse::<f64>().map(TokenKind::Float).ok()
        } else {
            text.parse::<i64>().map(TokenKind::Integer).ok()
        };
        kind.map(|kind| Token::new(kind, start))
            .ok_or_else(|| SyntaxError::new(start, format!("invalid number `{text}`")))
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.pos;
        let mut text = String::new();

        while let Some(ch) = self.input.get(self.pos).copied() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                text.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }

        Token::new(TokenKind::Identifier(text), start)
    }

    fn skip_whitespace(&mut self) {
        while self.input.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_condition() {
        assert_eq!(
            kinds("attr['mail'] != null && idp == \"saml\""),
            vec![
                TokenKind::Identifier("attr".into()),
                TokenKind::OpenBracket,
                TokenKind::StringLiteral("mail".into()),
                TokenKind::CloseBracket,
                TokenKind::NotEqual,
                TokenKind::Identifier("null".into()),
                TokenKind::And,
                TokenKind::Identifier("idp".into()),
                TokenKind::Equal,
                TokenKind::StringLiteral("saml".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 a.size()"),
            vec![
                TokenKind::Integer(1),
                TokenKind::Float(2.5),
                TokenKind::Float(0.5),
                TokenKind::Identifier("a".into()),
                TokenKind::Dot,
                TokenKind::Identifier("size".into()),
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_escapes() {
        assert_eq!(
            kinds(r"'it\'s' ~= 'a\\d'"),
            vec![
                TokenKind::StringLiteral("it's".into()),
                TokenKind::Matches,
                TokenKind::StringLiteral("a\\d".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("attr['mail").tokenize().unwrap_err();
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a # b").tokenize().unwrap_err();
        assert_eq!(err.position, 2);
        assert!(err.message.contains('#'));
    }
}
