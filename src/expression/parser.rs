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
//! # Expression parser
//!
//! Recursive descent parser producing the [`Expr`] tree. Operator precedence
//! from the loosest binding:
//!
//! 1. `c ? a : b`
//! 2. `||`
//! 3. `&&`
//! 4. `==`, `!=`, `~=`, `contains`
//! 5. `<`, `<=`, `>`, `>=`
//! 6. `+`, `-`
//! 7. `*`, `/`, `%`
//! 8. unary `!`, `-`
//! 9. postfix `.member`, `.method(..)`, `[index]`
//!
//! Nesting (brackets, unary operators and chained operators alike) is limited
//! to [`MAX_DEPTH`] levels so that neither parsing nor evaluation can exhaust
//! the stack.
use serde_json::{Number, Value};

use crate::expression::ast::{BinaryOp, Expr, Method, Pattern};
use crate::expression::error::SyntaxError;
use crate::expression::full_match_regex;
use crate::expression::lexer::{Lexer, Token, TokenKind};

/// Deepest accepted nesting of an expression.
pub(crate) const MAX_DEPTH: usize = 128;

/// Parse the expression source.
pub(crate) fn parse(source: &str) -> Result<Expr, SyntaxError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_conditional()?;
    let token = parser.peek();
    if token.kind != TokenKind::Eof {
        return Err(SyntaxError::new(
            token.position,
            format!("unexpected {}", token.kind),
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // the token stream always ends with `Eof`
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        let token = self.peek();
        if token.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(SyntaxError::new(
                token.position,
                format!("expected {kind}, found {}", token.kind),
            ))
        }
    }

    /// One more nesting level.
    fn descend(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyntaxError::new(
                self.peek().position,
                format!("expression is nested deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    /// Parse one nested level with `parse`.
    fn nested<F>(&mut self, parse: F) -> Result<Expr, SyntaxError>
    where
        F: FnOnce(&mut Self) -> Result<Expr, SyntaxError>,
    {
        self.descend()?;
        let expr = parse(self)?;
        self.depth -= 1;
        Ok(expr)
    }

    fn parse_conditional(&mut self) -> Result<Expr, SyntaxError> {
        self.nested(Self::parse_ternary)
    }

    fn parse_ternary(&mut self) -> Result<Expr, SyntaxError> {
        let condition = self.parse_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let then = self.parse_conditional()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_conditional()?;
        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.depth;
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            self.descend()?;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.depth;
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::And) {
            self.descend()?;
            let right = self.parse_equality()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.depth;
        let mut left = self.parse_relational()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::Equal => Some(BinaryOp::Equal),
                TokenKind::NotEqual => Some(BinaryOp::NotEqual),
                TokenKind::Identifier(name) if name == "contains" => Some(BinaryOp::Contains),
                TokenKind::Matches => None,
                _ => {
                    self.depth = base;
                    return Ok(left);
                }
            };
            self.advance();
            self.descend()?;
            let position = self.peek().position;
            let right = self.parse_relational()?;
            let Some(op) = op else {
                let pattern = match right {
                    Expr::Literal(Value::String(pattern)) => Pattern::Static(
                        full_match_regex(&pattern)
                            .map_err(|err| SyntaxError::new(position, err.to_string()))?,
                    ),
                    other => Pattern::Dynamic(Box::new(other)),
                };
                left = Expr::Matches {
                    target: Box::new(left),
                    pattern,
                };
                continue;
            };
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_relational(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.depth;
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                _ => {
                    self.depth = base;
                    return Ok(left);
                }
            };
            self.advance();
            self.descend()?;
            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.depth;
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => {
                    self.depth = base;
                    return Ok(left);
                }
            };
            self.advance();
            self.descend()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::Percent => BinaryOp::Remainder,
                _ => {
                    self.depth = base;
                    return Ok(left);
                }
            };
            self.advance();
            self.descend()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(&TokenKind::Not) {
            let operand = self.nested(Self::parse_unary)?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        if self.eat(&TokenKind::Minus) {
            return Ok(match self.nested(Self::parse_unary)? {
                Expr::Literal(Value::Number(n)) => Expr::Literal(negate_literal(&n)),
                other => Expr::Negate(Box::new(other)),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.depth;
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                self.descend()?;
                let token = self.advance();
                let TokenKind::Identifier(name) = token.kind else {
                    return Err(SyntaxError::new(
                        token.position,
                        format!("expected member name, found {}", token.kind),
                    ));
                };
                if self.eat(&TokenKind::OpenParen) {
                    let method = Method::from_name(&name).ok_or_else(|| {
                        SyntaxError::new(token.position, format!("unknown method `{name}`"))
                    })?;
                    let args = self.parse_arguments(TokenKind::CloseParen)?;
                    let (min, max) = method.arity();
                    if args.len() < min || args.len() > max {
                        return Err(SyntaxError::new(
                            token.position,
                            format!(
                                "method `{name}` takes {min}..={max} arguments, {} given",
                                args.len()
                            ),
                        ));
                    }
                    expr = Expr::Call {
                        target: Box::new(expr),
                        method,
                        args,
                    };
                } else {
                    expr = Expr::Member {
                        target: Box::new(expr),
                        name,
                    };
                }
            } else if self.eat(&TokenKind::OpenBracket) {
                self.descend()?;
                let index = self.parse_conditional()?;
                self.expect(TokenKind::CloseBracket)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                self.depth = base;
                return Ok(expr);
            }
        }
    }

    /// Comma separated expressions up to (and including) the closing token.
    fn parse_arguments(&mut self, close: TokenKind) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        if self.eat(&close) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_conditional()?);
            if self.eat(&close) {
                return Ok(args);
            }
            self.expect(TokenKind::Comma)?;
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.advance();
        match token.kind {
            TokenKind::StringLiteral(text) => Ok(Expr::Literal(Value::String(text))),
            TokenKind::Integer(n) => Ok(Expr::Literal(Value::from(n))),
            TokenKind::Float(f) => Number::from_f64(f)
                .map(|n| Expr::Literal(Value::Number(n)))
                .ok_or_else(|| SyntaxError::new(token.position, "invalid number")),
            TokenKind::Identifier(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" | "nil" => Expr::Literal(Value::Null),
                _ => Expr::Variable(name),
            }),
            TokenKind::OpenParen => {
                let expr = self.parse_conditional()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(expr)
            }
            TokenKind::OpenBracket => Ok(Expr::List(
                self.parse_arguments(TokenKind::CloseBracket)?,
            )),
            other => Err(SyntaxError::new(
                token.position,
                format!("unexpected {other}"),
            )),
        }
    }
}

fn negate_literal(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(-i)
    } else {
        n.as_f64()
            .and_then(|f| Number::from_f64(-f))
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
