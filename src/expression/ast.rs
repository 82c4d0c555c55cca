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
//! # Expression syntax tree
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Parsed expression.
#[derive(Clone, Debug)]
pub(crate) enum Expr {
    Literal(Value),
    List(Vec<Expr>),
    Variable(String),
    /// `target[index]`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// `target.name`
    Member {
        target: Box<Expr>,
        name: String,
    },
    /// `target.method(args)`
    Call {
        target: Box<Expr>,
        method: Method,
        args: Vec<Expr>,
    },
    Not(Box<Expr>),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `target ~= pattern`
    Matches {
        target: Box<Expr>,
        pattern: Pattern,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    /// `condition ? then : otherwise`
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

/// Right hand side of the regex match operator.
#[derive(Clone, Debug)]
pub(crate) enum Pattern {
    /// Literal pattern compiled together with the expression.
    Static(Regex),
    /// Pattern computed at evaluation time.
    Dynamic(Box<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Contains,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Contains => "contains",
        };
        f.write_str(op)
    }
}

/// Methods callable on values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Method {
    Size,
    Length,
    IsEmpty,
    Contains,
    ContainsKey,
    StartsWith,
    EndsWith,
    Equals,
    EqualsIgnoreCase,
    ToLowerCase,
    ToUpperCase,
    Trim,
    Substring,
    Split,
    Get,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "size" => Self::Size,
            "length" => Self::Length,
            "isEmpty" => Self::IsEmpty,
            "contains" => Self::Contains,
            "containsKey" => Self::ContainsKey,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            "equals" => Self::Equals,
            "equalsIgnoreCase" => Self::EqualsIgnoreCase,
            "toLowerCase" => Self::ToLowerCase,
            "toUpperCase" => Self::ToUpperCase,
            "trim" => Self::Trim,
            "substring" => Self::Substring,
            "split" => Self::Split,
            "get" => Self::Get,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Length => "length",
            Self::IsEmpty => "isEmpty",
            Self::Contains => "contains",
            Self::ContainsKey => "containsKey",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Equals => "equals",
            Self::EqualsIgnoreCase => "equalsIgnoreCase",
            Self::ToLowerCase => "toLowerCase",
            Self::ToUpperCase => "toUpperCase",
            Self::Trim => "trim",
            Self::Substring => "substring",
            Self::Split => "split",
            Self::Get => "get",
        }
    }

    /// Accepted number of arguments (inclusive range).
    pub fn arity(&self) -> (usize, usize) {
        match self {
            Self::Size
            | Self::Length
            | Self::IsEmpty
            | Self::ToLowerCase
            | Self::ToUpperCase
            | Self::Trim => (0, 0),
            Self::Contains
            | Self::ContainsKey
            | Self::StartsWith
            | Self::EndsWith
            | Self::Equals
            | Self::EqualsIgnoreCase
            | Self::Split
            | Self::Get => (1, 1),
            Self::Substring => (1, 2),
        }
    }
}
