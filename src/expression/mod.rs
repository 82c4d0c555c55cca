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
//! # Expression language
//!
//! Rule conditions and action value parameters are written in a small
//! expression language operating on the invocation [`Context`]:
//!
//! - literals: `'text'`, `"text"`, `42`, `1.5`, `true`, `false`, `null`,
//!   lists `['a', 'b']`,
//! - variables (`idp`), map and list indexing (`attr['mail']`,
//!   `groups[0]`) and member access (`attr.mail`),
//! - methods `size`, `length`, `isEmpty`, `contains`, `containsKey`,
//!   `startsWith`, `endsWith`, `equals`, `equalsIgnoreCase`, `toLowerCase`,
//!   `toUpperCase`, `trim`, `substring`, `split`, `get`,
//! - operators `!`, unary `-`, `+ - * / %` (`+` concatenates when one side is
//!   a string), `== != < <= > >=`, `~=` (full regex match), infix
//!   `contains`, short-circuit `&&` and `||`, and `c ? a : b`.
//!
//! Referencing a variable missing in the context fails the evaluation,
//! reading a missing key of a map yields `null`.
//!
//! The engine only talks to the language through the [`Evaluator`] trait so
//! that a different implementation can be plugged in.
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

mod ast;
pub mod error;
mod eval;
mod lexer;
mod parser;
pub mod value;

use crate::context::Context;
use crate::profile::error::ProfileDefinitionError;
pub use error::{EvaluationError, SyntaxError};
pub use value::{value_to_string, value_to_strings};

/// Compile a regular expression that must match the whole input.
pub fn full_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// Compiled program produced by an [`Evaluator`].
pub trait Program: fmt::Debug + Send + Sync {
    /// Execute the program against the context.
    fn execute(&self, ctx: &Context) -> Result<Value, EvaluationError>;
}

/// Expression engine interface.
pub trait Evaluator: Send + Sync {
    /// Compile a rule condition.
    fn compile_condition(&self, source: &str) -> Result<CompiledCondition, ProfileDefinitionError>;

    /// Compile a value expression.
    fn compile_expression(
        &self,
        source: &str,
    ) -> Result<CompiledExpression, ProfileDefinitionError>;
}

/// Compiled value expression.
#[derive(Clone, Debug)]
pub struct CompiledExpression {
    source: String,
    program: Arc<dyn Program>,
}

impl CompiledExpression {
    pub fn new<S: Into<String>>(source: S, program: Arc<dyn Program>) -> Self {
        Self {
            source: source.into(),
            program,
        }
    }

    /// Expression source.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn evaluate(&self, ctx: &Context) -> Result<Value, EvaluationError> {
        self.program.execute(ctx)
    }
}

/// Compiled rule condition.
///
/// A condition without a program (source `true` or blank) always holds.
#[derive(Clone, Debug)]
pub struct CompiledCondition {
    source: String,
    program: Option<Arc<dyn Program>>,
}

impl CompiledCondition {
    pub fn new<S: Into<String>>(source: S, program: Arc<dyn Program>) -> Self {
        Self {
            source: source.into(),
            program: Some(program),
        }
    }

    /// Condition which is always satisfied.
    pub fn always() -> Self {
        Self {
            source: "true".into(),
            program: None,
        }
    }

    /// Condition source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate the condition. `null` is treated as `false`.
    pub fn evaluate(&self, ctx: &Context) -> Result<bool, EvaluationError> {
        let Some(program) = &self.program else {
            return Ok(true);
        };
        match program.execute(ctx)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(EvaluationError::NotBoolean(value_to_string(&other))),
        }
    }
}

#[derive(Debug)]
struct Interpreted(ast::Expr);

impl Program for Interpreted {
    fn execute(&self, ctx: &Context) -> Result<Value, EvaluationError> {
        self.0.evaluate(ctx)
    }
}

/// Built-in expression language evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    fn compile(&self, source: &str) -> Result<Arc<dyn Program>, ProfileDefinitionError> {
        parser::parse(source)
            .map(|expr| Arc::new(Interpreted(expr)) as Arc<dyn Program>)
            .map_err(|source_err| ProfileDefinitionError::Expression {
                expression: source.to_string(),
                source: source_err,
            })
    }
}

impl Evaluator for ExpressionEvaluator {
    fn compile_condition(&self, source: &str) -> Result<CompiledCondition, ProfileDefinitionError> {
        let trimmed = source.trim();
        if trimmed.is_empty() || trimmed == "true" {
            return Ok(CompiledCondition::always());
        }
        Ok(CompiledCondition::new(source, self.compile(source)?))
    }

    fn compile_expression(
        &self,
        source: &str,
    ) -> Result<CompiledExpression, ProfileDefinitionError> {
        Ok(CompiledExpression::new(source, self.compile(source)?))
    }
}
