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
//! # Expression errors
use thiserror::Error;

/// Syntax error detected while compiling an expression.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message} at position {position}")]
pub struct SyntaxError {
    /// Character offset of the offending token.
    pub position: usize,
    /// Human readable description.
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new<S: Into<String>>(position: usize, message: S) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Error raised while evaluating a compiled expression against a context.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvaluationError {
    /// Referenced variable is not present in the context.
    #[error("unresolvable variable `{0}`")]
    UndefinedVariable(String),

    /// Operation applied to a value of the wrong type.
    #[error("cannot apply `{operation}` to {found}")]
    TypeMismatch {
        /// Operation being evaluated.
        operation: String,
        /// Description of the offending operand(s).
        found: String,
    },

    /// Method or member access on `null`.
    #[error("cannot invoke `{0}` on null")]
    NullReference(String),

    /// List index outside of the list bounds.
    #[error("index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds {
        /// Requested index.
        index: i64,
        /// List length.
        length: usize,
    },

    /// Arithmetic division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflow.
    #[error("arithmetic overflow in `{0}`")]
    Overflow(String),

    /// Regular expression computed at runtime is invalid.
    #[error("invalid regular expression `{pattern}`: {message}")]
    InvalidRegex {
        /// The pattern.
        pattern: String,
        /// Regex compiler message.
        message: String,
    },

    /// Condition produced something else than a boolean.
    #[error("condition must evaluate to a boolean, got {0}")]
    NotBoolean(String),
}
