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
//! # Action evaluation error
use thiserror::Error;

use crate::action::ActionKind;
use crate::expression::EvaluationError;

/// Error raised while a rule is evaluated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ActionEvaluationError {
    /// Rule condition evaluation failed.
    #[error("condition `{condition}` evaluation failed: {source}")]
    Condition {
        /// Condition source.
        condition: String,
        /// The source of the error.
        source: EvaluationError,
    },

    /// Action parameter expression evaluation failed.
    #[error("action `{action}` parameter `{parameter}` evaluation failed: {source}")]
    Expression {
        /// Action kind.
        action: ActionKind,
        /// Parameter name.
        parameter: &'static str,
        /// The source of the error.
        source: EvaluationError,
    },

    /// Expression produced a value the action can not use.
    #[error("action `{action}` parameter `{parameter}` produced an invalid value `{value}`")]
    InvalidValue {
        /// Action kind.
        action: ActionKind,
        /// Parameter name.
        parameter: &'static str,
        /// Offending value.
        value: String,
    },
}
